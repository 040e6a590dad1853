use std::collections::BTreeMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::{Duration, Instant};

use reqwest::header::{HeaderMap, HeaderName, HeaderValue};
use reqwest::Client;
use tracing::debug;

use super::request::ApiRequest;
use super::response::ApiResponse;
use crate::config::HarnessConfig;
use crate::error::{HarnessError, Result};

static NEXT_SESSION_ID: AtomicU64 = AtomicU64::new(1);

/// Connection-reusing client owned by a single test case.
///
/// The pooled connections are released when the session is dropped, whether
/// the test case passed, failed or bailed out early.
#[derive(Debug)]
pub struct Session {
    id: u64,
    client: Client,
}

impl Session {
    pub fn open(config: &HarnessConfig) -> Result<Self> {
        let mut builder = Client::builder().redirect(reqwest::redirect::Policy::limited(10));

        if let Some(ms) = config.timeout_ms {
            builder = builder.timeout(Duration::from_millis(ms));
        }

        let client = builder.build()?;
        let id = NEXT_SESSION_ID.fetch_add(1, Ordering::Relaxed);
        debug!(session = id, "session opened");

        Ok(Self { id, client })
    }

    pub fn id(&self) -> u64 {
        self.id
    }

    /// Send `request` as a JSON POST and read the whole response.
    ///
    /// Only transport problems are errors; any HTTP status is returned as-is.
    pub async fn post_json(&self, request: &ApiRequest) -> Result<ApiResponse> {
        let headers = build_headers(&request.headers)?;

        let start = Instant::now();
        let response = self
            .client
            .post(&request.url)
            .headers(headers)
            .json(&request.body)
            .send()
            .await?;

        let status = response.status();
        let status_text = status.canonical_reason().unwrap_or("Unknown").to_string();
        let bytes = response.bytes().await?;
        let elapsed = start.elapsed().as_millis() as u64;
        let raw = String::from_utf8_lossy(&bytes).to_string();

        debug!(
            session = self.id,
            url = %request.url,
            status = status.as_u16(),
            elapsed_ms = elapsed,
            size = bytes.len(),
            "response received"
        );

        Ok(ApiResponse::new(status.as_u16(), status_text, raw, elapsed))
    }
}

impl Drop for Session {
    fn drop(&mut self) {
        debug!(session = self.id, "session released");
    }
}

pub fn build_headers(input: &BTreeMap<String, String>) -> Result<HeaderMap> {
    let mut headers = HeaderMap::new();

    for (key, value) in input {
        if key.is_empty() {
            continue;
        }

        let header_name =
            HeaderName::from_bytes(key.as_bytes()).map_err(|err| HarnessError::Header {
                name: key.clone(),
                reason: err.to_string(),
            })?;
        let header_value = HeaderValue::from_str(value).map_err(|err| HarnessError::Header {
            name: key.clone(),
            reason: err.to_string(),
        })?;
        headers.insert(header_name, header_value);
    }

    Ok(headers)
}
