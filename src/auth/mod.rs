//! # Authentication
//!
//! Bearer tokens for endpoints that need a logged-in caller, and the login
//! fixture that obtains them.

use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::{Value, json};
use tracing::{info, warn};

use crate::config::HarnessConfig;
use crate::error::HarnessError;
use crate::http::{ApiRequest, Session};
use crate::scenario::Endpoint;

/// Well-formed but never issued by the service.
pub const FORGED_TOKEN: &str = "fake_token_123456";

/// Characters of a token that may appear in logs.
const TOKEN_LOG_PREFIX: usize = 20;

/// Opaque credential returned by the login endpoint.
///
/// `Debug` and `Display` only show the loggable prefix.
#[derive(Clone, PartialEq, Eq)]
pub struct Token(String);

impl Token {
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    pub fn expose(&self) -> &str {
        &self.0
    }

    /// Leading characters safe to log.
    pub fn prefix(&self) -> &str {
        match self.0.char_indices().nth(TOKEN_LOG_PREFIX) {
            Some((idx, _)) => &self.0[..idx],
            None => &self.0,
        }
    }
}

impl fmt::Debug for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Token({}...)", self.prefix())
    }
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}...", self.prefix())
    }
}

/// Which credential a scenario presents in its `Authorization` header.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TokenSelector {
    /// The token obtained by the login fixture.
    Valid,
    /// [`FORGED_TOKEN`].
    Forged,
    /// The bearer scheme with nothing after it.
    Blank,
}

impl TokenSelector {
    pub fn authorization(self, token: &Token) -> String {
        match self {
            TokenSelector::Valid => format!("Bearer {}", token.expose()),
            TokenSelector::Forged => format!("Bearer {FORGED_TOKEN}"),
            TokenSelector::Blank => "Bearer ".to_owned(),
        }
    }
}

impl fmt::Display for TokenSelector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            TokenSelector::Valid => "valid",
            TokenSelector::Forged => "forged",
            TokenSelector::Blank => "blank",
        };
        write!(f, "{label}")
    }
}

/// Why the login fixture could not produce a token.
#[derive(Debug, thiserror::Error)]
pub enum FixtureError {
    #[error("login request did not complete: {0}")]
    Transport(#[source] HarnessError),

    #[error("login returned HTTP {actual}, expected 200")]
    Status { actual: u16 },

    #[error("login was rejected by the service: success={flag}, errorCode=`{error_code}`")]
    Rejected { flag: String, error_code: String },

    #[error("login succeeded but returned no credential in `data`")]
    MissingCredential,
}

/// Request body of the login endpoint.
pub fn login_payload(phone: &str, password: &str, login_type: i64) -> Value {
    json!({
        "phone": phone,
        "password": password,
        "type": login_type,
    })
}

/// Log in once with the configured credentials and return the token.
///
/// Preconditions are checked in order: HTTP 200, `success` exactly `true`,
/// non-empty string `data`. The first one that fails is returned.
pub async fn login_token(session: &Session, config: &HarnessConfig) -> Result<Token, FixtureError> {
    let creds = &config.credentials;
    let request = ApiRequest::new(
        config.endpoint_url(Endpoint::Login),
        login_payload(&creds.phone, &creds.password, creds.login_type),
    );

    let response = session
        .post_json(&request)
        .await
        .map_err(FixtureError::Transport)?;

    if response.status != 200 {
        warn!(status = response.status, "login fixture: unexpected status");
        return Err(FixtureError::Status {
            actual: response.status,
        });
    }

    if response.success_flag() != Some(true) {
        let flag = response
            .field("success")
            .map(Value::to_string)
            .unwrap_or_else(|| "<absent>".to_owned());
        warn!(success = %flag, "login fixture: login rejected");
        return Err(FixtureError::Rejected {
            flag,
            error_code: response.text_field("errorCode"),
        });
    }

    let token = match response.field("data") {
        Some(Value::String(data)) if !data.is_empty() => Token::new(data.clone()),
        _ => return Err(FixtureError::MissingCredential),
    };

    info!(session = session.id(), token_prefix = token.prefix(), "login token acquired");
    Ok(token)
}
