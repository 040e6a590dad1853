use std::collections::BTreeMap;

use serde_json::Value;

/// A JSON POST against one of the service endpoints.
#[derive(Debug, Clone)]
pub struct ApiRequest {
    pub url: String,
    pub headers: BTreeMap<String, String>,
    pub body: Value,
}

impl ApiRequest {
    pub fn new(url: impl Into<String>, body: Value) -> Self {
        Self {
            url: url.into(),
            headers: BTreeMap::new(),
            body,
        }
    }

    pub fn header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.insert(name.into(), value.into());
        self
    }
}
