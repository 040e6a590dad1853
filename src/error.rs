use std::path::PathBuf;

/// Errors raised by the harness itself, as opposed to contract violations
/// reported by a scenario run.
#[derive(Debug, thiserror::Error)]
pub enum HarnessError {
    /// Invalid or inconsistent configuration values.
    #[error("configuration error: {0}")]
    Config(String),

    #[error("failed to read config file `{}`: {source}", path.display())]
    ConfigRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse config: {0}")]
    ConfigParse(#[from] toml::de::Error),

    /// The request could not be built, sent, or its body read.
    #[error("request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("invalid header `{name}`: {reason}")]
    Header { name: String, reason: String },

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, HarnessError>;
