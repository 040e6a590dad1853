//! # Harness Configuration
//!
//! Everything the suites need to reach the service: base URL, endpoint paths
//! and the credentials used by the login fixture.
//!
//! Loading order:
//! 1. Defaults, or a TOML file when one is given
//! 2. `PROBEMAN_*` environment variable overrides
//! 3. `{{variable}}` interpolation for the selected environment
//! 4. Validation

use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::environment::{self, VariableTable};
use crate::error::{HarnessError, Result};
use crate::scenario::Endpoint;

pub const DEFAULT_BASE_URL: &str = "http://localhost:8080";
pub const DEFAULT_SEND_CODE_PATH: &str = "/verification/code/send";
pub const DEFAULT_LOGIN_PATH: &str = "/auth/login";
pub const DEFAULT_NOTE_DETAIL_PATH: &str = "/note/detail";

/// Settings for one harness run. Read-only once loaded.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct HarnessConfig {
    pub base_url: String,
    pub paths: EndpointPaths,
    pub credentials: Credentials,
    /// Per-request timeout. `None` keeps the client default.
    pub timeout_ms: Option<u64>,
    /// Global `{{variable}}` values.
    pub variables: VariableTable,
    /// Named variable tables, selected with `--env`.
    pub environments: BTreeMap<String, VariableTable>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EndpointPaths {
    pub send_code: String,
    pub login: String,
    pub note_detail: String,
}

/// Account used by the login fixture.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Credentials {
    pub phone: String,
    pub password: String,
    /// Account type discriminator sent as `type`.
    pub login_type: i64,
}

impl std::fmt::Debug for Credentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Credentials")
            .field("phone", &self.phone)
            .field("password", &"<redacted>")
            .field("login_type", &self.login_type)
            .finish()
    }
}

impl Default for HarnessConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_owned(),
            paths: EndpointPaths::default(),
            credentials: Credentials::default(),
            timeout_ms: None,
            variables: VariableTable::new(),
            environments: BTreeMap::new(),
        }
    }
}

impl Default for EndpointPaths {
    fn default() -> Self {
        Self {
            send_code: DEFAULT_SEND_CODE_PATH.to_owned(),
            login: DEFAULT_LOGIN_PATH.to_owned(),
            note_detail: DEFAULT_NOTE_DETAIL_PATH.to_owned(),
        }
    }
}

impl Default for Credentials {
    fn default() -> Self {
        Self {
            phone: "13350180915".to_owned(),
            password: "123456".to_owned(),
            login_type: 2,
        }
    }
}

impl HarnessConfig {
    /// Load, override, resolve and validate in one step.
    pub fn load(path: Option<&Path>, environment: Option<&str>) -> Result<Self> {
        let mut config = match path {
            Some(path) => Self::from_file(path)?,
            None => Self::default(),
        };
        config.apply_env_overrides();
        let config = config.resolve(environment)?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_file(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path).map_err(|source| HarnessError::ConfigRead {
            path: path.to_path_buf(),
            source,
        })?;
        Self::parse(&content)
    }

    pub fn parse(toml_str: &str) -> Result<Self> {
        Ok(toml::from_str(toml_str)?)
    }

    /// Override settings from `PROBEMAN_*` process environment variables.
    pub fn apply_env_overrides(&mut self) {
        self.apply_overrides(|key| std::env::var(key).ok());
    }

    /// Override settings from an arbitrary key lookup.
    ///
    /// Keys: `PROBEMAN_BASE_URL`, `PROBEMAN_SEND_CODE_PATH`,
    /// `PROBEMAN_LOGIN_PATH`, `PROBEMAN_NOTE_DETAIL_PATH`,
    /// `PROBEMAN_LOGIN_PHONE`, `PROBEMAN_LOGIN_PASSWORD`,
    /// `PROBEMAN_LOGIN_TYPE`, `PROBEMAN_TIMEOUT_MS`.
    pub fn apply_overrides(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        override_string(&mut self.base_url, "PROBEMAN_BASE_URL", &lookup);
        override_string(&mut self.paths.send_code, "PROBEMAN_SEND_CODE_PATH", &lookup);
        override_string(&mut self.paths.login, "PROBEMAN_LOGIN_PATH", &lookup);
        override_string(
            &mut self.paths.note_detail,
            "PROBEMAN_NOTE_DETAIL_PATH",
            &lookup,
        );
        override_string(&mut self.credentials.phone, "PROBEMAN_LOGIN_PHONE", &lookup);
        override_string(
            &mut self.credentials.password,
            "PROBEMAN_LOGIN_PASSWORD",
            &lookup,
        );

        if let Some(val) = lookup("PROBEMAN_LOGIN_TYPE") {
            match val.parse::<i64>() {
                Ok(parsed) => self.credentials.login_type = parsed,
                Err(_) => warn!(
                    env_key = "PROBEMAN_LOGIN_TYPE",
                    value = val.as_str(),
                    "failed to parse integer from env var, ignoring"
                ),
            }
        }

        if let Some(val) = lookup("PROBEMAN_TIMEOUT_MS") {
            match val.parse::<u64>() {
                Ok(parsed) => self.timeout_ms = Some(parsed),
                Err(_) => warn!(
                    env_key = "PROBEMAN_TIMEOUT_MS",
                    value = val.as_str(),
                    "failed to parse integer from env var, ignoring"
                ),
            }
        }
    }

    /// Substitute `{{variable}}` placeholders using the global variables and,
    /// when given, the named environment.
    pub fn resolve(mut self, environment: Option<&str>) -> Result<Self> {
        let env_table = match environment {
            Some(name) => Some(self.environments.get(name).ok_or_else(|| {
                HarnessError::Config(format!("unknown environment `{name}`"))
            })?),
            None => None,
        };
        let variables = environment::build_variable_map(&self.variables, env_table);
        debug!(
            environment = environment.unwrap_or("<none>"),
            variables = variables.len(),
            "resolving config placeholders"
        );

        for field in [
            &mut self.base_url,
            &mut self.paths.send_code,
            &mut self.paths.login,
            &mut self.paths.note_detail,
            &mut self.credentials.phone,
            &mut self.credentials.password,
        ] {
            *field = environment::interpolate(field, &variables);
        }

        Ok(self)
    }

    pub fn validate(&self) -> Result<()> {
        if !(self.base_url.starts_with("http://") || self.base_url.starts_with("https://")) {
            return Err(HarnessError::Config(format!(
                "base_url must start with http:// or https://, got `{}`",
                self.base_url
            )));
        }

        for endpoint in Endpoint::ALL {
            let path = self.path(endpoint);
            if !path.starts_with('/') {
                return Err(HarnessError::Config(format!(
                    "{endpoint} path must start with `/`, got `{path}`"
                )));
            }
        }

        for (name, value) in [
            ("base_url", self.base_url.as_str()),
            ("paths.send_code", self.paths.send_code.as_str()),
            ("paths.login", self.paths.login.as_str()),
            ("paths.note_detail", self.paths.note_detail.as_str()),
            ("credentials.phone", self.credentials.phone.as_str()),
            ("credentials.password", self.credentials.password.as_str()),
        ] {
            if let Some(var) = environment::unresolved_placeholder(value) {
                return Err(HarnessError::Config(format!(
                    "{name} references undefined variable `{var}`"
                )));
            }
        }

        if self.credentials.phone.is_empty() {
            return Err(HarnessError::Config(
                "credentials.phone must not be empty".to_owned(),
            ));
        }

        if self.timeout_ms == Some(0) {
            return Err(HarnessError::Config(
                "timeout_ms must be greater than 0".to_owned(),
            ));
        }

        Ok(())
    }

    pub fn path(&self, endpoint: Endpoint) -> &str {
        match endpoint {
            Endpoint::SendCode => &self.paths.send_code,
            Endpoint::Login => &self.paths.login,
            Endpoint::NoteDetail => &self.paths.note_detail,
        }
    }

    /// Full URL of an endpoint: base URL followed by its path.
    pub fn endpoint_url(&self, endpoint: Endpoint) -> String {
        format!("{}{}", self.base_url.trim_end_matches('/'), self.path(endpoint))
    }
}

fn override_string(target: &mut String, env_key: &str, lookup: &impl Fn(&str) -> Option<String>) {
    if let Some(val) = lookup(env_key) {
        *target = val;
    }
}
