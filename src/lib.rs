//! Contract-test harness for the notes service HTTP API.
//!
//! Each scenario row runs in its own [`http::Session`]; rows against
//! endpoints that need a caller first run the login fixture
//! ([`auth::login_token`]). Results come back as labelled steps in a
//! [`testing::RunReport`].

pub mod auth;
pub mod cli;
pub mod config;
pub mod environment;
pub mod error;
pub mod http;
pub mod scenario;
pub mod testing;

pub use config::HarnessConfig;
pub use error::{HarnessError, Result};
pub use scenario::{Endpoint, Scenario};
