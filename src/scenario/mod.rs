//! # Scenarios
//!
//! A scenario is one literal row: what to send, whether the service should
//! report success, which fragment its message must contain, and a label for
//! reports. The rows themselves live in [`tables`].

pub mod tables;

use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::{Value, json};

use crate::auth::{self, TokenSelector};

/// The endpoints under test.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Endpoint {
    SendCode,
    Login,
    NoteDetail,
}

impl Endpoint {
    pub const ALL: [Endpoint; 3] = [Endpoint::SendCode, Endpoint::Login, Endpoint::NoteDetail];

    /// Body field carrying the failure reason.
    pub fn message_field(self) -> &'static str {
        match self {
            Endpoint::Login => "errorCode",
            Endpoint::SendCode | Endpoint::NoteDetail => "message",
        }
    }

    /// Every scenario of this endpoint runs after the login fixture.
    pub fn requires_token(self) -> bool {
        matches!(self, Endpoint::NoteDetail)
    }
}

impl fmt::Display for Endpoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Endpoint::SendCode => "send-code",
            Endpoint::Login => "login",
            Endpoint::NoteDetail => "note-detail",
        };
        write!(f, "{label}")
    }
}

/// Note identifier as sent on the wire. `Text` covers wrong-type requests.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoteId {
    Int(i64),
    Text(&'static str),
}

impl NoteId {
    pub fn to_json(self) -> Value {
        match self {
            NoteId::Int(id) => json!(id),
            NoteId::Text(id) => json!(id),
        }
    }
}

/// What a scenario sends, per endpoint.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScenarioInput {
    SendCode {
        phone: &'static str,
    },
    Login {
        phone: &'static str,
        password: &'static str,
        login_type: i64,
    },
    NoteDetail {
        token: TokenSelector,
        id: NoteId,
    },
}

impl ScenarioInput {
    pub fn endpoint(&self) -> Endpoint {
        match self {
            ScenarioInput::SendCode { .. } => Endpoint::SendCode,
            ScenarioInput::Login { .. } => Endpoint::Login,
            ScenarioInput::NoteDetail { .. } => Endpoint::NoteDetail,
        }
    }

    pub fn body(&self) -> Value {
        match *self {
            ScenarioInput::SendCode { phone } => json!({ "phone": phone }),
            ScenarioInput::Login {
                phone,
                password,
                login_type,
            } => auth::login_payload(phone, password, login_type),
            ScenarioInput::NoteDetail { id, .. } => json!({ "id": id.to_json() }),
        }
    }

    pub fn token_selector(&self) -> Option<TokenSelector> {
        match *self {
            ScenarioInput::NoteDetail { token, .. } => Some(token),
            _ => None,
        }
    }

    /// Value the returned entity's `data.id` must equal on success.
    pub fn identity(&self) -> Option<Value> {
        match *self {
            ScenarioInput::NoteDetail { id, .. } => Some(id.to_json()),
            _ => None,
        }
    }

    /// Short rendering of the input for reports and logs.
    pub fn describe(&self) -> String {
        match *self {
            ScenarioInput::SendCode { phone } => format!("phone={phone:?}"),
            ScenarioInput::Login {
                phone,
                login_type,
                ..
            } => format!("phone={phone:?} type={login_type}"),
            ScenarioInput::NoteDetail { token, id } => {
                format!("token={token} id={}", id.to_json())
            }
        }
    }
}

/// One row of a scenario table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Scenario {
    pub input: ScenarioInput,
    pub expect_success: bool,
    /// Fragment the message field must contain; `None` asserts nothing.
    pub expect_fragment: Option<&'static str>,
    pub label: &'static str,
}

impl Scenario {
    pub fn endpoint(&self) -> Endpoint {
        self.input.endpoint()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn note_detail_body_keeps_id_type() {
        let int = ScenarioInput::NoteDetail {
            token: TokenSelector::Valid,
            id: NoteId::Int(1964771849623568408),
        };
        let text = ScenarioInput::NoteDetail {
            token: TokenSelector::Valid,
            id: NoteId::Text("abc123"),
        };

        assert_eq!(int.body(), json!({ "id": 1964771849623568408_i64 }));
        assert_eq!(text.body(), json!({ "id": "abc123" }));
        assert_ne!(int.identity(), Some(json!("1964771849623568408")));
    }

    #[test]
    fn only_note_detail_needs_a_token() {
        assert!(Endpoint::NoteDetail.requires_token());
        assert!(!Endpoint::SendCode.requires_token());
        assert!(!Endpoint::Login.requires_token());
    }

    #[test]
    fn login_reports_error_code_field() {
        assert_eq!(Endpoint::Login.message_field(), "errorCode");
        assert_eq!(Endpoint::SendCode.message_field(), "message");
        assert_eq!(Endpoint::NoteDetail.message_field(), "message");
    }

    #[test]
    fn identity_only_for_note_detail() {
        let input = ScenarioInput::SendCode { phone: "13350180921" };
        assert!(input.identity().is_none());
        assert!(input.token_selector().is_none());
        assert_eq!(input.body(), json!({ "phone": "13350180921" }));
    }

    #[test]
    fn describe_never_includes_password() {
        let input = ScenarioInput::Login {
            phone: "13350180915",
            password: "123456",
            login_type: 2,
        };
        let text = input.describe();
        assert!(text.contains("13350180915"));
        assert_eq!(text, "phone=\"13350180915\" type=2");
    }
}
