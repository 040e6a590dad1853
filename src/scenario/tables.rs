//! Literal scenario tables, one per endpoint. Adding a case means adding a row.

use super::{Endpoint, NoteId, Scenario, ScenarioInput};
use crate::auth::TokenSelector;

pub const NOTE_ID: i64 = 1964771849623568408;

pub const SEND_CODE_SCENARIOS: &[Scenario] = &[
    Scenario {
        input: ScenarioInput::SendCode { phone: "13350180921" },
        expect_success: true,
        expect_fragment: None,
        label: "valid 11-digit phone",
    },
    Scenario {
        input: ScenarioInput::SendCode { phone: "" },
        expect_success: false,
        expect_fragment: Some("不能为空"),
        label: "empty phone",
    },
    Scenario {
        input: ScenarioInput::SendCode { phone: "133501809" },
        expect_success: false,
        expect_fragment: Some("格式不正确"),
        label: "phone too short",
    },
    Scenario {
        input: ScenarioInput::SendCode {
            phone: "1335018092123",
        },
        expect_success: false,
        expect_fragment: Some("格式不正确"),
        label: "phone too long",
    },
    Scenario {
        input: ScenarioInput::SendCode { phone: "133abc80921" },
        expect_success: false,
        expect_fragment: Some("格式不正确"),
        label: "phone with letters",
    },
    Scenario {
        input: ScenarioInput::SendCode { phone: "133*5018092" },
        expect_success: false,
        expect_fragment: Some("格式不正确"),
        label: "phone with special characters",
    },
];

pub const LOGIN_SCENARIOS: &[Scenario] = &[
    Scenario {
        input: ScenarioInput::Login {
            phone: "13350180915",
            password: "123456",
            login_type: 2,
        },
        expect_success: true,
        expect_fragment: None,
        label: "correct phone and password",
    },
    Scenario {
        input: ScenarioInput::Login {
            phone: "13350180915",
            password: "1234567",
            login_type: 2,
        },
        expect_success: false,
        expect_fragment: Some("AUTH-20004"),
        label: "wrong password",
    },
    Scenario {
        input: ScenarioInput::Login {
            phone: "13350180999",
            password: "123456",
            login_type: 2,
        },
        expect_success: false,
        expect_fragment: Some("AUTH-20003"),
        label: "unregistered phone",
    },
    Scenario {
        input: ScenarioInput::Login {
            phone: "13350180915",
            password: "",
            login_type: 2,
        },
        expect_success: false,
        expect_fragment: Some("AUTH-20004"),
        label: "empty password",
    },
    Scenario {
        input: ScenarioInput::Login {
            phone: "",
            password: "123456",
            login_type: 2,
        },
        expect_success: false,
        expect_fragment: Some("AUTH-10001"),
        label: "empty phone",
    },
    Scenario {
        input: ScenarioInput::Login {
            phone: "13350180915",
            password: "123456",
            login_type: 99,
        },
        expect_success: false,
        expect_fragment: Some("AUTH-10000"),
        label: "unknown login type",
    },
];

pub const NOTE_DETAIL_SCENARIOS: &[Scenario] = &[
    Scenario {
        input: ScenarioInput::NoteDetail {
            token: TokenSelector::Valid,
            id: NoteId::Int(NOTE_ID),
        },
        expect_success: true,
        expect_fragment: Some("成功"),
        label: "valid token and existing note",
    },
    Scenario {
        input: ScenarioInput::NoteDetail {
            token: TokenSelector::Forged,
            id: NoteId::Int(NOTE_ID),
        },
        expect_success: false,
        expect_fragment: Some("Token无效"),
        label: "forged token",
    },
    Scenario {
        input: ScenarioInput::NoteDetail {
            token: TokenSelector::Blank,
            id: NoteId::Int(NOTE_ID),
        },
        expect_success: false,
        expect_fragment: Some("Token为空"),
        label: "blank token",
    },
    Scenario {
        input: ScenarioInput::NoteDetail {
            token: TokenSelector::Valid,
            id: NoteId::Int(123456789),
        },
        expect_success: false,
        expect_fragment: Some("笔记不存在"),
        label: "valid token and unknown note",
    },
    Scenario {
        input: ScenarioInput::NoteDetail {
            token: TokenSelector::Valid,
            id: NoteId::Text("abc123"),
        },
        expect_success: false,
        expect_fragment: Some("ID格式错误"),
        label: "valid token and string note id",
    },
];

pub fn scenarios(endpoint: Endpoint) -> &'static [Scenario] {
    match endpoint {
        Endpoint::SendCode => SEND_CODE_SCENARIOS,
        Endpoint::Login => LOGIN_SCENARIOS,
        Endpoint::NoteDetail => NOTE_DETAIL_SCENARIOS,
    }
}

/// Rows of the given endpoints, in table order.
pub fn select(endpoints: &[Endpoint]) -> Vec<Scenario> {
    endpoints
        .iter()
        .flat_map(|endpoint| scenarios(*endpoint).iter().copied())
        .collect()
}
