//! In-process stand-in for the notes service, built on wiremock.
//!
//! Mirrors the service's observable contract: every response is HTTP 200 and
//! application errors are reported in the body.

#![allow(dead_code)]

use probeman::config::{DEFAULT_LOGIN_PATH, DEFAULT_NOTE_DETAIL_PATH, DEFAULT_SEND_CODE_PATH};
use probeman::HarnessConfig;
use serde_json::{Value, json};
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, Request, Respond, ResponseTemplate};

pub const ISSUED_TOKEN: &str = "eyJhbGciOiJIUzI1NiJ9.fake-session-token.signature";
pub const REGISTERED_PHONE: &str = "13350180915";
pub const PASSWORD: &str = "123456";
pub const NOTE_ID: i64 = 1964771849623568408;

pub fn config_for(server: &MockServer) -> HarnessConfig {
    HarnessConfig {
        base_url: server.uri(),
        ..Default::default()
    }
}

fn body_of(request: &Request) -> Value {
    serde_json::from_slice(&request.body).unwrap_or(Value::Null)
}

fn ok(body: Value) -> ResponseTemplate {
    ResponseTemplate::new(200).set_body_json(body)
}

pub struct SendCodeService;

impl Respond for SendCodeService {
    fn respond(&self, request: &Request) -> ResponseTemplate {
        let body = body_of(request);
        let phone = body["phone"].as_str().unwrap_or_default();

        if phone.is_empty() {
            ok(json!({ "success": false, "message": "手机号不能为空" }))
        } else if phone.len() != 11 || !phone.chars().all(|c| c.is_ascii_digit()) {
            ok(json!({ "success": false, "message": "手机号格式不正确" }))
        } else {
            ok(json!({ "success": true, "message": "发送成功" }))
        }
    }
}

pub struct LoginService;

impl Respond for LoginService {
    fn respond(&self, request: &Request) -> ResponseTemplate {
        let body = body_of(request);
        let phone = body["phone"].as_str().unwrap_or_default();
        let password = body["password"].as_str().unwrap_or_default();

        let error_code = match body["type"].as_i64() {
            Some(1 | 2) if phone.is_empty() => Some("AUTH-10001"),
            Some(1 | 2) if phone != REGISTERED_PHONE => Some("AUTH-20003"),
            Some(1 | 2) if password != PASSWORD => Some("AUTH-20004"),
            Some(1 | 2) => None,
            _ => Some("AUTH-10000"),
        };

        match error_code {
            Some(code) => ok(json!({ "success": false, "errorCode": code })),
            None => ok(json!({ "success": true, "data": ISSUED_TOKEN })),
        }
    }
}

pub struct NoteDetailService;

impl Respond for NoteDetailService {
    fn respond(&self, request: &Request) -> ResponseTemplate {
        let token = request
            .headers
            .get("authorization")
            .and_then(|value| value.to_str().ok())
            .and_then(|value| value.strip_prefix("Bearer"))
            .unwrap_or_default()
            .trim()
            .to_owned();

        if token.is_empty() {
            return ok(json!({ "success": false, "message": "Token为空" }));
        }
        if token != ISSUED_TOKEN {
            return ok(json!({ "success": false, "message": "Token无效" }));
        }

        match body_of(request)["id"].as_i64() {
            None => ok(json!({ "success": false, "message": "笔记ID格式错误" })),
            Some(id) if id != NOTE_ID => {
                ok(json!({ "success": false, "message": "笔记不存在" }))
            }
            Some(id) => ok(json!({
                "success": true,
                "message": "查询成功",
                "data": { "id": id, "title": "周末徒步路线", "visible": 0 }
            })),
        }
    }
}

/// Start a server emulating all three endpoints.
pub async fn start_notes_service() -> MockServer {
    let server = MockServer::start().await;
    mount_send_code(&server).await;
    mount_login(&server, None).await;
    mount_note_detail(&server, None).await;
    server
}

pub async fn mount_send_code(server: &MockServer) {
    Mock::given(method("POST"))
        .and(path(DEFAULT_SEND_CODE_PATH))
        .respond_with(SendCodeService)
        .mount(server)
        .await;
}

/// Mount the login endpoint, optionally asserting how often it is called.
pub async fn mount_login(server: &MockServer, expected_calls: Option<u64>) {
    let mock = Mock::given(method("POST"))
        .and(path(DEFAULT_LOGIN_PATH))
        .respond_with(LoginService);
    match expected_calls {
        Some(n) => mock.expect(n).mount(server).await,
        None => mock.mount(server).await,
    }
}

pub async fn mount_note_detail(server: &MockServer, expected_calls: Option<u64>) {
    let mock = Mock::given(method("POST"))
        .and(path(DEFAULT_NOTE_DETAIL_PATH))
        .respond_with(NoteDetailService);
    match expected_calls {
        Some(n) => mock.expect(n).mount(server).await,
        None => mock.mount(server).await,
    }
}

/// Mount a fixed response on `route`.
pub async fn mount_fixed(server: &MockServer, route: &str, status: u16, body: Value) {
    Mock::given(method("POST"))
        .and(path(route))
        .respond_with(ResponseTemplate::new(status).set_body_json(body))
        .mount(server)
        .await;
}

/// Config pointing at a local port with nothing listening.
pub fn unreachable_config() -> HarnessConfig {
    let listener = std::net::TcpListener::bind("127.0.0.1:0").expect("bind ephemeral port");
    let addr = listener.local_addr().expect("local addr");
    drop(listener);
    HarnessConfig {
        base_url: format!("http://{addr}"),
        ..Default::default()
    }
}
