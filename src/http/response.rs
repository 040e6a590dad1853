use serde_json::Value;

/// Status and parsed body of one round trip. Read-only.
///
/// A body that is not valid JSON parses to `Value::Null`, so every field
/// lookup reports the field as absent instead of failing.
#[derive(Debug, Clone)]
pub struct ApiResponse {
    pub status: u16,
    pub status_text: String,
    pub body: Value,
    pub raw: String,
    pub duration_ms: u64,
}

impl ApiResponse {
    pub fn new(status: u16, status_text: impl Into<String>, raw: String, duration_ms: u64) -> Self {
        let body = serde_json::from_str(&raw).unwrap_or(Value::Null);
        Self {
            status,
            status_text: status_text.into(),
            body,
            raw,
            duration_ms,
        }
    }

    /// Top-level body field, `None` when absent.
    pub fn field(&self, name: &str) -> Option<&Value> {
        self.body.get(name)
    }

    /// The `success` field as a boolean. Absent or non-boolean gives `None`.
    pub fn success_flag(&self) -> Option<bool> {
        self.field("success").and_then(Value::as_bool)
    }

    /// A top-level field rendered as text; absent or `null` gives `""`.
    pub fn text_field(&self, name: &str) -> String {
        match self.field(name) {
            None | Some(Value::Null) => String::new(),
            Some(Value::String(s)) => s.clone(),
            Some(other) => other.to_string(),
        }
    }

    /// A field of the `data` object, `None` when `data` or the field is absent.
    pub fn data_field(&self, name: &str) -> Option<&Value> {
        self.field("data").and_then(|data| data.get(name))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn response(raw: &str) -> ApiResponse {
        ApiResponse::new(200, "OK", raw.to_owned(), 3)
    }

    #[test]
    fn reads_success_and_message() {
        let res = response(r#"{"success":false,"message":"手机号不能为空"}"#);
        assert_eq!(res.success_flag(), Some(false));
        assert_eq!(res.text_field("message"), "手机号不能为空");
    }

    #[test]
    fn missing_fields_are_absent_or_empty() {
        let res = response(r#"{"data":null}"#);
        assert_eq!(res.success_flag(), None);
        assert_eq!(res.text_field("message"), "");
        assert_eq!(res.text_field("data"), "");
        assert!(res.data_field("id").is_none());
    }

    #[test]
    fn non_boolean_success_is_not_a_flag() {
        let res = response(r#"{"success":"true"}"#);
        assert_eq!(res.success_flag(), None);
        assert_eq!(res.field("success"), Some(&json!("true")));
    }

    #[test]
    fn non_string_text_field_is_rendered() {
        let res = response(r#"{"errorCode":20004}"#);
        assert_eq!(res.text_field("errorCode"), "20004");
    }

    #[test]
    fn non_json_body_parses_to_null() {
        let res = response("<html>bad gateway</html>");
        assert_eq!(res.body, Value::Null);
        assert_eq!(res.success_flag(), None);
        assert_eq!(res.raw, "<html>bad gateway</html>");
    }

    #[test]
    fn data_field_keeps_number_type() {
        let res = response(r#"{"success":true,"data":{"id":1964771849623568408}}"#);
        assert_eq!(res.data_field("id"), Some(&json!(1964771849623568408_i64)));
        assert_ne!(res.data_field("id"), Some(&json!("1964771849623568408")));
    }
}
