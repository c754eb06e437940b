//! Request-body validation helpers.

use serde_json::{json, Value};

#[derive(Debug, Clone)]
pub struct ValidationIssue {
    pub field: String,
    pub code: String,
    pub message: String,
}

impl ValidationIssue {
    pub fn new(
        field: impl Into<String>,
        code: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        Self {
            field: field.into(),
            code: code.into(),
            message: message.into(),
        }
    }
}

/// Record an issue when `value` is missing or blank.
pub fn require_non_empty(issues: &mut Vec<ValidationIssue>, field: &str, value: Option<&str>) {
    match value {
        Some(v) if !v.trim().is_empty() => {}
        _ => issues.push(ValidationIssue::new(field, "required", "must not be empty")),
    }
}

/// Serialize issues into the structured payload carried by a 400 response.
pub fn to_payload(issues: &[ValidationIssue]) -> Value {
    json!(issues
        .iter()
        .map(|i| json!({ "field": i.field, "code": i.code, "message": i.message }))
        .collect::<Vec<_>>())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn blank_values_are_flagged() {
        let mut issues = Vec::new();
        require_non_empty(&mut issues, "session_id", Some("abc"));
        require_non_empty(&mut issues, "caption", Some("  "));
        require_non_empty(&mut issues, "video_path", None);
        assert_eq!(issues.len(), 2);

        let payload = to_payload(&issues);
        assert_eq!(payload[0]["field"], "caption");
        assert_eq!(payload[1]["field"], "video_path");
    }
}
