use serde_json::json;

use crate::ipc::error::{err, ok};

pub struct HandlerErr {
    pub code: &'static str,
    pub message: String,
    pub details: Option<serde_json::Value>,
}

impl HandlerErr {
    pub fn bad_params(message: impl Into<String>) -> Self {
        Self {
            code: "bad_params",
            message: message.into(),
            details: None,
        }
    }

    pub fn response(self, id: &str) -> serde_json::Value {
        err(id, self.code, self.message, self.details)
    }
}

pub fn get_required_str<'a>(
    params: &'a serde_json::Value,
    key: &str,
) -> Result<&'a str, HandlerErr> {
    params
        .get(key)
        .and_then(|v| v.as_str())
        .ok_or_else(|| HandlerErr::bad_params(format!("missing {}", key)))
}

pub fn get_required_array<'a>(
    params: &'a serde_json::Value,
    key: &str,
) -> Result<&'a Vec<serde_json::Value>, HandlerErr> {
    params
        .get(key)
        .and_then(|v| v.as_array())
        .ok_or_else(|| HandlerErr::bad_params(format!("missing {}[]", key)))
}

/// `resultValue` as text: strings pass through, numbers are rendered, absent
/// or null is `None`.
pub fn result_value_text(value: Option<&serde_json::Value>) -> Result<Option<String>, HandlerErr> {
    match value {
        None | Some(serde_json::Value::Null) => Ok(None),
        Some(serde_json::Value::String(s)) => Ok(Some(s.clone())),
        Some(serde_json::Value::Number(n)) => Ok(Some(n.to_string())),
        Some(other) => Err(HandlerErr {
            code: "bad_params",
            message: "resultValue must be a string, number or null".to_string(),
            details: Some(json!({ "resultValue": other })),
        }),
    }
}

/// Deterministic rejection for bulk payloads above the configured limit.
/// Returns the full response to send when the limit is exceeded.
pub fn reject_over_limit(id: &str, len: usize, max: usize) -> Option<serde_json::Value> {
    if len <= max {
        return None;
    }
    tracing::warn!(len, max, "bulk payload over limit");
    Some(ok(
        id,
        json!({
            "limitExceeded": true,
            "rejected": len,
            "errors": [{
                "index": -1,
                "code": "too_many_items",
                "message": format!("bulk payload exceeds max items: {} > {}", len, max)
            }]
        }),
    ))
}

/// Adds `rejected` and `errors` to a bulk result when any item failed.
pub fn attach_item_errors(result: &mut serde_json::Value, errors: Vec<serde_json::Value>) {
    if errors.is_empty() {
        return;
    }
    if let Some(obj) = result.as_object_mut() {
        obj.insert("rejected".into(), json!(errors.len()));
        obj.insert("errors".into(), json!(errors));
    }
}

pub fn item_error(index: usize, e: HandlerErr) -> serde_json::Value {
    let mut v = json!({
        "index": index,
        "code": e.code,
        "message": e.message,
    });
    if let Some(d) = e.details {
        v["details"] = d;
    }
    v
}
