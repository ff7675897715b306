use serde_json::{Map, Value};

use crate::error::{AppError, Result};

pub type ReplyObject = Map<String, Value>;

/// Recovers a JSON object from a model reply.
///
/// Tries the whole text first, then the greedy span from the first `{` to
/// the last `}`. Replies wrapped in prose or code fences are the target;
/// anything more broken fails with `MalformedReply`.
pub fn extract_json_object(text: &str) -> Result<ReplyObject> {
    let strict_err = match serde_json::from_str::<Value>(text) {
        Ok(Value::Object(map)) => return Ok(map),
        Ok(other) => format!("expected a JSON object, got {}", kind(&other)),
        Err(e) => e.to_string(),
    };

    let span = match (text.find('{'), text.rfind('}')) {
        (Some(start), Some(end)) if start < end => &text[start..=end],
        _ => return Err(AppError::MalformedReply(strict_err)),
    };

    match serde_json::from_str::<Value>(span) {
        Ok(Value::Object(map)) => Ok(map),
        Ok(other) => Err(AppError::MalformedReply(format!(
            "expected a JSON object, got {}",
            kind(&other)
        ))),
        Err(e) => Err(AppError::MalformedReply(e.to_string())),
    }
}

fn kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
