//! Builds typed results out of loosely-structured model replies.
//!
//! Optional fields never fail a response: a missing or wrong-typed value
//! becomes an empty string or list. Only replies that cannot satisfy an
//! endpoint's minimum contract are rejected.

use serde::Serialize;
use serde_json::Value;

use crate::error::{AppError, Result};
use crate::llm::reply::ReplyObject;

pub const PURPOSE_PLACEHOLDER: &str = "Document purpose not provided.";
pub const SUMMARY_FALLBACK_CHARS: usize = 500;
pub const MAX_REQUIREMENTS: usize = 5;
pub const MAX_KEY_TERMS: usize = 3;
pub const MAX_NEXT_STEPS: usize = 7;

/// Accepted spellings per logical field, in lookup order.
pub mod fields {
    pub const PURPOSE: &[&str] = &["purpose"];
    pub const SUMMARY: &[&str] = &["summary"];
    pub const TRANSCRIBED_TEXT: &[&str] = &["transcribedText", "transcribed_text"];
    pub const REQUIREMENTS: &[&str] = &["requirements"];
    pub const EXPLANATION: &[&str] = &["explanation"];
    pub const KEY_TERMS: &[&str] = &["keyTerms", "key_terms"];
    pub const TRANSLATED_TEXT: &[&str] = &["translatedText", "translated_text"];
    pub const STEPS: &[&str] = &["steps"];
    pub const DRAFT: &[&str] = &["draft"];
    pub const ANSWER: &[&str] = &["answer"];
    pub const DEADLINES: &[&str] = &["deadlines"];
    pub const NOTICES: &[&str] = &["notices"];
    pub const RULES: &[&str] = &["rules"];
    pub const OTHER: &[&str] = &["other"];
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DocumentAnalysis {
    pub purpose: String,
    pub summary: String,
    pub transcribed_text: String,
    pub requirements: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SimplifyResult {
    pub explanation: String,
    pub key_terms: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ImportantInfo {
    pub deadlines: Vec<String>,
    pub notices: Vec<String>,
    pub rules: Vec<String>,
    pub other: Vec<String>,
}

impl DocumentAnalysis {
    /// `source_text` is the extracted or raw document text, when the request
    /// had one; image submissions pass `None`.
    pub fn from_reply(reply: &ReplyObject, source_text: Option<&str>) -> Self {
        let mut transcribed_text = string_field(reply, fields::TRANSCRIBED_TEXT);
        let mut summary = string_field(reply, fields::SUMMARY);
        let mut purpose = string_field(reply, fields::PURPOSE);

        if transcribed_text.is_empty() {
            if let Some(source) = source_text {
                transcribed_text = source.to_string();
            }
        }
        if summary.is_empty() && !transcribed_text.is_empty() {
            summary = transcribed_text
                .chars()
                .take(SUMMARY_FALLBACK_CHARS)
                .collect::<String>()
                .trim()
                .to_string();
        }
        if purpose.is_empty() {
            purpose = if summary.is_empty() {
                PURPOSE_PLACEHOLDER.to_string()
            } else {
                summary.clone()
            };
        }

        let mut requirements = string_list(reply, fields::REQUIREMENTS);
        requirements.truncate(MAX_REQUIREMENTS);

        Self {
            purpose,
            summary,
            transcribed_text,
            requirements,
        }
    }
}

impl SimplifyResult {
    pub fn from_reply(reply: &ReplyObject) -> Self {
        let mut key_terms = string_list(reply, fields::KEY_TERMS);
        key_terms.truncate(MAX_KEY_TERMS);

        Self {
            explanation: string_field(reply, fields::EXPLANATION),
            key_terms,
        }
    }
}

impl ImportantInfo {
    pub fn from_reply(reply: &ReplyObject) -> Self {
        Self {
            deadlines: string_list(reply, fields::DEADLINES),
            notices: string_list(reply, fields::NOTICES),
            rules: string_list(reply, fields::RULES),
            other: string_list(reply, fields::OTHER),
        }
    }
}

/// Next steps must carry at least one entry; extras past the cap are dropped.
pub fn next_steps(reply: &ReplyObject) -> Result<Vec<String>> {
    let mut steps = string_list(reply, fields::STEPS);
    if steps.is_empty() {
        return Err(AppError::EmptyUpstreamReply("Next steps not returned".to_string()));
    }
    steps.truncate(MAX_NEXT_STEPS);
    Ok(steps)
}

/// A single trimmed string the endpoint cannot do without.
pub fn required_text(reply: &ReplyObject, aliases: &[&str], missing: &str) -> Result<String> {
    let text = string_field(reply, aliases).trim().to_string();
    if text.is_empty() {
        return Err(AppError::EmptyUpstreamReply(missing.to_string()));
    }
    Ok(text)
}

fn lookup<'a>(reply: &'a ReplyObject, aliases: &[&str]) -> Option<&'a Value> {
    aliases
        .iter()
        .filter_map(|key| reply.get(*key))
        .find(|value| !value.is_null())
}

fn string_field(reply: &ReplyObject, aliases: &[&str]) -> String {
    match lookup(reply, aliases) {
        Some(Value::String(s)) => s.clone(),
        _ => String::new(),
    }
}

/// Non-array values become an empty list; entries are stringified, trimmed,
/// and dropped when blank.
fn string_list(reply: &ReplyObject, aliases: &[&str]) -> Vec<String> {
    let Some(Value::Array(items)) = lookup(reply, aliases) else {
        return Vec::new();
    };

    items
        .iter()
        .filter_map(item_text)
        .map(|item| item.trim().to_string())
        .filter(|item| !item.is_empty())
        .collect()
}

fn item_text(item: &Value) -> Option<String> {
    match item {
        Value::Null => None,
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        Value::Object(map) => match (map.get("term"), map.get("definition")) {
            (Some(Value::String(term)), Some(Value::String(definition))) => {
                Some(format!("{}: {}", term.trim(), definition.trim()))
            }
            _ => Some(item.to_string()),
        },
        Value::Array(_) => Some(item.to_string()),
    }
}
