//! Parsers that turn a model reply into a verdict plus explanation.
//!
//! Two reply formats are supported:
//! 1. Line-based: verdict word, `Detected Language:` line, `---`, Markdown.
//!    Parsing never fails; unrecognized text becomes `Verdict::Unknown`.
//! 2. Structured: a JSON object, optionally wrapped in a code fence.
//!    Missing fields take conservative defaults; undecodable text is a
//!    [`ParseError`].

use serde_json::{Map, Value};

use crate::types::{
    Details, LineReply, StructuredReply, DEFAULT_REASON, UNKNOWN_LANGUAGE, UNKNOWN_LANGUAGE_LINE,
};
use crate::verdict::Verdict;

/// Placeholder the line prompt uses for the verdict word. Models sometimes
/// echo it back.
const VERDICT_LABEL_PREFIX: &str = "VERDICT_RESULT";
const SEPARATOR_MARKER: &str = "---";
const LANGUAGE_MARKER: &str = "Detected Language:";
/// How many leading lines are searched for the language marker.
const LANGUAGE_SCAN_LINES: usize = 5;
const FENCE: &str = "```";

/// Parse a line-based reply.
///
/// - The first line, minus the `VERDICT_RESULT` label, trimmed and
///   upper-cased, is classified with [`Verdict::classify_token`].
/// - Lines after the first line containing `---` form the explanation.
///   Without such a line the explanation is empty.
/// - The language is the last line containing `Detected Language:` among
///   the first five lines.
///
/// A Markdown table separator (`|---|---|`) counts as the `---` marker if
/// it comes first.
pub fn parse_line_reply(reply: &str) -> LineReply {
    let lines: Vec<&str> = reply.split('\n').collect();

    let token = lines
        .first()
        .map(|first| first.replace(VERDICT_LABEL_PREFIX, "").trim().to_uppercase())
        .unwrap_or_default();

    let explanation = lines
        .iter()
        .position(|line| line.contains(SEPARATOR_MARKER))
        .map(|idx| lines[idx + 1..].join("\n"))
        .unwrap_or_default();

    let detected_language = lines
        .iter()
        .take(LANGUAGE_SCAN_LINES)
        .filter(|line| line.contains(LANGUAGE_MARKER))
        .last()
        .map(|line| line.trim().to_string())
        .unwrap_or_else(|| UNKNOWN_LANGUAGE_LINE.to_string());

    LineReply {
        verdict: Verdict::classify_token(&token),
        detected_language,
        explanation,
    }
}

/// Remove a code fence wrapped around model output.
///
/// Handles `` ```json\n...\n``` ``, `` ```\n...\n``` `` and the single-line
/// `` ```json {...}``` `` form. Text without a fence is returned trimmed.
pub fn strip_code_fence(text: &str) -> &str {
    let mut body = text.trim();

    if let Some(rest) = body.strip_prefix(FENCE) {
        let first_line = rest.split('\n').next().unwrap_or("");
        body = if is_fence_tag(first_line) {
            // Tag line (possibly empty) ends the opening fence.
            rest.get(first_line.len() + 1..).unwrap_or("")
        } else {
            rest.trim_start_matches(|c: char| c.is_ascii_alphabetic())
        };
    }

    let body = body.trim_end();
    body.strip_suffix(FENCE).unwrap_or(body).trim()
}

fn is_fence_tag(line: &str) -> bool {
    line.trim()
        .chars()
        .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_' || c == '+')
}

/// Parse a structured reply into a verdict and details.
///
/// Field defaults: `status` missing or null → `Mushbooh`;
/// `detected_language` → `"Unknown"`; `flagged_ingredients` → empty;
/// `reason` → `"Please verify manually."`. A `status` that is not exactly
/// one of the three labels yields `Verdict::Unknown`.
///
/// # Errors
///
/// Returns an error if the unfenced text is not JSON or is not an object.
pub fn parse_structured_reply(reply: &str) -> Result<StructuredReply, ParseError> {
    let body = strip_code_fence(reply);
    let value: Value = serde_json::from_str(body)?;
    let obj = value
        .as_object()
        .ok_or_else(|| ParseError::NotAnObject(json_kind(&value)))?;

    let verdict = match obj.get("status") {
        None | Some(Value::Null) => Verdict::Mushbooh,
        Some(Value::String(s)) => Verdict::from_label(s).unwrap_or(Verdict::Unknown),
        Some(_) => Verdict::Unknown,
    };

    Ok(StructuredReply {
        verdict,
        details: Details {
            detected_language: string_field(obj, "detected_language")
                .unwrap_or_else(|| UNKNOWN_LANGUAGE.to_string()),
            flagged_ingredients: string_list(obj, "flagged_ingredients"),
            reason: string_field(obj, "reason").unwrap_or_else(|| DEFAULT_REASON.to_string()),
        },
    })
}

fn string_field(obj: &Map<String, Value>, key: &str) -> Option<String> {
    obj.get(key).and_then(|v| v.as_str()).map(|s| s.to_string())
}

fn string_list(obj: &Map<String, Value>, key: &str) -> Vec<String> {
    obj.get(key)
        .and_then(|v| v.as_array())
        .map(|arr| {
            arr.iter()
                .filter_map(|v| v.as_str().map(|s| s.to_string()))
                .collect()
        })
        .unwrap_or_default()
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

/// Errors from decoding a structured reply.
#[derive(Debug, thiserror::Error)]
pub enum ParseError {
    #[error("Model reply is not valid JSON: {0}")]
    InvalidJson(#[from] serde_json::Error),

    #[error("Model reply is a JSON {0}, expected an object")]
    NotAnObject(&'static str),
}
