use serde::{Deserialize, Serialize};
use std::fmt;

use crate::verdict::Verdict;

/// Placeholder shown when a line-based reply carries no language line.
pub const UNKNOWN_LANGUAGE_LINE: &str = "Language: Unknown";

/// Default language for structured replies without `detected_language`.
pub const UNKNOWN_LANGUAGE: &str = "Unknown";

/// Default reason for structured replies without `reason`.
pub const DEFAULT_REASON: &str = "Please verify manually.";

/// Which reply format the model is asked for, and how it is parsed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ScanMode {
    /// Verdict line, language line, `---`, then Markdown.
    #[default]
    Lines,
    /// A single JSON object, optionally code-fenced.
    Structured,
}

impl fmt::Display for ScanMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ScanMode::Lines => f.write_str("lines"),
            ScanMode::Structured => f.write_str("structured"),
        }
    }
}

/// Structured explanation fields from a JSON reply.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Details {
    pub detected_language: String,
    /// Problematic ingredients in the order the model listed them.
    pub flagged_ingredients: Vec<String>,
    pub reason: String,
}

/// Human-readable explanation attached to a verdict.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum Explanation {
    /// Opaque Markdown body from a line-based reply.
    Markdown { body: String },
    Structured(Details),
}

impl Explanation {
    /// Flagged ingredient names, if the explanation carries any.
    pub fn flagged_ingredients(&self) -> &[String] {
        match self {
            Explanation::Markdown { .. } => &[],
            Explanation::Structured(details) => &details.flagged_ingredients,
        }
    }
}

/// Result of parsing a line-based reply.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LineReply {
    pub verdict: Verdict,
    /// The `Detected Language:` line, trimmed, or [`UNKNOWN_LANGUAGE_LINE`].
    pub detected_language: String,
    /// Everything after the first `---` line; empty when there is none.
    pub explanation: String,
}

/// Result of parsing a structured (JSON) reply.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StructuredReply {
    pub verdict: Verdict,
    pub details: Details,
}

/// A classified scan, kept together with the raw reply it came from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScanReport {
    pub mode: ScanMode,
    pub verdict: Verdict,
    pub detected_language: String,
    pub explanation: Explanation,
    /// Unmodified model reply. Shown as-is for `Verdict::Unknown`.
    pub raw: String,
}
