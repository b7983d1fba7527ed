//! Verdict labels and the normalization rules shared by both parsers.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Final classification of an ingredients label.
///
/// `Unknown` is the fallback when the model reply names none of the three
/// known labels. Every reply maps to exactly one variant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Verdict {
    Halal,
    Haram,
    Mushbooh,
    Unknown,
}

/// Tie-break order for substring classification. First match wins.
const PRIORITY: [Verdict; 3] = [Verdict::Haram, Verdict::Mushbooh, Verdict::Halal];

impl Verdict {
    /// Classify a free-form verdict token by substring containment.
    ///
    /// The token is upper-cased and checked for `HARAM`, then `MUSHBOOH`,
    /// then `HALAL`. A token like `"NOT HALAL, HARAM"` therefore yields
    /// `Haram` purely because of that ordering, not because the wording
    /// was understood.
    pub fn classify_token(token: &str) -> Verdict {
        let token = token.to_uppercase();
        PRIORITY
            .into_iter()
            .find(|v| token.contains(v.label()))
            .unwrap_or(Verdict::Unknown)
    }

    /// Exact match against one of the three known labels.
    ///
    /// Surrounding whitespace and case are ignored; anything else,
    /// including `"UNKNOWN"`, returns `None`.
    pub fn from_label(label: &str) -> Option<Verdict> {
        let label = label.trim().to_uppercase();
        PRIORITY.into_iter().find(|v| v.label() == label)
    }

    /// Upper-case label as the model is asked to emit it.
    pub fn label(&self) -> &'static str {
        match self {
            Verdict::Halal => "HALAL",
            Verdict::Haram => "HARAM",
            Verdict::Mushbooh => "MUSHBOOH",
            Verdict::Unknown => "UNKNOWN",
        }
    }

    /// Whether this is one of the three definite labels.
    pub fn is_known(&self) -> bool {
        !matches!(self, Verdict::Unknown)
    }
}

impl fmt::Display for Verdict {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn classify_plain_labels() {
        assert_eq!(Verdict::classify_token("HALAL"), Verdict::Halal);
        assert_eq!(Verdict::classify_token("haram"), Verdict::Haram);
        assert_eq!(Verdict::classify_token("Mushbooh"), Verdict::Mushbooh);
    }

    #[test]
    fn classify_haram_wins_over_halal() {
        assert_eq!(Verdict::classify_token("NOT HALAL, IT IS HARAM"), Verdict::Haram);
        assert_eq!(Verdict::classify_token("HALAL OR HARAM"), Verdict::Haram);
    }

    #[test]
    fn classify_mushbooh_wins_over_halal() {
        assert_eq!(Verdict::classify_token("HALAL? MUSHBOOH"), Verdict::Mushbooh);
    }

    #[test]
    fn classify_with_decoration() {
        assert_eq!(Verdict::classify_token("**HARAM**"), Verdict::Haram);
        assert_eq!(Verdict::classify_token("VERDICT: HALAL."), Verdict::Halal);
    }

    #[test]
    fn classify_unrecognized() {
        assert_eq!(Verdict::classify_token(""), Verdict::Unknown);
        assert_eq!(Verdict::classify_token("KOSHER"), Verdict::Unknown);
        assert_eq!(Verdict::classify_token("SYUBHAH"), Verdict::Unknown);
    }

    #[test]
    fn from_label_exact() {
        assert_eq!(Verdict::from_label("HALAL"), Some(Verdict::Halal));
        assert_eq!(Verdict::from_label(" haram "), Some(Verdict::Haram));
        assert_eq!(Verdict::from_label("Mushbooh"), Some(Verdict::Mushbooh));
    }

    #[test]
    fn from_label_rejects_partial_and_unknown() {
        assert_eq!(Verdict::from_label("MOSTLY HALAL"), None);
        assert_eq!(Verdict::from_label("UNKNOWN"), None);
        assert_eq!(Verdict::from_label(""), None);
    }

    #[test]
    fn serializes_as_label() {
        assert_eq!(serde_json::to_string(&Verdict::Mushbooh).unwrap(), "\"MUSHBOOH\"");
        assert_eq!(Verdict::Haram.to_string(), "HARAM");
        assert!(!Verdict::Unknown.is_known());
    }
}
