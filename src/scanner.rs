//! One scan end to end: prompt, model call, parse, classify.

use serde::Serialize;

use crate::client::VisionModel;
use crate::error::ScanError;
use crate::image::ScanRequest;
use crate::parser::{self, ParseError};
use crate::prompt;
use crate::types::{Explanation, ScanMode, ScanReport};
use crate::verdict::Verdict;

/// Message shown for every failed scan, whatever the cause.
pub const FAILURE_MESSAGE: &str =
    "Could not analyze this label. Please try again with a clearer photo.";

/// Broad cause of a failed scan.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum FailureKind {
    Image,
    Service,
    Parse,
}

/// A failed scan: a generic message plus the underlying error text for an
/// optional detail view.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ScanFailure {
    pub kind: FailureKind,
    pub message: String,
    pub detail: String,
}

impl From<&ScanError> for ScanFailure {
    fn from(err: &ScanError) -> Self {
        let kind = match err {
            ScanError::Image(_) => FailureKind::Image,
            ScanError::Service(_) => FailureKind::Service,
            ScanError::Parse(_) => FailureKind::Parse,
        };
        Self {
            kind,
            message: FAILURE_MESSAGE.to_string(),
            detail: err.to_string(),
        }
    }
}

/// What the user sees for one upload.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "outcome", rename_all = "lowercase")]
pub enum ScanOutcome {
    Report(ScanReport),
    Failed(ScanFailure),
}

impl ScanOutcome {
    /// The verdict, or `None` for a failed scan.
    pub fn verdict(&self) -> Option<Verdict> {
        match self {
            ScanOutcome::Report(report) => Some(report.verdict),
            ScanOutcome::Failed(_) => None,
        }
    }

    pub fn is_failure(&self) -> bool {
        matches!(self, ScanOutcome::Failed(_))
    }
}

impl From<ScanError> for ScanOutcome {
    fn from(err: ScanError) -> Self {
        ScanOutcome::Failed(ScanFailure::from(&err))
    }
}

/// Parse and classify a reply in the given mode.
///
/// Line-based replies always classify (possibly as `Unknown`); structured
/// replies fail only when the text is not a JSON object.
pub fn classify(reply: &str, mode: ScanMode) -> Result<ScanReport, ParseError> {
    let report = match mode {
        ScanMode::Lines => {
            let parsed = parser::parse_line_reply(reply);
            ScanReport {
                mode,
                verdict: parsed.verdict,
                detected_language: parsed.detected_language,
                explanation: Explanation::Markdown {
                    body: parsed.explanation,
                },
                raw: reply.to_string(),
            }
        }
        ScanMode::Structured => {
            let parsed = parser::parse_structured_reply(reply)?;
            ScanReport {
                mode,
                verdict: parsed.verdict,
                detected_language: parsed.details.detected_language.clone(),
                explanation: Explanation::Structured(parsed.details),
                raw: reply.to_string(),
            }
        }
    };
    Ok(report)
}

/// Runs scans against a [`VisionModel`].
///
/// Each scan makes exactly one model call, with no retry.
#[derive(Debug, Clone)]
pub struct Scanner<M> {
    model: M,
}

impl<M: VisionModel> Scanner<M> {
    pub fn new(model: M) -> Self {
        Self { model }
    }

    pub fn model(&self) -> &M {
        &self.model
    }

    /// Scan one label image.
    ///
    /// Never fails: service and parse errors become
    /// [`ScanOutcome::Failed`]. The request is dropped once the model call
    /// returns.
    pub async fn scan(&self, request: ScanRequest, mode: ScanMode) -> ScanOutcome {
        match self.try_scan(request, mode).await {
            Ok(report) => {
                if report.verdict.is_known() {
                    tracing::info!(verdict = %report.verdict, %mode, "label classified");
                } else {
                    tracing::warn!(%mode, "model reply carried no recognizable verdict");
                }
                ScanOutcome::Report(report)
            }
            Err(err) => {
                tracing::warn!(%mode, error = %err, "scan failed");
                ScanOutcome::from(err)
            }
        }
    }

    /// Like [`Scanner::scan`] but returns the error instead of a failure
    /// outcome.
    pub async fn try_scan(
        &self,
        request: ScanRequest,
        mode: ScanMode,
    ) -> Result<ScanReport, ScanError> {
        let reply = self
            .model
            .generate(prompt::prompt_for(mode), &request)
            .await?;
        drop(request);

        tracing::debug!(chars = reply.len(), "model reply received");
        Ok(classify(&reply, mode)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::client::ServiceError;

    #[test]
    fn classify_lines_unknown_keeps_raw() {
        let reply = "I could not read the label clearly.";
        let report = classify(reply, ScanMode::Lines).unwrap();
        assert_eq!(report.verdict, Verdict::Unknown);
        assert_eq!(report.raw, reply);
    }

    #[test]
    fn classify_structured_copies_language() {
        let report = classify(
            r#"{"status": "MUSHBOOH", "detected_language": "Malay", "flagged_ingredients": ["E471"]}"#,
            ScanMode::Structured,
        )
        .unwrap();
        assert_eq!(report.verdict, Verdict::Mushbooh);
        assert_eq!(report.detected_language, "Malay");
        assert_eq!(report.explanation.flagged_ingredients(), ["E471".to_string()]);
    }

    #[test]
    fn classify_structured_empty_fails() {
        assert!(classify("", ScanMode::Structured).is_err());
    }

    #[test]
    fn failure_keeps_detail() {
        let err = ScanError::from(ServiceError::Api {
            status: 429,
            body: "quota exceeded".into(),
        });
        let outcome = ScanOutcome::from(err);
        match outcome {
            ScanOutcome::Failed(failure) => {
                assert_eq!(failure.kind, FailureKind::Service);
                assert_eq!(failure.message, FAILURE_MESSAGE);
                assert!(failure.detail.contains("429"));
                assert!(failure.detail.contains("quota exceeded"));
            }
            other => panic!("expected failure, got {:?}", other),
        }
    }

    #[test]
    fn outcome_serializes_with_tag() {
        let report = classify("HALAL\n---\nok", ScanMode::Lines).unwrap();
        let value = serde_json::to_value(ScanOutcome::Report(report)).unwrap();
        assert_eq!(value["outcome"], "report");
        assert_eq!(value["verdict"], "HALAL");
        assert_eq!(value["explanation"]["kind"], "markdown");
    }
}
