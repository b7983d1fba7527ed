//! Maps a scan outcome to a severity-colored panel.

use serde::Serialize;

use crate::scanner::ScanOutcome;
use crate::types::{Explanation, ScanReport};
use crate::verdict::Verdict;

/// Banner color class.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Success,
    Warning,
    Error,
    Info,
}

impl Severity {
    fn ansi_color(&self) -> &'static str {
        match self {
            Severity::Success => "\x1b[32m",
            Severity::Warning => "\x1b[33m",
            Severity::Error => "\x1b[31m",
            Severity::Info => "\x1b[34m",
        }
    }
}

/// Everything needed to display one outcome.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Panel {
    pub severity: Severity,
    pub icon: &'static str,
    pub headline: String,
    /// Small text under the banner, usually the detected language.
    pub caption: Option<String>,
    /// Concern items. Empty for HALAL and for failures.
    pub items: Vec<String>,
    /// Main body: Markdown explanation, reason, or raw reply.
    pub body: Option<String>,
    /// Error text for an expandable detail view.
    pub detail: Option<String>,
}

/// Build the panel for an outcome.
pub fn present(outcome: &ScanOutcome) -> Panel {
    match outcome {
        ScanOutcome::Report(report) => present_report(report),
        ScanOutcome::Failed(failure) => Panel {
            severity: Severity::Error,
            icon: "❌",
            headline: failure.message.clone(),
            caption: None,
            items: Vec::new(),
            body: None,
            detail: Some(failure.detail.clone()),
        },
    }
}

fn present_report(report: &ScanReport) -> Panel {
    let (severity, icon, headline) = match report.verdict {
        Verdict::Haram => (Severity::Error, "🚨", "VERDICT: HARAM"),
        Verdict::Mushbooh => (Severity::Warning, "⚠️", "VERDICT: MUSHBOOH (Doubtful)"),
        Verdict::Halal => (Severity::Success, "✅", "VERDICT: HALAL"),
        Verdict::Unknown => {
            return Panel {
                severity: Severity::Info,
                icon: "ℹ️",
                headline: "Verdict: Analysis Complete".to_string(),
                caption: None,
                items: Vec::new(),
                body: non_empty(&report.raw),
                detail: None,
            };
        }
    };

    let items = match report.verdict {
        Verdict::Halal => Vec::new(),
        _ => report.explanation.flagged_ingredients().to_vec(),
    };

    let body = match &report.explanation {
        Explanation::Markdown { body } => non_empty(body),
        Explanation::Structured(details) => non_empty(&details.reason),
    };

    Panel {
        severity,
        icon,
        headline: headline.to_string(),
        caption: Some(report.detected_language.clone()),
        items,
        body,
        detail: None,
    }
}

fn non_empty(text: &str) -> Option<String> {
    if text.trim().is_empty() {
        None
    } else {
        Some(text.to_string())
    }
}

/// Render a panel as terminal text, optionally with ANSI colors.
pub fn render_text(panel: &Panel, color: bool) -> String {
    let mut out = String::new();

    let banner = format!("{} {}", panel.icon, panel.headline);
    if color {
        out.push_str(&format!("\x1b[1m{}{}\x1b[0m\n", panel.severity.ansi_color(), banner));
    } else {
        out.push_str(&banner);
        out.push('\n');
    }

    if let Some(caption) = &panel.caption {
        out.push_str(&format!("  {}\n", caption));
    }

    if !panel.items.is_empty() {
        out.push('\n');
        for item in &panel.items {
            out.push_str(&format!("  - {}\n", item));
        }
    }

    if let Some(body) = &panel.body {
        out.push('\n');
        out.push_str(body.trim_end());
        out.push('\n');
    }

    if let Some(detail) = &panel.detail {
        out.push_str(&format!("\nDetails: {}\n", detail));
    }

    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scanner::{classify, FailureKind, ScanFailure, FAILURE_MESSAGE};
    use crate::types::ScanMode;

    fn structured(reply: &str) -> ScanOutcome {
        ScanOutcome::Report(classify(reply, ScanMode::Structured).unwrap())
    }

    #[test]
    fn haram_lists_items() {
        let panel = present(&structured(
            r#"{"status":"HARAM","detected_language":"Korean","flagged_ingredients":["돼지고기 (pork)","술 (alcohol)"],"reason":"Contains pork"}"#,
        ));
        assert_eq!(panel.severity, Severity::Error);
        assert_eq!(panel.icon, "🚨");
        assert_eq!(panel.items, vec!["돼지고기 (pork)", "술 (alcohol)"]);
        assert_eq!(panel.caption.as_deref(), Some("Korean"));
        assert_eq!(panel.body.as_deref(), Some("Contains pork"));
    }

    #[test]
    fn mushbooh_is_warning() {
        let panel = present(&structured(r#"{"flagged_ingredients":["E471"]}"#));
        assert_eq!(panel.severity, Severity::Warning);
        assert_eq!(panel.headline, "VERDICT: MUSHBOOH (Doubtful)");
        assert_eq!(panel.items, vec!["E471"]);
    }

    #[test]
    fn halal_has_no_list() {
        let panel = present(&structured(
            r#"{"status":"HALAL","flagged_ingredients":["sugar"],"reason":"Fine"}"#,
        ));
        assert_eq!(panel.severity, Severity::Success);
        assert!(panel.items.is_empty());
    }

    #[test]
    fn unknown_shows_raw_reply() {
        let raw = "Sorry, the image is too blurry.";
        let panel = present(&ScanOutcome::Report(classify(raw, ScanMode::Lines).unwrap()));
        assert_eq!(panel.severity, Severity::Info);
        assert_eq!(panel.headline, "Verdict: Analysis Complete");
        assert_eq!(panel.body.as_deref(), Some(raw));
        assert!(panel.caption.is_none());
    }

    #[test]
    fn line_reply_body_is_markdown() {
        let reply = "HARAM\nDetected Language: Japanese\n---\n### Haram\n|pork|Pork|meat|";
        let panel = present(&ScanOutcome::Report(classify(reply, ScanMode::Lines).unwrap()));
        assert_eq!(panel.caption.as_deref(), Some("Detected Language: Japanese"));
        assert_eq!(panel.body.as_deref(), Some("### Haram\n|pork|Pork|meat|"));
        assert!(panel.items.is_empty());
    }

    #[test]
    fn failure_has_detail() {
        let panel = present(&ScanOutcome::Failed(ScanFailure {
            kind: FailureKind::Parse,
            message: FAILURE_MESSAGE.to_string(),
            detail: "Model reply is not valid JSON".to_string(),
        }));
        assert_eq!(panel.severity, Severity::Error);
        assert_eq!(panel.headline, FAILURE_MESSAGE);
        assert_eq!(panel.detail.as_deref(), Some("Model reply is not valid JSON"));
    }

    #[test]
    fn render_plain() {
        let panel = present(&structured(
            r#"{"status":"HARAM","detected_language":"English","flagged_ingredients":["gelatin"],"reason":"Animal gelatin"}"#,
        ));
        let text = render_text(&panel, false);
        assert_eq!(
            text,
            "🚨 VERDICT: HARAM\n  English\n\n  - gelatin\n\nAnimal gelatin\n"
        );
    }

    #[test]
    fn render_colored_wraps_banner() {
        let panel = present(&structured(r#"{"status":"HALAL"}"#));
        let text = render_text(&panel, true);
        assert!(text.starts_with("\x1b[1m\x1b[32m✅ VERDICT: HALAL\x1b[0m\n"));
    }
}
