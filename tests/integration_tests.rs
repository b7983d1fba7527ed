use halal_scan::prompt::{LINE_PROMPT, STRUCTURED_PROMPT};
use halal_scan::*;
use std::sync::Mutex;

/// Model fake that returns a fixed reply and records the prompts it saw.
struct CannedModel {
    reply: std::result::Result<String, (u16, String)>,
    prompts: Mutex<Vec<String>>,
}

impl CannedModel {
    fn replying(text: &str) -> Self {
        Self {
            reply: Ok(text.to_string()),
            prompts: Mutex::new(Vec::new()),
        }
    }

    fn failing(status: u16, body: &str) -> Self {
        Self {
            reply: Err((status, body.to_string())),
            prompts: Mutex::new(Vec::new()),
        }
    }

    fn calls(&self) -> usize {
        self.prompts.lock().unwrap().len()
    }
}

impl VisionModel for CannedModel {
    async fn generate(
        &self,
        prompt: &str,
        image: &ScanRequest,
    ) -> std::result::Result<String, ServiceError> {
        assert!(!image.bytes().is_empty());
        self.prompts.lock().unwrap().push(prompt.to_string());
        match &self.reply {
            Ok(text) => Ok(text.clone()),
            Err((status, body)) => Err(ServiceError::Api {
                status: *status,
                body: body.clone(),
            }),
        }
    }
}

fn label() -> ScanRequest {
    ScanRequest::new(vec![0xFF, 0xD8, 0xFF, 0xE0], ImageFormat::Jpeg)
}

fn report(outcome: ScanOutcome) -> ScanReport {
    match outcome {
        ScanOutcome::Report(report) => report,
        ScanOutcome::Failed(failure) => panic!("unexpected failure: {:?}", failure),
    }
}

fn failure(outcome: ScanOutcome) -> ScanFailure {
    match outcome {
        ScanOutcome::Failed(failure) => failure,
        ScanOutcome::Report(report) => panic!("unexpected report: {:?}", report),
    }
}

// --- Line-based scans ---

#[tokio::test]
async fn test_lines_scan_haram() {
    let scanner = Scanner::new(CannedModel::replying(
        "HARAM\nDetected Language: Japanese\n---\n### Haram\n| A | B | C |\n|pork|Pork|meat|",
    ));
    let report = report(scanner.scan(label(), ScanMode::Lines).await);

    assert_eq!(report.verdict, Verdict::Haram);
    assert_eq!(report.detected_language, "Detected Language: Japanese");
    assert_eq!(
        report.explanation,
        Explanation::Markdown {
            body: "### Haram\n| A | B | C |\n|pork|Pork|meat|".to_string()
        }
    );
    assert_eq!(scanner.model().prompts.lock().unwrap()[0], LINE_PROMPT);
}

#[tokio::test]
async fn test_lines_scan_haram_first_line_wins_over_body() {
    let scanner = Scanner::new(CannedModel::replying(
        "Haram (contains pork)\nDetected Language: English\n---\nOtherwise HALAL. Nothing MUSHBOOH.",
    ));
    let outcome = scanner.scan(label(), ScanMode::Lines).await;
    assert_eq!(outcome.verdict(), Some(Verdict::Haram));
}

#[tokio::test]
async fn test_lines_scan_empty_reply_is_unknown() {
    let scanner = Scanner::new(CannedModel::replying(""));
    let report = report(scanner.scan(label(), ScanMode::Lines).await);

    assert_eq!(report.verdict, Verdict::Unknown);
    assert_eq!(
        report.explanation,
        Explanation::Markdown {
            body: String::new()
        }
    );
}

#[tokio::test]
async fn test_lines_scan_blank_reply_is_neutral_not_failure() {
    let scanner = Scanner::new(CannedModel::replying("  \n"));
    let outcome = scanner.scan(label(), ScanMode::Lines).await;

    assert_eq!(outcome.verdict(), Some(Verdict::Unknown));
    let panel = present(&outcome);
    assert_eq!(panel.severity, Severity::Info);
    assert_eq!(panel.headline, "Verdict: Analysis Complete");
    assert!(panel.detail.is_none());
}

#[tokio::test]
async fn test_structured_scan_blank_reply_is_parse_failure() {
    let scanner = Scanner::new(CannedModel::replying("  \n"));
    let failure = failure(scanner.scan(label(), ScanMode::Structured).await);
    assert_eq!(failure.kind, FailureKind::Parse);
}

#[tokio::test]
async fn test_lines_scan_unknown_is_informational() {
    let raw = "The photo shows a cat, not an ingredients label.";
    let scanner = Scanner::new(CannedModel::replying(raw));
    let outcome = scanner.scan(label(), ScanMode::Lines).await;

    let panel = present(&outcome);
    assert_eq!(panel.severity, Severity::Info);
    assert_eq!(panel.body.as_deref(), Some(raw));
    assert!(!outcome.is_failure());
}

// --- Structured scans ---

#[tokio::test]
async fn test_structured_scan_halal() {
    let scanner = Scanner::new(CannedModel::replying(
        r#"{"status":"HALAL","detected_language":"English","flagged_ingredients":[],"reason":"All plant-based"}"#,
    ));
    let report = report(scanner.scan(label(), ScanMode::Structured).await);

    assert_eq!(report.verdict, Verdict::Halal);
    assert_eq!(
        report.explanation,
        Explanation::Structured(Details {
            detected_language: "English".to_string(),
            flagged_ingredients: vec![],
            reason: "All plant-based".to_string(),
        })
    );
    assert_eq!(scanner.model().prompts.lock().unwrap()[0], STRUCTURED_PROMPT);
}

#[tokio::test]
async fn test_structured_scan_fenced_and_plain_agree() {
    let body = r#"{"status":"MUSHBOOH","detected_language":"German","flagged_ingredients":["Mono- und Diglyceride (E471)"],"reason":"Source of E471 not stated"}"#;
    let plain = Scanner::new(CannedModel::replying(body));
    let fenced = Scanner::new(CannedModel::replying(&format!("```json\n{}\n```", body)));

    let a = report(plain.scan(label(), ScanMode::Structured).await);
    let b = report(fenced.scan(label(), ScanMode::Structured).await);

    assert_eq!(a.verdict, b.verdict);
    assert_eq!(a.detected_language, b.detected_language);
    assert_eq!(a.explanation, b.explanation);
}

#[tokio::test]
async fn test_structured_scan_missing_fields_defaults() {
    let scanner = Scanner::new(CannedModel::replying("{}"));
    let report = report(scanner.scan(label(), ScanMode::Structured).await);

    assert_eq!(report.verdict, Verdict::Mushbooh);
    assert_eq!(report.detected_language, "Unknown");
    match report.explanation {
        Explanation::Structured(details) => {
            assert!(details.flagged_ingredients.is_empty());
            assert_eq!(details.reason, "Please verify manually.");
        }
        other => panic!("expected structured explanation, got {:?}", other),
    }
}

#[tokio::test]
async fn test_structured_scan_empty_reply_fails_gracefully() {
    let scanner = Scanner::new(CannedModel::replying(""));
    let failure = failure(scanner.scan(label(), ScanMode::Structured).await);

    assert_eq!(failure.kind, FailureKind::Parse);
    assert!(failure.message.contains("Could not analyze"));
    assert!(failure.detail.contains("not valid JSON"));
}

#[tokio::test]
async fn test_structured_scan_unrecognized_status() {
    let scanner = Scanner::new(CannedModel::replying(r#"{"status":"HALAL-ISH"}"#));
    let outcome = scanner.scan(label(), ScanMode::Structured).await;

    assert_eq!(outcome.verdict(), Some(Verdict::Unknown));
    assert_eq!(present(&outcome).headline, "Verdict: Analysis Complete");
}

// --- Service failures ---

#[tokio::test]
async fn test_service_error_is_generic_failure_without_retry() {
    let scanner = Scanner::new(CannedModel::failing(503, "backend overloaded"));
    let outcome = scanner.scan(label(), ScanMode::Lines).await;

    assert_eq!(scanner.model().calls(), 1);
    let panel = present(&outcome);
    assert_eq!(panel.severity, Severity::Error);
    assert!(panel.items.is_empty());
    assert!(panel.body.is_none());
    assert!(panel.detail.unwrap().contains("backend overloaded"));
}

#[tokio::test]
async fn test_try_scan_surfaces_typed_errors() {
    let scanner = Scanner::new(CannedModel::failing(401, "bad key"));
    let err = scanner
        .try_scan(label(), ScanMode::Structured)
        .await
        .unwrap_err();
    assert!(matches!(
        err,
        ScanError::Service(ServiceError::Api { status: 401, .. })
    ));

    let scanner = Scanner::new(CannedModel::replying("[1, 2]"));
    let err = scanner
        .try_scan(label(), ScanMode::Structured)
        .await
        .unwrap_err();
    assert!(matches!(err, ScanError::Parse(ParseError::NotAnObject(_))));
}

// --- Access gate ---

#[test]
fn test_gate_session_flow() {
    let gate = AccessGate::new("Halal2024");
    let mut session = Session::from_query("?code=halal2024");
    assert!(session.unlock(&gate, None));

    let resumed = Session::from_query(&session.to_query().unwrap());
    assert!(gate.check(false, resumed.access_code.as_deref()));
}
