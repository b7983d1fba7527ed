//! # halal-scan
//!
//! Classify a food ingredients label as HALAL, HARAM or MUSHBOOH by sending
//! a photo of it to a multimodal model and parsing the reply.
//!
//! ## Features
//!
//! - **Two reply formats**: a line-based layout (verdict word, language
//!   line, `---`, Markdown tables) and a strict JSON object, optionally
//!   wrapped in a code fence
//! - **Deterministic fallbacks**: every reply maps to exactly one
//!   [`Verdict`]; unrecognized replies become `Unknown` and undecodable
//!   JSON becomes a generic failure, never a panic
//! - **Gemini client** behind the [`VisionModel`] trait, so tests and other
//!   backends can swap it out
//! - **Presentation mapping** from outcome to a severity-colored [`Panel`]
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use halal_scan::{GeminiClient, GeminiConfig, ScanMode, ScanRequest, Scanner};
//! use std::path::Path;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let scanner = Scanner::new(GeminiClient::new(GeminiConfig::from_env()));
//!     let request = ScanRequest::from_path(Path::new("label.jpg"))?;
//!
//!     let outcome = scanner.scan(request, ScanMode::Structured).await;
//!     let panel = halal_scan::present(&outcome);
//!     print!("{}", halal_scan::render_text(&panel, false));
//!     Ok(())
//! }
//! ```
//!
//! ## Parsing without a model
//!
//! ```rust
//! use halal_scan::{parse_line_reply, parse_structured_reply, Verdict};
//!
//! let line = parse_line_reply("HARAM\nDetected Language: Japanese\n---\n| 豚肉 | Pork |");
//! assert_eq!(line.verdict, Verdict::Haram);
//!
//! let json = parse_structured_reply("```json\n{\"status\": \"HALAL\"}\n```").unwrap();
//! assert_eq!(json.verdict, Verdict::Halal);
//!
//! // Missing status is doubtful, not safe
//! assert_eq!(parse_structured_reply("{}").unwrap().verdict, Verdict::Mushbooh);
//! ```

pub mod client;
pub mod config;
pub mod error;
pub mod gate;
pub mod guide;
pub mod image;
pub mod parser;
pub mod presentation;
pub mod prompt;
pub mod scanner;
pub mod types;
pub mod verdict;

// Re-export main types at crate root
pub use client::{GeminiClient, ServiceError, VisionModel};
pub use config::GeminiConfig;
pub use error::{Result, ScanError};
pub use gate::{authorize, Access, AccessGate, Session};
pub use image::{ImageError, ImageFormat, ScanRequest};
pub use parser::{parse_line_reply, parse_structured_reply, strip_code_fence, ParseError};
pub use presentation::{present, render_text, Panel, Severity};
pub use scanner::{classify, FailureKind, ScanFailure, ScanOutcome, Scanner};
pub use types::{Details, Explanation, LineReply, ScanMode, ScanReport, StructuredReply};
pub use verdict::Verdict;
