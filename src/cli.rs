use clap::{Args, Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

use halal_scan::config::{DEFAULT_ENDPOINT, DEFAULT_MODEL};
use halal_scan::ScanMode;

#[derive(Parser, Debug)]
#[command(
    name = "halal-scan",
    version,
    about = "Check a food ingredients label for Halal, Haram or doubtful ingredients"
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Analyze a photo of an ingredients label (JPEG or PNG)
    Scan(ScanArgs),
    /// Show the E-code and label keyword cheat sheet
    Guide {
        /// Look up a single E-code or keyword
        term: Option<String>,
    },
}

#[derive(Args, Debug)]
pub struct ScanArgs {
    /// Path to the label image
    pub image: PathBuf,

    #[arg(long, value_enum, default_value_t = Mode::Lines, help = "Reply format to request from the model")]
    pub mode: Mode,

    #[arg(long, help = "Print the outcome as JSON")]
    pub json: bool,

    #[arg(long, help = "Disable colored output")]
    pub no_color: bool,

    #[arg(long, env = "GOOGLE_API_KEY", hide_env_values = true)]
    pub api_key: Option<String>,

    #[arg(long, env = "HALAL_SCAN_MODEL", default_value = DEFAULT_MODEL)]
    pub model: String,

    #[arg(long, default_value = DEFAULT_ENDPOINT)]
    pub endpoint: String,

    #[arg(long, default_value_t = 120, help = "Request timeout in seconds")]
    pub timeout_secs: u64,

    #[arg(long)]
    pub temperature: Option<f32>,

    #[arg(
        long,
        env = "HALAL_SCAN_PASSPHRASE",
        hide_env_values = true,
        help = "Shared passphrase required for structured scans"
    )]
    pub passphrase: Option<String>,

    #[arg(long, help = "Access code for structured scans")]
    pub code: Option<String>,

    #[arg(long, help = "Saved session query, e.g. '?code=...'")]
    pub session: Option<String>,
}

#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
pub enum Mode {
    Lines,
    Structured,
}

impl From<Mode> for ScanMode {
    fn from(mode: Mode) -> Self {
        match mode {
            Mode::Lines => ScanMode::Lines,
            Mode::Structured => ScanMode::Structured,
        }
    }
}
