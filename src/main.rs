mod cli;

use clap::Parser;
use std::io::IsTerminal;
use std::process::ExitCode;
use std::time::Duration;
use tracing_subscriber::EnvFilter;

use cli::{Cli, Commands, ScanArgs};
use halal_scan::gate::{authorize, Access};
use halal_scan::{
    guide, present, render_text, GeminiClient, GeminiConfig, ScanError, ScanMode, ScanOutcome,
    ScanRequest, Scanner,
};

const DEFAULT_LOG_FILTER: &str = "halal_scan=info";

#[tokio::main]
async fn main() -> anyhow::Result<ExitCode> {
    dotenv::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_FILTER)),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    match cli.command {
        Commands::Scan(args) => run_scan(args).await,
        Commands::Guide { term } => Ok(run_guide(term.as_deref())),
    }
}

async fn run_scan(args: ScanArgs) -> anyhow::Result<ExitCode> {
    let mode = ScanMode::from(args.mode);

    match authorize(
        mode,
        args.passphrase.as_deref(),
        args.session.as_deref(),
        args.code.as_deref(),
    ) {
        Access::Open => {}
        Access::Denied => {
            eprintln!("Access denied: a valid access code is required for structured scans.");
            return Ok(ExitCode::from(2));
        }
        Access::Granted { resume } => {
            tracing::info!("access granted");
            if let Some(query) = resume {
                eprintln!("Resume later with --session '?{}'", query);
            }
        }
    }

    let outcome = match ScanRequest::from_path(&args.image) {
        Ok(request) => {
            let mut config = GeminiConfig::with_model(args.model)
                .endpoint(args.endpoint)
                .timeout(Duration::from_secs(args.timeout_secs));
            if let Some(key) = args.api_key.filter(|k| !k.trim().is_empty()) {
                config = config.api_key(key);
            }
            if let Some(t) = args.temperature {
                config = config.temperature(t);
            }

            eprintln!("Translating & scanning {}...", args.image.display());
            Scanner::new(GeminiClient::new(config)).scan(request, mode).await
        }
        Err(err) => {
            tracing::warn!(error = %err, "could not load image");
            ScanOutcome::from(ScanError::from(err))
        }
    };

    if args.json {
        println!("{}", serde_json::to_string_pretty(&outcome)?);
    } else {
        let color = !args.no_color && std::io::stdout().is_terminal();
        print!("{}", render_text(&present(&outcome), color));
        println!("\nDisclaimer: {}", guide::DISCLAIMER);
    }

    Ok(if outcome.is_failure() {
        ExitCode::FAILURE
    } else {
        ExitCode::SUCCESS
    })
}

fn run_guide(term: Option<&str>) -> ExitCode {
    match term {
        Some(term) => match guide::lookup(term) {
            Some(entry) => {
                println!("{} - {}", entry.term, entry.note);
                ExitCode::SUCCESS
            }
            None => {
                eprintln!("No guide entry for '{}'", term);
                ExitCode::FAILURE
            }
        },
        None => {
            print!("{}", guide::render());
            println!("\nDisclaimer: {}", guide::DISCLAIMER);
            ExitCode::SUCCESS
        }
    }
}
