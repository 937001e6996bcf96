//! shaverify CLI
//!
//! Check a local file against a published SHA-256 manifest from the command
//! line.

use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use tracing_subscriber::EnvFilter;

use shaverify_cli::crypto;
use shaverify_cli::source::DEFAULT_MANIFEST;
use shaverify_cli::{check_status, verify, ManifestLocation, StatusBoard, SystemStatus, VerificationOutcome};

/// shaverify CLI - Prove a file matches a published record
#[derive(Parser, Debug)]
#[command(name = "shaverify-cli")]
#[command(version)]
#[command(about = "Check a local file against a published SHA-256 manifest")]
struct Args {
    /// File to verify
    #[arg(value_name = "FILE")]
    file: Option<PathBuf>,

    /// Manifest URL (http/https) or local path
    #[arg(short, long, env = "SHAVERIFY_MANIFEST", default_value = DEFAULT_MANIFEST)]
    manifest: String,

    /// Output format: text or json
    #[arg(short, long, default_value = "text")]
    format: OutputFormat,

    /// Show verbose output
    #[arg(short, long)]
    verbose: bool,

    /// Only check whether the manifest is reachable
    #[arg(short, long)]
    status: bool,
}

#[derive(Clone, Debug, PartialEq)]
enum OutputFormat {
    Text,
    Json,
}

impl std::str::FromStr for OutputFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "text" => Ok(OutputFormat::Text),
            "json" => Ok(OutputFormat::Json),
            _ => Err(format!("Unknown format: {}. Use 'text' or 'json'", s)),
        }
    }
}

const RESET: &str = "\x1b[0m";
const BOLD: &str = "\x1b[1m";

fn main() -> ExitCode {
    let args = Args::parse();

    if let Err(e) = init_logging(args.verbose) {
        eprintln!("Warning: {e:#}");
    }

    let mut board = StatusBoard::new();

    // Without a working SHA-256 nothing can be verified.
    if let Err(e) = crypto::self_test() {
        let outcome = VerificationOutcome::from(e);
        board.begin();
        board.finish(&outcome);
        print_outcome(&outcome, &board, &args);
        return exit_code(outcome.exit_code());
    }

    let location = ManifestLocation::parse(&args.manifest);
    tracing::debug!(%location, "manifest location");
    let source = location.into_source();

    if args.status {
        let status = check_status(source.as_ref());
        print_system_status(&status, &args);
        return match status {
            SystemStatus::Online => ExitCode::SUCCESS,
            SystemStatus::Offline { .. } => exit_code(3),
        };
    }

    let checking = board.begin();
    if args.format == OutputFormat::Text {
        eprintln!("{}{}{}", checking.severity().color_code(), checking.label(), RESET);
    }

    let outcome = verify(args.file.as_deref(), source.as_ref());
    board.finish(&outcome);

    print_outcome(&outcome, &board, &args);
    exit_code(outcome.exit_code())
}

fn exit_code(code: i32) -> ExitCode {
    ExitCode::from(u8::try_from(code).unwrap_or(1))
}

fn init_logging(verbose: bool) -> anyhow::Result<()> {
    let default_filter = if verbose { "shaverify_cli=debug" } else { "warn" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter));

    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(filter)
        .with_target(false)
        .try_init()
        .map_err(|e| anyhow::anyhow!("failed to install log subscriber: {e}"))
}

fn print_outcome(outcome: &VerificationOutcome, board: &StatusBoard, args: &Args) {
    if args.format == OutputFormat::Json {
        print_outcome_json(outcome, board);
    } else {
        print_outcome_text(outcome, board, args.verbose);
    }
}

fn print_outcome_text(outcome: &VerificationOutcome, board: &StatusBoard, verbose: bool) {
    let status = board.status();
    let color = status.severity().color_code();

    let mut lines = vec![
        String::new(),
        format!("{}SHA-256 VERIFICATION SUMMARY{}", BOLD, RESET),
        "============================".to_string(),
        format!("Status:  {}{}{}{}", BOLD, color, status.label(), RESET),
        format!("Detail:  {}", outcome.detail()),
        String::new(),
        outcome.transcript(),
        String::new(),
    ];

    if verbose {
        if let VerificationOutcome::Valid { record, .. } = outcome {
            lines.push(format!("Manifest digest: {}", record.digest_hex));
            lines.push(String::new());
        }
    }

    let text = lines.join("\n");
    match outcome {
        VerificationOutcome::Valid { .. } | VerificationOutcome::NotFound { .. } => {
            println!("{text}")
        }
        _ => eprintln!("{text}"),
    }
}

fn print_outcome_json(outcome: &VerificationOutcome, board: &StatusBoard) {
    let status = board.status();
    let json = serde_json::json!({
        "status": status,
        "label": status.label(),
        "severity": status.severity(),
        "detail": outcome.detail(),
        "transcript": outcome.transcript(),
        "result": outcome,
        "exitCode": outcome.exit_code()
    });

    print_json(&json);
}

fn print_system_status(status: &SystemStatus, args: &Args) {
    if args.format == OutputFormat::Json {
        let json = serde_json::json!({
            "system": status,
            "label": status.label(),
            "severity": status.severity(),
            "message": status.message()
        });
        print_json(&json);
        return;
    }

    let color = status.severity().color_code();
    println!("Status:  {}{}{}{}", BOLD, color, status.label(), RESET);
    println!("{}", status.message());
    if let (SystemStatus::Offline { reason }, true) = (status, args.verbose) {
        println!("Reason:  {reason}");
    }
}

fn print_json(json: &serde_json::Value) {
    match serde_json::to_string_pretty(json) {
        Ok(text) => println!("{text}"),
        Err(e) => eprintln!("Failed to render JSON: {e}"),
    }
}
