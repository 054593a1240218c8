//! Shield CLI - Run the request sanitizer over JSON documents

use std::io::Read;
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use anyhow::Context;
use clap::Parser;
use serde_json::Value;
use shield_core::{RequestParts, RequestSanitizer, ShieldConfig};
use tracing::debug;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "shield")]
#[command(about = "Shield - Input sanitization for the ICU management backend")]
struct Cli {
    /// Configuration file path (TOML)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Increase log verbosity (-v debug, -vv trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(clap::Subcommand)]
enum Commands {
    /// Escape every string and drop dangerous keys in a JSON document
    Sanitize {
        /// Input file, stdin if omitted
        file: Option<PathBuf>,
    },
    /// Remove disallowed operators from a query document
    Query {
        /// Input file, stdin if omitted
        file: Option<PathBuf>,
    },
    /// Screen and sanitize a {body, query, params} request document
    Request {
        /// Input file, stdin if omitted
        file: Option<PathBuf>,
    },
    /// Gate a URL; prints the accepted URL or nothing
    Url {
        /// URL to check
        url: String,
    },
    /// Check email syntax
    Email {
        /// Address to check
        address: String,
    },
    /// Check phone number syntax
    Phone {
        /// Number to check
        number: String,
    },
    /// Run the SQL-injection heuristics over a string
    Sql {
        /// Text to check
        text: String,
    },
    /// Load and validate a configuration file
    CheckConfig {
        /// Configuration file path
        file: PathBuf,
    },
}

fn main() -> anyhow::Result<ExitCode> {
    let cli = Cli::parse();

    init_tracing(cli.verbose);

    let config = match &cli.config {
        Some(path) => ShieldConfig::from_file(path)?,
        None => ShieldConfig::default(),
    };
    let shield = RequestSanitizer::new(config)?;
    let sanitizer = shield.sanitizer();

    match cli.command {
        Commands::Sanitize { file } => {
            let doc = read_json(file.as_deref())?;
            print_json(&sanitizer.sanitize_object(&doc))?;
        }
        Commands::Query { file } => {
            let doc = read_json(file.as_deref())?;
            let outcome = sanitizer.filter_query(&doc);
            for dropped in &outcome.dropped {
                eprintln!("dropped {} at {}", dropped.operator, dropped.path);
            }
            print_json(&outcome.sanitized)?;
        }
        Commands::Request { file } => {
            let doc = read_json(file.as_deref())?;
            let request: RequestParts =
                serde_json::from_value(doc).context("request must be an object with body, query, params")?;
            let verdict = shield.screen(&request);
            let sanitized = shield.sanitize(request);
            print_json(&serde_json::json!({
                "verdict": verdict,
                "request": sanitized.request,
                "dropped": sanitized.dropped,
            }))?;
            if verdict.should_reject() {
                return Ok(ExitCode::FAILURE);
            }
        }
        Commands::Url { url } => {
            let accepted = sanitizer.sanitize_url(&url);
            println!("{}", accepted);
            return Ok(status(!accepted.is_empty()));
        }
        Commands::Email { address } => {
            let valid = sanitizer.is_valid_email(&address);
            println!("{}", if valid { "valid" } else { "invalid" });
            return Ok(status(valid));
        }
        Commands::Phone { number } => {
            let valid = sanitizer.is_valid_phone(&number);
            println!("{}", if valid { "valid" } else { "invalid" });
            return Ok(status(valid));
        }
        Commands::Sql { text } => match sanitizer.detect_sql_injection(&text) {
            Some(description) => {
                println!("suspicious: {}", description);
                return Ok(ExitCode::FAILURE);
            }
            None => println!("clean"),
        },
        Commands::CheckConfig { file } => {
            let config = ShieldConfig::from_file(&file)?;
            RequestSanitizer::new(config)?;
            println!("{}: OK", file.display());
        }
    }

    Ok(ExitCode::SUCCESS)
}

fn init_tracing(verbose: u8) {
    let default_level = match verbose {
        0 => "warn",
        1 => "debug",
        _ => "trace",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn read_json(file: Option<&Path>) -> anyhow::Result<Value> {
    let text = match file {
        Some(path) => std::fs::read_to_string(path)
            .with_context(|| format!("failed to read {}", path.display()))?,
        None => {
            let mut text = String::new();
            std::io::stdin()
                .read_to_string(&mut text)
                .context("failed to read stdin")?;
            text
        }
    };
    debug!(bytes = text.len(), "Read input document");
    serde_json::from_str(&text).context("input is not valid JSON")
}

fn print_json(value: &Value) -> anyhow::Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

fn status(ok: bool) -> ExitCode {
    if ok {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    }
}
