use anyhow::{Context, Result};
use clap::Parser;
use std::io;
use std::path::PathBuf;
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;

use errwrap_hints::{load_config, Analyzer, Config, OutputFormat, ScanError, SuggestionWriter, WrapTemplate};

/// Print fmt.Errorf wrapping suggestions for Go returns of a bare `err`
#[derive(Debug, Parser)]
#[command(name = "errwrap", version, about)]
struct Cli {
    /// Directory to scan
    #[arg(default_value = ".")]
    root: PathBuf,

    /// Output format
    #[arg(long, value_enum)]
    format: Option<OutputFormat>,

    /// Wrapping expression; `{context}` and `{ident}` are substituted
    #[arg(long)]
    template: Option<String>,

    /// Name of the error variable to look for
    #[arg(long)]
    ident: Option<String>,

    /// JSON config file (overrides ERRWRAP_CONFIG_FILE)
    #[arg(long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Extra glob of paths to skip (repeatable)
    #[arg(long = "ignore", value_name = "GLOB")]
    ignore: Vec<String>,

    /// More log output on stderr (-v info, -vv debug)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Log as JSON lines
    #[arg(long)]
    log_json: bool,
}

fn init_tracing(verbose: u8, json: bool) {
    let default_level = match verbose {
        0 => "warn",
        1 => "info",
        _ => "debug",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    // stdout carries suggestions only
    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .with_target(false);
    let res = if json {
        builder.json().try_init()
    } else {
        builder.try_init()
    };
    if let Err(e) = res {
        eprintln!("Warning: could not install log subscriber: {}", e);
    }
}

fn build_config(cli: &Cli) -> Result<Config> {
    let mut cfg = load_config(cli.config.as_deref()).context("Failed to load configuration")?;

    if let Some(format) = cli.format {
        cfg.format = format;
    }
    if let Some(template) = &cli.template {
        cfg.template = WrapTemplate::parse(template).context("Invalid --template")?;
    }
    if let Some(ident) = &cli.ident {
        cfg.error_ident = ident.clone();
    }
    cfg.ignore_globs.extend(cli.ignore.iter().cloned());

    cfg.validate().context("Invalid command-line options")?;
    Ok(cfg)
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing(cli.verbose, cli.log_json);

    let cfg = match build_config(&cli) {
        Ok(cfg) => cfg,
        Err(e) => {
            let msg = format!("{:#}", e);
            tracing::error!(error = %msg, "configuration rejected");
            eprintln!("Error: {}", msg);
            return ExitCode::from(2);
        }
    };

    let format = cfg.format;
    let mut analyzer = match Analyzer::new(cfg) {
        Ok(analyzer) => analyzer,
        Err(e) => {
            eprintln!("Error: {}", e);
            return ExitCode::from(2);
        }
    };

    let mut out = SuggestionWriter::new(io::stdout().lock(), format);
    let result = analyzer.scan(&cli.root, &mut out);
    drop(out);

    match result {
        Ok(_) => ExitCode::SUCCESS,
        Err(ScanError::Output(e)) if e.kind() == io::ErrorKind::BrokenPipe => ExitCode::SUCCESS,
        Err(e @ ScanError::RootUnavailable { .. }) => {
            tracing::error!(error = %e, "traversal failed");
            println!("Error walking files: {}", e);
            ExitCode::FAILURE
        }
        Err(e) => {
            tracing::error!(error = %e, "scan aborted");
            eprintln!("Error: {}", e);
            ExitCode::FAILURE
        }
    }
}
