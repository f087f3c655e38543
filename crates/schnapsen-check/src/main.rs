//! schnapsen-check
//!
//! Obtains the reference trace of a student, replays it against the
//! assignment bot and prints the status report.

use std::panic;
use std::path::PathBuf;
use std::process::ExitCode;
use std::time::Duration;

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;

use sn_check::{StatusReport, assess_correctness, panic_message};
use sn_student::AssignmentBot;
use sn_trace::source::{DEFAULT_BASE_URL, default_cache_dir};
use sn_trace::{GameLog, TraceSource, TraceSourceConfig, load_trace_file};

/// Checks a Schnapsen assignment bot against its recorded reference games
#[derive(Parser, Debug)]
#[command(name = "schnapsen-check")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Verbose output (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Replay the recorded games and report where the bot diverges
    Check(CheckArgs),

    /// Remove the cached trace of a student
    ClearCache {
        /// Your student ID
        #[arg(long, env = "SCHNAPSEN_STUDENT_ID")]
        id: u64,

        /// Directory of the trace cache
        #[arg(long, env = "SCHNAPSEN_CACHE_DIR")]
        cache_dir: Option<PathBuf>,
    },
}

#[derive(Args, Debug)]
struct CheckArgs {
    /// Your student ID
    #[arg(long, env = "SCHNAPSEN_STUDENT_ID")]
    id: u64,

    /// Read the trace from a local file instead of the server
    #[arg(long, env = "SCHNAPSEN_TRACE_FILE")]
    trace_file: Option<PathBuf>,

    /// Directory of the trace cache
    #[arg(long, env = "SCHNAPSEN_CACHE_DIR")]
    cache_dir: Option<PathBuf>,

    /// Assignment server
    #[arg(long, env = "SCHNAPSEN_BASE_URL", default_value = DEFAULT_BASE_URL)]
    base_url: String,

    /// Download again when the cached trace is older (0 = never expire)
    #[arg(long, env = "SCHNAPSEN_MAX_AGE_HOURS", default_value_t = 168)]
    max_age_hours: u64,

    /// Ignore the cache and download the trace
    #[arg(long)]
    refresh: bool,

    /// Only use the cache
    #[arg(long, env = "SCHNAPSEN_OFFLINE")]
    offline: bool,

    /// Print the report as JSON
    #[arg(long)]
    json: bool,
}

impl CheckArgs {
    fn source_config(&self) -> TraceSourceConfig {
        TraceSourceConfig {
            base_url: self.base_url.clone(),
            cache_dir: self.cache_dir.clone().unwrap_or_else(default_cache_dir),
            max_age: (self.max_age_hours > 0)
                .then(|| Duration::from_secs(self.max_age_hours.saturating_mul(3600))),
            refresh: self.refresh,
            offline: self.offline,
        }
    }
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let result = match cli.command {
        Commands::Check(args) => check(&args),
        Commands::ClearCache { id, cache_dir } => clear_cache(id, cache_dir),
    };
    match result {
        Ok(true) => ExitCode::SUCCESS,
        Ok(false) => ExitCode::FAILURE,
        Err(e) => {
            eprintln!("Error: {e:#}");
            ExitCode::FAILURE
        }
    }
}

fn init_logging(verbose: u8) {
    let level = match verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

/// Returns whether every category conformed.
fn check(args: &CheckArgs) -> Result<bool> {
    let log = load_trace(args)?;
    let mut bot = AssignmentBot::new();

    // student panics become report entries; keep them off stderr meanwhile
    let default_hook = panic::take_hook();
    panic::set_hook(Box::new(|info| {
        debug!(
            message = %panic_message(info.payload()),
            location = ?info.location(),
            "bot panicked"
        );
    }));
    let assessment = assess_correctness(&mut bot, args.id, &log);
    panic::set_hook(default_hook);

    let assessment = assessment.context("replaying the recorded games failed")?;
    let report = StatusReport::new(bot.to_string(), args.id, &assessment);
    if args.json {
        println!("{}", report.to_json());
    } else {
        report.print_summary();
    }
    info!(failed = report.failed_categories(), "check finished");
    Ok(report.passed())
}

fn load_trace(args: &CheckArgs) -> Result<GameLog> {
    if let Some(path) = &args.trace_file {
        info!(path = %path.display(), "reading trace file");
        return load_trace_file(path)
            .with_context(|| format!("could not read trace file {}", path.display()));
    }

    let source =
        TraceSource::new(args.source_config()).context("could not set up the HTTP client")?;
    source
        .load(args.id)
        .with_context(|| format!("could not obtain the trace of student {}", args.id))
}

fn clear_cache(student_id: u64, cache_dir: Option<PathBuf>) -> Result<bool> {
    let config = TraceSourceConfig {
        cache_dir: cache_dir.unwrap_or_else(default_cache_dir),
        offline: true,
        ..TraceSourceConfig::default()
    };
    let source = TraceSource::new(config).context("could not set up the trace source")?;
    source
        .invalidate(student_id)
        .with_context(|| format!("could not remove {}", source.cache_path(student_id).display()))?;
    info!(student_id, "trace cache cleared");
    Ok(true)
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    fn parse_check(argv: &[&str]) -> CheckArgs {
        let cli = Cli::try_parse_from(argv.iter().copied()).unwrap();
        match cli.command {
            Commands::Check(args) => args,
            other => panic!("unexpected command {other:?}"),
        }
    }

    #[test]
    fn test_cli_definition() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_defaults() {
        let args = parse_check(&["schnapsen-check", "check", "--id", "2712345"]);
        assert_eq!(args.id, 2712345);
        let config = args.source_config();
        assert_eq!(config.base_url, DEFAULT_BASE_URL);
        assert_eq!(config.max_age, Some(Duration::from_secs(168 * 3600)));
        assert!(!config.refresh && !config.offline);
    }

    #[test]
    fn test_zero_max_age_never_expires() {
        let args = parse_check(&[
            "schnapsen-check",
            "-vv",
            "check",
            "--id",
            "1",
            "--max-age-hours",
            "0",
            "--offline",
            "--cache-dir",
            "/tmp/traces",
        ]);
        let config = args.source_config();
        assert_eq!(config.max_age, None);
        assert!(config.offline);
        assert_eq!(config.cache_dir, PathBuf::from("/tmp/traces"));
    }

    #[test]
    fn test_id_is_required() {
        assert!(Cli::try_parse_from(["schnapsen-check", "check"]).is_err());
    }

    #[test]
    fn test_clear_cache_removes_entry() {
        let dir = tempfile::tempdir().unwrap();
        let source = TraceSource::new(TraceSourceConfig {
            cache_dir: dir.path().to_path_buf(),
            offline: true,
            ..TraceSourceConfig::default()
        })
        .unwrap();
        let path = source.write_cache(5, &GameLog::default()).unwrap();
        assert!(path.exists());

        assert!(clear_cache(5, Some(dir.path().to_path_buf())).unwrap());
        assert!(!path.exists());
    }
}
