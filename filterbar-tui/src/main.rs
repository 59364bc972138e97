mod error;
mod event_loop;
mod host;
mod paths;
mod provider;
mod render;
mod terminal;

use std::env;
use std::fs::{self, File};
use std::path::PathBuf;
use std::process::ExitCode;

use filterbar::{BreakpointTable, Config, Readiness};
use log::info;
use simplelog::{LevelFilter, WriteLogger};

use error::AppError;
use provider::Source;
use terminal::TerminalGuard;

const USAGE: &str = "usage: filterbar-tui [data.json] [--config <path>] [--poll]";

#[derive(Debug, Default)]
struct Args {
    data: Option<PathBuf>,
    config: Option<PathBuf>,
    poll: bool,
}

fn parse_args(mut args: impl Iterator<Item = String>) -> Result<Args, String> {
    let mut parsed = Args::default();
    while let Some(arg) = args.next() {
        match arg.as_str() {
            "--poll" => parsed.poll = true,
            "--config" => match args.next() {
                Some(path) => parsed.config = Some(PathBuf::from(path)),
                None => return Err("--config needs a path".into()),
            },
            flag if flag.starts_with("--") => return Err(format!("unknown flag {flag}")),
            _ if parsed.data.is_none() => parsed.data = Some(PathBuf::from(arg)),
            _ => return Err(format!("unexpected argument {arg}")),
        }
    }
    Ok(parsed)
}

fn log_level() -> LevelFilter {
    env::var("FILTERBAR_LOG")
        .ok()
        .and_then(|level| level.parse().ok())
        .unwrap_or(LevelFilter::Debug)
}

fn init_logging() -> Result<(), AppError> {
    let path = paths::log_file();
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)?;
    }
    let log_file = File::create(&path)?;
    WriteLogger::init(log_level(), simplelog::Config::default(), log_file)?;
    Ok(())
}

fn load_config(args: &Args) -> Result<Config, AppError> {
    let path = args
        .config
        .clone()
        .or_else(|| paths::config_file().filter(|p| p.exists()));

    let mut config = match path {
        Some(path) => {
            info!("Loading config from {}", path.display());
            Config::load(path)?
        }
        None => Config::default().with_breakpoints(BreakpointTable::terminal()),
    };
    if args.poll {
        config = config.with_readiness(Readiness::Poll);
    }
    Ok(config)
}

async fn run(args: Args) -> Result<(), AppError> {
    init_logging()?;
    let config = load_config(&args)?;
    info!("Starting with {config:?}");

    let source = match args.data {
        Some(path) => Source::File(path),
        None => Source::Sample,
    };

    let mut term = TerminalGuard::new()?;
    event_loop::run(config, source, &mut term).await
}

/// Process status for the outcome of a run, printing the error if any.
fn exit_status(result: &Result<(), AppError>) -> u8 {
    match result {
        Ok(()) => 0,
        Err(e) => {
            eprintln!("Error: {}", e);
            1
        }
    }
}

#[tokio::main]
async fn main() -> ExitCode {
    let args = match parse_args(env::args().skip(1)) {
        Ok(args) => args,
        Err(e) => {
            eprintln!("{e}\n{USAGE}");
            return ExitCode::from(2);
        }
    };

    ExitCode::from(exit_status(&run(args).await))
}
