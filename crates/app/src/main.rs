use anyhow::{bail, Context, Result};
use std::path::{Path, PathBuf};
use tracing_subscriber::EnvFilter;

mod commands;
mod config;

use commands::ReconcileArgs;
use config::Config;

const USAGE: &str = "\
Usage:
  tally reconcile [--config FILE] [--bank FILE] [--ledger FILE] [--report FILE]
                  [--format csv|json] [--skip-malformed]
  tally demo [DIR]
  tally help

Settings come from flags, then the config file (tally.toml in the working
directory when --config is not given), then built-in defaults.
RUST_LOG controls log verbosity (default: info).";

#[derive(Debug, PartialEq, Eq)]
enum Command {
    Reconcile(ReconcileArgs),
    Demo { dir: PathBuf },
    Help,
}

fn flag_value(flag: &str, value: Option<String>) -> Result<String> {
    match value {
        Some(v) if !v.starts_with("--") => Ok(v),
        _ => bail!("{flag} expects a value"),
    }
}

fn parse_args<I: IntoIterator<Item = String>>(args: I) -> Result<Command> {
    let mut args = args.into_iter();
    let Some(command) = args.next() else {
        return Ok(Command::Help);
    };

    match command.as_str() {
        "reconcile" => {
            let mut parsed = ReconcileArgs::default();
            while let Some(arg) = args.next() {
                match arg.as_str() {
                    "--config" => parsed.config = Some(flag_value(&arg, args.next())?.into()),
                    "--bank" => parsed.bank = Some(flag_value(&arg, args.next())?.into()),
                    "--ledger" => parsed.ledger = Some(flag_value(&arg, args.next())?.into()),
                    "--report" => parsed.report = Some(flag_value(&arg, args.next())?.into()),
                    "--format" => {
                        let value = flag_value(&arg, args.next())?;
                        parsed.format = Some(value.parse().map_err(anyhow::Error::msg)?);
                    }
                    "--skip-malformed" => parsed.skip_malformed = true,
                    other => bail!("Unknown option for reconcile: {other}"),
                }
            }
            Ok(Command::Reconcile(parsed))
        }
        "demo" => {
            let dir = args.next().map(PathBuf::from).unwrap_or_else(|| PathBuf::from("."));
            if let Some(extra) = args.next() {
                bail!("Unexpected argument for demo: {extra}");
            }
            Ok(Command::Demo { dir })
        }
        "help" | "--help" | "-h" => Ok(Command::Help),
        other => bail!("Unknown command: {other}"),
    }
}

fn run(command: Command) -> Result<()> {
    let cwd = Path::new(".");
    let mut stdout = std::io::stdout().lock();

    match command {
        Command::Reconcile(args) => {
            let mut config = Config::discover(args.config.as_deref(), cwd)
                .context("Failed to load configuration")?;
            args.apply(&mut config);
            commands::reconcile(&config, &mut stdout)?;
        }
        Command::Demo { dir } => {
            let config = Config::discover(None, cwd).context("Failed to load configuration")?;
            commands::demo(&dir, &config, &mut stdout)?;
        }
        Command::Help => println!("{USAGE}"),
    }
    Ok(())
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let command = match parse_args(std::env::args().skip(1)) {
        Ok(command) => command,
        Err(e) => {
            eprintln!("{e}\n\n{USAGE}");
            std::process::exit(2);
        }
    };
    run(command)
}
