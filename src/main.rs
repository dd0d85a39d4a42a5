use clap::Parser;
use expense_ledger::args::{Args, Command};
use expense_ledger::{commands, Config, Result};
use std::process::ExitCode;
use tracing::{debug, error, trace};
use tracing_subscriber::filter::LevelFilter;
use tracing_subscriber::EnvFilter;

fn main() -> ExitCode {
    let args = Args::parse();
    let log_level = args.common().log_level();
    init_logger(log_level);
    debug!("Log level set to {}", log_level.to_string().to_lowercase());

    match main_inner(args) {
        Ok(_) => ExitCode::SUCCESS,
        Err(e) => {
            error!("Exiting with error: {e:#}");
            ExitCode::FAILURE
        }
    }
}

pub fn main_inner(args: Args) -> Result<()> {
    trace!("{args:?}");
    let home = args.common().expenses_home().path();

    // Route to appropriate command handler
    let _: () = match args.command() {
        Command::Init(init_args) => commands::init(home, init_args.clone())?.print(),

        Command::Add(add_args) => {
            let config = Config::load(home)?;
            commands::add_expense(config, add_args.clone())?.print()
        }

        Command::Delete(delete_args) => {
            let config = Config::load(home)?;
            commands::delete_expense(config, delete_args.clone())?.print()
        }

        Command::List(list_args) => {
            let config = Config::load(home)?;
            commands::list_expenses(config, list_args.clone())?.print_rendered()
        }

        Command::Stats(stats_args) => {
            let config = Config::load(home)?;
            commands::stats(config, stats_args.clone())?.print_rendered()
        }
    };
    Ok(())
}

/// Initializes the tracing subscriber.
pub fn init_logger(level: LevelFilter) {
    let filter = match std::env::var("RUST_LOG").ok() {
        Some(_) => {
            // RUST_LOG exists; use it.
            EnvFilter::from_default_env()
        }
        None => {
            // RUST_LOG does not exist; use default log level for this crate only.
            EnvFilter::new(format!(
                "{}={},{}={}",
                env!("CARGO_CRATE_NAME"),
                level,
                "expense_ledger",
                level
            ))
        }
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}
