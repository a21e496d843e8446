use clap::Parser;
use mototaxi_ledger::args::{Args, Command};
use mototaxi_ledger::{commands, Config, Result};
use std::process::ExitCode;
use tracing::{debug, error, trace};
use tracing_subscriber::filter::LevelFilter;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> ExitCode {
    let args = Args::parse();
    let log_level = args.common().log_level();
    init_logger(log_level);
    debug!("Log level set to {}", log_level.to_string().to_lowercase());

    match main_inner(args).await {
        Ok(_) => ExitCode::SUCCESS,
        Err(e) => {
            error!("Exiting with error: {e:#}");
            ExitCode::FAILURE
        }
    }
}

pub async fn main_inner(args: Args) -> Result<()> {
    trace!("{args:?}");
    let home = args.common().mototaxi_home().path();

    // Route to appropriate command handler. Everything but init and calc needs the data directory.
    let _: () = match args.command() {
        Command::Init(init_args) => commands::init(home, init_args.timezone()).await?.print(),

        Command::Calc(calc_args) => commands::calc(calc_args.clone()).await?.print(),

        Command::Start(start_args) => {
            let config = Config::load(home).await?;
            commands::start_day(config, start_args.clone())
                .await?
                .print()
        }

        Command::Ride(ride_args) => {
            let config = Config::load(home).await?;
            commands::record_ride(config, ride_args.clone())
                .await?
                .print()
        }

        Command::Expense(expense_args) => {
            let config = Config::load(home).await?;
            commands::record_expense(config, expense_args.clone())
                .await?
                .print()
        }

        Command::Collect(collect_args) => {
            let config = Config::load(home).await?;
            commands::collect(config, collect_args.clone())
                .await?
                .print()
        }

        Command::Summary(date_args) => {
            let config = Config::load(home).await?;
            commands::summary(config, date_args.clone()).await?.print()
        }

        Command::Outstanding => {
            let config = Config::load(home).await?;
            commands::outstanding(config).await?.print()
        }

        Command::Records(records_args) => {
            let config = Config::load(home).await?;
            commands::records(config, records_args.clone())
                .await?
                .print()
        }

        Command::Close(close_args) => {
            let config = Config::load(home).await?;
            commands::close_day(config, close_args.clone())
                .await?
                .print()
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
                env!("CARGO_PKG_NAME").replace('-', "_"),
                level
            ))
        }
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}
