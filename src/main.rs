use chrono::Local;
use clap::Parser;
use dompet::args::{
    Args, Command, DeleteSubcommand, InsertSubcommand, ReportSubcommand, UpdateSubcommand,
};
use dompet::{commands, Config, Result};
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
    let home = args.common().dompet_home().path();

    // Bulk entries, the default transaction date and the weekly window are all relative to this.
    let today = Local::now().date_naive();

    // Route to appropriate command handler
    let _: () = match args.command() {
        Command::Init(init_args) => commands::init(home, init_args.store()).await?.print(),

        Command::Insert(insert_args) => {
            let config = Config::load(home).await?;
            match insert_args.entity() {
                InsertSubcommand::Transaction(args) => {
                    commands::insert_transaction(config, args.clone(), today)
                        .await?
                        .print()
                }
                InsertSubcommand::Bulk(args) => commands::insert_bulk(config, args.clone(), today)
                    .await?
                    .print(),
                InsertSubcommand::Target(args) => commands::insert_target(config, args.clone())
                    .await?
                    .print(),
            }
        }

        Command::Update(update_args) => {
            let config = Config::load(home).await?;
            match update_args.entity() {
                UpdateSubcommand::Target(args) => commands::update_target(config, args.clone())
                    .await?
                    .print(),
            }
        }

        Command::Delete(delete_args) => {
            let config = Config::load(home).await?;
            match delete_args.entity() {
                DeleteSubcommand::Transactions(args) => {
                    commands::delete_transactions(config, args.clone())
                        .await?
                        .print()
                }
                DeleteSubcommand::Targets(args) => commands::delete_targets(config, args.clone())
                    .await?
                    .print(),
            }
        }

        Command::List(filter_args) => {
            let config = Config::load(home).await?;
            commands::list(config, filter_args.clone()).await?.print()
        }

        Command::Report(report_args) => {
            let config = Config::load(home).await?;
            match report_args.kind() {
                ReportSubcommand::Summary(args) => commands::report_summary(config, args.clone())
                    .await?
                    .print(),
                ReportSubcommand::Weekly(args) => {
                    commands::report_weekly(config, args.clone(), today)
                        .await?
                        .print()
                }
                ReportSubcommand::Targets => commands::report_targets(config).await?.print(),
            }
        }

        Command::Alerts => {
            let config = Config::load(home).await?;
            commands::alerts(config).await?.print()
        }

        Command::Classify(classify_args) => {
            let config = Config::load(home).await?;
            commands::classify(config, classify_args.clone())
                .await?
                .print()
        }

        Command::Export(export_args) => {
            let config = Config::load(home).await?;
            commands::export(config, export_args.clone()).await?.print()
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
                env!("CARGO_BIN_NAME"),
                level
            ))
        }
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}
