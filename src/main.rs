use clap::Parser;
use finboard::args::{Args, CategoriesSubcommand, Command, TransactionsSubcommand};
use finboard::{commands, Config, Mode, Result};
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
    let home = args.common().finboard_home().path();

    // When FINBOARD_IN_TEST_MODE is set and non-empty the offline backend is used, otherwise the
    // hosted one.
    let mode = Mode::from_env();

    let _: () = match args.command() {
        Command::Init(init_args) => {
            commands::init(home, init_args.backend_url(), init_args.anon_key())
                .await?
                .print()
        }

        Command::Login(login_args) => {
            let config = Config::load(home).await?;
            commands::login(&config, mode, login_args.email(), login_args.password())
                .await?
                .print()
        }

        Command::Dashboard(dashboard_args) => {
            let config = Config::load(home).await?;
            commands::dashboard(&config, mode, dashboard_args)
                .await?
                .print()
        }

        Command::Transactions(subcommand) => {
            let config = Config::load(home).await?;
            match subcommand {
                TransactionsSubcommand::List(args) => {
                    commands::list_transactions(&config, mode, args)
                        .await?
                        .print()
                }
                TransactionsSubcommand::Insert(args) => {
                    commands::insert_transaction(&config, mode, args)
                        .await?
                        .print()
                }
                TransactionsSubcommand::Delete(args) => {
                    commands::delete_transaction(&config, mode, &args.id)
                        .await?
                        .print()
                }
            }
        }

        Command::Categories(subcommand) => {
            let config = Config::load(home).await?;
            match subcommand {
                CategoriesSubcommand::List => {
                    commands::list_categories(&config, mode).await?.print()
                }
                CategoriesSubcommand::Insert(args) => {
                    commands::insert_category(&config, mode, args)
                        .await?
                        .print()
                }
                CategoriesSubcommand::Delete(args) => {
                    commands::delete_category(&config, mode, &args.id)
                        .await?
                        .print()
                }
            }
        }

        Command::Balance => {
            let config = Config::load(home).await?;
            commands::balance(&config, mode).await?.print()
        }

        Command::Recent(recent_args) => {
            let config = Config::load(home).await?;
            commands::recent(&config, mode, recent_args.limit)
                .await?
                .print()
        }
    };
    Ok(())
}

/// Initializes the tracing subscriber.
pub fn init_logger(level: LevelFilter) {
    let filter = match std::env::var("RUST_LOG").ok() {
        // RUST_LOG takes precedence over --log-level.
        Some(_) => EnvFilter::from_default_env(),
        None => EnvFilter::new(format!(
            "{}={},{}={}",
            env!("CARGO_CRATE_NAME"),
            level,
            env!("CARGO_BIN_NAME"),
            level
        )),
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}
