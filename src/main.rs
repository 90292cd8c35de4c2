use anyhow::Result;
use clap::{CommandFactory, Parser, Subcommand};
use fxconv::core::log::init_logging;
use fxconv::core::{CurrencyCode, HistoryPeriod};

#[derive(Parser)]
#[command(version, about)]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Path to optional configuration file
    #[arg(short, long, global = true)]
    config_path: Option<String>,

    #[command(subcommand)]
    command: Option<Commands>,
}

impl From<Commands> for fxconv::AppCommand {
    fn from(cmd: Commands) -> fxconv::AppCommand {
        match cmd {
            Commands::Convert { amount, from, to } => {
                fxconv::AppCommand::Convert { amount, from, to }
            }
            Commands::Rates { base } => fxconv::AppCommand::Rates { base },
            Commands::History { from, to, period } => {
                fxconv::AppCommand::History { from, to, period }
            }
            Commands::Setup => unreachable!("Setup command should be handled separately"),
        }
    }
}

fn parse_amount(text: &str) -> Result<f64, String> {
    fxconv::cli::convert::parse_amount(text).map_err(|e| e.to_string())
}

#[derive(Subcommand)]
enum Commands {
    /// Create default configuration
    Setup,
    /// Convert an amount from one currency to another
    Convert {
        /// Amount to convert, e.g. 100 or 1,250.50
        #[arg(value_parser = parse_amount)]
        amount: f64,
        /// Source currency code, e.g. USD
        from: CurrencyCode,
        /// Target currency code, e.g. INR
        to: CurrencyCode,
    },
    /// List the latest exchange rates
    Rates {
        /// Base currency, defaults to the configured currency
        #[arg(short, long)]
        base: Option<CurrencyCode>,
    },
    /// Show how the rate of a currency pair moved over a period
    History {
        from: CurrencyCode,
        to: CurrencyCode,
        /// One of 5D, 1M, 3M, 6M, 1Y, 5Y
        #[arg(short, long, default_value = "1M")]
        period: HistoryPeriod,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    init_logging(cli.verbose);

    let result = match cli.command {
        Some(Commands::Setup) => match cli.config_path.as_deref() {
            Some(path) => fxconv::cli::setup::setup_at_path(path),
            None => fxconv::cli::setup::setup(),
        },
        Some(cmd) => fxconv::run_command(cmd.into(), cli.config_path.as_deref()).await,
        None => {
            Cli::command().print_help()?;
            Ok(())
        }
    };

    if let Err(e) = &result {
        tracing::error!(error = %e, "Application failed");
    }
    result
}
