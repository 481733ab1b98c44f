use anyhow::Result;
use clap::{CommandFactory, Parser, Subcommand};
use xrate::core::log::init_logging;

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

#[derive(Subcommand)]
enum Commands {
    /// Create default configuration
    Setup,
    /// Convert an amount into one or more currencies
    Convert {
        /// Amount to convert, must be greater than zero
        #[arg(allow_hyphen_values = true)]
        amount: String,
        /// Currency code to convert from, e.g. EUR
        from: String,
        /// Currency codes to convert to
        #[arg(required = true, num_args = 1..)]
        to: Vec<String>,
        /// Swap the source and target currency
        #[arg(short, long)]
        reverse: bool,
    },
    /// Display the latest exchange rates
    Rates {
        /// Only show currencies whose code or name contains this text
        #[arg(short, long)]
        filter: Option<String>,
    },
    /// List the known currency names
    Currencies {
        /// Only show currencies whose code or name contains this text
        #[arg(short, long)]
        filter: Option<String>,
    },
}

impl From<Commands> for xrate::AppCommand {
    fn from(cmd: Commands) -> xrate::AppCommand {
        match cmd {
            Commands::Convert {
                amount,
                from,
                to,
                reverse,
            } => xrate::AppCommand::Convert {
                amount,
                from,
                to,
                reverse,
            },
            Commands::Rates { filter } => xrate::AppCommand::Rates { filter },
            Commands::Currencies { filter } => xrate::AppCommand::Currencies { filter },
            Commands::Setup => unreachable!("Setup command should be handled separately"),
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    init_logging(cli.verbose);

    let result = match cli.command {
        Some(Commands::Setup) => xrate::cli::setup::setup(),
        Some(cmd) => xrate::run_command(cmd.into(), cli.config_path.as_deref()).await,
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
