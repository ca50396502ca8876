use anyhow::Result;
use clap::{Parser, Subcommand};
use donation_indexer::config::Config;
use donation_indexer::query::commands::{DonationsQuery, cmd_donations, cmd_stats};
use donation_indexer::query::formatters::OutputFormat;
use donation_indexer::repository::{Database, DonationRepository};
use donation_indexer::tokens::TokenRegistry;

#[derive(Parser)]
#[command(name = "query")]
#[command(about = "Query indexed donation data", long_about = None)]
struct Cli {
    #[arg(short, long, default_value = "table")]
    format: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    Donations {
        #[arg(long)]
        streamer: Option<String>,

        #[arg(long, default_value = "100")]
        limit: usize,

        #[arg(long, default_value = "0")]
        offset: usize,
    },
    Stats,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    let format = OutputFormat::from(cli.format.as_str());

    let config = Config::from_env()?;
    let registry = TokenRegistry::from_config(
        &config.token_addresses,
        &config.token_symbols,
        &config.token_decimals,
    )?;

    let db = Database::new(&config.database_url)?;
    let donation_repo = DonationRepository::new(&db.conn);

    match cli.command {
        Commands::Donations {
            streamer,
            limit,
            offset,
        } => {
            let query = DonationsQuery {
                streamer,
                limit,
                offset,
            };
            cmd_donations(&donation_repo, &registry, query, &format)?;
        }
        Commands::Stats => {
            cmd_stats(&donation_repo, &format)?;
        }
    }

    Ok(())
}
