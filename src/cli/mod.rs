use std::fs::File;
use std::sync::Arc;

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};

use crate::application::LedgerService;
use crate::domain::{Points, UserId};
use crate::io::Exporter;
use crate::storage::JsonStore;

/// Punctum - Point Balance Ledger
#[derive(Parser)]
#[command(name = "punctum")]
#[command(about = "A local-first point ledger with bounded charge and use operations")]
#[command(version)]
pub struct Cli {
    /// Store file path
    #[arg(short, long, default_value = "punctum.json")]
    pub store: String,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Charge points onto a user's balance
    Charge {
        /// User id (positive integer)
        user: UserId,

        /// Amount to charge (10000..=200000)
        amount: Points,
    },

    /// Use points from a user's balance
    Use {
        /// User id (positive integer)
        user: UserId,

        /// Amount to use (1000..=1000000)
        amount: Points,
    },

    /// Show the current balance for a user
    Balance {
        /// User id (positive integer)
        user: UserId,
    },

    /// List a user's accepted mutations, oldest first
    History {
        /// User id (positive integer)
        user: UserId,
    },

    /// Export a user's ledger data to CSV or JSON
    Export {
        /// User id (positive integer)
        user: UserId,

        /// Output file (stdout if omitted)
        #[arg(short, long)]
        output: Option<String>,

        /// Format: csv (history rows) or json (balance + history snapshot)
        #[arg(short, long, default_value = "csv")]
        format: String,
    },
}

impl Cli {
    pub async fn run(self) -> Result<()> {
        let store = Arc::new(JsonStore::open(&self.store)?);
        let service = LedgerService::new(store.clone(), store);

        match self.command {
            Commands::Charge { user, amount } => {
                let balance = service.charge_for_user(user, amount).await?;
                println!("Charged {} points to user {}", amount, user);
                println!("New balance: {}", balance.points);
            }

            Commands::Use { user, amount } => {
                let balance = service.use_for_user(user, amount).await?;
                println!("Used {} points from user {}", amount, user);
                println!("New balance: {}", balance.points);
            }

            Commands::Balance { user } => {
                let balance = service.get_balance(user).await?;
                println!(
                    "User {}: {} points (updated {})",
                    balance.user_id,
                    balance.points,
                    balance.updated_at.format("%Y-%m-%d %H:%M:%S")
                );
            }

            Commands::History { user } => {
                run_history_command(&service, user).await?;
            }

            Commands::Export {
                user,
                output,
                format,
            } => {
                run_export_command(&service, user, output.as_deref(), &format).await?;
            }
        }

        Ok(())
    }
}

async fn run_history_command(service: &LedgerService, user: UserId) -> Result<()> {
    let entries = service.get_history(user).await?;

    if entries.is_empty() {
        println!("No history for user {}", user);
        return Ok(());
    }

    println!("{:<20} {:<8} {:>10}", "RECORDED", "KIND", "AMOUNT");
    for entry in &entries {
        println!(
            "{:<20} {:<8} {:>10}",
            entry.recorded_at.format("%Y-%m-%d %H:%M:%S"),
            entry.kind.as_str(),
            entry.amount
        );
    }

    Ok(())
}

async fn run_export_command(
    service: &LedgerService,
    user: UserId,
    output: Option<&str>,
    format: &str,
) -> Result<()> {
    let exporter = Exporter::new(service);

    match format {
        "csv" => match output {
            Some(path) => {
                let file = File::create(path)
                    .with_context(|| format!("Failed to create output file {}", path))?;
                let count = exporter.export_history_csv(user, file).await?;
                println!("Exported {} history entries to {}", count, path);
            }
            None => {
                exporter.export_history_csv(user, std::io::stdout()).await?;
            }
        },

        "json" => match output {
            Some(path) => {
                let file = File::create(path)
                    .with_context(|| format!("Failed to create output file {}", path))?;
                exporter.export_user_json(user, file).await?;
                println!("Exported snapshot for user {} to {}", user, path);
            }
            None => {
                exporter.export_user_json(user, std::io::stdout()).await?;
            }
        },

        other => bail!("Unknown export format: {} (expected csv or json)", other),
    }

    Ok(())
}
