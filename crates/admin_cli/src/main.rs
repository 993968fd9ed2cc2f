use std::{error::Error, path::PathBuf};

use clap::{Args, Parser, Subcommand};
use engine::{Amount, CreateTransactionCmd, Engine, TransactionKind};
use migration::MigratorTrait;
use sea_orm::{Database, DatabaseConnection};
use uuid::Uuid;

#[derive(Parser, Debug)]
#[command(name = "gruzzolo_admin")]
#[command(about = "Admin utilities for gruzzolo (record, import and inspect transactions)")]
struct Cli {
    /// Database connection string (also read from `DATABASE_URL`).
    #[arg(
        long,
        env = "DATABASE_URL",
        default_value = "sqlite:./gruzzolo.db?mode=rwc"
    )]
    database_url: String,

    /// Log level (error, warn, info, debug, trace).
    #[arg(long, default_value = "info")]
    log_level: String,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    Tx(Tx),
    /// Import transactions from a CSV file (`title, type, value, category`).
    Import(ImportArgs),
    /// Print income/outcome/total balance.
    Balance,
}

#[derive(Args, Debug)]
struct Tx {
    #[command(subcommand)]
    command: TxCommand,
}

#[derive(Subcommand, Debug)]
enum TxCommand {
    Add(TxAddArgs),
    Delete(TxDeleteArgs),
    List(TxListArgs),
}

#[derive(Args, Debug)]
struct TxAddArgs {
    #[arg(long)]
    title: String,
    /// `income` or `outcome`.
    #[arg(long)]
    kind: String,
    /// Decimal amount, e.g. `12.50`.
    #[arg(long)]
    amount: String,
    #[arg(long)]
    category: String,
}

#[derive(Args, Debug)]
struct TxDeleteArgs {
    #[arg(long)]
    id: Uuid,
}

#[derive(Args, Debug)]
struct TxListArgs {
    #[arg(long, default_value_t = 50)]
    limit: u64,
}

#[derive(Args, Debug)]
struct ImportArgs {
    file: PathBuf,
}

async fn connect_db(
    database_url: &str,
) -> Result<DatabaseConnection, Box<dyn Error + Send + Sync>> {
    let db = Database::connect(database_url).await?;
    migration::Migrator::up(&db, None).await?;
    Ok(db)
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error + Send + Sync>> {
    let cli = Cli::parse();

    tracing_subscriber::fmt()
        .with_env_filter(format!("gruzzolo_admin={}", cli.log_level))
        .init();

    let db = connect_db(&cli.database_url).await?;
    let engine = Engine::builder().database(db).build().await?;

    match cli.command {
        Command::Tx(Tx {
            command: TxCommand::Add(args),
        }) => {
            let kind = match TransactionKind::try_from(args.kind.as_str()) {
                Ok(kind) => kind,
                Err(err) => {
                    eprintln!("{err}");
                    std::process::exit(2);
                }
            };
            let amount: Amount = match args.amount.parse() {
                Ok(amount) => amount,
                Err(err) => {
                    eprintln!("{err}");
                    std::process::exit(2);
                }
            };

            let tx = engine
                .create_transaction(CreateTransactionCmd::new(
                    args.title,
                    kind,
                    amount.minor(),
                    args.category,
                ))
                .await?;
            println!("created transaction: {} ({})", tx.title, tx.id);
        }
        Command::Tx(Tx {
            command: TxCommand::Delete(args),
        }) => {
            engine.delete_transaction(args.id).await?;
            println!("deleted transaction: {}", args.id);
        }
        Command::Tx(Tx {
            command: TxCommand::List(args),
        }) => {
            for tx in engine.list_transactions(args.limit).await? {
                println!(
                    "{}  {:<7} {:>12}  {:<20} {}  ({})",
                    tx.created_at.format("%Y-%m-%d"),
                    tx.kind.as_str(),
                    Amount::new(tx.amount_minor),
                    tx.category,
                    tx.title,
                    tx.id
                );
            }
        }
        Command::Import(args) => {
            let created = engine.import_transactions(&args.file).await?;
            tracing::info!(
                "imported {} transactions from {}",
                created.len(),
                args.file.display()
            );
            println!("imported {} transactions", created.len());
        }
        Command::Balance => {
            let balance = engine.balance().await?;
            println!("income:  {}", Amount::new(balance.income_minor));
            println!("outcome: {}", Amount::new(balance.outcome_minor));
            println!("total:   {}", Amount::new(balance.total_minor));
        }
    }

    Ok(())
}
