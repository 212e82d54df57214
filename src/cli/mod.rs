use anyhow::{Context, Result};
use chrono::NaiveDate;
use clap::{Parser, Subcommand, ValueEnum};
use std::io::{BufRead, Write};
use tracing_subscriber::EnvFilter;

use crate::application::{AmountPolicy, LedgerService, LedgerSnapshot, SaveAction, SaveOutcome};
use crate::domain::{format_amount, Amount, Transaction, TransactionId, TransactionInput, DATE_FORMAT};

/// Categories offered to the user. Any other non-empty text is accepted too.
pub const SUGGESTED_CATEGORIES: &[&str] = &[
    "Darowizna",
    "Wypłata",
    "Kosmetyki",
    "Jedzenie",
    "Rozrywka",
    "Transport",
    "Inne",
    "Paliwo",
    "Wakacje",
    "Wyjazdy",
    "Prezenty",
    "Elektronika",
    "Zdrowie",
    "Ubrania",
];

/// Transaction types offered to the user.
pub const SUGGESTED_TYPES: &[&str] = &["Income", "Expense"];

/// Budget - household income and expense ledger
#[derive(Parser)]
#[command(name = "budget")]
#[command(about = "Record dated income and expenses and keep a running balance")]
#[command(version)]
pub struct Cli {
    /// Database file path
    #[arg(short, long, env = "BUDGET_DB", default_value = "budget.db")]
    pub database: String,

    /// Currency symbol shown after amounts
    #[arg(long, default_value = "zł", global = true)]
    pub currency: String,

    /// Reject negative amounts instead of storing them as entered
    #[arg(long, global = true)]
    pub strict_amounts: bool,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Create the database and the transactions table
    Init,

    /// Record a new transaction
    Add {
        /// Amount (e.g., "42.50"); text that is not a number is stored as 0
        #[arg(short, long)]
        amount: String,

        /// Category (see `categories` for suggestions, defaults to "Inne")
        #[arg(short, long)]
        category: Option<String>,

        /// Transaction type: Income or Expense (defaults to Expense)
        #[arg(short = 't', long = "type")]
        transaction_type: Option<String>,

        /// Date of the transaction (YYYY-MM-DD, defaults to today)
        #[arg(long)]
        date: Option<String>,

        /// Description
        #[arg(short, long)]
        description: Option<String>,
    },

    /// Change a transaction; fields not given keep their stored values
    Edit {
        /// Transaction ID
        id: TransactionId,

        /// New amount
        #[arg(short, long)]
        amount: Option<String>,

        /// New category
        #[arg(short, long)]
        category: Option<String>,

        /// New transaction type: Income or Expense
        #[arg(short = 't', long = "type")]
        transaction_type: Option<String>,

        /// New date (YYYY-MM-DD)
        #[arg(long)]
        date: Option<String>,

        /// New description (pass "" to clear it)
        #[arg(short, long)]
        description: Option<String>,
    },

    /// Delete a transaction
    Delete {
        /// Transaction ID
        id: TransactionId,

        /// Skip the confirmation prompt
        #[arg(short, long)]
        yes: bool,
    },

    /// List all transactions, newest first
    List,

    /// Show one transaction
    Show {
        /// Transaction ID
        id: TransactionId,
    },

    /// Show the current balance
    Balance,

    /// List suggested categories and types
    Categories,

    /// Export all transactions
    Export {
        /// Output format
        #[arg(value_enum, default_value = "csv")]
        format: ExportFormat,

        /// Output file (stdout if omitted)
        #[arg(short, long)]
        output: Option<String>,
    },
}

#[derive(Clone, Copy, ValueEnum)]
pub enum ExportFormat {
    Csv,
    Json,
}

impl Cli {
    /// Install the log subscriber. `RUST_LOG` overrides the default level.
    pub fn init_tracing(&self) {
        let default_level = if self.verbose {
            "budget_ledger=debug"
        } else {
            "budget_ledger=info"
        };

        tracing_subscriber::fmt()
            .with_env_filter(
                EnvFilter::try_from_default_env().unwrap_or_else(|_| default_level.into()),
            )
            .with_writer(std::io::stderr)
            .with_target(false)
            .init();
    }

    async fn open_service(&self) -> Result<LedgerService> {
        let policy = if self.strict_amounts {
            AmountPolicy::NonNegative
        } else {
            AmountPolicy::AsEntered
        };

        let service = LedgerService::init(&self.database)
            .await
            .with_context(|| format!("Failed to open database: {}", self.database))?;
        Ok(service.with_amount_policy(policy))
    }

    pub async fn run(self) -> Result<()> {
        let service = self.open_service().await?;

        match self.command {
            Commands::Init => {
                println!("Database initialized: {}", self.database);
            }

            Commands::Add {
                amount,
                category,
                transaction_type,
                date,
                description,
            } => {
                let input = TransactionInput {
                    date: date.as_deref().map(parse_date).transpose()?,
                    category,
                    amount,
                    transaction_type,
                    description,
                };

                let outcome = service.save(input, None).await?;
                print_save_outcome(&outcome, &self.currency);
            }

            Commands::Edit {
                id,
                amount,
                category,
                transaction_type,
                date,
                description,
            } => {
                let existing = service
                    .find_by_id(id)
                    .await?
                    .with_context(|| format!("Transaction not found: {}", id))?;

                // Updates always write the full row, so start from the stored values
                let mut input = TransactionInput::from(existing.to_new());
                if let Some(amount) = amount {
                    input.amount = amount;
                }
                if let Some(category) = category {
                    input.category = Some(category);
                }
                if let Some(transaction_type) = transaction_type {
                    input.transaction_type = Some(transaction_type);
                }
                if let Some(date) = date {
                    input.date = Some(parse_date(&date)?);
                }
                if let Some(description) = description {
                    input.description = Some(description);
                }

                let outcome = service.save(input, Some(id)).await?;
                print_save_outcome(&outcome, &self.currency);
            }

            Commands::Delete { id, yes } => {
                let Some(tx) = service.find_by_id(id).await? else {
                    println!("No transaction with ID {}", id);
                    return Ok(());
                };

                if !yes && !confirm(&format!("Delete this transaction?\n  {}", describe(&tx)))? {
                    println!("Cancelled.");
                    return Ok(());
                }

                let snapshot = service.remove(id).await?;
                println!("Deleted transaction {}", id);
                print_refreshed_balance(snapshot.as_ref(), &self.currency);
            }

            Commands::List => {
                let snapshot = service.snapshot().await?;
                let stored = service.count().await?;
                print_transactions(&snapshot.transactions);
                println!();
                let shown = snapshot.transactions.len() as i64;
                if shown == stored {
                    println!("{} transactions", stored);
                } else {
                    println!(
                        "{} transactions ({} unreadable, not shown)",
                        stored,
                        stored - shown
                    );
                }
                println!(
                    "Income:  {}",
                    format_money(snapshot.total_income, &self.currency)
                );
                println!(
                    "Expense: {}",
                    format_money(snapshot.total_expense, &self.currency)
                );
                print_balance(snapshot.balance, &self.currency);
            }

            Commands::Show { id } => {
                let tx = service
                    .find_by_id(id)
                    .await?
                    .with_context(|| format!("Transaction not found: {}", id))?;

                println!("Transaction {}", tx.id);
                println!("  Date:        {}", tx.date_string());
                println!("  Type:        {}", tx.transaction_type);
                println!("  Category:    {}", tx.category);
                println!("  Amount:      {}", format_money(tx.amount, &self.currency));
                if let Some(desc) = tx.description.as_deref().filter(|d| !d.is_empty()) {
                    println!("  Description: {}", desc);
                }
            }

            Commands::Balance => {
                let balance = service.compute_balance().await?;
                print_balance(balance, &self.currency);
            }

            Commands::Categories => {
                println!("Categories:");
                for category in SUGGESTED_CATEGORIES {
                    println!("  {}", category);
                }
                println!("Types: {}", SUGGESTED_TYPES.join(", "));
            }

            Commands::Export { format, output } => {
                run_export_command(&service, format, output.as_deref()).await?;
            }
        }

        Ok(())
    }
}

async fn run_export_command(
    service: &LedgerService,
    format: ExportFormat,
    output: Option<&str>,
) -> Result<()> {
    use crate::io::Exporter;
    use std::fs::File;
    use std::io::stdout;

    let exporter = Exporter::new(service);

    let writer: Box<dyn Write> = match output {
        Some(path) => {
            let file = File::create(path)
                .with_context(|| format!("Failed to create output file: {}", path))?;
            Box::new(file)
        }
        None => Box::new(stdout()),
    };

    let count = match format {
        ExportFormat::Csv => exporter.export_transactions_csv(writer).await?,
        ExportFormat::Json => exporter.export_json(writer).await?.transactions.len(),
    };

    if output.is_some() {
        eprintln!("Exported {} transactions", count);
    }

    Ok(())
}

fn parse_date(date_str: &str) -> Result<NaiveDate> {
    NaiveDate::parse_from_str(date_str, DATE_FORMAT)
        .with_context(|| format!("Invalid date format '{}'. Use YYYY-MM-DD", date_str))
}

fn format_money(amount: Amount, currency: &str) -> String {
    format!("{} {}", format_amount(amount), currency)
}

fn print_balance(balance: Amount, currency: &str) {
    println!("Balance: {}", format_money(balance, currency));
}

fn describe(tx: &Transaction) -> String {
    format!(
        "#{} {} {} {} {}",
        tx.id,
        tx.date_string(),
        tx.transaction_type,
        tx.category,
        format_amount(tx.amount)
    )
}

fn print_save_outcome(outcome: &SaveOutcome, currency: &str) {
    for warning in &outcome.warnings {
        eprintln!("Note: {}", warning);
    }

    match outcome.action {
        SaveAction::Inserted => println!("Recorded transaction {}", outcome.id),
        SaveAction::Updated => println!("Updated transaction {}", outcome.id),
        SaveAction::NoMatch => println!("No transaction with ID {}", outcome.id),
    }
    print_refreshed_balance(outcome.snapshot.as_ref(), currency);
}

fn print_refreshed_balance(snapshot: Option<&LedgerSnapshot>, currency: &str) {
    match snapshot {
        Some(snapshot) => print_balance(snapshot.balance, currency),
        None => eprintln!("Change saved, but the ledger could not be reloaded (see log)"),
    }
}

fn print_transactions(transactions: &[Transaction]) {
    if transactions.is_empty() {
        println!("No transactions found.");
        return;
    }

    println!(
        "{:<6} {:<10} {:<8} {:<14} {:>12}  {}",
        "ID", "DATE", "TYPE", "CATEGORY", "AMOUNT", "DESCRIPTION"
    );
    println!("{}", "-".repeat(70));
    for tx in transactions {
        println!(
            "{:<6} {:<10} {:<8} {:<14} {:>12}  {}",
            tx.id,
            tx.date_string(),
            tx.transaction_type.as_str(),
            tx.category,
            format_amount(tx.amount),
            tx.description.as_deref().unwrap_or("")
        );
    }
}

fn confirm(prompt: &str) -> Result<bool> {
    print!("{} [y/N] ", prompt);
    std::io::stdout().flush()?;

    let mut answer = String::new();
    std::io::stdin()
        .lock()
        .read_line(&mut answer)
        .context("Failed to read confirmation")?;

    Ok(matches!(answer.trim().to_lowercase().as_str(), "y" | "yes"))
}
