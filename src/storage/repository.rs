use std::str::FromStr;

use anyhow::{Context, Result};
use chrono::NaiveDate;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
use sqlx::{Row, SqlitePool};
use tracing::{debug, warn};

use crate::domain::{Amount, NewTransaction, Transaction, TransactionId, TransactionType, DATE_FORMAT};

use super::MIGRATION_001_TRANSACTIONS;

/// Repository for persisting and querying ledger transactions.
///
/// Holds a single SQLite connection for its whole lifetime. Calls are
/// expected to be issued one at a time; nothing here serializes them.
pub struct Repository {
    pool: SqlitePool,
}

impl Repository {
    /// Create a new repository with the given SQLite connection pool.
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Connect to a SQLite database.
    /// With `mode=rwc` in the URL the database file is created if missing.
    pub async fn connect(database_url: &str) -> Result<Self> {
        let options = SqliteConnectOptions::from_str(database_url)
            .with_context(|| format!("Invalid database URL: {}", database_url))?;

        let pool = Self::pool_options()
            .connect_with(options)
            .await
            .context("Failed to connect to database")?;

        debug!(database_url, "connected to database");
        Ok(Self::new(pool))
    }

    /// One connection, kept open until the repository is dropped.
    fn pool_options() -> SqlitePoolOptions {
        SqlitePoolOptions::new()
            .max_connections(1)
            .idle_timeout(None)
            .max_lifetime(None)
    }

    /// Ensure the transactions table exists. Never touches existing rows.
    pub async fn initialize(&self) -> Result<()> {
        sqlx::query(MIGRATION_001_TRANSACTIONS)
            .execute(&self.pool)
            .await
            .context("Failed to create transactions table")?;
        Ok(())
    }

    /// Initialize a database (connect + create table).
    pub async fn init(database_url: &str) -> Result<Self> {
        let repo = Self::connect(database_url).await?;
        repo.initialize().await?;
        Ok(repo)
    }

    /// Insert a new transaction and return the id assigned to it.
    pub async fn insert(&self, transaction: &NewTransaction) -> Result<TransactionId> {
        let result = sqlx::query(
            r#"
            INSERT INTO Transactions (Date, Category, Amount, Type, Description)
            VALUES (?, ?, ?, ?, ?)
            "#,
        )
        .bind(transaction.date.format(DATE_FORMAT).to_string())
        .bind(&transaction.category)
        .bind(transaction.amount)
        .bind(transaction.transaction_type.as_str())
        .bind(&transaction.description)
        .execute(&self.pool)
        .await
        .context("Failed to insert transaction")?;

        let id = result.last_insert_rowid();
        debug!(id, "inserted transaction");
        Ok(id)
    }

    /// Overwrite every field of the transaction with the given id.
    /// Returns false when no row has that id; that is not an error.
    pub async fn update(&self, id: TransactionId, transaction: &NewTransaction) -> Result<bool> {
        let result = sqlx::query(
            r#"
            UPDATE Transactions
            SET Date = ?, Category = ?, Amount = ?, Type = ?, Description = ?
            WHERE Id = ?
            "#,
        )
        .bind(transaction.date.format(DATE_FORMAT).to_string())
        .bind(&transaction.category)
        .bind(transaction.amount)
        .bind(transaction.transaction_type.as_str())
        .bind(&transaction.description)
        .bind(id)
        .execute(&self.pool)
        .await
        .context("Failed to update transaction")?;

        let matched = result.rows_affected() > 0;
        debug!(id, matched, "updated transaction");
        Ok(matched)
    }

    /// Delete the transaction with the given id.
    /// Returns false when no row has that id; that is not an error.
    pub async fn delete(&self, id: TransactionId) -> Result<bool> {
        let result = sqlx::query("DELETE FROM Transactions WHERE Id = ?")
            .bind(id)
            .execute(&self.pool)
            .await
            .context("Failed to delete transaction")?;

        let matched = result.rows_affected() > 0;
        debug!(id, matched, "deleted transaction");
        Ok(matched)
    }

    /// Get a transaction by id.
    pub async fn find_by_id(&self, id: TransactionId) -> Result<Option<Transaction>> {
        let row = sqlx::query(
            r#"
            SELECT Id, Date, Category, Amount, Type, Description
            FROM Transactions
            WHERE Id = ?
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .context("Failed to fetch transaction")?;

        match row {
            Some(row) => Ok(Some(Self::row_to_transaction(&row)?)),
            None => Ok(None),
        }
    }

    /// List all transactions, newest date first.
    /// Rows sharing a date come back in whatever order SQLite yields them.
    /// Rows that cannot be decoded (e.g. a non-ISO date written by another
    /// tool) are logged and left out.
    pub async fn list_all(&self) -> Result<Vec<Transaction>> {
        let rows = sqlx::query(
            r#"
            SELECT Id, Date, Category, Amount, Type, Description
            FROM Transactions
            ORDER BY Date DESC
            "#,
        )
        .fetch_all(&self.pool)
        .await
        .context("Failed to list transactions")?;

        Ok(rows
            .iter()
            .filter_map(|row| match Self::row_to_transaction(row) {
                Ok(tx) => Some(tx),
                Err(err) => {
                    let id: Option<i64> = row.try_get("Id").ok();
                    let reason = format!("{:#}", err);
                    warn!(?id, %reason, "skipping undecodable transaction");
                    None
                }
            })
            .collect())
    }

    /// Sum the amounts of all transactions of one type. Zero when there are none.
    pub async fn sum_by_type(&self, transaction_type: TransactionType) -> Result<Amount> {
        let row = sqlx::query(
            r#"
            SELECT COALESCE(SUM(Amount), 0.0) as total
            FROM Transactions
            WHERE Type = ?
            "#,
        )
        .bind(transaction_type.as_str())
        .fetch_one(&self.pool)
        .await
        .context("Failed to sum transactions")?;

        row.try_get("total").context("Invalid transaction total")
    }

    /// Count all stored transactions.
    pub async fn count(&self) -> Result<i64> {
        let count: i64 = sqlx::query("SELECT COUNT(*) as count FROM Transactions")
            .fetch_one(&self.pool)
            .await
            .context("Failed to count transactions")?
            .get("count");
        Ok(count)
    }

    fn row_to_transaction(row: &sqlx::sqlite::SqliteRow) -> Result<Transaction> {
        let date_str: String = row.try_get("Date").context("Missing transaction date")?;
        let type_str: String = row.try_get("Type").context("Missing transaction type")?;

        Ok(Transaction {
            id: row.try_get("Id").context("Invalid transaction ID")?,
            date: NaiveDate::parse_from_str(&date_str, DATE_FORMAT)
                .with_context(|| format!("Invalid transaction date: {}", date_str))?,
            category: row.try_get("Category").context("Invalid category")?,
            amount: row.try_get("Amount").context("Invalid amount")?,
            transaction_type: TransactionType::from_str(&type_str)
                .ok_or_else(|| anyhow::anyhow!("Invalid transaction type: {}", type_str))?,
            description: row.try_get("Description").context("Invalid description")?,
        })
    }
}
