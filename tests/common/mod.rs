#![allow(dead_code)]

use anyhow::Result;
use budget_ledger::application::LedgerService;
use budget_ledger::domain::TransactionInput;
use budget_ledger::storage::Repository;
use chrono::NaiveDate;
use tempfile::TempDir;

/// Helper to create a test service with a temporary database
pub async fn test_service() -> Result<(LedgerService, TempDir)> {
    let temp_dir = TempDir::new()?;
    let db_path = temp_dir.path().join("test.db");
    let service = LedgerService::init(db_path.to_str().unwrap()).await?;
    Ok((service, temp_dir))
}

/// Helper to create a test repository with a temporary database
pub async fn test_repository() -> Result<(Repository, TempDir)> {
    let temp_dir = TempDir::new()?;
    let db_url = database_url(&temp_dir);
    let repo = Repository::init(&db_url).await?;
    Ok((repo, temp_dir))
}

/// SQLite URL for the test database inside `temp_dir`
pub fn database_url(temp_dir: &TempDir) -> String {
    format!("sqlite:{}?mode=rwc", temp_dir.path().join("test.db").display())
}

/// Second connection to the test database, for writing rows the ledger
/// itself would never produce
pub async fn raw_pool(temp_dir: &TempDir) -> Result<sqlx::SqlitePool> {
    Ok(sqlx::SqlitePool::connect(&database_url(temp_dir)).await?)
}

/// Helper to parse a date string into a NaiveDate
pub fn parse_date(date_str: &str) -> NaiveDate {
    NaiveDate::parse_from_str(date_str, "%Y-%m-%d").unwrap()
}

/// Fully specified input for `LedgerService::save`
pub fn input(date: &str, category: &str, amount: &str, transaction_type: &str) -> TransactionInput {
    TransactionInput::new(amount)
        .date(parse_date(date))
        .category(category)
        .transaction_type(transaction_type)
}
