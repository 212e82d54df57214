mod repository;

pub use repository::*;

/// SQL for the transactions table. Safe to run on every startup.
pub const MIGRATION_001_TRANSACTIONS: &str = include_str!("migrations/001_transactions.sql");
