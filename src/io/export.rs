use anyhow::Result;
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::io::Write;

use crate::application::LedgerService;
use crate::domain::{Amount, Transaction};

/// Full ledger dump written by the JSON export
#[derive(Debug, Clone, Serialize)]
pub struct LedgerExport {
    pub version: String,
    pub exported_at: DateTime<Utc>,
    pub total_income: Amount,
    pub total_expense: Amount,
    pub balance: Amount,
    pub transactions: Vec<Transaction>,
}

/// Exporter for writing the ledger out in portable formats
pub struct Exporter<'a> {
    service: &'a LedgerService,
}

impl<'a> Exporter<'a> {
    pub fn new(service: &'a LedgerService) -> Self {
        Self { service }
    }

    /// Export transactions to CSV, newest first. Returns the row count.
    pub async fn export_transactions_csv<W: Write>(&self, writer: W) -> Result<usize> {
        let transactions = self.service.list_all().await?;
        let mut csv_writer = csv::Writer::from_writer(writer);

        csv_writer.write_record(["id", "date", "category", "amount", "type", "description"])?;

        for tx in &transactions {
            csv_writer.write_record(&[
                tx.id.to_string(),
                tx.date_string(),
                tx.category.clone(),
                tx.amount.to_string(),
                tx.transaction_type.as_str().to_string(),
                tx.description.clone().unwrap_or_default(),
            ])?;
        }

        csv_writer.flush()?;
        Ok(transactions.len())
    }

    /// Export the whole ledger with its totals as pretty-printed JSON.
    pub async fn export_json<W: Write>(&self, mut writer: W) -> Result<LedgerExport> {
        let snapshot = self.service.snapshot().await?;

        let export = LedgerExport {
            version: env!("CARGO_PKG_VERSION").to_string(),
            exported_at: Utc::now(),
            total_income: snapshot.total_income,
            total_expense: snapshot.total_expense,
            balance: snapshot.balance,
            transactions: snapshot.transactions,
        };

        let json = serde_json::to_string_pretty(&export)?;
        writer.write_all(json.as_bytes())?;
        writer.flush()?;

        Ok(export)
    }
}
