use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::Amount;

/// Row id assigned by the store on insert. Never reused after a delete.
pub type TransactionId = i64;

/// Storage format for transaction dates.
pub const DATE_FORMAT: &str = "%Y-%m-%d";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TransactionType {
    Income,
    Expense,
}

impl TransactionType {
    /// The value persisted in the `Type` column.
    pub fn as_str(&self) -> &'static str {
        match self {
            TransactionType::Income => "Income",
            TransactionType::Expense => "Expense",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "income" => Some(TransactionType::Income),
            "expense" => Some(TransactionType::Expense),
            _ => None,
        }
    }
}

impl std::fmt::Display for TransactionType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A transaction that has not been stored yet, or the full set of
/// fields written by an update.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewTransaction {
    pub date: NaiveDate,
    pub category: String,
    pub amount: Amount,
    pub transaction_type: TransactionType,
    pub description: Option<String>,
}

impl NewTransaction {
    pub fn new(
        date: NaiveDate,
        category: impl Into<String>,
        amount: Amount,
        transaction_type: TransactionType,
    ) -> Self {
        Self {
            date,
            category: category.into(),
            amount,
            transaction_type,
            description: None,
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn with_id(self, id: TransactionId) -> Transaction {
        Transaction {
            id,
            date: self.date,
            category: self.category,
            amount: self.amount,
            transaction_type: self.transaction_type,
            description: self.description,
        }
    }
}

/// One dated income or expense record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Transaction {
    pub id: TransactionId,
    pub date: NaiveDate,
    pub category: String,
    pub amount: Amount,
    pub transaction_type: TransactionType,
    pub description: Option<String>,
}

impl Transaction {
    pub fn is_income(&self) -> bool {
        self.transaction_type == TransactionType::Income
    }

    pub fn date_string(&self) -> String {
        self.date.format(DATE_FORMAT).to_string()
    }

    /// The editable fields of this row, e.g. as the base of a full-row update.
    pub fn to_new(&self) -> NewTransaction {
        NewTransaction {
            date: self.date,
            category: self.category.clone(),
            amount: self.amount,
            transaction_type: self.transaction_type,
            description: self.description.clone(),
        }
    }
}
