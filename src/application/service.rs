use chrono::{Local, NaiveDate};
use serde::Serialize;
use tracing::{debug, info, warn};

use crate::domain::{
    Amount, NewTransaction, Transaction, TransactionId, TransactionInput, TransactionType,
    ValidationWarning,
};
use crate::storage::Repository;

use super::AppError;

/// Optional check applied to amounts before they are stored.
/// The default stores whatever was entered; amounts are never negated.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum AmountPolicy {
    #[default]
    AsEntered,
    /// Reject negative amounts for both income and expenses.
    NonNegative,
}

impl AmountPolicy {
    pub fn check(&self, amount: Amount) -> Result<(), AppError> {
        match self {
            AmountPolicy::AsEntered => Ok(()),
            AmountPolicy::NonNegative if amount < 0.0 => Err(AppError::InvalidAmount {
                amount,
                reason: "amount must not be negative".to_string(),
            }),
            AmountPolicy::NonNegative => Ok(()),
        }
    }
}

/// The ledger as a front end renders it: every transaction plus the totals.
#[derive(Debug, Clone, Serialize)]
pub struct LedgerSnapshot {
    pub transactions: Vec<Transaction>,
    pub total_income: Amount,
    pub total_expense: Amount,
    pub balance: Amount,
}

/// What `save` did with the row.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SaveAction {
    Inserted,
    Updated,
    /// An update was requested for an id that does not exist.
    NoMatch,
}

/// Result of saving a transaction
pub struct SaveOutcome {
    pub id: TransactionId,
    pub action: SaveAction,
    pub warnings: Vec<ValidationWarning>,
    /// Ledger state after the write; `None` if reading it back failed.
    /// The write itself has been committed either way.
    pub snapshot: Option<LedgerSnapshot>,
}

/// Application service providing the ledger operations a front end needs.
pub struct LedgerService {
    repo: Repository,
    policy: AmountPolicy,
}

impl LedgerService {
    /// Create a new ledger service with the given repository.
    pub fn new(repo: Repository) -> Self {
        Self {
            repo,
            policy: AmountPolicy::default(),
        }
    }

    /// Open the database at the given path, creating the file and the
    /// transactions table when they are missing.
    pub async fn init(database_path: &str) -> Result<Self, AppError> {
        let db_url = format!("sqlite:{}?mode=rwc", database_path);
        let repo = Repository::init(&db_url).await?;
        Ok(Self::new(repo))
    }

    pub fn with_amount_policy(mut self, policy: AmountPolicy) -> Self {
        self.policy = policy;
        self
    }

    pub fn amount_policy(&self) -> AmountPolicy {
        self.policy
    }

    /// List all transactions, newest date first.
    pub async fn list_all(&self) -> Result<Vec<Transaction>, AppError> {
        Ok(self.repo.list_all().await?)
    }

    /// Get a transaction by id.
    pub async fn find_by_id(&self, id: TransactionId) -> Result<Option<Transaction>, AppError> {
        Ok(self.repo.find_by_id(id).await?)
    }

    /// Income minus expenses over the whole ledger, read fresh from the store.
    pub async fn compute_balance(&self) -> Result<Amount, AppError> {
        let income = self.repo.sum_by_type(TransactionType::Income).await?;
        let expense = self.repo.sum_by_type(TransactionType::Expense).await?;
        Ok(income - expense)
    }

    /// Current transactions and totals.
    pub async fn snapshot(&self) -> Result<LedgerSnapshot, AppError> {
        let transactions = self.repo.list_all().await?;
        let total_income = self.repo.sum_by_type(TransactionType::Income).await?;
        let total_expense = self.repo.sum_by_type(TransactionType::Expense).await?;

        Ok(LedgerSnapshot {
            transactions,
            total_income,
            total_expense,
            balance: total_income - total_expense,
        })
    }

    /// Insert a transaction, or overwrite the one with `id` when given.
    ///
    /// Missing or malformed fields are defaulted rather than rejected; each
    /// default applied is reported in the outcome's warnings.
    pub async fn save(
        &self,
        input: TransactionInput,
        id: Option<TransactionId>,
    ) -> Result<SaveOutcome, AppError> {
        self.save_on(input, id, Local::now().date_naive()).await
    }

    /// Same as [`save`](Self::save), with `today` used for a missing date.
    pub async fn save_on(
        &self,
        input: TransactionInput,
        id: Option<TransactionId>,
        today: NaiveDate,
    ) -> Result<SaveOutcome, AppError> {
        let (transaction, warnings) = input.normalize(today);
        for warning in &warnings {
            warn!(%warning, "transaction input defaulted");
        }

        self.policy.check(transaction.amount)?;

        let (id, action) = match id {
            Some(id) => (id, self.update(id, &transaction).await?),
            None => {
                let id = self.repo.insert(&transaction).await?;
                info!(id, category = %transaction.category, amount = transaction.amount, "recorded transaction");
                (id, SaveAction::Inserted)
            }
        };

        Ok(SaveOutcome {
            id,
            action,
            warnings,
            snapshot: self.refresh().await,
        })
    }

    async fn update(
        &self,
        id: TransactionId,
        transaction: &NewTransaction,
    ) -> Result<SaveAction, AppError> {
        if self.repo.update(id, transaction).await? {
            info!(id, "updated transaction");
            Ok(SaveAction::Updated)
        } else {
            debug!(id, "update matched no transaction");
            Ok(SaveAction::NoMatch)
        }
    }

    /// Delete a transaction. Deleting an id that does not exist is a no-op.
    ///
    /// Returns the ledger state after the delete, or `None` if reading it
    /// back failed; an error means the delete itself did not happen.
    pub async fn remove(&self, id: TransactionId) -> Result<Option<LedgerSnapshot>, AppError> {
        if self.repo.delete(id).await? {
            info!(id, "removed transaction");
        } else {
            debug!(id, "remove matched no transaction");
        }
        Ok(self.refresh().await)
    }

    /// Snapshot taken after a committed write. Failures are logged, not returned.
    async fn refresh(&self) -> Option<LedgerSnapshot> {
        match self.snapshot().await {
            Ok(snapshot) => Some(snapshot),
            Err(err) => {
                warn!(error = %err, "failed to reload ledger after write");
                None
            }
        }
    }

    /// Number of stored transactions.
    pub async fn count(&self) -> Result<i64, AppError> {
        Ok(self.repo.count().await?)
    }
}
