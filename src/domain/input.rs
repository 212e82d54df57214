use chrono::NaiveDate;
use thiserror::Error;

use super::{coerce_amount, NewTransaction, TransactionType};

/// Category used when the input leaves it empty.
pub const DEFAULT_CATEGORY: &str = "Inne";

/// Type used when the input leaves it empty or unrecognized.
pub const DEFAULT_TRANSACTION_TYPE: TransactionType = TransactionType::Expense;

/// Advisory problems found while normalizing user input.
/// None of them rejects the input; each one names the default that was applied.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ValidationWarning {
    #[error("Amount '{0}' is not a number, using 0")]
    UnparsableAmount(String),

    #[error("No category given, using '{}'", DEFAULT_CATEGORY)]
    MissingCategory,

    #[error("No transaction type given, using '{}'", DEFAULT_TRANSACTION_TYPE.as_str())]
    MissingType,

    #[error("Unknown transaction type '{0}', using '{default}'", default = DEFAULT_TRANSACTION_TYPE.as_str())]
    UnknownType(String),

    #[error("No date given, using {0}")]
    MissingDate(NaiveDate),
}

/// Raw values as a front end collects them, before any defaulting.
#[derive(Debug, Clone, Default)]
pub struct TransactionInput {
    pub date: Option<NaiveDate>,
    pub category: Option<String>,
    pub amount: String,
    pub transaction_type: Option<String>,
    pub description: Option<String>,
}

impl TransactionInput {
    pub fn new(amount: impl Into<String>) -> Self {
        Self {
            amount: amount.into(),
            ..Default::default()
        }
    }

    pub fn date(mut self, date: NaiveDate) -> Self {
        self.date = Some(date);
        self
    }

    pub fn category(mut self, category: impl Into<String>) -> Self {
        self.category = Some(category.into());
        self
    }

    pub fn transaction_type(mut self, transaction_type: impl Into<String>) -> Self {
        self.transaction_type = Some(transaction_type.into());
        self
    }

    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Build a storable transaction, defaulting missing or invalid fields.
    /// `today` is used when no date was given.
    pub fn normalize(self, today: NaiveDate) -> (NewTransaction, Vec<ValidationWarning>) {
        let mut warnings = Vec::new();

        let date = self.date.unwrap_or_else(|| {
            warnings.push(ValidationWarning::MissingDate(today));
            today
        });

        let category = match self.category.as_deref().map(str::trim) {
            Some(category) if !category.is_empty() => category.to_string(),
            _ => {
                warnings.push(ValidationWarning::MissingCategory);
                DEFAULT_CATEGORY.to_string()
            }
        };

        let (amount, coerced) = coerce_amount(&self.amount);
        if coerced {
            warnings.push(ValidationWarning::UnparsableAmount(self.amount.clone()));
        }

        let transaction_type = match self.transaction_type.as_deref().map(str::trim) {
            None | Some("") => {
                warnings.push(ValidationWarning::MissingType);
                DEFAULT_TRANSACTION_TYPE
            }
            Some(raw) => TransactionType::from_str(raw).unwrap_or_else(|| {
                warnings.push(ValidationWarning::UnknownType(raw.to_string()));
                DEFAULT_TRANSACTION_TYPE
            }),
        };

        (
            NewTransaction {
                date,
                category,
                amount,
                transaction_type,
                description: self.description,
            },
            warnings,
        )
    }
}

impl From<NewTransaction> for TransactionInput {
    fn from(tx: NewTransaction) -> Self {
        Self {
            date: Some(tx.date),
            category: Some(tx.category),
            amount: tx.amount.to_string(),
            transaction_type: Some(tx.transaction_type.as_str().to_string()),
            description: tx.description,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 3, 10).unwrap()
    }

    #[test]
    fn test_complete_input_has_no_warnings() {
        let date = NaiveDate::from_ymd_opt(2024, 1, 5).unwrap();
        let (tx, warnings) = TransactionInput::new("42.5")
            .date(date)
            .category("Jedzenie")
            .transaction_type("Income")
            .description("lunch")
            .normalize(today());

        assert!(warnings.is_empty());
        assert_eq!(tx.date, date);
        assert_eq!(tx.category, "Jedzenie");
        assert_eq!(tx.amount, 42.5);
        assert_eq!(tx.transaction_type, TransactionType::Income);
        assert_eq!(tx.description.as_deref(), Some("lunch"));
    }

    #[test]
    fn test_unparsable_amount_becomes_zero() {
        let (tx, warnings) = TransactionInput::new("abc")
            .date(today())
            .category("Paliwo")
            .transaction_type("Expense")
            .normalize(today());

        assert_eq!(tx.amount, 0.0);
        assert_eq!(
            warnings,
            vec![ValidationWarning::UnparsableAmount("abc".to_string())]
        );
    }

    #[test]
    fn test_missing_fields_get_defaults() {
        let (tx, warnings) = TransactionInput::new("10").normalize(today());

        assert_eq!(tx.date, today());
        assert_eq!(tx.category, DEFAULT_CATEGORY);
        assert_eq!(tx.transaction_type, TransactionType::Expense);
        assert_eq!(tx.description, None);
        assert_eq!(
            warnings,
            vec![
                ValidationWarning::MissingDate(today()),
                ValidationWarning::MissingCategory,
                ValidationWarning::MissingType,
            ]
        );
    }

    #[test]
    fn test_blank_category_is_defaulted() {
        let (tx, warnings) = TransactionInput::new("10")
            .date(today())
            .category("   ")
            .transaction_type("Income")
            .normalize(today());

        assert_eq!(tx.category, "Inne");
        assert_eq!(warnings, vec![ValidationWarning::MissingCategory]);
    }

    #[test]
    fn test_free_text_category_is_accepted() {
        let (tx, warnings) = TransactionInput::new("10")
            .date(today())
            .category("Kot")
            .transaction_type("Expense")
            .normalize(today());

        assert_eq!(tx.category, "Kot");
        assert!(warnings.is_empty());
    }

    #[test]
    fn test_unknown_type_defaults_to_expense() {
        let (tx, warnings) = TransactionInput::new("10")
            .date(today())
            .category("Inne")
            .transaction_type("Transfer")
            .normalize(today());

        assert_eq!(tx.transaction_type, TransactionType::Expense);
        assert_eq!(
            warnings,
            vec![ValidationWarning::UnknownType("Transfer".to_string())]
        );
    }

    #[test]
    fn test_negative_amount_is_kept() {
        let (tx, warnings) = TransactionInput::new("-15.5")
            .date(today())
            .category("Inne")
            .transaction_type("Income")
            .normalize(today());

        assert_eq!(tx.amount, -15.5);
        assert!(warnings.is_empty());
    }

    #[test]
    fn test_description_is_kept_as_entered() {
        let (tx, _) = TransactionInput::new("1").description("").normalize(today());
        assert_eq!(tx.description.as_deref(), Some(""));

        let (tx, _) = TransactionInput::new("1").normalize(today());
        assert_eq!(tx.description, None);
    }
}
