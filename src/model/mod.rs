//! Types that represent the core data model, such as `Transaction` and `Target`.
mod alert;
mod amount;
mod category;
mod target;
mod transaction;

pub use alert::{Alert, AlertKind, AlertThresholds};
pub use amount::{parse_amount, Amount, AmountError};
pub use category::{
    Lexicon, LexiconEntry, DEFAULT_CATEGORY, EXPENSE_CATEGORIES, INCOME_CATEGORIES,
};
use serde::{Deserialize, Serialize};
pub use target::{keywords_from_name, normalize_keywords, Target, TargetSeed};
pub(crate) use transaction::date_format;
pub use transaction::{parse_date, Transaction, TransactionType, DATE_FORMAT};

/// Everything that is persisted between runs.
#[derive(Default, Debug, Clone, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct BudgetData {
    /// Newest first.
    #[serde(default)]
    pub(crate) transactions: Vec<Transaction>,
    #[serde(default)]
    pub(crate) targets: Vec<Target>,
}

impl BudgetData {
    pub fn new(transactions: Vec<Transaction>, targets: Vec<Target>) -> Self {
        Self {
            transactions,
            targets,
        }
    }

    pub fn transactions(&self) -> &[Transaction] {
        &self.transactions
    }

    pub fn targets(&self) -> &[Target] {
        &self.targets
    }
}
