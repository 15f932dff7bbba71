//! The budgeting engine: classification, bulk entry, reconciliation and the `Budget` pipeline
//! that ties them together.
//!
//! Every mutation of a `Budget` is followed by a full reconciliation so that the `spent` value of
//! each target always reflects the current transaction list.
mod bulk;
mod classify;
mod reconcile;

pub use bulk::process_bulk;
pub use classify::Classifier;
pub use reconcile::{evaluate_alerts, reconcile};

use crate::model::{
    normalize_keywords, Alert, AlertThresholds, Amount, BudgetData, Target, TargetSeed,
    Transaction, TransactionType, DEFAULT_CATEGORY, EXPENSE_CATEGORIES, INCOME_CATEGORIES,
};
use crate::Result;
use anyhow::{bail, ensure};
use chrono::NaiveDate;
use std::collections::HashSet;
use tracing::debug;

/// The in-memory transaction and target lists plus the rules used to classify and alert.
#[derive(Debug, Clone)]
pub struct Budget {
    transactions: Vec<Transaction>,
    targets: Vec<Target>,
    classifier: Classifier,
    thresholds: AlertThresholds,
}

impl Budget {
    /// Builds a budget from stored data. Stored `spent` values are recomputed.
    pub fn new(data: BudgetData, classifier: Classifier, thresholds: AlertThresholds) -> Self {
        let mut budget = Self {
            transactions: data.transactions,
            targets: data.targets,
            classifier,
            thresholds,
        };
        budget.reconcile();
        budget
    }

    /// Builds an empty budget holding the given seed targets.
    pub fn seeded(
        seeds: Vec<TargetSeed>,
        classifier: Classifier,
        thresholds: AlertThresholds,
    ) -> Self {
        let targets = seeds.into_iter().map(TargetSeed::into_target).collect();
        Self::new(BudgetData::new(Vec::new(), targets), classifier, thresholds)
    }

    /// Newest first.
    pub fn transactions(&self) -> &[Transaction] {
        &self.transactions
    }

    pub fn targets(&self) -> &[Target] {
        &self.targets
    }

    pub fn classifier(&self) -> &Classifier {
        &self.classifier
    }

    pub fn thresholds(&self) -> &AlertThresholds {
        &self.thresholds
    }

    /// A copy of the lists for persistence.
    pub fn data(&self) -> BudgetData {
        BudgetData::new(self.transactions.clone(), self.targets.clone())
    }

    pub fn classify(&self, description: &str) -> String {
        self.classifier.classify(description, &self.targets)
    }

    pub fn alerts(&self) -> Vec<Alert> {
        evaluate_alerts(&self.targets, &self.thresholds)
    }

    /// The categories a transaction of type `r#type` may be filed under. For expenses these are
    /// the built-in categories followed by any target names not already among them.
    pub fn known_categories(&self, r#type: TransactionType) -> Vec<String> {
        match r#type {
            TransactionType::Income => INCOME_CATEGORIES.iter().map(|s| s.to_string()).collect(),
            TransactionType::Expense => {
                let mut categories: Vec<String> =
                    EXPENSE_CATEGORIES.iter().map(|s| s.to_string()).collect();
                for target in &self.targets {
                    if !categories.iter().any(|c| c == target.name()) {
                        categories.push(target.name().to_string());
                    }
                }
                categories
            }
        }
    }

    /// Records a single transaction at the front of the list. An omitted expense category is
    /// found by the classifier, an omitted income category is `Lainnya`.
    pub fn add_transaction(
        &mut self,
        description: &str,
        amount: Amount,
        r#type: TransactionType,
        category: Option<&str>,
        date: NaiveDate,
    ) -> Result<Transaction> {
        let description = description.trim();
        ensure!(!description.is_empty(), "A description is required");
        ensure!(
            amount.is_positive(),
            "The amount must be greater than zero, got {amount}"
        );

        let category = match category.map(str::trim) {
            Some(c) => {
                let known = self.known_categories(r#type);
                if !known.iter().any(|k| k == c) {
                    bail!(
                        "Unknown {} category '{c}', expected one of: {}",
                        r#type,
                        known.join(", ")
                    );
                }
                c.to_string()
            }
            None => match r#type {
                TransactionType::Expense => self.classify(description),
                TransactionType::Income => DEFAULT_CATEGORY.to_string(),
            },
        };

        let transaction = Transaction::new(description, amount, category, r#type, date);
        debug!(
            "Adding {} transaction '{}' in {}",
            transaction.r#type(),
            transaction.description(),
            transaction.category()
        );
        self.transactions.insert(0, transaction.clone());
        self.reconcile();
        Ok(transaction)
    }

    /// Runs bulk input through the line processor and prepends the result, keeping the input
    /// order among the new transactions. Returns the transactions that were added.
    pub fn add_bulk(&mut self, raw: &str, today: NaiveDate) -> Vec<Transaction> {
        let added = process_bulk(raw, &self.targets, &self.classifier, today);
        if !added.is_empty() {
            self.transactions.splice(0..0, added.iter().cloned());
            self.reconcile();
        }
        added
    }

    pub fn delete_transaction(&mut self, id: &str) -> Result<Transaction> {
        let mut removed = self.delete_transactions(&[id])?;
        removed.pop().ok_or_else(|| anyhow::anyhow!("Transaction not found: {id}"))
    }

    /// Removes every listed transaction, or none of them if any id is unknown.
    pub fn delete_transactions<S: AsRef<str>>(&mut self, ids: &[S]) -> Result<Vec<Transaction>> {
        let ids: HashSet<&str> = ids.iter().map(|s| s.as_ref()).collect();
        let mut missing: Vec<&str> = ids
            .iter()
            .filter(|id| !self.transactions.iter().any(|t| t.id() == **id))
            .copied()
            .collect();
        if !missing.is_empty() {
            missing.sort_unstable();
            bail!("Transaction not found: {}", missing.join(", "));
        }

        let (removed, kept): (Vec<Transaction>, Vec<Transaction>) =
            std::mem::take(&mut self.transactions)
                .into_iter()
                .partition(|t| ids.contains(t.id()));
        self.transactions = kept;
        self.reconcile();
        Ok(removed)
    }

    /// Appends a new target whose keywords are the words of its name.
    pub fn add_target(&mut self, name: &str, amount: Amount) -> Result<Target> {
        let name = name.trim();
        ensure!(!name.is_empty(), "A target name is required");
        ensure!(
            amount.is_positive(),
            "The target amount must be greater than zero, got {amount}"
        );
        ensure!(
            !self.targets.iter().any(|t| t.name() == name),
            "A target named '{name}' already exists"
        );
        self.targets.push(Target::new(name, amount));
        self.reconcile();
        self.target_by_name(name)
    }

    pub fn update_target_amount(&mut self, id: &str, amount: Amount) -> Result<Target> {
        ensure!(
            amount.is_positive(),
            "The target amount must be greater than zero, got {amount}"
        );
        let target = self.target_mut(id)?;
        target.target_amount = amount;
        Ok(target.clone())
    }

    pub fn set_target_keywords<I, S>(&mut self, id: &str, keywords: I) -> Result<Target>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let keywords = normalize_keywords(keywords);
        let target = self.target_mut(id)?;
        target.keywords = keywords;
        Ok(target.clone())
    }

    pub fn delete_target(&mut self, id: &str) -> Result<Target> {
        match self.targets.iter().position(|t| t.id() == id) {
            Some(ix) => Ok(self.targets.remove(ix)),
            None => bail!("Target not found: {id}"),
        }
    }

    /// Removes every listed target, or none of them if any id is unknown.
    pub fn delete_targets<S: AsRef<str>>(&mut self, ids: &[S]) -> Result<Vec<Target>> {
        let ids: HashSet<&str> = ids.iter().map(|s| s.as_ref()).collect();
        let mut missing: Vec<&str> = ids
            .iter()
            .filter(|id| !self.targets.iter().any(|t| t.id() == **id))
            .copied()
            .collect();
        if !missing.is_empty() {
            missing.sort_unstable();
            bail!("Target not found: {}", missing.join(", "));
        }

        let (removed, kept): (Vec<Target>, Vec<Target>) = std::mem::take(&mut self.targets)
            .into_iter()
            .partition(|t| ids.contains(t.id()));
        self.targets = kept;
        Ok(removed)
    }

    fn target_mut(&mut self, id: &str) -> Result<&mut Target> {
        match self.targets.iter_mut().find(|t| t.id() == id) {
            Some(t) => Ok(t),
            None => bail!("Target not found: {id}"),
        }
    }

    fn target_by_name(&self, name: &str) -> Result<Target> {
        match self.targets.iter().find(|t| t.name() == name) {
            Some(t) => Ok(t.clone()),
            None => bail!("Target not found: {name}"),
        }
    }

    fn reconcile(&mut self) {
        self.targets = reconcile(&self.transactions, &self.targets);
        for t in &self.targets {
            debug!("Target {} spent {} of {}", t.name(), t.spent(), t.target_amount());
        }
    }
}
