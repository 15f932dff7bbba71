use crate::engine::Classifier;
use crate::model::{parse_amount, Target, Transaction, TransactionType};
use chrono::NaiveDate;
use tracing::debug;

/// Turns free-text bulk input into expense transactions.
///
/// Each non-blank line is `description,amount[,ignored...]`. Lines without both parts, with an
/// empty description, or with an amount that does not parse to a positive number are dropped.
/// Every transaction is an expense dated `today`, categorized by `classifier` against `targets`,
/// and returned in input order.
pub fn process_bulk(
    raw: &str,
    targets: &[Target],
    classifier: &Classifier,
    today: NaiveDate,
) -> Vec<Transaction> {
    let mut out = Vec::new();
    for (ix, line) in raw.split('\n').enumerate() {
        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        match parse_line(line, targets, classifier, today) {
            Some(t) => out.push(t),
            None => debug!("Dropping bulk line {}: '{line}'", ix + 1),
        }
    }
    debug!("Bulk input produced {} transaction(s)", out.len());
    out
}

fn parse_line(
    line: &str,
    targets: &[Target],
    classifier: &Classifier,
    today: NaiveDate,
) -> Option<Transaction> {
    let mut parts = line.split(',').map(str::trim);
    let description = parts.next()?;
    let amount = parse_amount(parts.next()?)?;
    if description.is_empty() || !amount.is_positive() {
        return None;
    }
    let category = classifier.classify(description, targets);
    Some(Transaction::new(
        description,
        amount,
        category,
        TransactionType::Expense,
        today,
    ))
}
