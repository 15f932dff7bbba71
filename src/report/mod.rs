//! Read-only views over the transaction and target lists: filtering, totals, category breakdown,
//! the weekly series, target progress and CSV export.
mod export;

pub use export::{export_csv, CSV_HEADERS};

use crate::model::{Amount, Target, Transaction, DATE_FORMAT};
use crate::Result;
use anyhow::Context;
use chrono::{Datelike, Duration, NaiveDate};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Weekday names indexed by days from Sunday.
const DAY_NAMES: [&str; 7] = [
    "Minggu", "Senin", "Selasa", "Rabu", "Kamis", "Jumat", "Sabtu",
];

/// Narrows a transaction list. Unset fields match everything.
#[derive(Debug, Clone, Default, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct TransactionFilter {
    /// Inclusive.
    pub start: Option<NaiveDate>,
    /// Inclusive.
    pub end: Option<NaiveDate>,
    /// Case-insensitive substring of the description or the category.
    pub query: Option<String>,
    /// Exact category name.
    pub category: Option<String>,
}

impl TransactionFilter {
    pub fn matches(&self, t: &Transaction) -> bool {
        if let Some(start) = self.start {
            if t.date() < start {
                return false;
            }
        }
        if let Some(end) = self.end {
            if t.date() > end {
                return false;
            }
        }
        if let Some(query) = self.query.as_deref().filter(|q| !q.is_empty()) {
            let query = query.to_lowercase();
            if !t.description().to_lowercase().contains(&query)
                && !t.category().to_lowercase().contains(&query)
            {
                return false;
            }
        }
        match self.category.as_deref() {
            Some(category) => t.category() == category,
            None => true,
        }
    }

    /// The matching transactions, in list order.
    pub fn apply<'a>(&self, transactions: &'a [Transaction]) -> Vec<&'a Transaction> {
        transactions.iter().filter(|t| self.matches(t)).collect()
    }
}

#[derive(Debug, Clone, Copy, Default, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct Totals {
    pub income: Amount,
    pub expense: Amount,
    /// Income minus expense.
    pub balance: Amount,
}

impl Totals {
    pub fn new<'a>(transactions: impl IntoIterator<Item = &'a Transaction>) -> Self {
        let (mut income, mut expense) = (Amount::ZERO, Amount::ZERO);
        for t in transactions {
            if t.is_income() {
                income = income + t.amount();
            } else {
                expense = expense + t.amount();
            }
        }
        Self {
            income,
            expense,
            balance: income - expense,
        }
    }
}

#[derive(Debug, Clone, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct CategoryTotal {
    pub category: String,
    pub amount: Amount,
}

/// Expense totals per category, in order of each category's first appearance.
pub fn category_breakdown<'a>(
    transactions: impl IntoIterator<Item = &'a Transaction>,
) -> Vec<CategoryTotal> {
    let mut out: Vec<CategoryTotal> = Vec::new();
    for t in transactions.into_iter().filter(|t| t.is_expense()) {
        match out.iter_mut().find(|c| c.category == t.category()) {
            Some(c) => c.amount = c.amount + t.amount(),
            None => out.push(CategoryTotal {
                category: t.category().to_string(),
                amount: t.amount(),
            }),
        }
    }
    out
}

#[derive(Debug, Clone, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct DayTotal {
    #[serde(with = "crate::model::date_format")]
    pub date: NaiveDate,
    /// Indonesian weekday name, e.g. `Senin`.
    pub day_name: String,
    /// Day and month without padding, e.g. `7/3`.
    pub label: String,
    pub income: Amount,
    pub expense: Amount,
}

#[derive(Debug, Clone, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct WeeklyReport {
    pub start: String,
    pub end: String,
    pub days: Vec<DayTotal>,
}

/// Seven consecutive days of income and expense ending `7 * offset` days before `today`.
///
/// # Errors
/// Returns an error when the window would start before the earliest date chrono can represent.
pub fn weekly(transactions: &[Transaction], today: NaiveDate, offset: u32) -> Result<WeeklyReport> {
    let back = Duration::try_days(i64::from(offset) * 7 + 6)
        .with_context(|| format!("A week offset of {offset} is out of range"))?;
    let first = today
        .checked_sub_signed(back)
        .with_context(|| format!("A week offset of {offset} is out of range"))?;
    let days: Vec<DayTotal> = first
        .iter_days()
        .take(7)
        .map(|date| {
            let on_day = transactions.iter().filter(|t| t.date() == date);
            let totals = Totals::new(on_day);
            DayTotal {
                date,
                day_name: DAY_NAMES[date.weekday().num_days_from_sunday() as usize].to_string(),
                label: format!("{}/{}", date.day(), date.month()),
                income: totals.income,
                expense: totals.expense,
            }
        })
        .collect();
    let last = first + Duration::days(6);
    Ok(WeeklyReport {
        start: first.format(DATE_FORMAT).to_string(),
        end: last.format(DATE_FORMAT).to_string(),
        days,
    })
}

#[derive(Debug, Clone, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct TargetProgress {
    pub id: String,
    pub name: String,
    pub target: Amount,
    pub spent: Amount,
    /// Rounded to a whole number; absent when the target has no ceiling.
    pub percentage: Option<Decimal>,
    pub remaining: Amount,
}

pub fn target_progress(targets: &[Target]) -> Vec<TargetProgress> {
    targets
        .iter()
        .map(|t| TargetProgress {
            id: t.id().to_string(),
            name: t.name().to_string(),
            target: t.target_amount(),
            spent: t.spent(),
            percentage: t.rounded_percentage().map(|p| p.normalize()),
            remaining: t.target_amount() - t.spent(),
        })
        .collect()
}
