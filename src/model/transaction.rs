use crate::model::Amount;
use crate::utils;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// The display and storage format of transaction dates, e.g. `18/10/2026`.
pub const DATE_FORMAT: &str = "%d/%m/%Y";

/// Whether money came in or went out.
#[derive(
    Debug,
    Default,
    Clone,
    Copy,
    Eq,
    PartialEq,
    Ord,
    PartialOrd,
    Hash,
    Serialize,
    Deserialize,
    clap::ValueEnum,
)]
#[serde(rename_all = "snake_case")]
pub enum TransactionType {
    #[serde(alias = "pemasukan")]
    #[value(alias = "pemasukan")]
    Income,
    #[default]
    #[serde(alias = "pengeluaran")]
    #[value(alias = "pengeluaran")]
    Expense,
}

serde_plain::derive_display_from_serialize!(TransactionType);
serde_plain::derive_fromstr_from_deserialize!(TransactionType);

/// A single recorded income or expense. Transactions are never edited once created, only
/// deleted.
#[derive(Debug, Clone, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct Transaction {
    #[serde(deserialize_with = "utils::deserialize_id")]
    pub(crate) id: String,
    pub(crate) description: String,
    pub(crate) amount: Amount,
    pub(crate) category: String,
    #[serde(rename = "type")]
    pub(crate) r#type: TransactionType,
    #[serde(with = "date_format")]
    pub(crate) date: NaiveDate,
}

impl Transaction {
    /// Creates a transaction with a freshly generated unique id.
    pub fn new(
        description: impl Into<String>,
        amount: Amount,
        category: impl Into<String>,
        r#type: TransactionType,
        date: NaiveDate,
    ) -> Self {
        Self {
            id: utils::generate_id(),
            description: description.into(),
            amount,
            category: category.into(),
            r#type,
            date,
        }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn amount(&self) -> Amount {
        self.amount
    }

    pub fn category(&self) -> &str {
        &self.category
    }

    pub fn r#type(&self) -> TransactionType {
        self.r#type
    }

    pub fn date(&self) -> NaiveDate {
        self.date
    }

    pub fn is_expense(&self) -> bool {
        self.r#type == TransactionType::Expense
    }

    pub fn is_income(&self) -> bool {
        self.r#type == TransactionType::Income
    }

    /// The date rendered as `DD/MM/YYYY`.
    pub fn date_string(&self) -> String {
        self.date.format(DATE_FORMAT).to_string()
    }
}

/// Parses a `DD/MM/YYYY` date, also accepting ISO `YYYY-MM-DD`.
pub fn parse_date(s: &str) -> Option<NaiveDate> {
    let s = s.trim();
    NaiveDate::parse_from_str(s, DATE_FORMAT)
        .or_else(|_| NaiveDate::parse_from_str(s, "%Y-%m-%d"))
        .ok()
}

pub(crate) mod date_format {
    use super::{parse_date, DATE_FORMAT};
    use chrono::NaiveDate;
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S>(date: &NaiveDate, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&date.format(DATE_FORMAT).to_string())
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<NaiveDate, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        parse_date(&s).ok_or_else(|| serde::de::Error::custom(format!("invalid date '{s}'")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_new_generates_unique_ids() {
        let kopi = || {
            Transaction::new(
                "kopi",
                15000.into(),
                "Makanan",
                TransactionType::Expense,
                date(2026, 10, 18),
            )
        };
        let a = kopi();
        let b = kopi();
        assert_ne!(a.id(), b.id());
        assert!(a.is_expense());
        assert!(!a.is_income());
    }

    #[test]
    fn test_type_names_and_aliases() {
        assert_eq!(TransactionType::Expense.to_string(), "expense");
        assert_eq!(TransactionType::Income.to_string(), "income");
        assert_eq!(
            TransactionType::from_str("pengeluaran").unwrap(),
            TransactionType::Expense
        );
        assert_eq!(
            TransactionType::from_str("pemasukan").unwrap(),
            TransactionType::Income
        );
        assert!(TransactionType::from_str("transfer").is_err());
    }

    #[test]
    fn test_parse_date() {
        assert_eq!(parse_date("18/10/2026"), Some(date(2026, 10, 18)));
        assert_eq!(parse_date("5/1/2026"), Some(date(2026, 1, 5)));
        assert_eq!(parse_date("2026-01-05"), Some(date(2026, 1, 5)));
        assert_eq!(parse_date("yesterday"), None);
    }

    #[test]
    fn test_serialize_shape() {
        let t = Transaction {
            id: "t-1".to_string(),
            description: "makan siang".to_string(),
            amount: 25000.into(),
            category: "Makanan".to_string(),
            r#type: TransactionType::Expense,
            date: date(2026, 3, 7),
        };
        let json = serde_json::to_value(&t).unwrap();
        assert_eq!(json["type"], "expense");
        assert_eq!(json["date"], "07/03/2026");
        assert_eq!(json["amount"], "25000");
    }

    #[test]
    fn test_deserialize_source_app_shape() {
        let json = r#"{
            "id": 1729242342342.5,
            "description": "bensin",
            "amount": 20000,
            "category": "Transport",
            "type": "pengeluaran",
            "date": "18/10/2026"
        }"#;
        let t: Transaction = serde_json::from_str(json).unwrap();
        assert_eq!(t.id(), "1729242342342.5");
        assert_eq!(t.amount(), 20000.into());
        assert_eq!(t.r#type(), TransactionType::Expense);
        assert_eq!(t.date(), date(2026, 10, 18));
        assert_eq!(t.date_string(), "18/10/2026");
    }
}
