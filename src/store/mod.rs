//! Persistence of the transaction and target lists.
//!
//! The engine never knows which backend is active. `Config` selects one from `config.json` and
//! hands it out as an `Arc<dyn Store>`.

mod json;

pub use json::JsonStore;

use crate::model::BudgetData;
use crate::Result;
use serde::{Deserialize, Serialize};
use std::fmt::Debug;

/// Loads and saves the complete budget data.
#[async_trait::async_trait]
pub trait Store: Debug + Send + Sync {
    /// Returns `None` when nothing has ever been saved, in which case the caller seeds the default
    /// targets.
    async fn load(&self) -> Result<Option<BudgetData>>;

    /// Replaces everything previously stored with `data`.
    async fn save(&self, data: &BudgetData) -> Result<()>;
}

/// Which `Store` implementation holds the data.
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
pub enum StoreBackend {
    /// A SQLite database, `dompet.sqlite`.
    #[default]
    Sqlite,
    /// A single JSON document, `dompet.json`.
    Json,
}

serde_plain::derive_display_from_serialize!(StoreBackend);
serde_plain::derive_fromstr_from_deserialize!(StoreBackend);

impl StoreBackend {
    /// The name of the store file inside the home directory.
    pub fn file_name(&self) -> &'static str {
        match self {
            StoreBackend::Sqlite => "dompet.sqlite",
            StoreBackend::Json => "dompet.json",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::Db;
    use crate::model::{Amount, Target, TargetSeed, Transaction, TransactionType};
    use chrono::NaiveDate;
    use tempfile::TempDir;

    fn sample() -> BudgetData {
        let d = NaiveDate::from_ymd_opt(2026, 10, 18).unwrap();
        let transactions = vec![
            Transaction::new("kopi", Amount::from(15_000), "Makanan", TransactionType::Expense, d),
            Transaction::new(
                "gaji",
                "8.5jt".parse().unwrap(),
                "Gaji",
                TransactionType::Income,
                d.pred_opt().unwrap(),
            ),
            Transaction::new(
                "nabung",
                Amount::from(250_000),
                "Tabungan",
                TransactionType::Expense,
                d,
            ),
        ];
        let mut targets: Vec<Target> = TargetSeed::defaults()
            .into_iter()
            .map(TargetSeed::into_target)
            .collect();
        targets.push(Target::new("Dana Darurat", Amount::from(3_000_000)));
        BudgetData::new(transactions, targets)
    }

    async fn round_trip(store: &dyn Store) {
        assert!(store.load().await.unwrap().is_none());
        let data = sample();
        store.save(&data).await.unwrap();
        let loaded = store.load().await.unwrap().unwrap();
        assert_eq!(loaded, data);

        let emptied = BudgetData::default();
        store.save(&emptied).await.unwrap();
        assert_eq!(store.load().await.unwrap(), Some(emptied));
    }

    #[tokio::test]
    async fn test_json_round_trip() {
        let dir = TempDir::new().unwrap();
        let store = JsonStore::new(dir.path().join(StoreBackend::Json.file_name()));
        round_trip(&store).await;
    }

    #[tokio::test]
    async fn test_sqlite_round_trip() {
        let dir = TempDir::new().unwrap();
        let store = Db::init(dir.path().join(StoreBackend::Sqlite.file_name()))
            .await
            .unwrap();
        round_trip(&store).await;
    }

    #[test]
    fn test_backend_names() {
        assert_eq!(StoreBackend::default(), StoreBackend::Sqlite);
        assert_eq!(StoreBackend::Json.to_string(), "json");
        assert_eq!("sqlite".parse::<StoreBackend>().unwrap(), StoreBackend::Sqlite);
    }
}
