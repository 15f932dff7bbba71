use crate::model::BudgetData;
use crate::store::Store;
use crate::{utils, Result};
use anyhow::Context;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Keeps the budget in one pretty-printed JSON document.
///
/// Reading also accepts the web app's document shape: numeric ids, numeric amounts, `target` for a
/// target's ceiling and `pemasukan`/`pengeluaran` for transaction types.
#[derive(Debug, Clone)]
pub struct JsonStore {
    path: PathBuf,
}

impl JsonStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

#[async_trait::async_trait]
impl Store for JsonStore {
    async fn load(&self) -> Result<Option<BudgetData>> {
        if !self.path.is_file() {
            debug!("No JSON store at {}", self.path.display());
            return Ok(None);
        }
        let data: BudgetData = utils::deserialize(&self.path).await?;
        debug!(
            "Loaded {} transactions and {} targets from {}",
            data.transactions.len(),
            data.targets.len(),
            self.path.display()
        );
        Ok(Some(data))
    }

    async fn save(&self, data: &BudgetData) -> Result<()> {
        let json = serde_json::to_string_pretty(data).context("Unable to serialize budget data")?;
        // An interrupted write leaves the previous file in place.
        let tmp = self.path.with_extension("json.tmp");
        utils::write(&tmp, json).await?;
        utils::rename(&tmp, &self.path).await?;
        debug!("Saved budget data to {}", self.path.display());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Amount, TransactionType};
    use tempfile::TempDir;

    #[tokio::test]
    async fn test_reads_web_app_document() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("dompet.json");
        let doc = r#"{
            "transactions": [
                {"id": 1729242342342, "description": "gaji", "amount": 8000000,
                 "category": "Gaji", "type": "pemasukan", "date": "1/10/2026"},
                {"id": 1729242342343.7, "description": "bayar cicilan", "amount": 500000,
                 "category": "Cicilan", "type": "pengeluaran", "date": "2/10/2026"}
            ],
            "targets": [
                {"id": 3, "name": "Cicilan", "target": 500000, "spent": 0,
                 "keywords": ["cicilan", "bayar cicilan"]}
            ]
        }"#;
        utils::write(&path, doc).await.unwrap();

        let data = JsonStore::new(&path).load().await.unwrap().unwrap();
        assert_eq!(data.transactions().len(), 2);
        assert_eq!(data.transactions()[0].r#type(), TransactionType::Income);
        assert_eq!(data.transactions()[1].id(), "1729242342343.7");
        assert_eq!(data.targets()[0].target_amount(), Amount::from(500_000));
    }

    #[tokio::test]
    async fn test_missing_fields_default_to_empty() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("dompet.json");
        utils::write(&path, "{}").await.unwrap();
        let data = JsonStore::new(&path).load().await.unwrap().unwrap();
        assert_eq!(data, BudgetData::default());
    }

    #[tokio::test]
    async fn test_corrupt_file_is_an_error() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("dompet.json");
        utils::write(&path, "not json").await.unwrap();
        let err = JsonStore::new(&path).load().await.unwrap_err();
        assert!(format!("{err:#}").contains("Failed to parse JSON file"));
    }
}
