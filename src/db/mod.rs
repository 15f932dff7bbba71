//! This module is responsible for reading, writing and managing the SQLite database.

mod migrations;

use crate::model::{Amount, BudgetData, Target, Transaction, TransactionType};
use crate::store::Store;
use crate::Result;
use anyhow::{bail, Context};
use chrono::NaiveDate;
use rust_decimal::Decimal;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
use sqlx::SqlitePool;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use tracing::debug;

/// The schema version this build of the program expects.
pub(crate) const CURRENT_VERSION: i32 = 1;

/// Dates are stored in ISO form so that they sort as text.
const DB_DATE_FORMAT: &str = "%Y-%m-%d";

/// Key in the `metadata` table set by every save. Its absence means nothing was ever saved.
const LAST_SAVED: &str = "last_saved";

type TransactionRow = (String, String, String, String, String, String);
type TargetRow = (String, String, String, String);

#[derive(Debug, Clone)]
pub struct Db {
    path: PathBuf,
    pool: SqlitePool,
}

impl Db {
    /// - Validates that no file currently exists at `path`
    /// - Creates a new SQLite file at `path`
    /// - Initializes the database schema
    pub async fn init(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        if path.exists() {
            bail!("A database already exists at {}", path.display());
        }
        let pool = connect(path, true).await?;

        migrations::bootstrap(&pool).await?;
        migrations::run(&pool, 0, CURRENT_VERSION).await?;
        debug!("Created database at {}", path.display());
        Ok(Self {
            path: path.to_path_buf(),
            pool,
        })
    }

    /// - Validates that there is a SQLite file at `path`
    /// - Updates the database schema with migrations if it is out-of-date
    pub async fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        if !path.is_file() {
            bail!(
                "No database found at {}, run 'dompet init' first",
                path.display()
            );
        }
        let pool = connect(path, false).await?;
        let db = Self {
            path: path.to_path_buf(),
            pool,
        };
        let version = db.schema_version().await?;
        if version > CURRENT_VERSION {
            bail!(
                "The database at {} has schema version {version}, which is newer than the \
                 supported version {CURRENT_VERSION}",
                path.display()
            );
        }
        migrations::run(&db.pool, version, CURRENT_VERSION).await?;
        Ok(db)
    }

    pub(crate) async fn schema_version(&self) -> Result<i32> {
        let row: (i32,) = sqlx::query_as("SELECT MAX(version) FROM schema_version")
            .fetch_one(&self.pool)
            .await
            .context("Failed to query schema version")?;
        Ok(row.0)
    }

    #[cfg(test)]
    pub(crate) async fn count_transactions(&self) -> Result<u64> {
        let row: (i64,) = sqlx::query_as("SELECT COUNT(*) FROM transactions")
            .fetch_one(&self.pool)
            .await
            .context("Failed to count transactions")?;
        Ok(u64::try_from(row.0).unwrap_or_default())
    }

    async fn has_saved(&self) -> Result<bool> {
        let row: Option<(String,)> = sqlx::query_as("SELECT value FROM metadata WHERE key = ?")
            .bind(LAST_SAVED)
            .fetch_optional(&self.pool)
            .await
            .context("Failed to read metadata")?;
        Ok(row.is_some())
    }
}

#[async_trait::async_trait]
impl Store for Db {
    async fn load(&self) -> Result<Option<BudgetData>> {
        if !self.has_saved().await? {
            return Ok(None);
        }

        let rows: Vec<TransactionRow> = sqlx::query_as(
            "SELECT id, description, amount, category, type, date \
             FROM transactions ORDER BY position",
        )
        .fetch_all(&self.pool)
        .await
        .context("Failed to read transactions")?;
        let transactions = rows
            .into_iter()
            .map(transaction_from_row)
            .collect::<Result<Vec<_>>>()?;

        let rows: Vec<TargetRow> = sqlx::query_as(
            "SELECT id, name, target_amount, keywords FROM targets ORDER BY position",
        )
        .fetch_all(&self.pool)
        .await
        .context("Failed to read targets")?;
        let targets = rows
            .into_iter()
            .map(target_from_row)
            .collect::<Result<Vec<_>>>()?;

        debug!(
            "Loaded {} transactions and {} targets from {}",
            transactions.len(),
            targets.len(),
            self.path.display()
        );
        Ok(Some(BudgetData::new(transactions, targets)))
    }

    async fn save(&self, data: &BudgetData) -> Result<()> {
        let mut tx = self
            .pool
            .begin()
            .await
            .context("Failed to begin save transaction")?;

        sqlx::query("DELETE FROM transactions")
            .execute(&mut *tx)
            .await
            .context("Failed to clear transactions")?;
        sqlx::query("DELETE FROM targets")
            .execute(&mut *tx)
            .await
            .context("Failed to clear targets")?;

        for (position, t) in data.transactions.iter().enumerate() {
            sqlx::query(
                "INSERT INTO transactions \
                 (id, position, description, amount, category, type, date) \
                 VALUES (?, ?, ?, ?, ?, ?, ?)",
            )
            .bind(t.id())
            .bind(position as i64)
            .bind(t.description())
            .bind(t.amount().to_plain_string())
            .bind(t.category())
            .bind(t.r#type().to_string())
            .bind(t.date().format(DB_DATE_FORMAT).to_string())
            .execute(&mut *tx)
            .await
            .with_context(|| format!("Failed to insert transaction {}", t.id()))?;
        }

        for (position, t) in data.targets.iter().enumerate() {
            let keywords =
                serde_json::to_string(t.keywords()).context("Unable to serialize keywords")?;
            sqlx::query(
                "INSERT INTO targets (id, position, name, target_amount, keywords) \
                 VALUES (?, ?, ?, ?, ?)",
            )
            .bind(t.id())
            .bind(position as i64)
            .bind(t.name())
            .bind(t.target_amount().to_plain_string())
            .bind(keywords)
            .execute(&mut *tx)
            .await
            .with_context(|| format!("Failed to insert target {}", t.name()))?;
        }

        sqlx::query("INSERT OR REPLACE INTO metadata (key, value) VALUES (?, ?)")
            .bind(LAST_SAVED)
            .bind(chrono::Utc::now().to_rfc3339())
            .execute(&mut *tx)
            .await
            .context("Failed to update metadata")?;

        tx.commit()
            .await
            .context("Failed to commit save transaction")?;
        debug!(
            "Saved {} transactions and {} targets to {}",
            data.transactions.len(),
            data.targets.len(),
            self.path.display()
        );
        Ok(())
    }
}

async fn connect(path: &Path, create: bool) -> Result<SqlitePool> {
    let options = SqliteConnectOptions::from_str(&format!("sqlite:{}", path.display()))
        .context("Failed to parse SQLite connection string")?
        .create_if_missing(create);

    SqlitePoolOptions::new()
        .max_connections(1)
        .connect_with(options)
        .await
        .with_context(|| format!("Failed to open SQLite database at {}", path.display()))
}

fn transaction_from_row(row: TransactionRow) -> Result<Transaction> {
    let (id, description, amount, category, r#type, date) = row;
    Ok(Transaction {
        amount: parse_db_amount(&amount)
            .with_context(|| format!("Bad amount in transaction {id}"))?,
        r#type: TransactionType::from_str(&r#type)
            .with_context(|| format!("Bad type '{}' in transaction {id}", r#type))?,
        date: NaiveDate::parse_from_str(&date, DB_DATE_FORMAT)
            .with_context(|| format!("Bad date '{date}' in transaction {id}"))?,
        id,
        description,
        category,
    })
}

fn target_from_row(row: TargetRow) -> Result<Target> {
    let (id, name, target_amount, keywords) = row;
    Ok(Target {
        target_amount: parse_db_amount(&target_amount)
            .with_context(|| format!("Bad amount in target {name}"))?,
        keywords: serde_json::from_str(&keywords)
            .with_context(|| format!("Bad keywords in target {name}"))?,
        spent: Amount::ZERO,
        id,
        name,
    })
}

fn parse_db_amount(s: &str) -> Result<Amount> {
    let value = Decimal::from_str(s).with_context(|| format!("'{s}' is not a decimal"))?;
    Ok(Amount::new(value))
}
