//! Versioned schema migrations.
//!
//! Version `N` is reached from `N-1` by `migration_NN_up.sql` and left again by
//! `migration_NN_down.sql`. The current version lives in the single row of `schema_version`.

use crate::Result;
use anyhow::{bail, Context};
use sqlx::{Executor, SqlitePool};
use tracing::debug;

/// `(up, down)` scripts, where index `i` holds the scripts for version `i + 1`.
const SCRIPTS: &[(&str, &str)] = &[(
    include_str!("migration_01_up.sql"),
    include_str!("migration_01_down.sql"),
)];

/// One script to execute and the version the schema is at once it has run.
#[derive(Debug, Clone, Copy, Eq, PartialEq)]
struct Step {
    sql: &'static str,
    version: i32,
}

/// Creates the `schema_version` table of a brand new database at version 0.
pub(crate) async fn bootstrap(pool: &SqlitePool) -> Result<()> {
    pool.execute(
        "CREATE TABLE schema_version (version INTEGER NOT NULL); \
         INSERT INTO schema_version (version) VALUES (0);",
    )
    .await
    .context("Failed to create the schema_version table")?;
    Ok(())
}

/// Moves the schema from version `from` to version `to`, up or down. Each step runs in its own
/// database transaction together with its `schema_version` update.
pub(crate) async fn run(pool: &SqlitePool, from: i32, to: i32) -> Result<()> {
    let steps = plan(from, to)?;
    if steps.is_empty() {
        debug!("Schema already at version {to}");
        return Ok(());
    }
    for step in steps {
        debug!("Migrating schema to version {}", step.version);
        apply(pool, step).await?;
    }
    debug!("Schema migrated from version {from} to {to}");
    Ok(())
}

/// The ordered steps from `from` to `to`. Fails before anything runs when a script is missing.
fn plan(from: i32, to: i32) -> Result<Vec<Step>> {
    let script = |version: i32| -> Result<(&'static str, &'static str)> {
        usize::try_from(version - 1)
            .ok()
            .and_then(|ix| SCRIPTS.get(ix))
            .copied()
            .with_context(|| {
                format!("No migration for version {version}, cannot migrate from {from} to {to}")
            })
    };

    let mut steps = Vec::new();
    if from < to {
        for version in from + 1..=to {
            let (up, _) = script(version)?;
            steps.push(Step { sql: up, version });
        }
    } else {
        for version in (to + 1..=from).rev() {
            let (_, down) = script(version)?;
            steps.push(Step {
                sql: down,
                version: version - 1,
            });
        }
    }
    Ok(steps)
}

async fn apply(pool: &SqlitePool, step: Step) -> Result<()> {
    let mut tx = pool
        .begin()
        .await
        .context("Failed to begin migration transaction")?;
    tx.execute(step.sql)
        .await
        .with_context(|| format!("Migration to version {} failed", step.version))?;
    let updated = sqlx::query("UPDATE schema_version SET version = ?")
        .bind(step.version)
        .execute(&mut *tx)
        .await
        .context("Failed to record the schema version")?;
    if updated.rows_affected() != 1 {
        bail!("The schema_version table must hold exactly one row");
    }
    tx.commit()
        .await
        .context("Failed to commit migration transaction")?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::connect;
    use tempfile::TempDir;

    async fn fresh() -> (TempDir, SqlitePool) {
        let dir = TempDir::new().unwrap();
        let pool = connect(&dir.path().join("m.sqlite"), true).await.unwrap();
        bootstrap(&pool).await.unwrap();
        (dir, pool)
    }

    async fn version(pool: &SqlitePool) -> i32 {
        let row: (i32,) = sqlx::query_as("SELECT version FROM schema_version")
            .fetch_one(pool)
            .await
            .unwrap();
        row.0
    }

    async fn tables(pool: &SqlitePool) -> Vec<String> {
        let rows: Vec<(String,)> = sqlx::query_as(
            "SELECT name FROM sqlite_master WHERE type = 'table' AND name != 'schema_version' \
             ORDER BY name",
        )
        .fetch_all(pool)
        .await
        .unwrap();
        rows.into_iter().map(|r| r.0).collect()
    }

    #[tokio::test]
    async fn test_up_then_down() {
        let (_dir, pool) = fresh().await;
        assert_eq!(version(&pool).await, 0);

        run(&pool, 0, 1).await.unwrap();
        assert_eq!(version(&pool).await, 1);
        assert_eq!(tables(&pool).await, vec!["metadata", "targets", "transactions"]);

        run(&pool, 1, 1).await.unwrap();
        assert_eq!(version(&pool).await, 1);

        run(&pool, 1, 0).await.unwrap();
        assert_eq!(version(&pool).await, 0);
        assert!(tables(&pool).await.is_empty());
    }

    #[tokio::test]
    async fn test_type_check_constraint() {
        let (_dir, pool) = fresh().await;
        run(&pool, 0, 1).await.unwrap();
        let result = sqlx::query(
            "INSERT INTO transactions (id, position, description, amount, category, type, date) \
             VALUES ('a', 0, 'x', '1', 'Lainnya', 'pengeluaran', '2026-10-18')",
        )
        .execute(&pool)
        .await;
        assert!(result.is_err());
    }

    #[test]
    fn test_plan() {
        assert!(plan(1, 1).unwrap().is_empty());
        assert_eq!(plan(0, 1).unwrap()[0].version, 1);
        let down = plan(1, 0).unwrap();
        assert_eq!(down[0].version, 0);
        assert!(down[0].sql.contains("DROP TABLE"));

        let err = plan(0, 2).unwrap_err();
        assert!(err.to_string().contains("No migration for version 2"));
        assert!(plan(3, 1).is_err());
    }
}
