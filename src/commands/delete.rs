//! Delete command handlers.

use crate::args::DeleteIdsArgs;
use crate::backup::PRE_DELETE;
use crate::commands::{log_alerts, plural, Out};
use crate::error::{ErrorType, IntoResult};
use crate::model::BudgetData;
use crate::{Config, Result};
use tracing::debug;

/// Deletes one or more transactions by ID atomically.
///
/// This operation is all-or-nothing: either all specified transactions are deleted, or none are.
/// Once every id is known to exist, a backup of the budget is written before anything is saved.
pub async fn delete_transactions(config: Config, args: DeleteIdsArgs) -> Result<Out<Vec<String>>> {
    let mut budget = config.open_budget().await.pub_result(ErrorType::Database)?;
    let before = budget.data();
    let deleted = budget
        .delete_transactions(&args.ids)
        .pub_result(ErrorType::Validation)?;
    backup(&config, &before).await?;
    config
        .save_budget(&budget)
        .await
        .pub_result(ErrorType::Database)?;
    log_alerts(&budget.alerts());

    let ids: Vec<String> = deleted.iter().map(|t| t.id().to_string()).collect();
    let message = format!(
        "Deleted {}",
        plural(ids.len(), "transaction", "transactions")
    );
    Ok(Out::new(message, ids))
}

/// Deletes one or more targets by ID atomically.
///
/// Transactions filed under a deleted target keep their category.
pub async fn delete_targets(config: Config, args: DeleteIdsArgs) -> Result<Out<Vec<String>>> {
    let mut budget = config.open_budget().await.pub_result(ErrorType::Database)?;
    let before = budget.data();
    let deleted = budget
        .delete_targets(&args.ids)
        .pub_result(ErrorType::Validation)?;
    backup(&config, &before).await?;
    config
        .save_budget(&budget)
        .await
        .pub_result(ErrorType::Database)?;

    let ids: Vec<String> = deleted.iter().map(|t| t.id().to_string()).collect();
    let message = format!("Deleted {}", plural(ids.len(), "target", "targets"));
    Ok(Out::new(message, ids))
}

async fn backup(config: &Config, data: &BudgetData) -> Result<()> {
    let path = config
        .backup()
        .save_json(PRE_DELETE, data)
        .await
        .pub_result(ErrorType::Io)?;
    debug!("Wrote backup {}", path.display());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Amount;
    use crate::test::TestEnv;
    use crate::utils;

    fn ids(ids: &[&str]) -> DeleteIdsArgs {
        DeleteIdsArgs {
            ids: ids.iter().map(|s| s.to_string()).collect(),
        }
    }

    #[tokio::test]
    async fn test_delete_transactions_success() {
        let env = TestEnv::new().await;
        let data = env.insert_sample_data().await;
        let id = data.transactions()[1].id().to_string();

        let out = delete_transactions(env.config(), ids(&[&id])).await.unwrap();
        assert_eq!(out.message(), "Deleted 1 transaction");
        assert_eq!(out.structure().unwrap(), &vec![id.clone()]);

        let data = env.load().await;
        assert_eq!(data.transactions().len(), 2);
        assert!(data.transactions().iter().all(|t| t.id() != id));

        let budget = env.config().open_budget().await.unwrap();
        let tabungan = budget.targets().iter().find(|t| t.name() == "Tabungan").unwrap();
        assert_eq!(tabungan.spent(), Amount::ZERO);

        let backups = utils::read_dir(env.config().backups()).await.unwrap();
        assert_eq!(backups.len(), 1);
    }

    #[tokio::test]
    async fn test_delete_transactions_atomic_rollback() {
        let env = TestEnv::new().await;
        let data = env.insert_sample_data().await;
        let id = data.transactions()[0].id().to_string();

        let err = delete_transactions(env.config(), ids(&[&id, "nonexistent"]))
            .await
            .unwrap_err();
        assert_eq!(err.to_string(), "validation error");
        assert_eq!(err.root_cause().to_string(), "Transaction not found: nonexistent");
        assert_eq!(env.load().await.transactions().len(), 3);
        assert!(utils::read_dir(env.config().backups()).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_delete_targets() {
        let env = TestEnv::new().await;
        let data = env.insert_sample_data().await;
        let first = data.targets()[0].id().to_string();
        let last = data.targets()[2].id().to_string();

        let out = delete_targets(env.config(), ids(&[&first, &last])).await.unwrap();
        assert_eq!(out.message(), "Deleted 2 targets");

        let data = env.load().await;
        let names: Vec<&str> = data.targets().iter().map(|t| t.name()).collect();
        assert_eq!(names, vec!["Tabungan"]);
        assert_eq!(data.transactions().len(), 3);

        let err = delete_targets(env.config(), ids(&[&first])).await.unwrap_err();
        assert!(format!("{err:#}").contains("Target not found"));
        assert_eq!(utils::read_dir(env.config().backups()).await.unwrap().len(), 1);
    }
}
