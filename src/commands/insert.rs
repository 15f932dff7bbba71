//! Insert command handlers.

use crate::args::{InsertBulkArgs, InsertTargetArgs, InsertTransactionArgs};
use crate::commands::{log_alerts, plural, Out};
use crate::error::{ErrorType, IntoResult};
use crate::model::{Target, Transaction};
use crate::{utils, Config, Result};
use anyhow::Context;
use chrono::NaiveDate;
use tokio::io::AsyncReadExt;
use tracing::debug;

/// Adds a single transaction dated `args.date`, or `today` when no date was given.
pub async fn insert_transaction(
    config: Config,
    args: InsertTransactionArgs,
    today: NaiveDate,
) -> Result<Out<Transaction>> {
    let mut budget = config.open_budget().await.pub_result(ErrorType::Database)?;
    let transaction = budget
        .add_transaction(
            &args.description,
            args.amount,
            args.r#type,
            args.category.as_deref(),
            args.date.unwrap_or(today),
        )
        .pub_result(ErrorType::Validation)?;
    config
        .save_budget(&budget)
        .await
        .pub_result(ErrorType::Database)?;
    log_alerts(&budget.alerts());

    let message = format!(
        "Added {} '{}' of {} in {}",
        transaction.r#type(),
        transaction.description(),
        transaction.amount(),
        transaction.category()
    );
    Ok(Out::new(message, transaction))
}

/// Adds every readable `description,amount` line as an expense dated `today`. The text comes from
/// the argument, the file, or stdin, in that order.
pub async fn insert_bulk(
    config: Config,
    args: InsertBulkArgs,
    today: NaiveDate,
) -> Result<Out<Vec<Transaction>>> {
    let raw = match (args.text, args.file) {
        (Some(text), _) => text,
        (None, Some(path)) => utils::read(&path).await.pub_result(ErrorType::Io)?,
        (None, None) => {
            debug!("Reading bulk lines from stdin");
            let mut text = String::new();
            tokio::io::stdin()
                .read_to_string(&mut text)
                .await
                .context("Unable to read bulk lines from stdin")
                .pub_result(ErrorType::Io)?;
            text
        }
    };

    let mut budget = config.open_budget().await.pub_result(ErrorType::Database)?;
    let added = budget.add_bulk(&raw, today);
    if added.is_empty() {
        return Ok(Out::new("No readable lines, nothing was added", added));
    }
    config
        .save_budget(&budget)
        .await
        .pub_result(ErrorType::Database)?;
    log_alerts(&budget.alerts());

    let message = format!("Added {}", plural(added.len(), "expense", "expenses"));
    Ok(Out::new(message, added))
}

pub async fn insert_target(config: Config, args: InsertTargetArgs) -> Result<Out<Target>> {
    let mut budget = config.open_budget().await.pub_result(ErrorType::Database)?;
    let target = budget
        .add_target(&args.name, args.amount)
        .pub_result(ErrorType::Validation)?;
    config
        .save_budget(&budget)
        .await
        .pub_result(ErrorType::Database)?;
    log_alerts(&budget.alerts());

    let message = format!(
        "Added target '{}' with a ceiling of {}",
        target.name(),
        target.target_amount()
    );
    Ok(Out::new(message, target))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Amount, TransactionType};
    use crate::store::StoreBackend;
    use crate::test::TestEnv;

    fn transaction_args(description: &str, amount: &str) -> InsertTransactionArgs {
        InsertTransactionArgs {
            description: description.to_string(),
            amount: amount.parse().unwrap(),
            r#type: TransactionType::Expense,
            category: None,
            date: None,
        }
    }

    #[tokio::test]
    async fn test_insert_transaction_classifies_and_saves() {
        let env = TestEnv::new().await;
        let args = transaction_args("makan siang", "25k");
        let out = insert_transaction(env.config(), args, TestEnv::date())
            .await
            .unwrap();
        let t = out.structure().unwrap();
        assert_eq!(t.category(), "Makanan");
        assert_eq!(t.date(), TestEnv::date());
        assert!(out.message().contains("Rp 25.000"));

        let data = env.load().await;
        assert_eq!(data.transactions().len(), 1);
        assert_eq!(data.targets().len(), 3);
    }

    #[tokio::test]
    async fn test_insert_transaction_explicit_date_and_category() {
        let env = TestEnv::with_backend(StoreBackend::Json).await;
        env.insert_sample_data().await;
        let mut args = transaction_args("transfer", "1jt");
        args.category = Some("Ortu".to_string());
        args.date = NaiveDate::from_ymd_opt(2026, 9, 1);
        let out = insert_transaction(env.config(), args, TestEnv::date())
            .await
            .unwrap();
        assert_eq!(out.structure().unwrap().date().to_string(), "2026-09-01");

        let data = env.load().await;
        assert_eq!(data.transactions()[0].description(), "transfer");
        assert_eq!(data.transactions().len(), 4);
    }

    #[tokio::test]
    async fn test_insert_transaction_rejects_unknown_category() {
        let env = TestEnv::new().await;
        let mut args = transaction_args("gaji", "8jt");
        args.r#type = TransactionType::Income;
        args.category = Some("Tabungan".to_string());
        let err = insert_transaction(env.config(), args, TestEnv::date())
            .await
            .unwrap_err();
        assert_eq!(err.to_string(), "validation error");
        assert!(format!("{err:#}").contains("Unknown income category"));
        assert!(env.config().store().load().await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_insert_bulk_from_text() {
        let env = TestEnv::new().await;
        let args = InsertBulkArgs {
            text: Some("nabung,300k\nrusak\nkopi,15k".to_string()),
            file: None,
        };
        let out = insert_bulk(env.config(), args, TestEnv::date()).await.unwrap();
        assert_eq!(out.message(), "Added 2 expenses");

        let data = env.load().await;
        let descriptions: Vec<&str> = data
            .transactions()
            .iter()
            .map(|t| t.description())
            .collect();
        assert_eq!(descriptions, vec!["nabung", "kopi"]);

        // The store does not keep `spent`, it is recomputed when the budget is opened.
        let budget = env.config().open_budget().await.unwrap();
        let tabungan = budget
            .targets()
            .iter()
            .find(|t| t.name() == "Tabungan")
            .unwrap();
        assert_eq!(tabungan.spent(), Amount::from(300_000));
    }

    #[tokio::test]
    async fn test_insert_bulk_from_file() {
        let env = TestEnv::new().await;
        let path = env.config().root().join("bulk.txt");
        utils::write(&path, "bensin,50k\ncicilan motor,1.2jt\n").await.unwrap();
        let args = InsertBulkArgs {
            text: None,
            file: Some(path),
        };
        let out = insert_bulk(env.config(), args, TestEnv::date()).await.unwrap();
        let added = out.structure().unwrap();
        assert_eq!(added[1].amount(), Amount::from(1_200_000));
        assert_eq!(added[1].category(), "Cicilan");
    }

    #[tokio::test]
    async fn test_insert_bulk_nothing_readable() {
        let env = TestEnv::new().await;
        let args = InsertBulkArgs {
            text: Some("no amount here\n,5k".to_string()),
            file: None,
        };
        let out = insert_bulk(env.config(), args, TestEnv::date()).await.unwrap();
        assert!(out.structure().unwrap().is_empty());
        assert!(env.config().store().load().await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_insert_target() {
        let env = TestEnv::new().await;
        env.insert_sample_data().await;
        let args = InsertTargetArgs {
            name: "Makanan".to_string(),
            amount: Amount::from(500_000),
        };
        let out = insert_target(env.config(), args).await.unwrap();
        assert_eq!(out.structure().unwrap().spent(), Amount::from(15_000));

        let data = env.load().await;
        assert_eq!(data.targets().last().unwrap().name(), "Makanan");

        let args = InsertTargetArgs {
            name: "Makanan".to_string(),
            amount: Amount::from(1),
        };
        let err = insert_target(env.config(), args).await.unwrap_err();
        assert!(format!("{err:#}").contains("already exists"));
    }
}
