//! Read-only commands: the filtered transaction list, reports, alerts, classification and CSV
//! export. None of these write to the store.

use crate::args::{ClassifyArgs, ExportArgs, FilterArgs, WeeklyArgs};
use crate::commands::{plural, Out};
use crate::error::{ErrorType, IntoResult};
use crate::model::{Alert, Transaction};
use crate::report::{
    category_breakdown, export_csv, target_progress, weekly, CategoryTotal, TargetProgress,
    Totals, TransactionFilter, WeeklyReport,
};
use crate::{utils, Config, Result};
use anyhow::Context;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use tokio::io::AsyncWriteExt;

/// Totals and the per-category expense breakdown over a filtered list.
#[derive(Debug, Clone, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct Summary {
    pub count: usize,
    pub totals: Totals,
    pub categories: Vec<CategoryTotal>,
}

/// Transactions matching the filter, newest first.
pub async fn list(config: Config, args: FilterArgs) -> Result<Out<Vec<Transaction>>> {
    let budget = config.open_budget().await.pub_result(ErrorType::Database)?;
    let filter = TransactionFilter::from(args);
    let found: Vec<Transaction> = filter
        .apply(budget.transactions())
        .into_iter()
        .cloned()
        .collect();
    let message = format!("Found {}", plural(found.len(), "transaction", "transactions"));
    Ok(Out::new(message, found))
}

pub async fn report_summary(config: Config, args: FilterArgs) -> Result<Out<Summary>> {
    let budget = config.open_budget().await.pub_result(ErrorType::Database)?;
    let filter = TransactionFilter::from(args);
    let found = filter.apply(budget.transactions());
    let totals = Totals::new(found.iter().copied());
    let summary = Summary {
        count: found.len(),
        totals,
        categories: category_breakdown(found.iter().copied()),
    };
    let message = format!(
        "Income {}, expense {}, balance {}",
        totals.income, totals.expense, totals.balance
    );
    Ok(Out::new(message, summary))
}

pub async fn report_weekly(
    config: Config,
    args: WeeklyArgs,
    today: NaiveDate,
) -> Result<Out<WeeklyReport>> {
    let budget = config.open_budget().await.pub_result(ErrorType::Database)?;
    let report =
        weekly(budget.transactions(), today, args.offset).pub_result(ErrorType::Validation)?;
    let message = format!("Week from {} to {}", report.start, report.end);
    Ok(Out::new(message, report))
}

pub async fn report_targets(config: Config) -> Result<Out<Vec<TargetProgress>>> {
    let budget = config.open_budget().await.pub_result(ErrorType::Database)?;
    let progress = target_progress(budget.targets());
    let message = format!("{} tracked", plural(progress.len(), "target", "targets"));
    Ok(Out::new(message, progress))
}

pub async fn alerts(config: Config) -> Result<Out<Vec<Alert>>> {
    let budget = config.open_budget().await.pub_result(ErrorType::Database)?;
    let alerts = budget.alerts();
    let message = if alerts.is_empty() {
        "Every target is within budget".to_string()
    } else {
        alerts
            .iter()
            .map(|a| a.message.as_str())
            .collect::<Vec<_>>()
            .join("; ")
    };
    Ok(Out::new(message, alerts))
}

/// The category `args.description` would be filed under as an expense.
pub async fn classify(config: Config, args: ClassifyArgs) -> Result<Out<String>> {
    let budget = config.open_budget().await.pub_result(ErrorType::Database)?;
    let category = budget.classify(&args.description);
    let message = format!("'{}' is filed under {category}", args.description);
    Ok(Out::new(message, category))
}

/// Writes the filtered transactions as CSV to `args.output`, or to stdout.
pub async fn export(config: Config, args: ExportArgs) -> Result<Out<()>> {
    let budget = config.open_budget().await.pub_result(ErrorType::Database)?;
    let filter = TransactionFilter::from(args.filter);
    let found = filter.apply(budget.transactions());

    let mut buf = Vec::new();
    export_csv(found.iter().copied(), &mut buf).pub_result(ErrorType::Io)?;
    let exported = plural(found.len(), "transaction", "transactions");

    match args.output {
        Some(path) => {
            utils::write(&path, &buf).await.pub_result(ErrorType::Io)?;
            Ok(format!("Exported {exported} to {}", path.display()).into())
        }
        None => {
            let mut stdout = tokio::io::stdout();
            stdout
                .write_all(&buf)
                .await
                .context("Unable to write CSV to stdout")
                .pub_result(ErrorType::Io)?;
            stdout
                .flush()
                .await
                .context("Unable to write CSV to stdout")
                .pub_result(ErrorType::Io)?;
            Ok(format!("Exported {exported}").into())
        }
    }
}
