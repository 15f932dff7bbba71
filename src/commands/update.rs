//! Update command handlers.

use crate::args::UpdateTargetArgs;
use crate::commands::{log_alerts, Out};
use crate::error::{ErrorType, IntoResult};
use crate::model::Target;
use crate::{Config, Result};
use anyhow::anyhow;

/// Changes the ceiling and/or the keywords of one target. At least one of the two must be given.
pub async fn update_target(config: Config, args: UpdateTargetArgs) -> Result<Out<Target>> {
    if args.amount.is_none() && args.keywords.is_none() {
        return Err(anyhow!("Nothing to update, pass --amount and/or --keywords"))
            .pub_result(ErrorType::Validation);
    }

    let mut budget = config.open_budget().await.pub_result(ErrorType::Database)?;
    let mut updated = None;
    if let Some(amount) = args.amount {
        updated = Some(
            budget
                .update_target_amount(&args.id, amount)
                .pub_result(ErrorType::Validation)?,
        );
    }
    if let Some(keywords) = &args.keywords {
        updated = Some(
            budget
                .set_target_keywords(&args.id, keywords)
                .pub_result(ErrorType::Validation)?,
        );
    }
    let target = updated
        .ok_or_else(|| anyhow!("Target not found: {}", args.id))
        .pub_result(ErrorType::Validation)?;

    config
        .save_budget(&budget)
        .await
        .pub_result(ErrorType::Database)?;
    log_alerts(&budget.alerts());

    Ok(Out::new(format!("Updated target '{}'", target.name()), target))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Amount;
    use crate::test::TestEnv;

    fn args(id: &str, amount: Option<Amount>, keywords: Option<&[&str]>) -> UpdateTargetArgs {
        UpdateTargetArgs {
            id: id.to_string(),
            amount,
            keywords: keywords.map(|k| k.iter().map(|s| s.to_string()).collect()),
        }
    }

    #[tokio::test]
    async fn test_update_target_amount_and_keywords() {
        let env = TestEnv::new().await;
        let data = env.insert_sample_data().await;
        let id = data.targets()[1].id().to_string();

        let out = update_target(
            env.config(),
            args(&id, Some(Amount::from(2_000_000)), Some(&["Celengan", " "][..])),
        )
        .await
        .unwrap();
        let t = out.structure().unwrap();
        assert_eq!(t.target_amount(), Amount::from(2_000_000));
        assert_eq!(t.keywords(), &["celengan".to_string()]);
        assert_eq!(t.spent(), Amount::from(850_000));

        let data = env.load().await;
        assert_eq!(data.targets()[1].target_amount(), Amount::from(2_000_000));
        assert_eq!(data.targets()[1].keywords(), &["celengan".to_string()]);
    }

    #[tokio::test]
    async fn test_update_target_errors() {
        let env = TestEnv::new().await;
        let data = env.insert_sample_data().await;
        let id = data.targets()[0].id().to_string();

        let err = update_target(env.config(), args(&id, None, None))
            .await
            .unwrap_err();
        assert!(format!("{err:#}").contains("Nothing to update"));

        let err = update_target(env.config(), args("nope", Some(Amount::from(1)), None))
            .await
            .unwrap_err();
        assert_eq!(err.root_cause().to_string(), "Target not found: nope");

        let err = update_target(env.config(), args(&id, Some(Amount::ZERO), None))
            .await
            .unwrap_err();
        assert_eq!(err.to_string(), "validation error");
    }
}
