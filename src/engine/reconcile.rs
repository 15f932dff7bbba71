use crate::model::{Alert, AlertKind, AlertThresholds, Amount, Target, Transaction};

/// Recomputes `spent` for every target as the sum of the expense transactions whose category is
/// the target's name. Whatever `spent` held before is discarded.
pub fn reconcile(transactions: &[Transaction], targets: &[Target]) -> Vec<Target> {
    targets
        .iter()
        .map(|target| {
            let spent: Amount = transactions
                .iter()
                .filter(|t| t.is_expense() && t.category() == target.name())
                .map(|t| t.amount())
                .sum();
            Target {
                spent,
                ..target.clone()
            }
        })
        .collect()
}

/// Derives at most one alert per target, in target order. Targets without a ceiling never alert.
pub fn evaluate_alerts(targets: &[Target], thresholds: &AlertThresholds) -> Vec<Alert> {
    targets
        .iter()
        .filter_map(|target| {
            let percentage = target.percentage()?;
            let kind = if percentage >= thresholds.danger_percent {
                AlertKind::Danger
            } else if percentage >= thresholds.warning_percent {
                AlertKind::Warning
            } else {
                return None;
            };
            let rounded = target.rounded_percentage()?.normalize();
            Some(Alert::new(kind, target.name(), rounded))
        })
        .collect()
}
