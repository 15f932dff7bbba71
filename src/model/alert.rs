use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// How close a target is to, or how far past, its ceiling.
#[derive(Debug, Clone, Copy, Eq, PartialEq, Ord, PartialOrd, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AlertKind {
    Warning,
    Danger,
}

serde_plain::derive_display_from_serialize!(AlertKind);

/// A notice about a single target that has reached one of the alert thresholds.
#[derive(Debug, Clone, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct Alert {
    pub kind: AlertKind,
    pub target: String,
    /// Whole number percentage of the ceiling used.
    pub percentage: Decimal,
    pub message: String,
}

impl Alert {
    pub fn new(kind: AlertKind, target: impl Into<String>, percentage: Decimal) -> Self {
        let target = target.into();
        let message = match kind {
            AlertKind::Danger => {
                format!("Target {target} has exceeded its budget ({percentage}%)")
            }
            AlertKind::Warning => format!("Target {target} is at {percentage}% of its budget"),
        };
        Self {
            kind,
            target,
            percentage,
            message,
        }
    }
}

/// The percentages at which a target raises a warning or a danger alert.
#[derive(Debug, Clone, Copy, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", default)]
pub struct AlertThresholds {
    pub warning_percent: Decimal,
    pub danger_percent: Decimal,
}

impl Default for AlertThresholds {
    fn default() -> Self {
        Self {
            warning_percent: Decimal::from(80),
            danger_percent: Decimal::ONE_HUNDRED,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_messages() {
        let a = Alert::new(AlertKind::Danger, "Ortu", Decimal::from(105));
        assert_eq!(a.message, "Target Ortu has exceeded its budget (105%)");
        let a = Alert::new(AlertKind::Warning, "Tabungan", Decimal::from(80));
        assert_eq!(a.message, "Target Tabungan is at 80% of its budget");
        assert_eq!(a.kind.to_string(), "warning");
    }
}
