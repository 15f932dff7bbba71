use crate::model::Amount;
use crate::utils;
use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};

/// A named budget ceiling. Expenses whose category equals `name` count towards `spent`, and any
/// of its `keywords` found in a description classifies that description as `name`.
#[derive(Debug, Clone, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct Target {
    #[serde(deserialize_with = "utils::deserialize_id")]
    pub(crate) id: String,
    pub(crate) name: String,
    #[serde(rename = "target", alias = "target_amount")]
    pub(crate) target_amount: Amount,
    /// Derived from the transaction list by the reconciler; whatever was stored is ignored.
    #[serde(default)]
    pub(crate) spent: Amount,
    #[serde(default)]
    pub(crate) keywords: Vec<String>,
}

impl Target {
    /// Creates a target whose keywords are the lowercased words of its name.
    pub fn new(name: impl Into<String>, target_amount: Amount) -> Self {
        let name = name.into();
        let keywords = keywords_from_name(&name);
        Self {
            id: utils::generate_id(),
            name,
            target_amount,
            spent: Amount::ZERO,
            keywords,
        }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn target_amount(&self) -> Amount {
        self.target_amount
    }

    pub fn spent(&self) -> Amount {
        self.spent
    }

    pub fn keywords(&self) -> &[String] {
        &self.keywords
    }

    /// `spent / target_amount * 100`, or `None` when no ceiling is set.
    pub fn percentage(&self) -> Option<Decimal> {
        let ceiling = self.target_amount.value();
        if ceiling.is_zero() {
            return None;
        }
        let spent = self.spent.value();
        spent
            .checked_mul(Decimal::ONE_HUNDRED)
            .and_then(|scaled| scaled.checked_div(ceiling))
            .or_else(|| spent.checked_div(ceiling)?.checked_mul(Decimal::ONE_HUNDRED))
    }

    /// The percentage rounded to a whole number for display.
    pub fn rounded_percentage(&self) -> Option<Decimal> {
        self.percentage()
            .map(|p| p.round_dp_with_strategy(0, RoundingStrategy::MidpointAwayFromZero))
    }
}

/// Lowercases `name` and splits it on whitespace.
pub fn keywords_from_name(name: &str) -> Vec<String> {
    name.to_lowercase()
        .split_whitespace()
        .map(str::to_string)
        .collect()
}

/// Trims and lowercases user supplied keywords, dropping empty ones. An empty keyword would
/// match every description.
pub fn normalize_keywords<I, S>(keywords: I) -> Vec<String>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    keywords
        .into_iter()
        .map(|k| k.as_ref().trim().to_lowercase())
        .filter(|k| !k.is_empty())
        .collect()
}

/// A target definition without an id, used to seed a fresh budget.
#[derive(Debug, Clone, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct TargetSeed {
    pub name: String,
    pub target: Amount,
    pub keywords: Vec<String>,
}

impl TargetSeed {
    /// The targets a new budget starts with.
    pub fn defaults() -> Vec<TargetSeed> {
        vec![
            seed("Ortu", 2_000_000, &["ortu", "orang tua", "orangtua"]),
            seed("Tabungan", 1_000_000, &["tabungan", "nabung", "saving"]),
            seed("Cicilan", 500_000, &["cicilan", "bayar cicilan"]),
        ]
    }

    pub fn into_target(self) -> Target {
        Target {
            id: utils::generate_id(),
            name: self.name,
            target_amount: self.target,
            spent: Amount::ZERO,
            keywords: normalize_keywords(self.keywords),
        }
    }
}

fn seed(name: &str, target: i64, keywords: &[&str]) -> TargetSeed {
    TargetSeed {
        name: name.to_string(),
        target: Amount::from(target),
        keywords: keywords.iter().map(|k| k.to_string()).collect(),
    }
}
