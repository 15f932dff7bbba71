//! Amount type for handling Rupiah values, and the shorthand amount parser.
//!
//! Users type amounts the way they say them: `15000`, `50k`, `2jt`, `2 juta`. `parse_amount`
//! turns those into an `Amount`, and `Amount` renders itself as `Rp 2.000.000`.

use rust_decimal::prelude::ToPrimitive;
use rust_decimal::{Decimal, RoundingStrategy};
use serde::de::{self, Visitor};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::fmt::{Display, Formatter};
use std::iter::Sum;
use std::ops::{Add, Sub};
use std::str::FromStr;

/// Shorthand for thousands, e.g. `50k`.
const THOUSAND: &str = "k";

/// Shorthand spellings for millions, e.g. `2jt` or `2juta`.
const MILLION: &[&str] = &["jt", "juta"];

/// Represents an amount of money in the base currency unit (Rupiah).
///
/// Serializes as a plain decimal string (e.g. `"1500000"`) so that values survive a round trip
/// through any store without floating point drift. Deserializes from either a string or a JSON
/// number.
///
/// ```
/// # use dompet::model::Amount;
/// # use std::str::FromStr;
/// let amount = Amount::from_str("2jt").unwrap();
/// assert_eq!(amount.to_string(), "Rp 2.000.000");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct Amount(Decimal);

impl Amount {
    pub const ZERO: Amount = Amount(Decimal::ZERO);

    pub const fn new(value: Decimal) -> Self {
        Self(value)
    }

    pub fn value(&self) -> Decimal {
        self.0
    }

    pub fn is_zero(&self) -> bool {
        self.0.is_zero()
    }

    /// Returns true if the amount is strictly greater than zero.
    pub fn is_positive(&self) -> bool {
        !self.is_zero() && self.0.is_sign_positive()
    }

    pub fn is_negative(&self) -> bool {
        !self.is_zero() && self.0.is_sign_negative()
    }

    /// The shortest decimal rendering without currency formatting, e.g. `1500` or `2.5`.
    pub fn to_plain_string(&self) -> String {
        self.0.normalize().to_string()
    }
}

/// Parses a free-form amount such as `15000`, `50k`, `1.5jt` or `2 juta`.
///
/// Whitespace is removed and the input is lowercased. The first `k` found anywhere in the string
/// selects the thousands multiplier and wins over any million unit. Otherwise any `jt` or `juta`
/// selects the millions multiplier. The number itself is the longest numeric prefix of what
/// remains, so `2,5jt` reads as `2` million.
///
/// Returns `None` when no number can be read or when the multiplied value does not fit in a
/// `Decimal`. The sign is not checked here: `-5k` parses as `-5000` and it is up to the caller to
/// reject it.
pub fn parse_amount(raw: &str) -> Option<Amount> {
    let cleaned: String = raw
        .to_lowercase()
        .chars()
        .filter(|c| !c.is_whitespace())
        .collect();

    if cleaned.contains(THOUSAND) {
        let number = cleaned.replacen(THOUSAND, "", 1);
        return leading_number(&number)?
            .checked_mul(Decimal::from(1_000))
            .map(Amount);
    }
    if MILLION.iter().any(|unit| cleaned.contains(unit)) {
        let number = strip_million_units(&cleaned);
        return leading_number(&number)?
            .checked_mul(Decimal::from(1_000_000))
            .map(Amount);
    }
    leading_number(&cleaned).map(Amount)
}

/// Removes every million unit, scanning left to right and preferring `jt` over `juta` at each
/// position.
fn strip_million_units(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    let mut rest = s;
    'outer: while let Some(c) = rest.chars().next() {
        for unit in MILLION {
            if let Some(after) = rest.strip_prefix(unit) {
                rest = after;
                continue 'outer;
            }
        }
        out.push(c);
        rest = &rest[c.len_utf8()..];
    }
    out
}

/// Reads the longest prefix of `s` that forms a decimal number (optional sign, digits with an
/// optional fraction, optional exponent) and ignores anything after it.
fn leading_number(s: &str) -> Option<Decimal> {
    let bytes = s.as_bytes();
    let mut pos = 0;
    let negative = match bytes.first() {
        Some(b'-') => {
            pos = 1;
            true
        }
        Some(b'+') => {
            pos = 1;
            false
        }
        _ => false,
    };

    let int_start = pos;
    while pos < bytes.len() && bytes[pos].is_ascii_digit() {
        pos += 1;
    }
    let int_part = &s[int_start..pos];

    let mut frac_part = "";
    if pos < bytes.len() && bytes[pos] == b'.' {
        let frac_start = pos + 1;
        let mut end = frac_start;
        while end < bytes.len() && bytes[end].is_ascii_digit() {
            end += 1;
        }
        if !int_part.is_empty() || end > frac_start {
            frac_part = &s[frac_start..end];
            pos = end;
        }
    }

    if int_part.is_empty() && frac_part.is_empty() {
        return None;
    }

    let mut mantissa = String::new();
    if negative {
        mantissa.push('-');
    }
    mantissa.push_str(if int_part.is_empty() { "0" } else { int_part });
    if !frac_part.is_empty() {
        mantissa.push('.');
        mantissa.push_str(frac_part);
    }

    if let Some(exponent) = leading_exponent(&s[pos..]) {
        return Decimal::from_scientific(&format!("{mantissa}e{exponent}")).ok();
    }
    Decimal::from_str(&mantissa).ok()
}

/// Reads an exponent such as `e3` or `E-2` at the start of `s`.
fn leading_exponent(s: &str) -> Option<&str> {
    let rest = s.strip_prefix('e').or_else(|| s.strip_prefix('E'))?;
    let sign_len = usize::from(rest.starts_with('-') || rest.starts_with('+'));
    let digits = rest[sign_len..]
        .bytes()
        .take_while(|b| b.is_ascii_digit())
        .count();
    if digits == 0 {
        return None;
    }
    Some(&rest[..sign_len + digits])
}

/// The error returned when an amount string contains no readable number.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AmountError(String);

impl Display for AmountError {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "Unable to read an amount from '{}'", self.0)
    }
}

impl std::error::Error for AmountError {}

impl FromStr for Amount {
    type Err = AmountError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        parse_amount(s).ok_or_else(|| AmountError(s.to_string()))
    }
}

impl Display for Amount {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        let sign = if self.is_negative() { "-" } else { "" };
        let abs = self.0.abs();
        let rounded = abs
            .round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero)
            .to_f64()
            .unwrap_or_default();
        let formatted = if abs.fract().is_zero() {
            format_num::format_num!(",.0", rounded)
        } else {
            format_num::format_num!(",.2", rounded)
        };
        // Indonesian grouping swaps the roles of ',' and '.'
        let grouped: String = formatted
            .chars()
            .map(|c| match c {
                ',' => '.',
                '.' => ',',
                other => other,
            })
            .collect();
        write!(f, "{sign}Rp {grouped}")
    }
}

/// Saturates at `Decimal::MAX` / `Decimal::MIN` instead of overflowing.
impl Add for Amount {
    type Output = Amount;

    fn add(self, rhs: Self) -> Self::Output {
        Amount(self.0.saturating_add(rhs.0))
    }
}

/// Saturates at `Decimal::MAX` / `Decimal::MIN` instead of overflowing.
impl Sub for Amount {
    type Output = Amount;

    fn sub(self, rhs: Self) -> Self::Output {
        Amount(self.0.saturating_sub(rhs.0))
    }
}

impl Sum for Amount {
    fn sum<I: Iterator<Item = Self>>(iter: I) -> Self {
        iter.fold(Amount::ZERO, Add::add)
    }
}

impl<'a> Sum<&'a Amount> for Amount {
    fn sum<I: Iterator<Item = &'a Amount>>(iter: I) -> Self {
        iter.copied().sum()
    }
}

impl From<Decimal> for Amount {
    fn from(value: Decimal) -> Self {
        Amount(value)
    }
}

impl From<i32> for Amount {
    fn from(value: i32) -> Self {
        Amount(Decimal::from(value))
    }
}

impl From<i64> for Amount {
    fn from(value: i64) -> Self {
        Amount(Decimal::from(value))
    }
}

impl From<Amount> for Decimal {
    fn from(amount: Amount) -> Self {
        amount.0
    }
}

impl Serialize for Amount {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&self.to_plain_string())
    }
}

impl<'de> Deserialize<'de> for Amount {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        deserializer.deserialize_any(AmountVisitor)
    }
}

struct AmountVisitor;

impl<'de> Visitor<'de> for AmountVisitor {
    type Value = Amount;

    fn expecting(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.write_str("a decimal number or a string containing one")
    }

    fn visit_i64<E: de::Error>(self, v: i64) -> Result<Amount, E> {
        Ok(Amount(Decimal::from(v)))
    }

    fn visit_u64<E: de::Error>(self, v: u64) -> Result<Amount, E> {
        Ok(Amount(Decimal::from(v)))
    }

    fn visit_f64<E: de::Error>(self, v: f64) -> Result<Amount, E> {
        Decimal::try_from(v)
            .map(Amount)
            .map_err(|_| E::custom(format!("amount {v} is out of range")))
    }

    fn visit_str<E: de::Error>(self, v: &str) -> Result<Amount, E> {
        Decimal::from_str(v.trim())
            .map(Amount)
            .map_err(|e| E::custom(format!("invalid amount '{v}': {e}")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn amount(n: i64) -> Option<Amount> {
        Some(Amount::from(n))
    }

    #[test]
    fn test_parse_thousand_suffix() {
        assert_eq!(parse_amount("50k"), amount(50_000));
        assert_eq!(parse_amount("15K"), amount(15_000));
        assert_eq!(parse_amount("1.5k"), amount(1_500));
    }

    #[test]
    fn test_parse_million_suffixes() {
        assert_eq!(parse_amount("2jt"), amount(2_000_000));
        assert_eq!(parse_amount("2 juta"), amount(2_000_000));
        assert_eq!(parse_amount("1.25JT"), amount(1_250_000));
    }

    #[test]
    fn test_parse_plain_number() {
        assert_eq!(parse_amount("15000"), amount(15_000));
        assert_eq!(parse_amount("  20 000 "), amount(20_000));
        assert_eq!(parse_amount("12.5"), Some(Amount::new(Decimal::new(125, 1))));
    }

    #[test]
    fn test_parse_unreadable_is_none() {
        assert_eq!(parse_amount("abc"), None);
        assert_eq!(parse_amount(""), None);
        assert_eq!(parse_amount("k"), None);
        assert_eq!(parse_amount("juta"), None);
        assert_eq!(parse_amount("."), None);
    }

    #[test]
    fn test_thousand_wins_over_million() {
        // The 'k' is removed, leaving "5jt" whose numeric prefix is 5.
        assert_eq!(parse_amount("5kjt"), amount(5_000));
    }

    #[test]
    fn test_thousand_matches_anywhere() {
        // Only the first 'k' is removed: "1k5" -> "15".
        assert_eq!(parse_amount("1k5"), amount(15_000));
        assert_eq!(parse_amount("rp10k"), None);
    }

    #[test]
    fn test_numeric_prefix_ignores_trailing_text() {
        assert_eq!(parse_amount("2,5jt"), amount(2_000_000));
        assert_eq!(parse_amount("25000rb"), amount(25_000));
        assert_eq!(parse_amount("1e3"), amount(1_000));
        assert_eq!(parse_amount("7e"), amount(7));
    }

    #[test]
    fn test_sign_is_not_validated() {
        assert_eq!(parse_amount("-5k"), amount(-5_000));
        assert_eq!(parse_amount("0"), amount(0));
        assert!(!parse_amount("0").unwrap().is_positive());
        assert!(parse_amount("-1").unwrap().is_negative());
    }

    #[test]
    fn test_from_str_error() {
        let err = Amount::from_str("lots").unwrap_err();
        assert_eq!(err.to_string(), "Unable to read an amount from 'lots'");
    }

    #[test]
    fn test_display_rupiah() {
        assert_eq!(Amount::from(2_000_000).to_string(), "Rp 2.000.000");
        assert_eq!(Amount::from(0).to_string(), "Rp 0");
        assert_eq!(Amount::from(-15_000).to_string(), "-Rp 15.000");
        assert_eq!(Amount::new(Decimal::new(12345, 1)).to_string(), "Rp 1.234,50");
    }

    #[test]
    fn test_plain_string() {
        assert_eq!(Amount::from(1_500).to_plain_string(), "1500");
        assert_eq!(parse_amount("2.50").unwrap().to_plain_string(), "2.5");
    }

    #[test]
    fn test_serde() {
        let json = serde_json::to_string(&Amount::from(50_000)).unwrap();
        assert_eq!(json, "\"50000\"");
        let a: Amount = serde_json::from_str("\"50000\"").unwrap();
        assert_eq!(a, Amount::from(50_000));
        let b: Amount = serde_json::from_str("25000").unwrap();
        assert_eq!(b, Amount::from(25_000));
        let c: Amount = serde_json::from_str("1500.5").unwrap();
        assert_eq!(c, Amount::new(Decimal::new(15005, 1)));
    }

    #[test]
    fn test_sum() {
        let total: Amount = [Amount::from(1), Amount::from(2), Amount::from(3)]
            .iter()
            .sum();
        assert_eq!(total, Amount::from(6));
    }

    #[test]
    fn test_parse_overflowing_multiplier_is_none() {
        assert_eq!(parse_amount("99999999999999999999999999k"), None);
        assert_eq!(parse_amount("1e25jt"), None);
        let largest = Decimal::from_scientific("1e26").unwrap();
        assert_eq!(parse_amount("1e20jt"), Some(Amount::new(largest)));
    }

    #[test]
    fn test_arithmetic_saturates() {
        let big = Amount::new(Decimal::MAX);
        assert_eq!(big + Amount::from(1), big);
        assert_eq!([big, big].iter().sum::<Amount>(), big);
        assert_eq!(Amount::new(Decimal::MIN) - Amount::from(1), Amount::new(Decimal::MIN));
    }
}
