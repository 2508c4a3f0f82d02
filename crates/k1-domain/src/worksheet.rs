//! Basis worksheet models: signed entries, the running ledger, and named snapshots.

use std::{fmt, str::FromStr};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::common::*;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
/// Whether an entry raises or lowers the running total.
pub enum EntryDirection {
    Increase,
    Decrease,
}

impl EntryDirection {
    pub fn from_label(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "increase" | "inc" | "+" => Some(EntryDirection::Increase),
            "decrease" | "dec" | "-" => Some(EntryDirection::Decrease),
            _ => None,
        }
    }

    pub fn sign(self) -> Decimal {
        match self {
            EntryDirection::Increase => Decimal::ONE,
            EntryDirection::Decrease => Decimal::NEGATIVE_ONE,
        }
    }
}

impl fmt::Display for EntryDirection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            EntryDirection::Increase => "Increase",
            EntryDirection::Decrease => "Decrease",
        };
        f.write_str(label)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
/// A single worksheet line. The amount is kept exactly as the user typed it.
pub struct LedgerEntry {
    pub id: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub amount: String,
    #[serde(rename = "type")]
    pub direction: EntryDirection,
}

impl LedgerEntry {
    pub fn new(direction: EntryDirection) -> Self {
        Self {
            id: Uuid::new_v4().simple().to_string(),
            description: String::new(),
            amount: String::new(),
            direction,
        }
    }

    pub fn with_amount(mut self, amount: impl Into<String>) -> Self {
        self.amount = amount.into();
        self
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    /// Numeric value of the raw amount, zero when it cannot be read.
    pub fn amount_value(&self) -> Decimal {
        coerce_amount(&self.amount)
    }
}

impl Keyed for LedgerEntry {
    fn key(&self) -> &str {
        &self.id
    }
}

impl SignedAmount for LedgerEntry {
    fn signed_amount(&self) -> Decimal {
        self.direction.sign() * self.amount_value()
    }
}

impl Displayable for LedgerEntry {
    fn display_label(&self) -> String {
        let description = if self.description.trim().is_empty() {
            "(no description)"
        } else {
            self.description.trim()
        };
        format!("{} {} ({})", self.direction, description, self.amount_value())
    }
}

/// Reads a user-entered number leniently.
///
/// Leading whitespace is skipped and the longest numeric prefix is used, so
/// `"12abc"` reads as `12`. Input without a numeric prefix, or one too large
/// for a `Decimal`, reads as `0`.
pub fn coerce_amount(raw: &str) -> Decimal {
    let text = raw.trim_start();
    let bytes = text.as_bytes();
    let mut end = 0;
    if matches!(bytes.first(), Some(b'+') | Some(b'-')) {
        end = 1;
    }
    let sign = &text[..end];
    let int_start = end;
    while end < bytes.len() && bytes[end].is_ascii_digit() {
        end += 1;
    }
    let integer = &text[int_start..end];
    let mut fraction = "";
    if end < bytes.len() && bytes[end] == b'.' {
        let frac_start = end + 1;
        let mut cursor = frac_start;
        while cursor < bytes.len() && bytes[cursor].is_ascii_digit() {
            cursor += 1;
        }
        fraction = &text[frac_start..cursor];
        end = cursor;
    }
    if integer.is_empty() && fraction.is_empty() {
        return Decimal::ZERO;
    }

    let mut mantissa = String::with_capacity(end + 1);
    mantissa.push_str(sign);
    mantissa.push_str(if integer.is_empty() { "0" } else { integer });
    if !fraction.is_empty() {
        mantissa.push('.');
        mantissa.push_str(fraction);
    }

    let mut exponent = None;
    if end < bytes.len() && matches!(bytes[end], b'e' | b'E') {
        let mut cursor = end + 1;
        if matches!(bytes.get(cursor), Some(b'+') | Some(b'-')) {
            cursor += 1;
        }
        let exp_start = cursor;
        while cursor < bytes.len() && bytes[cursor].is_ascii_digit() {
            cursor += 1;
        }
        if cursor > exp_start {
            exponent = Some(&text[end + 1..cursor]);
        }
    }

    let parsed = match exponent {
        Some(exponent) => Decimal::from_scientific(&format!("{mantissa}e{exponent}")),
        None => Decimal::from_str(&mantissa),
    };
    parsed
        .map(|value| value.normalize())
        .unwrap_or(Decimal::ZERO)
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
/// Working copy of a basis worksheet: a starting value plus ordered entries.
pub struct Worksheet {
    #[serde(default)]
    pub initial_basis: String,
    #[serde(default)]
    pub items: Vec<LedgerEntry>,
}

impl Worksheet {
    pub fn new(initial_basis: impl Into<String>) -> Self {
        Self {
            initial_basis: initial_basis.into(),
            items: Vec::new(),
        }
    }

    pub fn starting_value(&self) -> Decimal {
        coerce_amount(&self.initial_basis)
    }

    pub fn push_entry(&mut self, entry: LedgerEntry) -> String {
        let id = entry.id.clone();
        self.items.push(entry);
        id
    }

    pub fn entry(&self, id: &str) -> Option<&LedgerEntry> {
        self.items.iter().find(|entry| entry.id == id)
    }

    pub fn entry_mut(&mut self, id: &str) -> Option<&mut LedgerEntry> {
        self.items.iter_mut().find(|entry| entry.id == id)
    }

    pub fn entries_by(&self, direction: EntryDirection) -> impl Iterator<Item = &LedgerEntry> {
        self.items
            .iter()
            .filter(move |entry| entry.direction == direction)
    }

    pub fn is_empty(&self) -> bool {
        self.initial_basis.trim().is_empty() && self.items.is_empty()
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
/// Persisted, named capture of a worksheet.
pub struct WorksheetSnapshot {
    pub name: String,
    #[serde(default)]
    pub initial_basis: String,
    #[serde(default)]
    pub items: Vec<LedgerEntry>,
    pub date: DateTime<Utc>,
}

impl WorksheetSnapshot {
    pub fn capture(name: impl Into<String>, worksheet: &Worksheet, date: DateTime<Utc>) -> Self {
        Self {
            name: name.into(),
            initial_basis: worksheet.initial_basis.clone(),
            items: worksheet.items.clone(),
            date,
        }
    }

    pub fn to_worksheet(&self) -> Worksheet {
        Worksheet {
            initial_basis: self.initial_basis.clone(),
            items: self.items.clone(),
        }
    }
}

impl Titled for WorksheetSnapshot {
    fn title(&self) -> &str {
        &self.name
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
/// Sign classification of an ending basis.
pub enum BasisStatus {
    Positive,
    Zero,
    Negative,
}

impl BasisStatus {
    pub fn classify(total: Decimal) -> Self {
        if total.is_zero() {
            BasisStatus::Zero
        } else if total.is_sign_negative() {
            BasisStatus::Negative
        } else {
            BasisStatus::Positive
        }
    }

    pub fn is_invalid(self) -> bool {
        matches!(self, BasisStatus::Negative)
    }
}

pub const NEGATIVE_BASIS_WARNING: &str = "Negative basis is not allowed for tax purposes. This may indicate that you've received distributions in excess of basis (taxable as capital gain) or that there's an error in your calculations.";

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn coerce_amount_reads_numeric_prefix() {
        assert_eq!(coerce_amount("40000"), dec!(40000));
        assert_eq!(coerce_amount("  12.5"), dec!(12.5));
        assert_eq!(coerce_amount("12abc"), dec!(12));
        assert_eq!(coerce_amount("+7"), dec!(7));
        assert_eq!(coerce_amount("-3.25"), dec!(-3.25));
        assert_eq!(coerce_amount(".5"), dec!(0.5));
        assert_eq!(coerce_amount("5."), dec!(5));
        assert_eq!(coerce_amount("1e3"), dec!(1000));
        assert_eq!(coerce_amount("1.5E+2"), dec!(150));
        assert_eq!(coerce_amount("25e-2"), dec!(0.25));
        assert_eq!(coerce_amount("2e"), dec!(2));
        assert_eq!(coerce_amount("40,000"), dec!(40));
    }

    #[test]
    fn coerce_amount_degrades_to_zero() {
        assert_eq!(coerce_amount(""), Decimal::ZERO);
        assert_eq!(coerce_amount("abc"), Decimal::ZERO);
        assert_eq!(coerce_amount("-"), Decimal::ZERO);
        assert_eq!(coerce_amount("."), Decimal::ZERO);
        assert_eq!(coerce_amount("1e999"), Decimal::ZERO);
        assert_eq!(coerce_amount("99999999999999999999999999999999"), Decimal::ZERO);
        assert!(coerce_amount("-0").is_sign_positive());
    }

    #[test]
    fn entry_serializes_with_type_tag() {
        let entry = LedgerEntry {
            id: "1700000000000".into(),
            description: "Share of income".into(),
            amount: "2500".into(),
            direction: EntryDirection::Increase,
        };
        let json = serde_json::to_value(&entry).unwrap();
        assert_eq!(json["type"], "increase");
        assert_eq!(json["amount"], "2500");
    }

    #[test]
    fn snapshot_uses_camel_case_keys() {
        let mut worksheet = Worksheet::new("50000");
        worksheet.push_entry(LedgerEntry::new(EntryDirection::Decrease).with_amount("30000"));
        let snapshot = WorksheetSnapshot::capture("2024", &worksheet, Utc::now());
        let json = serde_json::to_value(&snapshot).unwrap();
        assert_eq!(json["initialBasis"], "50000");
        assert_eq!(json["items"][0]["type"], "decrease");
        assert_eq!(snapshot.to_worksheet(), worksheet);
    }

    #[test]
    fn basis_status_flags_negative_totals() {
        assert_eq!(BasisStatus::classify(dec!(-10000)), BasisStatus::Negative);
        assert!(BasisStatus::classify(dec!(-0.01)).is_invalid());
        assert_eq!(BasisStatus::classify(Decimal::ZERO), BasisStatus::Zero);
        assert!(!BasisStatus::classify(dec!(20000)).is_invalid());
    }
}
