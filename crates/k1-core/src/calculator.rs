//! Running ledger calculator: folds signed entries onto a starting value.

use k1_domain::{coerce_amount, BasisStatus, Decimal, EntryDirection, SignedAmount, Worksheet};

/// Adds every entry's signed contribution to `starting`.
///
/// Amounts are exact decimals, so the result is the same for any entry order.
pub fn running_total<'a, I, T>(starting: Decimal, entries: I) -> Decimal
where
    I: IntoIterator<Item = &'a T>,
    T: SignedAmount + 'a,
{
    entries
        .into_iter()
        .fold(starting, |total, entry| total.saturating_add(entry.signed_amount()))
}

/// Ending basis of a worksheet; malformed amounts count as zero.
pub fn worksheet_total(worksheet: &Worksheet) -> Decimal {
    running_total(worksheet.starting_value(), &worksheet.items)
}

/// Breakdown of a worksheet total as shown to the user.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BasisSummary {
    pub starting: Decimal,
    pub increases: Decimal,
    pub decreases: Decimal,
    pub total: Decimal,
    pub status: BasisStatus,
}

impl BasisSummary {
    pub fn of(worksheet: &Worksheet) -> Self {
        let starting = coerce_amount(&worksheet.initial_basis);
        let side = |direction| {
            worksheet
                .entries_by(direction)
                .fold(Decimal::ZERO, |sum, entry| sum.saturating_add(entry.amount_value()))
        };
        let increases = side(EntryDirection::Increase);
        let decreases = side(EntryDirection::Decrease);
        let total = worksheet_total(worksheet);
        Self {
            starting,
            increases,
            decreases,
            total,
            status: BasisStatus::classify(total),
        }
    }
}
