//! Editing helpers for the in-progress basis worksheet.

use k1_domain::{BasisStatus, Decimal, EntryDirection, LedgerEntry, Worksheet, WorksheetSnapshot};

use crate::{calculator::worksheet_total, CoreError};

/// Provides mutation helpers for [`Worksheet`] instances.
pub struct WorksheetService;

impl WorksheetService {
    pub fn set_starting_value(worksheet: &mut Worksheet, value: impl Into<String>) {
        worksheet.initial_basis = value.into();
    }

    /// Appends a blank entry and returns its id.
    pub fn add_entry(worksheet: &mut Worksheet, direction: EntryDirection) -> String {
        worksheet.push_entry(LedgerEntry::new(direction))
    }

    pub fn add_entry_with(
        worksheet: &mut Worksheet,
        direction: EntryDirection,
        description: impl Into<String>,
        amount: impl Into<String>,
    ) -> String {
        let entry = LedgerEntry::new(direction)
            .with_description(description)
            .with_amount(amount);
        worksheet.push_entry(entry)
    }

    pub fn update_description(
        worksheet: &mut Worksheet,
        id: &str,
        description: impl Into<String>,
    ) -> Result<(), CoreError> {
        let entry = worksheet
            .entry_mut(id)
            .ok_or_else(|| CoreError::EntryNotFound(id.to_string()))?;
        entry.description = description.into();
        Ok(())
    }

    pub fn update_amount(
        worksheet: &mut Worksheet,
        id: &str,
        amount: impl Into<String>,
    ) -> Result<(), CoreError> {
        let entry = worksheet
            .entry_mut(id)
            .ok_or_else(|| CoreError::EntryNotFound(id.to_string()))?;
        entry.amount = amount.into();
        Ok(())
    }

    pub fn remove_entry(worksheet: &mut Worksheet, id: &str) -> Result<LedgerEntry, CoreError> {
        let index = worksheet
            .items
            .iter()
            .position(|entry| entry.id == id)
            .ok_or_else(|| CoreError::EntryNotFound(id.to_string()))?;
        Ok(worksheet.items.remove(index))
    }

    pub fn total(worksheet: &Worksheet) -> Decimal {
        worksheet_total(worksheet)
    }

    pub fn status(worksheet: &Worksheet) -> BasisStatus {
        BasisStatus::classify(worksheet_total(worksheet))
    }
}

/// The worksheet currently being edited together with the name it will be saved under.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct WorksheetDraft {
    pub name: String,
    pub worksheet: Worksheet,
}

impl WorksheetDraft {
    pub fn from_snapshot(snapshot: &WorksheetSnapshot) -> Self {
        Self {
            name: snapshot.name.clone(),
            worksheet: snapshot.to_worksheet(),
        }
    }

    /// Resets the starting value, the entries and the name.
    pub fn clear(&mut self) {
        *self = Self::default();
    }
}
