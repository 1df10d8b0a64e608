//! Registration against the shared row sheet.
//!
//! The service never caches rows: each call re-reads the columns it needs so
//! the duplicate and free-slot decisions always work on current state. It is
//! still not transactionally safe against concurrent external writers — two
//! simultaneous registrations can race for the same free row — but the store
//! is append-only, so a post-hoc duplicate is a reportable condition rather
//! than corruption.

use crate::error::{Result, ShiftError};
use crate::name::{fold_for_compare, Profile};
use crate::store::{find_identifier, first_free_row, normalize_identifier, RowFields, RowStore};
use crate::types::{Column, RowStatus};
use tracing::info;

/// A successful registration: the assigned row plus the normalized profile.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Registration {
    pub row: u32,
    pub profile: Profile,
}

pub struct RegistrationService<S: RowStore> {
    store: S,
}

impl<S: RowStore> RegistrationService<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn store_mut(&mut self) -> &mut S {
        &mut self.store
    }

    pub fn into_store(self) -> S {
        self.store
    }

    /// Find an existing registration by external identifier.
    pub fn lookup(&self, identifier: &str) -> Result<Option<(u32, RowStatus)>> {
        let column_a = self.store.read_column(Column::A)?;
        let Some(row) = find_identifier(&column_a, identifier) else {
            return Ok(None);
        };
        let record = self.store.read_row(row)?;
        Ok(Some((row, record.status())))
    }

    /// Register a crew member, appending a new row at the first free slot.
    ///
    /// Archived rows block re-registration of their identifier but free
    /// their name for reuse — scoping the duplicate checks to active rows is
    /// a deliberate policy, not an oversight.
    pub fn register(
        &mut self,
        identifier: &str,
        last: &str,
        first: &str,
        middle: Option<&str>,
    ) -> Result<Registration> {
        let column_a = self.store.read_column(Column::A)?;

        if let Some(row) = find_identifier(&column_a, identifier) {
            let record = self.store.read_row(row)?;
            return match record.status() {
                RowStatus::Archived => Err(ShiftError::RegistrationBlocked { row }),
                RowStatus::Active => Err(ShiftError::AlreadyRegistered { row }),
            };
        }

        let profile = Profile::from_raw(last, first, middle)?;

        if self.active_name_exists(&profile)? {
            return Err(ShiftError::DuplicateName(profile.full_name()));
        }

        let row = first_free_row(&column_a);
        let fields = RowFields::new()
            .with(Column::A, normalize_identifier(identifier))
            .with(Column::B, profile.last.clone())
            .with(Column::C, profile.first.clone())
            .with(Column::D, profile.middle.clone().unwrap_or_default())
            .with(Column::E, profile.compact())
            .with(Column::G, RowStatus::Active.as_str());
        self.store.append_row(row, &fields)?;

        info!(row, name = %profile.full_name(), "registered crew member");
        Ok(Registration { row, profile })
    }

    /// Flip a row's status. Archiving frees the name and identifier for a
    /// future registration; the row itself is never deleted.
    pub fn set_status(&mut self, row: u32, status: RowStatus) -> Result<()> {
        self.store.write_cell(row, Column::G, status.as_str())?;
        info!(row, status = %status, "row status updated");
        Ok(())
    }

    /// Write a material reference into the row's material cell (column F).
    /// The reference is considered immutable once written.
    pub fn record_material_reference(&mut self, row: u32, reference: &str) -> Result<()> {
        self.store.write_cell(row, Column::F, reference)?;
        info!(row, reference, "material reference recorded");
        Ok(())
    }

    /// Duplicate check over the freshly read name and status columns.
    /// Compares the folded full name; rows without split name pieces fall
    /// back to their compact display cell.
    fn active_name_exists(&self, candidate: &Profile) -> Result<bool> {
        let lasts = self.store.read_column(Column::B)?;
        let firsts = self.store.read_column(Column::C)?;
        let middles = self.store.read_column(Column::D)?;
        let compacts = self.store.read_column(Column::E)?;
        let statuses = self.store.read_column(Column::G)?;

        let target = fold_for_compare(&candidate.full_name());
        let rows = lasts
            .len()
            .max(firsts.len())
            .max(middles.len())
            .max(compacts.len())
            .max(statuses.len());

        fn cell<'a>(col: &'a [String], i: usize) -> &'a str {
            col.get(i).map(String::as_str).unwrap_or("")
        }

        for i in 0..rows {
            if RowStatus::from_cell(cell(&statuses, i)) != RowStatus::Active {
                continue;
            }
            let full = [cell(&lasts, i), cell(&firsts, i), cell(&middles, i)]
                .iter()
                .filter(|p| !p.trim().is_empty())
                .cloned()
                .collect::<Vec<_>>()
                .join(" ");
            let existing = if full.is_empty() {
                cell(&compacts, i).to_string()
            } else {
                full
            };
            if !existing.trim().is_empty() && fold_for_compare(&existing) == target {
                return Ok(true);
            }
        }
        Ok(false)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sheet::MemorySheet;
    use crate::store::RowRecord;

    fn service() -> RegistrationService<MemorySheet> {
        RegistrationService::new(MemorySheet::new())
    }

    #[test]
    fn first_registration_lands_on_row_two() {
        let mut svc = service();
        let reg = svc.register("42", "иванов", "иван", None).unwrap();
        assert_eq!(reg.row, 2);
        assert_eq!(reg.profile.last, "Иванов");

        let record = svc.store().read_row(2).unwrap();
        assert_eq!(record.get(Column::A), "42");
        assert_eq!(record.get(Column::B), "Иванов");
        assert_eq!(record.get(Column::C), "Иван");
        assert_eq!(record.get(Column::E), "Иванов И.");
        assert_eq!(record.get(Column::F), "");
        assert_eq!(record.get(Column::G), "active");
    }

    #[test]
    fn second_registration_takes_next_row() {
        let mut svc = service();
        svc.register("42", "Иванов", "Иван", None).unwrap();
        let reg = svc.register("43", "Петров", "Пётр", None).unwrap();
        assert_eq!(reg.row, 3);
    }

    #[test]
    fn same_identifier_while_active_is_already_registered() {
        let mut svc = service();
        svc.register("42", "Иванов", "Иван", None).unwrap();

        let err = svc.register("42", "Иванов", "Иван", None).unwrap_err();
        assert!(matches!(err, ShiftError::AlreadyRegistered { row: 2 }));
        assert_eq!(svc.store().populated_rows(), 1);
    }

    #[test]
    fn identifier_matching_is_normalized() {
        let mut svc = service();
        svc.register("42", "Иванов", "Иван", None).unwrap();
        // Spreadsheet number formatting may render the cell as "42.0".
        let err = svc.register(" 42.0 ", "Сидоров", "Семён", None).unwrap_err();
        assert!(matches!(err, ShiftError::AlreadyRegistered { row: 2 }));
    }

    #[test]
    fn archived_identifier_is_blocked() {
        let mut svc = service();
        svc.register("42", "Иванов", "Иван", None).unwrap();
        svc.set_status(2, RowStatus::Archived).unwrap();

        let err = svc.register("42", "Иванов", "Иван", None).unwrap_err();
        assert!(matches!(err, ShiftError::RegistrationBlocked { row: 2 }));
        assert_eq!(svc.store().populated_rows(), 1);
    }

    #[test]
    fn active_duplicate_name_is_rejected() {
        let mut svc = service();
        svc.register("42", "Иванов", "Иван", None).unwrap();

        let err = svc.register("43", "ИВАНОВ", "иван", None).unwrap_err();
        assert!(matches!(err, ShiftError::DuplicateName(_)));
        assert_eq!(svc.store().populated_rows(), 1);
    }

    #[test]
    fn archiving_frees_the_name_for_a_new_identifier() {
        let mut svc = service();
        svc.register("42", "Иванов", "Иван", None).unwrap();
        svc.set_status(2, RowStatus::Archived).unwrap();

        let reg = svc.register("43", "Иванов", "Иван", None).unwrap();
        assert_eq!(reg.row, 3);
        assert_eq!(svc.store().populated_rows(), 2);
    }

    #[test]
    fn duplicate_check_falls_back_to_compact_cell() {
        let mut svc = service();
        // A legacy row with only the compact display name filled in.
        svc.store_mut().seed_cell(2, 0, "41");
        svc.store_mut().seed_cell(2, 4, "Иванов Иван");
        svc.store_mut().seed_cell(2, 6, "active");

        let err = svc.register("43", "иванов", "иван", None).unwrap_err();
        assert!(matches!(err, ShiftError::DuplicateName(_)));
    }

    #[test]
    fn invalid_name_propagates_without_append() {
        let mut svc = service();
        let err = svc.register("42", "ivan123", "Иван", None).unwrap_err();
        assert!(matches!(err, ShiftError::InvalidName));
        assert_eq!(svc.store().populated_rows(), 0);
    }

    #[test]
    fn register_never_touches_columns_past_g() {
        let mut svc = service();
        svc.store_mut().seed_cell(2, 7, "H-data");
        svc.store_mut().seed_cell(2, 8, "I-data");
        svc.store_mut().seed_cell(3, 7, "H-next");

        svc.register("42", "Иванов", "Иван", None).unwrap();
        svc.register("43", "Петров", "Пётр", None).unwrap();

        assert_eq!(svc.store().cell_raw(2, 7), "H-data");
        assert_eq!(svc.store().cell_raw(2, 8), "I-data");
        assert_eq!(svc.store().cell_raw(3, 7), "H-next");
    }

    #[test]
    fn registration_fills_gaps_in_column_a() {
        let mut svc = service();
        svc.store_mut().seed_cell(2, 0, "100");
        svc.store_mut().seed_cell(4, 0, "300");
        svc.store_mut().seed_cell(2, 6, "active");
        svc.store_mut().seed_cell(4, 6, "active");

        let reg = svc.register("42", "Иванов", "Иван", None).unwrap();
        assert_eq!(reg.row, 3);
    }

    #[test]
    fn lookup_reports_row_and_status() {
        let mut svc = service();
        assert_eq!(svc.lookup("42").unwrap(), None);

        svc.register("42", "Иванов", "Иван", None).unwrap();
        assert_eq!(svc.lookup("42").unwrap(), Some((2, RowStatus::Active)));

        svc.set_status(2, RowStatus::Archived).unwrap();
        assert_eq!(svc.lookup("42").unwrap(), Some((2, RowStatus::Archived)));
    }

    #[test]
    fn material_reference_goes_to_column_f() {
        let mut svc = service();
        let reg = svc.register("42", "Иванов", "Иван", None).unwrap();
        svc.record_material_reference(reg.row, "/shiftcrew/2024-01-01/row_2_uid_42")
            .unwrap();
        let record = svc.store().read_row(reg.row).unwrap();
        assert_eq!(record.get(Column::F), "/shiftcrew/2024-01-01/row_2_uid_42");
    }

    #[test]
    fn duplicate_check_covers_ragged_column_lengths() {
        // A store may return columns of unequal length; a compact-only row
        // past the end of the name columns must still be scanned.
        struct RaggedStore;

        impl RowStore for RaggedStore {
            fn read_column(&self, col: Column) -> crate::error::Result<Vec<String>> {
                Ok(match col {
                    Column::A => vec!["41".to_string()],
                    Column::E => vec![String::new(), "Иванов Иван".to_string()],
                    _ => Vec::new(),
                })
            }
            fn read_row(&self, _row: u32) -> crate::error::Result<RowRecord> {
                Ok(RowRecord::new())
            }
            fn append_row(&mut self, _row: u32, _fields: &RowFields) -> crate::error::Result<()> {
                Ok(())
            }
            fn write_cell(
                &mut self,
                _row: u32,
                _col: Column,
                _value: &str,
            ) -> crate::error::Result<()> {
                Ok(())
            }
        }

        let mut svc = RegistrationService::new(RaggedStore);
        let err = svc.register("43", "иванов", "иван", None).unwrap_err();
        assert!(matches!(err, ShiftError::DuplicateName(_)));
    }

    // -----------------------------------------------------------------------
    // Store failure propagation
    // -----------------------------------------------------------------------

    struct DownStore;

    impl RowStore for DownStore {
        fn read_column(&self, _col: Column) -> crate::error::Result<Vec<String>> {
            Err(ShiftError::StoreUnavailable("connection reset".into()))
        }
        fn read_row(&self, _row: u32) -> crate::error::Result<RowRecord> {
            Err(ShiftError::StoreUnavailable("connection reset".into()))
        }
        fn append_row(&mut self, _row: u32, _fields: &RowFields) -> crate::error::Result<()> {
            Err(ShiftError::StoreUnavailable("connection reset".into()))
        }
        fn write_cell(
            &mut self,
            _row: u32,
            _col: Column,
            _value: &str,
        ) -> crate::error::Result<()> {
            Err(ShiftError::StoreUnavailable("connection reset".into()))
        }
    }

    #[test]
    fn store_outage_surfaces_as_store_unavailable() {
        let mut svc = RegistrationService::new(DownStore);
        let err = svc.register("42", "Иванов", "Иван", None).unwrap_err();
        assert!(matches!(err, ShiftError::StoreUnavailable(_)));
        assert!(err.is_transient());
    }
}
