//! Expansion of the vaccine catalogue into a child's dose records.
//!
//! Generation is pure: it neither reads nor writes storage, so calling it
//! twice yields two independent schedules. Guarding against a second
//! generation for the same child belongs to the enrolment flow, which
//! generates exactly once inside the transaction that creates the child.

use chrono::{Days, NaiveDate};
use thiserror::Error;

use super::{ChildId, DoseRecord, DoseRecordId, VaccineCatalogue};

/// Errors raised while generating a schedule.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ScheduleGenerationError {
    /// A due date would fall beyond the supported calendar range.
    #[error("due date for {vaccine} is out of range")]
    DueDateOutOfRange {
        /// Catalogue entry whose offset overflowed.
        vaccine: String,
    },
}

/// Build one pending dose per catalogue entry, in catalogue order, with
/// `due_date = date_of_birth + offset_days`.
///
/// # Examples
/// ```
/// use chrono::NaiveDate;
/// use immunisation::domain::{generate_schedule, ChildId, VaccineCatalogue};
///
/// let dob = NaiveDate::from_ymd_opt(2024, 1, 1).expect("valid date");
/// let doses = generate_schedule(ChildId::random(), dob, VaccineCatalogue::national())
///     .expect("in range");
/// assert_eq!(doses.len(), VaccineCatalogue::national().len());
/// ```
pub fn generate_schedule(
    child_id: ChildId,
    date_of_birth: NaiveDate,
    catalogue: &VaccineCatalogue,
) -> Result<Vec<DoseRecord>, ScheduleGenerationError> {
    catalogue
        .entries()
        .iter()
        .map(|entry| {
            let due_date = date_of_birth
                .checked_add_days(Days::new(u64::from(entry.offset_days())))
                .ok_or_else(|| ScheduleGenerationError::DueDateOutOfRange {
                    vaccine: entry.name().to_owned(),
                })?;
            Ok(DoseRecord::scheduled(
                DoseRecordId::random(),
                child_id,
                entry.name(),
                entry.description(),
                due_date,
            ))
        })
        .collect()
}

#[cfg(test)]
mod tests {
    //! Regression coverage for schedule expansion.

    use rstest::rstest;

    use super::*;
    use crate::domain::{DoseStatus, VaccineCatalogueEntry};

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).expect("valid date")
    }

    #[rstest]
    fn birth_and_six_week_doses_land_on_expected_dates() {
        let catalogue = VaccineCatalogue::new(vec![
            VaccineCatalogueEntry::new("BCG", "Tuberculosis", 0).expect("entry"),
            VaccineCatalogueEntry::new("Pentavalent 1", "DPT-HepB-Hib", 42).expect("entry"),
        ])
        .expect("catalogue");
        let child_id = ChildId::random();

        let doses = generate_schedule(child_id, date(2024, 1, 1), &catalogue).expect("schedule");

        let summary: Vec<_> = doses
            .iter()
            .map(|dose| (dose.vaccine_name(), dose.due_date(), dose.status()))
            .collect();
        assert_eq!(
            summary,
            [
                ("BCG", date(2024, 1, 1), DoseStatus::Pending),
                ("Pentavalent 1", date(2024, 2, 12), DoseStatus::Pending),
            ]
        );
        assert!(doses.iter().all(|dose| dose.child_id() == child_id));
        assert!(doses.iter().all(|dose| dose.completion_date().is_none()));
    }

    #[rstest]
    #[case(date(2023, 12, 31))]
    #[case(date(2024, 2, 29))]
    #[case(date(2025, 6, 15))]
    fn national_schedule_offsets_hold_for_every_entry(#[case] dob: NaiveDate) {
        let catalogue = VaccineCatalogue::national();
        let doses = generate_schedule(ChildId::random(), dob, catalogue).expect("schedule");

        assert_eq!(doses.len(), catalogue.len());
        for (dose, entry) in doses.iter().zip(catalogue.entries()) {
            assert_eq!(dose.vaccine_name(), entry.name());
            assert_eq!((dose.due_date() - dob).num_days(), i64::from(entry.offset_days()));
        }
    }

    #[rstest]
    fn every_dose_gets_a_distinct_id() {
        let doses = generate_schedule(ChildId::random(), date(2024, 1, 1), VaccineCatalogue::national())
            .expect("schedule");
        let mut ids: Vec<_> = doses.iter().map(DoseRecord::id).collect();
        ids.sort();
        ids.dedup();
        assert_eq!(ids.len(), doses.len());
    }

    #[rstest]
    fn overflowing_offsets_are_reported() {
        let catalogue = VaccineCatalogue::new(vec![
            VaccineCatalogueEntry::new("Late", "", 1).expect("entry"),
        ])
        .expect("catalogue");
        let err = generate_schedule(ChildId::random(), NaiveDate::MAX, &catalogue)
            .expect_err("overflow");
        assert_eq!(
            err,
            ScheduleGenerationError::DueDateOutOfRange {
                vaccine: "Late".to_owned(),
            }
        );
    }
}
