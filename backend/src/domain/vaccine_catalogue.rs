//! The national immunisation catalogue.
//!
//! The catalogue is static input: an explicitly ordered list of vaccines and
//! the age, in days since birth, at which each dose falls due. Presentation
//! order downstream is decided by due date, but generation order follows the
//! catalogue so that schedules are deterministic.

use std::sync::OnceLock;

use thiserror::Error;

/// One row of the catalogue.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VaccineCatalogueEntry {
    name: String,
    description: String,
    offset_days: u32,
}

impl VaccineCatalogueEntry {
    /// Build an entry after checking the vaccine name is not blank.
    ///
    /// # Examples
    /// ```
    /// use immunisation::domain::VaccineCatalogueEntry;
    ///
    /// let entry = VaccineCatalogueEntry::new("BCG", "Tuberculosis", 0).expect("valid entry");
    /// assert_eq!(entry.offset_days(), 0);
    /// ```
    pub fn new(
        name: impl Into<String>,
        description: impl Into<String>,
        offset_days: u32,
    ) -> Result<Self, CatalogueValidationError> {
        let name = name.into();
        if name.trim().is_empty() {
            return Err(CatalogueValidationError::BlankName);
        }
        Ok(Self {
            name,
            description: description.into(),
            offset_days,
        })
    }

    /// Vaccine name, e.g. `Pentavalent 1`.
    pub fn name(&self) -> &str {
        self.name.as_str()
    }

    /// Clinical description of what the dose protects against.
    pub fn description(&self) -> &str {
        self.description.as_str()
    }

    /// Age in days since birth at which the dose falls due.
    pub fn offset_days(&self) -> u32 {
        self.offset_days
    }
}

/// Errors raised while assembling a catalogue.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CatalogueValidationError {
    /// An entry has an empty vaccine name.
    #[error("vaccine name must not be blank")]
    BlankName,
    /// The catalogue contains no entries.
    #[error("vaccine catalogue must contain at least one entry")]
    Empty,
    /// Entries are not sorted by ascending offset.
    #[error("catalogue entry {name} (day {offset_days}) is out of order")]
    OutOfOrder {
        /// Name of the first misplaced entry.
        name: String,
        /// Offset of the first misplaced entry.
        offset_days: u32,
    },
}

/// Ordered catalogue of vaccine doses.
///
/// ## Invariants
/// - At least one entry.
/// - Entries are sorted by `offset_days` ascending; equal offsets keep the
///   order they were supplied in.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VaccineCatalogue {
    entries: Vec<VaccineCatalogueEntry>,
}

impl VaccineCatalogue {
    /// Validate and wrap an ordered list of entries.
    pub fn new(entries: Vec<VaccineCatalogueEntry>) -> Result<Self, CatalogueValidationError> {
        if entries.is_empty() {
            return Err(CatalogueValidationError::Empty);
        }
        if let Some(misplaced) = entries
            .windows(2)
            .find(|pair| pair[1].offset_days < pair[0].offset_days)
            .map(|pair| &pair[1])
        {
            return Err(CatalogueValidationError::OutOfOrder {
                name: misplaced.name.clone(),
                offset_days: misplaced.offset_days,
            });
        }
        Ok(Self { entries })
    }

    /// The national infant schedule: birth doses, the 6/10/14 week series
    /// and the 9 month doses.
    pub fn national() -> &'static Self {
        static NATIONAL: OnceLock<VaccineCatalogue> = OnceLock::new();
        NATIONAL.get_or_init(|| Self {
            entries: NATIONAL_SCHEDULE
                .iter()
                .map(|(name, description, offset_days)| VaccineCatalogueEntry {
                    name: (*name).to_owned(),
                    description: (*description).to_owned(),
                    offset_days: *offset_days,
                })
                .collect(),
        })
    }

    /// Entries in generation order.
    pub fn entries(&self) -> &[VaccineCatalogueEntry] {
        &self.entries
    }

    /// Number of doses a child receives from this catalogue.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Always false for a validated catalogue; provided for API symmetry.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

const PENTAVALENT: &str = "Diphtheria, Pertussis, Tetanus, Hepatitis B, Hib";

const NATIONAL_SCHEDULE: [(&str, &str, u32); 14] = [
    ("BCG", "Tuberculosis", 0),
    ("Hepatitis B (Birth)", "Hepatitis B", 0),
    ("OPV 0", "Polio", 0),
    ("Pentavalent 1", PENTAVALENT, 42),
    ("OPV 1", "Polio", 42),
    ("Rota 1", "Rotavirus", 42),
    ("Pentavalent 2", PENTAVALENT, 70),
    ("OPV 2", "Polio", 70),
    ("Rota 2", "Rotavirus", 70),
    ("Pentavalent 3", PENTAVALENT, 98),
    ("OPV 3", "Polio", 98),
    ("Rota 3", "Rotavirus", 98),
    ("Measles & Rubella 1", "Measles, Rubella", 270),
    ("Vitamin A 1", "Vitamin A deficiency", 270),
];
