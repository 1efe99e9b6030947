//! Enrolled children and their profile value types.
//!
//! A child is created from an unvalidated [`ChildDraft`]; validation reports
//! every missing required field in one error so callers can surface a single
//! complete message. The date of birth anchors the dose schedule and cannot be
//! changed once the child is enrolled.

use std::fmt;
use std::str::FromStr;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use utoipa::ToSchema;

use super::{ChildId, GuardianId};

/// Longest accepted child name, in characters.
pub const CHILD_NAME_MAX: usize = 128;

/// Validation errors raised for child profiles.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ChildValidationError {
    /// One or more required fields were absent or blank.
    #[error("missing required fields: {}", .fields.join(", "))]
    MissingFields {
        /// Wire names of the missing fields, in declaration order.
        fields: Vec<&'static str>,
    },
    /// A profile update supplied a blank name.
    #[error("name must not be blank")]
    BlankName,
    /// The trimmed name exceeds [`CHILD_NAME_MAX`] characters.
    #[error("name must be at most {max} characters")]
    NameTooLong {
        /// Maximum accepted length.
        max: usize,
    },
    /// A profile update tried to change the date of birth.
    #[error("date of birth cannot be changed after enrolment")]
    DateOfBirthImmutable,
    /// A gender label was not recognised.
    #[error("gender must be one of Male, Female, Other")]
    UnknownGender,
    /// A blood group label was not recognised.
    #[error("unknown blood group")]
    UnknownBloodGroup,
}

/// Gender recorded at enrolment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
pub enum Gender {
    /// Male.
    Male,
    /// Female.
    Female,
    /// Other or undisclosed.
    Other,
}

impl Gender {
    /// Stable label used on the wire and in storage.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Male => "Male",
            Self::Female => "Female",
            Self::Other => "Other",
        }
    }
}

impl fmt::Display for Gender {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Gender {
    type Err = ChildValidationError;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        match raw {
            "Male" => Ok(Self::Male),
            "Female" => Ok(Self::Female),
            "Other" => Ok(Self::Other),
            _ => Err(ChildValidationError::UnknownGender),
        }
    }
}

/// ABO/Rh blood group, or `Unknown` when not yet typed.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema,
)]
pub enum BloodGroup {
    #[serde(rename = "A+")]
    APositive,
    #[serde(rename = "A-")]
    ANegative,
    #[serde(rename = "B+")]
    BPositive,
    #[serde(rename = "B-")]
    BNegative,
    #[serde(rename = "AB+")]
    AbPositive,
    #[serde(rename = "AB-")]
    AbNegative,
    #[serde(rename = "O+")]
    OPositive,
    #[serde(rename = "O-")]
    ONegative,
    #[default]
    Unknown,
}

impl BloodGroup {
    /// Stable label used on the wire and in storage.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::APositive => "A+",
            Self::ANegative => "A-",
            Self::BPositive => "B+",
            Self::BNegative => "B-",
            Self::AbPositive => "AB+",
            Self::AbNegative => "AB-",
            Self::OPositive => "O+",
            Self::ONegative => "O-",
            Self::Unknown => "Unknown",
        }
    }
}

impl fmt::Display for BloodGroup {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for BloodGroup {
    type Err = ChildValidationError;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        [
            Self::APositive,
            Self::ANegative,
            Self::BPositive,
            Self::BNegative,
            Self::AbPositive,
            Self::AbNegative,
            Self::OPositive,
            Self::ONegative,
            Self::Unknown,
        ]
        .into_iter()
        .find(|group| group.as_str() == raw)
        .ok_or(ChildValidationError::UnknownBloodGroup)
    }
}

/// Unvalidated enrolment input, typically one form submission or one row of
/// a bulk import.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ChildDraft {
    pub name: Option<String>,
    pub date_of_birth: Option<NaiveDate>,
    pub gender: Option<Gender>,
    pub blood_group: Option<BloodGroup>,
    pub medical_history: Option<String>,
}

/// Partial profile edit. `None` leaves a field unchanged.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ChildProfileUpdate {
    pub name: Option<String>,
    /// Accepted only when equal to the stored date of birth.
    pub date_of_birth: Option<NaiveDate>,
    pub gender: Option<Gender>,
    pub blood_group: Option<BloodGroup>,
    pub medical_history: Option<String>,
}

/// Stored attributes of a child, used to rebuild the entity from persistence.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChildRecord {
    pub id: ChildId,
    pub guardian_id: GuardianId,
    pub name: String,
    pub date_of_birth: NaiveDate,
    pub gender: Gender,
    pub blood_group: BloodGroup,
    pub medical_history: String,
}

fn checked_length(name: String) -> Result<String, ChildValidationError> {
    if name.chars().count() > CHILD_NAME_MAX {
        return Err(ChildValidationError::NameTooLong {
            max: CHILD_NAME_MAX,
        });
    }
    Ok(name)
}

/// An enrolled child.
///
/// ## Invariants
/// - `name` is non-blank, trimmed and at most [`CHILD_NAME_MAX`] characters.
/// - `date_of_birth` never changes after construction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Child {
    id: ChildId,
    guardian_id: GuardianId,
    name: String,
    date_of_birth: NaiveDate,
    gender: Gender,
    blood_group: BloodGroup,
    medical_history: String,
}

impl Child {
    /// Validate a draft and build a new child owned by `guardian_id`.
    ///
    /// # Examples
    /// ```
    /// use chrono::NaiveDate;
    /// use immunisation::domain::{Child, ChildDraft, ChildId, Gender, GuardianId};
    ///
    /// let draft = ChildDraft {
    ///     name: Some("Asha".into()),
    ///     date_of_birth: NaiveDate::from_ymd_opt(2024, 1, 1),
    ///     gender: Some(Gender::Female),
    ///     ..ChildDraft::default()
    /// };
    /// let child = Child::enrol(ChildId::random(), GuardianId::random(), draft).expect("valid draft");
    /// assert_eq!(child.name(), "Asha");
    /// ```
    pub fn enrol(
        id: ChildId,
        guardian_id: GuardianId,
        draft: ChildDraft,
    ) -> Result<Self, ChildValidationError> {
        let ChildDraft {
            name,
            date_of_birth,
            gender,
            blood_group,
            medical_history,
        } = draft;

        let name = name
            .map(|value| value.trim().to_owned())
            .filter(|value| !value.is_empty());

        let mut missing = Vec::new();
        if name.is_none() {
            missing.push("name");
        }
        if date_of_birth.is_none() {
            missing.push("dateOfBirth");
        }
        if gender.is_none() {
            missing.push("gender");
        }

        match (name, date_of_birth, gender) {
            (Some(name), Some(date_of_birth), Some(gender)) => Ok(Self {
                id,
                guardian_id,
                name: checked_length(name)?,
                date_of_birth,
                gender,
                blood_group: blood_group.unwrap_or_default(),
                medical_history: medical_history.unwrap_or_default(),
            }),
            _ => Err(ChildValidationError::MissingFields { fields: missing }),
        }
    }

    /// Rebuild a child from stored attributes.
    pub fn restore(record: ChildRecord) -> Result<Self, ChildValidationError> {
        let name = record.name.trim().to_owned();
        if name.is_empty() {
            return Err(ChildValidationError::BlankName);
        }
        Ok(Self {
            id: record.id,
            guardian_id: record.guardian_id,
            name,
            date_of_birth: record.date_of_birth,
            gender: record.gender,
            blood_group: record.blood_group,
            medical_history: record.medical_history,
        })
    }

    /// Apply a partial profile edit, returning the updated child.
    pub fn apply_update(&self, update: ChildProfileUpdate) -> Result<Self, ChildValidationError> {
        if update
            .date_of_birth
            .is_some_and(|dob| dob != self.date_of_birth)
        {
            return Err(ChildValidationError::DateOfBirthImmutable);
        }

        let mut updated = self.clone();
        if let Some(name) = update.name {
            let trimmed = name.trim();
            if trimmed.is_empty() {
                return Err(ChildValidationError::BlankName);
            }
            updated.name = checked_length(trimmed.to_owned())?;
        }
        if let Some(gender) = update.gender {
            updated.gender = gender;
        }
        if let Some(blood_group) = update.blood_group {
            updated.blood_group = blood_group;
        }
        if let Some(medical_history) = update.medical_history {
            updated.medical_history = medical_history;
        }
        Ok(updated)
    }

    /// Stable identifier, assigned at enrolment.
    pub fn id(&self) -> ChildId {
        self.id
    }

    /// Owning guardian.
    pub fn guardian_id(&self) -> GuardianId {
        self.guardian_id
    }

    /// Whether `guardian_id` owns this child.
    pub fn is_owned_by(&self, guardian_id: GuardianId) -> bool {
        self.guardian_id == guardian_id
    }

    /// Trimmed display name.
    pub fn name(&self) -> &str {
        self.name.as_str()
    }

    pub fn date_of_birth(&self) -> NaiveDate {
        self.date_of_birth
    }

    pub fn gender(&self) -> Gender {
        self.gender
    }

    pub fn blood_group(&self) -> BloodGroup {
        self.blood_group
    }

    /// Free-text medical history; empty when none was recorded.
    pub fn medical_history(&self) -> &str {
        self.medical_history.as_str()
    }
}

#[cfg(test)]
mod tests {
    //! Regression coverage for child validation and profile edits.

    use rstest::{fixture, rstest};

    use super::*;

    fn dob() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 1, 1).expect("valid date")
    }

    #[fixture]
    fn child() -> Child {
        Child::enrol(
            ChildId::random(),
            GuardianId::random(),
            ChildDraft {
                name: Some("  Asha ".to_owned()),
                date_of_birth: Some(dob()),
                gender: Some(Gender::Female),
                blood_group: None,
                medical_history: None,
            },
        )
        .expect("valid draft")
    }

    #[rstest]
    fn enrol_trims_name_and_applies_defaults(child: Child) {
        assert_eq!(child.name(), "Asha");
        assert_eq!(child.blood_group(), BloodGroup::Unknown);
        assert_eq!(child.medical_history(), "");
    }

    #[rstest]
    fn enrol_reports_every_missing_field() {
        let draft = ChildDraft {
            name: Some("   ".to_owned()),
            ..ChildDraft::default()
        };
        let err = Child::enrol(ChildId::random(), GuardianId::random(), draft)
            .expect_err("incomplete draft");
        assert_eq!(
            err,
            ChildValidationError::MissingFields {
                fields: vec!["name", "dateOfBirth", "gender"],
            }
        );
        assert_eq!(
            err.to_string(),
            "missing required fields: name, dateOfBirth, gender"
        );
    }

    #[rstest]
    fn update_rejects_date_of_birth_change(child: Child) {
        let update = ChildProfileUpdate {
            date_of_birth: NaiveDate::from_ymd_opt(2024, 1, 2),
            ..ChildProfileUpdate::default()
        };
        assert_eq!(
            child.apply_update(update),
            Err(ChildValidationError::DateOfBirthImmutable)
        );
    }

    #[rstest]
    fn update_accepts_unchanged_date_of_birth(child: Child) {
        let update = ChildProfileUpdate {
            name: Some("Asha Rao".to_owned()),
            date_of_birth: Some(dob()),
            blood_group: Some(BloodGroup::ONegative),
            ..ChildProfileUpdate::default()
        };
        let updated = child.apply_update(update).expect("valid update");
        assert_eq!(updated.name(), "Asha Rao");
        assert_eq!(updated.blood_group(), BloodGroup::ONegative);
        assert_eq!(updated.date_of_birth(), dob());
        assert_eq!(updated.id(), child.id());
    }

    #[rstest]
    fn update_rejects_blank_name(child: Child) {
        let update = ChildProfileUpdate {
            name: Some(" ".to_owned()),
            ..ChildProfileUpdate::default()
        };
        assert_eq!(child.apply_update(update), Err(ChildValidationError::BlankName));
    }

    #[rstest]
    #[case(CHILD_NAME_MAX, true)]
    #[case(CHILD_NAME_MAX + 1, false)]
    fn enrol_bounds_name_length(#[case] length: usize, #[case] accepted: bool) {
        let draft = ChildDraft {
            name: Some("é".repeat(length)),
            date_of_birth: Some(dob()),
            gender: Some(Gender::Other),
            ..ChildDraft::default()
        };

        let result = Child::enrol(ChildId::random(), GuardianId::random(), draft);

        if accepted {
            assert_eq!(result.expect("name fits").name().chars().count(), length);
        } else {
            assert_eq!(
                result,
                Err(ChildValidationError::NameTooLong {
                    max: CHILD_NAME_MAX
                })
            );
        }
    }

    #[rstest]
    fn update_rejects_overlong_name(child: Child) {
        let update = ChildProfileUpdate {
            name: Some("a".repeat(200)),
            ..ChildProfileUpdate::default()
        };
        assert_eq!(
            child.apply_update(update),
            Err(ChildValidationError::NameTooLong {
                max: CHILD_NAME_MAX
            })
        );
    }

    #[rstest]
    #[case("A+", BloodGroup::APositive)]
    #[case("AB-", BloodGroup::AbNegative)]
    #[case("Unknown", BloodGroup::Unknown)]
    fn blood_group_labels_parse(#[case] raw: &str, #[case] expected: BloodGroup) {
        assert_eq!(raw.parse::<BloodGroup>(), Ok(expected));
        let json = serde_json::to_value(expected).expect("serialise blood group");
        assert_eq!(json, serde_json::Value::String(raw.to_owned()));
    }

    #[rstest]
    fn unknown_labels_are_rejected() {
        assert_eq!("C+".parse::<BloodGroup>(), Err(ChildValidationError::UnknownBloodGroup));
        assert_eq!("male".parse::<Gender>(), Err(ChildValidationError::UnknownGender));
    }
}
