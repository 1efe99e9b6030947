//! Reminder message formatting.

use chrono::NaiveDate;

/// Subject line of every reminder e-mail.
pub const REMINDER_SUBJECT: &str = "Vaccination Reminder";

/// Body text for one reminder.
///
/// # Examples
/// ```
/// use chrono::NaiveDate;
/// use immunisation::domain::reminder_body;
///
/// let due = NaiveDate::from_ymd_opt(2024, 2, 12).expect("valid date");
/// assert_eq!(
///     reminder_body("Asha", "Pentavalent 1", due),
///     "Reminder: Asha is due for Pentavalent 1 vaccination tomorrow (12 Feb 2024)."
/// );
/// ```
pub fn reminder_body(child_name: &str, vaccine_name: &str, due_date: NaiveDate) -> String {
    format!(
        "Reminder: {child_name} is due for {vaccine_name} vaccination tomorrow ({}).",
        due_date.format("%-d %b %Y")
    )
}

#[cfg(test)]
mod tests {
    //! Regression coverage for message text.

    use rstest::rstest;

    use super::*;

    #[rstest]
    #[case(NaiveDate::from_ymd_opt(2024, 3, 5), "5 Mar 2024")]
    #[case(NaiveDate::from_ymd_opt(2024, 12, 31), "31 Dec 2024")]
    fn due_dates_are_not_zero_padded(#[case] due: Option<NaiveDate>, #[case] expected: &str) {
        let due = due.expect("valid date");
        let body = reminder_body("Kabir", "OPV 1", due);
        assert!(body.ends_with(&format!("({expected}).")), "{body}");
    }
}
