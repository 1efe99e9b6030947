//! The single-day window a scan run selects doses from.

use chrono::{DateTime, NaiveDate, Utc};

use crate::domain::ReferenceZone;

/// `[midnight tomorrow, midnight the day after)` in the reference zone,
/// fixed once per scan run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScanWindow {
    due_date: NaiveDate,
    starts_at: DateTime<Utc>,
    ends_at: DateTime<Utc>,
}

impl ScanWindow {
    /// The window covering the day after `now` in `zone`.
    ///
    /// # Examples
    /// ```
    /// use chrono::{NaiveDate, TimeZone, Utc};
    /// use immunisation::domain::{ReferenceZone, ScanWindow};
    ///
    /// let now = Utc.with_ymd_and_hms(2024, 2, 11, 9, 0, 0).single().expect("valid time");
    /// let window = ScanWindow::tomorrow(now, ReferenceZone::utc());
    /// assert_eq!(window.due_date(), NaiveDate::from_ymd_opt(2024, 2, 12).expect("valid date"));
    /// ```
    pub fn tomorrow(now: DateTime<Utc>, zone: ReferenceZone) -> Self {
        let due_date = ReferenceZone::add_days(zone.today(now), 1);
        let day_after = ReferenceZone::add_days(due_date, 1);
        Self {
            due_date,
            starts_at: zone.start_of_day(due_date),
            ends_at: zone.start_of_day(day_after),
        }
    }

    /// Calendar date qualifying doses must be due on.
    pub fn due_date(&self) -> NaiveDate {
        self.due_date
    }

    /// Inclusive start instant.
    pub fn starts_at(&self) -> DateTime<Utc> {
        self.starts_at
    }

    /// Exclusive end instant.
    pub fn ends_at(&self) -> DateTime<Utc> {
        self.ends_at
    }

    /// Whether `instant` falls inside the window.
    pub fn contains(&self, instant: DateTime<Utc>) -> bool {
        self.starts_at <= instant && instant < self.ends_at
    }
}

#[cfg(test)]
mod tests {
    //! Regression coverage for window boundaries.

    use chrono::{TimeDelta, TimeZone};
    use rstest::rstest;

    use super::*;

    fn at(y: i32, m: u32, d: u32, h: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(y, m, d, h, 0, 0)
            .single()
            .expect("valid time")
    }

    #[rstest]
    fn window_spans_tomorrow_in_utc() {
        let window = ScanWindow::tomorrow(at(2024, 2, 11, 9), ReferenceZone::utc());
        assert_eq!(window.starts_at(), at(2024, 2, 12, 0));
        assert_eq!(window.ends_at(), at(2024, 2, 13, 0));
        assert!(window.contains(at(2024, 2, 12, 23)));
        assert!(!window.contains(window.ends_at()));
        assert!(!window.contains(window.starts_at() - TimeDelta::seconds(1)));
    }

    #[rstest]
    fn window_follows_reference_zone_across_month_end() {
        // 22:00 UTC on 28 Feb is already 29 Feb at UTC+05:30.
        let zone = ReferenceZone::from_offset_minutes(330).expect("valid offset");
        let window = ScanWindow::tomorrow(at(2024, 2, 28, 22), zone);
        assert_eq!(
            window.due_date(),
            NaiveDate::from_ymd_opt(2024, 3, 1).expect("valid date")
        );
        assert_eq!(window.ends_at() - window.starts_at(), TimeDelta::days(1));
    }
}
