//! The deployment's fixed reference time zone.
//!
//! Calendar questions ("what is today?", "when does tomorrow start?") are
//! answered in one fixed UTC offset so that completion stamps, the reminder
//! window and the daily trigger agree regardless of the host's local zone.

use chrono::{DateTime, Days, FixedOffset, NaiveDate, NaiveTime, Offset, Utc};

/// Fixed UTC offset used for all calendar-day arithmetic.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReferenceZone {
    offset: FixedOffset,
}

impl Default for ReferenceZone {
    fn default() -> Self {
        Self::utc()
    }
}

impl ReferenceZone {
    /// Reference zone at UTC.
    pub fn utc() -> Self {
        Self {
            offset: Utc.fix(),
        }
    }

    /// Build a zone from an offset in minutes east of UTC.
    ///
    /// Returns `None` when the offset is outside ±24 hours.
    ///
    /// # Examples
    /// ```
    /// use immunisation::domain::ReferenceZone;
    ///
    /// assert!(ReferenceZone::from_offset_minutes(330).is_some());
    /// assert!(ReferenceZone::from_offset_minutes(24 * 60).is_none());
    /// ```
    pub fn from_offset_minutes(minutes: i32) -> Option<Self> {
        minutes
            .checked_mul(60)
            .and_then(FixedOffset::east_opt)
            .map(|offset| Self { offset })
    }

    /// Underlying chrono offset.
    pub fn offset(&self) -> FixedOffset {
        self.offset
    }

    /// Calendar date of `now` in this zone.
    pub fn today(&self, now: DateTime<Utc>) -> NaiveDate {
        now.with_timezone(&self.offset).date_naive()
    }

    /// The UTC instant of `time` on `date` in this zone.
    pub fn instant_at(&self, date: NaiveDate, time: NaiveTime) -> DateTime<Utc> {
        let local = date.and_time(time);
        // A fixed offset has no gaps or folds, so the subtraction is exact.
        (local - self.offset).and_utc()
    }

    /// The UTC instant of midnight starting `date` in this zone.
    pub fn start_of_day(&self, date: NaiveDate) -> DateTime<Utc> {
        self.instant_at(date, NaiveTime::MIN)
    }

    /// The date `days` after `date`, saturating at the calendar maximum.
    pub fn add_days(date: NaiveDate, days: u64) -> NaiveDate {
        date.checked_add_days(Days::new(days)).unwrap_or(NaiveDate::MAX)
    }
}
