//! Time-of-day helpers for values that carry a wall-clock time.

use chrono::{NaiveDateTime, TimeDelta, Timelike};

use crate::DateExt;
use crate::civil::WallClock;
use crate::consts::{LAST_MINUTE, LAST_NANOSECOND, LAST_SECOND, NOON_HOUR};

/// Rebuilds `value` from a wall-clock reading, keeping it unchanged if the
/// reading cannot be represented.
fn at_wall_clock<T: WallClock>(value: &T, local: Option<NaiveDateTime>) -> T {
    local
        .and_then(|local| value.with_wall_clock(local))
        .unwrap_or_else(|| {
            log::warn!("wall-clock time outside the supported range, keeping the original value");
            value.clone()
        })
}

/// Hour and minute granularity helpers for [`chrono::NaiveDateTime`] and
/// [`chrono::DateTime`].
pub trait TimeExt: WallClock {
    /// Same date at 12:00
    fn middle_of_day(&self) -> Self {
        let local = self.wall_clock();
        at_wall_clock(self, local.date().and_hms_opt(NOON_HOUR, 0, 0))
    }

    fn beginning_of_hour(&self) -> Self {
        let local = self.wall_clock();
        at_wall_clock(self, local.date().and_hms_opt(local.hour(), 0, 0))
    }

    /// Last instant of the hour (hh:59:59.999999999)
    fn end_of_hour(&self) -> Self {
        let local = self.wall_clock();
        at_wall_clock(
            self,
            local
                .date()
                .and_hms_nano_opt(local.hour(), LAST_MINUTE, LAST_SECOND, LAST_NANOSECOND),
        )
    }

    fn beginning_of_minute(&self) -> Self {
        let local = self.wall_clock();
        at_wall_clock(self, local.date().and_hms_opt(local.hour(), local.minute(), 0))
    }

    /// Last instant of the minute (hh:mm:59.999999999)
    fn end_of_minute(&self) -> Self {
        let local = self.wall_clock();
        at_wall_clock(
            self,
            local
                .date()
                .and_hms_nano_opt(local.hour(), local.minute(), LAST_SECOND, LAST_NANOSECOND),
        )
    }

    /// Time elapsed since the beginning of the day.
    ///
    /// For zoned values this is real elapsed time, so it differs from the
    /// wall-clock reading on days with a DST transition.
    fn time_since_midnight(&self) -> TimeDelta {
        self.elapsed_since(&self.beginning_of_day())
    }

    /// Whole seconds elapsed since the beginning of the day
    fn seconds_since_midnight(&self) -> i64 {
        self.time_since_midnight().num_seconds()
    }
}

impl<T: WallClock> TimeExt for T {}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::{date, datetime, zoned};
    use chrono::{FixedOffset, NaiveTime, Offset, TimeZone};
    use chrono_tz::America::New_York;

    fn precise(h: u32, m: u32, s: u32, nano: u32) -> NaiveDateTime {
        date(2024, 6, 12).and_time(NaiveTime::from_hms_nano_opt(h, m, s, nano).expect("valid time"))
    }

    #[test]
    fn test_hour_and_minute_bounds() {
        let dt = precise(14, 27, 33, 123_456_789);

        assert_eq!(dt.beginning_of_hour(), precise(14, 0, 0, 0));
        assert_eq!(dt.end_of_hour(), precise(14, 59, 59, 999_999_999));
        assert_eq!(dt.beginning_of_minute(), precise(14, 27, 0, 0));
        assert_eq!(dt.end_of_minute(), precise(14, 27, 59, 999_999_999));
        assert_eq!(dt.middle_of_day(), precise(12, 0, 0, 0));
    }

    #[test]
    fn test_bounds_keep_offset() {
        let offset = FixedOffset::east_opt(9 * 3600).expect("valid offset");
        let dt = zoned(&offset, 2024, 6, 12, 14, 27, 33);

        let start = dt.beginning_of_hour();
        assert_eq!(start.offset(), dt.offset());
        assert_eq!(start.naive_local(), datetime(2024, 6, 12, 14, 0, 0));
        assert_eq!(dt.middle_of_day().naive_local(), datetime(2024, 6, 12, 12, 0, 0));
    }

    #[test]
    fn test_seconds_since_midnight() {
        assert_eq!(datetime(2024, 6, 12, 0, 0, 0).seconds_since_midnight(), 0);
        assert_eq!(datetime(2024, 6, 12, 1, 2, 3).seconds_since_midnight(), 3723);
        assert_eq!(
            precise(23, 59, 59, 999_999_999).time_since_midnight(),
            TimeDelta::days(1) - TimeDelta::nanoseconds(1)
        );
    }

    #[test]
    fn test_seconds_since_midnight_across_dst() {
        // Clocks skip 02:00-03:00, so noon is only 11 hours into the day
        let noon = zoned(&New_York, 2024, 3, 10, 12, 0, 0);
        assert_eq!(noon.seconds_since_midnight(), 11 * 3600);

        // Clocks repeat 01:00-02:00, so noon is 13 hours into the day
        let noon = zoned(&New_York, 2024, 11, 3, 12, 0, 0);
        assert_eq!(noon.seconds_since_midnight(), 13 * 3600);
    }

    #[test]
    fn test_end_of_hour_in_dst_fold_uses_first_pass() {
        let first_pass = zoned(&New_York, 2024, 11, 3, 1, 15, 0);
        let end = first_pass.end_of_hour();
        let last_instant = NaiveTime::from_hms_nano_opt(1, 59, 59, 999_999_999).expect("valid time");
        assert_eq!(end.naive_local(), date(2024, 11, 3).and_time(last_instant));
        assert!(end > first_pass);
    }

    #[test]
    fn test_bounds_in_dst_fold_stay_on_same_pass() {
        let first_pass = zoned(&New_York, 2024, 11, 3, 1, 15, 0);
        let second_pass = New_York
            .from_local_datetime(&datetime(2024, 11, 3, 1, 15, 0))
            .latest()
            .expect("fold has a second pass");

        for value in [first_pass, second_pass] {
            let hour = (value.beginning_of_hour(), value.end_of_hour());
            let minute = (value.beginning_of_minute(), value.end_of_minute());
            assert!(hour.0 <= value && value <= hour.1, "{value} in {hour:?}");
            assert!(minute.0 <= value && value <= minute.1, "{value} in {minute:?}");
            assert_eq!(hour.1 - hour.0, TimeDelta::hours(1) - TimeDelta::nanoseconds(1));
            assert_eq!(hour.1.offset().fix(), value.offset().fix());
            assert_eq!(minute.0.offset().fix(), value.offset().fix());
        }
    }
}
