//! Civil (wall-clock) view over chrono's date and time types.
//!
//! Every helper in this crate works on the calendar date a value shows on its
//! own wall clock, then rebuilds a value of the same type and zone from it.
//! [`Civil`] is that round trip; it is sealed and implemented for
//! [`NaiveDate`], [`NaiveDateTime`] and [`DateTime<Tz>`].

use chrono::{DateTime, FixedOffset, LocalResult, NaiveDate, NaiveDateTime, NaiveTime, Offset, TimeDelta, TimeZone};

use crate::DateError;
use crate::consts::GAP_LOOKBACK_HOURS;

mod private {
    pub trait Sealed {}

    impl Sealed for chrono::NaiveDate {}
    impl Sealed for chrono::NaiveDateTime {}
    impl<Tz: chrono::TimeZone> Sealed for chrono::DateTime<Tz> {}
}

/// A chrono value with a calendar date on a wall clock.
pub trait Civil: private::Sealed + Clone {
    /// The calendar date as shown on the value's own wall clock
    fn civil_date(&self) -> NaiveDate;

    /// Moves the value to `date`, keeping its time of day and zone.
    ///
    /// A time repeated by a DST fold keeps the value's own offset when it is
    /// one of the two candidates. Returns `None` only at the edges of chrono's
    /// representable range.
    fn with_civil_date(&self, date: NaiveDate) -> Option<Self>;

    /// First instant of `date` in the value's zone
    fn start_of_date(&self, date: NaiveDate) -> Option<Self>;

    /// Last instant of `date` in the value's zone
    fn end_of_date(&self, date: NaiveDate) -> Option<Self>;
}

/// A [`Civil`] value that also carries a time of day.
pub trait WallClock: Civil {
    /// Local date and time as shown on the wall clock
    fn wall_clock(&self) -> NaiveDateTime;

    /// Rebuilds the value from a wall-clock reading in the same zone
    fn with_wall_clock(&self, local: NaiveDateTime) -> Option<Self>;

    /// Elapsed time since `earlier`
    fn elapsed_since(&self, earlier: &Self) -> TimeDelta;
}

/// 23:59:59.999999999, the last instant chrono can represent within a day.
#[inline]
pub(crate) fn last_instant_of_day() -> NaiveTime {
    // NaiveTime arithmetic wraps around midnight
    NaiveTime::MIN - TimeDelta::nanoseconds(1)
}

impl Civil for NaiveDate {
    #[inline]
    fn civil_date(&self) -> NaiveDate {
        *self
    }

    #[inline]
    fn with_civil_date(&self, date: NaiveDate) -> Option<Self> {
        Some(date)
    }

    #[inline]
    fn start_of_date(&self, date: NaiveDate) -> Option<Self> {
        Some(date)
    }

    #[inline]
    fn end_of_date(&self, date: NaiveDate) -> Option<Self> {
        Some(date)
    }
}

impl Civil for NaiveDateTime {
    #[inline]
    fn civil_date(&self) -> NaiveDate {
        self.date()
    }

    fn with_civil_date(&self, date: NaiveDate) -> Option<Self> {
        Some(date.and_time(self.time()))
    }

    fn start_of_date(&self, date: NaiveDate) -> Option<Self> {
        Some(date.and_time(NaiveTime::MIN))
    }

    fn end_of_date(&self, date: NaiveDate) -> Option<Self> {
        Some(date.and_time(last_instant_of_day()))
    }
}

impl WallClock for NaiveDateTime {
    #[inline]
    fn wall_clock(&self) -> NaiveDateTime {
        *self
    }

    #[inline]
    fn with_wall_clock(&self, local: NaiveDateTime) -> Option<Self> {
        Some(local)
    }

    fn elapsed_since(&self, earlier: &Self) -> TimeDelta {
        self.signed_duration_since(*earlier)
    }
}

impl<Tz: TimeZone> Civil for DateTime<Tz> {
    #[inline]
    fn civil_date(&self) -> NaiveDate {
        self.date_naive()
    }

    fn with_civil_date(&self, date: NaiveDate) -> Option<Self> {
        resolve_local(&self.timezone(), date.and_time(self.time()), Some(self.offset().fix()))
    }

    fn start_of_date(&self, date: NaiveDate) -> Option<Self> {
        resolve_local(&self.timezone(), date.and_time(NaiveTime::MIN), None)
    }

    fn end_of_date(&self, date: NaiveDate) -> Option<Self> {
        // The day ends one nanosecond before the next one starts, whatever
        // the zone did to the wall clock in between.
        match date.succ_opt() {
            Some(next) => self
                .start_of_date(next)?
                .checked_sub_signed(TimeDelta::nanoseconds(1)),
            None => resolve_local(&self.timezone(), date.and_time(last_instant_of_day()), None),
        }
    }
}

impl<Tz: TimeZone> WallClock for DateTime<Tz> {
    #[inline]
    fn wall_clock(&self) -> NaiveDateTime {
        self.naive_local()
    }

    fn with_wall_clock(&self, local: NaiveDateTime) -> Option<Self> {
        resolve_local(&self.timezone(), local, Some(self.offset().fix()))
    }

    fn elapsed_since(&self, earlier: &Self) -> TimeDelta {
        self.clone().signed_duration_since(earlier.clone())
    }
}

/// Interprets a wall-clock reading in `tz`.
///
/// A reading repeated by a DST fold resolves to the candidate with offset
/// `keep`, or to the earlier instant when neither candidate has it. A reading
/// skipped by a DST gap is read with the offset in force before the gap, which
/// lands the same distance past the gap as the reading was into it. When a
/// whole day is skipped (Pacific/Apia on 2011-12-30) that distance is a full
/// day, so a one day step back into the gap lands where it started.
pub(crate) fn resolve_local<Tz: TimeZone>(
    tz: &Tz,
    local: NaiveDateTime,
    keep: Option<FixedOffset>,
) -> Option<DateTime<Tz>> {
    match tz.from_local_datetime(&local) {
        LocalResult::Single(resolved) => Some(resolved),
        LocalResult::Ambiguous(earliest, latest) => {
            if keep == Some(latest.offset().fix()) {
                log::debug!("{local} occurs twice in this time zone, keeping the later offset");
                return Some(latest);
            }
            log::debug!("{local} occurs twice in this time zone, using the earlier instant");
            Some(earliest)
        },
        LocalResult::None => {
            log::debug!("{local} falls in a time zone gap, moving past it");
            let before_gap = local.checked_sub_signed(TimeDelta::hours(GAP_LOOKBACK_HOURS))?;
            let offset = tz.from_local_datetime(&before_gap).earliest()?.offset().fix();
            let utc = local.checked_sub_signed(TimeDelta::seconds(i64::from(offset.local_minus_utc())))?;
            Some(tz.from_utc_datetime(&utc))
        },
    }
}

/// Which end of the supported range a failed helper saturates towards.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Edge {
    Start,
    End,
}

/// Moves `value` to the civil date computed by `step`, keeping its time of day.
pub(crate) fn shift<T: Civil>(
    value: &T,
    operation: &'static str,
    step: impl FnOnce(NaiveDate) -> Option<NaiveDate>,
) -> Result<T, DateError> {
    let date = step(value.civil_date()).ok_or(DateError::OutOfRange { operation })?;
    value.with_civil_date(date).ok_or(DateError::NoLocalTime { date })
}

/// Returns the first or last instant of `date`.
pub(crate) fn bound<T: Civil>(
    value: &T,
    operation: &'static str,
    date: Option<NaiveDate>,
    edge: Edge,
) -> Result<T, DateError> {
    let date = date.ok_or(DateError::OutOfRange { operation })?;
    let bounded = match edge {
        Edge::Start => value.start_of_date(date),
        Edge::End => value.end_of_date(date),
    };
    bounded.ok_or(DateError::NoLocalTime { date })
}

/// Unwraps a helper result, pinning the value to chrono's range limit on failure.
pub(crate) fn settle<T: Civil>(value: &T, result: Result<T, DateError>, towards: Edge) -> T {
    result.unwrap_or_else(|err| {
        log::warn!("{err}, saturating at the supported date range");
        let limit = match towards {
            Edge::Start => NaiveDate::MIN,
            Edge::End => NaiveDate::MAX,
        };
        value.with_civil_date(limit).unwrap_or_else(|| value.clone())
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::{date, datetime, zoned};
    use chrono::{FixedOffset, Timelike};
    use chrono_tz::America::{New_York, Sao_Paulo};
    use chrono_tz::Pacific::Apia;

    #[test]
    fn test_last_instant_of_day() {
        let last = last_instant_of_day();
        assert_eq!((last.hour(), last.minute(), last.second()), (23, 59, 59));
        assert_eq!(last.nanosecond(), 999_999_999);
    }

    #[test]
    fn test_naive_date_round_trip() {
        let d = date(2024, 2, 15);
        assert_eq!(d.civil_date(), d);
        assert_eq!(d.with_civil_date(date(2024, 3, 1)), Some(date(2024, 3, 1)));
        assert_eq!(d.start_of_date(d), Some(d));
        assert_eq!(d.end_of_date(d), Some(d));
    }

    #[test]
    fn test_naive_datetime_keeps_time() {
        let dt = datetime(2024, 2, 15, 13, 45, 10);
        let moved = dt.with_civil_date(date(2024, 2, 29)).expect("representable date");
        assert_eq!(moved, datetime(2024, 2, 29, 13, 45, 10));
    }

    #[test]
    fn test_fixed_offset_is_preserved() {
        let offset = FixedOffset::east_opt(5 * 3600 + 1800).expect("valid offset");
        let dt = zoned(&offset, 2024, 1, 6, 8, 30, 0);

        let start = dt.start_of_date(dt.civil_date()).expect("start of day");
        assert_eq!(start.offset(), dt.offset());
        assert_eq!(start.naive_local(), datetime(2024, 1, 6, 0, 0, 0));

        let end = dt.end_of_date(dt.civil_date()).expect("end of day");
        assert_eq!(end.offset(), dt.offset());
        assert_eq!(end.naive_local(), date(2024, 1, 6).and_time(last_instant_of_day()));
    }

    #[test]
    fn test_resolve_local_gap_moves_forward() {
        // US spring forward: 02:00-03:00 does not exist on 2024-03-10
        let resolved = resolve_local(&New_York, datetime(2024, 3, 10, 2, 30, 0), None).expect("gap resolves");
        assert_eq!(resolved.naive_local(), datetime(2024, 3, 10, 3, 30, 0));
    }

    #[test]
    fn test_resolve_local_fold_uses_earliest() {
        // US fall back: 01:00-02:00 happens twice on 2024-11-03
        let resolved = resolve_local(&New_York, datetime(2024, 11, 3, 1, 30, 0), None).expect("fold resolves");
        assert_eq!(resolved.offset().fix().local_minus_utc(), -4 * 3600);
    }

    #[test]
    fn test_resolve_local_fold_keeps_requested_offset() {
        let est = FixedOffset::west_opt(5 * 3600).expect("valid offset");
        let resolved =
            resolve_local(&New_York, datetime(2024, 11, 3, 1, 30, 0), Some(est)).expect("fold resolves");
        assert_eq!(resolved.offset().fix(), est);

        // An offset that is not a candidate falls back to the earlier instant
        let cet = FixedOffset::east_opt(3600).expect("valid offset");
        let resolved =
            resolve_local(&New_York, datetime(2024, 11, 3, 1, 30, 0), Some(cet)).expect("fold resolves");
        assert_eq!(resolved.offset().fix().local_minus_utc(), -4 * 3600);
    }

    #[test]
    fn test_second_pass_keeps_offset_on_same_date() {
        let second_pass = New_York
            .from_local_datetime(&datetime(2024, 11, 3, 1, 30, 0))
            .latest()
            .expect("fold has a second pass");
        let moved = second_pass
            .with_civil_date(second_pass.civil_date())
            .expect("representable date");
        assert_eq!(moved, second_pass);
        assert_eq!(moved.offset().fix(), second_pass.offset().fix());
    }

    #[test]
    fn test_whole_day_gap_resolves_past_it() {
        // Samoa skipped 2011-12-30 when it moved from -10 to +14
        let next_day = zoned(&Apia, 2011, 12, 31, 12, 0, 0);
        let into_gap = next_day.with_civil_date(date(2011, 12, 30)).expect("gap resolves");
        assert_eq!(into_gap, next_day);
    }

    #[test]
    fn test_midnight_gap_start_of_day() {
        // Brazil started DST at midnight on 2018-11-04, so the day began at 01:00
        let noon = zoned(&Sao_Paulo, 2018, 11, 4, 12, 0, 0);
        let start = noon.start_of_date(noon.civil_date()).expect("start of day");
        assert_eq!(start.naive_local(), datetime(2018, 11, 4, 1, 0, 0));
    }

    #[test]
    fn test_day_before_midnight_gap_ends_before_jump() {
        let evening = zoned(&Sao_Paulo, 2018, 11, 3, 20, 0, 0);
        let end = evening.end_of_date(evening.civil_date()).expect("end of day");
        assert_eq!(end.naive_local(), date(2018, 11, 3).and_time(last_instant_of_day()));
        assert_eq!(end.offset().fix().local_minus_utc(), -3 * 3600);
    }

    #[test]
    fn test_midnight_fold_end_of_day() {
        // Brazil ended DST at midnight on 2019-02-17, repeating 23:00-00:00 on the 16th
        let evening = zoned(&Sao_Paulo, 2019, 2, 16, 12, 0, 0);
        let end = evening.end_of_date(evening.civil_date()).expect("end of day");
        assert_eq!(end.naive_local(), date(2019, 2, 16).and_time(last_instant_of_day()));
        assert_eq!(end.offset().fix().local_minus_utc(), -3 * 3600);
    }

    #[test]
    fn test_shift_out_of_range() {
        let result = shift(&NaiveDate::MAX, "tomorrow", |d| d.succ_opt());
        assert_eq!(result, Err(DateError::OutOfRange { operation: "tomorrow" }));
    }

    #[test]
    fn test_settle_saturates() {
        let result = shift(&NaiveDate::MAX, "tomorrow", |d| d.succ_opt());
        assert_eq!(settle(&NaiveDate::MAX, result, Edge::End), NaiveDate::MAX);

        let result = shift(&NaiveDate::MIN, "yesterday", |d| d.pred_opt());
        assert_eq!(settle(&NaiveDate::MIN, result, Edge::Start), NaiveDate::MIN);
    }

    #[test]
    fn test_bound_edges() {
        let dt = datetime(2024, 5, 5, 10, 0, 0);
        assert_eq!(
            bound(&dt, "beginning_of_day", Some(dt.date()), Edge::Start),
            Ok(datetime(2024, 5, 5, 0, 0, 0))
        );
        assert_eq!(
            bound(&dt, "beginning_of_week", None, Edge::Start),
            Err(DateError::OutOfRange {
                operation: "beginning_of_week"
            })
        );
    }
}
