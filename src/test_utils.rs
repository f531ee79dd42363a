//! Shared constructors for unit tests.

use chrono::{DateTime, NaiveDate, NaiveDateTime, TimeZone};

pub fn date(year: i32, month: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(year, month, day).expect("invalid test date")
}

pub fn datetime(year: i32, month: u32, day: u32, hour: u32, minute: u32, second: u32) -> NaiveDateTime {
    date(year, month, day)
        .and_hms_opt(hour, minute, second)
        .expect("invalid test time")
}

/// Wall-clock time in `tz`; a reading repeated by a DST fold resolves to the first pass.
pub fn zoned<Tz: TimeZone>(
    tz: &Tz,
    year: i32,
    month: u32,
    day: u32,
    hour: u32,
    minute: u32,
    second: u32,
) -> DateTime<Tz> {
    tz.from_local_datetime(&datetime(year, month, day, hour, minute, second))
        .earliest()
        .expect("test time does not exist in this zone")
}
