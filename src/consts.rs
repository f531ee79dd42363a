/// First day of month
pub const MIN_DAY: u32 = 1;

/// Month number for January
pub const JANUARY: u32 = 1;
/// Month number for December
pub const DECEMBER: u32 = 12;

/// Days in December
pub const DECEMBER_DAYS: u32 = 31;

/// Days in a week
pub const DAYS_PER_WEEK: u64 = 7;
/// Days from the first to the last day of a week
pub const LAST_DAY_OF_WEEK_OFFSET: u64 = DAYS_PER_WEEK - 1;
/// Months in a quarter
pub const MONTHS_PER_QUARTER: u32 = 3;
/// Months in a year
pub const MONTHS_PER_YEAR: u32 = 12;

/// Hour used by `middle_of_day`
pub const NOON_HOUR: u32 = 12;
/// Last minute of an hour
pub const LAST_MINUTE: u32 = 59;
/// Last second of a minute (leap seconds excluded)
pub const LAST_SECOND: u32 = 59;
/// Last nanosecond of a second (leap seconds excluded)
pub const LAST_NANOSECOND: u32 = 999_999_999;

/// How far before a DST gap to look for the offset in force before it
pub(crate) const GAP_LOOKBACK_HOURS: i64 = 24;

/// Period separator (ISO 8601 time interval format)
pub const PERIOD_SEPARATOR: char = '/';
