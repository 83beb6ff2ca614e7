//! Date phrase resolution.
//!
//! Turns text such as `today`, `last week`, `3 days ago`, `friday` or
//! `2024-05-01` into either an instant or a span. Calendar phrases are read
//! in a fixed reference time zone; spans are inclusive, ending one
//! nanosecond before the next period starts.
//!
//! ## Supported phrases
//! - `now`, `today`, `yesterday`, `tomorrow`
//! - `this|last|next week|month|year` (weeks start on Monday)
//! - weekday names (`monday`, `mon`): the most recent one, today included;
//!   `last friday`, `next friday`, `this friday`
//! - `N seconds|minutes|hours|days|weeks|months|years ago`, `in N <unit>`
//! - RFC 3339, `YYYY-MM-DD HH:MM[:SS]`, `YYYY-MM-DD`, `YYYY-MM`, `YYYY`

use chrono::{
    DateTime, Datelike, Days, Months, NaiveDate, NaiveDateTime, TimeDelta, TimeZone, Utc, Weekday,
};
use chrono_tz::Tz;

/// What a date phrase stands for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Resolved {
    Instant(DateTime<Utc>),
    Span {
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    },
}

impl Resolved {
    /// Earliest instant covered.
    pub fn start(&self) -> DateTime<Utc> {
        match self {
            Resolved::Instant(t) => *t,
            Resolved::Span { start, .. } => *start,
        }
    }

    /// Latest instant covered.
    pub fn end(&self) -> DateTime<Utc> {
        match self {
            Resolved::Instant(t) => *t,
            Resolved::Span { end, .. } => *end,
        }
    }
}

/// Resolves free-form date text. `None` means the text is not a date.
pub trait DateResolver {
    fn resolve(&self, text: &str) -> Option<Resolved>;
}

impl<R: DateResolver + ?Sized> DateResolver for &R {
    fn resolve(&self, text: &str) -> Option<Resolved> {
        (**self).resolve(text)
    }
}

/// The built-in English phrase resolver.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PhraseResolver {
    zone: Tz,
    now: Option<DateTime<Utc>>,
}

impl Default for PhraseResolver {
    fn default() -> Self {
        PhraseResolver::new(Tz::UTC)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Period {
    Week,
    Month,
    Year,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Unit {
    Second,
    Minute,
    Hour,
    Day,
    Week,
    Month,
    Year,
}

impl PhraseResolver {
    /// Resolver reading the clock on every call.
    pub fn new(zone: Tz) -> Self {
        PhraseResolver { zone, now: None }
    }

    /// Resolver pinned to a fixed reference instant.
    pub fn at(zone: Tz, now: DateTime<Utc>) -> Self {
        PhraseResolver {
            zone,
            now: Some(now),
        }
    }

    fn now(&self) -> DateTime<Utc> {
        self.now.unwrap_or_else(Utc::now)
    }

    fn resolve_keyword(&self, words: &[&str], now: DateTime<Utc>) -> Option<Resolved> {
        let today = now.with_timezone(&self.zone).date_naive();

        match words {
            ["now"] => Some(Resolved::Instant(now)),
            ["today"] => self.days(today, 1),
            ["yesterday"] => self.days(today.checked_sub_days(Days::new(1))?, 1),
            ["tomorrow"] => self.days(today.checked_add_days(Days::new(1))?, 1),
            [which @ ("this" | "last" | "next"), period] => {
                if let Some(period) = parse_period(period) {
                    return self.period(today, period, which);
                }
                let weekday = period.parse::<Weekday>().ok()?;
                self.days(weekday_date(today, weekday, which)?, 1)
            }
            [day] => {
                let weekday = day.parse::<Weekday>().ok()?;
                self.days(weekday_date(today, weekday, "")?, 1)
            }
            _ => None,
        }
    }

    fn resolve_relative(&self, words: &[&str], now: DateTime<Utc>) -> Option<Resolved> {
        let (count, unit, forward) = match words {
            [count, unit, "ago"] => (parse_count(count)?, parse_unit(unit)?, false),
            ["in", count, unit] => (parse_count(count)?, parse_unit(unit)?, true),
            _ => return None,
        };

        let local = now.with_timezone(&self.zone);
        let shifted = match unit {
            Unit::Month | Unit::Year => {
                let months = if unit == Unit::Year {
                    count.checked_mul(12)?
                } else {
                    count
                };
                let months = Months::new(u32::try_from(months).ok()?);
                if forward {
                    local.checked_add_months(months)?
                } else {
                    local.checked_sub_months(months)?
                }
            }
            _ => {
                let count = i64::try_from(count).ok()?;
                let delta = match unit {
                    Unit::Second => TimeDelta::try_seconds(count)?,
                    Unit::Minute => TimeDelta::try_minutes(count)?,
                    Unit::Hour => TimeDelta::try_hours(count)?,
                    Unit::Day => TimeDelta::try_days(count)?,
                    _ => TimeDelta::try_weeks(count)?,
                };
                if forward {
                    local.checked_add_signed(delta)?
                } else {
                    local.checked_sub_signed(delta)?
                }
            }
        };

        Some(Resolved::Instant(shifted.with_timezone(&Utc)))
    }

    fn resolve_absolute(&self, text: &str) -> Option<Resolved> {
        if let Ok(ts) = DateTime::parse_from_rfc3339(text) {
            return Some(Resolved::Instant(ts.with_timezone(&Utc)));
        }

        for format in [
            "%Y-%m-%d %H:%M:%S",
            "%Y-%m-%dT%H:%M:%S",
            "%Y-%m-%d %H:%M",
            "%Y-%m-%dT%H:%M",
        ] {
            if let Ok(naive) = NaiveDateTime::parse_from_str(text, format) {
                return self.local(naive).map(Resolved::Instant);
            }
        }

        if let Ok(date) = NaiveDate::parse_from_str(text, "%Y-%m-%d") {
            return self.days(date, 1);
        }

        match text.split('-').collect::<Vec<_>>().as_slice() {
            [year, month] if all_digits(year, 4) && all_digits(month, 2) => {
                let start = NaiveDate::from_ymd_opt(year.parse().ok()?, month.parse().ok()?, 1)?;
                self.span(start, start.checked_add_months(Months::new(1))?)
            }
            [year] if all_digits(year, 4) => {
                let start = NaiveDate::from_ymd_opt(year.parse().ok()?, 1, 1)?;
                self.span(start, start.checked_add_months(Months::new(12))?)
            }
            _ => None,
        }
    }

    fn period(&self, today: NaiveDate, period: Period, which: &str) -> Option<Resolved> {
        let (start, length) = match period {
            Period::Week => {
                let offset = u64::from(today.weekday().num_days_from_monday());
                (today.checked_sub_days(Days::new(offset))?, Months::new(0))
            }
            Period::Month => (today.with_day(1)?, Months::new(1)),
            Period::Year => (today.with_day(1)?.with_month(1)?, Months::new(12)),
        };

        if period == Period::Week {
            let start = match which {
                "last" => start.checked_sub_days(Days::new(7))?,
                "next" => start.checked_add_days(Days::new(7))?,
                _ => start,
            };
            return self.days(start, 7);
        }

        let start = match which {
            "last" => start.checked_sub_months(length)?,
            "next" => start.checked_add_months(length)?,
            _ => start,
        };
        self.span(start, start.checked_add_months(length)?)
    }

    fn days(&self, start: NaiveDate, count: u64) -> Option<Resolved> {
        self.span(start, start.checked_add_days(Days::new(count))?)
    }

    /// `[start, end_exclusive)` in local dates, as an inclusive span.
    fn span(&self, start: NaiveDate, end_exclusive: NaiveDate) -> Option<Resolved> {
        let start = self.local(start.and_hms_opt(0, 0, 0)?)?;
        let end = self.local(end_exclusive.and_hms_opt(0, 0, 0)?)? - TimeDelta::nanoseconds(1);
        Some(Resolved::Span { start, end })
    }

    /// Local wall-clock time to UTC. Times skipped by a DST jump move
    /// forward by an hour.
    fn local(&self, naive: NaiveDateTime) -> Option<DateTime<Utc>> {
        self.zone
            .from_local_datetime(&naive)
            .earliest()
            .or_else(|| {
                self.zone
                    .from_local_datetime(&(naive + TimeDelta::hours(1)))
                    .earliest()
            })
            .map(|t| t.with_timezone(&Utc))
    }
}

impl DateResolver for PhraseResolver {
    fn resolve(&self, text: &str) -> Option<Resolved> {
        let trimmed = text.trim();
        if trimmed.is_empty() {
            return None;
        }

        let lowered = trimmed.to_lowercase();
        let words = lowered.split_whitespace().collect::<Vec<_>>();
        let now = self.now();

        self.resolve_keyword(&words, now)
            .or_else(|| self.resolve_relative(&words, now))
            .or_else(|| self.resolve_absolute(trimmed))
    }
}

fn all_digits(text: &str, len: usize) -> bool {
    text.len() == len && text.chars().all(|c| c.is_ascii_digit())
}

fn parse_period(word: &str) -> Option<Period> {
    match word {
        "week" => Some(Period::Week),
        "month" => Some(Period::Month),
        "year" => Some(Period::Year),
        _ => None,
    }
}

fn parse_unit(word: &str) -> Option<Unit> {
    match word.strip_suffix('s').unwrap_or(word) {
        "second" | "sec" => Some(Unit::Second),
        "minute" | "min" => Some(Unit::Minute),
        "hour" => Some(Unit::Hour),
        "day" => Some(Unit::Day),
        "week" => Some(Unit::Week),
        "month" => Some(Unit::Month),
        "year" => Some(Unit::Year),
        _ => None,
    }
}

fn parse_count(word: &str) -> Option<u64> {
    match word {
        "a" | "an" | "one" => Some(1),
        _ => word.parse().ok(),
    }
}

/// The date of `weekday` relative to `today`: the most recent one (today
/// included) by default, strictly before for `last`, strictly after for
/// `next`, within the current week for `this`.
fn weekday_date(today: NaiveDate, weekday: Weekday, which: &str) -> Option<NaiveDate> {
    let today_index = today.weekday().num_days_from_monday();
    let target_index = weekday.num_days_from_monday();
    let back = u64::from((today_index + 7 - target_index) % 7);
    let ahead = u64::from((target_index + 7 - today_index) % 7);

    match which {
        "last" => today.checked_sub_days(Days::new(if back == 0 { 7 } else { back })),
        "next" => today.checked_add_days(Days::new(if ahead == 0 { 7 } else { ahead })),
        "this" => {
            let monday = today.checked_sub_days(Days::new(u64::from(today_index)))?;
            monday.checked_add_days(Days::new(u64::from(target_index)))
        }
        _ => today.checked_sub_days(Days::new(back)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // Wednesday 2024-05-15 14:30 UTC
    fn reference() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 5, 15, 14, 30, 0).unwrap()
    }

    fn utc(y: i32, m: u32, d: u32, h: u32, min: u32, s: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(y, m, d, h, min, s).unwrap()
    }

    fn day_span(y: i32, m: u32, d: u32) -> Resolved {
        let start = utc(y, m, d, 0, 0, 0);
        Resolved::Span {
            start,
            end: start + TimeDelta::days(1) - TimeDelta::nanoseconds(1),
        }
    }

    fn resolver() -> PhraseResolver {
        PhraseResolver::at(Tz::UTC, reference())
    }

    #[test]
    fn test_day_keywords() {
        let r = resolver();
        assert_eq!(r.resolve("today"), Some(day_span(2024, 5, 15)));
        assert_eq!(r.resolve("  Yesterday "), Some(day_span(2024, 5, 14)));
        assert_eq!(r.resolve("tomorrow"), Some(day_span(2024, 5, 16)));
        assert_eq!(r.resolve("now"), Some(Resolved::Instant(reference())));
    }

    #[test]
    fn test_periods() {
        let r = resolver();
        let week = r.resolve("this week").unwrap();
        assert_eq!(week.start(), utc(2024, 5, 13, 0, 0, 0));
        assert_eq!(week.end(), utc(2024, 5, 20, 0, 0, 0) - TimeDelta::nanoseconds(1));

        let last_week = r.resolve("last week").unwrap();
        assert_eq!(last_week.start(), utc(2024, 5, 6, 0, 0, 0));

        let last_month = r.resolve("last month").unwrap();
        assert_eq!(last_month.start(), utc(2024, 4, 1, 0, 0, 0));
        assert_eq!(last_month.end(), utc(2024, 5, 1, 0, 0, 0) - TimeDelta::nanoseconds(1));

        let next_year = r.resolve("next year").unwrap();
        assert_eq!(next_year.start(), utc(2025, 1, 1, 0, 0, 0));
    }

    #[test]
    fn test_weekdays() {
        let r = resolver();
        assert_eq!(r.resolve("wednesday"), Some(day_span(2024, 5, 15)));
        assert_eq!(r.resolve("monday"), Some(day_span(2024, 5, 13)));
        assert_eq!(r.resolve("fri"), Some(day_span(2024, 5, 10)));
        assert_eq!(r.resolve("last wednesday"), Some(day_span(2024, 5, 8)));
        assert_eq!(r.resolve("next monday"), Some(day_span(2024, 5, 20)));
        assert_eq!(r.resolve("this friday"), Some(day_span(2024, 5, 17)));
    }

    #[test]
    fn test_relative_offsets() {
        let r = resolver();
        assert_eq!(
            r.resolve("3 days ago"),
            Some(Resolved::Instant(utc(2024, 5, 12, 14, 30, 0)))
        );
        assert_eq!(
            r.resolve("an hour ago"),
            Some(Resolved::Instant(utc(2024, 5, 15, 13, 30, 0)))
        );
        assert_eq!(
            r.resolve("in 2 months"),
            Some(Resolved::Instant(utc(2024, 7, 15, 14, 30, 0)))
        );
        assert_eq!(
            r.resolve("1 year ago"),
            Some(Resolved::Instant(utc(2023, 5, 15, 14, 30, 0)))
        );
    }

    #[test]
    fn test_absolute_dates() {
        let r = resolver();
        assert_eq!(r.resolve("2024-02-29"), Some(day_span(2024, 2, 29)));
        assert_eq!(
            r.resolve("2024-02-29 08:15"),
            Some(Resolved::Instant(utc(2024, 2, 29, 8, 15, 0)))
        );
        assert_eq!(
            r.resolve("2024-02-29T08:15:00+01:00"),
            Some(Resolved::Instant(utc(2024, 2, 29, 7, 15, 0)))
        );

        let month = r.resolve("2024-02").unwrap();
        assert_eq!(month.start(), utc(2024, 2, 1, 0, 0, 0));
        assert_eq!(month.end(), utc(2024, 3, 1, 0, 0, 0) - TimeDelta::nanoseconds(1));

        let year = r.resolve("2023").unwrap();
        assert_eq!(year.start(), utc(2023, 1, 1, 0, 0, 0));
    }

    #[test]
    fn test_reference_zone_shifts_day_bounds() {
        let r = PhraseResolver::at(chrono_tz::Europe::Paris, reference());
        let today = r.resolve("today").unwrap();
        // Paris is UTC+2 in May
        assert_eq!(today.start(), utc(2024, 5, 14, 22, 0, 0));
        assert_eq!(
            r.resolve("2024-05-15 10:00"),
            Some(Resolved::Instant(utc(2024, 5, 15, 8, 0, 0)))
        );
    }

    #[test]
    fn test_unparsable_phrases() {
        let r = resolver();
        assert_eq!(r.resolve(""), None);
        assert_eq!(r.resolve("someday"), None);
        assert_eq!(r.resolve("2024-13-01"), None);
        assert_eq!(r.resolve("three days ago"), None);
        assert_eq!(r.resolve("99999999999999999999 days ago"), None);
    }
}
