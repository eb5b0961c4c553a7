//! Duration units and offsetting dates by them.

use std::fmt;

use chrono::{Days, Months, NaiveDate, NaiveTime, TimeDelta};
use nom::bytes::complete::tag_no_case;

use crate::error::{DateCalcError, Result};
use crate::lexer::{finish_error, Expectation, GrammarError, PResult};

/// A duration unit, identified by its canonical plural name.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Unit {
    Microseconds,
    Milliseconds,
    Seconds,
    Minutes,
    Hours,
    Days,
    Weeks,
    Months,
    Years,
}

impl Unit {
    /// The canonical plural name ("day" and "days" both map to "days").
    pub fn canonical_name(self) -> &'static str {
        match self {
            Unit::Microseconds => "microseconds",
            Unit::Milliseconds => "milliseconds",
            Unit::Seconds => "seconds",
            Unit::Minutes => "minutes",
            Unit::Hours => "hours",
            Unit::Days => "days",
            Unit::Weeks => "weeks",
            Unit::Months => "months",
            Unit::Years => "years",
        }
    }
}

impl fmt::Display for Unit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.canonical_name())
    }
}

/// Plurals first so "days" is not read as "day" + "s".
const UNIT_WORDS: [(&str, Unit); 18] = [
    ("days", Unit::Days),
    ("seconds", Unit::Seconds),
    ("microseconds", Unit::Microseconds),
    ("milliseconds", Unit::Milliseconds),
    ("minutes", Unit::Minutes),
    ("hours", Unit::Hours),
    ("weeks", Unit::Weeks),
    ("years", Unit::Years),
    ("months", Unit::Months),
    ("day", Unit::Days),
    ("second", Unit::Seconds),
    ("microsecond", Unit::Microseconds),
    ("millisecond", Unit::Milliseconds),
    ("minute", Unit::Minutes),
    ("hour", Unit::Hours),
    ("week", Unit::Weeks),
    ("year", Unit::Years),
    ("month", Unit::Months),
];

/// Parse a unit word from the start of `input`.
///
/// # Errors
///
/// [`DateCalcError::SyntaxMismatch`] if `input` does not start with a unit.
pub fn parse_unit(input: &str) -> Result<(Unit, &str)> {
    unit(input)
        .map(|(rest, u)| (u, rest))
        .map_err(|e| finish_error(input, e))
}

/// nom parser for a unit word.
pub fn unit(input: &str) -> PResult<'_, Unit> {
    for (word, u) in UNIT_WORDS {
        if let Ok((rest, _)) = tag_no_case::<_, _, GrammarError<'_>>(word)(input) {
            return Ok((rest, u));
        }
    }
    Err(nom::Err::Error(GrammarError::expected(
        input,
        Expectation::Label("time unit"),
    )))
}

// ── Duration ────────────────────────────────────────────────────────────────

/// A non-negative amount of some [`Unit`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Duration {
    pub unit: Unit,
    pub magnitude: u32,
}

impl Duration {
    pub fn new(unit: Unit, magnitude: u32) -> Self {
        Duration { unit, magnitude }
    }

    /// The date `self` after `date`.
    ///
    /// Months and years keep the day of month, clamped to the last day of a
    /// shorter target month: January 31 plus one month is the last day of
    /// February. Units shorter than a day are applied to midnight of `date`
    /// and the calendar date of the resulting instant is returned.
    ///
    /// # Errors
    ///
    /// [`DateCalcError::DateOutOfRange`] if the result is not representable.
    pub fn after(&self, date: NaiveDate) -> Result<NaiveDate> {
        self.shift(date, true)
            .ok_or_else(|| self.out_of_range("after", date))
    }

    /// The date `self` before `date`. See [`Duration::after`].
    pub fn before(&self, date: NaiveDate) -> Result<NaiveDate> {
        self.shift(date, false)
            .ok_or_else(|| self.out_of_range("before", date))
    }

    fn shift(&self, date: NaiveDate, forward: bool) -> Option<NaiveDate> {
        let n = self.magnitude;
        match self.unit {
            Unit::Days => shift_days(date, u64::from(n), forward),
            Unit::Weeks => shift_days(date, u64::from(n) * 7, forward),
            Unit::Months => shift_months(date, n, forward),
            Unit::Years => shift_months(date, n.checked_mul(12)?, forward),
            Unit::Hours
            | Unit::Minutes
            | Unit::Seconds
            | Unit::Milliseconds
            | Unit::Microseconds => {
                let delta = self.time_delta()?;
                let midnight = date.and_time(NaiveTime::MIN);
                let shifted = if forward {
                    midnight.checked_add_signed(delta)?
                } else {
                    midnight.checked_sub_signed(delta)?
                };
                Some(shifted.date())
            }
        }
    }

    fn time_delta(&self) -> Option<TimeDelta> {
        let n = i64::from(self.magnitude);
        match self.unit {
            Unit::Hours => TimeDelta::try_hours(n),
            Unit::Minutes => TimeDelta::try_minutes(n),
            Unit::Seconds => TimeDelta::try_seconds(n),
            Unit::Milliseconds => TimeDelta::try_milliseconds(n),
            Unit::Microseconds => Some(TimeDelta::microseconds(n)),
            _ => None,
        }
    }

    fn out_of_range(&self, direction: &str, date: NaiveDate) -> DateCalcError {
        DateCalcError::DateOutOfRange(format!("{self} {direction} {date}"))
    }
}

impl fmt::Display for Duration {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.magnitude, self.unit)
    }
}

fn shift_days(date: NaiveDate, days: u64, forward: bool) -> Option<NaiveDate> {
    if forward {
        date.checked_add_days(Days::new(days))
    } else {
        date.checked_sub_days(Days::new(days))
    }
}

fn shift_months(date: NaiveDate, months: u32, forward: bool) -> Option<NaiveDate> {
    if forward {
        date.checked_add_months(Months::new(months))
    } else {
        date.checked_sub_months(Months::new(months))
    }
}
