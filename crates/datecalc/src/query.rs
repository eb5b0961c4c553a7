//! Query shapes: the five sentence patterns a query can take.
//!
//! | Shape          | Pattern                                                         |
//! |----------------|-----------------------------------------------------------------|
//! | how long until | `(how long \| how many days) (until \| till) <date>`            |
//! | how long since | `how long since <date>`                                         |
//! | time after     | `<n> <unit> (after \| from) <date>`                             |
//! | time before    | `<n> <unit> (before \| to) <date>`                              |
//! | between        | `(how much time \| how long \| how many days) between <date> and <date>` |
//!
//! Shapes are tried in the order time before, time after, how long since,
//! how long until, between. The first shape that matches the whole query wins.

use std::fmt;

use chrono::NaiveDate;
use nom::{
    branch::alt,
    combinator::{all_consuming, map},
    sequence::tuple,
};
use serde::Serialize;

use crate::date::date_literal;
use crate::error::Result;
use crate::lexer::{finish_error, keyword, number, one_of, one_of_phrases, whitespace, PResult};
use crate::unit::{unit, Duration};

/// Which query shape produced a result.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum ShapeTag {
    #[serde(rename = "how long until")]
    HowLongUntil,
    #[serde(rename = "how long since")]
    HowLongSince,
    #[serde(rename = "time after")]
    TimeAfter,
    #[serde(rename = "time before")]
    TimeBefore,
    #[serde(rename = "between")]
    Between,
}

impl ShapeTag {
    pub fn as_str(self) -> &'static str {
        match self {
            ShapeTag::HowLongUntil => "how long until",
            ShapeTag::HowLongSince => "how long since",
            ShapeTag::TimeAfter => "time after",
            ShapeTag::TimeBefore => "time before",
            ShapeTag::Between => "between",
        }
    }
}

impl fmt::Display for ShapeTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A parsed query with the operands its pattern captured.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QueryShape {
    HowLongUntil { end: NaiveDate },
    HowLongSince { start: NaiveDate },
    TimeAfter { duration: Duration, date: NaiveDate },
    TimeBefore { duration: Duration, date: NaiveDate },
    Between { start: NaiveDate, end: NaiveDate },
}

impl QueryShape {
    pub fn tag(&self) -> ShapeTag {
        match self {
            QueryShape::HowLongUntil { .. } => ShapeTag::HowLongUntil,
            QueryShape::HowLongSince { .. } => ShapeTag::HowLongSince,
            QueryShape::TimeAfter { .. } => ShapeTag::TimeAfter,
            QueryShape::TimeBefore { .. } => ShapeTag::TimeBefore,
            QueryShape::Between { .. } => ShapeTag::Between,
        }
    }
}

/// Lowercase and trim a raw query.
pub fn normalize_query(query: &str) -> String {
    query.trim().to_lowercase()
}

/// Parse a query into its shape.
///
/// The query is normalized with [`normalize_query`] first; error positions
/// refer to the normalized text.
///
/// # Errors
///
/// [`DateCalcError::SyntaxMismatch`](crate::DateCalcError::SyntaxMismatch)
/// when no shape matches the whole query, or
/// [`DateCalcError::InvalidCalendarDate`](crate::DateCalcError::InvalidCalendarDate)
/// when a shape matched but one of its dates does not exist.
///
/// # Examples
///
/// ```
/// use chrono::NaiveDate;
/// use datecalc::{parse_query, QueryShape};
///
/// let today = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
/// let shape = parse_query("How long until 2035-04-30", today).unwrap();
/// assert_eq!(
///     shape,
///     QueryShape::HowLongUntil { end: NaiveDate::from_ymd_opt(2035, 4, 30).unwrap() }
/// );
/// ```
pub fn parse_query(query: &str, today: NaiveDate) -> Result<QueryShape> {
    let normalized = normalize_query(query);
    let result = alt((
        all_consuming(time_before(today)),
        all_consuming(time_after(today)),
        all_consuming(how_long_since(today)),
        all_consuming(how_long_until(today)),
        all_consuming(between(today)),
    ))(normalized.as_str())
    .map(|(_, shape)| shape)
    .map_err(|e| finish_error(&normalized, e));
    result
}

// ── Shapes ──────────────────────────────────────────────────────────────────

fn time_before<'a>(today: NaiveDate) -> impl FnMut(&'a str) -> PResult<'a, QueryShape> {
    map(
        offset_clause(today, &["before", "to"]),
        |(duration, date)| QueryShape::TimeBefore { duration, date },
    )
}

fn time_after<'a>(today: NaiveDate) -> impl FnMut(&'a str) -> PResult<'a, QueryShape> {
    map(
        offset_clause(today, &["after", "from"]),
        |(duration, date)| QueryShape::TimeAfter { duration, date },
    )
}

fn how_long_since<'a>(today: NaiveDate) -> impl FnMut(&'a str) -> PResult<'a, QueryShape> {
    map(
        tuple((
            one_of_phrases(&["how long since"]),
            whitespace,
            date_literal(today),
        )),
        |(_, _, start)| QueryShape::HowLongSince { start },
    )
}

fn how_long_until<'a>(today: NaiveDate) -> impl FnMut(&'a str) -> PResult<'a, QueryShape> {
    map(
        tuple((
            one_of_phrases(&["how long", "how many days"]),
            whitespace,
            one_of(&["until", "till"]),
            whitespace,
            date_literal(today),
        )),
        |(_, _, _, _, end)| QueryShape::HowLongUntil { end },
    )
}

fn between<'a>(today: NaiveDate) -> impl FnMut(&'a str) -> PResult<'a, QueryShape> {
    map(
        tuple((
            one_of_phrases(&["how much time", "how long", "how many days"]),
            whitespace,
            keyword("between"),
            whitespace,
            date_literal(today),
            whitespace,
            keyword("and"),
            whitespace,
            date_literal(today),
        )),
        |(_, _, _, _, start, _, _, _, end)| QueryShape::Between { start, end },
    )
}

/// `<n> <unit> <connective> <date>`
fn offset_clause<'a>(
    today: NaiveDate,
    connectives: &'static [&'static str],
) -> impl FnMut(&'a str) -> PResult<'a, (Duration, NaiveDate)> {
    map(
        tuple((
            number,
            whitespace,
            unit,
            whitespace,
            one_of(connectives),
            whitespace,
            date_literal(today),
        )),
        |(magnitude, _, u, _, _, _, date)| (Duration::new(u, magnitude), date),
    )
}
