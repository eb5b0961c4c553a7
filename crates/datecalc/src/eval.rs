//! Evaluation of a parsed query into concrete dates and a day delta.

use chrono::NaiveDate;
use serde::Serialize;

use crate::error::{DateCalcError, Result};
use crate::query::{QueryShape, ShapeTag};

/// The answer to a date query.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ParseResult {
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    /// The query shape that matched.
    pub parser: ShapeTag,
    /// `end_date - start_date` in whole days.
    pub delta_days: i64,
}

impl ParseResult {
    fn new(parser: ShapeTag, start_date: NaiveDate, end_date: NaiveDate) -> Self {
        ParseResult {
            start_date,
            end_date,
            parser,
            delta_days: end_date.signed_duration_since(start_date).num_days(),
        }
    }
}

/// Compute the dates and delta for a parsed query.
///
/// `today` is the start of "how long until" and the end of "how long since".
///
/// # Errors
///
/// [`DateCalcError::OrderingViolation`] when a forward-only shape ("how long
/// until", "how long since", "between") would have its end before its start,
/// and [`DateCalcError::DateOutOfRange`] when unit arithmetic leaves the
/// representable calendar.
pub fn evaluate(shape: &QueryShape, today: NaiveDate) -> Result<ParseResult> {
    let tag = shape.tag();
    match *shape {
        QueryShape::HowLongUntil { end } => ordered(tag, today, end),
        QueryShape::HowLongSince { start } => ordered(tag, start, today),
        QueryShape::Between { start, end } => ordered(tag, start, end),
        QueryShape::TimeAfter { duration, date } => {
            Ok(ParseResult::new(tag, date, duration.after(date)?))
        }
        QueryShape::TimeBefore { duration, date } => {
            Ok(ParseResult::new(tag, duration.before(date)?, date))
        }
    }
}

fn ordered(shape: ShapeTag, start: NaiveDate, end: NaiveDate) -> Result<ParseResult> {
    if start > end {
        return Err(DateCalcError::OrderingViolation { shape, start, end });
    }
    Ok(ParseResult::new(shape, start, end))
}
