//! # datecalc
//!
//! Deterministic date arithmetic from natural-language queries.
//!
//! A query such as `"how long until April 30, 2035"` or
//! `"3 weeks before 2024-01-01"` is parsed against a fixed grammar and
//! evaluated into a start date, an end date, and the number of days between
//! them. Nothing is guessed: a query either matches one of the supported
//! shapes completely or it is rejected with a typed error.
//!
//! "Today" is always an explicit argument. The library never reads the
//! system clock, so the same query and anchor always give the same answer.
//!
//! ## Modules
//!
//! - [`lexer`]: digits, keywords, month names, and the grammar error type
//! - [`date`]: date literals (`yyyy-mm-dd`, `dd-mm-yyyy`, `mm-dd-yyyy`, `today`, `end of may`, ...)
//! - [`unit`]: duration units and calendar-aware offsetting
//! - [`query`]: the five query shapes and their dispatch order
//! - [`eval`]: query shape → [`ParseResult`]
//! - [`error`]: Error types
//!
//! ## Example
//!
//! ```
//! use chrono::NaiveDate;
//! use datecalc::{run_application_parser, ShapeTag};
//!
//! let today = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
//! let result = run_application_parser("3 weeks after 2024-01-01", today).unwrap();
//! assert_eq!(result.parser, ShapeTag::TimeAfter);
//! assert_eq!(result.end_date, NaiveDate::from_ymd_opt(2024, 1, 22).unwrap());
//! assert_eq!(result.delta_days, 21);
//! ```

pub mod date;
pub mod error;
pub mod eval;
pub mod lexer;
pub mod query;
pub mod unit;

use chrono::NaiveDate;

pub use date::parse_date;
pub use error::{DateCalcError, Result};
pub use eval::{evaluate, ParseResult};
pub use query::{normalize_query, parse_query, QueryShape, ShapeTag};
pub use unit::{parse_unit, Duration, Unit};

/// Parse `query` and evaluate it relative to `today`.
///
/// The query is trimmed and lowercased before matching.
///
/// # Errors
///
/// - [`DateCalcError::SyntaxMismatch`] if no query shape matches the whole query
/// - [`DateCalcError::InvalidCalendarDate`] if a date in the query does not exist
/// - [`DateCalcError::OrderingViolation`] if a forward-only shape ends before it starts
/// - [`DateCalcError::DateOutOfRange`] if unit arithmetic leaves the calendar
pub fn run_application_parser(query: &str, today: NaiveDate) -> Result<ParseResult> {
    let shape = parse_query(query, today)?;
    evaluate(&shape, today)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ymd(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_how_long_until() {
        let result = run_application_parser("how long until 2035-04-30", ymd(2024, 1, 1)).unwrap();
        assert_eq!(result.start_date, ymd(2024, 1, 1));
        assert_eq!(result.end_date, ymd(2035, 4, 30));
        assert_eq!(result.delta_days, 4137);
    }

    #[test]
    fn test_how_long_since() {
        let result = run_application_parser("how long since 2000-01-01", ymd(2024, 1, 1)).unwrap();
        assert_eq!(result.delta_days, 8766);
    }

    #[test]
    fn test_weeks_after() {
        let result = run_application_parser("3 weeks after 2024-01-01", ymd(2020, 1, 1)).unwrap();
        assert_eq!(result.end_date, ymd(2024, 1, 22));
    }

    #[test]
    fn test_month_before_clamps_into_leap_february() {
        let result = run_application_parser("1 month before 2024-03-31", ymd(2020, 1, 1)).unwrap();
        assert_eq!(result.start_date, ymd(2024, 2, 29));
        assert_eq!(result.parser, ShapeTag::TimeBefore);
    }

    #[test]
    fn test_reversed_between_is_rejected() {
        let err = run_application_parser(
            "how long between 2024-01-10 and 2024-01-01",
            ymd(2024, 6, 1),
        )
        .unwrap_err();
        assert!(matches!(err, DateCalcError::OrderingViolation { .. }));
    }

    #[test]
    fn test_gibberish_is_syntax_mismatch() {
        let err = run_application_parser("bad one", ymd(2024, 1, 1)).unwrap_err();
        assert!(matches!(err, DateCalcError::SyntaxMismatch { .. }));
    }

    #[test]
    fn test_mixed_case_and_padding() {
        let result =
            run_application_parser("  How Many Days Until End Of December ", ymd(2024, 1, 1))
                .unwrap();
        assert_eq!(result.end_date, ymd(2024, 12, 31));
        assert_eq!(result.delta_days, 365);
    }

    #[test]
    fn test_informal_date_already_passed_is_ordering_violation() {
        // Informal dates stay in the current year even when already behind us.
        let err = run_application_parser("how long until start of march", ymd(2024, 6, 1))
            .unwrap_err();
        assert!(matches!(err, DateCalcError::OrderingViolation { .. }));
    }
}
