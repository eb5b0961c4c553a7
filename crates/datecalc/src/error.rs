//! Error types for datecalc operations.

use chrono::NaiveDate;
use thiserror::Error;

use crate::query::ShapeTag;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DateCalcError {
    #[error("Could not understand query at position {position} near '{fragment}': expected {}", format_expected(.expected))]
    SyntaxMismatch {
        /// Byte offset into the normalized query where parsing got furthest.
        position: usize,
        /// The unparsed input starting at `position`.
        fragment: String,
        expected: Vec<String>,
    },

    #[error("Ordering violation in '{shape}': start date {start} is after end date {end}")]
    OrderingViolation {
        shape: ShapeTag,
        start: NaiveDate,
        end: NaiveDate,
    },

    #[error("Invalid calendar date: year {year}, month {month}, day {day}")]
    InvalidCalendarDate { year: i32, month: u32, day: u32 },

    #[error("Date out of range: {0}")]
    DateOutOfRange(String),
}

impl DateCalcError {
    /// Short machine-readable name of the error variant.
    pub fn kind(&self) -> &'static str {
        match self {
            DateCalcError::SyntaxMismatch { .. } => "syntax_mismatch",
            DateCalcError::OrderingViolation { .. } => "ordering_violation",
            DateCalcError::InvalidCalendarDate { .. } => "invalid_calendar_date",
            DateCalcError::DateOutOfRange(_) => "date_out_of_range",
        }
    }
}

fn format_expected(expected: &[String]) -> String {
    match expected {
        [] => "end of input".to_string(),
        [only] => only.clone(),
        many => format!("one of: {}", many.join(", ")),
    }
}

pub type Result<T> = std::result::Result<T, DateCalcError>;
