//! Date literals.
//!
//! A date is one of, tried in this order:
//!
//! 1. `today` / `now`, `tomorrow` / `tmrw`, `yesterday` / `yest`
//! 2. `yyyy-mm-dd`
//! 3. `dd-mm-yyyy`, or `dd <month> yyyy` with an optional comma before the year
//! 4. `mm-dd-yyyy`, or `<month> dd yyyy` / `<month> dd, yyyy`
//! 5. `beginning of <month>`, `start of <month>`, `end of <month>`
//!
//! `<month>` is a two-digit month number or an English month name (full or
//! three letters). Days and months in numeric forms must have exactly two
//! digits: `march 1 2022` is not accepted, `march 01 2022` is.
//!
//! Informal month dates always resolve inside the year of `today`, whether or
//! not that date has already passed.

use chrono::{Datelike, Days, Months, NaiveDate};
use nom::{
    branch::alt,
    combinator::map,
    error::context,
    sequence::tuple,
};

use crate::error::Result;
use crate::lexer::{
    commit_fault, dash, day, finish_error, keyword, month_name, month_number, one_of,
    optional_comma, whitespace, year, GrammarError, PResult,
};

/// Parse one date literal from the start of `input`.
///
/// Returns the date and the unparsed remainder. `today` anchors the relative
/// keywords and the year of informal month dates.
///
/// # Errors
///
/// [`DateCalcError::SyntaxMismatch`](crate::DateCalcError::SyntaxMismatch) if
/// no date form matches, or
/// [`DateCalcError::InvalidCalendarDate`](crate::DateCalcError::InvalidCalendarDate)
/// if the components name no real day.
///
/// # Examples
///
/// ```
/// use chrono::NaiveDate;
/// use datecalc::date::parse_date;
///
/// let today = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
/// let (date, rest) = parse_date("feb 25, 2022 and more", today).unwrap();
/// assert_eq!(date, NaiveDate::from_ymd_opt(2022, 2, 25).unwrap());
/// assert_eq!(rest, " and more");
/// ```
pub fn parse_date(input: &str, today: NaiveDate) -> Result<(NaiveDate, &str)> {
    date_literal(today)(input)
        .map(|(rest, date)| (date, rest))
        .map_err(|e| finish_error(input, e))
}

/// nom parser for a date literal, for use inside larger grammars.
///
/// An invalid calendar date is a committed failure: enclosing alternatives
/// are not tried after it.
pub fn date_literal<'a>(today: NaiveDate) -> impl FnMut(&'a str) -> PResult<'a, NaiveDate> {
    move |input: &'a str| {
        commit_fault(context(
            "a date",
            alt((
                relative(today),
                iso_date,
                day_first,
                month_first,
                informal(today),
            )),
        )(input))
    }
}

// ── Forms ───────────────────────────────────────────────────────────────────

fn relative<'a>(today: NaiveDate) -> impl FnMut(&'a str) -> PResult<'a, NaiveDate> {
    move |input: &'a str| {
        let (rest, word) =
            one_of(&["today", "now", "tomorrow", "tmrw", "yesterday", "yest"])(input)?;
        let resolved = match word {
            "tomorrow" | "tmrw" => today.checked_add_days(Days::new(1)),
            "yesterday" | "yest" => today.checked_sub_days(Days::new(1)),
            _ => Some(today),
        };
        resolved
            .map(|date| (rest, date))
            .ok_or_else(|| nom::Err::Error(GrammarError::out_of_range(input)))
    }
}

fn iso_date(input: &str) -> PResult<'_, NaiveDate> {
    validated(map(
        tuple((year, dash, month_number, dash, day)),
        |(y, _, m, _, d)| (y, m, d),
    ))(input)
}

fn day_first(input: &str) -> PResult<'_, NaiveDate> {
    alt((
        validated(map(
            tuple((day, dash, month_number, dash, year)),
            |(d, _, m, _, y)| (y, m, d),
        )),
        validated(map(
            tuple((day, whitespace, month, optional_comma, whitespace, year)),
            |(d, _, m, _, _, y)| (y, m, d),
        )),
    ))(input)
}

fn month_first(input: &str) -> PResult<'_, NaiveDate> {
    alt((
        validated(map(
            tuple((month_number, dash, day, dash, year)),
            |(m, _, d, _, y)| (y, m, d),
        )),
        validated(map(
            tuple((month, whitespace, day, optional_comma, whitespace, year)),
            |(m, _, d, _, _, y)| (y, m, d),
        )),
    ))(input)
}

fn informal<'a>(today: NaiveDate) -> impl FnMut(&'a str) -> PResult<'a, NaiveDate> {
    move |input: &'a str| {
        let (rest, (edge, _, _, _, m)) = tuple((
            one_of(&["beginning", "start", "end"]),
            whitespace,
            keyword("of"),
            whitespace,
            month,
        ))(input)?;

        let Some(first) = NaiveDate::from_ymd_opt(today.year(), m, 1) else {
            return Err(nom::Err::Error(GrammarError::invalid_date(
                input,
                today.year(),
                m,
                1,
            )));
        };
        if edge != "end" {
            return Ok((rest, first));
        }
        last_day_of_month(first)
            .map(|date| (rest, date))
            .ok_or_else(|| nom::Err::Error(GrammarError::out_of_range(input)))
    }
}

// ── Helpers ─────────────────────────────────────────────────────────────────

/// A month given either as two digits or by name.
fn month(input: &str) -> PResult<'_, u32> {
    alt((month_number, month_name))(input)
}

/// Build a calendar date from parsed `(year, month, day)` components.
///
/// An impossible date is reported as a recoverable error carrying the fault,
/// so an ambiguous numeric form can still be read the other way round.
fn validated<'a, F>(mut components: F) -> impl FnMut(&'a str) -> PResult<'a, NaiveDate>
where
    F: FnMut(&'a str) -> PResult<'a, (i32, u32, u32)>,
{
    move |input: &'a str| {
        let (rest, (y, m, d)) = components(input)?;
        match NaiveDate::from_ymd_opt(y, m, d) {
            Some(date) => Ok((rest, date)),
            None => Err(nom::Err::Error(GrammarError::invalid_date(input, y, m, d))),
        }
    }
}

/// Day 1 of the following month, minus one day.
fn last_day_of_month(first: NaiveDate) -> Option<NaiveDate> {
    first.checked_add_months(Months::new(1))?.pred_opt()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::DateCalcError;

    fn ymd(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn today() -> NaiveDate {
        ymd(2024, 6, 15)
    }

    fn parse_ok(input: &str) -> NaiveDate {
        match parse_date(input, today()) {
            Ok((date, "")) => date,
            Ok((date, rest)) => panic!("'{input}' parsed as {date} but left '{rest}'"),
            Err(e) => panic!("'{input}' failed: {e}"),
        }
    }

    // ── relative keywords ───────────────────────────────────────────────

    #[test]
    fn test_relative_keywords() {
        assert_eq!(parse_ok("today"), ymd(2024, 6, 15));
        assert_eq!(parse_ok("now"), ymd(2024, 6, 15));
        assert_eq!(parse_ok("tomorrow"), ymd(2024, 6, 16));
        assert_eq!(parse_ok("tmrw"), ymd(2024, 6, 16));
        assert_eq!(parse_ok("yesterday"), ymd(2024, 6, 14));
        assert_eq!(parse_ok("yest"), ymd(2024, 6, 14));
    }

    #[test]
    fn test_relative_keywords_cross_year_boundary() {
        let (date, _) = parse_date("tomorrow", ymd(2023, 12, 31)).unwrap();
        assert_eq!(date, ymd(2024, 1, 1));
        let (date, _) = parse_date("yesterday", ymd(2024, 1, 1)).unwrap();
        assert_eq!(date, ymd(2023, 12, 31));
    }

    #[test]
    fn test_tomorrow_past_max_date_is_out_of_range() {
        let err = parse_date("tomorrow", NaiveDate::MAX).unwrap_err();
        assert_eq!(err.kind(), "date_out_of_range");
    }

    // ── yyyy-mm-dd ──────────────────────────────────────────────────────

    #[test]
    fn test_iso_dates() {
        assert_eq!(parse_ok("2024-02-20"), ymd(2024, 2, 20));
        assert_eq!(parse_ok("2022-10-15"), ymd(2022, 10, 15));
        assert_eq!(parse_ok("2026-12-25"), ymd(2026, 12, 25));
    }

    #[test]
    fn test_iso_invalid_day_is_reported_not_clamped() {
        let err = parse_date("2023-04-31", today()).unwrap_err();
        assert_eq!(
            err,
            DateCalcError::InvalidCalendarDate {
                year: 2023,
                month: 4,
                day: 31
            }
        );
    }

    #[test]
    fn test_iso_leap_day() {
        assert_eq!(parse_ok("2024-02-29"), ymd(2024, 2, 29));
        assert!(matches!(
            parse_date("2023-02-29", today()),
            Err(DateCalcError::InvalidCalendarDate { .. })
        ));
    }

    // ── dd-mm-yyyy ──────────────────────────────────────────────────────

    #[test]
    fn test_day_first_numeric() {
        assert_eq!(parse_ok("20-02-2024"), ymd(2024, 2, 20));
        assert_eq!(parse_ok("30-04-2023"), ymd(2023, 4, 30));
        assert_eq!(parse_ok("25-12-2026"), ymd(2026, 12, 25));
    }

    #[test]
    fn test_day_first_named_month() {
        assert_eq!(parse_ok("20 feb 2022"), ymd(2022, 2, 20));
        assert_eq!(parse_ok("10 mar, 2022"), ymd(2022, 3, 10));
        assert_eq!(parse_ok("01 september 2030"), ymd(2030, 9, 1));
        assert_eq!(parse_ok("20 Feb 2022"), ymd(2022, 2, 20));
    }

    #[test]
    fn test_day_first_invalid_named_date() {
        assert_eq!(
            parse_date("31 apr 2024", today()).unwrap_err(),
            DateCalcError::InvalidCalendarDate {
                year: 2024,
                month: 4,
                day: 31
            }
        );
    }

    // ── mm-dd-yyyy ──────────────────────────────────────────────────────

    #[test]
    fn test_month_first_numeric() {
        assert_eq!(parse_ok("01-15-2022"), ymd(2022, 1, 15));
        assert_eq!(parse_ok("12-25-2023"), ymd(2023, 12, 25));
        assert_eq!(parse_ok("11-30-2025"), ymd(2025, 11, 30));
    }

    #[test]
    fn test_ambiguous_numeric_prefers_day_first() {
        // 03-07-2024 is a valid dd-mm-yyyy date, so it is the 3rd of July.
        assert_eq!(parse_ok("03-07-2024"), ymd(2024, 7, 3));
        assert_eq!(parse_ok("05-01-2026"), ymd(2026, 1, 5));
    }

    #[test]
    fn test_month_first_named_month() {
        assert_eq!(parse_ok("feb 25, 2022"), ymd(2022, 2, 25));
        assert_eq!(parse_ok("apr 15 2022"), ymd(2022, 4, 15));
        assert_eq!(parse_ok("april 20, 2022"), ymd(2022, 4, 20));
        assert_eq!(parse_ok("April 30, 2035"), ymd(2035, 4, 30));
    }

    #[test]
    fn test_single_digit_day_is_not_supported() {
        assert!(matches!(
            parse_date("march 1 2022", today()),
            Err(DateCalcError::SyntaxMismatch { .. })
        ));
        assert!(parse_date("2024-1-05", today()).is_err());
    }

    #[test]
    fn test_numeric_invalid_both_ways() {
        assert_eq!(
            parse_date("31-13-2024", today()).unwrap_err(),
            DateCalcError::InvalidCalendarDate {
                year: 2024,
                month: 13,
                day: 31
            }
        );
    }

    // ── informal ────────────────────────────────────────────────────────

    #[test]
    fn test_informal_dates_use_current_year() {
        assert_eq!(parse_ok("end of april"), ymd(2024, 4, 30));
        assert_eq!(parse_ok("beginning of november"), ymd(2024, 11, 1));
        assert_eq!(parse_ok("start of july"), ymd(2024, 7, 1));
        assert_eq!(parse_ok("end of feb"), ymd(2024, 2, 29));
    }

    #[test]
    fn test_end_of_february_non_leap_year() {
        let (date, _) = parse_date("end of february", ymd(2023, 3, 1)).unwrap();
        assert_eq!(date, ymd(2023, 2, 28));
    }

    #[test]
    fn test_end_of_december_rolls_over() {
        let (date, _) = parse_date("end of december", ymd(2025, 1, 10)).unwrap();
        assert_eq!(date, ymd(2025, 12, 31));
    }

    #[test]
    fn test_informal_numeric_month() {
        assert_eq!(parse_ok("end of 06"), ymd(2024, 6, 30));
        assert!(matches!(
            parse_date("end of 13", today()),
            Err(DateCalcError::InvalidCalendarDate { month: 13, .. })
        ));
    }

    // ── failures ────────────────────────────────────────────────────────

    #[test]
    fn test_unknown_word_expects_a_date() {
        match parse_date("soon", today()).unwrap_err() {
            DateCalcError::SyntaxMismatch {
                position,
                expected,
                ..
            } => {
                assert_eq!(position, 0);
                assert_eq!(expected, vec!["a date".to_string()]);
            }
            other => panic!("unexpected: {other:?}"),
        }
    }

    #[test]
    fn test_partial_iso_reports_furthest_position() {
        match parse_date("2024-1", today()).unwrap_err() {
            DateCalcError::SyntaxMismatch {
                position,
                expected,
                ..
            } => {
                assert_eq!(position, 5);
                assert!(expected.contains(&"2-digit month".to_string()), "{expected:?}");
            }
            other => panic!("unexpected: {other:?}"),
        }
    }

    #[test]
    fn test_remaining_input_is_returned() {
        let (date, rest) = parse_date("2024-01-10 and 2024-01-01", today()).unwrap();
        assert_eq!(date, ymd(2024, 1, 10));
        assert_eq!(rest, " and 2024-01-01");
    }
}
