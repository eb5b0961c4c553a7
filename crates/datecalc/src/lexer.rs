//! Lexical primitives shared by the date, unit and query grammars.
//!
//! Every parser here is a plain nom function over `&str` using
//! [`GrammarError`] as its error type. The error keeps the furthest position
//! any alternative reached and the set of things that would have been
//! accepted there, which is what ends up in
//! [`DateCalcError::SyntaxMismatch`].

use std::fmt;

use nom::{
    bytes::complete::{tag, tag_no_case, take_while1, take_while_m_n},
    character::complete::{multispace0, multispace1},
    combinator::{map_res, opt, recognize},
    error::{context, ContextError, ErrorKind, FromExternalError, ParseError},
    sequence::pair,
    IResult,
};

use crate::error::DateCalcError;

pub type PResult<'a, O> = IResult<&'a str, O, GrammarError<'a>>;

// ── Grammar error ───────────────────────────────────────────────────────────

/// Something the grammar would have accepted at a failure position.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Expectation {
    /// A keyword or phrase that must appear verbatim.
    Literal(&'static str),
    /// A named class of input ("4-digit year", "a date", ...).
    Label(&'static str),
}

impl fmt::Display for Expectation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Expectation::Literal(s) => write!(f, "\"{s}\""),
            Expectation::Label(s) => f.write_str(s),
        }
    }
}

/// A failure that is not about syntax: the input was understood but names no
/// representable date.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DateFault {
    /// Components parsed but do not form a calendar date.
    Invalid { year: i32, month: u32, day: u32 },
    /// The date falls outside the supported calendar range.
    OutOfRange,
}

/// nom error type that tracks the furthest failure across an alternation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GrammarError<'a> {
    /// Unparsed input at the failure position.
    pub remaining: &'a str,
    pub expected: Vec<Expectation>,
    pub fault: Option<DateFault>,
}

impl<'a> GrammarError<'a> {
    pub fn expected(remaining: &'a str, expectation: Expectation) -> Self {
        GrammarError {
            remaining,
            expected: vec![expectation],
            fault: None,
        }
    }

    pub fn invalid_date(remaining: &'a str, year: i32, month: u32, day: u32) -> Self {
        GrammarError {
            remaining,
            expected: Vec::new(),
            fault: Some(DateFault::Invalid { year, month, day }),
        }
    }

    pub fn out_of_range(remaining: &'a str) -> Self {
        GrammarError {
            remaining,
            expected: Vec::new(),
            fault: Some(DateFault::OutOfRange),
        }
    }

    /// Convert into the public error, computing the position relative to `source`.
    pub fn into_public(self, source: &str) -> DateCalcError {
        match self.fault {
            Some(DateFault::Invalid { year, month, day }) => {
                return DateCalcError::InvalidCalendarDate { year, month, day };
            }
            Some(DateFault::OutOfRange) => {
                return DateCalcError::DateOutOfRange(format!("'{}'", self.remaining));
            }
            None => {}
        }
        let mut expected: Vec<String> = Vec::with_capacity(self.expected.len());
        for e in &self.expected {
            let rendered = e.to_string();
            if !expected.contains(&rendered) {
                expected.push(rendered);
            }
        }
        DateCalcError::SyntaxMismatch {
            position: source.len().saturating_sub(self.remaining.len()),
            fragment: self.remaining.to_string(),
            expected,
        }
    }
}

impl<'a> ParseError<&'a str> for GrammarError<'a> {
    fn from_error_kind(input: &'a str, _kind: ErrorKind) -> Self {
        GrammarError {
            remaining: input,
            expected: Vec::new(),
            fault: None,
        }
    }

    fn append(_input: &'a str, _kind: ErrorKind, other: Self) -> Self {
        other
    }

    /// Keep whichever branch got further; merge expectations on a tie.
    /// A date fault outranks any syntax failure.
    fn or(mut self, other: Self) -> Self {
        match (self.fault.is_some(), other.fault.is_some()) {
            (true, _) => return self,
            (false, true) => return other,
            _ => {}
        }
        match self.remaining.len().cmp(&other.remaining.len()) {
            std::cmp::Ordering::Less => self,
            std::cmp::Ordering::Greater => other,
            std::cmp::Ordering::Equal => {
                for e in other.expected {
                    if !self.expected.contains(&e) {
                        self.expected.push(e);
                    }
                }
                self
            }
        }
    }
}

impl<'a> ContextError<&'a str> for GrammarError<'a> {
    /// The label only replaces the inner expectations when the inner parser
    /// failed without consuming anything.
    fn add_context(input: &'a str, ctx: &'static str, other: Self) -> Self {
        if other.fault.is_some() || other.remaining.len() < input.len() {
            return other;
        }
        GrammarError::expected(input, Expectation::Label(ctx))
    }
}

impl<'a, E> FromExternalError<&'a str, E> for GrammarError<'a> {
    fn from_external_error(input: &'a str, kind: ErrorKind, _e: E) -> Self {
        GrammarError::from_error_kind(input, kind)
    }
}

/// Convert a nom failure from parsing `source` into the public error.
pub fn finish_error(source: &str, err: nom::Err<GrammarError<'_>>) -> DateCalcError {
    match err {
        nom::Err::Error(e) | nom::Err::Failure(e) => e.into_public(source),
        nom::Err::Incomplete(_) => DateCalcError::SyntaxMismatch {
            position: source.len(),
            fragment: String::new(),
            expected: Vec::new(),
        },
    }
}

/// Turn a recoverable date fault into a committed failure so that no later
/// alternative is tried.
pub fn commit_fault<O>(result: PResult<'_, O>) -> PResult<'_, O> {
    match result {
        Err(nom::Err::Error(e)) if e.fault.is_some() => Err(nom::Err::Failure(e)),
        other => other,
    }
}

// ── Digits ──────────────────────────────────────────────────────────────────

fn is_digit(c: char) -> bool {
    c.is_ascii_digit()
}

/// Exactly four digits.
pub fn four_digit(input: &str) -> PResult<'_, i32> {
    map_res(take_while_m_n(4, 4, is_digit), str::parse::<i32>)(input)
}

/// Exactly two digits.
pub fn two_digit(input: &str) -> PResult<'_, u32> {
    map_res(take_while_m_n(2, 2, is_digit), str::parse::<u32>)(input)
}

pub fn year(input: &str) -> PResult<'_, i32> {
    context("4-digit year", four_digit)(input)
}

pub fn month_number(input: &str) -> PResult<'_, u32> {
    context("2-digit month", two_digit)(input)
}

pub fn day(input: &str) -> PResult<'_, u32> {
    context("2-digit day", two_digit)(input)
}

/// One or more digits as a non-negative magnitude.
pub fn number(input: &str) -> PResult<'_, u32> {
    context("number", map_res(take_while1(is_digit), str::parse::<u32>))(input)
}

// ── Separators ──────────────────────────────────────────────────────────────

pub fn dash(input: &str) -> PResult<'_, &str> {
    context("\"-\"", tag("-"))(input)
}

pub fn whitespace(input: &str) -> PResult<'_, &str> {
    context("whitespace", multispace1)(input)
}

/// `\s*,`, optionally.
pub fn optional_comma(input: &str) -> PResult<'_, Option<&str>> {
    opt(recognize(pair(multispace0, tag(","))))(input)
}

// ── Keywords ────────────────────────────────────────────────────────────────

/// A single case-insensitive keyword.
pub fn keyword<'a>(word: &'static str) -> impl FnMut(&'a str) -> PResult<'a, &'static str> {
    move |input: &'a str| match tag_no_case::<_, _, GrammarError<'a>>(word)(input) {
        Ok((rest, _)) => Ok((rest, word)),
        Err(_) => Err(nom::Err::Error(GrammarError::expected(
            input,
            Expectation::Literal(word),
        ))),
    }
}

/// The first matching keyword of `words`, tried in order.
pub fn one_of<'a>(
    words: &'static [&'static str],
) -> impl FnMut(&'a str) -> PResult<'a, &'static str> {
    first_match(words, keyword)
}

/// Try `make(candidate)` for each candidate in order. On total failure the
/// expectations of every candidate are merged.
fn first_match<'a, F, P>(
    candidates: &'static [&'static str],
    make: F,
) -> impl FnMut(&'a str) -> PResult<'a, &'static str>
where
    F: Fn(&'static str) -> P,
    P: FnMut(&'a str) -> PResult<'a, &'static str>,
{
    move |input: &'a str| {
        let mut err: Option<GrammarError<'a>> = None;
        for candidate in candidates {
            match make(*candidate)(input) {
                Ok(ok) => return Ok(ok),
                Err(nom::Err::Error(e)) => {
                    err = Some(match err {
                        Some(prev) => prev.or(e),
                        None => e,
                    })
                }
                Err(other) => return Err(other),
            }
        }
        Err(nom::Err::Error(err.unwrap_or_else(|| {
            GrammarError::from_error_kind(input, ErrorKind::Tag)
        })))
    }
}

/// A multi-word phrase such as `"how long since"`. Words may be separated by
/// any run of whitespace. A failure is reported at the start of the phrase.
pub fn phrase<'a>(text: &'static str) -> impl FnMut(&'a str) -> PResult<'a, &'static str> {
    move |start: &'a str| {
        let words = |mut input: &'a str| -> PResult<'a, ()> {
            for (i, word) in text.split(' ').enumerate() {
                if i > 0 {
                    (input, _) = multispace1(input)?;
                }
                (input, _) = tag_no_case(word)(input)?;
            }
            Ok((input, ()))
        };
        match words(start) {
            Ok((rest, ())) => Ok((rest, text)),
            Err(_) => Err(nom::Err::Error(GrammarError::expected(
                start,
                Expectation::Literal(text),
            ))),
        }
    }
}

/// The first matching phrase of `phrases`, tried in order.
pub fn one_of_phrases<'a>(
    phrases: &'static [&'static str],
) -> impl FnMut(&'a str) -> PResult<'a, &'static str> {
    first_match(phrases, phrase)
}

// ── Month names ─────────────────────────────────────────────────────────────

/// Full names first so "march" is not read as "mar" + "ch".
const MONTH_NAMES: [(&str, u32); 24] = [
    ("january", 1),
    ("february", 2),
    ("march", 3),
    ("april", 4),
    ("may", 5),
    ("june", 6),
    ("july", 7),
    ("august", 8),
    ("september", 9),
    ("october", 10),
    ("november", 11),
    ("december", 12),
    ("jan", 1),
    ("feb", 2),
    ("mar", 3),
    ("apr", 4),
    ("may", 5),
    ("jun", 6),
    ("jul", 7),
    ("aug", 8),
    ("sep", 9),
    ("oct", 10),
    ("nov", 11),
    ("dec", 12),
];

/// A full or three-letter English month name, case-insensitive.
pub fn month_name(input: &str) -> PResult<'_, u32> {
    for (name, number) in MONTH_NAMES {
        if let Ok((rest, _)) = tag_no_case::<_, _, GrammarError<'_>>(name)(input) {
            return Ok((rest, number));
        }
    }
    Err(nom::Err::Error(GrammarError::expected(
        input,
        Expectation::Label("month name"),
    )))
}
