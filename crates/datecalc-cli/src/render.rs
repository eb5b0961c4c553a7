//! Output rendering for query results and errors.

use clap::ValueEnum;
use datecalc::{DateCalcError, ParseResult, ShapeTag};
use serde_json::{json, Value};

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Format {
    /// One line of JSON
    Json,
    /// Indented JSON
    Pretty,
    /// A plain-English sentence
    Text,
}

/// JSON view of a result. The operand the query supplied sits at the top
/// level; the computed answer sits under `result`.
pub fn to_json(result: &ParseResult) -> Value {
    match result.parser {
        ShapeTag::HowLongUntil | ShapeTag::HowLongSince | ShapeTag::Between => json!({
            "start_date": result.start_date,
            "end_date": result.end_date,
            "parser": result.parser,
            "result": { "delta": result.delta_days },
        }),
        ShapeTag::TimeAfter => json!({
            "start_date": result.start_date,
            "delta": result.delta_days,
            "parser": result.parser,
            "result": { "end_date": result.end_date },
        }),
        ShapeTag::TimeBefore => json!({
            "end_date": result.end_date,
            "delta": result.delta_days,
            "parser": result.parser,
            "result": { "start_date": result.start_date },
        }),
    }
}

pub fn error_json(err: &DateCalcError) -> Value {
    let mut body = json!({
        "kind": err.kind(),
        "message": err.to_string(),
    });
    if let DateCalcError::SyntaxMismatch {
        position, expected, ..
    } = err
    {
        body["position"] = json!(position);
        body["expected"] = json!(expected);
    }
    json!({ "error": body })
}

pub fn to_text(result: &ParseResult) -> String {
    let days = plural_days(result.delta_days);
    match result.parser {
        ShapeTag::HowLongUntil => {
            format!("{days} from {} until {}", result.start_date, result.end_date)
        }
        ShapeTag::HowLongSince => {
            format!("{days} since {} (as of {})", result.start_date, result.end_date)
        }
        ShapeTag::Between => {
            format!("{days} between {} and {}", result.start_date, result.end_date)
        }
        ShapeTag::TimeAfter => {
            format!("{} ({days} after {})", result.end_date, result.start_date)
        }
        ShapeTag::TimeBefore => {
            format!("{} ({days} before {})", result.start_date, result.end_date)
        }
    }
}

fn plural_days(n: i64) -> String {
    format!("{} day{}", n, if n == 1 { "" } else { "s" })
}

pub fn success(result: &ParseResult, format: Format) -> serde_json::Result<String> {
    match format {
        Format::Json => serde_json::to_string(&to_json(result)),
        Format::Pretty => serde_json::to_string_pretty(&to_json(result)),
        Format::Text => Ok(to_text(result)),
    }
}

pub fn failure(err: &DateCalcError, format: Format) -> serde_json::Result<String> {
    match format {
        Format::Pretty => serde_json::to_string_pretty(&error_json(err)),
        Format::Json | Format::Text => serde_json::to_string(&error_json(err)),
    }
}
