//! Lenient value coercion for currency, quantity, and date cells
//!
//! Currency cells are frequently blank or annotated in raw exports, so an
//! unparseable amount coerces to zero and is only counted, never fatal.
//! Dates are load-bearing for the time series: an unparseable date is a
//! row-scoped error and the row is skipped.

use std::str::FromStr;

use calamine::Data;
use chrono::NaiveDate;
use rust_decimal::prelude::FromPrimitive;
use rust_decimal::Decimal;

use shared::CoercedAmount;

use crate::sheet::cell_text;

/// Calendar formats seen across manual exports: day-first culture formats
/// plus ISO.
const DATE_FORMATS: &[&str] = &["%d/%m/%Y", "%d/%m/%y", "%Y-%m-%d", "%d-%m-%Y"];

/// Parse a currency cell, stripping `$`, spaces, and thousands-separator
/// commas. Blank cells are zero; unparseable cells default to zero with the
/// `was_defaulted` flag set.
pub fn parse_amount(cell: &Data) -> CoercedAmount {
    match cell {
        Data::Int(i) => CoercedAmount::parsed(Decimal::from(*i)),
        Data::Float(f) => Decimal::from_f64(*f)
            .map(CoercedAmount::parsed)
            .unwrap_or_else(CoercedAmount::defaulted),
        Data::Empty => CoercedAmount::parsed(Decimal::ZERO),
        other => parse_amount_text(&cell_text(other)),
    }
}

/// Text half of [`parse_amount`].
pub fn parse_amount_text(raw: &str) -> CoercedAmount {
    let cleaned: String = raw
        .chars()
        .filter(|c| !matches!(c, '$' | ' ' | ','))
        .collect();

    if cleaned.is_empty() {
        return CoercedAmount::parsed(Decimal::ZERO);
    }

    match Decimal::from_str(&cleaned) {
        Ok(value) => CoercedAmount::parsed(value),
        Err(_) => CoercedAmount::defaulted(),
    }
}

/// Parse a date cell. Native date/datetime cells are used directly; text
/// cells drop any time-of-day suffix and are tried against the calendar
/// formats.
pub fn parse_date(cell: &Data) -> Result<NaiveDate, String> {
    match cell {
        Data::DateTime(dt) => dt
            .as_datetime()
            .map(|ndt| ndt.date())
            .ok_or_else(|| format!("invalid date serial: {:?}", dt)),
        other => parse_date_text(&cell_text(other)),
    }
}

/// Parse a calendar date from text, taking only the substring before the
/// first space (or ISO `T`) so datetime strings reduce to their day part.
pub fn parse_date_text(raw: &str) -> Result<NaiveDate, String> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Err("empty date cell".to_string());
    }

    let day_part = trimmed.split([' ', 'T']).next().unwrap_or(trimmed);
    for format in DATE_FORMATS {
        if let Ok(date) = NaiveDate::parse_from_str(day_part, format) {
            return Ok(date);
        }
    }

    Err(format!("unparseable date: {}", trimmed))
}

/// Parse a signed integer quantity. Whole floats are accepted (spreadsheets
/// store integers as floats); anything else is a row-scoped error.
pub fn parse_quantity(cell: &Data) -> Result<i32, String> {
    match cell {
        Data::Int(i) => {
            i32::try_from(*i).map_err(|_| format!("quantity out of range: {}", i))
        }
        Data::Float(f) => {
            if f.fract() == 0.0 && f.abs() <= f64::from(i32::MAX) {
                Ok(*f as i32)
            } else {
                Err(format!("non-integer quantity: {}", f))
            }
        }
        other => {
            let text = cell_text(other);
            if text.is_empty() {
                return Err("empty quantity cell".to_string());
            }
            text.parse::<i32>()
                .map_err(|_| format!("unparseable quantity: {}", text))
        }
    }
}
