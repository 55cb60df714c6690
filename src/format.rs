//! Field formatting for card text.
//!
//! Every function here is pure and total: malformed input degrades to a
//! placeholder string instead of failing the member.
//!
//! ## Date serials
//!
//! Spreadsheets store dates as a day count where serial `25569` is
//! 1970-01-01 (so serial `0` is 1899-12-30). Serials are converted to whole
//! seconds since the Unix epoch and truncated to the calendar day:
//!
//! ```text
//! 45658      → 01/01/2025
//! 45658.75   → 01/01/2025
//! "3/4/1990" → 3/4/1990   (text is trusted verbatim)
//! ```

use crate::types::CellValue;
use chrono::DateTime;

/// Placeholder for fields the member list left blank.
pub const NOT_INFORMED: &str = "not informed";

/// Serial number of 1970-01-01 in the spreadsheet date system.
const UNIX_EPOCH_SERIAL: f64 = 25569.0;
const SECONDS_PER_DAY: f64 = 86_400.0;

/// Display format for converted serials (day/month/year).
const DATE_FORMAT: &str = "%d/%m/%Y";

/// Format a date cell for display.
///
/// - absent, blank, or serial `0` → [`NOT_INFORMED`]
/// - text → returned verbatim (already formatted upstream)
/// - number → spreadsheet serial rendered as `DD/MM/YYYY`
pub fn format_date(value: Option<&CellValue>) -> String {
    match value {
        None => NOT_INFORMED.to_string(),
        Some(v) if is_unset(v) => NOT_INFORMED.to_string(),
        Some(CellValue::Text(s)) => s.clone(),
        Some(CellValue::Number(serial)) => {
            serial_to_date(*serial).unwrap_or_else(|| NOT_INFORMED.to_string())
        }
    }
}

/// Format the validity date, falling back to `fallback` when the cell is
/// absent or cannot be turned into a date.
pub fn format_valid_until(value: Option<&CellValue>, fallback: &str) -> String {
    match value {
        None => fallback.to_string(),
        Some(v) if is_unset(v) => fallback.to_string(),
        Some(CellValue::Text(s)) => s.clone(),
        Some(CellValue::Number(serial)) => {
            serial_to_date(*serial).unwrap_or_else(|| fallback.to_string())
        }
    }
}

/// Blank cells and a zero number both mean the column was left empty.
fn is_unset(value: &CellValue) -> bool {
    match value {
        CellValue::Number(n) => *n == 0.0,
        CellValue::Text(_) => value.is_empty(),
    }
}

fn serial_to_date(serial: f64) -> Option<String> {
    if !serial.is_finite() {
        return None;
    }
    let seconds = ((serial - UNIX_EPOCH_SERIAL) * SECONDS_PER_DAY).floor();
    if seconds < i64::MIN as f64 || seconds > i64::MAX as f64 {
        return None;
    }
    let instant = DateTime::from_timestamp(seconds as i64, 0)?;
    Some(instant.date_naive().format(DATE_FORMAT).to_string())
}

/// Format a tax ID as `NNN.NNN.NNN-NN`.
///
/// The digit string is left-padded with zeros to 11 characters first, which
/// restores leading zeros lost by numeric spreadsheet columns. Input that
/// does not start with 11 digits after padding is returned padded but
/// otherwise untouched.
pub fn format_tax_id(value: Option<&CellValue>) -> String {
    let raw = match value {
        None => return NOT_INFORMED.to_string(),
        Some(v) if is_unset(v) => return NOT_INFORMED.to_string(),
        Some(CellValue::Text(s)) => s.trim().to_string(),
        Some(CellValue::Number(n)) if n.is_finite() => format!("{:.0}", n.trunc()),
        Some(CellValue::Number(_)) => return NOT_INFORMED.to_string(),
    };

    let padded = format!("{raw:0>11}");
    let head = match padded.get(..11) {
        Some(h) if h.bytes().all(|b| b.is_ascii_digit()) => h,
        _ => return padded,
    };
    let rest = &padded[11..];
    format!(
        "{}.{}.{}-{}{}",
        &head[..3],
        &head[3..6],
        &head[6..9],
        &head[9..11],
        rest
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    fn text(s: &str) -> CellValue {
        CellValue::from(s)
    }

    #[test]
    fn date_absent_is_not_informed() {
        assert_eq!(format_date(None), "not informed");
        assert_eq!(format_date(Some(&text(""))), "not informed");
    }

    #[test]
    fn date_text_is_verbatim() {
        assert_eq!(format_date(Some(&text("03/04/1990"))), "03/04/1990");
        assert_eq!(format_date(Some(&text("sometime"))), "sometime");
    }

    #[test]
    fn date_serial_converts_to_day_month_year() {
        assert_eq!(format_date(Some(&CellValue::Number(45658.0))), "01/01/2025");
        assert_eq!(format_date(Some(&CellValue::Number(25569.0))), "01/01/1970");
        assert_eq!(format_date(Some(&CellValue::Number(32874.0))), "01/01/1990");
    }

    #[test]
    fn date_serial_fraction_truncates_to_day() {
        assert_eq!(format_date(Some(&CellValue::Number(45658.99))), "01/01/2025");
    }

    #[test]
    fn date_serial_before_unix_epoch() {
        // serial 0 is 1899-12-30
        assert_eq!(format_date(Some(&CellValue::Number(1.0))), "31/12/1899");
    }

    #[test]
    fn zero_serial_counts_as_blank() {
        let zero = CellValue::Number(0.0);
        assert_eq!(format_date(Some(&zero)), "not informed");
        assert_eq!(format_valid_until(Some(&zero), "31/12/2025"), "31/12/2025");
        assert_eq!(format_tax_id(Some(&zero)), "not informed");
        // Text "0" is a value, not a blank
        assert_eq!(format_date(Some(&text("0"))), "0");
    }

    #[test]
    fn date_serial_non_finite_is_not_informed() {
        assert_eq!(format_date(Some(&CellValue::Number(f64::NAN))), "not informed");
        assert_eq!(
            format_date(Some(&CellValue::Number(f64::INFINITY))),
            "not informed"
        );
    }

    #[test]
    fn valid_until_falls_back() {
        assert_eq!(format_valid_until(None, "31/12/2025"), "31/12/2025");
        assert_eq!(format_valid_until(Some(&text(" ")), "31/12/2025"), "31/12/2025");
        assert_eq!(
            format_valid_until(Some(&CellValue::Number(f64::NAN)), "31/12/2025"),
            "31/12/2025"
        );
        assert_eq!(
            format_valid_until(Some(&CellValue::Number(45658.0)), "31/12/2025"),
            "01/01/2025"
        );
        assert_eq!(
            format_valid_until(Some(&text("30/06/2026")), "31/12/2025"),
            "30/06/2026"
        );
    }

    #[test]
    fn tax_id_formats_eleven_digits() {
        assert_eq!(format_tax_id(Some(&text("12345678901"))), "123.456.789-01");
    }

    #[test]
    fn tax_id_pads_leading_zeros() {
        assert_eq!(format_tax_id(Some(&text("345678901"))), "003.456.789-01");
        assert_eq!(
            format_tax_id(Some(&CellValue::Number(345678901.0))),
            "003.456.789-01"
        );
    }

    #[test]
    fn tax_id_absent_is_not_informed() {
        assert_eq!(format_tax_id(None), "not informed");
        assert_eq!(format_tax_id(Some(&text(""))), "not informed");
    }

    #[test]
    fn tax_id_non_digits_pass_through_padded() {
        assert_eq!(format_tax_id(Some(&text("123.456.789-01"))), "123.456.789-01");
        assert_eq!(format_tax_id(Some(&text("abc"))), "00000000abc");
    }

    #[test]
    fn tax_id_longer_input_keeps_tail() {
        assert_eq!(format_tax_id(Some(&text("1234567890123"))), "123.456.789-0123");
    }
}
