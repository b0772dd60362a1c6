use anyhow::{bail, Result};

use crate::model::Mark;

/// Numeric value of a mark, or None for "did not mark".
///
/// Unparseable text is not an error for scoring purposes; it ranks the same
/// as a missing mark.
pub fn parse_mark(mark: &Mark) -> Option<f64> {
    match mark {
        Mark::Value(v) if v.is_finite() => Some(*v),
        Mark::Value(_) => None,
        Mark::Text(s) => parse_mark_str(s).ok(),
    }
}

/// Parse a mark string as printed on a results sheet.
///
/// Accepted forms:
/// - "1:52.34" or "1:02:03.5" (clock time, converted to seconds)
/// - "7.45m", "21ft" (unit suffixes stripped)
/// - "10.92" (plain number)
pub fn parse_mark_str(s: &str) -> Result<f64> {
    let s = s.trim().to_ascii_lowercase();
    if s.is_empty() {
        bail!("Empty mark");
    }

    let value = if s.contains(':') {
        let mut seconds = 0.0;
        for part in s.split(':') {
            let part: f64 = part.trim().parse()?;
            seconds = seconds * 60.0 + part;
        }
        seconds
    } else if s.contains('m') || s.contains("ft") || s.contains("&frac") {
        let numeric: String = s
            .chars()
            .filter(|c| c.is_ascii_digit() || *c == '.' || *c == '-')
            .collect();
        numeric.parse()?
    } else {
        s.parse()?
    };

    if !value.is_finite() {
        bail!("Mark is not a finite number: {}", s);
    }
    Ok(value)
}
