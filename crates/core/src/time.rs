//! Decimal-seconds parsing and fixed-point rendering.
//!
//! ffprobe reports timestamps as decimal strings (`"5.024000"`) and ffmpeg
//! accepts fixed-point seconds for `-ss`/`-t`. Both directions go through
//! integer microseconds so no binary floating point rounding is involved.

const MICROS_PER_SEC: i64 = 1_000_000;

/// Parses a decimal seconds string into microseconds.
///
/// Digits beyond microsecond precision are truncated toward zero. Returns
/// `None` for anything that is not a plain decimal number.
pub fn parse_decimal_micros(value: &str) -> Option<i64> {
    let value = value.trim();
    let (negative, digits) = match value.as_bytes().first()? {
        b'-' => (true, &value[1..]),
        b'+' => (false, &value[1..]),
        _ => (false, value),
    };

    let (whole, fraction) = match digits.split_once('.') {
        Some((whole, fraction)) => (whole, fraction),
        None => (digits, ""),
    };

    if whole.is_empty() && fraction.is_empty() {
        return None;
    }
    if !whole.bytes().all(|b| b.is_ascii_digit()) || !fraction.bytes().all(|b| b.is_ascii_digit())
    {
        return None;
    }

    let whole_secs: i64 = if whole.is_empty() {
        0
    } else {
        whole.parse().ok()?
    };

    let mut micros: i64 = 0;
    for (i, digit) in fraction.bytes().take(6).enumerate() {
        micros += i64::from(digit - b'0') * 10_i64.pow(5 - i as u32);
    }

    let total = whole_secs.checked_mul(MICROS_PER_SEC)?.checked_add(micros)?;
    Some(if negative { -total } else { total })
}

/// Renders microseconds as fixed-point seconds.
///
/// Trailing zeros are trimmed but at least one fractional digit is kept,
/// so three seconds renders as `3.0`.
pub fn format_seconds(micros: i64) -> String {
    let sign = if micros < 0 { "-" } else { "" };
    let abs = micros.unsigned_abs();
    let whole = abs / MICROS_PER_SEC as u64;
    let fraction = abs % MICROS_PER_SEC as u64;

    let mut fraction = format!("{:06}", fraction);
    while fraction.len() > 1 && fraction.ends_with('0') {
        fraction.pop();
    }

    format!("{}{}.{}", sign, whole, fraction)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_decimal_micros() {
        assert_eq!(parse_decimal_micros("5.024000"), Some(5_024_000));
        assert_eq!(parse_decimal_micros("3"), Some(3_000_000));
        assert_eq!(parse_decimal_micros("3.14"), Some(3_140_000));
        assert_eq!(parse_decimal_micros("-0.007000"), Some(-7_000));
        assert_eq!(parse_decimal_micros(".5"), Some(500_000));
        assert_eq!(parse_decimal_micros("1.0000019"), Some(1_000_001));
    }

    #[test]
    fn test_parse_decimal_micros_rejects_garbage() {
        assert_eq!(parse_decimal_micros(""), None);
        assert_eq!(parse_decimal_micros("-"), None);
        assert_eq!(parse_decimal_micros("."), None);
        assert_eq!(parse_decimal_micros("N/A"), None);
        assert_eq!(parse_decimal_micros("1e3"), None);
        assert_eq!(parse_decimal_micros("1.2.3"), None);
    }

    #[test]
    fn test_format_seconds() {
        assert_eq!(format_seconds(3_000_000), "3.0");
        assert_eq!(format_seconds(3_140_000), "3.14");
        assert_eq!(format_seconds(0), "0.0");
        assert_eq!(format_seconds(1), "0.000001");
        assert_eq!(format_seconds(-7_000), "-0.007");
        assert_eq!(format_seconds(300_000_000), "300.0");
    }
}
