use crate::error::{DashError, Result};

/// Decimal (SI) unit table. The service bills and reports in base 1000.
const UNITS: [&str; 5] = ["B", "KB", "MB", "GB", "TB"];
const STEP: u64 = 1000;

/// Format a byte count as a human-readable string (e.g. `"1.50 MB"`).
///
/// Plain bytes are printed as an integer, every larger unit with exactly
/// two decimals. Anything past the last unit stays in TB.
pub fn format_bytes(bytes: u64) -> String {
    if bytes == 0 {
        return "0 B".to_string();
    }

    let mut unit  = 0;
    let mut scale = 1u64;
    while unit < UNITS.len() - 1 && bytes / scale >= STEP {
        scale *= STEP;
        unit  += 1;
    }

    if unit == 0 {
        format!("{bytes} B")
    } else {
        format!("{:.2} {}", bytes as f64 / scale as f64, UNITS[unit])
    }
}

/// Same as [`format_bytes`] for fractional magnitudes (averages, rates).
///
/// Negative and non-finite values are rejected.
pub fn try_format_bytes(value: f64) -> Result<String> {
    if !value.is_finite() || value < 0.0 {
        return Err(DashError::Format(format!(
            "cannot format {value} as a byte count"
        )));
    }
    if value == 0.0 {
        return Ok("0 B".to_string());
    }

    let mut unit = 0;
    let mut size = value;
    while unit < UNITS.len() - 1 && size >= STEP as f64 {
        size /= STEP as f64;
        unit += 1;
    }

    if unit == 0 {
        Ok(format!("{} B", size.round() as u64))
    } else {
        Ok(format!("{size:.2} {}", UNITS[unit]))
    }
}

/// Format a bytes-per-second rate, e.g. `"1.50 MB/s"`.
pub fn format_speed(bytes_per_sec: f64) -> String {
    match try_format_bytes(bytes_per_sec) {
        Ok(s) => format!("{s}/s"),
        Err(_) => "0 B/s".to_string(),
    }
}

/// `part` as a one-decimal percentage of `whole`; `None` when `whole` is 0.
pub fn format_percent(part: u64, whole: u64) -> Option<String> {
    if whole == 0 {
        return None;
    }
    Some(format!("{:.1}%", part as f64 * 100.0 / whole as f64))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn format_bytes_zero() {
        assert_eq!(format_bytes(0), "0 B");
    }

    #[test]
    fn format_bytes_plain_bytes_have_no_decimals() {
        assert_eq!(format_bytes(1), "1 B");
        assert_eq!(format_bytes(999), "999 B");
    }

    #[test]
    fn format_bytes_is_decimal_not_binary() {
        assert_eq!(format_bytes(1000), "1.00 KB");
        assert_eq!(format_bytes(1024), "1.02 KB");
        assert_eq!(format_bytes(1_500_000), "1.50 MB");
        assert_eq!(format_bytes(7_250_000_000), "7.25 GB");
    }

    #[test]
    fn format_bytes_clamps_to_terabytes() {
        assert_eq!(format_bytes(2_000_000_000_000), "2.00 TB");
        assert_eq!(format_bytes(5_000_000_000_000_000), "5000.00 TB");
    }

    #[test]
    fn try_format_bytes_matches_integer_path() {
        assert_eq!(try_format_bytes(0.0).unwrap(), "0 B");
        assert_eq!(try_format_bytes(999.0).unwrap(), "999 B");
        assert_eq!(try_format_bytes(1000.0).unwrap(), "1.00 KB");
        assert_eq!(try_format_bytes(1_500_000.0).unwrap(), "1.50 MB");
    }

    #[test]
    fn try_format_bytes_rounds_fractional_bytes() {
        assert_eq!(try_format_bytes(333.4).unwrap(), "333 B");
        assert_eq!(try_format_bytes(0.4).unwrap(), "0 B");
    }

    #[test]
    fn try_format_bytes_rejects_negative_and_nan() {
        assert!(matches!(try_format_bytes(-1.0), Err(DashError::Format(_))));
        assert!(try_format_bytes(f64::NAN).is_err());
        assert!(try_format_bytes(f64::INFINITY).is_err());
    }

    #[test]
    fn format_speed_appends_per_second() {
        assert_eq!(format_speed(2_500.0), "2.50 KB/s");
        assert_eq!(format_speed(-5.0), "0 B/s");
    }

    #[test]
    fn format_percent_one_decimal() {
        assert_eq!(format_percent(1, 3).as_deref(), Some("33.3%"));
        assert_eq!(format_percent(0, 0), None);
    }
}
