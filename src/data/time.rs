// ---------------------------------------------------------------------------
// Timestamp codec: `H:MM:SS.fff` → elapsed seconds
// ---------------------------------------------------------------------------

/// Convert an instrument timestamp such as `00:00:01.455` into seconds.
///
/// Hours are unbounded; minutes and seconds are not range-checked. Hours and
/// minutes must be integers, seconds may carry a fraction. Anything past the
/// third colon-delimited part is ignored.
///
/// Returns `None` when fewer than three parts are present or a part is not
/// numeric. Callers treat `None` as "skip this row".
pub fn parse_time_to_seconds(text: &str) -> Option<f64> {
    let mut parts = text.split(':');
    let hours: i64 = parts.next()?.trim().parse().ok()?;
    let minutes: i64 = parts.next()?.trim().parse().ok()?;
    let seconds: f64 = parts.next()?.trim().parse().ok()?;
    Some(hours as f64 * 3600.0 + minutes as f64 * 60.0 + seconds)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decodes_hours_minutes_fractional_seconds() {
        assert_eq!(parse_time_to_seconds("01:02:03.5"), Some(3723.5));
        assert_eq!(parse_time_to_seconds("00:00:01.455"), Some(1.455));
    }

    #[test]
    fn zero_timestamp_is_zero() {
        assert_eq!(parse_time_to_seconds("00:00:00.000"), Some(0.0));
    }

    #[test]
    fn hours_are_unbounded() {
        assert_eq!(parse_time_to_seconds("100:00:00"), Some(360_000.0));
    }

    #[test]
    fn rejects_malformed_input() {
        assert_eq!(parse_time_to_seconds("bad"), None);
        assert_eq!(parse_time_to_seconds("1:2"), None);
        assert_eq!(parse_time_to_seconds(""), None);
        assert_eq!(parse_time_to_seconds("aa:00:01.0"), None);
        assert_eq!(parse_time_to_seconds("00:1.5:01.0"), None);
        assert_eq!(parse_time_to_seconds("00:00:x"), None);
    }

    #[test]
    fn extra_parts_are_ignored() {
        assert_eq!(parse_time_to_seconds("0:1:2:99"), Some(62.0));
    }
}
