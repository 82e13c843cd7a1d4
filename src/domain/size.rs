/// Bytes per tebibyte
pub const TIB: i64 = 1 << 40;

const DECIMAL_SCALE: i128 = 10_000;

/// Render a byte count as TiB with 4 decimal places.
///
/// The fraction is computed from the integer count and truncated, so the
/// output never rounds a partial tebibyte up.
pub fn to_tib_string(bytes: i64) -> String {
    let abs_value = (bytes as i128).abs();
    let integer_part = abs_value / TIB as i128;
    let decimal_part = (abs_value % TIB as i128) * DECIMAL_SCALE / TIB as i128;

    let sign = if bytes < 0 { "-" } else { "" };
    format!("{}{}.{:04}", sign, integer_part, decimal_part)
}

/// Lossy TiB value for machine-readable output
pub fn to_tib(bytes: i64) -> f64 {
    bytes as f64 / TIB as f64
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn whole_tebibytes() {
        assert_eq!(to_tib_string(0), "0.0000");
        assert_eq!(to_tib_string(TIB), "1.0000");
        assert_eq!(to_tib_string(3 * TIB), "3.0000");
    }

    #[test]
    fn fractional_tebibytes_truncate() {
        assert_eq!(to_tib_string(TIB / 2), "0.5000");
        assert_eq!(to_tib_string(TIB + TIB / 4), "1.2500");
        // 32 GiB sector = 1/32 TiB = 0.03125
        assert_eq!(to_tib_string(32 << 30), "0.0312");
    }

    #[test]
    fn negative_values_keep_sign() {
        assert_eq!(to_tib_string(-TIB / 2), "-0.5000");
    }

    #[test]
    fn max_value_does_not_overflow() {
        assert_eq!(to_tib_string(i64::MAX), "8388607.9999");
    }

    #[test]
    fn float_conversion() {
        assert_eq!(to_tib(2 * TIB), 2.0);
        assert_eq!(to_tib(TIB / 4), 0.25);
    }
}
