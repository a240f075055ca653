//! Human-readable formatting helpers.

const UNITS: [&str; 4] = ["Bytes", "KB", "MB", "GB"];

/// Format a byte count using base-1024 units.
///
/// Picks the largest unit whose scaled value is at least 1 (capped at GB), rounds
/// to two decimals and drops trailing zeros, so `1536` becomes `"1.5 KB"` and
/// `1048576` becomes `"1 MB"`.
pub fn format_file_size(bytes: u64) -> String {
    if bytes == 0 {
        return "0 Bytes".to_string();
    }

    let mut exponent = 0usize;
    while exponent + 1 < UNITS.len() && bytes >= 1u64 << (10 * (exponent as u32 + 1)) {
        exponent += 1;
    }

    let scaled = bytes as f64 / (1u64 << (10 * exponent as u32)) as f64;
    format!("{} {}", trim_decimals(scaled), UNITS[exponent])
}

fn trim_decimals(value: f64) -> String {
    let fixed = format!("{:.2}", value);
    if fixed.contains('.') {
        fixed.trim_end_matches('0').trim_end_matches('.').to_string()
    } else {
        fixed
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn zero_bytes() {
        assert_eq!(format_file_size(0), "0 Bytes");
    }

    #[test]
    fn fractional_kilobytes() {
        assert_eq!(format_file_size(1536), "1.5 KB");
        assert_eq!(format_file_size(1126), "1.1 KB");
    }

    #[test]
    fn whole_units_drop_decimals() {
        assert_eq!(format_file_size(1024), "1 KB");
        assert_eq!(format_file_size(1_048_576), "1 MB");
        assert_eq!(format_file_size(1_073_741_824), "1 GB");
    }

    #[test]
    fn below_one_kilobyte_stays_in_bytes() {
        assert_eq!(format_file_size(1), "1 Bytes");
        assert_eq!(format_file_size(1023), "1023 Bytes");
    }

    #[test]
    fn terabytes_are_expressed_in_gigabytes() {
        assert_eq!(format_file_size(1u64 << 40), "1024 GB");
    }

    #[test]
    fn rounds_to_two_decimals() {
        // 1.23456 MB
        assert_eq!(format_file_size(1_294_538), "1.23 MB");
    }
}
