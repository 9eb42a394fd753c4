use chrono::{DateTime, Utc};

/// 将毫秒时间戳格式化为标准时间格式 HH:MM:SS.mmm (UTC)
pub fn format_timestamp(timestamp_ms: i64) -> String {
    match DateTime::<Utc>::from_timestamp_millis(timestamp_ms) {
        Some(time) => time.format("%H:%M:%S%.3f").to_string(),
        None => format!("Invalid timestamp: {}", timestamp_ms),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_timestamp() {
        // 2023-11-14T22:13:20.123Z
        assert_eq!(format_timestamp(1_700_000_000_123), "22:13:20.123");
        assert_eq!(format_timestamp(0), "00:00:00.000");
    }

    #[test]
    fn test_out_of_range_timestamp() {
        assert_eq!(format_timestamp(i64::MAX), format!("Invalid timestamp: {}", i64::MAX));
    }
}
