//! 时间工具函数 - 营业时区
//!
//! Booking days are calendar days in the restaurant's timezone, not UTC.

use chrono::{NaiveDate, Utc};
use chrono_tz::Tz;

use super::{AppError, AppResult};

/// 解析日期字符串 (YYYY-MM-DD)
pub fn parse_date(date: &str) -> AppResult<NaiveDate> {
    NaiveDate::parse_from_str(date, "%Y-%m-%d")
        .map_err(|_| AppError::validation(format!("Invalid date format: {}", date)))
}

/// 解析时区名称，失败回退 UTC
pub fn parse_tz(name: &str) -> Tz {
    name.parse().unwrap_or_else(|_| {
        tracing::warn!("Unknown timezone '{}', falling back to UTC", name);
        Tz::UTC
    })
}

/// Current calendar day in the business timezone
pub fn today(tz: Tz) -> NaiveDate {
    Utc::now().with_timezone(&tz).date_naive()
}

/// Human-readable timestamp stamped on payment records
pub fn display_timestamp(tz: Tz) -> String {
    Utc::now()
        .with_timezone(&tz)
        .format("%Y-%m-%d %H:%M:%S")
        .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_date() {
        assert_eq!(
            parse_date("2024-01-01").unwrap(),
            NaiveDate::from_ymd_opt(2024, 1, 1).unwrap()
        );
        assert!(parse_date("01/01/2024").is_err());
    }

    #[test]
    fn test_parse_tz_falls_back_to_utc() {
        assert_eq!(parse_tz("Europe/Madrid"), chrono_tz::Europe::Madrid);
        assert_eq!(parse_tz("Mars/Olympus"), Tz::UTC);
    }

    #[test]
    fn test_display_timestamp_shape() {
        let ts = display_timestamp(Tz::UTC);
        assert_eq!(ts.len(), 19);
        assert_eq!(&ts[4..5], "-");
        assert_eq!(&ts[10..11], " ");
    }
}
