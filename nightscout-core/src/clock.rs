//! Định dạng giờ 12h kiểu Anh-Mỹ kèm viết tắt múi giờ.

use chrono::{DateTime, Utc};
use chrono_tz::Tz;

use crate::GlucoseError;

/// Hiển thị khi thời điểm không xác định.
pub const UNKNOWN_TIME: &str = "Unknown";

pub fn parse_timezone(name: &str) -> Result<Tz, GlucoseError> {
    name.trim()
        .parse::<Tz>()
        .map_err(|_| GlucoseError::UnknownTimezone(name.to_string()))
}

/// `"H:MM AM/PM TZ"`; viết tắt phụ thuộc thời điểm (EST/EDT...).
pub fn format_clock(at: Option<DateTime<Utc>>, tz: Tz) -> String {
    match at {
        Some(at) => at.with_timezone(&tz).format("%-I:%M %p %Z").to_string(),
        None => UNKNOWN_TIME.to_string(),
    }
}

/// Nhãn trục biểu đồ, không kèm múi giờ.
pub fn format_clock_label(at: Option<DateTime<Utc>>, tz: Tz) -> String {
    at.map(|at| at.with_timezone(&tz).format("%-I:%M %p").to_string())
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn abbreviation_follows_daylight_saving() {
        let tz = parse_timezone("America/New_York").unwrap();
        let summer = Utc.with_ymd_and_hms(2024, 7, 1, 19, 5, 0).single();
        let winter = Utc.with_ymd_and_hms(2024, 1, 15, 19, 5, 0).single();

        assert_eq!(format_clock(summer, tz), "3:05 PM EDT");
        assert_eq!(format_clock(winter, tz), "2:05 PM EST");
    }

    #[test]
    fn missing_instant_is_unknown() {
        assert_eq!(format_clock(None, Tz::UTC), "Unknown");
        assert_eq!(format_clock_label(None, Tz::UTC), "");
    }

    #[test]
    fn utc_label_without_zone() {
        let at = Utc.with_ymd_and_hms(2024, 5, 1, 0, 30, 0).single();
        assert_eq!(format_clock(at, Tz::UTC), "12:30 AM UTC");
        assert_eq!(format_clock_label(at, Tz::UTC), "12:30 AM");
    }

    #[test]
    fn rejects_unknown_zone() {
        assert_eq!(
            parse_timezone("Mars/Olympus"),
            Err(GlucoseError::UnknownTimezone("Mars/Olympus".to_string()))
        );
    }
}
