//! Logic lõi phân tích chuỗi đường huyết và dựng dữ liệu trình bày.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

pub mod analyzer;
pub mod clock;
pub mod range;
pub mod trend;
pub mod units;

pub use analyzer::{analyze_series, ROW_WINDOW};
pub use chrono_tz::Tz;
pub use clock::{format_clock, format_clock_label, parse_timezone, UNKNOWN_TIME};
pub use range::{classify_range, RangeStatus};
pub use trend::{row_trend_arrow, summary_trend, TrendCategory, TrendResult};
pub use units::{GlucoseUnit, UnitConfig, MGDL_PER_MMOL};

/// Một lần đo đường huyết từ cảm biến (đơn vị gốc mg/dL).
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Measurement {
    pub value: i32,
    /// `None` khi feed trả về thời điểm không đọc được.
    pub recorded_at: Option<DateTime<Utc>>,
    pub direction: Option<DirectionHint>,
}

impl Measurement {
    pub fn new(value: i32, recorded_at: Option<DateTime<Utc>>) -> Self {
        Self {
            value,
            recorded_at,
            direction: None,
        }
    }

    pub fn with_direction(mut self, direction: Option<DirectionHint>) -> Self {
        self.direction = direction;
        self
    }
}

/// Hướng xu hướng do thiết bị báo về (trường `direction` của Nightscout).
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum DirectionHint {
    DoubleUp,
    SingleUp,
    FortyFiveUp,
    Flat,
    FortyFiveDown,
    SingleDown,
    DoubleDown,
}

impl DirectionHint {
    /// Đọc chuỗi Nightscout. Các giá trị như `NOT COMPUTABLE` không mang hướng.
    pub fn from_nightscout(raw: &str) -> Option<Self> {
        match raw.trim() {
            "DoubleUp" => Some(Self::DoubleUp),
            "SingleUp" => Some(Self::SingleUp),
            "FortyFiveUp" => Some(Self::FortyFiveUp),
            "Flat" => Some(Self::Flat),
            "FortyFiveDown" => Some(Self::FortyFiveDown),
            "SingleDown" => Some(Self::SingleDown),
            "DoubleDown" => Some(Self::DoubleDown),
            _ => None,
        }
    }

    pub fn arrow(self) -> &'static str {
        match self {
            Self::DoubleUp => "⇈",
            Self::SingleUp => "↑",
            Self::FortyFiveUp => "↗",
            Self::Flat => "→",
            Self::FortyFiveDown => "↘",
            Self::SingleDown => "↓",
            Self::DoubleDown => "⇊",
        }
    }

    pub fn phrase(self) -> &'static str {
        match self {
            Self::DoubleUp => "rising quickly",
            Self::SingleUp => "rising",
            Self::FortyFiveUp => "rising slightly",
            Self::Flat => "steady",
            Self::FortyFiveDown => "falling slightly",
            Self::SingleDown => "falling",
            Self::DoubleDown => "falling quickly",
        }
    }
}

/// Chuỗi đo theo thứ tự thời gian tăng dần.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Series {
    measurements: Vec<Measurement>,
}

impl Series {
    /// Feed Nightscout trả về mới nhất trước; đảo đúng một lần tại đây.
    pub fn from_feed(mut entries: Vec<Measurement>) -> Self {
        entries.reverse();
        Self {
            measurements: entries,
        }
    }

    /// Dựng từ dữ liệu đã sắp xếp tăng dần.
    pub fn from_ascending(measurements: Vec<Measurement>) -> Self {
        Self { measurements }
    }

    pub fn measurements(&self) -> &[Measurement] {
        &self.measurements
    }

    pub fn len(&self) -> usize {
        self.measurements.len()
    }

    pub fn is_empty(&self) -> bool {
        self.measurements.is_empty()
    }

    pub fn latest(&self) -> Option<&Measurement> {
        self.measurements.last()
    }
}

/// Các trường tóm tắt hiển thị ở phần đầu màn hình.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PresentationSummary {
    pub latest_value: String,
    pub trend_icon: String,
    pub trend_text: String,
    pub last_updated: String,
    pub elapsed_hours: String,
    pub target_range: String,
    pub trend: TrendResult,
    pub direction: Option<DirectionHint>,
}

/// Một dòng trong bảng các lần đo gần nhất.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct RowRecord {
    pub time: String,
    pub status: Option<RangeStatus>,
    pub status_icon: String,
    pub value: String,
    pub trend_arrow: String,
}

impl RowRecord {
    /// Dòng thay thế khi cửa sổ hiển thị không đủ hai lần đo.
    pub fn insufficient_data() -> Self {
        Self {
            time: "--".to_string(),
            status: None,
            status_icon: "•".to_string(),
            value: "Insufficient data".to_string(),
            trend_arrow: String::new(),
        }
    }

    /// Dòng thông báo dùng cho các trạng thái lỗi/rỗng.
    pub fn message(text: &str) -> Self {
        Self {
            time: "--".to_string(),
            status: None,
            status_icon: "•".to_string(),
            value: text.to_string(),
            trend_arrow: String::new(),
        }
    }
}

/// Một điểm trên biểu đồ (đơn vị hiển thị).
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ChartPoint {
    pub value: f64,
    pub clock: String,
}

/// Kết quả phân tích một chuỗi không rỗng.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SeriesReport {
    pub summary: PresentationSummary,
    pub rows: Vec<RowRecord>,
    pub chart: Vec<ChartPoint>,
    pub units: UnitConfig,
}

/// Mọi kết cục của một lần xử lý yêu cầu; biến thể nào cũng hiển thị được.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum PresentationResult {
    Display(SeriesReport),
    ConfigError { problems: Vec<String> },
    FetchError { detail: String },
    EmptySeries,
    InternalError,
}

impl PresentationResult {
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Display(_) => "display",
            Self::ConfigError { .. } => "config_error",
            Self::FetchError { .. } => "fetch_error",
            Self::EmptySeries => "empty_series",
            Self::InternalError => "internal_error",
        }
    }
}

/// Lỗi chung của phần lõi.
#[derive(Debug, thiserror::Error, PartialEq)]
pub enum GlucoseError {
    #[error("Đơn vị không hỗ trợ: {0}")]
    UnknownUnit(String),
    #[error("Múi giờ không hợp lệ: {0}")]
    UnknownTimezone(String),
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn series_reverses_feed_order_once() {
        let newest = Measurement::new(120, Utc.timestamp_opt(600, 0).single());
        let oldest = Measurement::new(100, Utc.timestamp_opt(0, 0).single());
        let series = Series::from_feed(vec![newest.clone(), oldest.clone()]);

        assert_eq!(series.measurements(), &[oldest, newest.clone()]);
        assert_eq!(series.latest(), Some(&newest));
    }

    #[test]
    fn direction_hint_ignores_non_directional_values() {
        assert_eq!(
            DirectionHint::from_nightscout("FortyFiveUp"),
            Some(DirectionHint::FortyFiveUp)
        );
        assert_eq!(DirectionHint::from_nightscout("NOT COMPUTABLE"), None);
        assert_eq!(DirectionHint::from_nightscout("RATE OUT OF RANGE"), None);
        assert_eq!(DirectionHint::from_nightscout("NONE"), None);
        assert_eq!(DirectionHint::DoubleDown.arrow(), "⇊");
    }

    #[test]
    fn result_is_tagged_by_kind() {
        let value = serde_json::to_value(PresentationResult::FetchError {
            detail: "timeout".to_string(),
        })
        .unwrap();
        assert_eq!(value["kind"], "fetch_error");
        assert_eq!(value["detail"], "timeout");
        assert_eq!(PresentationResult::EmptySeries.kind(), "empty_series");
    }
}
