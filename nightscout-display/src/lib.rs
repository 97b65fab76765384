//! Dựng phần trình bày cho thiết bị: câu nói và tài liệu APL.
//!
//! Một bộ dựng duy nhất nhận mọi biến thể [`PresentationResult`]. Phần hiển
//! thị số liệu có hai chiến lược thay thế nhau: bảng dòng và ảnh biểu đồ.

use std::fmt;
use std::str::FromStr;

use nightscout_core::{PresentationResult, SeriesReport, TrendCategory, UNKNOWN_TIME};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

mod chart;
mod rows;
pub mod templates;

pub use chart::{chart_url, ChartLayout, CHART_ENDPOINT, LABEL_EVERY};
pub use rows::{RowsLayout, NO_DATA_TEXT};

pub const RENDER_DOCUMENT: &str = "Alexa.Presentation.APL.RenderDocument";
pub const DOCUMENT_TOKEN: &str = "nightscoutGlucose";

/// Chiến lược dựng layout cho một báo cáo có số liệu.
pub trait LayoutStrategy: Send + Sync {
    fn document(&self) -> Value;
    fn payload(&self, report: &SeriesReport) -> Value;
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
pub enum DisplayMode {
    #[default]
    Rows,
    Chart,
}

impl FromStr for DisplayMode {
    type Err = DisplayError;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        match raw.trim().to_lowercase().as_str() {
            "rows" | "table" => Ok(Self::Rows),
            "chart" | "graph" => Ok(Self::Chart),
            other => Err(DisplayError::UnknownMode(other.to_string())),
        }
    }
}

impl fmt::Display for DisplayMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Rows => f.write_str("rows"),
            Self::Chart => f.write_str("chart"),
        }
    }
}

#[derive(Debug, thiserror::Error, PartialEq)]
pub enum DisplayError {
    #[error("Chế độ hiển thị không hỗ trợ: {0}")]
    UnknownMode(String),
}

/// Câu nói và chỉ thị layout cho một kết quả.
#[derive(Debug, Clone, PartialEq)]
pub struct Presentation {
    pub speech: String,
    pub directive: Value,
}

#[derive(Debug, Clone, Copy, Default)]
pub struct PresentationBuilder {
    mode: DisplayMode,
}

impl PresentationBuilder {
    pub fn new(mode: DisplayMode) -> Self {
        Self { mode }
    }

    pub fn mode(&self) -> DisplayMode {
        self.mode
    }

    fn strategy(&self) -> &'static dyn LayoutStrategy {
        match self.mode {
            DisplayMode::Rows => &RowsLayout,
            DisplayMode::Chart => &ChartLayout,
        }
    }

    pub fn render(&self, result: &PresentationResult) -> Presentation {
        Presentation {
            speech: self.speech(result),
            directive: self.directive(result),
        }
    }

    /// Chỉ thị `RenderDocument`; các trạng thái lỗi dùng mẫu dạng dòng.
    pub fn directive(&self, result: &PresentationResult) -> Value {
        let (document, payload) = match result {
            PresentationResult::Display(report) => {
                let strategy = self.strategy();
                (strategy.document(), strategy.payload(report))
            }
            other => (templates::rows_document(), rows::status_payload(other)),
        };

        json!({
            "type": RENDER_DOCUMENT,
            "token": DOCUMENT_TOKEN,
            "document": document,
            "datasources": { "payload": payload },
        })
    }

    pub fn speech(&self, result: &PresentationResult) -> String {
        match result {
            PresentationResult::Display(report) => report_speech(report),
            PresentationResult::ConfigError { .. } => {
                "Your Nightscout connection is not configured yet. Please set your Nightscout \
                 address and API secret in the skill settings."
                    .to_string()
            }
            PresentationResult::FetchError { .. } => {
                "Sorry, I had trouble connecting to your Nightscout site. Please check that the \
                 site is online and that your API secret is correct."
                    .to_string()
            }
            PresentationResult::EmptySeries => {
                "No recent readings were found in your Nightscout site.".to_string()
            }
            PresentationResult::InternalError => {
                "Sorry, I encountered an error. Please try again.".to_string()
            }
        }
    }
}

fn report_speech(report: &SeriesReport) -> String {
    let summary = &report.summary;
    let trend = match summary.trend.category {
        TrendCategory::Rising => "and rising",
        TrendCategory::Falling => "and falling",
        TrendCategory::Stable => "and stable",
        TrendCategory::SingleReading => "from a single recent reading",
    };

    let mut speech = format!("Your latest reading is {} {trend}.", summary.latest_value);
    if let Some(direction) = summary.direction {
        speech.push_str(&format!(" Your sensor reports {}.", direction.phrase()));
    }
    if summary.last_updated != UNKNOWN_TIME {
        speech.push_str(&format!(" Last updated at {}.", summary.last_updated));
    }
    speech
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use chrono::{Duration, TimeZone, Utc};
    use nightscout_core::{
        analyze_series, parse_timezone, DirectionHint, GlucoseUnit, Measurement, Series,
        UnitConfig,
    };

    /// Readings five minutes apart from 12:00 UTC.
    pub(crate) fn report_for(values: &[i32], unit: GlucoseUnit) -> SeriesReport {
        let start = Utc.with_ymd_and_hms(2024, 5, 1, 12, 0, 0).unwrap();
        let series = Series::from_ascending(
            values
                .iter()
                .enumerate()
                .map(|(i, v)| Measurement::new(*v, Some(start + Duration::minutes(5 * i as i64))))
                .collect(),
        );
        let tz = parse_timezone("UTC").unwrap();
        match analyze_series(&series, &UnitConfig::for_unit(unit), tz) {
            PresentationResult::Display(report) => report,
            other => panic!("Cần kết quả hiển thị, nhận được {other:?}"),
        }
    }

    #[test]
    fn display_speech_mentions_value_trend_and_time() {
        let builder = PresentationBuilder::default();
        let result = PresentationResult::Display(report_for(&[100, 110], GlucoseUnit::MgDl));
        assert_eq!(
            builder.speech(&result),
            "Your latest reading is 110 mg/dL and rising. Last updated at 12:05 PM UTC."
        );
    }

    #[test]
    fn speech_includes_sensor_direction_when_known() {
        let mut report = report_for(&[90], GlucoseUnit::MmolL);
        report.summary.direction = Some(DirectionHint::FortyFiveDown);
        let speech = PresentationBuilder::default().speech(&PresentationResult::Display(report));
        assert!(speech.starts_with("Your latest reading is 5.0 mmol/L from a single recent reading."));
        assert!(speech.contains("Your sensor reports falling slightly."));
    }

    #[test]
    fn empty_series_renders_no_data_everywhere() {
        let presentation = PresentationBuilder::new(DisplayMode::Chart)
            .render(&PresentationResult::EmptySeries);
        assert!(presentation.speech.contains("No recent"));
        let payload = &presentation.directive["datasources"]["payload"];
        assert_eq!(payload["rows"][0]["value"], NO_DATA_TEXT);
    }

    #[test]
    fn strategy_follows_mode() {
        let report = PresentationResult::Display(report_for(&[100, 104], GlucoseUnit::MgDl));

        let rows = PresentationBuilder::new(DisplayMode::Rows).directive(&report);
        assert_eq!(rows["type"], RENDER_DOCUMENT);
        assert!(rows["datasources"]["payload"]["rows"].is_array());

        let chart = PresentationBuilder::new(DisplayMode::Chart).directive(&report);
        assert!(chart["datasources"]["payload"]["graphUrl"]
            .as_str()
            .unwrap()
            .starts_with(CHART_ENDPOINT));
        assert_eq!(chart["document"]["mainTemplate"]["items"][0]["items"][0]["type"], "Image");
    }

    #[test]
    fn every_result_has_speech_and_directive() {
        let builder = PresentationBuilder::default();
        let results = [
            PresentationResult::Display(report_for(&[120], GlucoseUnit::MgDl)),
            PresentationResult::ConfigError { problems: vec![] },
            PresentationResult::FetchError {
                detail: "Nightscout returned status 401".to_string(),
            },
            PresentationResult::EmptySeries,
            PresentationResult::InternalError,
        ];
        for result in &results {
            let presentation = builder.render(result);
            assert!(!presentation.speech.is_empty());
            assert_eq!(presentation.directive["token"], DOCUMENT_TOKEN);
            assert!(presentation.directive["document"].is_object());
        }
    }

    #[test]
    fn parses_display_modes() {
        assert_eq!("Chart".parse::<DisplayMode>(), Ok(DisplayMode::Chart));
        assert_eq!("rows".parse::<DisplayMode>(), Ok(DisplayMode::Rows));
        assert!("hologram".parse::<DisplayMode>().is_err());
    }
}
