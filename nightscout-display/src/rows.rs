//! Inline rows strategy; also the template every status screen uses.

use nightscout_core::{PresentationResult, RowRecord, SeriesReport};
use serde_json::{json, Value};

use crate::{templates, LayoutStrategy};

pub const NO_DATA_TEXT: &str = "NO DATA AVAILABLE";
const PLACEHOLDER: &str = "--";

#[derive(Debug, Clone, Copy, Default)]
pub struct RowsLayout;

impl LayoutStrategy for RowsLayout {
    fn document(&self) -> Value {
        templates::rows_document()
    }

    fn payload(&self, report: &SeriesReport) -> Value {
        let summary = &report.summary;
        json!({
            "title": "Glucose",
            "latestValue": summary.latest_value,
            "trendIcon": summary.trend_icon,
            "trendText": summary.trend_text,
            "lastUpdated": summary.last_updated,
            "elapsedHours": summary.elapsed_hours,
            "targetRange": summary.target_range,
            "rows": report.rows.iter().map(row_payload).collect::<Vec<_>>(),
        })
    }
}

fn row_payload(row: &RowRecord) -> Value {
    json!({
        "time": row.time,
        "statusIcon": row.status_icon,
        "status": row.status.map(|status| status.label()).unwrap_or(PLACEHOLDER),
        "value": row.value,
        "trend": row.trend_arrow,
    })
}

/// Placeholder payload for every non-display result, same fields as a report.
pub(crate) fn status_payload(result: &PresentationResult) -> Value {
    let (title, headline, lines): (&str, &str, Vec<String>) = match result {
        PresentationResult::Display(_) | PresentationResult::InternalError => (
            "Unexpected Error",
            "Something went wrong",
            vec!["Please try again.".to_string()],
        ),
        PresentationResult::ConfigError { problems } => {
            let mut lines = vec!["Check the skill settings:".to_string()];
            lines.extend(problems.iter().map(|problem| format!("☐ {problem}")));
            ("Configuration Error", "Setup needed", lines)
        }
        PresentationResult::FetchError { detail } => (
            "Connection Failed",
            "Nightscout unreachable",
            vec![
                "Check that your Nightscout site is online.".to_string(),
                "Check that the API secret is correct.".to_string(),
                detail.clone(),
            ],
        ),
        PresentationResult::EmptySeries => (
            "No Readings",
            "No recent data",
            vec![NO_DATA_TEXT.to_string()],
        ),
    };

    json!({
        "title": title,
        "latestValue": PLACEHOLDER,
        "trendIcon": "",
        "trendText": headline,
        "lastUpdated": PLACEHOLDER,
        "elapsedHours": PLACEHOLDER,
        "targetRange": PLACEHOLDER,
        "rows": lines
            .iter()
            .map(|line| row_payload(&RowRecord::message(line)))
            .collect::<Vec<_>>(),
    })
}
