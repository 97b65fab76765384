//! Remote chart strategy (image-charts.com line chart).

use nightscout_core::{SeriesReport, UnitConfig};
use serde_json::{json, Value};
use url::form_urlencoded;

use crate::{templates, LayoutStrategy};

pub const CHART_ENDPOINT: &str = "https://image-charts.com/chart";

/// Only every n-th point gets an x-axis label.
pub const LABEL_EVERY: usize = 6;

const LINE_COLOR: &str = "3498DB";
const HIGH_COLOR: &str = "FF0000";
const LOW_COLOR: &str = "00FF00";
const MARKER_HALF_WIDTH: f64 = 0.005;

#[derive(Debug, Clone, Copy, Default)]
pub struct ChartLayout;

impl LayoutStrategy for ChartLayout {
    fn document(&self) -> Value {
        templates::chart_document()
    }

    fn payload(&self, report: &SeriesReport) -> Value {
        json!({
            "graphUrl": chart_url(report),
            "timestamp": report.summary.last_updated,
        })
    }
}

/// Build the chart URL for the whole series in display units.
pub fn chart_url(report: &SeriesReport) -> String {
    let unit = report.units.unit;
    let values: Vec<String> = report
        .chart
        .iter()
        .map(|point| unit.format_number(point.value))
        .collect();
    let labels: Vec<&str> = report
        .chart
        .iter()
        .enumerate()
        .map(|(index, point)| {
            if index % LABEL_EVERY == 0 {
                point.clock.as_str()
            } else {
                ""
            }
        })
        .collect();
    let (axis_min, axis_max) = report.units.chart_axis();

    let markers = [
        format!("o,{LINE_COLOR},0,-1,5"),
        threshold_marker(HIGH_COLOR, report.units.target_high, &report.units),
        threshold_marker(LOW_COLOR, report.units.target_low, &report.units),
    ];

    let query = form_urlencoded::Serializer::new(String::new())
        .append_pair("cht", "lc")
        .append_pair("chs", "800x450")
        .append_pair("chd", &format!("t:{}", values.join(",")))
        .append_pair("chxt", "x,y")
        .append_pair("chxl", &format!("0:|{}", labels.join("|")))
        .append_pair(
            "chxr",
            &format!(
                "1,{},{}",
                unit.format_number(axis_min),
                unit.format_number(axis_max)
            ),
        )
        .append_pair(
            "chds",
            &format!(
                "{},{}",
                unit.format_number(axis_min),
                unit.format_number(axis_max)
            ),
        )
        .append_pair("chg", "0,12.5,1,4")
        .append_pair("chco", LINE_COLOR)
        .append_pair("chls", "3")
        .append_pair("chm", &markers.join("|"))
        .finish();

    format!("{CHART_ENDPOINT}?{query}")
}

/// Thin horizontal band at `bound`, positioned as a fraction of the y axis.
fn threshold_marker(color: &str, bound: f64, units: &UnitConfig) -> String {
    let (axis_min, axis_max) = units.chart_axis();
    let position = (bound - axis_min) / (axis_max - axis_min);
    format!(
        "r,{color},0,{:.3},{:.3}",
        position - MARKER_HALF_WIDTH,
        position + MARKER_HALF_WIDTH
    )
}
