//! Phân tích chuỗi đo thành bản tóm tắt, các dòng hiển thị và điểm biểu đồ.

use chrono_tz::Tz;

use crate::{
    classify_range, format_clock, format_clock_label, row_trend_arrow, summary_trend, ChartPoint,
    Measurement, PresentationResult, PresentationSummary, RowRecord, Series, SeriesReport,
    UnitConfig, UNKNOWN_TIME,
};

/// Số lần đo gần nhất hiển thị dạng dòng.
pub const ROW_WINDOW: usize = 6;

/// Chuỗi rỗng là trạng thái kết thúc hợp lệ, không phải lỗi.
pub fn analyze_series(series: &Series, units: &UnitConfig, tz: Tz) -> PresentationResult {
    let readings = series.measurements();
    let Some(latest) = readings.last() else {
        return PresentationResult::EmptySeries;
    };

    let trend = summary_trend(readings, units);
    let summary = PresentationSummary {
        latest_value: units.unit.format_value(latest.value),
        trend_icon: trend.category.icon().to_string(),
        trend_text: trend.category.text().to_string(),
        last_updated: format_clock(latest.recorded_at, tz),
        elapsed_hours: elapsed_hours(readings),
        target_range: units.target_range_text(),
        trend,
        direction: latest.direction,
    };

    PresentationResult::Display(SeriesReport {
        summary,
        rows: build_rows(readings, units, tz),
        chart: readings
            .iter()
            .map(|reading| ChartPoint {
                value: units.unit.to_display(reading.value),
                clock: format_clock_label(reading.recorded_at, tz),
            })
            .collect(),
        units: *units,
    })
}

fn elapsed_hours(readings: &[Measurement]) -> String {
    let first = readings.first().and_then(|m| m.recorded_at);
    let last = readings.last().and_then(|m| m.recorded_at);
    match (first, last) {
        (Some(first), Some(last)) => {
            let millis = last.signed_duration_since(first).num_milliseconds();
            let hours = (millis as f64 / 3_600_000.0).round() as i64;
            format!("{hours}h")
        }
        _ => UNKNOWN_TIME.to_string(),
    }
}

fn build_rows(readings: &[Measurement], units: &UnitConfig, tz: Tz) -> Vec<RowRecord> {
    let start = readings.len().saturating_sub(ROW_WINDOW);
    if readings.len() - start < 2 {
        return vec![RowRecord::insufficient_data()];
    }

    (start..readings.len())
        .rev()
        .map(|index| {
            let reading = &readings[index];
            let display = units.unit.to_display(reading.value);
            let status = classify_range(display, units);
            RowRecord {
                time: format_clock(reading.recorded_at, tz),
                status: Some(status),
                status_icon: status.icon().to_string(),
                value: units.unit.format_value(reading.value),
                trend_arrow: row_trend_arrow(readings, index, units).to_string(),
            }
        })
        .collect()
}
