//! Phân loại xu hướng từ các lần đo liên tiếp.

use serde::{Deserialize, Serialize};

use crate::{Measurement, UnitConfig};

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum TrendCategory {
    Rising,
    Falling,
    Stable,
    SingleReading,
}

impl TrendCategory {
    pub fn icon(self) -> &'static str {
        match self {
            Self::Rising => "↑",
            Self::Falling => "↓",
            Self::Stable => "→",
            Self::SingleReading => "•",
        }
    }

    pub fn text(self) -> &'static str {
        match self {
            Self::Rising => "Rising",
            Self::Falling => "Falling",
            Self::Stable => "Stable",
            Self::SingleReading => "Single reading",
        }
    }

    fn from_delta(delta: f64, threshold: f64) -> Self {
        if delta > threshold {
            Self::Rising
        } else if delta < -threshold {
            Self::Falling
        } else {
            Self::Stable
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct TrendResult {
    pub category: TrendCategory,
    /// Chênh lệch giữa hai lần đo cuối (đơn vị hiển thị).
    pub delta: Option<f64>,
}

/// Xu hướng tổng dựa trên hai lần đo cuối của chuỗi.
pub fn summary_trend(series: &[Measurement], units: &UnitConfig) -> TrendResult {
    let [.., previous, current] = series else {
        return TrendResult {
            category: TrendCategory::SingleReading,
            delta: None,
        };
    };

    let delta = display_delta(previous, current, units);
    TrendResult {
        category: TrendCategory::from_delta(delta, units.summary_threshold()),
        delta: Some(delta),
    }
}

/// Mũi tên xu hướng cho dòng tại `index` của chuỗi đầy đủ.
///
/// Lần đo liền trước luôn lấy từ chuỗi chưa cắt, nên việc thu hẹp cửa sổ
/// hiển thị không đổi kết quả. Dòng đầu tiên không có mũi tên.
pub fn row_trend_arrow(series: &[Measurement], index: usize, units: &UnitConfig) -> &'static str {
    let Some(previous_index) = index.checked_sub(1) else {
        return "";
    };
    let (Some(previous), Some(current)) = (series.get(previous_index), series.get(index)) else {
        return "";
    };

    let delta = display_delta(previous, current, units);
    TrendCategory::from_delta(delta, units.row_threshold()).icon()
}

fn display_delta(previous: &Measurement, current: &Measurement, units: &UnitConfig) -> f64 {
    let unit = units.unit;
    unit.round_delta(unit.to_display(current.value) - unit.to_display(previous.value))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::GlucoseUnit;

    fn readings(values: &[i32]) -> Vec<Measurement> {
        values.iter().map(|v| Measurement::new(*v, None)).collect()
    }

    #[test]
    fn rising_when_difference_exceeds_threshold() {
        let series = readings(&[100, 110]);
        let trend = summary_trend(&series, &UnitConfig::default());
        assert_eq!(trend.category, TrendCategory::Rising);
        assert_eq!(trend.delta, Some(10.0));
    }

    #[test]
    fn equal_values_are_stable() {
        for unit in [GlucoseUnit::MgDl, GlucoseUnit::MmolL] {
            let units = UnitConfig::for_unit(unit);
            let trend = summary_trend(&readings(&[140, 140]), &units);
            assert_eq!(trend.category, TrendCategory::Stable);
        }
    }

    #[test]
    fn threshold_itself_is_stable() {
        let units = UnitConfig::default();
        assert_eq!(
            summary_trend(&readings(&[100, 105]), &units).category,
            TrendCategory::Stable
        );
        assert_eq!(
            summary_trend(&readings(&[100, 94]), &units).category,
            TrendCategory::Falling
        );
    }

    #[test]
    fn single_reading_has_no_delta() {
        let trend = summary_trend(&readings(&[100]), &UnitConfig::default());
        assert_eq!(trend.category, TrendCategory::SingleReading);
        assert_eq!(trend.delta, None);
    }

    #[test]
    fn row_threshold_is_tighter_than_summary() {
        let units = UnitConfig::default();
        let series = readings(&[100, 105]);
        assert_eq!(summary_trend(&series, &units).category, TrendCategory::Stable);
        assert_eq!(row_trend_arrow(&series, 1, &units), "↑");
    }

    #[test]
    fn converted_unit_uses_converted_thresholds() {
        let units = UnitConfig::for_unit(GlucoseUnit::MmolL);
        // 90 -> 5.0, 95 -> 5.3: delta 0.3 is not above 0.3
        let series = readings(&[90, 95]);
        assert_eq!(summary_trend(&series, &units).category, TrendCategory::Stable);
        assert_eq!(row_trend_arrow(&series, 1, &units), "↑");
    }

    #[test]
    fn first_row_has_no_arrow() {
        let series = readings(&[100, 150]);
        assert_eq!(row_trend_arrow(&series, 0, &UnitConfig::default()), "");
    }
}
