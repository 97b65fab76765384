//! Quy đổi đơn vị và dải mục tiêu theo đơn vị.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::GlucoseError;

/// mg/dL tương ứng với 1 mmol/L glucose.
pub const MGDL_PER_MMOL: f64 = 18.0;

/// Đơn vị hiển thị.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
pub enum GlucoseUnit {
    #[default]
    MgDl,
    MmolL,
}

impl GlucoseUnit {
    pub fn label(self) -> &'static str {
        match self {
            Self::MgDl => "mg/dL",
            Self::MmolL => "mmol/L",
        }
    }

    /// Giá trị gốc (mg/dL) sang đơn vị hiển thị.
    pub fn to_display(self, raw: i32) -> f64 {
        match self {
            Self::MgDl => f64::from(raw),
            Self::MmolL => round_tenth(f64::from(raw) / MGDL_PER_MMOL),
        }
    }

    /// Định dạng số theo độ chính xác của đơn vị, không kèm nhãn.
    pub fn format_number(self, value: f64) -> String {
        match self {
            Self::MgDl => format!("{value:.0}"),
            Self::MmolL => format!("{value:.1}"),
        }
    }

    pub fn format_value(self, raw: i32) -> String {
        format!("{} {}", self.format_number(self.to_display(raw)), self.label())
    }

    /// Làm tròn hiệu số về độ chính xác hiển thị để so ngưỡng ổn định.
    pub(crate) fn round_delta(self, delta: f64) -> f64 {
        match self {
            Self::MgDl => delta.round(),
            Self::MmolL => round_tenth(delta),
        }
    }
}

impl FromStr for GlucoseUnit {
    type Err = GlucoseError;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        match raw.trim().to_lowercase().as_str() {
            "mg/dl" | "mgdl" | "mg" => Ok(Self::MgDl),
            "mmol/l" | "mmol" => Ok(Self::MmolL),
            other => Err(GlucoseError::UnknownUnit(other.to_string())),
        }
    }
}

impl fmt::Display for GlucoseUnit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Cấu hình đơn vị cho một lần xử lý. Dải mục tiêu cố định theo đơn vị.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct UnitConfig {
    pub unit: GlucoseUnit,
    pub target_low: f64,
    pub target_high: f64,
}

impl UnitConfig {
    pub fn for_unit(unit: GlucoseUnit) -> Self {
        let (target_low, target_high) = match unit {
            GlucoseUnit::MgDl => (80.0, 180.0),
            GlucoseUnit::MmolL => (4.0, 10.0),
        };
        Self {
            unit,
            target_low,
            target_high,
        }
    }

    /// Ngưỡng chênh lệch cho xu hướng tổng.
    pub fn summary_threshold(&self) -> f64 {
        match self.unit {
            GlucoseUnit::MgDl => 5.0,
            GlucoseUnit::MmolL => 0.3,
        }
    }

    /// Ngưỡng chặt hơn cho xu hướng từng dòng.
    pub fn row_threshold(&self) -> f64 {
        match self.unit {
            GlucoseUnit::MgDl => 4.0,
            GlucoseUnit::MmolL => 0.2,
        }
    }

    /// Trục y của biểu đồ (min, max).
    pub fn chart_axis(&self) -> (f64, f64) {
        match self.unit {
            GlucoseUnit::MgDl => (40.0, 400.0),
            GlucoseUnit::MmolL => (2.2, 22.2),
        }
    }

    pub fn target_range_text(&self) -> String {
        format!(
            "{}-{} {}",
            self.unit.format_number(self.target_low),
            self.unit.format_number(self.target_high),
            self.unit.label()
        )
    }
}

impl Default for UnitConfig {
    fn default() -> Self {
        Self::for_unit(GlucoseUnit::MgDl)
    }
}

fn round_tenth(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}
