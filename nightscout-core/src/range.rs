use serde::{Deserialize, Serialize};

use crate::UnitConfig;

/// Trạng thái so với dải mục tiêu.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum RangeStatus {
    Low,
    Normal,
    High,
}

impl RangeStatus {
    pub fn icon(self) -> &'static str {
        match self {
            Self::Low => "▼",
            Self::Normal => "●",
            Self::High => "▲",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::Low => "Low",
            Self::Normal => "In range",
            Self::High => "High",
        }
    }
}

/// Biên dải mục tiêu được tính là bình thường.
pub fn classify_range(display_value: f64, units: &UnitConfig) -> RangeStatus {
    if display_value < units.target_low {
        RangeStatus::Low
    } else if display_value > units.target_high {
        RangeStatus::High
    } else {
        RangeStatus::Normal
    }
}
