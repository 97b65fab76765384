//! Cấu hình kết nối: đọc một lần, kiểm tra một lần.
//!
//! Nguồn: file TOML tùy chọn, sau đó biến môi trường `NIGHTSCOUT_*`
//! (`NIGHTSCOUT_URL`, `NIGHTSCOUT_API_SECRET`, `NIGHTSCOUT_UNITS`,
//! `NIGHTSCOUT_TIMEZONE`, `NIGHTSCOUT_DISPLAY_MODE`, `NIGHTSCOUT_ENTRY_COUNT`,
//! `NIGHTSCOUT_CA_CERTIFICATE`).

use std::fmt;
use std::path::{Path, PathBuf};

use config::{Config, Environment, File, FileFormat};
use nightscout_core::{parse_timezone, GlucoseUnit, Tz, UnitConfig};
use nightscout_display::DisplayMode;
use serde::Deserialize;

use crate::SkillError;

pub const ENV_PREFIX: &str = "NIGHTSCOUT";

/// 48 lần đo ≈ 4 giờ với cảm biến 5 phút.
pub const DEFAULT_ENTRY_COUNT: u32 = 48;

/// Giá trị thô, mọi trường đều có thể thiếu.
#[derive(Debug, Clone, Default, Deserialize, PartialEq)]
pub struct SkillSettings {
    #[serde(default)]
    pub url: Option<String>,
    #[serde(default)]
    pub api_secret: Option<String>,
    #[serde(default)]
    pub units: Option<String>,
    #[serde(default)]
    pub timezone: Option<String>,
    #[serde(default)]
    pub display_mode: Option<String>,
    #[serde(default)]
    pub entry_count: Option<u32>,
    #[serde(default)]
    pub ca_certificate: Option<PathBuf>,
}

impl SkillSettings {
    /// Chỉ đọc biến môi trường.
    pub fn from_env() -> Result<Self, SkillError> {
        Self::load(None)
    }

    /// File (nếu có) rồi tới biến môi trường; môi trường thắng.
    pub fn load(path: Option<&Path>) -> Result<Self, SkillError> {
        Self::load_with_env(path, Environment::with_prefix(ENV_PREFIX))
    }

    /// Giá trị môi trường giữ nguyên dạng chuỗi; secret toàn chữ số không bị đổi.
    fn load_with_env(path: Option<&Path>, env: Environment) -> Result<Self, SkillError> {
        let mut builder = Config::builder();
        if let Some(path) = path {
            builder = builder.add_source(File::from(path));
        }
        let config = builder.add_source(env).build()?;
        Ok(config.try_deserialize()?)
    }

    pub fn from_toml_str(toml: &str) -> Result<Self, SkillError> {
        let config = Config::builder()
            .add_source(File::from_str(toml, FileFormat::Toml))
            .build()?;
        Ok(config.try_deserialize()?)
    }

    /// Trả về danh sách vấn đề (dạng checklist) nếu cấu hình không dùng được.
    pub fn validate(&self) -> Result<SkillConfig, Vec<String>> {
        let mut problems = Vec::new();

        let base_url = non_blank(&self.url);
        if base_url.is_none() {
            problems.push("Nightscout URL (NIGHTSCOUT_URL) is not set".to_string());
        }
        let api_secret = non_blank(&self.api_secret);
        if api_secret.is_none() {
            problems.push("API secret (NIGHTSCOUT_API_SECRET) is not set".to_string());
        }

        let unit = match non_blank(&self.units) {
            Some(raw) => raw.parse::<GlucoseUnit>().unwrap_or_else(|_| {
                problems.push(format!("Units '{raw}' must be mg/dl or mmol"));
                GlucoseUnit::default()
            }),
            None => GlucoseUnit::default(),
        };

        let timezone = match non_blank(&self.timezone) {
            Some(raw) => parse_timezone(&raw).unwrap_or_else(|_| {
                problems.push(format!("Timezone '{raw}' is not a known IANA zone"));
                Tz::UTC
            }),
            None => Tz::UTC,
        };

        let display_mode = match non_blank(&self.display_mode) {
            Some(raw) => raw.parse::<DisplayMode>().unwrap_or_else(|_| {
                problems.push(format!("Display mode '{raw}' must be rows or chart"));
                DisplayMode::default()
            }),
            None => DisplayMode::default(),
        };

        let entry_count = self.entry_count.unwrap_or(DEFAULT_ENTRY_COUNT);
        if entry_count == 0 {
            problems.push("Entry count must be at least 1".to_string());
        }

        match (base_url, api_secret) {
            (Some(base_url), Some(api_secret)) if problems.is_empty() => Ok(SkillConfig {
                base_url,
                api_secret,
                units: UnitConfig::for_unit(unit),
                timezone,
                display_mode,
                entry_count,
                ca_certificate: self.ca_certificate.clone(),
            }),
            _ => Err(problems),
        }
    }
}

fn non_blank(value: &Option<String>) -> Option<String> {
    value
        .as_deref()
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(str::to_string)
}

/// Cấu hình đã kiểm tra, truyền vào pipeline khi khởi tạo.
#[derive(Clone, PartialEq)]
pub struct SkillConfig {
    pub base_url: String,
    pub api_secret: String,
    pub units: UnitConfig,
    pub timezone: Tz,
    pub display_mode: DisplayMode,
    pub entry_count: u32,
    pub ca_certificate: Option<PathBuf>,
}

impl fmt::Debug for SkillConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SkillConfig")
            .field("base_url", &self.base_url)
            .field("api_secret", &"***")
            .field("units", &self.units)
            .field("timezone", &self.timezone)
            .field("display_mode", &self.display_mode)
            .field("entry_count", &self.entry_count)
            .field("ca_certificate", &self.ca_certificate)
            .finish()
    }
}
