//! Máy trạng thái xử lý một yêu cầu.
//!
//! `Idle → ConfigValidated → DataFetched → Analyzed → Presented → Responded`,
//! hoặc `Failed` ở bất kỳ bước nào. Pipeline dừng ở `Analyzed`; hai bước cuối
//! thuộc về [`crate::Skill`], nơi cả chuỗi nằm trong cùng một vùng chặn panic.

use std::fmt;
use std::panic::AssertUnwindSafe;

use futures::FutureExt;
use nightscout_core::{analyze_series, PresentationResult, Series};
use nightscout_display::DisplayMode;
use nightscout_feed::{EntrySource, FeedError, NightscoutClient};
use tracing::{debug, error, info, warn};

use crate::settings::{SkillConfig, SkillSettings};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PipelineState {
    Idle,
    ConfigValidated,
    DataFetched,
    Analyzed,
    Presented,
    Responded,
    Failed,
}

impl fmt::Display for PipelineState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Idle => "idle",
            Self::ConfigValidated => "config_validated",
            Self::DataFetched => "data_fetched",
            Self::Analyzed => "analyzed",
            Self::Presented => "presented",
            Self::Responded => "responded",
            Self::Failed => "failed",
        };
        f.write_str(name)
    }
}

enum Stage<S> {
    Ready { config: SkillConfig, source: S },
    Failed(PresentationResult),
}

pub struct RequestPipeline<S> {
    stage: Stage<S>,
    display_mode: DisplayMode,
}

impl<S: EntrySource> RequestPipeline<S> {
    /// Kiểm tra cấu hình đúng một lần; nếu lỗi, nguồn dữ liệu không bao giờ được gọi.
    pub fn new(settings: &SkillSettings, source: S) -> Self {
        debug!(state = %PipelineState::Idle, "validating settings");
        match settings.validate() {
            Ok(config) => Self::with_config(config, source),
            Err(problems) => Self::failed(PresentationResult::ConfigError { problems }),
        }
    }

    pub fn with_config(config: SkillConfig, source: S) -> Self {
        debug!(state = %PipelineState::ConfigValidated, ?config, "configuration accepted");
        Self {
            display_mode: config.display_mode,
            stage: Stage::Ready { config, source },
        }
    }

    pub fn display_mode(&self) -> DisplayMode {
        self.display_mode
    }

    /// Chạy toàn bộ; panic bị chặn tại đây và trở thành `InternalError`.
    pub async fn run(&self) -> PresentationResult {
        match AssertUnwindSafe(self.run_stages()).catch_unwind().await {
            Ok(result) => result,
            Err(_) => {
                error!(state = %PipelineState::Failed, "pipeline panicked");
                PresentationResult::InternalError
            }
        }
    }

    async fn run_stages(&self) -> PresentationResult {
        let (config, source) = match &self.stage {
            Stage::Ready { config, source } => (config, source),
            Stage::Failed(result) => {
                info!(state = %PipelineState::Failed, kind = result.kind(), "skipping fetch");
                return result.clone();
            }
        };

        let entries = match source.fetch_entries(config.entry_count).await {
            Ok(entries) => entries,
            Err(err) => {
                warn!(state = %PipelineState::Failed, error = %err, "fetch failed");
                return PresentationResult::FetchError {
                    detail: err.to_string(),
                };
            }
        };
        debug!(state = %PipelineState::DataFetched, count = entries.len());

        let series = Series::from_feed(entries);
        let result = analyze_series(&series, &config.units, config.timezone);
        debug!(state = %PipelineState::Analyzed, kind = result.kind());
        result
    }
}

impl<S> RequestPipeline<S> {
    fn failed(result: PresentationResult) -> Self {
        info!(state = %PipelineState::Failed, kind = result.kind(), "pipeline will not fetch");
        Self {
            stage: Stage::Failed(result),
            display_mode: DisplayMode::default(),
        }
    }
}

impl RequestPipeline<NightscoutClient> {
    /// Dựng pipeline gọi site Nightscout thật.
    pub fn from_settings(settings: &SkillSettings) -> Self {
        debug!(state = %PipelineState::Idle, "validating settings");
        let config = match settings.validate() {
            Ok(config) => config,
            Err(problems) => return Self::failed(PresentationResult::ConfigError { problems }),
        };

        match build_client(&config) {
            Ok(client) => Self::with_config(config, client),
            Err(result) => {
                let mut pipeline = Self::failed(result);
                pipeline.display_mode = config.display_mode;
                pipeline
            }
        }
    }
}

fn build_client(config: &SkillConfig) -> Result<NightscoutClient, PresentationResult> {
    let mut builder = NightscoutClient::builder()
        .base_url(config.base_url.as_str())
        .api_secret(config.api_secret.as_str());

    if let Some(path) = &config.ca_certificate {
        let pem = std::fs::read(path).map_err(|err| PresentationResult::ConfigError {
            problems: vec![format!("CA certificate {} is unreadable: {err}", path.display())],
        })?;
        builder = builder.ca_certificate_pem(pem);
    }

    builder.build().map_err(|err| match err {
        FeedError::Certificate(detail) => PresentationResult::ConfigError {
            problems: vec![format!("CA certificate is invalid: {detail}")],
        },
        other => {
            error!(error = %other, "could not build Nightscout client");
            PresentationResult::InternalError
        }
    })
}
