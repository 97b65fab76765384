//! Skill giọng nói hiển thị đường huyết từ Nightscout.
//!
//! Mỗi lần gọi: đọc cấu hình, lấy dữ liệu một lần, phân tích rồi trả về câu
//! nói kèm (nếu thiết bị có màn hình) chỉ thị APL.

use std::future::Future;
use std::panic::AssertUnwindSafe;

use futures::FutureExt;
use nightscout_core::PresentationResult;
use nightscout_display::{PresentationBuilder, RENDER_DOCUMENT};
use nightscout_feed::{EntrySource, NightscoutClient};
use tracing::{debug, error, info};

mod envelope;
mod error;
pub mod pipeline;
pub mod settings;

pub use envelope::{RequestKind, SkillRequest, SkillResponse, APL_INTERFACE};
pub use error::SkillError;
pub use pipeline::{PipelineState, RequestPipeline};
pub use settings::{SkillConfig, SkillSettings, DEFAULT_ENTRY_COUNT, ENV_PREFIX};

pub const DISPLAY_INTENT: &str = "DisplayGraphIntent";
pub const HELP_INTENT: &str = "AMAZON.HelpIntent";
pub const CANCEL_INTENT: &str = "AMAZON.CancelIntent";
pub const STOP_INTENT: &str = "AMAZON.StopIntent";

const HELP_SPEECH: &str = "You can ask me to show your glucose readings. \
     I will read your latest value and show recent readings on your screen.";
const HELP_REPROMPT: &str = "Say, show my glucose.";
const GOODBYE_SPEECH: &str = "Goodbye!";
const FALLBACK_SPEECH: &str = "Sorry, I encountered an error. Please try again.";

pub struct Skill<S> {
    pipeline: RequestPipeline<S>,
    presenter: PresentationBuilder,
}

impl Skill<NightscoutClient> {
    pub fn from_settings(settings: &SkillSettings) -> Self {
        let pipeline = RequestPipeline::from_settings(settings);
        let presenter = PresentationBuilder::new(pipeline.display_mode());
        Self {
            pipeline,
            presenter,
        }
    }
}

impl<S: EntrySource> Skill<S> {
    pub fn new(settings: &SkillSettings, source: S) -> Self {
        let pipeline = RequestPipeline::new(settings, source);
        let presenter = PresentationBuilder::new(pipeline.display_mode());
        Self {
            pipeline,
            presenter,
        }
    }

    pub async fn handle(&self, request: &SkillRequest) -> SkillResponse {
        match &request.kind {
            RequestKind::Launch => self.show_glucose(request.supports_display).await,
            RequestKind::Intent(name) => {
                info!(intent = %name, "handling intent");
                match name.as_str() {
                    DISPLAY_INTENT => self.show_glucose(request.supports_display).await,
                    HELP_INTENT => SkillResponse::ask(HELP_SPEECH, HELP_REPROMPT),
                    CANCEL_INTENT | STOP_INTENT => SkillResponse::tell(GOODBYE_SPEECH),
                    _ => SkillResponse::ask(FALLBACK_SPEECH, FALLBACK_SPEECH),
                }
            }
            RequestKind::SessionEnded { reason } => {
                info!(reason = reason.as_deref().unwrap_or("unknown"), "session ended");
                SkillResponse::default()
            }
            RequestKind::Other(request_type) => {
                info!(%request_type, "unsupported request type");
                SkillResponse::ask(FALLBACK_SPEECH, FALLBACK_SPEECH)
            }
        }
    }

    async fn show_glucose(&self, supports_display: bool) -> SkillResponse {
        self.guarded(supports_display, self.respond(supports_display))
            .await
    }

    async fn respond(&self, supports_display: bool) -> SkillResponse {
        let result = self.pipeline.run().await;
        let response = self.present(&result, supports_display);
        debug!(state = %PipelineState::Responded, kind = result.kind());
        response
    }

    /// Panic ở bất kỳ bước nào (kể cả dựng layout) thành màn hình `InternalError`.
    async fn guarded<F>(&self, supports_display: bool, attempt: F) -> SkillResponse
    where
        F: Future<Output = SkillResponse>,
    {
        match AssertUnwindSafe(attempt).catch_unwind().await {
            Ok(response) => response,
            Err(_) => {
                error!(state = %PipelineState::Failed, "request panicked");
                self.present(&PresentationResult::InternalError, supports_display)
            }
        }
    }

    fn present(&self, result: &PresentationResult, supports_display: bool) -> SkillResponse {
        let presentation = self.presenter.render(result);
        debug!(
            state = %PipelineState::Presented,
            kind = result.kind(),
            mode = %self.presenter.mode(),
        );

        let response = SkillResponse::tell(presentation.speech);
        if supports_display {
            debug!(directive = RENDER_DOCUMENT, "attaching layout");
            response.with_directive(presentation.directive)
        } else {
            response
        }
    }
}

/// Xử lý một yêu cầu với site Nightscout trong cấu hình.
pub async fn handle_request(request: &SkillRequest, settings: &SkillSettings) -> SkillResponse {
    Skill::from_settings(settings).handle(request).await
}
