use thiserror::Error;

/// Lỗi ở biên của skill (đọc envelope, nạp cấu hình).
#[derive(Debug, Error)]
pub enum SkillError {
    #[error("Envelope không hợp lệ: {0}")]
    Envelope(String),

    #[error("Không nạp được cấu hình: {0}")]
    Settings(#[from] config::ConfigError),
}
