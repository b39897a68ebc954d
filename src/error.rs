//! Error types shared across the rendering core.

pub type StudioResult<T> = Result<T, StudioError>;

/// Every failure the rendering core can surface.
///
/// Generation-path errors (`EmptyPayload`, `GenerationFailed`, `InvalidConfig`)
/// abort the render attempt they occur in. `AssetLoadFailed` is recovered
/// locally by skipping the overlay and is reported as a warning.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum StudioError {
    #[error("payload is empty: enter content for the QR code")]
    EmptyPayload,

    #[error("QR generation failed: {0}")]
    GenerationFailed(String),

    #[error("failed to load image '{reference}': {reason}")]
    AssetLoadFailed { reference: String, reason: String },

    #[error("export failed: {0}")]
    ExportFailed(String),

    #[error("invalid style configuration: {0}")]
    InvalidConfig(String),
}

impl StudioError {
    pub fn generation(msg: impl Into<String>) -> Self {
        Self::GenerationFailed(msg.into())
    }

    pub fn asset(reference: impl Into<String>, reason: impl ToString) -> Self {
        Self::AssetLoadFailed {
            reference: reference.into(),
            reason: reason.to_string(),
        }
    }

    pub fn export(msg: impl Into<String>) -> Self {
        Self::ExportFailed(msg.into())
    }

    pub fn invalid(msg: impl Into<String>) -> Self {
        Self::InvalidConfig(msg.into())
    }

    /// Returns true for errors that are degraded to warnings instead of
    /// failing a render.
    pub fn is_recoverable(&self) -> bool {
        matches!(self, Self::AssetLoadFailed { .. })
    }
}

impl From<qrcode::types::QrError> for StudioError {
    fn from(err: qrcode::types::QrError) -> Self {
        Self::GenerationFailed(err.to_string())
    }
}
