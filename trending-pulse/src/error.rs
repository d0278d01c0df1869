//! Error definitions.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    #[error("HTTP client error: {source}")]
    HttpClient {
        #[from]
        source: reqwest::Error,
    },

    #[error("API error (status {status}): {message}")]
    ApiError { status: u16, message: String },

    #[error("Invalid configuration: {message}")]
    InvalidConfig { message: String },

    #[error("Invalid input: {message}")]
    InvalidInput { message: String },

    #[error("Malformed response: {message}")]
    MalformedResponse { message: String },

    #[error("Serialization error: {source}")]
    Serialization {
        #[from]
        source: serde_json::Error,
    },

    #[error("IO error: {source}")]
    Io {
        #[from]
        source: std::io::Error,
    },

    #[error(transparent)]
    Flow(#[from] FlowError),
}

impl Error {
    /// 网络或服务端错误。
    #[must_use]
    pub const fn is_transport(&self) -> bool {
        matches!(self, Self::HttpClient { .. } | Self::ApiError { .. })
    }

    /// 服务端有响应，但内容不符合预期结构。
    #[must_use]
    pub const fn is_malformed(&self) -> bool {
        matches!(
            self,
            Self::MalformedResponse { .. } | Self::Serialization { .. }
        )
    }

    pub(crate) fn malformed(message: impl Into<String>) -> Self {
        Self::MalformedResponse {
            message: message.into(),
        }
    }
}

pub type Result<T> = std::result::Result<T, Error>;

/// 流程守卫拒绝了某个操作。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum FlowError {
    #[error("no image selected")]
    NoImage,
    #[error("no analysis available")]
    NoAnalysis,
    #[error("another operation is in flight")]
    Busy,
    #[error("prompt is empty")]
    EmptyPrompt,
    #[error("unknown subject")]
    UnknownSubject,
    #[error("no generated image to save")]
    NoResult,
}
