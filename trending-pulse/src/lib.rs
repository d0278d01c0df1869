//! Gemini-backed product showcase: trending listings, upload analysis and
//! scene synthesis, plus the client-side flows that drive them.

pub mod carousel;
pub mod catalog;
pub mod client;
pub mod config;
pub mod download;
pub mod error;
pub mod media;
pub mod models;
pub mod scene;
pub mod showcase;
pub mod spotlight;
pub mod storage;
pub mod upload;

#[cfg(test)]
mod test_support;

pub use trending_pulse_types as types;

pub use catalog::{Catalog, ContentGenerator};
pub use client::{Client, ClientBuilder, HttpOptions};
pub use config::ShowcaseConfig;
pub use error::{Error, FlowError, Result};
pub use media::{ImageSource, InlineImage};
pub use scene::{SceneFailure, SceneFlow, SceneState};
pub use showcase::{Notice, Showcase};
pub use storage::{FileStore, SimulatedDrive};
pub use upload::{UploadFlow, UploadState};

/// 当前 Unix 毫秒时间戳；时钟早于纪元时返回 0。
pub(crate) fn unix_millis() -> u128 {
    std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .map_or(0, |elapsed| elapsed.as_millis())
}
