//! Simulated persistence for analyzed uploads.

use std::time::Duration;

use futures_util::future::BoxFuture;
use trending_pulse_types::catalog::AnalysisResult;
use uuid::Uuid;

use crate::config::ShowcaseConfig;
use crate::error::Result;
use crate::media::InlineImage;

/// 保存一次上传，返回可访问的位置。
pub trait FileStore: Send + Sync {
    fn persist<'a>(
        &'a self,
        analysis: &'a AnalysisResult,
        image: &'a InlineImage,
    ) -> BoxFuture<'a, Result<String>>;
}

/// 模拟 Drive 上传：固定延迟后返回一个随机文件链接，不写任何数据。
#[derive(Debug, Clone)]
pub struct SimulatedDrive {
    delay: Duration,
}

impl SimulatedDrive {
    #[must_use]
    pub const fn new(delay: Duration) -> Self {
        Self { delay }
    }

    #[must_use]
    pub const fn from_config(config: &ShowcaseConfig) -> Self {
        Self::new(config.upload_delay)
    }

    #[must_use]
    pub const fn delay(&self) -> Duration {
        self.delay
    }
}

impl Default for SimulatedDrive {
    fn default() -> Self {
        Self::new(crate::config::DEFAULT_UPLOAD_DELAY)
    }
}

impl FileStore for SimulatedDrive {
    fn persist<'a>(
        &'a self,
        analysis: &'a AnalysisResult,
        image: &'a InlineImage,
    ) -> BoxFuture<'a, Result<String>> {
        Box::pin(async move {
            tokio::time::sleep(self.delay).await;
            let url = drive_file_url(&Uuid::new_v4().simple().to_string());
            tracing::info!(
                name = %analysis.name,
                mime_type = image.mime_type(),
                bytes = image.data().len(),
                %url,
                "uploaded to drive"
            );
            Ok(url)
        })
    }
}

pub(crate) fn drive_file_url(file_id: &str) -> String {
    format!("https://drive.google.com/file/d/{file_id}/view")
}

/// Drive 文件的直链缩略图。
pub(crate) fn drive_thumbnail_url(file_id: &str) -> String {
    format!("https://lh3.googleusercontent.com/d/{file_id}")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn analysis() -> AnalysisResult {
        AnalysisResult {
            name: "Desk Lamp".into(),
            category: "Home".into(),
            description: "Brass lamp".into(),
            suggested_price: 89.0,
        }
    }

    #[tokio::test(start_paused = true)]
    async fn persist_waits_for_the_delay() {
        let drive = SimulatedDrive::new(Duration::from_millis(2500));
        let image = InlineImage::new(vec![1, 2, 3], "image/png").unwrap();
        let analysis = analysis();
        let started = tokio::time::Instant::now();
        let url = drive.persist(&analysis, &image).await.unwrap();
        assert!(started.elapsed() >= Duration::from_millis(2500));
        let id = url
            .strip_prefix("https://drive.google.com/file/d/")
            .and_then(|rest| rest.strip_suffix("/view"))
            .unwrap();
        assert_eq!(id.len(), 32);
    }

    #[tokio::test(start_paused = true)]
    async fn each_upload_gets_a_fresh_location() {
        let drive = SimulatedDrive::new(Duration::ZERO);
        let image = InlineImage::new(vec![1], "image/jpeg").unwrap();
        let analysis = analysis();
        let first = drive.persist(&analysis, &image).await.unwrap();
        let second = drive.persist(&analysis, &image).await.unwrap();
        assert_ne!(first, second);
    }
}
