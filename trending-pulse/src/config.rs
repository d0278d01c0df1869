//! Showcase configuration.

use std::str::FromStr;
use std::time::Duration;

use crate::error::{Error, Result};

pub const DEFAULT_LISTING_COUNT: usize = 8;
pub const DEFAULT_TEXT_MODEL: &str = "gemini-3-flash-preview";
pub const DEFAULT_IMAGE_MODEL: &str = "gemini-2.5-flash-image";
pub const DEFAULT_UPLOAD_DELAY: Duration = Duration::from_millis(2500);
pub const DEFAULT_NOTICE_DURATION: Duration = Duration::from_secs(8);

/// 展示页的运行参数。
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShowcaseConfig {
    /// 每个分类生成的商品数量。
    pub listing_count: usize,
    /// 商品列表与图片分析使用的模型。
    pub text_model: String,
    /// 场景合成使用的模型。
    pub image_model: String,
    /// 模拟上传的延迟。
    pub upload_delay: Duration,
    /// 上传成功提示的展示时长。
    pub notice_duration: Duration,
}

impl Default for ShowcaseConfig {
    fn default() -> Self {
        Self {
            listing_count: DEFAULT_LISTING_COUNT,
            text_model: DEFAULT_TEXT_MODEL.to_string(),
            image_model: DEFAULT_IMAGE_MODEL.to_string(),
            upload_delay: DEFAULT_UPLOAD_DELAY,
            notice_duration: DEFAULT_NOTICE_DURATION,
        }
    }
}

impl ShowcaseConfig {
    /// 从环境变量读取覆盖项，空值忽略。
    ///
    /// # Errors
    /// 当数值型变量无法解析或商品数量为 0 时返回错误。
    pub fn from_env() -> Result<Self> {
        let mut config = Self::default();
        if let Some(count) = env_parsed::<usize>("PULSE_LISTING_COUNT")? {
            if count == 0 {
                return Err(Error::InvalidConfig {
                    message: "PULSE_LISTING_COUNT must be at least 1".into(),
                });
            }
            config.listing_count = count;
        }
        if let Some(model) = env_value("PULSE_TEXT_MODEL") {
            config.text_model = model;
        }
        if let Some(model) = env_value("PULSE_IMAGE_MODEL") {
            config.image_model = model;
        }
        if let Some(millis) = env_parsed::<u64>("PULSE_UPLOAD_DELAY_MS")? {
            config.upload_delay = Duration::from_millis(millis);
        }
        if let Some(secs) = env_parsed::<u64>("PULSE_NOTICE_SECS")? {
            config.notice_duration = Duration::from_secs(secs);
        }
        Ok(config)
    }
}

pub(crate) fn env_value(key: &str) -> Option<String> {
    std::env::var(key)
        .ok()
        .map(|value| value.trim().to_string())
        .filter(|value| !value.is_empty())
}

pub(crate) fn env_parsed<T: FromStr>(key: &str) -> Result<Option<T>> {
    env_value(key)
        .map(|raw| {
            raw.parse::<T>().map_err(|_| Error::InvalidConfig {
                message: format!("{key} has an invalid value: {raw}"),
            })
        })
        .transpose()
}
