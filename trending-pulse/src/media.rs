//! Image input: local files, `data:` URLs and remote reference images.

use std::path::Path;

use base64::engine::general_purpose::STANDARD;
use base64::Engine as _;
use futures_util::future::BoxFuture;
use http::header::CONTENT_TYPE;
use trending_pulse_types::content::{Blob, Part};

use crate::client::Client;
use crate::error::{Error, Result};

/// 本地选择文件时接受的类型。
pub const ACCEPTED_UPLOAD_TYPES: [&str; 2] = ["image/jpeg", "image/png"];

const FALLBACK_MIME: &str = "image/png";

/// 内存中的图片（非空字节 + MIME）。
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InlineImage {
    data: Vec<u8>,
    mime_type: String,
}

impl InlineImage {
    /// # Errors
    /// 当字节为空或 MIME 不是图片类型时返回错误。
    pub fn new(data: Vec<u8>, mime_type: impl Into<String>) -> Result<Self> {
        let mime_type = mime_type.into();
        if data.is_empty() {
            return Err(Error::InvalidInput {
                message: "image data is empty".into(),
            });
        }
        if !mime_type.starts_with("image/") {
            return Err(Error::InvalidInput {
                message: format!("{mime_type} is not an image type"),
            });
        }
        Ok(Self { data, mime_type })
    }

    /// 读取本地 JPEG/PNG 文件，MIME 由扩展名推断。
    ///
    /// # Errors
    /// 当文件不可读、类型不受支持或内容为空时返回错误。
    pub async fn from_path(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let mime_type = mime_guess::from_path(path)
            .first_or_octet_stream()
            .essence_str()
            .to_string();
        if !ACCEPTED_UPLOAD_TYPES.contains(&mime_type.as_str()) {
            return Err(Error::InvalidInput {
                message: format!("{} is not a JPEG or PNG image", path.display()),
            });
        }
        let data = tokio::fs::read(path).await?;
        Self::new(data, mime_type)
    }

    /// 解析 `data:<mime>;base64,<payload>`。
    ///
    /// # Errors
    /// 当格式不对或 base64 无法解码时返回错误。
    pub fn from_data_url(url: &str) -> Result<Self> {
        let invalid = || Error::InvalidInput {
            message: "not a base64 data URL".into(),
        };
        let rest = url.strip_prefix("data:").ok_or_else(invalid)?;
        let (header, payload) = rest.split_once(',').ok_or_else(invalid)?;
        let mime_type = header.strip_suffix(";base64").ok_or_else(invalid)?;
        let data = STANDARD
            .decode(payload.trim().as_bytes())
            .map_err(|err| Error::InvalidInput {
                message: format!("data URL payload is not base64: {err}"),
            })?;
        Self::new(data, mime_type)
    }

    /// 可直接嵌入预览的 `data:` URL。
    #[must_use]
    pub fn to_data_url(&self) -> String {
        format!("data:{};base64,{}", self.mime_type, STANDARD.encode(&self.data))
    }

    #[must_use]
    pub fn data(&self) -> &[u8] {
        &self.data
    }

    #[must_use]
    pub fn mime_type(&self) -> &str {
        &self.mime_type
    }

    /// 下载时使用的扩展名。
    #[must_use]
    pub fn extension(&self) -> &str {
        match self.mime_type.as_str() {
            "image/jpeg" => "jpg",
            "image/webp" => "webp",
            "image/gif" => "gif",
            _ => "png",
        }
    }

    pub(crate) fn to_part(&self) -> Part {
        Part::inline_data(self.data.clone(), self.mime_type.clone())
    }

    pub(crate) fn from_blob(blob: &Blob) -> Result<Self> {
        let mime_type = if blob.mime_type.starts_with("image/") {
            blob.mime_type.as_str()
        } else {
            FALLBACK_MIME
        };
        Self::new(blob.data.clone(), mime_type)
    }
}

/// 取回场景主体的参考图片。
///
/// `Client` 的实现走不带鉴权头的通道，API Key 不会发往图片所在主机。
pub trait ImageSource: Send + Sync {
    fn fetch_image<'a>(&'a self, url: &'a str) -> BoxFuture<'a, Result<InlineImage>>;
}

impl ImageSource for Client {
    fn fetch_image<'a>(&'a self, url: &'a str) -> BoxFuture<'a, Result<InlineImage>> {
        Box::pin(async move {
            let inner = self.inner();
            let response = inner.send(inner.assets.get(url)).await?;
            let mime_type = response
                .headers()
                .get(CONTENT_TYPE)
                .and_then(|value| value.to_str().ok())
                .and_then(|value| value.split(';').next())
                .map(str::trim)
                .filter(|value| value.starts_with("image/"))
                .unwrap_or(FALLBACK_MIME)
                .to_string();
            let bytes = response.bytes().await?;
            InlineImage::new(bytes.to_vec(), mime_type)
        })
    }
}
