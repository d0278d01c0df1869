//! Client configuration and transport layer.
//!
//! 两条 HTTP 通道共用超时与代理：`gemini` 携带 API Key 与自定义请求头，
//! 只发往 Gemini 端点；`assets` 不带任何鉴权头，用于拉取第三方托管的参考图片。

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use reqwest::header::{HeaderMap, HeaderName, HeaderValue};
use reqwest::{Client as HttpClient, Proxy};

use crate::config::{env_parsed, env_value, ShowcaseConfig};
use crate::error::{Error, Result};

const DEFAULT_BASE_URL: &str = "https://generativelanguage.googleapis.com/";
const DEFAULT_API_VERSION: &str = "v1beta";
const API_KEY_HEADER: &str = "x-goog-api-key";

/// Gemini 客户端。
#[derive(Clone)]
pub struct Client {
    inner: Arc<ClientInner>,
}

pub(crate) struct ClientInner {
    pub gemini: HttpClient,
    pub assets: HttpClient,
    pub endpoint: Endpoint,
}

/// HTTP 配置，对两条通道同时生效（`headers` 除外）。
#[derive(Debug, Clone, Default)]
pub struct HttpOptions {
    /// 单次请求超时。未设置时不限时。
    pub timeout: Option<Duration>,
    pub proxy: Option<String>,
    /// 仅附加在 Gemini 请求上。
    pub headers: HashMap<String, String>,
    pub base_url: Option<String>,
    pub api_version: Option<String>,
}

impl Client {
    /// 使用 API Key 创建客户端。
    ///
    /// # Errors
    /// 当 API Key 无法作为请求头或构建 HTTP 客户端失败时返回错误。
    pub fn new(api_key: impl Into<String>) -> Result<Self> {
        Self::builder().api_key(api_key).build()
    }

    /// 从环境变量创建客户端，空值视为未设置。
    ///
    /// Key 依次取 `GEMINI_API_KEY`、`GOOGLE_API_KEY`；另外读取
    /// `GEMINI_BASE_URL`、`PULSE_HTTP_TIMEOUT_SECS` 与 `PULSE_HTTP_PROXY`。
    ///
    /// # Errors
    /// 当缺少 Key、超时不是整数或构建客户端失败时返回错误。
    pub fn from_env() -> Result<Self> {
        let api_key = env_value("GEMINI_API_KEY")
            .or_else(|| env_value("GOOGLE_API_KEY"))
            .ok_or_else(|| Error::InvalidConfig {
                message: "GEMINI_API_KEY or GOOGLE_API_KEY not found".into(),
            })?;
        let mut builder = Self::builder().api_key(api_key);
        if let Some(base_url) = env_value("GEMINI_BASE_URL") {
            builder = builder.base_url(base_url);
        }
        if let Some(secs) = env_parsed::<u64>("PULSE_HTTP_TIMEOUT_SECS")? {
            builder = builder.timeout(Duration::from_secs(secs));
        }
        if let Some(proxy) = env_value("PULSE_HTTP_PROXY") {
            builder = builder.proxy(proxy);
        }
        builder.build()
    }

    #[must_use]
    pub fn builder() -> ClientBuilder {
        ClientBuilder::default()
    }

    /// 访问底层 generateContent 调用。
    #[must_use]
    pub fn models(&self) -> crate::models::Models {
        crate::models::Models::new(self.inner.clone())
    }

    /// 以给定配置创建内容生成客户端。
    #[must_use]
    pub fn catalog(&self, config: &ShowcaseConfig) -> crate::catalog::Catalog {
        crate::catalog::Catalog::new(self.models(), config)
    }

    pub(crate) fn inner(&self) -> &ClientInner {
        &self.inner
    }
}

/// 客户端 Builder。
#[derive(Default)]
pub struct ClientBuilder {
    api_key: Option<String>,
    http_options: HttpOptions,
}

impl ClientBuilder {
    #[must_use]
    pub fn api_key(mut self, key: impl Into<String>) -> Self {
        self.api_key = Some(key.into());
        self
    }

    #[must_use]
    pub const fn timeout(mut self, timeout: Duration) -> Self {
        self.http_options.timeout = Some(timeout);
        self
    }

    #[must_use]
    pub fn proxy(mut self, url: impl Into<String>) -> Self {
        self.http_options.proxy = Some(url.into());
        self
    }

    /// 增加 Gemini 请求头；参考图片请求不会携带。
    #[must_use]
    pub fn header(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.http_options.headers.insert(key.into(), value.into());
        self
    }

    #[must_use]
    pub fn base_url(mut self, base_url: impl Into<String>) -> Self {
        self.http_options.base_url = Some(base_url.into());
        self
    }

    #[must_use]
    pub fn api_version(mut self, api_version: impl Into<String>) -> Self {
        self.http_options.api_version = Some(api_version.into());
        self
    }

    /// 构建客户端。
    ///
    /// # Errors
    /// 当缺少 API Key、请求头非法、代理非法或构建 HTTP 客户端失败时返回错误。
    pub fn build(self) -> Result<Client> {
        let api_key = self
            .api_key
            .filter(|key| !key.trim().is_empty())
            .ok_or_else(|| Error::InvalidConfig {
                message: "API key required for Gemini API".into(),
            })?;
        let options = self.http_options;

        let gemini = transport(&options, gemini_headers(&options.headers, &api_key)?)?;
        let assets = transport(&options, HeaderMap::new())?;

        Ok(Client {
            inner: Arc::new(ClientInner {
                gemini,
                assets,
                endpoint: Endpoint::new(&options),
            }),
        })
    }
}

/// 自定义头在前，API Key 最后写入并标记为敏感，不会被同名自定义头覆盖。
fn gemini_headers(extra: &HashMap<String, String>, api_key: &str) -> Result<HeaderMap> {
    let mut headers = HeaderMap::with_capacity(extra.len() + 1);
    for (key, value) in extra {
        let name = HeaderName::from_bytes(key.as_bytes()).map_err(|_| Error::InvalidConfig {
            message: format!("Invalid header name: {key}"),
        })?;
        let value = HeaderValue::from_str(value).map_err(|_| Error::InvalidConfig {
            message: format!("Invalid header value for {key}"),
        })?;
        headers.insert(name, value);
    }

    let mut key = HeaderValue::from_str(api_key).map_err(|_| Error::InvalidConfig {
        message: "Invalid API key value".into(),
    })?;
    key.set_sensitive(true);
    headers.insert(HeaderName::from_static(API_KEY_HEADER), key);
    Ok(headers)
}

fn transport(options: &HttpOptions, headers: HeaderMap) -> Result<HttpClient> {
    let mut builder = HttpClient::builder().default_headers(headers);
    if let Some(timeout) = options.timeout {
        builder = builder.timeout(timeout);
    }
    if let Some(proxy_url) = &options.proxy {
        let proxy = Proxy::all(proxy_url).map_err(|e| Error::InvalidConfig {
            message: format!("Invalid proxy: {e}"),
        })?;
        builder = builder.proxy(proxy);
    }
    Ok(builder.build()?)
}

impl ClientInner {
    /// 在创建该请求的那条通道上发送，并把非 2xx 响应转换为 `ApiError`。
    ///
    /// # Errors
    /// 当请求构建、网络请求失败或服务端返回错误状态时返回错误。
    pub async fn send(&self, request: reqwest::RequestBuilder) -> Result<reqwest::Response> {
        let (http, request) = request.build_split();
        let request = request?;
        tracing::debug!(method = %request.method(), url = %request.url(), "sending request");
        let response = http.execute(request).await?;
        if !response.status().is_success() {
            return Err(Error::ApiError {
                status: response.status().as_u16(),
                message: response.text().await.unwrap_or_default(),
            });
        }
        Ok(response)
    }
}

/// Gemini 端点位置。
pub(crate) struct Endpoint {
    pub base_url: String,
    pub api_version: String,
}

impl Endpoint {
    fn new(options: &HttpOptions) -> Self {
        let base_url = options.base_url.as_deref().map_or_else(
            || DEFAULT_BASE_URL.to_string(),
            |url| {
                let url = url.trim();
                if url.ends_with('/') {
                    url.to_string()
                } else {
                    format!("{url}/")
                }
            },
        );
        Self {
            base_url,
            api_version: options
                .api_version
                .clone()
                .unwrap_or_else(|| DEFAULT_API_VERSION.to_string()),
        }
    }
}
