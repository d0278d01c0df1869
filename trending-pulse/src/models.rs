//! Raw `generateContent` calls.

use std::sync::Arc;

use serde_json::Value;
use trending_pulse_types::content::Content;
use trending_pulse_types::config::GenerationConfig;
use trending_pulse_types::models::GenerateContentRequest;
use trending_pulse_types::response::GenerateContentResponse;

use crate::client::ClientInner;
use crate::error::{Error, Result};

#[derive(Clone)]
pub struct Models {
    pub(crate) inner: Arc<ClientInner>,
}

impl Models {
    pub(crate) fn new(inner: Arc<ClientInner>) -> Self {
        Self { inner }
    }

    /// 生成内容。单次请求，不重试。
    ///
    /// # Errors
    /// 当网络请求失败、服务端返回错误或响应无法解析时返回错误。
    pub async fn generate_content(
        &self,
        model: impl Into<String>,
        contents: Vec<Content>,
        generation_config: GenerationConfig,
    ) -> Result<GenerateContentResponse> {
        let model = model.into();
        if contents.is_empty() {
            return Err(Error::InvalidInput {
                message: "contents must not be empty".into(),
            });
        }

        let request = GenerateContentRequest::new(contents, generation_config);
        let url = build_model_method_url(&self.inner, &model, "generateContent");
        let response = self
            .inner
            .send(self.inner.gemini.post(url).json(&request))
            .await?;
        let value = response.json::<Value>().await?;
        parse_generate_content_response(value)
    }
}

fn parse_generate_content_response(value: Value) -> Result<GenerateContentResponse> {
    serde_json::from_value(value).map_err(|err| {
        Error::malformed(format!("generateContent response did not parse: {err}"))
    })
}

pub(crate) fn transform_model_name(model: &str) -> String {
    if model.starts_with("models/") {
        model.to_string()
    } else {
        format!("models/{model}")
    }
}

pub(crate) fn build_model_method_url(inner: &ClientInner, model: &str, method: &str) -> String {
    let model = transform_model_name(model);
    let base = &inner.endpoint.base_url;
    let version = &inner.endpoint.api_version;
    format!("{base}{version}/{model}:{method}")
}
