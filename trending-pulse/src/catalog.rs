//! Content generation: listings, image analysis and scene synthesis.

use futures_util::future::BoxFuture;
use trending_pulse_types::catalog::{AnalysisResult, Listing};
use trending_pulse_types::config::GenerationConfig;
use trending_pulse_types::content::{Content, Part, Role};
use trending_pulse_types::response::GenerateContentResponse;
use trending_pulse_types::schema::Schema;

use crate::config::ShowcaseConfig;
use crate::error::{Error, Result};
use crate::media::InlineImage;
use crate::models::Models;

const ANALYSIS_PROMPT: &str = "Identify this product and provide a creative name, category, \
detailed description, and a suggested market price in USD.";

const FALLBACK_DESCRIPTION: &str =
    "A high-quality product generated for your premium shopping experience.";

/// 三类生成调用。每次调用只发一次请求，不重试。
///
/// `list` 吸收所有失败并返回占位商品；`analyze` 与 `synthesize_scene`
/// 的失败会原样返回给调用方。
pub trait ContentGenerator: Send + Sync {
    fn list<'a>(&'a self, category: &'a str) -> BoxFuture<'a, Vec<Listing>>;

    fn analyze<'a>(&'a self, image: &'a InlineImage) -> BoxFuture<'a, Result<AnalysisResult>>;

    /// `Ok(None)` 表示服务端正常响应但没有给出图片。
    fn synthesize_scene<'a>(
        &'a self,
        prompt: &'a str,
        base_image: &'a InlineImage,
    ) -> BoxFuture<'a, Result<Option<InlineImage>>>;
}

/// 基于 Gemini 的生成客户端。
#[derive(Clone)]
pub struct Catalog {
    models: Models,
    text_model: String,
    image_model: String,
    listing_count: usize,
}

impl Catalog {
    pub(crate) fn new(models: Models, config: &ShowcaseConfig) -> Self {
        Self {
            models,
            text_model: config.text_model.clone(),
            image_model: config.image_model.clone(),
            listing_count: config.listing_count,
        }
    }

    #[must_use]
    pub const fn listing_count(&self) -> usize {
        self.listing_count
    }

    /// 生成商品列表，失败时返回错误而不是占位数据。
    ///
    /// # Errors
    /// 当请求失败或响应不满足 schema 时返回错误。
    pub async fn try_list(&self, category: &str) -> Result<Vec<Listing>> {
        let prompt = listing_prompt(self.listing_count, category);
        let config = GenerationConfig::json(listing_schema(self.listing_count));
        let response = self
            .models
            .generate_content(&self.text_model, vec![Content::user(prompt)], config)
            .await?;
        parse_listings(&response, self.listing_count)
    }

    async fn analyze_image(&self, image: &InlineImage) -> Result<AnalysisResult> {
        let contents = vec![Content::from_parts(
            vec![image.to_part(), Part::text(ANALYSIS_PROMPT)],
            Role::User,
        )];
        let response = self
            .models
            .generate_content(&self.text_model, contents, GenerationConfig::json(analysis_schema()))
            .await?;
        parse_analysis(&response)
    }

    async fn synthesize(&self, prompt: &str, base_image: &InlineImage) -> Result<Option<InlineImage>> {
        if prompt.trim().is_empty() {
            return Err(Error::InvalidInput {
                message: "scene prompt is empty".into(),
            });
        }
        let contents = vec![Content::from_parts(
            vec![base_image.to_part(), Part::text(scene_prompt(prompt.trim()))],
            Role::User,
        )];
        let response = self
            .models
            .generate_content(&self.image_model, contents, GenerationConfig::image())
            .await?;
        extract_scene_image(&response)
    }
}

impl ContentGenerator for Catalog {
    fn list<'a>(&'a self, category: &'a str) -> BoxFuture<'a, Vec<Listing>> {
        Box::pin(async move {
            match self.try_list(category).await {
                Ok(listings) => listings,
                Err(err) => {
                    tracing::warn!(category, error = %err, "listing generation failed, using placeholders");
                    fallback_listings(category, self.listing_count)
                }
            }
        })
    }

    fn analyze<'a>(&'a self, image: &'a InlineImage) -> BoxFuture<'a, Result<AnalysisResult>> {
        Box::pin(self.analyze_image(image))
    }

    fn synthesize_scene<'a>(
        &'a self,
        prompt: &'a str,
        base_image: &'a InlineImage,
    ) -> BoxFuture<'a, Result<Option<InlineImage>>> {
        Box::pin(self.synthesize(prompt, base_image))
    }
}

fn listing_prompt(count: usize, category: &str) -> String {
    format!(
        "Generate {count} unique, high-end trending products in the {category} category. \
For imageUrl, use a high quality unsplash link like https://images.unsplash.com/photo-... \
with relevant keywords. Each product should have a unique, creative name and description."
    )
}

fn scene_prompt(environment: &str) -> String {
    format!(
        "Generate a hyper-realistic, professional automotive commercial scene. \
Place the car from the image into this environment: {environment}. \
Maintain the car's color and model accurately. 8k resolution, cinematic lighting, \
dramatic atmosphere."
    )
}

fn listing_schema(count: usize) -> Schema {
    let item = Schema::object()
        .required_property("id", Schema::string())
        .required_property("name", Schema::string())
        .required_property("price", Schema::number())
        .required_property("category", Schema::string())
        .required_property("description", Schema::string())
        .required_property("imageUrl", Schema::string())
        .build();
    let count = i64::try_from(count).unwrap_or(i64::MAX);
    Schema::array().items(item).item_count(count, count).build()
}

fn analysis_schema() -> Schema {
    Schema::object()
        .required_property("name", Schema::string())
        .required_property("category", Schema::string())
        .required_property("description", Schema::string())
        .required_property("suggestedPrice", Schema::number())
        .build()
}

fn response_json(response: &GenerateContentResponse) -> Result<String> {
    let text = response
        .text()
        .ok_or_else(|| Error::malformed("response carried no text"))?;
    Ok(strip_code_fence(&text).to_string())
}

/// 去掉模型偶尔包裹在 JSON 外的 Markdown 代码块。
fn strip_code_fence(text: &str) -> &str {
    let trimmed = text.trim();
    let Some(inner) = trimmed.strip_prefix("```") else {
        return trimmed;
    };
    let inner = inner.strip_prefix("json").unwrap_or(inner);
    inner.strip_suffix("```").unwrap_or(inner).trim()
}

fn parse_listings(response: &GenerateContentResponse, count: usize) -> Result<Vec<Listing>> {
    let text = response_json(response)?;
    let mut listings: Vec<Listing> = serde_json::from_str(&text)?;
    if listings.len() < count {
        return Err(Error::malformed(format!(
            "expected {count} listings, got {}",
            listings.len()
        )));
    }
    listings.truncate(count);
    for (index, listing) in listings.iter().enumerate() {
        listing
            .validate()
            .map_err(|err| Error::malformed(format!("listing {index}: {err}")))?;
    }
    Ok(listings)
}

fn parse_analysis(response: &GenerateContentResponse) -> Result<AnalysisResult> {
    let text = response_json(response)?;
    let analysis: AnalysisResult = serde_json::from_str(&text)?;
    analysis
        .validate()
        .map_err(|err| Error::malformed(format!("analysis: {err}")))?;
    Ok(analysis)
}

fn extract_scene_image(response: &GenerateContentResponse) -> Result<Option<InlineImage>> {
    if let Some(reason) = response.block_reason() {
        tracing::debug!(?reason, "scene prompt was blocked");
        return Ok(None);
    }
    match response.first_inline_data() {
        Some(blob) => InlineImage::from_blob(blob).map(Some),
        None => {
            tracing::debug!(finish_reason = ?response.finish_reason(), "scene response had no image");
            Ok(None)
        }
    }
}

/// 生成失败时的占位商品，对同一分类总是相同。
#[must_use]
pub fn fallback_listings(category: &str, count: usize) -> Vec<Listing> {
    (0..count)
        .map(|index| Listing {
            id: format!("fallback-{index}"),
            name: format!("Premium Product {}", index + 1),
            price: fallback_price(index),
            category: category.to_string(),
            description: FALLBACK_DESCRIPTION.to_string(),
            image_url: format!("https://picsum.photos/seed/{}/600/400", index + 123),
        })
        .collect()
}

fn fallback_price(index: usize) -> f64 {
    let step = (index * 137 + 41) % 900;
    // 步长不超过 900，转换无损。
    #[allow(clippy::cast_precision_loss)]
    let step = step as f64;
    99.0 + step
}
