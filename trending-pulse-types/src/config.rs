use serde::{Deserialize, Serialize};

use crate::enums::Modality;
use crate::schema::Schema;

/// 生成参数。
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct GenerationConfig {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub response_mime_type: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub response_schema: Option<Schema>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub response_modalities: Option<Vec<Modality>>,
}

impl GenerationConfig {
    /// 要求模型按 schema 输出 JSON。
    #[must_use]
    pub fn json(schema: Schema) -> Self {
        Self {
            response_mime_type: Some("application/json".into()),
            response_schema: Some(schema),
            ..Default::default()
        }
    }

    /// 要求模型输出图像（附带可选文本）。
    #[must_use]
    pub fn image() -> Self {
        Self {
            response_modalities: Some(vec![Modality::Text, Modality::Image]),
            ..Default::default()
        }
    }
}
