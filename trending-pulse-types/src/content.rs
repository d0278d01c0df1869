use crate::base64_serde;
use serde::{Deserialize, Serialize};

/// 一轮对话内容。
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Content {
    /// 角色：user/model。
    #[serde(skip_serializing_if = "Option::is_none")]
    pub role: Option<Role>,
    #[serde(default)]
    pub parts: Vec<Part>,
}

impl Content {
    /// 创建用户文本消息。
    pub fn user(text: impl Into<String>) -> Self {
        Self::from_parts(vec![Part::text(text)], Role::User)
    }

    /// 从 parts 构建内容。
    #[must_use]
    pub const fn from_parts(parts: Vec<Part>, role: Role) -> Self {
        Self {
            role: Some(role),
            parts,
        }
    }

    /// 拼接所有非思考文本片段。
    ///
    /// JSON 模式下模型偶尔会把输出拆成多个 text part。
    #[must_use]
    pub fn joined_text(&self) -> Option<String> {
        let mut texts = self
            .parts
            .iter()
            .filter(|part| part.thought != Some(true))
            .filter_map(Part::text_value)
            .peekable();
        texts.peek()?;
        Some(texts.collect())
    }

    /// 第一个非空内联数据。
    #[must_use]
    pub fn first_inline_data(&self) -> Option<&Blob> {
        self.parts
            .iter()
            .filter_map(Part::inline_data_ref)
            .find(|blob| !blob.data.is_empty())
    }
}

/// 内容角色。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
    Model,
}

/// 内容片段。
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Part {
    #[serde(flatten)]
    pub kind: PartKind,
    /// 是否为思考内容。
    #[serde(skip_serializing_if = "Option::is_none")]
    pub thought: Option<bool>,
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        with = "base64_serde::option"
    )]
    pub thought_signature: Option<Vec<u8>>,
}

impl Part {
    /// 文本 Part。
    pub fn text(text: impl Into<String>) -> Self {
        Self::from_kind(PartKind::Text { text: text.into() })
    }

    /// 内联二进制 Part（图片等）。
    pub fn inline_data(data: Vec<u8>, mime_type: impl Into<String>) -> Self {
        Self::from_kind(PartKind::InlineData {
            inline_data: Blob {
                mime_type: mime_type.into(),
                data,
            },
        })
    }

    const fn from_kind(kind: PartKind) -> Self {
        Self {
            kind,
            thought: None,
            thought_signature: None,
        }
    }

    #[must_use]
    pub const fn text_value(&self) -> Option<&str> {
        match &self.kind {
            PartKind::Text { text } => Some(text.as_str()),
            _ => None,
        }
    }

    #[must_use]
    pub const fn inline_data_ref(&self) -> Option<&Blob> {
        match &self.kind {
            PartKind::InlineData { inline_data } => Some(inline_data),
            _ => None,
        }
    }
}

/// Part 的具体变体。
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", untagged)]
pub enum PartKind {
    Text {
        text: String,
    },
    InlineData {
        #[serde(rename = "inlineData")]
        inline_data: Blob,
    },
}

/// 二进制数据（传输时为 base64）。
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Blob {
    pub mime_type: String,
    #[serde(with = "base64_serde")]
    pub data: Vec<u8>,
}
