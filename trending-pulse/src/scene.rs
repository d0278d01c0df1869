//! Scene generation flow: pick a subject, describe an environment, render it.

use std::fmt;
use std::path::{Path, PathBuf};

use crate::catalog::ContentGenerator;
use crate::error::{FlowError, Result};
use crate::media::{ImageSource, InlineImage};
use crate::storage::drive_thumbnail_url;

const DOWNLOAD_PREFIX: &str = "pulse-scene";

/// 可放入场景的主体（带参考图）。
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SceneSubject {
    pub id: &'static str,
    pub name: &'static str,
    pub drive_id: &'static str,
}

impl SceneSubject {
    /// 参考图地址。
    #[must_use]
    pub fn reference_url(&self) -> String {
        drive_thumbnail_url(self.drive_id)
    }
}

pub static VEHICLES: [SceneSubject; 3] = [
    SceneSubject {
        id: "car-1",
        name: "Eclipse Cross",
        drive_id: "1UKA3RauKFpZE3xYGiv3__AkEC9KYJd8S",
    },
    SceneSubject {
        id: "car-2",
        name: "Outlander",
        drive_id: "1tF-LU9FZsMQeeoNhVnS-bAwyPPVsha6v",
    },
    SceneSubject {
        id: "car-3",
        name: "Pajero Sport",
        drive_id: "1uNCfBsEt-p-bm0reRub-SReV2boOy1_K",
    },
];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SceneState {
    #[default]
    SubjectSelected,
    PromptEntered,
    Generating,
    ResultReady,
    Failed,
}

/// 面向用户的失败类型。
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SceneFailure {
    /// 服务端正常响应但没有返回图片。
    Declined,
    /// 参考图获取或生成请求失败。
    Connection,
}

impl SceneFailure {
    #[must_use]
    pub const fn message(self) -> &'static str {
        match self {
            Self::Declined => "Could not generate the image. Please try again.",
            Self::Connection => "Error connecting to Gemini Image AI.",
        }
    }
}

impl fmt::Display for SceneFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.message())
    }
}

/// 一次进行中的生成请求。
#[derive(Debug, Clone)]
pub struct SceneTicket {
    subject: SceneSubject,
    prompt: String,
}

impl SceneTicket {
    #[must_use]
    pub const fn subject(&self) -> &SceneSubject {
        &self.subject
    }

    #[must_use]
    pub fn prompt(&self) -> &str {
        &self.prompt
    }
}

/// 场景生成流程控制器。任何时刻都恰好选中一个主体。
#[derive(Debug)]
pub struct SceneFlow {
    subjects: &'static [SceneSubject],
    selected: usize,
    prompt: String,
    state: SceneState,
    result: Option<InlineImage>,
    failure: Option<SceneFailure>,
}

impl Default for SceneFlow {
    fn default() -> Self {
        Self {
            subjects: &VEHICLES,
            selected: 0,
            prompt: String::new(),
            state: SceneState::SubjectSelected,
            result: None,
            failure: None,
        }
    }
}

impl SceneFlow {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub const fn subjects(&self) -> &'static [SceneSubject] {
        self.subjects
    }

    #[must_use]
    pub fn selected(&self) -> &SceneSubject {
        &self.subjects[self.selected]
    }

    #[must_use]
    pub fn prompt(&self) -> &str {
        &self.prompt
    }

    #[must_use]
    pub const fn state(&self) -> SceneState {
        self.state
    }

    #[must_use]
    pub const fn result(&self) -> Option<&InlineImage> {
        self.result.as_ref()
    }

    #[must_use]
    pub const fn failure(&self) -> Option<SceneFailure> {
        self.failure
    }

    #[must_use]
    pub fn is_generating(&self) -> bool {
        self.state == SceneState::Generating
    }

    /// 切换主体，同时清空结果、失败信息与提示词。重选当前主体不做任何改动。
    ///
    /// # Errors
    /// 生成进行中返回 [`FlowError::Busy`]，未知 id 返回
    /// [`FlowError::UnknownSubject`]。
    pub fn select_subject(&mut self, id: &str) -> std::result::Result<(), FlowError> {
        if self.is_generating() {
            return Err(FlowError::Busy);
        }
        let index = self
            .subjects
            .iter()
            .position(|subject| subject.id == id)
            .ok_or(FlowError::UnknownSubject)?;
        if index == self.selected {
            return Ok(());
        }
        self.selected = index;
        self.prompt.clear();
        self.result = None;
        self.failure = None;
        self.state = SceneState::SubjectSelected;
        Ok(())
    }

    /// # Errors
    /// 生成进行中返回 [`FlowError::Busy`]。
    pub fn set_prompt(&mut self, text: impl Into<String>) -> std::result::Result<(), FlowError> {
        if self.is_generating() {
            return Err(FlowError::Busy);
        }
        self.prompt = text.into();
        self.state = if self.prompt.trim().is_empty() {
            SceneState::SubjectSelected
        } else {
            SceneState::PromptEntered
        };
        Ok(())
    }

    #[must_use]
    pub fn can_generate(&self) -> bool {
        !self.prompt.trim().is_empty() && !self.is_generating()
    }

    /// # Errors
    /// 生成进行中返回 [`FlowError::Busy`]，提示词为空返回
    /// [`FlowError::EmptyPrompt`]。
    pub fn begin_generation(&mut self) -> std::result::Result<SceneTicket, FlowError> {
        if self.is_generating() {
            return Err(FlowError::Busy);
        }
        let prompt = self.prompt.trim();
        if prompt.is_empty() {
            return Err(FlowError::EmptyPrompt);
        }
        let ticket = SceneTicket {
            subject: *self.selected(),
            prompt: prompt.to_string(),
        };
        self.failure = None;
        self.state = SceneState::Generating;
        Ok(ticket)
    }

    /// 应用生成结果。失败时保留之前的结果。
    pub fn finish_generation(&mut self, ticket: SceneTicket, outcome: Result<Option<InlineImage>>) {
        match outcome {
            Ok(Some(image)) => {
                self.result = Some(image);
                self.failure = None;
                self.state = SceneState::ResultReady;
            }
            Ok(None) => {
                tracing::warn!(subject = ticket.subject.id, "scene generation returned no image");
                self.failure = Some(SceneFailure::Declined);
                self.state = SceneState::Failed;
            }
            Err(err) => {
                tracing::error!(subject = ticket.subject.id, error = %err, "scene generation failed");
                self.failure = Some(SceneFailure::Connection);
                self.state = SceneState::Failed;
            }
        }
    }

    /// 获取主体参考图并生成场景。
    ///
    /// # Errors
    /// 守卫不满足时返回 [`FlowError`]；生成失败记录在
    /// [`SceneFlow::failure`] 中。
    pub async fn generate(
        &mut self,
        generator: &dyn ContentGenerator,
        images: &dyn ImageSource,
    ) -> std::result::Result<(), FlowError> {
        let ticket = self.begin_generation()?;
        let outcome = match images.fetch_image(&ticket.subject.reference_url()).await {
            Ok(base) => generator.synthesize_scene(&ticket.prompt, &base).await,
            Err(err) => Err(err),
        };
        self.finish_generation(ticket, outcome);
        Ok(())
    }

    /// 把当前结果保存到目录中。
    ///
    /// # Errors
    /// 没有结果时返回 [`FlowError::NoResult`]；写文件失败时返回 IO 错误。
    pub async fn download(&self, dir: impl AsRef<Path>) -> Result<PathBuf> {
        let image = self.result.as_ref().ok_or(FlowError::NoResult)?;
        crate::download::save_image(dir, DOWNLOAD_PREFIX, image).await
    }
}
