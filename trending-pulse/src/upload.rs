//! Upload and analyze flow: select an image, analyze it, persist the result.

use trending_pulse_types::catalog::{AnalysisResult, SavedItem};

use crate::catalog::ContentGenerator;
use crate::error::{FlowError, Result};
use crate::media::InlineImage;
use crate::storage::FileStore;

/// 上传流程的状态。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum UploadState {
    #[default]
    Idle,
    ImageSelected,
    Analyzing,
    AnalysisReady,
    Saving,
    Done,
}

/// 一次进行中的分析请求。
///
/// 由 [`UploadFlow::begin_analysis`] 发出，结果通过
/// [`UploadFlow::finish_analysis`] 交回。图片被更换后旧票据作废。
#[derive(Debug, Clone)]
pub struct AnalysisTicket {
    epoch: u64,
    image: InlineImage,
}

impl AnalysisTicket {
    #[must_use]
    pub const fn image(&self) -> &InlineImage {
        &self.image
    }
}

/// 一次进行中的保存请求。
#[derive(Debug, Clone)]
pub struct PersistTicket {
    analysis: AnalysisResult,
    image: InlineImage,
    preview_url: String,
}

impl PersistTicket {
    #[must_use]
    pub const fn analysis(&self) -> &AnalysisResult {
        &self.analysis
    }

    #[must_use]
    pub const fn image(&self) -> &InlineImage {
        &self.image
    }
}

/// 上传/分析流程控制器。
///
/// 同一时刻最多只有一个分析或保存请求在途；失败时回退到上一个稳定状态，
/// 并把错误信息记在 [`UploadFlow::last_failure`]。
#[derive(Debug, Default)]
pub struct UploadFlow {
    state: UploadState,
    image: Option<InlineImage>,
    preview_url: Option<String>,
    analysis: Option<AnalysisResult>,
    last_failure: Option<String>,
    epoch: u64,
}

impl UploadFlow {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub const fn state(&self) -> UploadState {
        self.state
    }

    #[must_use]
    pub const fn image(&self) -> Option<&InlineImage> {
        self.image.as_ref()
    }

    /// 所选图片的 `data:` URL 预览。
    #[must_use]
    pub fn preview_url(&self) -> Option<&str> {
        self.preview_url.as_deref()
    }

    #[must_use]
    pub const fn analysis(&self) -> Option<&AnalysisResult> {
        self.analysis.as_ref()
    }

    /// 最近一次分析或保存失败的原因；下一次成功或换图时清空。
    #[must_use]
    pub fn last_failure(&self) -> Option<&str> {
        self.last_failure.as_deref()
    }

    #[must_use]
    pub fn is_analyzing(&self) -> bool {
        self.state == UploadState::Analyzing
    }

    #[must_use]
    pub fn is_saving(&self) -> bool {
        self.state == UploadState::Saving
    }

    /// 选择新图片，丢弃之前的分析结果。
    ///
    /// # Errors
    /// 分析或保存进行中时返回 [`FlowError::Busy`]。
    pub fn select_image(&mut self, image: InlineImage) -> std::result::Result<(), FlowError> {
        if matches!(self.state, UploadState::Analyzing | UploadState::Saving) {
            return Err(FlowError::Busy);
        }
        self.preview_url = Some(image.to_data_url());
        self.image = Some(image);
        self.analysis = None;
        self.last_failure = None;
        self.epoch += 1;
        self.state = UploadState::ImageSelected;
        Ok(())
    }

    /// 放弃当前图片与分析结果，回到 `Idle`。已经是 `Idle` 时什么都不做。
    ///
    /// 分析进行中也可以换图，迟到的分析结果会被丢弃。
    ///
    /// # Errors
    /// 保存进行中时返回 [`FlowError::Busy`]。
    pub fn change_image(&mut self) -> std::result::Result<(), FlowError> {
        match self.state {
            UploadState::Idle => Ok(()),
            UploadState::Saving => Err(FlowError::Busy),
            _ => {
                self.image = None;
                self.preview_url = None;
                self.analysis = None;
                self.last_failure = None;
                self.epoch += 1;
                self.state = UploadState::Idle;
                Ok(())
            }
        }
    }

    /// # Errors
    /// 没有图片时返回 [`FlowError::NoImage`]；其他请求在途或流程已结束时返回
    /// [`FlowError::Busy`]。
    pub fn begin_analysis(&mut self) -> std::result::Result<AnalysisTicket, FlowError> {
        match self.state {
            UploadState::ImageSelected => {}
            UploadState::Idle => return Err(FlowError::NoImage),
            _ => return Err(FlowError::Busy),
        }
        let image = self.image.clone().ok_or(FlowError::NoImage)?;
        self.state = UploadState::Analyzing;
        Ok(AnalysisTicket {
            epoch: self.epoch,
            image,
        })
    }

    /// 应用分析结果。返回 `false` 表示票据已过期，结果被丢弃。
    pub fn finish_analysis(&mut self, ticket: AnalysisTicket, result: Result<AnalysisResult>) -> bool {
        if ticket.epoch != self.epoch || self.state != UploadState::Analyzing {
            tracing::debug!("dropping analysis for a replaced image");
            return false;
        }
        match result {
            Ok(analysis) => {
                self.analysis = Some(analysis);
                self.last_failure = None;
                self.state = UploadState::AnalysisReady;
            }
            Err(err) => {
                tracing::error!(error = %err, "analysis failed");
                self.analysis = None;
                self.last_failure = Some(err.to_string());
                self.state = UploadState::ImageSelected;
            }
        }
        true
    }

    /// 分析当前图片并等待结果。
    ///
    /// # Errors
    /// 守卫不满足时返回 [`FlowError`]；分析本身的失败记录在
    /// [`UploadFlow::last_failure`] 中。
    pub async fn analyze_selected(
        &mut self,
        generator: &dyn ContentGenerator,
    ) -> std::result::Result<(), FlowError> {
        let ticket = self.begin_analysis()?;
        let result = generator.analyze(ticket.image()).await;
        self.finish_analysis(ticket, result);
        Ok(())
    }

    /// 选中图片后立即开始分析；分析失败时保留图片，可用
    /// [`UploadFlow::analyze_selected`] 重试。
    ///
    /// # Errors
    /// 分析或保存进行中时返回 [`FlowError::Busy`]。
    pub async fn select_and_analyze(
        &mut self,
        image: InlineImage,
        generator: &dyn ContentGenerator,
    ) -> std::result::Result<(), FlowError> {
        self.select_image(image)?;
        self.analyze_selected(generator).await
    }

    /// 是否可以保存：已有分析结果且没有保存在途。
    #[must_use]
    pub fn can_persist(&self) -> bool {
        self.analysis.is_some() && self.state == UploadState::AnalysisReady
    }

    /// # Errors
    /// 没有分析结果时返回 [`FlowError::NoAnalysis`]，保存在途时返回
    /// [`FlowError::Busy`]。
    pub fn begin_persist(&mut self) -> std::result::Result<PersistTicket, FlowError> {
        let analysis = self.analysis.clone().ok_or(FlowError::NoAnalysis)?;
        if self.state != UploadState::AnalysisReady {
            return Err(FlowError::Busy);
        }
        let image = self.image.clone().ok_or(FlowError::NoImage)?;
        let preview_url = self.preview_url.clone().unwrap_or_else(|| image.to_data_url());
        self.state = UploadState::Saving;
        Ok(PersistTicket {
            analysis,
            image,
            preview_url,
        })
    }

    /// 应用保存结果，成功时返回新条目。
    pub fn finish_persist(&mut self, ticket: PersistTicket, result: Result<String>) -> Option<SavedItem> {
        match result {
            Ok(location) => {
                let id = format!("user-{}", crate::unix_millis());
                let listing = ticket.analysis.into_listing(id, ticket.preview_url);
                self.last_failure = None;
                self.state = UploadState::Done;
                Some(SavedItem::new(listing, location))
            }
            Err(err) => {
                tracing::error!(error = %err, "upload failed");
                self.last_failure = Some(err.to_string());
                self.state = UploadState::AnalysisReady;
                None
            }
        }
    }

    /// 保存当前分析结果。
    ///
    /// # Errors
    /// 守卫不满足时返回 [`FlowError`]。保存失败时返回 `Ok(None)`，原因见
    /// [`UploadFlow::last_failure`]。
    pub async fn persist(
        &mut self,
        store: &dyn FileStore,
    ) -> std::result::Result<Option<SavedItem>, FlowError> {
        let ticket = self.begin_persist()?;
        let result = store.persist(ticket.analysis(), ticket.image()).await;
        Ok(self.finish_persist(ticket, result))
    }
}
