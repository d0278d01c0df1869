//! Top-level session state: categories, listings, saved items and the flows.

use std::path::Path;
use std::time::{Duration, Instant};

use trending_pulse_types::catalog::{Listing, SavedItem};

use crate::carousel::Carousel;
use crate::catalog::ContentGenerator;
use crate::config::ShowcaseConfig;
use crate::error::FlowError;
use crate::media::InlineImage;
use crate::scene::SceneFlow;
use crate::spotlight::Spotlight;
use crate::storage::{drive_file_url, drive_thumbnail_url, FileStore};
use crate::upload::UploadFlow;

pub const DEFAULT_CATEGORY: &str = "electronics";

const UPLOAD_NOTICE: &str = "Product successfully uploaded to Google Drive!";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Category {
    pub id: &'static str,
    pub label: &'static str,
}

pub static CATEGORIES: [Category; 4] = [
    Category {
        id: "electronics",
        label: "Tech",
    },
    Category {
        id: "vehicles",
        label: "Vehicles",
    },
    Category {
        id: "fashion",
        label: "Fashion",
    },
    Category {
        id: "home-decor",
        label: "Home",
    },
];

/// 短暂显示的成功提示。
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    message: String,
    url: Option<String>,
    expires_at: Instant,
}

impl Notice {
    fn new(message: impl Into<String>, url: Option<String>, ttl: Duration) -> Self {
        Self {
            message: message.into(),
            url,
            expires_at: Instant::now() + ttl,
        }
    }

    #[must_use]
    pub fn message(&self) -> &str {
        &self.message
    }

    #[must_use]
    pub fn url(&self) -> Option<&str> {
        self.url.as_deref()
    }

    #[must_use]
    pub const fn expires_at(&self) -> Instant {
        self.expires_at
    }

    #[must_use]
    pub fn is_expired(&self, now: Instant) -> bool {
        now >= self.expires_at
    }
}

/// 会话内的全部状态。
///
/// 列表与已保存条目只存在于这里，流程控制器通过它访问。
#[derive(Debug)]
pub struct Showcase {
    config: ShowcaseConfig,
    category: String,
    listings: Vec<Listing>,
    loading: bool,
    saved: Vec<SavedItem>,
    upload: Option<UploadFlow>,
    scene: SceneFlow,
    spotlight: Spotlight,
    carousel: Carousel,
    notice: Option<Notice>,
}

impl Default for Showcase {
    fn default() -> Self {
        Self::new(ShowcaseConfig::default())
    }
}

impl Showcase {
    #[must_use]
    pub fn new(config: ShowcaseConfig) -> Self {
        Self {
            config,
            category: DEFAULT_CATEGORY.to_string(),
            listings: Vec::new(),
            loading: false,
            saved: seeded_saved_items(),
            upload: None,
            scene: SceneFlow::new(),
            spotlight: Spotlight::new(),
            carousel: Carousel::default(),
            notice: None,
        }
    }

    #[must_use]
    pub const fn config(&self) -> &ShowcaseConfig {
        &self.config
    }

    #[must_use]
    pub fn categories(&self) -> &'static [Category] {
        &CATEGORIES
    }

    #[must_use]
    pub fn active_category(&self) -> &str {
        &self.category
    }

    #[must_use]
    pub fn listings(&self) -> &[Listing] {
        &self.listings
    }

    #[must_use]
    pub const fn is_loading(&self) -> bool {
        self.loading
    }

    /// 切换分类并进入加载状态。当前列表保留到新结果到达。
    pub fn begin_listing_fetch(&mut self, category: impl Into<String>) {
        self.category = category.into();
        self.loading = true;
    }

    /// 无条件覆盖当前列表。
    ///
    /// 多个请求并发时最后完成的那个生效，不做顺序校验。
    pub fn apply_listings(&mut self, listings: Vec<Listing>) {
        if let Some(first) = listings.first() {
            if first.category != self.category {
                tracing::debug!(
                    active = %self.category,
                    received = %first.category,
                    "listings arrived for a different category"
                );
            }
        }
        self.listings = listings;
        self.loading = false;
    }

    /// 重新拉取当前分类的列表。
    pub async fn refresh_listings(&mut self, generator: &dyn ContentGenerator) {
        let category = self.category.clone();
        self.switch_category(category, generator).await;
    }

    pub async fn switch_category(&mut self, category: impl Into<String>, generator: &dyn ContentGenerator) {
        self.begin_listing_fetch(category);
        let listings = generator.list(&self.category).await;
        self.apply_listings(listings);
    }

    /// 已保存条目，最新的在前。
    #[must_use]
    pub fn saved_items(&self) -> &[SavedItem] {
        &self.saved
    }

    /// 打开上传面板；已打开时返回现有流程。
    pub fn open_upload(&mut self) -> &mut UploadFlow {
        self.upload.get_or_insert_with(UploadFlow::new)
    }

    #[must_use]
    pub const fn upload(&self) -> Option<&UploadFlow> {
        self.upload.as_ref()
    }

    pub fn upload_mut(&mut self) -> Option<&mut UploadFlow> {
        self.upload.as_mut()
    }

    /// 关闭上传面板并丢弃其状态。
    ///
    /// # Errors
    /// 保存进行中时返回 [`FlowError::Busy`]。
    pub fn cancel_upload(&mut self) -> Result<(), FlowError> {
        if self.upload.as_ref().is_some_and(UploadFlow::is_saving) {
            return Err(FlowError::Busy);
        }
        self.upload = None;
        Ok(())
    }

    /// 记录一次成功上传：插到最前、关闭面板并显示提示。
    pub fn complete_upload(&mut self, item: SavedItem) {
        let url = item.location().to_string();
        self.saved.insert(0, item);
        self.upload = None;
        self.notice = Some(Notice::new(
            UPLOAD_NOTICE,
            Some(url),
            self.config.notice_duration,
        ));
    }

    /// 在上传面板中选中图片并立即分析，面板未打开时先打开。
    ///
    /// # Errors
    /// 分析或保存进行中时返回 [`FlowError::Busy`]。
    pub async fn select_upload_image(
        &mut self,
        image: InlineImage,
        generator: &dyn ContentGenerator,
    ) -> Result<(), FlowError> {
        self.open_upload().select_and_analyze(image, generator).await
    }

    /// 读取本地 JPEG/PNG 文件后同 [`Showcase::select_upload_image`]。
    ///
    /// # Errors
    /// 文件不可读或类型不受支持时返回错误，流程守卫失败时返回 [`crate::Error::Flow`]。
    pub async fn select_upload_file(
        &mut self,
        path: impl AsRef<Path>,
        generator: &dyn ContentGenerator,
    ) -> crate::Result<()> {
        let image = InlineImage::from_path(path).await?;
        self.select_upload_image(image, generator).await?;
        Ok(())
    }

    /// 重新分析上传面板中的图片，用于失败后的重试。
    ///
    /// # Errors
    /// 面板未打开或守卫不满足时返回 [`FlowError`]。
    pub async fn analyze_upload(&mut self, generator: &dyn ContentGenerator) -> Result<(), FlowError> {
        let flow = self.upload.as_mut().ok_or(FlowError::NoImage)?;
        flow.analyze_selected(generator).await
    }

    /// 保存上传面板中的分析结果，成功时返回 `true`。
    ///
    /// # Errors
    /// 面板未打开或守卫不满足时返回 [`FlowError`]。
    pub async fn persist_upload(&mut self, store: &dyn FileStore) -> Result<bool, FlowError> {
        let flow = self.upload.as_mut().ok_or(FlowError::NoAnalysis)?;
        match flow.persist(store).await? {
            Some(item) => {
                self.complete_upload(item);
                Ok(true)
            }
            None => Ok(false),
        }
    }

    /// 仍在有效期内的提示。
    #[must_use]
    pub fn active_notice(&self, now: Instant) -> Option<&Notice> {
        self.notice.as_ref().filter(|notice| !notice.is_expired(now))
    }

    pub fn dismiss_notice(&mut self) {
        self.notice = None;
    }

    #[must_use]
    pub const fn scene(&self) -> &SceneFlow {
        &self.scene
    }

    pub fn scene_mut(&mut self) -> &mut SceneFlow {
        &mut self.scene
    }

    #[must_use]
    pub const fn spotlight(&self) -> &Spotlight {
        &self.spotlight
    }

    pub fn spotlight_mut(&mut self) -> &mut Spotlight {
        &mut self.spotlight
    }

    #[must_use]
    pub const fn carousel(&self) -> &Carousel {
        &self.carousel
    }

    pub fn carousel_mut(&mut self) -> &mut Carousel {
        &mut self.carousel
    }
}

/// 预先分析好的三款车型。
#[must_use]
pub fn seeded_saved_items() -> Vec<SavedItem> {
    [
        (
            "car-1",
            "Mitsubishi Eclipse Cross",
            25_900.0,
            "A sophisticated silver compact SUV featuring a bold dynamic shield design and \
advanced Super All-Wheel Control.",
            "1UKA3RauKFpZE3xYGiv3__AkEC9KYJd8S",
        ),
        (
            "car-2",
            "Mitsubishi Outlander",
            31_500.0,
            "Next-gen luxury SUV with white pearl finish, MI-PILOT safety tech, and premium \
interior comfort.",
            "1tF-LU9FZsMQeeoNhVnS-bAwyPPVsha6v",
        ),
        (
            "car-3",
            "Mitsubishi Pajero Sport",
            48_900.0,
            "Rugged off-road capability meets high-torque diesel performance. Built for the \
toughest terrain.",
            "1uNCfBsEt-p-bm0reRub-SReV2boOy1_K",
        ),
    ]
    .into_iter()
    .map(|(id, name, price, description, drive_id)| {
        let listing = Listing {
            id: id.to_string(),
            name: name.to_string(),
            price,
            category: "Vehicles".to_string(),
            description: description.to_string(),
            image_url: drive_thumbnail_url(drive_id),
        };
        SavedItem::new(listing, drive_file_url(drive_id))
    })
    .collect()
}
