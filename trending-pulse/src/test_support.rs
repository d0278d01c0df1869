use std::collections::VecDeque;
use std::sync::Mutex;

use futures_util::future::BoxFuture;
use trending_pulse_types::catalog::{AnalysisResult, Listing};

use crate::catalog::{fallback_listings, ContentGenerator};
use crate::error::{Error, Result};
use crate::media::{ImageSource, InlineImage};
use crate::storage::FileStore;

static ENV_LOCK: Mutex<()> = Mutex::new(());

pub fn with_env(vars: &[(&str, Option<&str>)], f: impl FnOnce()) {
    let _guard = ENV_LOCK.lock().unwrap_or_else(std::sync::PoisonError::into_inner);
    let backup: Vec<(String, Option<String>)> = vars
        .iter()
        .map(|(key, _)| ((*key).to_string(), std::env::var(key).ok()))
        .collect();
    for (key, value) in vars {
        match value {
            Some(value) => std::env::set_var(key, value),
            None => std::env::remove_var(key),
        }
    }
    f();
    for (key, value) in backup {
        match value {
            Some(value) => std::env::set_var(key, value),
            None => std::env::remove_var(key),
        }
    }
}

pub fn sample_image() -> InlineImage {
    InlineImage::new(vec![1], "image/png").unwrap()
}

pub fn sample_analysis() -> AnalysisResult {
    AnalysisResult {
        name: "Aurora Desk Lamp".into(),
        category: "Home".into(),
        description: "Brushed brass lamp with a warm dimmable glow.".into(),
        suggested_price: 129.0,
    }
}

/// Scripted generator: answers are popped in order, listings come from the
/// fallback table.
#[derive(Default)]
pub struct FakeGenerator {
    analyses: Mutex<VecDeque<Result<AnalysisResult>>>,
    scenes: Mutex<VecDeque<Result<Option<InlineImage>>>>,
    listed: Mutex<Vec<String>>,
    analyzed: Mutex<usize>,
    scene_prompts: Mutex<Vec<String>>,
}

impl FakeGenerator {
    pub fn push_analysis(&self, result: Result<AnalysisResult>) {
        self.analyses.lock().unwrap().push_back(result);
    }

    pub fn push_scene(&self, result: Result<Option<InlineImage>>) {
        self.scenes.lock().unwrap().push_back(result);
    }

    pub fn listed_categories(&self) -> Vec<String> {
        self.listed.lock().unwrap().clone()
    }

    pub fn analyzed_count(&self) -> usize {
        *self.analyzed.lock().unwrap()
    }

    pub fn scene_prompts(&self) -> Vec<String> {
        self.scene_prompts.lock().unwrap().clone()
    }
}

impl ContentGenerator for FakeGenerator {
    fn list<'a>(&'a self, category: &'a str) -> BoxFuture<'a, Vec<Listing>> {
        self.listed.lock().unwrap().push(category.to_string());
        Box::pin(async move { fallback_listings(category, 2) })
    }

    fn analyze<'a>(&'a self, _image: &'a InlineImage) -> BoxFuture<'a, Result<AnalysisResult>> {
        *self.analyzed.lock().unwrap() += 1;
        let next = self.analyses.lock().unwrap().pop_front();
        Box::pin(async move { next.unwrap_or_else(|| Err(Error::malformed("no scripted analysis"))) })
    }

    fn synthesize_scene<'a>(
        &'a self,
        prompt: &'a str,
        _base_image: &'a InlineImage,
    ) -> BoxFuture<'a, Result<Option<InlineImage>>> {
        self.scene_prompts.lock().unwrap().push(prompt.to_string());
        let next = self.scenes.lock().unwrap().pop_front();
        Box::pin(async move { next.unwrap_or(Ok(None)) })
    }
}

#[derive(Default)]
pub struct FakeStore {
    results: Mutex<VecDeque<Result<String>>>,
}

impl FakeStore {
    pub fn push(&self, result: Result<String>) {
        self.results.lock().unwrap().push_back(result);
    }
}

impl FileStore for FakeStore {
    fn persist<'a>(
        &'a self,
        _analysis: &'a AnalysisResult,
        _image: &'a InlineImage,
    ) -> BoxFuture<'a, Result<String>> {
        let next = self.results.lock().unwrap().pop_front();
        Box::pin(async move { next.unwrap_or_else(|| Err(Error::malformed("no scripted upload"))) })
    }
}

pub struct FakeImages {
    image: Option<InlineImage>,
    requested: Mutex<Vec<String>>,
}

impl FakeImages {
    pub fn ok(image: InlineImage) -> Self {
        Self {
            image: Some(image),
            requested: Mutex::new(Vec::new()),
        }
    }

    pub fn failing() -> Self {
        Self {
            image: None,
            requested: Mutex::new(Vec::new()),
        }
    }

    pub fn requested(&self) -> Vec<String> {
        self.requested.lock().unwrap().clone()
    }
}

impl ImageSource for FakeImages {
    fn fetch_image<'a>(&'a self, url: &'a str) -> BoxFuture<'a, Result<InlineImage>> {
        self.requested.lock().unwrap().push(url.to_string());
        let result = self.image.clone().ok_or(Error::ApiError {
            status: 404,
            message: "reference image missing".into(),
        });
        Box::pin(async move { result })
    }
}
