//! Featured vehicle spotlight.

use crate::storage::drive_thumbnail_url;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SpotlightSpec {
    pub label: &'static str,
    pub value: &'static str,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SpotlightItem {
    pub id: &'static str,
    pub title: &'static str,
    pub subtitle: &'static str,
    pub description: &'static str,
    pub drive_id: &'static str,
    pub specs: [SpotlightSpec; 2],
}

pub static SPOTLIGHT_ITEMS: [SpotlightItem; 3] = [
    SpotlightItem {
        id: "car-1",
        title: "Mitsubishi Eclipse Cross",
        subtitle: "PHEV Sport Edition",
        description: "Experience the perfect fusion of electric efficiency and SUV versatility. \
The silver diamond finish catches every light, while the sophisticated all-wheel control system \
keeps you grounded in any terrain.",
        drive_id: "1UKA3RauKFpZE3xYGiv3__AkEC9KYJd8S",
        specs: [
            SpotlightSpec {
                label: "Performance",
                value: "Super All-Wheel Control",
            },
            SpotlightSpec {
                label: "Efficiency",
                value: "Dual Motor PHEV",
            },
        ],
    },
    SpotlightItem {
        id: "car-2",
        title: "Mitsubishi Outlander",
        subtitle: "Next-Gen Luxury",
        description: "A bold, white pearl masterpiece designed for the modern family. Featuring a \
redesigned interior with premium materials and advanced safety technology that anticipates the \
road ahead.",
        drive_id: "1tF-LU9FZsMQeeoNhVnS-bAwyPPVsha6v",
        specs: [
            SpotlightSpec {
                label: "Interior",
                value: "Triple-Zone Climate",
            },
            SpotlightSpec {
                label: "Safety",
                value: "MI-PILOT Assist",
            },
        ],
    },
    SpotlightItem {
        id: "car-3",
        title: "Mitsubishi Pajero Sport",
        subtitle: "Off-Road Legend",
        description: "The ultimate adventure companion. Built with a rugged body-on-frame \
construction and a powerful diesel engine that delivers relentless torque for those who dare to \
go beyond the paved path.",
        drive_id: "1uNCfBsEt-p-bm0reRub-SReV2boOy1_K",
        specs: [
            SpotlightSpec {
                label: "Capability",
                value: "Super Select 4WD-II",
            },
            SpotlightSpec {
                label: "Utility",
                value: "3100kg Braked Towing",
            },
        ],
    },
];

/// 循环展示的聚焦区。
#[derive(Debug, Clone, Default)]
pub struct Spotlight {
    index: usize,
    image_error: bool,
}

impl Spotlight {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub const fn index(&self) -> usize {
        self.index
    }

    #[must_use]
    pub fn current(&self) -> &'static SpotlightItem {
        &SPOTLIGHT_ITEMS[self.index]
    }

    #[must_use]
    pub fn image_url(&self) -> String {
        drive_thumbnail_url(self.current().drive_id)
    }

    /// 图片加载失败时由前端标记，切换条目后复位。
    pub fn mark_image_error(&mut self) {
        self.image_error = true;
    }

    #[must_use]
    pub const fn image_error(&self) -> bool {
        self.image_error
    }

    pub fn next(&mut self) {
        self.image_error = false;
        self.index = (self.index + 1) % SPOTLIGHT_ITEMS.len();
    }

    pub fn prev(&mut self) {
        self.image_error = false;
        self.index = (self.index + SPOTLIGHT_ITEMS.len() - 1) % SPOTLIGHT_ITEMS.len();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn wraps_in_both_directions() {
        let mut spotlight = Spotlight::new();
        spotlight.prev();
        assert_eq!(spotlight.current().id, "car-3");
        spotlight.next();
        spotlight.next();
        assert_eq!(spotlight.index(), 1);
    }

    #[test]
    fn navigation_resets_image_error() {
        let mut spotlight = Spotlight::new();
        spotlight.mark_image_error();
        assert!(spotlight.image_error());
        spotlight.next();
        assert!(!spotlight.image_error());
        assert_eq!(
            spotlight.image_url(),
            "https://lh3.googleusercontent.com/d/1tF-LU9FZsMQeeoNhVnS-bAwyPPVsha6v"
        );
    }
}
