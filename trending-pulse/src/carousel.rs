//! Scroll state of the listing carousel.

/// 单次滚动的距离（卡片宽度加间距）。
pub const SCROLL_STEP: f64 = 320.0;

const EDGE_SLACK: f64 = 10.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CarouselDirection {
    Left,
    Right,
}

#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Carousel {
    scroll_left: f64,
    scroll_width: f64,
    client_width: f64,
}

impl Carousel {
    #[must_use]
    pub const fn new(scroll_width: f64, client_width: f64) -> Self {
        Self {
            scroll_left: 0.0,
            scroll_width,
            client_width,
        }
    }

    /// 同步前端上报的视口尺寸与位置。
    pub fn update(&mut self, scroll_left: f64, scroll_width: f64, client_width: f64) {
        self.scroll_width = scroll_width;
        self.client_width = client_width;
        self.scroll_left = scroll_left.clamp(0.0, self.max_scroll());
    }

    #[must_use]
    pub const fn scroll_left(&self) -> f64 {
        self.scroll_left
    }

    fn max_scroll(&self) -> f64 {
        (self.scroll_width - self.client_width).max(0.0)
    }

    #[must_use]
    pub fn show_left_arrow(&self) -> bool {
        self.scroll_left > EDGE_SLACK
    }

    #[must_use]
    pub fn show_right_arrow(&self) -> bool {
        self.scroll_left < self.scroll_width - self.client_width - EDGE_SLACK
    }

    /// 按方向滚动一步，返回新的位置。
    pub fn scroll(&mut self, direction: CarouselDirection) -> f64 {
        let delta = match direction {
            CarouselDirection::Left => -SCROLL_STEP,
            CarouselDirection::Right => SCROLL_STEP,
        };
        self.scroll_left = (self.scroll_left + delta).clamp(0.0, self.max_scroll());
        self.scroll_left
    }
}
