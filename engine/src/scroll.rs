//! Scroll state for the two list panels.
//!
//! The draw pass reports how many rows the panel can show and how far it can
//! scroll; key handling moves the offset within those limits.

/// One of the two scrollable list panels.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Panel {
    Users,
    #[default]
    Posts,
}

impl Panel {
    #[must_use]
    pub fn other(self) -> Self {
        match self {
            Self::Users => Self::Posts,
            Self::Posts => Self::Users,
        }
    }
}

/// Top-anchored scroll position of a list.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ListScroll {
    offset_from_top: u16,
    max: u16,
    visible: u16,
}

impl ListScroll {
    /// Record the limits measured by the last draw and clamp to them.
    pub fn update_viewport(&mut self, max: u16, visible: u16) {
        self.max = max;
        self.visible = visible;
        self.offset_from_top = self.offset_from_top.min(max);
    }

    #[must_use]
    pub fn offset_from_top(&self) -> u16 {
        self.offset_from_top.min(self.max)
    }

    #[must_use]
    pub fn max(&self) -> u16 {
        self.max
    }

    fn page(&self) -> u16 {
        self.visible.saturating_sub(1).max(1)
    }

    pub fn scroll_up(&mut self) {
        self.offset_from_top = self.offset_from_top.saturating_sub(1);
    }

    pub fn scroll_down(&mut self) {
        self.offset_from_top = self.offset_from_top.saturating_add(1).min(self.max);
    }

    pub fn scroll_page_up(&mut self) {
        self.offset_from_top = self.offset_from_top.saturating_sub(self.page());
    }

    pub fn scroll_page_down(&mut self) {
        self.offset_from_top = self
            .offset_from_top
            .saturating_add(self.page())
            .min(self.max);
    }

    pub fn scroll_to_top(&mut self) {
        self.offset_from_top = 0;
    }

    pub fn scroll_to_bottom(&mut self) {
        self.offset_from_top = self.max;
    }
}
