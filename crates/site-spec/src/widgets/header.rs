use serde::Serialize;

const HIDE_AFTER: u32 = 100;
const SCROLL_MARGIN: u32 = 20;

/// Sticky header that slides away while the visitor scrolls down.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Header {
    height: u32,
    hidden: bool,
    #[serde(skip)]
    last_offset: u32,
}

impl Header {
    pub fn new(height: u32) -> Self {
        Self {
            height,
            hidden: false,
            last_offset: 0,
        }
    }

    pub fn is_hidden(&self) -> bool {
        self.hidden
    }

    pub fn on_scroll(&mut self, offset: u32) {
        self.hidden = offset > self.last_offset && offset > HIDE_AFTER;
        self.last_offset = offset;
    }

    /// Scroll position that puts a section just below the header.
    pub fn scroll_target(&self, section_offset: u32) -> u32 {
        section_offset.saturating_sub(self.height.saturating_add(SCROLL_MARGIN))
    }
}
