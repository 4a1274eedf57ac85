//! Scroll state for the result and prompt-preview panels.
//!
//! The renderer knows how many wrapped rows a panel holds; the engine only
//! keeps the offset. Each frame the renderer reports the panel's maximum
//! offset through [`PanelScroll::update_max`] and reads back
//! [`PanelScroll::offset`].

/// Rows moved by a single Up/Down press.
const LINE_STEP: u16 = 1;

/// Panels whose content can outgrow their area.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScrollPanel {
    Result,
    Preview,
}

/// One scroll gesture, applied to the focused panel.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScrollMotion {
    LineUp,
    LineDown,
    PageUp,
    PageDown,
    Top,
    Bottom,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ScrollState {
    Manual {
        offset_from_top: u16,
    },
    /// Pinned to the last row, whatever the content height turns out to be.
    Bottom,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PanelScroll {
    state: ScrollState,
    max: u16,
    page: u16,
}

impl Default for PanelScroll {
    fn default() -> Self {
        Self {
            state: ScrollState::Manual { offset_from_top: 0 },
            max: 0,
            page: 1,
        }
    }
}

impl PanelScroll {
    /// Record the largest useful offset and the visible height for this frame.
    pub fn update_max(&mut self, max: u16, page: u16) {
        self.max = max;
        self.page = page.max(1);

        if let ScrollState::Manual { offset_from_top } = self.state
            && offset_from_top >= max
            && max > 0
        {
            self.state = ScrollState::Bottom;
        }
    }

    #[must_use]
    pub fn offset(&self) -> u16 {
        match self.state {
            ScrollState::Bottom => self.max,
            ScrollState::Manual { offset_from_top } => offset_from_top.min(self.max),
        }
    }

    pub fn reset(&mut self) {
        self.state = ScrollState::Manual { offset_from_top: 0 };
    }

    pub fn apply(&mut self, motion: ScrollMotion) {
        match motion {
            ScrollMotion::LineUp => self.up(LINE_STEP),
            ScrollMotion::LineDown => self.down(LINE_STEP),
            ScrollMotion::PageUp => self.up(self.page),
            ScrollMotion::PageDown => self.down(self.page),
            ScrollMotion::Top => self.reset(),
            ScrollMotion::Bottom => self.state = ScrollState::Bottom,
        }
    }

    fn up(&mut self, delta: u16) {
        self.state = ScrollState::Manual {
            offset_from_top: self.offset().saturating_sub(delta),
        };
    }

    fn down(&mut self, delta: u16) {
        let ScrollState::Manual { offset_from_top } = self.state else {
            return;
        };

        let new_offset = offset_from_top.min(self.max).saturating_add(delta);
        self.state = if new_offset >= self.max {
            ScrollState::Bottom
        } else {
            ScrollState::Manual {
                offset_from_top: new_offset,
            }
        };
    }
}
