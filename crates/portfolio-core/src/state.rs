//! Derived UI state owned by the controller.
//!
//! Nothing here survives a reload. The controller is the only writer; hosts
//! read it through the accessors on [`crate::Controller`].

/// Mobile menu state
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum MenuState {
    #[default]
    Closed,
    Open,
}

impl MenuState {
    pub fn is_open(&self) -> bool {
        matches!(self, MenuState::Open)
    }

    pub fn toggled(self) -> Self {
        match self {
            MenuState::Closed => MenuState::Open,
            MenuState::Open => MenuState::Closed,
        }
    }

    /// Value mirrored into `aria-expanded`.
    pub fn aria_expanded(&self) -> &'static str {
        if self.is_open() {
            "true"
        } else {
            "false"
        }
    }

    /// Accessible label for the menu toggle.
    pub fn toggle_label(&self) -> &'static str {
        match self {
            MenuState::Open => "Close navigation menu",
            MenuState::Closed => "Open navigation menu",
        }
    }
}

/// Sticky header regime
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HeaderRegime {
    /// At or above the threshold (page top)
    Resting,
    /// Scrolled past the threshold
    Raised,
}

impl HeaderRegime {
    pub fn for_scroll(scroll_y: f64, threshold: f64) -> Self {
        if scroll_y > threshold {
            HeaderRegime::Raised
        } else {
            HeaderRegime::Resting
        }
    }

    pub fn box_shadow(&self) -> &'static str {
        match self {
            HeaderRegime::Raised => "0 4px 20px rgba(0, 0, 0, 0.1)",
            HeaderRegime::Resting => "0 1px 2px 0 rgba(0, 0, 0, 0.05)",
        }
    }

    pub fn backdrop_filter(&self) -> &'static str {
        match self {
            HeaderRegime::Raised => "blur(15px)",
            HeaderRegime::Resting => "blur(10px)",
        }
    }
}

/// Mutable UI flags.
#[derive(Debug, Clone, Default)]
pub struct UiState {
    /// Index into the bound nav links
    pub(crate) active_link: Option<usize>,
    pub(crate) menu: MenuState,
    pub(crate) scroll_locked: bool,
    /// Last preset written to the header; `None` until the first pass
    pub(crate) header: Option<HeaderRegime>,
    /// One latch per bound section
    pub(crate) revealed: Vec<bool>,
    pub(crate) loaded: bool,
    pub(crate) initialized: bool,
}

impl UiState {
    pub(crate) fn with_sections(count: usize) -> Self {
        Self {
            revealed: vec![false; count],
            ..Default::default()
        }
    }

    pub fn active_link(&self) -> Option<usize> {
        self.active_link
    }

    pub fn menu(&self) -> MenuState {
        self.menu
    }

    pub fn is_scroll_locked(&self) -> bool {
        self.scroll_locked
    }

    pub fn header(&self) -> Option<HeaderRegime> {
        self.header
    }

    pub fn is_revealed(&self, section: usize) -> bool {
        self.revealed.get(section).copied().unwrap_or(false)
    }

    pub fn is_loaded(&self) -> bool {
        self.loaded
    }

    pub fn is_initialized(&self) -> bool {
        self.initialized
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_toggle_is_involution() {
        let state = MenuState::Closed;
        assert_eq!(state.toggled().toggled(), state);
        assert!(state.toggled().is_open());
    }

    #[test]
    fn test_header_threshold_is_exclusive() {
        assert_eq!(HeaderRegime::for_scroll(50.0, 50.0), HeaderRegime::Resting);
        assert_eq!(HeaderRegime::for_scroll(50.5, 50.0), HeaderRegime::Raised);
        assert_eq!(HeaderRegime::for_scroll(0.0, 50.0), HeaderRegime::Resting);
    }

    #[test]
    fn test_labels() {
        assert_eq!(MenuState::Open.toggle_label(), "Close navigation menu");
        assert_eq!(MenuState::Closed.aria_expanded(), "false");
    }

    #[test]
    fn test_revealed_out_of_range() {
        let state = UiState::with_sections(2);
        assert!(!state.is_revealed(5));
    }
}
