//! Controller configuration.
//!
//! Every field has a default matching the stock portfolio page, so an empty
//! JSON object (or no config at all) yields the standard behaviour:
//!
//! ```text
//! mobile breakpoint ........ 768   (scroll-lock + close-on-navigate below this width)
//! header offset ............ 80    (smooth-scroll lands this far above a section)
//! activation offset ........ 100   (scroll reference point below the viewport top)
//! header threshold ......... 50    (sticky header switches preset above this)
//! ```

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::{PageError, PageResult};

/// Tunables for the page interaction controller.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PortfolioConfig {
    /// Widest viewport still treated as mobile
    pub mobile_breakpoint: f64,
    /// Height reserved for the fixed header when smooth-scrolling
    pub header_offset: f64,
    /// Distance below the viewport top used to pick the active section
    pub activation_offset: f64,
    /// Scroll offset beyond which the header is raised
    pub header_threshold: f64,
    /// Entrance delay added per project card, in milliseconds
    pub card_stagger_ms: u64,
    /// How long a pressed project card stays scaled down
    pub card_pulse_ms: u64,
    /// How long the pressed contact action stays scaled down
    pub contact_pulse_ms: u64,
    /// Visible fraction at which a section is revealed
    pub reveal_threshold: f64,
    /// Bottom root margin for the reveal observer (negative fires early)
    pub reveal_bottom_margin: f64,
    /// Trailing-edge coalescing window for scroll passes; 0 runs every event
    pub scroll_throttle_ms: u64,
    /// `tracing` filter directive used by the browser log sink
    pub log_filter: String,
    /// CSS selectors locating each landmark
    pub selectors: LandmarkSelectors,
}

impl Default for PortfolioConfig {
    fn default() -> Self {
        Self {
            mobile_breakpoint: 768.0,
            header_offset: 80.0,
            activation_offset: 100.0,
            header_threshold: 50.0,
            card_stagger_ms: 100,
            card_pulse_ms: 150,
            contact_pulse_ms: 200,
            reveal_threshold: 0.1,
            reveal_bottom_margin: -100.0,
            scroll_throttle_ms: 0,
            log_filter: "info".to_string(),
            selectors: LandmarkSelectors::default(),
        }
    }
}

impl PortfolioConfig {
    /// Parse and validate a JSON config document.
    pub fn from_json(input: &str) -> PageResult<Self> {
        let config: Self = serde_json::from_str(input)?;
        config.validate()?;
        Ok(config)
    }

    /// Reject values the controller cannot operate with.
    pub fn validate(&self) -> PageResult<()> {
        if !(self.mobile_breakpoint.is_finite() && self.mobile_breakpoint > 0.0) {
            return Err(PageError::InvalidConfig(format!(
                "mobile_breakpoint must be positive, got {}",
                self.mobile_breakpoint
            )));
        }
        for (name, value) in [
            ("header_offset", self.header_offset),
            ("activation_offset", self.activation_offset),
            ("header_threshold", self.header_threshold),
            ("reveal_bottom_margin", self.reveal_bottom_margin),
        ] {
            if !value.is_finite() {
                return Err(PageError::InvalidConfig(format!("{} must be finite", name)));
            }
        }
        if !(self.reveal_threshold > 0.0 && self.reveal_threshold <= 1.0) {
            return Err(PageError::InvalidConfig(format!(
                "reveal_threshold must be in (0, 1], got {}",
                self.reveal_threshold
            )));
        }
        Ok(())
    }

    /// Whether a viewport of this width gets the mobile layout.
    pub fn is_mobile(&self, viewport_width: f64) -> bool {
        viewport_width <= self.mobile_breakpoint
    }

    pub fn card_pulse(&self) -> Duration {
        Duration::from_millis(self.card_pulse_ms)
    }

    pub fn contact_pulse(&self) -> Duration {
        Duration::from_millis(self.contact_pulse_ms)
    }

    /// Coalescing window, `None` when scroll passes run on every event.
    pub fn scroll_throttle(&self) -> Option<Duration> {
        (self.scroll_throttle_ms > 0).then(|| Duration::from_millis(self.scroll_throttle_ms))
    }
}

/// CSS selectors for the page landmarks.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LandmarkSelectors {
    pub sections: String,
    pub nav_links: String,
    pub menu_toggle: String,
    pub nav_container: String,
    pub header: String,
    pub skip_link: String,
    pub project_cards: String,
    pub contact_action: String,
    pub year_slot: String,
}

impl Default for LandmarkSelectors {
    fn default() -> Self {
        Self {
            sections: ".section".to_string(),
            nav_links: ".nav-link".to_string(),
            menu_toggle: ".hamburger".to_string(),
            nav_container: ".nav".to_string(),
            header: ".header".to_string(),
            skip_link: ".skip-link".to_string(),
            project_cards: ".project-card".to_string(),
            contact_action: ".btn-primary[href^=\"mailto\"]".to_string(),
            year_slot: "#current-year".to_string(),
        }
    }
}
