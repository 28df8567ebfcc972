//! Portfolio Page Interaction Controller
//!
//! Host-independent logic behind the interactive bits of a static portfolio
//! page: scroll-driven navigation highlighting, the collapsible mobile menu,
//! smooth in-page scrolling, the sticky header, entrance animations and small
//! press/hover affordances on cards and the contact action.
//!
//! ## Architecture
//!
//! - **[`PageView`]**: the adapter boundary. Browsers implement it over the
//!   DOM; `headless::MemoryView` (feature `test-support`) implements it in
//!   memory.
//! - **[`Controller`]**: owns the bound [`Landmarks`], the [`UiState`] and
//!   the reversion [`scheduler::Scheduler`]; hosts feed it [`PageEvent`]s.
//! - **[`PortfolioConfig`]**: breakpoints, offsets, timings and selectors.
//!
//! ## Quick Start
//!
//! ```ignore
//! use portfolio_core::{Controller, PortfolioConfig};
//!
//! let mut controller = Controller::bind(my_view, PortfolioConfig::default())?;
//! controller.initialize();
//!
//! // later, from the host's event loop
//! let outcome = controller.dispatch(event);
//! if outcome.is_prevented() {
//!     host_event.prevent_default();
//! }
//! ```

pub mod config;
pub mod controller;
pub mod debug;
pub mod error;
pub mod event;
#[cfg(any(test, feature = "test-support"))]
pub mod headless;
pub mod landmarks;
pub mod scheduler;
pub mod state;
pub mod view;

// Re-exports
pub use config::{LandmarkSelectors, PortfolioConfig};
pub use controller::Controller;
pub use debug::DebugCommand;
pub use error::{PageError, PageResult};
pub use event::{EventOutcome, Key, PageEvent};
pub use landmarks::{Landmarks, NavLinkRef, SectionRef};
pub use state::{HeaderRegime, MenuState, UiState};
pub use view::{
    EventKind, Landmark, Listener, NodeId, PageView, Rect, RevealOptions, ScrollBehavior,
    StyleProperty, Target, TaskId,
};
