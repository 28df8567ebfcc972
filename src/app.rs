//! Controller ownership and startup for the browser binding.
//!
//! The controller lives in a [`SharedController`] held by a thread-local for
//! the lifetime of the page. Every DOM callback reaches it through a
//! [`Dispatcher`], which holds only a weak reference.

use std::cell::RefCell;
use std::rc::{Rc, Weak};

use gloo::events::EventListener;
use portfolio_core::{Controller, EventOutcome, PageEvent, PortfolioConfig};
use web_sys::{Document, Window};

use crate::debug;
use crate::dom::DomView;
use crate::error::{BindError, BindResult};

/// Element holding an optional JSON config document.
const CONFIG_ELEMENT_ID: &str = "portfolio-config";

/// Shared controller type.
///
/// `None` until the page has been bound; DOM callbacks arriving earlier are
/// dropped.
pub type SharedController = Rc<RefCell<Option<Controller<DomView>>>>;

thread_local! {
    static PAGE: RefCell<Option<SharedController>> = const { RefCell::new(None) };
}

/// Weak handle used by DOM callbacks to reach the controller.
#[derive(Clone)]
pub struct Dispatcher(Weak<RefCell<Option<Controller<DomView>>>>);

impl Dispatcher {
    pub fn new(shared: &SharedController) -> Self {
        Self(Rc::downgrade(shared))
    }

    /// Build an event against the view (to resolve element handles) and run
    /// it through the controller.
    pub fn dispatch<F>(&self, build: F) -> EventOutcome
    where
        F: FnOnce(&mut DomView) -> PageEvent,
    {
        let Some(shared) = self.0.upgrade() else {
            return EventOutcome::Default;
        };
        let Ok(mut guard) = shared.try_borrow_mut() else {
            tracing::warn!("re-entrant page event dropped");
            return EventOutcome::Default;
        };
        let Some(controller) = guard.as_mut() else {
            return EventOutcome::Default;
        };
        let event = build(controller.view_mut());
        controller.dispatch(event)
    }

    /// Run `f` with the controller, if it is bound and not busy.
    pub fn with_controller<R>(
        &self,
        f: impl FnOnce(&mut Controller<DomView>) -> R,
    ) -> Option<R> {
        let shared = self.0.upgrade()?;
        let mut guard = shared.try_borrow_mut().ok()?;
        guard.as_mut().map(f)
    }
}

pub fn window() -> BindResult<Window> {
    web_sys::window().ok_or(BindError::NoWindow)
}

pub fn document() -> BindResult<Document> {
    window()?.document().ok_or(BindError::NoDocument)
}

/// Read the page's config document, falling back to defaults.
pub fn load_config() -> BindResult<PortfolioConfig> {
    let text = document()?
        .get_element_by_id(CONFIG_ELEMENT_ID)
        .and_then(|element| element.text_content());
    parse_config(text.as_deref())
}

/// Absent or blank config text means defaults.
fn parse_config(text: Option<&str>) -> BindResult<PortfolioConfig> {
    match text {
        Some(text) if !text.trim().is_empty() => Ok(PortfolioConfig::from_json(text)?),
        _ => Ok(PortfolioConfig::default()),
    }
}

/// Bind the controller now, or once the DOM has been parsed.
pub fn boot(config: PortfolioConfig) -> BindResult<()> {
    let document = document()?;
    if document.ready_state() == "loading" {
        EventListener::once(&document, "DOMContentLoaded", move |_| {
            if let Err(err) = mount(config) {
                tracing::error!(%err, "portfolio failed to start");
            }
        })
        .forget();
        return Ok(());
    }
    mount(config)
}

fn mount(config: PortfolioConfig) -> BindResult<()> {
    let window = window()?;
    let document = window.document().ok_or(BindError::NoDocument)?;

    let shared: SharedController = Rc::new(RefCell::new(None));
    let view = DomView::new(
        window,
        document,
        config.selectors.clone(),
        Dispatcher::new(&shared),
    );

    let mut controller = Controller::bind(view, config)?;
    controller.initialize();
    *shared.borrow_mut() = Some(controller);

    debug::expose(Dispatcher::new(&shared))?;
    PAGE.with(|page| *page.borrow_mut() = Some(shared));
    Ok(())
}
