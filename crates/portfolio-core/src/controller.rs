//! Page interaction controller.
//!
//! ## Overview
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────┐
//! │  Controller<V: PageView>                                        │
//! │  ├── Landmarks: bound once, required ones fail fast             │
//! │  ├── UiState: active link, menu, header regime, reveal latches  │
//! │  ├── Scheduler: keyed reversions + coalesced scroll passes      │
//! │  └── dispatch(PageEvent) -> EventOutcome                        │
//! │                                                                 │
//! │  Window scroll ──► update_active_nav + style_header             │
//! │  Window resize ──► close menu when leaving mobile width         │
//! │  Toggle click ───► toggle_menu                                  │
//! │  Nav link click ─► smooth scroll, close menu, push fragment     │
//! │  Document click/Escape ─► close_menu_if_mobile                  │
//! │  Card click/Enter/Space ─► press-pulse                          │
//! │  Contact hover/click ──► lift / press-pulse                     │
//! │  Intersection ───► one-shot "animated" class                    │
//! └─────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Everything runs on the host's UI thread, one event at a time.

use std::time::Duration;

use crate::config::PortfolioConfig;
use crate::debug::DebugCommand;
use crate::error::PageResult;
use crate::event::{EventOutcome, Key, PageEvent};
use crate::landmarks::Landmarks;
use crate::scheduler::{Deferred, Scheduler};
use crate::state::{HeaderRegime, MenuState, UiState};
use crate::view::{
    EventKind, Listener, NodeId, PageView, RevealOptions, ScrollBehavior, StyleProperty, Target,
};

const ACTIVE_CLASS: &str = "active";
const ANIMATED_CLASS: &str = "animated";
const LOADED_CLASS: &str = "loaded";

const CARD_PRESSED: &str = "scale(0.98)";
const CONTACT_HOVER: &str = "translateY(-2px) scale(1.05)";
const CONTACT_REST: &str = "translateY(0) scale(1)";
const CONTACT_PRESSED: &str = "scale(0.95)";

const SKIP_LINK_SHOWN: &str = "20px";
const SKIP_LINK_HIDDEN: &str = "-50px";

pub struct Controller<V: PageView> {
    view: V,
    config: PortfolioConfig,
    landmarks: Landmarks,
    state: UiState,
    scheduler: Scheduler,
}

impl<V: PageView> Controller<V> {
    /// Validate the config and bind every landmark on the page.
    ///
    /// Nothing is written to the page until [`Controller::initialize`].
    pub fn bind(mut view: V, config: PortfolioConfig) -> PageResult<Self> {
        config.validate()?;
        let landmarks = Landmarks::bind(&mut view)?;
        let state = UiState::with_sections(landmarks.sections.len());
        Ok(Self {
            view,
            config,
            landmarks,
            state,
            scheduler: Scheduler::new(),
        })
    }

    // ========================================================================
    // Accessors
    // ========================================================================

    pub fn view(&self) -> &V {
        &self.view
    }

    pub fn view_mut(&mut self) -> &mut V {
        &mut self.view
    }

    pub fn config(&self) -> &PortfolioConfig {
        &self.config
    }

    pub fn landmarks(&self) -> &Landmarks {
        &self.landmarks
    }

    pub fn state(&self) -> &UiState {
        &self.state
    }

    pub fn is_menu_open(&self) -> bool {
        self.state.menu.is_open()
    }

    pub fn is_scroll_locked(&self) -> bool {
        self.state.scroll_locked
    }

    /// Id of the section whose nav link is currently active.
    pub fn active_section(&self) -> Option<&str> {
        let link = self.landmarks.nav_links.get(self.state.active_link?)?;
        link.target.as_deref()?.strip_prefix('#')
    }

    pub fn pending_tasks(&self) -> usize {
        self.scheduler.pending_count()
    }

    // ========================================================================
    // Initialization
    // ========================================================================

    /// Establish the initial visual state and wire every listener.
    ///
    /// Safe to call again: listeners from a previous run are dropped first
    /// and revealed sections stay revealed.
    pub fn initialize(&mut self) {
        if let Some(slot) = self.landmarks.year_slot {
            let year = self.view.current_year();
            self.view.set_text(slot, &year.to_string());
        }

        self.apply_location_hash();
        self.wire_listeners();
        self.enhance_cards();
        self.start_reveal();

        self.update_active_nav();
        self.style_header();

        self.state.initialized = true;
        tracing::info!("Portfolio initialized");
    }

    fn apply_location_hash(&mut self) {
        let Some(hash) = self.view.location_hash() else {
            return;
        };
        if hash.len() <= 1 {
            return;
        }
        if let Some(link) = self.landmarks.link_for_fragment(&hash) {
            tracing::debug!(%hash, "initial active link from location");
            self.set_active_link(Some(link));
        }
    }

    fn wire_listeners(&mut self) {
        if self.state.initialized {
            self.view.unlisten_all();
        }

        let mut listeners = vec![
            Listener::new(Target::Window, EventKind::Scroll),
            Listener::new(Target::Window, EventKind::Resize),
            Listener::new(Target::Node(self.landmarks.menu_toggle), EventKind::Click),
            Listener::new(Target::Document, EventKind::Click),
            Listener::new(Target::Document, EventKind::KeyDown),
            Listener::new(Target::Node(self.landmarks.skip_link), EventKind::Focus),
            Listener::new(Target::Node(self.landmarks.skip_link), EventKind::Blur),
        ];
        if !self.state.loaded {
            listeners.push(Listener::new(Target::Window, EventKind::Load));
        }
        for link in &self.landmarks.nav_links {
            listeners.push(Listener::new(Target::Node(link.node), EventKind::Click));
        }
        for card in &self.landmarks.project_cards {
            listeners.push(Listener::new(Target::Node(*card), EventKind::Click));
            listeners.push(Listener::new(Target::Node(*card), EventKind::KeyDown));
        }
        if let Some(contact) = self.landmarks.contact_action {
            for kind in [EventKind::MouseEnter, EventKind::MouseLeave, EventKind::Click] {
                listeners.push(Listener::new(Target::Node(contact), kind));
            }
        }

        tracing::debug!(count = listeners.len(), "wiring listeners");
        for listener in listeners {
            self.view.listen(listener);
        }
    }

    fn enhance_cards(&mut self) {
        let stagger = self.config.card_stagger_ms;
        for (index, card) in self.landmarks.project_cards.iter().enumerate() {
            let delay = format!("{}ms", (index as u64).saturating_mul(stagger));
            self.view.set_style(*card, StyleProperty::AnimationDelay, &delay);
            self.view.set_attribute(*card, "tabindex", "0");
        }
    }

    fn start_reveal(&mut self) {
        let options = RevealOptions {
            threshold: self.config.reveal_threshold,
            bottom_margin: self.config.reveal_bottom_margin,
        };
        for (index, section) in self.landmarks.sections.iter().enumerate() {
            if !self.state.is_revealed(index) {
                self.view.observe_intersection(section.node, options);
            }
        }
    }

    // ========================================================================
    // Event routing
    // ========================================================================

    /// Route a host event to the matching behaviour.
    pub fn dispatch(&mut self, event: PageEvent) -> EventOutcome {
        match event {
            PageEvent::Input {
                target,
                kind,
                origin,
                key,
            } => self.dispatch_input(target, kind, origin, key),
            PageEvent::Intersection { node, intersecting } => {
                if intersecting {
                    self.reveal(node);
                }
                EventOutcome::Default
            }
            PageEvent::TimerElapsed(task) => {
                match self.scheduler.take(task) {
                    Some(Deferred::Revert {
                        node,
                        property,
                        value,
                    }) => self.view.set_style(node, property, &value),
                    Some(Deferred::ScrollPass) => self.run_scroll_passes(),
                    None => tracing::trace!(task = task.0, "stale task ignored"),
                }
                EventOutcome::Default
            }
        }
    }

    fn dispatch_input(
        &mut self,
        target: Target,
        kind: EventKind,
        origin: Option<NodeId>,
        key: Option<Key>,
    ) -> EventOutcome {
        match (target, kind) {
            (Target::Window, EventKind::Scroll) => self.on_scroll(),
            (Target::Window, EventKind::Resize) => self.on_resize(),
            (Target::Window, EventKind::Load) => self.mark_loaded(),
            (Target::Document, EventKind::Click) => {
                if let Some(origin) = origin {
                    self.on_document_click(origin);
                }
            }
            (Target::Document, EventKind::KeyDown) => {
                if key == Some(Key::Escape) && self.is_menu_open() {
                    self.close_menu_if_mobile();
                }
            }
            (Target::Node(node), kind) => return self.dispatch_node(node, kind, origin, key),
            _ => tracing::trace!(?target, ?kind, "unrouted event"),
        }
        EventOutcome::Default
    }

    fn dispatch_node(
        &mut self,
        node: NodeId,
        kind: EventKind,
        origin: Option<NodeId>,
        key: Option<Key>,
    ) -> EventOutcome {
        if node == self.landmarks.menu_toggle && kind == EventKind::Click {
            self.toggle_menu();
            return EventOutcome::Default;
        }

        if let Some(link) = self.landmarks.nav_link_index(node) {
            if kind == EventKind::Click {
                return self.follow_nav_link(link);
            }
            return EventOutcome::Default;
        }

        if self.landmarks.card_index(node).is_some() {
            match kind {
                EventKind::Click => self.press_card(node, origin.unwrap_or(node)),
                EventKind::KeyDown if key.as_ref().is_some_and(Key::activates) => {
                    self.activate_card(node);
                    return EventOutcome::PreventDefault;
                }
                _ => {}
            }
            return EventOutcome::Default;
        }

        if self.landmarks.is_contact(node) {
            match kind {
                EventKind::MouseEnter => self.set_contact_transform(node, CONTACT_HOVER),
                EventKind::MouseLeave => self.set_contact_transform(node, CONTACT_REST),
                EventKind::Click => self.press_contact(node),
                _ => {}
            }
            return EventOutcome::Default;
        }

        if node == self.landmarks.skip_link {
            match kind {
                EventKind::Focus => self.view.set_style(node, StyleProperty::Top, SKIP_LINK_SHOWN),
                EventKind::Blur => self.view.set_style(node, StyleProperty::Top, SKIP_LINK_HIDDEN),
                _ => {}
            }
            return EventOutcome::Default;
        }

        tracing::trace!(%node, ?kind, "event on unbound node");
        EventOutcome::Default
    }

    /// Run a debug surface operation.
    pub fn run_debug(&mut self, command: DebugCommand) {
        tracing::debug!(%command, "debug command");
        match command {
            DebugCommand::ToggleMobileMenu => self.toggle_menu(),
            DebugCommand::UpdateActiveNav => self.update_active_nav(),
            DebugCommand::CloseMobileMenu => self.close_menu_if_mobile(),
            DebugCommand::Init => self.initialize(),
        }
    }

    // ========================================================================
    // Scroll-driven behaviour
    // ========================================================================

    fn on_scroll(&mut self) {
        match self.config.scroll_throttle() {
            Some(window) => {
                self.scheduler.schedule_scroll_pass(&mut self.view, window);
            }
            None => self.run_scroll_passes(),
        }
    }

    fn run_scroll_passes(&mut self) {
        self.update_active_nav();
        self.style_header();
    }

    /// Mark the nav link of the section under the reference point active.
    ///
    /// Sections are scanned in document order and the last match wins. When
    /// no section matches, the current marker is left untouched.
    pub fn update_active_nav(&mut self) {
        let point = self.view.scroll_y() + self.config.activation_offset;

        let mut matched = None;
        for section in &self.landmarks.sections {
            if self.view.layout(section.node).contains_y(point) {
                matched = Some(section.id.clone());
            }
        }
        let Some(section_id) = matched else {
            return;
        };

        let link = self.landmarks.link_for_section(&section_id);
        self.set_active_link(link);

        if link.is_some() && self.is_menu_open() {
            let label = format!("Close navigation menu, currently on {} section", section_id);
            self.view
                .set_attribute(self.landmarks.menu_toggle, "aria-label", &label);
        }
    }

    fn set_active_link(&mut self, link: Option<usize>) {
        for nav in &self.landmarks.nav_links {
            self.view.remove_class(nav.node, ACTIVE_CLASS);
            self.view.remove_attribute(nav.node, "aria-current");
        }
        if let Some(index) = link {
            let node = self.landmarks.nav_links[index].node;
            self.view.add_class(node, ACTIVE_CLASS);
            self.view.set_attribute(node, "aria-current", "page");
        }
        if self.state.active_link != link {
            tracing::debug!(from = ?self.state.active_link, to = ?link, "active link changed");
        }
        self.state.active_link = link;
    }

    /// Apply the header preset for the current scroll regime.
    pub fn style_header(&mut self) {
        let regime = HeaderRegime::for_scroll(self.view.scroll_y(), self.config.header_threshold);
        if self.state.header == Some(regime) {
            return;
        }
        let header = self.landmarks.header;
        self.view
            .set_style(header, StyleProperty::BoxShadow, regime.box_shadow());
        self.view
            .set_style(header, StyleProperty::BackdropFilter, regime.backdrop_filter());
        self.state.header = Some(regime);
    }

    // ========================================================================
    // Mobile menu
    // ========================================================================

    pub fn toggle_menu(&mut self) {
        let next = self.state.menu.toggled();
        self.set_menu(next);
    }

    /// Close the menu, but only on mobile-width viewports.
    pub fn close_menu_if_mobile(&mut self) {
        if self.config.is_mobile(self.view.viewport_width()) {
            self.close_menu();
        }
    }

    /// Close the menu regardless of viewport width.
    pub fn close_menu(&mut self) {
        self.set_menu(MenuState::Closed);
    }

    fn set_menu(&mut self, menu: MenuState) {
        let toggle = self.landmarks.menu_toggle;
        let nav = self.landmarks.nav_container;

        if menu.is_open() {
            self.view.add_class(nav, ACTIVE_CLASS);
        } else {
            self.view.remove_class(nav, ACTIVE_CLASS);
        }
        self.view
            .set_attribute(toggle, "aria-expanded", menu.aria_expanded());
        self.view.set_attribute(toggle, "aria-label", menu.toggle_label());

        if self.state.menu != menu {
            tracing::debug!(?menu, "menu state changed");
        }
        self.state.menu = menu;
        self.sync_scroll_lock();
    }

    /// Body scroll-lock follows: open menu on a mobile-width viewport.
    fn sync_scroll_lock(&mut self) {
        let locked =
            self.state.menu.is_open() && self.config.is_mobile(self.view.viewport_width());
        let overflow = if locked { "hidden" } else { "" };
        self.view
            .set_style(self.landmarks.body, StyleProperty::Overflow, overflow);
        self.state.scroll_locked = locked;
    }

    fn on_resize(&mut self) {
        if !self.is_menu_open() {
            return;
        }
        if self.config.is_mobile(self.view.viewport_width()) {
            self.sync_scroll_lock();
        } else {
            self.close_menu();
        }
    }

    fn on_document_click(&mut self, origin: NodeId) {
        if !self.is_menu_open() {
            return;
        }
        let inside_nav = self.view.is_within(origin, self.landmarks.nav_container);
        let inside_toggle = self.view.is_within(origin, self.landmarks.menu_toggle);
        if !inside_nav && !inside_toggle {
            self.close_menu_if_mobile();
        }
    }

    // ========================================================================
    // Smooth scrolling
    // ========================================================================

    /// Smooth-scroll to the fragment a nav link points at.
    ///
    /// The host default is only suppressed when the target element exists.
    pub fn follow_nav_link(&mut self, link: usize) -> EventOutcome {
        let Some(node) = self.landmarks.nav_links.get(link).map(|l| l.node) else {
            return EventOutcome::Default;
        };
        let Some(href) = self.view.attribute(node, "href") else {
            return EventOutcome::Default;
        };
        let Some(id) = href.strip_prefix('#').filter(|id| !id.is_empty()) else {
            return EventOutcome::Default;
        };
        let Some(target) = self.view.element_by_id(id) else {
            tracing::debug!(%href, "fragment target missing, falling back to default navigation");
            return EventOutcome::Default;
        };

        self.close_menu_if_mobile();
        let top = self.view.layout(target).top - self.config.header_offset;
        self.view.scroll_to(top, ScrollBehavior::Smooth);
        self.view.push_fragment(&href);
        EventOutcome::PreventDefault
    }

    // ========================================================================
    // Cards, contact action, skip link
    // ========================================================================

    fn press_card(&mut self, card: NodeId, origin: NodeId) {
        if self.view.is_within_link(origin) {
            return;
        }
        self.pulse(card, CARD_PRESSED, self.config.card_pulse());
    }

    /// Keyboard activation: the same effect as a click on the card itself,
    /// including the document-level check the click would bubble into.
    fn activate_card(&mut self, card: NodeId) {
        self.press_card(card, card);
        self.on_document_click(card);
    }

    fn set_contact_transform(&mut self, node: NodeId, transform: &str) {
        self.scheduler.cancel_revert(&mut self.view, node);
        self.view.set_style(node, StyleProperty::Transform, transform);
    }

    fn press_contact(&mut self, node: NodeId) {
        self.pulse(node, CONTACT_PRESSED, self.config.contact_pulse());
        tracing::info!("contact action activated");
    }

    fn pulse(&mut self, node: NodeId, pressed: &str, hold: Duration) {
        self.view.set_style(node, StyleProperty::Transform, pressed);
        self.scheduler
            .schedule_revert(&mut self.view, node, StyleProperty::Transform, "", hold);
    }

    // ========================================================================
    // Reveal + load
    // ========================================================================

    fn reveal(&mut self, node: NodeId) {
        let Some(index) = self.landmarks.section_index(node) else {
            return;
        };
        if self.state.revealed[index] {
            return;
        }
        self.view.add_class(node, ANIMATED_CLASS);
        self.view.unobserve_intersection(node);
        self.state.revealed[index] = true;
        tracing::debug!(section = %self.landmarks.sections[index].id, "section revealed");
    }

    fn mark_loaded(&mut self) {
        if self.state.loaded {
            return;
        }
        self.view.add_class(self.landmarks.body, LOADED_CLASS);
        self.state.loaded = true;
    }
}
