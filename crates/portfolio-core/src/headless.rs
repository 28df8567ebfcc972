//! In-memory page for running the controller without a browser.
//!
//! [`MemoryView`] models just enough of a document for the controller: an
//! element tree with roles, attributes, classes and inline styles, a scroll
//! offset, a viewport width, a location fragment, listener registrations,
//! intersection watches and a manual clock for scheduled tasks.
//!
//! [`Harness`] wraps a bound controller and replays host events the way a
//! browser would deliver them (click and keydown bubble, one delivery per
//! registered listener).
//!
//! ## Usage
//!
//! ```
//! use portfolio_core::headless::{Harness, PageLayout};
//!
//! let mut page = Harness::new(PageLayout::portfolio()).unwrap();
//! page.scroll(1300.0);
//! assert_eq!(page.controller().active_section(), Some("projects"));
//! ```

use std::collections::{BTreeMap, BTreeSet};
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::config::PortfolioConfig;
use crate::controller::Controller;
use crate::debug::DebugCommand;
use crate::error::PageResult;
use crate::event::{EventOutcome, Key, PageEvent};
use crate::view::{
    EventKind, Landmark, Listener, NodeId, PageView, Rect, RevealOptions, ScrollBehavior,
    StyleProperty, Target, TaskId,
};

// ============================================================================
// Layout description
// ============================================================================

/// A section in a page layout.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SectionLayout {
    #[serde(default)]
    pub id: Option<String>,
    pub top: f64,
    pub height: f64,
}

/// A project card in a page layout.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CardLayout {
    /// Whether the card embeds a hyperlink
    #[serde(default)]
    pub has_link: bool,
}

/// Declarative description of a page for [`MemoryView`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PageLayout {
    pub viewport_width: f64,
    pub scroll_y: f64,
    pub location_hash: Option<String>,
    pub year: i32,
    pub sections: Vec<SectionLayout>,
    /// `href` of each nav link, in order
    pub nav_links: Vec<String>,
    pub project_cards: Vec<CardLayout>,
    /// Landmarks left out of the page
    pub omit: Vec<Landmark>,
}

impl Default for PageLayout {
    fn default() -> Self {
        Self {
            viewport_width: 1280.0,
            scroll_y: 0.0,
            location_hash: None,
            year: 2026,
            sections: Vec::new(),
            nav_links: Vec::new(),
            project_cards: Vec::new(),
            omit: Vec::new(),
        }
    }
}

impl PageLayout {
    /// The stock four-section portfolio page.
    pub fn portfolio() -> Self {
        let sections = [
            ("home", 0.0, 700.0),
            ("about", 700.0, 600.0),
            ("projects", 1300.0, 900.0),
            ("contact", 2200.0, 500.0),
        ];
        Self {
            sections: sections
                .iter()
                .map(|(id, top, height)| SectionLayout {
                    id: Some(id.to_string()),
                    top: *top,
                    height: *height,
                })
                .collect(),
            nav_links: sections.iter().map(|(id, _, _)| format!("#{}", id)).collect(),
            project_cards: vec![
                CardLayout::default(),
                CardLayout { has_link: true },
                CardLayout::default(),
            ],
            ..Default::default()
        }
    }

    pub fn from_json(input: &str) -> PageResult<Self> {
        Ok(serde_json::from_str(input)?)
    }

    pub fn with_viewport_width(mut self, width: f64) -> Self {
        self.viewport_width = width;
        self
    }

    pub fn with_location_hash(mut self, hash: impl Into<String>) -> Self {
        self.location_hash = Some(hash.into());
        self
    }

    pub fn without(mut self, landmark: Landmark) -> Self {
        self.omit.push(landmark);
        self
    }
}

// ============================================================================
// MemoryView
// ============================================================================

#[derive(Debug, Clone, Default)]
struct Element {
    landmark: Option<Landmark>,
    parent: Option<NodeId>,
    is_link: bool,
    attributes: BTreeMap<String, String>,
    classes: BTreeSet<String>,
    styles: BTreeMap<StyleProperty, String>,
    text: String,
    rect: Rect,
}

/// A recorded `scroll_to` request.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScrollRequest {
    pub top: f64,
    pub behavior: ScrollBehavior,
}

/// In-memory [`PageView`].
#[derive(Debug, Clone, Default)]
pub struct MemoryView {
    elements: Vec<Element>,
    scroll_y: f64,
    viewport_width: f64,
    location_hash: Option<String>,
    history: Vec<String>,
    scroll_requests: Vec<ScrollRequest>,
    year: i32,
    listeners: Vec<Listener>,
    observed: BTreeMap<NodeId, RevealOptions>,
    clock: Duration,
    timers: BTreeMap<TaskId, Duration>,
    cancelled: Vec<TaskId>,
}

impl MemoryView {
    pub fn new(layout: PageLayout) -> Self {
        let mut view = Self {
            scroll_y: layout.scroll_y,
            viewport_width: layout.viewport_width,
            location_hash: layout.location_hash.clone(),
            year: layout.year,
            ..Default::default()
        };
        let has = |landmark: Landmark| !layout.omit.contains(&landmark);

        let body = view.push(Element {
            landmark: has(Landmark::Body).then_some(Landmark::Body),
            ..Default::default()
        });

        if has(Landmark::SkipLink) {
            let skip = view.push_child(body, Some(Landmark::SkipLink), true);
            view.elements[skip.0 as usize]
                .attributes
                .insert("href".to_string(), "#main".to_string());
        }

        let header = view.push_child(body, has(Landmark::Header).then_some(Landmark::Header), false);
        if has(Landmark::MenuToggle) {
            view.push_child(header, Some(Landmark::MenuToggle), false);
        }
        let nav = view.push_child(
            header,
            has(Landmark::NavContainer).then_some(Landmark::NavContainer),
            false,
        );
        for href in &layout.nav_links {
            let link = view.push_child(nav, Some(Landmark::NavLink), true);
            view.elements[link.0 as usize]
                .attributes
                .insert("href".to_string(), href.clone());
        }

        let mut sections = Vec::new();
        for section in &layout.sections {
            let node = view.push_child(body, Some(Landmark::Section), false);
            let element = &mut view.elements[node.0 as usize];
            element.rect = Rect {
                top: section.top,
                height: section.height,
            };
            if let Some(id) = &section.id {
                element.attributes.insert("id".to_string(), id.clone());
            }
            sections.push((section.id.clone(), node));
        }
        let section_named = |name: &str| {
            sections
                .iter()
                .find(|(id, _)| id.as_deref() == Some(name))
                .map(|(_, node)| *node)
        };

        let card_parent = section_named("projects").unwrap_or(body);
        for card in &layout.project_cards {
            let node = view.push_child(card_parent, Some(Landmark::ProjectCard), false);
            if card.has_link {
                let link = view.push_child(node, None, true);
                view.elements[link.0 as usize]
                    .attributes
                    .insert("href".to_string(), "https://example.com/project".to_string());
            }
        }

        if has(Landmark::ContactAction) {
            let parent = section_named("contact").unwrap_or(body);
            let contact = view.push_child(parent, Some(Landmark::ContactAction), true);
            view.elements[contact.0 as usize]
                .attributes
                .insert("href".to_string(), "mailto:hello@example.com".to_string());
        }

        if has(Landmark::YearSlot) {
            let footer = view.push_child(body, None, false);
            let slot = view.push_child(footer, Some(Landmark::YearSlot), false);
            view.elements[slot.0 as usize]
                .attributes
                .insert("id".to_string(), "current-year".to_string());
        }

        view
    }

    fn push(&mut self, element: Element) -> NodeId {
        let id = NodeId(self.elements.len() as u32);
        self.elements.push(element);
        id
    }

    fn push_child(&mut self, parent: NodeId, landmark: Option<Landmark>, is_link: bool) -> NodeId {
        self.push(Element {
            landmark,
            parent: Some(parent),
            is_link,
            ..Default::default()
        })
    }

    fn element(&self, node: NodeId) -> Option<&Element> {
        self.elements.get(node.0 as usize)
    }

    fn element_mut(&mut self, node: NodeId) -> Option<&mut Element> {
        self.elements.get_mut(node.0 as usize)
    }

    fn ancestors(&self, node: NodeId) -> impl Iterator<Item = NodeId> + '_ {
        std::iter::successors(Some(node), move |n| self.element(*n).and_then(|e| e.parent))
            .filter(move |n| self.element(*n).is_some())
    }

    // ------------------------------------------------------------------------
    // Inspection
    // ------------------------------------------------------------------------

    /// The root element, present even when the body landmark is omitted.
    pub fn root(&self) -> NodeId {
        NodeId(0)
    }

    pub fn nodes(&self, landmark: Landmark) -> Vec<NodeId> {
        self.elements
            .iter()
            .enumerate()
            .filter(|(_, e)| e.landmark == Some(landmark))
            .map(|(i, _)| NodeId(i as u32))
            .collect()
    }

    pub fn node(&self, landmark: Landmark) -> Option<NodeId> {
        self.nodes(landmark).into_iter().next()
    }

    /// Element carrying `id`.
    pub fn by_id(&self, id: &str) -> Option<NodeId> {
        self.elements
            .iter()
            .position(|e| e.attributes.get("id").map(String::as_str) == Some(id))
            .map(|i| NodeId(i as u32))
    }

    /// First hyperlink nested inside `node`.
    pub fn link_inside(&self, node: NodeId) -> Option<NodeId> {
        self.elements
            .iter()
            .enumerate()
            .find(|(_, e)| e.is_link && e.parent == Some(node))
            .map(|(i, _)| NodeId(i as u32))
    }

    pub fn style(&self, node: NodeId, property: StyleProperty) -> Option<&str> {
        self.element(node)?.styles.get(&property).map(String::as_str)
    }

    pub fn text(&self, node: NodeId) -> &str {
        self.element(node).map(|e| e.text.as_str()).unwrap_or("")
    }

    pub fn history(&self) -> &[String] {
        &self.history
    }

    pub fn scroll_requests(&self) -> &[ScrollRequest] {
        &self.scroll_requests
    }

    /// How many times `listener` is currently registered.
    pub fn listener_count(&self, listener: Listener) -> usize {
        self.listeners.iter().filter(|l| **l == listener).count()
    }

    pub fn listeners(&self) -> &[Listener] {
        &self.listeners
    }

    pub fn is_observed(&self, node: NodeId) -> bool {
        self.observed.contains_key(&node)
    }

    pub fn observed_options(&self, node: NodeId) -> Option<RevealOptions> {
        self.observed.get(&node).copied()
    }

    pub fn cancelled_tasks(&self) -> &[TaskId] {
        &self.cancelled
    }

    pub fn pending_timers(&self) -> usize {
        self.timers.len()
    }

    pub fn now(&self) -> Duration {
        self.clock
    }

    // ------------------------------------------------------------------------
    // Host simulation
    // ------------------------------------------------------------------------

    pub fn set_scroll_y(&mut self, scroll_y: f64) {
        self.scroll_y = scroll_y.max(0.0);
    }

    pub fn set_viewport_width(&mut self, width: f64) {
        self.viewport_width = width;
    }

    pub fn set_layout(&mut self, node: NodeId, rect: Rect) {
        if let Some(element) = self.element_mut(node) {
            element.rect = rect;
        }
    }

    /// Move the clock forward and return the tasks that came due, oldest first.
    pub fn advance(&mut self, by: Duration) -> Vec<TaskId> {
        self.clock += by;
        let mut due: Vec<(Duration, TaskId)> = self
            .timers
            .iter()
            .filter(|(_, at)| **at <= self.clock)
            .map(|(task, at)| (*at, *task))
            .collect();
        due.sort();
        for (_, task) in &due {
            self.timers.remove(task);
        }
        due.into_iter().map(|(_, task)| task).collect()
    }
}

impl PageView for MemoryView {
    fn query_all(&mut self, landmark: Landmark) -> Vec<NodeId> {
        self.nodes(landmark)
    }

    fn element_by_id(&mut self, id: &str) -> Option<NodeId> {
        self.by_id(id)
    }

    fn attribute(&self, node: NodeId, name: &str) -> Option<String> {
        self.element(node)?.attributes.get(name).cloned()
    }

    fn set_attribute(&mut self, node: NodeId, name: &str, value: &str) {
        if let Some(element) = self.element_mut(node) {
            element.attributes.insert(name.to_string(), value.to_string());
        }
    }

    fn remove_attribute(&mut self, node: NodeId, name: &str) {
        if let Some(element) = self.element_mut(node) {
            element.attributes.remove(name);
        }
    }

    fn has_class(&self, node: NodeId, class: &str) -> bool {
        self.element(node).is_some_and(|e| e.classes.contains(class))
    }

    fn add_class(&mut self, node: NodeId, class: &str) {
        if let Some(element) = self.element_mut(node) {
            element.classes.insert(class.to_string());
        }
    }

    fn remove_class(&mut self, node: NodeId, class: &str) {
        if let Some(element) = self.element_mut(node) {
            element.classes.remove(class);
        }
    }

    fn set_style(&mut self, node: NodeId, property: StyleProperty, value: &str) {
        if let Some(element) = self.element_mut(node) {
            if value.is_empty() {
                element.styles.remove(&property);
            } else {
                element.styles.insert(property, value.to_string());
            }
        }
    }

    fn set_text(&mut self, node: NodeId, text: &str) {
        if let Some(element) = self.element_mut(node) {
            element.text = text.to_string();
        }
    }

    fn layout(&self, node: NodeId) -> Rect {
        self.element(node).map(|e| e.rect).unwrap_or_default()
    }

    fn scroll_y(&self) -> f64 {
        self.scroll_y
    }

    fn viewport_width(&self) -> f64 {
        self.viewport_width
    }

    fn scroll_to(&mut self, top: f64, behavior: ScrollBehavior) {
        self.scroll_requests.push(ScrollRequest { top, behavior });
        self.set_scroll_y(top);
    }

    fn location_hash(&self) -> Option<String> {
        self.location_hash.clone()
    }

    fn push_fragment(&mut self, fragment: &str) {
        self.history.push(fragment.to_string());
        self.location_hash = Some(fragment.to_string());
    }

    fn is_within(&self, node: NodeId, ancestor: NodeId) -> bool {
        self.ancestors(node).any(|n| n == ancestor)
    }

    fn is_within_link(&self, node: NodeId) -> bool {
        self.ancestors(node)
            .any(|n| self.element(n).is_some_and(|e| e.is_link))
    }

    fn current_year(&self) -> i32 {
        self.year
    }

    fn listen(&mut self, listener: Listener) {
        self.listeners.push(listener);
    }

    fn unlisten_all(&mut self) {
        self.listeners.clear();
    }

    fn observe_intersection(&mut self, node: NodeId, options: RevealOptions) {
        self.observed.insert(node, options);
    }

    fn unobserve_intersection(&mut self, node: NodeId) {
        self.observed.remove(&node);
    }

    fn schedule(&mut self, task: TaskId, delay: Duration) {
        self.timers.insert(task, self.clock + delay);
    }

    fn cancel(&mut self, task: TaskId) {
        self.timers.remove(&task);
        self.cancelled.push(task);
    }
}

// ============================================================================
// Harness
// ============================================================================

/// A bound, initialised controller over a [`MemoryView`].
pub struct Harness {
    controller: Controller<MemoryView>,
}

impl Harness {
    pub fn new(layout: PageLayout) -> PageResult<Self> {
        Self::with_config(layout, PortfolioConfig::default())
    }

    pub fn with_config(layout: PageLayout, config: PortfolioConfig) -> PageResult<Self> {
        let mut controller = Controller::bind(MemoryView::new(layout), config)?;
        controller.initialize();
        Ok(Self { controller })
    }

    pub fn controller(&self) -> &Controller<MemoryView> {
        &self.controller
    }

    pub fn controller_mut(&mut self) -> &mut Controller<MemoryView> {
        &mut self.controller
    }

    pub fn view(&self) -> &MemoryView {
        self.controller.view()
    }

    pub fn view_mut(&mut self) -> &mut MemoryView {
        self.controller.view_mut()
    }

    /// Deliver `event` once per registration of `listener`.
    fn deliver(&mut self, listener: Listener, event: PageEvent) -> EventOutcome {
        let mut outcome = EventOutcome::Default;
        for _ in 0..self.view().listener_count(listener) {
            if self.controller.dispatch(event.clone()).is_prevented() {
                outcome = EventOutcome::PreventDefault;
            }
        }
        outcome
    }

    /// Deliver a bubbling event from `node` up to the document.
    fn bubble(&mut self, node: NodeId, kind: EventKind, key: Option<Key>) -> EventOutcome {
        let path: Vec<Target> = self
            .view()
            .ancestors(node)
            .map(Target::Node)
            .chain(std::iter::once(Target::Document))
            .collect();

        let mut outcome = EventOutcome::Default;
        for target in path {
            let event = PageEvent::Input {
                target,
                kind,
                origin: Some(node),
                key: key.clone(),
            };
            if self.deliver(Listener::new(target, kind), event).is_prevented() {
                outcome = EventOutcome::PreventDefault;
            }
        }
        outcome
    }

    pub fn scroll(&mut self, scroll_y: f64) {
        self.view_mut().set_scroll_y(scroll_y);
        let listener = Listener::new(Target::Window, EventKind::Scroll);
        self.deliver(listener, PageEvent::input(Target::Window, EventKind::Scroll));
    }

    pub fn resize(&mut self, width: f64) {
        self.view_mut().set_viewport_width(width);
        let listener = Listener::new(Target::Window, EventKind::Resize);
        self.deliver(listener, PageEvent::input(Target::Window, EventKind::Resize));
    }

    pub fn load(&mut self) {
        let listener = Listener::new(Target::Window, EventKind::Load);
        self.deliver(listener, PageEvent::input(Target::Window, EventKind::Load));
    }

    pub fn click(&mut self, node: NodeId) -> EventOutcome {
        self.bubble(node, EventKind::Click, None)
    }

    pub fn key_down(&mut self, node: NodeId, key: Key) -> EventOutcome {
        self.bubble(node, EventKind::KeyDown, Some(key))
    }

    fn direct(&mut self, node: NodeId, kind: EventKind) {
        let target = Target::Node(node);
        self.deliver(Listener::new(target, kind), PageEvent::input(target, kind));
    }

    pub fn hover(&mut self, node: NodeId) {
        self.direct(node, EventKind::MouseEnter);
    }

    pub fn unhover(&mut self, node: NodeId) {
        self.direct(node, EventKind::MouseLeave);
    }

    pub fn focus(&mut self, node: NodeId) {
        self.direct(node, EventKind::Focus);
    }

    pub fn blur(&mut self, node: NodeId) {
        self.direct(node, EventKind::Blur);
    }

    /// Report an intersection change for an observed element.
    pub fn intersect(&mut self, node: NodeId, intersecting: bool) {
        if self.view().is_observed(node) {
            self.controller
                .dispatch(PageEvent::Intersection { node, intersecting });
        }
    }

    /// Advance the clock, firing every task that comes due.
    pub fn advance(&mut self, by: Duration) {
        for task in self.view_mut().advance(by) {
            self.controller.dispatch(PageEvent::TimerElapsed(task));
        }
    }

    pub fn debug(&mut self, name: &str) -> PageResult<()> {
        let command: DebugCommand = name.parse()?;
        self.controller.run_debug(command);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_portfolio_layout_shape() {
        let view = MemoryView::new(PageLayout::portfolio());
        assert_eq!(view.nodes(Landmark::Section).len(), 4);
        assert_eq!(view.nodes(Landmark::NavLink).len(), 4);
        assert_eq!(view.nodes(Landmark::ProjectCard).len(), 3);
        assert!(view.node(Landmark::ContactAction).is_some());
    }

    #[test]
    fn test_nav_links_sit_inside_nav() {
        let view = MemoryView::new(PageLayout::portfolio());
        let nav = view.node(Landmark::NavContainer).unwrap();
        for link in view.nodes(Landmark::NavLink) {
            assert!(view.is_within(link, nav));
        }
    }

    #[test]
    fn test_card_link_detection() {
        let view = MemoryView::new(PageLayout::portfolio());
        let cards = view.nodes(Landmark::ProjectCard);
        assert!(view.link_inside(cards[0]).is_none());
        let link = view.link_inside(cards[1]).unwrap();
        assert!(view.is_within_link(link));
        assert!(!view.is_within_link(cards[1]));
    }

    #[test]
    fn test_timers_fire_in_due_order() {
        let mut view = MemoryView::new(PageLayout::default());
        view.schedule(TaskId(1), Duration::from_millis(200));
        view.schedule(TaskId(2), Duration::from_millis(150));

        assert!(view.advance(Duration::from_millis(100)).is_empty());
        assert_eq!(view.advance(Duration::from_millis(100)), vec![TaskId(2), TaskId(1)]);
        assert_eq!(view.pending_timers(), 0);
    }

    #[test]
    fn test_layout_from_json() {
        let layout = PageLayout::from_json(
            r#"{"viewport_width": 500, "sections": [{"id": "a", "top": 0, "height": 10}], "omit": ["contact_action"]}"#,
        )
        .unwrap();
        assert_eq!(layout.viewport_width, 500.0);
        assert_eq!(layout.sections.len(), 1);
        assert_eq!(layout.omit, vec![Landmark::ContactAction]);
    }
}
