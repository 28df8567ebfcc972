//! [`PageView`] over the live DOM.
//!
//! Elements are registered on first sight and addressed by index afterwards.
//! Listeners, timers and the intersection observer are owned here so that
//! dropping them (re-initialisation, cancellation) detaches them from the page.

use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;
use std::time::Duration;

use chrono::Datelike;
use gloo::events::{EventListener, EventListenerOptions};
use gloo::timers::callback::Timeout;
use portfolio_core::{
    EventKind, Key, Landmark, LandmarkSelectors, Listener, NodeId, PageEvent, PageView, Rect,
    RevealOptions, ScrollBehavior, StyleProperty, Target, TaskId,
};
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use web_sys::{
    Document, Element, Event, EventTarget, HtmlElement, IntersectionObserver,
    IntersectionObserverEntry, IntersectionObserverInit, KeyboardEvent, ScrollToOptions, Window,
};

use crate::app::Dispatcher;

type ObserverCallback = Closure<dyn FnMut(js_sys::Array, IntersectionObserver)>;

pub struct DomView {
    window: Window,
    document: Document,
    selectors: LandmarkSelectors,
    dispatcher: Dispatcher,
    nodes: HandleTable<Element>,
    listeners: Vec<EventListener>,
    observer: Option<(IntersectionObserver, ObserverCallback)>,
    timers: TimerSlots<Timeout>,
}

/// Host objects addressed by [`NodeId`], one handle per distinct object.
pub(crate) struct HandleTable<T> {
    items: Vec<T>,
}

impl<T: PartialEq> HandleTable<T> {
    pub(crate) fn new() -> Self {
        Self { items: Vec::new() }
    }

    /// Handle for `item`, minting one if it has not been seen before.
    pub(crate) fn register(&mut self, item: T) -> NodeId {
        if let Some(index) = self.items.iter().position(|known| *known == item) {
            return NodeId(index as u32);
        }
        self.items.push(item);
        NodeId((self.items.len() - 1) as u32)
    }

    pub(crate) fn get(&self, node: NodeId) -> Option<&T> {
        self.items.get(node.0 as usize)
    }
}

/// Pending timeout handles keyed by task.
///
/// A timeout callback reports its task through [`TimerSlots::fired_sink`];
/// those handles are released on the next insert. Dropping a handle clears
/// the timeout, so cancelling is a removal.
pub(crate) struct TimerSlots<H> {
    live: HashMap<TaskId, H>,
    fired: Rc<RefCell<Vec<TaskId>>>,
}

impl<H> TimerSlots<H> {
    pub(crate) fn new() -> Self {
        Self {
            live: HashMap::new(),
            fired: Rc::new(RefCell::new(Vec::new())),
        }
    }

    pub(crate) fn fired_sink(&self) -> Rc<RefCell<Vec<TaskId>>> {
        Rc::clone(&self.fired)
    }

    pub(crate) fn insert(&mut self, task: TaskId, handle: H) {
        self.prune();
        self.live.insert(task, handle);
    }

    pub(crate) fn cancel(&mut self, task: TaskId) -> bool {
        self.live.remove(&task).is_some()
    }

    fn prune(&mut self) {
        let done: Vec<TaskId> = self.fired.borrow_mut().drain(..).collect();
        for task in done {
            self.live.remove(&task);
        }
    }

    #[cfg(test)]
    fn live_count(&self) -> usize {
        self.live.len()
    }
}

impl DomView {
    pub fn new(
        window: Window,
        document: Document,
        selectors: LandmarkSelectors,
        dispatcher: Dispatcher,
    ) -> Self {
        Self {
            window,
            document,
            selectors,
            dispatcher,
            nodes: HandleTable::new(),
            listeners: Vec::new(),
            observer: None,
            timers: TimerSlots::new(),
        }
    }

    /// Handle for `element`, minting one if it has not been seen before.
    pub fn register(&mut self, element: Element) -> NodeId {
        self.nodes.register(element)
    }

    fn element(&self, node: NodeId) -> Option<&Element> {
        self.nodes.get(node)
    }

    fn html(&self, node: NodeId) -> Option<&HtmlElement> {
        self.element(node)?.dyn_ref::<HtmlElement>()
    }

    fn selector(&self, landmark: Landmark) -> Option<&str> {
        let s = &self.selectors;
        let selector = match landmark {
            Landmark::Section => &s.sections,
            Landmark::NavLink => &s.nav_links,
            Landmark::MenuToggle => &s.menu_toggle,
            Landmark::NavContainer => &s.nav_container,
            Landmark::Header => &s.header,
            Landmark::SkipLink => &s.skip_link,
            Landmark::ProjectCard => &s.project_cards,
            Landmark::ContactAction => &s.contact_action,
            Landmark::YearSlot => &s.year_slot,
            Landmark::Body => return None,
        };
        Some(selector.as_str())
    }

    fn event_target(&self, target: Target) -> Option<EventTarget> {
        match target {
            Target::Window => Some(EventTarget::from(self.window.clone())),
            Target::Document => Some(EventTarget::from(self.document.clone())),
            Target::Node(node) => self.element(node).cloned().map(EventTarget::from),
        }
    }

    fn ensure_observer(&mut self, options: RevealOptions) -> Option<&IntersectionObserver> {
        if self.observer.is_none() {
            let dispatcher = self.dispatcher.clone();
            let callback: ObserverCallback = Closure::new(
                move |entries: js_sys::Array, _observer: IntersectionObserver| {
                    for entry in entries.iter() {
                        let entry: IntersectionObserverEntry = entry.unchecked_into();
                        let target = entry.target();
                        let intersecting = entry.is_intersecting();
                        dispatcher.dispatch(move |view| PageEvent::Intersection {
                            node: view.register(target),
                            intersecting,
                        });
                    }
                },
            );

            let init = IntersectionObserverInit::new();
            init.set_threshold(&JsValue::from_f64(options.threshold));
            init.set_root_margin(&options.root_margin());

            match IntersectionObserver::new_with_options(callback.as_ref().unchecked_ref(), &init) {
                Ok(observer) => self.observer = Some((observer, callback)),
                Err(err) => {
                    tracing::warn!(?err, "intersection observer unavailable, reveal disabled");
                    return None;
                }
            }
        }
        self.observer.as_ref().map(|(observer, _)| observer)
    }
}

impl PageView for DomView {
    fn query_all(&mut self, landmark: Landmark) -> Vec<NodeId> {
        let Some(selector) = self.selector(landmark) else {
            return self.query_one(landmark).into_iter().collect();
        };
        let list = match self.document.query_selector_all(selector) {
            Ok(list) => list,
            Err(err) => {
                tracing::warn!(%landmark, ?err, "selector rejected");
                return Vec::new();
            }
        };
        let elements: Vec<Element> = (0..list.length())
            .filter_map(|i| list.get(i))
            .filter_map(|node| node.dyn_into::<Element>().ok())
            .collect();
        elements.into_iter().map(|e| self.register(e)).collect()
    }

    fn query_one(&mut self, landmark: Landmark) -> Option<NodeId> {
        let element = match self.selector(landmark) {
            Some(selector) => self.document.query_selector(selector).ok().flatten()?,
            None => self.document.body()?.into(),
        };
        Some(self.register(element))
    }

    fn element_by_id(&mut self, id: &str) -> Option<NodeId> {
        let element = self.document.get_element_by_id(id)?;
        Some(self.register(element))
    }

    fn attribute(&self, node: NodeId, name: &str) -> Option<String> {
        self.element(node)?.get_attribute(name)
    }

    fn set_attribute(&mut self, node: NodeId, name: &str, value: &str) {
        if let Some(element) = self.element(node) {
            if let Err(err) = element.set_attribute(name, value) {
                tracing::warn!(%node, name, ?err, "set_attribute failed");
            }
        }
    }

    fn remove_attribute(&mut self, node: NodeId, name: &str) {
        if let Some(element) = self.element(node) {
            let _ = element.remove_attribute(name);
        }
    }

    fn has_class(&self, node: NodeId, class: &str) -> bool {
        self.element(node)
            .is_some_and(|e| e.class_list().contains(class))
    }

    fn add_class(&mut self, node: NodeId, class: &str) {
        if let Some(element) = self.element(node) {
            let _ = element.class_list().add_1(class);
        }
    }

    fn remove_class(&mut self, node: NodeId, class: &str) {
        if let Some(element) = self.element(node) {
            let _ = element.class_list().remove_1(class);
        }
    }

    fn set_style(&mut self, node: NodeId, property: StyleProperty, value: &str) {
        let Some(element) = self.html(node) else {
            return;
        };
        let style = element.style();
        let result = if value.is_empty() {
            style.remove_property(property.css_name()).map(|_| ())
        } else {
            style.set_property(property.css_name(), value)
        };
        if let Err(err) = result {
            tracing::warn!(%node, property = property.css_name(), ?err, "style write failed");
        }
    }

    fn set_text(&mut self, node: NodeId, text: &str) {
        if let Some(element) = self.element(node) {
            element.set_text_content(Some(text));
        }
    }

    fn layout(&self, node: NodeId) -> Rect {
        match self.html(node) {
            Some(element) => Rect {
                top: f64::from(element.offset_top()),
                height: f64::from(element.client_height()),
            },
            None => Rect::default(),
        }
    }

    fn scroll_y(&self) -> f64 {
        self.window.scroll_y().unwrap_or(0.0)
    }

    fn viewport_width(&self) -> f64 {
        self.window
            .inner_width()
            .ok()
            .and_then(|w| w.as_f64())
            .unwrap_or(0.0)
    }

    fn scroll_to(&mut self, top: f64, behavior: ScrollBehavior) {
        let options = ScrollToOptions::new();
        options.set_top(top);
        options.set_behavior(match behavior {
            ScrollBehavior::Smooth => web_sys::ScrollBehavior::Smooth,
            ScrollBehavior::Instant => web_sys::ScrollBehavior::Instant,
        });
        self.window.scroll_to_with_scroll_to_options(&options);
    }

    fn location_hash(&self) -> Option<String> {
        self.window
            .location()
            .hash()
            .ok()
            .filter(|hash| !hash.is_empty())
    }

    fn push_fragment(&mut self, fragment: &str) {
        let pushed = self
            .window
            .history()
            .and_then(|history| history.push_state_with_url(&JsValue::NULL, "", Some(fragment)));
        if let Err(err) = pushed {
            tracing::warn!(fragment, ?err, "history update failed");
        }
    }

    fn is_within(&self, node: NodeId, ancestor: NodeId) -> bool {
        match (self.element(node), self.element(ancestor)) {
            (Some(node), Some(ancestor)) => {
                let node: &web_sys::Node = node;
                ancestor.contains(Some(node))
            }
            _ => false,
        }
    }

    fn is_within_link(&self, node: NodeId) -> bool {
        self.element(node)
            .and_then(|e| e.closest("a").ok().flatten())
            .is_some()
    }

    fn current_year(&self) -> i32 {
        chrono::Local::now().year()
    }

    fn listen(&mut self, listener: Listener) {
        let Listener { target, kind } = listener;
        let Some(event_target) = self.event_target(target) else {
            return;
        };

        let dispatcher = self.dispatcher.clone();
        let callback = move |event: &Event| {
            let origin = event.target().and_then(|t| t.dyn_into::<Element>().ok());
            let key = event
                .dyn_ref::<KeyboardEvent>()
                .map(|k| Key::from_dom(&k.key()));
            let outcome = dispatcher.dispatch(move |view| PageEvent::Input {
                target,
                kind,
                origin: origin.map(|e| view.register(e)),
                key,
            });
            if outcome.is_prevented() {
                event.prevent_default();
            }
        };

        let handle = match kind {
            EventKind::Click | EventKind::KeyDown => EventListener::new_with_options(
                &event_target,
                kind.dom_name(),
                EventListenerOptions::enable_prevent_default(),
                callback,
            ),
            _ => EventListener::new(&event_target, kind.dom_name(), callback),
        };
        self.listeners.push(handle);

        // `load` never fires again once the page has finished loading.
        if kind == EventKind::Load && self.document.ready_state() == "complete" {
            let dispatcher = self.dispatcher.clone();
            let _ = Timeout::new(0, move || {
                dispatcher.dispatch(|_| PageEvent::input(Target::Window, EventKind::Load));
            })
            .forget();
        }
    }

    fn unlisten_all(&mut self) {
        self.listeners.clear();
    }

    fn observe_intersection(&mut self, node: NodeId, options: RevealOptions) {
        let Some(element) = self.element(node).cloned() else {
            return;
        };
        if let Some(observer) = self.ensure_observer(options) {
            observer.observe(&element);
        }
    }

    fn unobserve_intersection(&mut self, node: NodeId) {
        if let (Some(element), Some((observer, _))) = (self.element(node), &self.observer) {
            observer.unobserve(element);
        }
    }

    fn schedule(&mut self, task: TaskId, delay: Duration) {
        let dispatcher = self.dispatcher.clone();
        let fired = self.timers.fired_sink();
        let millis = u32::try_from(delay.as_millis()).unwrap_or(u32::MAX);
        let timeout = Timeout::new(millis, move || {
            dispatcher.dispatch(|_| PageEvent::TimerElapsed(task));
            fired.borrow_mut().push(task);
        });
        self.timers.insert(task, timeout);
    }

    fn cancel(&mut self, task: TaskId) {
        self.timers.cancel(task);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_handles_are_deduplicated() {
        let mut table = HandleTable::new();
        let header = table.register("header");
        let nav = table.register("nav");

        assert_ne!(header, nav);
        assert_eq!(table.register("header"), header);
        assert_eq!(table.get(nav), Some(&"nav"));
        assert_eq!(table.get(NodeId(9)), None);
    }

    #[test]
    fn test_fired_timers_released_on_next_insert() {
        let mut timers = TimerSlots::new();
        timers.insert(TaskId(1), "pulse");
        timers.insert(TaskId(2), "scroll");

        timers.fired_sink().borrow_mut().push(TaskId(1));
        assert_eq!(timers.live_count(), 2);

        timers.insert(TaskId(3), "pulse");
        assert_eq!(timers.live_count(), 2);
        assert!(!timers.cancel(TaskId(1)));
        assert!(timers.cancel(TaskId(2)));
        assert!(!timers.cancel(TaskId(2)));
    }

    #[test]
    fn test_cancel_drops_handle() {
        let dropped = Rc::new(RefCell::new(0));
        struct Handle(Rc<RefCell<u32>>);
        impl Drop for Handle {
            fn drop(&mut self) {
                *self.0.borrow_mut() += 1;
            }
        }

        let mut timers = TimerSlots::new();
        timers.insert(TaskId(4), Handle(Rc::clone(&dropped)));
        assert!(timers.cancel(TaskId(4)));
        assert_eq!(*dropped.borrow(), 1);
    }
}
