//! View adapter boundary.
//!
//! The controller never touches a rendering surface directly. Everything it
//! reads (layout, scroll position, attributes) and everything it writes
//! (classes, inline styles, history) goes through [`PageView`]. The browser
//! binding implements it over `web-sys`; `headless::MemoryView`
//! implements it in memory for tests.
//!
//! ## Handles
//!
//! Elements are referred to by [`NodeId`], an opaque handle minted by the
//! adapter. Handles are stable for the lifetime of the page and comparable,
//! which lets the controller key per-element state (reveal latches, pending
//! reversions) without holding host objects.

use std::fmt;
use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Opaque handle to an element owned by a view adapter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(pub u32);

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "node#{}", self.0)
    }
}

/// Structural role of an element the controller binds to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Landmark {
    Section,
    NavLink,
    MenuToggle,
    NavContainer,
    Header,
    SkipLink,
    ProjectCard,
    ContactAction,
    YearSlot,
    Body,
}

impl Landmark {
    /// Whether initialisation must fail when this landmark is absent.
    pub fn is_required(&self) -> bool {
        matches!(
            self,
            Landmark::MenuToggle
                | Landmark::NavContainer
                | Landmark::Header
                | Landmark::SkipLink
                | Landmark::Body
        )
    }
}

impl fmt::Display for Landmark {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Landmark::Section => "section",
            Landmark::NavLink => "nav link",
            Landmark::MenuToggle => "menu toggle",
            Landmark::NavContainer => "nav container",
            Landmark::Header => "header",
            Landmark::SkipLink => "skip link",
            Landmark::ProjectCard => "project card",
            Landmark::ContactAction => "contact action",
            Landmark::YearSlot => "year slot",
            Landmark::Body => "body",
        };
        f.write_str(name)
    }
}

/// Inline style properties the controller writes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum StyleProperty {
    BoxShadow,
    BackdropFilter,
    Transform,
    AnimationDelay,
    Overflow,
    Top,
}

impl StyleProperty {
    /// CSS property name.
    pub fn css_name(&self) -> &'static str {
        match self {
            StyleProperty::BoxShadow => "box-shadow",
            StyleProperty::BackdropFilter => "backdrop-filter",
            StyleProperty::Transform => "transform",
            StyleProperty::AnimationDelay => "animation-delay",
            StyleProperty::Overflow => "overflow",
            StyleProperty::Top => "top",
        }
    }
}

/// Layout metrics of an element relative to the document.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Rect {
    pub top: f64,
    pub height: f64,
}

impl Rect {
    /// Half-open vertical containment: `[top, top + height)`.
    pub fn contains_y(&self, y: f64) -> bool {
        y >= self.top && y < self.top + self.height
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScrollBehavior {
    Smooth,
    Instant,
}

/// Options for a viewport-intersection watch.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RevealOptions {
    pub threshold: f64,
    pub bottom_margin: f64,
}

impl RevealOptions {
    /// CSS root margin string, e.g. `0px 0px -100px 0px`.
    pub fn root_margin(&self) -> String {
        format!("0px 0px {}px 0px", self.bottom_margin)
    }
}

/// Identifier of a delayed callback handed to the adapter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TaskId(pub u64);

/// Where a listener is attached.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Target {
    Window,
    Document,
    Node(NodeId),
}

/// Host event kinds the controller subscribes to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EventKind {
    Scroll,
    Resize,
    Load,
    Click,
    KeyDown,
    MouseEnter,
    MouseLeave,
    Focus,
    Blur,
}

impl EventKind {
    /// DOM event type name.
    pub fn dom_name(&self) -> &'static str {
        match self {
            EventKind::Scroll => "scroll",
            EventKind::Resize => "resize",
            EventKind::Load => "load",
            EventKind::Click => "click",
            EventKind::KeyDown => "keydown",
            EventKind::MouseEnter => "mouseenter",
            EventKind::MouseLeave => "mouseleave",
            EventKind::Focus => "focus",
            EventKind::Blur => "blur",
        }
    }
}

/// A listener subscription request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Listener {
    pub target: Target,
    pub kind: EventKind,
}

impl Listener {
    pub fn new(target: Target, kind: EventKind) -> Self {
        Self { target, kind }
    }
}

/// Host surface the controller drives.
///
/// Queries take `&mut self` because adapters mint [`NodeId`] handles lazily.
pub trait PageView {
    /// All elements with the given role, in document order.
    fn query_all(&mut self, landmark: Landmark) -> Vec<NodeId>;

    /// First element with the given role.
    fn query_one(&mut self, landmark: Landmark) -> Option<NodeId> {
        self.query_all(landmark).into_iter().next()
    }

    /// Element whose `id` attribute equals `id`.
    fn element_by_id(&mut self, id: &str) -> Option<NodeId>;

    fn attribute(&self, node: NodeId, name: &str) -> Option<String>;
    fn set_attribute(&mut self, node: NodeId, name: &str, value: &str);
    fn remove_attribute(&mut self, node: NodeId, name: &str);

    fn has_class(&self, node: NodeId, class: &str) -> bool;
    fn add_class(&mut self, node: NodeId, class: &str);
    fn remove_class(&mut self, node: NodeId, class: &str);

    /// Write an inline style; an empty value clears the property.
    fn set_style(&mut self, node: NodeId, property: StyleProperty, value: &str);
    fn set_text(&mut self, node: NodeId, text: &str);

    /// Offset and height of an element within the document.
    fn layout(&self, node: NodeId) -> Rect;
    fn scroll_y(&self) -> f64;
    fn viewport_width(&self) -> f64;
    fn scroll_to(&mut self, top: f64, behavior: ScrollBehavior);

    /// Current location fragment including the leading `#`, if any.
    fn location_hash(&self) -> Option<String>;
    /// Rewrite the location fragment without navigating.
    fn push_fragment(&mut self, fragment: &str);

    /// Whether `node` is `ancestor` or one of its descendants.
    fn is_within(&self, node: NodeId, ancestor: NodeId) -> bool;
    /// Whether `node` sits inside a hyperlink.
    fn is_within_link(&self, node: NodeId) -> bool;

    fn current_year(&self) -> i32;

    fn listen(&mut self, listener: Listener);
    /// Drop every listener registered through [`PageView::listen`].
    fn unlisten_all(&mut self);

    fn observe_intersection(&mut self, node: NodeId, options: RevealOptions);
    fn unobserve_intersection(&mut self, node: NodeId);

    /// Deliver `TimerElapsed(task)` to the controller after `delay`.
    fn schedule(&mut self, task: TaskId, delay: Duration);
    fn cancel(&mut self, task: TaskId);
}
