//! Host events delivered to the controller.
//!
//! Adapters translate whatever their host produces into [`PageEvent`] and hand
//! it to [`crate::Controller::dispatch`]. The returned [`EventOutcome`] tells
//! the adapter whether to suppress the host's default action.

use crate::view::{EventKind, NodeId, Target, TaskId};

/// Keys the controller reacts to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Key {
    Enter,
    Space,
    Escape,
    Other(String),
}

impl Key {
    /// Map a DOM `KeyboardEvent.key` value.
    pub fn from_dom(key: &str) -> Self {
        match key {
            "Enter" => Key::Enter,
            " " | "Spacebar" => Key::Space,
            "Escape" | "Esc" => Key::Escape,
            other => Key::Other(other.to_string()),
        }
    }

    /// Keys that activate a focused control.
    pub fn activates(&self) -> bool {
        matches!(self, Key::Enter | Key::Space)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum PageEvent {
    /// A subscribed listener fired.
    Input {
        /// Where the listener was attached
        target: Target,
        kind: EventKind,
        /// Element the event originated on, when the host reports one
        origin: Option<NodeId>,
        key: Option<Key>,
    },
    /// An observed section crossed the reveal threshold.
    Intersection { node: NodeId, intersecting: bool },
    /// A scheduled task came due.
    TimerElapsed(TaskId),
}

impl PageEvent {
    pub fn input(target: Target, kind: EventKind) -> Self {
        PageEvent::Input {
            target,
            kind,
            origin: None,
            key: None,
        }
    }

    pub fn click(target: Target, origin: NodeId) -> Self {
        PageEvent::Input {
            target,
            kind: EventKind::Click,
            origin: Some(origin),
            key: None,
        }
    }

    pub fn key_down(target: Target, key: Key) -> Self {
        PageEvent::Input {
            target,
            kind: EventKind::KeyDown,
            origin: None,
            key: Some(key),
        }
    }
}

/// What the adapter should do with the host's default action.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum EventOutcome {
    /// Let the host proceed
    #[default]
    Default,
    /// Suppress the host's default action
    PreventDefault,
}

impl EventOutcome {
    pub fn is_prevented(&self) -> bool {
        matches!(self, EventOutcome::PreventDefault)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_key_mapping() {
        assert_eq!(Key::from_dom("Enter"), Key::Enter);
        assert_eq!(Key::from_dom(" "), Key::Space);
        assert_eq!(Key::from_dom("Escape"), Key::Escape);
        assert_eq!(Key::from_dom("a"), Key::Other("a".to_string()));
    }

    #[test]
    fn test_activation_keys() {
        assert!(Key::Enter.activates());
        assert!(Key::Space.activates());
        assert!(!Key::Escape.activates());
    }
}
