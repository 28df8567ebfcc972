//! Delayed visual reversions and deferred scroll passes.
//!
//! Tasks are minted here and handed to the view adapter, which reports them
//! back as `TimerElapsed`. Reversions are keyed by element: at most one is
//! pending per element, and a newer one replaces (and cancels) the older.

use std::collections::HashMap;
use std::time::Duration;

use crate::view::{NodeId, PageView, StyleProperty, TaskId};

/// Work carried by a scheduled task.
#[derive(Debug, Clone, PartialEq)]
pub enum Deferred {
    /// Restore an inline style on an element
    Revert {
        node: NodeId,
        property: StyleProperty,
        value: String,
    },
    /// Run the coalesced scroll passes
    ScrollPass,
}

#[derive(Debug, Default)]
pub struct Scheduler {
    next_id: u64,
    tasks: HashMap<TaskId, Deferred>,
    by_node: HashMap<NodeId, TaskId>,
    scroll_pass: Option<TaskId>,
}

impl Scheduler {
    pub fn new() -> Self {
        Self::default()
    }

    fn mint(&mut self) -> TaskId {
        self.next_id += 1;
        TaskId(self.next_id)
    }

    /// Schedule `property` on `node` to be restored to `value` after `delay`.
    pub fn schedule_revert<V: PageView>(
        &mut self,
        view: &mut V,
        node: NodeId,
        property: StyleProperty,
        value: impl Into<String>,
        delay: Duration,
    ) -> TaskId {
        self.cancel_revert(view, node);
        let task = self.mint();
        self.tasks.insert(
            task,
            Deferred::Revert {
                node,
                property,
                value: value.into(),
            },
        );
        self.by_node.insert(node, task);
        view.schedule(task, delay);
        tracing::trace!(%node, task = task.0, "scheduled reversion");
        task
    }

    /// Drop the pending reversion for `node`, if any.
    pub fn cancel_revert<V: PageView>(&mut self, view: &mut V, node: NodeId) -> bool {
        match self.by_node.remove(&node) {
            Some(task) => {
                self.tasks.remove(&task);
                view.cancel(task);
                true
            }
            None => false,
        }
    }

    /// Schedule a coalesced scroll pass unless one is already waiting.
    pub fn schedule_scroll_pass<V: PageView>(&mut self, view: &mut V, delay: Duration) -> bool {
        if self.scroll_pass.is_some() {
            return false;
        }
        let task = self.mint();
        self.tasks.insert(task, Deferred::ScrollPass);
        self.scroll_pass = Some(task);
        view.schedule(task, delay);
        true
    }

    /// Claim the work for a task that came due. Unknown or cancelled tasks
    /// yield `None`.
    pub fn take(&mut self, task: TaskId) -> Option<Deferred> {
        let deferred = self.tasks.remove(&task)?;
        match &deferred {
            Deferred::Revert { node, .. } => {
                if self.by_node.get(node) == Some(&task) {
                    self.by_node.remove(node);
                }
            }
            Deferred::ScrollPass => self.scroll_pass = None,
        }
        Some(deferred)
    }

    pub fn pending_count(&self) -> usize {
        self.tasks.len()
    }
}
