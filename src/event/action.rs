//! Prioritized action dispatch.
//!
//! [`ActionService`] holds named bindings, each matching a set of
//! [`Trigger`]s. Every input event is offered to matching bindings in
//! ascending priority order until one sinks it. Internal bindings (text
//! editing and the like) sit in their own band ahead of every user binding.

use std::fmt;

use super::input::{EventKind, InputEvent, Key};
use crate::error::{GuiError, Result};
use crate::scene::Scene;

/// Priority added to internal bindings when reporting their effective
/// priority. Internal bindings always dispatch before user bindings,
/// whatever their raw priority.
pub const INTERNAL_PRIORITY_THRESHOLD: i64 = 1000;

// ---------------------------------------------------------------------------
// ActionResult / Trigger
// ---------------------------------------------------------------------------

/// What a binding did with an event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ActionResult {
    /// Consumed: stop dispatch for the rest of this frame's batch.
    Sink,
    /// Not consumed: offer the event to the next binding.
    Pass,
}

/// What an action binding responds to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Trigger {
    /// Any event of this kind.
    Kind(EventKind),
    /// Any event carrying this key, pressed or released.
    Key(Key),
}

impl Trigger {
    pub fn matches(&self, event: &InputEvent) -> bool {
        match self {
            Trigger::Kind(kind) => event.kind() == *kind,
            Trigger::Key(key) => event.key() == Some(*key),
        }
    }
}

impl From<Key> for Trigger {
    fn from(key: Key) -> Self {
        Trigger::Key(key)
    }
}

impl From<EventKind> for Trigger {
    fn from(kind: EventKind) -> Self {
        Trigger::Kind(kind)
    }
}

/// Callback run for a matching event.
pub type ActionCallback = Box<dyn FnMut(&InputEvent, &mut Scene) -> Result<ActionResult>>;

// ---------------------------------------------------------------------------
// ActionService
// ---------------------------------------------------------------------------

struct ActionBinding {
    name: String,
    triggers: Vec<Trigger>,
    priority: i64,
    internal: bool,
    callback: ActionCallback,
}

impl ActionBinding {
    fn sort_key(&self) -> (u8, i64) {
        (u8::from(!self.internal), self.priority)
    }
}

impl fmt::Debug for ActionBinding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ActionBinding")
            .field("name", &self.name)
            .field("triggers", &self.triggers)
            .field("priority", &self.priority)
            .field("internal", &self.internal)
            .finish_non_exhaustive()
    }
}

/// Registry of named action bindings, kept in dispatch order.
#[derive(Debug, Default)]
pub struct ActionService {
    bindings: Vec<ActionBinding>,
}

impl ActionService {
    pub fn new() -> Self {
        Self::default()
    }

    /// Bind a user action. Names must be unique among bound actions.
    pub fn bind(
        &mut self,
        name: impl Into<String>,
        triggers: impl IntoIterator<Item = Trigger>,
        priority: i64,
        callback: impl FnMut(&InputEvent, &mut Scene) -> Result<ActionResult> + 'static,
    ) -> Result<()> {
        self.insert(name.into(), triggers.into_iter().collect(), priority, false, Box::new(callback))
    }

    /// Bind an engine-internal action, dispatched ahead of every user action.
    pub fn bind_internal(
        &mut self,
        name: impl Into<String>,
        triggers: impl IntoIterator<Item = Trigger>,
        priority: i64,
        callback: impl FnMut(&InputEvent, &mut Scene) -> Result<ActionResult> + 'static,
    ) -> Result<()> {
        self.insert(name.into(), triggers.into_iter().collect(), priority, true, Box::new(callback))
    }

    fn insert(
        &mut self,
        name: String,
        triggers: Vec<Trigger>,
        priority: i64,
        internal: bool,
        callback: ActionCallback,
    ) -> Result<()> {
        if self.is_bound(&name) {
            return Err(GuiError::DuplicateAction(name));
        }
        let binding = ActionBinding { name, triggers, priority, internal, callback };
        // After every binding with an equal key, so ties dispatch in bind order.
        let key = binding.sort_key();
        let at = self.bindings.partition_point(|b| b.sort_key() <= key);
        tracing::debug!(name = %binding.name, priority, internal, "action bound");
        self.bindings.insert(at, binding);
        Ok(())
    }

    /// Remove a binding. Unknown names are ignored.
    pub fn unbind(&mut self, name: &str) -> bool {
        let before = self.bindings.len();
        self.bindings.retain(|b| b.name != name);
        let removed = self.bindings.len() != before;
        if removed {
            tracing::debug!(name, "action unbound");
        }
        removed
    }

    pub fn is_bound(&self, name: &str) -> bool {
        self.bindings.iter().any(|b| b.name == name)
    }

    /// Bound action names in dispatch order.
    pub fn names(&self) -> Vec<&str> {
        self.bindings.iter().map(|b| b.name.as_str()).collect()
    }

    /// The priority a binding dispatches at: internal bindings report
    /// theirs offset by [`INTERNAL_PRIORITY_THRESHOLD`].
    pub fn effective_priority(&self, name: &str) -> Option<i64> {
        self.bindings.iter().find(|b| b.name == name).map(|b| {
            if b.internal {
                b.priority + INTERNAL_PRIORITY_THRESHOLD
            } else {
                b.priority
            }
        })
    }

    pub fn len(&self) -> usize {
        self.bindings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bindings.is_empty()
    }

    /// Drop every binding.
    pub fn reset(&mut self) {
        self.bindings.clear();
    }

    /// Offer each event to the matching bindings in order.
    ///
    /// The first [`ActionResult::Sink`] ends dispatch for the remaining
    /// bindings and the remaining events of the batch. A failing callback is
    /// logged and treated as [`ActionResult::Pass`].
    pub fn dispatch(&mut self, events: &[InputEvent], scene: &mut Scene) -> ActionResult {
        for event in events {
            for binding in self.bindings.iter_mut() {
                if !binding.triggers.iter().any(|t| t.matches(event)) {
                    continue;
                }
                match (binding.callback)(event, scene) {
                    Ok(ActionResult::Sink) => {
                        tracing::trace!(action = %binding.name, ?event, "event sunk");
                        return ActionResult::Sink;
                    }
                    Ok(ActionResult::Pass) => {}
                    Err(err) => {
                        tracing::error!(action = %binding.name, error = %err, "action callback failed");
                    }
                }
            }
        }
        ActionResult::Pass
    }
}
