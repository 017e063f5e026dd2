//! Signal<A> and Connection: an ordered observer list.
//!
//! Callbacks live in a generational slot map, with a separate key list for
//! connection order. A stale connection handle can never reach someone
//! else's callback, disconnecting while the signal is firing is safe, and
//! disconnected slots are freed rather than left behind.

use std::cell::RefCell;
use std::fmt;
use std::rc::{Rc, Weak};

use slotmap::{new_key_type, SlotMap};

new_key_type! {
    struct SlotKey;
}

// ---------------------------------------------------------------------------
// Slots
// ---------------------------------------------------------------------------

type Callback<A> = Box<dyn FnMut(&A)>;

enum Slot<A> {
    Live(Callback<A>),
    /// The callback has been taken out while it runs.
    Firing,
}

struct SignalInner<A> {
    slots: SlotMap<SlotKey, Slot<A>>,
    /// Connected keys in connection order.
    order: Vec<SlotKey>,
}

/// Type-erased view of a signal used by [`Connection`].
trait SlotOwner {
    fn disconnect(&self, key: SlotKey);
    fn is_connected(&self, key: SlotKey) -> bool;
}

impl<A> SlotOwner for RefCell<SignalInner<A>> {
    fn disconnect(&self, key: SlotKey) {
        let mut inner = self.borrow_mut();
        if inner.slots.remove(key).is_some() {
            inner.order.retain(|&k| k != key);
        }
    }

    fn is_connected(&self, key: SlotKey) -> bool {
        self.borrow().slots.contains_key(key)
    }
}

// ---------------------------------------------------------------------------
// Signal
// ---------------------------------------------------------------------------

/// An ordered list of callbacks fired with a borrowed payload.
///
/// Cloning a `Signal` yields another handle to the same callback list.
pub struct Signal<A: 'static> {
    inner: Rc<RefCell<SignalInner<A>>>,
}

impl<A: 'static> Clone for Signal<A> {
    fn clone(&self) -> Self {
        Self { inner: Rc::clone(&self.inner) }
    }
}

impl<A: 'static> Default for Signal<A> {
    fn default() -> Self {
        Self::new()
    }
}

impl<A: 'static> fmt::Debug for Signal<A> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Signal")
            .field("connections", &self.connection_count())
            .finish()
    }
}

impl<A: 'static> Signal<A> {
    /// Create a signal with no connections.
    pub fn new() -> Self {
        Self {
            inner: Rc::new(RefCell::new(SignalInner { slots: SlotMap::with_key(), order: Vec::new() })),
        }
    }

    /// Append a callback. Callbacks run in connection order.
    pub fn connect(&self, callback: impl FnMut(&A) + 'static) -> Connection {
        let key = {
            let mut inner = self.inner.borrow_mut();
            let key = inner.slots.insert(Slot::Live(Box::new(callback)));
            inner.order.push(key);
            key
        };
        let owner: Rc<dyn SlotOwner> = self.inner.clone();
        Connection { owner: Rc::downgrade(&owner), key }
    }

    /// Invoke every connected callback with `value`.
    ///
    /// Callbacks connected during the fire are not invoked until the next
    /// fire. A callback that re-fires its own signal is skipped for the
    /// nested fire.
    pub fn fire(&self, value: &A) {
        let order = self.inner.borrow().order.clone();
        for key in order {
            let taken = {
                let mut inner = self.inner.borrow_mut();
                let Some(slot) = inner.slots.get_mut(key) else { continue };
                if !matches!(slot, Slot::Live(_)) {
                    continue;
                }
                std::mem::replace(slot, Slot::Firing)
            };
            let Slot::Live(mut callback) = taken else { continue };
            callback(value);
            let mut inner = self.inner.borrow_mut();
            // Missing means the callback disconnected itself mid-fire.
            if let Some(slot) = inner.slots.get_mut(key) {
                *slot = Slot::Live(callback);
            }
        }
    }

    /// Disconnect every callback.
    pub fn disconnect_all(&self) {
        let mut inner = self.inner.borrow_mut();
        inner.slots.clear();
        inner.order.clear();
    }

    /// Number of live connections.
    pub fn connection_count(&self) -> usize {
        self.inner.borrow().slots.len()
    }
}

// ---------------------------------------------------------------------------
// Connection
// ---------------------------------------------------------------------------

/// Handle returned by [`Signal::connect`].
///
/// Dropping a `Connection` does *not* disconnect; call [`Connection::disconnect`].
pub struct Connection {
    owner: Weak<dyn SlotOwner>,
    key: SlotKey,
}

impl Connection {
    /// Remove the callback from its signal. Repeated calls are no-ops.
    pub fn disconnect(&self) {
        if let Some(owner) = self.owner.upgrade() {
            owner.disconnect(self.key);
        }
    }

    /// Whether the callback is still attached to a live signal.
    pub fn is_connected(&self) -> bool {
        self.owner
            .upgrade()
            .is_some_and(|owner| owner.is_connected(self.key))
    }
}

impl fmt::Debug for Connection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Connection")
            .field("key", &self.key)
            .field("connected", &self.is_connected())
            .finish()
    }
}

// ===========================================================================
// Tests
// ===========================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;

    fn recorder() -> (Rc<RefCell<Vec<String>>>, impl Fn(&'static str) -> Box<dyn FnMut(&i32)>) {
        let log = Rc::new(RefCell::new(Vec::new()));
        let log_c = log.clone();
        let make = move |tag: &'static str| -> Box<dyn FnMut(&i32)> {
            let log = log_c.clone();
            Box::new(move |v: &i32| log.borrow_mut().push(format!("{tag}:{v}")))
        };
        (log, make)
    }

    #[test]
    fn fires_in_connection_order() {
        let signal = Signal::new();
        let (log, make) = recorder();
        signal.connect(make("a"));
        signal.connect(make("b"));
        signal.connect(make("c"));
        signal.fire(&1);
        assert_eq!(*log.borrow(), vec!["a:1", "b:1", "c:1"]);
    }

    #[test]
    fn disconnect_removes_only_that_callback() {
        let signal = Signal::new();
        let (log, make) = recorder();
        signal.connect(make("a"));
        let b = signal.connect(make("b"));
        signal.connect(make("c"));
        b.disconnect();
        assert!(!b.is_connected());
        signal.fire(&2);
        assert_eq!(*log.borrow(), vec!["a:2", "c:2"]);
        assert_eq!(signal.connection_count(), 2);
    }

    #[test]
    fn disconnect_twice_is_noop() {
        let signal: Signal<i32> = Signal::new();
        let conn = signal.connect(|_| {});
        conn.disconnect();
        conn.disconnect();
        assert_eq!(signal.connection_count(), 0);
    }

    #[test]
    fn disconnect_self_while_firing() {
        let signal: Signal<i32> = Signal::new();
        let count = Rc::new(Cell::new(0));
        let slot: Rc<RefCell<Option<Connection>>> = Rc::new(RefCell::new(None));
        let (count_c, slot_c) = (count.clone(), slot.clone());
        let conn = signal.connect(move |_| {
            count_c.set(count_c.get() + 1);
            if let Some(c) = slot_c.borrow().as_ref() {
                c.disconnect();
            }
        });
        *slot.borrow_mut() = Some(conn);
        signal.fire(&0);
        signal.fire(&0);
        assert_eq!(count.get(), 1);
        assert_eq!(signal.connection_count(), 0);
    }

    #[test]
    fn connect_disconnect_churn_reuses_slots() {
        let signal: Signal<i32> = Signal::new();
        let keep = signal.connect(|_| {});
        for _ in 0..1000 {
            signal.connect(|_| {}).disconnect();
        }
        let inner = signal.inner.borrow();
        assert!(inner.slots.capacity() < 16);
        assert_eq!(inner.order.len(), 1);
        drop(inner);
        assert!(keep.is_connected());
    }

    #[test]
    fn stale_handle_cannot_disconnect_a_newer_callback() {
        let signal = Signal::new();
        let (log, make) = recorder();
        let old = signal.connect(make("old"));
        old.disconnect();
        signal.connect(make("new"));
        old.disconnect();
        signal.fire(&3);
        assert_eq!(*log.borrow(), vec!["new:3"]);
    }

    #[test]
    fn connect_during_fire_runs_next_time() {
        let signal: Signal<i32> = Signal::new();
        let count = Rc::new(Cell::new(0));
        let (signal_c, count_c) = (signal.clone(), count.clone());
        let added = Rc::new(Cell::new(false));
        signal.connect(move |_| {
            if !added.get() {
                added.set(true);
                let count = count_c.clone();
                signal_c.connect(move |_| count.set(count.get() + 1));
            }
        });
        signal.fire(&0);
        assert_eq!(count.get(), 0);
        signal.fire(&0);
        assert_eq!(count.get(), 1);
    }

    #[test]
    fn connection_outlives_signal() {
        let signal: Signal<i32> = Signal::new();
        let conn = signal.connect(|_| {});
        assert!(conn.is_connected());
        drop(signal);
        assert!(!conn.is_connected());
        conn.disconnect();
    }

    #[test]
    fn disconnect_all_clears() {
        let signal: Signal<i32> = Signal::new();
        let a = signal.connect(|_| {});
        signal.connect(|_| {});
        signal.disconnect_all();
        assert_eq!(signal.connection_count(), 0);
        assert!(!a.is_connected());
    }

    #[test]
    fn debug_format() {
        let signal: Signal<i32> = Signal::new();
        let conn = signal.connect(|_| {});
        assert!(format!("{signal:?}").contains("connections: 1"));
        assert!(format!("{conn:?}").contains("Connection"));
    }
}
