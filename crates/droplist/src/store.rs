#![forbid(unsafe_code)]

//! Reactive keyed store.
//!
//! A generic observable key/value store: `set` is the single mutation entry
//! point for widget state, and every live subscriber for the written key is
//! invoked synchronously with `(new, old)` in subscription order.
//!
//! # Equality is the consumer's concern
//!
//! Setting a key to a value equal to the current one is *not* special-cased
//! here: subscribers still fire exactly once per `set`. Controllers that
//! want idempotence compare `new` against `old` themselves; centralizing
//! the skip would hide writes some consumers (the validity checker, the
//! diagnostics) do want to observe.
//!
//! # Reentrancy
//!
//! All operations are synchronous. A subscriber may call `set` again,
//! including on the key that triggered it, and dispatch recurses on the
//! call stack. Nested dispatch is capped at [`MAX_SET_DEPTH`] levels; a
//! `set` past the cap is rejected with [`StoreError::ReentrancyLimit`] and
//! a severe diagnostic rather than looping forever. Subscribers added or
//! removed during dispatch take effect from the next `set`: each dispatch
//! runs over a snapshot of the subscriber list taken when the value landed.
//!
//! The store is deliberately single-threaded (`Rc` callbacks, interior
//! mutability); one widget instance owns one store and nothing else may
//! mutate its fields.

use std::cell::{Cell, RefCell};
use std::fmt::Debug;
use std::hash::Hash;
use std::rc::Rc;

use ahash::AHashMap;
use droplist_core::Diag;
use thiserror::Error;

/// Maximum nested dispatch depth before a reentrant `set` is rejected.
pub const MAX_SET_DEPTH: usize = 16;

/// Identifier handed out by [`Store::subscribe`].
///
/// Ids are monotonically increasing per key and never reused, even after
/// an unsubscribe, so a stale id cannot accidentally remove a newer
/// subscriber.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionId(u64);

/// Failures reported by store operations. All are recoverable no-ops.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum StoreError {
    /// A `set` was rejected because nested subscriber dispatch exceeded
    /// [`MAX_SET_DEPTH`].
    #[error("set rejected: subscriber dispatch exceeded {MAX_SET_DEPTH} nested levels")]
    ReentrancyLimit,
    /// Unsubscribe target key has no subscribers.
    #[error("unsubscribe failed: key has no subscribers")]
    UnknownKey,
    /// Unsubscribe id does not match a live subscription for the key.
    #[error("unsubscribe failed: unknown subscription id for key")]
    UnknownSubscription,
}

type Callback<V> = Rc<dyn Fn(&V, Option<&V>)>;

struct Subscriber<V> {
    id: SubscriptionId,
    callback: Callback<V>,
}

struct SubscriberList<V> {
    next_id: u64,
    entries: Vec<Subscriber<V>>,
}

impl<V> Default for SubscriberList<V> {
    fn default() -> Self {
        Self {
            next_id: 0,
            entries: Vec::new(),
        }
    }
}

/// A generic keyed observable store.
///
/// `K` is a small copyable key (the widget uses a field enum, making the
/// stringly-typed key mistakes of ad-hoc stores unrepresentable); `V` is
/// the stored value.
pub struct Store<K, V> {
    values: RefCell<AHashMap<K, V>>,
    subscribers: RefCell<AHashMap<K, SubscriberList<V>>>,
    depth: Cell<usize>,
    diag: Diag,
}

impl<K, V> Store<K, V>
where
    K: Copy + Eq + Hash + Debug,
    V: Clone,
{
    /// Create an empty store reporting through the given diagnostics.
    #[must_use]
    pub fn new(diag: Diag) -> Self {
        Self {
            values: RefCell::new(AHashMap::new()),
            subscribers: RefCell::new(AHashMap::new()),
            depth: Cell::new(0),
            diag,
        }
    }

    /// Current value of a key.
    ///
    /// Fails softly: a key that was never set returns `None` with a logged
    /// warning, since it usually means a field was read before the widget
    /// seeded it.
    #[must_use]
    pub fn get(&self, key: K) -> Option<V> {
        let value = self.values.borrow().get(&key).cloned();
        if value.is_none() {
            self.diag.warn(&format!("get of {key:?} before it was set"));
        }
        value
    }

    /// Whether a key currently holds a value.
    #[must_use]
    pub fn contains(&self, key: K) -> bool {
        self.values.borrow().contains_key(&key)
    }

    /// Store a value and synchronously notify the key's subscribers with
    /// `(new, old)` in subscription order.
    pub fn set(&self, key: K, value: V) -> Result<(), StoreError> {
        if self.depth.get() >= MAX_SET_DEPTH {
            self.diag.error(&format!(
                "set of {key:?} rejected: subscriber dispatch exceeded {MAX_SET_DEPTH} nested levels"
            ));
            return Err(StoreError::ReentrancyLimit);
        }

        let old = self.values.borrow_mut().insert(key, value.clone());
        self.diag.verbose(&format!("set {key:?}"));

        // Snapshot so callbacks may subscribe/unsubscribe/set without
        // holding any borrow here.
        let snapshot: Vec<Callback<V>> = match self.subscribers.borrow().get(&key) {
            Some(list) => list.entries.iter().map(|s| s.callback.clone()).collect(),
            None => Vec::new(),
        };

        self.depth.set(self.depth.get() + 1);
        for callback in snapshot {
            callback(&value, old.as_ref());
        }
        self.depth.set(self.depth.get() - 1);
        Ok(())
    }

    /// Register a callback for changes to `key`.
    ///
    /// Subscribing to a key that has no value yet succeeds with a warning
    /// (it may be the result of a typo'd field).
    pub fn subscribe(
        &self,
        key: K,
        callback: impl Fn(&V, Option<&V>) + 'static,
    ) -> SubscriptionId {
        if !self.values.borrow().contains_key(&key) {
            self.diag
                .warn(&format!("subscribing to {key:?} before it has a value"));
        }
        let mut subscribers = self.subscribers.borrow_mut();
        let list = subscribers.entry(key).or_default();
        let id = SubscriptionId(list.next_id);
        list.next_id += 1;
        list.entries.push(Subscriber {
            id,
            callback: Rc::new(callback),
        });
        self.diag.verbose(&format!("subscribed to {key:?}"));
        id
    }

    /// Remove a subscription. Unknown targets are reported errors, not
    /// panics.
    pub fn unsubscribe(&self, key: K, id: SubscriptionId) -> Result<(), StoreError> {
        let mut subscribers = self.subscribers.borrow_mut();
        let Some(list) = subscribers.get_mut(&key) else {
            self.diag
                .error(&format!("unsubscribe failed: {key:?} has no subscribers"));
            return Err(StoreError::UnknownKey);
        };
        let Some(position) = list.entries.iter().position(|s| s.id == id) else {
            self.diag.error(&format!(
                "unsubscribe failed: no subscription {id:?} for {key:?}"
            ));
            return Err(StoreError::UnknownSubscription);
        };
        list.entries.remove(position);
        self.diag.verbose(&format!("unsubscribed from {key:?}"));
        Ok(())
    }
}
