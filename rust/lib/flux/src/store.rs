use std::collections::BTreeMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, PoisonError, RwLock};

use crate::pattern::{PatternError, TopicPattern};
use crate::value::{State, StateValue, SubscriptionId};

/// Callback type for state change notifications.
pub type ChangeHandler = Arc<dyn Fn(&str, &StateValue) + Send + Sync>;

/// Per-path state store with pattern-matched change notifications.
///
/// - `set(value)` replaces the value at `T::PATH` and notifies subscribers.
/// - `get::<T>()` reads the current value (Arc clone, no data copy).
/// - `update::<T>(f)` is an atomic read-modify-write of one path.
/// - `subscribe(pattern, handler)` registers a change handler.
///
/// Handlers run synchronously on the writing thread, after the write lock
/// has been released, so a handler may read the store. Handlers must not
/// write to the store.
///
/// Every write is stamped with a version under the write lock. A subscriber
/// never sees an older value of a path after a newer one: when writers race,
/// a stale delivery is skipped, so the last value a subscriber saw is
/// always the stored one.
pub struct StateStore {
    values: RwLock<BTreeMap<&'static str, StateValue>>,
    handlers: RwLock<Vec<HandlerEntry>>,
    next_id: AtomicU64,
    version: AtomicU64,
    /// Last version delivered per path. Held while handlers run.
    delivered: Mutex<BTreeMap<&'static str, u64>>,
}

#[derive(Clone)]
struct HandlerEntry {
    id: SubscriptionId,
    pattern: TopicPattern,
    handler: ChangeHandler,
}

impl StateStore {
    pub fn new() -> Self {
        Self {
            values: RwLock::new(BTreeMap::new()),
            handlers: RwLock::new(Vec::new()),
            next_id: AtomicU64::new(1),
            version: AtomicU64::new(0),
            delivered: Mutex::new(BTreeMap::new()),
        }
    }

    /// Replace the value at `T::PATH` and notify matching subscribers.
    pub fn set<T: State>(&self, value: T) {
        self.set_if(value, || true);
    }

    /// Replace the value at `T::PATH` if `keep` holds at write time.
    ///
    /// `keep` runs under the write lock, so nothing can change between the
    /// check and the write. Returns whether the value was stored.
    pub fn set_if<T, F>(&self, value: T, keep: F) -> bool
    where
        T: State,
        F: FnOnce() -> bool,
    {
        let value = StateValue::new(value);
        let version = {
            let mut values = self.values.write().unwrap_or_else(PoisonError::into_inner);
            if !keep() {
                return false;
            }
            values.insert(T::PATH, value.clone());
            self.version.fetch_add(1, Ordering::SeqCst) + 1
        };
        self.notify(T::PATH, version, &value);
        true
    }

    /// Current value at `T::PATH`, if one was ever set.
    pub fn get<T: State>(&self) -> Option<Arc<T>> {
        let values = self.values.read().unwrap_or_else(PoisonError::into_inner);
        values.get(T::PATH).and_then(StateValue::downcast::<T>)
    }

    /// Current value at `T::PATH`, or `T::default()` when unset.
    pub fn get_or_default<T: State + Default>(&self) -> Arc<T> {
        self.get::<T>().unwrap_or_default()
    }

    /// Apply `f` to a copy of the current value and store the result.
    ///
    /// The read and the write happen under one lock, so concurrent updates
    /// to the same path never lose each other's changes.
    pub fn update<T, F>(&self, f: F)
    where
        T: State + Clone + Default,
        F: FnOnce(&mut T),
    {
        self.try_update::<T, _>(|value| {
            f(value);
            true
        });
    }

    /// Like `update`, but `f` decides whether its result is stored.
    ///
    /// Returning `false` leaves the path untouched and notifies no one.
    pub fn try_update<T, F>(&self, f: F) -> bool
    where
        T: State + Clone + Default,
        F: FnOnce(&mut T) -> bool,
    {
        let (version, value) = {
            let mut values = self.values.write().unwrap_or_else(PoisonError::into_inner);
            let mut next = values
                .get(T::PATH)
                .and_then(|v| v.downcast_ref::<T>())
                .cloned()
                .unwrap_or_default();
            if !f(&mut next) {
                return false;
            }
            let value = StateValue::new(next);
            values.insert(T::PATH, value.clone());
            (self.version.fetch_add(1, Ordering::SeqCst) + 1, value)
        };
        self.notify(T::PATH, version, &value);
        true
    }

    /// Subscribe to changes on paths matching `pattern`.
    pub fn subscribe<F>(&self, pattern: &str, handler: F) -> Result<SubscriptionId, PatternError>
    where
        F: Fn(&str, &StateValue) + Send + Sync + 'static,
    {
        let pattern = TopicPattern::parse(pattern)?;
        let id = SubscriptionId(self.next_id.fetch_add(1, Ordering::Relaxed));
        let mut handlers = self.handlers.write().unwrap_or_else(PoisonError::into_inner);
        handlers.push(HandlerEntry {
            id,
            pattern,
            handler: Arc::new(handler),
        });
        Ok(id)
    }

    /// Subscribe to one state type, receiving the typed value.
    pub fn watch<T, F>(&self, handler: F) -> SubscriptionId
    where
        T: State,
        F: Fn(&T) + Send + Sync + 'static,
    {
        let id = SubscriptionId(self.next_id.fetch_add(1, Ordering::Relaxed));
        let entry = HandlerEntry {
            id,
            pattern: TopicPattern::exact(T::PATH),
            handler: Arc::new(move |_: &str, value: &StateValue| {
                if let Some(v) = value.downcast_ref::<T>() {
                    handler(v);
                }
            }),
        };
        let mut handlers = self.handlers.write().unwrap_or_else(PoisonError::into_inner);
        handlers.push(entry);
        id
    }

    /// Remove a subscription. Unknown ids are ignored.
    pub fn unsubscribe(&self, id: SubscriptionId) {
        let mut handlers = self.handlers.write().unwrap_or_else(PoisonError::into_inner);
        handlers.retain(|entry| entry.id != id);
    }

    fn notify(&self, path: &'static str, version: u64, value: &StateValue) {
        let mut delivered = self.delivered.lock().unwrap_or_else(PoisonError::into_inner);
        let last = delivered.entry(path).or_insert(0);
        if version < *last {
            // A newer write already reached subscribers.
            return;
        }
        *last = version;

        // Snapshot first so a handler can (un)subscribe without deadlocking.
        let matched: Vec<ChangeHandler> = {
            let handlers = self.handlers.read().unwrap_or_else(PoisonError::into_inner);
            handlers
                .iter()
                .filter(|entry| entry.pattern.matches(path))
                .map(|entry| Arc::clone(&entry.handler))
                .collect()
        };
        for handler in matched {
            handler(path, value);
        }
    }
}

impl Default for StateStore {
    fn default() -> Self {
        Self::new()
    }
}
