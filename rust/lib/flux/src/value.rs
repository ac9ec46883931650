use std::any::Any;
use std::fmt;
use std::sync::Arc;

/// A state type stored at a well-known path.
///
/// Each state type owns exactly one path; writing the type replaces the
/// whole value at that path.
///
/// ```ignore
/// #[derive(Debug, Clone, Default)]
/// pub struct Teams(pub Vec<Team>);
///
/// impl State for Teams {
///     const PATH: &'static str = "user/teams";
/// }
/// ```
pub trait State: Any + Send + Sync {
    /// Path this state lives at.
    const PATH: &'static str;
}

/// A type-erased, reference-counted state value.
///
/// Readers share one allocation. A write swaps in a new `Arc`, so a reader
/// holding an old value keeps a consistent snapshot.
#[derive(Clone)]
pub struct StateValue {
    inner: Arc<dyn Any + Send + Sync>,
}

impl StateValue {
    pub fn new<T: Any + Send + Sync>(value: T) -> Self {
        Self {
            inner: Arc::new(value),
        }
    }

    /// Borrow the value as `T`, or `None` if the stored type differs.
    pub fn downcast_ref<T: Any>(&self) -> Option<&T> {
        self.inner.downcast_ref::<T>()
    }

    /// Take a shared handle to the value as `T`.
    pub fn downcast<T: Any + Send + Sync>(&self) -> Option<Arc<T>> {
        Arc::clone(&self.inner).downcast::<T>().ok()
    }
}

impl fmt::Debug for StateValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StateValue")
            .field("type_id", &(*self.inner).type_id())
            .finish()
    }
}

/// Handle returned by `StateStore::subscribe`, used to unsubscribe.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionId(pub(crate) u64);
