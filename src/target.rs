//! The subscribe/unsubscribe primitive the registry is layered on.

use std::sync::Arc;

use crate::NormalizedOptions;

/// Closure type for event listeners.
///
/// Listeners are shared: the registry keeps one clone and the target keeps
/// another once subscribed. Two listeners are "the same" only when they are
/// the same allocation (`Arc::ptr_eq`).
pub type Listener<E> = Arc<dyn Fn(&E) + Send + Sync>;

/// Wrap a closure as a [`Listener`].
///
/// ```rust
/// use listener_registry::{listener, Listener};
///
/// let on_click: Listener<String> = listener(|event: &String| println!("clicked {event}"));
/// on_click(&"ok".to_string());
/// ```
pub fn listener<E, F>(f: F) -> Listener<E>
where
    F: Fn(&E) + Send + Sync + 'static,
{
    Arc::new(f)
}

/// An object that dispatches events to subscribed callbacks.
///
/// The registry never dispatches anything itself. It only calls these two
/// primitives and remembers what it passed to them. Implementations should
/// treat `unsubscribe` of an unknown callback as a no-op.
pub trait EventTarget<E>: Send + Sync {
    /// Start delivering `event_type` events to `callback`.
    fn subscribe(&self, event_type: &str, callback: &Listener<E>, options: &NormalizedOptions);

    /// Stop delivering `event_type` events to `callback`.
    fn unsubscribe(&self, event_type: &str, callback: &Listener<E>, options: &NormalizedOptions);

    /// Human readable label used in removal diagnostics.
    fn describe(&self) -> String {
        "event target".to_string()
    }
}

/// Identity of a target: the address of its `Arc` allocation.
///
/// Only meaningful while the registry holds a clone of that `Arc`, which it
/// does for as long as the key is present in the index.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub(crate) struct TargetKey(usize);

impl TargetKey {
    pub(crate) fn of<T: ?Sized>(target: &Arc<T>) -> Self {
        TargetKey(Arc::as_ptr(target) as *const () as usize)
    }
}
