//! The wrapper subscribed in place of a fire-once listener.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Weak};

use crate::registry::{Selector, Shared};
use crate::target::TargetKey;
use crate::{Listener, RegistryEvent};

/// Runs the original callback, then removes its own record through the
/// registry so the index entry and the target subscription go away together.
///
/// Holds a `Weak` handle: the registry owns the record that owns this
/// wrapper, so a strong handle would keep the registry alive forever.
pub(crate) struct FireOnce<E> {
    registry: Weak<Shared<E>>,
    target: TargetKey,
    event_type: String,
    name: String,
    record_id: u64,
    callback: Listener<E>,
    fired: AtomicBool,
}

impl<E: 'static> FireOnce<E> {
    pub(crate) fn new(
        registry: Weak<Shared<E>>,
        target: TargetKey,
        event_type: &str,
        name: &str,
        record_id: u64,
        callback: Listener<E>,
    ) -> Self {
        Self {
            registry,
            target,
            event_type: event_type.to_string(),
            name: name.to_string(),
            record_id,
            callback,
            fired: AtomicBool::new(false),
        }
    }

    pub(crate) fn into_listener(self) -> Listener<E> {
        Arc::new(move |event: &E| self.invoke(event))
    }

    fn invoke(&self, event: &E) {
        if self.fired.swap(true, Ordering::AcqRel) {
            return;
        }

        // Removal runs on drop, so a panicking callback still leaves no record behind.
        let _remove_on_exit = RemoveOnExit(self);
        (self.callback)(event);
    }

    fn remove_record(&self) {
        let Some(shared) = self.registry.upgrade() else {
            return;
        };

        tracing::trace!(event_type = %self.event_type, name = %self.name, "fire-once listener fired");

        // Matching on the record id keeps a stale wrapper from removing a newer
        // listener that reuses the same name.
        let removal = shared.remove(
            self.target,
            &self.event_type,
            Selector::Record {
                name: &self.name,
                id: self.record_id,
            },
            || "event target".to_string(),
        );

        if removal.success {
            shared.emit_event(&RegistryEvent::FireOnce {
                event_type: self.event_type.clone(),
                name: self.name.clone(),
            });
        }
    }
}

struct RemoveOnExit<'a, E: 'static>(&'a FireOnce<E>);

impl<E: 'static> Drop for RemoveOnExit<'_, E> {
    fn drop(&mut self) {
        self.0.remove_record();
    }
}
