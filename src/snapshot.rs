//! Values handed back to callers: registration and removal results, and
//! read-only projections of stored records.

use std::fmt;

use crate::{Listener, ListenerOptions};

/// Result of a successful registration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Registration {
    /// The caller-supplied or generated name.
    pub name: String,
    pub success: bool,
}

/// Outcome of a removal.
///
/// "Already gone" is an ordinary outcome, so it is reported here rather
/// than as an error.
#[must_use]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Removal {
    pub success: bool,
    pub message: Option<String>,
}

impl Removal {
    pub(crate) fn removed() -> Self {
        Self {
            success: true,
            message: None,
        }
    }

    pub(crate) fn failed(message: impl Into<String>) -> Self {
        Self {
            success: false,
            message: Some(message.into()),
        }
    }

    pub fn is_success(&self) -> bool {
        self.success
    }
}

/// Immutable projection of one registered listener.
///
/// Holds a clone of the original callback (never the fire-once wrapper) and
/// the options translated back to the registration vocabulary. Changing a
/// snapshot is impossible, and it shares nothing mutable with the registry.
pub struct ListenerSnapshot<E> {
    callback: Listener<E>,
    options: ListenerOptions,
}

impl<E> ListenerSnapshot<E> {
    pub(crate) fn new(callback: Listener<E>, options: ListenerOptions) -> Self {
        Self { callback, options }
    }

    /// The callback exactly as it was registered.
    pub fn callback(&self) -> &Listener<E> {
        &self.callback
    }

    pub fn options(&self) -> &ListenerOptions {
        &self.options
    }

    pub fn name(&self) -> &str {
        self.options.name.as_deref().unwrap_or_default()
    }
}

impl<E> Clone for ListenerSnapshot<E> {
    fn clone(&self) -> Self {
        Self {
            callback: self.callback.clone(),
            options: self.options.clone(),
        }
    }
}

impl<E> fmt::Debug for ListenerSnapshot<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ListenerSnapshot")
            .field("options", &self.options)
            .finish_non_exhaustive()
    }
}

/// All listeners of one event type on a target.
pub struct EventListeners<E> {
    event_type: String,
    listeners: Vec<ListenerSnapshot<E>>,
}

impl<E> EventListeners<E> {
    pub(crate) fn new(event_type: String, listeners: Vec<ListenerSnapshot<E>>) -> Self {
        Self {
            event_type,
            listeners,
        }
    }

    pub fn event_type(&self) -> &str {
        &self.event_type
    }

    pub fn listeners(&self) -> &[ListenerSnapshot<E>] {
        &self.listeners
    }
}

impl<E> Clone for EventListeners<E> {
    fn clone(&self) -> Self {
        Self {
            event_type: self.event_type.clone(),
            listeners: self.listeners.clone(),
        }
    }
}

impl<E> fmt::Debug for EventListeners<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EventListeners")
            .field("event_type", &self.event_type)
            .field("listeners", &self.listeners)
            .finish()
    }
}
