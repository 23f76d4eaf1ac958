//! # Listener Registry
//!
//! Named, queryable and selectively removable event listeners on top of an
//! event target that only knows how to `subscribe` and `unsubscribe`.
//!
//! A plain subscribe call forgets the registration the moment it returns.
//! The registry remembers every registration as
//! `target -> event type -> name -> record`, so callers can list what is
//! attached, check whether a named listener is still there, and remove exactly
//! one registration without holding on to the original closure.
//!
//! ## Quick Start
//!
//! ```rust
//! use std::sync::Arc;
//! use listener_registry::{
//!     listener, EventListenerRegistry, EventTarget, Listener, ListenerOptions, NormalizedOptions,
//! };
//!
//! struct Button;
//!
//! impl EventTarget<&'static str> for Button {
//!     fn subscribe(&self, _: &str, _: &Listener<&'static str>, _: &NormalizedOptions) {}
//!     fn unsubscribe(&self, _: &str, _: &Listener<&'static str>, _: &NormalizedOptions) {}
//! }
//!
//! let registry = EventListenerRegistry::new();
//! let button = Arc::new(Button);
//!
//! let on_click = listener(|label: &&'static str| println!("clicked {label}"));
//! registry.register(&button, "click", &on_click, None).unwrap();
//! registry
//!     .register(&button, "click", &on_click, Some(ListenerOptions::named("submit").with_once(true)))
//!     .unwrap();
//!
//! let names: Vec<_> = registry
//!     .list_for(&button, "click")
//!     .iter()
//!     .map(|snapshot| snapshot.name().to_string())
//!     .collect();
//! assert_eq!(names, ["listener-0", "submit"]);
//! ```
//!
//! ## Features
//!
//! - **Names**: caller-supplied or generated (`listener-0`, `listener-1`, ...), unique per
//!   target and event type
//! - **Fire-once**: `once` listeners remove themselves through the registry after the first call
//! - **Snapshots**: queries return owned, read-only projections, never live records
//! - **Tracing support**: `tracing` events plus an optional per-registry callback
//!
//! ## Main Types
//!
//! - [`EventListenerRegistry`] - the registry itself
//! - [`EventTarget`] - the subscribe/unsubscribe primitive it drives
//! - [`ListenerOptions`] - name, capture, once and opaque pass-through options
//! - [`define_listener_registry!`] - a process-wide registry in a module

mod config;
mod macros;
mod once;
mod options;
mod registry;
mod registry_error;
mod registry_event;
mod snapshot;
mod target;

// Re-export the main public API
pub use config::RegistryConfig;
pub use options::{ListenerOptions, NormalizedOptions};
pub use registry::{EventListenerRegistry, TraceCallback};
pub use registry_error::RegistryError;
pub use registry_event::RegistryEvent;
pub use snapshot::{EventListeners, ListenerSnapshot, Registration, Removal};
pub use target::{listener, EventTarget, Listener};
