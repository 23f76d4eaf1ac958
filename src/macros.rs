//! Macros for creating process-wide listener registries.

/// Creates a module holding one lazily initialised, process-wide
/// [`EventListenerRegistry`](crate::EventListenerRegistry) for an event type.
///
/// The macro generates a module containing:
/// - The registry static (hidden)
/// - `registry()` returning a `&'static` handle to it
/// - Free functions mirroring every registry operation
///
/// Types named in the invocation are resolved from the calling module.
///
/// # Examples
///
/// ```rust
/// use std::sync::Arc;
/// use listener_registry::{
///     define_listener_registry, listener, EventTarget, Listener, ListenerOptions,
///     NormalizedOptions,
/// };
///
/// pub struct Tick;
///
/// struct Clock;
///
/// impl EventTarget<Tick> for Clock {
///     fn subscribe(&self, _: &str, _: &Listener<Tick>, _: &NormalizedOptions) {}
///     fn unsubscribe(&self, _: &str, _: &Listener<Tick>, _: &NormalizedOptions) {}
/// }
///
/// define_listener_registry!(clock_listeners, Tick);
///
/// fn main() {
///     let clock = Arc::new(Clock);
///     let on_tick = listener(|_: &Tick| {});
///     clock_listeners::register(&clock, "tick", &on_tick, Some(ListenerOptions::named("ui")))
///         .unwrap();
///
///     assert!(clock_listeners::exists_named(&clock, "tick", "ui"));
///     assert_eq!(clock_listeners::clear_all(), 1);
/// }
/// ```
#[macro_export]
macro_rules! define_listener_registry {
    ($name:ident, $event:ty) => {
        pub mod $name {
            #[allow(unused_imports)]
            use super::*;

            use std::sync::{Arc, LazyLock};

            use $crate::{
                EventListenerRegistry, EventListeners, EventTarget, Listener, ListenerOptions,
                ListenerSnapshot, RegistryError, RegistryEvent, Registration, Removal,
            };

            // Registry instance (module-private)
            static REGISTRY: LazyLock<EventListenerRegistry<$event>> =
                LazyLock::new(EventListenerRegistry::new);

            /// The registry behind the free functions of this module.
            pub fn registry() -> &'static EventListenerRegistry<$event> {
                &REGISTRY
            }

            /// Register a listener on `target`.
            pub fn register<T: EventTarget<$event> + 'static>(
                target: &Arc<T>,
                event_type: &str,
                callback: &Listener<$event>,
                options: Option<ListenerOptions>,
            ) -> Result<Registration, RegistryError> {
                REGISTRY.register(target, event_type, callback, options)
            }

            /// Register a listener on a type-erased target.
            pub fn register_erased(
                target: &Arc<dyn EventTarget<$event>>,
                event_type: &str,
                callback: &Listener<$event>,
                options: Option<ListenerOptions>,
            ) -> Result<Registration, RegistryError> {
                REGISTRY.register_erased(target, event_type, callback, options)
            }

            /// Remove a listener by name, or by callback when no name is given.
            pub fn remove<T: EventTarget<$event> + ?Sized>(
                target: &Arc<T>,
                event_type: &str,
                callback: Option<&Listener<$event>>,
                options: Option<&ListenerOptions>,
            ) -> Removal {
                REGISTRY.remove(target, event_type, callback, options)
            }

            pub fn list_all<T: EventTarget<$event> + ?Sized>(
                target: &Arc<T>,
            ) -> Vec<EventListeners<$event>> {
                REGISTRY.list_all(target)
            }

            pub fn list_for<T: EventTarget<$event> + ?Sized>(
                target: &Arc<T>,
                event_type: &str,
            ) -> Vec<ListenerSnapshot<$event>> {
                REGISTRY.list_for(target, event_type)
            }

            pub fn get_by_name<T: EventTarget<$event> + ?Sized>(
                target: &Arc<T>,
                event_type: &str,
                name: &str,
            ) -> Option<ListenerSnapshot<$event>> {
                REGISTRY.get_by_name(target, event_type, name)
            }

            pub fn exists<T: EventTarget<$event> + ?Sized>(target: &Arc<T>, event_type: &str) -> bool {
                REGISTRY.exists(target, event_type)
            }

            pub fn exists_named<T: EventTarget<$event> + ?Sized>(
                target: &Arc<T>,
                event_type: &str,
                name: &str,
            ) -> bool {
                REGISTRY.exists_named(target, event_type, name)
            }

            pub fn clear_all() -> usize {
                REGISTRY.clear_all()
            }

            pub fn clear_for_target<T: EventTarget<$event> + ?Sized>(
                target: &Arc<T>,
                event_type: Option<&str>,
            ) -> usize {
                REGISTRY.clear_for_target(target, event_type)
            }

            pub fn clear_named<T: EventTarget<$event> + ?Sized>(
                target: &Arc<T>,
                event_type: &str,
                name: &str,
            ) -> bool {
                REGISTRY.clear_named(target, event_type, name)
            }

            /// Set a tracing callback for registry operations.
            pub fn set_trace_callback(callback: impl Fn(&RegistryEvent) + Send + Sync + 'static) {
                REGISTRY.set_trace_callback(callback)
            }

            /// Clear the tracing callback.
            pub fn clear_trace_callback() {
                REGISTRY.clear_trace_callback()
            }
        }
    };
}
