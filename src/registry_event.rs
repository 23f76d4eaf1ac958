/// Events emitted by the registry during operations.
///
/// These events are passed to the tracing callback set via
/// [`EventListenerRegistry::set_trace_callback`](crate::EventListenerRegistry::set_trace_callback).
/// The `Clone` derive allows callbacks to store or forward events if needed.
///
/// # Examples
///
/// ```rust
/// use listener_registry::RegistryEvent;
///
/// let event = RegistryEvent::Register {
///     event_type: "click".to_string(),
///     name: "listener-0".to_string(),
/// };
/// assert_eq!(event.to_string(), "register { event_type: click, name: listener-0 }");
/// ```
#[derive(Debug, Clone, PartialEq)]
pub enum RegistryEvent {
    /// A listener was registered and subscribed on its target.
    Register {
        /// The event type the listener was registered for
        event_type: String,
        /// The caller-supplied or generated listener name
        name: String,
    },

    /// A removal was attempted.
    Remove {
        event_type: String,
        /// The resolved name, if a record was found
        name: Option<String>,
        /// Whether a record was removed
        removed: bool,
    },

    /// A fire-once listener ran and removed itself.
    FireOnce { event_type: String, name: String },

    /// A bulk removal finished.
    Clear {
        /// How many records were removed
        removed: usize,
    },
}

impl std::fmt::Display for RegistryEvent {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RegistryEvent::Register { event_type, name } => {
                write!(f, "register {{ event_type: {}, name: {} }}", event_type, name)
            }
            RegistryEvent::Remove {
                event_type,
                name,
                removed,
            } => write!(
                f,
                "remove {{ event_type: {}, name: {}, removed: {} }}",
                event_type,
                name.as_deref().unwrap_or("-"),
                removed
            ),
            RegistryEvent::FireOnce { event_type, name } => {
                write!(f, "fire-once {{ event_type: {}, name: {} }}", event_type, name)
            }
            RegistryEvent::Clear { removed } => {
                write!(f, "Clearing the Registry ({} removed)", removed)
            }
        }
    }
}
