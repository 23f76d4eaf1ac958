//! The listener registry: a `target -> event type -> name -> record` index
//! kept in step with the subscriptions made on each target.
//!
//! All methods take `&self`. State lives behind a `parking_lot::Mutex` that is
//! never held while calling into a target, a listener or the trace callback,
//! so a fire-once wrapper may remove itself from inside the target's dispatch.

use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use indexmap::IndexMap;
use parking_lot::Mutex;
use serde_json::Value;
use tracing::debug;

use crate::once::FireOnce;
use crate::target::TargetKey;
use crate::{
    EventListeners, EventTarget, Listener, ListenerOptions, ListenerSnapshot, NormalizedOptions,
    RegistryConfig, RegistryError, RegistryEvent, Registration, Removal,
};

/// Type alias for the user-supplied tracing callback.
///
/// The callback receives a reference to a [`RegistryEvent`] after every
/// registration, removal, fire-once removal and bulk clear.
pub type TraceCallback = dyn Fn(&RegistryEvent) + Send + Sync + 'static;

// -------------------------------------------------------------------------------------------------
// Storage
// -------------------------------------------------------------------------------------------------

/// One named registration.
///
/// `once_wrapper` is present exactly when `options.callback_once` is set, and
/// is then the function the target knows about instead of `callback`.
struct ListenerRecord<E> {
    id: u64,
    callback: Listener<E>,
    once_wrapper: Option<Listener<E>>,
    options: NormalizedOptions,
}

impl<E> ListenerRecord<E> {
    fn subscribed(&self) -> &Listener<E> {
        match &self.once_wrapper {
            Some(wrapper) if self.options.callback_once => wrapper,
            _ => &self.callback,
        }
    }

    fn snapshot(&self) -> ListenerSnapshot<E> {
        ListenerSnapshot::new(self.callback.clone(), self.options.to_listener_options())
    }
}

type Bucket<E> = IndexMap<String, ListenerRecord<E>>;

struct TargetEntry<E> {
    target: Arc<dyn EventTarget<E>>,
    buckets: IndexMap<String, Bucket<E>>,
}

/// How a removal picks its record.
pub(crate) enum Selector<'a, E> {
    Name(&'a str),
    Callback(&'a Listener<E>),
    /// A name that must still belong to the record with this id.
    Record { name: &'a str, id: u64 },
    Nothing,
}

impl<E> Selector<'_, E> {
    fn name(&self) -> Option<&str> {
        match self {
            Selector::Name(name) | Selector::Record { name, .. } => Some(*name),
            Selector::Callback(_) | Selector::Nothing => None,
        }
    }
}

/// Why a removal found nothing.
#[derive(Debug, PartialEq)]
enum Miss {
    NoTarget,
    NoEventType,
    NoName(String),
    NoIdentifier,
    UnknownCallback,
}

impl Miss {
    fn message(&self, label: &str, event_type: &str) -> String {
        match self {
            Miss::NoTarget => format!("{label} doesn't have any listeners."),
            Miss::NoEventType => format!("{label} doesn't have \"{event_type}\" listeners."),
            Miss::NoName(name) => {
                format!("{label} doesn't have \"{event_type}\" listener \"{name}\"")
            }
            Miss::NoIdentifier => "options.name is not found".to_string(),
            Miss::UnknownCallback => format!(
                "Specified listener could not be deleted from {label}. \
                 Since the specified listener is not registered through this registry, \
                 it may have been subscribed on the target directly."
            ),
        }
    }
}

struct Detached<E> {
    target: Arc<dyn EventTarget<E>>,
    record: ListenerRecord<E>,
}

/// State shared by every handle of one registry and weakly by its fire-once
/// wrappers.
pub(crate) struct Shared<E> {
    config: RegistryConfig,
    index: Mutex<IndexMap<TargetKey, TargetEntry<E>>>,
    next_name: AtomicU64,
    next_record: AtomicU64,
    trace: Mutex<Option<Arc<TraceCallback>>>,
}

impl<E> Shared<E> {
    /// Invoke the trace callback, if any, without holding its lock.
    pub(crate) fn emit_event(&self, event: &RegistryEvent) {
        let callback = self.trace.lock().clone();
        if let Some(callback) = callback {
            callback(event);
        }
    }

    /// Take a record out of the index, pruning empty buckets and targets.
    fn detach(
        &self,
        key: TargetKey,
        event_type: &str,
        selector: &Selector<'_, E>,
    ) -> Result<Detached<E>, Miss> {
        let mut index = self.index.lock();
        let entry = index.get_mut(&key).ok_or(Miss::NoTarget)?;
        let bucket = entry
            .buckets
            .get_mut(event_type)
            .ok_or(Miss::NoEventType)?;

        let record = match *selector {
            Selector::Name(name) => bucket
                .shift_remove(name)
                .ok_or_else(|| Miss::NoName(name.to_string()))?,
            Selector::Record { name, id } => {
                if bucket.get(name).map(|record| record.id) != Some(id) {
                    return Err(Miss::NoName(name.to_string()));
                }
                bucket
                    .shift_remove(name)
                    .ok_or_else(|| Miss::NoName(name.to_string()))?
            }
            Selector::Callback(callback) => {
                let position = bucket
                    .values()
                    .position(|record| Arc::ptr_eq(&record.callback, callback))
                    .ok_or(Miss::UnknownCallback)?;
                bucket
                    .shift_remove_index(position)
                    .map(|(_, record)| record)
                    .ok_or(Miss::UnknownCallback)?
            }
            Selector::Nothing => return Err(Miss::NoIdentifier),
        };

        let bucket_empty = bucket.is_empty();
        let target = entry.target.clone();
        if bucket_empty {
            entry.buckets.shift_remove(event_type);
        }
        if entry.buckets.is_empty() {
            index.shift_remove(&key);
        }

        Ok(Detached { target, record })
    }

    /// Removal shared by every public path: detach under the lock, then
    /// unsubscribe with whatever function the target was given.
    pub(crate) fn remove(
        &self,
        key: TargetKey,
        event_type: &str,
        selector: Selector<'_, E>,
        label: impl FnOnce() -> String,
    ) -> Removal {
        match self.detach(key, event_type, &selector) {
            Ok(Detached { target, record }) => {
                target.unsubscribe(event_type, record.subscribed(), &record.options);
                debug!(event_type, name = %record.options.name, "listener removed");
                self.emit_event(&RegistryEvent::Remove {
                    event_type: event_type.to_string(),
                    name: Some(record.options.name.clone()),
                    removed: true,
                });
                Removal::removed()
            }
            Err(miss) => {
                debug!(event_type, reason = ?miss, "listener not removed");
                self.emit_event(&RegistryEvent::Remove {
                    event_type: event_type.to_string(),
                    name: selector.name().map(str::to_string),
                    removed: false,
                });
                Removal::failed(miss.message(&label(), event_type))
            }
        }
    }
}

// -------------------------------------------------------------------------------------------------
// Registry
// -------------------------------------------------------------------------------------------------

/// Registry of named listeners over any number of [`EventTarget`]s.
///
/// Cloning produces another handle to the same registry.
///
/// # Examples
///
/// ```rust
/// use std::sync::Arc;
/// use listener_registry::{
///     listener, EventListenerRegistry, EventTarget, Listener, ListenerOptions, NormalizedOptions,
/// };
///
/// struct Silent;
///
/// impl EventTarget<()> for Silent {
///     fn subscribe(&self, _: &str, _: &Listener<()>, _: &NormalizedOptions) {}
///     fn unsubscribe(&self, _: &str, _: &Listener<()>, _: &NormalizedOptions) {}
/// }
///
/// let registry = EventListenerRegistry::new();
/// let target = Arc::new(Silent);
///
/// let on_click = listener(|_: &()| {});
/// let registration = registry
///     .register(&target, "click", &on_click, Some(ListenerOptions::named("ok")))
///     .unwrap();
/// assert_eq!(registration.name, "ok");
/// assert!(registry.exists_named(&target, "click", "ok"));
///
/// let removal = registry.remove(&target, "click", None, Some(&ListenerOptions::named("ok")));
/// assert!(removal.success);
/// assert!(!registry.exists(&target, "click"));
/// ```
pub struct EventListenerRegistry<E> {
    shared: Arc<Shared<E>>,
}

impl<E> Clone for EventListenerRegistry<E> {
    fn clone(&self) -> Self {
        Self {
            shared: self.shared.clone(),
        }
    }
}

impl<E: 'static> Default for EventListenerRegistry<E> {
    fn default() -> Self {
        Self::new()
    }
}

impl<E> fmt::Debug for EventListenerRegistry<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let index = self.shared.index.lock();
        let records: usize = index
            .values()
            .flat_map(|entry| entry.buckets.values())
            .map(IndexMap::len)
            .sum();
        f.debug_struct("EventListenerRegistry")
            .field("config", &self.shared.config)
            .field("targets", &index.len())
            .field("records", &records)
            .finish()
    }
}

impl<E: 'static> EventListenerRegistry<E> {
    /// Create an empty registry with the default configuration.
    pub fn new() -> Self {
        Self::with_config(RegistryConfig::default())
    }

    /// Create an empty registry; generated names use `config.name_prefix`.
    pub fn with_config(config: RegistryConfig) -> Self {
        Self {
            shared: Arc::new(Shared {
                config,
                index: Mutex::new(IndexMap::new()),
                next_name: AtomicU64::new(0),
                next_record: AtomicU64::new(0),
                trace: Mutex::new(None),
            }),
        }
    }

    /// The configuration this registry was created with.
    pub fn config(&self) -> &RegistryConfig {
        &self.shared.config
    }

    // ---------------------------------------------------------------------------------------------
    // Tracing
    // ---------------------------------------------------------------------------------------------

    /// Set a tracing callback for registry operations.
    ///
    /// The callback runs after the operation has fully applied and without
    /// any registry lock held, so it may call back into the registry.
    pub fn set_trace_callback(&self, callback: impl Fn(&RegistryEvent) + Send + Sync + 'static) {
        *self.shared.trace.lock() = Some(Arc::new(callback));
    }

    /// Clear the tracing callback.
    pub fn clear_trace_callback(&self) {
        *self.shared.trace.lock() = None;
    }

    // ---------------------------------------------------------------------------------------------
    // Registration
    // ---------------------------------------------------------------------------------------------

    /// Subscribe `callback` on `target` and remember it under a name.
    ///
    /// Without `options.name` a `<prefix>-<n>` name is generated from a
    /// counter that is never rewound. With `options.once` the target receives
    /// a wrapper that removes the record right after the first call.
    ///
    /// # Errors
    ///
    /// [`RegistryError::DuplicateName`] if the name is already taken for this
    /// target and event type. Nothing is subscribed in that case.
    pub fn register<T>(
        &self,
        target: &Arc<T>,
        event_type: &str,
        callback: &Listener<E>,
        options: Option<ListenerOptions>,
    ) -> Result<Registration, RegistryError>
    where
        T: EventTarget<E> + 'static,
    {
        let erased: Arc<dyn EventTarget<E>> = target.clone();
        self.register_erased(&erased, event_type, callback, options)
    }

    /// Same as [`register`](Self::register) for a target that is already held
    /// as `Arc<dyn EventTarget<E>>`.
    ///
    /// The erased handle and the concrete `Arc` it was made from identify the
    /// same target, so either may be used for later queries and removals.
    ///
    /// # Errors
    ///
    /// [`RegistryError::DuplicateName`], as for [`register`](Self::register).
    pub fn register_erased(
        &self,
        target: &Arc<dyn EventTarget<E>>,
        event_type: &str,
        callback: &Listener<E>,
        options: Option<ListenerOptions>,
    ) -> Result<Registration, RegistryError> {
        let options = options.unwrap_or_default();
        let key = TargetKey::of(target);
        let name = match options.given_name() {
            Some(name) => name.to_string(),
            None => self
                .shared
                .config
                .generated_name(self.shared.next_name.fetch_add(1, Ordering::Relaxed)),
        };
        let id = self.shared.next_record.fetch_add(1, Ordering::Relaxed);

        let once_wrapper = options.once.then(|| {
            FireOnce::new(
                Arc::downgrade(&self.shared),
                key,
                event_type,
                &name,
                id,
                callback.clone(),
            )
            .into_listener()
        });
        let record = ListenerRecord {
            id,
            callback: callback.clone(),
            once_wrapper,
            options: NormalizedOptions::new(options, name.clone()),
        };
        let subscribed = record.subscribed().clone();
        let forwarded = record.options.clone();

        {
            let mut index = self.shared.index.lock();
            let taken = index
                .get(&key)
                .and_then(|entry| entry.buckets.get(event_type))
                .is_some_and(|bucket| bucket.contains_key(&name));
            if taken {
                return Err(RegistryError::DuplicateName {
                    event_type: event_type.to_string(),
                    name,
                });
            }

            index
                .entry(key)
                .or_insert_with(|| TargetEntry {
                    target: target.clone(),
                    buckets: IndexMap::new(),
                })
                .buckets
                .entry(event_type.to_string())
                .or_default()
                .insert(name.clone(), record);
        }

        target.subscribe(event_type, &subscribed, &forwarded);

        debug!(event_type, name = %name, once = forwarded.callback_once, "listener registered");
        self.shared.emit_event(&RegistryEvent::Register {
            event_type: event_type.to_string(),
            name: name.clone(),
        });

        Ok(Registration {
            name,
            success: true,
        })
    }

    /// [`register`](Self::register) for hosts that forward untyped trailing
    /// arguments; `args` holds everything after the callback.
    ///
    /// # Errors
    ///
    /// Anything [`ListenerOptions::from_args`] rejects, plus the errors of
    /// [`register`](Self::register).
    pub fn register_with_args<T>(
        &self,
        target: &Arc<T>,
        event_type: &str,
        callback: &Listener<E>,
        args: &[Value],
    ) -> Result<Registration, RegistryError>
    where
        T: EventTarget<E> + 'static,
    {
        let options = ListenerOptions::from_args(args)?;
        self.register(target, event_type, callback, options)
    }

    // ---------------------------------------------------------------------------------------------
    // Removal
    // ---------------------------------------------------------------------------------------------

    /// Remove one registration and unsubscribe it from `target`.
    ///
    /// A name in `options` always wins over `callback`, even when the two
    /// designate different records. Without a name the first record whose
    /// callback is the same allocation as `callback` is removed.
    pub fn remove<T>(
        &self,
        target: &Arc<T>,
        event_type: &str,
        callback: Option<&Listener<E>>,
        options: Option<&ListenerOptions>,
    ) -> Removal
    where
        T: EventTarget<E> + ?Sized,
    {
        let selector = match (options.and_then(ListenerOptions::given_name), callback) {
            (Some(name), _) => Selector::Name(name),
            (None, Some(callback)) => Selector::Callback(callback),
            (None, None) => Selector::Nothing,
        };
        self.shared
            .remove(TargetKey::of(target), event_type, selector, || {
                target.describe()
            })
    }

    /// [`remove`](Self::remove) for hosts that forward untyped trailing
    /// arguments.
    ///
    /// # Errors
    ///
    /// Anything [`ListenerOptions::from_args`] rejects.
    pub fn remove_with_args<T>(
        &self,
        target: &Arc<T>,
        event_type: &str,
        callback: Option<&Listener<E>>,
        args: &[Value],
    ) -> Result<Removal, RegistryError>
    where
        T: EventTarget<E> + ?Sized,
    {
        let options = ListenerOptions::from_args(args)?;
        Ok(self.remove(target, event_type, callback, options.as_ref()))
    }

    // ---------------------------------------------------------------------------------------------
    // Queries
    // ---------------------------------------------------------------------------------------------

    /// Every event type on `target` that has listeners, in registration order.
    pub fn list_all<T>(&self, target: &Arc<T>) -> Vec<EventListeners<E>>
    where
        T: EventTarget<E> + ?Sized,
    {
        let index = self.shared.index.lock();
        index
            .get(&TargetKey::of(target))
            .map(|entry| {
                entry
                    .buckets
                    .iter()
                    .filter(|(_, bucket)| !bucket.is_empty())
                    .map(|(event_type, bucket)| {
                        EventListeners::new(
                            event_type.clone(),
                            bucket.values().map(ListenerRecord::snapshot).collect(),
                        )
                    })
                    .collect()
            })
            .unwrap_or_default()
    }

    /// Listeners of one event type on `target`, in registration order.
    pub fn list_for<T>(&self, target: &Arc<T>, event_type: &str) -> Vec<ListenerSnapshot<E>>
    where
        T: EventTarget<E> + ?Sized,
    {
        let index = self.shared.index.lock();
        index
            .get(&TargetKey::of(target))
            .and_then(|entry| entry.buckets.get(event_type))
            .map(|bucket| bucket.values().map(ListenerRecord::snapshot).collect())
            .unwrap_or_default()
    }

    /// Snapshot of the listener registered under `name`, if any.
    pub fn get_by_name<T>(
        &self,
        target: &Arc<T>,
        event_type: &str,
        name: &str,
    ) -> Option<ListenerSnapshot<E>>
    where
        T: EventTarget<E> + ?Sized,
    {
        let index = self.shared.index.lock();
        index
            .get(&TargetKey::of(target))
            .and_then(|entry| entry.buckets.get(event_type))
            .and_then(|bucket| bucket.get(name))
            .map(ListenerRecord::snapshot)
    }

    /// Whether `target` has at least one listener for `event_type`.
    pub fn exists<T>(&self, target: &Arc<T>, event_type: &str) -> bool
    where
        T: EventTarget<E> + ?Sized,
    {
        let index = self.shared.index.lock();
        index
            .get(&TargetKey::of(target))
            .and_then(|entry| entry.buckets.get(event_type))
            .is_some_and(|bucket| !bucket.is_empty())
    }

    /// Whether a listener named `name` is registered for `event_type`.
    pub fn exists_named<T>(&self, target: &Arc<T>, event_type: &str, name: &str) -> bool
    where
        T: EventTarget<E> + ?Sized,
    {
        let index = self.shared.index.lock();
        index
            .get(&TargetKey::of(target))
            .and_then(|entry| entry.buckets.get(event_type))
            .is_some_and(|bucket| bucket.contains_key(name))
    }

    // ---------------------------------------------------------------------------------------------
    // Bulk removal
    // ---------------------------------------------------------------------------------------------

    /// Remove every record on every target. Returns how many were removed.
    pub fn clear_all(&self) -> usize {
        let doomed: Vec<(TargetKey, String, String)> = {
            let index = self.shared.index.lock();
            index
                .iter()
                .flat_map(|(key, entry)| {
                    entry.buckets.iter().flat_map(move |(event_type, bucket)| {
                        bucket
                            .keys()
                            .map(move |name| (*key, event_type.clone(), name.clone()))
                    })
                })
                .collect()
        };

        let removed = doomed
            .iter()
            .filter(|(key, event_type, name)| {
                self.shared
                    .remove(*key, event_type, Selector::Name(name.as_str()), String::new)
                    .success
            })
            .count();

        debug!(removed, "registry cleared");
        self.shared
            .emit_event(&RegistryEvent::Clear { removed });
        removed
    }

    /// Remove every record on `target`, or only those of `event_type`.
    ///
    /// Works from a snapshot taken up front, so listeners removed or added by
    /// the removals themselves do not disturb the iteration.
    pub fn clear_for_target<T>(&self, target: &Arc<T>, event_type: Option<&str>) -> usize
    where
        T: EventTarget<E> + ?Sized,
    {
        let doomed: Vec<(String, ListenerOptions)> = match event_type {
            Some(event_type) => self
                .list_for(target, event_type)
                .into_iter()
                .map(|snapshot| (event_type.to_string(), snapshot.options().clone()))
                .collect(),
            None => self
                .list_all(target)
                .into_iter()
                .flat_map(|group| {
                    let event_type = group.event_type().to_string();
                    group
                        .listeners()
                        .iter()
                        .map(|snapshot| (event_type.clone(), snapshot.options().clone()))
                        .collect::<Vec<_>>()
                })
                .collect(),
        };

        let removed = doomed
            .iter()
            .filter(|(event_type, options)| {
                self.remove(target, event_type, None, Some(options)).success
            })
            .count();

        debug!(removed, event_type = event_type.unwrap_or("*"), "target cleared");
        self.shared
            .emit_event(&RegistryEvent::Clear { removed });
        removed
    }

    /// Remove the listener called `name`, if there is one.
    pub fn clear_named<T>(&self, target: &Arc<T>, event_type: &str, name: &str) -> bool
    where
        T: EventTarget<E> + ?Sized,
    {
        match self.get_by_name(target, event_type, name) {
            Some(snapshot) => self
                .remove(target, event_type, None, Some(snapshot.options()))
                .success,
            None => false,
        }
    }
}

// -------------------------------------------------------------------------------------------------
// Tests
// -------------------------------------------------------------------------------------------------
