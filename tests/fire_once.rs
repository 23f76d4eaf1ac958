//! Integration tests for `once` listeners.
//!
//! The registry, not the target, drops a fire-once listener: the wrapper it
//! subscribes calls the original callback and then removes its own record.

mod common;

use std::sync::{Arc, Mutex};

use common::{calls, counter, Button, Click};
use listener_registry::{listener, EventListenerRegistry, ListenerOptions, RegistryEvent};

#[test]
fn test_once_listener_is_called_only_once() {
    let registry = EventListenerRegistry::new();
    let button = Button::new("myButton");
    let (callback, count) = counter();

    registry
        .register(
            &button,
            "click",
            &callback,
            Some(ListenerOptions::named("my-test-listener").with_once(true)),
        )
        .unwrap();

    for _ in 0..10 {
        button.click();
    }

    assert_eq!(calls(&count), 1);
    assert!(!registry.exists(&button, "click"));
    assert_eq!(button.subscription_count("click"), 0);
}

#[test]
fn test_once_listener_receives_the_event() {
    let registry = EventListenerRegistry::new();
    let button = Button::new("myButton");
    let seen = Arc::new(Mutex::new(None));
    let seen_clone = seen.clone();

    registry
        .register(
            &button,
            "click",
            &listener(move |event: &Click| *seen_clone.lock().unwrap() = Some(event.clone())),
            Some(ListenerOptions::default().with_once(true)),
        )
        .unwrap();
    button.click();

    assert_eq!(
        *seen.lock().unwrap(),
        Some(Click {
            target_id: "myButton".to_string()
        })
    );
}

#[test]
fn test_once_listener_removed_by_callback_before_firing() {
    let registry = EventListenerRegistry::new();
    let button = Button::new("myButton");
    let (callback, count) = counter();

    registry
        .register(
            &button,
            "click",
            &callback,
            Some(ListenerOptions::named("my-test-listener-once").with_once(true)),
        )
        .unwrap();

    let removal = registry.remove(&button, "click", Some(&callback), None);
    assert!(removal.success);

    button.click();
    assert_eq!(calls(&count), 0);
    assert_eq!(button.subscription_count("click"), 0);
}

#[test]
fn test_once_listener_leaves_siblings_in_place() {
    let registry = EventListenerRegistry::new();
    let button = Button::new("myButton");
    let (once, once_count) = counter();
    let (always, always_count) = counter();

    registry
        .register(&button, "click", &once, Some(ListenerOptions::default().with_once(true)))
        .unwrap();
    let always_name = registry.register(&button, "click", &always, None).unwrap().name;

    button.click();
    button.click();

    assert_eq!(calls(&once_count), 1);
    assert_eq!(calls(&always_count), 2);
    assert!(registry.exists(&button, "click"));

    let remaining = registry.list_for(&button, "click");
    assert_eq!(remaining.len(), 1);
    assert_eq!(remaining[0].name(), always_name);
}

#[test]
fn test_once_listener_can_be_registered_again_under_its_name() {
    let registry = EventListenerRegistry::new();
    let button = Button::new("myButton");
    let (callback, count) = counter();
    let options = ListenerOptions::named("again").with_once(true);

    registry
        .register(&button, "click", &callback, Some(options.clone()))
        .unwrap();
    button.click();

    registry
        .register(&button, "click", &callback, Some(options))
        .unwrap();
    button.click();
    button.click();

    assert_eq!(calls(&count), 2);
    assert!(!registry.exists_named(&button, "click", "again"));
}

#[test]
fn test_once_listener_emits_fire_once_event() {
    let registry = EventListenerRegistry::new();
    let button = Button::new("myButton");
    let events = Arc::new(Mutex::new(Vec::new()));
    let events_clone = events.clone();

    registry
        .register(
            &button,
            "click",
            &counter().0,
            Some(ListenerOptions::named("once").with_once(true)),
        )
        .unwrap();
    registry.set_trace_callback(move |event| events_clone.lock().unwrap().push(event.clone()));

    button.click();

    let captured = events.lock().unwrap();
    assert_eq!(
        *captured,
        [
            RegistryEvent::Remove {
                event_type: "click".into(),
                name: Some("once".into()),
                removed: true,
            },
            RegistryEvent::FireOnce {
                event_type: "click".into(),
                name: "once".into(),
            },
        ]
    );
}

#[test]
fn test_once_listener_that_removes_itself_inside_the_callback() {
    let registry = EventListenerRegistry::new();
    let button = Button::new("myButton");
    let results = Arc::new(Mutex::new(Vec::new()));

    let registry_clone = registry.clone();
    let button_clone = button.clone();
    let results_clone = results.clone();
    let callback = listener(move |_: &Click| {
        let removal =
            registry_clone.remove(&button_clone, "click", None, Some(&ListenerOptions::named("self")));
        results_clone.lock().unwrap().push(removal.success);
    });

    registry
        .register(&button, "click", &callback, Some(ListenerOptions::named("self").with_once(true)))
        .unwrap();
    button.click();
    button.click();

    // The callback's own removal wins; the wrapper then finds nothing to remove.
    assert_eq!(*results.lock().unwrap(), [true]);
    assert!(!registry.exists(&button, "click"));
}

#[test]
fn test_once_listener_is_removed_even_if_the_callback_panics() {
    let registry = EventListenerRegistry::new();
    let button = Button::new("myButton");
    let callback = listener(|_: &Click| panic!("listener failed"));

    registry
        .register(&button, "click", &callback, Some(ListenerOptions::named("boom").with_once(true)))
        .unwrap();

    let outcome = std::panic::catch_unwind(std::panic::AssertUnwindSafe(|| button.click()));
    assert!(outcome.is_err());

    assert!(!registry.exists(&button, "click"));
    assert_eq!(button.subscription_count("click"), 0);

    // The dead wrapper is gone, so another click is harmless.
    button.click();
}
