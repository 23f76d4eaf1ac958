//! Basic usage example for listener-registry.
//!
//! Demonstrates:
//! - Registering named, anonymous and fire-once listeners
//! - Listing what is attached to a target
//! - Removing by name and by callback
//! - Watching the registry with `tracing` and a trace callback
//!
//! Run with: `cargo run --example basic_usage`

use std::sync::{Arc, Mutex};

use listener_registry::{
    listener, EventListenerRegistry, EventTarget, Listener, ListenerOptions, NormalizedOptions,
};

// A minimal target: keeps its subscriptions in a list and dispatches to a snapshot.
#[derive(Default)]
struct Window {
    subscriptions: Mutex<Vec<(String, Listener<String>)>>,
}

impl Window {
    fn dispatch(&self, event_type: &str, payload: &str) {
        let snapshot: Vec<Listener<String>> = self
            .subscriptions
            .lock()
            .unwrap()
            .iter()
            .filter(|(t, _)| t == event_type)
            .map(|(_, cb)| cb.clone())
            .collect();
        for callback in snapshot {
            callback(&payload.to_string());
        }
    }
}

impl EventTarget<String> for Window {
    fn subscribe(&self, event_type: &str, callback: &Listener<String>, _: &NormalizedOptions) {
        self.subscriptions
            .lock()
            .unwrap()
            .push((event_type.to_string(), callback.clone()));
    }

    fn unsubscribe(&self, event_type: &str, callback: &Listener<String>, _: &NormalizedOptions) {
        self.subscriptions
            .lock()
            .unwrap()
            .retain(|(t, cb)| !(t == event_type && Arc::ptr_eq(cb, callback)));
    }

    fn describe(&self) -> String {
        "window".to_string()
    }
}

fn main() {
    tracing_subscriber::fmt()
        .with_max_level(tracing::Level::DEBUG)
        .init();

    println!("=== listener-registry: Basic Usage ===\n");

    let registry = EventListenerRegistry::new();
    let window = Arc::new(Window::default());

    registry.set_trace_callback(|event| println!("   [registry-trace] {event}"));

    // -------------------------------------------------------------------------
    // 1. Register listeners
    // -------------------------------------------------------------------------
    println!("1. Registering listeners...");

    let on_resize = listener(|size: &String| println!("   resize -> {size}"));
    registry
        .register(&window, "resize", &on_resize, Some(ListenerOptions::named("layout")))
        .expect("name is free");

    let anonymous = registry
        .register(&window, "resize", &listener(|_: &String| println!("   resize (anonymous)")), None)
        .expect("generated names never collide");
    println!("   anonymous listener got name {}", anonymous.name);

    registry
        .register(
            &window,
            "load",
            &listener(|_: &String| println!("   loaded (only once)")),
            Some(ListenerOptions::default().with_once(true)),
        )
        .expect("name is free");

    // -------------------------------------------------------------------------
    // 2. Inspect
    // -------------------------------------------------------------------------
    println!("\n2. Listing listeners...");

    for group in registry.list_all(&window) {
        let names: Vec<&str> = group.listeners().iter().map(|l| l.name()).collect();
        println!("   {} -> {:?}", group.event_type(), names);
    }

    // -------------------------------------------------------------------------
    // 3. Dispatch
    // -------------------------------------------------------------------------
    println!("\n3. Dispatching...");

    window.dispatch("resize", "800x600");
    window.dispatch("load", "");
    window.dispatch("load", "");
    println!("   load listeners left: {}", registry.exists(&window, "load"));

    // -------------------------------------------------------------------------
    // 4. Remove
    // -------------------------------------------------------------------------
    println!("\n4. Removing...");

    let by_callback = registry.remove(&window, "resize", Some(&on_resize), None);
    println!("   removed by callback: {}", by_callback.success);

    let missing = registry.remove(&window, "resize", None, Some(&ListenerOptions::named("layout")));
    println!("   removed again: {} ({:?})", missing.success, missing.message);

    println!("   cleared: {}", registry.clear_for_target(&window, None));

    println!("\n=== Example completed successfully! ===");
}
