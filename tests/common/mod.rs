//! An in-memory event target shared by the integration tests.
//!
//! Subscriptions behave like a DOM node's: a (type, callback, capture)
//! triple is stored once, unknown unsubscribes are ignored, and dispatch
//! works on a snapshot so listeners may unsubscribe while it runs.

#![allow(dead_code)]

use std::sync::{Arc, Mutex};

use listener_registry::{EventTarget, Listener, NormalizedOptions};

#[derive(Debug, Clone, PartialEq)]
pub struct Click {
    pub target_id: String,
}

struct Subscription {
    event_type: String,
    callback: Listener<Click>,
    capture: bool,
}

pub struct Button {
    id: String,
    subscriptions: Mutex<Vec<Subscription>>,
}

impl Button {
    pub fn new(id: &str) -> Arc<Self> {
        Arc::new(Self {
            id: id.to_string(),
            subscriptions: Mutex::new(Vec::new()),
        })
    }

    /// Dispatch a `click` event.
    pub fn click(&self) {
        self.dispatch("click");
    }

    pub fn dispatch(&self, event_type: &str) {
        let snapshot: Vec<Listener<Click>> = {
            let subscriptions = self.subscriptions.lock().unwrap();
            let (capturing, bubbling): (Vec<_>, Vec<_>) = subscriptions
                .iter()
                .filter(|s| s.event_type == event_type)
                .partition(|s| s.capture);
            capturing
                .into_iter()
                .chain(bubbling)
                .map(|s| s.callback.clone())
                .collect()
        };

        let event = Click {
            target_id: self.id.clone(),
        };
        for callback in snapshot {
            callback(&event);
        }
    }

    /// Number of native subscriptions for `event_type`, including ones made
    /// without going through the registry.
    pub fn subscription_count(&self, event_type: &str) -> usize {
        self.subscriptions
            .lock()
            .unwrap()
            .iter()
            .filter(|s| s.event_type == event_type)
            .count()
    }

    /// Subscribe directly, bypassing any registry.
    pub fn subscribe_directly(&self, event_type: &str, callback: &Listener<Click>) {
        self.add(event_type, callback, false);
    }

    fn add(&self, event_type: &str, callback: &Listener<Click>, capture: bool) {
        let mut subscriptions = self.subscriptions.lock().unwrap();
        let known = subscriptions.iter().any(|s| {
            s.event_type == event_type && s.capture == capture && Arc::ptr_eq(&s.callback, callback)
        });
        if !known {
            subscriptions.push(Subscription {
                event_type: event_type.to_string(),
                callback: callback.clone(),
                capture,
            });
        }
    }
}

impl EventTarget<Click> for Button {
    fn subscribe(&self, event_type: &str, callback: &Listener<Click>, options: &NormalizedOptions) {
        self.add(event_type, callback, options.capture);
    }

    fn unsubscribe(&self, event_type: &str, callback: &Listener<Click>, options: &NormalizedOptions) {
        self.subscriptions.lock().unwrap().retain(|s| {
            !(s.event_type == event_type
                && s.capture == options.capture
                && Arc::ptr_eq(&s.callback, callback))
        });
    }

    fn describe(&self) -> String {
        format!("button(id={})", self.id)
    }
}

/// A listener that counts its calls.
pub fn counter() -> (Listener<Click>, Arc<Mutex<usize>>) {
    let count = Arc::new(Mutex::new(0));
    let count_clone = count.clone();
    let callback: Listener<Click> = Arc::new(move |_: &Click| {
        *count_clone.lock().unwrap() += 1;
    });
    (callback, count)
}

pub fn calls(count: &Arc<Mutex<usize>>) -> usize {
    *count.lock().unwrap()
}
