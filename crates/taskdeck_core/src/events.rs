//! Named-event notification bus.
//!
//! # Responsibility
//! - Deliver named events with free-form string payload maps to
//!   subscribers registered for that name.
//!
//! # Invariants
//! - Subscribers for one event run in registration order.
//! - Payloads carry no schema beyond convention; unknown keys are the
//!   subscriber's problem.

use std::collections::BTreeMap;

/// Free-form event payload.
pub type EventPayload = BTreeMap<String, String>;

type Subscriber = Box<dyn Fn(&EventPayload)>;

/// In-process event bus keyed by event name.
#[derive(Default)]
pub struct EventBus {
    subscribers: BTreeMap<String, Vec<Subscriber>>,
}

impl EventBus {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a callback for one event name.
    pub fn subscribe(&mut self, event: &str, callback: impl Fn(&EventPayload) + 'static) {
        self.subscribers
            .entry(event.to_string())
            .or_default()
            .push(Box::new(callback));
    }

    /// Delivers `payload` to every subscriber of `event`.
    ///
    /// Events without subscribers are dropped silently.
    pub fn publish(&self, event: &str, payload: &EventPayload) {
        let Some(callbacks) = self.subscribers.get(event) else {
            return;
        };
        for callback in callbacks {
            callback(payload);
        }
    }

    /// Number of subscribers registered for `event`.
    pub fn subscriber_count(&self, event: &str) -> usize {
        self.subscribers
            .get(event)
            .map_or(0, |callbacks| callbacks.len())
    }
}

/// Builds a payload map from key/value pairs.
pub fn payload(pairs: &[(&str, &str)]) -> EventPayload {
    pairs
        .iter()
        .map(|(key, value)| (key.to_string(), value.to_string()))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::{payload, EventBus};
    use std::cell::RefCell;
    use std::rc::Rc;

    #[test]
    fn delivers_to_matching_subscribers_in_registration_order() {
        let mut bus = EventBus::new();
        let seen = Rc::new(RefCell::new(Vec::new()));

        for tag in ["first", "second"] {
            let seen = Rc::clone(&seen);
            bus.subscribe("task_created", move |event_payload| {
                let title = event_payload.get("title").cloned().unwrap_or_default();
                seen.borrow_mut().push(format!("{tag}:{title}"));
            });
        }

        bus.publish("task_created", &payload(&[("title", "buy milk")]));
        assert_eq!(
            *seen.borrow(),
            vec!["first:buy milk".to_string(), "second:buy milk".to_string()]
        );
    }

    #[test]
    fn unrelated_events_do_not_fire() {
        let mut bus = EventBus::new();
        let seen = Rc::new(RefCell::new(0_usize));
        {
            let seen = Rc::clone(&seen);
            bus.subscribe("task_deleted", move |_| {
                *seen.borrow_mut() += 1;
            });
        }

        bus.publish("task_created", &payload(&[]));
        assert_eq!(*seen.borrow(), 0);
        assert_eq!(bus.subscriber_count("task_deleted"), 1);
        assert_eq!(bus.subscriber_count("task_created"), 0);
    }
}
