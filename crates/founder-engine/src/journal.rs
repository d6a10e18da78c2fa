//! Structured logging of every published game event.

use founder_events::{EventBus, Subscription};
use founder_types::{EventKind, GameEvent};
use tracing::{info, warn};

/// Log target for game events, so they can be filtered on their own.
pub const EVENT_TARGET: &str = "founder::events";

/// Subscribe a logging handler to every event kind.
///
/// The handlers stay registered while the returned subscriptions live.
pub fn attach(bus: &EventBus) -> Vec<Subscription> {
    EventKind::ALL
        .iter()
        .map(|kind| bus.subscribe(*kind, |event| {
            log_event(event);
            Ok(())
        }))
        .collect()
}

fn log_event(event: &GameEvent) {
    match serde_json::to_string(event) {
        Ok(json) => info!(target: EVENT_TARGET, kind = ?event.kind(), event = %json, "game event"),
        Err(err) => warn!(target: EVENT_TARGET, kind = ?event.kind(), error = %err, "unserializable game event"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn subscribes_to_every_kind() {
        let bus = EventBus::new();
        let subscriptions = attach(&bus);
        assert_eq!(subscriptions.len(), EventKind::ALL.len());
        for kind in EventKind::ALL {
            assert_eq!(bus.handler_count(kind), 1);
        }
        drop(subscriptions);
        assert_eq!(bus.handler_count(EventKind::FocusGained), 0);
    }
}
