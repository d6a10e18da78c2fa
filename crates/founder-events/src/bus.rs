//! The typed publish/subscribe bus.

use std::cell::RefCell;
use std::collections::BTreeMap;
use std::panic::{AssertUnwindSafe, catch_unwind};
use std::rc::{Rc, Weak};

use founder_types::{EventKind, GameEvent};
use tracing::{error, trace, warn};

/// Error a subscriber returns when it cannot handle an event.
#[derive(Debug, thiserror::Error)]
#[error("{message}")]
pub struct HandlerError {
    /// Description of what went wrong.
    pub message: String,
}

impl HandlerError {
    /// Create a handler error from a message.
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

/// Result type subscriber closures return.
pub type HandlerResult = Result<(), HandlerError>;

/// Outcome of a single [`EventBus::publish`] call.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PublishReport {
    /// Handlers that ran to completion.
    pub delivered: usize,
    /// Handlers that returned an error, panicked, or were already running.
    pub failed: usize,
}

type Handler = Rc<RefCell<dyn FnMut(&GameEvent) -> HandlerResult>>;

struct Registration {
    id: u64,
    handler: Handler,
}

#[derive(Default)]
struct Registry {
    next_id: u64,
    handlers: BTreeMap<EventKind, Vec<Registration>>,
}

impl Registry {
    fn remove(&mut self, kind: EventKind, id: u64) -> bool {
        let Some(list) = self.handlers.get_mut(&kind) else {
            return false;
        };
        let before = list.len();
        list.retain(|reg| reg.id != id);
        before != list.len()
    }
}

/// Handle to a shared handler registry.
#[derive(Clone, Default)]
pub struct EventBus {
    registry: Rc<RefCell<Registry>>,
}

impl core::fmt::Debug for EventBus {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        let registry = self.registry.borrow();
        let total: usize = registry.handlers.values().map(Vec::len).sum();
        f.debug_struct("EventBus").field("handlers", &total).finish()
    }
}

impl EventBus {
    /// Create a bus with no subscribers.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `handler` for events of `kind`.
    ///
    /// The handler stays registered until the returned [`Subscription`] is
    /// disposed or dropped.
    pub fn subscribe<F>(&self, kind: EventKind, handler: F) -> Subscription
    where
        F: FnMut(&GameEvent) -> HandlerResult + 'static,
    {
        let mut registry = self.registry.borrow_mut();
        let id = registry.next_id;
        registry.next_id = registry.next_id.wrapping_add(1);
        let handler: Handler = Rc::new(RefCell::new(handler));
        registry
            .handlers
            .entry(kind)
            .or_default()
            .push(Registration { id, handler });
        trace!(?kind, id, "handler subscribed");

        Subscription {
            registry: Rc::downgrade(&self.registry),
            kind,
            id,
        }
    }

    /// Deliver `event` to every handler currently registered for its kind.
    pub fn publish(&self, event: &GameEvent) -> PublishReport {
        let kind = event.kind();
        let snapshot: Vec<(u64, Handler)> = {
            let registry = self.registry.borrow();
            registry
                .handlers
                .get(&kind)
                .map(|list| {
                    list.iter()
                        .map(|reg| (reg.id, Rc::clone(&reg.handler)))
                        .collect()
                })
                .unwrap_or_default()
        };

        let mut report = PublishReport::default();
        for (id, handler) in snapshot {
            let Ok(mut callback) = handler.try_borrow_mut() else {
                warn!(?kind, id, "handler re-entered while running; skipped");
                report.failed = report.failed.saturating_add(1);
                continue;
            };
            match catch_unwind(AssertUnwindSafe(|| callback(event))) {
                Ok(Ok(())) => report.delivered = report.delivered.saturating_add(1),
                Ok(Err(err)) => {
                    error!(?kind, id, error = %err, "event handler failed");
                    report.failed = report.failed.saturating_add(1);
                }
                Err(_panic) => {
                    error!(?kind, id, "event handler panicked");
                    report.failed = report.failed.saturating_add(1);
                }
            }
        }
        report
    }

    /// Number of handlers registered for `kind`.
    pub fn handler_count(&self, kind: EventKind) -> usize {
        self.registry
            .borrow()
            .handlers
            .get(&kind)
            .map_or(0, Vec::len)
    }
}

/// Capability that keeps a handler registered.
///
/// Dropping the subscription deregisters the handler. Call
/// [`detach`](Self::detach) to keep it registered for the bus's lifetime.
#[must_use = "dropping a Subscription immediately deregisters its handler"]
#[derive(Debug)]
pub struct Subscription {
    registry: Weak<RefCell<Registry>>,
    kind: EventKind,
    id: u64,
}

impl Subscription {
    /// Deregister the handler. Further calls do nothing.
    pub fn dispose(&mut self) {
        if let Some(registry) = self.registry.upgrade() {
            if registry.borrow_mut().remove(self.kind, self.id) {
                trace!(kind = ?self.kind, id = self.id, "handler disposed");
            }
        }
        self.registry = Weak::new();
    }

    /// Whether the handler is still registered.
    pub fn is_active(&self) -> bool {
        self.registry.upgrade().is_some_and(|registry| {
            registry
                .borrow()
                .handlers
                .get(&self.kind)
                .is_some_and(|list| list.iter().any(|reg| reg.id == self.id))
        })
    }

    /// The kind this subscription listens to.
    pub const fn kind(&self) -> EventKind {
        self.kind
    }

    /// Give up the capability and leave the handler registered.
    pub fn detach(mut self) {
        self.registry = Weak::new();
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        self.dispose();
    }
}
