//! Event notification for the Focus Founder progression engine.
//!
//! Services publish [`GameEvent`] values when state changes; UI and
//! animation collaborators subscribe by [`EventKind`] and react. The bus
//! keeps no history and gives no ordering guarantee across kinds.
//!
//! # Delivery contract
//!
//! - `publish` delivers synchronously to every handler registered for the
//!   event's kind, in subscription order.
//! - The handler list is snapshotted when `publish` begins; handlers added
//!   during delivery see only later events.
//! - A handler that returns an error or panics is logged and skipped; the
//!   remaining handlers still run and the publisher never sees the fault.
//! - [`Subscription`] is the only cancellation primitive. Disposing it
//!   twice is the same as disposing it once.
//!
//! The bus is single-threaded (`Rc`-based). Cloning an [`EventBus`] yields
//! another handle to the same registry.
//!
//! [`GameEvent`]: founder_types::GameEvent
//! [`EventKind`]: founder_types::EventKind

pub mod bus;

pub use bus::{EventBus, HandlerError, HandlerResult, PublishReport, Subscription};
