//! # Event Registry
//!
//! Ordered, append-only table of subscriptions with synchronous dispatch.
//!
//! ## Dispatch Rules
//!
//! - Only subscriptions whose key equals the event's key are invoked.
//! - They run one after another, in registration order, on the caller's
//!   thread.
//! - The first handler error stops the remaining handlers for that call and
//!   is returned to the caller as-is. Panics are not caught.
//! - Dispatch works on a snapshot taken when it starts. Subscriptions added
//!   by a handler mid-dispatch fire from the next call onward.

use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use parking_lot::RwLock;
use tracing::{debug, warn};

use crate::events::{CustomEvent, EventArgs, EventKey, LifecycleEvent, PlayerEventPayload};

/// Error type handlers return. The registry passes it through untouched.
pub type HandlerError = anyhow::Error;

/// Result every handler returns.
pub type HandlerResult = Result<(), HandlerError>;

type Callback<E> = Arc<dyn Fn(&E, &LifecycleEvent) -> HandlerResult + Send + Sync>;

/// Position of a subscription in the registry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SubscriptionId(pub u64);

struct Subscription<E> {
    key: EventKey,
    callback: Callback<E>,
}

/// Process-wide registry of lifecycle callbacks.
///
/// `E` is the entity handle type. The registry never stores handles; it
/// only forwards the reference it is given to each callback.
pub struct EventRegistry<E> {
    subscriptions: RwLock<Vec<Subscription<E>>>,
    events_dispatched: AtomicU64,
}

impl<E> EventRegistry<E> {
    /// Create an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self {
            subscriptions: RwLock::new(Vec::new()),
            events_dispatched: AtomicU64::new(0),
        }
    }

    /// Append a callback for `key`.
    ///
    /// Never fails. Registering the same callback twice makes it fire twice.
    pub fn register<F>(&self, key: impl Into<EventKey>, callback: F) -> SubscriptionId
    where
        F: Fn(&E, &LifecycleEvent) -> HandlerResult + Send + Sync + 'static,
    {
        let key = key.into();
        let mut subs = self.subscriptions.write();
        let id = SubscriptionId(subs.len() as u64);
        debug!(key = %key, subscription = id.0, "Subscription registered");
        subs.push(Subscription {
            key,
            callback: Arc::new(callback),
        });
        id
    }

    /// Register a callback for the built-in key bound to payload `P`.
    pub fn on<P, F>(&self, callback: F) -> SubscriptionId
    where
        P: PlayerEventPayload,
        F: Fn(&E, &P) -> HandlerResult + Send + Sync + 'static,
    {
        self.register(P::KEY, move |entity: &E, event: &LifecycleEvent| {
            // Key equality already implies the variant.
            match P::from_event(event) {
                Some(payload) => callback(entity, payload),
                None => Ok(()),
            }
        })
    }

    /// Register a callback for a caller-defined event.
    pub fn on_custom<F>(&self, name: impl Into<String>, callback: F) -> SubscriptionId
    where
        F: Fn(&E, &EventArgs) -> HandlerResult + Send + Sync + 'static,
    {
        self.register(
            EventKey::Custom(name.into()),
            move |entity: &E, event: &LifecycleEvent| match event {
                LifecycleEvent::Custom(custom) => callback(entity, &custom.args),
                _ => Ok(()),
            },
        )
    }

    /// Invoke every callback registered under the event's key.
    ///
    /// Returns how many callbacks ran. A key nobody registered for is a
    /// no-op returning `Ok(0)`.
    pub fn dispatch(&self, entity: &E, event: &LifecycleEvent) -> Result<usize, HandlerError> {
        let key = event.key();
        self.events_dispatched.fetch_add(1, Ordering::Relaxed);

        let snapshot: Vec<Callback<E>> = self
            .subscriptions
            .read()
            .iter()
            .filter(|sub| sub.key == key)
            .map(|sub| Arc::clone(&sub.callback))
            .collect();

        debug!(key = %key, subscriptions = snapshot.len(), "Dispatching event");

        for (index, callback) in snapshot.iter().enumerate() {
            if let Err(e) = callback(entity, event) {
                warn!(
                    key = %key,
                    handler = index,
                    skipped = snapshot.len() - index - 1,
                    error = %e,
                    "Handler failed, dispatch aborted"
                );
                return Err(e);
            }
        }

        Ok(snapshot.len())
    }

    /// Dispatch a typed built-in payload.
    pub fn trigger<P: PlayerEventPayload>(
        &self,
        entity: &E,
        payload: P,
    ) -> Result<usize, HandlerError> {
        self.dispatch(entity, &payload.into_event())
    }

    /// Dispatch a caller-defined event.
    pub fn dispatch_custom(
        &self,
        entity: &E,
        name: impl Into<String>,
        args: EventArgs,
    ) -> Result<usize, HandlerError> {
        self.dispatch(entity, &LifecycleEvent::Custom(CustomEvent::new(name, args)))
    }

    /// Total number of subscriptions, across all keys.
    #[must_use]
    pub fn len(&self) -> usize {
        self.subscriptions.read().len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Number of subscriptions registered under `key`.
    #[must_use]
    pub fn subscription_count(&self, key: &EventKey) -> usize {
        self.subscriptions
            .read()
            .iter()
            .filter(|sub| &sub.key == key)
            .count()
    }

    /// Total dispatch calls made, including ones with no subscribers.
    #[must_use]
    pub fn events_dispatched(&self) -> u64 {
        self.events_dispatched.load(Ordering::Relaxed)
    }
}

impl<E> Default for EventRegistry<E> {
    fn default() -> Self {
        Self::new()
    }
}

impl<E> fmt::Debug for EventRegistry<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EventRegistry")
            .field("subscriptions", &self.len())
            .field("events_dispatched", &self.events_dispatched())
            .finish()
    }
}
