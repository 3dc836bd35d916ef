//! Typed observer registry with disposable subscription handles.
//!
//! Notification runs synchronously on the caller's thread. The handler list
//! is copied before the fan-out, so a handler may subscribe, unsubscribe or
//! trigger another notification without deadlocking. Changes made during a
//! fan-out take effect from the next notification on.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, Weak};

use crate::sync::lock;

type Handler<A> = Arc<dyn Fn(&A) + Send + Sync>;

struct Registry<A: ?Sized> {
    next_id: AtomicU64,
    handlers: Mutex<Vec<(u64, Handler<A>)>>,
}

trait Detach: Send + Sync {
    fn detach(&self, id: u64);
}

impl<A: ?Sized + 'static> Detach for Registry<A> {
    fn detach(&self, id: u64) {
        lock(&self.handlers).retain(|(handler_id, _)| *handler_id != id);
    }
}

/// Ordered list of handlers notified with a `&A`.
pub struct Observers<A: ?Sized + 'static> {
    registry: Arc<Registry<A>>,
}

impl<A: ?Sized + 'static> Default for Observers<A> {
    fn default() -> Self {
        Self {
            registry: Arc::new(Registry {
                next_id: AtomicU64::new(0),
                handlers: Mutex::new(Vec::new()),
            }),
        }
    }
}

impl<A: ?Sized + 'static> Observers<A> {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `handler`; it runs on every notification until the returned
    /// [`Subscription`] is dropped.
    pub fn subscribe(&self, handler: impl Fn(&A) + Send + Sync + 'static) -> Subscription {
        let id = self.registry.next_id.fetch_add(1, Ordering::Relaxed);
        lock(&self.registry.handlers).push((id, Arc::new(handler)));
        let registry: Weak<dyn Detach> = Arc::downgrade(&self.registry) as Weak<dyn Detach>;
        Subscription {
            id,
            registry,
            active: true,
        }
    }

    /// Call every handler, in subscription order.
    pub fn notify(&self, value: &A) {
        let handlers: Vec<Handler<A>> = lock(&self.registry.handlers)
            .iter()
            .map(|(_, handler)| Arc::clone(handler))
            .collect();
        for handler in handlers {
            handler(value);
        }
    }

    #[must_use]
    pub fn len(&self) -> usize {
        lock(&self.registry.handlers).len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Handle to a registered handler. Dropping it unsubscribes.
#[must_use = "dropping a Subscription immediately unsubscribes its handler"]
pub struct Subscription {
    id: u64,
    registry: Weak<dyn Detach>,
    active: bool,
}

impl Subscription {
    /// Remove the handler now.
    pub fn unsubscribe(self) {
        drop(self);
    }

    /// Keep the handler registered for as long as the registry lives.
    pub fn detach(mut self) {
        self.active = false;
    }
}

impl std::fmt::Debug for Subscription {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Subscription")
            .field("id", &self.id)
            .field("active", &self.active)
            .finish_non_exhaustive()
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        if !self.active {
            return;
        }
        if let Some(registry) = self.registry.upgrade() {
            registry.detach(self.id);
        }
    }
}
