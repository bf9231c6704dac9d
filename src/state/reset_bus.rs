//! Broadcast channel asking the home view to return to its initial state.
//!
//! The bus is an explicitly constructed handle: the root component creates one and
//! provides it to the tree through a context, producers call [`ResetBus::reset_home`]
//! and the home view holds a [`Subscription`] for as long as it is mounted.
//!
//! Delivery is synchronous, in subscription order, at most once per call, with no
//! buffering: a subscriber registered after a call never sees it.

use std::cell::RefCell;
use std::rc::{Rc, Weak};

use crate::error::HandlerError;

type Handler = Rc<dyn Fn() -> Result<(), HandlerError>>;

#[derive(Default)]
struct Registry {
    next_id: u64,
    // Ordered by id, so iteration order is subscription order.
    handlers: Vec<(u64, Handler)>,
}

impl Registry {
    fn contains(&self, id: u64) -> bool {
        self.handlers.iter().any(|(h, _)| *h == id)
    }
}

#[derive(Clone, Default)]
pub struct ResetBus {
    registry: Rc<RefCell<Registry>>,
}

impl PartialEq for ResetBus {
    fn eq(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.registry, &other.registry)
    }
}

impl std::fmt::Debug for ResetBus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ResetBus")
            .field("subscribers", &self.subscriber_count())
            .finish()
    }
}

impl ResetBus {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn subscribe<F>(&self, handler: F) -> Subscription
    where
        F: Fn() -> Result<(), HandlerError> + 'static,
    {
        let mut reg = self.registry.borrow_mut();
        let id = reg.next_id;
        reg.next_id += 1;
        reg.handlers.push((id, Rc::new(handler)));
        tracing::debug!(id, subscribers = reg.handlers.len(), "reset bus subscribe");
        Subscription {
            id,
            registry: Rc::downgrade(&self.registry),
        }
    }

    /// Publish one reset signal to every current subscriber before returning.
    pub fn reset_home(&self) {
        // Snapshot so handlers may subscribe, unsubscribe or publish again.
        let snapshot: Vec<(u64, Handler)> = self.registry.borrow().handlers.clone();
        tracing::debug!(subscribers = snapshot.len(), "reset home");
        for (id, handler) in snapshot {
            if !self.registry.borrow().contains(id) {
                continue;
            }
            if let Err(err) = handler() {
                tracing::warn!(id, error = %err, "reset subscriber failed");
            }
        }
    }

    pub fn subscriber_count(&self) -> usize {
        self.registry.borrow().handlers.len()
    }
}

/// Handle for one registration. Dropping it unsubscribes.
#[must_use = "dropping a Subscription unsubscribes immediately"]
pub struct Subscription {
    id: u64,
    registry: Weak<RefCell<Registry>>,
}

impl Subscription {
    /// Safe to call repeatedly and from inside a handler during delivery.
    pub fn unsubscribe(&self) {
        let Some(registry) = self.registry.upgrade() else {
            return;
        };
        let mut reg = registry.borrow_mut();
        let before = reg.handlers.len();
        reg.handlers.retain(|(h, _)| *h != self.id);
        if reg.handlers.len() != before {
            tracing::debug!(id = self.id, "reset bus unsubscribe");
        }
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        self.unsubscribe();
    }
}
