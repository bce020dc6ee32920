//! Observable state containers
//!
//! A [`Container`] owns one mutable record and notifies its subscribers
//! synchronously after every mutation. Containers are created once at
//! startup, cloned as cheap handles, and live for the session's lifetime.

use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError, Weak};

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

type Handler<S> = Box<dyn Fn(&S) + Send>;

struct Registry<S> {
    next_id: u64,
    handlers: Vec<(u64, Handler<S>)>,
}

impl<S> Default for Registry<S> {
    fn default() -> Self {
        Self {
            next_id: 0,
            handlers: Vec::new(),
        }
    }
}

/// An observable, shareable state cell.
///
/// Cloning the container clones the handle, not the record: every clone
/// observes and mutates the same state. A mutation is applied atomically
/// with respect to notification, so a subscriber always sees a
/// fully-updated, self-consistent record, exactly once per
/// [`mutate`](Container::mutate) call, in subscription order.
pub struct Container<S> {
    state: Arc<Mutex<S>>,
    registry: Arc<Mutex<Registry<S>>>,
}

impl<S> Clone for Container<S> {
    fn clone(&self) -> Self {
        Self {
            state: Arc::clone(&self.state),
            registry: Arc::clone(&self.registry),
        }
    }
}

impl<S: fmt::Debug> fmt::Debug for Container<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Container")
            .field("state", &*lock(&self.state))
            .finish_non_exhaustive()
    }
}

impl<S: Clone + Default + Send + 'static> Default for Container<S> {
    fn default() -> Self {
        Self::new(S::default())
    }
}

impl<S: Clone + Send + 'static> Container<S> {
    /// A container holding `initial`.
    #[must_use]
    pub fn new(initial: S) -> Self {
        Self {
            state: Arc::new(Mutex::new(initial)),
            registry: Arc::new(Mutex::new(Registry::default())),
        }
    }

    /// A snapshot of the current record.
    #[must_use]
    pub fn state(&self) -> S {
        lock(&self.state).clone()
    }

    /// Apply `f` to the record, then hand the new state to every
    /// subscriber.
    ///
    /// Handlers run synchronously on the calling thread, after the state
    /// lock has been released; they may read
    /// [`state`](Container::state) but must not mutate this container,
    /// subscribe, or unsubscribe.
    pub fn mutate(&self, f: impl FnOnce(&mut S)) {
        let snapshot = {
            let mut state = lock(&self.state);
            f(&mut state);
            state.clone()
        };
        for (_, handler) in &lock(&self.registry).handlers {
            handler(&snapshot);
        }
    }

    /// Register `handler` to run after every subsequent mutation.
    ///
    /// The handler is removed when the returned [`Subscription`] is
    /// dropped; call [`Subscription::detach`] to keep it for the
    /// container's whole lifetime.
    pub fn subscribe(&self, handler: impl Fn(&S) + Send + 'static) -> Subscription<S> {
        let mut registry = lock(&self.registry);
        let id = registry.next_id;
        registry.next_id += 1;
        registry.handlers.push((id, Box::new(handler)));
        Subscription {
            id,
            registry: Some(Arc::downgrade(&self.registry)),
        }
    }
}

/// Handle to a registered subscriber; unsubscribes on drop.
#[must_use = "dropping a subscription unsubscribes its handler"]
pub struct Subscription<S> {
    id: u64,
    registry: Option<Weak<Mutex<Registry<S>>>>,
}

impl<S> Subscription<S> {
    /// Keep the handler registered for as long as the container lives.
    pub fn detach(mut self) {
        self.registry = None;
    }
}

impl<S> Drop for Subscription<S> {
    fn drop(&mut self) {
        if let Some(registry) = self.registry.take().and_then(|weak| weak.upgrade()) {
            lock(&registry).handlers.retain(|(id, _)| *id != self.id);
        }
    }
}

impl<S> fmt::Debug for Subscription<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Subscription")
            .field("id", &self.id)
            .field("detached", &self.registry.is_none())
            .finish_non_exhaustive()
    }
}

/// Orders racing asynchronous completions targeting one container.
///
/// Two in-flight fetches may complete in either order; without a guard, a
/// slow response issued earlier could overwrite a fast response issued
/// later. Each fetch takes a ticket with [`begin`](FetchSequence::begin)
/// before suspending and offers its completion through
/// [`try_apply`](FetchSequence::try_apply); a completion that lost the race
/// to a newer one is rejected and must be discarded.
#[derive(Debug, Default)]
pub struct FetchSequence {
    issued: AtomicU64,
    applied: AtomicU64,
}

impl FetchSequence {
    /// Issue the next ticket.
    #[must_use]
    pub fn begin(&self) -> u64 {
        self.issued.fetch_add(1, Ordering::SeqCst) + 1
    }

    /// Claim the right to apply completion `seq`.
    ///
    /// Returns `false` when a completion with a newer ticket has already
    /// been applied.
    pub fn try_apply(&self, seq: u64) -> bool {
        let mut current = self.applied.load(Ordering::SeqCst);
        while seq > current {
            match self
                .applied
                .compare_exchange(current, seq, Ordering::SeqCst, Ordering::SeqCst)
            {
                Ok(_) => return true,
                Err(observed) => current = observed,
            }
        }
        false
    }
}
