//! The state store and its subscription/projection layer
//!
//! The store owns the current [`AppState`] and is the only writer. A
//! dispatch applies one action, swaps the new tree in and notifies every
//! observer before returning. Observers register a projection; their
//! callback runs only when the projected slice differs from the one they
//! last saw.
//!
//! Dispatching from inside a notification is refused with
//! [`StoreError::ReentrantDispatch`]. Callbacks that need to trigger a
//! follow-up action [`defer`](StoreHandle::defer) it instead: deferred
//! actions are queued and applied, in order, after the current
//! notification round, each with its own full round.

use std::cell::{Cell, RefCell};
use std::collections::{HashSet, VecDeque};
use std::rc::{Rc, Weak};
use std::sync::Arc;

use tracing::{debug, error, trace};

use crate::action::{reduce, Action};
use crate::error::{Result, StoreError};
use crate::state::AppState;

/// Identifies one registered observer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionId(u64);

type Notify = Box<dyn FnMut(&AppState) -> Result<bool>>;

struct Observer {
    id: SubscriptionId,
    label: &'static str,
    notify: Notify,
}

#[derive(Default)]
struct StoreInner {
    state: RefCell<Arc<AppState>>,
    observers: RefCell<Vec<Observer>>,
    pending: RefCell<VecDeque<Action>>,
    cancelled: RefCell<HashSet<SubscriptionId>>,
    dispatching: Cell<bool>,
    notifying: Cell<bool>,
    next_id: Cell<u64>,
    version: Cell<u64>,
}

/// Owning handle to the store
pub struct Store {
    inner: Rc<StoreInner>,
}

/// Non-owning handle for observers; does not keep the store alive
#[derive(Clone)]
pub struct StoreHandle {
    inner: Weak<StoreInner>,
}

/// Registration returned by [`Store::observe`]
#[derive(Debug)]
#[must_use = "dropping a Subscription keeps the observer registered; call unsubscribe to remove it"]
pub struct Subscription {
    id: SubscriptionId,
    store: StoreHandle,
}

impl std::fmt::Debug for StoreHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StoreHandle")
            .field("alive", &(self.inner.strong_count() > 0))
            .finish()
    }
}

impl Store {
    /// Create a store holding the empty initial tree
    pub fn new() -> Self {
        Self::with_state(AppState::default())
    }

    pub fn with_state(state: AppState) -> Self {
        let inner = StoreInner {
            state: RefCell::new(Arc::new(state)),
            ..Default::default()
        };
        Self {
            inner: Rc::new(inner),
        }
    }

    pub fn handle(&self) -> StoreHandle {
        StoreHandle {
            inner: Rc::downgrade(&self.inner),
        }
    }

    /// Current snapshot
    pub fn state(&self) -> Arc<AppState> {
        self.inner.state.borrow().clone()
    }

    /// Number of actions applied so far
    pub fn version(&self) -> u64 {
        self.inner.version.get()
    }

    /// Apply an action, notify observers, then drain deferred actions
    pub fn dispatch(&self, action: Action) -> Result<()> {
        self.inner.dispatch(action)
    }

    /// Queue an action for after the current round, or apply it now if idle
    pub fn defer(&self, action: Action) -> Result<()> {
        self.inner.defer(action)
    }

    /// Register `callback(next, previous)` to run whenever `projection`
    /// yields a different value
    ///
    /// The callback also runs once immediately with `previous = None`, so a
    /// view renders the current state as soon as it is installed.
    pub fn observe<P, F, C>(&self, label: &'static str, projection: F, mut callback: C) -> Subscription
    where
        P: PartialEq + 'static,
        F: Fn(&AppState) -> P + 'static,
        C: FnMut(&P, Option<&P>) -> Result<()> + 'static,
    {
        let mut last: Option<P> = None;
        let mut notify: Notify = Box::new(move |state: &AppState| {
            let next = projection(state);
            if last.as_ref() == Some(&next) {
                return Ok(false);
            }
            let result = callback(&next, last.as_ref());
            last = Some(next);
            result.map(|()| true)
        });

        let id = SubscriptionId(self.inner.next_id.get());
        self.inner.next_id.set(id.0 + 1);

        let current = self.state();
        if let Err(err) = notify(&current) {
            error!(observer = label, error = %err, "observer failed on install");
        }

        self.inner
            .observers
            .borrow_mut()
            .push(Observer { id, label, notify });

        Subscription {
            id,
            store: self.handle(),
        }
    }

    /// Number of registered observers
    pub fn observer_count(&self) -> usize {
        let cancelled = self.inner.cancelled.borrow();
        self.inner
            .observers
            .borrow()
            .iter()
            .filter(|o| !cancelled.contains(&o.id))
            .count()
    }
}

impl Default for Store {
    fn default() -> Self {
        Self::new()
    }
}

impl StoreHandle {
    fn upgrade(&self) -> Result<Rc<StoreInner>> {
        self.inner.upgrade().ok_or_else(|| StoreError::Closed.into())
    }

    pub fn state(&self) -> Result<Arc<AppState>> {
        Ok(self.upgrade()?.state.borrow().clone())
    }

    /// Synchronous dispatch; fails with `ReentrantDispatch` inside a round
    pub fn dispatch(&self, action: Action) -> Result<()> {
        self.upgrade()?.dispatch(action)
    }

    pub fn defer(&self, action: Action) -> Result<()> {
        self.upgrade()?.defer(action)
    }
}

impl Subscription {
    pub fn id(&self) -> SubscriptionId {
        self.id
    }

    /// Remove the observer; it will not run again, even later in a round
    /// that is currently in progress
    pub fn unsubscribe(self) {
        if let Ok(inner) = self.store.upgrade() {
            inner.remove(self.id);
        }
    }
}

/// Clears the dispatching flag even if a callback panics
struct DispatchGuard<'a>(&'a Cell<bool>);

impl Drop for DispatchGuard<'_> {
    fn drop(&mut self) {
        self.0.set(false);
    }
}

/// Puts the observers taken out for a round back into the registry, even
/// if a callback panics
struct RoundGuard<'a> {
    inner: &'a StoreInner,
    observers: Vec<Observer>,
}

impl Drop for RoundGuard<'_> {
    fn drop(&mut self) {
        let inner = self.inner;
        inner.notifying.set(false);

        // Observers registered during the round were pushed onto the
        // emptied list; they go after the existing ones.
        let mut observers = std::mem::take(&mut self.observers);
        let mut registry = inner.observers.borrow_mut();
        observers.append(&mut registry);
        let mut cancelled = inner.cancelled.borrow_mut();
        observers.retain(|o| !cancelled.contains(&o.id));
        cancelled.clear();
        *registry = observers;
    }
}

impl StoreInner {
    fn dispatch(&self, action: Action) -> Result<()> {
        if self.dispatching.get() {
            return Err(StoreError::ReentrantDispatch {
                action: action.name(),
            }
            .into());
        }
        self.dispatching.set(true);
        let _guard = DispatchGuard(&self.dispatching);

        let mut next = Some(action);
        while let Some(action) = next {
            if let Err(err) = self.apply(action) {
                let dropped = {
                    let mut pending = self.pending.borrow_mut();
                    let dropped = pending.len();
                    pending.clear();
                    dropped
                };
                if dropped > 0 {
                    debug!(dropped, "discarding deferred actions after failed dispatch");
                }
                return Err(err);
            }
            next = self.pending.borrow_mut().pop_front();
        }
        Ok(())
    }

    fn defer(&self, action: Action) -> Result<()> {
        if self.dispatching.get() {
            debug!(action = action.name(), "deferring action");
            self.pending.borrow_mut().push_back(action);
            Ok(())
        } else {
            self.dispatch(action)
        }
    }

    fn apply(&self, action: Action) -> Result<()> {
        let name = action.name();
        let prior = self.state.borrow().clone();
        let next = Arc::new(reduce(&prior, action)?);
        *self.state.borrow_mut() = next.clone();

        let version = self.version.get() + 1;
        self.version.set(version);
        trace!(action = name, version, "applied action");

        self.notify(&next);
        Ok(())
    }

    /// One notification round: every observer, in registration order,
    /// sees the same new tree; a failing observer does not stop the rest
    fn notify(&self, state: &AppState) {
        let mut round = RoundGuard {
            inner: self,
            observers: std::mem::take(&mut *self.observers.borrow_mut()),
        };
        self.notifying.set(true);

        for observer in round.observers.iter_mut() {
            if self.cancelled.borrow().contains(&observer.id) {
                continue;
            }
            match (observer.notify)(state) {
                Ok(true) => trace!(observer = observer.label, "observer notified"),
                Ok(false) => {}
                Err(err) => error!(observer = observer.label, error = %err, "observer failed"),
            }
        }
    }

    fn remove(&self, id: SubscriptionId) {
        self.observers.borrow_mut().retain(|o| o.id != id);
        if self.notifying.get() {
            self.cancelled.borrow_mut().insert(id);
        }
    }
}
