use std::collections::BTreeMap;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, RwLock, Weak};

use crate::reducer::Reducer;

/// A dispatch function: feeds an action through a store's pipeline and
/// hands the action back to the caller.
pub type Dispatch<A> = Arc<dyn Fn(A) -> A + Send + Sync>;

/// A read handle onto a store's committed state.
pub type StateReader<S> = Arc<dyn Fn() -> S + Send + Sync>;

/// The store constructor, boxed so enhancers can wrap it.
pub type StoreCreator<S, A> = Box<dyn FnOnce(Reducer<S, A>, S) -> Store<S, A>>;

/// A store enhancer: receives the constructor and returns an augmented
/// constructor.
///
/// [`apply_middleware`](crate::middleware::apply_middleware) is the
/// canonical enhancer; user-written enhancers plug in the same way via
/// [`create_store`].
pub type Enhancer<S, A> = Box<dyn FnOnce(StoreCreator<S, A>) -> StoreCreator<S, A>>;

type Listener = Arc<dyn Fn() + Send + Sync>;

// Keyed by registration id; BTreeMap iteration order is id order, which
// is subscription order.
type ListenerSet = BTreeMap<usize, Listener>;

/// A reducer-driven state container.
///
/// The store holds exactly one state value. All transitions flow through
/// [`dispatch`](Store::dispatch): the reducer computes the next state,
/// the store commits it, and every subscribed listener is notified.
///
/// Cloning a store clones handles to the same underlying cell.
pub struct Store<S, A> {
    state: Arc<RwLock<S>>,
    listeners: Arc<RwLock<ListenerSet>>,
    next_listener_id: Arc<AtomicUsize>,
    dispatching: Arc<AtomicBool>,
    dispatch_fn: Arc<RwLock<Dispatch<A>>>,
}

impl<S, A> Store<S, A>
where
    S: Clone + Send + Sync + 'static,
    A: 'static,
{
    /// Create a store with the given reducer and initial state.
    ///
    /// This is the base constructor; use [`create_store`] when an
    /// enhancer may be involved.
    pub fn new(reducer: Reducer<S, A>, initial_state: S) -> Self {
        let state = Arc::new(RwLock::new(initial_state));
        let listeners: Arc<RwLock<ListenerSet>> = Arc::new(RwLock::new(BTreeMap::new()));
        let dispatching = Arc::new(AtomicBool::new(false));

        let base = base_dispatch(
            reducer,
            Arc::clone(&state),
            Arc::clone(&listeners),
            Arc::clone(&dispatching),
        );

        Self {
            state,
            listeners,
            next_listener_id: Arc::new(AtomicUsize::new(0)),
            dispatching,
            dispatch_fn: Arc::new(RwLock::new(base)),
        }
    }

    /// Get a clone of the committed state.
    pub fn get_state(&self) -> S {
        self.state.read().unwrap().clone()
    }

    /// Read the committed state without cloning it.
    pub fn with_state<F, R>(&self, f: F) -> R
    where
        F: FnOnce(&S) -> R,
    {
        let state = self.state.read().unwrap();
        f(&state)
    }

    /// Send an action through the dispatch pipeline.
    ///
    /// The reducer computes the next state from the committed state and
    /// the action, the store commits it, and every listener registered
    /// when notification begins is invoked in subscription order. The
    /// action is handed back to the caller.
    ///
    /// A dispatch issued while another dispatch on this store is still
    /// running (from a listener, or from a racing thread) is rejected,
    /// not queued: the action comes back unchanged, with no reduction
    /// and no notification.
    pub fn dispatch(&self, action: A) -> A {
        let dispatch = self.current_dispatch();
        dispatch(action)
    }

    /// Register a listener, called after every committed transition.
    ///
    /// Returns a token that removes exactly this registration; the same
    /// closure can be registered any number of times and each token
    /// removes only its own entry. Dropping the token leaves the
    /// listener registered. Listeners registered while a notification
    /// pass is running are first called on the next dispatch.
    pub fn subscribe<F>(&self, listener: F) -> Subscription
    where
        F: Fn() + Send + Sync + 'static,
    {
        let id = self.next_listener_id.fetch_add(1, Ordering::SeqCst);
        self.listeners.write().unwrap().insert(id, Arc::new(listener));

        Subscription {
            id,
            listeners: Arc::downgrade(&self.listeners),
        }
    }

    /// Remove a registered listener. No-op if it was already removed.
    pub fn unsubscribe(&self, subscription: &Subscription) {
        self.listeners.write().unwrap().remove(&subscription.id);
    }

    /// A live read handle onto the committed state.
    ///
    /// Holds only the state cell, not the whole store.
    pub fn reader(&self) -> StateReader<S> {
        let state = Arc::clone(&self.state);
        Arc::new(move || state.read().unwrap().clone())
    }

    /// A live dispatch handle.
    ///
    /// The handle always forwards to the store's current pipeline, so it
    /// keeps working when an enhancer swaps the pipeline out after the
    /// handle was created. It holds the pipeline weakly: once every
    /// store handle is gone it degrades to a no-op that hands the
    /// action back, and it never keeps the store alive on its own (the
    /// middleware chain stored *in* the pipeline holds such handles, so
    /// a strong reference here would cycle).
    pub fn dispatcher(&self) -> Dispatch<A> {
        let dispatch_fn = Arc::downgrade(&self.dispatch_fn);
        Arc::new(move |action| match dispatch_fn.upgrade() {
            Some(cell) => {
                let dispatch = Arc::clone(&*cell.read().unwrap());
                dispatch(action)
            }
            None => action,
        })
    }

    /// Snapshot of the current dispatch pipeline.
    ///
    /// Unlike [`dispatcher`](Store::dispatcher), the snapshot does not
    /// follow later swaps, which is what a wrapping enhancer wants for
    /// its `next` link.
    pub fn current_dispatch(&self) -> Dispatch<A> {
        Arc::clone(&*self.dispatch_fn.read().unwrap())
    }

    /// Replace the dispatch pipeline, returning the previous one.
    ///
    /// Enhancer plumbing:
    /// [`apply_middleware`](crate::middleware::apply_middleware) installs
    /// the composed chain through this.
    pub fn swap_dispatch(&self, dispatch: Dispatch<A>) -> Dispatch<A> {
        std::mem::replace(&mut *self.dispatch_fn.write().unwrap(), dispatch)
    }
}

impl<S, A> Clone for Store<S, A> {
    fn clone(&self) -> Self {
        Self {
            state: Arc::clone(&self.state),
            listeners: Arc::clone(&self.listeners),
            next_listener_id: Arc::clone(&self.next_listener_id),
            dispatching: Arc::clone(&self.dispatching),
            dispatch_fn: Arc::clone(&self.dispatch_fn),
        }
    }
}

/// Construct a store, delegating to `enhancer` when one is given.
///
/// With an enhancer, construction is handed over entirely: the enhancer
/// receives the base constructor, wraps it, and the wrapped constructor
/// builds the store that is returned.
pub fn create_store<S, A>(
    reducer: Reducer<S, A>,
    initial_state: S,
    enhancer: Option<Enhancer<S, A>>,
) -> Store<S, A>
where
    S: Clone + Send + Sync + 'static,
    A: 'static,
{
    match enhancer {
        Some(enhance) => {
            let base: StoreCreator<S, A> = Box::new(Store::new);
            enhance(base)(reducer, initial_state)
        }
        None => Store::new(reducer, initial_state),
    }
}

/// Removal token returned by [`Store::subscribe`].
///
/// Holds a weak handle to the listener set, so it stays valid (and
/// harmless) after the store itself is gone.
pub struct Subscription {
    id: usize,
    listeners: Weak<RwLock<ListenerSet>>,
}

impl Subscription {
    /// Remove the registration this token stands for. No-op if it was
    /// already removed or the store no longer exists.
    pub fn unsubscribe(self) {
        if let Some(listeners) = self.listeners.upgrade() {
            listeners.write().unwrap().remove(&self.id);
        }
    }
}

fn base_dispatch<S, A>(
    reducer: Reducer<S, A>,
    state: Arc<RwLock<S>>,
    listeners: Arc<RwLock<ListenerSet>>,
    dispatching: Arc<AtomicBool>,
) -> Dispatch<A>
where
    S: Clone + Send + Sync + 'static,
    A: 'static,
{
    Arc::new(move |action: A| {
        // Single-flight: a dispatch arriving while another one is
        // running is rejected, not queued.
        if dispatching.swap(true, Ordering::SeqCst) {
            return action;
        }
        let _guard = DispatchGuard(Arc::clone(&dispatching));

        let previous = state.read().unwrap().clone();
        let next = reducer(previous, &action);
        *state.write().unwrap() = next;

        // Snapshot so listeners may subscribe or unsubscribe freely
        // while the pass runs; additions take effect from the next
        // dispatch.
        let snapshot: Vec<Listener> = listeners.read().unwrap().values().cloned().collect();
        for listener in snapshot {
            listener();
        }

        action
    })
}

// Clears the in-progress flag on every exit path, a panicking reducer
// or listener included.
struct DispatchGuard(Arc<AtomicBool>);

impl Drop for DispatchGuard {
    fn drop(&mut self) {
        self.0.store(false, Ordering::SeqCst);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    #[derive(Clone, Debug, PartialEq)]
    enum CounterAction {
        Increment,
        Decrement,
    }

    fn counter_reducer() -> Reducer<i32, CounterAction> {
        Box::new(|state, action| match action {
            CounterAction::Increment => state + 1,
            CounterAction::Decrement => state - 1,
        })
    }

    #[test]
    fn initial_state_is_visible_before_any_dispatch() {
        let store = Store::new(counter_reducer(), 7);
        assert_eq!(store.get_state(), 7);
    }

    #[test]
    fn dispatch_commits_and_returns_the_action() {
        let store = Store::new(counter_reducer(), 0);

        let returned = store.dispatch(CounterAction::Increment);

        assert_eq!(returned, CounterAction::Increment);
        assert_eq!(store.get_state(), 1);
    }

    #[test]
    fn with_state_reads_without_cloning() {
        let store = Store::new(counter_reducer(), 5);
        let doubled = store.with_state(|state| state * 2);
        assert_eq!(doubled, 10);
    }

    #[test]
    fn listeners_run_in_subscription_order() {
        let store = Store::new(counter_reducer(), 0);
        let order = Arc::new(Mutex::new(Vec::new()));

        let first = Arc::clone(&order);
        let _first = store.subscribe(move || first.lock().unwrap().push("first"));
        let second = Arc::clone(&order);
        let _second = store.subscribe(move || second.lock().unwrap().push("second"));

        store.dispatch(CounterAction::Increment);

        assert_eq!(*order.lock().unwrap(), vec!["first", "second"]);
    }

    #[test]
    fn unsubscribed_listeners_are_not_notified() {
        let store = Store::new(counter_reducer(), 0);
        let order = Arc::new(Mutex::new(Vec::new()));

        let first = Arc::clone(&order);
        let subscription = store.subscribe(move || first.lock().unwrap().push("first"));
        let second = Arc::clone(&order);
        let _second = store.subscribe(move || second.lock().unwrap().push("second"));

        store.dispatch(CounterAction::Increment);
        store.unsubscribe(&subscription);
        store.dispatch(CounterAction::Increment);

        assert_eq!(
            *order.lock().unwrap(),
            vec!["first", "second", "second"]
        );
    }

    #[test]
    fn each_token_removes_only_its_own_registration() {
        let store = Store::new(counter_reducer(), 0);
        let calls = Arc::new(Mutex::new(0));

        let listener = {
            let calls = Arc::clone(&calls);
            move || *calls.lock().unwrap() += 1
        };
        let once = store.subscribe(listener.clone());
        let _twice = store.subscribe(listener);

        once.unsubscribe();
        store.dispatch(CounterAction::Increment);

        assert_eq!(*calls.lock().unwrap(), 1);
    }

    #[test]
    fn dispatch_inside_a_listener_is_rejected() {
        let store = Store::new(counter_reducer(), 0);

        let inner = store.clone();
        let _sub = store.subscribe(move || {
            let returned = inner.dispatch(CounterAction::Decrement);
            assert_eq!(returned, CounterAction::Decrement);
        });

        store.dispatch(CounterAction::Increment);

        // The outer commit stands; the inner attempt changed nothing.
        assert_eq!(store.get_state(), 1);
    }

    #[test]
    fn listeners_added_during_notification_wait_for_the_next_dispatch() {
        let store = Store::new(counter_reducer(), 0);
        let calls = Arc::new(Mutex::new(0));
        let added = Arc::new(AtomicBool::new(false));

        let registrar = store.clone();
        let late_calls = Arc::clone(&calls);
        let added_flag = Arc::clone(&added);
        let _sub = store.subscribe(move || {
            if !added_flag.swap(true, Ordering::SeqCst) {
                let calls = Arc::clone(&late_calls);
                // Token dropped on purpose; the registration stays.
                registrar.subscribe(move || *calls.lock().unwrap() += 1);
            }
        });

        store.dispatch(CounterAction::Increment);
        assert_eq!(*calls.lock().unwrap(), 0);

        store.dispatch(CounterAction::Increment);
        assert_eq!(*calls.lock().unwrap(), 1);
    }

    #[test]
    fn a_panicking_reducer_does_not_wedge_the_store() {
        let reducer: Reducer<i32, CounterAction> = Box::new(|state, action| match action {
            CounterAction::Decrement => panic!("reducer failure"),
            CounterAction::Increment => state + 1,
        });
        let store = Store::new(reducer, 0);

        let panicking = store.clone();
        let result = std::panic::catch_unwind(std::panic::AssertUnwindSafe(move || {
            panicking.dispatch(CounterAction::Decrement);
        }));
        assert!(result.is_err());

        // The in-progress flag was released on the panic path.
        store.dispatch(CounterAction::Increment);
        assert_eq!(store.get_state(), 1);
    }

    #[test]
    fn create_store_without_enhancer_uses_the_base_constructor() {
        let store = create_store(counter_reducer(), 3, None);
        store.dispatch(CounterAction::Increment);
        assert_eq!(store.get_state(), 4);
    }

    #[test]
    fn create_store_delegates_construction_to_the_enhancer() {
        let seen = Arc::new(Mutex::new(false));
        let witness = Arc::clone(&seen);

        let enhancer: Enhancer<i32, CounterAction> = Box::new(move |create| {
            Box::new(move |reducer, initial_state| {
                *witness.lock().unwrap() = true;
                create(reducer, initial_state)
            })
        });

        let store = create_store(counter_reducer(), 0, Some(enhancer));

        assert!(*seen.lock().unwrap());
        store.dispatch(CounterAction::Increment);
        assert_eq!(store.get_state(), 1);
    }
}
