//! # Relay
//!
//! A predictable, reducer-driven state container for Rust.
//!
//! Relay keeps application state in a single place and changes it in a
//! single way:
//!
//! ## Stores and reducers
//!
//! A [`Store`] owns one state value. Every change goes through
//! [`dispatch`](Store::dispatch): a pure [`Reducer`] computes the next
//! state from the previous state and an action, the store commits it,
//! and subscribed listeners are notified. [`combine_reducers`] builds a
//! reducer for map-shaped state out of independent per-slice reducers.
//!
//! ## Middleware and enhancers
//!
//! Cross-cutting behavior wraps the dispatch pipeline through
//! [`Middleware`], installed by the [`apply_middleware`] enhancer. An
//! [`Enhancer`] wraps the store constructor itself, so it can hand back
//! an augmented store.
//!
//! ```
//! use relay::{create_store, Reducer};
//!
//! #[derive(Debug)]
//! enum Action {
//!     Increment,
//!     Decrement,
//! }
//!
//! let reducer: Reducer<i32, Action> = Box::new(|state, action| match action {
//!     Action::Increment => state + 1,
//!     Action::Decrement => state - 1,
//! });
//!
//! let store = create_store(reducer, 0, None);
//! store.dispatch(Action::Increment);
//! assert_eq!(store.get_state(), 1);
//! ```

pub mod action;
pub mod compose;
pub mod middleware;
pub mod reducer;
pub mod store;

// Re-export main types for convenience
pub use action::bind_action_creator;
pub use compose::{compose, Composable};
pub use middleware::{apply_middleware, logger, Middleware, MiddlewareApi};
pub use reducer::{combine_reducers, Reducer, SliceMap, SliceReducer};
pub use store::{create_store, Dispatch, Enhancer, StateReader, Store, StoreCreator, Subscription};
