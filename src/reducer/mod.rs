//! Pure state transition functions.
//!
//! A reducer maps the previous state and an action to the next state.
//! `combine_reducers` assembles one reducer for map-shaped state out of
//! independent per-slice reducers.

mod combine;

pub use combine::{combine_reducers, SliceMap, SliceReducer};

/// A pure state transition function.
///
/// Receives the previous state by value and the dispatched action by
/// reference, and returns the next state. Reducers must not have side
/// effects; the store only calls them from inside `dispatch`.
pub type Reducer<S, A> = Box<dyn Fn(S, &A) -> S + Send + Sync>;
