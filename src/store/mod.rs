//! The state container.
//!
//! A store owns one state value, updated exclusively through `dispatch`
//! and observed through an ordered set of listeners. Construction goes
//! through `create_store`, which hands control over to an enhancer when
//! one is supplied.

mod store;

pub use store::{create_store, Dispatch, Enhancer, StateReader, Store, StoreCreator, Subscription};
