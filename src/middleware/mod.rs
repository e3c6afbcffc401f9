//! Dispatch-wrapping middleware.
//!
//! Middleware adds cross-cutting behavior around every dispatch. A
//! middleware receives a reduced store API and yields a transformer of
//! the dispatch function; `apply_middleware` composes a list of them
//! into a store enhancer.

mod logger;
mod middleware;

pub use logger::logger;
pub use middleware::{apply_middleware, Middleware, MiddlewareApi};
