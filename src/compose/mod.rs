//! Right-to-left function composition.
//!
//! The building block of the middleware chain: an ordered sequence of
//! self-maps folded into one.

mod compose;

pub use compose::{compose, Composable};
