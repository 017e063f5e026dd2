//! Reactive primitives.
//!
//! - [`Signal`]: ordered callback list fired with a payload.
//! - [`Connection`]: handle for disconnecting a single callback.

pub mod signal;

pub use signal::{Connection, Signal};
