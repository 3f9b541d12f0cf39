//! Domain types for Token Gate.

mod tier;

pub use tier::*;
