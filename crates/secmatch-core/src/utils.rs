//! Utility functions for rule implementations.

pub mod nosec;

#[doc(inline)]
pub use nosec::{check_nosec, check_nosec_with, NosecCheck};
