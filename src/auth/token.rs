//! Token values extracted from backend responses.

pub mod secret;

pub use secret::*;
