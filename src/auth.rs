//! Auth-domain models carried by flow outcomes.

pub mod token;

pub use token::*;
