//! lr-core: Shared types for the Luckyreel reward engine
//!
//! This crate provides the foundational types used across all Luckyreel crates:
//! the closed symbol catalogue, the four-symbol outcome, weight tables and the
//! common error type.

mod error;
mod outcome;
mod symbols;
mod weights;

pub use error::*;
pub use outcome::*;
pub use symbols::*;
pub use weights::*;
