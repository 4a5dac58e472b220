//! pictura-core: shared types, IDs, errors, and configuration.
//!
//! This crate is the foundational dependency for the other pictura crates,
//! providing type-safe identifiers, the [`Imageable`] owner reference, a
//! unified error type, and application configuration.

pub mod config;
pub mod error;
pub mod ids;
pub mod imageable;

// Re-export the most commonly used items at the crate root.
pub use error::{Error, Result};
pub use ids::*;
pub use imageable::{Imageable, ImageableKind};
