//! Shared error definitions and context helpers used across all glimpse crates.

pub mod error;

pub use error::{Error, FromMessage, GlimpseError, Result};
