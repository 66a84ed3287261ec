//! Common utilities and types shared across the pwvault crates.
//!
//! This module provides the error taxonomy used by every crate in the
//! workspace and the [`Password`] type that owns secret password bytes.

pub mod error;
pub mod types;

pub use error::{Error, Result};
pub use types::Password;
