//! # Longbox Common Library
//!
//! Shared code for the Longbox services including:
//! - Domain model (volumes, issues, release candidates)
//! - Common error types

pub mod error;
pub mod models;

pub use error::{Error, Result};
