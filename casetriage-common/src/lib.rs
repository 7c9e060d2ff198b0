//! # Case Triage Common Library
//!
//! Shared code for the case triage crates including:
//! - Common error type
//! - Configuration loading
//! - Day-first calendar date helpers

pub mod config;
pub mod error;
pub mod time;

pub use error::{Error, Result};
