//! Foundation types for the statute document viewer.
//!
//! Holds the error type shared by the DOM, viewer and app crates.

pub mod error;

pub use error::{Result, ViewerError};
