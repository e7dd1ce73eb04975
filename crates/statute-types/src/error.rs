//! Error types for the statute viewer.

use std::io;

/// Errors produced by the viewer crates.
///
/// Viewer operations degrade a single feature instead of failing the page,
/// so most of these only surface from I/O-bound entry points.
#[derive(Debug, thiserror::Error)]
pub enum ViewerError {
    #[error("missing anchor: {0}")]
    MissingAnchor(String),

    #[error("clipboard error: {0}")]
    Clipboard(String),

    #[error("preference error: {0}")]
    Prefs(String),

    #[error("config error: {0}")]
    Config(String),

    #[error("command error: {0}")]
    Command(String),

    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    #[error("TOML parse error: {0}")]
    TomlParse(#[from] toml::de::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Convenience alias.
pub type Result<T> = std::result::Result<T, ViewerError>;
