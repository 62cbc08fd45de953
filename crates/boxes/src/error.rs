//! Error types for Boxes operations.
//!
//! This module provides the main error type [`BoxesError`] which wraps the
//! error conditions of every pipeline stage.

use std::io;

use thiserror::Error;

use boxes_parser::ParseError;

/// The main error type for Boxes operations.
///
/// The `Parse` variant keeps the source text so callers can point at the
/// offending location; `Validation` carries every schema error found.
#[derive(Debug, Error)]
pub enum BoxesError {
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    #[error("{err}")]
    Parse { err: ParseError, src: String },

    #[error("Validation failed with {} error(s)", .0.len())]
    Validation(Vec<String>),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Layout error: {0}")]
    Layout(String),

    #[error("Export error: {0}")]
    Export(Box<dyn std::error::Error + Send + Sync>),
}

impl From<crate::export::Error> for BoxesError {
    fn from(error: crate::export::Error) -> Self {
        Self::Export(Box::new(error))
    }
}

impl BoxesError {
    /// Create a new `Parse` error with the associated source code.
    pub fn new_parse_error(err: ParseError, src: impl Into<String>) -> Self {
        Self::Parse {
            err,
            src: src.into(),
        }
    }
}
