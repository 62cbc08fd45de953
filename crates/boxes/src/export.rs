//! Export functionality for Boxes diagrams.
//!
//! This is the final stage of the pipeline: a positioned graph and the
//! semantic model it was built from are drawn as an SVG document, which can
//! in turn be rasterised to PNG.
//!
//! # Pipeline Position
//!
//! ```text
//! YAML
//!     ↓ parse
//! Semantic Model
//!     ↓ transform
//! LayoutGraph
//!     ↓ layout
//! PositionedGraph
//!     ↓ export (this module)
//! SVG / PNG
//! ```
//!
//! # Available Backends
//!
//! - [`svg`] - SVG output via [`svg::SvgBuilder`] and [`svg::Svg`]
//! - `raster` - PNG output from SVG text (requires the `png` feature)
//!
//! # Error Handling
//!
//! Export operations return [`Error`], covering rendering failures and I/O
//! errors. [`Error`] converts into [`BoxesError::Export`] at the crate
//! boundary.
//!
//! [`BoxesError::Export`]: crate::BoxesError::Export

/// PNG rasterisation backend.
#[cfg(feature = "png")]
pub mod raster;
/// SVG export backend.
pub mod svg;

/// Errors that can occur during diagram export.
///
/// This type is converted into [`BoxesError::Export`] at the crate
/// boundary via the [`From`] implementation in [`crate::error`].
///
/// [`BoxesError::Export`]: crate::BoxesError::Export
#[derive(Debug)]
pub enum Error {
    /// A rendering or conversion failure described by `message`.
    Render(String),
    /// An I/O error encountered while writing output.
    Io(std::io::Error),
}

impl std::fmt::Display for Error {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Render(msg) => write!(f, "Render error: {msg}"),
            Self::Io(err) => write!(f, "I/O error: {err}"),
        }
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Render(_) => None,
            Self::Io(err) => Some(err),
        }
    }
}

impl From<std::io::Error> for Error {
    fn from(err: std::io::Error) -> Self {
        Self::Io(err)
    }
}

#[cfg(test)]
mod tests {
    use std::error::Error as _;

    use super::*;

    #[test]
    fn test_display() {
        assert_eq!(
            Error::Render("bad pixmap".to_string()).to_string(),
            "Render error: bad pixmap"
        );
        let io = Error::from(std::io::Error::other("disk full"));
        assert_eq!(io.to_string(), "I/O error: disk full");
        assert!(io.source().is_some());
    }
}
