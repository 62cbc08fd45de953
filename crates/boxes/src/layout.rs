//! Layout engines.
//!
//! A layout engine turns a [`LayoutGraph`] into a [`PositionedGraph`]: every
//! node receives a position relative to its parent and a size, every port a
//! position relative to its node, and every edge a routed polyline expressed
//! in the frame of its container.
//!
//! # Pipeline Position
//!
//! ```text
//! Semantic Model (Diagram)
//!     ↓ transform
//! LayoutGraph
//!     ↓ layout (this module)
//! PositionedGraph
//!     ↓ export
//! SVG / PNG
//! ```
//!
//! # Engines
//!
//! - [`SugiyamaEngine`] - layered placement backed by `rust-sugiyama`

mod routing;
mod sugiyama;

pub use sugiyama::SugiyamaEngine;

use crate::{
    error::BoxesError,
    graph::{LayoutGraph, PositionedGraph},
};

/// A pluggable graph layout algorithm.
///
/// Implementations must be synchronous and must not retain the graph.
pub trait LayoutEngine {
    /// Positions every node, port and edge of `graph`.
    ///
    /// # Errors
    ///
    /// Returns [`BoxesError::Layout`] when the graph cannot be laid out.
    fn layout(&self, graph: &LayoutGraph) -> Result<PositionedGraph, BoxesError>;
}
