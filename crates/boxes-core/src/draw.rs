//! Z-ordered SVG output for diagram rendering.
//!
//! Renderers push SVG nodes into a [`LayeredOutput`], tagging each with a
//! [`RenderLayer`]. The layers are emitted bottom to top when the document is
//! assembled, so containers never paint over the edges that cross them.

mod layer;

pub use layer::{LayeredOutput, RenderLayer, SvgNode};
