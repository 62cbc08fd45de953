//! Semantic diagram model types.
//!
//! This module contains the logical representation of a box diagram after the
//! YAML document has been read. These types are independent of layout: they
//! describe what is in the diagram, not where it goes.
//!
//! # Pipeline Position
//!
//! ```text
//! YAML document
//!     ↓ parse
//! Semantic Model (these types)
//!     ↓ validate
//! Semantic Model (checked)
//!     ↓ transform
//! Layout Graph
//!     ↓ layout engine
//! Positioned Graph
//!     ↓ export
//! SVG / PNG
//! ```
//!
//! # Organization
//!
//! - [`diagram`] - Document-level structures: [`Diagram`], [`StyleDefaults`], [`Legend`], [`Metadata`], [`BoxIndex`]
//! - [`element`] - Diagram elements: [`BoxNode`], [`Port`], [`Edge`], [`EdgeEndpoint`]

pub mod diagram;
pub mod element;

pub use diagram::*;
pub use element::*;
