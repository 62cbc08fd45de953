//! Boxes Core Types and Definitions
//!
//! This crate provides the foundational types shared by every stage of the
//! Boxes pipeline. It includes:
//!
//! - **Geometry**: Points, sizes, bounds and insets ([`geometry`] module)
//! - **Colors**: CSS color parsing and the named colour table ([`color`] module)
//! - **Identifiers**: Sanitised node and port identifiers ([`identifier`] module)
//! - **Semantic**: The logical diagram model produced by the parser ([`semantic`] module)
//! - **Draw**: Z-ordered collection of SVG output ([`draw`] module)

pub mod color;
pub mod draw;
pub mod geometry;
pub mod identifier;
pub mod semantic;
