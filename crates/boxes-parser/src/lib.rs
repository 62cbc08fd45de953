//! YAML front end for Boxes diagrams.
//!
//! This crate reads a Boxes document into the semantic model defined in
//! [`boxes_core::semantic`] and checks it against the document schema.
//!
//! # Overview
//!
//! - [`parse`] - YAML text → [`Diagram`], applying defaults
//! - [`validate`] - [`Diagram`] → list of schema errors (empty when valid)
//! - [`ParseError`] - failures that stop a document from being read at all
//!
//! # Example
//!
//! ```
//! use boxes_parser::{parse, validate};
//!
//! let source = r#"
//! diagram: Shop.Context
//! flow: LR
//! boxes:
//!   Web:
//!   API:
//!     ports:
//!       http: { dir: in }
//! edges:
//!   - from: Web
//!     to: "API:http"
//!     label: REST
//! "#;
//!
//! let diagram = parse(source)?;
//! assert!(validate(&diagram).is_empty());
//! assert_eq!(diagram.boxes().len(), 2);
//! # Ok::<(), boxes_parser::ParseError>(())
//! ```

mod document;
pub mod error;
mod lower;
pub mod validate;

#[cfg(test)]
mod parser_tests;

use log::{debug, trace};

use boxes_core::semantic::Diagram;

pub use error::ParseError;
pub use validate::validate;

/// Parses a Boxes YAML document into a [`Diagram`].
///
/// Missing optional fields take their defaults. Schema problems that do not
/// prevent reading the document are left for [`validate`].
///
/// # Errors
///
/// Returns [`ParseError::Yaml`] for malformed YAML or a value of the wrong
/// shape, and [`ParseError::NotAMapping`] when the document's top level is
/// not a mapping (including an empty document).
pub fn parse(source: &str) -> Result<Diagram, ParseError> {
    if source.trim().is_empty() {
        return Err(ParseError::NotAMapping);
    }
    let value: serde_yaml::Value = serde_yaml::from_str(source)?;
    if !value.is_mapping() {
        return Err(ParseError::NotAMapping);
    }

    let document: document::RawDocument = serde_yaml::from_str(source)?;
    let diagram = lower::lower_document(document);

    debug!(
        boxes = diagram.iter_boxes().count(),
        edges = diagram.edges().len();
        "Parsed document"
    );
    trace!(diagram:?; "Parsed diagram");

    Ok(diagram)
}
