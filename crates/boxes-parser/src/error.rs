//! Error type for reading Boxes documents.

use thiserror::Error;

/// Errors produced while turning YAML text into a [`Diagram`](boxes_core::semantic::Diagram).
///
/// Schema problems that the document can still be read past (bad flow value,
/// unknown port direction, dangling edge references) are not errors here;
/// they are reported by [`validate`](crate::validate).
#[derive(Debug, Error)]
pub enum ParseError {
    /// The text is not valid YAML, or a value has the wrong shape.
    #[error("Invalid YAML: {message}")]
    Yaml {
        message: String,
        /// Byte offset of the problem in the source, when known.
        offset: Option<usize>,
    },

    /// The document is valid YAML but its top level is not a mapping.
    #[error("Invalid YAML: expected an object at the top level")]
    NotAMapping,
}

impl ParseError {
    /// Byte offset in the source the error points at, if any.
    pub fn offset(&self) -> Option<usize> {
        match self {
            Self::Yaml { offset, .. } => *offset,
            Self::NotAMapping => None,
        }
    }
}

impl From<serde_yaml::Error> for ParseError {
    fn from(err: serde_yaml::Error) -> Self {
        let offset = err.location().map(|location| location.index());
        Self::Yaml {
            message: err.to_string(),
            offset,
        }
    }
}
