//! Error adapter for converting BoxesError to miette diagnostics.
//!
//! This module provides the bridge between the library's standard error types
//! and miette's rich diagnostic formatting used in the CLI. YAML errors that
//! carry a location are shown with a source snippet; everything else is a
//! plain coded message.

use std::fmt;

use miette::{Diagnostic as MietteDiagnostic, LabeledSpan, SourceSpan};

use boxes::BoxesError;
use boxes_parser::ParseError;

/// Adapter for a parse error together with the document it came from.
pub struct ParseErrorAdapter<'a> {
    err: &'a ParseError,
    src: &'a str,
}

impl<'a> ParseErrorAdapter<'a> {
    pub fn new(err: &'a ParseError, src: &'a str) -> Self {
        Self { err, src }
    }

    /// A one-character span at the error offset, clamped to the source.
    fn span(&self) -> Option<SourceSpan> {
        let offset = self.err.offset()?.min(self.src.len());
        let length = usize::from(offset < self.src.len());
        Some(SourceSpan::new(offset.into(), length))
    }
}

impl fmt::Debug for ParseErrorAdapter<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ParseErrorAdapter")
            .field("err", &self.err)
            .finish()
    }
}

impl fmt::Display for ParseErrorAdapter<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(self.err, f)
    }
}

impl std::error::Error for ParseErrorAdapter<'_> {}

impl MietteDiagnostic for ParseErrorAdapter<'_> {
    fn code<'a>(&'a self) -> Option<Box<dyn fmt::Display + 'a>> {
        Some(Box::new("boxes::parse"))
    }

    fn help<'a>(&'a self) -> Option<Box<dyn fmt::Display + 'a>> {
        match self.err {
            ParseError::NotAMapping => Some(Box::new(
                "a Boxes document starts with top-level keys such as `diagram:` and `boxes:`",
            )),
            ParseError::Yaml { .. } => None,
        }
    }

    fn source_code(&self) -> Option<&dyn miette::SourceCode> {
        self.span()?;
        Some(&self.src as &dyn miette::SourceCode)
    }

    fn labels(&self) -> Option<Box<dyn Iterator<Item = LabeledSpan> + '_>> {
        let span = self.span()?;
        Some(Box::new(std::iter::once(
            LabeledSpan::new_primary_with_span(Some("here".to_string()), span),
        )))
    }
}

/// Adapter for non-parse [`BoxesError`] variants.
pub struct ErrorAdapter<'a>(pub &'a BoxesError);

impl fmt::Debug for ErrorAdapter<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(&self.0, f)
    }
}

impl fmt::Display for ErrorAdapter<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.0, f)
    }
}

impl std::error::Error for ErrorAdapter<'_> {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        self.0.source()
    }
}

impl MietteDiagnostic for ErrorAdapter<'_> {
    fn code<'a>(&'a self) -> Option<Box<dyn fmt::Display + 'a>> {
        let code = match &self.0 {
            BoxesError::Io(_) => "boxes::io",
            BoxesError::Parse { .. } => "boxes::parse",
            BoxesError::Validation(_) => "boxes::validation",
            BoxesError::Config(_) => "boxes::config",
            BoxesError::Layout(_) => "boxes::layout",
            BoxesError::Export(_) => "boxes::export",
        };
        Some(Box::new(code))
    }

    fn help<'a>(&'a self) -> Option<Box<dyn fmt::Display + 'a>> {
        match &self.0 {
            BoxesError::Validation(errors) => Some(Box::new(errors.join("\n"))),
            _ => None,
        }
    }
}

/// A reportable error that can be rendered by miette.
#[derive(Debug)]
pub enum Reportable<'a> {
    /// A YAML error with source location information.
    Parse(ParseErrorAdapter<'a>),
    /// A simple error without source location.
    Error(ErrorAdapter<'a>),
}

impl fmt::Display for Reportable<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Reportable::Parse(p) => fmt::Display::fmt(p, f),
            Reportable::Error(e) => fmt::Display::fmt(e, f),
        }
    }
}

impl std::error::Error for Reportable<'_> {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Reportable::Parse(_) => None,
            Reportable::Error(e) => e.source(),
        }
    }
}

impl MietteDiagnostic for Reportable<'_> {
    fn code<'a>(&'a self) -> Option<Box<dyn fmt::Display + 'a>> {
        match self {
            Reportable::Parse(p) => p.code(),
            Reportable::Error(e) => e.code(),
        }
    }

    fn help<'a>(&'a self) -> Option<Box<dyn fmt::Display + 'a>> {
        match self {
            Reportable::Parse(p) => p.help(),
            Reportable::Error(e) => e.help(),
        }
    }

    fn source_code(&self) -> Option<&dyn miette::SourceCode> {
        match self {
            Reportable::Parse(p) => p.source_code(),
            Reportable::Error(_) => None,
        }
    }

    fn labels(&self) -> Option<Box<dyn Iterator<Item = LabeledSpan> + '_>> {
        match self {
            Reportable::Parse(p) => p.labels(),
            Reportable::Error(_) => None,
        }
    }
}

/// Convert a [`BoxesError`] into a reportable error.
pub fn to_reportable(err: &BoxesError) -> Reportable<'_> {
    match err {
        BoxesError::Parse { err: parse_err, src } => {
            Reportable::Parse(ParseErrorAdapter::new(parse_err, src))
        }
        _ => Reportable::Error(ErrorAdapter(err)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn yaml_error(src: &str) -> BoxesError {
        let err = boxes_parser::parse(src).unwrap_err();
        BoxesError::new_parse_error(err, src)
    }

    #[test]
    fn test_yaml_error_has_span() {
        let err = yaml_error("diagram: x\nboxes: [unclosed\n");
        let reportable = to_reportable(&err);
        assert!(matches!(reportable, Reportable::Parse(_)));
        assert!(reportable.to_string().starts_with("Invalid YAML"));

        let labels: Vec<_> = reportable.labels().unwrap().collect();
        assert_eq!(labels.len(), 1);
        assert!(labels[0].primary());
        assert!(reportable.source_code().is_some());
    }

    #[test]
    fn test_not_a_mapping_has_help_without_span() {
        let err = yaml_error("- just\n- a list\n");
        let reportable = to_reportable(&err);
        assert!(reportable.help().is_some());
        assert!(reportable.labels().is_none());
        assert!(reportable.source_code().is_none());
    }

    #[test]
    fn test_non_parse_error() {
        let err = BoxesError::Layout("no room".to_string());
        let reportable = to_reportable(&err);
        match &reportable {
            Reportable::Error(e) => assert_eq!(e.to_string(), "Layout error: no room"),
            Reportable::Parse(_) => panic!("Expected Error"),
        }
        assert_eq!(reportable.code().unwrap().to_string(), "boxes::layout");
    }
}
