//! Color handling for Boxes diagrams
//!
//! This module provides the [`Color`] type, a validated CSS color string, and
//! the [`ColourTable`] that maps the friendly colour names used in diagram
//! documents (`"dark blue"`, `"snowflake blue"`, ...) to concrete colors.
//!
//! The table is an explicit value handed to the renderer rather than a global,
//! so callers can extend or override it from configuration.

use std::{fmt, str::FromStr};

use color::DynamicColor;
use indexmap::IndexMap;
use log::debug;

/// A CSS color that is known to parse.
///
/// The original spelling is kept for output, so `#555` stays `#555` in the
/// generated SVG instead of being normalised to another notation.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Color {
    text: String,
}

impl Color {
    /// Create a new `Color` from a CSS color string such as `"#ff0000"`,
    /// `"rgb(255, 0, 0)"` or `"red"`.
    ///
    /// # Examples
    ///
    /// ```
    /// use boxes_core::color::Color;
    ///
    /// assert!(Color::new("#ff0000").is_ok());
    /// assert!(Color::new("navy").is_ok());
    /// assert!(Color::new("not-a-color").is_err());
    /// ```
    pub fn new(color_str: &str) -> Result<Self, String> {
        let trimmed = color_str.trim();
        match DynamicColor::from_str(trimmed) {
            Ok(_) => Ok(Self {
                text: trimmed.to_string(),
            }),
            Err(err) => Err(format!("invalid color `{color_str}`: {err}")),
        }
    }

    /// Returns the color as written.
    pub fn as_str(&self) -> &str {
        &self.text
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.text)
    }
}

impl From<&Color> for svg::node::Value {
    fn from(color: &Color) -> Self {
        Self::from(color.to_string())
    }
}

/// Built-in colour names understood in `edges[].colour`, `style.color` and
/// legend entries.
const BUILTIN_COLOURS: &[(&str, &str)] = &[
    ("brown", "#8B4513"),
    ("dark blue", "#1A5276"),
    ("blue", "#2E86C1"),
    ("green", "#1E8449"),
    ("purple", "#7D3C98"),
    ("grey", "#999"),
    ("grey dashed", "#999"),
    ("orange", "#FF9900"),
    ("cyan", "#00BFFF"),
    ("red", "#E74C3C"),
    ("gold", "#D4AC0D"),
    ("light blue", "#5DADE2"),
    ("snowflake blue", "#29B5E8"),
    ("dbt red", "#FF694B"),
];

/// Name → color lookup table.
///
/// Lookups are case-insensitive. Names that are not in the table are parsed
/// as plain CSS colors.
///
/// # Examples
///
/// ```
/// use boxes_core::color::ColourTable;
///
/// let table = ColourTable::default();
/// assert_eq!(table.resolve("Dark Blue").unwrap().as_str(), "#1A5276");
/// assert_eq!(table.resolve("#123456").unwrap().as_str(), "#123456");
/// assert!(table.resolve("nonsense colour").is_none());
/// ```
#[derive(Debug, Clone)]
pub struct ColourTable {
    entries: IndexMap<String, Color>,
}

impl ColourTable {
    /// Creates an empty table; every lookup falls through to CSS parsing.
    pub fn empty() -> Self {
        Self {
            entries: IndexMap::new(),
        }
    }

    /// Adds or replaces an entry.
    ///
    /// # Errors
    ///
    /// Returns an error when `value` is not a valid CSS color.
    pub fn insert(&mut self, name: &str, value: &str) -> Result<(), String> {
        let color = Color::new(value)?;
        self.entries.insert(name.trim().to_lowercase(), color);
        Ok(())
    }

    /// Resolves a colour name (or a raw CSS color) to a [`Color`].
    ///
    /// Returns `None` when the name is neither in the table nor a valid CSS color.
    pub fn resolve(&self, name: &str) -> Option<Color> {
        let key = name.trim().to_lowercase();
        if let Some(color) = self.entries.get(&key) {
            return Some(color.clone());
        }
        match Color::new(name) {
            Ok(color) => Some(color),
            Err(err) => {
                debug!(name, err; "Colour name not resolvable");
                None
            }
        }
    }

    /// Number of named entries in the table.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns `true` when the table has no named entries.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl Default for ColourTable {
    fn default() -> Self {
        let entries = BUILTIN_COLOURS
            .iter()
            .map(|(name, hex)| {
                let color = Color {
                    text: (*hex).to_string(),
                };
                ((*name).to_string(), color)
            })
            .collect();
        Self { entries }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builtin_colours_are_valid_css() {
        for (name, hex) in BUILTIN_COLOURS {
            assert!(Color::new(hex).is_ok(), "{name} maps to invalid {hex}");
        }
    }

    #[test]
    fn test_resolve_is_case_insensitive() {
        let table = ColourTable::default();
        assert_eq!(table.resolve("BLUE").unwrap().as_str(), "#2E86C1");
        assert_eq!(table.resolve("  grey dashed ").unwrap().as_str(), "#999");
    }

    #[test]
    fn test_resolve_passes_css_through() {
        let table = ColourTable::empty();
        assert_eq!(table.resolve("rebeccapurple").unwrap().as_str(), "rebeccapurple");
        assert_eq!(table.resolve("#333").unwrap().as_str(), "#333");
    }

    #[test]
    fn test_insert_overrides_builtin() {
        let mut table = ColourTable::default();
        table.insert("Blue", "#0000ff").unwrap();
        assert_eq!(table.resolve("blue").unwrap().as_str(), "#0000ff");
        assert!(table.insert("broken", "no-such-colour").is_err());
    }
}
