//! Identifiers for boxes, ports and edges.
//!
//! This module provides the [`Id`] type. Box identifiers are derived from the
//! display name of the box by replacing every character that is not an ASCII
//! letter or digit with `_`; port identifiers are the owning box identifier and
//! the port id joined with `_`.

use std::fmt;

/// A sanitised identifier usable in layout graphs and SVG ids.
///
/// # Examples
///
/// ```
/// use boxes_core::identifier::Id;
///
/// let box_id = Id::from_name("Payment Service (v2)");
/// assert_eq!(box_id, "Payment_Service__v2_");
///
/// let port_id = box_id.port("in");
/// assert_eq!(port_id, "Payment_Service__v2__in");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Id(String);

impl Id {
    /// Creates an `Id` from a box display name.
    ///
    /// # Arguments
    ///
    /// * `name` - The box name as written in the document
    pub fn from_name(name: &str) -> Self {
        Self(sanitise(name))
    }

    /// Wraps an already sanitised identifier without modification.
    ///
    /// Used for synthetic ids such as `root` and `e0`.
    pub fn from_raw(raw: impl Into<String>) -> Self {
        Self(raw.into())
    }

    /// Returns the globally addressable id of a port on this box.
    ///
    /// The port id itself is used verbatim.
    pub fn port(&self, port_id: &str) -> Self {
        Self(format!("{}_{}", self.0, port_id))
    }

    /// Returns the identifier as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Id {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl PartialEq<&str> for Id {
    fn eq(&self, other: &&str) -> bool {
        self.0 == *other
    }
}

impl PartialEq<str> for Id {
    fn eq(&self, other: &str) -> bool {
        self.0 == other
    }
}

impl AsRef<str> for Id {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl From<Id> for String {
    fn from(id: Id) -> Self {
        id.0
    }
}

/// Replaces every non-ASCII-alphanumeric character with `_`.
///
/// Each `char` is replaced individually, so multi-byte characters turn into
/// a single underscore.
///
/// # Examples
///
/// ```
/// use boxes_core::identifier::sanitise;
///
/// assert_eq!(sanitise("Inner A"), "Inner_A");
/// assert_eq!(sanitise("db.prod-1"), "db_prod_1");
/// ```
pub fn sanitise(name: &str) -> String {
    name.chars()
        .map(|c| if c.is_ascii_alphanumeric() { c } else { '_' })
        .collect()
}
