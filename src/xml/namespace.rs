//! Qualified names and namespace prefix resolution.
//!
//! Metadata parts bind their prefixes on the root element
//! (`xmlns:dc="http://purl.org/dc/elements/1.1/"`). A [`Namespaces`] table is
//! built from one parsed tree's root and passed alongside that tree whenever a
//! prefixed tag has to be looked up or created; prefixes are never resolved
//! against a global table.

use crate::constants::namespace;
use crate::error::{Error, Result};
use std::collections::HashMap;
use std::fmt;

/// An element name, optionally prefixed: `dc:title` or `TotalTime`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct QName {
    raw: String,
    colon: Option<usize>,
}

impl QName {
    /// Parse a tag name.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidTagName`] when the name is empty, contains
    /// whitespace or markup characters, or has an empty prefix or local part.
    pub fn parse(tag: &str) -> Result<Self> {
        let invalid = || Error::InvalidTagName(tag.to_string());

        if tag.is_empty()
            || tag
                .chars()
                .any(|c| c.is_whitespace() || matches!(c, '<' | '>' | '&' | '"' | '\'' | '/' | '='))
        {
            return Err(invalid());
        }

        let colon = tag.find(':');
        if let Some(pos) = colon
            && (pos == 0 || pos == tag.len() - 1 || tag[pos + 1..].contains(':'))
        {
            return Err(invalid());
        }

        Ok(Self {
            raw: tag.to_string(),
            colon,
        })
    }

    /// The name exactly as written, e.g. `dc:title`.
    #[inline]
    pub fn as_str(&self) -> &str {
        &self.raw
    }

    /// The prefix, if the name is qualified.
    #[inline]
    pub fn prefix(&self) -> Option<&str> {
        self.colon.map(|pos| &self.raw[..pos])
    }

    /// The local part of the name.
    #[inline]
    pub fn local_name(&self) -> &str {
        match self.colon {
            Some(pos) => &self.raw[pos + 1..],
            None => &self.raw,
        }
    }
}

impl fmt::Display for QName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.raw)
    }
}

/// Split a raw element name into `(prefix, local)`.
#[inline]
pub(crate) fn split_name(name: &str) -> (Option<&str>, &str) {
    match name.split_once(':') {
        Some((prefix, local)) => (Some(prefix), local),
        None => (None, name),
    }
}

/// Prefix-to-URI bindings declared on a document's root element.
///
/// The default namespace (`xmlns="..."`) is stored under the empty prefix.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Namespaces {
    bindings: HashMap<String, String>,
}

impl Namespaces {
    /// Create an empty table.
    pub fn new() -> Self {
        Self::default()
    }

    /// Bind `prefix` to `uri`, replacing any earlier binding.
    pub fn declare(&mut self, prefix: impl Into<String>, uri: impl Into<String>) {
        self.bindings.insert(prefix.into(), uri.into());
    }

    /// Resolve a prefix. `xml` is always bound.
    pub fn resolve(&self, prefix: &str) -> Option<&str> {
        if prefix == "xml" {
            return Some(namespace::XML);
        }
        self.bindings.get(prefix).map(String::as_str)
    }

    /// The default namespace, if one is declared.
    #[inline]
    pub fn default_namespace(&self) -> Option<&str> {
        self.bindings.get("").map(String::as_str)
    }

    /// Number of declared bindings, including the default namespace.
    #[inline]
    pub fn len(&self) -> usize {
        self.bindings.len()
    }

    /// Check if nothing is declared.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.bindings.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_qualified_name() {
        let name = QName::parse("dc:title").unwrap();
        assert_eq!(name.prefix(), Some("dc"));
        assert_eq!(name.local_name(), "title");
        assert_eq!(name.to_string(), "dc:title");
    }

    #[test]
    fn test_unqualified_name() {
        let name = QName::parse("TotalTime").unwrap();
        assert_eq!(name.prefix(), None);
        assert_eq!(name.local_name(), "TotalTime");
    }

    #[test]
    fn test_invalid_names() {
        for tag in ["", ":title", "dc:", "a:b:c", "dc title", "<dc:title>"] {
            assert!(
                matches!(QName::parse(tag), Err(Error::InvalidTagName(_))),
                "{tag:?} should be rejected"
            );
        }
    }

    #[test]
    fn test_resolve() {
        let mut ns = Namespaces::new();
        ns.declare("dc", "http://purl.org/dc/elements/1.1/");
        ns.declare("", namespace::EXTENDED_PROPERTIES);

        assert_eq!(ns.resolve("dc"), Some("http://purl.org/dc/elements/1.1/"));
        assert_eq!(ns.resolve("xml"), Some(namespace::XML));
        assert_eq!(ns.resolve("cp"), None);
        assert_eq!(ns.default_namespace(), Some(namespace::EXTENDED_PROPERTIES));
        assert_eq!(ns.len(), 2);
    }
}
