//! Minimal owned XML tree for metadata parts.
//!
//! Metadata parts are small, so they are parsed once into an owned tree that
//! can be edited in place and written back. The reader is built on
//! `quick-xml`:
//!
//! - External entities are never fetched and DTD-declared entities are not
//!   expanded; only the five predefined entities and character references are
//!   resolved.
//! - Insignificant whitespace (whitespace-only text between child elements) is
//!   dropped. Whitespace-only content of a leaf element is kept.
//! - Start tags keep their original bytes, so attributes and namespace
//!   declarations round-trip unchanged.

pub mod escape;
pub mod namespace;
pub mod tree;

pub use escape::{escape_text, unescape_entities};
pub use namespace::{Namespaces, QName};
pub use tree::{Element, Node, XmlDocument};

use thiserror::Error;

/// Error types for the XML layer.
#[derive(Error, Debug)]
pub enum XmlError {
    /// quick-xml rejected the input
    #[error("XML parsing error at byte {position}: {message}")]
    Parse { position: u64, message: String },

    /// Malformed attribute
    #[error("Attribute error: {0}")]
    Attribute(String),

    /// Invalid UTF-8 in names or content
    #[error("Invalid UTF-8: {0}")]
    Utf8(#[from] std::str::Utf8Error),

    /// Reference to an entity other than the predefined ones
    #[error("Undeclared entity: &{0};")]
    UndeclaredEntity(String),

    /// Structural problem, such as a missing root element
    #[error("Malformed document: {0}")]
    Malformed(String),

    /// Serialization failure
    #[error("XML write error: {0}")]
    Write(String),
}
