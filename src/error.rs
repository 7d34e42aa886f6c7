//! Error types for document metadata operations.
use crate::xml::XmlError;
use std::path::PathBuf;
use thiserror::Error;

/// Result type for document metadata operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Error types for document metadata operations.
#[derive(Error, Debug)]
pub enum Error {
    /// The source is not a zip archive, or it lacks the core properties part
    #[error("Invalid format: {0}")]
    InvalidFormat(String),

    /// ZIP archive error
    #[error("ZIP error: {0}")]
    Zip(#[from] zip::result::ZipError),

    /// Malformed metadata XML
    #[error("XML error: {0}")]
    Xml(#[from] XmlError),

    /// Tag name is empty or not of the form `name` / `prefix:name`
    #[error("Invalid tag name: {0:?}")]
    InvalidTagName(String),

    /// A qualified tag uses a prefix the part's root element does not declare
    #[error("Namespace prefix '{prefix}' of <{tag}> is not declared")]
    UndeclaredPrefix { tag: String, prefix: String },

    /// Element text is present but is neither an integer nor a float
    #[error("Value of <{tag}> is not numeric: {text:?}")]
    NotNumeric { tag: String, text: String },

    /// Element text does not follow `YYYY-MM-DDThh:mm:ssZ`
    #[error("Value of <{tag}> is not a UTC datetime (YYYY-MM-DDThh:mm:ssZ): {text:?}")]
    InvalidDatetime { tag: String, text: String },

    /// The document has no `docProps/app.xml` part
    #[error("This document doesn't have an app.xml sheet")]
    MissingAppSheet,

    /// `save` would overwrite the archive the document is read from
    #[error("Input and output documents cannot be the same: {}", .0.display())]
    SameTarget(PathBuf),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}
