//! Docmeta - read and edit the metadata of Office Open XML documents
//!
//! Word, Excel, PowerPoint, Visio and Access template files are zip archives
//! whose descriptive properties live in two XML parts: `docProps/core.xml`
//! (author, timestamps, revision) and, optionally, `docProps/app.xml`
//! (company, manager, editing time). This crate edits those two parts and
//! leaves every other entry of the archive exactly as it was.
//!
//! # Features
//!
//! - **Typed properties**: text, boolean, numeric and UTC datetime values
//!   bound to single XML elements, see [`property`]
//! - **Sheets**: the fixed property sets of the core and app parts, see [`sheet`]
//! - **Lossless save**: untouched entries are copied without recompression
//! - **CLI**: the `docmeta` binary behind the `cli` feature
//!
//! # Example
//!
//! ```no_run
//! use docmeta::Document;
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let mut doc = Document::open("report.docx")?;
//! println!("Created by {:?}", doc.core().creator());
//!
//! doc.core_mut().set_creator(Some("Johnny Test"));
//! doc.core_mut().set_last_modified_by(Some("Johnny Test"));
//! if let Ok(app) = doc.app_mut() {
//!     app.set_total_time(Some(127));
//! }
//! doc.save("report_copy.docx")?;
//! # Ok(())
//! # }
//! ```

pub mod constants;
pub mod document;
pub mod error;
pub mod property;
pub mod sheet;
pub mod xml;

pub use document::{Document, SaveOptions, Source};
pub use error::{Error, Result};
pub use property::{
    BooleanProperty, DatetimeProperty, Number, NumericProperty, Property, TextProperty,
};
pub use sheet::{App, AppSheet, Core, CoreSheet, Sheet};
