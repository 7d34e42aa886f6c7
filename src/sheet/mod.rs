//! Property sheets: the in-memory form of one metadata part.
//!
//! A sheet owns the parsed XML tree of its part and a fixed, ordered set of
//! typed properties read from the tree's root. Edits go to the properties;
//! [`Sheet::commit`] writes them back into the tree, in declared order, and
//! [`Sheet::serialize`] renders the tree.
//!
//! Two sheets are provided, [`Core`] for `docProps/core.xml` and [`App`] for
//! `docProps/app.xml`.
//!
//! # Adding properties
//!
//! Further properties are added by composition: wrap a [`Core`] (or
//! [`App`]), parse the extra properties after it, and commit them after it.
//!
//! ```
//! use docmeta::property::TextProperty;
//! use docmeta::sheet::{commit_bindings, Core, CoreSheet, Sheet};
//! use docmeta::Result;
//!
//! struct LanguageCore {
//!     core: Core,
//!     language: TextProperty,
//! }
//!
//! impl Sheet for LanguageCore {
//!     fn from_xml(raw: &[u8]) -> Result<Self> {
//!         let core = Core::from_xml(raw)?;
//!         let xml = core.xml();
//!         let language = TextProperty::parse("dc:language", xml.root(), xml.namespaces())?;
//!         Ok(Self { core, language })
//!     }
//!
//!     fn commit(&mut self) -> Result<()> {
//!         self.core.commit()?;
//!         commit_bindings(self.core.xml_mut(), &[&self.language])
//!     }
//!
//!     fn serialize(&self) -> Result<Vec<u8>> {
//!         self.core.serialize()
//!     }
//! }
//!
//! impl CoreSheet for LanguageCore {
//!     fn core(&self) -> &Core {
//!         &self.core
//!     }
//!
//!     fn core_mut(&mut self) -> &mut Core {
//!         &mut self.core
//!     }
//! }
//! ```

/// Generates the getter/setter pair of a text property field.
macro_rules! text_accessors {
    ($($(#[$doc:meta])* $field:ident, $setter:ident;)+) => {
        $(
            $(#[$doc])*
            #[inline]
            pub fn $field(&self) -> Option<&str> {
                self.props.$field.as_str()
            }

            #[doc = concat!("Set `", stringify!($field), "`, `None` clears it.")]
            pub fn $setter(&mut self, value: Option<&str>) {
                self.props.$field.set_value(value.map(str::to_string));
            }
        )+
    };
}

pub mod app_props;
pub mod core_props;

pub use app_props::App;
pub use core_props::Core;

use crate::error::Result;
use crate::property::Binding;
use crate::xml::XmlDocument;

/// The in-memory form of a metadata part.
pub trait Sheet: Sized {
    /// Parse the part and read every property from its root.
    fn from_xml(raw: &[u8]) -> Result<Self>;

    /// Write every property into the tree, in declared order.
    fn commit(&mut self) -> Result<()>;

    /// Render the tree. Call [`Sheet::commit`] first to include pending edits.
    fn serialize(&self) -> Result<Vec<u8>>;
}

/// A sheet usable as a document's `docProps/core.xml`.
pub trait CoreSheet: Sheet {
    fn core(&self) -> &Core;

    fn core_mut(&mut self) -> &mut Core;
}

/// A sheet usable as a document's `docProps/app.xml`.
pub trait AppSheet: Sheet {
    fn app(&self) -> &App;

    fn app_mut(&mut self) -> &mut App;
}

/// Write `bindings` into the root of `xml`, in order.
pub fn commit_bindings(xml: &mut XmlDocument, bindings: &[&dyn Binding]) -> Result<()> {
    let (root, namespaces) = xml.root_with_namespaces();
    for binding in bindings {
        binding.write_to(root, namespaces)?;
    }
    Ok(())
}

/// Parse a part's bytes.
fn parse_part(raw: &[u8]) -> Result<XmlDocument> {
    Ok(XmlDocument::parse(raw)?)
}

/// Whether the part's root element lives in `uri`.
fn root_in_namespace(xml: &XmlDocument, uri: &str) -> bool {
    xml.root().namespace_uri(xml.namespaces()) == Some(uri)
}
