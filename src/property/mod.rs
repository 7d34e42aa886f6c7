//! Typed properties bound to single XML elements.
//!
//! A [`Property`] names one child element of a metadata part's root
//! (`dc:creator`, `TotalTime`, ...) and holds its decoded value. Four value
//! types are supported, each with its own text coercion rules:
//!
//! | Alias | Value type | Decoding |
//! |---|---|---|
//! | [`TextProperty`] | `String` | raw text, trimmed |
//! | [`BooleanProperty`] | `bool` | numeric or word rules, see [`boolean::to_bool`] |
//! | [`NumericProperty`] | [`Number`] | integer, else float, else error |
//! | [`DatetimeProperty`] | `DateTime<Utc>` | strict `YYYY-MM-DDThh:mm:ssZ` |
//!
//! A property whose element is missing reads as `None`. Writing a `None`
//! property never creates an element.
//!
//! # Example
//!
//! ```
//! use docmeta::property::{NumericProperty, Number};
//! use docmeta::xml::XmlDocument;
//!
//! let mut doc = XmlDocument::parse(b"<Properties><TotalTime>93</TotalTime></Properties>")?;
//! let mut total = NumericProperty::parse("TotalTime", doc.root(), doc.namespaces())?;
//! assert_eq!(total.value(), Some(&Number::Integer(93)));
//!
//! total.set_value(Some(Number::Integer(127)));
//! let (root, namespaces) = doc.root_with_namespaces();
//! total.write_to(root, namespaces)?;
//! assert_eq!(doc.to_bytes()?, b"<Properties><TotalTime>127</TotalTime></Properties>");
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

pub mod boolean;
pub mod datetime;
pub mod numeric;
pub mod text;

pub use numeric::Number;

use crate::error::{Error, Result};
use crate::xml::{Element, Namespaces, QName};
use chrono::{DateTime, Utc};
use std::fmt;

/// A value type that can be stored in an XML element's text.
pub trait PropertyValue: Clone + fmt::Debug + PartialEq + Sized {
    /// Decode the text of an existing element. `text` is `None` when the
    /// element has no text.
    fn decode(tag: &QName, text: Option<&str>) -> Result<Option<Self>>;

    /// Encode a value as element text.
    fn encode(&self) -> String;

    /// Bring a value into the form it is stored in.
    fn normalize(self) -> Self {
        self
    }

    /// Text written into an existing element when the value is `None`.
    /// `None` leaves the element without text.
    fn encode_null() -> Option<String> {
        None
    }
}

/// Property holding a string.
pub type TextProperty = Property<String>;
/// Property holding a boolean.
pub type BooleanProperty = Property<bool>;
/// Property holding an integer or a float.
pub type NumericProperty = Property<Number>;
/// Property holding a UTC timestamp.
pub type DatetimeProperty = Property<DateTime<Utc>>;

/// A named, typed value bound to one child element.
#[derive(Debug, Clone, PartialEq)]
pub struct Property<V> {
    tag: QName,
    value: Option<V>,
}

impl<V: PropertyValue> Property<V> {
    /// Create an unbound property with no value, for later insertion.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidTagName`] if `tag` is not a valid element name.
    pub fn new(tag: &str) -> Result<Self> {
        Ok(Self {
            tag: QName::parse(tag)?,
            value: None,
        })
    }

    /// Read the property from the child of `element` named `tag`.
    ///
    /// A missing child yields a property without value.
    ///
    /// # Arguments
    ///
    /// * `tag` - Element name, prefixed names are resolved through `namespaces`
    /// * `element` - The container, usually the part's root
    /// * `namespaces` - Prefix bindings of the tree `element` belongs to
    ///
    /// # Errors
    ///
    /// Fails if `tag` is invalid or the element text cannot be decoded as `V`.
    pub fn parse(tag: &str, element: &Element, namespaces: &Namespaces) -> Result<Self> {
        let tag = QName::parse(tag)?;
        let value = match element.find(&tag, namespaces) {
            Some(node) => V::decode(&tag, node.text().as_deref())?.map(V::normalize),
            None => None,
        };
        Ok(Self { tag, value })
    }

    /// The element name this property is bound to.
    #[inline]
    pub fn tag(&self) -> &QName {
        &self.tag
    }

    /// The current value.
    #[inline]
    pub fn value(&self) -> Option<&V> {
        self.value.as_ref()
    }

    /// Replace the value. `None` marks the property as absent.
    pub fn set_value(&mut self, value: Option<V>) {
        self.value = value.map(V::normalize);
    }

    /// Write the value into the child of `element` named after this property.
    ///
    /// An existing child has its text replaced. A missing child is appended
    /// only when there is a value to write.
    ///
    /// # Errors
    ///
    /// Returns [`Error::UndeclaredPrefix`] when a child must be created but
    /// its prefix is not bound in `namespaces`.
    pub fn write_to(&self, element: &mut Element, namespaces: &Namespaces) -> Result<()> {
        if let Some(node) = element.find_mut(&self.tag, namespaces) {
            let text = match &self.value {
                Some(value) => Some(value.encode()),
                None => V::encode_null(),
            };
            node.set_text(text.as_deref());
            return Ok(());
        }

        let Some(value) = &self.value else {
            return Ok(());
        };
        if let Some(prefix) = self.tag.prefix()
            && namespaces.resolve(prefix).is_none()
        {
            return Err(Error::UndeclaredPrefix {
                tag: self.tag.to_string(),
                prefix: prefix.to_string(),
            });
        }

        let mut node = Element::new(&self.tag);
        node.set_text(Some(&value.encode()));
        element.append(node);
        Ok(())
    }
}

/// Type-erased view of a property, used to commit a sheet's properties in
/// their declared order.
pub trait Binding {
    fn tag(&self) -> &QName;

    fn write_to(&self, element: &mut Element, namespaces: &Namespaces) -> Result<()>;
}

impl<V: PropertyValue> Binding for Property<V> {
    fn tag(&self) -> &QName {
        Property::tag(self)
    }

    fn write_to(&self, element: &mut Element, namespaces: &Namespaces) -> Result<()> {
        Property::write_to(self, element, namespaces)
    }
}
