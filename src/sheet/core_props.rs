//! The core properties sheet, `docProps/core.xml`.
//!
//! Core properties follow Dublin Core plus OPC extensions; every element is
//! namespace-qualified (`dc:`, `dcterms:`, `cp:`).
//!
//! `keywords` is kept as a single string. The multi-language keyword
//! structure of the full schema is not modeled.

use super::{CoreSheet, Sheet, commit_bindings, parse_part, root_in_namespace};
use crate::constants::namespace;
use crate::error::Result;
use crate::property::{Binding, DatetimeProperty, Number, NumericProperty, TextProperty};
use crate::xml::XmlDocument;
use chrono::{DateTime, Utc};
use tracing::{debug, warn};

/// Properties of the core sheet, in the order they are read and written.
#[derive(Debug, Clone, PartialEq)]
struct CoreProperties {
    title: TextProperty,
    subject: TextProperty,
    keywords: TextProperty,
    creator: TextProperty,
    description: TextProperty,
    last_modified_by: TextProperty,
    category: TextProperty,
    revision: NumericProperty,
    created: DatetimeProperty,
    modified: DatetimeProperty,
    content_status: TextProperty,
    version: TextProperty,
    identifier: TextProperty,
    last_printed: DatetimeProperty,
}

impl CoreProperties {
    fn parse(xml: &XmlDocument) -> Result<Self> {
        let (root, ns) = (xml.root(), xml.namespaces());
        Ok(Self {
            title: TextProperty::parse("dc:title", root, ns)?,
            subject: TextProperty::parse("dc:subject", root, ns)?,
            keywords: TextProperty::parse("cp:keywords", root, ns)?,
            creator: TextProperty::parse("dc:creator", root, ns)?,
            description: TextProperty::parse("dc:description", root, ns)?,
            last_modified_by: TextProperty::parse("cp:lastModifiedBy", root, ns)?,
            category: TextProperty::parse("cp:category", root, ns)?,
            revision: NumericProperty::parse("cp:revision", root, ns)?,
            created: DatetimeProperty::parse("dcterms:created", root, ns)?,
            modified: DatetimeProperty::parse("dcterms:modified", root, ns)?,
            content_status: TextProperty::parse("cp:contentStatus", root, ns)?,
            version: TextProperty::parse("cp:version", root, ns)?,
            identifier: TextProperty::parse("dc:identifier", root, ns)?,
            last_printed: DatetimeProperty::parse("cp:lastPrinted", root, ns)?,
        })
    }

    fn bindings(&self) -> [&dyn Binding; 14] {
        [
            &self.title,
            &self.subject,
            &self.keywords,
            &self.creator,
            &self.description,
            &self.last_modified_by,
            &self.category,
            &self.revision,
            &self.created,
            &self.modified,
            &self.content_status,
            &self.version,
            &self.identifier,
            &self.last_printed,
        ]
    }
}

/// The core properties sheet.
///
/// # Example
///
/// ```
/// use docmeta::sheet::{Core, Sheet};
///
/// let raw = br#"<cp:coreProperties
///     xmlns:cp="http://schemas.openxmlformats.org/package/2006/metadata/core-properties"
///     xmlns:dc="http://purl.org/dc/elements/1.1/">
///     <dc:creator>Silverlayer Employee</dc:creator>
/// </cp:coreProperties>"#;
///
/// let mut core = Core::from_xml(raw)?;
/// assert_eq!(core.creator(), Some("Silverlayer Employee"));
///
/// core.set_creator(Some("Johnny Test"));
/// core.commit()?;
/// let saved = Core::from_xml(&core.serialize()?)?;
/// assert_eq!(saved.creator(), Some("Johnny Test"));
/// # Ok::<(), docmeta::Error>(())
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct Core {
    xml: XmlDocument,
    props: CoreProperties,
}

impl Core {
    /// The underlying tree.
    #[inline]
    pub fn xml(&self) -> &XmlDocument {
        &self.xml
    }

    /// Mutable access to the underlying tree, for sheets that add properties.
    #[inline]
    pub fn xml_mut(&mut self) -> &mut XmlDocument {
        &mut self.xml
    }

    /// The properties in declared order.
    pub fn bindings(&self) -> [&dyn Binding; 14] {
        self.props.bindings()
    }

    text_accessors! {
        /// The title.
        title, set_title;
        /// The subject.
        subject, set_subject;
        /// Keywords, as one string.
        keywords, set_keywords;
        /// The creator (author).
        creator, set_creator;
        /// The description.
        description, set_description;
        /// Who last modified the document.
        last_modified_by, set_last_modified_by;
        /// The category.
        category, set_category;
        /// The content status, usually `Draft`, `Reviewed` or `Final`.
        content_status, set_content_status;
        /// The version.
        version, set_version;
        /// The identifier. Few documents carry one.
        identifier, set_identifier;
    }

    /// The revision number.
    ///
    /// A revision stored with a fractional part reads as `None`; see
    /// [`Core::revision_number`] for the raw value.
    #[inline]
    pub fn revision(&self) -> Option<i64> {
        self.props.revision.as_i64()
    }

    /// The revision as read from the part.
    #[inline]
    pub fn revision_number(&self) -> Option<Number> {
        self.props.revision.value().copied()
    }

    pub fn set_revision(&mut self, value: Option<i64>) {
        self.props.revision.set_value(value.map(Number::Integer));
    }

    /// When the document was created.
    #[inline]
    pub fn created(&self) -> Option<DateTime<Utc>> {
        self.props.created.value().copied()
    }

    pub fn set_created(&mut self, value: Option<DateTime<Utc>>) {
        self.props.created.set_value(value);
    }

    /// When the document was last modified.
    #[inline]
    pub fn modified(&self) -> Option<DateTime<Utc>> {
        self.props.modified.value().copied()
    }

    pub fn set_modified(&mut self, value: Option<DateTime<Utc>>) {
        self.props.modified.set_value(value);
    }

    /// When the document was last printed.
    #[inline]
    pub fn last_printed(&self) -> Option<DateTime<Utc>> {
        self.props.last_printed.value().copied()
    }

    pub fn set_last_printed(&mut self, value: Option<DateTime<Utc>>) {
        self.props.last_printed.set_value(value);
    }
}

impl Sheet for Core {
    fn from_xml(raw: &[u8]) -> Result<Self> {
        let xml = parse_part(raw)?;
        let props = CoreProperties::parse(&xml)?;
        if !root_in_namespace(&xml, namespace::CORE_PROPERTIES) {
            warn!(
                root = xml.root().name(),
                "core part root is outside the core-properties namespace"
            );
        }
        debug!(root = xml.root().name(), "parsed core properties");
        Ok(Self { xml, props })
    }

    fn commit(&mut self) -> Result<()> {
        commit_bindings(&mut self.xml, &self.props.bindings())
    }

    fn serialize(&self) -> Result<Vec<u8>> {
        Ok(self.xml.to_bytes()?)
    }
}

impl CoreSheet for Core {
    #[inline]
    fn core(&self) -> &Core {
        self
    }

    #[inline]
    fn core_mut(&mut self) -> &mut Core {
        self
    }
}
