//! Well-known names used by office document packages.

/// Archive entry names of the metadata parts
pub mod part {
    /// Core (descriptive) properties part, required
    pub const CORE: &str = "docProps/core.xml";

    /// Extended (application) properties part, optional
    pub const APP: &str = "docProps/app.xml";

    /// Returns `true` for the entries regenerated on save.
    #[inline]
    pub fn is_metadata(name: &str) -> bool {
        name == CORE || name == APP
    }
}

/// XML namespace URIs found in the metadata parts
pub mod namespace {
    /// Core properties namespace (`cp`)
    pub const CORE_PROPERTIES: &str =
        "http://schemas.openxmlformats.org/package/2006/metadata/core-properties";

    /// Extended properties namespace, default namespace of `app.xml`
    pub const EXTENDED_PROPERTIES: &str =
        "http://schemas.openxmlformats.org/officeDocument/2006/extended-properties";

    /// The reserved `xml` prefix, bound without declaration
    pub const XML: &str = "http://www.w3.org/XML/1998/namespace";
}

/// Wire format of datetime properties, always UTC
pub const DATETIME_FORMAT: &str = "%Y-%m-%dT%H:%M:%SZ";
