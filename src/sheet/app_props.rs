//! The application properties sheet, `docProps/app.xml`.
//!
//! Extended properties live in the default namespace of the part, so their
//! tags are unprefixed and match by local name.

use super::{AppSheet, Sheet, commit_bindings, parse_part, root_in_namespace};
use crate::constants::namespace;
use crate::error::Result;
use crate::property::{Binding, BooleanProperty, Number, NumericProperty, TextProperty};
use crate::xml::XmlDocument;
use tracing::{debug, warn};

#[derive(Debug, Clone, PartialEq)]
struct AppProperties {
    template: TextProperty,
    total_time: NumericProperty,
    application: TextProperty,
    scale_crop: BooleanProperty,
    manager: TextProperty,
    company: TextProperty,
    app_version: TextProperty,
}

impl AppProperties {
    fn parse(xml: &XmlDocument) -> Result<Self> {
        let (root, ns) = (xml.root(), xml.namespaces());
        Ok(Self {
            template: TextProperty::parse("Template", root, ns)?,
            total_time: NumericProperty::parse("TotalTime", root, ns)?,
            application: TextProperty::parse("Application", root, ns)?,
            scale_crop: BooleanProperty::parse("ScaleCrop", root, ns)?,
            manager: TextProperty::parse("Manager", root, ns)?,
            company: TextProperty::parse("Company", root, ns)?,
            app_version: TextProperty::parse("AppVersion", root, ns)?,
        })
    }

    fn bindings(&self) -> [&dyn Binding; 7] {
        [
            &self.template,
            &self.total_time,
            &self.application,
            &self.scale_crop,
            &self.manager,
            &self.company,
            &self.app_version,
        ]
    }
}

/// The application properties sheet.
///
/// `Template` is read-only; every other property has a setter.
#[derive(Debug, Clone, PartialEq)]
pub struct App {
    xml: XmlDocument,
    props: AppProperties,
}

impl App {
    #[inline]
    pub fn xml(&self) -> &XmlDocument {
        &self.xml
    }

    #[inline]
    pub fn xml_mut(&mut self) -> &mut XmlDocument {
        &mut self.xml
    }

    pub fn bindings(&self) -> [&dyn Binding; 7] {
        self.props.bindings()
    }

    /// The template the document was created from, e.g. `Normal.dotm`.
    #[inline]
    pub fn template(&self) -> Option<&str> {
        self.props.template.as_str()
    }

    /// Total editing time in minutes.
    #[inline]
    pub fn total_time(&self) -> Option<i64> {
        self.props.total_time.as_i64()
    }

    pub fn set_total_time(&mut self, minutes: Option<i64>) {
        self.props.total_time.set_value(minutes.map(Number::Integer));
    }

    #[inline]
    pub fn scale_crop(&self) -> Option<bool> {
        self.props.scale_crop.value().copied()
    }

    /// Set `ScaleCrop`. `None` on an existing element writes `false`.
    pub fn set_scale_crop(&mut self, value: Option<bool>) {
        self.props.scale_crop.set_value(value);
    }

    text_accessors! {
        /// The producing application.
        application, set_application;
        manager, set_manager;
        company, set_company;
        /// The producing application's version, e.g. `14.0000`.
        app_version, set_app_version;
    }
}

impl Sheet for App {
    fn from_xml(raw: &[u8]) -> Result<Self> {
        let xml = parse_part(raw)?;
        let props = AppProperties::parse(&xml)?;
        if !root_in_namespace(&xml, namespace::EXTENDED_PROPERTIES) {
            warn!(
                root = xml.root().name(),
                "app part root is outside the extended-properties namespace"
            );
        }
        debug!(root = xml.root().name(), "parsed app properties");
        Ok(Self { xml, props })
    }

    fn commit(&mut self) -> Result<()> {
        commit_bindings(&mut self.xml, &self.props.bindings())
    }

    fn serialize(&self) -> Result<Vec<u8>> {
        Ok(self.xml.to_bytes()?)
    }
}

impl AppSheet for App {
    #[inline]
    fn app(&self) -> &App {
        self
    }

    #[inline]
    fn app_mut(&mut self) -> &mut App {
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;

    const APP: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
    <Properties xmlns="http://schemas.openxmlformats.org/officeDocument/2006/extended-properties"
        xmlns:vt="http://schemas.openxmlformats.org/officeDocument/2006/docPropsVTypes">
        <Template>Normal.dotm</Template>
        <TotalTime>93</TotalTime>
        <Pages>1</Pages>
        <Words>7</Words>
        <Application>Microsoft Macintosh Word</Application>
        <DocSecurity>0</DocSecurity>
        <ScaleCrop>false</ScaleCrop>
        <HeadingPairs>
            <vt:vector size="2" baseType="variant">
                <vt:variant>
                    <vt:lpstr>Title</vt:lpstr>
                </vt:variant>
                <vt:variant>
                    <vt:i4>1</vt:i4>
                </vt:variant>
            </vt:vector>
        </HeadingPairs>
        <Manager>Josh Knuck</Manager>
        <Company>Silverlayer</Company>
        <LinksUpToDate>false</LinksUpToDate>
        <HyperlinkBase></HyperlinkBase>
        <AppVersion>14.0000</AppVersion>
    </Properties>"#;

    #[test]
    fn test_read_props() {
        let app = App::from_xml(APP.as_bytes()).unwrap();
        assert_eq!(app.template(), Some("Normal.dotm"));
        assert_eq!(app.total_time(), Some(93));
        assert_eq!(app.application(), Some("Microsoft Macintosh Word"));
        assert_eq!(app.scale_crop(), Some(false));
        assert_eq!(app.manager(), Some("Josh Knuck"));
        assert_eq!(app.company(), Some("Silverlayer"));
        assert_eq!(app.app_version(), Some("14.0000"));
    }

    #[test]
    fn test_change_props() {
        let mut app = App::from_xml(APP.as_bytes()).unwrap();
        app.set_manager(Some("Michael Rudson"));
        app.set_scale_crop(Some(true));
        app.set_total_time(Some(240));
        app.set_application(Some("MS Office"));
        app.set_company(Some("Neo brand"));
        app.set_app_version(Some("12.000"));
        app.commit().unwrap();

        let saved = App::from_xml(&app.serialize().unwrap()).unwrap();
        assert_eq!(saved.manager(), Some("Michael Rudson"));
        assert_eq!(saved.scale_crop(), Some(true));
        assert_eq!(saved.total_time(), Some(240));
        assert_eq!(saved.application(), Some("MS Office"));
        assert_eq!(saved.company(), Some("Neo brand"));
        assert_eq!(saved.app_version(), Some("12.000"));
        assert_eq!(saved.template(), Some("Normal.dotm"));
    }

    #[test]
    fn test_other_elements_survive() {
        let mut app = App::from_xml(APP.as_bytes()).unwrap();
        app.set_manager(None);
        app.commit().unwrap();

        let out = String::from_utf8(app.serialize().unwrap()).unwrap();
        assert!(out.contains("<vt:lpstr>Title</vt:lpstr>"));
        assert!(out.contains(r#"<vt:vector size="2" baseType="variant">"#));
        assert!(out.contains("<Words>7</Words>"));
        assert!(out.contains("<Manager/>"));
    }

    #[test]
    fn test_new_element_in_default_namespace() {
        let raw = br#"<Properties xmlns="http://schemas.openxmlformats.org/officeDocument/2006/extended-properties"><Template>Normal</Template></Properties>"#;
        let mut app = App::from_xml(raw).unwrap();
        assert_eq!(app.company(), None);
        assert_eq!(app.scale_crop(), None);

        app.set_company(Some("Silverlayer"));
        app.commit().unwrap();
        let saved = App::from_xml(&app.serialize().unwrap()).unwrap();
        assert_eq!(saved.company(), Some("Silverlayer"));
        // an absent boolean is never created
        assert_eq!(saved.scale_crop(), None);
    }

    #[test]
    fn test_clear_scale_crop_writes_false() {
        let raw = APP.replace("<ScaleCrop>false</ScaleCrop>", "<ScaleCrop>true</ScaleCrop>");
        let mut app = App::from_xml(raw.as_bytes()).unwrap();
        assert_eq!(app.scale_crop(), Some(true));

        app.set_scale_crop(None);
        app.commit().unwrap();
        let saved = App::from_xml(&app.serialize().unwrap()).unwrap();
        assert_eq!(saved.scale_crop(), Some(false));
    }

    #[test]
    fn test_root_namespace() {
        let app = App::from_xml(APP.as_bytes()).unwrap();
        assert!(root_in_namespace(app.xml(), namespace::EXTENDED_PROPERTIES));

        let app = App::from_xml(b"<Properties><Company>Silverlayer</Company></Properties>").unwrap();
        assert!(!root_in_namespace(app.xml(), namespace::EXTENDED_PROPERTIES));
        assert_eq!(app.company(), Some("Silverlayer"));
    }

    #[test]
    fn test_corrupt_total_time() {
        let raw = APP.replace("<TotalTime>93</TotalTime>", "<TotalTime>ninety</TotalTime>");
        assert!(matches!(
            App::from_xml(raw.as_bytes()),
            Err(Error::NotNumeric { tag, .. }) if tag == "TotalTime"
        ));
    }
}
