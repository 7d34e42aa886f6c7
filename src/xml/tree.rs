//! Element tree, reader and writer.

use super::XmlError;
use super::escape::{escape_text, predefined_entity, unescape_entities};
use super::namespace::{Namespaces, QName, split_name};
use quick_xml::Reader;
use quick_xml::Writer;
use quick_xml::events::{BytesCData, BytesDecl, BytesEnd, BytesPI, BytesStart, BytesText, Event};
use std::io::Write;

const UTF8_BOM: [u8; 3] = [0xEF, 0xBB, 0xBF];

/// A child of an [`Element`].
#[derive(Debug, Clone, PartialEq)]
pub enum Node {
    Element(Element),
    /// Unescaped character data
    Text(String),
    CData(String),
    /// Raw comment content
    Comment(String),
    /// Raw processing instruction content
    ProcessingInstruction(String),
}

/// An XML element.
///
/// The start tag is stored as written (`name attr="..." xmlns:p="..."`), so
/// attributes never need to be re-escaped.
#[derive(Debug, Clone, PartialEq)]
pub struct Element {
    start: String,
    name_len: usize,
    /// `xmlns` / `xmlns:p` declarations made on this element
    declarations: Vec<(String, String)>,
    children: Vec<Node>,
}

impl Element {
    /// Create an element without attributes or children.
    pub fn new(name: &QName) -> Self {
        Self {
            start: name.as_str().to_string(),
            name_len: name.as_str().len(),
            declarations: Vec::new(),
            children: Vec::new(),
        }
    }

    fn from_start(e: &BytesStart<'_>) -> Result<Self, XmlError> {
        let start = std::str::from_utf8(e)?.to_string();
        let name_len = e.name().as_ref().len();

        let mut declarations = Vec::new();
        for attr in e.attributes() {
            let attr = attr.map_err(|e| XmlError::Attribute(e.to_string()))?;
            let key = std::str::from_utf8(attr.key.as_ref())?;
            let prefix = if key == "xmlns" {
                ""
            } else if let Some(prefix) = key.strip_prefix("xmlns:") {
                prefix
            } else {
                continue;
            };
            let uri = unescape_entities(std::str::from_utf8(&attr.value)?);
            declarations.push((prefix.to_string(), uri));
        }

        Ok(Self {
            start,
            name_len,
            declarations,
            children: Vec::new(),
        })
    }

    /// The element name as written, e.g. `dc:title`.
    #[inline]
    pub fn name(&self) -> &str {
        &self.start[..self.name_len]
    }

    /// The local part of the name.
    #[inline]
    pub fn local_name(&self) -> &str {
        split_name(self.name()).1
    }

    /// The name's prefix, if any.
    #[inline]
    pub fn prefix(&self) -> Option<&str> {
        split_name(self.name()).0
    }

    /// The raw start tag content, e.g. `dcterms:created xsi:type="dcterms:W3CDTF"`.
    #[inline]
    pub fn start_tag(&self) -> &str {
        &self.start
    }

    /// Namespace declarations made on this element, as `(prefix, uri)`.
    /// The default namespace has an empty prefix.
    #[inline]
    pub fn declarations(&self) -> &[(String, String)] {
        &self.declarations
    }

    #[inline]
    pub fn children(&self) -> &[Node] {
        &self.children
    }

    /// Iterate over the child elements.
    pub fn elements(&self) -> impl Iterator<Item = &Element> {
        self.children.iter().filter_map(|node| match node {
            Node::Element(e) => Some(e),
            _ => None,
        })
    }

    /// The text before the first non-text child, or `None` if there is none.
    pub fn text(&self) -> Option<String> {
        let mut text: Option<String> = None;
        for node in &self.children {
            match node {
                Node::Text(s) | Node::CData(s) => text.get_or_insert_with(String::new).push_str(s),
                _ => break,
            }
        }
        text
    }

    /// Replace the leading text. `None` (or an empty string) leaves the
    /// element without leading text.
    pub fn set_text(&mut self, text: Option<&str>) {
        let leading = self
            .children
            .iter()
            .take_while(|node| matches!(node, Node::Text(_) | Node::CData(_)))
            .count();
        self.children.drain(..leading);

        if let Some(text) = text
            && !text.is_empty()
        {
            self.children.insert(0, Node::Text(text.to_string()));
        }
    }

    /// Append a child element.
    pub fn append(&mut self, child: Element) {
        self.children.push(Node::Element(child));
    }

    /// Find the first child element named `name`.
    ///
    /// A prefixed name matches children in the namespace its prefix resolves
    /// to in `namespaces`; nothing matches if the prefix is undeclared. An
    /// unprefixed name matches children by local name.
    pub fn find(&self, name: &QName, namespaces: &Namespaces) -> Option<&Element> {
        self.position_of(name, namespaces)
            .and_then(|idx| match &self.children[idx] {
                Node::Element(e) => Some(e),
                _ => None,
            })
    }

    /// Mutable version of [`Element::find`].
    pub fn find_mut(&mut self, name: &QName, namespaces: &Namespaces) -> Option<&mut Element> {
        self.position_of(name, namespaces)
            .and_then(move |idx| match &mut self.children[idx] {
                Node::Element(e) => Some(e),
                _ => None,
            })
    }

    fn position_of(&self, name: &QName, namespaces: &Namespaces) -> Option<usize> {
        let target_uri = match name.prefix() {
            Some(prefix) => Some(namespaces.resolve(prefix)?),
            None => None,
        };

        self.children.iter().position(|node| {
            let Node::Element(child) = node else {
                return false;
            };
            if child.local_name() != name.local_name() {
                return false;
            }
            match target_uri {
                Some(uri) => child.namespace_uri(namespaces) == Some(uri),
                None => true,
            }
        })
    }

    /// Resolve this element's namespace, looking at its own declarations
    /// before the enclosing table.
    pub fn namespace_uri<'a>(&'a self, namespaces: &'a Namespaces) -> Option<&'a str> {
        let prefix = self.prefix().unwrap_or("");
        self.declarations
            .iter()
            .find(|(p, _)| p == prefix)
            .map(|(_, uri)| uri.as_str())
            .or_else(|| namespaces.resolve(prefix))
    }

    fn push_text(&mut self, text: &str) {
        if text.is_empty() {
            return;
        }
        if let Some(Node::Text(last)) = self.children.last_mut() {
            last.push_str(text);
        } else {
            self.children.push(Node::Text(text.to_string()));
        }
    }

    fn strip_blank_text(&mut self) {
        if self.children.iter().any(|node| matches!(node, Node::Element(_))) {
            self.children
                .retain(|node| !matches!(node, Node::Text(s) if s.trim().is_empty()));
        }
    }

    fn write_to<W: Write>(&self, writer: &mut Writer<W>) -> Result<(), XmlError> {
        let start = BytesStart::from_content(self.start.as_str(), self.name_len);
        if self.children.is_empty() {
            return write_event(writer, Event::Empty(start));
        }

        write_event(writer, Event::Start(start))?;
        for node in &self.children {
            match node {
                Node::Element(child) => child.write_to(writer)?,
                Node::Text(text) => {
                    write_event(writer, Event::Text(BytesText::from_escaped(escape_text(text))))?
                },
                Node::CData(text) => write_event(writer, Event::CData(BytesCData::new(text.as_str())))?,
                Node::Comment(raw) => {
                    write_event(writer, Event::Comment(BytesText::from_escaped(raw.as_str())))?
                },
                Node::ProcessingInstruction(raw) => {
                    write_event(writer, Event::PI(BytesPI::new(raw.as_str())))?
                },
            }
        }
        write_event(writer, Event::End(BytesEnd::new(self.name())))
    }
}

/// Markup outside the root element.
#[derive(Debug, Clone, PartialEq)]
enum Misc {
    /// Raw declaration content, e.g. `xml version="1.0" encoding="UTF-8"`
    Declaration(String),
    DocType(String),
    Comment(String),
    ProcessingInstruction(String),
}

/// A parsed XML document: the root element plus the namespace table
/// declared on it.
#[derive(Debug, Clone, PartialEq)]
pub struct XmlDocument {
    prolog: Vec<Misc>,
    root: Element,
    epilog: Vec<Misc>,
    namespaces: Namespaces,
}

impl XmlDocument {
    /// Parse a UTF-8 encoded document.
    ///
    /// # Errors
    ///
    /// Fails on malformed markup, references to undeclared entities, text
    /// outside the root element, or a missing or repeated root element.
    pub fn parse(raw: &[u8]) -> Result<Self, XmlError> {
        let raw = raw.strip_prefix(&UTF8_BOM).unwrap_or(raw);
        let mut reader = Reader::from_reader(raw);
        reader.config_mut().trim_text(false);

        let mut prolog = Vec::new();
        let mut epilog = Vec::new();
        let mut stack: Vec<Element> = Vec::new();
        let mut root: Option<Element> = None;
        let mut buf = Vec::new();

        loop {
            let event = reader.read_event_into(&mut buf).map_err(|e| XmlError::Parse {
                position: reader.buffer_position() as u64,
                message: e.to_string(),
            })?;

            match event {
                Event::Start(e) => stack.push(Element::from_start(&e)?),
                Event::Empty(e) => {
                    let element = Element::from_start(&e)?;
                    attach(&mut stack, &mut root, element)?;
                },
                Event::End(_) => {
                    let mut element = stack
                        .pop()
                        .ok_or_else(|| XmlError::Malformed("unexpected end tag".to_string()))?;
                    element.strip_blank_text();
                    attach(&mut stack, &mut root, element)?;
                },
                Event::Text(e) => {
                    let text = std::str::from_utf8(&e)?;
                    match stack.last_mut() {
                        Some(parent) => parent.push_text(text),
                        None if text.trim().is_empty() => {},
                        None => {
                            return Err(XmlError::Malformed(
                                "text outside the root element".to_string(),
                            ));
                        },
                    }
                },
                Event::GeneralRef(e) => {
                    let name = std::str::from_utf8(&e)?;
                    let ch = resolve_reference(name)?;
                    let parent = stack.last_mut().ok_or_else(|| {
                        XmlError::Malformed("reference outside the root element".to_string())
                    })?;
                    parent.push_text(ch.encode_utf8(&mut [0u8; 4]));
                },
                Event::CData(e) => {
                    let text = std::str::from_utf8(&e)?.to_string();
                    let parent = stack.last_mut().ok_or_else(|| {
                        XmlError::Malformed("CDATA outside the root element".to_string())
                    })?;
                    parent.children.push(Node::CData(text));
                },
                Event::Comment(e) => {
                    let raw = std::str::from_utf8(&e)?.to_string();
                    match stack.last_mut() {
                        Some(parent) => parent.children.push(Node::Comment(raw)),
                        None => outside(&root, &mut prolog, &mut epilog).push(Misc::Comment(raw)),
                    }
                },
                Event::PI(e) => {
                    let raw = std::str::from_utf8(&e)?.to_string();
                    match stack.last_mut() {
                        Some(parent) => parent.children.push(Node::ProcessingInstruction(raw)),
                        None => outside(&root, &mut prolog, &mut epilog)
                            .push(Misc::ProcessingInstruction(raw)),
                    }
                },
                Event::Decl(e) => prolog.push(Misc::Declaration(std::str::from_utf8(&e)?.to_string())),
                Event::DocType(e) => prolog.push(Misc::DocType(std::str::from_utf8(&e)?.to_string())),
                Event::Eof => break,
            }
            buf.clear();
        }

        if !stack.is_empty() {
            return Err(XmlError::Malformed("unclosed element".to_string()));
        }
        let root = root.ok_or_else(|| XmlError::Malformed("no root element".to_string()))?;

        let mut namespaces = Namespaces::new();
        for (prefix, uri) in root.declarations() {
            namespaces.declare(prefix.as_str(), uri.as_str());
        }

        Ok(Self {
            prolog,
            root,
            epilog,
            namespaces,
        })
    }

    #[inline]
    pub fn root(&self) -> &Element {
        &self.root
    }

    #[inline]
    pub fn root_mut(&mut self) -> &mut Element {
        &mut self.root
    }

    /// Namespace bindings declared on the root element.
    #[inline]
    pub fn namespaces(&self) -> &Namespaces {
        &self.namespaces
    }

    /// Borrow the root mutably together with its namespace table.
    #[inline]
    pub fn root_with_namespaces(&mut self) -> (&mut Element, &Namespaces) {
        (&mut self.root, &self.namespaces)
    }

    /// Serialize the document. The XML declaration, if the source had one,
    /// is kept and followed by a CRLF, as Office writes it.
    pub fn to_bytes(&self) -> Result<Vec<u8>, XmlError> {
        let mut writer = Writer::new(Vec::with_capacity(1024));

        for misc in &self.prolog {
            write_misc(&mut writer, misc)?;
            if matches!(misc, Misc::Declaration(_)) {
                write_event(&mut writer, Event::Text(BytesText::from_escaped("\r\n")))?;
            }
        }
        self.root.write_to(&mut writer)?;
        for misc in &self.epilog {
            write_misc(&mut writer, misc)?;
        }

        Ok(writer.into_inner())
    }
}

fn attach(
    stack: &mut [Element],
    root: &mut Option<Element>,
    element: Element,
) -> Result<(), XmlError> {
    match stack.last_mut() {
        Some(parent) => parent.append(element),
        None if root.is_none() => *root = Some(element),
        None => return Err(XmlError::Malformed("more than one root element".to_string())),
    }
    Ok(())
}

fn outside<'a>(
    root: &Option<Element>,
    prolog: &'a mut Vec<Misc>,
    epilog: &'a mut Vec<Misc>,
) -> &'a mut Vec<Misc> {
    if root.is_some() { epilog } else { prolog }
}

/// Resolve `&name;` where `name` is a predefined entity or `#N` / `#xH`.
fn resolve_reference(name: &str) -> Result<char, XmlError> {
    if let Some(code) = name.strip_prefix('#') {
        let value = match code.strip_prefix('x') {
            Some(hex) => u32::from_str_radix(hex, 16),
            None => code.parse::<u32>(),
        };
        return value
            .ok()
            .and_then(char::from_u32)
            .ok_or_else(|| XmlError::Malformed(format!("invalid character reference &{};", name)));
    }
    predefined_entity(name).ok_or_else(|| XmlError::UndeclaredEntity(name.to_string()))
}

fn write_misc<W: Write>(writer: &mut Writer<W>, misc: &Misc) -> Result<(), XmlError> {
    match misc {
        Misc::Declaration(raw) => write_event(
            writer,
            Event::Decl(BytesDecl::from_start(BytesStart::from_content(raw.as_str(), 3))),
        ),
        Misc::DocType(raw) => write_event(writer, Event::DocType(BytesText::from_escaped(raw.as_str()))),
        Misc::Comment(raw) => write_event(writer, Event::Comment(BytesText::from_escaped(raw.as_str()))),
        Misc::ProcessingInstruction(raw) => write_event(writer, Event::PI(BytesPI::new(raw.as_str()))),
    }
}

#[inline]
fn write_event<W: Write>(writer: &mut Writer<W>, event: Event<'_>) -> Result<(), XmlError> {
    writer
        .write_event(event)
        .map_err(|e| XmlError::Write(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::constants::namespace;

    const CORE: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<cp:coreProperties xmlns:cp="http://schemas.openxmlformats.org/package/2006/metadata/core-properties"
    xmlns:dc="http://purl.org/dc/elements/1.1/" xmlns:dcterms="http://purl.org/dc/terms/"
    xmlns:xsi="http://www.w3.org/2001/XMLSchema-instance">
    <dc:title>R&amp;D &#x2013; plan</dc:title>
    <dc:subject></dc:subject>
    <!-- kept -->
    <dcterms:created xsi:type="dcterms:W3CDTF">2013-12-15T10:40:00Z</dcterms:created>
</cp:coreProperties>"#;

    fn qname(tag: &str) -> QName {
        QName::parse(tag).unwrap()
    }

    #[test]
    fn test_parse_namespaces() {
        let doc = XmlDocument::parse(CORE.as_bytes()).unwrap();
        assert_eq!(doc.root().name(), "cp:coreProperties");
        assert_eq!(doc.namespaces().resolve("dc"), Some("http://purl.org/dc/elements/1.1/"));
        assert_eq!(doc.namespaces().resolve("cp"), Some(namespace::CORE_PROPERTIES));
        assert_eq!(
            doc.root().namespace_uri(doc.namespaces()),
            Some(namespace::CORE_PROPERTIES)
        );
    }

    #[test]
    fn test_blank_text_is_stripped() {
        let doc = XmlDocument::parse(CORE.as_bytes()).unwrap();
        assert!(
            doc.root()
                .children()
                .iter()
                .all(|node| !matches!(node, Node::Text(_)))
        );
        assert_eq!(doc.root().elements().count(), 3);
    }

    #[test]
    fn test_text_and_references() {
        let doc = XmlDocument::parse(CORE.as_bytes()).unwrap();
        let title = doc.root().find(&qname("dc:title"), doc.namespaces()).unwrap();
        assert_eq!(title.text().as_deref(), Some("R&D \u{2013} plan"));

        let subject = doc.root().find(&qname("dc:subject"), doc.namespaces()).unwrap();
        assert_eq!(subject.text(), None);
    }

    #[test]
    fn test_find_by_namespace_uri() {
        // Same namespace under another prefix declared on the child itself
        let xml = r#"<cp:coreProperties xmlns:cp="urn:cp" xmlns:dc="http://purl.org/dc/elements/1.1/"><x:title xmlns:x="http://purl.org/dc/elements/1.1/">T</x:title><cp:title>C</cp:title></cp:coreProperties>"#;
        let doc = XmlDocument::parse(xml.as_bytes()).unwrap();
        let found = doc.root().find(&qname("dc:title"), doc.namespaces()).unwrap();
        assert_eq!(found.text().as_deref(), Some("T"));

        assert!(doc.root().find(&qname("zz:title"), doc.namespaces()).is_none());
    }

    #[test]
    fn test_find_unqualified_by_local_name() {
        let xml = r#"<Properties xmlns="urn:app"><TotalTime>93</TotalTime></Properties>"#;
        let doc = XmlDocument::parse(xml.as_bytes()).unwrap();
        let found = doc.root().find(&qname("TotalTime"), doc.namespaces()).unwrap();
        assert_eq!(found.text().as_deref(), Some("93"));
    }

    #[test]
    fn test_leaf_whitespace_is_kept() {
        let doc = XmlDocument::parse(b"<a><b>  </b></a>").unwrap();
        let b = doc.root().find(&qname("b"), doc.namespaces()).unwrap();
        assert_eq!(b.text().as_deref(), Some("  "));
    }

    #[test]
    fn test_round_trip_keeps_markup() {
        let doc = XmlDocument::parse(CORE.as_bytes()).unwrap();
        let out = String::from_utf8(doc.to_bytes().unwrap()).unwrap();

        assert!(out.starts_with(
            "<?xml version=\"1.0\" encoding=\"UTF-8\" standalone=\"yes\"?>\r\n<cp:coreProperties"
        ));
        assert!(out.contains("<dc:title>R&amp;D \u{2013} plan</dc:title>"));
        assert!(out.contains("<dc:subject/>"));
        assert!(out.contains("<!-- kept -->"));
        assert!(out.contains(r#"<dcterms:created xsi:type="dcterms:W3CDTF">2013-12-15T10:40:00Z</dcterms:created>"#));

        // A second pass is stable
        let again = XmlDocument::parse(out.as_bytes()).unwrap();
        assert_eq!(again.to_bytes().unwrap(), out.into_bytes());
    }

    #[test]
    fn test_set_text_and_append() {
        let mut doc = XmlDocument::parse(b"<r xmlns:p=\"urn:p\"><p:a>old<!--c--></p:a></r>").unwrap();
        let (root, ns) = doc.root_with_namespaces();
        root.find_mut(&qname("p:a"), ns).unwrap().set_text(Some("new"));

        let mut added = Element::new(&qname("p:b"));
        added.set_text(Some("1 < 2"));
        root.append(added);

        let out = String::from_utf8(doc.to_bytes().unwrap()).unwrap();
        assert_eq!(out, "<r xmlns:p=\"urn:p\"><p:a>new<!--c--></p:a><p:b>1 &lt; 2</p:b></r>");
    }

    #[test]
    fn test_rejects_malformed() {
        assert!(XmlDocument::parse(b"").is_err());
        assert!(XmlDocument::parse(b"<a><b></a>").is_err());
        assert!(XmlDocument::parse(b"<a/><b/>").is_err());
        assert!(matches!(
            XmlDocument::parse(b"<a>&ext;</a>"),
            Err(XmlError::UndeclaredEntity(name)) if name == "ext"
        ));
    }

    #[test]
    fn test_bom_is_skipped() {
        let mut raw = UTF8_BOM.to_vec();
        raw.extend_from_slice(b"<a>x</a>");
        let doc = XmlDocument::parse(&raw).unwrap();
        assert_eq!(doc.root().text().as_deref(), Some("x"));
    }
}
