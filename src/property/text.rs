//! String-valued properties.

use super::{PropertyValue, TextProperty};
use crate::error::Result;
use crate::xml::QName;
use std::fmt::Display;

impl PropertyValue for String {
    fn decode(_tag: &QName, text: Option<&str>) -> Result<Option<Self>> {
        Ok(text.map(str::to_string))
    }

    fn encode(&self) -> String {
        self.clone()
    }

    fn normalize(self) -> Self {
        let trimmed = self.trim();
        if trimmed.len() == self.len() {
            self
        } else {
            trimmed.to_string()
        }
    }
}

impl TextProperty {
    /// The value as a string slice.
    #[inline]
    pub fn as_str(&self) -> Option<&str> {
        self.value().map(String::as_str)
    }

    /// Store the string form of any displayable value.
    ///
    /// ```
    /// use docmeta::property::TextProperty;
    ///
    /// let mut revision = TextProperty::new("cp:revision")?;
    /// revision.set_display(Some(133));
    /// assert_eq!(revision.as_str(), Some("133"));
    /// # Ok::<(), docmeta::Error>(())
    /// ```
    pub fn set_display<T: Display>(&mut self, value: Option<T>) {
        self.set_value(value.map(|v| v.to_string()));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::xml::XmlDocument;

    #[test]
    fn test_value_is_trimmed() {
        let mut title = TextProperty::new("dc:title").unwrap();
        title.set_value(Some("  My wonderful world \n".to_string()));
        assert_eq!(title.as_str(), Some("My wonderful world"));
    }

    #[test]
    fn test_display_coercion() {
        let mut title = TextProperty::new("dc:title").unwrap();
        title.set_display(Some(1.5));
        assert_eq!(title.as_str(), Some("1.5"));

        title.set_display(None::<i32>);
        assert_eq!(title.as_str(), None);
    }

    #[test]
    fn test_decode_keeps_absence() {
        let tag = QName::parse("dc:title").unwrap();
        assert_eq!(String::decode(&tag, None).unwrap(), None);
        assert_eq!(String::decode(&tag, Some("x")).unwrap(), Some("x".to_string()));
        assert_eq!(String::decode(&tag, Some("  ")).unwrap(), Some("  ".to_string()));
    }

    #[test]
    fn test_blank_element_reads_empty() {
        let doc = XmlDocument::parse(b"<P><Company>   </Company><Manager></Manager></P>").unwrap();
        let company = TextProperty::parse("Company", doc.root(), doc.namespaces()).unwrap();
        assert_eq!(company.as_str(), Some(""));
        let manager = TextProperty::parse("Manager", doc.root(), doc.namespaces()).unwrap();
        assert_eq!(manager.as_str(), None);
    }
}
