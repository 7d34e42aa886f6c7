//! Boolean properties.
//!
//! Element text is read leniently so that the property works on any element,
//! not only on `true`/`false` ones. Values are always written as
//! `true`/`false`.

use super::PropertyValue;
use crate::error::Result;
use crate::xml::QName;

/// Words that read as `false`, compared after trimming and lowercasing.
const FALSE_WORDS: [&str; 6] = ["false", "no", "not", "n", "0", ""];

/// Convert element text to a boolean.
///
/// Numeric text is `true` when its integer part is at least 1. Any other
/// text is `false` if it is one of `false`, `no`, `not`, `n`, `0` or blank
/// (case-insensitive, surrounding whitespace ignored), and `true` otherwise.
///
/// # Examples
///
/// ```
/// use docmeta::property::boolean::to_bool;
///
/// assert!(!to_bool(""));
/// assert!(!to_bool("0.999"));
/// assert!(to_bool("2.5"));
/// assert!(!to_bool(" not"));
/// assert!(to_bool("yes"));
/// ```
pub fn to_bool(text: &str) -> bool {
    if text.is_empty() {
        return false;
    }

    match text.trim().parse::<f64>() {
        Ok(number) if !number.is_nan() => number.trunc() >= 1.0,
        _ => {
            let word = text.trim().to_lowercase();
            !FALSE_WORDS.contains(&word.as_str())
        },
    }
}

impl PropertyValue for bool {
    fn decode(_tag: &QName, text: Option<&str>) -> Result<Option<Self>> {
        Ok(Some(text.is_some_and(to_bool)))
    }

    fn encode(&self) -> String {
        let text = if *self { "true" } else { "false" };
        text.to_string()
    }

    fn encode_null() -> Option<String> {
        Some("false".to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::property::BooleanProperty;
    use crate::xml::XmlDocument;

    #[test]
    fn test_blank_is_false() {
        assert!(!to_bool(""));
        assert!(!to_bool("   "));
    }

    #[test]
    fn test_negative_words_are_false() {
        assert!(!to_bool("no"));
        assert!(!to_bool(" not"));
        assert!(!to_bool("n  "));
        assert!(!to_bool("FALSE"));
    }

    #[test]
    fn test_below_one_is_false() {
        for text in ["0", "0.001", "0.999", "-3", "-inf"] {
            assert!(!to_bool(text), "{text:?}");
        }
    }

    #[test]
    fn test_one_and_above_is_true() {
        for text in ["1", "2.5", "73.3", " 1 ", "inf"] {
            assert!(to_bool(text), "{text:?}");
        }
    }

    #[test]
    fn test_other_words_are_true() {
        assert!(to_bool("true"));
        assert!(to_bool("yes"));
        assert!(to_bool("nan"));
    }

    #[test]
    fn test_scale_crop_round_trip() {
        let mut doc = XmlDocument::parse(b"<Properties><ScaleCrop>false</ScaleCrop></Properties>").unwrap();
        let mut scale = BooleanProperty::parse("ScaleCrop", doc.root(), doc.namespaces()).unwrap();
        assert_eq!(scale.value(), Some(&false));

        scale.set_value(Some(true));
        let (root, ns) = doc.root_with_namespaces();
        scale.write_to(root, ns).unwrap();
        let again = BooleanProperty::parse("ScaleCrop", doc.root(), doc.namespaces()).unwrap();
        assert_eq!(again.value(), Some(&true));
    }

    #[test]
    fn test_null_writes_false() {
        let mut doc = XmlDocument::parse(b"<Properties><ScaleCrop>true</ScaleCrop></Properties>").unwrap();
        let mut scale = BooleanProperty::parse("ScaleCrop", doc.root(), doc.namespaces()).unwrap();
        scale.set_value(None);
        let (root, ns) = doc.root_with_namespaces();
        scale.write_to(root, ns).unwrap();

        assert_eq!(doc.to_bytes().unwrap(), b"<Properties><ScaleCrop>false</ScaleCrop></Properties>");
        let again = BooleanProperty::parse("ScaleCrop", doc.root(), doc.namespaces()).unwrap();
        assert_eq!(again.value(), Some(&false));
    }
}
