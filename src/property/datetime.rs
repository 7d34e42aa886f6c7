//! UTC timestamp properties in `YYYY-MM-DDThh:mm:ssZ` form.

use super::PropertyValue;
use crate::constants::DATETIME_FORMAT;
use crate::error::{Error, Result};
use crate::xml::QName;
use chrono::{DateTime, NaiveDateTime, ParseResult, SubsecRound, Utc};

/// Parse a timestamp in the strict `YYYY-MM-DDThh:mm:ssZ` form.
///
/// Fractional seconds, offsets other than `Z` and trailing input are
/// rejected.
///
/// ```
/// use docmeta::property::datetime::parse_utc;
///
/// assert!(parse_utc("2013-12-15T10:40:00Z").is_ok());
/// assert!(parse_utc("2013-12-15T10:40:00.5Z").is_err());
/// assert!(parse_utc("11/09/2001T13:01:00Z").is_err());
/// ```
pub fn parse_utc(text: &str) -> ParseResult<DateTime<Utc>> {
    NaiveDateTime::parse_from_str(text, DATETIME_FORMAT).map(|naive| naive.and_utc())
}

/// Format a timestamp in the `YYYY-MM-DDThh:mm:ssZ` form.
pub fn format_utc(value: &DateTime<Utc>) -> String {
    value.format(DATETIME_FORMAT).to_string()
}

impl PropertyValue for DateTime<Utc> {
    fn decode(tag: &QName, text: Option<&str>) -> Result<Option<Self>> {
        let Some(text) = text.filter(|t| !t.is_empty()) else {
            return Ok(None);
        };

        parse_utc(text)
            .map(Some)
            .map_err(|_| Error::InvalidDatetime {
                tag: tag.to_string(),
                text: text.to_string(),
            })
    }

    fn encode(&self) -> String {
        format_utc(self)
    }

    /// The wire format has whole seconds only.
    fn normalize(self) -> Self {
        self.trunc_subsecs(0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::property::DatetimeProperty;
    use chrono::{Datelike, TimeZone, Timelike};

    fn decode(text: &str) -> Result<Option<DateTime<Utc>>> {
        DateTime::<Utc>::decode(&QName::parse("dcterms:created").unwrap(), Some(text))
    }

    #[test]
    fn test_decode_strict_format() {
        let dt = decode("2013-12-15T10:40:00Z").unwrap().unwrap();
        assert_eq!(dt, Utc.with_ymd_and_hms(2013, 12, 15, 10, 40, 0).unwrap());
        assert_eq!(dt.year(), 2013);
    }

    #[test]
    fn test_decode_rejects_other_formats() {
        for text in [
            "2023-09-25T10:05:22",
            "2023-09-25T10:05:22.123Z",
            "2023-09-25T10:05:22+01:00",
            "11/09/2001T13:01:00Z",
            "undefined",
        ] {
            assert!(
                matches!(decode(text), Err(Error::InvalidDatetime { .. })),
                "{text:?} should be rejected"
            );
        }
    }

    #[test]
    fn test_decode_empty() {
        assert_eq!(decode("").unwrap(), None);
    }

    #[test]
    fn test_encode() {
        let dt = Utc.with_ymd_and_hms(1889, 5, 29, 20, 55, 43).unwrap();
        assert_eq!(dt.encode(), "1889-05-29T20:55:43Z");
    }

    #[test]
    fn test_subseconds_are_dropped() {
        let precise = Utc.with_ymd_and_hms(2024, 1, 2, 3, 4, 5).unwrap() + chrono::Duration::milliseconds(678);
        let mut modified = DatetimeProperty::new("dcterms:modified").unwrap();
        modified.set_value(Some(precise));

        let stored = modified.value().unwrap();
        assert_eq!(stored.nanosecond(), 0);
        assert_eq!(stored.second(), 5);
    }
}
