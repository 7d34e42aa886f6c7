//! Numeric properties.

use super::{NumericProperty, PropertyValue};
use crate::error::{Error, Result};
use crate::xml::QName;
use std::fmt;

/// A number read from element text: an integer when the text parses as
/// one, a float otherwise.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Number {
    Integer(i64),
    Float(f64),
}

impl Number {
    /// The value as an integer, if it has no fractional part.
    pub fn as_i64(&self) -> Option<i64> {
        match *self {
            Number::Integer(i) => Some(i),
            Number::Float(f) if f.is_finite() && f.fract() == 0.0 && f.abs() < i64::MAX as f64 => {
                Some(f as i64)
            },
            Number::Float(_) => None,
        }
    }

    /// The value as a float.
    #[inline]
    pub fn as_f64(&self) -> f64 {
        match *self {
            Number::Integer(i) => i as f64,
            Number::Float(f) => f,
        }
    }

    #[inline]
    pub fn is_integer(&self) -> bool {
        matches!(self, Number::Integer(_))
    }
}

impl From<i64> for Number {
    fn from(value: i64) -> Self {
        Number::Integer(value)
    }
}

impl From<i32> for Number {
    fn from(value: i32) -> Self {
        Number::Integer(value.into())
    }
}

impl From<u32> for Number {
    fn from(value: u32) -> Self {
        Number::Integer(value.into())
    }
}

impl From<f64> for Number {
    fn from(value: f64) -> Self {
        Number::Float(value)
    }
}

impl fmt::Display for Number {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match *self {
            Number::Integer(i) => f.write_str(itoa::Buffer::new().format(i)),
            // ryu keeps a trailing ".0", so floats read back as floats
            Number::Float(x) => f.write_str(ryu::Buffer::new().format(x)),
        }
    }
}

impl PropertyValue for Number {
    fn decode(tag: &QName, text: Option<&str>) -> Result<Option<Self>> {
        let Some(text) = text.filter(|t| !t.is_empty()) else {
            return Ok(None);
        };

        let trimmed = text.trim();
        if let Ok(i) = trimmed.parse::<i64>() {
            return Ok(Some(Number::Integer(i)));
        }
        trimmed
            .parse::<f64>()
            .map(|f| Some(Number::Float(f)))
            .map_err(|_| Error::NotNumeric {
                tag: tag.to_string(),
                text: text.to_string(),
            })
    }

    fn encode(&self) -> String {
        self.to_string()
    }
}

impl NumericProperty {
    /// The value as an integer, see [`Number::as_i64`].
    #[inline]
    pub fn as_i64(&self) -> Option<i64> {
        self.value().and_then(Number::as_i64)
    }
}
