//! # Value Model
//!
//! The set of values that can travel through a mailbox, and the type tags
//! that identify them on the wire.

use crate::errors::CodecError;
use serde::{Deserialize, Serialize};
use std::fmt;

/// A value that can be sent through the mailbox.
///
/// `Undefined` is the "missing or unparseable" marker: every decode failure
/// degrades to it, so receivers cannot tell the two apart.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(tag = "type", content = "value", rename_all = "lowercase")]
pub enum IpcValue {
    #[default]
    Undefined,
    Null,
    Boolean(bool),
    Number(f64),
    String(String),
}

impl IpcValue {
    /// The wire tag for this value.
    #[must_use]
    pub fn type_tag(&self) -> TypeTag {
        match self {
            Self::Undefined => TypeTag::Undefined,
            Self::Null => TypeTag::Null,
            Self::Boolean(_) => TypeTag::Boolean,
            Self::Number(_) => TypeTag::Number,
            Self::String(_) => TypeTag::String,
        }
    }

    #[must_use]
    pub fn is_undefined(&self) -> bool {
        matches!(self, Self::Undefined)
    }

    #[must_use]
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Self::Boolean(b) => Some(*b),
            _ => None,
        }
    }

    #[must_use]
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Self::Number(n) => Some(*n),
            _ => None,
        }
    }

    #[must_use]
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::String(s) => Some(s.as_str()),
            _ => None,
        }
    }
}

/// Renders the value the way the wire expects it: booleans and the two
/// empty markers as literals, strings verbatim, and numbers in their shortest
/// round-trip form with `NaN`/`Infinity` spelled out.
impl fmt::Display for IpcValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Undefined => f.write_str("undefined"),
            Self::Null => f.write_str("null"),
            Self::Boolean(b) => write!(f, "{b}"),
            Self::Number(n) => fmt_number(*n, f),
            Self::String(s) => f.write_str(s),
        }
    }
}

fn fmt_number(n: f64, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    if n.is_nan() {
        f.write_str("NaN")
    } else if n.is_infinite() {
        f.write_str(if n > 0.0 { "Infinity" } else { "-Infinity" })
    } else if n == 0.0 {
        // -0 prints as 0
        f.write_str("0")
    } else {
        f.write_str(&format_finite(n))
    }
}

/// Shortest round-trip digits laid out the way a JS host prints numbers:
/// positional for decimal exponents in `-7..21`, `d.ddde±x` otherwise.
fn format_finite(n: f64) -> String {
    // `{:e}` yields the shortest round-trip mantissa, e.g. "-1.2345e-7".
    let scientific = format!("{n:e}");
    let Some((mantissa, exponent)) = scientific.split_once('e') else {
        return scientific;
    };
    let Ok(exponent) = exponent.parse::<i32>() else {
        return scientific;
    };

    let (sign, mantissa) = match mantissa.strip_prefix('-') {
        Some(rest) => ("-", rest),
        None => ("", mantissa),
    };
    let digits: String = mantissa.chars().filter(|c| *c != '.').collect();

    if !(-7..21).contains(&exponent) {
        let exp_sign = if exponent < 0 { '-' } else { '+' };
        return format!("{sign}{mantissa}e{exp_sign}{}", exponent.unsigned_abs());
    }

    // Position of the decimal point relative to the first digit.
    let point = exponent + 1;
    let len = digits.len() as i32;

    let body = if point >= len {
        format!("{digits}{}", "0".repeat((point - len) as usize))
    } else if point > 0 {
        let (int, frac) = digits.split_at(point as usize);
        format!("{int}.{frac}")
    } else {
        format!("0.{}{digits}", "0".repeat((-point) as usize))
    };

    format!("{sign}{body}")
}

/// Type tags as they appear after the type delimiter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TypeTag {
    Undefined,
    Null,
    Boolean,
    Number,
    String,
}

impl TypeTag {
    /// All supported tags.
    pub const ALL: [TypeTag; 5] = [
        TypeTag::Undefined,
        TypeTag::Null,
        TypeTag::Boolean,
        TypeTag::Number,
        TypeTag::String,
    ];

    /// The wire literal.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Undefined => "undefined",
            Self::Null => "null",
            Self::Boolean => "boolean",
            Self::Number => "number",
            Self::String => "string",
        }
    }

    /// Parse a wire literal. Unknown literals yield `None`.
    #[must_use]
    pub fn parse(tag: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|t| t.as_str() == tag)
    }
}

impl fmt::Display for TypeTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Conversion into a sendable value.
///
/// Statically typed inputs always convert. Dynamic inputs
/// (`serde_json::Value`) fail with `CodecError::UnsupportedType` for objects
/// and arrays.
pub trait IntoIpcValue {
    fn into_ipc_value(self) -> Result<IpcValue, CodecError>;
}

impl IntoIpcValue for IpcValue {
    fn into_ipc_value(self) -> Result<IpcValue, CodecError> {
        Ok(self)
    }
}

impl IntoIpcValue for &IpcValue {
    fn into_ipc_value(self) -> Result<IpcValue, CodecError> {
        Ok(self.clone())
    }
}

impl IntoIpcValue for () {
    fn into_ipc_value(self) -> Result<IpcValue, CodecError> {
        Ok(IpcValue::Undefined)
    }
}

impl IntoIpcValue for bool {
    fn into_ipc_value(self) -> Result<IpcValue, CodecError> {
        Ok(IpcValue::Boolean(self))
    }
}

impl IntoIpcValue for &str {
    fn into_ipc_value(self) -> Result<IpcValue, CodecError> {
        Ok(IpcValue::String(self.to_owned()))
    }
}

impl IntoIpcValue for String {
    fn into_ipc_value(self) -> Result<IpcValue, CodecError> {
        Ok(IpcValue::String(self))
    }
}

impl IntoIpcValue for &String {
    fn into_ipc_value(self) -> Result<IpcValue, CodecError> {
        Ok(IpcValue::String(self.clone()))
    }
}

macro_rules! impl_into_ipc_number {
    ($($t:ty),* $(,)?) => {
        $(
            impl IntoIpcValue for $t {
                #[allow(clippy::cast_precision_loss, clippy::cast_lossless)]
                fn into_ipc_value(self) -> Result<IpcValue, CodecError> {
                    Ok(IpcValue::Number(self as f64))
                }
            }
        )*
    };
}

impl_into_ipc_number!(f64, f32, i8, i16, i32, i64, isize, u8, u16, u32, u64, usize);

/// `None` maps to `Null`, matching how absent optional values are sent.
impl<T: IntoIpcValue> IntoIpcValue for Option<T> {
    fn into_ipc_value(self) -> Result<IpcValue, CodecError> {
        match self {
            Some(v) => v.into_ipc_value(),
            None => Ok(IpcValue::Null),
        }
    }
}

impl IntoIpcValue for serde_json::Value {
    fn into_ipc_value(self) -> Result<IpcValue, CodecError> {
        match self {
            serde_json::Value::Null => Ok(IpcValue::Null),
            serde_json::Value::Bool(b) => Ok(IpcValue::Boolean(b)),
            serde_json::Value::Number(n) => {
                n.as_f64()
                    .map(IpcValue::Number)
                    .ok_or_else(|| CodecError::UnsupportedType {
                        type_name: "number".to_string(),
                    })
            }
            serde_json::Value::String(s) => Ok(IpcValue::String(s)),
            serde_json::Value::Array(_) => Err(CodecError::UnsupportedType {
                type_name: "array".to_string(),
            }),
            serde_json::Value::Object(_) => Err(CodecError::UnsupportedType {
                type_name: "object".to_string(),
            }),
        }
    }
}

impl IntoIpcValue for &serde_json::Value {
    fn into_ipc_value(self) -> Result<IpcValue, CodecError> {
        self.clone().into_ipc_value()
    }
}
