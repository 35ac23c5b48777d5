//! # Value Codec
//!
//! Pure functions converting values to their tagged wire text and back.
//!
//! Encoding is strict: unsupported types and delimiter-bearing text are
//! rejected before anything is written. Decoding is best effort: a malformed
//! literal or an unknown tag degrades to `IpcValue::Undefined`.

use crate::errors::CodecError;
use crate::value::{IntoIpcValue, IpcValue, TypeTag};
use tracing::trace;

/// Separates the value text from its type tag.
pub const TYPE_DELIM: char = '\u{1E}';

/// Separates the type tag from the sender id.
pub const SENDER_DELIM: char = '\u{1F}';

/// Whether `text` contains either wire delimiter.
#[must_use]
pub fn contains_delimiter(text: &str) -> bool {
    text.contains([TYPE_DELIM, SENDER_DELIM])
}

/// Whether a tag literal names a supported type.
#[must_use]
pub fn is_type_compatible(tag: &str) -> bool {
    TypeTag::parse(tag).is_some()
}

/// Encode a value as `<text><TYPE_DELIM><tag>`.
///
/// # Errors
///
/// - `CodecError::UnsupportedType` if the value has no encoder
/// - `CodecError::DelimiterInValue` if the value text contains a delimiter
pub fn encode(value: impl IntoIpcValue) -> Result<String, CodecError> {
    let value = value.into_ipc_value()?;
    let text = value.to_string();

    if contains_delimiter(&text) {
        return Err(CodecError::DelimiterInValue);
    }

    Ok(format!("{text}{TYPE_DELIM}{}", value.type_tag()))
}

/// Append the sender tag to an encoded value.
#[must_use]
pub fn add_sender(encoded: &str, sender_id: &str) -> String {
    format!("{encoded}{SENDER_DELIM}{sender_id}")
}

/// Decode value text according to its type tag.
///
/// Never fails. Missing text, unknown tags and malformed literals all yield
/// `IpcValue::Undefined`.
#[must_use]
pub fn decode(raw_value: Option<&str>, type_tag: Option<&str>) -> IpcValue {
    let Some(tag) = type_tag.and_then(TypeTag::parse) else {
        trace!(tag = ?type_tag, "Unknown type tag, decoding as undefined");
        return IpcValue::Undefined;
    };

    match tag {
        TypeTag::Boolean => raw_value
            .and_then(decode_boolean)
            .map_or(IpcValue::Undefined, IpcValue::Boolean),
        TypeTag::Number => raw_value
            .and_then(decode_number)
            .map_or(IpcValue::Undefined, IpcValue::Number),
        TypeTag::String => raw_value
            .map_or(IpcValue::Undefined, |s| IpcValue::String(s.to_owned())),
        TypeTag::Null => IpcValue::Null,
        TypeTag::Undefined => IpcValue::Undefined,
    }
}

fn decode_boolean(text: &str) -> Option<bool> {
    match text {
        "true" => Some(true),
        "false" => Some(false),
        _ => {
            trace!(text, "Malformed boolean literal");
            None
        }
    }
}

fn decode_number(text: &str) -> Option<f64> {
    let trimmed = text.trim();

    match trimmed {
        "NaN" => return Some(f64::NAN),
        "Infinity" | "+Infinity" => return Some(f64::INFINITY),
        "-Infinity" => return Some(f64::NEG_INFINITY),
        _ => {}
    }

    // `str::parse` also accepts "inf" and "nan" spellings; only the literals
    // above are valid on the wire.
    let has_word = trimmed
        .bytes()
        .any(|b| b.is_ascii_alphabetic() && !matches!(b, b'e' | b'E'));

    if trimmed.is_empty() || has_word {
        trace!(text, "Malformed number literal");
        return None;
    }

    trimmed.parse::<f64>().ok().or_else(|| {
        trace!(text, "Malformed number literal");
        None
    })
}
