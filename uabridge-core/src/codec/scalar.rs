//! Serialize and parse rules of every built-in scalar type.
//!
//! | Type | JSON |
//! |---|---|
//! | Boolean | `true` / `false` |
//! | SByte, Byte, Int16, UInt16, Int32, UInt32 | integer, range checked |
//! | Int64, UInt64 | `[high, low]` pair of 32-bit unsigned words |
//! | Float, Double | number |
//! | String, XmlElement | string |
//! | DateTime | `YYYY-MM-DDTHH:MM:SS.mmmZ` |
//! | Guid | `XXXXXXXX-XXXX-XXXX-XXXX-XXXXXXXXXXXX` |
//! | ByteString | base64 string |
//! | NodeId, ExpandedNodeId | `ns=<namespace>;<i\|s\|g\|b>=<value>` |
//! | StatusCode | `{name, value, description}`, serialize only |
//! | QualifiedName | `<namespace>:<name>`, namespace 0 omitted |
//! | LocalizedText | the text; parsed with a null locale |
//! | Variant | the nested variant's JSON; parsed by inferring the type |
use super::{CodecError, to_json};
use crate::types::{
    ArgumentDescriptor, DataType, DateTime, ExpandedNodeId, ExtensionObject, LocalizedText,
    NodeId, QualifiedName, Scalar, ValueRank, Variant,
};
use base64::{Engine, engine::general_purpose::STANDARD};
use chrono::{Datelike, NaiveDateTime, SecondsFormat};
use serde_json::{Number, Value, json};
use uuid::Uuid;

const MIN_DATE_TIME: &str = "0000-01-01T00:00:00.000Z";
const MAX_DATE_TIME: &str = "9999-12-31T23:59:59.999Z";

/// Fails for the types that only ever travel from the server to the client.
pub(super) fn ensure_parsable(data_type: DataType) -> Result<(), CodecError> {
    match data_type {
        DataType::Null
        | DataType::StatusCode
        | DataType::ExtensionObject
        | DataType::DataValue
        | DataType::DiagnosticInfo => Err(CodecError::UnsupportedType(data_type)),
        _ => Ok(()),
    }
}

pub(super) fn serialize(value: &Scalar) -> Result<Value, CodecError> {
    let json = match value {
        Scalar::Boolean(v) => json!(v),
        Scalar::SByte(v) => json!(v),
        Scalar::Byte(v) => json!(v),
        Scalar::Int16(v) => json!(v),
        Scalar::UInt16(v) => json!(v),
        Scalar::Int32(v) => json!(v),
        Scalar::UInt32(v) => json!(v),
        Scalar::Int64(v) => word_pair(*v as u64),
        Scalar::UInt64(v) => word_pair(*v),
        Scalar::Float(v) => float(f64::from(*v)),
        Scalar::Double(v) => float(*v),
        Scalar::String(v) | Scalar::XmlElement(v) => json!(v),
        Scalar::DateTime(v) => date_time(v),
        Scalar::Guid(v) => json!(format!("{:X}", v.hyphenated())),
        Scalar::ByteString(v) => json!(STANDARD.encode(v)),
        Scalar::NodeId(v) => json!(v.to_string()),
        Scalar::ExpandedNodeId(v) => json!(v.to_string()),
        Scalar::StatusCode(v) => super::status_code_to_json(*v),
        Scalar::QualifiedName(v) => json!(v.to_string()),
        Scalar::LocalizedText(v) => json!(v.text),
        Scalar::ExtensionObject(ExtensionObject::Argument(argument)) => argument_json(argument),
        Scalar::ExtensionObject(ExtensionObject::Encoded { .. }) => {
            return Err(CodecError::UnsupportedType(DataType::ExtensionObject));
        }
        Scalar::Variant(v) => to_json(v)?,
    };

    Ok(json)
}

fn word_pair(value: u64) -> Value {
    json!([(value >> 32) as u32, value as u32])
}

/// Instants outside the four-digit year range are clamped to its bounds.
fn date_time(value: &DateTime) -> Value {
    match value.year() {
        ..0 => json!(MIN_DATE_TIME),
        10000.. => json!(MAX_DATE_TIME),
        _ => json!(value.to_rfc3339_opts(SecondsFormat::Millis, true)),
    }
}

/// Non-finite numbers have no JSON representation and become `null`.
fn float(value: f64) -> Value {
    Number::from_f64(value).map_or(Value::Null, Value::Number)
}

fn argument_json(argument: &ArgumentDescriptor) -> Value {
    json!({
        "name": argument.name,
        "dataType": argument.data_type.to_string(),
        "valueRank": argument.value_rank.get(),
        "arrayDimensions": argument.array_dimensions,
        "description": argument.description.text,
    })
}

pub(super) fn parse(value: &Value, data_type: DataType) -> Result<Scalar, CodecError> {
    let scalar = match data_type {
        DataType::Boolean => Scalar::Boolean(
            value
                .as_bool()
                .ok_or_else(|| unexpected(data_type, "a boolean"))?,
        ),
        DataType::SByte => Scalar::SByte(integer(value, data_type, i8::MIN, i8::MAX)?),
        DataType::Byte => Scalar::Byte(integer(value, data_type, u8::MIN, u8::MAX)?),
        DataType::Int16 => Scalar::Int16(integer(value, data_type, i16::MIN, i16::MAX)?),
        DataType::UInt16 => Scalar::UInt16(integer(value, data_type, u16::MIN, u16::MAX)?),
        DataType::Int32 => Scalar::Int32(integer(value, data_type, i32::MIN, i32::MAX)?),
        DataType::UInt32 => Scalar::UInt32(integer(value, data_type, u32::MIN, u32::MAX)?),
        DataType::Int64 => Scalar::Int64(parse_word_pair(value, data_type)? as i64),
        DataType::UInt64 => Scalar::UInt64(parse_word_pair(value, data_type)?),
        DataType::Float => Scalar::Float(parse_float(value)?),
        DataType::Double => Scalar::Double(number(value, data_type)?),
        DataType::String => Scalar::String(string(value, data_type)?.to_string()),
        DataType::XmlElement => Scalar::XmlElement(string(value, data_type)?.to_string()),
        DataType::DateTime => Scalar::DateTime(parse_date_time(string(value, data_type)?)?),
        DataType::Guid => Scalar::Guid(parse_guid(string(value, data_type)?)?),
        DataType::ByteString => {
            let encoded = string(value, data_type)?;
            Scalar::ByteString(
                STANDARD
                    .decode(encoded)
                    .map_err(|e| format_error(data_type, encoded, e))?,
            )
        }
        DataType::NodeId => {
            let text = string(value, data_type)?;
            Scalar::NodeId(
                text.parse::<NodeId>()
                    .map_err(|e| format_error(data_type, text, e))?,
            )
        }
        DataType::ExpandedNodeId => {
            let text = string(value, data_type)?;
            Scalar::ExpandedNodeId(
                text.parse::<ExpandedNodeId>()
                    .map_err(|e| format_error(data_type, text, e))?,
            )
        }
        DataType::QualifiedName => {
            let text = string(value, data_type)?;
            let Ok(name) = text.parse::<QualifiedName>();
            Scalar::QualifiedName(name)
        }
        DataType::LocalizedText => {
            Scalar::LocalizedText(LocalizedText::new(string(value, data_type)?))
        }
        DataType::Variant => Scalar::Variant(Box::new(infer(value)?)),
        DataType::Null
        | DataType::StatusCode
        | DataType::ExtensionObject
        | DataType::DataValue
        | DataType::DiagnosticInfo => return Err(CodecError::UnsupportedType(data_type)),
    };

    Ok(scalar)
}

fn unexpected(data_type: DataType, expected: &'static str) -> CodecError {
    CodecError::UnexpectedJson {
        data_type,
        expected,
    }
}

fn format_error(data_type: DataType, value: &str, reason: impl ToString) -> CodecError {
    CodecError::FormatError {
        data_type,
        value: value.to_string(),
        reason: reason.to_string(),
    }
}

fn string(value: &Value, data_type: DataType) -> Result<&str, CodecError> {
    value.as_str().ok_or_else(|| unexpected(data_type, "a string"))
}

fn number(value: &Value, data_type: DataType) -> Result<f64, CodecError> {
    value.as_f64().ok_or_else(|| unexpected(data_type, "a number"))
}

/// An integral JSON number, including floats with no fractional part such as `100.0`.
fn as_integer(value: &Value) -> Option<i64> {
    let number = value.as_number()?;

    number.as_i64().or_else(|| {
        number
            .as_f64()
            .filter(|v| v.fract() == 0.0 && *v >= i64::MIN as f64 && *v < i64::MAX as f64)
            .map(|v| v as i64)
    })
}

fn integer<T>(value: &Value, data_type: DataType, min: T, max: T) -> Result<T, CodecError>
where
    T: TryFrom<i64> + ToString,
{
    as_integer(value)
        .and_then(|v| T::try_from(v).ok())
        .ok_or_else(|| CodecError::RangeError {
            data_type,
            expected: "an integer",
            min: min.to_string(),
            max: max.to_string(),
        })
}

/// Decodes a `[high, low]` pair into the 64 bits it represents.
fn parse_word_pair(value: &Value, data_type: DataType) -> Result<u64, CodecError> {
    let Some([high, low]) = value.as_array().map(Vec::as_slice) else {
        return Err(unexpected(data_type, "a [high, low] pair of 32-bit words"));
    };

    let word = |index: usize, value: &Value| {
        as_integer(value)
            .and_then(|v| u32::try_from(v).ok())
            .ok_or(CodecError::ComponentRange { data_type, index })
    };

    Ok((u64::from(word(0, high)?) << 32) | u64::from(word(1, low)?))
}

fn parse_float(value: &Value) -> Result<f32, CodecError> {
    let v = number(value, DataType::Float)?;

    if v.abs() > f64::from(f32::MAX) {
        return Err(CodecError::RangeError {
            data_type: DataType::Float,
            expected: "a number",
            min: f32::MIN.to_string(),
            max: f32::MAX.to_string(),
        });
    }

    Ok(v as f32)
}

/// Accepts exactly `YYYY-MM-DDTHH:MM:SS.mmmZ`.
fn parse_date_time(text: &str) -> Result<DateTime, CodecError> {
    const EXPECTED: &str = "expected YYYY-MM-DDTHH:MM:SS.mmmZ";

    let body = text
        .strip_suffix('Z')
        .filter(|body| body.len() == 23 && body.as_bytes()[19] == b'.')
        .ok_or_else(|| format_error(DataType::DateTime, text, EXPECTED))?;

    NaiveDateTime::parse_from_str(body, "%Y-%m-%dT%H:%M:%S%.f")
        .map(|dt| dt.and_utc())
        .map_err(|e| format_error(DataType::DateTime, text, e))
}

/// Accepts exactly the hyphenated `8-4-4-4-12` form, in either case.
fn parse_guid(text: &str) -> Result<Uuid, CodecError> {
    if text.len() != 36 {
        return Err(format_error(
            DataType::Guid,
            text,
            "expected XXXXXXXX-XXXX-XXXX-XXXX-XXXXXXXXXXXX",
        ));
    }

    Uuid::parse_str(text).map_err(|e| format_error(DataType::Guid, text, e))
}

/// Picks a type for a JSON value declared only as `Variant`.
fn infer(value: &Value) -> Result<Variant, CodecError> {
    match value {
        Value::Null => Ok(Variant::empty()),
        Value::Bool(v) => Ok(Variant::scalar(*v)),
        Value::Number(n) => match n.as_i64().and_then(|v| i32::try_from(v).ok()) {
            Some(v) => Ok(Variant::scalar(v)),
            None => number(value, DataType::Variant).map(Variant::scalar),
        },
        Value::String(v) => Ok(Variant::scalar(v.as_str())),
        Value::Array(_) => super::from_json(value, DataType::Variant, ValueRank::ANY),
        Value::Object(_) => Err(CodecError::UnsupportedType(DataType::ExtensionObject)),
    }
}
