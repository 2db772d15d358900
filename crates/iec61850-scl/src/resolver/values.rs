// crates/iec61850-scl/src/resolver/values.rs

//! Interprets `<Val>` literals according to the attribute kind.

use crate::error::SclError;
use crate::registry::{builtin_enum_ordinal, TypeRegistry};
use crate::types::{AttributeKind, DataModelValue};
use alloc::string::{String, ToString};

/// Converts a literal into a typed default value.
///
/// Returns `Ok(None)` for kinds that cannot carry a literal (structures).
///
/// # Errors
/// `InvalidValue` when the literal does not fit the kind, and
/// `UnresolvedTypeReference` when an enumeration's `EnumType` is unknown.
pub(crate) fn convert_value(
    registry: &TypeRegistry,
    kind: AttributeKind,
    type_name: Option<&str>,
    literal: &str,
    attribute: &str,
) -> Result<Option<DataModelValue>, SclError> {
    let invalid = || SclError::InvalidValue {
        attribute: attribute.to_string(),
        value: literal.to_string(),
    };
    let trimmed = literal.trim();

    let value = match kind {
        AttributeKind::Boolean => match trimmed {
            "true" | "1" => DataModelValue::Boolean(true),
            "false" | "0" => DataModelValue::Boolean(false),
            _ => return Err(invalid()),
        },
        AttributeKind::Int8
        | AttributeKind::Int16
        | AttributeKind::Int32
        | AttributeKind::Int64
        | AttributeKind::Int128 => {
            let v = trimmed.parse::<i64>().map_err(|_| invalid())?;
            let (min, max) = match kind {
                AttributeKind::Int8 => (i8::MIN.into(), i8::MAX.into()),
                AttributeKind::Int16 => (i16::MIN.into(), i16::MAX.into()),
                AttributeKind::Int32 => (i32::MIN.into(), i32::MAX.into()),
                _ => (i64::MIN, i64::MAX),
            };
            if !(min..=max).contains(&v) {
                return Err(invalid());
            }
            DataModelValue::Integer(v)
        }
        AttributeKind::Int8U
        | AttributeKind::Int16U
        | AttributeKind::Int24U
        | AttributeKind::Int32U => {
            let v = trimmed.parse::<u64>().map_err(|_| invalid())?;
            let max: u64 = match kind {
                AttributeKind::Int8U => u8::MAX.into(),
                AttributeKind::Int16U => u16::MAX.into(),
                AttributeKind::Int24U => 0x00FF_FFFF,
                _ => u32::MAX.into(),
            };
            if v > max {
                return Err(invalid());
            }
            DataModelValue::Unsigned(v)
        }
        AttributeKind::Enumerated => {
            DataModelValue::Integer(enum_ordinal(registry, type_name, trimmed)?.ok_or_else(invalid)?)
        }
        AttributeKind::Float32 | AttributeKind::Float64 => {
            let parsed = trimmed.parse::<f64>().map_err(|_| invalid())?;
            if !parsed.is_finite() {
                return Err(invalid());
            }
            DataModelValue::Float(trimmed.to_string())
        }
        AttributeKind::VisibleString32
        | AttributeKind::VisibleString64
        | AttributeKind::VisibleString65
        | AttributeKind::VisibleString129
        | AttributeKind::VisibleString255
        | AttributeKind::UnicodeString255 => DataModelValue::Text(String::from(literal)),
        AttributeKind::Constructed => return Ok(None),
        AttributeKind::OctetString64
        | AttributeKind::OctetString6
        | AttributeKind::OctetString8
        | AttributeKind::Timestamp
        | AttributeKind::Quality
        | AttributeKind::Check
        | AttributeKind::CodedEnum
        | AttributeKind::GenericBitString
        | AttributeKind::EntryTime
        | AttributeKind::PhyComAddr => DataModelValue::Raw(trimmed.to_string()),
    };
    Ok(Some(value))
}

/// Resolves an enumeration literal to its ordinal. Plain integers are accepted as is.
fn enum_ordinal(
    registry: &TypeRegistry,
    type_name: Option<&str>,
    literal: &str,
) -> Result<Option<i64>, SclError> {
    if let Ok(ord) = literal.parse::<i64>() {
        return Ok(Some(ord));
    }
    let Some(type_name) = type_name else {
        return Ok(None);
    };
    if let Some(ord) = builtin_enum_ordinal(type_name, literal) {
        return Ok(Some(ord));
    }
    if type_name == "Dbpos" || type_name == "Tcmd" {
        return Ok(None);
    }
    Ok(registry.enumeration(type_name)?.ordinal(literal))
}
