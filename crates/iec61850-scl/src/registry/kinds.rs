// crates/iec61850-scl/src/registry/kinds.rs

//! The fixed `bType` table and the built-in enumerations that have no
//! `EnumType` declaration of their own.

use crate::error::SclError;
use crate::types::AttributeKind;
use alloc::string::ToString;

/// Maps an SCL basic type token (`@bType`) to its concrete attribute kind.
pub fn attribute_kind(b_type: &str) -> Result<AttributeKind, SclError> {
    let kind = match b_type {
        "BOOLEAN" => AttributeKind::Boolean,
        "INT8" => AttributeKind::Int8,
        "INT16" => AttributeKind::Int16,
        "INT32" => AttributeKind::Int32,
        "INT64" => AttributeKind::Int64,
        "INT128" => AttributeKind::Int128,
        "INT8U" => AttributeKind::Int8U,
        "INT16U" => AttributeKind::Int16U,
        "INT24U" => AttributeKind::Int24U,
        "INT32U" => AttributeKind::Int32U,
        "FLOAT32" => AttributeKind::Float32,
        "FLOAT64" => AttributeKind::Float64,
        "Enum" | "Dbpos" | "Tcmd" => AttributeKind::Enumerated,
        "Check" => AttributeKind::Check,
        "Octet64" => AttributeKind::OctetString64,
        "Quality" => AttributeKind::Quality,
        "Timestamp" => AttributeKind::Timestamp,
        "VisString32" => AttributeKind::VisibleString32,
        "VisString64" => AttributeKind::VisibleString64,
        "VisString65" => AttributeKind::VisibleString65,
        "VisString129" | "ObjRef" => AttributeKind::VisibleString129,
        "VisString255" => AttributeKind::VisibleString255,
        "Unicode255" => AttributeKind::UnicodeString255,
        "OptFlds" | "TrgOps" => AttributeKind::GenericBitString,
        "EntryID" => AttributeKind::OctetString8,
        "EntryTime" => AttributeKind::EntryTime,
        "PhyComAddr" => AttributeKind::PhyComAddr,
        "Struct" => AttributeKind::Constructed,
        other => return Err(SclError::UnsupportedAttributeKind(other.to_string())),
    };
    Ok(kind)
}

/// Literals of the basic types that are enumerations by definition.
///
/// `Dbpos` and `Tcmd` attributes carry no `@type`, so their defaults are
/// looked up here instead of in an `EnumType`.
pub fn builtin_enum_ordinal(b_type: &str, literal: &str) -> Option<i64> {
    let table: &[(&str, i64)] = match b_type {
        "Dbpos" => &[
            ("intermediate-state", 0),
            ("off", 1),
            ("on", 2),
            ("bad-state", 3),
        ],
        "Tcmd" => &[("stop", 0), ("lower", 1), ("higher", 2), ("reserved", 3)],
        _ => return None,
    };
    table
        .iter()
        .find(|(name, _)| *name == literal)
        .map(|(_, ord)| *ord)
}
