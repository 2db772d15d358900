// crates/iec61850-scl/src/registry/templates.rs

//! Immutable template definitions and their conversion from the raw
//! `<DataTypeTemplates>` model.

use super::kinds::attribute_kind;
use crate::error::SclError;
use crate::model::templates as raw;
use crate::parser::{parse_bool, parse_u32, required};
use crate::types::{AttributeKind, FunctionalConstraint, TriggerOptions};
use alloc::string::{String, ToString};
use alloc::vec::Vec;

/// An `<EnumType>`: ordered `(ord, literal)` pairs.
#[derive(Debug, Clone, PartialEq)]
pub struct EnumerationType {
    pub name: String,
    pub values: Vec<(i64, String)>,
}

impl EnumerationType {
    /// Looks up the ordinal of a literal such as `"on"`.
    pub fn ordinal(&self, literal: &str) -> Option<i64> {
        self.values
            .iter()
            .find(|(_, name)| name == literal)
            .map(|(ord, _)| *ord)
    }
}

/// One `<DA>` of a `DOType` or `<BDA>` of a `DAType`.
#[derive(Debug, Clone, PartialEq)]
pub struct AttributeDefinition {
    pub name: String,
    /// The `@bType` token as written.
    pub b_type: String,
    pub kind: AttributeKind,
    /// `@type`: a `DAType` for structures, an `EnumType` for `Enum`.
    pub type_name: Option<String>,
    /// Always set on `DA`; `BDA` leaves inherit it from their parent.
    pub fc: Option<FunctionalConstraint>,
    pub count: u32,
    pub trigger_options: TriggerOptions,
    /// Text of the first `<Val>`, if any.
    pub default_value: Option<String>,
}

/// A `<DAType>`.
#[derive(Debug, Clone, PartialEq)]
pub struct DataAttributeTemplate {
    pub name: String,
    pub attributes: Vec<AttributeDefinition>,
}

/// An `<SDO>` entry of a `DOType`.
#[derive(Debug, Clone, PartialEq)]
pub struct SubObjectDefinition {
    pub name: String,
    pub type_name: String,
    pub count: u32,
}

/// A `<DOType>`.
#[derive(Debug, Clone, PartialEq)]
pub struct DataObjectTemplate {
    pub name: String,
    pub cdc: Option<String>,
    pub sub_objects: Vec<SubObjectDefinition>,
    pub attributes: Vec<AttributeDefinition>,
}

/// A `<DO>` entry of an `LNodeType`.
#[derive(Debug, Clone, PartialEq)]
pub struct DataObjectReference {
    pub name: String,
    pub type_name: String,
}

/// An `<LNodeType>`.
#[derive(Debug, Clone, PartialEq)]
pub struct LogicalNodeTemplate {
    pub name: String,
    pub ln_class: String,
    pub data_objects: Vec<DataObjectReference>,
}

// --- Conversion from the raw model ---

impl EnumerationType {
    pub(crate) fn from_model(model: &raw::EnumType) -> Result<Self, SclError> {
        let name = required(&model.id, "EnumType", "id")?.to_string();
        let values = model
            .values
            .iter()
            .map(|val| {
                let ord_str = required(&val.ord, "EnumVal", "ord")?;
                let ord = ord_str.trim().parse::<i64>().map_err(|_| {
                    SclError::InvalidAttributeFormat {
                        attribute: "ord",
                        value: ord_str.to_string(),
                    }
                })?;
                Ok((ord, val.literal.trim().to_string()))
            })
            .collect::<Result<Vec<_>, SclError>>()?;
        Ok(Self { name, values })
    }
}

impl AttributeDefinition {
    /// Converts a `DA` (`element = "DA"`, `fc` mandatory) or a `BDA`.
    pub(crate) fn from_model(
        model: &raw::AttributeDef,
        element: &'static str,
    ) -> Result<Self, SclError> {
        let name = required(&model.name, element, "name")?.to_string();
        let b_type = required(&model.b_type, element, "bType")?.to_string();
        let kind = attribute_kind(&b_type)?;

        let fc = match model.fc.as_deref() {
            Some(code) => Some(FunctionalConstraint::from_scl(code.trim()).ok_or_else(|| {
                SclError::InvalidAttributeFormat {
                    attribute: "fc",
                    value: code.to_string(),
                }
            })?),
            None if element == "DA" => {
                return Err(SclError::MissingRequiredAttribute {
                    element,
                    attribute: "fc",
                });
            }
            None => None,
        };

        // Basic types with a fixed value range name themselves as their type.
        let type_name = match b_type.as_str() {
            "Dbpos" | "Tcmd" | "Check" => Some(b_type.clone()),
            _ => model.type_ref.clone(),
        };
        if (kind == AttributeKind::Constructed || b_type == "Enum") && type_name.is_none() {
            return Err(SclError::MissingRequiredAttribute {
                element,
                attribute: "type",
            });
        }

        let mut trigger_options = TriggerOptions::empty();
        if parse_bool(&model.dchg, "dchg", false)? {
            trigger_options.insert(TriggerOptions::DATA_CHANGED);
        }
        if parse_bool(&model.qchg, "qchg", false)? {
            trigger_options.insert(TriggerOptions::QUALITY_CHANGED);
        }
        if parse_bool(&model.dupd, "dupd", false)? {
            trigger_options.insert(TriggerOptions::DATA_UPDATE);
        }

        Ok(Self {
            name,
            b_type,
            kind,
            type_name,
            fc,
            count: parse_u32(&model.count, "count", 0)?,
            trigger_options,
            default_value: model.val.first().map(|v| v.value.trim().to_string()),
        })
    }
}

impl DataAttributeTemplate {
    pub(crate) fn from_model(model: &raw::DaType) -> Result<Self, SclError> {
        Ok(Self {
            name: required(&model.id, "DAType", "id")?.to_string(),
            attributes: model
                .attributes
                .iter()
                .map(|bda| AttributeDefinition::from_model(bda, "BDA"))
                .collect::<Result<_, _>>()?,
        })
    }
}

impl DataObjectTemplate {
    pub(crate) fn from_model(model: &raw::DoType) -> Result<Self, SclError> {
        let sub_objects = model
            .sub_data_objects
            .iter()
            .map(|sdo| {
                Ok(SubObjectDefinition {
                    name: required(&sdo.name, "SDO", "name")?.to_string(),
                    type_name: required(&sdo.type_ref, "SDO", "type")?.to_string(),
                    count: parse_u32(&sdo.count, "count", 0)?,
                })
            })
            .collect::<Result<Vec<_>, SclError>>()?;

        Ok(Self {
            name: required(&model.id, "DOType", "id")?.to_string(),
            cdc: model.cdc.clone(),
            sub_objects,
            attributes: model
                .data_attributes
                .iter()
                .map(|da| AttributeDefinition::from_model(da, "DA"))
                .collect::<Result<_, _>>()?,
        })
    }
}

impl LogicalNodeTemplate {
    pub(crate) fn from_model(model: &raw::LNodeType) -> Result<Self, SclError> {
        let data_objects = model
            .data_objects
            .iter()
            .map(|d| {
                Ok(DataObjectReference {
                    name: required(&d.name, "DO", "name")?.to_string(),
                    type_name: required(&d.type_ref, "DO", "type")?.to_string(),
                })
            })
            .collect::<Result<Vec<_>, SclError>>()?;

        Ok(Self {
            name: required(&model.id, "LNodeType", "id")?.to_string(),
            ln_class: required(&model.ln_class, "LNodeType", "lnClass")?.to_string(),
            data_objects,
        })
    }
}
