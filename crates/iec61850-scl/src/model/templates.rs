// crates/iec61850-scl/src/model/templates.rs

//! Contains model structs related to `<DataTypeTemplates>`.

use super::Val;
use alloc::string::String;
use alloc::vec::Vec;
use serde::Deserialize;

/// The type template section. Element kinds may be interleaved in the file;
/// each list keeps the document order of its own kind.
#[derive(Debug, Deserialize, Default)]
pub struct DataTypeTemplates {
    #[serde(rename = "LNodeType", default)]
    pub ln_node_type: Vec<LNodeType>,

    #[serde(rename = "DOType", default)]
    pub do_type: Vec<DoType>,

    #[serde(rename = "DAType", default)]
    pub da_type: Vec<DaType>,

    #[serde(rename = "EnumType", default)]
    pub enum_type: Vec<EnumType>,
}

/// Represents `<LNodeType id=".." lnClass="..">`.
#[derive(Debug, Deserialize, Default)]
pub struct LNodeType {
    #[serde(rename = "@id", default)]
    pub id: Option<String>,
    #[serde(rename = "@lnClass", default)]
    pub ln_class: Option<String>,
    #[serde(rename = "DO", default)]
    pub data_objects: Vec<DoReference>,
}

/// Represents `<DO name=".." type=".."/>` inside an `LNodeType`.
#[derive(Debug, Deserialize, Default)]
pub struct DoReference {
    #[serde(rename = "@name", default)]
    pub name: Option<String>,
    #[serde(rename = "@type", default)]
    pub type_ref: Option<String>,
}

/// Represents `<DOType id=".." cdc="..">`.
#[derive(Debug, Deserialize, Default)]
pub struct DoType {
    #[serde(rename = "@id", default)]
    pub id: Option<String>,
    #[serde(rename = "@cdc", default)]
    pub cdc: Option<String>,
    #[serde(rename = "SDO", default)]
    pub sub_data_objects: Vec<SdoReference>,
    #[serde(rename = "DA", default)]
    pub data_attributes: Vec<AttributeDef>,
}

/// Represents `<SDO name=".." type=".." count=".."/>`.
#[derive(Debug, Deserialize, Default)]
pub struct SdoReference {
    #[serde(rename = "@name", default)]
    pub name: Option<String>,
    #[serde(rename = "@type", default)]
    pub type_ref: Option<String>,
    #[serde(rename = "@count", default)]
    pub count: Option<String>,
}

/// Represents a `<DA>` (in a `DOType`) or a `<BDA>` (in a `DAType`).
#[derive(Debug, Deserialize, Default)]
pub struct AttributeDef {
    #[serde(rename = "@name", default)]
    pub name: Option<String>,
    #[serde(rename = "@bType", default)]
    pub b_type: Option<String>,
    #[serde(rename = "@type", default)]
    pub type_ref: Option<String>,
    #[serde(rename = "@fc", default)]
    pub fc: Option<String>,
    #[serde(rename = "@count", default)]
    pub count: Option<String>,
    #[serde(rename = "@dchg", default)]
    pub dchg: Option<String>,
    #[serde(rename = "@qchg", default)]
    pub qchg: Option<String>,
    #[serde(rename = "@dupd", default)]
    pub dupd: Option<String>,
    #[serde(rename = "Val", default)]
    pub val: Vec<Val>,
}

/// Represents `<DAType id="..">`.
#[derive(Debug, Deserialize, Default)]
pub struct DaType {
    #[serde(rename = "@id", default)]
    pub id: Option<String>,
    #[serde(rename = "BDA", default)]
    pub attributes: Vec<AttributeDef>,
}

/// Represents `<EnumType id="..">`.
#[derive(Debug, Deserialize, Default)]
pub struct EnumType {
    #[serde(rename = "@id", default)]
    pub id: Option<String>,
    #[serde(rename = "EnumVal", default)]
    pub values: Vec<EnumVal>,
}

/// Represents `<EnumVal ord="1">on</EnumVal>`.
#[derive(Debug, Deserialize, Default)]
pub struct EnumVal {
    #[serde(rename = "@ord", default)]
    pub ord: Option<String>,
    #[serde(rename = "$value", default)]
    pub literal: String,
}
