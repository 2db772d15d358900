//! Internal `serde` data structures that map directly to the SCL XML schema.
//!
//! This module defines the raw structure of an SCL file (IEC 61850-6). These
//! structs are annotated with `serde` attributes to facilitate parsing via
//! `quick-xml` and are not intended for direct public use. Every attribute is
//! kept as an optional string; interpretation happens in the resolvers.

#![allow(clippy::pedantic)] // XML schema naming conventions differ from Rust

use alloc::string::String;
use alloc::vec::Vec;
use serde::Deserialize;

pub mod communication;
pub mod ied;
pub mod templates;

// Re-export key components for internal use
pub use communication::Communication;
pub use ied::Ied;
pub use templates::DataTypeTemplates;

/// The root `<SCL>` element.
///
/// The sections are collected as lists so that the parser can report
/// cardinality violations instead of failing inside `serde`.
#[derive(Debug, Deserialize, Default)]
#[serde(rename = "SCL")]
pub struct Scl {
    #[serde(rename = "Communication", default)]
    pub communication: Vec<Communication>,

    #[serde(rename = "IED", default)]
    pub ied: Vec<Ied>,

    #[serde(rename = "DataTypeTemplates", default)]
    pub data_type_templates: Vec<DataTypeTemplates>,
}

/// Represents `<Val sGroup="..">literal</Val>`, used by `DA`, `BDA` and `DAI`.
#[derive(Debug, Deserialize, Default, Clone)]
pub struct Val {
    #[serde(rename = "@sGroup", default)]
    pub s_group: Option<String>,
    #[serde(rename = "$value", default)]
    pub value: String,
}
