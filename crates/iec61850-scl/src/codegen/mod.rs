// crates/iec61850-scl/src/codegen/mod.rs

//! The static back end.
//!
//! [`link_static_model`] flattens the concrete model into named declarations
//! whose parent, sibling and child links are names of other declarations.
//! [`StaticModel::render_c`] prints them as a C translation unit and header
//! for the server runtime's `model.h`.

mod c_source;
mod linker;

pub use c_source::GeneratedSources;
pub use linker::link_static_model;

use crate::types::{AttributeKind, FunctionalConstraint, GseAddress};
use alloc::string::String;
use alloc::vec::Vec;

/// Name of the root `IedModel` record.
pub const IED_MODEL_NAME: &str = "iedModel";

/// Runtime node type of a tree declaration.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NodeKind {
    LogicalDevice,
    LogicalNode,
    DataObject,
    DataAttribute,
}

impl NodeKind {
    /// The `ModelNodeType` enumerator.
    pub fn model_type(self) -> &'static str {
        match self {
            NodeKind::LogicalDevice => "LogicalDeviceModelType",
            NodeKind::LogicalNode => "LogicalNodeModelType",
            NodeKind::DataObject => "DataObjectModelType",
            NodeKind::DataAttribute => "DataAttributeModelType",
        }
    }

    /// The C struct type of the record.
    pub fn c_type(self) -> &'static str {
        match self {
            NodeKind::LogicalDevice => "LogicalDevice",
            NodeKind::LogicalNode => "LogicalNode",
            NodeKind::DataObject => "DataObject",
            NodeKind::DataAttribute => "DataAttribute",
        }
    }
}

/// Kind specific fields of a tree declaration.
#[derive(Debug, Clone, PartialEq)]
pub enum NodePayload {
    LogicalDevice,
    LogicalNode,
    DataObject {
        count: u32,
    },
    DataAttribute {
        count: u32,
        fc: FunctionalConstraint,
        kind: AttributeKind,
        trigger_options: u8,
        short_address: u32,
    },
}

/// One record of the model tree.
#[derive(Debug, Clone, PartialEq)]
pub struct Declaration {
    /// Unique identifier, e.g. `iedModel_LD0_MMXU1_TotW_mag`.
    pub name: String,
    /// The node name stored in the record (qualified name for devices).
    pub label: String,
    /// `None` only for the root; devices point at [`IED_MODEL_NAME`].
    pub parent: Option<String>,
    pub sibling: Option<String>,
    pub first_child: Option<String>,
    pub payload: NodePayload,
}

impl Declaration {
    pub fn kind(&self) -> NodeKind {
        match self.payload {
            NodePayload::LogicalDevice => NodeKind::LogicalDevice,
            NodePayload::LogicalNode => NodeKind::LogicalNode,
            NodePayload::DataObject { .. } => NodeKind::DataObject,
            NodePayload::DataAttribute { .. } => NodeKind::DataAttribute,
        }
    }
}

/// A `DataSetEntry` record.
#[derive(Debug, Clone, PartialEq)]
pub struct DataSetEntryDeclaration {
    pub name: String,
    pub logical_device: String,
    /// MMS variable name, e.g. `MMXU1$MX$TotW$mag$f`.
    pub variable: String,
    pub index: i32,
    pub sibling: Option<String>,
}

/// A `DataSet` record with its entries.
#[derive(Debug, Clone, PartialEq)]
pub struct DataSetDeclaration {
    pub name: String,
    pub logical_device: String,
    /// `LNName$DataSetName`
    pub qualified_name: String,
    pub entries: Vec<DataSetEntryDeclaration>,
    /// Next data set of the whole model.
    pub sibling: Option<String>,
}

/// A `ReportControlBlock` record (one per report instance).
#[derive(Debug, Clone, PartialEq)]
pub struct ReportControlDeclaration {
    pub name: String,
    pub parent: String,
    pub rcb_name: String,
    pub rpt_id: Option<String>,
    pub buffered: bool,
    pub data_set: Option<String>,
    pub conf_ref: u32,
    pub trigger_options: u8,
    pub option_fields: u8,
    pub buffer_time: u32,
    pub integrity_period: u32,
    /// Next report block of the whole model.
    pub sibling: Option<String>,
}

/// A `GSEControlBlock` record.
#[derive(Debug, Clone, PartialEq)]
pub struct GseControlDeclaration {
    pub name: String,
    pub parent: String,
    pub cb_name: String,
    pub app_id: Option<String>,
    pub data_set: Option<String>,
    pub conf_rev: u32,
    pub fixed_offsets: bool,
    /// The `PhyComAddress` record name and its content.
    pub address: Option<(String, GseAddress)>,
    /// Next GSE block of the whole model.
    pub sibling: Option<String>,
}

/// A statement of the deferred `initializeValues()` function.
#[derive(Debug, Clone, PartialEq)]
pub struct Initializer {
    /// The `DataAttribute` record receiving the value.
    pub target: String,
    /// C expression creating the `MmsValue`.
    pub expression: String,
}

/// The flattened model, ready for rendering.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct StaticModel {
    pub ied_name: String,
    pub source_name: String,
    /// Tree records in depth-first document order.
    pub declarations: Vec<Declaration>,
    pub data_sets: Vec<DataSetDeclaration>,
    pub report_controls: Vec<ReportControlDeclaration>,
    pub gse_controls: Vec<GseControlDeclaration>,
    pub initializers: Vec<Initializer>,
}

impl StaticModel {
    /// Finds a tree record by name.
    pub fn declaration(&self, name: &str) -> Option<&Declaration> {
        self.declarations.iter().find(|d| d.name == name)
    }

    /// First logical device record, the root's child.
    pub fn first_logical_device(&self) -> Option<&Declaration> {
        self.declarations
            .iter()
            .find(|d| d.kind() == NodeKind::LogicalDevice)
    }

    /// Walks the children of `name` along the sibling chain.
    pub fn children(&self, name: &str) -> Vec<&Declaration> {
        let mut children = Vec::new();
        let mut next = self
            .declaration(name)
            .and_then(|d| d.first_child.as_deref());
        while let Some(child) = next.and_then(|n| self.declaration(n)) {
            children.push(child);
            next = child.sibling.as_deref();
        }
        children
    }
}
