// crates/iec61850-scl/src/resolver/mod.rs

//! Builds the concrete IED model from a parsed document.
//!
//! This module holds the `build_ied_model` orchestrator and sub-modules for
//! template expansion, instance values, literal conversion and control blocks.

use crate::config::IedSelection;
use crate::error::SclError;
use crate::log::{scl_debug, scl_info, scl_warn, NodeContext};
use crate::model::ied as raw;
use crate::parser::{required, SclDocument};
use crate::registry::TypeRegistry;
use crate::types::{IedModel, LogicalDevice, LogicalNode};
use alloc::format;
use alloc::string::{String, ToString};
use alloc::vec::Vec;

// --- Sub-modules ---

mod control;
mod instance;
mod overrides;
mod values;

pub use instance::InstanceBuilder;

/// Builds the concrete model of the selected IED and access point.
///
/// # Errors
/// `IedOrAccessPointNotFound` when the selection matches nothing, any
/// template resolution error, and `MissingRequiredAttribute` for incomplete
/// declarations.
pub fn build_ied_model(
    document: &SclDocument,
    registry: &TypeRegistry,
    selection: &IedSelection,
) -> Result<IedModel, SclError> {
    let not_found = || SclError::IedOrAccessPointNotFound {
        ied: selection.ied_name.clone(),
        access_point: selection.access_point.clone(),
    };

    let ied = match &selection.ied_name {
        Some(name) => document
            .ieds
            .iter()
            .find(|ied| ied.name.as_deref() == Some(name.as_str())),
        None => document.ieds.first(),
    }
    .ok_or_else(not_found)?;
    let ied_name = required(&ied.name, "IED", "name")?;

    let access_point = match &selection.access_point {
        Some(name) => ied
            .access_points
            .iter()
            .find(|ap| ap.name.as_deref() == Some(name.as_str())),
        None => ied.access_points.first(),
    }
    .ok_or_else(not_found)?;
    let ap_name = required(&access_point.name, "AccessPoint", "name")?;

    scl_info!("Building model of IED '{}', access point '{}'", ied_name, ap_name);

    let builder = InstanceBuilder::new(registry);
    let mut logical_devices = Vec::new();
    if let Some(server) = &access_point.server {
        for ld in &server.logical_devices {
            logical_devices.push(build_logical_device(&builder, ied_name, ld)?);
        }
    } else {
        scl_warn!("Access point '{}' has no <Server>", ap_name);
    }

    Ok(IedModel {
        name: ied_name.to_string(),
        access_point: ap_name.to_string(),
        logical_devices,
    })
}

fn build_logical_device(
    builder: &InstanceBuilder<'_>,
    ied_name: &str,
    model: &raw::LDevice,
) -> Result<LogicalDevice, SclError> {
    let inst = required(&model.inst, "LDevice", "inst")?;

    // LN0 comes first, then every LN in document order.
    let mut logical_nodes = Vec::new();
    for decl in model.ln0.iter().chain(model.ln.iter()) {
        logical_nodes.push(build_logical_node(builder, ied_name, inst, decl)?);
    }

    Ok(LogicalDevice {
        inst: inst.to_string(),
        ld_name: model.ld_name.clone(),
        logical_nodes,
    })
}

fn build_logical_node(
    builder: &InstanceBuilder<'_>,
    ied_name: &str,
    ld_inst: &str,
    decl: &raw::LnDeclaration,
) -> Result<LogicalNode, SclError> {
    let ln_class = required(&decl.ln_class, "LN", "lnClass")?;
    let ln_type = required(&decl.ln_type, "LN", "lnType")?;
    let name = logical_node_name(decl.prefix.as_deref(), ln_class, decl.inst.as_deref());
    let ctx = NodeContext {
        ied: ied_name,
        logical_device: ld_inst,
        logical_node: &name,
    };

    let mut node = builder.expand_logical_node(&name, ln_type)?;
    node.ld_inst = ld_inst.to_string();

    overrides::apply_instance_values(builder.registry(), &mut node, &decl.doi, &ctx)?;

    node.data_sets = decl
        .data_sets
        .iter()
        .map(control::data_set)
        .collect::<Result<_, _>>()?;
    node.report_controls = decl
        .report_controls
        .iter()
        .map(control::report_control)
        .collect::<Result<_, _>>()?;
    node.gse_controls = decl
        .gse_controls
        .iter()
        .map(control::gse_control)
        .collect::<Result<_, _>>()?;

    scl_debug!(
        ctx,
        "{} data objects, {} data sets, {} report and {} GSE control blocks",
        node.data_objects.len(),
        node.data_sets.len(),
        node.report_controls.len(),
        node.gse_controls.len()
    );
    Ok(node)
}

/// `prefix + lnClass + inst`, e.g. `Q1` + `XCBR` + `1`.
fn logical_node_name(prefix: Option<&str>, ln_class: &str, inst: Option<&str>) -> String {
    format!(
        "{}{}{}",
        prefix.unwrap_or_default(),
        ln_class,
        inst.unwrap_or_default()
    )
}
