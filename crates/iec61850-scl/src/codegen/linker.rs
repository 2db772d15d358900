// crates/iec61850-scl/src/codegen/linker.rs

//! Flattens the concrete model into linked declarations.
//!
//! Runs in two phases: the names of every data set, report instance and GSE
//! block are collected first, so each global list link can name its successor
//! even when it lives in another logical node; the tree walk then emits the
//! records.

use super::c_source::c_string;
use super::{
    DataSetDeclaration, DataSetEntryDeclaration, Declaration, GseControlDeclaration,
    IED_MODEL_NAME, Initializer, NodePayload, ReportControlDeclaration, StaticModel,
};
use crate::communication::AddressResolver;
use crate::config::GeneratorConfig;
use crate::log::{scl_debug, scl_warn};
use crate::types::{
    AttributeKind, DataAttribute, DataModelValue, DataObject, IedModel, LogicalDevice,
    LogicalNode,
};
use alloc::format;
use alloc::string::{String, ToString};
use alloc::vec::Vec;

/// Links the concrete model into a [`StaticModel`].
///
/// Address lookups, short address parsing and value rendering only degrade
/// the output with a warning; linking itself cannot fail.
pub fn link_static_model(
    model: &IedModel,
    addresses: &AddressResolver<'_>,
    config: &GeneratorConfig,
) -> StaticModel {
    let mut linker = Linker {
        model,
        declarations: Vec::new(),
        initializers: Vec::new(),
    };
    for (i, ld) in model.logical_devices.iter().enumerate() {
        let next = model.logical_devices.get(i + 1);
        linker.link_device(ld, next);
    }

    let data_sets = link_data_sets(model);
    let report_controls = link_report_controls(model, config);
    let gse_controls = link_gse_controls(model, addresses);

    scl_debug!(
        "Linked {} records, {} data sets, {} report and {} GSE blocks",
        linker.declarations.len(),
        data_sets.len(),
        report_controls.len(),
        gse_controls.len()
    );

    StaticModel {
        ied_name: model.name.clone(),
        source_name: config.source_name.clone(),
        declarations: linker.declarations,
        data_sets,
        report_controls,
        gse_controls,
        initializers: linker.initializers,
    }
}

/// Record name of a logical device.
fn device_name(ld: &LogicalDevice) -> String {
    format!("{}_{}", IED_MODEL_NAME, ld.inst)
}

fn child_name(parent: &str, name: &str) -> String {
    format!("{}_{}", parent, name)
}

struct Linker<'m> {
    model: &'m IedModel,
    declarations: Vec<Declaration>,
    initializers: Vec<Initializer>,
}

impl Linker<'_> {
    fn link_device(&mut self, ld: &LogicalDevice, next: Option<&LogicalDevice>) {
        let name = device_name(ld);
        self.declarations.push(Declaration {
            name: name.clone(),
            label: ld.qualified_name(&self.model.name),
            parent: Some(IED_MODEL_NAME.to_string()),
            sibling: next.map(device_name),
            first_child: ld.logical_nodes.first().map(|ln| child_name(&name, &ln.name)),
            payload: NodePayload::LogicalDevice,
        });

        for (i, ln) in ld.logical_nodes.iter().enumerate() {
            let sibling = ld
                .logical_nodes
                .get(i + 1)
                .map(|n| child_name(&name, &n.name));
            self.link_node(&name, ln, sibling);
        }
    }

    fn link_node(&mut self, parent: &str, ln: &LogicalNode, sibling: Option<String>) {
        let name = child_name(parent, &ln.name);
        self.declarations.push(Declaration {
            name: name.clone(),
            label: ln.name.clone(),
            parent: Some(parent.to_string()),
            sibling,
            first_child: ln.data_objects.first().map(|d| child_name(&name, &d.name)),
            payload: NodePayload::LogicalNode,
        });
        self.link_objects(&name, &ln.data_objects, None);
    }

    /// Links a run of data objects. The last one continues into `tail`, the
    /// first attribute of the same parent, when there is one.
    fn link_objects(&mut self, parent: &str, objects: &[DataObject], tail: Option<String>) {
        for (i, object) in objects.iter().enumerate() {
            let name = child_name(parent, &object.name);
            let sibling = match objects.get(i + 1) {
                Some(next) => Some(child_name(parent, &next.name)),
                None => tail.clone(),
            };
            let first_object = object
                .sub_data_objects
                .first()
                .map(|d| child_name(&name, &d.name));
            let first_attribute = object
                .data_attributes
                .first()
                .map(|a| child_name(&name, &a.name));

            self.declarations.push(Declaration {
                name: name.clone(),
                label: object.name.clone(),
                parent: Some(parent.to_string()),
                sibling,
                first_child: first_object.or_else(|| first_attribute.clone()),
                payload: NodePayload::DataObject {
                    count: object.count,
                },
            });

            self.link_objects(&name, &object.sub_data_objects, first_attribute);
            self.link_attributes(&name, &object.data_attributes);
        }
    }

    fn link_attributes(&mut self, parent: &str, attributes: &[DataAttribute]) {
        for (i, attr) in attributes.iter().enumerate() {
            let name = child_name(parent, &attr.name);
            let short_address = attr.numeric_short_address().unwrap_or_else(|raw| {
                scl_warn!("Short address '{}' of {} is not a number, using 0", raw, name);
                0
            });

            self.declarations.push(Declaration {
                name: name.clone(),
                label: attr.name.clone(),
                parent: Some(parent.to_string()),
                sibling: attributes.get(i + 1).map(|a| child_name(parent, &a.name)),
                first_child: attr
                    .sub_data_attributes
                    .first()
                    .map(|a| child_name(&name, &a.name)),
                payload: NodePayload::DataAttribute {
                    count: attr.count,
                    fc: attr.fc,
                    kind: attr.kind,
                    trigger_options: attr.trigger_options.bits(),
                    short_address,
                },
            });

            self.link_attributes(&name, &attr.sub_data_attributes);

            if let Some(value) = &attr.value {
                match initializer_expression(attr.kind, value) {
                    Some(expression) => self.initializers.push(Initializer {
                        target: name,
                        expression,
                    }),
                    None => scl_warn!(
                        "No initializer for default value of {} (type {})",
                        name,
                        attr.kind.c_name()
                    ),
                }
            }
        }
    }
}

/// The `MmsValue` constructor call for a default value.
fn initializer_expression(kind: AttributeKind, value: &DataModelValue) -> Option<String> {
    let expression = match (kind, value) {
        (AttributeKind::Int64 | AttributeKind::Int128, DataModelValue::Integer(v)) => {
            format!("MmsValue_newIntegerFromInt64({})", v)
        }
        (_, DataModelValue::Integer(v)) => format!("MmsValue_newIntegerFromInt32({})", v),
        (_, DataModelValue::Unsigned(v)) => format!("MmsValue_newUnsignedFromUint32({})", v),
        (_, DataModelValue::Boolean(v)) => format!("MmsValue_newBoolean({})", v),
        (AttributeKind::UnicodeString255, DataModelValue::Text(s)) => {
            format!("MmsValue_newMmsString({})", c_string(s))
        }
        (_, DataModelValue::Text(s)) => format!("MmsValue_newVisibleString({})", c_string(s)),
        (AttributeKind::Float64, DataModelValue::Float(s)) => format!("MmsValue_newDouble({})", s),
        (_, DataModelValue::Float(s)) => format!("MmsValue_newFloat({})", s),
        (_, DataModelValue::Raw(_)) => return None,
    };
    Some(expression)
}

/// Qualified name of the logical device `ld_inst`, falling back to `iedName + inst`.
fn logical_device_name(model: &IedModel, ld_inst: &str) -> String {
    model
        .logical_devices
        .iter()
        .find(|ld| ld.inst == ld_inst)
        .map(|ld| ld.qualified_name(&model.name))
        .unwrap_or_else(|| format!("{}{}", model.name, ld_inst))
}

fn link_data_sets(model: &IedModel) -> Vec<DataSetDeclaration> {
    // Phase 1: names of the global list.
    let pending: Vec<_> = model
        .logical_nodes()
        .flat_map(|(ld, ln)| {
            ln.data_sets.iter().map(move |ds| {
                let name = format!("ds_{}_{}_{}", ld.inst, ln.name, ds.name);
                (name, ld, ln, ds)
            })
        })
        .collect();

    // Phase 2: bodies.
    pending
        .iter()
        .enumerate()
        .map(|(i, (name, ld, ln, ds))| {
            let entry_name = |n: usize| format!("{}_fcda{}", name, n);
            let entries = ds
                .fcda
                .iter()
                .enumerate()
                .map(|(n, fcda)| DataSetEntryDeclaration {
                    name: entry_name(n),
                    logical_device: logical_device_name(model, &fcda.ld_inst),
                    variable: fcda.mms_path(),
                    index: -1,
                    sibling: (n + 1 < ds.fcda.len()).then(|| entry_name(n + 1)),
                })
                .collect();

            DataSetDeclaration {
                name: name.clone(),
                logical_device: ld.qualified_name(&model.name),
                qualified_name: format!("{}${}", ln.name, ds.name),
                entries,
                sibling: pending.get(i + 1).map(|p| p.0.clone()),
            }
        })
        .collect()
}

fn link_report_controls(model: &IedModel, config: &GeneratorConfig) -> Vec<ReportControlDeclaration> {
    // Phase 1: one entry per report instance, numbered per logical node.
    let mut pending = Vec::new();
    for (ld, ln) in model.logical_nodes() {
        let ln_name = child_name(&device_name(ld), &ln.name);
        let instances = ln
            .report_controls
            .iter()
            .flat_map(|rcb| rcb.instance_names().into_iter().map(move |n| (rcb, n)));
        for (number, (rcb, instance)) in instances.enumerate() {
            let name = format!("{}_report{}", ln_name, number);
            pending.push((name, ln_name.clone(), rcb, instance));
        }
    }

    // Phase 2: bodies with the successor known.
    pending
        .iter()
        .enumerate()
        .map(|(i, (name, parent, rcb, instance))| ReportControlDeclaration {
            name: name.clone(),
            parent: parent.clone(),
            rcb_name: instance.clone(),
            rpt_id: rcb.rpt_id.clone(),
            buffered: rcb.buffered,
            data_set: rcb.data_set.clone(),
            conf_ref: rcb.conf_ref,
            trigger_options: rcb
                .trigger_options
                .unwrap_or(config.default_trigger_options)
                .bits(),
            option_fields: rcb
                .option_fields
                .unwrap_or(config.default_option_fields)
                .bits(),
            buffer_time: rcb.buffer_time,
            integrity_period: rcb.integrity_period.unwrap_or(0),
            sibling: pending.get(i + 1).map(|p| p.0.clone()),
        })
        .collect()
}

fn link_gse_controls(model: &IedModel, addresses: &AddressResolver<'_>) -> Vec<GseControlDeclaration> {
    let mut pending = Vec::new();
    for (ld, ln) in model.logical_nodes() {
        let ln_name = child_name(&device_name(ld), &ln.name);
        for (number, gse) in ln.gse_controls.iter().enumerate() {
            let name = format!("{}_gse{}", ln_name, number);
            pending.push((name, ln_name.clone(), ld, gse));
        }
    }

    pending
        .iter()
        .enumerate()
        .map(|(i, (name, parent, ld, gse))| GseControlDeclaration {
            name: name.clone(),
            parent: parent.clone(),
            cb_name: gse.name.clone(),
            app_id: gse.app_id.clone(),
            data_set: gse.data_set.clone(),
            conf_rev: gse.conf_rev,
            fixed_offsets: gse.fixed_offsets,
            address: addresses
                .lookup_address(&ld.inst, &gse.name)
                .map(|a| (format!("{}_address", name), *a)),
            sibling: pending.get(i + 1).map(|p| p.0.clone()),
        })
        .collect()
}
