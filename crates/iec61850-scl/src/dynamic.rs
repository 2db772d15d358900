// crates/iec61850-scl/src/dynamic.rs

//! The dynamic back end: a nested text description loaded by the server at
//! run time.
//!
//! ```text
//! MODEL(IED1){
//! LD(IED1LD0){
//! LN(LLN0){
//! DO(Mod 0){
//! DA(stVal 0 12 0 1 0)=1;
//! }
//! DS(Events){
//! DE(GGIO1$ST$Ind1$stVal);
//! }
//! RC(brcbEV01 - 1 Events 1 16 32 0 0);
//! GC(gcbEV events Events 1 0){
//! PA(4 1 4096 010ccd010001);
//! }
//! }
//! }
//! }
//! ```

use crate::communication::AddressResolver;
use crate::config::GeneratorConfig;
use crate::error::SclError;
use crate::log::{scl_warn, LogMetadata, NodeContext};
use crate::types::{DataAttribute, DataModelValue, DataObject, IedModel, LogicalNode};
use alloc::string::String;
use core::fmt::Write;

/// Renders the concrete model in the dynamic model grammar.
pub fn generate_dynamic_model(
    model: &IedModel,
    addresses: &AddressResolver<'_>,
    config: &GeneratorConfig,
) -> Result<String, SclError> {
    let mut out = String::new();
    writeln!(out, "MODEL({}){{", model.name)?;
    for ld in &model.logical_devices {
        writeln!(out, "LD({}){{", ld.qualified_name(&model.name))?;
        for ln in &ld.logical_nodes {
            let ctx = NodeContext {
                ied: &model.name,
                logical_device: &ld.inst,
                logical_node: &ln.name,
            };
            let mut emitter = Emitter {
                out: &mut out,
                ctx: &ctx,
            };
            emitter.logical_node(ln, addresses, config)?;
        }
        writeln!(out, "}}")?;
    }
    writeln!(out, "}}")?;
    Ok(out)
}

struct Emitter<'a, C: LogMetadata> {
    out: &'a mut String,
    ctx: &'a C,
}

impl<C: LogMetadata> Emitter<'_, C> {
    fn logical_node(
        &mut self,
        ln: &LogicalNode,
        addresses: &AddressResolver<'_>,
        config: &GeneratorConfig,
    ) -> Result<(), SclError> {
        writeln!(self.out, "LN({}){{", ln.name)?;

        for object in &ln.data_objects {
            self.data_object(object)?;
        }

        for ds in &ln.data_sets {
            writeln!(self.out, "DS({}){{", ds.name)?;
            for fcda in &ds.fcda {
                writeln!(self.out, "DE({});", fcda.mms_path())?;
            }
            writeln!(self.out, "}}")?;
        }

        for rcb in &ln.report_controls {
            let trigger_options = rcb
                .trigger_options
                .unwrap_or(config.default_trigger_options);
            let option_fields = rcb.option_fields.unwrap_or(config.default_option_fields);
            for instance in rcb.instance_names() {
                writeln!(
                    self.out,
                    "RC({} {} {} {} {} {} {} {} {});",
                    instance,
                    rcb.rpt_id.as_deref().unwrap_or("-"),
                    u8::from(rcb.buffered),
                    rcb.data_set.as_deref().unwrap_or("-"),
                    rcb.conf_ref,
                    trigger_options.bits(),
                    option_fields.bits(),
                    rcb.buffer_time,
                    rcb.integrity_period.unwrap_or(0)
                )?;
            }
        }

        for gse in &ln.gse_controls {
            write!(
                self.out,
                "GC({} {} {} {} {})",
                gse.name,
                gse.app_id.as_deref().unwrap_or("-"),
                gse.data_set.as_deref().unwrap_or("-"),
                gse.conf_rev,
                u8::from(gse.fixed_offsets)
            )?;
            match addresses.lookup_address(&ln.ld_inst, &gse.name) {
                Some(address) => {
                    writeln!(self.out, "{{")?;
                    writeln!(
                        self.out,
                        "PA({} {} {} {});",
                        address.vlan_priority,
                        address.vlan_id,
                        address.app_id,
                        hex::encode(address.mac_address)
                    )?;
                    writeln!(self.out, "}}")?;
                }
                None => writeln!(self.out, ";")?,
            }
        }

        writeln!(self.out, "}}")?;
        Ok(())
    }

    fn data_object(&mut self, object: &DataObject) -> Result<(), SclError> {
        writeln!(self.out, "DO({} {}){{", object.name, object.count)?;
        for sub in &object.sub_data_objects {
            self.data_object(sub)?;
        }
        for attr in &object.data_attributes {
            self.data_attribute(attr)?;
        }
        writeln!(self.out, "}}")?;
        Ok(())
    }

    fn data_attribute(&mut self, attr: &DataAttribute) -> Result<(), SclError> {
        let short_address = attr.numeric_short_address().unwrap_or_else(|raw| {
            scl_warn!(
                self.ctx,
                "Short address '{}' of '{}' is not a number, using 0",
                raw,
                attr.name
            );
            0
        });
        write!(
            self.out,
            "DA({} {} {} {} {} {})",
            attr.name,
            attr.count,
            attr.kind.code(),
            attr.fc.code(),
            attr.trigger_options.bits(),
            short_address
        )?;

        if attr.is_basic() {
            if let Some(value) = &attr.value {
                match value {
                    DataModelValue::Integer(v) => write!(self.out, "={}", v)?,
                    DataModelValue::Unsigned(v) => write!(self.out, "={}", v)?,
                    DataModelValue::Boolean(true) => write!(self.out, "=1")?,
                    DataModelValue::Boolean(false) => {}
                    DataModelValue::Text(s) => write!(self.out, "={}", quoted(s))?,
                    DataModelValue::Float(s) => write!(self.out, "={}", s)?,
                    DataModelValue::Raw(_) => scl_warn!(
                        self.ctx,
                        "No value rendering for '{}' of type {}",
                        attr.name,
                        attr.kind.c_name()
                    ),
                }
            }
            writeln!(self.out, ";")?;
        } else {
            writeln!(self.out, "{{")?;
            for sub in &attr.sub_data_attributes {
                self.data_attribute(sub)?;
            }
            writeln!(self.out, "}}")?;
        }
        Ok(())
    }
}

/// Quotes a string value; `"` and `\` are escaped with a backslash.
fn quoted(s: &str) -> String {
    let mut out = String::with_capacity(s.len() + 2);
    out.push('"');
    for c in s.chars() {
        if c == '"' || c == '\\' {
            out.push('\\');
        }
        out.push(c);
    }
    out.push('"');
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{
        AttributeKind, FunctionalConstraint, LogicalDevice, TriggerOptions,
    };
    use alloc::string::ToString;
    use alloc::vec;

    fn boolean(name: &str, value: bool) -> DataAttribute {
        DataAttribute {
            name: name.to_string(),
            count: 0,
            fc: FunctionalConstraint::ST,
            kind: AttributeKind::Boolean,
            type_name: None,
            trigger_options: TriggerOptions::DATA_CHANGED,
            sub_data_attributes: vec![],
            value: Some(DataModelValue::Boolean(value)),
            short_address: None,
        }
    }

    fn model(attrs: vec::Vec<DataAttribute>) -> IedModel {
        IedModel {
            name: "IED1".to_string(),
            access_point: "AP1".to_string(),
            logical_devices: vec![LogicalDevice {
                inst: "LD0".to_string(),
                ld_name: None,
                logical_nodes: vec![LogicalNode {
                    name: "GGIO1".to_string(),
                    ld_inst: "LD0".to_string(),
                    data_objects: vec![DataObject {
                        name: "Ind".to_string(),
                        data_attributes: attrs,
                        ..Default::default()
                    }],
                    ..Default::default()
                }],
            }],
        }
    }

    #[test]
    fn test_boolean_defaults() {
        let text = generate_dynamic_model(
            &model(vec![boolean("on", true), boolean("off", false)]),
            &AddressResolver::empty(),
            &GeneratorConfig::default(),
        )
        .unwrap();
        assert!(text.contains("DA(on 0 0 0 1 0)=1;\n"));
        assert!(text.contains("DA(off 0 0 0 1 0);\n"));
    }

    #[test]
    fn test_block_nesting() {
        let text = generate_dynamic_model(
            &model(vec![]),
            &AddressResolver::empty(),
            &GeneratorConfig::default(),
        )
        .unwrap();
        assert_eq!(
            text,
            "MODEL(IED1){\nLD(IED1LD0){\nLN(GGIO1){\nDO(Ind 0){\n}\n}\n}\n}\n"
        );
    }

    #[test]
    fn test_bad_short_address_renders_zero() {
        let mut attr = boolean("x", false);
        attr.short_address = Some("reg:12".to_string());
        let text = generate_dynamic_model(
            &model(vec![attr]),
            &AddressResolver::empty(),
            &GeneratorConfig::default(),
        )
        .unwrap();
        assert!(text.contains("DA(x 0 0 0 1 0);"));
    }

    #[test]
    fn test_quoted_escapes() {
        assert_eq!(quoted("ACME"), "\"ACME\"");
        assert_eq!(quoted(r#"say "hi""#), r#""say \"hi\"""#);
        assert_eq!(quoted(r"C:\dir"), r#""C:\\dir""#);
    }
}
