// crates/iec61850-scl/src/codegen/c_source.rs

//! Prints a [`StaticModel`] as C source for the runtime's `model.h`.

use super::{IED_MODEL_NAME, NodePayload, StaticModel};
use crate::error::SclError;
use alloc::format;
use alloc::string::String;
use core::fmt::Write;

/// The generated translation unit and its header.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GeneratedSources {
    pub c_source: String,
    pub header: String,
}

/// Quotes `s` as a C string literal.
pub(crate) fn c_string(s: &str) -> String {
    let mut out = String::with_capacity(s.len() + 2);
    out.push('"');
    for c in s.chars() {
        match c {
            '"' => out.push_str("\\\""),
            '\\' => out.push_str("\\\\"),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\t' => out.push_str("\\t"),
            _ => out.push(c),
        }
    }
    out.push('"');
    out
}

fn c_string_or_null(s: Option<&str>) -> String {
    s.map(c_string).unwrap_or_else(|| String::from("NULL"))
}

fn node_ref(name: Option<&str>) -> String {
    match name {
        Some(n) => format!("(ModelNode*) &{}", n),
        None => String::from("NULL"),
    }
}

fn pointer_or_null(name: Option<&str>) -> String {
    match name {
        Some(n) => format!("&{}", n),
        None => String::from("NULL"),
    }
}

impl StaticModel {
    /// Renders `static_model.c` and `static_model.h`.
    pub fn render_c(&self) -> Result<GeneratedSources, SclError> {
        self.render_c_named("static_model")
    }

    /// Renders the sources for files named `<stem>.c` and `<stem>.h`.
    pub fn render_c_named(&self, stem: &str) -> Result<GeneratedSources, SclError> {
        Ok(GeneratedSources {
            c_source: self.render_source(stem)?,
            header: self.render_header(stem)?,
        })
    }

    fn render_source(&self, stem: &str) -> Result<String, SclError> {
        let mut out = String::new();
        writeln!(out, "/*")?;
        writeln!(out, " * {}.c", stem)?;
        writeln!(out, " *")?;
        writeln!(out, " * automatically generated from {}", self.source_name)?;
        writeln!(out, " */")?;
        writeln!(out, "#include <stdlib.h>")?;
        writeln!(out, "#include \"model.h\"")?;
        writeln!(out)?;

        // --- Forward declarations ---
        writeln!(out, "extern IedModel {};", IED_MODEL_NAME)?;
        writeln!(out, "static void initializeValues();")?;
        for decl in &self.declarations {
            writeln!(out, "extern {} {};", decl.kind().c_type(), decl.name)?;
        }
        for ds in &self.data_sets {
            writeln!(out, "extern DataSet {};", ds.name)?;
            for entry in &ds.entries {
                writeln!(out, "extern DataSetEntry {};", entry.name)?;
            }
        }
        for rcb in &self.report_controls {
            writeln!(out, "extern ReportControlBlock {};", rcb.name)?;
        }
        for gse in &self.gse_controls {
            if let Some((address, _)) = &gse.address {
                writeln!(out, "extern PhyComAddress {};", address)?;
            }
            writeln!(out, "extern GSEControlBlock {};", gse.name)?;
        }
        writeln!(out)?;

        // --- Data sets ---
        for ds in &self.data_sets {
            for entry in &ds.entries {
                writeln!(out, "DataSetEntry {} = {{", entry.name)?;
                writeln!(out, "  {},", c_string(&entry.logical_device))?;
                writeln!(out, "  {},", c_string(&entry.variable))?;
                writeln!(out, "  {},", entry.index)?;
                writeln!(out, "  NULL,")?;
                writeln!(out, "  NULL,")?;
                writeln!(out, "  {}", pointer_or_null(entry.sibling.as_deref()))?;
                writeln!(out, "}};\n")?;
            }
            writeln!(out, "DataSet {} = {{", ds.name)?;
            writeln!(out, "  {},", c_string(&ds.logical_device))?;
            writeln!(out, "  {},", c_string(&ds.qualified_name))?;
            writeln!(out, "  {},", ds.entries.len())?;
            writeln!(
                out,
                "  {},",
                pointer_or_null(ds.entries.first().map(|e| e.name.as_str()))
            )?;
            writeln!(out, "  {}", pointer_or_null(ds.sibling.as_deref()))?;
            writeln!(out, "}};\n")?;
        }

        // --- Model tree ---
        for decl in &self.declarations {
            writeln!(out, "{} {} = {{", decl.kind().c_type(), decl.name)?;
            writeln!(out, "    {},", decl.kind().model_type())?;
            writeln!(out, "    {},", c_string(&decl.label))?;
            writeln!(out, "    {},", node_ref(decl.parent.as_deref()))?;
            writeln!(out, "    {},", node_ref(decl.sibling.as_deref()))?;
            match &decl.payload {
                NodePayload::LogicalDevice | NodePayload::LogicalNode => {
                    writeln!(out, "    {}", node_ref(decl.first_child.as_deref()))?;
                }
                NodePayload::DataObject { count } => {
                    writeln!(out, "    {},", node_ref(decl.first_child.as_deref()))?;
                    writeln!(out, "    {}", count)?;
                }
                NodePayload::DataAttribute {
                    count,
                    fc,
                    kind,
                    trigger_options,
                    short_address,
                } => {
                    writeln!(out, "    {},", node_ref(decl.first_child.as_deref()))?;
                    writeln!(out, "    {},", count)?;
                    writeln!(out, "    {},", fc.as_str())?;
                    writeln!(out, "    {},", kind.c_name())?;
                    writeln!(out, "    {},", trigger_options)?;
                    writeln!(out, "    NULL,")?;
                    writeln!(out, "    {}", short_address)?;
                }
            }
            writeln!(out, "}};\n")?;
        }

        // --- Control blocks ---
        for rcb in &self.report_controls {
            writeln!(
                out,
                "ReportControlBlock {} = {{&{}, {}, {}, {}, {}, {}, {}, {}, {}, {}, {}}};",
                rcb.name,
                rcb.parent,
                c_string(&rcb.rcb_name),
                c_string_or_null(rcb.rpt_id.as_deref()),
                rcb.buffered,
                c_string_or_null(rcb.data_set.as_deref()),
                rcb.conf_ref,
                rcb.trigger_options,
                rcb.option_fields,
                rcb.buffer_time,
                rcb.integrity_period,
                pointer_or_null(rcb.sibling.as_deref())
            )?;
        }
        writeln!(out)?;

        for gse in &self.gse_controls {
            if let Some((name, address)) = &gse.address {
                let mac = address
                    .mac_address
                    .iter()
                    .map(|b| format!("0x{:02x}", b))
                    .collect::<alloc::vec::Vec<_>>()
                    .join(", ");
                writeln!(out, "PhyComAddress {} = {{", name)?;
                writeln!(out, "  {},", address.vlan_priority)?;
                writeln!(out, "  {},", address.vlan_id)?;
                writeln!(out, "  {},", address.app_id)?;
                writeln!(out, "  {{{}}}", mac)?;
                writeln!(out, "}};\n")?;
            }
            writeln!(
                out,
                "GSEControlBlock {} = {{&{}, {}, {}, {}, {}, {}, {}, {}}};",
                gse.name,
                gse.parent,
                c_string(&gse.cb_name),
                c_string_or_null(gse.app_id.as_deref()),
                c_string_or_null(gse.data_set.as_deref()),
                gse.conf_rev,
                gse.fixed_offsets,
                pointer_or_null(gse.address.as_ref().map(|(n, _)| n.as_str())),
                pointer_or_null(gse.sibling.as_deref())
            )?;
        }
        writeln!(out)?;

        // --- Root ---
        writeln!(out, "IedModel {} = {{", IED_MODEL_NAME)?;
        writeln!(out, "    {},", c_string(&self.ied_name))?;
        writeln!(
            out,
            "    {},",
            pointer_or_null(self.first_logical_device().map(|d| d.name.as_str()))
        )?;
        writeln!(
            out,
            "    {},",
            pointer_or_null(self.data_sets.first().map(|d| d.name.as_str()))
        )?;
        writeln!(
            out,
            "    {},",
            pointer_or_null(self.report_controls.first().map(|r| r.name.as_str()))
        )?;
        writeln!(
            out,
            "    {},",
            pointer_or_null(self.gse_controls.first().map(|g| g.name.as_str()))
        )?;
        writeln!(out, "    initializeValues")?;
        writeln!(out, "}};")?;

        // --- Deferred values ---
        writeln!(out, "\nstatic void\ninitializeValues()")?;
        writeln!(out, "{{")?;
        for init in &self.initializers {
            writeln!(out, "    {}.mmsValue = {};", init.target, init.expression)?;
        }
        writeln!(out, "}}")?;
        Ok(out)
    }

    fn render_header(&self, stem: &str) -> Result<String, SclError> {
        let guard: String = stem
            .chars()
            .map(|c| if c.is_ascii_alphanumeric() { c.to_ascii_uppercase() } else { '_' })
            .collect();

        let mut out = String::new();
        writeln!(out, "/*")?;
        writeln!(out, " * {}.h", stem)?;
        writeln!(out, " *")?;
        writeln!(out, " * automatically generated from {}", self.source_name)?;
        writeln!(out, " */\n")?;
        writeln!(out, "#ifndef {}_H_", guard)?;
        writeln!(out, "#define {}_H_\n", guard)?;
        writeln!(out, "#include <stdlib.h>")?;
        writeln!(out, "#include \"model.h\"")?;
        writeln!(out)?;

        writeln!(out, "extern IedModel {};", IED_MODEL_NAME)?;
        for decl in &self.declarations {
            writeln!(out, "extern {} {};", decl.kind().c_type(), decl.name)?;
        }
        writeln!(out)?;

        // iedModel_LD0_MMXU1 -> IEDMODEL_LD0_MMXU1
        for decl in &self.declarations {
            let suffix = decl.name.strip_prefix(IED_MODEL_NAME).unwrap_or(&decl.name);
            writeln!(out, "#define IEDMODEL{} (&{})", suffix, decl.name)?;
        }

        writeln!(out)?;
        writeln!(out, "#endif /* {}_H_ */", guard)?;
        Ok(out)
    }
}
