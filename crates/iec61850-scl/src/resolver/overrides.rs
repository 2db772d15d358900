// crates/iec61850-scl/src/resolver/overrides.rs

//! Merges `DOI`/`SDI`/`DAI` instance values into an expanded logical node.

use super::values::convert_value;
use crate::error::SclError;
use crate::log::{scl_trace, scl_warn, NodeContext};
use crate::model::ied::{Dai, Doi, Sdi};
use crate::registry::TypeRegistry;
use crate::types::{DataAttribute, DataObject, LogicalNode};
use alloc::format;
use alloc::string::String;

/// Applies every `DOI` of a logical node declaration.
///
/// Paths that match nothing in the expanded tree are logged and skipped.
pub(crate) fn apply_instance_values(
    registry: &TypeRegistry,
    node: &mut LogicalNode,
    dois: &[Doi],
    ctx: &NodeContext<'_>,
) -> Result<(), SclError> {
    for doi in dois {
        let Some(name) = doi.name.as_deref() else {
            scl_warn!(ctx, "DOI without a name ignored");
            continue;
        };
        match node.data_objects.iter_mut().find(|d| d.name == name) {
            Some(object) => {
                let merger = Merger { registry, ctx };
                merger.into_object(object, &doi.sdi, &doi.dai, name)?;
            }
            None => scl_warn!(ctx, "DOI '{}' does not match any data object", name),
        }
    }
    Ok(())
}

struct Merger<'a> {
    registry: &'a TypeRegistry,
    ctx: &'a NodeContext<'a>,
}

impl Merger<'_> {
    fn into_object(
        &self,
        object: &mut DataObject,
        sdis: &[Sdi],
        dais: &[Dai],
        path: &str,
    ) -> Result<(), SclError> {
        for sdi in sdis {
            let Some(name) = sdi.name.as_deref() else {
                continue;
            };
            let child_path = format!("{}.{}", path, name);
            if let Some(sub) = object.sub_data_objects.iter_mut().find(|d| d.name == name) {
                self.into_object(sub, &sdi.sdi, &sdi.dai, &child_path)?;
            } else if let Some(attr) = object.data_attributes.iter_mut().find(|a| a.name == name) {
                self.into_attribute(attr, &sdi.sdi, &sdi.dai, &child_path)?;
            } else {
                self.unmatched(&child_path);
            }
        }
        for dai in dais {
            let Some(name) = dai.name.as_deref() else {
                continue;
            };
            let child_path = format!("{}.{}", path, name);
            match object.data_attributes.iter_mut().find(|a| a.name == name) {
                Some(attr) => self.set_value(attr, dai, &child_path)?,
                None => self.unmatched(&child_path),
            }
        }
        Ok(())
    }

    fn into_attribute(
        &self,
        attr: &mut DataAttribute,
        sdis: &[Sdi],
        dais: &[Dai],
        path: &str,
    ) -> Result<(), SclError> {
        for sdi in sdis {
            let Some(name) = sdi.name.as_deref() else {
                continue;
            };
            let child_path = format!("{}.{}", path, name);
            match attr.sub_data_attributes.iter_mut().find(|a| a.name == name) {
                Some(sub) => self.into_attribute(sub, &sdi.sdi, &sdi.dai, &child_path)?,
                None => self.unmatched(&child_path),
            }
        }
        for dai in dais {
            let Some(name) = dai.name.as_deref() else {
                continue;
            };
            let child_path = format!("{}.{}", path, name);
            match attr.sub_data_attributes.iter_mut().find(|a| a.name == name) {
                Some(sub) => self.set_value(sub, dai, &child_path)?,
                None => self.unmatched(&child_path),
            }
        }
        Ok(())
    }

    fn set_value(&self, attr: &mut DataAttribute, dai: &Dai, path: &str) -> Result<(), SclError> {
        if let Some(s_addr) = &dai.s_addr {
            attr.short_address = Some(String::from(s_addr.as_str()));
        }
        if let Some(val) = dai.val.first() {
            let value = convert_value(
                self.registry,
                attr.kind,
                attr.type_name.as_deref(),
                &val.value,
                path,
            )?;
            if value.is_some() {
                attr.value = value;
            } else {
                scl_warn!(self.ctx, "Value for structured attribute '{}' ignored", path);
            }
        }
        scl_trace!(self.ctx, "Applied instance value to '{}'", path);
        Ok(())
    }

    fn unmatched(&self, path: &str) {
        scl_warn!(self.ctx, "Instance value path '{}' does not match the type", path);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Val;
    use crate::types::{AttributeKind, DataModelValue, FunctionalConstraint, TriggerOptions};
    use alloc::string::ToString;
    use alloc::vec;
    use alloc::vec::Vec;

    const CTX: NodeContext<'static> = NodeContext {
        ied: "IED1",
        logical_device: "LD0",
        logical_node: "MMXU1",
    };

    fn float(name: &str) -> DataAttribute {
        DataAttribute {
            name: name.to_string(),
            count: 0,
            fc: FunctionalConstraint::MX,
            kind: AttributeKind::Float32,
            type_name: None,
            trigger_options: TriggerOptions::DATA_CHANGED,
            sub_data_attributes: vec![],
            value: None,
            short_address: None,
        }
    }

    fn dai(name: &str, value: &str, s_addr: Option<&str>) -> Dai {
        Dai {
            name: Some(name.to_string()),
            s_addr: s_addr.map(str::to_string),
            val: vec![Val {
                s_group: None,
                value: value.to_string(),
            }],
        }
    }

    /// `A.phsA.mag` and `A.phsB.mag` of a WYE-like object.
    fn node() -> LogicalNode {
        let phase = |name: &str| DataObject {
            name: name.to_string(),
            data_attributes: vec![float("mag")],
            ..Default::default()
        };
        LogicalNode {
            name: "MMXU1".to_string(),
            data_objects: vec![DataObject {
                name: "A".to_string(),
                sub_data_objects: vec![phase("phsA"), phase("phsB")],
                ..Default::default()
            }],
            ..Default::default()
        }
    }

    fn mag(node: &LogicalNode, phase: usize) -> &DataAttribute {
        &node.data_objects[0].sub_data_objects[phase].data_attributes[0]
    }

    #[test]
    fn test_sdi_into_sub_data_object() {
        let mut ln = node();
        let dois = vec![Doi {
            name: Some("A".to_string()),
            sdi: vec![Sdi {
                name: Some("phsB".to_string()),
                sdi: vec![],
                dai: vec![dai("mag", "2.5", Some("40"))],
            }],
            dai: vec![],
        }];
        apply_instance_values(&TypeRegistry::new(), &mut ln, &dois, &CTX).unwrap();

        assert_eq!(mag(&ln, 0).value, None);
        assert_eq!(mag(&ln, 1).value, Some(DataModelValue::Float("2.5".to_string())));
        assert_eq!(mag(&ln, 1).short_address.as_deref(), Some("40"));
    }

    #[test]
    fn test_unmatched_paths_leave_the_tree_unchanged() {
        let mut ln = node();
        let dois: Vec<Doi> = vec![
            Doi {
                name: Some("Hz".to_string()),
                ..Default::default()
            },
            Doi {
                name: Some("A".to_string()),
                sdi: vec![Sdi {
                    name: Some("phsC".to_string()),
                    sdi: vec![],
                    dai: vec![dai("mag", "1", None)],
                }],
                dai: vec![dai("mag", "1", None)],
            },
        ];
        apply_instance_values(&TypeRegistry::new(), &mut ln, &dois, &CTX).unwrap();
        assert_eq!(ln, node());
    }

    #[test]
    fn test_bad_value_fails() {
        let mut ln = node();
        let dois = vec![Doi {
            name: Some("A".to_string()),
            sdi: vec![Sdi {
                name: Some("phsA".to_string()),
                sdi: vec![],
                dai: vec![dai("mag", "fast", None)],
            }],
            dai: vec![],
        }];
        let err = apply_instance_values(&TypeRegistry::new(), &mut ln, &dois, &CTX).unwrap_err();
        assert!(matches!(
            err,
            SclError::InvalidValue { attribute, .. } if attribute == "A.phsA.mag"
        ));
    }
}
