// crates/iec61850-scl/src/resolver/instance.rs

//! Stamps concrete object trees out of the registry's templates.

use super::values::convert_value;
use crate::error::SclError;
use crate::registry::{AttributeDefinition, ResolutionPath, TemplateKind, TypeRegistry};
use crate::types::{
    AttributeKind, DataAttribute, DataObject, FunctionalConstraint, LogicalNode, TriggerOptions,
};
use alloc::string::{String, ToString};
use alloc::vec::Vec;

/// Expands logical node types into fresh, independently owned trees.
///
/// Every call produces a new tree; nothing is shared between two nodes of the
/// same type.
#[derive(Debug, Clone, Copy)]
pub struct InstanceBuilder<'r> {
    registry: &'r TypeRegistry,
}

/// What a `BDA` inherits from the attribute that contains it.
#[derive(Clone, Copy)]
struct Inherited {
    fc: FunctionalConstraint,
    trigger_options: TriggerOptions,
}

impl<'r> InstanceBuilder<'r> {
    pub fn new(registry: &'r TypeRegistry) -> Self {
        Self { registry }
    }

    pub fn registry(&self) -> &'r TypeRegistry {
        self.registry
    }

    /// Expands the `LNodeType` `ln_type` into a logical node called `name`.
    ///
    /// The returned node has no control blocks and an empty `ld_inst`; the
    /// IED builder fills those in.
    pub fn expand_logical_node(&self, name: &str, ln_type: &str) -> Result<LogicalNode, SclError> {
        let mut path = ResolutionPath::default();
        let id = self.registry.resolve_id(TemplateKind::LogicalNode, ln_type)?;
        path.enter(id, self.registry)?;

        let template = self.registry.logical_node(ln_type)?;
        let data_objects = template
            .data_objects
            .iter()
            .map(|d| self.expand_data_object(&d.name, &d.type_name, 0, &mut path))
            .collect::<Result<Vec<_>, _>>()?;

        path.leave();
        Ok(LogicalNode {
            name: name.to_string(),
            ln_class: template.ln_class.clone(),
            ln_type: ln_type.to_string(),
            ld_inst: String::new(),
            data_objects,
            ..Default::default()
        })
    }

    fn expand_data_object(
        &self,
        name: &str,
        type_name: &str,
        count: u32,
        path: &mut ResolutionPath,
    ) -> Result<DataObject, SclError> {
        let id = self.registry.resolve_id(TemplateKind::DataObject, type_name)?;
        path.enter(id, self.registry)?;

        let template = self.registry.data_object(type_name)?;
        let sub_data_objects = template
            .sub_objects
            .iter()
            .map(|sdo| self.expand_data_object(&sdo.name, &sdo.type_name, sdo.count, path))
            .collect::<Result<Vec<_>, _>>()?;
        let data_attributes = template
            .attributes
            .iter()
            .map(|da| self.expand_attribute(da, None, path))
            .collect::<Result<Vec<_>, _>>()?;

        path.leave();
        Ok(DataObject {
            name: name.to_string(),
            count,
            type_name: type_name.to_string(),
            sub_data_objects,
            data_attributes,
        })
    }

    fn expand_attribute(
        &self,
        def: &AttributeDefinition,
        parent: Option<Inherited>,
        path: &mut ResolutionPath,
    ) -> Result<DataAttribute, SclError> {
        let fc = def
            .fc
            .or(parent.map(|p| p.fc))
            .ok_or(SclError::MissingRequiredAttribute {
                element: "BDA",
                attribute: "fc",
            })?;
        let trigger_options = match parent {
            Some(p) => def.trigger_options | p.trigger_options,
            None => def.trigger_options,
        };

        let mut sub_data_attributes = Vec::new();
        if def.kind == AttributeKind::Constructed {
            // Presence of the type is checked when the definition is loaded.
            let nested = def.type_name.as_deref().unwrap_or_default();
            let id = self.registry.resolve_id(TemplateKind::DataAttribute, nested)?;
            path.enter(id, self.registry)?;
            let inherited = Inherited {
                fc,
                trigger_options,
            };
            for bda in &self.registry.data_attribute(nested)?.attributes {
                sub_data_attributes.push(self.expand_attribute(bda, Some(inherited), path)?);
            }
            path.leave();
        }

        let value = match &def.default_value {
            Some(literal) => convert_value(
                self.registry,
                def.kind,
                def.type_name.as_deref(),
                literal,
                &def.name,
            )?,
            None => None,
        };

        Ok(DataAttribute {
            name: def.name.clone(),
            count: def.count,
            fc,
            kind: def.kind,
            type_name: def.type_name.clone(),
            trigger_options,
            sub_data_attributes,
            value,
            short_address: None,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::registry::{
        DataAttributeTemplate, DataObjectReference, DataObjectTemplate, LogicalNodeTemplate,
        SubObjectDefinition, Template,
    };
    use crate::types::DataModelValue;
    use alloc::vec;

    fn leaf(name: &str, kind: AttributeKind, fc: Option<FunctionalConstraint>) -> AttributeDefinition {
        AttributeDefinition {
            name: name.to_string(),
            b_type: String::new(),
            kind,
            type_name: None,
            fc,
            count: 0,
            trigger_options: TriggerOptions::empty(),
            default_value: None,
        }
    }

    /// MMXU-like type: TotW (MV) with mag (AnalogueValue) and q, plus a
    /// WYE-like object with one SDO.
    fn registry() -> TypeRegistry {
        let mut registry = TypeRegistry::new();
        registry.declare(Template::DataAttribute(DataAttributeTemplate {
            name: "AnalogueValue".to_string(),
            attributes: vec![
                leaf("f", AttributeKind::Float32, None),
                leaf("i", AttributeKind::Int32, None),
            ],
        }));

        let mut mag = leaf("mag", AttributeKind::Constructed, Some(FunctionalConstraint::MX));
        mag.type_name = Some("AnalogueValue".to_string());
        mag.trigger_options = TriggerOptions::DATA_CHANGED;
        let mut q = leaf("q", AttributeKind::Quality, Some(FunctionalConstraint::MX));
        q.trigger_options = TriggerOptions::QUALITY_CHANGED;
        registry.declare(Template::DataObject(DataObjectTemplate {
            name: "MV".to_string(),
            cdc: Some("MV".to_string()),
            sub_objects: vec![],
            attributes: vec![mag, q],
        }));

        let mut d = leaf("d", AttributeKind::VisibleString255, Some(FunctionalConstraint::DC));
        d.default_value = Some("phase A".to_string());
        registry.declare(Template::DataObject(DataObjectTemplate {
            name: "WYE".to_string(),
            cdc: Some("WYE".to_string()),
            sub_objects: vec![SubObjectDefinition {
                name: "phsA".to_string(),
                type_name: "MV".to_string(),
                count: 0,
            }],
            attributes: vec![d],
        }));

        registry.declare(Template::LogicalNode(LogicalNodeTemplate {
            name: "MMXU_T".to_string(),
            ln_class: "MMXU".to_string(),
            data_objects: vec![
                DataObjectReference {
                    name: "TotW".to_string(),
                    type_name: "MV".to_string(),
                },
                DataObjectReference {
                    name: "A".to_string(),
                    type_name: "WYE".to_string(),
                },
            ],
        }));
        registry
    }

    #[test]
    fn test_expand_preserves_order_and_inherits_fc() {
        let registry = registry();
        let builder = InstanceBuilder::new(&registry);
        let ln = builder.expand_logical_node("MMXU1", "MMXU_T").unwrap();

        assert_eq!(ln.ln_class, "MMXU");
        let names: Vec<_> = ln.data_objects.iter().map(|d| d.name.as_str()).collect();
        assert_eq!(names, ["TotW", "A"]);

        let mag = &ln.data_objects[0].data_attributes[0];
        assert_eq!(mag.kind, AttributeKind::Constructed);
        assert!(!mag.is_basic());
        let f = &mag.sub_data_attributes[0];
        assert_eq!(f.name, "f");
        assert_eq!(f.fc, FunctionalConstraint::MX);
        assert_eq!(f.trigger_options, TriggerOptions::DATA_CHANGED);

        let wye = &ln.data_objects[1];
        assert_eq!(wye.sub_data_objects[0].name, "phsA");
        assert_eq!(
            wye.data_attributes[0].value,
            Some(DataModelValue::Text("phase A".to_string()))
        );
    }

    #[test]
    fn test_expansions_are_independent_and_equal() {
        let registry = registry();
        let builder = InstanceBuilder::new(&registry);
        let first = builder.expand_logical_node("MMXU1", "MMXU_T").unwrap();
        let mut second = builder.expand_logical_node("MMXU1", "MMXU_T").unwrap();
        assert_eq!(first, second);

        second.data_objects[0].data_attributes[1].short_address = Some("7".to_string());
        assert_ne!(first, second);
        assert_eq!(first.data_objects[0].data_attributes[1].short_address, None);
    }

    #[test]
    fn test_cycle_during_expansion() {
        // Declared without check_closed: the builder must still terminate.
        let mut registry = TypeRegistry::new();
        let mut next = leaf("next", AttributeKind::Constructed, None);
        next.type_name = Some("Node".to_string());
        registry.declare(Template::DataAttribute(DataAttributeTemplate {
            name: "Node".to_string(),
            attributes: vec![next.clone()],
        }));
        next.fc = Some(FunctionalConstraint::CF);
        registry.declare(Template::DataObject(DataObjectTemplate {
            name: "ListDO".to_string(),
            cdc: None,
            sub_objects: vec![],
            attributes: vec![next],
        }));
        registry.declare(Template::LogicalNode(LogicalNodeTemplate {
            name: "T".to_string(),
            ln_class: "GGIO".to_string(),
            data_objects: vec![DataObjectReference {
                name: "L".to_string(),
                type_name: "ListDO".to_string(),
            }],
        }));

        let err = InstanceBuilder::new(&registry)
            .expand_logical_node("GGIO1", "T")
            .unwrap_err();
        assert!(matches!(err, SclError::CyclicTypeReference { .. }));
    }

    #[test]
    fn test_unknown_logical_node_type() {
        let registry = registry();
        let err = InstanceBuilder::new(&registry)
            .expand_logical_node("X", "Nope")
            .unwrap_err();
        assert!(matches!(
            err,
            SclError::UnresolvedTypeReference {
                kind: TemplateKind::LogicalNode,
                ..
            }
        ));
    }
}
