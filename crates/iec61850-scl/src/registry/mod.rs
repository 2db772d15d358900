// crates/iec61850-scl/src/registry/mod.rs

//! The type-template registry.
//!
//! All `<DataTypeTemplates>` declarations are stored in an arena and indexed
//! by `(kind, id)`. Cross references stay name based; [`TypeRegistry::check_closed`]
//! walks the whole reference graph once to prove it is closed and acyclic.

use crate::error::SclError;
use crate::log::scl_warn;
use crate::parser::SclDocument;
use crate::types::AttributeKind;
use alloc::collections::{BTreeMap, BTreeSet};
use alloc::string::{String, ToString};
use alloc::vec::Vec;
use core::fmt;

mod kinds;
mod templates;

pub use kinds::{attribute_kind, builtin_enum_ordinal};
pub use templates::{
    AttributeDefinition, DataAttributeTemplate, DataObjectReference, DataObjectTemplate,
    EnumerationType, LogicalNodeTemplate, SubObjectDefinition,
};

/// The four template namespaces of `<DataTypeTemplates>`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum TemplateKind {
    LogicalNode,
    DataObject,
    DataAttribute,
    Enumeration,
}

impl fmt::Display for TemplateKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            TemplateKind::LogicalNode => "LNodeType",
            TemplateKind::DataObject => "DOType",
            TemplateKind::DataAttribute => "DAType",
            TemplateKind::Enumeration => "EnumType",
        };
        f.write_str(name)
    }
}

/// Handle of a template inside the registry arena.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct TemplateId(usize);

/// Any template stored in the registry.
#[derive(Debug, Clone, PartialEq)]
pub enum Template {
    LogicalNode(LogicalNodeTemplate),
    DataObject(DataObjectTemplate),
    DataAttribute(DataAttributeTemplate),
    Enumeration(EnumerationType),
}

impl Template {
    pub fn kind(&self) -> TemplateKind {
        match self {
            Template::LogicalNode(_) => TemplateKind::LogicalNode,
            Template::DataObject(_) => TemplateKind::DataObject,
            Template::DataAttribute(_) => TemplateKind::DataAttribute,
            Template::Enumeration(_) => TemplateKind::Enumeration,
        }
    }

    pub fn name(&self) -> &str {
        match self {
            Template::LogicalNode(t) => &t.name,
            Template::DataObject(t) => &t.name,
            Template::DataAttribute(t) => &t.name,
            Template::Enumeration(t) => &t.name,
        }
    }

    /// Outgoing references of this template in declaration order.
    fn references(&self) -> Vec<(TemplateKind, &str)> {
        match self {
            Template::LogicalNode(t) => t
                .data_objects
                .iter()
                .map(|d| (TemplateKind::DataObject, d.type_name.as_str()))
                .collect(),
            Template::DataObject(t) => t
                .sub_objects
                .iter()
                .map(|s| (TemplateKind::DataObject, s.type_name.as_str()))
                .chain(t.attributes.iter().filter_map(attribute_reference))
                .collect(),
            Template::DataAttribute(t) => {
                t.attributes.iter().filter_map(attribute_reference).collect()
            }
            Template::Enumeration(_) => Vec::new(),
        }
    }
}

/// The template an attribute definition points at, if it has to resolve.
fn attribute_reference(def: &AttributeDefinition) -> Option<(TemplateKind, &str)> {
    let name = def.type_name.as_deref()?;
    if def.kind == AttributeKind::Constructed {
        Some((TemplateKind::DataAttribute, name))
    } else if def.b_type == "Enum" {
        Some((TemplateKind::Enumeration, name))
    } else {
        None
    }
}

/// Tracks the templates currently being resolved, outermost first.
///
/// Entering a template that is already on the path means the template graph
/// contains a cycle through it.
#[derive(Debug, Default, Clone)]
pub struct ResolutionPath {
    stack: Vec<TemplateId>,
}

impl ResolutionPath {
    /// Pushes `id`, failing with `CyclicTypeReference` if it is already in progress.
    pub fn enter(&mut self, id: TemplateId, registry: &TypeRegistry) -> Result<(), SclError> {
        if self.stack.contains(&id) {
            let template = registry.get(id);
            return Err(SclError::CyclicTypeReference {
                kind: template.kind(),
                name: template.name().to_string(),
            });
        }
        self.stack.push(id);
        Ok(())
    }

    /// Pops the innermost template.
    pub fn leave(&mut self) {
        self.stack.pop();
    }

    pub fn depth(&self) -> usize {
        self.stack.len()
    }
}

/// Stores and resolves all type declarations of one document.
///
/// The registry is built once and is read-only afterwards.
#[derive(Debug, Default, Clone)]
pub struct TypeRegistry {
    arena: Vec<Template>,
    index: BTreeMap<(TemplateKind, String), TemplateId>,
}

impl TypeRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds the registry from the `<DataTypeTemplates>` of a document and
    /// validates that every reference resolves and no template contains itself.
    pub fn from_document(document: &SclDocument) -> Result<Self, SclError> {
        let raw = &document.templates;
        let mut registry = Self::new();

        for model in &raw.enum_type {
            registry.declare(Template::Enumeration(EnumerationType::from_model(model)?));
        }
        for model in &raw.da_type {
            registry.declare(Template::DataAttribute(DataAttributeTemplate::from_model(
                model,
            )?));
        }
        for model in &raw.do_type {
            registry.declare(Template::DataObject(DataObjectTemplate::from_model(model)?));
        }
        for model in &raw.ln_node_type {
            registry.declare(Template::LogicalNode(LogicalNodeTemplate::from_model(model)?));
        }

        registry.check_closed()?;
        log::debug!("Type registry holds {} templates", registry.len());
        Ok(registry)
    }

    /// Inserts a template under `(kind, name)`.
    ///
    /// A later declaration with a colliding name replaces the earlier one.
    pub fn declare(&mut self, template: Template) -> TemplateId {
        let key = (template.kind(), template.name().to_string());
        let id = TemplateId(self.arena.len());
        self.arena.push(template);
        if self.index.insert(key.clone(), id).is_some() {
            scl_warn!(
                "Duplicate {} '{}': the last declaration wins",
                key.0,
                key.1
            );
        }
        id
    }

    /// Looks up the handle of a template.
    pub fn resolve_id(&self, kind: TemplateKind, name: &str) -> Result<TemplateId, SclError> {
        self.index
            .get(&(kind, name.to_string()))
            .copied()
            .ok_or_else(|| SclError::UnresolvedTypeReference {
                kind,
                name: name.to_string(),
            })
    }

    /// Looks up a template by kind and name.
    pub fn resolve(&self, kind: TemplateKind, name: &str) -> Result<&Template, SclError> {
        self.resolve_id(kind, name).map(|id| self.get(id))
    }

    /// Returns the template behind a handle issued by this registry.
    pub fn get(&self, id: TemplateId) -> &Template {
        &self.arena[id.0]
    }

    pub fn logical_node(&self, name: &str) -> Result<&LogicalNodeTemplate, SclError> {
        match self.resolve(TemplateKind::LogicalNode, name)? {
            Template::LogicalNode(t) => Ok(t),
            _ => Err(unresolved(TemplateKind::LogicalNode, name)),
        }
    }

    pub fn data_object(&self, name: &str) -> Result<&DataObjectTemplate, SclError> {
        match self.resolve(TemplateKind::DataObject, name)? {
            Template::DataObject(t) => Ok(t),
            _ => Err(unresolved(TemplateKind::DataObject, name)),
        }
    }

    pub fn data_attribute(&self, name: &str) -> Result<&DataAttributeTemplate, SclError> {
        match self.resolve(TemplateKind::DataAttribute, name)? {
            Template::DataAttribute(t) => Ok(t),
            _ => Err(unresolved(TemplateKind::DataAttribute, name)),
        }
    }

    pub fn enumeration(&self, name: &str) -> Result<&EnumerationType, SclError> {
        match self.resolve(TemplateKind::Enumeration, name)? {
            Template::Enumeration(t) => Ok(t),
            _ => Err(unresolved(TemplateKind::Enumeration, name)),
        }
    }

    /// Number of live (non-shadowed) templates.
    pub fn len(&self) -> usize {
        self.index.len()
    }

    pub fn is_empty(&self) -> bool {
        self.index.is_empty()
    }

    /// Validates the whole reference graph.
    ///
    /// # Errors
    /// `UnresolvedTypeReference` for a dangling reference and
    /// `CyclicTypeReference` for a template that contains itself.
    pub fn check_closed(&self) -> Result<(), SclError> {
        let mut finished = BTreeSet::new();
        for id in self.index.values() {
            let mut path = ResolutionPath::default();
            self.visit(*id, &mut path, &mut finished)?;
        }
        Ok(())
    }

    fn visit(
        &self,
        id: TemplateId,
        path: &mut ResolutionPath,
        finished: &mut BTreeSet<TemplateId>,
    ) -> Result<(), SclError> {
        if finished.contains(&id) {
            return Ok(());
        }
        path.enter(id, self)?;
        for (kind, name) in self.get(id).references() {
            let child = self.resolve_id(kind, name)?;
            self.visit(child, path, finished)?;
        }
        path.leave();
        finished.insert(id);
        Ok(())
    }
}

fn unresolved(kind: TemplateKind, name: &str) -> SclError {
    SclError::UnresolvedTypeReference {
        kind,
        name: name.to_string(),
    }
}
