// crates/iec61850-scl/src/error.rs

use crate::registry::TemplateKind;
use alloc::fmt;
use alloc::string::String;
use quick_xml::errors::serialize::DeError;

/// Errors that abort an SCL compilation run.
///
/// Conditions that only degrade the output (unmatched overrides, missing GSE
/// addresses, bad short addresses, unrenderable default values) are logged
/// instead and never surface here.
#[derive(Debug)]
pub enum SclError {
    /// An error from the underlying `quick-xml` deserializer.
    XmlParsing(DeError),

    /// A mandatory XML attribute was absent (e.g. `@name` on a `<DA>`).
    MissingRequiredAttribute {
        element: &'static str,
        attribute: &'static str,
    },

    /// An attribute was present but could not be read (e.g. `@count="x"`).
    InvalidAttributeFormat {
        attribute: &'static str,
        value: String,
    },

    /// A template reference did not resolve inside the type registry.
    UnresolvedTypeReference { kind: TemplateKind, name: String },

    /// A template contains itself, directly or through other templates.
    CyclicTypeReference { kind: TemplateKind, name: String },

    /// A `@bType` token that has no attribute kind.
    UnsupportedAttributeKind(String),

    /// `DataTypeTemplates`, `IED` or `Communication` appeared a wrong number of times.
    SectionCardinality {
        section: &'static str,
        found: usize,
    },

    /// The requested IED or access point is not declared in the document.
    IedOrAccessPointNotFound {
        ied: Option<String>,
        access_point: Option<String>,
    },

    /// A `<Val>` literal could not be read as the attribute's kind.
    InvalidValue { attribute: String, value: String },

    /// An error occurred while formatting generated output.
    FmtError(fmt::Error),
}

impl From<DeError> for SclError {
    fn from(e: DeError) -> Self {
        SclError::XmlParsing(e)
    }
}

impl From<fmt::Error> for SclError {
    fn from(e: fmt::Error) -> Self {
        SclError::FmtError(e)
    }
}

impl fmt::Display for SclError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SclError::XmlParsing(e) => write!(f, "XML parsing error: {}", e),
            SclError::MissingRequiredAttribute { element, attribute } => {
                write!(f, "Missing required attribute '{}' on <{}>", attribute, element)
            }
            SclError::InvalidAttributeFormat { attribute, value } => {
                write!(f, "Invalid value '{}' for attribute '{}'", value, attribute)
            }
            SclError::UnresolvedTypeReference { kind, name } => {
                write!(f, "Unresolved {} reference '{}'", kind, name)
            }
            SclError::CyclicTypeReference { kind, name } => {
                write!(f, "{} '{}' contains itself", kind, name)
            }
            SclError::UnsupportedAttributeKind(token) => {
                write!(f, "Unsupported attribute type '{}'", token)
            }
            SclError::SectionCardinality { section, found } => {
                write!(f, "Unexpected number of <{}> sections: {}", section, found)
            }
            SclError::IedOrAccessPointNotFound { ied, access_point } => write!(
                f,
                "No IED/access point found for selection (ied={}, ap={})",
                ied.as_deref().unwrap_or("<first>"),
                access_point.as_deref().unwrap_or("<first>")
            ),
            SclError::InvalidValue { attribute, value } => {
                write!(f, "Invalid value '{}' for data attribute '{}'", value, attribute)
            }
            SclError::FmtError(e) => write!(f, "Formatting error: {}", e),
        }
    }
}
