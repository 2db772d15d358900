// crates/iec61850-scl/src/parser.rs

use crate::error::SclError;
use crate::model;
use alloc::string::{String, ToString};
use alloc::vec::Vec;

/// A parsed SCL document whose sections passed the cardinality checks.
///
/// This is the input of every later stage: the [`TypeRegistry`](crate::TypeRegistry)
/// reads its templates, the instance builder reads its IEDs and the
/// communication resolver reads its optional `<Communication>` section.
#[derive(Debug)]
pub struct SclDocument {
    pub(crate) templates: model::DataTypeTemplates,
    pub(crate) ieds: Vec<model::Ied>,
    pub(crate) communication: Option<model::Communication>,
}

impl SclDocument {
    /// Parses an SCL (`.icd`/`.cid`/`.scd`) string slice.
    ///
    /// # Errors
    /// Returns `SclError::XmlParsing` for malformed XML and
    /// `SclError::SectionCardinality` when `DataTypeTemplates` is not present
    /// exactly once, no `IED` is present, or `Communication` is duplicated.
    #[allow(clippy::should_implement_trait)]
    pub fn from_str(xml_content: &str) -> Result<Self, SclError> {
        // 1. Deserialize the raw XML string into our internal model.
        let scl: model::Scl = quick_xml::de::from_str(xml_content)?;

        // 2. Enforce section cardinality.
        let model::Scl {
            communication,
            ied,
            data_type_templates,
        } = scl;

        if data_type_templates.len() != 1 {
            return Err(SclError::SectionCardinality {
                section: "DataTypeTemplates",
                found: data_type_templates.len(),
            });
        }
        if ied.is_empty() {
            return Err(SclError::SectionCardinality {
                section: "IED",
                found: 0,
            });
        }
        if communication.len() > 1 {
            return Err(SclError::SectionCardinality {
                section: "Communication",
                found: communication.len(),
            });
        }

        log::debug!(
            "Parsed SCL document with {} IED(s), communication section: {}",
            ied.len(),
            !communication.is_empty()
        );

        Ok(Self {
            templates: data_type_templates.into_iter().next().unwrap_or_default(),
            ieds: ied,
            communication: communication.into_iter().next(),
        })
    }

    /// Names of the declared IEDs in document order.
    pub fn ied_names(&self) -> impl Iterator<Item = &str> {
        self.ieds.iter().filter_map(|ied| ied.name.as_deref())
    }

    /// Whether the document carries a `<Communication>` section.
    pub fn has_communication(&self) -> bool {
        self.communication.is_some()
    }
}

// --- Attribute helpers shared by the resolvers ---

/// Returns the value of a mandatory XML attribute.
pub(crate) fn required<'a>(
    value: &'a Option<String>,
    element: &'static str,
    attribute: &'static str,
) -> Result<&'a str, SclError> {
    value
        .as_deref()
        .ok_or(SclError::MissingRequiredAttribute { element, attribute })
}

/// Parses an optional decimal `u32` attribute, `default` when absent.
pub(crate) fn parse_u32(
    value: &Option<String>,
    attribute: &'static str,
    default: u32,
) -> Result<u32, SclError> {
    match value.as_deref() {
        None => Ok(default),
        Some(s) => s
            .trim()
            .parse::<u32>()
            .map_err(|_| SclError::InvalidAttributeFormat {
                attribute,
                value: s.to_string(),
            }),
    }
}

/// Parses an optional `xs:boolean` attribute, `default` when absent.
pub(crate) fn parse_bool(
    value: &Option<String>,
    attribute: &'static str,
    default: bool,
) -> Result<bool, SclError> {
    match value.as_deref().map(str::trim) {
        None => Ok(default),
        Some("true") | Some("1") => Ok(true),
        Some("false") | Some("0") => Ok(false),
        Some(other) => Err(SclError::InvalidAttributeFormat {
            attribute,
            value: other.to_string(),
        }),
    }
}

/// Parses a hexadecimal string (e.g., "0x1F" or "1F") into a u16.
pub(crate) fn parse_hex_u16(s: &str) -> Option<u16> {
    let trimmed = s.trim();
    let digits = trimmed
        .strip_prefix("0x")
        .or_else(|| trimmed.strip_prefix("0X"))
        .unwrap_or(trimmed);
    u16::from_str_radix(digits, 16).ok()
}
