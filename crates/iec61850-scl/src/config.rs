// crates/iec61850-scl/src/config.rs

//! Run-time options shared by both back ends.

use crate::types::{OptionFields, TriggerOptions};
use alloc::string::{String, ToString};

/// Chooses the (IED, access point) pair to compile.
///
/// `None` selects the first declared IED or access point.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct IedSelection {
    pub ied_name: Option<String>,
    pub access_point: Option<String>,
}

impl IedSelection {
    pub fn new(ied_name: Option<String>, access_point: Option<String>) -> Self {
        Self {
            ied_name,
            access_point,
        }
    }
}

/// Settings of the code generators.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GeneratorConfig {
    /// Trigger options of a report control block without `<TrgOps>`.
    pub default_trigger_options: TriggerOptions,
    /// Option fields of a report control block without `<OptFields>`.
    pub default_option_fields: OptionFields,
    /// Input file name quoted in the generated file banner.
    pub source_name: String,
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self {
            default_trigger_options: TriggerOptions::GI,
            default_option_fields: OptionFields::BUFFER_OVERFLOW,
            source_name: "model.icd".to_string(),
        }
    }
}

impl GeneratorConfig {
    /// Returns a copy that names `source_name` in the output banner.
    pub fn with_source_name(mut self, source_name: &str) -> Self {
        self.source_name = source_name.to_string();
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = GeneratorConfig::default();
        assert_eq!(config.default_trigger_options.bits(), 16);
        assert_eq!(config.default_option_fields.bits(), 32);
        assert_eq!(config.source_name, "model.icd");

        let named = config.with_source_name("feeder.cid");
        assert_eq!(named.source_name, "feeder.cid");
    }
}
