// crates/iec61850-scl/src/types.rs

//! Public data structures for the concrete (instantiated) IED model.
//!
//! Every node in these trees is an independent stamp of its template: two
//! logical nodes of the same `lnType` own separate `DataObject` trees.

use alloc::format;
use alloc::string::String;
use alloc::vec::Vec;
use core::ops::BitOr;

// --- Functional Constraints ---

/// Functional constraints in the numbering of the server runtime's
/// `FunctionalConstraint` enum.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum FunctionalConstraint {
    /// Status information
    ST,
    /// Measurands
    MX,
    /// Setpoint
    SP,
    /// Substitution
    SV,
    /// Configuration
    CF,
    /// Description
    DC,
    /// Setting group
    SG,
    /// Setting group editable
    SE,
    /// Service response
    SR,
    /// Operate received
    OR,
    /// Blocking
    BL,
    /// Extended definition
    EX,
    /// Control
    CO,
}

impl FunctionalConstraint {
    /// Parses the two-letter code used in SCL (`fc="MX"`).
    pub fn from_scl(code: &str) -> Option<Self> {
        let fc = match code {
            "ST" => Self::ST,
            "MX" => Self::MX,
            "SP" => Self::SP,
            "SV" => Self::SV,
            "CF" => Self::CF,
            "DC" => Self::DC,
            "SG" => Self::SG,
            "SE" => Self::SE,
            "SR" => Self::SR,
            "OR" => Self::OR,
            "BL" => Self::BL,
            "EX" => Self::EX,
            "CO" => Self::CO,
            _ => return None,
        };
        Some(fc)
    }

    /// Numeric code used by the dynamic model.
    pub fn code(self) -> u8 {
        self as u8
    }

    /// The enumerator name in the runtime's C header.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::ST => "ST",
            Self::MX => "MX",
            Self::SP => "SP",
            Self::SV => "SV",
            Self::CF => "CF",
            Self::DC => "DC",
            Self::SG => "SG",
            Self::SE => "SE",
            Self::SR => "SR",
            Self::OR => "OR",
            Self::BL => "BL",
            Self::EX => "EX",
            Self::CO => "CO",
        }
    }
}

// --- Attribute Kinds ---

/// Concrete value kinds of a data attribute, numbered as the runtime's
/// `DataAttributeType` enum.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum AttributeKind {
    Boolean = 0,
    Int8 = 1,
    Int16 = 2,
    Int32 = 3,
    Int64 = 4,
    Int128 = 5,
    Int8U = 6,
    Int16U = 7,
    Int24U = 8,
    Int32U = 9,
    Float32 = 10,
    Float64 = 11,
    Enumerated = 12,
    OctetString64 = 13,
    OctetString6 = 14,
    OctetString8 = 15,
    VisibleString32 = 16,
    VisibleString64 = 17,
    VisibleString65 = 18,
    VisibleString129 = 19,
    VisibleString255 = 20,
    UnicodeString255 = 21,
    Timestamp = 22,
    Quality = 23,
    Check = 24,
    CodedEnum = 25,
    GenericBitString = 26,
    Constructed = 27,
    EntryTime = 28,
    PhyComAddr = 29,
}

impl AttributeKind {
    /// Numeric code used by the dynamic model.
    pub fn code(self) -> u8 {
        self as u8
    }

    /// The enumerator name in the runtime's C header.
    pub fn c_name(self) -> &'static str {
        match self {
            Self::Boolean => "BOOLEAN",
            Self::Int8 => "INT8",
            Self::Int16 => "INT16",
            Self::Int32 => "INT32",
            Self::Int64 => "INT64",
            Self::Int128 => "INT128",
            Self::Int8U => "INT8U",
            Self::Int16U => "INT16U",
            Self::Int24U => "INT24U",
            Self::Int32U => "INT32U",
            Self::Float32 => "FLOAT32",
            Self::Float64 => "FLOAT64",
            Self::Enumerated => "ENUMERATED",
            Self::OctetString64 => "OCTET_STRING_64",
            Self::OctetString6 => "OCTET_STRING_6",
            Self::OctetString8 => "OCTET_STRING_8",
            Self::VisibleString32 => "VISIBLE_STRING_32",
            Self::VisibleString64 => "VISIBLE_STRING_64",
            Self::VisibleString65 => "VISIBLE_STRING_65",
            Self::VisibleString129 => "VISIBLE_STRING_129",
            Self::VisibleString255 => "VISIBLE_STRING_255",
            Self::UnicodeString255 => "UNICODE_STRING_255",
            Self::Timestamp => "TIMESTAMP",
            Self::Quality => "QUALITY",
            Self::Check => "CHECK",
            Self::CodedEnum => "CODEDENUM",
            Self::GenericBitString => "GENERIC_BITSTRING",
            Self::Constructed => "CONSTRUCTED",
            Self::EntryTime => "ENTRY_TIME",
            Self::PhyComAddr => "PHYCOMADDR",
        }
    }
}

// --- Bitmasks ---

/// Report trigger conditions as a type-safe bitmask.
/// Bit values match the runtime's `TRG_OPT_*` defines.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct TriggerOptions(pub u8);

impl TriggerOptions {
    // --- Flag Constants ---
    pub const DATA_CHANGED: Self = Self(1 << 0);
    pub const QUALITY_CHANGED: Self = Self(1 << 1);
    pub const DATA_UPDATE: Self = Self(1 << 2);
    pub const INTEGRITY: Self = Self(1 << 3);
    pub const GI: Self = Self(1 << 4);

    /// Returns an empty set of flags.
    pub fn empty() -> Self {
        Self(0)
    }

    /// Checks if all of the specified flags are set.
    pub fn contains(&self, other: Self) -> bool {
        (self.0 & other.0) == other.0
    }

    /// Inserts the specified flags.
    pub fn insert(&mut self, other: Self) {
        self.0 |= other.0;
    }

    /// Returns the raw bitmask.
    pub fn bits(&self) -> u8 {
        self.0
    }
}

impl BitOr for TriggerOptions {
    type Output = Self;

    fn bitor(self, rhs: Self) -> Self::Output {
        Self(self.0 | rhs.0)
    }
}

/// Report option fields (`OptFlds`) as a type-safe bitmask.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct OptionFields(pub u8);

impl OptionFields {
    // --- Flag Constants ---
    pub const SEQUENCE_NUMBER: Self = Self(1 << 0);
    pub const TIME_STAMP: Self = Self(1 << 1);
    pub const REASON_CODE: Self = Self(1 << 2);
    pub const DATA_SET: Self = Self(1 << 3);
    pub const DATA_REFERENCE: Self = Self(1 << 4);
    pub const BUFFER_OVERFLOW: Self = Self(1 << 5);
    pub const ENTRY_ID: Self = Self(1 << 6);
    pub const CONFIG_REFERENCE: Self = Self(1 << 7);

    /// Returns an empty set of flags.
    pub fn empty() -> Self {
        Self(0)
    }

    /// Checks if all of the specified flags are set.
    pub fn contains(&self, other: Self) -> bool {
        (self.0 & other.0) == other.0
    }

    /// Inserts the specified flags.
    pub fn insert(&mut self, other: Self) {
        self.0 |= other.0;
    }

    /// Returns the raw bitmask.
    pub fn bits(&self) -> u8 {
        self.0
    }
}

impl BitOr for OptionFields {
    type Output = Self;

    fn bitor(self, rhs: Self) -> Self::Output {
        Self(self.0 | rhs.0)
    }
}

// --- Values ---

/// A default value attached to a data attribute, already interpreted
/// according to the attribute's kind.
#[derive(Debug, Clone, PartialEq)]
pub enum DataModelValue {
    /// Signed integers and enumerations (the ordinal).
    Integer(i64),
    /// Unsigned integers.
    Unsigned(u64),
    Boolean(bool),
    /// Floating point values keep their literal text.
    Float(String),
    /// Visible and unicode strings.
    Text(String),
    /// Any other kind: the literal as written, without interpretation.
    Raw(String),
}

// --- IED Model ---

/// The concrete model of one (IED, access point) selection.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct IedModel {
    /// `IED/@name`
    pub name: String,
    /// `AccessPoint/@name`
    pub access_point: String,
    pub logical_devices: Vec<LogicalDevice>,
}

impl IedModel {
    /// Iterates all logical nodes in document order, together with their device.
    pub fn logical_nodes(&self) -> impl Iterator<Item = (&LogicalDevice, &LogicalNode)> {
        self.logical_devices
            .iter()
            .flat_map(|ld| ld.logical_nodes.iter().map(move |ln| (ld, ln)))
    }
}

/// Represents an `<LDevice>`.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct LogicalDevice {
    /// `@inst`
    pub inst: String,
    /// `@ldName`, if declared.
    pub ld_name: Option<String>,
    /// `LN0` first, then each `LN` in document order.
    pub logical_nodes: Vec<LogicalNode>,
}

impl LogicalDevice {
    /// The MMS domain name: `ldName` when declared, otherwise `iedName + inst`.
    pub fn qualified_name(&self, ied_name: &str) -> String {
        match &self.ld_name {
            Some(name) => name.clone(),
            None => format!("{}{}", ied_name, self.inst),
        }
    }
}

/// Represents an `<LN0>` or `<LN>` after template expansion.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct LogicalNode {
    /// `prefix + lnClass + inst`
    pub name: String,
    pub ln_class: String,
    /// `@lnType`, the `LNodeType` this node was stamped from.
    pub ln_type: String,
    /// `@inst` of the owning logical device.
    pub ld_inst: String,
    pub data_objects: Vec<DataObject>,
    pub data_sets: Vec<DataSet>,
    pub report_controls: Vec<ReportControlBlock>,
    pub gse_controls: Vec<GseControlBlock>,
}

/// A data object (`DO`/`SDO`) instance.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct DataObject {
    pub name: String,
    /// 0 for a scalar, N for an array of N elements.
    pub count: u32,
    /// The `DOType` id this object was stamped from.
    pub type_name: String,
    pub sub_data_objects: Vec<DataObject>,
    pub data_attributes: Vec<DataAttribute>,
}

/// A data attribute (`DA`/`BDA`) instance.
#[derive(Debug, Clone, PartialEq)]
pub struct DataAttribute {
    pub name: String,
    /// 0 for a scalar, N for an array of N elements.
    pub count: u32,
    pub fc: FunctionalConstraint,
    pub kind: AttributeKind,
    /// `@type`: the `DAType` of a structure, or the `EnumType` of an enumeration.
    pub type_name: Option<String>,
    pub trigger_options: TriggerOptions,
    pub sub_data_attributes: Vec<DataAttribute>,
    pub value: Option<DataModelValue>,
    /// `DAI/@sAddr`, kept as written.
    pub short_address: Option<String>,
}

impl DataAttribute {
    /// Structured attributes carry children instead of a value.
    pub fn is_basic(&self) -> bool {
        self.kind != AttributeKind::Constructed
    }

    /// The short address as the runtime's `uint32_t sAddr`.
    ///
    /// Returns `Err` with the raw text when it is not a valid number.
    pub fn numeric_short_address(&self) -> Result<u32, &str> {
        match self.short_address.as_deref() {
            None => Ok(0),
            Some(raw) => raw.trim().parse::<u32>().map_err(|_| raw),
        }
    }
}

// --- Data Sets ---

/// Represents a `<DataSet>`.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct DataSet {
    pub name: String,
    pub fcda: Vec<Fcda>,
}

/// Represents an `<FCDA>`. All components are opaque strings.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Fcda {
    pub ld_inst: String,
    pub prefix: Option<String>,
    pub ln_class: String,
    pub ln_inst: Option<String>,
    pub fc: String,
    pub do_name: String,
    pub da_name: Option<String>,
}

impl Fcda {
    /// Builds the MMS variable name, e.g. `AaMMXU1$MX$TotW$instMag$i`.
    pub fn mms_path(&self) -> String {
        let mut path = String::new();
        if let Some(prefix) = &self.prefix {
            path.push_str(prefix);
        }
        path.push_str(&self.ln_class);
        if let Some(inst) = &self.ln_inst {
            path.push_str(inst);
        }
        path.push('$');
        path.push_str(&self.fc);
        path.push('$');
        path.push_str(&to_mms_path(&self.do_name));
        if let Some(da) = &self.da_name {
            path.push('$');
            path.push_str(&to_mms_path(da));
        }
        path
    }
}

/// Replaces IEC dots with MMS dollar separators.
fn to_mms_path(iec: &str) -> String {
    iec.replace('.', "$")
}

// --- Control Blocks ---

/// Represents a `<ReportControl>`.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ReportControlBlock {
    pub name: String,
    pub rpt_id: Option<String>,
    pub buffered: bool,
    /// `@datSet`, relative to the owning logical node.
    pub data_set: Option<String>,
    pub conf_ref: u32,
    /// `None` when no `<TrgOps>` element is declared.
    pub trigger_options: Option<TriggerOptions>,
    /// `None` when no `<OptFields>` element is declared.
    pub option_fields: Option<OptionFields>,
    pub buffer_time: u32,
    pub integrity_period: Option<u32>,
    pub indexed: bool,
    /// `RptEnabled/@max`, 1 when absent.
    pub max_instances: u32,
}

impl ReportControlBlock {
    /// Names of the runtime instances of this block.
    ///
    /// An indexed block with more than one client instance expands into
    /// `name01`, `name02`, ...; everything else keeps its plain name.
    pub fn instance_names(&self) -> Vec<String> {
        if self.indexed && self.max_instances > 1 {
            (1..=self.max_instances)
                .map(|i| format!("{}{:02}", self.name, i))
                .collect()
        } else {
            alloc::vec![self.name.clone()]
        }
    }
}

/// Represents a `<GSEControl>`.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct GseControlBlock {
    pub name: String,
    pub app_id: Option<String>,
    pub data_set: Option<String>,
    pub conf_rev: u32,
    pub fixed_offsets: bool,
}

// --- Communication ---

/// Represents the `<Communication>` section.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Communication {
    pub sub_networks: Vec<SubNetwork>,
}

/// Represents a `<SubNetwork>`.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct SubNetwork {
    pub name: Option<String>,
    pub connected_aps: Vec<ConnectedAp>,
}

/// Represents a `<ConnectedAP>`.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ConnectedAp {
    pub ied_name: String,
    pub ap_name: String,
    pub gses: Vec<Gse>,
}

/// Represents a `<GSE>` entry of a connected access point.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Gse {
    pub ld_inst: String,
    pub cb_name: String,
    /// `None` when the address was missing or malformed.
    pub address: Option<GseAddress>,
}

/// Transport parameters of a GOOSE publisher (the runtime's `PhyComAddress`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct GseAddress {
    pub vlan_priority: u8,
    pub vlan_id: u16,
    pub app_id: u16,
    pub mac_address: [u8; 6],
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloc::string::ToString;
    use alloc::vec;

    #[test]
    fn test_trigger_options_bitor() {
        let trg = TriggerOptions::DATA_CHANGED | TriggerOptions::QUALITY_CHANGED;

        assert_eq!(trg.bits(), 0b0000_0011);
        assert!(trg.contains(TriggerOptions::DATA_CHANGED));
        assert!(trg.contains(TriggerOptions::QUALITY_CHANGED));
        assert!(!trg.contains(TriggerOptions::GI));
    }

    #[test]
    fn test_option_fields_full_table() {
        let table = [
            (OptionFields::SEQUENCE_NUMBER, 1),
            (OptionFields::TIME_STAMP, 2),
            (OptionFields::REASON_CODE, 4),
            (OptionFields::DATA_SET, 8),
            (OptionFields::DATA_REFERENCE, 16),
            (OptionFields::BUFFER_OVERFLOW, 32),
            (OptionFields::ENTRY_ID, 64),
            (OptionFields::CONFIG_REFERENCE, 128),
        ];
        let mut all = OptionFields::empty();
        for (flag, bits) in table {
            assert_eq!(flag.bits(), bits);
            all.insert(flag);
        }
        assert_eq!(all.bits(), 0xFF);
    }

    #[test]
    fn test_mms_path_with_all_components() {
        let fcda = Fcda {
            ld_inst: "LD0".to_string(),
            prefix: Some("Aa".to_string()),
            ln_class: "MMXU".to_string(),
            ln_inst: Some("1".to_string()),
            fc: "MX".to_string(),
            do_name: "TotW".to_string(),
            da_name: Some("instMag.i".to_string()),
        };
        assert_eq!(fcda.mms_path(), "AaMMXU1$MX$TotW$instMag$i");
    }

    #[test]
    fn test_mms_path_without_optional_components() {
        let fcda = Fcda {
            ld_inst: "LD0".to_string(),
            ln_class: "LLN0".to_string(),
            fc: "ST".to_string(),
            do_name: "Mod.origin".to_string(),
            ..Default::default()
        };
        assert_eq!(fcda.mms_path(), "LLN0$ST$Mod$origin");
    }

    #[test]
    fn test_indexed_report_instance_names() {
        let rcb = ReportControlBlock {
            name: "brcbEV".to_string(),
            indexed: true,
            max_instances: 3,
            ..Default::default()
        };
        assert_eq!(rcb.instance_names(), vec!["brcbEV01", "brcbEV02", "brcbEV03"]);

        let single = ReportControlBlock {
            name: "urcb".to_string(),
            indexed: true,
            max_instances: 1,
            ..Default::default()
        };
        assert_eq!(single.instance_names(), vec!["urcb"]);
    }

    #[test]
    fn test_qualified_logical_device_name() {
        let ld = LogicalDevice {
            inst: "LD0".to_string(),
            ..Default::default()
        };
        assert_eq!(ld.qualified_name("IED1"), "IED1LD0");

        let named = LogicalDevice {
            inst: "LD0".to_string(),
            ld_name: Some("Feeder".to_string()),
            ..Default::default()
        };
        assert_eq!(named.qualified_name("IED1"), "Feeder");
    }

    #[test]
    fn test_codes_match_runtime_numbering() {
        assert_eq!(AttributeKind::Boolean.code(), 0);
        assert_eq!(AttributeKind::Enumerated.code(), 12);
        assert_eq!(AttributeKind::PhyComAddr.code(), 29);
        assert_eq!(FunctionalConstraint::ST.code(), 0);
        assert_eq!(FunctionalConstraint::CO.code(), 12);
        assert_eq!(FunctionalConstraint::from_scl("MX"), Some(FunctionalConstraint::MX));
        assert_eq!(FunctionalConstraint::from_scl("XX"), None);
    }
}
