// crates/iec61850-scl/src/model/ied.rs

//! Contains model structs related to the `<IED>` section.

use super::Val;
use alloc::string::String;
use alloc::vec::Vec;
use serde::Deserialize;

/// Represents an `<IED name="..">`.
#[derive(Debug, Deserialize, Default)]
pub struct Ied {
    #[serde(rename = "@name", default)]
    pub name: Option<String>,
    #[serde(rename = "AccessPoint", default)]
    pub access_points: Vec<AccessPoint>,
}

/// Represents an `<AccessPoint name="..">`.
#[derive(Debug, Deserialize, Default)]
pub struct AccessPoint {
    #[serde(rename = "@name", default)]
    pub name: Option<String>,
    #[serde(rename = "Server", default)]
    pub server: Option<Server>,
}

/// Represents the `<Server>` of an access point.
#[derive(Debug, Deserialize, Default)]
pub struct Server {
    #[serde(rename = "LDevice", default)]
    pub logical_devices: Vec<LDevice>,
}

/// Represents an `<LDevice inst=".." ldName="..">`.
#[derive(Debug, Deserialize, Default)]
pub struct LDevice {
    #[serde(rename = "@inst", default)]
    pub inst: Option<String>,
    #[serde(rename = "@ldName", default)]
    pub ld_name: Option<String>,
    #[serde(rename = "LN0", default)]
    pub ln0: Option<LnDeclaration>,
    #[serde(rename = "LN", default)]
    pub ln: Vec<LnDeclaration>,
}

/// Represents an `<LN0>` or `<LN>` element.
#[derive(Debug, Deserialize, Default)]
pub struct LnDeclaration {
    #[serde(rename = "@lnClass", default)]
    pub ln_class: Option<String>,
    #[serde(rename = "@lnType", default)]
    pub ln_type: Option<String>,
    #[serde(rename = "@inst", default)]
    pub inst: Option<String>,
    #[serde(rename = "@prefix", default)]
    pub prefix: Option<String>,
    #[serde(rename = "DataSet", default)]
    pub data_sets: Vec<DataSet>,
    #[serde(rename = "ReportControl", default)]
    pub report_controls: Vec<ReportControl>,
    #[serde(rename = "GSEControl", default)]
    pub gse_controls: Vec<GseControl>,
    #[serde(rename = "DOI", default)]
    pub doi: Vec<Doi>,
}

/// Represents a `<DataSet name="..">`.
#[derive(Debug, Deserialize, Default)]
pub struct DataSet {
    #[serde(rename = "@name", default)]
    pub name: Option<String>,
    #[serde(rename = "FCDA", default)]
    pub fcda: Vec<Fcda>,
}

/// Represents an `<FCDA>` dataset member.
#[derive(Debug, Deserialize, Default)]
pub struct Fcda {
    #[serde(rename = "@ldInst", default)]
    pub ld_inst: Option<String>,
    #[serde(rename = "@prefix", default)]
    pub prefix: Option<String>,
    #[serde(rename = "@lnClass", default)]
    pub ln_class: Option<String>,
    #[serde(rename = "@lnInst", default)]
    pub ln_inst: Option<String>,
    #[serde(rename = "@doName", default)]
    pub do_name: Option<String>,
    #[serde(rename = "@daName", default)]
    pub da_name: Option<String>,
    #[serde(rename = "@fc", default)]
    pub fc: Option<String>,
}

/// Represents a `<ReportControl>`.
#[derive(Debug, Deserialize, Default)]
pub struct ReportControl {
    #[serde(rename = "@name", default)]
    pub name: Option<String>,
    #[serde(rename = "@rptID", default)]
    pub rpt_id: Option<String>,
    #[serde(rename = "@buffered", default)]
    pub buffered: Option<String>,
    #[serde(rename = "@datSet", default)]
    pub dat_set: Option<String>,
    #[serde(rename = "@confRev", default)]
    pub conf_rev: Option<String>,
    #[serde(rename = "@bufTime", default)]
    pub buf_time: Option<String>,
    #[serde(rename = "@intgPd", default)]
    pub intg_pd: Option<String>,
    #[serde(rename = "@indexed", default)]
    pub indexed: Option<String>,
    #[serde(rename = "TrgOps", default)]
    pub trg_ops: Option<TrgOps>,
    #[serde(rename = "OptFields", default)]
    pub opt_fields: Option<OptFields>,
    #[serde(rename = "RptEnabled", default)]
    pub rpt_enabled: Option<RptEnabled>,
}

/// Represents `<TrgOps dchg=".." qchg=".." dupd=".." period=".." gi=".."/>`.
#[derive(Debug, Deserialize, Default)]
pub struct TrgOps {
    #[serde(rename = "@dchg", default)]
    pub dchg: Option<String>,
    #[serde(rename = "@qchg", default)]
    pub qchg: Option<String>,
    #[serde(rename = "@dupd", default)]
    pub dupd: Option<String>,
    #[serde(rename = "@period", default)]
    pub period: Option<String>,
    #[serde(rename = "@gi", default)]
    pub gi: Option<String>,
}

/// Represents `<OptFields>`.
#[derive(Debug, Deserialize, Default)]
pub struct OptFields {
    #[serde(rename = "@seqNum", default)]
    pub seq_num: Option<String>,
    #[serde(rename = "@timeStamp", default)]
    pub time_stamp: Option<String>,
    #[serde(rename = "@reasonCode", default)]
    pub reason_code: Option<String>,
    #[serde(rename = "@dataSet", default)]
    pub data_set: Option<String>,
    #[serde(rename = "@dataRef", default)]
    pub data_ref: Option<String>,
    #[serde(rename = "@bufOvfl", default)]
    pub buf_ovfl: Option<String>,
    #[serde(rename = "@entryID", default)]
    pub entry_id: Option<String>,
    #[serde(rename = "@configRef", default)]
    pub config_ref: Option<String>,
}

/// Represents `<RptEnabled max="..">`.
#[derive(Debug, Deserialize, Default)]
pub struct RptEnabled {
    #[serde(rename = "@max", default)]
    pub max: Option<String>,
}

/// Represents a `<GSEControl>`.
#[derive(Debug, Deserialize, Default)]
pub struct GseControl {
    #[serde(rename = "@name", default)]
    pub name: Option<String>,
    #[serde(rename = "@appID", default)]
    pub app_id: Option<String>,
    #[serde(rename = "@datSet", default)]
    pub dat_set: Option<String>,
    #[serde(rename = "@confRev", default)]
    pub conf_rev: Option<String>,
    #[serde(rename = "@fixedOffs", default)]
    pub fixed_offs: Option<String>,
}

/// Represents a `<DOI name="..">` instance override.
#[derive(Debug, Deserialize, Default)]
pub struct Doi {
    #[serde(rename = "@name", default)]
    pub name: Option<String>,
    #[serde(rename = "SDI", default)]
    pub sdi: Vec<Sdi>,
    #[serde(rename = "DAI", default)]
    pub dai: Vec<Dai>,
}

/// Represents an `<SDI name="..">`, which addresses either a sub data object
/// or a structured data attribute.
#[derive(Debug, Deserialize, Default)]
pub struct Sdi {
    #[serde(rename = "@name", default)]
    pub name: Option<String>,
    #[serde(rename = "SDI", default)]
    pub sdi: Vec<Sdi>,
    #[serde(rename = "DAI", default)]
    pub dai: Vec<Dai>,
}

/// Represents a `<DAI name=".." sAddr="..">`.
#[derive(Debug, Deserialize, Default)]
pub struct Dai {
    #[serde(rename = "@name", default)]
    pub name: Option<String>,
    #[serde(rename = "@sAddr", default)]
    pub s_addr: Option<String>,
    #[serde(rename = "Val", default)]
    pub val: Vec<Val>,
}
