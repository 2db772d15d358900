// crates/iec61850-scl/src/model/communication.rs

//! Contains model structs related to the `<Communication>` section.

use alloc::string::String;
use alloc::vec::Vec;
use serde::Deserialize;

/// Represents the `<Communication>` section.
#[derive(Debug, Deserialize, Default)]
pub struct Communication {
    #[serde(rename = "SubNetwork", default)]
    pub sub_networks: Vec<SubNetwork>,
}

/// Represents a `<SubNetwork name="..">`.
#[derive(Debug, Deserialize, Default)]
pub struct SubNetwork {
    #[serde(rename = "@name", default)]
    pub name: Option<String>,
    #[serde(rename = "ConnectedAP", default)]
    pub connected_aps: Vec<ConnectedAp>,
}

/// Represents a `<ConnectedAP iedName=".." apName="..">`.
#[derive(Debug, Deserialize, Default)]
pub struct ConnectedAp {
    #[serde(rename = "@iedName", default)]
    pub ied_name: Option<String>,
    #[serde(rename = "@apName", default)]
    pub ap_name: Option<String>,
    #[serde(rename = "GSE", default)]
    pub gses: Vec<Gse>,
}

/// Represents a `<GSE ldInst=".." cbName="..">`.
#[derive(Debug, Deserialize, Default)]
pub struct Gse {
    #[serde(rename = "@ldInst", default)]
    pub ld_inst: Option<String>,
    #[serde(rename = "@cbName", default)]
    pub cb_name: Option<String>,
    #[serde(rename = "Address", default)]
    pub address: Option<Address>,
}

/// Represents an `<Address>` block.
#[derive(Debug, Deserialize, Default)]
pub struct Address {
    #[serde(rename = "P", default)]
    pub parameters: Vec<P>,
}

/// Represents `<P type="MAC-Address">01-0C-CD-01-00-01</P>`.
#[derive(Debug, Deserialize, Default)]
pub struct P {
    #[serde(rename = "@type", default)]
    pub p_type: Option<String>,
    #[serde(rename = "$value", default)]
    pub value: String,
}
