// crates/iec61850-scl/src/communication.rs

//! Resolves the optional `<Communication>` section and looks up GOOSE
//! transport addresses.

use crate::model::communication as raw;
use crate::parser::{parse_hex_u16, SclDocument};
use crate::types::{Communication, ConnectedAp, Gse, GseAddress, SubNetwork};
use alloc::string::String;

/// Converts the document's `<Communication>` section, if any.
///
/// Entries with missing names and malformed addresses are logged and
/// dropped. Nothing in this section is fatal.
pub fn resolve_communication(document: &SclDocument) -> Option<Communication> {
    let model = document.communication.as_ref()?;
    let sub_networks = model
        .sub_networks
        .iter()
        .map(|sn| SubNetwork {
            name: sn.name.clone(),
            connected_aps: sn.connected_aps.iter().filter_map(connected_ap).collect(),
        })
        .collect();
    Some(Communication { sub_networks })
}

fn connected_ap(model: &raw::ConnectedAp) -> Option<ConnectedAp> {
    let (Some(ied_name), Some(ap_name)) = (&model.ied_name, &model.ap_name) else {
        log::warn!("ConnectedAP without iedName/apName ignored");
        return None;
    };
    let gses = model
        .gses
        .iter()
        .filter_map(|gse| {
            let (Some(ld_inst), Some(cb_name)) = (&gse.ld_inst, &gse.cb_name) else {
                log::warn!("GSE of {}/{} without ldInst/cbName ignored", ied_name, ap_name);
                return None;
            };
            let address = gse.address.as_ref().and_then(|a| {
                let parsed = parse_address(a);
                if parsed.is_none() {
                    log::warn!("Malformed GSE address for {}/{}", ld_inst, cb_name);
                }
                parsed
            });
            Some(Gse {
                ld_inst: ld_inst.clone(),
                cb_name: cb_name.clone(),
                address,
            })
        })
        .collect();

    Some(ConnectedAp {
        ied_name: ied_name.clone(),
        ap_name: ap_name.clone(),
        gses,
    })
}

/// Reads the `P` parameters of a GSE `<Address>`.
///
/// `MAC-Address` is mandatory; `APPID` and `VLAN-ID` are hexadecimal,
/// `VLAN-PRIORITY` is decimal and the optional ones default to zero.
fn parse_address(model: &raw::Address) -> Option<GseAddress> {
    let mut address = GseAddress::default();
    let mut has_mac = false;

    for p in &model.parameters {
        let value = p.value.trim();
        match p.p_type.as_deref() {
            Some("MAC-Address") => {
                address.mac_address = parse_mac_address(value)?;
                has_mac = true;
            }
            Some("APPID") => address.app_id = parse_hex_u16(value)?,
            Some("VLAN-ID") => address.vlan_id = parse_hex_u16(value)?,
            Some("VLAN-PRIORITY") => address.vlan_priority = value.parse::<u8>().ok()?,
            _ => {}
        }
    }
    has_mac.then_some(address)
}

/// Parses `01-0C-CD-01-00-01` into six octets.
fn parse_mac_address(value: &str) -> Option<[u8; 6]> {
    let digits: String = value.split(['-', ':']).collect();
    let mut mac = [0u8; 6];
    hex::decode_to_slice(digits, &mut mac).ok()?;
    Some(mac)
}

/// Looks up GSE addresses of one (IED, access point) pair.
#[derive(Debug, Clone, Copy)]
pub struct AddressResolver<'a> {
    connected_ap: Option<&'a ConnectedAp>,
}

impl<'a> AddressResolver<'a> {
    /// Selects the first `ConnectedAP` (document order) of `ied_name`/`ap_name`.
    pub fn new(communication: Option<&'a Communication>, ied_name: &str, ap_name: &str) -> Self {
        let connected_ap = communication.and_then(|c| {
            c.sub_networks
                .iter()
                .flat_map(|sn| sn.connected_aps.iter())
                .find(|cap| cap.ied_name == ied_name && cap.ap_name == ap_name)
        });
        if communication.is_some() && connected_ap.is_none() {
            log::warn!("No ConnectedAP for IED '{}', access point '{}'", ied_name, ap_name);
        }
        Self { connected_ap }
    }

    /// A resolver that finds nothing.
    pub fn empty() -> Self {
        Self { connected_ap: None }
    }

    /// Returns the address of the control block `cb_name` in logical device
    /// `ld_inst`. The first match in document order wins.
    pub fn lookup_address(&self, ld_inst: &str, cb_name: &str) -> Option<&'a GseAddress> {
        let connected_ap = self.connected_ap?;
        let found = connected_ap
            .gses
            .iter()
            .find(|gse| gse.ld_inst == ld_inst && gse.cb_name == cb_name)
            .and_then(|gse| gse.address.as_ref());
        if found.is_none() {
            log::warn!("No GSE address for {}/{}", ld_inst, cb_name);
        }
        found
    }
}
