// crates/iec61850-scl/src/resolver/control.rs

//! Data sets and control blocks of a logical node declaration.
//!
//! Fields are copied as declared. FCDA paths are not checked against the
//! model, and report instances are not expanded here.

use crate::error::SclError;
use crate::model::ied as raw;
use crate::parser::{parse_bool, parse_u32, required};
use crate::types::{
    DataSet, Fcda, GseControlBlock, OptionFields, ReportControlBlock, TriggerOptions,
};
use alloc::string::ToString;
use alloc::vec::Vec;

const MAX_REPORT_INSTANCES: u32 = 99;

pub(crate) fn data_set(model: &raw::DataSet) -> Result<DataSet, SclError> {
    let fcda = model
        .fcda
        .iter()
        .map(|f| {
            Ok(Fcda {
                ld_inst: required(&f.ld_inst, "FCDA", "ldInst")?.to_string(),
                prefix: f.prefix.clone().filter(|p| !p.is_empty()),
                ln_class: required(&f.ln_class, "FCDA", "lnClass")?.to_string(),
                ln_inst: f.ln_inst.clone().filter(|i| !i.is_empty()),
                fc: required(&f.fc, "FCDA", "fc")?.to_string(),
                do_name: required(&f.do_name, "FCDA", "doName")?.to_string(),
                da_name: f.da_name.clone().filter(|d| !d.is_empty()),
            })
        })
        .collect::<Result<Vec<_>, SclError>>()?;

    Ok(DataSet {
        name: required(&model.name, "DataSet", "name")?.to_string(),
        fcda,
    })
}

pub(crate) fn report_control(model: &raw::ReportControl) -> Result<ReportControlBlock, SclError> {
    let trigger_options = model.trg_ops.as_ref().map(trigger_options).transpose()?;
    let option_fields = model.opt_fields.as_ref().map(option_fields).transpose()?;
    let max_instances = match &model.rpt_enabled {
        Some(enabled) => parse_u32(&enabled.max, "max", 1)?,
        None => 1,
    };
    // Instance names carry a two-digit suffix.
    if max_instances > MAX_REPORT_INSTANCES {
        return Err(SclError::InvalidAttributeFormat {
            attribute: "max",
            value: max_instances.to_string(),
        });
    }

    Ok(ReportControlBlock {
        name: required(&model.name, "ReportControl", "name")?.to_string(),
        rpt_id: model.rpt_id.clone(),
        buffered: parse_bool(&model.buffered, "buffered", false)?,
        data_set: model.dat_set.clone(),
        conf_ref: parse_u32(&model.conf_rev, "confRev", 0)?,
        trigger_options,
        option_fields,
        buffer_time: parse_u32(&model.buf_time, "bufTime", 0)?,
        integrity_period: model
            .intg_pd
            .as_ref()
            .map(|_| parse_u32(&model.intg_pd, "intgPd", 0))
            .transpose()?,
        indexed: parse_bool(&model.indexed, "indexed", true)?,
        max_instances,
    })
}

fn trigger_options(model: &raw::TrgOps) -> Result<TriggerOptions, SclError> {
    let mut trg = TriggerOptions::empty();
    let table = [
        (&model.dchg, "dchg", TriggerOptions::DATA_CHANGED),
        (&model.qchg, "qchg", TriggerOptions::QUALITY_CHANGED),
        (&model.dupd, "dupd", TriggerOptions::DATA_UPDATE),
        (&model.period, "period", TriggerOptions::INTEGRITY),
        (&model.gi, "gi", TriggerOptions::GI),
    ];
    for (value, attribute, flag) in table {
        if parse_bool(value, attribute, false)? {
            trg.insert(flag);
        }
    }
    Ok(trg)
}

fn option_fields(model: &raw::OptFields) -> Result<OptionFields, SclError> {
    let mut opt = OptionFields::empty();
    let table = [
        (&model.seq_num, "seqNum", OptionFields::SEQUENCE_NUMBER),
        (&model.time_stamp, "timeStamp", OptionFields::TIME_STAMP),
        (&model.reason_code, "reasonCode", OptionFields::REASON_CODE),
        (&model.data_set, "dataSet", OptionFields::DATA_SET),
        (&model.data_ref, "dataRef", OptionFields::DATA_REFERENCE),
        (&model.buf_ovfl, "bufOvfl", OptionFields::BUFFER_OVERFLOW),
        (&model.entry_id, "entryID", OptionFields::ENTRY_ID),
        (&model.config_ref, "configRef", OptionFields::CONFIG_REFERENCE),
    ];
    for (value, attribute, flag) in table {
        if parse_bool(value, attribute, false)? {
            opt.insert(flag);
        }
    }
    Ok(opt)
}

pub(crate) fn gse_control(model: &raw::GseControl) -> Result<GseControlBlock, SclError> {
    Ok(GseControlBlock {
        name: required(&model.name, "GSEControl", "name")?.to_string(),
        app_id: model.app_id.clone(),
        data_set: model.dat_set.clone(),
        conf_rev: parse_u32(&model.conf_rev, "confRev", 0)?,
        fixed_offsets: parse_bool(&model.fixed_offs, "fixedOffs", false)?,
    })
}
