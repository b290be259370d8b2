//! Scrapes a [`MetricsRecord`] out of a CoreMark run log.
//!
//! Fields are located one after another, each search starting where the
//! previous field matched, with arbitrary text allowed in between. Taking the
//! earliest occurrence of each field is what the whole-text pattern (all field
//! patterns joined by lazy gaps) does too, so the walk succeeds exactly when
//! [`matches`] does, and on failure it names the first missing field.

use super::record::{Field, FixedPoint, MetricsRecord};
use crate::error::ExtractError;
use lazy_static::lazy_static;
use regex::Regex;

lazy_static! {
    static ref FIELD_PATTERNS: Vec<(Field, Regex)> = Field::ALL
        .iter()
        .map(|field| (*field, Regex::new(field.pattern()).unwrap()))
        .collect();

    static ref METRICS_BLOCK: Regex = {
        let joined = Field::ALL
            .iter()
            .map(|field| field.pattern())
            .collect::<Vec<_>>()
            .join(".*?");
        Regex::new(&format!("(?s){joined}")).unwrap()
    };
}

/// True when `text` contains a complete metrics block.
pub fn matches(text: &str) -> bool {
    METRICS_BLOCK.is_match(text)
}

/// Extracts every field of the record from `text`, in schema order.
pub fn extract(text: &str) -> Result<MetricsRecord, ExtractError> {
    let values = locate(text)?;
    build_record(&values)
}

/// Walks the field patterns left to right and returns the raw value of each.
fn locate(text: &str) -> Result<Vec<(Field, &str)>, ExtractError> {
    let mut values = Vec::with_capacity(FIELD_PATTERNS.len());
    let mut pos = 0;
    for (field, re) in FIELD_PATTERNS.iter() {
        let not_found = ExtractError::FieldNotFound { field: *field };
        let Some(caps) = re.captures_at(text, pos) else {
            return Err(not_found);
        };
        let (Some(whole), Some(value)) = (caps.get(0), caps.get(1)) else {
            return Err(not_found);
        };
        values.push((*field, value.as_str()));
        pos = whole.end();
    }
    Ok(values)
}

fn build_record(values: &[(Field, &str)]) -> Result<MetricsRecord, ExtractError> {
    let count = |field: Field| -> Result<u64, ExtractError> {
        let text = raw(values, field)?;
        text.parse::<u64>().map_err(|_| ExtractError::InvalidNumber {
            field,
            text: text.to_string(),
        })
    };
    let decimal = |field: Field| -> Result<FixedPoint, ExtractError> {
        let text = raw(values, field)?;
        text.parse::<FixedPoint>()
            .map_err(|_| ExtractError::InvalidNumber {
                field,
                text: text.to_string(),
            })
    };

    Ok(MetricsRecord {
        mtime: count(Field::Mtime)?,
        minstret: count(Field::Minstret)?,
        coremark_per_mhz: decimal(Field::CoremarkPerMhz)?,
        cpi: decimal(Field::Cpi)?,
        load_stalls: count(Field::LoadStalls)?,
        store_stalls: count(Field::StoreStalls)?,
        dcache_accesses: count(Field::DcacheAccesses)?,
        dcache_misses: count(Field::DcacheMisses)?,
        icache_accesses: count(Field::IcacheAccesses)?,
        icache_misses: count(Field::IcacheMisses)?,
        branches: count(Field::Branches)?,
        branch_mispredicts: count(Field::BranchMispredicts)?,
        btb_misses: count(Field::BtbMisses)?,
        jump_jr: count(Field::JumpJr)?,
        ras_wrong: count(Field::RasWrong)?,
        returns: count(Field::Returns)?,
        bp_class_wrong: count(Field::BpClassWrong)?,
    })
}

fn raw<'a>(values: &[(Field, &'a str)], field: Field) -> Result<&'a str, ExtractError> {
    values
        .iter()
        .find(|(f, _)| *f == field)
        .map(|(_, text)| *text)
        .ok_or(ExtractError::FieldNotFound { field })
}
