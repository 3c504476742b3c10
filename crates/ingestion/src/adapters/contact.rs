//! CONTACT 记录适配器

use contracts::{ContactPair, ContactSet, Record, RecordKind};

use super::common::{parse_id, parse_indicator};
use crate::adapter::RecordAdapter;
use crate::error::Result;

/// 每条腿的字段数：id + 接触指示
pub const CONTACT_PAIR_LEN: usize = 2;

/// CONTACT 记录适配器
pub struct ContactAdapter;

impl RecordAdapter for ContactAdapter {
    fn arity(&self) -> &'static str {
        "an even count"
    }

    fn accepts(&self, payload_len: usize) -> bool {
        payload_len % CONTACT_PAIR_LEN == 0
    }

    fn build(&self, timestamp: f64, payload: &[&str]) -> Result<Record> {
        let contacts = payload
            .chunks_exact(CONTACT_PAIR_LEN)
            .map(|pair| {
                Ok(ContactPair {
                    leg_id: parse_id(RecordKind::Contact, "leg_id", pair[0])?,
                    in_contact: parse_indicator(RecordKind::Contact, "indicator", pair[1])?,
                })
            })
            .collect::<Result<Vec<_>>>()?;

        Ok(Record::Contact(ContactSet {
            timestamp,
            contacts,
        }))
    }
}
