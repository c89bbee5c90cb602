//! Deterministic identity assignment
//!
//! The canonical rank is a stable sort on `(date, source_key)` - never on
//! the order the caller discovered the invoices in. Determinism comes from
//! the algorithm, not from serialized access: the whole batch is collected
//! first, then ranked in one single-threaded pass.

use std::collections::{BTreeMap, HashMap};

use tracing::warn;

use crate::error::NumberingError;
use crate::identity::{CanonicalId, InvoiceIdentity, InvoiceRecord};

/// Assigns invoice identities over a batch of invoice metadata records
#[derive(Debug, Clone, Copy, Default)]
pub struct NumberingService;

impl NumberingService {
    pub fn new() -> Self {
        Self
    }

    /// Assigns an identity to every record; the result is parallel to the
    /// input slice.
    ///
    /// Within a client prefix, records missing an explicit work sequence
    /// receive their 1-based chronological rank. Within each
    /// `(prefix, work sequence)` group, series invoices receive a 1-based
    /// counter over the sorted group; standalone invoices always receive
    /// `00` and never consume a counter slot. Explicit overrides are used
    /// verbatim and never shift the counters of sibling invoices.
    pub fn assign_identities(
        &self,
        records: &[InvoiceRecord],
    ) -> Result<Vec<InvoiceIdentity>, NumberingError> {
        let work_sequences = resolve_work_sequences(records);

        let mut groups: BTreeMap<(&str, &str), Vec<usize>> = BTreeMap::new();
        for (index, record) in records.iter().enumerate() {
            groups
                .entry((record.prefix.as_str(), work_sequences[index].as_str()))
                .or_default()
                .push(index);
        }

        let mut identities: Vec<Option<InvoiceIdentity>> = vec![None; records.len()];

        for ((prefix, work_sequence), mut members) in groups {
            sort_by_rank(records, &mut members);
            check_ambiguous_ranks(records, &members);

            let mut claimed_faces: HashMap<&str, &str> = HashMap::new();
            let mut claimed_sequences: HashMap<&str, &str> = HashMap::new();
            let mut counter = 0u32;

            for index in members {
                let record = &records[index];

                let ranked_sequence = if record.contract_series {
                    counter += 1;
                    format!("{:02}", counter)
                } else {
                    "00".to_string()
                };

                let invoice_sequence = match &record.sequence_override {
                    Some(sequence) => {
                        claim(
                            &mut claimed_sequences,
                            sequence,
                            &record.source_key,
                        )?;
                        sequence.clone()
                    }
                    None => ranked_sequence,
                };

                let canonical = CanonicalId {
                    prefix: prefix.to_string(),
                    work_sequence: work_sequence.to_string(),
                    invoice_sequence,
                    date: record.date,
                };

                let face_number = match &record.face_override {
                    Some(number) => {
                        claim(&mut claimed_faces, number, &record.source_key)?;
                        number.clone()
                    }
                    None => canonical.to_string(),
                };

                identities[index] = Some(InvoiceIdentity {
                    face_number,
                    canonical,
                });
            }
        }

        // Every record belongs to exactly one group, so every slot is filled.
        Ok(identities.into_iter().flatten().collect())
    }
}

/// Chronological rank within each client prefix, for records that carry no
/// explicit work sequence.
fn resolve_work_sequences(records: &[InvoiceRecord]) -> Vec<String> {
    let mut by_prefix: BTreeMap<&str, Vec<usize>> = BTreeMap::new();
    for (index, record) in records.iter().enumerate() {
        by_prefix
            .entry(record.prefix.as_str())
            .or_default()
            .push(index);
    }

    let mut resolved = vec![String::new(); records.len()];
    for (_, mut members) in by_prefix {
        sort_by_rank(records, &mut members);
        for (position, index) in members.into_iter().enumerate() {
            resolved[index] = match &records[index].work_sequence {
                Some(explicit) => explicit.clone(),
                None => format!("{:02}", position + 1),
            };
        }
    }
    resolved
}

fn sort_by_rank(records: &[InvoiceRecord], members: &mut [usize]) {
    // Stable sort: exact ties keep their encounter order.
    members.sort_by(|&a, &b| {
        (records[a].date, records[a].source_key.as_str())
            .cmp(&(records[b].date, records[b].source_key.as_str()))
    });
}

fn check_ambiguous_ranks(records: &[InvoiceRecord], members: &[usize]) {
    for pair in members.windows(2) {
        let (a, b) = (&records[pair[0]], &records[pair[1]]);
        if a.date == b.date && a.source_key == b.source_key {
            warn!(
                source_key = a.source_key.as_str(),
                date = %a.date,
                "ambiguous rank: records share both sort keys; preserving encounter order"
            );
        }
    }
}

fn claim<'a>(
    claimed: &mut HashMap<&'a str, &'a str>,
    number: &'a str,
    source_key: &'a str,
) -> Result<(), NumberingError> {
    if let Some(first) = claimed.insert(number, source_key) {
        return Err(NumberingError::DuplicateOverride {
            number: number.to_string(),
            first: first.to_string(),
            second: source_key.to_string(),
        });
    }
    Ok(())
}
