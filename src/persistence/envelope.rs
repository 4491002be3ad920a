//! Storage format for the pile
//!
//! Current saves are `{"version":1,"entries":[...]}`. The first releases
//! wrote the entry array directly, so a bare array decodes as version 0.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use crate::entry::{BacklogEntry, EntryId};

/// Version written by [`encode`]
pub const SCHEMA_VERSION: u32 = 1;

#[derive(Debug, thiserror::Error)]
pub enum DecodeError {
    #[error("malformed backlog json: {0}")]
    Json(#[from] serde_json::Error),

    #[error("unsupported backlog version {0}")]
    UnsupportedVersion(u32),

    #[error("duplicate entry id {0}")]
    DuplicateId(EntryId),

    #[error("entry {0} has zero quantity")]
    ZeroQuantity(EntryId),

    #[error("entry {0} has an empty name")]
    EmptyName(EntryId),
}

#[derive(Serialize)]
struct EnvelopeRef<'a> {
    version: u32,
    entries: &'a [BacklogEntry],
}

#[derive(Deserialize)]
#[serde(untagged)]
enum Stored {
    Versioned {
        version: u32,
        entries: Vec<BacklogEntry>,
    },
    Legacy(Vec<BacklogEntry>),
}

/// Encode the full list
pub fn encode(entries: &[BacklogEntry]) -> Result<Vec<u8>, serde_json::Error> {
    serde_json::to_vec(&EnvelopeRef {
        version: SCHEMA_VERSION,
        entries,
    })
}

/// Decode a stored list, rejecting anything that breaks list invariants
pub fn decode(bytes: &[u8]) -> Result<Vec<BacklogEntry>, DecodeError> {
    let entries = match serde_json::from_slice::<Stored>(bytes)? {
        Stored::Versioned { version, entries } => {
            if version > SCHEMA_VERSION {
                return Err(DecodeError::UnsupportedVersion(version));
            }
            entries
        }
        Stored::Legacy(entries) => entries,
    };

    let mut seen = HashSet::with_capacity(entries.len());
    for entry in &entries {
        if entry.name.trim().is_empty() {
            return Err(DecodeError::EmptyName(entry.id.clone()));
        }
        if entry.quantity == 0 {
            return Err(DecodeError::ZeroQuantity(entry.id.clone()));
        }
        if !seen.insert(&entry.id) {
            return Err(DecodeError::DuplicateId(entry.id.clone()));
        }
    }

    Ok(entries)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entry::PaintStatus;

    fn sample() -> Vec<BacklogEntry> {
        let mut painted = BacklogEntry::new(EntryId::new("2"), "Space Marines", 5);
        painted.status = PaintStatus::Painted;
        vec![
            BacklogEntry::new(EntryId::new("1"), "Orks", 20),
            painted,
        ]
    }

    #[test]
    fn test_encode_writes_versioned_envelope() {
        let bytes = encode(&sample()).unwrap();
        let value: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(value["version"], SCHEMA_VERSION);
        assert_eq!(value["entries"][1]["status"], "painted");
    }

    #[test]
    fn test_round_trip_keeps_order() {
        let entries = sample();
        let decoded = decode(&encode(&entries).unwrap()).unwrap();
        assert_eq!(decoded, entries);

        let empty = decode(&encode(&[]).unwrap()).unwrap();
        assert!(empty.is_empty());
    }

    #[test]
    fn test_legacy_array_loads() {
        let legacy = br#"[{"id":"1712345678901","name":"Necrons","quantity":10,"status":"in_progress"}]"#;
        let decoded = decode(legacy).unwrap();
        assert_eq!(decoded.len(), 1);
        assert_eq!(decoded[0].name, "Necrons");
        assert_eq!(decoded[0].status, PaintStatus::InProgress);
    }

    #[test]
    fn test_rejects_future_version() {
        let bytes = br#"{"version":99,"entries":[]}"#;
        assert!(matches!(decode(bytes), Err(DecodeError::UnsupportedVersion(99))));
    }

    #[test]
    fn test_rejects_broken_invariants() {
        let dup = br#"[{"id":"1","name":"a","quantity":1,"status":"unpainted"},
                       {"id":"1","name":"b","quantity":2,"status":"painted"}]"#;
        assert!(matches!(decode(dup), Err(DecodeError::DuplicateId(_))));

        let zero = br#"[{"id":"1","name":"a","quantity":0,"status":"unpainted"}]"#;
        assert!(matches!(decode(zero), Err(DecodeError::ZeroQuantity(_))));

        let blank = br#"[{"id":"1","name":"  ","quantity":1,"status":"unpainted"}]"#;
        assert!(matches!(decode(blank), Err(DecodeError::EmptyName(_))));

        let bad_status = br#"[{"id":"1","name":"a","quantity":1,"status":"primed"}]"#;
        assert!(matches!(decode(bad_status), Err(DecodeError::Json(_))));

        assert!(decode(b"not json").is_err());
    }
}
