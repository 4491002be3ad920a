//! Backlog entries and their paint status
//!
//! Everything here is persisted; field names and status tags are part of the
//! storage format.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::consts::DEFAULT_QUANTITY;

/// Opaque identifier of a backlog entry
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EntryId(String);

impl EntryId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Millisecond timestamp encoded in the id, if it has one
    pub fn timestamp_ms(&self) -> Option<u64> {
        self.0.parse().ok()
    }
}

impl fmt::Display for EntryId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for EntryId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

/// Paint progress of a squad
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum PaintStatus {
    #[default]
    Unpainted,
    InProgress,
    Painted,
}

impl PaintStatus {
    pub const ALL: [PaintStatus; 3] = [
        PaintStatus::Unpainted,
        PaintStatus::InProgress,
        PaintStatus::Painted,
    ];

    /// Next status in the fixed three-step cycle
    pub fn next(self) -> Self {
        match self {
            PaintStatus::Unpainted => PaintStatus::InProgress,
            PaintStatus::InProgress => PaintStatus::Painted,
            PaintStatus::Painted => PaintStatus::Unpainted,
        }
    }

    /// Storage tag
    pub fn as_str(&self) -> &'static str {
        match self {
            PaintStatus::Unpainted => "unpainted",
            PaintStatus::InProgress => "in_progress",
            PaintStatus::Painted => "painted",
        }
    }

    /// Human-readable label
    pub fn label(&self) -> &'static str {
        match self {
            PaintStatus::Unpainted => "unpainted",
            PaintStatus::InProgress => "in progress",
            PaintStatus::Painted => "painted",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "unpainted" => Some(PaintStatus::Unpainted),
            "in_progress" | "in progress" => Some(PaintStatus::InProgress),
            "painted" => Some(PaintStatus::Painted),
            _ => None,
        }
    }
}

/// One squad on the pile
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BacklogEntry {
    pub id: EntryId,
    pub name: String,
    pub quantity: u32,
    pub status: PaintStatus,
}

impl BacklogEntry {
    /// Fresh entry; always starts unpainted
    pub fn new(id: EntryId, name: impl Into<String>, quantity: u32) -> Self {
        Self {
            id,
            name: name.into(),
            quantity,
            status: PaintStatus::Unpainted,
        }
    }

    /// Advance the status and return the new value
    pub fn cycle(&mut self) -> PaintStatus {
        self.status = self.status.next();
        self.status
    }
}

/// Parse a quantity typed by the user.
///
/// Anything that is not a positive integer (empty, non-numeric, zero,
/// negative, out of range) becomes [`DEFAULT_QUANTITY`].
pub fn parse_quantity(input: &str) -> u32 {
    match input.trim().parse::<i64>() {
        Ok(n) if n > 0 => u32::try_from(n).unwrap_or(DEFAULT_QUANTITY),
        _ => DEFAULT_QUANTITY,
    }
}
