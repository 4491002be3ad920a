//! Presentation values derived from the pile
//!
//! Pure functions of the list; nothing here is stored. The renderer uses them
//! for the backdrop tint, captions, colours and the wobbly box stack.

use glam::Vec2;

use crate::entry::{BacklogEntry, PaintStatus};

/// Backdrop for the current pile height
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Scene {
    /// Tint colour (CSS hex)
    pub background: &'static str,
    /// Caption shown above the pile, empty when there is nothing to say
    pub label: &'static str,
}

impl Scene {
    pub fn for_count(count: usize) -> Self {
        let (background, label) = match count {
            0 => ("#1a1a2e", ""),
            1..=3 => ("#1a2a1a", "🌲 Forest floor..."),
            4..=7 => ("#1a1a3a", "🏙️ Above the rooftops..."),
            8..=11 => ("#0a0f2a", "☁️ Above the clouds..."),
            12..=17 => ("#050518", "🌙 Edge of atmosphere..."),
            _ => ("#000005", "🚀 Lost in space..."),
        };
        Self { background, label }
    }

    pub fn has_label(&self) -> bool {
        !self.label.is_empty()
    }
}

/// What the goblin carrying the pile has to say about it
pub fn goblin_mood(count: usize) -> &'static str {
    match count {
        0 => "Nothing to carry yet...",
        1..=4 => "This is fine.",
        5..=9 => "Getting heavy...",
        10..=14 => "Struggling...",
        _ => "💀 Send help",
    }
}

/// Subtitle used when the scene has no label
pub fn pile_caption(count: usize) -> String {
    match count {
        0 => "No boxes yet...".to_string(),
        1 => "1 box in the pile".to_string(),
        n => format!("{n} boxes in the pile"),
    }
}

/// Second line of an entry's box, e.g. `"3 minis · in progress"`
pub fn entry_caption(entry: &BacklogEntry) -> String {
    let plural = if entry.quantity == 1 { "" } else { "s" };
    format!("{} mini{} · {}", entry.quantity, plural, entry.status.label())
}

/// Fill and border colours for a status
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StatusPalette {
    pub fill: &'static str,
    pub border: &'static str,
}

impl StatusPalette {
    pub fn for_status(status: PaintStatus) -> Self {
        match status {
            PaintStatus::Unpainted => Self {
                fill: "#3d3d6b",
                border: "#5a5a9a",
            },
            PaintStatus::InProgress => Self {
                fill: "#7a5200",
                border: "#d4a017",
            },
            PaintStatus::Painted => Self {
                fill: "#1a5c35",
                border: "#2ecc71",
            },
        }
    }
}

/// Base box size (px)
pub const BOX_SIZE: Vec2 = Vec2::new(260.0, 62.0);
/// Size jitter per axis (px, +/-)
pub const BOX_JITTER: Vec2 = Vec2::new(20.0, 10.0);
/// Horizontal wobble at the bottom of the pile (px, +/-)
pub const BASE_WOBBLE: f32 = 4.0;
/// Extra wobble per box of height
pub const WOBBLE_PER_LEVEL: f32 = 1.5;

/// Stable pseudo-random offset in `[-range, range)` derived from a string.
///
/// Same input, same offset: boxes keep their shape across launches.
pub fn seeded_offset(seed: &str, range: f32) -> f32 {
    let hash = seed
        .bytes()
        .fold(0u32, |h, b| h.wrapping_mul(31).wrapping_add(u32::from(b)));
    let span = ((range * 2.0 * 100.0) as u32).max(1);
    (hash % span) as f32 / 100.0 - range
}

/// Where and how big one box is drawn
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BoxLayout {
    pub size: Vec2,
    /// Horizontal shift from centre (px)
    pub offset_x: f32,
}

impl BoxLayout {
    /// Layout for the box `level` boxes up from the bottom of the pile
    pub fn for_entry(entry: &BacklogEntry, level: usize) -> Self {
        let id = entry.id.as_str();
        let wobble = BASE_WOBBLE + level as f32 * WOBBLE_PER_LEVEL;
        let jitter = Vec2::new(
            seeded_offset(&format!("{id}w"), BOX_JITTER.x),
            seeded_offset(&format!("{id}h"), BOX_JITTER.y),
        );
        Self {
            size: BOX_SIZE + jitter,
            offset_x: seeded_offset(&format!("{id}x"), wobble),
        }
    }

    /// Left margin that centres the box in `container_width`, then wobbles it
    pub fn margin_left(&self, container_width: f32) -> f32 {
        (container_width - self.size.x) / 2.0 + self.offset_x
    }
}

/// Entries in drawing order (newest on top) with their height from the bottom
pub fn render_order(entries: &[BacklogEntry]) -> impl Iterator<Item = (usize, &BacklogEntry)> {
    entries.iter().enumerate().rev()
}
