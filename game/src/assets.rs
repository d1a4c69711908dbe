use std::collections::HashMap;
use std::fs;
use std::io;
use std::path::Path;

use crate::angle::{legacy_sprite_key, sprite_key};
use crate::tricks::TrickMeta;

/// Sprite cell size in the current-generation sheets.
pub const SPRITE_CELL: u32 = 128;

/// Pixel rectangle of one sprite inside a sheet.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SpriteRect {
    pub x: u32,
    pub y: u32,
    pub w: u32,
    pub h: u32,
}

/// Grid cell of the sheet frame behind a logical animation frame.
///
/// Shuv/flip sheets are sampled with a step of 2, so logical frame 3 of a
/// step-2 trick lands on sheet frame 6.
pub fn frame_descriptor(meta: &TrickMeta, logical_frame: u32) -> SpriteRect {
    let sheet_frame = logical_frame * meta.frame_step;
    let per_row = meta.frames_per_row.max(1);
    SpriteRect {
        x: (sheet_frame % per_row) * SPRITE_CELL,
        y: (sheet_frame / per_row) * SPRITE_CELL,
        w: SPRITE_CELL,
        h: SPRITE_CELL,
    }
}

/// Text-table index mapping angle keys to (row, col) cells of the static
/// board sprite sheet.
///
/// The table format is one `"<key> -> <row>,<col>"` entry per line; header
/// and malformed lines are skipped, matching the generator's output, which
/// starts with an "Available sprites" banner.
#[derive(Debug, Clone, Default)]
pub struct SpriteIndex {
    cells: HashMap<String, (u32, u32)>,
}

impl SpriteIndex {
    pub fn parse(text: &str) -> Self {
        let mut cells = HashMap::new();
        for line in text.lines() {
            let Some((key, cell)) = line.split_once(" -> ") else {
                continue;
            };
            let Some((row, col)) = cell.trim().split_once(',') else {
                continue;
            };
            let (Ok(row), Ok(col)) = (row.trim().parse::<u32>(), col.trim().parse::<u32>())
            else {
                continue;
            };
            cells.insert(key.trim().to_string(), (row, col));
        }
        Self { cells }
    }

    pub fn load(path: impl AsRef<Path>) -> io::Result<Self> {
        let text = fs::read_to_string(path)?;
        Ok(Self::parse(&text))
    }

    pub fn len(&self) -> usize {
        self.cells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    pub fn cell(&self, key: &str) -> Option<(u32, u32)> {
        self.cells.get(key).copied()
    }

    /// Looks up the board sprite for a (shuv, flip) rotation, falling back
    /// to the legacy key format older batches were generated with. A miss
    /// is not an error; the render layer skips the draw.
    pub fn sprite_for_angle(&self, shuv: f32, flip: f32) -> Option<SpriteRect> {
        let (row, col) = self
            .cell(&sprite_key(shuv, flip))
            .or_else(|| self.cell(&legacy_sprite_key(shuv, flip)))?;
        Some(SpriteRect {
            x: col * SPRITE_CELL,
            y: row * SPRITE_CELL,
            w: SPRITE_CELL,
            h: SPRITE_CELL,
        })
    }
}
