use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LayoutEntry {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

impl LayoutEntry {
    pub fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    pub fn center(&self) -> (f32, f32) {
        (self.x + self.width / 2.0, self.y + self.height / 2.0)
    }

    pub fn right(&self) -> f32 {
        self.x + self.width
    }

    pub fn bottom(&self) -> f32 {
        self.y + self.height
    }

    pub fn translated(&self, dx: f32, dy: f32) -> Self {
        Self {
            x: self.x + dx,
            y: self.y + dy,
            ..*self
        }
    }

    pub fn inflated(&self, by: f32) -> Self {
        Self {
            x: self.x - by,
            y: self.y - by,
            width: self.width + 2.0 * by,
            height: self.height + 2.0 * by,
        }
    }
}

/// Element id → box. Ordered so iteration (and serialization) is deterministic.
pub type LayoutMap = BTreeMap<String, LayoutEntry>;

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct Bounds {
    pub min_x: f32,
    pub min_y: f32,
    pub max_x: f32,
    pub max_y: f32,
}

impl Bounds {
    /// Bounding box of all entries. An empty map yields the zero box rather
    /// than an inverted infinite one.
    pub fn of(entries: &LayoutMap) -> Self {
        let mut iter = entries.values();
        let Some(first) = iter.next() else {
            return Self::default();
        };
        iter.fold(
            Self {
                min_x: first.x,
                min_y: first.y,
                max_x: first.right(),
                max_y: first.bottom(),
            },
            |acc, entry| Self {
                min_x: acc.min_x.min(entry.x),
                min_y: acc.min_y.min(entry.y),
                max_x: acc.max_x.max(entry.right()),
                max_y: acc.max_y.max(entry.bottom()),
            },
        )
    }

    pub fn width(&self) -> f32 {
        self.max_x - self.min_x
    }

    pub fn height(&self) -> f32 {
        self.max_y - self.min_y
    }
}

/// Layout translated so the diagram's top-left sits at `(padding, padding)`.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Layout {
    pub entries: LayoutMap,
    /// ViewBox size, padding included on both sides.
    pub width: f32,
    pub height: f32,
}

impl Layout {
    pub fn get(&self, id: &str) -> Option<&LayoutEntry> {
        self.entries.get(id)
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
