//! Room entities
//!
//! A room is a rectangle with an integer size and a float center that the
//! separation solver moves until it settles.

use bitflags::bitflags;
use serde::{Deserialize, Serialize};

use super::connection::RoomConnection;
use crate::geometry::{CellRect, Point, Segment};

/// Stable room identifier, unique within one generation run and never below 10
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RoomId(pub u32);

impl RoomId {
    /// Value written into the tile grid for this room's cells
    pub const fn grid_value(self) -> i32 {
        self.0 as i32
    }
}

impl core::fmt::Display for RoomId {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "#{}", self.0)
    }
}

bitflags! {
    /// Room state flags
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
    pub struct RoomFlags: u8 {
        const MAIN = 0x01;
        const VISIBLE = 0x02;
        const LOCKED = 0x04;
        const START = 0x08;
        const END = 0x10;
    }
}

// Manual serde impl for RoomFlags
impl Serialize for RoomFlags {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        self.bits().serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for RoomFlags {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let bits = u8::deserialize(deserializer)?;
        Ok(RoomFlags::from_bits_truncate(bits))
    }
}

/// A rectangular room
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Room {
    pub id: RoomId,
    /// Center in world space
    pub center: Point,
    pub width: u32,
    pub height: u32,
    pub flags: RoomFlags,
    /// Outgoing connections (main rooms only)
    pub connections: Vec<RoomConnection>,
    /// Undirected connection degree in the connectivity graph
    pub degree: u32,
}

impl Room {
    /// Create a new room; rooms start visible and unlocked
    pub fn new(id: RoomId, center: Point, width: u32, height: u32) -> Self {
        Self {
            id,
            center,
            width,
            height,
            flags: RoomFlags::VISIBLE,
            connections: Vec::new(),
            degree: 0,
        }
    }

    pub fn is_main(&self) -> bool {
        self.flags.contains(RoomFlags::MAIN)
    }

    /// Mark as a main room. There is no way back.
    pub fn set_main(&mut self) {
        self.flags.insert(RoomFlags::MAIN);
    }

    pub fn is_visible(&self) -> bool {
        self.flags.contains(RoomFlags::VISIBLE)
    }

    pub fn set_visible(&mut self, visible: bool) {
        self.flags.set(RoomFlags::VISIBLE, visible);
    }

    pub fn is_locked(&self) -> bool {
        self.flags.contains(RoomFlags::LOCKED)
    }

    pub fn set_locked(&mut self, locked: bool) {
        self.flags.set(RoomFlags::LOCKED, locked);
    }

    pub fn is_start(&self) -> bool {
        self.flags.contains(RoomFlags::START)
    }

    pub fn is_end(&self) -> bool {
        self.flags.contains(RoomFlags::END)
    }

    pub fn set_start(&mut self) {
        self.flags.insert(RoomFlags::START);
    }

    pub fn set_end(&mut self) {
        self.flags.insert(RoomFlags::END);
    }

    /// Top-left corner (y grows upward)
    pub fn top_left(&self) -> Point {
        Point::new(
            self.center.x - self.width as f32 / 2.0,
            self.center.y + self.height as f32 / 2.0,
        )
    }

    /// Bottom-right corner (y grows upward)
    pub fn bottom_right(&self) -> Point {
        Point::new(
            self.center.x + self.width as f32 / 2.0,
            self.center.y - self.height as f32 / 2.0,
        )
    }

    /// Integer cells covered by the room
    pub fn cell_rect(&self) -> CellRect {
        let left = (self.center.x - self.width as f32 / 2.0).floor() as i32;
        let bottom = (self.center.y - self.height as f32 / 2.0).floor() as i32;
        CellRect::new(left, bottom, self.width as i32, self.height as i32)
    }

    /// Snap the center to integer coordinates: x rounds up, y rounds down
    pub fn snap(&mut self) {
        self.center = Point::new(self.center.x.ceil(), self.center.y.floor());
    }

    /// Whether an axis-aligned segment crosses any of the room's cells.
    ///
    /// The segment covers the cells its endpoints floor into, the same cells
    /// the rasterizer carves along.
    pub fn intersects_segment(&self, segment: &Segment) -> bool {
        let (min_x, min_y, max_x, max_y) = segment.bounds();
        let (x0, y0) = (min_x.floor() as i32, min_y.floor() as i32);
        let (x1, y1) = (max_x.floor() as i32, max_y.floor() as i32);
        let covered = CellRect::new(x0, y0, x1 - x0 + 1, y1 - y0 + 1);

        self.cell_rect().overlaps(&covered)
    }
}
