//! Points, route segments and integer cell rectangles

use serde::{Deserialize, Serialize};

/// A point in world space
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Point {
    pub x: f32,
    pub y: f32,
}

impl Point {
    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    /// Euclidean distance to another point
    pub fn distance(self, other: Point) -> f32 {
        let dx = self.x - other.x;
        let dy = self.y - other.y;
        (dx * dx + dy * dy).sqrt()
    }
}

/// One axis-aligned leg of a route
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Segment {
    pub p0: Point,
    pub p1: Point,
}

impl Segment {
    pub const fn new(p0: Point, p1: Point) -> Self {
        Self { p0, p1 }
    }

    /// Both ends share an x coordinate (zero-length segments count as vertical)
    pub fn is_vertical(&self) -> bool {
        self.p0.x == self.p1.x
    }

    pub fn is_horizontal(&self) -> bool {
        self.p0.y == self.p1.y
    }

    /// Axis-aligned bounds as (min x, min y, max x, max y)
    pub fn bounds(&self) -> (f32, f32, f32, f32) {
        (
            self.p0.x.min(self.p1.x),
            self.p0.y.min(self.p1.y),
            self.p0.x.max(self.p1.x),
            self.p0.y.max(self.p1.y),
        )
    }
}

/// Half-open integer rectangle of grid cells, `[left, left + width) x [bottom, bottom + height)`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CellRect {
    pub left: i32,
    pub bottom: i32,
    pub width: i32,
    pub height: i32,
}

impl CellRect {
    pub const fn new(left: i32, bottom: i32, width: i32, height: i32) -> Self {
        Self {
            left,
            bottom,
            width,
            height,
        }
    }

    /// Exclusive right edge
    pub const fn right(&self) -> i32 {
        self.left + self.width
    }

    /// Exclusive top edge
    pub const fn top(&self) -> i32 {
        self.bottom + self.height
    }

    /// Check if the rectangles share at least one cell
    pub const fn overlaps(&self, other: &CellRect) -> bool {
        !(self.right() <= other.left
            || other.right() <= self.left
            || self.top() <= other.bottom
            || other.top() <= self.bottom)
    }

    /// Overlap depth along x and y, or `None` if the rectangles are disjoint
    pub fn penetration(&self, other: &CellRect) -> Option<(i32, i32)> {
        if !self.overlaps(other) {
            return None;
        }
        let px = self.right().min(other.right()) - self.left.max(other.left);
        let py = self.top().min(other.top()) - self.bottom.max(other.bottom);
        Some((px, py))
    }
}
