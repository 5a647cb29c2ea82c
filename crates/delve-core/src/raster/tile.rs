//! Tile values and the tile grid

use serde::{Deserialize, Serialize};
use strum::{Display, EnumIter};

use crate::consts::FIRST_ROOM_ID;
use crate::dungeon::RoomId;
use crate::error::{GenerationError, Result};

/// Non-room tile kinds. Their values never collide with room IDs.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize, Display, EnumIter,
)]
#[repr(u8)]
pub enum TileType {
    #[default]
    Nothing = 0,
    Hallway = 1,
    Wall = 2,
    Door = 3,
}

impl TileType {
    /// Raw grid value
    pub const fn value(self) -> i32 {
        self as i32
    }

    pub const fn from_value(value: i32) -> Option<Self> {
        match value {
            0 => Some(TileType::Nothing),
            1 => Some(TileType::Hallway),
            2 => Some(TileType::Wall),
            3 => Some(TileType::Door),
            _ => None,
        }
    }

    /// Get the display character for this tile type
    pub const fn symbol(&self) -> char {
        match self {
            TileType::Nothing => ' ',
            TileType::Hallway => '#',
            TileType::Wall => 'X',
            TileType::Door => '+',
        }
    }
}

/// Decoded grid cell
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Cell {
    Tile(TileType),
    Room(RoomId),
}

impl Cell {
    pub fn from_value(value: i32) -> Self {
        match TileType::from_value(value) {
            Some(tile) => Cell::Tile(tile),
            None => Cell::Room(RoomId(value as u32)),
        }
    }

    pub fn value(self) -> i32 {
        match self {
            Cell::Tile(tile) => tile.value(),
            Cell::Room(id) => id.grid_value(),
        }
    }
}

/// Column-major grid of cell values, indexed `[x][y]` with y growing upward
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TileGrid {
    width: usize,
    height: usize,
    cells: Vec<Vec<i32>>,
}

impl TileGrid {
    /// Grid filled with `Nothing`
    pub fn new(width: usize, height: usize) -> Self {
        Self {
            width,
            height,
            cells: vec![vec![TileType::Nothing.value(); height]; width],
        }
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn in_bounds(&self, x: i32, y: i32) -> bool {
        x >= 0 && y >= 0 && (x as usize) < self.width && (y as usize) < self.height
    }

    /// Raw value, `None` outside the grid
    pub fn get(&self, x: i32, y: i32) -> Option<i32> {
        if self.in_bounds(x, y) {
            Some(self.cells[x as usize][y as usize])
        } else {
            None
        }
    }

    pub fn cell(&self, x: i32, y: i32) -> Option<Cell> {
        self.get(x, y).map(Cell::from_value)
    }

    /// Tile at a position; `None` outside the grid or on a room cell
    pub fn tile(&self, x: i32, y: i32) -> Option<TileType> {
        self.get(x, y).and_then(TileType::from_value)
    }

    /// Room occupying a position
    pub fn room(&self, x: i32, y: i32) -> Option<RoomId> {
        self.get(x, y)
            .filter(|&v| v >= FIRST_ROOM_ID as i32)
            .map(|v| RoomId(v as u32))
    }

    /// Write a raw value
    pub fn set(&mut self, x: i32, y: i32, value: i32) -> Result<()> {
        if !self.in_bounds(x, y) {
            return Err(GenerationError::GridIndexOutOfRange {
                x: i64::from(x),
                y: i64::from(y),
                width: self.width,
                height: self.height,
            });
        }
        self.cells[x as usize][y as usize] = value;
        Ok(())
    }

    pub fn set_tile(&mut self, x: i32, y: i32, tile: TileType) -> Result<()> {
        self.set(x, y, tile.value())
    }

    /// Number of cells holding `tile`
    pub fn count(&self, tile: TileType) -> usize {
        self.cells
            .iter()
            .flatten()
            .filter(|&&v| v == tile.value())
            .count()
    }

    /// Render rows top to bottom, mapping each cell through `symbol`
    pub fn render_with<F>(&self, mut symbol: F) -> String
    where
        F: FnMut(Cell) -> char,
    {
        let mut out = String::with_capacity((self.width + 1) * self.height);
        for y in (0..self.height).rev() {
            for x in 0..self.width {
                out.push(symbol(Cell::from_value(self.cells[x][y])));
            }
            out.push('\n');
        }
        out
    }
}

impl core::fmt::Display for TileGrid {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        let text = self.render_with(|cell| match cell {
            Cell::Tile(tile) => tile.symbol(),
            Cell::Room(_) => '.',
        });
        f.write_str(&text)
    }
}
