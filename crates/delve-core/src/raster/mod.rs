//! Rasterization of rooms and hallways into a tile grid
//!
//! Runs in five passes over one grid:
//!
//! 1. stamp visible rooms with their IDs
//! 2. carve 3-wide hallways along the route segments
//! 3. wall off main rooms and the occupied region
//! 4. punch doors through walls and close diagonal gaps
//! 5. trim door runs longer than [`DOOR_RUN_LENGTH`]
//!
//! Passes 3 and 4 read a snapshot of the grid taken before the pass, so the
//! order cells are visited in never changes the outcome.

mod tile;

pub use tile::{Cell, TileGrid, TileType};

use std::collections::BTreeSet;

use log::debug;
use serde::{Deserialize, Serialize};

use crate::consts::{DOOR_RUN_LENGTH, HALLWAY_WIDTH};
use crate::dungeon::RoomSet;
use crate::error::Result;
use crate::geometry::{Point, Segment};

const NOTHING: i32 = TileType::Nothing.value();
const HALLWAY: i32 = TileType::Hallway.value();
const WALL: i32 = TileType::Wall.value();
const DOOR: i32 = TileType::Door.value();

const AXES: [(i32, i32); 2] = [(1, 0), (0, 1)];
const DIRECTIONS: [(i32, i32); 4] = [(-1, 0), (1, 0), (0, -1), (0, 1)];

/// Where the grid sits in world cell coordinates
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct GridOrigin {
    /// World cell x at grid index 1
    pub x: i32,
    /// World cell y at grid index 1
    pub y: i32,
}

impl GridOrigin {
    /// Grid index of a world position, unclamped
    pub fn to_grid(&self, p: Point) -> (i32, i32) {
        (p.x.floor() as i32 - self.x + 1, p.y.floor() as i32 - self.y + 1)
    }
}

/// Turns visible rooms and routed connections into a tile grid
#[derive(Debug, Clone, Copy, Default)]
pub struct GridRasterizer;

impl GridRasterizer {
    pub fn new() -> Self {
        Self
    }

    pub fn rasterize(&self, rooms: &RoomSet) -> Result<(TileGrid, GridOrigin)> {
        let mut raster = Raster::stamp(rooms)?;

        let segments: Vec<Segment> = rooms
            .main_rooms()
            .flat_map(|r| r.connections.iter())
            .filter_map(|c| c.route())
            .flat_map(|(a, b)| [a, b])
            .collect();
        for segment in &segments {
            raster.carve(segment)?;
        }

        raster.wall_pass_borders()?;
        raster.wall_pass_doors()?;
        let trimmed = raster.normalize_doors()?;

        debug!(
            "raster: {}x{} grid, {} segments, {} doors, {} door cells trimmed",
            raster.grid.width(),
            raster.grid.height(),
            segments.len(),
            raster.grid.count(TileType::Door),
            trimmed
        );

        Ok((raster.grid, raster.origin))
    }
}

struct Raster {
    grid: TileGrid,
    origin: GridOrigin,
    main_ids: BTreeSet<i32>,
}

impl Raster {
    /// Allocate the grid around the visible rooms and write their IDs
    fn stamp(rooms: &RoomSet) -> Result<Self> {
        let rects: Vec<_> = rooms
            .visible_rooms()
            .map(|r| (r.id.grid_value(), r.cell_rect()))
            .collect();

        let min_x = rects.iter().map(|(_, r)| r.left).min().unwrap_or(0);
        let min_y = rects.iter().map(|(_, r)| r.bottom).min().unwrap_or(0);
        let max_x = rects.iter().map(|(_, r)| r.right()).max().unwrap_or(0);
        let max_y = rects.iter().map(|(_, r)| r.top()).max().unwrap_or(0);

        let origin = GridOrigin { x: min_x, y: min_y };
        let mut grid = TileGrid::new(
            (max_x - min_x) as usize + 2,
            (max_y - min_y) as usize + 2,
        );

        for (id, rect) in &rects {
            for x in rect.left..rect.right() {
                for y in rect.bottom..rect.top() {
                    grid.set(x - min_x + 1, y - min_y + 1, *id)?;
                }
            }
        }

        let main_ids = rooms
            .main_rooms()
            .filter(|r| r.is_visible())
            .map(|r| r.id.grid_value())
            .collect();

        Ok(Self {
            grid,
            origin,
            main_ids,
        })
    }

    fn is_main(&self, value: Option<i32>) -> bool {
        value.is_some_and(|v| self.main_ids.contains(&v))
    }

    /// Grid index of a route point, clamped into the grid
    fn clamp_point(&self, p: Point) -> (i32, i32) {
        let (x, y) = self.origin.to_grid(p);
        let max_x = self.grid.width() as i32 - 1;
        let max_y = self.grid.height() as i32 - 1;
        (x.clamp(0, max_x.max(0)), y.clamp(0, max_y.max(0)))
    }

    fn fill_if_empty(&mut self, x: i32, y: i32) -> Result<()> {
        if self.grid.get(x, y) == Some(NOTHING) {
            self.grid.set(x, y, HALLWAY)?;
        }
        Ok(())
    }

    /// Carve one axis-aligned segment, widened to the hallway width
    fn carve(&mut self, segment: &Segment) -> Result<()> {
        let (x0, y0) = self.clamp_point(segment.p0);
        let (x1, y1) = self.clamp_point(segment.p1);

        // Vertical legs widen along x, horizontal legs along y
        let (fixed, from, to, vertical) = if x0 == x1 {
            (x0, y0.min(y1), y0.max(y1), true)
        } else if y0 == y1 {
            (y0, x0.min(x1), x0.max(x1), false)
        } else {
            return Ok(());
        };

        let extent = if vertical {
            self.grid.width() as i32
        } else {
            self.grid.height() as i32
        };
        let side = if fixed < extent - 2 { 1 } else { -1 };

        for along in from..=to {
            for k in 0..HALLWAY_WIDTH {
                let across = fixed + side * k;
                if vertical {
                    self.fill_if_empty(across, along)?;
                } else {
                    self.fill_if_empty(along, across)?;
                }
            }
        }
        Ok(())
    }

    /// Wall off main rooms, then the edge of everything occupied
    fn wall_pass_borders(&mut self) -> Result<()> {
        let snap = self.grid.clone();
        let (width, height) = (snap.width() as i32, snap.height() as i32);

        for x in 0..width {
            for y in 0..height {
                let val = snap.get(x, y).unwrap_or(NOTHING);

                if self.main_ids.contains(&val) {
                    // First differing neighbor per axis, lower side first
                    for (dx, dy) in AXES {
                        for (nx, ny) in [(x - dx, y - dy), (x + dx, y + dy)] {
                            if let Some(n) = snap.get(nx, ny) {
                                if n != val && n != WALL {
                                    self.grid.set(nx, ny, WALL)?;
                                    break;
                                }
                            }
                        }
                    }
                }

                if val == NOTHING {
                    let touches_occupied = DIRECTIONS.iter().any(|&(dx, dy)| {
                        snap.get(x + dx, y + dy)
                            .is_some_and(|n| n != NOTHING && n != WALL)
                    });
                    if touches_occupied {
                        self.grid.set(x, y, WALL)?;
                    }
                }
            }
        }
        Ok(())
    }

    /// Open doors between main rooms and their surroundings, and close diagonal gaps
    fn wall_pass_doors(&mut self) -> Result<()> {
        let snap = self.grid.clone();
        let (width, height) = (snap.width() as i32, snap.height() as i32);
        let open = |v: Option<i32>| v.is_some_and(|v| v != NOTHING && v != WALL);

        for x in 0..width {
            for y in 0..height {
                match snap.get(x, y) {
                    Some(WALL) => {
                        // Single wall between a main room and something walkable
                        for (dx, dy) in AXES {
                            let a = snap.get(x - dx, y - dy);
                            let b = snap.get(x + dx, y + dy);
                            if open(a) && open(b) && (self.is_main(a) || self.is_main(b)) {
                                self.grid.set(x, y, DOOR)?;
                            }
                        }

                        // Double wall with a main room behind it
                        for (dx, dy) in DIRECTIONS {
                            if snap.get(x + dx, y + dy) == Some(WALL)
                                && self.is_main(snap.get(x + 2 * dx, y + 2 * dy))
                                && open(snap.get(x - dx, y - dy))
                            {
                                self.grid.set(x, y, DOOR)?;
                                self.grid.set(x + dx, y + dy, DOOR)?;
                            }
                        }
                    }
                    Some(NOTHING) => {
                        let wall = |dx: i32, dy: i32| snap.get(x + dx, y + dy) == Some(WALL);
                        let horizontal = wall(-1, 0) || wall(1, 0);
                        let vertical = wall(0, -1) || wall(0, 1);
                        if horizontal && vertical {
                            self.grid.set(x, y, WALL)?;
                        }
                    }
                    _ => {}
                }
            }
        }
        Ok(())
    }

    /// Trim every door run longer than the hallway back to its length, rows
    /// first. Returns the number of trimmed cells.
    fn normalize_doors(&mut self) -> Result<usize> {
        let mut trimmed = 0;
        for (dx, dy) in AXES {
            trimmed += self.normalize_door_runs(dx, dy)?;
        }
        Ok(trimmed)
    }

    fn normalize_door_runs(&mut self, dx: i32, dy: i32) -> Result<usize> {
        let (width, height) = (self.grid.width() as i32, self.grid.height() as i32);
        // Lines run along (dx, dy); `lanes` counts the parallel lines
        let (lanes, length) = if dx == 1 { (height, width) } else { (width, height) };
        let at = |lane: i32, i: i32| (i * dx + lane * dy, i * dy + lane * dx);

        let mut trimmed = 0;
        for lane in 0..lanes {
            let mut i = 0;
            while i < length {
                let (x, y) = at(lane, i);
                if self.grid.get(x, y) != Some(DOOR) {
                    i += 1;
                    continue;
                }

                let start = i;
                while i < length {
                    let (x, y) = at(lane, i);
                    if self.grid.get(x, y) != Some(DOOR) {
                        break;
                    }
                    i += 1;
                }
                let run = (i - start) as usize;

                if run > DOOR_RUN_LENGTH {
                    let excess = run - DOOR_RUN_LENGTH;
                    let head = excess.div_ceil(2) as i32;
                    let tail = (excess / 2) as i32;
                    for j in (start..start + head).chain(i - tail..i) {
                        let (x, y) = at(lane, j);
                        self.grid.set(x, y, WALL)?;
                    }
                    trimmed += excess;
                }
            }
        }
        Ok(trimmed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dungeon::{ConnectionKind, Direction, RoomConnection, RoomId};
    use crate::routing::route_between;

    fn raster_with(width: usize, height: usize) -> Raster {
        Raster {
            grid: TileGrid::new(width, height),
            origin: GridOrigin::default(),
            main_ids: BTreeSet::new(),
        }
    }

    fn row(grid: &TileGrid, y: i32) -> String {
        (0..grid.width() as i32)
            .map(|x| match grid.cell(x, y) {
                Some(Cell::Tile(t)) => t.symbol(),
                Some(Cell::Room(_)) => '.',
                None => '?',
            })
            .collect()
    }

    #[test]
    fn test_stamp_dimensions_and_offset() {
        let mut rooms = RoomSet::new();
        let a = rooms.create(Point::new(0.0, 0.0), 4, 4);
        let b = rooms.create(Point::new(10.0, 5.0), 6, 3);
        let hidden = rooms.create(Point::new(50.0, 50.0), 3, 3);
        rooms.get_mut(hidden).unwrap().set_visible(false);

        let raster = Raster::stamp(&rooms).unwrap();
        // x spans [-2, 13), y spans [-2, 6)
        assert_eq!(raster.grid.width(), 15 + 2);
        assert_eq!(raster.grid.height(), 8 + 2);
        assert_eq!(raster.origin, GridOrigin { x: -2, y: -2 });

        assert_eq!(raster.grid.room(1, 1), Some(a));
        assert_eq!(raster.grid.room(4, 4), Some(a));
        assert_eq!(raster.grid.room(0, 0), None);
        assert_eq!(raster.grid.room(15, 7), Some(b));
        assert_eq!(raster.grid.tile(16, 9), Some(TileType::Nothing));
    }

    #[test]
    fn test_carve_vertical_widens_positive_x() {
        let mut raster = raster_with(10, 10);
        raster.grid.set(2, 5, 10).unwrap();
        raster
            .carve(&Segment::new(Point::new(1.0, 7.0), Point::new(1.0, 3.0)))
            .unwrap();

        for y in 4..=8 {
            assert_eq!(raster.grid.tile(2, y).is_some(), y != 6);
        }
        assert_eq!(raster.grid.tile(2, 4), Some(TileType::Hallway));
        assert_eq!(raster.grid.tile(3, 8), Some(TileType::Hallway));
        assert_eq!(raster.grid.tile(5, 8), Some(TileType::Nothing));
        // room cells are left alone
        assert_eq!(raster.grid.room(2, 6), Some(RoomId(10)));
        assert_eq!(raster.grid.count(TileType::Hallway), 14);
    }

    #[test]
    fn test_carve_near_far_edge_widens_negative() {
        let mut raster = raster_with(10, 6);
        raster
            .carve(&Segment::new(Point::new(0.0, 4.0), Point::new(5.0, 4.0)))
            .unwrap();
        // grid y 5 is within two cells of the top, so the hallway grows downward
        assert_eq!(row(&raster.grid, 5), " ######   ");
        assert_eq!(row(&raster.grid, 3), " ######   ");
        assert_eq!(row(&raster.grid, 2), "          ");
    }

    #[test]
    fn test_carve_clamps_overshoot() {
        let mut raster = raster_with(8, 8);
        raster
            .carve(&Segment::new(Point::new(2.0, 2.0), Point::new(2.0, 40.0)))
            .unwrap();
        assert_eq!(raster.grid.tile(3, 7), Some(TileType::Hallway));
    }

    #[test]
    fn test_lone_main_room_is_walled() {
        let mut rooms = RoomSet::new();
        let id = rooms.create(Point::new(0.0, 0.0), 4, 3);
        rooms.get_mut(id).unwrap().set_main();

        let (grid, _) = GridRasterizer::new().rasterize(&rooms).unwrap();
        assert_eq!(grid.width(), 6);
        assert_eq!(grid.height(), 5);
        // corners are filled by the diagonal gap rule
        assert_eq!(grid.to_string(), "XXXXXX\nX....X\nX....X\nX....X\nXXXXXX\n");
    }

    #[test]
    fn test_corner_gap_closed() {
        let mut raster = raster_with(3, 3);
        raster.grid.set_tile(0, 1, TileType::Wall).unwrap();
        raster.grid.set_tile(1, 0, TileType::Wall).unwrap();
        raster.wall_pass_doors().unwrap();
        assert_eq!(raster.grid.tile(1, 1), Some(TileType::Wall));
        assert_eq!(raster.grid.tile(2, 2), Some(TileType::Nothing));
    }

    #[test]
    fn test_sandwiched_wall_becomes_door() {
        let mut raster = raster_with(5, 3);
        raster.main_ids.insert(10);
        raster.grid.set(1, 1, 10).unwrap();
        raster.grid.set_tile(2, 1, TileType::Wall).unwrap();
        raster.grid.set_tile(3, 1, TileType::Hallway).unwrap();
        raster.wall_pass_doors().unwrap();
        assert_eq!(raster.grid.tile(2, 1), Some(TileType::Door));
    }

    #[test]
    fn test_wall_between_secondary_and_hallway_stays() {
        let mut raster = raster_with(5, 3);
        raster.grid.set(1, 1, 11).unwrap();
        raster.grid.set_tile(2, 1, TileType::Wall).unwrap();
        raster.grid.set_tile(3, 1, TileType::Hallway).unwrap();
        raster.wall_pass_doors().unwrap();
        assert_eq!(raster.grid.tile(2, 1), Some(TileType::Wall));
    }

    #[test]
    fn test_double_wall_opens() {
        let mut raster = raster_with(6, 3);
        raster.main_ids.insert(10);
        raster.grid.set(1, 1, 10).unwrap();
        raster.grid.set_tile(2, 1, TileType::Wall).unwrap();
        raster.grid.set_tile(3, 1, TileType::Wall).unwrap();
        raster.grid.set_tile(4, 1, TileType::Hallway).unwrap();
        raster.wall_pass_doors().unwrap();
        assert_eq!(raster.grid.tile(2, 1), Some(TileType::Door));
        assert_eq!(raster.grid.tile(3, 1), Some(TileType::Door));
    }

    #[test]
    fn test_door_runs_trimmed() {
        let mut raster = raster_with(12, 10);
        // row run of 8 at y = 1: excess 5 trims 3 from the start, 2 from the end
        for x in 1..9 {
            raster.grid.set_tile(x, 1, TileType::Door).unwrap();
        }
        // column run of 5 at x = 10
        for y in 3..8 {
            raster.grid.set_tile(10, y, TileType::Door).unwrap();
        }
        // short runs stay
        raster.grid.set_tile(1, 8, TileType::Door).unwrap();

        let trimmed = raster.normalize_doors().unwrap();
        assert_eq!(trimmed, 7);
        assert_eq!(row(&raster.grid, 1), " XXX+++XX   ");
        let column: String = (0..10)
            .map(|y| raster.grid.tile(10, y).map_or('?', |t| t.symbol()))
            .collect();
        assert_eq!(column, "   X+++X  ");
        assert_eq!(raster.grid.tile(1, 8), Some(TileType::Door));
    }

    #[test]
    fn test_connected_pair() {
        let mut rooms = RoomSet::new();
        let a = rooms.create(Point::new(0.0, 0.0), 6, 6);
        let b = rooms.create(Point::new(20.0, 0.0), 6, 6);
        for id in [a, b] {
            rooms.get_mut(id).unwrap().set_main();
        }
        let (line1, line2) = route_between(
            Point::new(0.0, 0.0),
            Point::new(20.0, 0.0),
            Direction::Right,
        );
        let mut conn = RoomConnection::new(b, Direction::Right, ConnectionKind::SpanningTree);
        conn.line1 = Some(line1);
        conn.line2 = Some(line2);
        rooms.get_mut(a).unwrap().connections.push(conn);

        let (grid, origin) = GridRasterizer::new().rasterize(&rooms).unwrap();
        assert_eq!(origin, GridOrigin { x: -3, y: -3 });

        // the hallway leaves a at its right wall and enters b at its left wall
        let (ax, ay) = origin.to_grid(Point::new(3.0, 0.0));
        let (bx, _) = origin.to_grid(Point::new(16.0, 0.0));
        for dy in 0..3 {
            assert_eq!(grid.tile(ax, ay + dy), Some(TileType::Door));
            assert_eq!(grid.tile(bx, ay + dy), Some(TileType::Door));
        }
        assert_eq!(grid.tile(ax + 1, ay + 1), Some(TileType::Hallway));
        assert_eq!(grid.count(TileType::Door), 6);
    }
}
