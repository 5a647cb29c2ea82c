//! Room separation
//!
//! Overlap resolution is a collaborator: anything that can push rooms apart one
//! step at a time and say which rooms have come to rest. `RepulsionSolver` is
//! the built-in implementation.

use crate::dungeon::RoomSet;
use crate::geometry::CellRect;

/// One simulation step of overlap resolution
pub trait SeparationSolver {
    /// Advance one step.
    ///
    /// Must update every room's locked flag (locked = settled this step) and
    /// snap rooms that are still moving. Returns true when all rooms are settled.
    fn step(&mut self, rooms: &mut RoomSet) -> bool;
}

/// Pushes overlapping rooms apart along their axis of least penetration
#[derive(Debug, Clone, Default)]
pub struct RepulsionSolver {
    steps: u32,
}

impl RepulsionSolver {
    pub fn new() -> Self {
        Self::default()
    }

    /// Steps taken so far
    pub fn steps(&self) -> u32 {
        self.steps
    }
}

impl SeparationSolver for RepulsionSolver {
    fn step(&mut self, rooms: &mut RoomSet) -> bool {
        self.steps += 1;

        let rects: Vec<CellRect> = rooms.iter().map(|r| r.cell_rect()).collect();
        let centers: Vec<(f32, f32)> = rooms.iter().map(|r| (r.center.x, r.center.y)).collect();
        let n = rects.len();

        let mut push = vec![(0.0f32, 0.0f32); n];
        let mut overlapping = vec![false; n];

        // Sweep along x so only rooms whose x spans meet are compared
        let mut order: Vec<usize> = (0..n).collect();
        order.sort_by_key(|&i| (rects[i].left, i));

        for (pos, &i) in order.iter().enumerate() {
            for &j in &order[pos + 1..] {
                if rects[j].left >= rects[i].right() {
                    break;
                }
                let Some((px, py)) = rects[i].penetration(&rects[j]) else {
                    continue;
                };
                overlapping[i] = true;
                overlapping[j] = true;

                // Lower arena index goes toward negative on exact ties
                let (a, b) = if i < j { (i, j) } else { (j, i) };
                if px <= py {
                    let d = px as f32 / 2.0;
                    let sign = if centers[a].0 <= centers[b].0 { -1.0 } else { 1.0 };
                    push[a].0 += sign * d;
                    push[b].0 -= sign * d;
                } else {
                    let d = py as f32 / 2.0;
                    let sign = if centers[a].1 <= centers[b].1 { -1.0 } else { 1.0 };
                    push[a].1 += sign * d;
                    push[b].1 -= sign * d;
                }
            }
        }

        for (idx, room) in rooms.iter_mut().enumerate() {
            if overlapping[idx] {
                room.set_locked(false);
                room.center.x += push[idx].0;
                room.center.y += push[idx].1;
                room.snap();
            } else {
                room.set_locked(true);
            }
        }

        !overlapping.iter().any(|&o| o)
    }
}
