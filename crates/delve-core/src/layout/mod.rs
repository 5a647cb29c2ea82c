//! Room placement and settling
//!
//! Rooms are scattered inside a disk, the largest ones are promoted to main
//! rooms, and a separation solver pushes everything apart until no two rooms
//! share a cell (or the step cap runs out).

mod separation;

pub use separation::{RepulsionSolver, SeparationSolver};

use serde::{Deserialize, Serialize};

use crate::config::{GeneratorConfig, MainRoomThreshold};
use crate::consts::SIZE_DISTRIBUTION;
use crate::dungeon::RoomSet;
use crate::geometry::Point;
use crate::rng::DungeonRng;

/// Outcome of the settling phase
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct LayoutReport {
    /// Solver steps taken
    pub steps: u32,
    /// All rooms settled before the cap
    pub converged: bool,
}

/// Result of advancing the settling phase by one step
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SettleStatus {
    /// Rooms still overlap and steps remain
    Pending { steps: u32 },
    /// Every room is locked
    Settled(LayoutReport),
    /// The cap was reached with overlaps remaining
    CapReached(LayoutReport),
}

impl SettleStatus {
    pub fn is_done(&self) -> bool {
        !matches!(self, SettleStatus::Pending { .. })
    }

    /// Final report, once settling has stopped
    pub fn report(&self) -> Option<LayoutReport> {
        match *self {
            SettleStatus::Pending { .. } => None,
            SettleStatus::Settled(report) | SettleStatus::CapReached(report) => Some(report),
        }
    }
}

/// Places rooms and drives the separation solver
#[derive(Debug, Clone)]
pub struct RoomLayoutEngine {
    max_settle_steps: u32,
    steps: u32,
    finished: Option<LayoutReport>,
}

impl RoomLayoutEngine {
    pub fn new(max_settle_steps: u32) -> Self {
        Self {
            max_settle_steps,
            steps: 0,
            finished: None,
        }
    }

    /// Create `room_count` rooms at random points inside the placement disk
    pub fn place_rooms(config: &GeneratorConfig, rng: &mut DungeonRng) -> RoomSet {
        let mut rooms = RoomSet::new();
        for _ in 0..config.room_count {
            let width = random_side(rng);
            let height = random_side(rng);
            let center = random_point_in_disk(rng, config.radius as f32);
            rooms.create(center, width, height);
        }
        rooms
    }

    /// Promote rooms whose width and height both reach the scaled averages.
    ///
    /// Returns the main-room count.
    pub fn classify_main_rooms(
        rooms: &mut RoomSet,
        frequency: f32,
        threshold: MainRoomThreshold,
    ) -> usize {
        if rooms.is_empty() {
            return 0;
        }

        // Averages are whole cells, truncated
        let n = rooms.len() as u32;
        let width_avg = (rooms.iter().map(|r| r.width).sum::<u32>() / n) as f32;
        let height_avg = (rooms.iter().map(|r| r.height).sum::<u32>() / n) as f32;
        let scale = threshold.scale(frequency);

        let mut count = 0;
        for room in rooms.iter_mut() {
            if room.width as f32 >= scale * width_avg && room.height as f32 >= scale * height_avg {
                room.set_main();
                count += 1;
            }
        }
        count
    }

    /// Steps taken so far
    pub fn steps(&self) -> u32 {
        self.steps
    }

    /// Advance the separation by one solver step
    pub fn step<S>(&mut self, rooms: &mut RoomSet, solver: &mut S) -> SettleStatus
    where
        S: SeparationSolver + ?Sized,
    {
        if let Some(report) = self.finished {
            return if report.converged {
                SettleStatus::Settled(report)
            } else {
                SettleStatus::CapReached(report)
            };
        }

        let settled = solver.step(rooms);
        self.steps += 1;

        if settled {
            let report = LayoutReport {
                steps: self.steps,
                converged: true,
            };
            self.finished = Some(report);
            SettleStatus::Settled(report)
        } else if self.steps >= self.max_settle_steps {
            let report = LayoutReport {
                steps: self.steps,
                converged: false,
            };
            self.finished = Some(report);
            SettleStatus::CapReached(report)
        } else {
            SettleStatus::Pending { steps: self.steps }
        }
    }

    /// Step until settled or capped
    pub fn settle<S>(&mut self, rooms: &mut RoomSet, solver: &mut S) -> LayoutReport
    where
        S: SeparationSolver + ?Sized,
    {
        loop {
            if let Some(report) = self.step(rooms, solver).report() {
                return report;
            }
        }
    }
}

fn random_side(rng: &mut DungeonRng) -> u32 {
    SIZE_DISTRIBUTION[rng.rn2(SIZE_DISTRIBUTION.len() as u32) as usize]
}

/// Uniform point in a disk, truncated toward zero
fn random_point_in_disk(rng: &mut DungeonRng, radius: f32) -> Point {
    let angle = rng.unit() * core::f32::consts::TAU;
    let r = rng.unit().sqrt() * radius;
    Point::new((r * angle.cos()).trunc(), (r * angle.sin()).trunc())
}
