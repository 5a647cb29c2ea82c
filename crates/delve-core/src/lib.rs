//! delve-core: procedural room-and-corridor dungeon generation
//!
//! Scatters rooms in a disk, pushes them apart, connects the large ones with a
//! Delaunay-based spanning graph, routes L-shaped hallways and rasterizes the
//! result into a tile grid with walls and doors.
//!
//! Everything is driven by a seeded RNG: the same seed and configuration always
//! produce the same dungeon.

pub mod config;
pub mod consts;
pub mod dungeon;
pub mod error;
pub mod generator;
pub mod geometry;
pub mod graph;
pub mod layout;
pub mod raster;
pub mod rng;
pub mod routing;
pub mod start_end;

pub use config::{GeneratorConfig, MainRoomThreshold};
pub use dungeon::{ConnectionKind, Direction, Room, RoomConnection, RoomFlags, RoomId, RoomSet};
pub use error::{GenerationError, Result};
pub use generator::{Dungeon, DungeonGenerator, GenerationRun};
pub use graph::{ConnectivityGraph, ConnectivityGraphBuilder};
pub use layout::{LayoutReport, RepulsionSolver, RoomLayoutEngine, SeparationSolver, SettleStatus};
pub use raster::{Cell, GridOrigin, GridRasterizer, TileGrid, TileType};
pub use rng::DungeonRng;
pub use routing::{LineQuery, RectLineQuery, RoomConnectionRouter};
pub use start_end::StartEndSelector;
