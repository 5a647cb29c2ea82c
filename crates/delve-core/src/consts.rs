//! Generation constants
//!
//! Size distribution, ID offsets and the fixed geometry of hallways and doors.

/// Room side lengths; widths and heights are drawn uniformly from this table
pub const SIZE_DISTRIBUTION: [u32; 16] = [3, 3, 3, 4, 4, 4, 5, 5, 5, 6, 6, 7, 8, 10, 12, 14];

/// First room ID. IDs below this are reserved for tile types in the grid.
pub const FIRST_ROOM_ID: u32 = 10;

/// Base of the subtractive main-room threshold, `(BASE - f) * average`
pub const SUBTRACTIVE_THRESHOLD_BASE: f32 = 2.35;

/// Hallways are carved this many tiles wide
pub const HALLWAY_WIDTH: i32 = 3;

/// Door runs are normalized to this length
pub const DOOR_RUN_LENGTH: usize = 3;

/// How far an upward route overshoots its elbow when it turns left
pub const ELBOW_OVERSHOOT: f32 = 3.0;

/// Configuration ranges
pub const ROOM_COUNT_RANGE: (u32, u32) = (10, 1000);
pub const RADIUS_RANGE: (u32, u32) = (1, 500);
pub const MAIN_ROOM_FREQUENCY_RANGE: (f32, f32) = (0.0, 2.0);
pub const ROOM_CONNECTION_FREQUENCY_RANGE: (f32, f32) = (0.0, 1.0);
pub const MAX_SETTLE_STEPS_RANGE: (u32, u32) = (1, 100_000);

/// Default separation step cap
pub const DEFAULT_MAX_SETTLE_STEPS: u32 = 5000;
