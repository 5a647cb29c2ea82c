//! Directed connections between main rooms

use serde::{Deserialize, Serialize};
use strum::{Display, EnumIter};

use super::room::RoomId;
use crate::geometry::{Point, Segment};

/// Compass direction from the owning room toward its target (y grows upward)
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display, EnumIter,
)]
#[repr(u8)]
pub enum Direction {
    Up = 0,
    Right = 1,
    Down = 2,
    Left = 3,
}

impl Direction {
    /// Direction from `from` toward `to`.
    ///
    /// The axis with the larger absolute delta wins; ties go vertical.
    pub fn between(from: Point, to: Point) -> Self {
        let dx = to.x - from.x;
        let dy = to.y - from.y;

        if dx.abs() > dy.abs() {
            if dx > 0.0 { Direction::Right } else { Direction::Left }
        } else if dy > 0.0 {
            Direction::Up
        } else {
            Direction::Down
        }
    }

    pub const fn is_vertical(self) -> bool {
        matches!(self, Direction::Up | Direction::Down)
    }
}

/// Where a connection came from in the graph
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Display)]
pub enum ConnectionKind {
    SpanningTree,
    Extra,
}

/// A directed edge from the owning main room to another main room
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RoomConnection {
    pub target: RoomId,
    pub direction: Direction,
    pub kind: ConnectionKind,
    /// First route leg, set by the router
    pub line1: Option<Segment>,
    /// Second route leg, set by the router
    pub line2: Option<Segment>,
}

impl RoomConnection {
    pub fn new(target: RoomId, direction: Direction, kind: ConnectionKind) -> Self {
        Self {
            target,
            direction,
            kind,
            line1: None,
            line2: None,
        }
    }

    /// Both route legs, once routed
    pub fn route(&self) -> Option<(Segment, Segment)> {
        Some((self.line1?, self.line2?))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use strum::IntoEnumIterator;

    #[test]
    fn test_direction_values() {
        let values: Vec<u8> = Direction::iter().map(|d| d as u8).collect();
        assert_eq!(values, vec![0, 1, 2, 3]);
        assert_eq!(Direction::Left.to_string(), "Left");
    }

    #[test]
    fn test_direction_between() {
        let o = Point::new(0.0, 0.0);
        assert_eq!(Direction::between(o, Point::new(5.0, 1.0)), Direction::Right);
        assert_eq!(Direction::between(o, Point::new(-5.0, 1.0)), Direction::Left);
        assert_eq!(Direction::between(o, Point::new(1.0, 5.0)), Direction::Up);
        assert_eq!(Direction::between(o, Point::new(1.0, -5.0)), Direction::Down);
    }

    #[test]
    fn test_direction_ties_go_vertical() {
        let o = Point::new(0.0, 0.0);
        assert_eq!(Direction::between(o, Point::new(3.0, 3.0)), Direction::Up);
        assert_eq!(Direction::between(o, Point::new(-3.0, -3.0)), Direction::Down);
        assert!(Direction::Up.is_vertical());
        assert!(!Direction::Left.is_vertical());
    }

    #[test]
    fn test_route_requires_both_legs() {
        let mut conn = RoomConnection::new(RoomId(11), Direction::Up, ConnectionKind::Extra);
        assert_eq!(conn.route(), None);

        let seg = Segment::new(Point::new(0.0, 0.0), Point::new(0.0, 4.0));
        conn.line1 = Some(seg);
        assert_eq!(conn.route(), None);
        conn.line2 = Some(seg);
        assert_eq!(conn.route(), Some((seg, seg)));
    }
}
