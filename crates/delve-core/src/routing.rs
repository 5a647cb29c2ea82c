//! Hallway routing
//!
//! Every connection becomes an L-shaped pair of axis-aligned segments. Rooms
//! crossed by a segment are made visible so they end up in the grid.

use log::debug;

use crate::consts::ELBOW_OVERSHOOT;
use crate::dungeon::{Direction, RoomId, RoomSet};
use crate::geometry::{Point, Segment};

/// Finds rooms crossed by a route segment
pub trait LineQuery {
    fn rooms_intersecting(&self, rooms: &RoomSet, segment: &Segment) -> Vec<RoomId>;
}

/// Tests the segment against every room rectangle
#[derive(Debug, Clone, Copy, Default)]
pub struct RectLineQuery;

impl LineQuery for RectLineQuery {
    fn rooms_intersecting(&self, rooms: &RoomSet, segment: &Segment) -> Vec<RoomId> {
        rooms
            .iter()
            .filter(|r| r.intersects_segment(segment))
            .map(|r| r.id)
            .collect()
    }
}

/// The two legs from `source` to `target`, bending once
pub fn route_between(source: Point, target: Point, direction: Direction) -> (Segment, Segment) {
    let elbow = if direction.is_vertical() {
        Point::new(source.x, target.y)
    } else {
        Point::new(target.x, source.y)
    };

    // Going up and left, the vertical leg runs past the bend to cover the corner
    let line1_end = if direction == Direction::Up && source.x > target.x {
        Point::new(source.x, target.y + ELBOW_OVERSHOOT)
    } else {
        elbow
    };

    (Segment::new(source, line1_end), Segment::new(elbow, target))
}

/// Routes connections and settles room visibility
#[derive(Debug, Clone, Default)]
pub struct RoomConnectionRouter<Q = RectLineQuery> {
    query: Q,
}

impl RoomConnectionRouter<RectLineQuery> {
    pub fn new() -> Self {
        Self::default()
    }
}

impl<Q: LineQuery> RoomConnectionRouter<Q> {
    pub fn with_query(query: Q) -> Self {
        Self { query }
    }

    /// Fill in every connection's legs and mark visible rooms.
    ///
    /// Returns the number of routed connections.
    pub fn route(&self, rooms: &mut RoomSet) -> usize {
        let mut segments = Vec::new();

        let owners: Vec<RoomId> = rooms.main_rooms().map(|r| r.id).collect();
        for owner in owners {
            let Some(room) = rooms.get(owner) else {
                continue;
            };
            let source = room.center;
            let legs: Vec<Option<(Segment, Segment)>> = room
                .connections
                .iter()
                .map(|c| {
                    rooms
                        .get(c.target)
                        .map(|t| route_between(source, t.center, c.direction))
                })
                .collect();

            if let Some(room) = rooms.get_mut(owner) {
                for (conn, legs) in room.connections.iter_mut().zip(legs) {
                    if let Some((line1, line2)) = legs {
                        conn.line1 = Some(line1);
                        conn.line2 = Some(line2);
                        segments.push(line1);
                        segments.push(line2);
                    }
                }
            }
        }

        for room in rooms.iter_mut() {
            room.set_visible(false);
        }
        for room in rooms.iter_mut().filter(|r| r.is_main()) {
            room.set_visible(true);
        }

        let mut crossed = Vec::new();
        for segment in &segments {
            crossed.extend(self.query.rooms_intersecting(rooms, segment));
        }
        for id in crossed {
            if let Some(room) = rooms.get_mut(id) {
                room.set_visible(true);
            }
        }

        let routed = segments.len() / 2;
        debug!(
            "routing: {} connections, {} visible rooms",
            routed,
            rooms.visible_rooms().count()
        );
        routed
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dungeon::{ConnectionKind, RoomConnection};

    fn p(x: f32, y: f32) -> Point {
        Point::new(x, y)
    }

    #[test]
    fn test_vertical_route() {
        let (l1, l2) = route_between(p(0.0, 0.0), p(4.0, 20.0), Direction::Up);
        assert_eq!(l1, Segment::new(p(0.0, 0.0), p(0.0, 20.0)));
        assert_eq!(l2, Segment::new(p(0.0, 20.0), p(4.0, 20.0)));
        assert!(l1.is_vertical() && l2.is_horizontal());
    }

    #[test]
    fn test_horizontal_route() {
        let (l1, l2) = route_between(p(0.0, 0.0), p(-30.0, 5.0), Direction::Left);
        assert_eq!(l1, Segment::new(p(0.0, 0.0), p(-30.0, 0.0)));
        assert_eq!(l2, Segment::new(p(-30.0, 0.0), p(-30.0, 5.0)));
    }

    #[test]
    fn test_up_left_overshoots_elbow() {
        let (l1, l2) = route_between(p(10.0, 0.0), p(4.0, 20.0), Direction::Up);
        assert_eq!(l1, Segment::new(p(10.0, 0.0), p(10.0, 23.0)));
        assert_eq!(l2, Segment::new(p(10.0, 20.0), p(4.0, 20.0)));

        // down and left does not
        let (l1, _) = route_between(p(10.0, 0.0), p(4.0, -20.0), Direction::Down);
        assert_eq!(l1.p1, p(10.0, -20.0));
    }

    #[test]
    fn test_visibility() {
        let mut rooms = RoomSet::new();
        let a = rooms.create(p(0.0, 0.0), 6, 6);
        let b = rooms.create(p(40.0, 0.0), 6, 6);
        let crossed = rooms.create(p(20.0, 1.0), 4, 4);
        let untouched = rooms.create(p(20.0, 30.0), 4, 4);
        for id in [a, b] {
            rooms.get_mut(id).unwrap().set_main();
        }
        rooms.get_mut(a).unwrap().connections.push(RoomConnection::new(
            b,
            Direction::Right,
            ConnectionKind::SpanningTree,
        ));

        let routed = RoomConnectionRouter::new().route(&mut rooms);

        assert_eq!(routed, 1);
        assert!(rooms.get(a).unwrap().connections[0].route().is_some());
        assert!(rooms.get(a).unwrap().is_visible());
        assert!(rooms.get(b).unwrap().is_visible());
        assert!(rooms.get(crossed).unwrap().is_visible());
        assert!(!rooms.get(untouched).unwrap().is_visible());
    }

    struct NoRooms;

    impl LineQuery for NoRooms {
        fn rooms_intersecting(&self, _: &RoomSet, _: &Segment) -> Vec<RoomId> {
            Vec::new()
        }
    }

    #[test]
    fn test_custom_query() {
        let mut rooms = RoomSet::new();
        let a = rooms.create(p(0.0, 0.0), 6, 6);
        let side = rooms.create(p(20.0, 0.0), 4, 4);
        rooms.get_mut(a).unwrap().set_main();

        RoomConnectionRouter::with_query(NoRooms).route(&mut rooms);
        assert!(rooms.get(a).unwrap().is_visible());
        assert!(!rooms.get(side).unwrap().is_visible());
    }
}
