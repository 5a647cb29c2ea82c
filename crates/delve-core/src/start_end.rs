//! Start and end room selection

use log::debug;

use crate::dungeon::{Room, RoomId, RoomSet};
use crate::error::{GenerationError, Result};

/// Picks the start and end rooms among the sparsely connected main rooms
#[derive(Debug, Clone, Copy, Default)]
pub struct StartEndSelector;

impl StartEndSelector {
    pub fn new() -> Self {
        Self
    }

    /// Choose and flag the start and end rooms.
    ///
    /// Dead ends (degree 1) are preferred for both; degree-2 rooms fill in when
    /// there are not enough dead ends. The end is the pool room farthest from the start.
    pub fn select(&self, rooms: &mut RoomSet) -> Result<(RoomId, RoomId)> {
        let with_degree = |degree: u32| {
            rooms
                .main_rooms()
                .filter(|r| r.degree == degree)
                .collect::<Vec<_>>()
        };
        let dead_ends = with_degree(1);
        let corridors = with_degree(2);

        let (start, pool): (&Room, &[&Room]) = match (dead_ends.as_slice(), corridors.as_slice()) {
            ([start], rest) => (*start, rest),
            ([start, rest @ ..], _) => (*start, rest),
            ([], [start, rest @ ..]) if !rest.is_empty() => (*start, rest),
            _ => {
                return Err(GenerationError::NoValidStartEnd {
                    main_rooms: rooms.main_room_count(),
                });
            }
        };

        let mut end: Option<(&Room, f32)> = None;
        for &candidate in pool {
            if candidate.id == start.id {
                continue;
            }
            let d = start.center.distance(candidate.center);
            if end.is_none_or(|(_, best)| d > best) {
                end = Some((candidate, d));
            }
        }
        let Some((end, distance)) = end else {
            return Err(GenerationError::NoValidStartEnd {
                main_rooms: rooms.main_room_count(),
            });
        };

        let (start_id, end_id) = (start.id, end.id);
        debug!("start room {start_id}, end room {end_id}, {distance:.1} apart");

        if let Some(room) = rooms.get_mut(start_id) {
            room.set_start();
        }
        if let Some(room) = rooms.get_mut(end_id) {
            room.set_end();
        }
        Ok((start_id, end_id))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::Point;

    /// Main rooms at the given x positions with the given degrees
    fn rooms_with(degrees: &[(f32, u32)]) -> RoomSet {
        let mut rooms = RoomSet::new();
        for &(x, degree) in degrees {
            let id = rooms.create(Point::new(x, 0.0), 5, 5);
            let room = rooms.get_mut(id).unwrap();
            room.set_main();
            room.degree = degree;
        }
        rooms
    }

    #[test]
    fn test_dead_ends_preferred() {
        let mut rooms = rooms_with(&[(0.0, 2), (10.0, 1), (50.0, 1), (30.0, 1), (90.0, 2)]);
        let (start, end) = StartEndSelector::new().select(&mut rooms).unwrap();

        assert_eq!(start, RoomId(11));
        assert_eq!(end, RoomId(12));
        assert!(rooms.get(start).unwrap().is_start());
        assert!(rooms.get(end).unwrap().is_end());
        assert_eq!(rooms.start_room().map(|r| r.id), Some(start));
    }

    #[test]
    fn test_single_dead_end_uses_degree_two_pool() {
        let mut rooms = rooms_with(&[(0.0, 3), (10.0, 1), (40.0, 2), (25.0, 2)]);
        let (start, end) = StartEndSelector::new().select(&mut rooms).unwrap();
        assert_eq!((start, end), (RoomId(11), RoomId(12)));
    }

    #[test]
    fn test_degree_two_fallback() {
        let mut rooms = rooms_with(&[(0.0, 2), (10.0, 2), (40.0, 2)]);
        let (start, end) = StartEndSelector::new().select(&mut rooms).unwrap();
        assert_eq!((start, end), (RoomId(10), RoomId(12)));
    }

    #[test]
    fn test_ties_keep_first() {
        let mut rooms = rooms_with(&[(0.0, 1), (10.0, 1), (-10.0, 1)]);
        let (_, end) = StartEndSelector::new().select(&mut rooms).unwrap();
        assert_eq!(end, RoomId(11));
    }

    #[test]
    fn test_no_pair() {
        let mut rooms = rooms_with(&[(0.0, 3), (10.0, 2), (20.0, 3)]);
        let err = StartEndSelector::new().select(&mut rooms).unwrap_err();
        assert_eq!(err, GenerationError::NoValidStartEnd { main_rooms: 3 });
        assert!(rooms.start_room().is_none());

        let mut rooms = rooms_with(&[(0.0, 1), (10.0, 3)]);
        assert!(StartEndSelector::new().select(&mut rooms).is_err());
    }
}
