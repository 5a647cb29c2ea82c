//! Room registry for one generation run
//!
//! Rooms live in an arena in creation order; an ID-keyed map resolves
//! connections and query results back to arena slots.

use hashbrown::HashMap;
use serde::{Deserialize, Serialize};

use super::room::{Room, RoomId};
use crate::consts::FIRST_ROOM_ID;
use crate::geometry::Point;

/// All rooms of one run, in creation order
#[derive(Debug, Clone, Default)]
pub struct RoomSet {
    rooms: Vec<Room>,
    index: HashMap<RoomId, usize>,
}

impl RoomSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create and register a room with the next free ID
    pub fn create(&mut self, center: Point, width: u32, height: u32) -> RoomId {
        let id = RoomId(FIRST_ROOM_ID + self.rooms.len() as u32);
        self.insert(Room::new(id, center, width, height));
        id
    }

    /// Register an existing room. A room with a duplicate ID replaces the old one.
    pub fn insert(&mut self, room: Room) {
        if let Some(&idx) = self.index.get(&room.id) {
            self.rooms[idx] = room;
        } else {
            self.index.insert(room.id, self.rooms.len());
            self.rooms.push(room);
        }
    }

    pub fn get(&self, id: RoomId) -> Option<&Room> {
        self.index.get(&id).map(|&idx| &self.rooms[idx])
    }

    pub fn get_mut(&mut self, id: RoomId) -> Option<&mut Room> {
        self.index.get(&id).map(|&idx| &mut self.rooms[idx])
    }

    pub fn contains(&self, id: RoomId) -> bool {
        self.index.contains_key(&id)
    }

    pub fn len(&self) -> usize {
        self.rooms.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rooms.is_empty()
    }

    pub fn iter(&self) -> core::slice::Iter<'_, Room> {
        self.rooms.iter()
    }

    pub fn iter_mut(&mut self) -> core::slice::IterMut<'_, Room> {
        self.rooms.iter_mut()
    }

    pub fn as_slice(&self) -> &[Room] {
        &self.rooms
    }

    /// Main rooms in creation order
    pub fn main_rooms(&self) -> impl Iterator<Item = &Room> {
        self.rooms.iter().filter(|r| r.is_main())
    }

    /// Visible rooms in creation order
    pub fn visible_rooms(&self) -> impl Iterator<Item = &Room> {
        self.rooms.iter().filter(|r| r.is_visible())
    }

    pub fn main_room_count(&self) -> usize {
        self.main_rooms().count()
    }

    /// The room flagged as start, if any
    pub fn start_room(&self) -> Option<&Room> {
        self.rooms.iter().find(|r| r.is_start())
    }

    /// The room flagged as end, if any
    pub fn end_room(&self) -> Option<&Room> {
        self.rooms.iter().find(|r| r.is_end())
    }
}

impl<'a> IntoIterator for &'a RoomSet {
    type Item = &'a Room;
    type IntoIter = core::slice::Iter<'a, Room>;

    fn into_iter(self) -> Self::IntoIter {
        self.rooms.iter()
    }
}

impl FromIterator<Room> for RoomSet {
    fn from_iter<I: IntoIterator<Item = Room>>(iter: I) -> Self {
        let mut set = RoomSet::new();
        for room in iter {
            set.insert(room);
        }
        set
    }
}

// Serialized as a plain list; the index is rebuilt on load
impl Serialize for RoomSet {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        self.rooms.serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for RoomSet {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let rooms = Vec::<Room>::deserialize(deserializer)?;
        Ok(rooms.into_iter().collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ids_start_at_ten() {
        let mut set = RoomSet::new();
        let a = set.create(Point::new(0.0, 0.0), 3, 3);
        let b = set.create(Point::new(5.0, 0.0), 4, 4);
        assert_eq!(a, RoomId(10));
        assert_eq!(b, RoomId(11));
        assert_eq!(set.len(), 2);
        assert_eq!(set.get(b).map(|r| r.width), Some(4));
        assert!(set.get(RoomId(12)).is_none());
    }

    #[test]
    fn test_filters() {
        let mut set = RoomSet::new();
        let a = set.create(Point::new(0.0, 0.0), 3, 3);
        set.create(Point::new(5.0, 0.0), 4, 4);
        set.get_mut(a).unwrap().set_main();

        assert_eq!(set.main_room_count(), 1);
        assert_eq!(set.visible_rooms().count(), 2);
        assert!(set.start_room().is_none());
    }

    #[test]
    fn test_insert_replaces() {
        let mut set = RoomSet::new();
        let a = set.create(Point::new(0.0, 0.0), 3, 3);
        set.insert(Room::new(a, Point::new(1.0, 1.0), 6, 6));
        assert_eq!(set.len(), 1);
        assert_eq!(set.get(a).unwrap().width, 6);
    }

    #[test]
    fn test_serde_rebuilds_index() {
        let mut set = RoomSet::new();
        set.create(Point::new(0.0, 0.0), 3, 3);
        let b = set.create(Point::new(9.0, 2.0), 5, 3);

        let json = serde_json::to_string(&set).unwrap();
        let back: RoomSet = serde_json::from_str(&json).unwrap();
        assert_eq!(back.len(), 2);
        assert_eq!(back.get(b).unwrap().center, Point::new(9.0, 2.0));
    }
}
