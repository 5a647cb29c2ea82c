//! Connectivity graph over the main rooms
//!
//! The main-room centers are triangulated, a minimum spanning tree keeps the
//! level connected, and a random sample of the leftover triangulation edges
//! adds loops. Every chosen edge becomes a [`RoomConnection`] owned by one
//! endpoint.

mod delaunay;
mod spanning;

pub use delaunay::{Triangulation, triangulate};
pub use spanning::{ConnectivityTracker, WeightedEdge, kruskal_mst};

use std::collections::BTreeSet;

use log::debug;
use serde::{Deserialize, Serialize};

use crate::dungeon::{ConnectionKind, Direction, RoomConnection, RoomId, RoomSet};
use crate::geometry::{Point, Segment};
use crate::rng::DungeonRng;

/// Edge lists produced while connecting the main rooms
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ConnectivityGraph {
    /// Every triangulation edge
    pub triangulation: Vec<(RoomId, RoomId)>,
    /// Minimum spanning tree edges
    pub spanning_tree: Vec<(RoomId, RoomId)>,
    /// Sampled non-tree edges, in sampling order
    pub extra: Vec<(RoomId, RoomId)>,
    /// Voronoi dual of the triangulation
    pub voronoi: Vec<Segment>,
}

impl ConnectivityGraph {
    /// Edges that became connections: tree edges, then extras
    pub fn connections(&self) -> impl Iterator<Item = &(RoomId, RoomId)> {
        self.spanning_tree.iter().chain(self.extra.iter())
    }

    /// Whether the connections join every main room of `rooms`
    pub fn is_connected(&self, rooms: &RoomSet) -> bool {
        let ids: Vec<RoomId> = rooms.main_rooms().map(|r| r.id).collect();
        let slot = |id: RoomId| ids.iter().position(|&m| m == id);

        let mut tracker = ConnectivityTracker::new(ids.len());
        for &(a, b) in self.connections() {
            if let (Some(a), Some(b)) = (slot(a), slot(b)) {
                tracker.merge(a, b);
            }
        }
        tracker.all_connected()
    }
}

/// Builds connections between main rooms
#[derive(Debug, Clone, Copy)]
pub struct ConnectivityGraphBuilder {
    connection_frequency: f32,
}

impl ConnectivityGraphBuilder {
    pub fn new(connection_frequency: f32) -> Self {
        Self {
            connection_frequency,
        }
    }

    /// Connect the main rooms of `rooms`, writing connections and degrees into them
    pub fn build(&self, rooms: &mut RoomSet, rng: &mut DungeonRng) -> ConnectivityGraph {
        let mains: Vec<(RoomId, Point)> = rooms.main_rooms().map(|r| (r.id, r.center)).collect();
        for room in rooms.iter_mut().filter(|r| r.is_main()) {
            room.connections.clear();
            room.degree = 0;
        }

        let points: Vec<Point> = mains.iter().map(|&(_, p)| p).collect();
        let tri = triangulate(&points);

        let weighted: Vec<WeightedEdge> = tri
            .edges
            .iter()
            .map(|&(a, b)| WeightedEdge {
                a,
                b,
                weight: points[a].distance(points[b]),
            })
            .collect();
        let tree = kruskal_mst(&weighted, points.len());

        let in_tree: BTreeSet<(usize, usize)> = tree.iter().map(|e| (e.a, e.b)).collect();
        let mut remaining: Vec<(usize, usize)> = tri
            .edges
            .iter()
            .copied()
            .filter(|e| !in_tree.contains(e))
            .collect();

        let wanted = (tri.edges.len() as f32 * self.connection_frequency).floor() as usize;
        let extra_count = wanted.min(remaining.len());
        let mut extra = Vec::with_capacity(extra_count);
        for _ in 0..extra_count {
            if let Some(edge) = rng.take(&mut remaining) {
                extra.push(edge);
            }
        }

        let id_pair = |&(a, b): &(usize, usize)| (mains[a].0, mains[b].0);
        let graph = ConnectivityGraph {
            triangulation: tri.edges.iter().map(id_pair).collect(),
            spanning_tree: tree.iter().map(|e| id_pair(&(e.a, e.b))).collect(),
            extra: extra.iter().map(id_pair).collect(),
            voronoi: tri.voronoi,
        };

        for &(a, b) in &graph.spanning_tree {
            connect(rooms, a, b, ConnectionKind::SpanningTree);
        }
        for &(a, b) in &graph.extra {
            connect(rooms, a, b, ConnectionKind::Extra);
        }

        debug!(
            "connectivity: {} main rooms, {} triangulation edges, {} tree edges, {} extra",
            mains.len(),
            graph.triangulation.len(),
            graph.spanning_tree.len(),
            graph.extra.len()
        );

        graph
    }
}

/// Add a connection owned by `from` and bump both degrees
fn connect(rooms: &mut RoomSet, from: RoomId, to: RoomId, kind: ConnectionKind) {
    let (Some(a), Some(b)) = (rooms.get(from), rooms.get(to)) else {
        return;
    };
    let direction = Direction::between(a.center, b.center);

    if let Some(room) = rooms.get_mut(from) {
        room.connections.push(RoomConnection::new(to, direction, kind));
        room.degree += 1;
    }
    if let Some(room) = rooms.get_mut(to) {
        room.degree += 1;
    }
}
