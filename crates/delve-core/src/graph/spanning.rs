//! Minimum spanning tree over the triangulation
//!
//! Uses Kruskal's algorithm with an equivalence-class tracker over node indices.

/// Tracks which nodes are joined, as equivalence classes (union-find)
#[derive(Debug, Clone)]
pub struct ConnectivityTracker {
    parent: Vec<usize>,
    rank: Vec<u8>,
}

impl ConnectivityTracker {
    /// Create a tracker where every node is its own class
    pub fn new(num_nodes: usize) -> Self {
        Self {
            parent: (0..num_nodes).collect(),
            rank: vec![0; num_nodes],
        }
    }

    fn find(&mut self, mut i: usize) -> usize {
        while self.parent[i] != i {
            self.parent[i] = self.parent[self.parent[i]];
            i = self.parent[i];
        }
        i
    }

    /// Check if two nodes are in the same class
    pub fn are_connected(&mut self, a: usize, b: usize) -> bool {
        if a >= self.parent.len() || b >= self.parent.len() {
            return false;
        }
        self.find(a) == self.find(b)
    }

    /// Merge the classes of `a` and `b`. Returns false if they were already joined.
    pub fn merge(&mut self, a: usize, b: usize) -> bool {
        if a >= self.parent.len() || b >= self.parent.len() {
            return false;
        }
        let ra = self.find(a);
        let rb = self.find(b);
        if ra == rb {
            return false;
        }
        match self.rank[ra].cmp(&self.rank[rb]) {
            core::cmp::Ordering::Less => self.parent[ra] = rb,
            core::cmp::Ordering::Greater => self.parent[rb] = ra,
            core::cmp::Ordering::Equal => {
                self.parent[rb] = ra;
                self.rank[ra] += 1;
            }
        }
        true
    }

    /// Check if every node is in one class
    pub fn all_connected(&mut self) -> bool {
        if self.parent.is_empty() {
            return true;
        }
        let root = self.find(0);
        (1..self.parent.len()).all(|i| self.find(i) == root)
    }
}

/// Undirected weighted edge between node indices
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WeightedEdge {
    pub a: usize,
    pub b: usize,
    pub weight: f32,
}

/// Kruskal minimum spanning tree.
///
/// Equal weights are ordered by endpoint indices, so the result is fully
/// determined by the input.
pub fn kruskal_mst(edges: &[WeightedEdge], num_nodes: usize) -> Vec<WeightedEdge> {
    let mut sorted = edges.to_vec();
    sorted.sort_by(|x, y| {
        x.weight
            .total_cmp(&y.weight)
            .then(x.a.cmp(&y.a))
            .then(x.b.cmp(&y.b))
    });

    let mut tracker = ConnectivityTracker::new(num_nodes);
    let mut tree = Vec::with_capacity(num_nodes.saturating_sub(1));
    for edge in sorted {
        if tracker.merge(edge.a, edge.b) {
            tree.push(edge);
        }
    }
    tree
}
