//! Screen edges double as tile-transition channels

use serde::{Deserialize, Serialize};

/// One side of the playfield
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Edge {
    Up,
    Down,
    Left,
    Right,
}

impl Edge {
    /// All edges in boundary-check priority order
    pub const ALL: [Edge; 4] = [Edge::Up, Edge::Down, Edge::Left, Edge::Right];

    const OPPOSITE: [Edge; 4] = [Edge::Down, Edge::Up, Edge::Right, Edge::Left];
    const CLOCKWISE: [Edge; 4] = [Edge::Right, Edge::Left, Edge::Up, Edge::Down];

    /// Stable index into per-edge tables
    #[inline]
    pub fn index(self) -> usize {
        match self {
            Edge::Up => 0,
            Edge::Down => 1,
            Edge::Left => 2,
            Edge::Right => 3,
        }
    }

    #[inline]
    pub fn opposite(self) -> Edge {
        Self::OPPOSITE[self.index()]
    }

    /// Next facing in the UP -> RIGHT -> DOWN -> LEFT cycle
    #[inline]
    pub fn clockwise(self) -> Edge {
        Self::CLOCKWISE[self.index()]
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Edge::Up => "UP",
            Edge::Down => "DOWN",
            Edge::Left => "LEFT",
            Edge::Right => "RIGHT",
        }
    }
}

impl std::fmt::Display for Edge {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Small set of edges backed by a bitmask
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct EdgeSet(u8);

impl EdgeSet {
    pub const EMPTY: EdgeSet = EdgeSet(0);
    pub const FULL: EdgeSet = EdgeSet(0b1111);

    pub fn single(edge: Edge) -> Self {
        Self(1 << edge.index())
    }

    pub fn insert(&mut self, edge: Edge) {
        self.0 |= 1 << edge.index();
    }

    pub fn remove(&mut self, edge: Edge) {
        self.0 &= !(1 << edge.index());
    }

    pub fn contains(&self, edge: Edge) -> bool {
        self.0 & (1 << edge.index()) != 0
    }

    pub fn len(&self) -> usize {
        self.0.count_ones() as usize
    }

    pub fn is_empty(&self) -> bool {
        self.0 == 0
    }

    /// Edges not in this set
    pub fn complement(&self) -> Self {
        Self(!self.0 & Self::FULL.0)
    }

    /// Members in `Edge::ALL` order
    pub fn iter(&self) -> impl Iterator<Item = Edge> + '_ {
        Edge::ALL.into_iter().filter(|e| self.contains(*e))
    }
}

impl FromIterator<Edge> for EdgeSet {
    fn from_iter<I: IntoIterator<Item = Edge>>(iter: I) -> Self {
        let mut set = EdgeSet::EMPTY;
        for edge in iter {
            set.insert(edge);
        }
        set
    }
}
