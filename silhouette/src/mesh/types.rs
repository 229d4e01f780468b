//! Strongly-typed indexes of various flavors
//!
//! Cells are numbered in image order (rows grow downward):
//!
//! ```text
//!     A ---- top ---- B
//!     |               |
//!    left           right
//!     |               |
//!     C --- bottom -- D
//! ```

/// Direction of a lattice edge, measured from its upper-left sample
#[derive(Copy, Clone, Debug, Eq, PartialEq, strum::EnumIter)]
pub enum Axis {
    /// Edge runs to the right, stepping one pixel at a time
    X,
    /// Edge runs downward, stepping one row at a time
    Y,
}

/// Strongly-typed cell corner, in the `[0, 4)` range
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub struct Corner(u8);

impl Corner {
    /// Top-left corner
    pub const A: Corner = Corner(0);
    /// Top-right corner
    pub const B: Corner = Corner(1);
    /// Bottom-left corner
    pub const C: Corner = Corner(2);
    /// Bottom-right corner
    pub const D: Corner = Corner(3);

    /// Builds a new corner
    ///
    /// # Panics
    /// If `i >= 4`, which is not a valid corner index
    ///
    /// ```compile_fail
    /// # use silhouette::mesh::types::Corner;
    /// const E: Corner = Corner::new(4);
    /// ```
    pub const fn new(i: u8) -> Self {
        assert!(i < 4);
        Self(i)
    }

    /// Returns the value of this corner as an index
    pub fn index(self) -> usize {
        self.0 as usize
    }

    /// Returns the bit used for this corner in a [`CellKey`]
    pub const fn bit(self) -> u8 {
        1 << self.0
    }

    /// Iterates over all 4 corners
    pub fn iter() -> impl Iterator<Item = Self> {
        (0..4).map(Corner)
    }
}

/// One of the four edges of a cell
///
/// Each edge is owned by the sample at its upper-left end, which is where
/// its crossing vertex is cached.
#[derive(Copy, Clone, Debug, Eq, PartialEq, strum::EnumIter)]
pub enum CellEdge {
    /// `A → B`
    Top,
    /// `A → C`
    Left,
    /// `B → D`
    Right,
    /// `C → D`
    Bottom,
}

impl CellEdge {
    /// Returns the corner that owns this edge and the edge's direction
    pub const fn origin(self) -> (Corner, Axis) {
        match self {
            CellEdge::Top => (Corner::A, Axis::X),
            CellEdge::Left => (Corner::A, Axis::Y),
            CellEdge::Right => (Corner::B, Axis::Y),
            CellEdge::Bottom => (Corner::C, Axis::X),
        }
    }

    /// Returns the edge as an index in the `[0, 4)` range
    pub fn index(self) -> usize {
        self as usize
    }
}

/// A vertex used by a triangle in the cell case table
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum VertexRef {
    /// The sample's own vertex at a cell corner
    Corner(Corner),
    /// The boundary crossing found along a cell edge
    Edge(CellEdge),
}

/// Bitmask of which corners in a cell are inside the silhouette
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub struct CellKey(u8);

impl CellKey {
    /// Builds a new `CellKey`
    ///
    /// # Panics
    /// If any of the upper 4 bits are set
    pub fn new(i: u8) -> Self {
        assert_eq!(i & 0b1111, i, "invalid bits set in {i}");
        Self(i)
    }

    /// Builds a key from the inside flags of corners `A`, `B`, `C`, `D`
    pub fn from_corners(inside: [bool; 4]) -> Self {
        let i = Corner::iter()
            .filter(|c| inside[c.index()])
            .fold(0, |acc, c| acc | c.bit());
        Self(i)
    }

    /// Returns the bitmask as an index
    pub fn index(&self) -> usize {
        self.0 as usize
    }
}

impl std::ops::BitAnd<Corner> for CellKey {
    type Output = bool;
    fn bitand(self, c: Corner) -> bool {
        (self.0 & c.bit()) != 0
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_key_from_corners() {
        assert_eq!(CellKey::from_corners([false; 4]).index(), 0);
        assert_eq!(CellKey::from_corners([true; 4]).index(), 15);
        let key = |c| CellKey::from_corners(c).index();
        assert_eq!(key([false, true, true, false]), 6);
        assert_eq!(key([true, false, false, true]), 9);

        let k = CellKey::new(0b0101);
        assert!(k & Corner::A);
        assert!(!(k & Corner::B));
        assert!(k & Corner::C);
        assert!(!(k & Corner::D));
    }

    #[test]
    #[should_panic]
    fn test_bad_key() {
        CellKey::new(16);
    }
}
