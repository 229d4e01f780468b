//! Cell triangulation tables, indexed by [`CellKey`](super::types::CellKey)
//!
//! Every triangle is wound the same way: with image coordinates (`x` right,
//! `y` down), `(b - a) × (c - a)` is positive for each entry.
use super::types::{CellEdge, Corner, VertexRef};

/// Triangulation of a single cell configuration
#[derive(Copy, Clone, Debug)]
pub struct CellCase {
    /// Edges whose crossings are needed, in the order they are resolved
    ///
    /// If any of them fails to resolve, the cell emits nothing.
    pub edges: &'static [CellEdge],

    /// Triangles which are always emitted
    pub triangles: &'static [[VertexRef; 3]],

    /// Triangles bridging the two corners of an ambiguous case
    ///
    /// These are only emitted when the cell's center is filled.
    pub bridge: &'static [[VertexRef; 3]],

    /// Marks keys 6 and 9, which need a center test
    pub ambiguous: bool,
}

impl CellCase {
    const EMPTY: Self = Self {
        edges: &[],
        triangles: &[],
        bridge: &[],
        ambiguous: false,
    };

    const fn new(
        edges: &'static [CellEdge],
        triangles: &'static [[VertexRef; 3]],
    ) -> Self {
        Self {
            edges,
            triangles,
            bridge: &[],
            ambiguous: false,
        }
    }

    const fn ambiguous(
        edges: &'static [CellEdge],
        triangles: &'static [[VertexRef; 3]],
        bridge: &'static [[VertexRef; 3]],
    ) -> Self {
        Self {
            edges,
            triangles,
            bridge,
            ambiguous: true,
        }
    }

    /// Checks whether this case never emits a triangle
    pub fn is_empty(&self) -> bool {
        self.triangles.is_empty() && self.bridge.is_empty()
    }

    /// Returns the largest number of triangles this case can emit
    pub fn max_triangles(&self) -> usize {
        self.triangles.len() + self.bridge.len()
    }
}

const A: VertexRef = VertexRef::Corner(Corner::A);
const B: VertexRef = VertexRef::Corner(Corner::B);
const C: VertexRef = VertexRef::Corner(Corner::C);
const D: VertexRef = VertexRef::Corner(Corner::D);

const TOP: VertexRef = VertexRef::Edge(CellEdge::Top);
const LEFT: VertexRef = VertexRef::Edge(CellEdge::Left);
const RIGHT: VertexRef = VertexRef::Edge(CellEdge::Right);
const BOTTOM: VertexRef = VertexRef::Edge(CellEdge::Bottom);

use CellEdge::{Bottom, Left, Right, Top};

/// Boundary-fitted triangulation for every cell key
pub static CELL_CASES: [CellCase; 16] = [
    // 0: nothing inside
    CellCase::EMPTY,
    // 1: A alone
    CellCase::new(&[Top, Left], &[[A, TOP, LEFT]]),
    // 2: B alone
    CellCase::new(&[Top, Right], &[[TOP, B, RIGHT]]),
    // 3: A and B, cut along the bottom
    CellCase::new(&[Left, Right], &[[A, B, LEFT], [B, RIGHT, LEFT]]),
    // 4: C alone
    CellCase::new(&[Bottom, Left], &[[LEFT, BOTTOM, C]]),
    // 5: A and C, cut along the right
    CellCase::new(&[Top, Bottom], &[[A, TOP, C], [TOP, BOTTOM, C]]),
    // 6: B and C, opposite corners
    CellCase::ambiguous(
        &[Top, Left, Bottom, Right],
        &[[LEFT, BOTTOM, C], [TOP, B, RIGHT]],
        &[[TOP, BOTTOM, LEFT], [TOP, RIGHT, BOTTOM]],
    ),
    // 7: missing D
    CellCase::new(
        &[Bottom, Right],
        &[[A, BOTTOM, C], [A, RIGHT, BOTTOM], [A, B, RIGHT]],
    ),
    // 8: D alone
    CellCase::new(&[Bottom, Right], &[[RIGHT, D, BOTTOM]]),
    // 9: A and D, opposite corners
    CellCase::ambiguous(
        &[Top, Left, Bottom, Right],
        &[[A, TOP, LEFT], [BOTTOM, RIGHT, D]],
        &[[LEFT, TOP, BOTTOM], [RIGHT, BOTTOM, TOP]],
    ),
    // 10: B and D, cut along the left
    CellCase::new(&[Top, Bottom], &[[TOP, D, BOTTOM], [TOP, B, D]]),
    // 11: missing C
    CellCase::new(
        &[Bottom, Left],
        &[[B, LEFT, A], [B, BOTTOM, LEFT], [B, D, BOTTOM]],
    ),
    // 12: C and D, cut along the top
    CellCase::new(&[Left, Right], &[[LEFT, RIGHT, C], [RIGHT, D, C]]),
    // 13: missing B
    CellCase::new(
        &[Top, Right],
        &[[C, A, TOP], [C, TOP, RIGHT], [C, RIGHT, D]],
    ),
    // 14: missing A
    CellCase::new(
        &[Top, Left],
        &[[D, C, LEFT], [D, LEFT, TOP], [D, TOP, B]],
    ),
    // 15: everything inside
    CellCase::new(&[], &[[A, B, C], [B, D, C]]),
];

/// Corner-snapped triangulation, which never looks at edge crossings
///
/// Only cells with three or four inside corners produce triangles.
pub static SNAP_CASES: [CellCase; 16] = [
    CellCase::EMPTY,
    CellCase::EMPTY,
    CellCase::EMPTY,
    CellCase::EMPTY,
    CellCase::EMPTY,
    CellCase::EMPTY,
    CellCase::EMPTY,
    // 7: missing D
    CellCase::new(&[], &[[A, B, C]]),
    CellCase::EMPTY,
    CellCase::EMPTY,
    CellCase::EMPTY,
    // 11: missing C
    CellCase::new(&[], &[[A, B, D]]),
    CellCase::EMPTY,
    // 13: missing B
    CellCase::new(&[], &[[A, D, C]]),
    // 14: missing A
    CellCase::new(&[], &[[B, D, C]]),
    // 15: everything inside
    CellCase::new(&[], &[[A, B, C], [B, D, C]]),
];
