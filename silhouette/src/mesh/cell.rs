//! Per-cell triangulation
use arrayvec::ArrayVec;
use nalgebra::Vector3;

use super::{
    CenterTest, Fitting, Pass,
    classify::is_inside,
    table::{CELL_CASES, CellCase, SNAP_CASES},
    types::{CellKey, VertexRef},
};

/// Result of triangulating a single cell
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum CellOutcome {
    /// The cell's key produces no triangles
    Empty,
    /// The given number of triangles were emitted
    Emitted(usize),
    /// A required edge crossing could not be found, so nothing was emitted
    Unresolved,
}

/// Triangles staged for a single cell, before they're committed
pub(crate) type Staged = ArrayVec<Vector3<usize>, 4>;

/// Looks up the vertices of a case's triangles
///
/// Returns `None` if any vertex is missing, in which case the whole cell
/// must be skipped.
pub(crate) fn stage<F>(
    case: &CellCase,
    bridge: bool,
    lookup: F,
) -> Option<Staged>
where
    F: Fn(VertexRef) -> Option<usize>,
{
    debug_assert!(case.max_triangles() <= Staged::new().capacity());
    let bridge: &[[VertexRef; 3]] = if bridge { case.bridge } else { &[] };
    case.triangles
        .iter()
        .chain(bridge)
        .map(|[a, b, c]| {
            Some(Vector3::new(lookup(*a)?, lookup(*b)?, lookup(*c)?))
        })
        .collect()
}

impl Pass<'_> {
    /// Triangulates the cell with upper-left lattice position `(gx, gy)`
    pub(crate) fn triangulate(&mut self, gx: usize, gy: usize) -> CellOutcome {
        let corners = self.lattice.cell_corners(gx, gy);

        let mut inside = [false; 4];
        for (flag, &s) in inside.iter_mut().zip(&corners) {
            *flag = self.classify(s);
        }
        let key = CellKey::from_corners(inside);

        let case = match self.settings.fitting {
            Fitting::March => &CELL_CASES[key.index()],
            Fitting::Snap => &SNAP_CASES[key.index()],
        };
        if case.is_empty() {
            return CellOutcome::Empty;
        }

        // Resolve every edge before checking for failure, so that vertex
        // creation order doesn't depend on which edge failed
        let mut crossings = [None; 4];
        for &e in case.edges {
            let (corner, axis) = e.origin();
            crossings[e.index()] = self.resolve(corners[corner.index()], axis);
        }
        if case.edges.iter().any(|e| crossings[e.index()].is_none()) {
            return CellOutcome::Unresolved;
        }

        let bridge = case.ambiguous && self.center_filled(corners[0]);
        let lattice = &*self.lattice;
        let staged = stage(case, bridge, |v| match v {
            VertexRef::Corner(c) => lattice.sample(corners[c.index()]).core(),
            VertexRef::Edge(e) => crossings[e.index()],
        });
        match staged {
            Some(tris) => {
                let n = tris.len();
                for t in tris {
                    self.out.push(t);
                }
                CellOutcome::Emitted(n)
            }
            None => CellOutcome::Unresolved,
        }
    }

    /// Tests the pixel at the center of the cell whose top-left sample is `a`
    fn center_filled(&self, a: usize) -> bool {
        let a = self.lattice.sample(a);
        let half = self.lattice.step() / 2;
        let i = self.lattice.size().index(a.x + half, a.y + half);
        match self.settings.center_test {
            CenterTest::Foreground => self.frame.is_foreground(i),
            CenterTest::Inside => is_inside(self.frame, self.settings, i),
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::mesh::{
        Settings,
        builder::MeshBuilder,
        frame::Frame,
        grid::{DenseSize, Lattice},
        types::{CellEdge, Corner},
    };
    use std::num::NonZeroUsize;

    /// Builds a frame from an ASCII mask (`#` is foreground, `?` is
    /// foreground without a measurement, anything else is background)
    fn frame_data(
        rows: &[&str],
    ) -> (DenseSize, Vec<bool>, Vec<Vector3<f32>>) {
        let size = DenseSize::new(rows[0].len(), rows.len());
        let mut fg = vec![];
        let mut pos = vec![];
        for (y, row) in rows.iter().enumerate() {
            for (x, c) in row.chars().enumerate() {
                fg.push(c == '#' || c == '?');
                pos.push(if c == '?' {
                    Vector3::repeat(f32::INFINITY)
                } else {
                    Vector3::new(x as f32, y as f32, 2.0)
                });
            }
        }
        (size, fg, pos)
    }

    fn run_cell(rows: &[&str], settings: &Settings) -> (CellOutcome, usize) {
        let (size, fg, pos) = frame_data(rows);
        let frame = Frame::new(size, &fg, &pos).unwrap();
        let step = NonZeroUsize::new(settings.step).unwrap();
        let mut lattice = Lattice::new(size, step);
        let mut out = MeshBuilder::default();
        let mut pass = Pass {
            lattice: &mut lattice,
            frame: &frame,
            settings,
            out: &mut out,
        };
        let r = pass.triangulate(0, 0);
        (r, out.triangle_count())
    }

    fn step(n: usize) -> Settings {
        Settings {
            step: n,
            ..Settings::default()
        }
    }

    #[test]
    fn test_stage_unresolved() {
        let case = &CELL_CASES[1];
        let found = stage(case, false, |v| match v {
            VertexRef::Corner(_) => Some(0),
            VertexRef::Edge(CellEdge::Top) => Some(1),
            VertexRef::Edge(_) => None,
        });
        assert!(found.is_none());

        let found = stage(case, false, |v| match v {
            VertexRef::Corner(c) => Some(c.index()),
            VertexRef::Edge(e) => Some(10 + e.index()),
        });
        assert_eq!(found.unwrap().as_slice(), &[Vector3::new(0, 10, 11)]);
    }

    #[test]
    fn test_stage_bridge() {
        let lookup = |v| match v {
            VertexRef::Corner(c) => Some(c.index()),
            VertexRef::Edge(e) => Some(10 + e.index()),
        };
        for key in [6, 9] {
            let case = &CELL_CASES[key];
            assert_eq!(stage(case, false, lookup).unwrap().len(), 2);
            assert_eq!(stage(case, true, lookup).unwrap().len(), 4);
        }
        // The corner cuts of key 6 use B and C
        let tris = stage(&CELL_CASES[6], false, lookup).unwrap();
        assert!(tris.iter().any(|t| t.iter().any(|i| *i == Corner::B.index())));
        assert!(tris.iter().any(|t| t.iter().any(|i| *i == Corner::C.index())));
    }

    #[test]
    fn test_full_cell() {
        let (r, n) = run_cell(&["##", "##"], &step(1));
        assert_eq!(r, CellOutcome::Emitted(2));
        assert_eq!(n, 2);
    }

    #[test]
    fn test_empty_cell() {
        let (r, n) = run_cell(&["..", ".."], &step(1));
        assert_eq!(r, CellOutcome::Empty);
        assert_eq!(n, 0);
    }

    #[test]
    fn test_corner_cut() {
        let (r, _) = run_cell(&["##.", "#..", "..."], &step(2));
        assert_eq!(r, CellOutcome::Emitted(1));
    }

    #[test]
    fn test_ambiguous() {
        // B and C inside, with a filled center
        let strip = ["..#", ".##", "##."];
        let (r, _) = run_cell(&strip, &step(2));
        assert_eq!(r, CellOutcome::Emitted(4));

        // Same corners, but the center is empty
        let split = ["..#", "...", "#.."];
        let (r, _) = run_cell(&split, &step(2));
        assert_eq!(r, CellOutcome::Emitted(2));

        // A and D inside
        let strip = ["#..", ".#.", "..#"];
        assert_eq!(run_cell(&strip, &step(2)).0, CellOutcome::Emitted(4));
        let split = ["#..", "...", "..#"];
        assert_eq!(run_cell(&split, &step(2)).0, CellOutcome::Emitted(2));
    }

    #[test]
    fn test_center_test_modes() {
        // The center pixel is foreground but has no measurement
        let rows = ["..#", ".?.", "#.."];
        let fg = Settings {
            center_test: CenterTest::Foreground,
            ..step(2)
        };
        assert_eq!(run_cell(&rows, &fg).0, CellOutcome::Emitted(4));

        let inside = Settings {
            center_test: CenterTest::Inside,
            ..step(2)
        };
        assert_eq!(run_cell(&rows, &inside).0, CellOutcome::Emitted(2));
    }

    #[test]
    fn test_snap() {
        let snap = Settings {
            fitting: Fitting::Snap,
            ..step(1)
        };
        assert_eq!(run_cell(&["##", "#."], &snap).0, CellOutcome::Emitted(1));
        assert_eq!(run_cell(&["##", "##"], &snap).0, CellOutcome::Emitted(2));
        assert_eq!(run_cell(&["#.", "#."], &snap).0, CellOutcome::Empty);
        assert_eq!(run_cell(&["#.", ".#"], &snap).0, CellOutcome::Empty);
    }
}
