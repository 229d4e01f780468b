//! Boundary crossings along lattice edges
//!
//! A lattice edge spans `step` pixels, which is too coarse to place the
//! silhouette boundary.  Instead of snapping to a corner, we walk the dense
//! pixels between the two samples and put the crossing vertex on the last
//! foreground pixel before the transition.
use super::{Pass, frame::is_finite, types::Axis};

impl Pass<'_> {
    /// Finds the boundary crossing on the edge leaving sample `s`
    ///
    /// The edge runs `step` pixels to the right ([`Axis::X`]) or downward
    /// ([`Axis::Y`]).  If the sample is inside, we march outward looking for
    /// the first background pixel and keep the pixel before it; otherwise, we
    /// march inward looking for the first foreground pixel.  Candidates with
    /// non-finite positions are skipped and the scan continues, so an outward
    /// crossing may land on a background pixel past the skipped one.
    ///
    /// New crossings are pushed to the mesh and cached on the sample, so the
    /// neighboring cell that shares this edge reuses the same vertex.
    ///
    /// If no usable crossing is found, this falls back to the sample's own
    /// vertex (or `None` if the sample is outside).
    pub(crate) fn resolve(&mut self, s: usize, axis: Axis) -> Option<usize> {
        if let Some(v) = self.lattice.sample(s).crossing(axis) {
            return Some(v);
        }

        let inside = self.classify(s);
        let sample = *self.lattice.sample(s);
        let size = self.lattice.size();
        let stride = size.stride(axis);

        for i in 0..=self.lattice.step() {
            let fg = self.frame.is_foreground(sample.index + i * stride);
            let hit = match (inside, fg) {
                (false, true) => Some(i),
                (true, false) => i.checked_sub(1),
                _ => None,
            };
            let Some(j) = hit else {
                continue;
            };

            let p = self.frame.position(sample.index + j * stride);
            if !is_finite(&p) {
                continue;
            }
            let uv = match axis {
                Axis::X => size.uv(sample.x + j, sample.y),
                Axis::Y => size.uv(sample.x, sample.y + j),
            };
            let v = self.out.push_vertex(p, uv);
            self.lattice.sample_mut(s).set_crossing(axis, v);
            return Some(v);
        }

        sample.core()
    }
}

#[cfg(test)]
mod test {
    use crate::mesh::{
        Pass, Settings,
        builder::MeshBuilder,
        frame::Frame,
        grid::{DenseSize, Lattice},
        types::Axis,
    };
    use nalgebra::{Vector2, Vector3};
    use std::num::NonZeroUsize;
    use strum::IntoEnumIterator;

    type Run = (
        Option<usize>,
        Option<usize>,
        Vec<Vector3<f32>>,
        Vec<Vector2<f32>>,
    );

    /// Single-row (or single-column) strip of pixels
    struct Strip {
        size: DenseSize,
        fg: Vec<bool>,
        pos: Vec<Vector3<f32>>,
        settings: Settings,
    }

    impl Strip {
        fn new(pattern: &str, axis: Axis) -> Self {
            let n = pattern.len();
            let size = match axis {
                Axis::X => DenseSize::new(n, 1),
                Axis::Y => DenseSize::new(1, n),
            };
            let fg = pattern.chars().map(|c| c != '.').collect();
            let pos = pattern
                .chars()
                .enumerate()
                .map(|(i, c)| {
                    if c == '?' {
                        Vector3::new(f32::NAN, f32::NAN, f32::NAN)
                    } else {
                        Vector3::new(i as f32, 0.0, 2.0)
                    }
                })
                .collect();
            let settings = Settings {
                step: n - 1,
                ..Settings::default()
            };
            Self {
                size,
                fg,
                pos,
                settings,
            }
        }

        /// Resolves the edge from the first pixel, twice
        fn run(&self, axis: Axis) -> Run {
            let frame = Frame::new(self.size, &self.fg, &self.pos).unwrap();
            let step = NonZeroUsize::new(self.settings.step).unwrap();
            let mut lattice = Lattice::new(self.size, step);
            let mut out = MeshBuilder::default();
            let mut pass = Pass {
                lattice: &mut lattice,
                frame: &frame,
                settings: &self.settings,
                out: &mut out,
            };
            let first = pass.resolve(0, axis);
            let second = pass.resolve(0, axis);
            let mesh = out.take();
            (first, second, mesh.vertices, mesh.uvs)
        }
    }

    #[test]
    fn test_march_inward() {
        // Outside sample, boundary found on the third pixel
        for axis in Axis::iter() {
            let strip = Strip::new("..###", axis);
            let (first, second, verts, uvs) = strip.run(axis);
            assert_eq!(first, Some(0));
            assert_eq!(second, Some(0));
            assert_eq!(verts.len(), 1);
            assert_eq!(verts[0].x, 2.0);
            let uv = match axis {
                Axis::X => Vector2::new(2.0 / 5.0, 0.0),
                Axis::Y => Vector2::new(0.0, 2.0 / 5.0),
            };
            assert_eq!(uvs[0], uv);
        }
    }

    #[test]
    fn test_march_outward() {
        // Inside sample: its own vertex comes first, then the last inside
        // pixel before the transition
        let strip = Strip::new("###..", Axis::X);
        let (first, second, verts, _) = strip.run(Axis::X);
        assert_eq!(first, Some(1));
        assert_eq!(second, Some(1));
        assert_eq!(verts.len(), 2);
        assert_eq!(verts[1].x, 2.0);
    }

    #[test]
    fn test_march_vertical() {
        let strip = Strip::new("#....", Axis::Y);
        let (first, _, verts, uvs) = strip.run(Axis::Y);
        // Transition right after the sample, so the crossing sits on it
        assert_eq!(first, Some(1));
        assert_eq!(verts[1].x, 0.0);
        assert_eq!(uvs[1], Vector2::new(0.0, 0.0));

        let strip = Strip::new("...##", Axis::Y);
        let (first, _, verts, uvs) = strip.run(Axis::Y);
        assert_eq!(first, Some(0));
        assert_eq!(verts[0].x, 3.0);
        assert_eq!(uvs[0], Vector2::new(0.0, 3.0 / 5.0));
    }

    #[test]
    fn test_skip_invalid_candidate() {
        // The first foreground pixel has no measurement, so the crossing
        // lands on the next one
        let strip = Strip::new("..?##", Axis::X);
        let (first, _, verts, _) = strip.run(Axis::X);
        assert_eq!(first, Some(0));
        assert_eq!(verts[0].x, 3.0);
    }

    #[test]
    fn test_skip_invalid_outward() {
        // The last inside pixel has no measurement, so the crossing moves on
        // to the next transition candidate, which is a background pixel
        let strip = Strip::new("#?...", Axis::X);
        let (first, second, verts, uvs) = strip.run(Axis::X);
        assert_eq!(first, Some(1));
        assert_eq!(second, Some(1));
        assert_eq!(verts.len(), 2);
        assert_eq!(verts[1].x, 2.0);
        assert_eq!(uvs[1], Vector2::new(2.0 / 5.0, 0.0));
    }

    #[test]
    fn test_unresolved() {
        // Outside sample, and the only foreground pixel is unusable
        let strip = Strip::new("..?..", Axis::X);
        let (first, second, verts, _) = strip.run(Axis::X);
        assert_eq!(first, None);
        assert_eq!(second, None);
        assert!(verts.is_empty());

        // Inside sample with no transition falls back to the core vertex
        let strip = Strip::new("#####", Axis::X);
        let (first, second, verts, _) = strip.run(Axis::X);
        assert_eq!(first, Some(0));
        assert_eq!(second, Some(0));
        assert_eq!(verts.len(), 1);
    }
}
