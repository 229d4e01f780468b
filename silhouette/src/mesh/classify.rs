//! Inside / outside classification of lattice samples
use super::{
    Pass, Settings,
    frame::{Frame, is_finite},
    grid::Class,
};

/// Checks whether the pixel at dense index `i` is inside the silhouette
///
/// A pixel is inside if it is tagged as foreground, its position is finite,
/// and its depth lies strictly within the configured range.
pub fn is_inside(frame: &Frame, settings: &Settings, i: usize) -> bool {
    frame.is_foreground(i) && {
        let p = frame.position(i);
        is_finite(&p) && settings.accepts_depth(p.z)
    }
}

impl Pass<'_> {
    /// Classifies the sample at arena index `s`, creating its vertex
    ///
    /// The result is cached in the sample, so repeated calls within a frame
    /// (one per adjacent cell) return the same answer without pushing
    /// another vertex.
    pub(crate) fn classify(&mut self, s: usize) -> bool {
        let size = self.lattice.size();
        let sample = self.lattice.sample_mut(s);
        match sample.class {
            Class::Inside => return true,
            Class::Outside => return false,
            Class::Unknown => (),
        }

        let pos = if self.frame.is_foreground(sample.index) {
            let p = self.frame.position(sample.index);
            sample.position = Some(p);
            Some(p).filter(|p| is_finite(p) && self.settings.accepts_depth(p.z))
        } else {
            None
        };

        match pos {
            Some(p) => {
                let uv = size.uv(sample.x, sample.y);
                sample.core = self.out.push_vertex(p, uv);
                sample.class = Class::Inside;
                true
            }
            None => {
                sample.class = Class::Outside;
                false
            }
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::mesh::{builder::MeshBuilder, grid::{DenseSize, Lattice}};
    use nalgebra::{Vector2, Vector3};
    use std::num::NonZeroUsize;

    #[test]
    fn test_is_inside() {
        let size = DenseSize::new(5, 1);
        let fg = [true, true, true, false, true];
        let pos = [
            Vector3::new(0.0, 0.0, 1.0),
            Vector3::new(0.0, 0.0, 4.0), // on the far bound
            Vector3::new(f32::INFINITY, 0.0, 1.0),
            Vector3::new(0.0, 0.0, 1.0), // background
            Vector3::new(0.0, 0.0, 0.6), // on the near bound
        ];
        let frame = Frame::new(size, &fg, &pos).unwrap();
        let settings = Settings::default();
        let inside: Vec<bool> =
            (0..5).map(|i| is_inside(&frame, &settings, i)).collect();
        assert_eq!(inside, vec![true, false, false, false, false]);
    }

    #[test]
    fn test_classify_once() {
        let size = DenseSize::new(3, 3);
        let fg = [false, true, true, true, true, true, true, true, true];
        let mut pos = [Vector3::new(0.0, 0.0, 2.0); 9];
        pos[2] = Vector3::new(0.0, f32::NAN, 2.0);
        pos[3] = Vector3::new(0.0, 0.0, 8.0);

        let frame = Frame::new(size, &fg, &pos).unwrap();
        let settings = Settings {
            step: 1,
            ..Settings::default()
        };
        let mut lattice = Lattice::new(size, NonZeroUsize::new(1).unwrap());
        let mut out = MeshBuilder::default();
        let mut pass = Pass {
            lattice: &mut lattice,
            frame: &frame,
            settings: &settings,
            out: &mut out,
        };

        assert!(!pass.classify(0)); // background
        assert!(pass.classify(1));
        assert!(!pass.classify(2)); // non-finite
        assert!(!pass.classify(3)); // too far
        assert!(pass.classify(4));
        assert_eq!(pass.out.vertex_count(), 2);

        // Second visit hits the cache
        assert!(pass.classify(1));
        assert!(pass.classify(4));
        assert_eq!(pass.out.vertex_count(), 2);

        let s = pass.lattice.sample(4);
        assert_eq!(s.core(), Some(1));
        assert_eq!(s.position(), Some(Vector3::new(0.0, 0.0, 2.0)));
        assert_eq!(pass.lattice.sample(0).position(), None);
        assert_eq!(pass.lattice.sample(3).core(), None);

        let mesh = out.take();
        assert_eq!(mesh.uvs[1], Vector2::new(1.0 / 3.0, 1.0 / 3.0));
    }
}
