//! Module containing the universal error type
use thiserror::Error;

/// Universal error type for silhouette meshing
///
/// These errors describe bad configuration or mismatched inputs, and are
/// reported when building a [`Contourer`](crate::mesh::Contourer) or a
/// [`Frame`](crate::mesh::Frame).  The per-frame pass itself never fails:
/// unusable samples and unresolved edge crossings are skipped silently.
#[derive(Error, Debug)]
pub enum Error {
    /// Lattice stride must be at least 1
    #[error("lattice stride must be at least 1")]
    BadStep,

    /// Depth bounds must be finite and in ascending order
    #[error("bad depth range; {0} is not less than {1}")]
    BadDepthRange(f32, f32),

    /// Dense grid must have at least one pixel
    #[error("dense grid must have at least one pixel")]
    EmptyGrid,

    /// Per-pixel slice lengths do not match the dense grid size
    #[error(
        "per-pixel slice lengths ({foreground} foreground, {positions} \
         positions) do not match the dense grid size ({expected})"
    )]
    BadFrameLength {
        /// Number of pixels in the dense grid
        expected: usize,
        /// Length of the foreground slice
        foreground: usize,
        /// Length of the position slice
        positions: usize,
    },

    /// Frame was built for a different dense grid
    #[error("frame size {actual:?} does not match lattice size {expected:?}")]
    FrameSizeMismatch {
        /// Size of the lattice's dense grid
        expected: (usize, usize),
        /// Size of the frame's dense grid
        actual: (usize, usize),
    },

    /// IO error; see inner code for details
    #[error("io error: {0}")]
    IoError(#[from] std::io::Error),
}
