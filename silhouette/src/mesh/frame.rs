//! Per-frame input data
use super::grid::DenseSize;
use crate::Error;

/// Body-index value marking a pixel that belongs to no tracked subject
pub const BODY_INDEX_NONE: u8 = 255;

/// Borrowed per-pixel data for a single frame
///
/// Both slices are indexed by dense pixel index (`x + y * width`).
#[derive(Copy, Clone, Debug)]
pub struct Frame<'a> {
    size: DenseSize,
    foreground: &'a [bool],
    positions: &'a [nalgebra::Vector3<f32>],
}

impl<'a> Frame<'a> {
    /// Wraps per-pixel foreground tags and positions
    ///
    /// Positions with non-finite components mark pixels without a valid
    /// measurement.  Returns an error if either slice has the wrong length.
    pub fn new(
        size: DenseSize,
        foreground: &'a [bool],
        positions: &'a [nalgebra::Vector3<f32>],
    ) -> Result<Self, Error> {
        if foreground.len() != size.len() || positions.len() != size.len() {
            return Err(Error::BadFrameLength {
                expected: size.len(),
                foreground: foreground.len(),
                positions: positions.len(),
            });
        }
        Ok(Self {
            size,
            foreground,
            positions,
        })
    }

    /// Returns the size of the dense grid
    pub fn size(&self) -> DenseSize {
        self.size
    }

    /// Checks whether the pixel at the given index is in the foreground
    #[inline]
    pub fn is_foreground(&self, i: usize) -> bool {
        self.foreground[i]
    }

    /// Returns the position of the pixel at the given index
    #[inline]
    pub fn position(&self, i: usize) -> nalgebra::Vector3<f32> {
        self.positions[i]
    }
}

/// Converts a body-index image into foreground tags
///
/// Any pixel not equal to [`BODY_INDEX_NONE`] belongs to some tracked body.
pub fn foreground_from_body_index(body_index: &[u8]) -> Vec<bool> {
    body_index.iter().map(|b| *b != BODY_INDEX_NONE).collect()
}

/// Checks whether every component of a position is finite
#[inline]
pub fn is_finite(p: &nalgebra::Vector3<f32>) -> bool {
    p.iter().all(|v| v.is_finite())
}
