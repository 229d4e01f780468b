//! Sample lattice over the dense pixel grid
use std::num::NonZeroUsize;

use super::types::{Axis, Corner};

/// Marker for a vertex slot which has not been assigned this frame
pub(crate) const NO_VERTEX: usize = usize::MAX;

/// Dimensions of the dense per-pixel arrays
#[derive(
    Copy, Clone, Debug, Eq, PartialEq, serde::Serialize, serde::Deserialize,
)]
pub struct DenseSize {
    /// Width, in pixels
    pub width: usize,
    /// Height, in pixels
    pub height: usize,
}

impl DenseSize {
    /// Builds a new size
    pub fn new(width: usize, height: usize) -> Self {
        Self { width, height }
    }

    /// Returns the number of pixels
    pub fn len(&self) -> usize {
        self.width * self.height
    }

    /// Checks whether the grid has no pixels
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Returns the linear index of the pixel at `(x, y)`
    pub fn index(&self, x: usize, y: usize) -> usize {
        debug_assert!(x < self.width && y < self.height);
        x + y * self.width
    }

    /// Returns the texture coordinate of the pixel at `(x, y)`
    pub fn uv(&self, x: usize, y: usize) -> nalgebra::Vector2<f32> {
        nalgebra::Vector2::new(
            x as f32 / self.width as f32,
            y as f32 / self.height as f32,
        )
    }

    /// Returns the index offset for a one-pixel step along the given axis
    pub fn stride(&self, axis: Axis) -> usize {
        match axis {
            Axis::X => 1,
            Axis::Y => self.width,
        }
    }

    pub(crate) fn as_tuple(&self) -> (usize, usize) {
        (self.width, self.height)
    }
}

/// Inside / outside state of a sample, decided once per frame
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub(crate) enum Class {
    Unknown,
    Outside,
    Inside,
}

/// A single lattice node, with per-frame cached state
#[derive(Copy, Clone, Debug)]
pub struct Sample {
    /// Dense pixel column
    pub x: usize,
    /// Dense pixel row
    pub y: usize,
    /// Linear index into the dense per-pixel arrays
    pub index: usize,

    pub(crate) class: Class,
    /// Position fetched during classification, if the pixel was foreground
    pub(crate) position: Option<nalgebra::Vector3<f32>>,
    pub(crate) core: usize,
    pub(crate) horizontal: usize,
    pub(crate) vertical: usize,
}

impl Sample {
    fn new(x: usize, y: usize, index: usize) -> Self {
        Self {
            x,
            y,
            index,
            class: Class::Unknown,
            position: None,
            core: NO_VERTEX,
            horizontal: NO_VERTEX,
            vertical: NO_VERTEX,
        }
    }

    /// Clears all per-frame state
    pub fn reset(&mut self) {
        self.class = Class::Unknown;
        self.position = None;
        self.core = NO_VERTEX;
        self.horizontal = NO_VERTEX;
        self.vertical = NO_VERTEX;
    }

    /// Returns the index of this sample's own vertex, if it is inside
    pub fn core(&self) -> Option<usize> {
        slot(self.core)
    }

    /// Returns the cached crossing along the given axis
    pub fn crossing(&self, axis: Axis) -> Option<usize> {
        match axis {
            Axis::X => slot(self.horizontal),
            Axis::Y => slot(self.vertical),
        }
    }

    pub(crate) fn set_crossing(&mut self, axis: Axis, v: usize) {
        match axis {
            Axis::X => self.horizontal = v,
            Axis::Y => self.vertical = v,
        }
    }

    /// Returns the position fetched for this sample this frame
    ///
    /// This is `None` if the sample has not been classified or was not in
    /// the foreground; otherwise, it may contain non-finite values.
    pub fn position(&self) -> Option<nalgebra::Vector3<f32>> {
        self.position
    }

    /// Checks whether the sample has been classified as inside
    pub fn is_inside(&self) -> bool {
        self.class == Class::Inside
    }
}

fn slot(v: usize) -> Option<usize> {
    (v != NO_VERTEX).then_some(v)
}

/// Flat arena of [`Sample`] records at a fixed stride over the dense grid
///
/// Nodes are placed at every multiple of `step` within the dense grid, so
/// the lattice has `ceil(width / step)` columns and `ceil(height / step)`
/// rows.  Cells span pairs of adjacent nodes; pixels beyond the last node
/// are not covered when `step` does not divide the grid evenly.
#[derive(Clone, Debug)]
pub struct Lattice {
    size: DenseSize,
    step: NonZeroUsize,
    columns: usize,
    rows: usize,
    samples: Vec<Sample>,
}

impl Lattice {
    /// Builds a lattice over a dense grid of the given size
    pub fn new(size: DenseSize, step: NonZeroUsize) -> Self {
        let columns = size.width.div_ceil(step.get());
        let rows = size.height.div_ceil(step.get());
        let mut samples = Vec::with_capacity(columns * rows);
        for y in (0..size.height).step_by(step.get()) {
            for x in (0..size.width).step_by(step.get()) {
                samples.push(Sample::new(x, y, size.index(x, y)));
            }
        }
        debug_assert_eq!(samples.len(), columns * rows);
        Self {
            size,
            step,
            columns,
            rows,
            samples,
        }
    }

    /// Returns the size of the dense grid
    pub fn size(&self) -> DenseSize {
        self.size
    }

    /// Returns the stride between lattice nodes, in pixels
    pub fn step(&self) -> usize {
        self.step.get()
    }

    /// Returns the number of lattice columns
    pub fn columns(&self) -> usize {
        self.columns
    }

    /// Returns the number of lattice rows
    pub fn rows(&self) -> usize {
        self.rows
    }

    /// Returns the number of cells in each row
    pub fn cells_wide(&self) -> usize {
        self.columns.saturating_sub(1)
    }

    /// Returns the number of cells in each column
    pub fn cells_high(&self) -> usize {
        self.rows.saturating_sub(1)
    }

    /// Returns the total number of samples
    pub fn len(&self) -> usize {
        self.samples.len()
    }

    /// Checks whether the lattice has no samples
    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    /// Returns the arena index of the node at lattice position `(gx, gy)`
    pub fn index(&self, gx: usize, gy: usize) -> usize {
        debug_assert!(gx < self.columns && gy < self.rows);
        gx + gy * self.columns
    }

    /// Returns the sample at the given arena index
    pub fn sample(&self, i: usize) -> &Sample {
        &self.samples[i]
    }

    pub(crate) fn sample_mut(&mut self, i: usize) -> &mut Sample {
        &mut self.samples[i]
    }

    /// Iterates over every sample
    pub fn samples(&self) -> impl Iterator<Item = &Sample> {
        self.samples.iter()
    }

    /// Returns arena indices of the four corners of cell `(gx, gy)`
    ///
    /// Corners are ordered as `A`, `B`, `C`, `D` (see [`Corner`]).
    pub fn cell_corners(&self, gx: usize, gy: usize) -> [usize; 4] {
        debug_assert!(gx < self.cells_wide() && gy < self.cells_high());
        let a = self.index(gx, gy);
        let out = [a, a + 1, a + self.columns, a + self.columns + 1];
        debug_assert_eq!(out[Corner::D.index()], self.index(gx + 1, gy + 1));
        out
    }

    /// Iterates over cell positions in row-major order
    pub fn cells(&self) -> impl Iterator<Item = (usize, usize)> + use<> {
        let w = self.cells_wide();
        (0..self.cells_high())
            .flat_map(move |gy| (0..w).map(move |gx| (gx, gy)))
    }

    /// Clears per-frame state in every sample
    pub fn reset(&mut self) {
        self.samples.iter_mut().for_each(Sample::reset);
    }
}
