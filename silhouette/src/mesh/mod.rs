//! Silhouette contouring
//!
//! This module turns a per-pixel foreground mask (with a 3D position for each
//! pixel) into a triangle mesh covering the foreground region.  It's a
//! variant of marching squares with a few twists:
//!
//! - Samples are taken on a sparse lattice, every `step` pixels
//! - Edge crossings are fitted to the true foreground boundary by walking the
//!   dense pixels between two samples, rather than snapped or interpolated
//! - Crossing vertices are cached on the lattice, so cells that share an edge
//!   share a vertex
//! - The two ambiguous configurations (opposite corners inside) are resolved
//!   by looking at the pixel in the middle of the cell
//!
//! The mesh is rebuilt from scratch on every frame; nothing but the lattice
//! itself carries over between frames.
//!
//! ```
//! use silhouette::mesh::{Contourer, DenseSize, Frame, Settings};
//! use nalgebra::Vector3;
//!
//! let size = DenseSize::new(4, 4);
//! let fg = vec![true; size.len()];
//! let pos = vec![Vector3::new(0.0, 0.0, 2.0); size.len()];
//! let frame = Frame::new(size, &fg, &pos)?;
//!
//! let settings = Settings { step: 1, ..Settings::default() };
//! let mut contourer = Contourer::new(size, settings)?;
//! let mesh = contourer.update(Some(&frame))?;
//! assert_eq!(mesh.vertices.len(), 16);
//! assert_eq!(mesh.triangles.len(), 18);
//! # Ok::<(), silhouette::Error>(())
//! ```
use std::num::NonZeroUsize;

use log::{debug, trace};
use serde::{Deserialize, Serialize};

use crate::Error;

mod builder;
mod cell;
mod classify;
mod frame;
mod grid;
mod march;
mod output;
mod table;

pub mod types;

pub use builder::MeshBuilder;
pub use cell::CellOutcome;
pub use classify::is_inside;
pub use frame::{BODY_INDEX_NONE, Frame, foreground_from_body_index, is_finite};
pub use grid::{DenseSize, Lattice, Sample};
pub use table::{CELL_CASES, CellCase, SNAP_CASES};

////////////////////////////////////////////////////////////////////////////////

/// An indexed 3D mesh with texture coordinates
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct Mesh {
    /// Vertex positions
    pub vertices: Vec<nalgebra::Vector3<f32>>,
    /// Texture coordinates, parallel to [`Mesh::vertices`]
    pub uvs: Vec<nalgebra::Vector2<f32>>,
    /// Triangles, as indexes into [`Mesh::vertices`]
    pub triangles: Vec<nalgebra::Vector3<usize>>,
}

impl Mesh {
    /// Checks whether the mesh has no triangles
    pub fn is_empty(&self) -> bool {
        self.triangles.is_empty()
    }
}

////////////////////////////////////////////////////////////////////////////////

/// How to resolve the ambiguous cells (keys 6 and 9)
#[derive(
    Copy, Clone, Debug, Default, Eq, PartialEq, Serialize, Deserialize,
    strum::EnumIter,
)]
pub enum CenterTest {
    /// The center is filled if its pixel is tagged as foreground
    #[default]
    Foreground,
    /// The center is filled if its pixel passes the full inside test
    /// (foreground, finite position, depth in range)
    Inside,
}

/// How cells along the silhouette boundary are triangulated
#[derive(
    Copy, Clone, Debug, Default, Eq, PartialEq, Serialize, Deserialize,
    strum::EnumIter,
)]
pub enum Fitting {
    /// Fit crossing vertices to the foreground boundary along cell edges
    #[default]
    March,
    /// Only triangulate between inside corners; cells with fewer than three
    /// inside corners are dropped
    Snap,
}

/// Settings when building a silhouette mesh
#[derive(Copy, Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Lattice stride, in pixels
    pub step: usize,

    /// Depths must be strictly greater than this value
    pub depth_min: f32,

    /// Depths must be strictly less than this value
    pub depth_max: f32,

    /// Resolution for ambiguous cells
    pub center_test: CenterTest,

    /// Boundary triangulation strategy
    pub fitting: Fitting,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            step: 10,
            depth_min: 0.6,
            depth_max: 4.0,
            center_test: CenterTest::default(),
            fitting: Fitting::default(),
        }
    }
}

impl Settings {
    /// Checks that the settings are usable, returning the lattice stride
    pub fn validate(&self) -> Result<NonZeroUsize, Error> {
        let step = NonZeroUsize::new(self.step).ok_or(Error::BadStep)?;
        if !(self.depth_min.is_finite()
            && self.depth_max.is_finite()
            && self.depth_min < self.depth_max)
        {
            return Err(Error::BadDepthRange(self.depth_min, self.depth_max));
        }
        Ok(step)
    }

    /// Checks whether a depth lies within the open `(depth_min, depth_max)`
    /// interval
    #[inline]
    pub fn accepts_depth(&self, z: f32) -> bool {
        z > self.depth_min && z < self.depth_max
    }
}

////////////////////////////////////////////////////////////////////////////////

/// Mutable state for a single contouring pass
///
/// Classification, edge marching, and triangulation are implemented on this
/// type in their own modules.
pub(crate) struct Pass<'a> {
    pub lattice: &'a mut Lattice,
    pub frame: &'a Frame<'a>,
    pub settings: &'a Settings,
    pub out: &'a mut MeshBuilder,
}

/// Per-pass counters, used for logging
#[derive(Copy, Clone, Debug, Default, Eq, PartialEq)]
pub struct PassStats {
    /// Cells which emitted at least one triangle
    pub emitted: usize,
    /// Cells with no inside corners (or no triangles in their case)
    pub empty: usize,
    /// Cells skipped because an edge crossing was unresolved
    pub unresolved: usize,
}

impl Pass<'_> {
    /// Triangulates every cell of the lattice
    fn run(&mut self) -> PassStats {
        let mut stats = PassStats::default();
        for (gx, gy) in self.lattice.cells() {
            match self.triangulate(gx, gy) {
                CellOutcome::Emitted(_) => stats.emitted += 1,
                CellOutcome::Empty => stats.empty += 1,
                CellOutcome::Unresolved => {
                    trace!("skipping cell ({gx}, {gy}): unresolved crossing");
                    stats.unresolved += 1;
                }
            }
        }
        stats
    }
}

/// State of the per-frame driver
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum DriverState {
    /// Waiting for the next frame
    Idle,
    /// Resetting the lattice and triangulating cells
    Building,
}

/// Per-frame driver, owning the lattice and the most recent mesh
pub struct Contourer {
    settings: Settings,
    lattice: Lattice,
    builder: MeshBuilder,
    mesh: Mesh,
    state: DriverState,
    frames: usize,
    stats: PassStats,
}

impl Contourer {
    /// Builds a contourer for frames of the given size
    ///
    /// The lattice is built once here and reused for every frame.
    pub fn new(size: DenseSize, settings: Settings) -> Result<Self, Error> {
        let step = settings.validate()?;
        let lattice = Lattice::new(size, step);
        if lattice.is_empty() {
            return Err(Error::EmptyGrid);
        }
        debug!(
            "built {}x{} lattice over {}x{} pixels",
            lattice.columns(),
            lattice.rows(),
            size.width,
            size.height
        );
        Ok(Self {
            settings,
            lattice,
            builder: MeshBuilder::default(),
            mesh: Mesh::default(),
            state: DriverState::Idle,
            frames: 0,
            stats: PassStats::default(),
        })
    }

    /// Rebuilds the mesh from a new frame
    ///
    /// If `frame` is `None` (i.e. the upstream data wasn't available this
    /// tick), the pass is skipped and the previous mesh is returned
    /// unchanged.
    pub fn update(&mut self, frame: Option<&Frame>) -> Result<&Mesh, Error> {
        let Some(frame) = frame else {
            debug!("no frame available; keeping previous mesh");
            return Ok(&self.mesh);
        };
        if frame.size() != self.lattice.size() {
            return Err(Error::FrameSizeMismatch {
                expected: self.lattice.size().as_tuple(),
                actual: frame.size().as_tuple(),
            });
        }

        self.state = DriverState::Building;
        self.builder.clear();
        self.lattice.reset();

        let mut pass = Pass {
            lattice: &mut self.lattice,
            frame,
            settings: &self.settings,
            out: &mut self.builder,
        };
        let stats = pass.run();

        self.builder.publish(&mut self.mesh);
        self.state = DriverState::Idle;
        self.frames += 1;
        self.stats = stats;
        debug!(
            "frame {}: {} vertices, {} triangles ({} cells emitted, {} \
             unresolved)",
            self.frames,
            self.mesh.vertices.len(),
            self.mesh.triangles.len(),
            stats.emitted,
            stats.unresolved,
        );
        Ok(&self.mesh)
    }

    /// Returns the most recently built mesh
    pub fn mesh(&self) -> &Mesh {
        &self.mesh
    }

    /// Returns the driver state
    pub fn state(&self) -> DriverState {
        self.state
    }

    /// Returns the number of completed passes
    pub fn frames(&self) -> usize {
        self.frames
    }

    /// Returns counters from the most recent pass
    pub fn stats(&self) -> PassStats {
        self.stats
    }

    /// Returns the settings
    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    /// Returns the lattice, with per-sample state from the latest pass
    pub fn lattice(&self) -> &Lattice {
        &self.lattice
    }
}

/// Builds a mesh from a single frame
///
/// This is a shortcut for one-off meshing; use a [`Contourer`] to mesh a
/// stream of frames without rebuilding the lattice every time.
pub fn contour(frame: &Frame, settings: &Settings) -> Result<Mesh, Error> {
    let step = settings.validate()?;
    let mut lattice = Lattice::new(frame.size(), step);
    if lattice.is_empty() {
        return Err(Error::EmptyGrid);
    }
    let mut out = MeshBuilder::default();
    Pass {
        lattice: &mut lattice,
        frame,
        settings,
        out: &mut out,
    }
    .run();
    Ok(out.take())
}

////////////////////////////////////////////////////////////////////////////////
