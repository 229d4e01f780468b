//! Silhouette is a library for turning per-pixel foreground masks into
//! triangle meshes.
//!
//! The input is a dense grid of pixels, as produced by a depth camera with
//! body tracking: each pixel has a **foreground tag** (does it belong to the
//! tracked subject?) and a **3D position** (which may be non-finite if the
//! sensor had no measurement there).  The output is a [`Mesh`](mesh::Mesh)
//! of vertices, texture coordinates, and triangles covering the foreground
//! region, with its boundary fitted to the mask at full pixel resolution.
//!
//! # Overview
//! Meshing is organized around a sparse **lattice** of samples, every `step`
//! pixels.  Each frame, the [`Contourer`](mesh::Contourer):
//!
//! - Resets the per-sample state in the lattice
//! - Classifies samples as **inside** (foreground, finite position, depth
//!   within the configured range) or outside
//! - Walks each 2×2 **cell** of samples, picking one of 16 triangulations
//!   based on which corners are inside
//! - Places vertices where the silhouette boundary crosses cell edges, by
//!   scanning the dense pixels between samples
//!
//! ```
//! use silhouette::mesh::{Contourer, DenseSize, Frame, Settings};
//! use nalgebra::Vector3;
//!
//! // A 20×20 frame with a filled square in the middle
//! let size = DenseSize::new(20, 20);
//! let mut fg = vec![false; size.len()];
//! let mut pos = vec![Vector3::repeat(f32::INFINITY); size.len()];
//! for y in 5..15 {
//!     for x in 5..15 {
//!         let i = size.index(x, y);
//!         fg[i] = true;
//!         pos[i] = Vector3::new(x as f32 / 20.0, y as f32 / 20.0, 2.0);
//!     }
//! }
//!
//! let settings = Settings { step: 4, ..Settings::default() };
//! let mut contourer = Contourer::new(size, settings)?;
//! let frame = Frame::new(size, &fg, &pos)?;
//! let mesh = contourer.update(Some(&frame))?;
//! assert!(!mesh.triangles.is_empty());
//! # Ok::<(), silhouette::Error>(())
//! ```
//!
//! Frames which are missing (because upstream data wasn't ready) are passed
//! as `None`; the previous mesh is kept.
//!
//! Per-frame statistics are reported through the [`log`](https://docs.rs/log)
//! facade at `debug` level.
pub mod error;
pub mod mesh;

pub use error::Error;
