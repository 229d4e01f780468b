//! Mesh output implementation
use super::Mesh;
use nalgebra::Vector3;
use std::io::{BufWriter, Write};

impl Mesh {
    /// Returns the (unnormalized) normal of the given triangle
    ///
    /// The length of the result is twice the triangle's area.
    fn face_cross(&self, t: &Vector3<usize>) -> Vector3<f32> {
        let a = self.vertices[t.x];
        let b = self.vertices[t.y];
        let c = self.vertices[t.z];
        (b - a).cross(&(c - a))
    }

    /// Returns one unit normal per triangle, following the right-hand rule
    ///
    /// Degenerate triangles get a zero normal.
    pub fn face_normals(&self) -> Vec<Vector3<f32>> {
        self.triangles
            .iter()
            .map(|t| {
                self.face_cross(t)
                    .try_normalize(f32::EPSILON)
                    .unwrap_or_else(Vector3::zeros)
            })
            .collect()
    }

    /// Returns one unit normal per vertex
    ///
    /// Each vertex normal is the area-weighted average of the normals of the
    /// triangles that use it.  Vertices which aren't used by any triangle get
    /// a zero normal.
    pub fn vertex_normals(&self) -> Vec<Vector3<f32>> {
        let mut out = vec![Vector3::zeros(); self.vertices.len()];
        for t in &self.triangles {
            let n = self.face_cross(t);
            for i in t {
                out[*i] += n;
            }
        }
        for n in &mut out {
            *n = n.try_normalize(f32::EPSILON).unwrap_or_else(Vector3::zeros);
        }
        out
    }

    /// Writes a binary STL to the given output
    pub fn write_stl<F: std::io::Write>(
        &self,
        out: &mut F,
    ) -> Result<(), crate::Error> {
        // We're going to do many small writes and will typically be writing to
        // a file, so using a `BufWriter` saves excessive syscalls.
        let mut out = BufWriter::new(out);
        const HEADER: &[u8] = b"Silhouette mesh";
        static_assertions::const_assert!(HEADER.len() <= 80);
        out.write_all(HEADER)?;
        out.write_all(&[0u8; 80 - HEADER.len()])?;
        out.write_all(&(self.triangles.len() as u32).to_le_bytes())?;
        for (t, normal) in self.triangles.iter().zip(self.face_normals()) {
            for p in &normal {
                out.write_all(&p.to_le_bytes())?;
            }
            for v in t {
                for p in &self.vertices[*v] {
                    out.write_all(&p.to_le_bytes())?;
                }
            }
            out.write_all(&[0u8; std::mem::size_of::<u16>()])?; // attributes
        }
        out.flush()?;
        Ok(())
    }

    /// Writes a Wavefront OBJ, including texture coordinates
    ///
    /// OBJ texture coordinates have `v` pointing up, so `v` is flipped from
    /// image order.
    pub fn write_obj<F: std::io::Write>(
        &self,
        out: &mut F,
    ) -> Result<(), crate::Error> {
        let mut out = BufWriter::new(out);
        for v in &self.vertices {
            writeln!(out, "v {} {} {}", v.x, v.y, v.z)?;
        }
        for uv in &self.uvs {
            writeln!(out, "vt {} {}", uv.x, 1.0 - uv.y)?;
        }
        for t in &self.triangles {
            // OBJ indices are 1-based
            let (a, b, c) = (t.x + 1, t.y + 1, t.z + 1);
            writeln!(out, "f {a}/{a} {b}/{b} {c}/{c}")?;
        }
        out.flush()?;
        Ok(())
    }
}
