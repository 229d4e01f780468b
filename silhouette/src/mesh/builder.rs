use super::Mesh;
use nalgebra::{Vector2, Vector3};

/// Container used during construction of a [`Mesh`]
///
/// The builder's buffers are recycled from frame to frame: publishing swaps
/// them with the previously published mesh, which is then cleared at the
/// start of the next pass.
#[derive(Default)]
pub struct MeshBuilder {
    out: Mesh,
}

impl MeshBuilder {
    /// Clears all buffers, keeping their allocations
    pub fn clear(&mut self) {
        self.out.vertices.clear();
        self.out.uvs.clear();
        self.out.triangles.clear();
    }

    /// Appends a vertex and its texture coordinate, returning its index
    pub fn push_vertex(
        &mut self,
        pos: Vector3<f32>,
        uv: Vector2<f32>,
    ) -> usize {
        let next_vert = self.out.vertices.len();
        self.out.vertices.push(pos);
        self.out.uvs.push(uv);
        next_vert
    }

    /// Appends a triangle
    ///
    /// Every index must refer to a vertex that was already pushed.
    pub fn push(&mut self, tri: Vector3<usize>) {
        debug_assert!(
            tri.iter().all(|i| *i < self.out.vertices.len()),
            "forward reference in {tri:?}"
        );
        self.out.triangles.push(tri)
    }

    /// Returns the number of vertices pushed so far
    pub fn vertex_count(&self) -> usize {
        self.out.vertices.len()
    }

    /// Returns the number of triangles pushed so far
    pub fn triangle_count(&self) -> usize {
        self.out.triangles.len()
    }

    /// Swaps the finished buffers into `mesh`
    pub fn publish(&mut self, mesh: &mut Mesh) {
        std::mem::swap(&mut self.out, mesh);
    }

    /// Consumes the builder, returning its mesh
    pub fn take(self) -> Mesh {
        self.out
    }
}
