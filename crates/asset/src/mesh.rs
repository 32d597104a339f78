//! CPU-side mesh representation used by loaders.

/// Vertex with position and normal in object space.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct MeshVertex {
    pub position: [f32; 3],
    pub normal: [f32; 3],
}

impl MeshVertex {
    pub fn new(position: [f32; 3], normal: [f32; 3]) -> Self {
        Self { position, normal }
    }
}

/// Indexed mesh with tightly-packed vertices.
///
/// Indices are triples for triangle meshes and pairs for line sets; the
/// scene node drawing the mesh decides the interpretation.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct MeshData {
    pub vertices: Vec<MeshVertex>,
    pub indices: Vec<u32>,
}

impl MeshData {
    pub fn new(vertices: Vec<MeshVertex>, indices: Vec<u32>) -> Self {
        Self { vertices, indices }
    }

    /// Non-empty and every index in range.
    pub fn is_valid(&self) -> bool {
        let len = self.vertices.len();
        len > 0
            && !self.indices.is_empty()
            && self.indices.iter().all(|&i| (i as usize) < len)
    }

    /// Sequential traversal over vertex positions.
    pub fn positions(&self) -> impl Iterator<Item = [f32; 3]> + '_ {
        self.vertices.iter().map(|v| v.position)
    }
}
