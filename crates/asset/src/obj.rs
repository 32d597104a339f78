//! Wavefront OBJ loading: positions, normals, triangulated faces.

use std::collections::HashMap;
use std::fs::File;
use std::io::{BufRead, BufReader, Cursor};
use std::path::Path;
use std::str::SplitWhitespace;

use anyhow::{Context, Result, anyhow, bail, ensure};

use crate::mesh::{MeshData, MeshVertex};

/// Read a mesh from an OBJ file on disk.
pub fn read_obj_file(path: impl AsRef<Path>) -> Result<MeshData> {
    let path = path.as_ref();
    let file = File::open(path)
        .with_context(|| format!("failed to open OBJ file {}", path.display()))?;
    let mesh = read_obj(BufReader::new(file))
        .with_context(|| format!("failed to parse {}", path.display()))?;
    log::info!(
        "loaded {}: {} vertices, {} triangles",
        path.display(),
        mesh.vertices.len(),
        mesh.indices.len() / 3
    );
    Ok(mesh)
}

/// Read a mesh from any buffered reader.
pub fn read_obj<R: BufRead>(reader: R) -> Result<MeshData> {
    let mut builder = ObjBuilder::default();
    for (number, line) in reader.lines().enumerate() {
        let line = line.with_context(|| format!("I/O error at line {}", number + 1))?;
        let trimmed = line.trim();
        if trimmed.is_empty() || trimmed.starts_with('#') {
            continue;
        }
        builder
            .line(trimmed)
            .with_context(|| format!("line {}: '{}'", number + 1, trimmed))?;
    }
    builder.finish()
}

/// Convenience helper for string literals (tests, embedded meshes).
pub fn read_obj_str(contents: &str) -> Result<MeshData> {
    read_obj(Cursor::new(contents))
}

/// Accumulates raw OBJ data and welds `position/normal` index pairs into
/// an indexed vertex list as faces arrive.
#[derive(Default)]
struct ObjBuilder {
    positions: Vec<[f32; 3]>,
    normals: Vec<[f32; 3]>,
    vertices: Vec<MeshVertex>,
    indices: Vec<u32>,
    welded: HashMap<(usize, Option<usize>), u32>,
    missing_normals: bool,
}

impl ObjBuilder {
    fn line(&mut self, line: &str) -> Result<()> {
        let mut fields = line.split_whitespace();
        let Some(tag) = fields.next() else {
            return Ok(());
        };
        match tag {
            "v" => self.positions.push(read_vec3(&mut fields)?),
            "vn" => self.normals.push(read_vec3(&mut fields)?),
            "f" => self.face(fields)?,
            // vt and grouping/material directives are accepted and ignored.
            _ => {}
        }
        Ok(())
    }

    fn face(&mut self, fields: SplitWhitespace<'_>) -> Result<()> {
        let mut corners: Vec<u32> = Vec::with_capacity(4);
        for token in fields {
            corners.push(self.corner(token)?);
        }
        ensure!(corners.len() >= 3, "face with fewer than 3 vertices");
        // Fan triangulation for quads and larger polygons.
        for i in 1..corners.len() - 1 {
            self.indices
                .extend_from_slice(&[corners[0], corners[i], corners[i + 1]]);
        }
        Ok(())
    }

    fn corner(&mut self, token: &str) -> Result<u32> {
        let mut refs = token.split('/');
        let position = resolve_index(refs.next().unwrap_or(""), self.positions.len())?;
        let _texcoord = refs.next();
        let normal = match refs.next() {
            Some(value) if !value.is_empty() => Some(resolve_index(value, self.normals.len())?),
            _ => None,
        };
        if normal.is_none() {
            self.missing_normals = true;
        }

        let key = (position, normal);
        if let Some(&index) = self.welded.get(&key) {
            return Ok(index);
        }
        let index = u32::try_from(self.vertices.len())
            .map_err(|_| anyhow!("more than {} unique vertices", u32::MAX))?;
        self.vertices.push(MeshVertex::new(
            self.positions[position],
            normal.map(|n| self.normals[n]).unwrap_or([0.0; 3]),
        ));
        self.welded.insert(key, index);
        Ok(index)
    }

    fn finish(mut self) -> Result<MeshData> {
        ensure!(!self.indices.is_empty(), "OBJ contains no faces");
        if self.missing_normals {
            reconstruct_normals(&mut self.vertices, &self.indices);
        }
        Ok(MeshData::new(self.vertices, self.indices))
    }
}

fn read_vec3(fields: &mut SplitWhitespace<'_>) -> Result<[f32; 3]> {
    let mut out = [0.0f32; 3];
    for (slot, axis) in out.iter_mut().zip(["x", "y", "z"]) {
        let token = fields
            .next()
            .ok_or_else(|| anyhow!("missing {axis} component"))?;
        *slot = token
            .parse()
            .with_context(|| format!("invalid {axis} component '{token}'"))?;
    }
    Ok(out)
}

/// OBJ indices are 1-based; negative values count back from the end of the
/// list parsed so far.
fn resolve_index(token: &str, len: usize) -> Result<usize> {
    let raw: i64 = token
        .parse()
        .with_context(|| format!("invalid index '{token}'"))?;
    if raw == 0 {
        bail!("OBJ indices are 1-based, found 0");
    }
    let index = if raw > 0 { raw - 1 } else { len as i64 + raw };
    ensure!(
        (0..len as i64).contains(&index),
        "index {raw} out of range (have {len})"
    );
    Ok(index as usize)
}

/// Fill in missing normals from area-weighted face normals. Vertices that
/// already carried a normal from the file keep it.
fn reconstruct_normals(vertices: &mut [MeshVertex], indices: &[u32]) {
    let mut accumulated = vec![[0.0f32; 3]; vertices.len()];
    for tri in indices.chunks_exact(3) {
        let [a, b, c] = [tri[0] as usize, tri[1] as usize, tri[2] as usize];
        let e1 = sub(vertices[b].position, vertices[a].position);
        let e2 = sub(vertices[c].position, vertices[a].position);
        // Unnormalized cross product: larger faces weigh more.
        let face = cross(e1, e2);
        for &i in &[a, b, c] {
            for axis in 0..3 {
                accumulated[i][axis] += face[axis];
            }
        }
    }
    for (vertex, sum) in vertices.iter_mut().zip(accumulated) {
        if vertex.normal != [0.0; 3] {
            continue;
        }
        let len = (sum[0] * sum[0] + sum[1] * sum[1] + sum[2] * sum[2]).sqrt();
        vertex.normal = if len > 0.0 {
            [sum[0] / len, sum[1] / len, sum[2] / len]
        } else {
            [0.0, 0.0, 1.0]
        };
    }
}

fn sub(a: [f32; 3], b: [f32; 3]) -> [f32; 3] {
    [a[0] - b[0], a[1] - b[1], a[2] - b[2]]
}

fn cross(a: [f32; 3], b: [f32; 3]) -> [f32; 3] {
    [
        a[1] * b[2] - a[2] * b[1],
        a[2] * b[0] - a[0] * b[2],
        a[0] * b[1] - a[1] * b[0],
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_triangle_with_normals() {
        let src = "
            v 0.0 0.0 0.0
            v 1.0 0.0 0.0
            v 0.0 1.0 0.0
            vn 0.0 0.0 1.0
            f 1//1 2//1 3//1
        ";
        let mesh = read_obj_str(src).expect("parse triangle");
        assert_eq!(mesh.vertices.len(), 3);
        assert_eq!(mesh.indices, vec![0, 1, 2]);
        assert_eq!(mesh.vertices[0].normal, [0.0, 0.0, 1.0]);
        assert!(mesh.is_valid());
    }

    #[test]
    fn quad_becomes_a_fan_of_two_triangles() {
        let src = "
            v 0 0 0
            v 1 0 0
            v 1 1 0
            v 0 1 0
            f 1 2 3 4
        ";
        let mesh = read_obj_str(src).unwrap();
        assert_eq!(mesh.indices, vec![0, 1, 2, 0, 2, 3]);
    }

    #[test]
    fn negative_indices_count_from_the_end() {
        let src = "
            v 0 0 0
            v 1 0 0
            v 0 1 0
            f -3 -2 -1
        ";
        let mesh = read_obj_str(src).unwrap();
        assert_eq!(mesh.indices, vec![0, 1, 2]);
    }

    #[test]
    fn zero_index_is_rejected() {
        let src = "v 0 0 0\nf 0 1 1\n";
        let err = read_obj_str(src).unwrap_err();
        assert!(format!("{err:#}").contains("1-based"));
    }

    #[test]
    fn out_of_range_index_is_rejected() {
        let src = "v 0 0 0\nf 1 2 3\n";
        let err = read_obj_str(src).unwrap_err();
        assert!(format!("{err:#}").contains("out of range"));
    }

    #[test]
    fn file_without_faces_is_rejected() {
        let err = read_obj_str("v 0 0 0\nv 1 1 1\n").unwrap_err();
        assert!(format!("{err:#}").contains("no faces"));
    }

    #[test]
    fn missing_normals_are_reconstructed() {
        let src = "
            v 0 0 0
            v 1 0 0
            v 0 1 0
            f 1 2 3
        ";
        let mesh = read_obj_str(src).unwrap();
        for vertex in &mesh.vertices {
            assert_eq!(vertex.normal, [0.0, 0.0, 1.0]);
        }
    }

    #[test]
    fn shared_corners_are_welded() {
        let src = "
            v 0 0 0
            v 1 0 0
            v 1 1 0
            v 0 1 0
            f 1 2 3
            f 1 3 4
        ";
        let mesh = read_obj_str(src).unwrap();
        assert_eq!(mesh.vertices.len(), 4);
        assert_eq!(mesh.indices.len(), 6);
    }

    #[test]
    fn comments_and_unknown_directives_are_skipped() {
        let src = "
            # a comment
            o object_name
            v 0 0 0
            v 1 0 0
            v 0 1 0
            vt 0.5 0.5
            usemtl whatever
            f 1/1 2/1 3/1
        ";
        let mesh = read_obj_str(src).unwrap();
        assert_eq!(mesh.vertices.len(), 3);
    }
}
