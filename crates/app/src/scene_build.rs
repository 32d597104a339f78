//! Scene assembly from command-line mesh paths.

use asset::mesh::{MeshData, MeshVertex};
use asset::obj;
use corelib::aabb::{Aabb, BOX_EDGES};
use corelib::camera::Camera;
use corelib::scene::{MeshId, Node, Primitive, Scene};
use corelib::Vec3;

const MESH_COLOR: Vec3 = Vec3::ONE;
const BOUNDS_COLOR: Vec3 = Vec3::new(0.0, 1.0, 0.0);

/// Load every path into a scene tree plus the mesh registry the renderer
/// uploads in id order. A path that fails to load is skipped with a
/// warning; it never aborts the run.
pub fn build(paths: &[String]) -> (Scene, Vec<MeshData>) {
    let mut scene = Scene::new(Camera::default());
    let mut meshes = Vec::new();
    let mut world = Node::group();
    let mut last_bounds = None;

    for path in paths {
        let mesh = match obj::read_obj_file(path) {
            Ok(mesh) => mesh,
            Err(err) => {
                log::warn!("skipping {path}: {err:#}");
                continue;
            }
        };
        let bounds = match Aabb::from_points(mesh.positions().map(Vec3::from_array)) {
            Ok(bounds) => bounds,
            Err(err) => {
                log::warn!("skipping {path}: {err}");
                continue;
            }
        };

        let mesh_id = register(&mut meshes, mesh);
        let mut node = Node::renderable(mesh_id, MESH_COLOR, Primitive::Triangles);
        let bounds_id = register(&mut meshes, wireframe_box(&bounds));
        node.children
            .push(Node::renderable(bounds_id, BOUNDS_COLOR, Primitive::Lines));
        world.children.push(node);
        last_bounds = Some(bounds);
    }

    // Orbit around the last loaded mesh: move the world so its box center
    // sits at the origin, then dolly the camera back until it fits the fov.
    if let Some(bounds) = last_bounds {
        world.transform.position = -bounds.center();
        scene.camera_transform_mut().position.z = -1.5 * bounds.diagonal();
    }

    scene.attach(world);
    (scene, meshes)
}

fn register(meshes: &mut Vec<MeshData>, mesh: MeshData) -> MeshId {
    let id = MeshId(meshes.len() as u32);
    meshes.push(mesh);
    id
}

/// Wireframe box: the 8 corners joined by 12 line-list edges. Zero normals
/// make the shader draw it flat.
fn wireframe_box(bounds: &Aabb) -> MeshData {
    let vertices = bounds
        .corners()
        .iter()
        .map(|corner| MeshVertex::new(corner.to_array(), [0.0; 3]))
        .collect();
    let indices = BOX_EDGES
        .iter()
        .flat_map(|edge| edge.iter().map(|&i| i as u32))
        .collect();
    MeshData::new(vertices, indices)
}

#[cfg(test)]
mod tests {
    use super::*;
    use corelib::vec3;

    fn write_temp_obj(name: &str, contents: &str) -> String {
        let path = std::env::temp_dir().join(name);
        std::fs::write(&path, contents).expect("write temp obj");
        path.to_string_lossy().into_owned()
    }

    #[test]
    fn unreadable_paths_leave_the_scene_empty() {
        let (scene, meshes) = build(&["/definitely/not/here.obj".to_string()]);
        assert!(scene.draw_list().is_empty());
        assert!(meshes.is_empty());
    }

    #[test]
    fn loaded_mesh_gets_a_bounds_child_and_centers_the_view() {
        let path = write_temp_obj(
            "veles3d_scene_build_test.obj",
            "v 0 0 0\nv 2 0 0\nv 0 2 0\nf 1 2 3\n",
        );
        let (scene, meshes) = build(&[path.clone()]);
        std::fs::remove_file(&path).ok();

        // One surface mesh and one wireframe box.
        assert_eq!(meshes.len(), 2);
        let items = scene.draw_list();
        assert_eq!(items.len(), 2);
        assert_eq!(items[0].primitive, Primitive::Triangles);
        assert_eq!(items[1].primitive, Primitive::Lines);
        assert_eq!(items[1].color, BOUNDS_COLOR);

        // World shifted by -center, camera dollied back 1.5 diagonals.
        let world = &scene.root().children[0];
        assert!(world.transform.position.abs_diff_eq(vec3(-1.0, -1.0, 0.0), 1e-6));
        let expected_dolly = -1.5 * 8f32.sqrt();
        let camera_z = items[0].model.to_cols_array()[14] - world.transform.position.z;
        assert!((camera_z - expected_dolly).abs() < 1e-5);
    }

    #[test]
    fn bad_files_are_skipped_but_good_ones_load() {
        let good = write_temp_obj(
            "veles3d_scene_build_good.obj",
            "v 0 0 0\nv 1 0 0\nv 0 1 0\nf 1 2 3\n",
        );
        let bad = write_temp_obj("veles3d_scene_build_bad.obj", "not an obj at all\nf 9 9 9\n");
        let (scene, meshes) = build(&[bad.clone(), good.clone()]);
        std::fs::remove_file(&good).ok();
        std::fs::remove_file(&bad).ok();

        assert_eq!(meshes.len(), 2);
        assert_eq!(scene.draw_list().len(), 2);
    }
}
