//! Scene graph: an owned tree of transform nodes traversed into a flat
//! draw list once per frame.

use crate::camera::Camera;
use crate::stack::MatrixStack;
use crate::transform::Transform;
use crate::{Mat4, Vec3};

/// Handle to a mesh registered with the renderer; assigned in upload order.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct MeshId(pub u32);

/// Primitive mode a renderable is drawn with.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Primitive {
    Triangles,
    Lines,
}

/// Closed set of node kinds; the tagged enum keeps the tree a plain value.
#[derive(Clone, Copy, Debug)]
pub enum NodeKind {
    /// Transform-only interior node.
    Group,
    /// Draws a registered mesh under the accumulated transform.
    Renderable {
        mesh: MeshId,
        color: Vec3,
        primitive: Primitive,
    },
    /// Viewport + projection owner; its transform is the view.
    Camera(Camera),
}

/// Scene-tree node. Children are owned exclusively: dropping a node drops
/// its whole subtree.
#[derive(Clone, Debug)]
pub struct Node {
    pub transform: Transform,
    pub kind: NodeKind,
    pub children: Vec<Node>,
}

impl Node {
    pub fn group() -> Self {
        Self::with_kind(NodeKind::Group)
    }

    pub fn renderable(mesh: MeshId, color: Vec3, primitive: Primitive) -> Self {
        Self::with_kind(NodeKind::Renderable {
            mesh,
            color,
            primitive,
        })
    }

    pub fn camera(camera: Camera) -> Self {
        Self::with_kind(NodeKind::Camera(camera))
    }

    fn with_kind(kind: NodeKind) -> Self {
        Self {
            transform: Transform::identity(),
            kind,
            children: Vec::new(),
        }
    }
}

/// One renderable reached by the traversal, under its accumulated matrix.
#[derive(Clone, Copy, Debug)]
pub struct DrawItem {
    pub model: Mat4,
    pub mesh: MeshId,
    pub color: Vec3,
    pub primitive: Primitive,
}

/// Depth-first pre-order traversal with save/restore around each child.
///
/// Entering `node` applies translate, rotate X/Y/Z and scale to the stack
/// top; a renderable emits its draw item under the accumulated matrix;
/// children are visited between `push`/`pop` so the stack is unchanged
/// afterwards.
pub fn collect_draw_items(node: &Node, stack: &mut MatrixStack, out: &mut Vec<DrawItem>) {
    let t = &node.transform;
    stack.translate(t.position);
    stack.rotate_x_deg(t.rotation_deg.x);
    stack.rotate_y_deg(t.rotation_deg.y);
    stack.rotate_z_deg(t.rotation_deg.z);
    stack.scale(t.scale);

    if let NodeKind::Renderable {
        mesh,
        color,
        primitive,
    } = node.kind
    {
        out.push(DrawItem {
            model: stack.current(),
            mesh,
            color,
            primitive,
        });
    }

    for child in &node.children {
        stack.push();
        collect_draw_items(child, stack, out);
        stack.pop();
    }
}

/// Scene: the camera node is the root of the graph, so its transform
/// applies to everything below it (orbiting the camera spins the world).
pub struct Scene {
    root: Node,
}

impl Scene {
    pub fn new(camera: Camera) -> Self {
        Self {
            root: Node::camera(camera),
        }
    }

    /// Hang a subtree under the camera root.
    pub fn attach(&mut self, node: Node) {
        self.root.children.push(node);
    }

    pub fn root(&self) -> &Node {
        &self.root
    }

    pub fn camera(&self) -> &Camera {
        match &self.root.kind {
            NodeKind::Camera(camera) => camera,
            _ => unreachable!("scene root is always a camera node"),
        }
    }

    pub fn camera_mut(&mut self) -> &mut Camera {
        match &mut self.root.kind {
            NodeKind::Camera(camera) => camera,
            _ => unreachable!("scene root is always a camera node"),
        }
    }

    /// The camera node's own transform (view side of the camera).
    pub fn camera_transform_mut(&mut self) -> &mut Transform {
        &mut self.root.transform
    }

    /// Flatten the tree into this frame's draw list.
    pub fn draw_list(&self) -> Vec<DrawItem> {
        let mut stack = MatrixStack::new();
        let mut items = Vec::new();
        collect_draw_items(&self.root, &mut stack, &mut items);
        items
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::vec3;

    fn leaf(mesh: u32) -> Node {
        Node::renderable(MeshId(mesh), Vec3::ONE, Primitive::Triangles)
    }

    #[test]
    fn childless_renderable_emits_exactly_its_own_item() {
        let mut node = leaf(7);
        node.transform = Transform::from_trs(
            vec3(1.0, 2.0, 3.0),
            vec3(0.0, 90.0, 0.0),
            vec3(2.0, 2.0, 2.0),
        );

        let mut stack = MatrixStack::new();
        let mut items = Vec::new();
        collect_draw_items(&node, &mut stack, &mut items);

        assert_eq!(items.len(), 1);
        assert_eq!(items[0].mesh, MeshId(7));
        assert!(items[0].model.abs_diff_eq(node.transform.matrix(), 1e-5));
    }

    #[test]
    fn group_without_renderables_emits_nothing() {
        let mut group = Node::group();
        group.children.push(Node::group());

        let mut stack = MatrixStack::new();
        let mut items = Vec::new();
        collect_draw_items(&group, &mut stack, &mut items);
        assert!(items.is_empty());
    }

    #[test]
    fn traversal_leaves_the_stack_unchanged() {
        let mut root = Node::group();
        root.transform.position = vec3(4.0, 0.0, 0.0);
        let mut mid = leaf(0);
        mid.transform.rotation_deg = vec3(0.0, 45.0, 0.0);
        mid.children.push(leaf(1));
        root.children.push(mid);

        let mut stack = MatrixStack::new();
        stack.translate(vec3(0.0, 0.0, -9.0));
        let (depth, top) = (stack.depth(), stack.current());

        let mut items = Vec::new();
        collect_draw_items(&root, &mut stack, &mut items);

        assert_eq!(items.len(), 2);
        // Root applies its transform in place; children push/pop around it,
        // so everything above the pre-traversal state is the root's own.
        assert_eq!(stack.depth(), depth);
        let expected = top * root.transform.matrix();
        assert!(stack.current().abs_diff_eq(expected, 1e-5));
    }

    #[test]
    fn child_transforms_compose_with_parents() {
        let mut parent = Node::group();
        parent.transform.position = vec3(10.0, 0.0, 0.0);
        let mut child = leaf(0);
        child.transform.position = vec3(0.0, 5.0, 0.0);
        parent.children.push(child);

        let mut stack = MatrixStack::new();
        let mut items = Vec::new();
        collect_draw_items(&parent, &mut stack, &mut items);

        let origin = items[0].model.transform_point3(Vec3::ZERO);
        assert!(origin.abs_diff_eq(vec3(10.0, 5.0, 0.0), 1e-5));
    }

    #[test]
    fn traversal_is_pre_order() {
        let mut root = Node::group();
        let mut first = leaf(1);
        first.children.push(leaf(2));
        root.children.push(first);
        root.children.push(leaf(3));

        let mut stack = MatrixStack::new();
        let mut items = Vec::new();
        collect_draw_items(&root, &mut stack, &mut items);

        let order: Vec<u32> = items.iter().map(|i| i.mesh.0).collect();
        assert_eq!(order, [1, 2, 3]);
    }

    #[test]
    fn sibling_transforms_do_not_leak() {
        let mut root = Node::group();
        let mut first = leaf(1);
        first.transform.position = vec3(100.0, 0.0, 0.0);
        root.children.push(first);
        root.children.push(leaf(2));

        let items = {
            let mut stack = MatrixStack::new();
            let mut items = Vec::new();
            collect_draw_items(&root, &mut stack, &mut items);
            items
        };

        let second = items[1].model.transform_point3(Vec3::ZERO);
        assert!(second.abs_diff_eq(Vec3::ZERO, 1e-6));
    }
}
