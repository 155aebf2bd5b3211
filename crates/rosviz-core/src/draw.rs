//! Flattening the scene tree into what a renderer draws.

use glam::{Mat4, Vec3};

use crate::scene::{NodeId, NodeRef};

/// A single mesh resolved to world space.
#[derive(Debug, Clone)]
pub struct DrawItem {
    /// Node that produced the mesh.
    pub node: NodeId,
    /// Accumulated model matrix from the root down to the node.
    pub world: Mat4,
    /// Vertex positions after applying `world`.
    pub positions: Vec<Vec3>,
    /// Triangle list indices.
    pub indices: Vec<u32>,
    /// Flat material color.
    pub color: Vec3,
    /// Whether the mesh is drawn as wireframe.
    pub wireframe: bool,
}

impl DrawItem {
    /// World-space bounds of the drawn vertices.
    #[must_use]
    pub fn bounds(&self) -> Option<(Vec3, Vec3)> {
        self.positions.iter().fold(None, |acc, &p| match acc {
            None => Some((p, p)),
            Some((min, max)) => Some((min.min(p), max.max(p))),
        })
    }
}

/// Meshes collected from one traversal of the scene.
#[derive(Debug, Clone, Default)]
pub struct DrawList {
    items: Vec<DrawItem>,
}

impl DrawList {
    /// Walks the tree under `root` and collects every enabled mesh.
    ///
    /// Disabled nodes hide their whole subtree.
    #[must_use]
    pub fn collect(root: &NodeRef) -> Self {
        let mut list = Self::default();
        list.visit(root, Mat4::IDENTITY);
        list
    }

    fn visit(&mut self, node: &NodeRef, parent: Mat4) {
        let node = node.borrow();
        if !node.is_enabled() {
            return;
        }
        let world = parent * node.local_transform().to_matrix();
        if let Some(mesh) = node.mesh() {
            if !mesh.indices.is_empty() {
                self.items.push(DrawItem {
                    node: node.id(),
                    world,
                    positions: mesh
                        .positions
                        .iter()
                        .map(|&p| world.transform_point3(Vec3::from_array(p)))
                        .collect(),
                    indices: mesh.indices.to_vec(),
                    color: mesh.color,
                    wireframe: mesh.wireframe,
                });
            }
        }
        for child in node.children() {
            self.visit(child, world);
        }
    }

    /// Returns the collected items in traversal order.
    #[must_use]
    pub fn items(&self) -> &[DrawItem] {
        &self.items
    }

    /// Returns the number of collected meshes.
    #[must_use]
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Returns true if nothing is drawn.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}
