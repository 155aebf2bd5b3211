//! Scene-graph primitives.
//!
//! A [`SceneNode`] is anything that can live in the scene tree: plain
//! containers, frame anchors driven by a transform service, and renderable
//! meshes. Nodes are shared as [`NodeRef`] because a parent and the object
//! that created a child both need to reach it.

use std::any::Any;
use std::cell::RefCell;
use std::rc::Rc;
use std::sync::atomic::{AtomicU64, Ordering};

use glam::Vec3;

use crate::transform::Transform;

/// Shared, mutable handle to a node in the scene tree.
pub type NodeRef = Rc<RefCell<dyn SceneNode>>;

/// Process-unique identifier of a scene node.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(u64);

impl NodeId {
    /// Allocates a fresh identifier.
    #[must_use]
    pub fn next() -> Self {
        static NEXT: AtomicU64 = AtomicU64::new(1);
        Self(NEXT.fetch_add(1, Ordering::Relaxed))
    }

    /// Returns the raw numeric value.
    #[must_use]
    pub fn get(self) -> u64 {
        self.0
    }
}

/// Borrowed view of a triangle mesh a renderer can consume.
#[derive(Debug, Clone, Copy)]
pub struct MeshView<'a> {
    /// Vertex positions in the node's local space.
    pub positions: &'a [[f32; 3]],
    /// Triangle list indices into `positions`.
    pub indices: &'a [u32],
    /// Flat material color.
    pub color: Vec3,
    /// Whether the mesh is drawn as wireframe.
    pub wireframe: bool,
}

/// A node in the scene tree.
///
/// Every node can hold children, carries a local transform relative to its
/// parent, and reports a bounding volume in its parent's space.
pub trait SceneNode: Any {
    /// Returns a reference to self as `Any` for downcasting.
    fn as_any(&self) -> &dyn Any;

    /// Returns a mutable reference to self as `Any` for downcasting.
    fn as_any_mut(&mut self) -> &mut dyn Any;

    /// Returns the identifier of this node.
    fn id(&self) -> NodeId;

    /// Returns the type name of this node (e.g., "`SceneContainer`").
    fn type_name(&self) -> &'static str;

    /// Returns the transform relative to the parent node.
    fn local_transform(&self) -> Transform;

    /// Sets the transform relative to the parent node.
    fn set_local_transform(&mut self, transform: Transform);

    /// Returns whether this node and its subtree are drawn.
    fn is_enabled(&self) -> bool;

    /// Sets the visibility of this node and its subtree.
    fn set_enabled(&mut self, enabled: bool);

    /// Returns the direct children of this node.
    fn children(&self) -> &[NodeRef];

    /// Attaches a child node.
    fn add_child(&mut self, child: NodeRef);

    /// Detaches the child with the given id, returning it if present.
    fn remove_child(&mut self, id: NodeId) -> Option<NodeRef>;

    /// Returns the axis-aligned bounding box in the parent's space.
    ///
    /// Returns `None` if neither the node nor its children have spatial extent.
    fn bounding_box(&self) -> Option<(Vec3, Vec3)>;

    /// Returns the mesh drawn for this node, if it draws one.
    fn mesh(&self) -> Option<MeshView<'_>> {
        None
    }
}

/// Child list shared by the node implementations.
///
/// Ids are recorded on insertion so a child can be removed without borrowing
/// it, which may already be borrowed further up the call stack.
#[derive(Default, Clone)]
pub struct Children {
    ids: Vec<NodeId>,
    nodes: Vec<NodeRef>,
}

impl Children {
    /// Creates an empty child list.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a child, ignoring it if a node with the same id is already present.
    pub fn push(&mut self, child: NodeRef) {
        let id = child.borrow().id();
        if self.ids.contains(&id) {
            return;
        }
        self.ids.push(id);
        self.nodes.push(child);
    }

    /// Removes the child with the given id.
    pub fn remove(&mut self, id: NodeId) -> Option<NodeRef> {
        let idx = self.ids.iter().position(|&c| c == id)?;
        self.ids.remove(idx);
        Some(self.nodes.remove(idx))
    }

    /// Returns whether a child with the given id is present.
    #[must_use]
    pub fn contains(&self, id: NodeId) -> bool {
        self.ids.contains(&id)
    }

    /// Returns the children in insertion order.
    #[must_use]
    pub fn as_slice(&self) -> &[NodeRef] {
        &self.nodes
    }

    /// Returns the number of children.
    #[must_use]
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Returns true if there are no children.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Union of the children's bounding boxes, in this node's local space.
    #[must_use]
    pub fn bounding_box(&self) -> Option<(Vec3, Vec3)> {
        self.nodes
            .iter()
            .filter_map(|c| c.borrow().bounding_box())
            .reduce(|(amin, amax), (bmin, bmax)| (amin.min(bmin), amax.max(bmax)))
    }
}

/// Moves a local-space box into the parent's space through `transform`.
#[must_use]
pub fn transform_aabb(transform: &Transform, (min, max): (Vec3, Vec3)) -> (Vec3, Vec3) {
    let mut out_min = Vec3::splat(f32::MAX);
    let mut out_max = Vec3::splat(f32::MIN);
    for i in 0..8 {
        let corner = Vec3::new(
            if i & 1 == 0 { min.x } else { max.x },
            if i & 2 == 0 { min.y } else { max.y },
            if i & 4 == 0 { min.z } else { max.z },
        );
        let p = transform.transform_point(corner);
        out_min = out_min.min(p);
        out_max = out_max.max(p);
    }
    (out_min, out_max)
}

/// Wraps a concrete node into a shared handle.
pub fn into_node_ref<N: SceneNode>(node: N) -> Rc<RefCell<N>> {
    Rc::new(RefCell::new(node))
}
