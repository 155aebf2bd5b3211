//! Plain grouping node.
//!
//! A [`SceneContainer`] draws nothing itself; it positions and toggles the
//! visibility of its subtree. Visualization nodes attach into one that the
//! application owns and may share between many sensors.

use std::any::Any;

use glam::Vec3;

use crate::scene::{transform_aabb, Children, NodeId, NodeRef, SceneNode};
use crate::transform::Transform;

/// A named node that only holds children.
///
/// Cloning yields a new node with a fresh id that shares the same children.
pub struct SceneContainer {
    id: NodeId,
    name: String,
    enabled: bool,
    transform: Transform,
    children: Children,
}

impl SceneContainer {
    /// Creates a new, detached container.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            id: NodeId::next(),
            name: name.into(),
            enabled: true,
            transform: Transform::identity(),
            children: Children::new(),
        }
    }

    /// Returns the name of this container.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns whether a child with the given id is attached.
    #[must_use]
    pub fn contains_child(&self, id: NodeId) -> bool {
        self.children.contains(id)
    }

    /// Returns the number of attached children.
    #[must_use]
    pub fn num_children(&self) -> usize {
        self.children.len()
    }
}

impl Clone for SceneContainer {
    fn clone(&self) -> Self {
        Self {
            id: NodeId::next(),
            name: self.name.clone(),
            enabled: self.enabled,
            transform: self.transform,
            children: self.children.clone(),
        }
    }
}

impl Default for SceneContainer {
    fn default() -> Self {
        Self::new("root")
    }
}

impl SceneNode for SceneContainer {
    fn as_any(&self) -> &dyn Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }

    fn id(&self) -> NodeId {
        self.id
    }

    fn type_name(&self) -> &'static str {
        "SceneContainer"
    }

    fn local_transform(&self) -> Transform {
        self.transform
    }

    fn set_local_transform(&mut self, transform: Transform) {
        self.transform = transform;
    }

    fn is_enabled(&self) -> bool {
        self.enabled
    }

    fn set_enabled(&mut self, enabled: bool) {
        self.enabled = enabled;
    }

    fn children(&self) -> &[NodeRef] {
        self.children.as_slice()
    }

    fn add_child(&mut self, child: NodeRef) {
        self.children.push(child);
    }

    fn remove_child(&mut self, id: NodeId) -> Option<NodeRef> {
        self.children.remove(id)
    }

    fn bounding_box(&self) -> Option<(Vec3, Vec3)> {
        self.children
            .bounding_box()
            .map(|bb| transform_aabb(&self.transform, bb))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scene::into_node_ref;

    #[test]
    fn test_container_creation() {
        let root = SceneContainer::new("scene");
        assert_eq!(root.name(), "scene");
        assert!(root.is_enabled());
        assert_eq!(root.num_children(), 0);
        assert!(root.bounding_box().is_none());
    }

    #[test]
    fn test_add_and_remove_child() {
        let mut root = SceneContainer::default();
        let child = into_node_ref(SceneContainer::new("child"));
        let child_id = child.borrow().id();

        root.add_child(child.clone());
        assert!(root.contains_child(child_id));

        // Adding the same node twice keeps a single entry.
        root.add_child(child);
        assert_eq!(root.num_children(), 1);

        assert!(root.remove_child(child_id).is_some());
        assert!(root.remove_child(child_id).is_none());
        assert_eq!(root.num_children(), 0);
    }

    #[test]
    fn test_ids_are_unique() {
        let a = SceneContainer::default();
        let b = SceneContainer::default();
        assert_ne!(a.id(), b.id());
    }

    #[test]
    fn test_clone_is_a_distinct_node() {
        let mut a = SceneContainer::new("camera");
        a.add_child(into_node_ref(SceneContainer::new("child")));
        let b = a.clone();
        assert_ne!(a.id(), b.id());
        assert_eq!(b.name(), "camera");
        assert_eq!(b.num_children(), 1);

        let b_id = b.id();
        let mut root = SceneContainer::default();
        root.add_child(into_node_ref(a));
        root.add_child(into_node_ref(b));
        assert_eq!(root.num_children(), 2);
        assert!(root.remove_child(b_id).is_some());
        assert_eq!(root.num_children(), 1);
    }
}
