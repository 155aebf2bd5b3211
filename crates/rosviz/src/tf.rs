//! In-memory coordinate-frame service.
//!
//! [`TransformTree`] stores the latest pose of each named frame relative to
//! the scene root and keeps the [`FrameAnchor`]s it handed out posed
//! accordingly. Hosts feed it from whatever transform source they have.

use std::any::Any;
use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::{Rc, Weak};

use glam::{Quat, Vec3};
use rosviz_core::scene::transform_aabb;
use rosviz_core::{
    Children, FrameTransformService, NodeId, NodeRef, SceneNode, Transform,
};

/// Scene node that follows a named frame.
///
/// An anchor is hidden until the pose of its frame is known, so children do
/// not flash at the scene origin before the first transform arrives.
pub struct FrameAnchor {
    id: NodeId,
    frame_id: String,
    transform: Transform,
    enabled: bool,
    pose_known: bool,
    children: Children,
}

impl FrameAnchor {
    fn new(frame_id: &str) -> Self {
        Self {
            id: NodeId::next(),
            frame_id: frame_id.to_string(),
            transform: Transform::identity(),
            enabled: true,
            pose_known: false,
            children: Children::new(),
        }
    }

    /// Returns the tracked frame.
    #[must_use]
    pub fn frame_id(&self) -> &str {
        &self.frame_id
    }

    /// Returns whether a pose has been received for the frame.
    #[must_use]
    pub fn has_pose(&self) -> bool {
        self.pose_known
    }

    fn apply_pose(&mut self, pose: Option<Transform>) {
        match pose {
            Some(pose) => {
                self.transform = pose;
                self.pose_known = true;
            }
            None => self.pose_known = false,
        }
    }
}

impl SceneNode for FrameAnchor {
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
        "FrameAnchor"
    }

    fn local_transform(&self) -> Transform {
        self.transform
    }

    fn set_local_transform(&mut self, transform: Transform) {
        self.transform = transform;
    }

    fn is_enabled(&self) -> bool {
        self.enabled && self.pose_known
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
        if !self.pose_known {
            return None;
        }
        self.children
            .bounding_box()
            .map(|bb| transform_aabb(&self.transform, bb))
    }
}

#[derive(Default)]
struct TreeState {
    frames: HashMap<String, Transform>,
    anchors: Vec<Weak<RefCell<FrameAnchor>>>,
}

impl TreeState {
    fn repose(&mut self, frame_id: &str) {
        let pose = self.frames.get(frame_id).copied();
        self.anchors.retain(|weak| {
            let Some(anchor) = weak.upgrade() else {
                return false;
            };
            let mut anchor = anchor.borrow_mut();
            if anchor.frame_id == frame_id {
                anchor.apply_pose(pose);
            }
            true
        });
    }
}

/// Frame service backed by a map of frame poses.
#[derive(Default)]
pub struct TransformTree {
    state: RefCell<TreeState>,
}

impl TransformTree {
    /// Creates an empty tree; every frame is unknown.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the pose of `frame_id` and re-poses its anchors.
    pub fn set_frame_pose(&self, frame_id: &str, translation: Vec3, rotation: Quat) {
        self.set_frame_transform(frame_id, Transform::from_pose(translation, rotation));
    }

    /// Sets the full transform of `frame_id` and re-poses its anchors.
    pub fn set_frame_transform(&self, frame_id: &str, transform: Transform) {
        let mut state = self.state.borrow_mut();
        state.frames.insert(frame_id.to_string(), transform);
        state.repose(frame_id);
        log::trace!("frame '{frame_id}' updated");
    }

    /// Forgets `frame_id`; its anchors are hidden until a new pose arrives.
    pub fn remove_frame(&self, frame_id: &str) {
        let mut state = self.state.borrow_mut();
        if state.frames.remove(frame_id).is_some() {
            state.repose(frame_id);
        }
    }

    /// Returns the last pose set for `frame_id`.
    #[must_use]
    pub fn frame_transform(&self, frame_id: &str) -> Option<Transform> {
        self.state.borrow().frames.get(frame_id).copied()
    }

    /// Returns the number of anchors still alive.
    #[must_use]
    pub fn anchor_count(&self) -> usize {
        self.state
            .borrow()
            .anchors
            .iter()
            .filter(|weak| weak.strong_count() > 0)
            .count()
    }
}

impl FrameTransformService for TransformTree {
    fn create_anchor(&self, frame_id: &str, child: NodeRef) -> NodeRef {
        let mut anchor = FrameAnchor::new(frame_id);
        anchor.add_child(child);

        let mut state = self.state.borrow_mut();
        anchor.apply_pose(state.frames.get(frame_id).copied());
        let anchor = Rc::new(RefCell::new(anchor));
        state.anchors.push(Rc::downgrade(&anchor));
        log::debug!("created anchor for frame '{frame_id}'");
        anchor
    }
}
