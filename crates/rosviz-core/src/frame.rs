//! Coordinate-frame service interface.

use crate::scene::NodeRef;

/// Resolves named coordinate frames and keeps anchors posed over time.
pub trait FrameTransformService {
    /// Creates a scene node that tracks `frame_id` and holds `child`.
    ///
    /// The service owns the anchor's pose from then on and re-poses it as
    /// new transforms arrive; callers only insert it into their scene.
    fn create_anchor(&self, frame_id: &str, child: NodeRef) -> NodeRef;
}
