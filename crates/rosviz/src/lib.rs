//! rosviz-rs: live visualization of streaming robot sensor data in a 3D scene.
//!
//! Visualization nodes subscribe to a message stream, turn each message into
//! geometry, and attach that geometry to the coordinate frame the sensor
//! reports. The scene tree they build is consumed by any renderer through
//! [`DrawList`].
//!
//! # Quick Start
//!
//! ```no_run
//! use std::rc::Rc;
//! use rosviz::*;
//!
//! fn main() -> Result<()> {
//!     init_logging();
//!
//!     let transport = Rc::new(LoopbackTransport::<CameraInfo>::new());
//!     let tf = Rc::new(TransformTree::new());
//!     let root: NodeRef = into_node_ref(SceneContainer::new("world"));
//!
//!     let camera = CameraInfoNode::new(
//!         CameraInfoConfig::new(transport.clone(), tf.clone())
//!             .with_root(root.clone())
//!             .with_depth(0.5),
//!     )?;
//!
//!     tf.set_frame_pose("camera_optical", Vec3::new(0.0, 0.0, 1.0), Quat::IDENTITY);
//!     let intrinsics = Intrinsics::new(525.0, 525.0, 319.5, 239.5);
//!     transport.publish(
//!         "/camera_info",
//!         &CameraInfo::new("camera_optical", intrinsics, 640, 480),
//!     );
//!
//!     for item in DrawList::collect(&root).items() {
//!         log::info!("draw {} triangles", item.indices.len() / 3);
//!     }
//!     drop(camera);
//!     Ok(())
//! }
//! ```
//!
//! # Collaborators
//!
//! - [`Transport`] delivers decoded messages; [`LoopbackTransport`] is an
//!   in-process implementation.
//! - [`FrameTransformService`] creates anchors that follow named frames;
//!   [`TransformTree`] is an in-memory implementation.

mod init;
pub mod loopback;
pub mod tf;

pub use init::{init_logging, init_logging_with_default};
pub use loopback::LoopbackTransport;
pub use tf::{FrameAnchor, TransformTree};

// Re-export core types
pub use rosviz_core::{
    color_from_hex, color_to_hex, into_node_ref, CameraInfo, DrawItem, DrawList,
    FrameTransformService, Header, Intrinsics, Mat4, MeshView, Message, MessageHandler, NodeId,
    NodeRef, Quat, Result, RosvizError, SceneContainer, SceneNode, SubscriptionHandle, Time,
    Transform, Transport, Vec3,
};

// Re-export sensor nodes
pub use rosviz_sensors::{
    frustum, AnchorState, CameraInfoConfig, CameraInfoNode, CameraInfoOptions, FrustumDrawMode,
    FrustumGeometry, FrustumMaterial, RenderableFrustum, SubscriptionLifecycle, DEFAULT_COLOR,
    DEFAULT_DEPTH, DEFAULT_TOPIC,
};
