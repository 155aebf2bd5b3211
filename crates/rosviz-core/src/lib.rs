//! Core abstractions for rosviz-rs.
//!
//! This crate provides the fundamental traits and types used throughout rosviz-rs:
//! - [`SceneNode`] trait and [`SceneContainer`] for the scene tree
//! - [`Transport`] and [`FrameTransformService`] collaborator interfaces
//! - Decoded message types such as [`CameraInfo`]
//! - [`DrawList`] for flattening the scene into world-space meshes

// Documentation lints - internal functions don't need exhaustive panic/error docs
#![allow(clippy::missing_panics_doc)]
#![allow(clippy::missing_errors_doc)]
// Builder patterns return Self which doesn't need must_use
#![allow(clippy::must_use_candidate)]

pub mod color;
pub mod container;
pub mod draw;
pub mod error;
pub mod frame;
pub mod message;
pub mod scene;
pub mod transform;
pub mod transport;

pub use color::{color_from_hex, color_to_hex};
pub use container::SceneContainer;
pub use draw::{DrawItem, DrawList};
pub use error::{Result, RosvizError};
pub use frame::FrameTransformService;
pub use message::{CameraInfo, Header, Intrinsics, Message, Time};
pub use scene::{into_node_ref, Children, MeshView, NodeId, NodeRef, SceneNode};
pub use transform::Transform;
pub use transport::{MessageHandler, SubscriptionHandle, Transport};

// Re-export glam types for convenience
pub use glam::{Mat4, Quat, Vec3};
