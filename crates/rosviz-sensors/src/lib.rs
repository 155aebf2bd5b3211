//! Sensor visualization nodes for rosviz-rs.
//!
//! This crate provides:
//! - Camera frustum geometry derived from pinhole intrinsics ([`frustum`])
//! - The [`RenderableFrustum`] mesh node
//! - [`SubscriptionLifecycle`], which keeps at most one live subscription
//! - [`CameraInfoNode`], which ties them to a `CameraInfo` stream

// Graphics code intentionally uses casts for indices, colors, and coordinates
#![allow(clippy::cast_precision_loss)]
#![allow(clippy::cast_possible_truncation)]
// Documentation lints - internal functions don't need exhaustive panic/error docs
#![allow(clippy::missing_panics_doc)]
#![allow(clippy::missing_errors_doc)]
// Builder patterns return Self which doesn't need must_use
#![allow(clippy::must_use_candidate)]
#![allow(clippy::return_self_not_must_use)]

pub mod camera_info;
pub mod frustum;
pub mod renderable;
pub mod subscription;

pub use camera_info::{
    AnchorState, CameraInfoConfig, CameraInfoNode, CameraInfoOptions, DEFAULT_TOPIC,
};
pub use frustum::{FrustumGeometry, FRUSTUM_INDICES, FRUSTUM_TRIANGLES};
pub use renderable::{
    FrustumDrawMode, FrustumMaterial, RenderableFrustum, DEFAULT_COLOR, DEFAULT_DEPTH,
};
pub use subscription::SubscriptionLifecycle;
