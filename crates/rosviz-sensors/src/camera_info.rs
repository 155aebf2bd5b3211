//! Camera calibration visualization.
//!
//! A [`CameraInfoNode`] listens to `sensor_msgs/CameraInfo` and draws the
//! camera's field of view as a frustum. The frustum is attached to the
//! message's coordinate frame the first time a message arrives; every message
//! after that only refreshes the geometry.
//!
//! # Example
//!
//! ```no_run
//! use std::rc::Rc;
//! use rosviz_core::{CameraInfo, FrameTransformService, Transport};
//! use rosviz_sensors::{CameraInfoConfig, CameraInfoNode};
//!
//! fn attach(
//!     transport: Rc<dyn Transport<CameraInfo>>,
//!     tf_client: Rc<dyn FrameTransformService>,
//! ) -> rosviz_core::Result<CameraInfoNode> {
//!     let config = CameraInfoConfig::new(transport, tf_client)
//!         .with_topic("/front/camera_info")
//!         .with_depth(0.3);
//!     CameraInfoNode::new(config)
//! }
//! ```

use std::cell::RefCell;
use std::rc::{Rc, Weak};

use glam::Vec3;
use rosviz_core::{
    color_from_hex, into_node_ref, CameraInfo, FrameTransformService, MessageHandler, NodeId,
    NodeRef, Result, RosvizError, SceneContainer, Transport,
};
use serde::{Deserialize, Serialize};

use crate::renderable::{FrustumDrawMode, RenderableFrustum, DEFAULT_COLOR, DEFAULT_DEPTH};
use crate::subscription::SubscriptionLifecycle;

/// Topic used when none is configured.
pub const DEFAULT_TOPIC: &str = "/camera_info";

/// Serializable display options of a [`CameraInfoNode`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CameraInfoOptions {
    /// Topic the calibration is published on.
    pub topic: String,
    /// Frustum color as `0xRRGGBB`.
    pub color: u32,
    /// Uniform scale of the frustum.
    pub depth: f32,
    /// Which faces of the frustum are drawn.
    pub draw_mode: FrustumDrawMode,
}

impl Default for CameraInfoOptions {
    fn default() -> Self {
        Self {
            topic: DEFAULT_TOPIC.to_string(),
            color: DEFAULT_COLOR,
            depth: DEFAULT_DEPTH,
            draw_mode: FrustumDrawMode::Full,
        }
    }
}

impl CameraInfoOptions {
    /// Parses options from JSON; missing keys take their defaults.
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Serializes the options to JSON.
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

/// Everything needed to construct a [`CameraInfoNode`].
pub struct CameraInfoConfig {
    /// Source of calibration messages.
    pub transport: Rc<dyn Transport<CameraInfo>>,
    /// Service that creates and poses frame anchors.
    pub tf_client: Rc<dyn FrameTransformService>,
    /// Container the anchor is inserted into; a fresh one if `None`.
    pub root: Option<NodeRef>,
    /// Display options.
    pub options: CameraInfoOptions,
}

impl CameraInfoConfig {
    /// Creates a configuration with default options.
    pub fn new(
        transport: Rc<dyn Transport<CameraInfo>>,
        tf_client: Rc<dyn FrameTransformService>,
    ) -> Self {
        Self {
            transport,
            tf_client,
            root: None,
            options: CameraInfoOptions::default(),
        }
    }

    /// Sets the container the anchor is inserted into.
    #[must_use]
    pub fn with_root(mut self, root: NodeRef) -> Self {
        self.root = Some(root);
        self
    }

    /// Replaces all display options.
    #[must_use]
    pub fn with_options(mut self, options: CameraInfoOptions) -> Self {
        self.options = options;
        self
    }

    /// Sets the topic.
    #[must_use]
    pub fn with_topic(mut self, topic: impl Into<String>) -> Self {
        self.options.topic = topic.into();
        self
    }

    /// Sets the frustum color as `0xRRGGBB`.
    #[must_use]
    pub fn with_color(mut self, color: u32) -> Self {
        self.options.color = color;
        self
    }

    /// Sets the frustum scale.
    #[must_use]
    pub fn with_depth(mut self, depth: f32) -> Self {
        self.options.depth = depth;
        self
    }

    /// Sets the draw mode.
    #[must_use]
    pub fn with_draw_mode(mut self, mode: FrustumDrawMode) -> Self {
        self.options.draw_mode = mode;
        self
    }
}

/// Attachment state of a [`CameraInfoNode`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AnchorState {
    /// No message received yet; the frustum is not in the scene.
    Unanchored,
    /// Attached to the frame of the first message.
    Anchored,
    /// Disposed; messages are ignored.
    Disposed,
}

/// State mutated by the subscription callback.
struct NodeState {
    frustum: Rc<RefCell<RenderableFrustum>>,
    tf_client: Rc<dyn FrameTransformService>,
    root: NodeRef,
    frame_id: Option<String>,
    anchor: Option<(NodeId, NodeRef)>,
    disposed: bool,
    frame_mismatch_reported: bool,
}

impl NodeState {
    fn state(&self) -> AnchorState {
        if self.disposed {
            AnchorState::Disposed
        } else if self.anchor.is_some() {
            AnchorState::Anchored
        } else {
            AnchorState::Unanchored
        }
    }

    fn process_message(&mut self, message: &CameraInfo) -> Result<()> {
        if self.disposed {
            return Ok(());
        }
        self.ensure_anchor(message.frame_id());
        self.frustum.borrow_mut().apply_calibration(
            &message.intrinsics(),
            message.width,
            message.height,
        )
    }

    /// Attaches the frustum to `frame_id` unless already attached.
    ///
    /// The first frame wins; later frame ids are not followed.
    fn ensure_anchor(&mut self, frame_id: &str) {
        match &self.frame_id {
            Some(current) => {
                if current != frame_id && !self.frame_mismatch_reported {
                    log::warn!(
                        "camera info frame changed from '{current}' to '{frame_id}'; \
                         frustum stays attached to '{current}'"
                    );
                    self.frame_mismatch_reported = true;
                }
            }
            None => {
                let child: NodeRef = self.frustum.clone();
                let anchor = self.tf_client.create_anchor(frame_id, child);
                let anchor_id = anchor.borrow().id();
                self.root.borrow_mut().add_child(anchor.clone());
                log::debug!("camera frustum anchored to frame '{frame_id}'");
                self.frame_id = Some(frame_id.to_string());
                self.anchor = Some((anchor_id, anchor));
            }
        }
    }

    fn dispose(&mut self) {
        if self.disposed {
            return;
        }
        if let Some((anchor_id, _)) = &self.anchor {
            self.root.borrow_mut().remove_child(*anchor_id);
        }
        self.disposed = true;
    }
}

/// Camera frustum bound to the frame of a `CameraInfo` stream.
pub struct CameraInfoNode {
    state: Rc<RefCell<NodeState>>,
    subscription: SubscriptionLifecycle,
    transport: Rc<dyn Transport<CameraInfo>>,
    topic: String,
}

impl CameraInfoNode {
    /// Builds the frustum and subscribes to the configured topic.
    pub fn new(config: CameraInfoConfig) -> Result<Self> {
        let CameraInfoConfig {
            transport,
            tf_client,
            root,
            options,
        } = config;

        let mut frustum = RenderableFrustum::new(options.depth);
        frustum
            .set_color(color_from_hex(options.color))
            .set_draw_mode(options.draw_mode);

        let root = root.unwrap_or_else(|| into_node_ref(SceneContainer::new("camera_info")));
        let state = NodeState {
            frustum: into_node_ref(frustum),
            tf_client,
            root,
            frame_id: None,
            anchor: None,
            disposed: false,
            frame_mismatch_reported: false,
        };

        let mut node = Self {
            state: Rc::new(RefCell::new(state)),
            subscription: SubscriptionLifecycle::new(),
            transport,
            topic: options.topic,
        };
        node.subscribe()?;
        Ok(node)
    }

    /// (Re)subscribes to the current topic.
    ///
    /// Any previous subscription is released first. A disposed node stays
    /// unsubscribed.
    pub fn subscribe(&mut self) -> Result<()> {
        if self.state.borrow().disposed {
            log::debug!("ignoring subscribe on disposed camera info node '{}'", self.topic);
            return Ok(());
        }
        let handler = Self::handler(Rc::downgrade(&self.state), self.topic.clone());
        self.subscription
            .subscribe(self.transport.as_ref(), &self.topic, handler)?;
        Ok(())
    }

    /// Releases the subscription without disposing the node.
    pub fn unsubscribe(&mut self) {
        self.subscription.unsubscribe();
    }

    /// Switches to another topic and resubscribes.
    pub fn set_topic(&mut self, topic: impl Into<String>) -> Result<()> {
        self.topic = topic.into();
        self.subscribe()
    }

    /// Callback routed through the transport.
    ///
    /// Holds only a weak reference, so a dropped node turns late deliveries
    /// into no-ops.
    fn handler(state: Weak<RefCell<NodeState>>, topic: String) -> MessageHandler<CameraInfo> {
        Box::new(move |message: &CameraInfo| {
            let Some(state) = state.upgrade() else {
                return;
            };
            let result = match state.try_borrow_mut() {
                Ok(mut state) => state.process_message(message),
                Err(_) => Err(RosvizError::NodeBorrowed),
            };
            if let Err(err) = result {
                log::warn!("dropping camera info on '{topic}': {err}");
            }
        })
    }

    /// Applies one calibration message.
    ///
    /// This is what the subscription callback runs; it is public so hosts
    /// with their own delivery loop can feed messages directly.
    pub fn process_message(&self, message: &CameraInfo) -> Result<()> {
        self.state
            .try_borrow_mut()
            .map_err(|_| RosvizError::NodeBorrowed)?
            .process_message(message)
    }

    /// Unsubscribes and detaches the anchor from the root container.
    ///
    /// Safe to call more than once. Messages delivered afterwards are ignored.
    pub fn dispose(&mut self) {
        self.subscription.unsubscribe();
        self.state.borrow_mut().dispose();
    }

    /// Returns the attachment state.
    #[must_use]
    pub fn state(&self) -> AnchorState {
        self.state.borrow().state()
    }

    /// Returns the frame the frustum is attached to.
    #[must_use]
    pub fn frame_id(&self) -> Option<String> {
        self.state.borrow().frame_id.clone()
    }

    /// Returns the anchor created by the frame service.
    #[must_use]
    pub fn anchor(&self) -> Option<NodeRef> {
        self.state.borrow().anchor.as_ref().map(|(_, a)| a.clone())
    }

    /// Returns the frustum renderable.
    #[must_use]
    pub fn frustum(&self) -> Rc<RefCell<RenderableFrustum>> {
        self.state.borrow().frustum.clone()
    }

    /// Returns the container the anchor is inserted into.
    #[must_use]
    pub fn root(&self) -> NodeRef {
        self.state.borrow().root.clone()
    }

    /// Returns the configured topic.
    #[must_use]
    pub fn topic(&self) -> &str {
        &self.topic
    }

    /// Returns whether a live subscription is held.
    #[must_use]
    pub fn is_subscribed(&self) -> bool {
        self.subscription.is_active()
    }

    /// Returns the frustum scale.
    #[must_use]
    pub fn depth(&self) -> f32 {
        self.state.borrow().frustum.borrow().depth()
    }

    /// Sets the frustum scale.
    pub fn set_depth(&self, depth: f32) {
        self.state.borrow().frustum.borrow_mut().set_depth(depth);
    }

    /// Sets the frustum color.
    pub fn set_color(&self, color: Vec3) {
        self.state.borrow().frustum.borrow_mut().set_color(color);
    }

    /// Sets which faces of the frustum are drawn.
    pub fn set_draw_mode(&self, mode: FrustumDrawMode) {
        self.state.borrow().frustum.borrow_mut().set_draw_mode(mode);
    }
}

impl Drop for CameraInfoNode {
    fn drop(&mut self) {
        self.dispose();
    }
}
