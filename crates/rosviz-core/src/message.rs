//! Decoded message types delivered by a transport.
//!
//! Field names follow the ROS message definitions so that rosbridge-style
//! JSON maps onto these structs directly.

use serde::{Deserialize, Serialize};

/// A message type that can be subscribed to by name.
pub trait Message: 'static {
    /// Fully-qualified ROS type name, e.g. `sensor_msgs/CameraInfo`.
    const MESSAGE_TYPE: &'static str;
}

/// Timestamp as seconds plus nanoseconds.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Time {
    pub secs: u32,
    pub nsecs: u32,
}

/// Standard message header.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Header {
    pub seq: u32,
    pub stamp: Time,
    /// Coordinate frame the data is expressed in.
    pub frame_id: String,
}

/// Pinhole intrinsics extracted from a 3x3 camera matrix.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Intrinsics {
    /// Focal length along x, in pixels.
    pub fx: f64,
    /// Focal length along y, in pixels.
    pub fy: f64,
    /// Axis skew.
    pub s: f64,
    /// Principal point x, in pixels.
    pub cx: f64,
    /// Principal point y, in pixels.
    pub cy: f64,
}

impl Intrinsics {
    /// Creates intrinsics with zero skew.
    #[must_use]
    pub fn new(fx: f64, fy: f64, cx: f64, cy: f64) -> Self {
        Self {
            fx,
            fy,
            s: 0.0,
            cx,
            cy,
        }
    }

    /// Sets the skew term.
    #[must_use]
    pub fn with_skew(mut self, s: f64) -> Self {
        self.s = s;
        self
    }

    /// Reads the intrinsics from a row-major 3x3 matrix.
    ///
    /// ```text
    /// K = [fx  s cx]
    ///     [ 0 fy cy]
    ///     [ 0  0  1]
    /// ```
    #[must_use]
    pub fn from_k(k: &[f64; 9]) -> Self {
        Self {
            fx: k[0],
            fy: k[4],
            s: k[1],
            cx: k[2],
            cy: k[5],
        }
    }

    /// Writes the intrinsics back as a row-major 3x3 matrix.
    #[must_use]
    pub fn to_k(&self) -> [f64; 9] {
        [
            self.fx, self.s, self.cx, //
            0.0, self.fy, self.cy, //
            0.0, 0.0, 1.0,
        ]
    }
}

/// `sensor_msgs/CameraInfo`: calibration of a streaming camera.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CameraInfo {
    pub header: Header,
    /// Image height in pixels.
    pub height: u32,
    /// Image width in pixels.
    pub width: u32,
    pub distortion_model: String,
    /// Distortion coefficients.
    #[serde(rename = "D")]
    pub d: Vec<f64>,
    /// Intrinsic camera matrix, row-major.
    #[serde(rename = "K")]
    pub k: [f64; 9],
    /// Rectification matrix, row-major.
    #[serde(rename = "R")]
    pub r: [f64; 9],
    /// Projection matrix, row-major 3x4.
    #[serde(rename = "P")]
    pub p: [f64; 12],
}

impl CameraInfo {
    /// Builds a message for the given frame, intrinsics, and image size.
    pub fn new(
        frame_id: impl Into<String>,
        intrinsics: Intrinsics,
        width: u32,
        height: u32,
    ) -> Self {
        Self {
            header: Header {
                frame_id: frame_id.into(),
                ..Header::default()
            },
            width,
            height,
            k: intrinsics.to_k(),
            ..Self::default()
        }
    }

    /// Returns the intrinsics encoded in `K`.
    #[must_use]
    pub fn intrinsics(&self) -> Intrinsics {
        Intrinsics::from_k(&self.k)
    }

    /// Returns the frame the camera is mounted in.
    #[must_use]
    pub fn frame_id(&self) -> &str {
        &self.header.frame_id
    }
}

impl Message for CameraInfo {
    const MESSAGE_TYPE: &'static str = "sensor_msgs/CameraInfo";
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_intrinsics_from_k() {
        let k = [100.0, 0.5, 50.0, 0.0, 120.0, 40.0, 0.0, 0.0, 1.0];
        let i = Intrinsics::from_k(&k);
        assert_eq!(i.fx, 100.0);
        assert_eq!(i.fy, 120.0);
        assert_eq!(i.s, 0.5);
        assert_eq!(i.cx, 50.0);
        assert_eq!(i.cy, 40.0);
        assert_eq!(i.to_k(), k);
    }

    #[test]
    fn test_camera_info_from_rosbridge_json() {
        let json = r#"{
            "header": {"seq": 3, "stamp": {"secs": 1, "nsecs": 2}, "frame_id": "camera_optical"},
            "height": 480,
            "width": 640,
            "distortion_model": "plumb_bob",
            "D": [0.0, 0.0, 0.0, 0.0, 0.0],
            "K": [525.0, 0.0, 319.5, 0.0, 525.0, 239.5, 0.0, 0.0, 1.0],
            "R": [1.0, 0.0, 0.0, 0.0, 1.0, 0.0, 0.0, 0.0, 1.0],
            "P": [525.0, 0.0, 319.5, 0.0, 0.0, 525.0, 239.5, 0.0, 0.0, 0.0, 1.0, 0.0]
        }"#;
        let msg: CameraInfo = serde_json::from_str(json).unwrap();
        assert_eq!(msg.frame_id(), "camera_optical");
        assert_eq!(msg.width, 640);
        assert_eq!(msg.height, 480);
        assert_eq!(msg.intrinsics().cx, 319.5);
        assert_eq!(msg.header.stamp, Time { secs: 1, nsecs: 2 });
    }

    #[test]
    fn test_missing_fields_default() {
        let msg: CameraInfo = serde_json::from_str(r#"{"width": 10}"#).unwrap();
        assert_eq!(msg.width, 10);
        assert_eq!(msg.frame_id(), "");
        assert_eq!(msg.k, [0.0; 9]);
    }

    #[test]
    fn test_message_type() {
        assert_eq!(CameraInfo::MESSAGE_TYPE, "sensor_msgs/CameraInfo");
    }
}
