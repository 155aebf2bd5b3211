//! Camera frustum geometry from pinhole intrinsics.
//!
//! The four image corners are back-projected onto the `z = 1` plane in the
//! camera's optical frame (x right, y down, z forward). Together with the
//! camera center they form a five-vertex pyramid whose topology never changes;
//! only the corner positions depend on the calibration.

use std::ops::Range;

use glam::Vec3;
use rosviz_core::{Intrinsics, Result, RosvizError};

/// Number of vertices in the frustum mesh: apex plus four base corners.
pub const FRUSTUM_VERTEX_COUNT: usize = 5;

/// Index of the apex vertex (camera center).
pub const APEX_INDEX: usize = 0;

/// Triangle list: four side faces followed by the two-triangle base cap.
pub const FRUSTUM_TRIANGLES: [[u32; 3]; 6] = [
    [0, 1, 2],
    [0, 2, 3],
    [0, 3, 4],
    [0, 4, 1],
    [3, 2, 1],
    [1, 4, 3],
];

/// Flat index range covering the side faces.
pub const SIDE_INDEX_RANGE: Range<usize> = 0..12;

/// Flat index range covering the base cap.
pub const BASE_INDEX_RANGE: Range<usize> = 12..18;

/// Flattened copy of [`FRUSTUM_TRIANGLES`].
pub const FRUSTUM_INDICES: [u32; 18] = [0, 1, 2, 0, 2, 3, 0, 3, 4, 0, 4, 1, 3, 2, 1, 1, 4, 3];

/// Base corners of a frustum at unit depth.
///
/// `corners[i]` is mesh vertex `i + 1`; the apex is always the origin.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FrustumGeometry {
    pub corners: [Vec3; 4],
}

impl FrustumGeometry {
    /// Returns all five mesh vertices, apex first.
    #[must_use]
    pub fn vertices(&self) -> [Vec3; FRUSTUM_VERTEX_COUNT] {
        let [c1, c2, c3, c4] = self.corners;
        [Vec3::ZERO, c1, c2, c3, c4]
    }

    /// Horizontal extent `x1 - x0` of the unsheared base.
    #[must_use]
    pub fn width(&self) -> f32 {
        self.corners[0].x - self.corners[1].x
    }

    /// Vertical extent `y1 - y0` of the base.
    #[must_use]
    pub fn height(&self) -> f32 {
        self.corners[0].y - self.corners[3].y
    }
}

/// Back-projects the image rectangle `[0, width] x [0, height]` to `z = 1`.
///
/// The skew term shifts x as a function of the row, so the base is a
/// parallelogram rather than a rectangle when `s != 0`.
///
/// Fails with [`RosvizError::Domain`] when either focal length is zero. Zero
/// image dimensions are not rejected; they collapse the base.
#[allow(clippy::cast_possible_truncation, clippy::similar_names)]
pub fn build(intrinsics: &Intrinsics, width: u32, height: u32) -> Result<FrustumGeometry> {
    let Intrinsics { fx, fy, s, cx, cy } = *intrinsics;
    if fx == 0.0 || fy == 0.0 {
        return Err(RosvizError::Domain { fx, fy });
    }

    let w = f64::from(width);
    let h = f64::from(height);

    let y0 = -cy / fy;
    let y1 = (h - cy) / fy;
    let x0 = -cx / fx;
    let x1 = (w - cx) / fx;

    let skew = s / fx;
    let s0 = y0 * skew;
    let s1 = y1 * skew;

    let corner = |x: f64, y: f64| Vec3::new(x as f32, y as f32, 1.0);
    Ok(FrustumGeometry {
        corners: [
            corner(x1 - s1, y1),
            corner(x0 - s1, y1),
            corner(x0 - s0, y0),
            corner(x1 - s0, y0),
        ],
    })
}
