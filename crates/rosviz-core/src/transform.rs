//! Local transforms for scene nodes.

use glam::{Mat4, Quat, Vec3};

/// A transformation represented as separate components.
///
/// Scene nodes store their pose relative to the parent in this form so that
/// the scale can be set independently of the pose a frame service writes.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Transform {
    /// Translation component.
    pub translation: Vec3,
    /// Rotation component as a quaternion.
    pub rotation: Quat,
    /// Scale component.
    pub scale: Vec3,
}

impl Default for Transform {
    fn default() -> Self {
        Self {
            translation: Vec3::ZERO,
            rotation: Quat::IDENTITY,
            scale: Vec3::ONE,
        }
    }
}

impl Transform {
    /// Creates a new identity transform.
    #[must_use]
    pub fn identity() -> Self {
        Self::default()
    }

    /// Creates a transform from a translation and rotation (unit scale).
    #[must_use]
    pub fn from_pose(translation: Vec3, rotation: Quat) -> Self {
        Self {
            translation,
            rotation,
            scale: Vec3::ONE,
        }
    }

    /// Creates a transform from a uniform scale.
    #[must_use]
    pub fn from_uniform_scale(scale: f32) -> Self {
        Self {
            scale: Vec3::splat(scale),
            ..Default::default()
        }
    }

    /// Creates a transform from a Mat4.
    ///
    /// This decomposition may not be exact for matrices with shear.
    #[must_use]
    pub fn from_matrix(matrix: Mat4) -> Self {
        let (scale, rotation, translation) = matrix.to_scale_rotation_translation();
        Self {
            translation,
            rotation,
            scale,
        }
    }

    /// Converts this transform to a Mat4.
    #[must_use]
    pub fn to_matrix(&self) -> Mat4 {
        Mat4::from_scale_rotation_translation(self.scale, self.rotation, self.translation)
    }

    /// Sets the same scale factor on all three axes.
    pub fn set_uniform_scale(&mut self, scale: f32) {
        self.scale = Vec3::splat(scale);
    }

    /// Replaces translation and rotation, keeping the scale.
    pub fn set_pose(&mut self, translation: Vec3, rotation: Quat) {
        self.translation = translation;
        self.rotation = rotation;
    }

    /// Applies this transform to a point.
    #[must_use]
    pub fn transform_point(&self, point: Vec3) -> Vec3 {
        self.rotation * (self.scale * point) + self.translation
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_uniform_scale() {
        let mut t = Transform::identity();
        t.set_uniform_scale(0.25);
        assert_eq!(t.scale, Vec3::splat(0.25));
        assert_eq!(t.translation, Vec3::ZERO);
    }

    #[test]
    fn test_set_pose_keeps_scale() {
        let mut t = Transform::from_uniform_scale(2.0);
        t.set_pose(Vec3::new(1.0, 2.0, 3.0), Quat::from_rotation_z(0.5));
        assert_eq!(t.scale, Vec3::splat(2.0));
        assert_eq!(t.translation, Vec3::new(1.0, 2.0, 3.0));
    }

    #[test]
    fn test_matrix_roundtrip() {
        let t = Transform {
            translation: Vec3::new(1.0, -2.0, 0.5),
            rotation: Quat::from_rotation_y(1.0),
            scale: Vec3::splat(3.0),
        };
        let back = Transform::from_matrix(t.to_matrix());
        assert!((back.translation - t.translation).length() < 1e-5);
        assert!((back.scale - t.scale).length() < 1e-5);
    }

    #[test]
    fn test_transform_point_matches_matrix() {
        let t = Transform {
            translation: Vec3::new(0.0, 1.0, 0.0),
            rotation: Quat::from_rotation_x(0.3),
            scale: Vec3::splat(0.1),
        };
        let p = Vec3::new(0.5, -0.5, 1.0);
        let expected = t.to_matrix().transform_point3(p);
        assert!((t.transform_point(p) - expected).length() < 1e-6);
    }
}
