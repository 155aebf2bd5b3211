//! Renderable camera frustum mesh.

use std::any::Any;

use glam::Vec3;
use rosviz_core::scene::transform_aabb;
use rosviz_core::{
    color_from_hex, Children, Intrinsics, MeshView, NodeId, NodeRef, Result, SceneNode, Transform,
};
use serde::{Deserialize, Serialize};

use crate::frustum::{self, BASE_INDEX_RANGE, FRUSTUM_INDICES, FRUSTUM_VERTEX_COUNT, SIDE_INDEX_RANGE};

/// Default uniform scale of the frustum widget.
pub const DEFAULT_DEPTH: f32 = 0.1;

/// Default frustum color, `0xcc00ff`.
pub const DEFAULT_COLOR: u32 = 0x00cc_00ff;

/// Which faces of the frustum are drawn.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FrustumDrawMode {
    /// Side faces and base cap.
    #[default]
    Full,
    /// Only the four side faces (the cone).
    Sides,
    /// Only the base cap (the image plane).
    Base,
}

impl FrustumDrawMode {
    /// Slice of [`FRUSTUM_INDICES`] drawn in this mode.
    #[must_use]
    pub fn indices(self) -> &'static [u32] {
        match self {
            Self::Full => &FRUSTUM_INDICES,
            Self::Sides => &FRUSTUM_INDICES[SIDE_INDEX_RANGE],
            Self::Base => &FRUSTUM_INDICES[BASE_INDEX_RANGE],
        }
    }
}

/// Flat-shaded material of the frustum.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FrustumMaterial {
    pub color: Vec3,
    pub wireframe: bool,
}

impl Default for FrustumMaterial {
    fn default() -> Self {
        Self {
            color: color_from_hex(DEFAULT_COLOR),
            wireframe: false,
        }
    }
}

/// A five-vertex pyramid mesh whose base tracks the camera calibration.
///
/// Positions live at unit depth; the visual size comes only from the uniform
/// scale of the local transform, set through [`RenderableFrustum::set_depth`].
/// A renderer reads [`positions`](Self::positions) and re-uploads when
/// [`take_dirty`](Self::take_dirty) returns true.
pub struct RenderableFrustum {
    id: NodeId,
    positions: [[f32; 3]; FRUSTUM_VERTEX_COUNT],
    depth: f32,
    transform: Transform,
    material: FrustumMaterial,
    draw_mode: FrustumDrawMode,
    enabled: bool,
    dirty: bool,
    children: Children,
}

impl RenderableFrustum {
    /// Creates a collapsed frustum (all corners on the optical axis at z = 1).
    pub fn new(depth: f32) -> Self {
        let mut positions = [[0.0; 3]; FRUSTUM_VERTEX_COUNT];
        for p in &mut positions[1..] {
            p[2] = 1.0;
        }
        Self {
            id: NodeId::next(),
            positions,
            depth,
            transform: Transform::from_uniform_scale(depth),
            material: FrustumMaterial::default(),
            draw_mode: FrustumDrawMode::default(),
            enabled: true,
            dirty: true,
            children: Children::new(),
        }
    }

    /// Rebuilds the base corners from a calibration.
    ///
    /// The apex is never rewritten. On error the buffer is left untouched.
    pub fn apply_calibration(&mut self, intrinsics: &Intrinsics, width: u32, height: u32) -> Result<()> {
        let geometry = frustum::build(intrinsics, width, height)?;
        for (slot, corner) in self.positions[1..].iter_mut().zip(geometry.corners) {
            *slot = corner.to_array();
        }
        self.dirty = true;
        Ok(())
    }

    /// Returns the uniform scale factor.
    #[must_use]
    pub fn depth(&self) -> f32 {
        self.depth
    }

    /// Sets the uniform scale factor.
    ///
    /// Zero or negative values are accepted; they collapse or mirror the widget.
    pub fn set_depth(&mut self, depth: f32) -> &mut Self {
        self.depth = depth;
        self.transform.set_uniform_scale(depth);
        self
    }

    /// Gets the frustum color.
    #[must_use]
    pub fn color(&self) -> Vec3 {
        self.material.color
    }

    /// Sets the frustum color.
    pub fn set_color(&mut self, color: Vec3) -> &mut Self {
        self.material.color = color;
        self
    }

    /// Gets the material.
    #[must_use]
    pub fn material(&self) -> FrustumMaterial {
        self.material
    }

    /// Toggles wireframe rendering.
    pub fn set_wireframe(&mut self, wireframe: bool) -> &mut Self {
        self.material.wireframe = wireframe;
        self
    }

    /// Gets the draw mode.
    #[must_use]
    pub fn draw_mode(&self) -> FrustumDrawMode {
        self.draw_mode
    }

    /// Selects which faces are drawn.
    pub fn set_draw_mode(&mut self, mode: FrustumDrawMode) -> &mut Self {
        self.draw_mode = mode;
        self
    }

    /// Vertex positions at unit depth, apex first.
    #[must_use]
    pub fn positions(&self) -> &[[f32; 3]; FRUSTUM_VERTEX_COUNT] {
        &self.positions
    }

    /// Vertex positions as raw bytes for upload.
    #[must_use]
    pub fn position_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(&self.positions)
    }

    /// Indices drawn in the current mode.
    #[must_use]
    pub fn indices(&self) -> &'static [u32] {
        self.draw_mode.indices()
    }

    /// Returns whether positions changed since the renderer last read them.
    #[must_use]
    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    /// Returns the dirty flag and clears it.
    pub fn take_dirty(&mut self) -> bool {
        std::mem::take(&mut self.dirty)
    }
}

impl Default for RenderableFrustum {
    fn default() -> Self {
        Self::new(DEFAULT_DEPTH)
    }
}

impl SceneNode for RenderableFrustum {
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
        "RenderableFrustum"
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
        let mut min = Vec3::splat(f32::MAX);
        let mut max = Vec3::splat(f32::MIN);
        for &p in &self.positions {
            min = min.min(Vec3::from_array(p));
            max = max.max(Vec3::from_array(p));
        }
        let local = match self.children.bounding_box() {
            Some((cmin, cmax)) => (min.min(cmin), max.max(cmax)),
            None => (min, max),
        };
        Some(transform_aabb(&self.transform, local))
    }

    fn mesh(&self) -> Option<MeshView<'_>> {
        Some(MeshView {
            positions: &self.positions,
            indices: self.indices(),
            color: self.material.color,
            wireframe: self.material.wireframe,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_frustum_is_collapsed() {
        let frustum = RenderableFrustum::default();
        assert_eq!(frustum.positions()[0], [0.0, 0.0, 0.0]);
        for p in &frustum.positions()[1..] {
            assert_eq!(*p, [0.0, 0.0, 1.0]);
        }
        assert_eq!(frustum.depth(), DEFAULT_DEPTH);
        assert_eq!(frustum.local_transform().scale, Vec3::splat(DEFAULT_DEPTH));
        assert!(frustum.is_dirty());
    }

    #[test]
    fn test_apply_calibration_writes_corners() {
        let mut frustum = RenderableFrustum::new(1.0);
        assert!(frustum.take_dirty());
        assert!(!frustum.is_dirty());

        frustum
            .apply_calibration(&Intrinsics::new(100.0, 100.0, 50.0, 50.0), 100, 100)
            .unwrap();
        assert!(frustum.is_dirty());
        let p = frustum.positions();
        assert_eq!(p[0], [0.0, 0.0, 0.0]);
        assert_eq!(p[1], [0.5, 0.5, 1.0]);
        assert_eq!(p[2], [-0.5, 0.5, 1.0]);
        assert_eq!(p[3], [-0.5, -0.5, 1.0]);
        assert_eq!(p[4], [0.5, -0.5, 1.0]);

        let (min, max) = frustum.bounding_box().unwrap();
        assert_eq!(min, Vec3::new(-0.5, -0.5, 0.0));
        assert_eq!(max, Vec3::new(0.5, 0.5, 1.0));
    }

    #[test]
    fn test_invalid_calibration_leaves_buffer() {
        let mut frustum = RenderableFrustum::new(1.0);
        frustum
            .apply_calibration(&Intrinsics::new(100.0, 100.0, 50.0, 50.0), 100, 100)
            .unwrap();
        frustum.take_dirty();
        let before = *frustum.positions();

        assert!(frustum
            .apply_calibration(&Intrinsics::new(0.0, 100.0, 50.0, 50.0), 100, 100)
            .is_err());
        assert_eq!(*frustum.positions(), before);
        assert!(!frustum.is_dirty());
    }

    #[test]
    fn test_set_depth_is_uniform() {
        let mut frustum = RenderableFrustum::default();
        for v in [2.5, 0.0, -1.0] {
            frustum.set_depth(v);
            assert_eq!(frustum.local_transform().scale, Vec3::splat(v));
            assert_eq!(frustum.depth(), v);
        }
    }

    #[test]
    fn test_draw_modes() {
        let mut frustum = RenderableFrustum::default();
        assert_eq!(frustum.indices().len(), 18);
        frustum.set_draw_mode(FrustumDrawMode::Sides);
        assert_eq!(frustum.indices(), &FRUSTUM_INDICES[..12]);
        frustum.set_draw_mode(FrustumDrawMode::Base);
        assert_eq!(frustum.indices(), &[3, 2, 1, 1, 4, 3]);
        assert_eq!(frustum.mesh().unwrap().indices.len(), 6);
    }

    #[test]
    fn test_position_bytes() {
        let frustum = RenderableFrustum::default();
        assert_eq!(frustum.position_bytes().len(), 5 * 3 * 4);
    }

    #[test]
    fn test_material() {
        let mut frustum = RenderableFrustum::default();
        assert!(!frustum.material().wireframe);
        frustum.set_color(Vec3::new(1.0, 0.0, 0.0)).set_wireframe(true);
        let mesh = frustum.mesh().unwrap();
        assert_eq!(mesh.color, Vec3::new(1.0, 0.0, 0.0));
        assert!(mesh.wireframe);
    }
}
