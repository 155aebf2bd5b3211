//! Color helpers.

use glam::Vec3;

/// Converts a packed `0xRRGGBB` value into linear RGB components in `[0, 1]`.
#[must_use]
#[allow(clippy::cast_precision_loss)]
pub fn color_from_hex(hex: u32) -> Vec3 {
    let r = (hex >> 16) & 0xff;
    let g = (hex >> 8) & 0xff;
    let b = hex & 0xff;
    Vec3::new(r as f32, g as f32, b as f32) / 255.0
}

/// Packs RGB components in `[0, 1]` into a `0xRRGGBB` value.
#[must_use]
#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
pub fn color_to_hex(color: Vec3) -> u32 {
    let c = (color.clamp(Vec3::ZERO, Vec3::ONE) * 255.0).round();
    ((c.x as u32) << 16) | ((c.y as u32) << 8) | (c.z as u32)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_frustum_color() {
        let c = color_from_hex(0x00cc_00ff);
        assert!((c - Vec3::new(0.8, 0.0, 1.0)).length() < 1e-6);
        assert_eq!(color_to_hex(c), 0x00cc_00ff);
    }
}
