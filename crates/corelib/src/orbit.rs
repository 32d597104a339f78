//! Orbit control mapping: absolute cursor position to camera angles.

use crate::Vec3;

/// Map a cursor position in window pixels to camera rotation in degrees.
///
/// Normalizes by the viewport size to [0, 1], recenters to [-1, 1], swaps
/// the axes (horizontal motion orbits around Y, vertical around X) and
/// scales to a half-turn per half-viewport. Stateless and absolute: the
/// current position alone decides the rotation, there is no drag delta.
pub fn rotation_for_cursor(x: f32, y: f32, width: f32, height: f32) -> Vec3 {
    let view_x = x / width;
    let view_y = y / height;
    Vec3::new(view_y * 2.0 - 1.0, view_x * 2.0 - 1.0, 0.0) * 180.0
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::vec3;

    #[test]
    fn corner_and_center_mapping() {
        let (w, h) = (800.0, 600.0);
        assert_eq!(rotation_for_cursor(0.0, 0.0, w, h), vec3(-180.0, -180.0, 0.0));
        assert_eq!(rotation_for_cursor(w, h, w, h), vec3(180.0, 180.0, 0.0));
        assert_eq!(rotation_for_cursor(w / 2.0, h / 2.0, w, h), Vec3::ZERO);
    }

    #[test]
    fn axes_are_swapped() {
        // Moving only horizontally changes only the Y angle.
        let rot = rotation_for_cursor(600.0, 300.0, 800.0, 600.0);
        assert_eq!(rot.x, 0.0);
        assert_eq!(rot.y, 90.0);
        assert_eq!(rot.z, 0.0);
    }
}
