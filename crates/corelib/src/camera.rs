use crate::Mat4;

/// Perspective camera parameters tied to a viewport.
///
/// The camera node's own [`Transform`](crate::transform::Transform) acts as
/// the view; this type only owns the projection side and the viewport size
/// it depends on.
#[derive(Clone, Copy, Debug)]
pub struct Camera {
    width: u32,
    height: u32,
    pub fov_y_deg: f32,
    pub z_near: f32,
    pub z_far: f32,
    projection: Mat4,
}

impl Camera {
    pub fn new(width: u32, height: u32, fov_y_deg: f32, z_near: f32, z_far: f32) -> Self {
        let mut cam = Self {
            width: width.max(1),
            height: height.max(1),
            fov_y_deg,
            z_near,
            z_far,
            projection: Mat4::IDENTITY,
        };
        cam.update_projection();
        cam
    }

    /// Viewport changed: remember the new size and rebuild the projection.
    pub fn resize(&mut self, width: u32, height: u32) {
        self.width = width.max(1);
        self.height = height.max(1);
        self.update_projection();
    }

    #[inline]
    pub fn projection(&self) -> Mat4 {
        self.projection
    }

    #[inline]
    pub fn width(&self) -> u32 {
        self.width
    }

    #[inline]
    pub fn height(&self) -> u32 {
        self.height
    }

    fn update_projection(&mut self) {
        let aspect = self.width as f32 / self.height as f32;
        self.projection = Mat4::perspective_rh(
            self.fov_y_deg.to_radians(),
            aspect.max(1e-6),
            self.z_near,
            self.z_far,
        );
    }
}

impl Default for Camera {
    fn default() -> Self {
        Self::new(400, 400, 45.0, 1.0, 1000.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn resize_updates_viewport_and_projection() {
        let mut cam = Camera::default();
        let square = cam.projection();
        cam.resize(800, 400);
        assert_eq!((cam.width(), cam.height()), (800, 400));
        assert_ne!(cam.projection(), square);
        // Wider viewport shrinks the x scale relative to y.
        let m = cam.projection().to_cols_array();
        assert!((m[0] * 2.0 - m[5]).abs() < 1e-5);
    }

    #[test]
    fn zero_size_is_clamped() {
        let mut cam = Camera::default();
        cam.resize(0, 0);
        assert_eq!((cam.width(), cam.height()), (1, 1));
        assert!(cam.projection().to_cols_array().iter().all(|f| f.is_finite()));
    }
}
