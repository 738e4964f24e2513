use crate::{EulerRot, Mat4, Quat, Vec3};

/// Rigid transform with uniform or non-uniform scale (Euler XYZ).
#[derive(Clone, Copy, Debug)]
pub struct Transform {
    pub translation: Vec3,
    /// Euler angles in radians (XYZ order).
    pub rotation_euler: Vec3,
    pub scale: Vec3,
    /// Point in object space the rotation and scale are applied around.
    pub pivot: Vec3,
}

impl Transform {
    #[inline]
    pub const fn identity() -> Self {
        Self {
            translation: Vec3::ZERO,
            rotation_euler: Vec3::ZERO,
            scale: Vec3::ONE,
            pivot: Vec3::ZERO,
        }
    }

    /// Centre an axis-aligned box on the origin and scale it so its
    /// bounding sphere has radius 1.
    pub fn unit_fit(min: Vec3, max: Vec3) -> Self {
        let radius = (max - min).length() * 0.5;
        let scale = if radius > f32::EPSILON { 1.0 / radius } else { 1.0 };
        Self {
            pivot: (min + max) * 0.5,
            scale: Vec3::splat(scale),
            ..Self::identity()
        }
    }

    /// Advance the Euler angles by `speed_xyz * dt` (radians/second).
    #[inline]
    pub fn spin(&mut self, dt: f32, speed_xyz: Vec3) {
        self.rotation_euler += speed_xyz * dt;
    }

    /// Build matrix = T * R * S * T(-pivot) (column-major Mat4 per glam).
    #[inline]
    pub fn matrix(&self) -> Mat4 {
        let q = Quat::from_euler(
            EulerRot::XYZ,
            self.rotation_euler.x,
            self.rotation_euler.y,
            self.rotation_euler.z,
        );
        Mat4::from_scale_rotation_translation(self.scale, q, self.translation)
            * Mat4::from_translation(-self.pivot)
    }
}

impl Default for Transform {
    fn default() -> Self {
        Self::identity()
    }
}
