//! Core types: math re-exports, Transform, Camera.

pub use glam::{EulerRot, Mat4, Quat, Vec3, vec3};

pub mod camera;
pub mod transform;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn identity_transform_is_identity_matrix() {
        let t = transform::Transform::identity();
        assert_eq!(t.matrix(), Mat4::IDENTITY);
    }

    #[test]
    fn translate_then_scale_matrix() {
        let t = transform::Transform {
            translation: vec3(1.0, 2.0, 3.0),
            scale: vec3(2.0, 2.0, 2.0),
            ..transform::Transform::identity()
        };
        // Last column holds translation, diagonal holds scale (no rotation).
        let m = t.matrix().to_cols_array();
        assert!((m[12] - 1.0).abs() < 1e-6);
        assert!((m[13] - 2.0).abs() < 1e-6);
        assert!((m[14] - 3.0).abs() < 1e-6);
        assert!((m[0] - 2.0).abs() < 1e-6);
        assert!((m[5] - 2.0).abs() < 1e-6);
        assert!((m[10] - 2.0).abs() < 1e-6);
    }

    #[test]
    fn camera_pv_is_finite() {
        let cam = camera::Camera::orbit(2.0, 16.0 / 9.0);
        let pv = cam.proj_view();
        let a = pv.to_cols_array();
        assert!(a.iter().all(|f| f.is_finite()));
    }

    #[test]
    fn spin_accumulates_angle_over_frames() {
        let mut t = transform::Transform::identity();
        for _ in 0..4 {
            t.spin(0.25, vec3(0.0, 1.0, 0.5));
        }
        assert!((t.rotation_euler.y - 1.0).abs() < 1e-6);
        assert!((t.rotation_euler.z - 0.5).abs() < 1e-6);
        assert_eq!(t.rotation_euler.x, 0.0);
    }

    #[test]
    fn unit_fit_maps_bounds_into_unit_sphere() {
        let t = transform::Transform::unit_fit(vec3(-2.0, 0.0, 0.0), vec3(2.0, 4.0, 0.0));
        let m = t.matrix();
        for p in [vec3(-2.0, 0.0, 0.0), vec3(2.0, 4.0, 0.0), vec3(0.0, 2.0, 0.0)] {
            assert!(m.transform_point3(p).length() <= 1.0 + 1e-5);
        }
        assert!(m.transform_point3(vec3(0.0, 2.0, 0.0)).length() < 1e-6);
    }
}
