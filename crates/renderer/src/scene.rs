//! CPU-side scene state: model framing, spin animation, uniform data.

use std::borrow::Cow;

use asset::Geometry;
use bytemuck::{Pod, Zeroable};
use corelib::{Vec3, camera::Camera, transform::Transform};

/// Camera distance for a model fitted into the unit sphere.
const VIEW_DISTANCE: f32 = 2.5;

/// Camera UBO (16-byte aligned).
#[repr(C)]
#[derive(Clone, Copy, Debug, Pod, Zeroable)]
pub struct CameraUniform {
    pub mvp: [[f32; 4]; 4],
    pub model: [[f32; 4]; 4],
}

/// The single rotating model on screen.
#[derive(Clone, Copy, Debug)]
pub struct Scene {
    pub camera: Camera,
    pub transform: Transform,
    /// Radians per second around X/Y/Z.
    pub spin: Vec3,
}

impl Scene {
    /// Frame `geometry` at the origin; it turns around Y at
    /// `rotation_speed` and around X at half that.
    pub fn for_geometry(geometry: &Geometry, rotation_speed: f32) -> Self {
        let transform = match geometry.bounds() {
            Some((min, max)) => Transform::unit_fit(min, max),
            None => Transform::identity(),
        };
        Self {
            camera: Camera::orbit(VIEW_DISTANCE, 1.0),
            transform,
            spin: Vec3::new(0.5 * rotation_speed, rotation_speed, 0.0),
        }
    }

    /// Step the animation by `dt` seconds.
    pub fn advance(&mut self, dt: f32) {
        self.transform.spin(dt.max(0.0), self.spin);
    }

    pub fn uniform(&self, aspect: f32) -> CameraUniform {
        let camera = self.camera.with_aspect(aspect);
        let model = self.transform.matrix();
        CameraUniform {
            mvp: (camera.proj_view() * model).to_cols_array_2d(),
            model: model.to_cols_array_2d(),
        }
    }
}

/// Normal stream to bind next to `geometry.vertices`: the file's normals when
/// they cover every corner, flat face normals otherwise.
pub fn normal_stream(geometry: &Geometry) -> Cow<'_, [f32]> {
    if geometry.normals_aligned() {
        return Cow::Borrowed(&geometry.normals);
    }
    if geometry.has_normals() {
        log::warn!(
            "OBJ normals cover {} of {} corners; using flat normals",
            geometry.normals.len() / 3,
            geometry.corner_count()
        );
    }
    Cow::Owned(geometry.flat_normals())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn quad() -> Geometry {
        asset::parse_obj("v 0 0 0\nv 2 0 0\nv 2 2 0\nv 0 2 0\nf 1 2 3 4\n").expect("quad")
    }

    #[test]
    fn uniform_is_finite() {
        let scene = Scene::for_geometry(&quad(), 1.0);
        let u = scene.uniform(16.0 / 9.0);
        assert!(u.mvp.iter().flatten().all(|f| f.is_finite()));
        assert!(u.model.iter().flatten().all(|f| f.is_finite()));
    }

    #[test]
    fn empty_geometry_uses_identity_framing() {
        let scene = Scene::for_geometry(&Geometry::default(), 1.0);
        assert_eq!(scene.transform.matrix(), corelib::Mat4::IDENTITY);
    }

    #[test]
    fn advance_spins_around_y_faster_than_x() {
        let mut scene = Scene::for_geometry(&quad(), 2.0);
        scene.advance(0.5);
        scene.advance(-1.0);
        assert!((scene.transform.rotation_euler.y - 1.0).abs() < 1e-6);
        assert!((scene.transform.rotation_euler.x - 0.5).abs() < 1e-6);
    }

    #[test]
    fn missing_normals_fall_back_to_flat() {
        let g = quad();
        let normals = normal_stream(&g);
        assert_eq!(normals.len(), g.vertices.len());
        assert!(matches!(normals, Cow::Owned(_)));
    }

    #[test]
    fn aligned_normals_are_borrowed() {
        let g = asset::parse_obj("v 0 0 0\nv 1 0 0\nv 0 1 0\nvn 0 0 1\nf 1//1 2//1 3//1\n")
            .expect("triangle");
        assert!(matches!(normal_stream(&g), Cow::Borrowed(_)));
    }

    #[test]
    fn uniform_follows_window_aspect() {
        let scene = Scene::for_geometry(&quad(), 1.0);
        let wide = scene.uniform(2.0).mvp;
        let square = scene.uniform(1.0).mvp;
        // x scale of the projection halves when the viewport is twice as wide.
        assert!((wide[0][0] * 2.0 - square[0][0]).abs() < 1e-5);
        assert_eq!(scene.camera.aspect, 1.0);
    }

    #[test]
    fn uniform_is_128_bytes() {
        assert_eq!(std::mem::size_of::<CameraUniform>(), 128);
    }
}
