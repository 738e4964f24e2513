//! Flattened, draw-ready geometry produced by the OBJ parser.

use glam::Vec3;

/// Non-indexed triangle soup: one `[x, y, z]` triple per emitted corner.
///
/// `normals` and `texcoords` only grow for faces that reference them, so they
/// may be empty or shorter than `vertices`.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Geometry {
    pub vertices: Vec<f32>,
    pub normals: Vec<f32>,
    pub texcoords: Vec<f32>,
}

impl Geometry {
    pub fn corner_count(&self) -> usize {
        self.vertices.len() / 3
    }

    pub fn triangle_count(&self) -> usize {
        self.corner_count() / 3
    }

    pub fn is_empty(&self) -> bool {
        self.vertices.is_empty()
    }

    pub fn has_normals(&self) -> bool {
        !self.normals.is_empty()
    }

    pub fn has_texcoords(&self) -> bool {
        !self.texcoords.is_empty()
    }

    /// `true` when every corner has a normal, so the stream can be bound
    /// next to `vertices` as-is.
    pub fn normals_aligned(&self) -> bool {
        self.has_normals() && self.normals.len() == self.vertices.len()
    }

    /// Per-triangle normals, repeated for each corner. Degenerate triangles
    /// get a zero normal.
    pub fn flat_normals(&self) -> Vec<f32> {
        let mut out = Vec::with_capacity(self.vertices.len());
        for tri in self.vertices.chunks_exact(9) {
            let a = Vec3::from_slice(&tri[0..3]);
            let b = Vec3::from_slice(&tri[3..6]);
            let c = Vec3::from_slice(&tri[6..9]);
            let n = (b - a).cross(c - a).normalize_or_zero().to_array();
            for _ in 0..3 {
                out.extend_from_slice(&n);
            }
        }
        out
    }

    /// Axis-aligned `(min, max)` over all corners.
    pub fn bounds(&self) -> Option<(Vec3, Vec3)> {
        let mut corners = self.vertices.chunks_exact(3).map(Vec3::from_slice);
        let first = corners.next()?;
        Some(corners.fold((first, first), |(min, max), p| (min.min(p), max.max(p))))
    }
}

/// Position table plus triangle indices into it.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct IndexedGeometry {
    /// `[x, y, z]` per declared vertex, in file order.
    pub positions: Vec<f32>,
    pub indices: Vec<u32>,
}

impl IndexedGeometry {
    pub fn triangle_count(&self) -> usize {
        self.indices.len() / 3
    }

    /// Returns `true` if both position and index buffers are non-empty.
    pub fn is_valid(&self) -> bool {
        !self.positions.is_empty() && !self.indices.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn triangle() -> Geometry {
        Geometry {
            vertices: vec![0.0, 0.0, 0.0, 1.0, 0.0, 0.0, 0.0, 1.0, 0.0],
            ..Default::default()
        }
    }

    #[test]
    fn counts_follow_vertex_stream() {
        let g = triangle();
        assert_eq!(g.corner_count(), 3);
        assert_eq!(g.triangle_count(), 1);
        assert!(!g.has_normals());
        assert!(!g.normals_aligned());
    }

    #[test]
    fn flat_normal_of_ccw_xy_triangle_points_up_z() {
        let n = triangle().flat_normals();
        assert_eq!(n, vec![0.0, 0.0, 1.0, 0.0, 0.0, 1.0, 0.0, 0.0, 1.0]);
    }

    #[test]
    fn degenerate_triangle_gets_zero_normal() {
        let g = Geometry {
            vertices: vec![1.0; 9],
            ..Default::default()
        };
        assert!(g.flat_normals().iter().all(|c| *c == 0.0));
    }

    #[test]
    fn bounds_cover_all_corners() {
        let g = Geometry {
            vertices: vec![-1.0, 2.0, 0.5, 3.0, -4.0, 0.0, 0.0, 0.0, 9.0],
            ..Default::default()
        };
        assert_eq!(
            g.bounds(),
            Some((Vec3::new(-1.0, -4.0, 0.0), Vec3::new(3.0, 2.0, 9.0)))
        );
        assert_eq!(Geometry::default().bounds(), None);
    }
}
