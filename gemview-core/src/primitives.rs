//! Faceted solids of revolution.
//!
//! Every solid is centred on the origin with its axis along +Y, spanning
//! `y = -height/2 ..= height/2`. Segment `i` sits at angle
//! `θ = 2π·i/segments`, placed at `(r·sin θ, y, r·cos θ)`, so segment 0 faces +Z.
//! Side walls are split into two triangles per segment; a side whose radius
//! is zero collapses to a single apex and keeps only the non-degenerate
//! triangle. Caps are triangle fans around a centre vertex.

use std::f32::consts::TAU;

use nalgebra::{Point3, Vector3};
use serde::{Deserialize, Serialize};

use crate::error::{GemError, Result};
use crate::geometry::{Mesh, Triangle, Vertex};

/// Shape family of a revolved solid
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SolidKind {
    Frustum,
    Cylinder,
    Cone,
}

/// Parameters of a capped frustum; cylinders and cones are special cases
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RevolvedSolid {
    pub radius_top: f32,
    pub radius_bottom: f32,
    pub height: f32,
    pub segments: u32,
}

impl RevolvedSolid {
    pub fn frustum(radius_top: f32, radius_bottom: f32, height: f32, segments: u32) -> Self {
        Self {
            radius_top,
            radius_bottom,
            height,
            segments,
        }
    }

    pub fn cylinder(radius: f32, height: f32, segments: u32) -> Self {
        Self::frustum(radius, radius, height, segments)
    }

    /// Cone with its apex at the top.
    pub fn cone(radius: f32, height: f32, segments: u32) -> Self {
        Self::frustum(0.0, radius, height, segments)
    }

    pub fn kind(&self) -> SolidKind {
        if self.radius_top == 0.0 || self.radius_bottom == 0.0 {
            SolidKind::Cone
        } else if self.radius_top == self.radius_bottom {
            SolidKind::Cylinder
        } else {
            SolidKind::Frustum
        }
    }

    fn check(&self) -> Result<()> {
        if self.segments < 3 {
            return Err(GemError::TooFewFacets {
                name: "segments",
                count: self.segments,
            });
        }
        if !(self.height.is_finite() && self.height > 0.0) {
            return Err(GemError::InvalidDimension {
                name: "height",
                value: self.height as f64,
            });
        }
        for (name, r) in [("radius_top", self.radius_top), ("radius_bottom", self.radius_bottom)] {
            if !r.is_finite() || r < 0.0 {
                return Err(GemError::InvalidDimension {
                    name,
                    value: r as f64,
                });
            }
        }
        if self.radius_top == 0.0 && self.radius_bottom == 0.0 {
            return Err(GemError::DegenerateSolid);
        }
        Ok(())
    }

    /// Expected triangle count of `mesh()`.
    pub fn triangle_count(&self) -> usize {
        let n = self.segments as usize;
        let rims = [self.radius_top, self.radius_bottom]
            .iter()
            .filter(|r| **r > 0.0)
            .count();
        // one side triangle plus one cap triangle per open rim and segment
        2 * n * rims
    }

    /// Tessellate into outward-facing triangles.
    pub fn mesh(&self) -> Result<Mesh> {
        self.check()?;

        let n = self.segments;
        let half = self.height / 2.0;
        let slope = (self.radius_bottom - self.radius_top) / self.height;

        let angle = |i: u32| (i % n) as f32 / n as f32 * TAU;
        let side_normal = |theta: f32| Vector3::new(theta.sin(), slope, theta.cos()).normalize();
        let rim = |r: f32, y: f32, i: u32| {
            let theta = angle(i);
            let position = if r == 0.0 {
                Point3::new(0.0, y, 0.0)
            } else {
                Point3::new(r * theta.sin(), y, r * theta.cos())
            };
            Vertex::from_parts(position, side_normal(theta))
        };

        let mut mesh = Mesh::with_capacity(self.triangle_count());

        for i in 0..n {
            let mut a = rim(self.radius_top, half, i);
            let b = rim(self.radius_bottom, -half, i);
            let c = rim(self.radius_bottom, -half, i + 1);
            let mut d = rim(self.radius_top, half, i + 1);

            // apex normals point along the middle of the segment
            let mid = side_normal((i as f32 + 0.5) / n as f32 * TAU);
            if self.radius_top == 0.0 {
                a.normal = mid;
                d.normal = mid;
            }

            match (self.radius_top > 0.0, self.radius_bottom > 0.0) {
                (false, _) => mesh.add_triangle(Triangle::new(b, c, d)),
                (true, false) => {
                    let mut b = b;
                    b.normal = mid;
                    mesh.add_triangle(Triangle::new(a, b, d));
                }
                (true, true) => {
                    mesh.add_triangle(Triangle::new(a, b, d));
                    mesh.add_triangle(Triangle::new(b, c, d));
                }
            }
        }

        if self.radius_top > 0.0 {
            let up = Vector3::y();
            let centre = Vertex::from_parts(Point3::new(0.0, half, 0.0), up);
            for i in 0..n {
                let mut v0 = rim(self.radius_top, half, i);
                let mut v1 = rim(self.radius_top, half, i + 1);
                v0.normal = up;
                v1.normal = up;
                mesh.add_triangle(Triangle::new(v0, v1, centre));
            }
        }

        if self.radius_bottom > 0.0 {
            let down = -Vector3::y();
            let centre = Vertex::from_parts(Point3::new(0.0, -half, 0.0), down);
            for i in 0..n {
                let mut v0 = rim(self.radius_bottom, -half, i);
                let mut v1 = rim(self.radius_bottom, -half, i + 1);
                v0.normal = down;
                v1.normal = down;
                mesh.add_triangle(Triangle::new(v1, v0, centre));
            }
        }

        Ok(mesh)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::{LineStyle, Wireframe};

    fn assert_outward(mesh: &Mesh) {
        for t in &mesh.triangles {
            let n = t.calculate_normal();
            let c = t.centroid();
            // every face of a convex solid centred on the origin faces away from it
            assert!(n.dot(&c.coords) > 0.0, "inward face at {:?}", c);
        }
    }

    #[test]
    fn test_frustum_topology() {
        let solid = RevolvedSolid::frustum(50.0, 100.0, 13.0, 16);
        let mesh = solid.mesh().unwrap();
        assert_eq!(solid.kind(), SolidKind::Frustum);
        assert_eq!(mesh.len(), 64);
        assert_eq!(mesh.len(), solid.triangle_count());
        assert!(mesh.is_closed());
        assert_outward(&mesh);
        // V - E + F = 2
        let wire = Wireframe::from_mesh(&mesh, LineStyle::OUTLINE);
        assert_eq!(wire.len(), 96);
        assert_eq!(mesh.unique_positions() as i64 - wire.len() as i64 + mesh.len() as i64, 2);
    }

    #[test]
    fn test_cone_has_single_apex() {
        let solid = RevolvedSolid::cone(100.0, 75.0, 16);
        let mesh = solid.mesh().unwrap();
        assert_eq!(solid.kind(), SolidKind::Cone);
        assert_eq!(mesh.len(), 32);
        assert!(mesh.is_closed());
        assert_outward(&mesh);
        assert_eq!(mesh.unique_positions(), 18);

        let top = mesh
            .triangles
            .iter()
            .flat_map(|t| t.vertices.iter())
            .map(|v| v.position.y)
            .fold(f32::MIN, f32::max);
        assert_eq!(top, 37.5);
    }

    #[test]
    fn test_inverted_cone() {
        let solid = RevolvedSolid::frustum(30.0, 0.0, 10.0, 8);
        let mesh = solid.mesh().unwrap();
        assert_eq!(solid.kind(), SolidKind::Cone);
        assert_eq!(mesh.len(), 16);
        assert_eq!(mesh.len(), solid.triangle_count());
        assert_eq!(mesh.unique_positions(), 10);
        assert!(mesh.min_triangle_area().unwrap() > 0.0);
        assert!(mesh.is_closed());
        assert_outward(&mesh);
    }

    #[test]
    fn test_equal_radii_is_cylinder() {
        let solid = RevolvedSolid::frustum(100.0, 100.0, 13.0, 16);
        assert_eq!(solid.kind(), SolidKind::Cylinder);
        let mesh = solid.mesh().unwrap();
        assert!(mesh.is_closed());
        for t in &mesh.triangles {
            for v in &t.vertices {
                let r = (v.position.x * v.position.x + v.position.z * v.position.z).sqrt();
                assert!(r < 1e-3 || (r - 100.0).abs() < 1e-3);
            }
        }
    }

    #[test]
    fn test_four_segments_no_degenerate_faces() {
        for solid in [
            RevolvedSolid::frustum(5.0, 10.0, 1.0, 4),
            RevolvedSolid::cylinder(10.0, 1.0, 4),
            RevolvedSolid::cone(10.0, 10.0, 4),
        ] {
            let mesh = solid.mesh().unwrap();
            assert!(mesh.is_closed());
            assert!(mesh.min_triangle_area().unwrap() > 1e-3);
        }
    }

    #[test]
    fn test_invalid_solids_rejected() {
        assert!(matches!(
            RevolvedSolid::cylinder(1.0, 1.0, 2).mesh(),
            Err(GemError::TooFewFacets { count: 2, .. })
        ));
        assert!(RevolvedSolid::cylinder(1.0, 0.0, 8).mesh().is_err());
        assert!(RevolvedSolid::cylinder(-1.0, 1.0, 8).mesh().is_err());
        assert_eq!(
            RevolvedSolid::frustum(0.0, 0.0, 1.0, 8).mesh().unwrap_err(),
            GemError::DegenerateSolid
        );
    }
}
