/// Mesh and wireframe containers for the rendered solids
use std::collections::HashMap;

use nalgebra::{Matrix4, Point3, Vector3};
use serde::{Deserialize, Serialize};

/// Grid used to weld coincident positions when comparing edges.
const WELD_SCALE: f32 = 1.0e4;

type PointKey = [i64; 3];

fn point_key(p: &Point3<f32>) -> PointKey {
    [
        (p.x * WELD_SCALE).round() as i64,
        (p.y * WELD_SCALE).round() as i64,
        (p.z * WELD_SCALE).round() as i64,
    ]
}

fn edge_key(a: &Point3<f32>, b: &Point3<f32>) -> (PointKey, PointKey) {
    let (ka, kb) = (point_key(a), point_key(b));
    if ka <= kb {
        (ka, kb)
    } else {
        (kb, ka)
    }
}

/// A 3D vertex with position and normal
#[derive(Debug, Clone, Copy)]
pub struct Vertex {
    pub position: Point3<f32>,
    pub normal: Vector3<f32>,
}

impl Vertex {
    pub fn from_parts(position: Point3<f32>, normal: Vector3<f32>) -> Self {
        Self { position, normal }
    }
}

/// A triangle face defined by three vertices, counter-clockwise seen from outside
#[derive(Debug, Clone)]
pub struct Triangle {
    pub vertices: [Vertex; 3],
}

impl Triangle {
    pub fn new(v0: Vertex, v1: Vertex, v2: Vertex) -> Self {
        Self {
            vertices: [v0, v1, v2],
        }
    }

    fn cross(&self) -> Vector3<f32> {
        let v0 = self.vertices[0].position;
        let edge1 = self.vertices[1].position - v0;
        let edge2 = self.vertices[2].position - v0;
        edge1.cross(&edge2)
    }

    /// Face normal from the winding order
    pub fn calculate_normal(&self) -> Vector3<f32> {
        self.cross().normalize()
    }

    pub fn area(&self) -> f32 {
        self.cross().norm() * 0.5
    }

    pub fn centroid(&self) -> Point3<f32> {
        let sum = self.vertices[0].position.coords
            + self.vertices[1].position.coords
            + self.vertices[2].position.coords;
        Point3::from(sum / 3.0)
    }
}

/// A 3D mesh composed of triangles
#[derive(Debug, Clone)]
pub struct Mesh {
    pub triangles: Vec<Triangle>,
}

impl Mesh {
    pub fn new() -> Self {
        Self {
            triangles: Vec::new(),
        }
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            triangles: Vec::with_capacity(capacity),
        }
    }

    pub fn add_triangle(&mut self, triangle: Triangle) {
        self.triangles.push(triangle);
    }

    pub fn len(&self) -> usize {
        self.triangles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.triangles.is_empty()
    }

    /// Smallest triangle area, or `None` for an empty mesh.
    pub fn min_triangle_area(&self) -> Option<f32> {
        self.triangles.iter().map(Triangle::area).reduce(f32::min)
    }

    /// Every edge is shared by exactly two triangles, traversed in opposite
    /// directions.
    pub fn is_closed(&self) -> bool {
        if self.triangles.is_empty() {
            return false;
        }

        let mut directed: HashMap<(PointKey, PointKey), i32> = HashMap::new();
        for triangle in &self.triangles {
            for i in 0..3 {
                let a = point_key(&triangle.vertices[i].position);
                let b = point_key(&triangle.vertices[(i + 1) % 3].position);
                *directed.entry((a, b)).or_insert(0) += 1;
            }
        }

        directed
            .iter()
            .all(|((a, b), count)| *count == 1 && directed.get(&(*b, *a)) == Some(&1))
    }

    /// Distinct positions after welding.
    pub fn unique_positions(&self) -> usize {
        let mut seen = std::collections::HashSet::new();
        for triangle in &self.triangles {
            for vertex in &triangle.vertices {
                seen.insert(point_key(&vertex.position));
            }
        }
        seen.len()
    }

    /// Copy of the mesh with positions and normals moved into world space
    pub fn transformed(&self, model: &Matrix4<f32>) -> Mesh {
        let normal_matrix = model.fixed_view::<3, 3>(0, 0).into_owned();
        let triangles = self
            .triangles
            .iter()
            .map(|t| {
                let [a, b, c] = t.vertices.map(|v| {
                    Vertex::from_parts(
                        model.transform_point(&v.position),
                        (normal_matrix * v.normal).normalize(),
                    )
                });
                Triangle::new(a, b, c)
            })
            .collect();
        Mesh { triangles }
    }

    /// Flat `[x, y, z, ...]` position buffer, three vertices per triangle
    pub fn position_buffer(&self) -> Vec<f32> {
        let mut out = Vec::with_capacity(self.triangles.len() * 9);
        for triangle in &self.triangles {
            for v in &triangle.vertices {
                out.extend_from_slice(&[v.position.x, v.position.y, v.position.z]);
            }
        }
        out
    }

    pub fn normal_buffer(&self) -> Vec<f32> {
        let mut out = Vec::with_capacity(self.triangles.len() * 9);
        for triangle in &self.triangles {
            for v in &triangle.vertices {
                out.extend_from_slice(&[v.normal.x, v.normal.y, v.normal.z]);
            }
        }
        out
    }
}

impl Default for Mesh {
    fn default() -> Self {
        Self::new()
    }
}

/// Linear RGB colour, components in `[0, 1]`
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Rgb {
    pub r: f32,
    pub g: f32,
    pub b: f32,
}

impl Rgb {
    pub const BLACK: Rgb = Rgb::new(0.0, 0.0, 0.0);

    pub const fn new(r: f32, g: f32, b: f32) -> Self {
        Self { r, g, b }
    }

    /// `#rrggbb` form for canvas styles
    pub fn to_hex(self) -> String {
        let byte = |c: f32| (c.clamp(0.0, 1.0) * 255.0).round() as u8;
        format!("#{:02x}{:02x}{:02x}", byte(self.r), byte(self.g), byte(self.b))
    }
}

/// Stroke used for outline rendering
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LineStyle {
    pub color: Rgb,
    pub width: f32,
}

impl LineStyle {
    /// Thick black edges drawn over every solid.
    pub const OUTLINE: LineStyle = LineStyle {
        color: Rgb::BLACK,
        width: 4.0,
    };
}

impl Default for LineStyle {
    fn default() -> Self {
        Self::OUTLINE
    }
}

/// Surface material for the faces
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FillMaterial {
    pub color: Rgb,
    pub metalness: f32,
    pub roughness: f32,
    pub emissive: Rgb,
}

impl FillMaterial {
    /// `#000fff` blue fill, half metallic with a faint glow.
    pub const PASTEL: FillMaterial = FillMaterial {
        color: Rgb::new(0.0, 15.0 / 255.0, 1.0),
        metalness: 0.5,
        roughness: 0.5,
        emissive: Rgb::new(0.1, 0.1, 0.1),
    };
}

impl Default for FillMaterial {
    fn default() -> Self {
        Self::PASTEL
    }
}

/// Edge-only view of a mesh
#[derive(Debug, Clone)]
pub struct Wireframe {
    pub segments: Vec<[Point3<f32>; 2]>,
    pub style: LineStyle,
}

impl Wireframe {
    /// Collect each distinct triangle edge once.
    pub fn from_mesh(mesh: &Mesh, style: LineStyle) -> Self {
        let mut seen = std::collections::HashSet::new();
        let mut segments = Vec::new();
        for triangle in &mesh.triangles {
            for i in 0..3 {
                let a = triangle.vertices[i].position;
                let b = triangle.vertices[(i + 1) % 3].position;
                if seen.insert(edge_key(&a, &b)) {
                    segments.push([a, b]);
                }
            }
        }
        Self { segments, style }
    }

    pub fn len(&self) -> usize {
        self.segments.len()
    }

    pub fn is_empty(&self) -> bool {
        self.segments.is_empty()
    }

    pub fn transformed(&self, model: &Matrix4<f32>) -> Wireframe {
        Wireframe {
            segments: self
                .segments
                .iter()
                .map(|[a, b]| [model.transform_point(a), model.transform_point(b)])
                .collect(),
            style: self.style,
        }
    }

    /// Flat `[x, y, z, ...]` buffer, two points per segment
    pub fn position_buffer(&self) -> Vec<f32> {
        let mut out = Vec::with_capacity(self.segments.len() * 6);
        for [a, b] in &self.segments {
            out.extend_from_slice(&[a.x, a.y, a.z, b.x, b.y, b.z]);
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tetrahedron() -> Mesh {
        let p = [
            Point3::new(0.0, 0.0, 0.0),
            Point3::new(1.0, 0.0, 0.0),
            Point3::new(0.0, 1.0, 0.0),
            Point3::new(0.0, 0.0, 1.0),
        ];
        let faces = [[0, 2, 1], [0, 1, 3], [0, 3, 2], [1, 2, 3]];
        let mut mesh = Mesh::new();
        for [a, b, c] in faces {
            let v = |i: usize| Vertex::from_parts(p[i], Vector3::zeros());
            mesh.add_triangle(Triangle::new(v(a), v(b), v(c)));
        }
        mesh
    }

    #[test]
    fn test_closed_tetrahedron() {
        let mesh = tetrahedron();
        assert!(mesh.is_closed());
        assert_eq!(mesh.unique_positions(), 4);
    }

    #[test]
    fn test_open_mesh_detected() {
        let mut mesh = tetrahedron();
        mesh.triangles.pop();
        assert!(!mesh.is_closed());
        assert!(!Mesh::new().is_closed());
    }

    #[test]
    fn test_wireframe_deduplicates_edges() {
        let wire = Wireframe::from_mesh(&tetrahedron(), LineStyle::OUTLINE);
        assert_eq!(wire.len(), 6);
        assert_eq!(wire.style.color, Rgb::BLACK);
        assert_eq!(wire.position_buffer().len(), 36);
    }

    #[test]
    fn test_triangle_area_and_normal() {
        let t = &tetrahedron().triangles[1];
        assert!((t.area() - 0.5).abs() < 1e-6);
        let n = t.calculate_normal();
        assert!((n - Vector3::new(0.0, -1.0, 0.0)).norm() < 1e-6);
    }

    #[test]
    fn test_hex_colour() {
        assert_eq!(Rgb::BLACK.to_hex(), "#000000");
        assert_eq!(Rgb::new(1.0, 0.5, 0.0).to_hex(), "#ff8000");
    }
}
