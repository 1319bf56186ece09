/// ASCII rasterizer for terminal rendering
use crossterm::{
    style::{Color, Print, ResetColor, SetForegroundColor},
    QueueableCommand,
};
use nalgebra::{Matrix4, Point3};
use std::io::Write;
use gemview_core::{Camera, Mesh, Triangle, Wireframe};

/// Character luminosity ramp for depth/shading (darkest to lightest)
const LUMINOSITY_RAMP: &[char] = &['.', ':', '-', '=', '+', '*', '%', '@'];

/// Edges win depth ties against the faces they lie on.
const EDGE_DEPTH_BIAS: f32 = 1.0e-4;

const EDGE_CHAR: char = '#';

#[derive(Debug, Clone, Copy, PartialEq)]
enum Cell {
    Empty,
    Face(char),
    Edge,
}

/// ASCII renderer that converts 3D meshes to terminal characters
pub struct AsciiRenderer {
    width: usize,
    height: usize,
    depth_buffer: Vec<f32>,
    cells: Vec<Cell>,
}

impl AsciiRenderer {
    pub fn new(width: usize, height: usize) -> Self {
        let size = width * height;
        Self {
            width,
            height,
            depth_buffer: vec![f32::INFINITY; size],
            cells: vec![Cell::Empty; size],
        }
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn clear(&mut self) {
        self.depth_buffer.fill(f32::INFINITY);
        self.cells.fill(Cell::Empty);
    }

    pub fn render_mesh(&mut self, mesh: &Mesh, model_matrix: &Matrix4<f32>, camera: &Camera) {
        for triangle in &mesh.triangles {
            self.render_triangle(triangle, model_matrix, camera);
        }
    }

    fn render_triangle(&mut self, triangle: &Triangle, model_matrix: &Matrix4<f32>, camera: &Camera) {
        let world = triangle
            .vertices
            .map(|v| model_matrix.transform_point(&v.position));

        // Back-face culling in world space
        let normal = (world[1] - world[0]).cross(&(world[2] - world[0]));
        if normal.norm() < 1e-9 {
            return;
        }
        let normal = normal.normalize();
        let centroid = Point3::from((world[0].coords + world[1].coords + world[2].coords) / 3.0);
        let to_eye = (camera.position - centroid).normalize();
        let facing = normal.dot(&to_eye);
        if facing <= 0.0 {
            return;
        }

        // Project vertices to screen space
        let mut screen_coords = [(0.0, 0.0, 0.0); 3];
        for (slot, point) in screen_coords.iter_mut().zip(world.iter()) {
            match camera.project_to_screen(point, &Matrix4::identity(), self.width as u32, self.height as u32) {
                Some(coords) => *slot = coords,
                None => return, // Triangle is clipped
            }
        }

        // Map brightness to character
        let char_index = (facing * (LUMINOSITY_RAMP.len() - 1) as f32) as usize;
        let char_index = char_index.min(LUMINOSITY_RAMP.len() - 1);

        self.rasterize_triangle(&screen_coords, Cell::Face(LUMINOSITY_RAMP[char_index]));
    }

    fn rasterize_triangle(&mut self, coords: &[(f32, f32, f32); 3], cell: Cell) {
        let (v0, v1, v2) = (coords[0], coords[1], coords[2]);

        // Bounding box
        let min_x = v0.0.min(v1.0).min(v2.0).floor() as i32;
        let max_x = v0.0.max(v1.0).max(v2.0).ceil() as i32;
        let min_y = v0.1.min(v1.1).min(v2.1).floor() as i32;
        let max_y = v0.1.max(v1.1).max(v2.1).ceil() as i32;

        // Clip to screen bounds
        let min_x = min_x.max(0);
        let max_x = max_x.min(self.width as i32 - 1);
        let min_y = min_y.max(0);
        let max_y = max_y.min(self.height as i32 - 1);

        // Scanline rasterization
        for y in min_y..=max_y {
            for x in min_x..=max_x {
                let px = x as f32 + 0.5;
                let py = y as f32 + 0.5;

                // Barycentric coordinates
                if let Some((w0, w1, w2)) = barycentric(
                    (v0.0, v0.1),
                    (v1.0, v1.1),
                    (v2.0, v2.1),
                    (px, py),
                ) {
                    if w0 >= 0.0 && w1 >= 0.0 && w2 >= 0.0 {
                        // Interpolate depth
                        let depth = w0 * v0.2 + w1 * v1.2 + w2 * v2.2;
                        self.plot(x as usize, y as usize, depth, cell);
                    }
                }
            }
        }
    }

    /// Overlay the outline edges, hidden where a face is in front of them
    pub fn render_wireframe(&mut self, wireframe: &Wireframe, model_matrix: &Matrix4<f32>, camera: &Camera) {
        for [a, b] in &wireframe.segments {
            let w = self.width as u32;
            let h = self.height as u32;
            let (Some(p0), Some(p1)) = (
                camera.project_to_screen(a, model_matrix, w, h),
                camera.project_to_screen(b, model_matrix, w, h),
            ) else {
                continue;
            };
            self.draw_line(p0, p1);
        }
    }

    fn draw_line(&mut self, p0: (f32, f32, f32), p1: (f32, f32, f32)) {
        let steps = (p1.0 - p0.0).abs().max((p1.1 - p0.1).abs()).ceil().max(1.0) as usize;
        for i in 0..=steps {
            let t = i as f32 / steps as f32;
            let x = p0.0 + (p1.0 - p0.0) * t;
            let y = p0.1 + (p1.1 - p0.1) * t;
            let depth = p0.2 + (p1.2 - p0.2) * t - EDGE_DEPTH_BIAS;
            if x < 0.0 || y < 0.0 {
                continue;
            }
            let (x, y) = (x as usize, y as usize);
            if x < self.width && y < self.height {
                self.plot(x, y, depth, Cell::Edge);
            }
        }
    }

    fn plot(&mut self, x: usize, y: usize, depth: f32, cell: Cell) {
        let idx = y * self.width + x;
        if depth < self.depth_buffer[idx] {
            self.depth_buffer[idx] = depth;
            self.cells[idx] = cell;
        }
    }

    /// Number of cells covered by faces or edges
    pub fn covered(&self) -> usize {
        self.cells.iter().filter(|c| **c != Cell::Empty).count()
    }

    pub fn draw<W: Write>(&self, writer: &mut W) -> std::io::Result<()> {
        for y in 0..self.height {
            for x in 0..self.width {
                let (c, color) = match self.cells[y * self.width + x] {
                    Cell::Empty => (' ', Color::Reset),
                    Cell::Edge => (EDGE_CHAR, Color::White),
                    Cell::Face(c) => {
                        // Pale blue fill, brighter for faces turned to the eye
                        let color = match c {
                            '.' | ':' => Color::DarkBlue,
                            '-' | '=' => Color::Blue,
                            '+' | '*' => Color::DarkCyan,
                            _ => Color::Cyan,
                        };
                        (c, color)
                    }
                };

                writer.queue(SetForegroundColor(color))?;
                writer.queue(Print(c))?;
            }
            if y + 1 < self.height {
                writer.queue(Print("\r\n"))?;
            }
        }
        writer.queue(ResetColor)?;
        Ok(())
    }
}

/// Calculate barycentric coordinates for a point in a triangle
fn barycentric(
    v0: (f32, f32),
    v1: (f32, f32),
    v2: (f32, f32),
    p: (f32, f32),
) -> Option<(f32, f32, f32)> {
    let denom = (v1.1 - v2.1) * (v0.0 - v2.0) + (v2.0 - v1.0) * (v0.1 - v2.1);

    if denom.abs() < 1e-6 {
        return None;
    }

    let w0 = ((v1.1 - v2.1) * (p.0 - v2.0) + (v2.0 - v1.0) * (p.1 - v2.1)) / denom;
    let w1 = ((v2.1 - v0.1) * (p.0 - v2.0) + (v0.0 - v2.0) * (p.1 - v2.1)) / denom;
    let w2 = 1.0 - w0 - w1;

    Some((w0, w1, w2))
}

#[cfg(test)]
mod tests {
    use super::*;
    use gemview_core::{ViewPreset, Viewer};

    #[test]
    fn test_barycentric_inside_and_degenerate() {
        let w = barycentric((0.0, 0.0), (4.0, 0.0), (0.0, 4.0), (1.0, 1.0)).unwrap();
        assert!(w.0 > 0.0 && w.1 > 0.0 && w.2 > 0.0);
        assert!((w.0 + w.1 + w.2 - 1.0).abs() < 1e-6);
        assert!(barycentric((0.0, 0.0), (1.0, 1.0), (2.0, 2.0), (1.0, 1.0)).is_none());
    }

    #[test]
    fn test_renders_visible_solids() {
        let mut viewer = Viewer::default();
        let mut camera = Camera::new(80, 48);
        camera.apply_orbit(viewer.orbit());
        let mut renderer = AsciiRenderer::new(80, 24);

        let frame = viewer.frame().unwrap();
        for solid in &frame.solids {
            renderer.render_mesh(&solid.mesh, &solid.model, &camera);
            renderer.render_wireframe(&solid.wireframe, &solid.model, &camera);
        }
        assert!(renderer.covered() > 0);

        let mut out = Vec::new();
        renderer.draw(&mut out).unwrap();
        let text = String::from_utf8_lossy(&out);
        assert!(text.contains(EDGE_CHAR));

        renderer.clear();
        assert_eq!(renderer.covered(), 0);
    }

    #[test]
    fn test_bottom_view_draws_less_than_global() {
        let coverage = |view: ViewPreset| {
            let mut viewer = Viewer::default();
            viewer.set_view(view);
            let mut camera = Camera::new(80, 48);
            camera.apply_orbit(viewer.orbit());
            let mut renderer = AsciiRenderer::new(80, 24);
            let frame = viewer.frame().unwrap();
            for solid in &frame.solids {
                renderer.render_mesh(&solid.mesh, &solid.model, &camera);
            }
            renderer.covered()
        };
        assert!(coverage(ViewPreset::Bottom) > 0);
        assert!(coverage(ViewPreset::Bottom) < coverage(ViewPreset::Global));
    }
}
