/// gemview web - WASM bindings for the browser viewer
///
/// A page keeps one `GemstoneViewer`, forwards slider and button events to it,
/// and either uploads the per-part buffers to its own WebGL scene or lets
/// `draw_wireframe` paint an outline preview on a 2D canvas.

use std::fmt::Display;

use gemview_core::{Camera, Parameter, Part, Viewer};
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use web_sys::{CanvasRenderingContext2d, HtmlCanvasElement};

pub mod buffers;

use buffers::{part_buffers, project_outlines, FrameSummary};

fn to_js(err: impl Display) -> JsValue {
    JsValue::from_str(&err.to_string())
}

#[wasm_bindgen]
pub struct GemstoneViewer {
    viewer: Viewer,
}

#[wasm_bindgen]
impl GemstoneViewer {
    #[wasm_bindgen(constructor)]
    pub fn new() -> GemstoneViewer {
        GemstoneViewer {
            viewer: Viewer::default(),
        }
    }

    /// Set a control by name; returns the clamped value actually stored
    pub fn set_parameter(&mut self, name: &str, value: f64) -> Result<f64, JsValue> {
        let param: Parameter = name.parse().map_err(to_js)?;
        self.viewer.set_parameter(param, value).map_err(to_js)
    }

    pub fn parameter(&self, name: &str) -> Result<f64, JsValue> {
        let param: Parameter = name.parse().map_err(to_js)?;
        Ok(self.viewer.params().get(param))
    }

    /// `{min, max, step}` of a control as JSON
    pub fn parameter_bounds(&self, name: &str) -> Result<String, JsValue> {
        let param: Parameter = name.parse().map_err(to_js)?;
        serde_json::to_string(&self.viewer.params().bounds(param)).map_err(to_js)
    }

    /// Select a view; unknown names show everything from the side
    pub fn set_view(&mut self, name: &str) {
        self.viewer.set_view_name(name);
    }

    pub fn view(&self) -> Option<String> {
        self.viewer.view().map(|v| v.name().to_string())
    }

    pub fn camera_azimuth(&self) -> f32 {
        self.viewer.orbit().azimuth
    }

    pub fn camera_polar(&self) -> f32 {
        self.viewer.orbit().polar
    }

    pub fn camera_distance(&self) -> f32 {
        self.viewer.orbit().distance
    }

    /// Orbit by delta amounts (in radians)
    pub fn rotate(&mut self, d_azimuth: f32, d_polar: f32) {
        self.viewer.orbit_mut().rotate(d_azimuth, d_polar);
    }

    pub fn zoom(&mut self, factor: f32) {
        self.viewer.orbit_mut().zoom(factor);
    }

    /// Readout lines, e.g. `Table inclination: 82.59°`, joined by newlines
    pub fn readout(&mut self) -> Result<String, JsValue> {
        let frame = self.viewer.frame().map_err(to_js)?;
        Ok(frame.readout.to_string())
    }

    /// Everything about the current frame except the buffers, as JSON
    pub fn frame_json(&mut self) -> Result<String, JsValue> {
        let frame = self.viewer.frame().map_err(to_js)?;
        serde_json::to_string(&FrameSummary::new(&frame)).map_err(to_js)
    }

    /// World-space triangle positions of a part; empty when hidden
    pub fn part_positions(&mut self, part: &str) -> Result<Vec<f32>, JsValue> {
        let part: Part = part.parse().map_err(to_js)?;
        let buffers = part_buffers(&mut self.viewer, part).map_err(to_js)?;
        Ok(buffers.map(|b| b.positions).unwrap_or_default())
    }

    pub fn part_normals(&mut self, part: &str) -> Result<Vec<f32>, JsValue> {
        let part: Part = part.parse().map_err(to_js)?;
        let buffers = part_buffers(&mut self.viewer, part).map_err(to_js)?;
        Ok(buffers.map(|b| b.normals).unwrap_or_default())
    }

    /// World-space outline segments of a part, two points per edge
    pub fn part_edges(&mut self, part: &str) -> Result<Vec<f32>, JsValue> {
        let part: Part = part.parse().map_err(to_js)?;
        let buffers = part_buffers(&mut self.viewer, part).map_err(to_js)?;
        Ok(buffers.map(|b| b.edges).unwrap_or_default())
    }

    /// Paint the outlines of the visible solids onto a 2D canvas
    #[allow(deprecated)]
    pub fn draw_wireframe(&mut self, canvas_id: &str) -> Result<(), JsValue> {
        let document = web_sys::window()
            .and_then(|w| w.document())
            .ok_or_else(|| JsValue::from_str("no document"))?;
        let canvas = document
            .get_element_by_id(canvas_id)
            .ok_or_else(|| JsValue::from_str(&format!("no element #{}", canvas_id)))?
            .dyn_into::<HtmlCanvasElement>()?;
        let ctx = canvas
            .get_context("2d")?
            .ok_or_else(|| JsValue::from_str("2d context unavailable"))?
            .dyn_into::<CanvasRenderingContext2d>()?;

        let (width, height) = (canvas.width(), canvas.height());
        let mut camera = Camera::new(width, height);
        camera.apply_orbit(self.viewer.orbit());

        let frame = self.viewer.frame().map_err(to_js)?;
        let style = frame
            .solids
            .first()
            .map(|s| s.wireframe.style)
            .unwrap_or_default();

        ctx.clear_rect(0.0, 0.0, width as f64, height as f64);
        ctx.set_stroke_style(&JsValue::from_str(&style.color.to_hex()));
        ctx.set_line_width(style.width as f64);
        ctx.begin_path();
        for [(x0, y0), (x1, y1)] in project_outlines(&frame, &camera, width, height) {
            ctx.move_to(x0 as f64, y0 as f64);
            ctx.line_to(x1 as f64, y1 as f64);
        }
        ctx.stroke();
        Ok(())
    }
}

impl Default for GemstoneViewer {
    fn default() -> Self {
        Self::new()
    }
}

#[wasm_bindgen(start)]
pub fn main() {
    // Setup panic hook for better error messages in browser console
    console_error_panic_hook::set_once();
    web_sys::console::log_1(&JsValue::from_str("gemview-web ready"));
}
