/// Plain-data views of a frame for the JavaScript side
use serde::Serialize;

use gemview_core::{
    Camera, FillMaterial, Frame, GemError, OrbitState, Part, Readout, SolidDescriptor, StackLayout,
    Viewer, Visibility,
};

/// JSON payload describing one frame
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FrameSummary {
    pub view: Option<String>,
    pub visibility: Visibility,
    pub orbit: OrbitState,
    pub layout: StackLayout,
    pub readout: Readout,
    pub material: FillMaterial,
    pub solids: Vec<SolidDescriptor>,
}

impl FrameSummary {
    pub fn new(frame: &Frame<'_>) -> Self {
        Self {
            view: frame.view.map(|v| v.name().to_string()),
            visibility: frame.visibility,
            orbit: frame.orbit,
            layout: frame.layout,
            readout: frame.readout.clone(),
            material: frame.material,
            solids: frame.solids.iter().map(|s| s.descriptor).collect(),
        }
    }
}

/// World-space buffers for one part, ready for a WebGL upload
#[derive(Debug, Clone, Default)]
pub struct PartBuffers {
    pub positions: Vec<f32>,
    pub normals: Vec<f32>,
    pub edges: Vec<f32>,
}

/// Buffers for `part`, or `None` when the current view hides it.
pub fn part_buffers(viewer: &mut Viewer, part: Part) -> Result<Option<PartBuffers>, GemError> {
    let frame = viewer.frame()?;
    let Some(solid) = frame.solids.iter().find(|s| s.part() == part) else {
        return Ok(None);
    };
    let mesh = solid.world_mesh();
    Ok(Some(PartBuffers {
        positions: mesh.position_buffer(),
        normals: mesh.normal_buffer(),
        edges: solid.world_wireframe().position_buffer(),
    }))
}

/// Screen-space outline segments of every visible solid
pub fn project_outlines(frame: &Frame<'_>, camera: &Camera, width: u32, height: u32) -> Vec<[(f32, f32); 2]> {
    let mut out = Vec::new();
    for solid in &frame.solids {
        for [a, b] in &solid.wireframe.segments {
            let projected = (
                camera.project_to_screen(a, &solid.model, width, height),
                camera.project_to_screen(b, &solid.model, width, height),
            );
            if let (Some((x0, y0, _)), Some((x1, y1, _))) = projected {
                out.push([(x0, y0), (x1, y1)]);
            }
        }
    }
    out
}
