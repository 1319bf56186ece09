//! Gemstone geometry derived from [`GemstoneParameters`].
//!
//! The stone is three stacked solids: a frustum table on top, a cylindrical
//! crown in the middle and a downward cone for the pavilion. Everything here
//! is recomputed from the parameters; [`GeometryCache`] keeps the last build
//! so unchanged parameters do not re-tessellate.

use std::fmt;
use std::str::FromStr;

use nalgebra::Matrix4;
use serde::{Deserialize, Serialize};

use crate::error::{GemError, Result};
use crate::geometry::{LineStyle, Mesh, Wireframe};
use crate::params::GemstoneParameters;
use crate::primitives::{RevolvedSolid, SolidKind};
use crate::transform::Transform;

/// Wall slope in degrees, from the diameter-to-height ratio.
///
/// A zero height gives 90°.
pub fn tilt_angle(diameter: f64, height: f64) -> f64 {
    (diameter / (2.0 * height)).atan().to_degrees()
}

/// One of the three stacked solids
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Part {
    Table,
    Crown,
    Pavilion,
}

impl Part {
    pub const ALL: [Part; 3] = [Part::Table, Part::Crown, Part::Pavilion];

    pub fn label(self) -> &'static str {
        match self {
            Part::Table => "Table",
            Part::Crown => "Crown",
            Part::Pavilion => "Pavilion",
        }
    }
}

impl fmt::Display for Part {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for Part {
    type Err = GemError;

    fn from_str(s: &str) -> Result<Self> {
        Part::ALL
            .into_iter()
            .find(|p| p.label().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| GemError::UnknownPart(s.to_string()))
    }
}

/// Tilt angle of each part, degrees
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TiltAngles {
    pub table: f64,
    pub crown: f64,
    pub pavilion: f64,
}

impl TiltAngles {
    pub fn from_params(params: &GemstoneParameters) -> Self {
        Self {
            table: tilt_angle(params.table_diameter, params.table_height),
            crown: tilt_angle(params.pavilion_diameter, params.crown_height),
            pavilion: tilt_angle(params.pavilion_diameter, params.pavilion_height),
        }
    }

    pub fn get(&self, part: Part) -> f64 {
        match part {
            Part::Table => self.table,
            Part::Crown => self.crown,
            Part::Pavilion => self.pavilion,
        }
    }
}

/// Vertical offsets of the stacked solids, mm.
///
/// `pavilion_y` is the centre of the pavilion cone, `crown_y` the base of the
/// crown and `table_y` the base of the table.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct StackLayout {
    pub pavilion_y: f64,
    pub crown_y: f64,
    pub table_y: f64,
    table_height: f64,
    crown_height: f64,
}

impl StackLayout {
    pub fn from_params(params: &GemstoneParameters) -> Self {
        let pavilion_y = -params.crown_height;
        let crown_y = pavilion_y + params.pavilion_height / 2.0;
        let table_y = crown_y + params.crown_height;
        Self {
            pavilion_y,
            crown_y,
            table_y,
            table_height: params.table_height,
            crown_height: params.crown_height,
        }
    }

    /// Height at which a part's solid is centred
    pub fn center_y(&self, part: Part) -> f64 {
        match part {
            Part::Table => self.table_y + self.table_height / 2.0,
            Part::Crown => self.crown_y + self.crown_height / 2.0,
            Part::Pavilion => self.pavilion_y,
        }
    }
}

/// Shape parameters of one part, before tessellation
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SolidDescriptor {
    pub part: Part,
    pub kind: SolidKind,
    pub radius_top: f64,
    pub radius_bottom: f64,
    pub height: f64,
    pub segments: u32,
    /// Turned upside down about the X axis when placed.
    pub flipped: bool,
}

impl SolidDescriptor {
    fn new(part: Part, radius_top: f64, radius_bottom: f64, height: f64, segments: u32, flipped: bool) -> Self {
        let mut descriptor = Self {
            part,
            kind: SolidKind::Frustum,
            radius_top,
            radius_bottom,
            height,
            segments,
            flipped,
        };
        descriptor.kind = descriptor.solid().kind();
        descriptor
    }

    /// Unplaced solid, apex up for cones
    pub fn solid(&self) -> RevolvedSolid {
        RevolvedSolid::frustum(
            self.radius_top as f32,
            self.radius_bottom as f32,
            self.height as f32,
            self.segments,
        )
    }
}

/// Descriptors for table, crown and pavilion, in that order.
pub fn describe(params: &GemstoneParameters) -> Result<[SolidDescriptor; 3]> {
    params.validate()?;

    let table_r = params.table_diameter / 2.0;
    let pavilion_r = params.pavilion_diameter / 2.0;

    Ok([
        SolidDescriptor::new(
            Part::Table,
            table_r,
            pavilion_r,
            params.table_height,
            params.table_facets,
            false,
        ),
        SolidDescriptor::new(
            Part::Crown,
            pavilion_r,
            pavilion_r,
            params.crown_height,
            params.crown_facets,
            false,
        ),
        SolidDescriptor::new(
            Part::Pavilion,
            0.0,
            pavilion_r,
            params.pavilion_height,
            params.pavilion_facets,
            true,
        ),
    ])
}

/// A tessellated, placed part
#[derive(Debug, Clone)]
pub struct Solid {
    pub descriptor: SolidDescriptor,
    pub mesh: Mesh,
    pub wireframe: Wireframe,
    pub model: Matrix4<f32>,
}

impl Solid {
    fn build(descriptor: SolidDescriptor, layout: &StackLayout) -> Result<Self> {
        let mesh = descriptor.solid().mesh()?;
        let wireframe = Wireframe::from_mesh(&mesh, LineStyle::OUTLINE);
        let model = Transform::placement(layout.center_y(descriptor.part) as f32, descriptor.flipped);
        Ok(Self {
            descriptor,
            mesh,
            wireframe,
            model,
        })
    }

    pub fn part(&self) -> Part {
        self.descriptor.part
    }

    pub fn world_mesh(&self) -> Mesh {
        self.mesh.transformed(&self.model)
    }

    pub fn world_wireframe(&self) -> Wireframe {
        self.wireframe.transformed(&self.model)
    }
}

/// Everything derived from one parameter set
#[derive(Debug, Clone)]
pub struct GemstoneGeometry {
    pub params: GemstoneParameters,
    pub layout: StackLayout,
    pub angles: TiltAngles,
    pub solids: [Solid; 3],
}

impl GemstoneGeometry {
    pub fn build(params: &GemstoneParameters) -> Result<Self> {
        let [table, crown, pavilion] = describe(params)?;
        let layout = StackLayout::from_params(params);
        Ok(Self {
            params: *params,
            layout,
            angles: TiltAngles::from_params(params),
            solids: [
                Solid::build(table, &layout)?,
                Solid::build(crown, &layout)?,
                Solid::build(pavilion, &layout)?,
            ],
        })
    }

    pub fn solid(&self, part: Part) -> &Solid {
        match part {
            Part::Table => &self.solids[0],
            Part::Crown => &self.solids[1],
            Part::Pavilion => &self.solids[2],
        }
    }
}

/// Last built geometry, keyed by its parameters
#[derive(Debug, Default)]
pub struct GeometryCache {
    current: Option<GemstoneGeometry>,
    builds: u64,
}

impl GeometryCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Geometry for `params`, rebuilt only when they differ from the cached set.
    pub fn get_or_build(&mut self, params: &GemstoneParameters) -> Result<&GemstoneGeometry> {
        let hit = matches!(&self.current, Some(geometry) if geometry.params == *params);
        if hit {
            tracing::trace!("geometry cache hit");
        } else {
            tracing::debug!(?params, "rebuilding gemstone geometry");
            let geometry = GemstoneGeometry::build(params)?;
            self.builds += 1;
            self.current = Some(geometry);
        }
        self.current.as_ref().ok_or(GemError::DegenerateSolid)
    }

    /// Number of tessellations performed so far
    pub fn builds(&self) -> u64 {
        self.builds
    }

    pub fn invalidate(&mut self) {
        self.current = None;
    }
}
