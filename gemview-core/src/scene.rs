//! Viewer state owned by the front-end.
//!
//! A [`Viewer`] holds the current parameters, the selected view, the orbit
//! camera and the geometry cache. Front-ends feed it input events and ask it
//! for a [`Frame`] before drawing.

use crate::error::Result;
use crate::geometry::FillMaterial;
use crate::model::{GeometryCache, Solid, StackLayout};
use crate::params::{GemstoneParameters, Parameter};
use crate::readout::Readout;
use crate::transform::OrbitState;
use crate::view::{ViewPreset, ViewResolution, Visibility};

/// What a renderer needs for one frame
#[derive(Debug)]
pub struct Frame<'a> {
    /// `None` when an unknown view name selected the fallback.
    pub view: Option<ViewPreset>,
    pub visibility: Visibility,
    pub orbit: OrbitState,
    pub layout: StackLayout,
    pub readout: Readout,
    pub material: FillMaterial,
    /// Visible solids, table first.
    pub solids: Vec<&'a Solid>,
}

#[derive(Debug)]
pub struct Viewer {
    params: GemstoneParameters,
    view: Option<ViewPreset>,
    resolution: ViewResolution,
    orbit: OrbitState,
    cache: GeometryCache,
}

impl Default for Viewer {
    fn default() -> Self {
        let view = ViewPreset::default();
        let resolution = view.resolve();
        let mut orbit = OrbitState::default();
        orbit.set_angles(resolution.camera.azimuth, resolution.camera.polar);
        Self {
            params: GemstoneParameters::default(),
            view: Some(view),
            resolution,
            orbit,
            cache: GeometryCache::new(),
        }
    }
}

impl Viewer {
    pub fn new(params: GemstoneParameters, view: ViewPreset) -> Result<Self> {
        params.validate()?;
        let mut viewer = Self {
            params,
            ..Self::default()
        };
        viewer.set_view(view);
        Ok(viewer)
    }

    pub fn params(&self) -> &GemstoneParameters {
        &self.params
    }

    pub fn view(&self) -> Option<ViewPreset> {
        self.view
    }

    pub fn visibility(&self) -> Visibility {
        self.resolution.visibility
    }

    pub fn orbit(&self) -> &OrbitState {
        &self.orbit
    }

    pub fn orbit_mut(&mut self) -> &mut OrbitState {
        &mut self.orbit
    }

    /// Apply a control value; returns the clamped value actually stored.
    pub fn set_parameter(&mut self, param: Parameter, value: f64) -> Result<f64> {
        let mut next = self.params;
        let applied = next.set(param, value)?;
        next.validate()?;
        self.params = next;
        Ok(applied)
    }

    pub fn nudge_parameter(&mut self, param: Parameter, steps: i32) -> Result<f64> {
        let mut next = self.params;
        let applied = next.nudge(param, steps)?;
        next.validate()?;
        self.params = next;
        Ok(applied)
    }

    /// Select a preset and move the camera to it
    pub fn set_view(&mut self, view: ViewPreset) {
        tracing::info!(view = view.name(), "view selected");
        self.view = Some(view);
        self.apply_resolution(view.resolve());
    }

    /// Select a view by name; unknown names use the fallback resolution
    pub fn set_view_name(&mut self, name: &str) {
        match name.parse::<ViewPreset>() {
            Ok(view) => self.set_view(view),
            Err(_) => {
                self.view = None;
                self.apply_resolution(ViewPreset::resolve_name(name));
            }
        }
    }

    fn apply_resolution(&mut self, resolution: ViewResolution) {
        self.resolution = resolution;
        self.orbit
            .set_angles(resolution.camera.azimuth, resolution.camera.polar);
    }

    pub fn geometry_builds(&self) -> u64 {
        self.cache.builds()
    }

    pub fn frame(&mut self) -> Result<Frame<'_>> {
        let visibility = self.resolution.visibility;
        let view = self.view;
        let orbit = self.orbit;
        let geometry = self.cache.get_or_build(&self.params)?;

        Ok(Frame {
            view,
            visibility,
            orbit,
            layout: geometry.layout,
            readout: Readout::new(geometry.angles, &geometry.params),
            material: FillMaterial::PASTEL,
            solids: geometry
                .solids
                .iter()
                .filter(|s| visibility.shows(s.part()))
                .collect(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Part;
    use std::f32::consts::{FRAC_PI_2, FRAC_PI_3, FRAC_PI_4};

    fn parts(frame: &Frame<'_>) -> Vec<Part> {
        frame.solids.iter().map(|s| s.part()).collect()
    }

    #[test]
    fn test_default_viewer_is_global() {
        let mut viewer = Viewer::default();
        assert_eq!(viewer.view(), Some(ViewPreset::Global));
        assert!((viewer.orbit().azimuth - FRAC_PI_4).abs() < 1e-6);
        assert!((viewer.orbit().polar - FRAC_PI_3).abs() < 1e-6);

        let frame = viewer.frame().unwrap();
        assert_eq!(parts(&frame), vec![Part::Table, Part::Crown, Part::Pavilion]);
        assert_eq!(frame.readout.lines.len(), 6);
    }

    #[test]
    fn test_view_filters_solids() {
        let mut viewer = Viewer::default();
        viewer.set_view(ViewPreset::Top);
        assert_eq!(parts(&viewer.frame().unwrap()), vec![Part::Table]);

        viewer.set_view(ViewPreset::Bottom);
        assert_eq!(parts(&viewer.frame().unwrap()), vec![Part::Pavilion]);

        viewer.set_view(ViewPreset::Profile);
        assert_eq!(parts(&viewer.frame().unwrap()), vec![Part::Crown, Part::Pavilion]);
    }

    #[test]
    fn test_view_change_does_not_rebuild() {
        let mut viewer = Viewer::default();
        viewer.frame().unwrap();
        viewer.set_view(ViewPreset::Bottom);
        viewer.frame().unwrap();
        assert_eq!(viewer.geometry_builds(), 1);

        viewer.set_parameter(Parameter::PavilionHeight, 120.0).unwrap();
        viewer.frame().unwrap();
        assert_eq!(viewer.geometry_builds(), 2);
    }

    #[test]
    fn test_unknown_view_name_uses_fallback() {
        let mut viewer = Viewer::default();
        viewer.set_view_name("underside");
        assert_eq!(viewer.view(), None);
        assert_eq!(viewer.visibility(), Visibility::ALL);
        assert!((viewer.orbit().azimuth - FRAC_PI_2).abs() < 1e-6);
        assert!((viewer.orbit().polar - FRAC_PI_2).abs() < 1e-6);

        viewer.set_view_name("profile");
        assert_eq!(viewer.view(), Some(ViewPreset::Profile));
    }

    #[test]
    fn test_manual_orbit_reset_by_view() {
        let mut viewer = Viewer::default();
        viewer.orbit_mut().rotate(1.0, 0.5);
        viewer.set_view(ViewPreset::Global);
        assert!((viewer.orbit().azimuth - FRAC_PI_4).abs() < 1e-6);
    }

    #[test]
    fn test_parameters_flow_into_readout() {
        let mut viewer = Viewer::default();
        assert_eq!(viewer.set_parameter(Parameter::CrownFacets, 33.0).unwrap(), 34.0);
        let frame = viewer.frame().unwrap();
        assert_eq!(frame.readout.lines[4].value, "34");
        let crown = frame.solids.iter().find(|s| s.part() == Part::Crown).unwrap();
        assert_eq!(crown.descriptor.segments, 34);
    }

    #[test]
    fn test_new_rejects_invalid_params() {
        let params = GemstoneParameters {
            table_diameter: 300.0,
            ..Default::default()
        };
        assert!(Viewer::new(params, ViewPreset::Top).is_err());

        let viewer = Viewer::new(GemstoneParameters::default(), ViewPreset::Top).unwrap();
        assert_eq!(viewer.view(), Some(ViewPreset::Top));
    }
}
