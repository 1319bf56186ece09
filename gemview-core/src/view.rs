//! Named camera presets.
//!
//! A preset decides which of the three solids are drawn and where the orbit
//! camera sits. Names that match no preset fall back to a full-visibility
//! view from the side.

use std::f32::consts::{FRAC_PI_2, FRAC_PI_3, FRAC_PI_4, PI};
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{GemError, Result};
use crate::model::Part;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ViewPreset {
    Top,
    Profile,
    Bottom,
    #[default]
    Global,
}

/// Which solids are drawn
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Visibility {
    pub table: bool,
    pub crown: bool,
    pub pavilion: bool,
}

impl Visibility {
    pub const ALL: Visibility = Visibility {
        table: true,
        crown: true,
        pavilion: true,
    };

    pub fn shows(&self, part: Part) -> bool {
        match part {
            Part::Table => self.table,
            Part::Crown => self.crown,
            Part::Pavilion => self.pavilion,
        }
    }
}

/// Target orbit angles in radians
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CameraAngles {
    pub azimuth: f32,
    pub polar: f32,
}

/// Outcome of resolving a view
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ViewResolution {
    pub visibility: Visibility,
    pub camera: CameraAngles,
}

impl ViewResolution {
    /// Used for names that match no preset.
    pub const FALLBACK: ViewResolution = ViewResolution {
        visibility: Visibility::ALL,
        camera: CameraAngles {
            azimuth: FRAC_PI_2,
            polar: FRAC_PI_2,
        },
    };
}

impl ViewPreset {
    pub const ALL: [ViewPreset; 4] = [
        ViewPreset::Top,
        ViewPreset::Profile,
        ViewPreset::Bottom,
        ViewPreset::Global,
    ];

    pub fn name(self) -> &'static str {
        match self {
            ViewPreset::Top => "top",
            ViewPreset::Profile => "profile",
            ViewPreset::Bottom => "bottom",
            ViewPreset::Global => "global",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            ViewPreset::Top => "Top view",
            ViewPreset::Profile => "Profile view",
            ViewPreset::Bottom => "Bottom view",
            ViewPreset::Global => "Global view",
        }
    }

    pub fn visibility(self) -> Visibility {
        match self {
            ViewPreset::Top => Visibility {
                table: true,
                crown: false,
                pavilion: false,
            },
            ViewPreset::Profile => Visibility {
                table: false,
                crown: true,
                pavilion: true,
            },
            ViewPreset::Bottom => Visibility {
                table: false,
                crown: false,
                pavilion: true,
            },
            ViewPreset::Global => Visibility::ALL,
        }
    }

    pub fn camera(self) -> CameraAngles {
        let (azimuth, polar) = match self {
            ViewPreset::Top => (FRAC_PI_2, FRAC_PI_2),
            ViewPreset::Profile => (0.0, FRAC_PI_3),
            ViewPreset::Bottom => (PI, FRAC_PI_2),
            ViewPreset::Global => (FRAC_PI_4, FRAC_PI_3),
        };
        CameraAngles { azimuth, polar }
    }

    pub fn resolve(self) -> ViewResolution {
        ViewResolution {
            visibility: self.visibility(),
            camera: self.camera(),
        }
    }

    /// Resolve a view by name, falling back for unknown names.
    pub fn resolve_name(name: &str) -> ViewResolution {
        match name.parse::<ViewPreset>() {
            Ok(preset) => preset.resolve(),
            Err(_) => {
                tracing::warn!(view = name, "unknown view, using fallback camera");
                ViewResolution::FALLBACK
            }
        }
    }

    /// Keyboard shortcut used by the viewers
    pub fn from_key(key: char) -> Option<ViewPreset> {
        match key.to_ascii_lowercase() {
            '1' | 't' => Some(ViewPreset::Top),
            '2' | 'p' => Some(ViewPreset::Profile),
            '3' | 'b' => Some(ViewPreset::Bottom),
            '4' | 'g' => Some(ViewPreset::Global),
            _ => None,
        }
    }
}

impl fmt::Display for ViewPreset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for ViewPreset {
    type Err = GemError;

    fn from_str(s: &str) -> Result<Self> {
        let key = s.trim().to_ascii_lowercase();
        ViewPreset::ALL
            .into_iter()
            .find(|v| v.name() == key)
            .ok_or_else(|| GemError::UnknownView(s.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_visibility_table() {
        let top = ViewPreset::Top.visibility();
        assert!(top.table && !top.crown && !top.pavilion);

        let profile = ViewPreset::Profile.visibility();
        assert!(!profile.table && profile.crown && profile.pavilion);

        let bottom = ViewPreset::Bottom.visibility();
        assert!(!bottom.table && !bottom.crown && bottom.pavilion);

        assert_eq!(ViewPreset::Global.visibility(), Visibility::ALL);
    }

    #[test]
    fn test_crown_only_in_profile_and_global() {
        let with_crown: Vec<_> = ViewPreset::ALL
            .into_iter()
            .filter(|v| v.visibility().shows(Part::Crown))
            .collect();
        assert_eq!(with_crown, vec![ViewPreset::Profile, ViewPreset::Global]);
    }

    #[test]
    fn test_camera_angles() {
        assert_eq!(
            ViewPreset::Top.camera(),
            CameraAngles {
                azimuth: FRAC_PI_2,
                polar: FRAC_PI_2
            }
        );
        assert_eq!(ViewPreset::Profile.camera().azimuth, 0.0);
        assert_eq!(ViewPreset::Profile.camera().polar, FRAC_PI_3);
        assert_eq!(ViewPreset::Bottom.camera().azimuth, PI);
        assert_eq!(ViewPreset::Global.camera().azimuth, FRAC_PI_4);
        assert_eq!(ViewPreset::Global.camera().polar, FRAC_PI_3);
    }

    #[test]
    fn test_default_is_global() {
        assert_eq!(ViewPreset::default(), ViewPreset::Global);
    }

    #[test]
    fn test_names_round_trip() {
        for view in ViewPreset::ALL {
            assert_eq!(view.name().parse::<ViewPreset>().unwrap(), view);
        }
        assert_eq!(" Profile ".parse::<ViewPreset>().unwrap(), ViewPreset::Profile);
        assert_eq!(
            "side".parse::<ViewPreset>().unwrap_err(),
            GemError::UnknownView("side".to_string())
        );
    }

    #[test]
    fn test_unknown_name_falls_back() {
        let resolved = ViewPreset::resolve_name("isometric");
        assert_eq!(resolved, ViewResolution::FALLBACK);
        assert_eq!(resolved.visibility, Visibility::ALL);
        assert_eq!(resolved.camera, ViewPreset::Top.camera());

        assert_eq!(ViewPreset::resolve_name("bottom"), ViewPreset::Bottom.resolve());
    }

    #[test]
    fn test_key_shortcuts() {
        assert_eq!(ViewPreset::from_key('1'), Some(ViewPreset::Top));
        assert_eq!(ViewPreset::from_key('G'), Some(ViewPreset::Global));
        assert_eq!(ViewPreset::from_key('x'), None);
    }
}
