/// Gemstone dimensions and the control ranges that drive them
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{GemError, Result};

/// Smallest facet count that still closes a revolved solid.
pub const MIN_SOLID_FACETS: u32 = 3;

/// User-chosen dimensions of the gemstone, lengths in millimetres.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GemstoneParameters {
    pub table_diameter: f64,
    pub pavilion_diameter: f64,
    pub table_height: f64,
    pub crown_height: f64,
    pub pavilion_height: f64,
    pub table_facets: u32,
    pub crown_facets: u32,
    pub pavilion_facets: u32,
}

impl Default for GemstoneParameters {
    fn default() -> Self {
        Self {
            table_diameter: 200.0,
            pavilion_diameter: 200.0,
            table_height: 13.0,
            crown_height: 5.0,
            pavilion_height: 75.0,
            table_facets: 16,
            crown_facets: 16,
            pavilion_facets: 16,
        }
    }
}

impl GemstoneParameters {
    /// Reject values the geometry cannot be built from.
    pub fn validate(&self) -> Result<()> {
        let lengths = [
            (Parameter::TableDiameter, self.table_diameter),
            (Parameter::PavilionDiameter, self.pavilion_diameter),
            (Parameter::TableHeight, self.table_height),
            (Parameter::CrownHeight, self.crown_height),
            (Parameter::PavilionHeight, self.pavilion_height),
        ];
        for (param, value) in lengths {
            if !value.is_finite() || value <= 0.0 {
                return Err(GemError::InvalidDimension {
                    name: param.name(),
                    value,
                });
            }
        }

        let facets = [
            (Parameter::TableFacets, self.table_facets),
            (Parameter::CrownFacets, self.crown_facets),
            (Parameter::PavilionFacets, self.pavilion_facets),
        ];
        for (param, count) in facets {
            if count < MIN_SOLID_FACETS {
                return Err(GemError::TooFewFacets {
                    name: param.name(),
                    count,
                });
            }
        }

        if self.table_diameter > self.pavilion_diameter {
            return Err(GemError::TableWiderThanPavilion {
                table: self.table_diameter,
                pavilion: self.pavilion_diameter,
            });
        }

        Ok(())
    }

    /// Current value of a control, facet counts widened to `f64`.
    pub fn get(&self, param: Parameter) -> f64 {
        match param {
            Parameter::TableDiameter => self.table_diameter,
            Parameter::PavilionDiameter => self.pavilion_diameter,
            Parameter::TableHeight => self.table_height,
            Parameter::CrownHeight => self.crown_height,
            Parameter::PavilionHeight => self.pavilion_height,
            Parameter::TableFacets => self.table_facets as f64,
            Parameter::CrownFacets => self.crown_facets as f64,
            Parameter::PavilionFacets => self.pavilion_facets as f64,
        }
    }

    /// Range of a control given the rest of the current parameters.
    pub fn bounds(&self, param: Parameter) -> ParameterBounds {
        match param {
            Parameter::TableDiameter => ParameterBounds::new(10.0, self.pavilion_diameter, 1.0),
            Parameter::PavilionDiameter => ParameterBounds::new(10.0, 3000.0, 1.0),
            Parameter::TableHeight | Parameter::CrownHeight => {
                ParameterBounds::new(1.0, 100.0, 1.0)
            }
            Parameter::PavilionHeight => ParameterBounds::new(10.0, 500.0, 1.0),
            Parameter::TableFacets | Parameter::CrownFacets | Parameter::PavilionFacets => {
                ParameterBounds::new(4.0, 300.0, 2.0)
            }
        }
    }

    /// Set a control the way a slider would: clamp to its range and snap to
    /// its step. Returns the value actually stored.
    pub fn set(&mut self, param: Parameter, value: f64) -> Result<f64> {
        if !value.is_finite() {
            return Err(GemError::InvalidDimension {
                name: param.name(),
                value,
            });
        }

        let applied = self.bounds(param).apply(value);
        if applied != value {
            tracing::debug!(param = param.name(), requested = value, applied, "clamped control value");
        }

        match param {
            Parameter::TableDiameter => self.table_diameter = applied,
            Parameter::PavilionDiameter => {
                self.pavilion_diameter = applied;
                if self.table_diameter > applied {
                    tracing::debug!(
                        table_diameter = self.table_diameter,
                        pavilion_diameter = applied,
                        "table diameter follows shrinking pavilion"
                    );
                    self.table_diameter = applied;
                }
            }
            Parameter::TableHeight => self.table_height = applied,
            Parameter::CrownHeight => self.crown_height = applied,
            Parameter::PavilionHeight => self.pavilion_height = applied,
            Parameter::TableFacets => self.table_facets = applied as u32,
            Parameter::CrownFacets => self.crown_facets = applied as u32,
            Parameter::PavilionFacets => self.pavilion_facets = applied as u32,
        }

        Ok(applied)
    }

    /// Move a control by `steps` increments of its step size.
    pub fn nudge(&mut self, param: Parameter, steps: i32) -> Result<f64> {
        let step = self.bounds(param).step;
        self.set(param, self.get(param) + step * steps as f64)
    }
}

/// Inclusive slider range.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ParameterBounds {
    pub min: f64,
    pub max: f64,
    pub step: f64,
}

impl ParameterBounds {
    pub fn new(min: f64, max: f64, step: f64) -> Self {
        Self { min, max, step }
    }

    /// Clamp into `[min, max]` and snap onto the step grid anchored at `min`.
    pub fn apply(&self, value: f64) -> f64 {
        let clamped = value.clamp(self.min, self.max.max(self.min));
        let snapped = self.min + ((clamped - self.min) / self.step).round() * self.step;
        snapped.min(self.max).max(self.min)
    }

    pub fn contains(&self, value: f64) -> bool {
        value >= self.min && value <= self.max
    }
}

/// One of the eight user controls.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Parameter {
    TableDiameter,
    PavilionDiameter,
    TableHeight,
    CrownHeight,
    PavilionHeight,
    TableFacets,
    CrownFacets,
    PavilionFacets,
}

impl Parameter {
    pub const ALL: [Parameter; 8] = [
        Parameter::TableDiameter,
        Parameter::PavilionDiameter,
        Parameter::TableHeight,
        Parameter::CrownHeight,
        Parameter::PavilionHeight,
        Parameter::TableFacets,
        Parameter::CrownFacets,
        Parameter::PavilionFacets,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Parameter::TableDiameter => "table_diameter",
            Parameter::PavilionDiameter => "pavilion_diameter",
            Parameter::TableHeight => "table_height",
            Parameter::CrownHeight => "crown_height",
            Parameter::PavilionHeight => "pavilion_height",
            Parameter::TableFacets => "table_facets",
            Parameter::CrownFacets => "crown_facets",
            Parameter::PavilionFacets => "pavilion_facets",
        }
    }

    /// Human-readable control label.
    pub fn label(self) -> &'static str {
        match self {
            Parameter::TableDiameter => "Table top diameter (mm)",
            Parameter::PavilionDiameter => "Pavilion diameter (mm)",
            Parameter::TableHeight => "Table thickness (mm)",
            Parameter::CrownHeight => "Crown height (mm)",
            Parameter::PavilionHeight => "Pavilion height (mm)",
            Parameter::TableFacets => "Table facets",
            Parameter::CrownFacets => "Crown facets",
            Parameter::PavilionFacets => "Pavilion facets",
        }
    }

    /// Cycle through `ALL`, wrapping at both ends.
    pub fn offset(self, delta: isize) -> Parameter {
        let len = Self::ALL.len() as isize;
        let index = Self::ALL.iter().position(|p| *p == self).unwrap_or(0) as isize;
        Self::ALL[(index + delta).rem_euclid(len) as usize]
    }
}

impl fmt::Display for Parameter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Parameter {
    type Err = GemError;

    /// Accepts snake_case, kebab-case and camelCase spellings.
    fn from_str(s: &str) -> Result<Self> {
        let key: String = s
            .chars()
            .filter(|c| *c != '_' && *c != '-')
            .map(|c| c.to_ascii_lowercase())
            .collect();
        Parameter::ALL
            .into_iter()
            .find(|p| p.name().replace('_', "") == key)
            .ok_or_else(|| GemError::UnknownParameter(s.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_are_valid() {
        let params = GemstoneParameters::default();
        assert!(params.validate().is_ok());
        assert_eq!(params.table_facets, 16);
        assert_eq!(params.pavilion_height, 75.0);
    }

    #[test]
    fn test_validation_rejects_bad_values() {
        let params = GemstoneParameters {
            crown_height: 0.0,
            ..Default::default()
        };
        assert!(matches!(
            params.validate(),
            Err(GemError::InvalidDimension { name: "crown_height", .. })
        ));

        let params = GemstoneParameters {
            pavilion_facets: 2,
            ..Default::default()
        };
        assert!(matches!(
            params.validate(),
            Err(GemError::TooFewFacets { count: 2, .. })
        ));

        let params = GemstoneParameters {
            table_diameter: 250.0,
            ..Default::default()
        };
        assert!(matches!(
            params.validate(),
            Err(GemError::TableWiderThanPavilion { .. })
        ));

        let params = GemstoneParameters {
            table_height: f64::NAN,
            ..Default::default()
        };
        assert!(params.validate().is_err());
    }

    #[test]
    fn test_facet_slider_snaps_to_even_counts() {
        let mut params = GemstoneParameters::default();
        assert_eq!(params.set(Parameter::CrownFacets, 7.0).unwrap(), 8.0);
        assert_eq!(params.crown_facets, 8);
        assert_eq!(params.set(Parameter::CrownFacets, 1.0).unwrap(), 4.0);
        assert_eq!(params.set(Parameter::CrownFacets, 1000.0).unwrap(), 300.0);
    }

    #[test]
    fn test_table_diameter_bounded_by_pavilion() {
        let mut params = GemstoneParameters::default();
        assert_eq!(params.set(Parameter::TableDiameter, 500.0).unwrap(), 200.0);

        params.set(Parameter::TableDiameter, 150.0).unwrap();
        params.set(Parameter::PavilionDiameter, 120.0).unwrap();
        assert_eq!(params.table_diameter, 120.0);
        assert!(params.validate().is_ok());
    }

    #[test]
    fn test_set_rejects_non_finite() {
        let mut params = GemstoneParameters::default();
        assert!(params.set(Parameter::TableHeight, f64::INFINITY).is_err());
        assert_eq!(params.table_height, 13.0);
    }

    #[test]
    fn test_nudge_moves_by_step() {
        let mut params = GemstoneParameters::default();
        params.nudge(Parameter::PavilionFacets, 1).unwrap();
        assert_eq!(params.pavilion_facets, 18);
        params.nudge(Parameter::CrownHeight, -10).unwrap();
        assert_eq!(params.crown_height, 1.0);
    }

    #[test]
    fn test_parameter_names_parse() {
        assert_eq!("table_diameter".parse::<Parameter>().unwrap(), Parameter::TableDiameter);
        assert_eq!("crownFacets".parse::<Parameter>().unwrap(), Parameter::CrownFacets);
        assert_eq!("pavilion-height".parse::<Parameter>().unwrap(), Parameter::PavilionHeight);
        assert!("girdle".parse::<Parameter>().is_err());
    }

    #[test]
    fn test_parameter_offset_wraps() {
        assert_eq!(Parameter::TableDiameter.offset(-1), Parameter::PavilionFacets);
        assert_eq!(Parameter::PavilionFacets.offset(1), Parameter::TableDiameter);
    }
}
