/// On-screen summary of the computed angles and facet counts
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::model::{Part, TiltAngles};
use crate::params::GemstoneParameters;

/// Degrees with two decimals and a degree sign
pub fn format_angle(degrees: f64) -> String {
    format!("{:.2}°", degrees)
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReadoutLine {
    pub label: String,
    pub value: String,
}

impl fmt::Display for ReadoutLine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.label, self.value)
    }
}

/// Three inclination lines followed by three facet-count lines
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Readout {
    pub angles: TiltAngles,
    pub lines: Vec<ReadoutLine>,
}

impl Readout {
    pub fn new(angles: TiltAngles, params: &GemstoneParameters) -> Self {
        let mut lines = Vec::with_capacity(6);
        for part in Part::ALL {
            lines.push(ReadoutLine {
                label: format!("{} inclination", part.label()),
                value: format_angle(angles.get(part)),
            });
        }
        for (part, facets) in [
            (Part::Table, params.table_facets),
            (Part::Crown, params.crown_facets),
            (Part::Pavilion, params.pavilion_facets),
        ] {
            lines.push(ReadoutLine {
                label: format!("{} facets", part.label()),
                value: facets.to_string(),
            });
        }
        Self { angles, lines }
    }
}

impl fmt::Display for Readout {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for line in &self.lines {
            writeln!(f, "{}", line)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_angle_format() {
        assert_eq!(format_angle(45.0), "45.00°");
        assert_eq!(format_angle(53.130102), "53.13°");
    }

    #[test]
    fn test_readout_lines() {
        let params = GemstoneParameters {
            pavilion_facets: 24,
            ..Default::default()
        };
        let readout = Readout::new(TiltAngles::from_params(&params), &params);
        assert_eq!(readout.lines.len(), 6);
        assert_eq!(readout.lines[2].to_string(), "Pavilion inclination: 53.13°");
        assert_eq!(readout.lines[5].to_string(), "Pavilion facets: 24");
        assert!(readout.to_string().starts_with("Table inclination: 82.59°\n"));
    }
}
