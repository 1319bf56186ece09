/// Error type shared by the gemstone model and its front-ends
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum GemError {
    #[error("{name} must be a positive finite length in mm, got {value}")]
    InvalidDimension { name: &'static str, value: f64 },

    #[error("{name} needs at least 3 facets to form a solid, got {count}")]
    TooFewFacets { name: &'static str, count: u32 },

    #[error("table diameter {table} mm exceeds pavilion diameter {pavilion} mm")]
    TableWiderThanPavilion { table: f64, pavilion: f64 },

    #[error("solid has zero radius at both ends")]
    DegenerateSolid,

    #[error("unknown parameter: {0}")]
    UnknownParameter(String),

    #[error("unknown part: {0}")]
    UnknownPart(String),

    #[error("unknown view: {0}")]
    UnknownView(String),
}

pub type Result<T> = std::result::Result<T, GemError>;
