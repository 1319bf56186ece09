/// gemview core library - gemstone geometry and viewing logic
///
/// Stateless geometry for a three-part faceted gemstone (table, crown,
/// pavilion), the named view presets, camera math, and the viewer state that
/// the terminal and web front-ends drive.

pub mod error;
pub mod geometry;
pub mod model;
pub mod params;
pub mod primitives;
pub mod projection;
pub mod readout;
pub mod scene;
pub mod transform;
pub mod view;

// Re-export commonly used types
pub use error::{GemError, Result};
pub use geometry::{FillMaterial, LineStyle, Mesh, Rgb, Triangle, Vertex, Wireframe};
pub use model::{tilt_angle, GemstoneGeometry, GeometryCache, Part, Solid, SolidDescriptor, StackLayout, TiltAngles};
pub use params::{GemstoneParameters, Parameter, ParameterBounds};
pub use primitives::{RevolvedSolid, SolidKind};
pub use projection::Camera;
pub use readout::Readout;
pub use scene::{Frame, Viewer};
pub use transform::{OrbitState, Transform};
pub use view::{CameraAngles, ViewPreset, ViewResolution, Visibility};
