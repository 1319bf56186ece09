/// Example: print the readout and solid descriptors for a parameter set
///
/// Usage: cargo run --example readout -- [pavilion_height] [view]

use std::env;
use std::io;

use gemview_core::{GemstoneParameters, Parameter, ViewPreset, Viewer};
use gemview_terminal::gem_to_io;

fn main() -> io::Result<()> {
    let args: Vec<String> = env::args().collect();

    let mut params = GemstoneParameters::default();
    if let Some(height) = args.get(1) {
        let height: f64 = height
            .parse()
            .map_err(|e| io::Error::new(io::ErrorKind::InvalidInput, format!("Bad height: {}", e)))?;
        params.set(Parameter::PavilionHeight, height).map_err(gem_to_io)?;
    }

    let mut viewer = Viewer::new(params, ViewPreset::Global).map_err(gem_to_io)?;
    if let Some(view) = args.get(2) {
        viewer.set_view_name(view);
    }

    let frame = viewer.frame().map_err(gem_to_io)?;
    print!("{}", frame.readout);
    println!(
        "camera azimuth {:.3} rad, polar {:.3} rad",
        frame.orbit.azimuth, frame.orbit.polar
    );
    for solid in &frame.solids {
        let d = &solid.descriptor;
        println!(
            "{:<9} {:?}: r_top {:.1} r_bottom {:.1} h {:.1} segments {} | {} triangles, {} edges",
            solid.part().label(),
            d.kind,
            d.radius_top,
            d.radius_bottom,
            d.height,
            d.segments,
            solid.mesh.len(),
            solid.wireframe.len()
        );
    }

    Ok(())
}
