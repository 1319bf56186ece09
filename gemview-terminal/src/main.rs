/// gemview terminal - interactive faceted gemstone model
///
/// Controls:
///   - Tab / Shift-Tab: select a control
///   - + / -: step the selected control (PageUp/PageDown for 10 steps)
///   - 1-4 or T/P/B/G: top, profile, bottom, global view
///   - WASD / Arrow Keys: orbit the camera, Z/X: zoom
///   - Q/ESC: Quit

use std::fs::File;
use std::io;
use std::path::PathBuf;
use std::sync::Mutex;

use clap::Parser;
use gemview_core::{GemstoneParameters, Parameter, ViewPreset, Viewer};
use gemview_terminal::{gem_to_io, TerminalApp};
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "gemview-terminal", version, about = "Faceted gemstone model in the terminal")]
struct Args {
    /// Table top diameter in mm
    #[arg(long)]
    table_diameter: Option<f64>,

    /// Pavilion (girdle) diameter in mm
    #[arg(long)]
    pavilion_diameter: Option<f64>,

    /// Table thickness in mm
    #[arg(long)]
    table_height: Option<f64>,

    /// Crown height in mm
    #[arg(long)]
    crown_height: Option<f64>,

    /// Pavilion height in mm
    #[arg(long)]
    pavilion_height: Option<f64>,

    #[arg(long)]
    table_facets: Option<u32>,

    #[arg(long)]
    crown_facets: Option<u32>,

    #[arg(long)]
    pavilion_facets: Option<u32>,

    /// Initial view: top, profile, bottom or global
    #[arg(long, default_value_t = ViewPreset::Global)]
    view: ViewPreset,

    #[arg(long, default_value_t = 30)]
    fps: u32,

    /// Write logs to this file; nothing is logged otherwise
    #[arg(long)]
    log_file: Option<PathBuf>,

    #[arg(long, env = "RUST_LOG", default_value = "info")]
    log_level: String,
}

impl Args {
    /// Start from the built-in defaults and apply each flag through the
    /// same clamping the interactive controls use.
    fn parameters(&self) -> io::Result<GemstoneParameters> {
        let mut params = GemstoneParameters::default();
        // pavilion first so the table diameter is bounded by the final value
        let overrides = [
            (Parameter::PavilionDiameter, self.pavilion_diameter),
            (Parameter::TableDiameter, self.table_diameter),
            (Parameter::TableHeight, self.table_height),
            (Parameter::CrownHeight, self.crown_height),
            (Parameter::PavilionHeight, self.pavilion_height),
            (Parameter::TableFacets, self.table_facets.map(f64::from)),
            (Parameter::CrownFacets, self.crown_facets.map(f64::from)),
            (Parameter::PavilionFacets, self.pavilion_facets.map(f64::from)),
        ];
        for (param, value) in overrides {
            if let Some(value) = value {
                let applied = params.set(param, value).map_err(gem_to_io)?;
                if applied != value {
                    tracing::warn!(param = param.name(), requested = value, applied, "flag value clamped");
                }
            }
        }
        Ok(params)
    }
}

fn init_logging(args: &Args) -> io::Result<()> {
    let Some(path) = &args.log_file else {
        return Ok(());
    };
    let filter = EnvFilter::try_new(&args.log_level)
        .map_err(|e| io::Error::new(io::ErrorKind::InvalidInput, e))?;
    let file = File::create(path)?;
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .init();
    Ok(())
}

fn main() -> io::Result<()> {
    let args = Args::parse();
    init_logging(&args)?;

    let params = args.parameters()?;
    let viewer = Viewer::new(params, args.view).map_err(gem_to_io)?;
    tracing::info!(?params, view = %args.view, "starting terminal viewer");

    println!("gemview terminal - press Q to quit");

    // Run the terminal app
    let mut app = TerminalApp::new(viewer, args.fps)?;
    app.run()?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_flags_are_clamped_like_controls() {
        let args = Args::parse_from([
            "gemview-terminal",
            "--pavilion-diameter",
            "150.4",
            "--table-diameter",
            "400",
            "--crown-facets",
            "7",
            "--view",
            "top",
        ]);
        let params = args.parameters().unwrap();
        assert_eq!(params.pavilion_diameter, 150.0);
        assert_eq!(params.table_diameter, 150.0);
        assert_eq!(params.crown_facets, 8);
        assert_eq!(params.table_height, 13.0);
        assert_eq!(args.view, ViewPreset::Top);
    }

    #[test]
    fn test_non_finite_flag_rejected() {
        let args = Args::parse_from(["gemview-terminal", "--crown-height", "NaN"]);
        assert_eq!(args.parameters().unwrap_err().kind(), io::ErrorKind::InvalidInput);
    }
}
