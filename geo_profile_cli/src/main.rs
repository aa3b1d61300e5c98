use std::path::{Path, PathBuf};
use std::process::ExitCode;

use clap::{Args, Parser, Subcommand};
use log::info;

use geo_profile::{
    config::{read_config_json, SessionConfig},
    io::{read_click_events, read_reference_line_geojson},
    materials::read_material_table_csv,
    render::svg::write_svg,
    ClickEvent, DrawingSurface, JsonRecordReader, MaterialTable, MeasurementCollection,
    ProfileSession, RecordKind, Result, SegmentLog,
};

/// Geotechnical longitudinal profiles from CPTs and boreholes.
#[derive(Parser)]
#[command(name = "geo_profile_cli", version)]
struct Cli {
    /// Log at debug level unless RUST_LOG says otherwise
    #[arg(long, short, global = true)]
    verbose: bool,
    #[command(subcommand)]
    command: Commands,
}

/// Measurement and line inputs shared by all commands.
#[derive(Args)]
struct Inputs {
    /// Reference line as GeoJSON
    #[arg(long)]
    line: PathBuf,
    /// CPT record files
    #[arg(long, num_args = 1..)]
    cpts: Vec<PathBuf>,
    /// Borehole record files
    #[arg(long, num_args = 1..)]
    bores: Vec<PathBuf>,
    /// Session settings as JSON
    #[arg(long)]
    config: Option<PathBuf>,
}

#[derive(Subcommand)]
enum Commands {
    /// Print the position of every measurement along the line.
    Project {
        #[command(flatten)]
        inputs: Inputs,
    },
    /// Print the ground-level track.
    GroundLevel {
        #[command(flatten)]
        inputs: Inputs,
        /// Print distances as fractions of the line length
        #[arg(long)]
        normalized: bool,
    },
    /// Write the digitizing backdrop as SVG, with the segments of a
    /// recorded click stream.
    Canvas {
        #[command(flatten)]
        inputs: Inputs,
        /// Recorded click events as JSON
        #[arg(long)]
        clicks: Option<PathBuf>,
        #[arg(long, default_value = "canvas.svg")]
        output: PathBuf,
    },
    /// Replay a click stream and export the geometry file and profile
    /// images.
    Digitize {
        #[command(flatten)]
        inputs: Inputs,
        /// Recorded click events as JSON
        #[arg(long)]
        clicks: PathBuf,
        /// Material table (CSV, or xlsx when built with the xlsx feature)
        #[arg(long)]
        layers: PathBuf,
        /// Label used in the image file names
        #[arg(long, default_value = "profile")]
        label: String,
        /// Geometry file path, overrides the config
        #[arg(long)]
        geometry: Option<PathBuf>,
        /// Image directory, overrides the config
        #[arg(long)]
        image_dir: Option<PathBuf>,
    },
}

fn load_config(inputs: &Inputs) -> Result<SessionConfig> {
    match &inputs.config {
        Some(path) => read_config_json(path),
        None => Ok(SessionConfig::default()),
    }
}

fn load_materials(path: &Path) -> Result<MaterialTable> {
    let is_xlsx = path
        .extension()
        .and_then(|e| e.to_str())
        .is_some_and(|e| e.eq_ignore_ascii_case("xlsx"));
    if !is_xlsx {
        return read_material_table_csv(path);
    }
    #[cfg(feature = "xlsx")]
    {
        geo_profile::materials::read_material_table_xlsx(path)
    }
    #[cfg(not(feature = "xlsx"))]
    {
        Err(geo_profile::ProfileError::Spreadsheet(
            "built without xlsx support".to_string(),
        ))
    }
}

fn open_session(
    inputs: &Inputs,
    config: SessionConfig,
    materials: Option<MaterialTable>,
) -> Result<ProfileSession> {
    let line = read_reference_line_geojson(&inputs.line)?;
    let mut measurements = MeasurementCollection::new();
    let reader = JsonRecordReader;
    measurements.load_multi(&inputs.cpts, RecordKind::Cpt, &reader)?;
    measurements.load_multi(&inputs.bores, RecordKind::Borehole, &reader)?;
    info!("loaded {} measurements", measurements.len());
    ProfileSession::new(config, line, &measurements, materials)
}

fn run(command: Commands) -> Result<()> {
    match command {
        Commands::Project { inputs } => {
            let session = open_session(&inputs, load_config(&inputs)?, None)?;
            println!("Line length: {:.3}", session.line().length());
            for p in session.profiles() {
                println!(
                    "{}\tstation {:.3}\tfraction {:.4}\toffset {:.3}",
                    p.profile.id(),
                    p.station(),
                    p.fraction(),
                    p.projection.offset
                );
            }
        }
        Commands::GroundLevel { inputs, normalized } => {
            let session = open_session(&inputs, load_config(&inputs)?, None)?;
            let track = session.ground_level();
            let points = if normalized {
                track.normalized()
            } else {
                track.absolute()
            };
            for p in points {
                println!("{:.4},{:.3}", p.x, p.y);
            }
        }
        Commands::Canvas {
            inputs,
            clicks,
            output,
        } => {
            let session = open_session(&inputs, load_config(&inputs)?, None)?;
            let mut log = SegmentLog::new();
            if let Some(clicks) = clicks {
                let mut digitizer = session.digitizer();
                for event in read_click_events(&clicks)? {
                    if event == ClickEvent::Finish {
                        break;
                    }
                    if let Some(change) = digitizer.apply(event) {
                        log.apply(&change);
                    }
                }
            }
            write_svg(&output, &session.backdrop(&log)?)?;
            println!("Wrote {}", output.display());
        }
        Commands::Digitize {
            inputs,
            clicks,
            layers,
            label,
            geometry,
            image_dir,
        } => {
            let mut config = load_config(&inputs)?;
            if let Some(path) = geometry {
                config.geometry_path = path;
            }
            if let Some(dir) = image_dir {
                config.image_dir = dir;
            }
            let materials = load_materials(&layers)?;
            let session = open_session(&inputs, config, Some(materials))?;
            let events = read_click_events(&clicks)?;
            let geometry = session.run(events, &mut SegmentLog::new())?;
            let files = session.export(&geometry, &label)?;
            println!(
                "Wrote {} boundaries and {} layers to {}",
                geometry.boundaries.len(),
                geometry.layer_count(),
                files.geometry.display()
            );
            println!("Wrote {}", files.svg.display());
            println!("Wrote {}", files.png.display());
        }
    }
    Ok(())
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    let level = if cli.verbose { "debug" } else { "warn" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level)).init();
    match run(cli.command) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {e}");
            ExitCode::FAILURE
        }
    }
}
