use clap::{Args, Parser, Subcommand};
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use survey_dxf::{
    crs::{ElevationModel, Geodetic},
    io::{ArtifactDirs, DEFAULT_CSV_NAME, DEFAULT_DXF_NAME},
    pipeline::convert,
    ConversionOptions, ConvertError, PipelineKind, Projector, Table,
};

#[derive(Parser)]
#[command(name = "survey_dxf_cli", version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Convert point CSV files with Latitude, Longitude and Elevation columns.
    Points(ConvertArgs),
    /// Convert CSV files with a tagged Geometry column (points, lines, polygons).
    Geometry(ConvertArgs),
    /// Project a single WGS84 coordinate to Maryland state plane feet.
    Project {
        #[arg(allow_negative_numbers = true)]
        lon: f64,
        #[arg(allow_negative_numbers = true)]
        lat: f64,
        /// Height in meters.
        #[arg(default_value_t = 0.0, allow_negative_numbers = true)]
        height: f64,
        /// Instrument height in meters.
        #[arg(long, default_value_t = 0.0)]
        instrument_height: f64,
        /// Geoid offset in meters added before the instrument correction.
        #[arg(long, default_value_t = 0.0, allow_negative_numbers = true)]
        geoid_offset: f64,
    },
}

#[derive(Args)]
struct ConvertArgs {
    /// Input CSV files.
    #[arg(required = true)]
    inputs: Vec<PathBuf>,
    /// Output DXF drawing.
    #[arg(long, default_value = DEFAULT_DXF_NAME)]
    dxf: PathBuf,
    /// Output CSV summary.
    #[arg(long, default_value = DEFAULT_CSV_NAME)]
    csv: PathBuf,
    /// JSON file with conversion options.
    #[arg(long)]
    config: Option<PathBuf>,
    /// Half-width of point markers.
    #[arg(long)]
    size: Option<f64>,
    /// Label text height.
    #[arg(long)]
    text_size: Option<f64>,
    /// Geoid offset in meters.
    #[arg(long, allow_negative_numbers = true)]
    geoid_offset: Option<f64>,
    /// Instrument height in meters for rows without one.
    #[arg(long)]
    instrument_height: Option<f64>,
    /// Elevation of line and polygon outlines.
    #[arg(long, allow_negative_numbers = true)]
    baseline: Option<f64>,
}

impl ConvertArgs {
    fn options(&self, kind: PipelineKind) -> Result<ConversionOptions, ConvertError> {
        let mut options = match &self.config {
            Some(path) => ConversionOptions::load(path)?,
            None => kind.default_options(),
        };
        if let Some(size) = self.size {
            options.display.marker_size = size;
        }
        if let Some(text) = self.text_size {
            options.display.text_height = text;
        }
        if let Some(offset) = self.geoid_offset {
            options.elevation = ElevationModel::with_geoid_offset(offset);
        }
        if let Some(ht) = self.instrument_height {
            options.default_instrument_height = ht;
        }
        if let Some(baseline) = self.baseline {
            options.baseline_elevation = baseline;
        }
        options.validate()?;
        Ok(options)
    }
}

fn output_dir(path: &Path) -> Option<&Path> {
    path.parent().filter(|p| !p.as_os_str().is_empty())
}

fn run_conversion(kind: PipelineKind, args: &ConvertArgs) -> Result<(), ConvertError> {
    let options = args.options(kind)?;
    let projector = Projector::maryland()?;
    let tables = args
        .inputs
        .iter()
        .map(|p| Table::from_path(p))
        .collect::<Result<Vec<_>, _>>()?;
    let conversion = convert(kind, &tables, &projector, &options)?;
    let artifacts = conversion.write_artifacts(ArtifactDirs {
        drawing: output_dir(&args.dxf),
        summary: output_dir(&args.csv),
    })?;
    let (dxf, csv) = artifacts.persist(&args.dxf, &args.csv)?;
    let report = &conversion.report;
    println!(
        "Converted {} of {} rows ({} rejected, {} projection failures)",
        report.records_written, report.rows_read, report.rows_rejected, report.projection_failures
    );
    for skipped in &report.files_skipped {
        println!("Skipped {}: no Geometry column", skipped);
    }
    println!("Wrote {}", dxf.display());
    println!("Wrote {}", csv.display());
    Ok(())
}

fn run(cli: Cli) -> Result<(), ConvertError> {
    match cli.command {
        Commands::Points(args) => run_conversion(PipelineKind::Points, &args),
        Commands::Geometry(args) => run_conversion(PipelineKind::Geometry, &args),
        Commands::Project {
            lon,
            lat,
            height,
            instrument_height,
            geoid_offset,
        } => {
            let projector = Projector::maryland()?;
            let p = projector.project(
                Geodetic::new(lon, lat, height),
                instrument_height,
                &ElevationModel::with_geoid_offset(geoid_offset),
            )?;
            println!("{:.3},{:.3},{:.3}", p.x, p.y, p.z);
            Ok(())
        }
    }
}

fn main() -> ExitCode {
    env_logger::Builder::from_default_env().init();
    let cli = Cli::parse();
    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {}", e);
            ExitCode::FAILURE
        }
    }
}
