//! Terrain grid generator command line entry point
use anyhow::Result;
use clap::{Args, Parser, Subcommand, ValueEnum};
use constants::grid::STATION_START;
use constants::layout::{
    DEFAULT_PLAN_EXTENT, DEFAULT_PLAN_LABEL_EVERY, DEFAULT_PLAN_SPACING, DEFAULT_SURVEY_INTERVAL,
    DEFAULT_SURVEY_STATIONS,
};
use std::path::{Path, PathBuf};
use terrain_grid::TerrainGridGenerator;
use terrain_grid::config::GridConfig;
use terrain_grid::layout::{CoordinateGrid, SurveyDensity, SurveyGrid};
use terrain_grid::scene::{DisplayScale, LineStyle, SceneEmitter, record_scene};
use tracing::info;
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser, Debug)]
#[command(
    name = "terrain-grid",
    version,
    about = "Interpolate XYZ point clouds onto a terrain grid"
)]
struct Cli {
    /// TOML configuration file
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Directory for exports and the manifest (defaults to the input's directory)
    #[arg(long, short, global = true)]
    output_dir: Option<PathBuf>,

    /// Hide progress bars
    #[arg(long, global = true)]
    quiet: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Build the interpolated grid, mesh, scene records and exports
    Grid(GridArgs),
    /// Report coordinate bounds before and after the elevation filter
    Scan(ScanArgs),
    /// Emit survey station markers on every n-th source point
    Stations(StationArgs),
    /// Emit a flat labelled coordinate grid
    Plan(PlanArgs),
    /// Emit a numbered survey station lattice
    Survey(SurveyArgs),
}

#[derive(Args, Debug)]
struct GridArgs {
    input: PathBuf,
    #[arg(long)]
    spacing: Option<f64>,
    #[arg(long)]
    stride: Option<usize>,
    #[arg(long)]
    search_radius: Option<f64>,
    #[arg(long)]
    max_neighbours: Option<usize>,
    /// Write scene records as JSON lines
    #[arg(long)]
    scene: Option<PathBuf>,
    #[arg(long)]
    no_faces: bool,
    #[arg(long)]
    no_labels: bool,
    #[arg(long)]
    no_export: bool,
    /// Scale display positions by the legacy 0.1 factor
    #[arg(long)]
    legacy_scale: bool,
}

#[derive(Args, Debug)]
struct ScanArgs {
    input: PathBuf,
    #[arg(long)]
    elevation_min: Option<f64>,
    #[arg(long)]
    elevation_max: Option<f64>,
}

#[derive(Args, Debug)]
struct StationArgs {
    input: PathBuf,
    #[arg(long, default_value_t = 10)]
    interval: usize,
    #[arg(long, default_value = "STA")]
    prefix: String,
    #[arg(long)]
    scene: Option<PathBuf>,
}

#[derive(Args, Debug)]
struct PlanArgs {
    #[arg(long, default_value_t = DEFAULT_PLAN_EXTENT)]
    width: f64,
    #[arg(long, default_value_t = DEFAULT_PLAN_EXTENT)]
    height: f64,
    #[arg(long, default_value_t = DEFAULT_PLAN_SPACING)]
    spacing: f64,
    #[arg(long, default_value_t = 0.0)]
    start_x: f64,
    #[arg(long, default_value_t = 0.0)]
    start_y: f64,
    /// Label every n-th grid line
    #[arg(long, default_value_t = DEFAULT_PLAN_LABEL_EVERY)]
    label_every: usize,
    #[arg(long)]
    no_labels: bool,
    #[arg(long, value_enum, default_value_t = StyleArg::Thin)]
    style: StyleArg,
    #[arg(long)]
    scene: Option<PathBuf>,
}

#[derive(Args, Debug)]
struct SurveyArgs {
    /// XYZ surface to anchor on and sample station elevations from
    input: Option<PathBuf>,
    #[arg(long, default_value_t = DEFAULT_SURVEY_INTERVAL)]
    interval: f64,
    #[arg(long, value_enum, default_value_t = DensityArg::Standard)]
    density: DensityArg,
    #[arg(long, default_value_t = DEFAULT_SURVEY_STATIONS)]
    stations_x: usize,
    #[arg(long, default_value_t = DEFAULT_SURVEY_STATIONS)]
    stations_y: usize,
    #[arg(long, default_value_t = STATION_START)]
    start_station: u64,
    #[arg(long)]
    scene: Option<PathBuf>,
}

#[derive(ValueEnum, Clone, Copy, Debug)]
enum StyleArg {
    Thin,
    Normal,
    Thick,
}

impl From<StyleArg> for LineStyle {
    fn from(arg: StyleArg) -> Self {
        match arg {
            StyleArg::Thin => LineStyle::Thin,
            StyleArg::Normal => LineStyle::Normal,
            StyleArg::Thick => LineStyle::Thick,
        }
    }
}

#[derive(ValueEnum, Clone, Copy, Debug)]
enum DensityArg {
    Fine,
    Standard,
    Coarse,
}

impl From<DensityArg> for SurveyDensity {
    fn from(arg: DensityArg) -> Self {
        match arg {
            DensityArg::Fine => SurveyDensity::Fine,
            DensityArg::Standard => SurveyDensity::Standard,
            DensityArg::Coarse => SurveyDensity::Coarse,
        }
    }
}

fn main() -> Result<()> {
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| "terrain_grid=info".into()))
        .with(tracing_subscriber::fmt::layer())
        .init();

    let cli = Cli::parse();
    let config = GridConfig::load(cli.config.as_deref())?;
    let output_dir = cli.output_dir.as_deref();

    match cli.command {
        Command::Grid(args) => run_grid(args, config, output_dir, cli.quiet)?,
        Command::Scan(args) => run_scan(args, config, output_dir, cli.quiet)?,
        Command::Stations(args) => {
            let generator = TerrainGridGenerator::new(&args.input, output_dir, config)?
                .with_progress(!cli.quiet);
            record_scene(args.scene.as_deref(), |sink| {
                generator.stations(args.interval, &args.prefix, sink)
            })?;
        }
        Command::Plan(args) => {
            let grid = CoordinateGrid {
                width: args.width,
                height: args.height,
                spacing: args.spacing,
                start: (args.start_x, args.start_y),
                show_labels: config.show_labels && !args.no_labels,
                label_every: args.label_every,
                style: args.style.into(),
            };
            let lines = record_scene(args.scene.as_deref(), |sink| {
                SceneEmitter::new(sink, config.display_scale).coordinate_grid(&grid)
            })?;
            info!("Coordinate grid created with {} lines", lines);
        }
        Command::Survey(args) => {
            let grid = SurveyGrid {
                interval: args.interval,
                density: args.density.into(),
                stations_x: args.stations_x,
                stations_y: args.stations_y,
                start_station: args.start_station,
                ..SurveyGrid::default()
            };
            let scale = config.display_scale;
            let stations = match &args.input {
                Some(input) => {
                    let generator = TerrainGridGenerator::new(input, output_dir, config)?
                        .with_progress(!cli.quiet);
                    record_scene(args.scene.as_deref(), |sink| generator.survey(&grid, sink))?
                }
                None => record_scene(args.scene.as_deref(), |sink| {
                    SceneEmitter::new(sink, scale).survey_grid(&grid, None)
                })?,
            };
            info!("Survey grid created with {} stations", stations);
        }
    }

    Ok(())
}

fn run_grid(
    args: GridArgs,
    mut config: GridConfig,
    output_dir: Option<&Path>,
    quiet: bool,
) -> Result<()> {
    if let Some(spacing) = args.spacing {
        config.spacing = spacing;
    }
    if let Some(stride) = args.stride {
        config.stride = stride;
    }
    if let Some(radius) = args.search_radius {
        config.search_radius = radius;
    }
    if let Some(max) = args.max_neighbours {
        config.max_neighbours = max;
    }
    config.create_faces &= !args.no_faces;
    config.show_labels &= !args.no_labels;
    config.export_coordinates &= !args.no_export;
    if args.legacy_scale {
        config.display_scale = DisplayScale::Legacy;
    }

    let generator =
        TerrainGridGenerator::new(&args.input, output_dir, config)?.with_progress(!quiet);
    let report = record_scene(args.scene.as_deref(), |sink| generator.generate(sink))?;
    info!(
        "Grid {} x {} with {} triangles; manifest at {}",
        report.grid.x_count(),
        report.grid.y_count(),
        report.triangles.len(),
        report.manifest_path.display()
    );
    Ok(())
}

fn run_scan(
    args: ScanArgs,
    mut config: GridConfig,
    output_dir: Option<&Path>,
    quiet: bool,
) -> Result<()> {
    if let Some(min) = args.elevation_min {
        config.elevation_min = min;
    }
    if let Some(max) = args.elevation_max {
        config.elevation_max = max;
    }
    let report = TerrainGridGenerator::new(&args.input, output_dir, config)?
        .with_progress(!quiet)
        .scan()?;
    info!(
        "{} of {} points inside the elevation band",
        report.filtered_points.len(),
        report.point_count
    );
    Ok(())
}
