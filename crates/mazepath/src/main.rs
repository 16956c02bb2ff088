//! mazepath: solve a photographed maze from the command line.
//!
//! Loads an image, extracts the traversability grid, optionally thins
//! it, solves between two points and plays the search animation onto a
//! canvas. Prints timings and the outcome, and can write the final
//! side-by-side image, every animation frame, and stage diagnostics.
//!
//! # Usage
//!
//! ```text
//! cargo run --release --bin mazepath -- maze.jpg --start 12,40 --end 610,455 -o solved.png
//! ```
//!
//! Set `RUST_LOG=debug` for per-stage logging.

#![allow(clippy::print_stdout, clippy::print_stderr)]

use std::path::{Path, PathBuf};
use std::process::ExitCode;

use clap::{Parser, ValueEnum};
use mazepath_pipeline::{
    Dimensions, DownsampleFilter, MazeSession, PipelineConfig, Status, ThresholdMethod,
    format_seconds,
};
use mazepath_render::Canvas;

/// Solve a maze image and render the search.
///
/// Points are given in pixels of the input image; they are scaled to
/// the working resolution before being placed.
#[derive(Parser)]
#[command(name = "mazepath", version)]
struct Cli {
    /// Path to the maze image (PNG, JPEG, BMP, WebP, TIFF).
    image_path: PathBuf,

    /// Start point as "X,Y".
    #[arg(long, value_name = "X,Y", value_parser = parse_point)]
    start: Option<(u32, u32)>,

    /// End point as "X,Y".
    #[arg(long, value_name = "X,Y", value_parser = parse_point)]
    end: Option<(u32, u32)>,

    /// Search the extracted grid directly instead of its skeleton.
    #[arg(long)]
    no_skeleton: bool,

    /// Binarization method.
    #[arg(long, value_enum, default_value_t = Threshold::Otsu)]
    threshold: Threshold,

    /// Fraction of the mean intensity used by `--threshold mean`.
    #[arg(long, default_value_t = ThresholdMethod::DEFAULT_MEAN_RATIO)]
    mean_ratio: f64,

    /// Longest image side after downscaling.
    #[arg(long, default_value_t = PipelineConfig::DEFAULT_MAX_DIMENSION, value_parser = clap::builder::RangedU64ValueParser::<u32>::new().range(1..))]
    max_dimension: u32,

    /// Downsample filter.
    #[arg(long, value_enum, default_value_t = Filter::Lanczos3)]
    downsample_filter: Filter,

    /// Median filter radius (0 disables smoothing).
    #[arg(long, default_value_t = PipelineConfig::DEFAULT_MEDIAN_RADIUS)]
    median_radius: u32,

    /// Half-width of the window searched when snapping points.
    #[arg(long, default_value_t = PipelineConfig::DEFAULT_SNAP_RADIUS)]
    snap_radius: u32,

    /// Visited cells painted per animation frame.
    #[arg(long, default_value_t = mazepath_pipeline::AnimationStyle::DEFAULT_CHUNK_SIZE, value_parser = clap::builder::RangedU64ValueParser::<usize>::new().range(1..))]
    chunk_size: usize,

    /// Full pipeline config as a JSON string.
    ///
    /// When provided, all other pipeline parameter flags are ignored.
    /// The JSON must be a valid `PipelineConfig` serialization; missing
    /// fields take their defaults.
    #[arg(long)]
    config_json: Option<String>,

    /// Write the final display and maze images side by side (PNG).
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Write animation frames into this directory.
    #[arg(long)]
    frames_dir: Option<PathBuf>,

    /// Keep every Nth animation frame (the last one is always kept).
    #[arg(long, default_value_t = 1, value_parser = clap::builder::RangedU64ValueParser::<usize>::new().range(1..))]
    frame_stride: usize,

    /// Print diagnostics as JSON instead of a human-readable report.
    #[arg(long)]
    json: bool,
}

/// Binarization method selection.
#[derive(Clone, Copy, ValueEnum)]
enum Threshold {
    /// Otsu's between-class variance maximum.
    Otsu,
    /// Fixed fraction of the mean intensity.
    Mean,
}

/// Downsample resampling filter selection.
#[derive(Clone, Copy, ValueEnum)]
enum Filter {
    /// Nearest-neighbor (fastest, blocky).
    Nearest,
    /// Bilinear interpolation.
    Triangle,
    /// Bicubic Catmull-Rom.
    CatmullRom,
    /// Gaussian.
    Gaussian,
    /// Lanczos with 3 lobes (slowest, sharpest).
    Lanczos3,
}

/// Parse `"X,Y"` into a pixel coordinate.
fn parse_point(s: &str) -> Result<(u32, u32), String> {
    let (x, y) = s
        .split_once(',')
        .ok_or_else(|| format!("point must be 'X,Y', got: '{s}'"))?;
    let x = x
        .trim()
        .parse()
        .map_err(|e| format!("invalid X '{x}': {e}"))?;
    let y = y
        .trim()
        .parse()
        .map_err(|e| format!("invalid Y '{y}': {e}"))?;
    Ok((x, y))
}

/// Build a [`PipelineConfig`] from CLI arguments.
///
/// If `--config-json` is provided, the JSON is parsed directly and all
/// individual parameter flags are ignored.
fn config_from_cli(cli: &Cli) -> Result<PipelineConfig, String> {
    if let Some(ref json) = cli.config_json {
        return serde_json::from_str(json).map_err(|e| format!("Error parsing --config-json: {e}"));
    }

    let mut config = PipelineConfig {
        max_dimension: cli.max_dimension,
        downsample_filter: match cli.downsample_filter {
            Filter::Nearest => DownsampleFilter::Nearest,
            Filter::Triangle => DownsampleFilter::Triangle,
            Filter::CatmullRom => DownsampleFilter::CatmullRom,
            Filter::Gaussian => DownsampleFilter::Gaussian,
            Filter::Lanczos3 => DownsampleFilter::Lanczos3,
        },
        median_radius: cli.median_radius,
        threshold: match cli.threshold {
            Threshold::Otsu => ThresholdMethod::Otsu,
            Threshold::Mean => ThresholdMethod::MeanRatio {
                ratio: cli.mean_ratio,
            },
        },
        snap_radius: cli.snap_radius,
        ..PipelineConfig::default()
    };
    config.style.chunk_size = cli.chunk_size;
    Ok(config)
}

/// Map a point in source pixels to the working resolution.
fn to_working(point: (u32, u32), source: Dimensions, working: Dimensions) -> (u32, u32) {
    let scale = |v: u32, from: u32, to: u32| {
        if from == 0 {
            v
        } else {
            u32::try_from(u64::from(v) * u64::from(to) / u64::from(from)).unwrap_or(u32::MAX)
        }
    };
    (
        scale(point.0, source.width, working.width),
        scale(point.1, source.height, working.height),
    )
}

fn main() -> ExitCode {
    env_logger::init();
    let cli = Cli::parse();

    let config = match config_from_cli(&cli) {
        Ok(c) => c,
        Err(msg) => {
            eprintln!("{msg}");
            return ExitCode::FAILURE;
        }
    };
    let mut session = match MazeSession::new(config) {
        Ok(s) => s,
        Err(e) => {
            eprintln!("{e}");
            return ExitCode::FAILURE;
        }
    };

    let image_bytes = match std::fs::read(&cli.image_path) {
        Ok(bytes) => bytes,
        Err(e) => {
            eprintln!("Error reading {}: {e}", cli.image_path.display());
            return ExitCode::FAILURE;
        }
    };

    let view = match session.load_bytes(&image_bytes) {
        Ok(view) => view,
        Err(e) => {
            eprintln!("Error loading {}: {e}", cli.image_path.display());
            return ExitCode::FAILURE;
        }
    };
    eprintln!(
        "Loaded {} ({} bytes), working size {}x{}",
        cli.image_path.display(),
        image_bytes.len(),
        view.dimensions.width,
        view.dimensions.height,
    );

    if !cli.no_skeleton
        && let Some((grid, elapsed)) = session.skeletonize()
    {
        eprintln!(
            "Skeleton: {} passable cells in {}",
            grid.passable_count(),
            format_seconds(elapsed),
        );
    }

    let status = match (cli.start, cli.end) {
        (Some(start), Some(end)) => match solve(&mut session, &cli, start, end) {
            Ok(status) => status,
            Err(msg) => {
                eprintln!("{msg}");
                return ExitCode::FAILURE;
            }
        },
        (None, None) => {
            eprintln!("No --start/--end given; skipping solve");
            if let Some(ref path) = cli.output
                && let Err(msg) = write_unsolved(&session, path)
            {
                eprintln!("{msg}");
                return ExitCode::FAILURE;
            }
            Status::Waiting
        }
        _ => {
            eprintln!("--start and --end must be given together");
            return ExitCode::FAILURE;
        }
    };

    if let Some(diagnostics) = session.diagnostics() {
        if cli.json {
            match serde_json::to_string_pretty(diagnostics) {
                Ok(json) => println!("{json}"),
                Err(e) => {
                    eprintln!("Error serializing diagnostics: {e}");
                    return ExitCode::FAILURE;
                }
            }
        } else {
            println!("{}", diagnostics.report());
        }
    }

    eprintln!("Total time: {}", format_seconds(session.total_time()));
    eprintln!("Status: {}", status_label(status));
    ExitCode::SUCCESS
}

/// Place both points, solve, and play the animation onto a canvas.
fn solve(
    session: &mut MazeSession,
    cli: &Cli,
    start: (u32, u32),
    end: (u32, u32),
) -> Result<Status, String> {
    let (source, working) = match (session.extraction(), session.grid()) {
        (Some(extraction), Some(grid)) => (extraction.source_dimensions, grid.dimensions()),
        _ => return Err("No image loaded".to_string()),
    };

    for (name, point) in [("start", start), ("end", end)] {
        let (x, y) = to_working(point, source, working);
        if session.set_point(x, y).is_none() {
            return Err(format!(
                "{name} point {},{} is outside the {}x{} image",
                point.0, point.1, source.width, source.height,
            ));
        }
    }

    let Some(solution) = session.solve() else {
        return Err("Solve did not run".to_string());
    };
    eprintln!(
        "Solve: visited {} cells, path {} cells, {}",
        solution.visited.len(),
        solution.path.len(),
        format_seconds(solution.elapsed),
    );

    let (Some(display), Some(grid)) = (session.display_image(), session.grid()) else {
        return Err("No image loaded".to_string());
    };
    let mut canvas = Canvas::new(display, &grid.to_rgba()).map_err(|e| e.to_string())?;

    if let Some(ref dir) = cli.frames_dir {
        std::fs::create_dir_all(dir)
            .map_err(|e| format!("Error creating {}: {e}", dir.display()))?;
    }

    let mut animation = solution.animation(session.style());
    let frame_count = animation.frame_count();
    let mut emitted = 0;
    let mut written = 0;
    let mut frame_error = None;
    let status = canvas.play(&mut animation, |canvas, _| {
        emitted += 1;
        let Some(ref dir) = cli.frames_dir else {
            return;
        };
        if frame_error.is_some() || (emitted % cli.frame_stride != 0 && emitted != frame_count) {
            return;
        }
        let path = dir.join(format!("frame_{emitted:05}.png"));
        match save_png(&canvas.side_by_side(), &path) {
            Ok(()) => written += 1,
            Err(msg) => frame_error = Some(msg),
        }
    });
    if let Some(msg) = frame_error {
        return Err(msg);
    }
    if let Some(ref dir) = cli.frames_dir {
        eprintln!("Wrote {written} of {frame_count} frames to {}", dir.display());
    }

    if let Some(ref path) = cli.output {
        save_png(&canvas.side_by_side(), path)?;
        eprintln!("Output written to {}", path.display());
    }
    Ok(status)
}

/// Write the loaded image and grid without a solution.
fn write_unsolved(session: &MazeSession, path: &Path) -> Result<(), String> {
    let (Some(display), Some(grid)) = (session.display_image(), session.grid()) else {
        return Err("No image loaded".to_string());
    };
    let canvas = Canvas::new(display, &grid.to_rgba()).map_err(|e| e.to_string())?;
    save_png(&canvas.side_by_side(), path)?;
    eprintln!("Output written to {}", path.display());
    Ok(())
}

fn save_png(image: &image::RgbaImage, path: &Path) -> Result<(), String> {
    image
        .save_with_format(path, image::ImageFormat::Png)
        .map_err(|e| format!("Error writing {}: {e}", path.display()))
}

const fn status_label(status: Status) -> &'static str {
    match status {
        Status::Waiting => "waiting",
        Status::Success => "success (path found)",
        Status::Failure => "failure (no path found)",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_points() {
        assert_eq!(parse_point("12,40"), Ok((12, 40)));
        assert_eq!(parse_point(" 3 , 4 "), Ok((3, 4)));
        assert!(parse_point("12").is_err());
        assert!(parse_point("a,1").is_err());
        assert!(parse_point("-1,1").is_err());
    }

    #[test]
    fn scales_points_to_working_size() {
        let source = Dimensions {
            width: 1024,
            height: 768,
        };
        let working = Dimensions {
            width: 512,
            height: 384,
        };
        assert_eq!(to_working((1023, 100), source, working), (511, 50));
        assert_eq!(to_working((7, 7), working, working), (7, 7));
    }

    #[test]
    fn flags_build_config() {
        let cli = Cli::parse_from([
            "mazepath",
            "maze.png",
            "--threshold",
            "mean",
            "--mean-ratio",
            "0.6",
            "--chunk-size",
            "10",
        ]);
        let config = config_from_cli(&cli).unwrap_or_default();
        assert_eq!(config.threshold, ThresholdMethod::MeanRatio { ratio: 0.6 });
        assert_eq!(config.style.chunk_size, 10);
        assert_eq!(config.max_dimension, PipelineConfig::DEFAULT_MAX_DIMENSION);
    }

    #[test]
    fn config_json_overrides_flags() {
        let cli = Cli::parse_from([
            "mazepath",
            "maze.png",
            "--max-dimension",
            "64",
            "--config-json",
            r#"{"snap_radius": 9}"#,
        ]);
        let config = config_from_cli(&cli).unwrap_or_default();
        assert_eq!(config.snap_radius, 9);
        assert_eq!(config.max_dimension, PipelineConfig::DEFAULT_MAX_DIMENSION);
    }

    #[test]
    fn default_filter_matches_pipeline() {
        let cli = Cli::parse_from(["mazepath", "maze.png"]);
        let config = config_from_cli(&cli).unwrap_or_default();
        assert_eq!(
            config.downsample_filter,
            PipelineConfig::DEFAULT_DOWNSAMPLE_FILTER
        );
    }
}
