//! Session diagnostics: timing and counts for each stage.
//!
//! A [`MazeSession`](crate::MazeSession) records one
//! [`StageDiagnostics`] per stage it runs: extraction on every load,
//! thinning when the skeleton is built, and search on every solve.
//! Later runs of a stage replace the earlier entry.
//!
//! Duration measurements use [`std::time::Duration`] (platform-agnostic).
//! Timestamps are captured via the `web-time` crate, which uses
//! `performance.now()` on WASM and `std::time::Instant` on native.
//!
//! Durations are serialized as fractional seconds (`f64`) for JSON
//! compatibility, since `std::time::Duration` does not implement serde
//! traits.

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::extract::Extraction;
use crate::skeleton::Thinning;
use crate::types::{Bounds, Cell, Status};

/// Serde support for `std::time::Duration` as fractional seconds.
pub(crate) mod duration_serde {
    use std::time::Duration;

    use serde::{Deserialize, Deserializer, Serialize, Serializer};

    /// Serialize a `Duration` as fractional seconds (`f64`).
    pub fn serialize<S: Serializer>(duration: &Duration, serializer: S) -> Result<S::Ok, S::Error> {
        duration.as_secs_f64().serialize(serializer)
    }

    /// Deserialize a `Duration` from fractional seconds (`f64`).
    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Duration, D::Error> {
        let secs = f64::deserialize(deserializer)?;
        Duration::try_from_secs_f64(secs).map_err(|_| {
            serde::de::Error::custom(
                "duration seconds must be finite, non-negative, and representable as a Duration",
            )
        })
    }
}

/// Diagnostics collected over the life of one loaded image.
///
/// `skeletonize` and `solve` are `None` until those stages have run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PipelineDiagnostics {
    /// Grid extraction, run on load.
    pub extract: StageDiagnostics,
    /// Most recent thinning.
    pub skeletonize: Option<StageDiagnostics>,
    /// Most recent search.
    pub solve: Option<StageDiagnostics>,
    /// Summary of the loaded image.
    pub summary: PipelineSummary,
}

/// Diagnostics for a single stage.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StageDiagnostics {
    /// Wall-clock duration of this stage (seconds).
    #[serde(with = "duration_serde")]
    pub duration: Duration,
    /// Stage-specific metrics.
    pub metrics: StageMetrics,
}

/// Stage-specific metrics.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum StageMetrics {
    /// Grid extraction metrics.
    Extract {
        /// Source image width before downscaling.
        source_width: u32,
        /// Source image height before downscaling.
        source_height: u32,
        /// Grid width.
        grid_width: u32,
        /// Grid height.
        grid_height: u32,
        /// Whether downscaling was applied.
        downsampled: bool,
        /// Binarization level.
        threshold_level: u8,
        /// Detected content box.
        bounds: Bounds,
        /// Passable cells in the grid.
        passable_cells: usize,
    },
    /// Thinning metrics.
    Skeletonize {
        /// Full thinning iterations.
        iterations: usize,
        /// Passable cells before thinning.
        cells_before: usize,
        /// Passable cells after thinning.
        cells_after: usize,
    },
    /// Search metrics.
    Solve {
        /// Start as picked by the user.
        requested_start: Cell,
        /// End as picked by the user.
        requested_end: Cell,
        /// Start after snapping.
        start: Cell,
        /// End after snapping.
        end: Cell,
        /// Cells discovered by the search.
        visited_cells: usize,
        /// Cells on the path (0 when none was found).
        path_cells: usize,
        /// Search outcome.
        status: Status,
    },
}

/// High-level summary of the loaded image.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PipelineSummary {
    /// Grid width in cells.
    pub grid_width: u32,
    /// Grid height in cells.
    pub grid_height: u32,
    /// Passable cells in the extracted grid.
    pub extracted_cells: usize,
}

impl PipelineDiagnostics {
    /// Start a record for a freshly extracted image.
    pub(crate) fn from_extraction(extraction: &Extraction, duration: Duration) -> Self {
        let passable_cells = extraction.grid.passable_count();
        Self {
            extract: StageDiagnostics {
                duration,
                metrics: StageMetrics::Extract {
                    source_width: extraction.source_dimensions.width,
                    source_height: extraction.source_dimensions.height,
                    grid_width: extraction.grid.width(),
                    grid_height: extraction.grid.height(),
                    downsampled: extraction.downsampled,
                    threshold_level: extraction.threshold_level,
                    bounds: extraction.bounds,
                    passable_cells,
                },
            },
            skeletonize: None,
            solve: None,
            summary: PipelineSummary {
                grid_width: extraction.grid.width(),
                grid_height: extraction.grid.height(),
                extracted_cells: passable_cells,
            },
        }
    }

    /// Record a thinning run.
    pub(crate) fn record_thinning(&mut self, thinning: &Thinning, duration: Duration) {
        self.skeletonize = Some(StageDiagnostics {
            duration,
            metrics: StageMetrics::Skeletonize {
                iterations: thinning.iterations,
                cells_before: self.summary.extracted_cells,
                cells_after: thinning.grid.passable_count(),
            },
        });
    }

    /// Sum of all recorded stage durations.
    #[must_use]
    pub fn total_duration(&self) -> Duration {
        self.stages().map(|(_, stage)| stage.duration).sum()
    }

    /// Recorded stages in execution order.
    fn stages(&self) -> impl Iterator<Item = (&'static str, &StageDiagnostics)> {
        [
            Some(("Extract", &self.extract)),
            self.skeletonize.as_ref().map(|s| ("Skeletonize", s)),
            self.solve.as_ref().map(|s| ("Solve", s)),
        ]
        .into_iter()
        .flatten()
    }

    /// Format diagnostics as a human-readable report.
    #[must_use]
    pub fn report(&self) -> String {
        let mut lines = Vec::new();

        lines.push(format!("Maze Diagnostics Report\n{}", "=".repeat(60)));
        lines.push(format!(
            "Grid: {}x{} ({} passable cells)",
            self.summary.grid_width, self.summary.grid_height, self.summary.extracted_cells,
        ));
        let total_ms = duration_ms(self.total_duration());
        lines.push(format!("Total duration: {total_ms:.3}ms"));
        lines.push(String::new());

        lines.push(format!(
            "{:<16} {:>10} {:>10}  {}",
            "Stage", "Duration", "% Total", "Details"
        ));
        lines.push("-".repeat(80));

        for (name, diag) in self.stages() {
            let ms = duration_ms(diag.duration);
            let pct = if total_ms > 0.0 {
                ms / total_ms * 100.0
            } else {
                0.0
            };
            let details = format_metrics(&diag.metrics);
            lines.push(format!("{name:<16} {ms:>8.3}ms {pct:>9.1}%  {details}"));
        }

        lines.join("\n")
    }
}

/// Convert a `Duration` to milliseconds as `f64`.
fn duration_ms(d: Duration) -> f64 {
    d.as_secs_f64() * 1000.0
}

/// Format stage metrics into a compact detail string.
fn format_metrics(metrics: &StageMetrics) -> String {
    match metrics {
        StageMetrics::Extract {
            source_width,
            source_height,
            grid_width,
            grid_height,
            threshold_level,
            bounds,
            passable_cells,
            ..
        } => format!(
            "{source_width}x{source_height} -> {grid_width}x{grid_height} level={threshold_level} \
             bounds=({},{})-({},{}) passable={passable_cells}",
            bounds.left, bounds.top, bounds.right, bounds.bottom,
        ),
        StageMetrics::Skeletonize {
            iterations,
            cells_before,
            cells_after,
        } => format!("{iterations} iterations, {cells_before}->{cells_after} cells"),
        StageMetrics::Solve {
            start,
            end,
            visited_cells,
            path_cells,
            status,
            ..
        } => {
            let (sx, sy) = start.xy();
            let (ex, ey) = end.xy();
            format!(
                "({sx},{sy})->({ex},{ey}) visited={visited_cells} path={path_cells} {status:?}"
            )
        }
    }
}
