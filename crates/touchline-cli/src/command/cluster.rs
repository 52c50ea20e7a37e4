use std::path::PathBuf;

use anyhow::Context as _;
use chrono::Utc;
use rand::Rng as _;
use serde_json::Value;
use touchline_analytics::{
    clustering::{self, ClusterOptions, DEFAULT_MAX_ITERATIONS, Point2D},
    sampling,
    seed::ClusterSeed,
};
use tracing::{info, warn};

use crate::{
    schema::cluster::{ClusterReport, ClusterRun},
    util::{self, ReportWriter},
};

#[derive(Debug, Clone, clap::Args)]
pub(crate) struct ClusterArg {
    /// Path to a JSON array of `{"x": ..., "y": ..., "payload": ...}` points
    input: PathBuf,
    /// Number of randomly initialized clusters
    #[arg(long, conflicts_with = "centroids", required_unless_present = "centroids")]
    k: Option<usize>,
    /// Path to a JSON array of `{"id": ..., "x": ..., "y": ...}` initial centroids
    #[arg(long)]
    centroids: Option<PathBuf>,
    /// Maximum number of update steps
    #[arg(long, default_value_t = DEFAULT_MAX_ITERATIONS)]
    max_iterations: usize,
    /// Seed as 32 hex characters (random if omitted)
    #[arg(long)]
    seed: Option<ClusterSeed>,
    /// Percentage of the input points to cluster
    #[arg(long, default_value_t = 100.0)]
    sample_percent: f64,
    /// Allow random centroids on the x == 0 or y == 0 axes
    #[arg(long)]
    allow_axis_zero: bool,
    /// Output file path (stdout if omitted)
    #[arg(long)]
    output: Option<PathBuf>,
}

impl ClusterArg {
    fn cluster_options(&self) -> anyhow::Result<ClusterOptions> {
        let options = match (&self.centroids, self.k) {
            (Some(path), _) => ClusterOptions::fixed(util::read_centroids_file(path)?),
            (None, Some(k)) => ClusterOptions::random(k),
            (None, None) => anyhow::bail!("either --k or --centroids is required"),
        };
        Ok(options
            .with_max_iterations(self.max_iterations)
            .with_reject_axis_zero(!self.allow_axis_zero))
    }
}

pub(crate) fn run(arg: &ClusterArg) -> anyhow::Result<()> {
    let options = arg.cluster_options()?;
    let inputs = util::read_points_file(&arg.input)?;
    let input_points = inputs.len();
    let all_points = inputs.into_iter().map(Point2D::from).collect::<Vec<_>>();

    let seed = arg.seed.unwrap_or_else(|| rand::rng().random());
    let mut rng = seed.rng();

    let points = sampling::sample_percent(&all_points, arg.sample_percent, &mut rng)
        .into_iter()
        .cloned()
        .collect::<Vec<Point2D<Value>>>();
    info!(
        input_points,
        sampled_points = points.len(),
        k = options.cluster_count(),
        %seed,
        "points loaded"
    );

    let result = clustering::cluster_with_rng(&points, &options, &mut rng)
        .context("Failed to cluster points")?;
    if result.is_converged() {
        info!(iterations = result.iterations(), "clustering converged");
    } else {
        warn!(
            max_iterations = options.max_iterations,
            "clustering stopped at the iteration cap without converging"
        );
    }

    let run = ClusterRun {
        generated_at: Utc::now(),
        seed,
        input_points,
        max_iterations: options.max_iterations,
    };
    let report = ClusterReport::new(run, &points, &result);
    ReportWriter::create(arg.output.as_deref())?.write_report(&report)
}
