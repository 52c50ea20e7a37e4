//! K-means clustering of pitch positions.
//!
//! This module partitions 2D points (event locations on the normalized
//! `[0, 100] × [0, 100]` pitch) into k clusters with Lloyd's algorithm.
//!
//! # Algorithm Overview
//!
//! 1. **Initialize** - Use caller-supplied centroids, or draw k random ones
//! 2. **Assign** - Attach each point to its nearest centroid (Euclidean distance)
//! 3. **Update** - Move each centroid to the mean of its points
//! 4. **Repeat** - Until an assignment pass changes nothing, or the iteration cap
//!
//! # Key Components
//!
//! - [`Point2D`] - A location with an opaque payload carried through unchanged
//! - [`Centroid`] - A cluster center with a stable id
//! - [`ClusterOptions`] - Initialization, iteration cap and random-draw policy
//! - [`ClusteringResult`] - Final centroids and per-point assignments
//!
//! # Determinism
//!
//! - Ties between equally distant centroids go to the centroid that comes
//!   first in initialization order.
//! - Fixed centroids make a run fully deterministic.
//! - Random initialization draws from the injected [`Rng`]; pass a seeded
//!   generator (see [`crate::seed::ClusterSeed`]) to reproduce a run.
//!
//! # Output Order
//!
//! Centroids are returned sorted by ascending `x`, so the left-most cluster
//! comes first and colors can be assigned left to right. The ids are never
//! renumbered: assignments refer to [`Centroid::id`], not to positions in the
//! output.
//!
//! # Random Initialization
//!
//! Random centroids are drawn uniformly from `[0, 100)` on both axes. By
//! default a draw with `x == 0` or `y == 0` is rejected and redrawn, which
//! keeps seeded runs compatible with earlier dashboard releases. Set
//! [`ClusterOptions::reject_axis_zero`] to `false` for a plain uniform draw.

use std::collections::HashSet;

use rand::Rng;
use serde::{Deserialize, Serialize};
use tracing::{debug, trace};

/// Side length of the normalized pitch coordinate system.
pub const PITCH_EXTENT: f64 = 100.0;

/// Iteration cap used when none is configured.
pub const DEFAULT_MAX_ITERATIONS: usize = 100;

/// A point on the pitch with caller data attached.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Point2D<P> {
    pub x: f64,
    pub y: f64,
    pub payload: P,
}

impl<P> Point2D<P> {
    #[must_use]
    pub const fn new(x: f64, y: f64, payload: P) -> Self {
        Self { x, y, payload }
    }
}

/// A cluster center.
///
/// The `id` stays fixed for the whole run; only the coordinates move.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Centroid {
    pub id: usize,
    pub x: f64,
    pub y: f64,
}

impl Centroid {
    #[must_use]
    pub const fn new(id: usize, x: f64, y: f64) -> Self {
        Self { id, x, y }
    }

    /// Euclidean distance from this centroid to `(x, y)`.
    #[must_use]
    pub fn distance_to(&self, x: f64, y: f64) -> f64 {
        ((x - self.x).powi(2) + (y - self.y).powi(2)).sqrt()
    }
}

/// How the initial centroids are chosen.
#[derive(Debug, Clone, PartialEq)]
pub enum Initialization {
    /// Draw `k` centroids at random positions, with ids `0..k`.
    Random { k: usize },
    /// Start from these centroids, keeping their ids.
    Fixed(Vec<Centroid>),
}

/// Configuration for [`cluster`] and [`cluster_with_rng`].
#[derive(Debug, Clone, PartialEq)]
pub struct ClusterOptions {
    pub initialization: Initialization,
    /// Maximum number of update steps. Must be at least 1.
    pub max_iterations: usize,
    /// Redraw random centroids that land exactly on `x == 0` or `y == 0`.
    pub reject_axis_zero: bool,
}

impl ClusterOptions {
    /// Options for `k` randomly initialized clusters.
    #[must_use]
    pub fn random(k: usize) -> Self {
        Self::with_initialization(Initialization::Random { k })
    }

    /// Options starting from the given centroids.
    #[must_use]
    pub fn fixed(centroids: Vec<Centroid>) -> Self {
        Self::with_initialization(Initialization::Fixed(centroids))
    }

    fn with_initialization(initialization: Initialization) -> Self {
        Self {
            initialization,
            max_iterations: DEFAULT_MAX_ITERATIONS,
            reject_axis_zero: true,
        }
    }

    #[must_use]
    pub fn with_max_iterations(mut self, max_iterations: usize) -> Self {
        self.max_iterations = max_iterations;
        self
    }

    #[must_use]
    pub fn with_reject_axis_zero(mut self, reject_axis_zero: bool) -> Self {
        self.reject_axis_zero = reject_axis_zero;
        self
    }

    /// Returns the number of clusters these options produce.
    #[must_use]
    pub fn cluster_count(&self) -> usize {
        match &self.initialization {
            Initialization::Random { k } => *k,
            Initialization::Fixed(centroids) => centroids.len(),
        }
    }
}

#[derive(Debug, derive_more::Display, derive_more::Error)]
pub enum ClusterError {
    #[display("cluster count must be at least 1")]
    ZeroClusters,
    #[display("maximum iteration count must be at least 1")]
    ZeroIterations,
    #[display("centroid id {id} is used more than once")]
    DuplicateCentroidId { id: usize },
    #[display("centroid {id} has a non-finite coordinate")]
    NonFiniteCentroid { id: usize },
    #[display("point {index} has a non-finite coordinate")]
    NonFinitePoint { index: usize },
}

/// Output of a clustering run.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ClusteringResult {
    centroids: Vec<Centroid>,
    assignments: Vec<usize>,
    iterations: usize,
    converged: bool,
}

impl ClusteringResult {
    /// Returns the final centroids, sorted by ascending `x`.
    #[must_use]
    pub fn centroids(&self) -> &[Centroid] {
        &self.centroids
    }

    /// Returns the centroid id of every input point, index-aligned with the input.
    #[must_use]
    pub fn assignments(&self) -> &[usize] {
        &self.assignments
    }

    /// Returns the centroid id assigned to the point at `index`.
    #[must_use]
    pub fn assignment_of(&self, index: usize) -> Option<usize> {
        self.assignments.get(index).copied()
    }

    /// Looks up a centroid by id.
    #[must_use]
    pub fn centroid(&self, id: usize) -> Option<&Centroid> {
        self.centroids.iter().find(|c| c.id == id)
    }

    /// Number of update steps performed.
    ///
    /// Each update step is followed by an assignment pass. When the run hits
    /// the iteration cap, that last pass is not followed by an update, so the
    /// returned centroids are the means of the previous assignments rather
    /// than of [`Self::assignments`].
    #[must_use]
    pub fn iterations(&self) -> usize {
        self.iterations
    }

    /// Returns `true` if the run stopped because assignments stopped changing,
    /// `false` if it hit the iteration cap.
    ///
    /// A converged result is a fixed point: every centroid with members is the
    /// mean of its members. A capped result makes no such promise; its
    /// assignments are the nearest centroids, but the centroids lag one update
    /// behind them.
    #[must_use]
    pub fn is_converged(&self) -> bool {
        self.converged
    }

    /// Returns the points assigned to centroid `id`.
    ///
    /// `points` must be the slice the result was computed from.
    pub fn members<'a, P>(
        &'a self,
        points: &'a [Point2D<P>],
        id: usize,
    ) -> impl Iterator<Item = &'a Point2D<P>> + 'a {
        debug_assert_eq!(points.len(), self.assignments.len());
        points
            .iter()
            .zip(&self.assignments)
            .filter(move |(_, assigned)| **assigned == id)
            .map(|(point, _)| point)
    }

    /// Returns `(id, point count)` for every centroid, in output order.
    #[must_use]
    pub fn cluster_sizes(&self) -> Vec<(usize, usize)> {
        self.centroids
            .iter()
            .map(|c| (c.id, self.assignments.iter().filter(|&&a| a == c.id).count()))
            .collect()
    }

    /// Sum of squared distances from each point to its assigned centroid.
    ///
    /// `points` must be the slice the result was computed from.
    #[must_use]
    pub fn inertia<P>(&self, points: &[Point2D<P>]) -> f64 {
        debug_assert_eq!(points.len(), self.assignments.len());
        points
            .iter()
            .zip(&self.assignments)
            .filter_map(|(point, id)| {
                self.centroid(*id)
                    .map(|c| c.distance_to(point.x, point.y).powi(2))
            })
            .sum()
    }
}

/// Clusters `points` using the thread-local random generator.
///
/// See [`cluster_with_rng`] for details. Runs with fixed centroids never draw
/// random numbers, so they are deterministic with either function.
pub fn cluster<P>(
    points: &[Point2D<P>],
    options: &ClusterOptions,
) -> Result<ClusteringResult, ClusterError> {
    cluster_with_rng(points, options, &mut rand::rng())
}

/// Clusters `points` with Lloyd's k-means algorithm.
///
/// # Arguments
///
/// * `points` - Points to cluster; may be empty or smaller than k
/// * `options` - Initialization and iteration cap
/// * `rng` - Random source for random initialization
///
/// # Errors
///
/// Configuration and input are validated before any iteration:
///
/// * [`ClusterError::ZeroClusters`] - k is zero or the fixed centroid list is empty
/// * [`ClusterError::ZeroIterations`] - `max_iterations` is zero
/// * [`ClusterError::DuplicateCentroidId`] - two fixed centroids share an id
/// * [`ClusterError::NonFiniteCentroid`] - a fixed centroid has a NaN or infinite coordinate
/// * [`ClusterError::NonFinitePoint`] - a point has a NaN or infinite coordinate
///
/// # Examples
///
/// ```
/// use touchline_analytics::clustering::{self, Centroid, ClusterOptions, Point2D};
///
/// let points: [Point2D<()>; 0] = [];
/// let seeds = vec![Centroid::new(7, 50.0, 50.0), Centroid::new(3, 10.0, 90.0)];
/// let result = clustering::cluster(&points, &ClusterOptions::fixed(seeds)).unwrap();
///
/// // sorted by x, ids untouched
/// assert_eq!(
///     result.centroids(),
///     &[Centroid::new(3, 10.0, 90.0), Centroid::new(7, 50.0, 50.0)]
/// );
/// assert!(result.assignments().is_empty());
/// ```
pub fn cluster_with_rng<P, R>(
    points: &[Point2D<P>],
    options: &ClusterOptions,
    rng: &mut R,
) -> Result<ClusteringResult, ClusterError>
where
    R: Rng + ?Sized,
{
    if options.max_iterations == 0 {
        return Err(ClusterError::ZeroIterations);
    }
    if let Some(index) = points
        .iter()
        .position(|p| !p.x.is_finite() || !p.y.is_finite())
    {
        return Err(ClusterError::NonFinitePoint { index });
    }
    let centroids = initial_centroids(options, rng)?;

    debug!(
        points = points.len(),
        k = centroids.len(),
        max_iterations = options.max_iterations,
        "clustering started"
    );

    let mut state = LloydState::new(centroids);
    let mut iterations = 0;
    let converged = loop {
        let changed = state.assign(points);
        trace!(iteration = iterations, changed, "assignment pass");
        if changed == 0 {
            break true;
        }
        if iterations == options.max_iterations {
            break false;
        }
        state.update(points);
        iterations += 1;
    };

    debug!(iterations, converged, "clustering finished");

    Ok(state.into_result(iterations, converged))
}

fn initial_centroids<R>(options: &ClusterOptions, rng: &mut R) -> Result<Vec<Centroid>, ClusterError>
where
    R: Rng + ?Sized,
{
    match &options.initialization {
        Initialization::Random { k: 0 } => Err(ClusterError::ZeroClusters),
        Initialization::Random { k } => Ok((0..*k)
            .map(|id| random_centroid(id, options.reject_axis_zero, rng))
            .collect()),
        Initialization::Fixed(centroids) => {
            if centroids.is_empty() {
                return Err(ClusterError::ZeroClusters);
            }
            let mut ids = HashSet::with_capacity(centroids.len());
            for c in centroids {
                if !c.x.is_finite() || !c.y.is_finite() {
                    return Err(ClusterError::NonFiniteCentroid { id: c.id });
                }
                if !ids.insert(c.id) {
                    return Err(ClusterError::DuplicateCentroidId { id: c.id });
                }
            }
            Ok(centroids.clone())
        }
    }
}

fn random_centroid<R>(id: usize, reject_axis_zero: bool, rng: &mut R) -> Centroid
where
    R: Rng + ?Sized,
{
    loop {
        let x = rng.random_range(0.0..PITCH_EXTENT);
        let y = rng.random_range(0.0..PITCH_EXTENT);
        // draws are never negative, so `> 0.0` rejects exactly the zero axes
        if !reject_axis_zero || (x > 0.0 && y > 0.0) {
            return Centroid::new(id, x, y);
        }
    }
}

/// Mutable state of one Lloyd run.
///
/// `assignments` holds positions into `centroids` (initialization order),
/// which are translated to ids only when the result is built.
#[derive(Debug)]
struct LloydState {
    centroids: Vec<Centroid>,
    assignments: Vec<usize>,
    assigned_once: bool,
}

impl LloydState {
    fn new(centroids: Vec<Centroid>) -> Self {
        Self {
            centroids,
            assignments: vec![],
            assigned_once: false,
        }
    }

    /// Assigns every point to its nearest centroid and returns how many
    /// assignments changed. The first pass counts every point as changed.
    fn assign<P>(&mut self, points: &[Point2D<P>]) -> usize {
        if !self.assigned_once {
            self.assigned_once = true;
            self.assignments = points
                .iter()
                .map(|p| nearest_centroid(&self.centroids, p.x, p.y))
                .collect();
            return self.assignments.len();
        }

        let mut changed = 0;
        for (point, slot) in points.iter().zip(&mut self.assignments) {
            let nearest = nearest_centroid(&self.centroids, point.x, point.y);
            if *slot != nearest {
                *slot = nearest;
                changed += 1;
            }
        }
        changed
    }

    /// Moves each centroid to the mean of its points. Empty clusters stay put.
    #[expect(clippy::cast_precision_loss)]
    fn update<P>(&mut self, points: &[Point2D<P>]) {
        let mut sums = vec![(0.0, 0.0, 0_usize); self.centroids.len()];
        for (point, &slot) in points.iter().zip(&self.assignments) {
            let (sx, sy, n) = &mut sums[slot];
            *sx += point.x;
            *sy += point.y;
            *n += 1;
        }
        for (centroid, (sx, sy, n)) in self.centroids.iter_mut().zip(sums) {
            if n > 0 {
                centroid.x = sx / n as f64;
                centroid.y = sy / n as f64;
            }
        }
    }

    fn into_result(self, iterations: usize, converged: bool) -> ClusteringResult {
        let assignments = self
            .assignments
            .iter()
            .map(|&slot| self.centroids[slot].id)
            .collect();
        let mut centroids = self.centroids;
        centroids.sort_by(|a, b| a.x.total_cmp(&b.x));
        ClusteringResult {
            centroids,
            assignments,
            iterations,
            converged,
        }
    }
}

/// Returns the position of the centroid nearest to `(x, y)`.
///
/// Only a strictly smaller distance replaces the current best, so the
/// earliest centroid wins ties.
fn nearest_centroid(centroids: &[Centroid], x: f64, y: f64) -> usize {
    let mut best = 0;
    let mut best_distance = f64::INFINITY;
    for (i, centroid) in centroids.iter().enumerate() {
        let distance = centroid.distance_to(x, y);
        if distance < best_distance {
            best = i;
            best_distance = distance;
        }
    }
    best
}
