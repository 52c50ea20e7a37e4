//! Analytics core for the Touchline football dashboard.
//!
//! This crate holds the data-side computations behind the dashboard charts.
//! Everything here is a pure function over in-memory records: loading data,
//! drawing and layout belong to the caller.
//!
//! - **Ranked selection**: leaderboard windows with a pinned entity that is always included
//! - **Spatial clustering**: Lloyd's k-means over 2D pitch positions
//! - **Seeds**: reproducible random sources for clustering and sampling
//! - **Sampling**: order-preserving percentage sampling of point sets
//! - **Ordinals**: English ordinal suffixes for rank labels
//!
//! # Modules
//!
//! - [`ranking`]: Top-N selection with a pinned label and rank lookups
//! - [`clustering`]: K-means clustering of [`clustering::Point2D`] values
//! - [`seed`]: 128-bit seed type for deterministic random generation
//! - [`sampling`]: Percentage sampling helpers
//! - [`ordinal`]: Ordinal number formatting ("1st", "2nd", ...)
//!
//! # Examples
//!
//! ## Selecting a leaderboard window
//!
//! ```
//! use touchline_analytics::ranking::{self, RankingOptions};
//!
//! let rows = [("A", 10.0), ("B", 30.0), ("C", 20.0)];
//! let options = RankingOptions::new(2, "A");
//! let selection = ranking::select(rows, |r| r.1, |r| Some(r.0), &options).unwrap();
//!
//! assert_eq!(selection.window_labels().collect::<Vec<_>>(), [&"B", &"C"]);
//! assert!(selection.is_selected(&"A"));
//! assert_eq!(selection.rank_of(&"A"), Some(3));
//! ```
//!
//! ## Clustering pitch positions
//!
//! ```
//! use touchline_analytics::clustering::{self, Centroid, ClusterOptions, Point2D};
//!
//! let points = [
//!     Point2D::new(0.0, 0.0, "a"),
//!     Point2D::new(0.0, 1.0, "b"),
//!     Point2D::new(10.0, 10.0, "c"),
//!     Point2D::new(10.0, 11.0, "d"),
//! ];
//! let options = ClusterOptions::fixed(vec![
//!     Centroid::new(0, 0.0, 0.0),
//!     Centroid::new(1, 10.0, 10.0),
//! ]);
//! let result = clustering::cluster(&points, &options).unwrap();
//!
//! assert!(result.is_converged());
//! assert_eq!(result.assignments(), &[0, 0, 1, 1]);
//! assert_eq!(result.centroids()[1], Centroid::new(1, 10.0, 10.5));
//! ```
//!
//! ## Reproducible random initialization
//!
//! ```
//! use touchline_analytics::{
//!     clustering::{self, ClusterOptions, Point2D},
//!     seed::ClusterSeed,
//! };
//!
//! let points = [Point2D::new(20.0, 30.0, ()), Point2D::new(80.0, 70.0, ())];
//! let seed: ClusterSeed = "000102030405060708090a0b0c0d0e0f".parse().unwrap();
//! let options = ClusterOptions::random(2);
//!
//! let first = clustering::cluster_with_rng(&points, &options, &mut seed.rng()).unwrap();
//! let second = clustering::cluster_with_rng(&points, &options, &mut seed.rng()).unwrap();
//! assert_eq!(first, second);
//! ```

pub mod clustering;
pub mod ordinal;
pub mod ranking;
pub mod sampling;
pub mod seed;
