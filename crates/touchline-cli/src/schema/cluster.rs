use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use touchline_analytics::{
    clustering::{ClusteringResult, Point2D},
    seed::ClusterSeed,
};

/// One row of a `cluster` input file.
#[derive(Debug, Clone, Deserialize)]
pub struct PointInput {
    pub x: f64,
    pub y: f64,
    /// Arbitrary caller data (event id, end position, ...), echoed in the report
    #[serde(default)]
    pub payload: Value,
}

impl From<PointInput> for Point2D<Value> {
    fn from(input: PointInput) -> Self {
        Point2D::new(input.x, input.y, input.payload)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CentroidReport {
    pub id: usize,
    pub x: f64,
    pub y: f64,
    /// Number of points assigned to this centroid
    pub size: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AssignmentReport {
    pub x: f64,
    pub y: f64,
    pub cluster: usize,
    pub payload: Value,
}

/// Report written by `touchline cluster`.
#[derive(Debug, Clone, Serialize)]
pub struct ClusterReport {
    /// Timestamp when the report was created (ISO 8601 format)
    pub generated_at: DateTime<Utc>,
    /// Seed that drove sampling and random initialization
    pub seed: ClusterSeed,
    pub input_points: usize,
    pub sampled_points: usize,
    pub max_iterations: usize,
    pub iterations: usize,
    pub converged: bool,
    pub inertia: f64,
    /// Centroids sorted by ascending x
    pub centroids: Vec<CentroidReport>,
    pub assignments: Vec<AssignmentReport>,
}

/// Run parameters echoed into a [`ClusterReport`].
#[derive(Debug, Clone, Copy)]
pub struct ClusterRun {
    pub generated_at: DateTime<Utc>,
    pub seed: ClusterSeed,
    pub input_points: usize,
    pub max_iterations: usize,
}

impl ClusterReport {
    /// Builds the report from the sampled points and the clustering result.
    pub fn new(run: ClusterRun, points: &[Point2D<Value>], result: &ClusteringResult) -> Self {
        let centroids = result
            .cluster_sizes()
            .into_iter()
            .filter_map(|(id, size)| {
                result.centroid(id).map(|c| CentroidReport {
                    id,
                    x: c.x,
                    y: c.y,
                    size,
                })
            })
            .collect();
        let assignments = points
            .iter()
            .zip(result.assignments())
            .map(|(point, &cluster)| AssignmentReport {
                x: point.x,
                y: point.y,
                cluster,
                payload: point.payload.clone(),
            })
            .collect();

        Self {
            generated_at: run.generated_at,
            seed: run.seed,
            input_points: run.input_points,
            sampled_points: points.len(),
            max_iterations: run.max_iterations,
            iterations: result.iterations(),
            converged: result.is_converged(),
            inertia: result.inertia(points),
            centroids,
            assignments,
        }
    }
}

#[cfg(test)]
mod tests {
    use chrono::TimeZone as _;
    use serde_json::json;
    use touchline_analytics::clustering::{self, Centroid, ClusterOptions};

    use super::*;

    fn run() -> ClusterRun {
        ClusterRun {
            generated_at: Utc.with_ymd_and_hms(2018, 5, 13, 15, 0, 0).unwrap(),
            seed: ClusterSeed::from_bytes([0; 16]),
            input_points: 4,
            max_iterations: 100,
        }
    }

    #[test]
    fn test_point_payload_defaults_to_null() {
        let inputs: Vec<PointInput> =
            serde_json::from_str(r#"[{"x": 1.5, "y": 2}, {"x": 3, "y": 4, "payload": {"id": 9}}]"#)
                .unwrap();
        let points = inputs.into_iter().map(Point2D::from).collect::<Vec<_>>();
        assert_eq!(points[0], Point2D::new(1.5, 2.0, Value::Null));
        assert_eq!(points[1].payload, json!({"id": 9}));
    }

    #[test]
    fn test_report_carries_sizes_and_payloads() {
        let points = vec![
            Point2D::new(0.0, 0.0, json!("a")),
            Point2D::new(0.0, 1.0, json!("b")),
            Point2D::new(10.0, 10.0, json!("c")),
            Point2D::new(10.0, 11.0, json!("d")),
        ];
        let options = ClusterOptions::fixed(vec![
            Centroid::new(1, 10.0, 10.0),
            Centroid::new(0, 0.0, 0.0),
        ]);
        let result = clustering::cluster(&points, &options).unwrap();
        let report = ClusterReport::new(run(), &points, &result);

        assert!(report.converged);
        assert_eq!(report.iterations, 1);
        assert_eq!(
            report.centroids,
            [
                CentroidReport {
                    id: 0,
                    x: 0.0,
                    y: 0.5,
                    size: 2
                },
                CentroidReport {
                    id: 1,
                    x: 10.0,
                    y: 10.5,
                    size: 2
                },
            ]
        );
        assert_eq!(report.assignments[2].cluster, 1);
        assert_eq!(report.assignments[2].payload, json!("c"));
        assert!((report.inertia - 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_report_serializes_seed_as_hex() {
        let points: Vec<Point2D<Value>> = vec![];
        let result = clustering::cluster(&points, &ClusterOptions::random(1)).unwrap();
        let report = ClusterReport::new(run(), &points, &result);
        let json = serde_json::to_value(&report).unwrap();
        assert_eq!(json["seed"], "00000000000000000000000000000000");
        assert_eq!(json["sampled_points"], 0);
        assert_eq!(json["centroids"].as_array().unwrap().len(), 1);
    }
}
