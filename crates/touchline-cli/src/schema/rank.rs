use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use touchline_analytics::{
    ordinal,
    ranking::{RankedSelection, RankingOptions, ScoredLabel},
};

/// One row of a `rank` input file.
///
/// Missing or `null` labels and scores are accepted; such rows are left out
/// of the ranking.
#[derive(Debug, Clone, Deserialize)]
pub struct RecordInput {
    #[serde(default)]
    pub label: Option<String>,
    #[serde(default)]
    pub score: Option<f64>,
}

impl RecordInput {
    /// Score used for ranking; a missing score becomes NaN and is dropped.
    pub fn score(&self) -> f64 {
        self.score.unwrap_or(f64::NAN)
    }

    pub fn label(&self) -> Option<String> {
        self.label.clone()
    }
}

/// A ranked label with its one-based rank.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RankEntry {
    pub rank: usize,
    pub label: String,
    pub score: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ScoreExtent {
    pub min: f64,
    pub max: f64,
}

/// Report written by `touchline rank`.
#[derive(Debug, Clone, Serialize)]
pub struct RankReport {
    /// Timestamp when the report was created (ISO 8601 format)
    pub generated_at: DateTime<Utc>,
    pub options: RankingOptions<String>,
    pub full_ranking: Vec<RankEntry>,
    pub window: Vec<RankEntry>,
    /// Window labels plus the pinned label
    pub selected: Vec<String>,
    /// Rank of the pinned label, `null` when it has no valid record
    pub pinned_rank: Option<usize>,
    pub pinned_rank_ordinal: Option<String>,
    pub score_extent: Option<ScoreExtent>,
}

impl RankReport {
    pub fn new(
        generated_at: DateTime<Utc>,
        options: RankingOptions<String>,
        selection: &RankedSelection<String>,
    ) -> Self {
        let to_entries = |first_rank: usize, entries: &[ScoredLabel<String>]| {
            entries
                .iter()
                .enumerate()
                .map(|(i, entry)| RankEntry {
                    rank: first_rank + i,
                    label: entry.label.clone(),
                    score: entry.score,
                })
                .collect::<Vec<_>>()
        };

        let pinned_rank = selection.rank_of(selection.pinned_label().as_str());
        Self {
            generated_at,
            options,
            full_ranking: to_entries(1, selection.full_ranking()),
            window: to_entries(selection.window_range().start + 1, selection.window()),
            selected: selection.selected_labels().to_vec(),
            pinned_rank,
            pinned_rank_ordinal: pinned_rank
                .and_then(|rank| u64::try_from(rank).ok())
                .map(ordinal::with_suffix),
            score_extent: selection
                .score_extent()
                .map(|(min, max)| ScoreExtent { min, max }),
        }
    }
}

#[cfg(test)]
mod tests {
    use chrono::TimeZone as _;
    use touchline_analytics::ranking;

    use super::*;

    fn parse_records(json: &str) -> Vec<RecordInput> {
        serde_json::from_str(json).unwrap()
    }

    fn build_report(records: &[RecordInput], options: RankingOptions<String>) -> RankReport {
        let selection =
            ranking::select(records, |r| r.score(), |r| r.label(), &options).unwrap();
        let generated_at = Utc.with_ymd_and_hms(2018, 5, 13, 15, 0, 0).unwrap();
        RankReport::new(generated_at, options, &selection)
    }

    #[test]
    fn test_report_for_pinned_outside_window() {
        let records = parse_records(
            r#"[
                {"label": "A", "score": 10},
                {"label": "B", "score": 30},
                {"label": "C", "score": 20}
            ]"#,
        );
        let report = build_report(&records, RankingOptions::new(2, "A".to_owned()));

        assert_eq!(report.selected, ["B", "C", "A"]);
        assert_eq!(report.window.len(), 2);
        assert_eq!(report.window[1].rank, 2);
        assert_eq!(report.pinned_rank, Some(3));
        assert_eq!(report.pinned_rank_ordinal.as_deref(), Some("3rd"));
        assert_eq!(
            report.score_extent,
            Some(ScoreExtent {
                min: 10.0,
                max: 30.0
            })
        );
    }

    #[test]
    fn test_window_ranks_follow_offset() {
        let records = parse_records(
            r#"[
                {"label": "A", "score": 4},
                {"label": "B", "score": 3},
                {"label": "C", "score": 2},
                {"label": "D", "score": 1}
            ]"#,
        );
        let options = RankingOptions::new(2, "A".to_owned()).with_offset(2);
        let report = build_report(&records, options);

        let ranks = report.window.iter().map(|e| e.rank).collect::<Vec<_>>();
        assert_eq!(ranks, [3, 4]);
        assert_eq!(report.pinned_rank_ordinal.as_deref(), Some("1st"));
    }

    #[test]
    fn test_null_fields_are_dropped() {
        let records = parse_records(
            r#"[
                {"label": "A", "score": null},
                {"label": null, "score": 5},
                {"score": 6},
                {"label": "B", "score": 1}
            ]"#,
        );
        let report = build_report(&records, RankingOptions::new(5, "A".to_owned()));

        assert_eq!(report.full_ranking.len(), 1);
        assert_eq!(report.full_ranking[0].label, "B");
        assert_eq!(report.selected, ["B", "A"]);
        assert_eq!(report.pinned_rank, None);
        assert_eq!(report.pinned_rank_ordinal, None);
    }

    #[test]
    fn test_report_serializes_timestamp() {
        let report = build_report(&[], RankingOptions::new(1, "A".to_owned()));
        let json = serde_json::to_value(&report).unwrap();
        assert_eq!(json["generated_at"], "2018-05-13T15:00:00Z");
        assert_eq!(json["score_extent"], serde_json::Value::Null);
        assert_eq!(json["options"]["pinned_label"], "A");
    }
}
