//! Leaderboard selection with a pinned entity.
//!
//! Ranks labelled records by score and cuts a window out of the ranking for
//! display, while guaranteeing that one chosen label (the "pinned" label, e.g.
//! the player the dashboard is about) is always part of the selection.
//!
//! # Algorithm
//!
//! 1. **Filter** - Records whose label is `None` or whose score is NaN are dropped
//! 2. **Group** - Records are grouped by label; the first valid record of each
//!    label supplies its score ("first-seen wins")
//! 3. **Sort** - Labels are sorted by score descending; equal scores keep their
//!    first-encounter order
//! 4. **Window** - The ranks `[offset, offset + count)` are sliced out, clipped
//!    to the number of ranked labels
//! 5. **Pin** - The pinned label is appended to the selection if the window
//!    does not already contain it
//!
//! A pinned label that matches no record is still selected. It simply has no
//! score and no rank, and the caller decides how to present that.
//!
//! # Example
//!
//! ```
//! use touchline_analytics::ranking::{self, RankingOptions};
//!
//! let rows = [("A", 10.0), ("B", 30.0), ("C", 20.0), ("D", 5.0)];
//! let options = RankingOptions::new(2, "D").with_offset(1);
//! let selection = ranking::select(rows, |r| r.1, |r| Some(r.0), &options).unwrap();
//!
//! assert_eq!(selection.window_labels().collect::<Vec<_>>(), [&"C", &"A"]);
//! assert_eq!(selection.selected_labels(), &["C", "A", "D"]);
//! ```

use std::{borrow::Borrow, cmp::Ordering, collections::HashSet, hash::Hash, ops::Range};

use serde::{Deserialize, Serialize};
use tracing::debug;

/// Window and pin configuration for [`select`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RankingOptions<L> {
    /// Zero-based rank at which the window starts.
    #[serde(default)]
    pub offset: usize,
    /// Number of ranks in the window. Must be at least 1.
    pub count: usize,
    /// Label that is always part of the selection.
    pub pinned_label: L,
}

impl<L> RankingOptions<L> {
    /// Number of bars shown by the dashboard leaderboard.
    pub const DEFAULT_COUNT: usize = 5;

    /// Creates options for the top `count` ranks.
    #[must_use]
    pub fn new(count: usize, pinned_label: L) -> Self {
        Self {
            offset: 0,
            count,
            pinned_label,
        }
    }

    /// Starts the window at the given zero-based rank.
    #[must_use]
    pub fn with_offset(mut self, offset: usize) -> Self {
        self.offset = offset;
        self
    }
}

#[derive(Debug, derive_more::Display, derive_more::Error)]
pub enum RankingError {
    #[display("ranking window must contain at least one rank")]
    ZeroCount,
}

/// A label with the score it was ranked by.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoredLabel<L> {
    pub label: L,
    pub score: f64,
}

/// Result of [`select`].
///
/// Holds the full ranking as well as the window and the selected set, so the
/// caller can both render the window and answer "what rank is X" questions.
#[derive(Debug, Clone, PartialEq)]
pub struct RankedSelection<L> {
    full_ranking: Vec<ScoredLabel<L>>,
    window: Range<usize>,
    selected: Vec<L>,
    pinned_label: L,
}

/// Ranks `records` and selects the configured window plus the pinned label.
///
/// # Arguments
///
/// * `records` - Records to rank, in input order (input order breaks score ties)
/// * `score_of` - Score accessor; NaN scores exclude the record
/// * `label_of` - Label accessor; `None` excludes the record
/// * `options` - Window and pinned label
///
/// # Errors
///
/// Returns [`RankingError::ZeroCount`] if `options.count` is zero.
///
/// # Examples
///
/// ```
/// use touchline_analytics::ranking::{self, RankingOptions};
///
/// let rows = [("A", 10.0), ("B", 30.0), ("C", 20.0)];
/// let selection =
///     ranking::select(rows, |r| r.1, |r| Some(r.0), &RankingOptions::new(1, "B")).unwrap();
/// assert_eq!(selection.selected_labels(), &["B"]);
/// ```
pub fn select<I, L, S, F>(
    records: I,
    mut score_of: S,
    mut label_of: F,
    options: &RankingOptions<L>,
) -> Result<RankedSelection<L>, RankingError>
where
    I: IntoIterator,
    L: Eq + Hash + Clone,
    S: FnMut(&I::Item) -> f64,
    F: FnMut(&I::Item) -> Option<L>,
{
    if options.count == 0 {
        return Err(RankingError::ZeroCount);
    }

    let mut seen = HashSet::new();
    let mut full_ranking = vec![];
    let mut dropped = 0_usize;
    for record in records {
        let Some(label) = label_of(&record) else {
            dropped += 1;
            continue;
        };
        let score = score_of(&record);
        if score.is_nan() {
            dropped += 1;
            continue;
        }
        if seen.insert(label.clone()) {
            full_ranking.push(ScoredLabel { label, score });
        }
    }

    // NaN scores are filtered above, so `partial_cmp` never fails here.
    // `-0.0` and `0.0` compare equal and keep their encounter order.
    full_ranking.sort_by(|a, b| b.score.partial_cmp(&a.score).unwrap_or(Ordering::Equal));

    let start = options.offset.min(full_ranking.len());
    let end = options
        .offset
        .saturating_add(options.count)
        .min(full_ranking.len());
    let window = start..end;

    let mut selected = full_ranking[window.clone()]
        .iter()
        .map(|entry| entry.label.clone())
        .collect::<Vec<_>>();
    if !selected.contains(&options.pinned_label) {
        selected.push(options.pinned_label.clone());
    }

    debug!(
        ranked = full_ranking.len(),
        dropped,
        offset = options.offset,
        count = options.count,
        window = window.len(),
        selected = selected.len(),
        "ranked selection built"
    );

    Ok(RankedSelection {
        full_ranking,
        window,
        selected,
        pinned_label: options.pinned_label.clone(),
    })
}

impl<L> RankedSelection<L> {
    /// Returns every ranked label, best first.
    #[must_use]
    pub fn full_ranking(&self) -> &[ScoredLabel<L>] {
        &self.full_ranking
    }

    /// Returns the ranked entries inside the window.
    #[must_use]
    pub fn window(&self) -> &[ScoredLabel<L>] {
        &self.full_ranking[self.window.clone()]
    }

    /// Returns the labels inside the window, best first.
    pub fn window_labels(&self) -> impl Iterator<Item = &L> + '_ {
        self.window().iter().map(|entry| &entry.label)
    }

    /// Returns the zero-based rank range covered by the window.
    #[must_use]
    pub fn window_range(&self) -> Range<usize> {
        self.window.clone()
    }

    /// Returns the selected labels: the window labels followed by the pinned
    /// label when it falls outside the window.
    #[must_use]
    pub fn selected_labels(&self) -> &[L] {
        &self.selected
    }

    /// Returns the pinned label.
    #[must_use]
    pub fn pinned_label(&self) -> &L {
        &self.pinned_label
    }

    /// Returns the lowest and highest ranked scores, or `None` if nothing was ranked.
    #[must_use]
    pub fn score_extent(&self) -> Option<(f64, f64)> {
        let max = self.full_ranking.first()?.score;
        let min = self.full_ranking.last()?.score;
        Some((min, max))
    }
}

impl<L> RankedSelection<L>
where
    L: Eq,
{
    /// Returns `true` if `label` is part of the selection.
    #[must_use]
    pub fn is_selected<Q>(&self, label: &Q) -> bool
    where
        L: Borrow<Q>,
        Q: Eq + ?Sized,
    {
        self.selected.iter().any(|l| l.borrow() == label)
    }

    /// Returns `true` if the pinned label was added on top of the window.
    #[must_use]
    pub fn is_pinned_outside_window(&self) -> bool {
        !self.window_labels().any(|l| *l == self.pinned_label)
    }

    /// Returns the one-based rank of `label`, or `None` if it was not ranked.
    ///
    /// ```
    /// use touchline_analytics::ranking::{self, RankingOptions};
    ///
    /// let rows = [("A".to_owned(), 1.0), ("B".to_owned(), 2.0)];
    /// let selection = ranking::select(
    ///     rows,
    ///     |r| r.1,
    ///     |r| Some(r.0.clone()),
    ///     &RankingOptions::new(1, "Z".to_owned()),
    /// )
    /// .unwrap();
    /// assert_eq!(selection.rank_of("A"), Some(2));
    /// assert_eq!(selection.rank_of("Z"), None);
    /// ```
    #[must_use]
    pub fn rank_of<Q>(&self, label: &Q) -> Option<usize>
    where
        L: Borrow<Q>,
        Q: Eq + ?Sized,
    {
        self.full_ranking
            .iter()
            .position(|entry| entry.label.borrow() == label)
            .map(|index| index + 1)
    }

    /// Returns the score `label` was ranked by, or `None` if it was not ranked.
    #[must_use]
    pub fn score_of<Q>(&self, label: &Q) -> Option<f64>
    where
        L: Borrow<Q>,
        Q: Eq + ?Sized,
    {
        self.full_ranking
            .iter()
            .find(|entry| entry.label.borrow() == label)
            .map(|entry| entry.score)
    }
}
