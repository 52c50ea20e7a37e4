use std::path::PathBuf;

use anyhow::Context as _;
use chrono::Utc;
use touchline_analytics::ranking::{self, RankingOptions};
use tracing::info;

use crate::{
    schema::rank::RankReport,
    util::{self, ReportWriter},
};

#[derive(Debug, Clone, clap::Args)]
pub(crate) struct RankArg {
    /// Path to a JSON array of `{"label": ..., "score": ...}` records
    input: PathBuf,
    /// Number of ranks to select
    #[arg(long, default_value_t = RankingOptions::<String>::DEFAULT_COUNT)]
    count: usize,
    /// Zero-based rank at which the selection starts
    #[arg(long, default_value_t = 0)]
    offset: usize,
    /// Label that is always selected, whatever its rank
    #[arg(long)]
    pinned: String,
    /// Output file path (stdout if omitted)
    #[arg(long)]
    output: Option<PathBuf>,
}

pub(crate) fn run(arg: &RankArg) -> anyhow::Result<()> {
    let records = util::read_records_file(&arg.input)?;
    info!(records = records.len(), input = %arg.input.display(), "records loaded");

    let options = RankingOptions::new(arg.count, arg.pinned.clone()).with_offset(arg.offset);
    let selection = ranking::select(&records, |r| r.score(), |r| r.label(), &options)
        .context("Invalid ranking options")?;

    if selection.rank_of(arg.pinned.as_str()).is_none() {
        info!(pinned = %arg.pinned, "pinned label has no valid record");
    }
    info!(
        ranked = selection.full_ranking().len(),
        selected = selection.selected_labels().len(),
        "ranking computed"
    );

    let report = RankReport::new(Utc::now(), options, &selection);
    ReportWriter::create(arg.output.as_deref())?.write_report(&report)
}
