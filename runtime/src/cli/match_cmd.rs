//! `studymatch match`: rank the study groups in a profile's cluster.

use crate::cli::output::{self, Styled};
use crate::cli::profile_args::ProfileArgs;
use crate::cli::{load_matcher, open_registry};
use crate::config::StudyMatchConfig;
use crate::matching::MatchOutcome;
use anyhow::Result;
use std::time::Instant;

/// Run the match command.
pub fn run(config: &StudyMatchConfig, args: &ProfileArgs, limit: Option<usize>) -> Result<()> {
    let start = Instant::now();
    let raw = args.to_raw()?;
    let profile = raw.validate()?;

    let matcher = load_matcher(config)?;
    let registry = open_registry(config)?;
    let outcome = matcher.match_profile(&profile, &registry)?;

    if output::is_json() {
        let rows: Vec<_> = outcome.rows().into_iter().take(limit.unwrap_or(usize::MAX)).collect();
        output::print_json(&serde_json::json!({
            "name": raw.name,
            "cluster_id": outcome.cluster_id,
            "groups": rows,
        }));
        return Ok(());
    }

    if !output::is_quiet() {
        print_outcome(&Styled::new(), &outcome, raw.name.as_deref(), limit);
        if output::is_verbose() {
            eprintln!("  {}", Styled::new().dim(&format!("{:?}", start.elapsed())));
        }
    }
    Ok(())
}

fn print_outcome(s: &Styled, outcome: &MatchOutcome, name: Option<&str>, limit: Option<usize>) {
    let who = name.map(|n| format!(" for {n}")).unwrap_or_default();
    eprintln!(
        "  Cluster {}{who}",
        s.cyan(&outcome.cluster_id.to_string())
    );
    eprintln!();

    if outcome.is_empty() {
        eprintln!(
            "  {} No study groups in this cluster yet. Join one with: studymatch join --group <name> --cluster {}",
            s.warn_sym(),
            outcome.cluster_id
        );
        return;
    }

    let rows = outcome.rows();
    let width = rows.iter().map(|r| r.group_name.len()).max().unwrap_or(0).max(5);
    eprintln!(
        "  {:>3}  {:<width$}  {:>8}  {:>8}  {:>8}  {:>8}",
        "#", "group", "match", "topics", "days", "hours"
    );
    for (i, row) in rows.iter().take(limit.unwrap_or(usize::MAX)).enumerate() {
        eprintln!(
            "  {:>3}  {:<width$}  {}  {:>8}  {:>8}  {:>8}",
            i + 1,
            row.group_name,
            s.green(&format!("{:>8}", output::format_pct(row.match_percent))),
            output::format_pct(row.topic_match),
            output::format_pct(row.day_match),
            output::format_pct(row.hour_match),
        );
    }
}
