//! `studymatch eval`: report how many members landed in the default group.

use crate::cli::open_registry;
use crate::cli::output::{self, Styled};
use crate::config::StudyMatchConfig;
use crate::registry::MembershipStore;
use crate::training::default_group_loss;
use anyhow::Result;

pub fn run(config: &StudyMatchConfig) -> Result<()> {
    let s = Styled::new();
    let registry = open_registry(config)?;
    let report = default_group_loss(&registry.all()?, &config.fit.default_group);

    if output::is_json() {
        output::print_json(&serde_json::to_value(&report)?);
        return Ok(());
    }
    if output::is_quiet() {
        return Ok(());
    }

    output::print_header(&s);
    output::print_check(s.ok_sym(), "Members:", &report.total_members.to_string());
    let pct = output::format_pct(report.overall * 100.0);
    let (symbol, pct) = if report.overall > 0.5 {
        (s.warn_sym(), s.yellow(&pct))
    } else {
        (s.ok_sym(), pct)
    };
    output::print_check(symbol, "In default:", &format!("{pct} ({})", report.default_group));

    if output::is_verbose() {
        eprintln!();
        for (cluster, share) in &report.per_cluster {
            eprintln!("    cluster {cluster:>4}  {}", output::format_pct(share * 100.0));
        }
    }
    Ok(())
}
