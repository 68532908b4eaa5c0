//! `studymatch group`: list the members of a group within a cluster.

use crate::cli::open_registry;
use crate::cli::output::{self, Styled};
use crate::config::StudyMatchConfig;
use crate::model::ClusterId;
use crate::registry::MembershipStore;
use anyhow::Result;

pub fn run(config: &StudyMatchConfig, group: &str, cluster_id: ClusterId) -> Result<()> {
    let s = Styled::new();
    let registry = open_registry(config)?;
    let members = registry.query_by_group_and_cluster(group, cluster_id)?;

    if output::is_json() {
        output::print_json(&serde_json::json!({
            "group_name": group,
            "cluster_id": cluster_id,
            "members": members,
        }));
        return Ok(());
    }
    if output::is_quiet() {
        return Ok(());
    }

    eprintln!(
        "  {} {}",
        s.bold(group),
        s.dim(&format!("cluster {cluster_id} \u{00b7} {} members", members.len()))
    );
    eprintln!();
    for m in &members {
        eprintln!(
            "  {:>5}  {:<12} {:<6} ({:.4}, {:.4})  {}",
            m.id,
            m.skill_level.name(),
            m.preferred_group_size.name(),
            m.latitude,
            m.longitude,
            s.dim(&m.topics)
        );
        if output::is_verbose() {
            eprintln!("         days: {}  hours: {}", m.days, m.hours);
        }
    }
    Ok(())
}
