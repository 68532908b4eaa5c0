//! `studymatch join`: record that a user joined a study group.

use crate::cli::output::{self, Styled};
use crate::cli::profile_args::ProfileArgs;
use crate::cli::{load_matcher, open_registry};
use crate::config::StudyMatchConfig;
use crate::model::ClusterId;
use anyhow::Result;

/// Run the join command. Without `--cluster` the profile's predicted cluster is used.
pub fn run(
    config: &StudyMatchConfig,
    args: &ProfileArgs,
    group: &str,
    cluster: Option<ClusterId>,
) -> Result<()> {
    let s = Styled::new();
    let profile = args.to_raw()?.validate()?;

    let matcher = load_matcher(config)?;
    let registry = open_registry(config)?;
    let cluster_id = cluster.unwrap_or_else(|| matcher.predict(&profile));
    let id = matcher.join(&profile, group, cluster_id, &registry)?;

    if output::is_json() {
        output::print_json(&serde_json::json!({
            "id": id,
            "group_name": group.trim(),
            "cluster_id": cluster_id,
        }));
    } else if !output::is_quiet() {
        eprintln!(
            "  {} Joined {} in cluster {cluster_id} (member #{id}).",
            s.ok_sym(),
            s.bold(group.trim())
        );
        eprintln!("  View the group with: studymatch group \"{}\" --cluster {cluster_id}", group.trim());
    }
    Ok(())
}
