//! Study group assignment around each cluster's dominant topics.

use crate::model::ClusterId;
use crate::profile::{Topic, UserProfile};
use std::collections::BTreeMap;

/// Prefix of topic-named study groups.
pub const GROUP_PREFIX: &str = "Group_";

/// The `n` most common topics among `members`, most common first.
///
/// Ties keep vocabulary order. Topics nobody holds are never returned.
pub fn top_topics<'a>(members: impl IntoIterator<Item = &'a UserProfile>, n: usize) -> Vec<Topic> {
    let mut counts = [0usize; Topic::ALL.len()];
    for member in members {
        for topic in &member.topics {
            counts[topic.index()] += 1;
        }
    }

    let mut ranked: Vec<(Topic, usize)> = Topic::ALL
        .iter()
        .map(|t| (*t, counts[t.index()]))
        .filter(|(_, c)| *c > 0)
        .collect();
    ranked.sort_by(|a, b| b.1.cmp(&a.1));
    ranked.into_iter().take(n).map(|(t, _)| t).collect()
}

/// Name of the group a member joins: the first top topic they hold, else the default.
pub fn group_name_for(profile: &UserProfile, top: &[Topic], default_group: &str) -> String {
    top.iter()
        .find(|t| profile.topics.contains(*t))
        .map(|t| format!("{GROUP_PREFIX}{}", t.name()))
        .unwrap_or_else(|| default_group.to_string())
}

/// Assign every profile to a study group within its cluster.
///
/// `assignments[i]` is the cluster of `profiles[i]`; the result is aligned the same way.
pub fn assign_groups(
    profiles: &[UserProfile],
    assignments: &[ClusterId],
    top_n: usize,
    default_group: &str,
) -> Vec<String> {
    let mut by_cluster: BTreeMap<ClusterId, Vec<&UserProfile>> = BTreeMap::new();
    for (profile, &cluster) in profiles.iter().zip(assignments) {
        by_cluster.entry(cluster).or_default().push(profile);
    }

    let tops: BTreeMap<ClusterId, Vec<Topic>> = by_cluster
        .iter()
        .map(|(&cluster, members)| (cluster, top_topics(members.iter().copied(), top_n)))
        .collect();

    profiles
        .iter()
        .zip(assignments)
        .map(|(profile, cluster)| {
            let top = tops.get(cluster).map(Vec::as_slice).unwrap_or(&[]);
            group_name_for(profile, top, default_group)
        })
        .collect()
}
