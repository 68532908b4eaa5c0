//! Grouping quality: how many members fell through to the default group.

use crate::model::ClusterId;
use crate::registry::MembershipRecord;
use serde::Serialize;
use std::collections::BTreeMap;

/// Share of members in the default group, overall and per cluster.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LossReport {
    pub default_group: String,
    pub total_members: usize,
    pub overall: f64,
    pub per_cluster: BTreeMap<ClusterId, f64>,
}

pub fn default_group_loss(records: &[MembershipRecord], default_group: &str) -> LossReport {
    let mut totals: BTreeMap<ClusterId, (usize, usize)> = BTreeMap::new();
    for r in records {
        let entry = totals.entry(r.cluster_id).or_default();
        entry.0 += 1;
        if r.group_name == default_group {
            entry.1 += 1;
        }
    }

    let defaulted: usize = totals.values().map(|(_, d)| d).sum();
    let overall = if records.is_empty() {
        0.0
    } else {
        defaulted as f64 / records.len() as f64
    };

    LossReport {
        default_group: default_group.to_string(),
        total_members: records.len(),
        overall,
        per_cluster: totals
            .into_iter()
            .map(|(c, (n, d))| (c, d as f64 / n as f64))
            .collect(),
    }
}
