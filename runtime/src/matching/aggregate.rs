//! Per-group aggregates within one cluster.

use crate::error::Result;
use crate::model::ClusterId;
use crate::profile::{Topic, Weekday};
use crate::registry::{MembershipRecord, MembershipStore};
use serde::Serialize;
use std::collections::{BTreeSet, HashMap};

/// Union of member attributes and mean location for one named group.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GroupAggregate {
    pub group_name: String,
    pub topics: BTreeSet<Topic>,
    pub days: BTreeSet<Weekday>,
    pub hours: BTreeSet<u8>,
    pub latitude: f64,
    pub longitude: f64,
    pub member_count: usize,
}

/// Aggregate every group in `cluster_id`, reading the registry once.
pub fn aggregate(store: &dyn MembershipStore, cluster_id: ClusterId) -> Result<Vec<GroupAggregate>> {
    let records = store.in_cluster(cluster_id)?;
    Ok(aggregate_records(cluster_id, &records))
}

/// Aggregate the records of `cluster_id` by group name.
///
/// Records from other clusters are ignored. Groups come out in the order
/// their first member appears, which is the ranking tie-break order.
pub fn aggregate_records(cluster_id: ClusterId, records: &[MembershipRecord]) -> Vec<GroupAggregate> {
    let mut index: HashMap<&str, usize> = HashMap::new();
    let mut groups: Vec<GroupAggregate> = Vec::new();
    let mut lat_sums: Vec<f64> = Vec::new();
    let mut lon_sums: Vec<f64> = Vec::new();

    for record in records.iter().filter(|r| r.cluster_id == cluster_id) {
        let slot = *index.entry(record.group_name.as_str()).or_insert_with(|| {
            groups.push(GroupAggregate {
                group_name: record.group_name.clone(),
                topics: BTreeSet::new(),
                days: BTreeSet::new(),
                hours: BTreeSet::new(),
                latitude: 0.0,
                longitude: 0.0,
                member_count: 0,
            });
            lat_sums.push(0.0);
            lon_sums.push(0.0);
            groups.len() - 1
        });

        let group = &mut groups[slot];
        group.topics.extend(record.topic_set());
        group.days.extend(record.day_set());
        group.hours.extend(record.hour_set());
        group.member_count += 1;
        lat_sums[slot] += record.latitude;
        lon_sums[slot] += record.longitude;
    }

    for (slot, group) in groups.iter_mut().enumerate() {
        let n = group.member_count as f64;
        group.latitude = lat_sums[slot] / n;
        group.longitude = lon_sums[slot] / n;
    }

    groups
}
