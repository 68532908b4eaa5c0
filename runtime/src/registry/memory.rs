//! In-process registry, used by tests and for dry runs.

use super::{MembershipRecord, MembershipStore, NewMembership, RecordId};
use crate::error::Result;
use crate::model::ClusterId;
use chrono::Utc;
use std::sync::atomic::{AtomicI64, Ordering};
use std::sync::RwLock;

/// Vec-backed registry with an atomic id counter.
#[derive(Default)]
pub struct MemoryRegistry {
    rows: RwLock<Vec<MembershipRecord>>,
    next_id: AtomicI64,
}

impl MemoryRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    fn scan(&self, keep: impl Fn(&MembershipRecord) -> bool) -> Vec<MembershipRecord> {
        let rows = self.rows.read().unwrap_or_else(|e| e.into_inner());
        rows.iter().filter(|r| keep(r)).cloned().collect()
    }
}

impl MembershipStore for MemoryRegistry {
    fn append(&self, record: &NewMembership) -> Result<RecordId> {
        let id = self.next_id.fetch_add(1, Ordering::SeqCst) + 1;
        let row = MembershipRecord {
            id,
            cluster_id: record.cluster_id,
            skill_level: record.skill_level,
            group_name: record.group_name.clone(),
            latitude: record.latitude,
            longitude: record.longitude,
            preferred_group_size: record.preferred_group_size,
            days: record.days.clone(),
            hours: record.hours.clone(),
            topics: record.topics.clone(),
            joined_at: Utc::now(),
        };
        let mut rows = self.rows.write().unwrap_or_else(|e| e.into_inner());
        // Keep rows in id order even if two appends race between counter and lock.
        let pos = rows.partition_point(|r| r.id < id);
        rows.insert(pos, row);
        Ok(id)
    }

    fn query_by_group_and_cluster(
        &self,
        group_name: &str,
        cluster_id: ClusterId,
    ) -> Result<Vec<MembershipRecord>> {
        Ok(self.scan(|r| r.group_name == group_name && r.cluster_id == cluster_id))
    }

    fn in_cluster(&self, cluster_id: ClusterId) -> Result<Vec<MembershipRecord>> {
        Ok(self.scan(|r| r.cluster_id == cluster_id))
    }

    fn all(&self) -> Result<Vec<MembershipRecord>> {
        Ok(self.scan(|_| true))
    }

    fn len(&self) -> Result<usize> {
        Ok(self.rows.read().unwrap_or_else(|e| e.into_inner()).len())
    }
}
