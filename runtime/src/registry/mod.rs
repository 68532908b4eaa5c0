//! Append-only membership registry.
//!
//! Every join appends one [`MembershipRecord`]. Records are never updated or
//! deleted. Identifiers are generated by the store, never derived from the
//! current row count.

pub mod memory;
pub mod sqlite;

pub use memory::MemoryRegistry;
pub use sqlite::SqliteRegistry;

use crate::error::Result;
use crate::model::ClusterId;
use crate::profile::{parse_hour, GroupSize, SkillLevel, Topic, UserProfile, Weekday};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use tracing::warn;

/// Store-generated record identifier.
pub type RecordId = i64;

/// A membership about to be appended.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewMembership {
    pub cluster_id: ClusterId,
    pub skill_level: SkillLevel,
    pub group_name: String,
    pub latitude: f64,
    pub longitude: f64,
    pub preferred_group_size: GroupSize,
    pub days: String,
    pub hours: String,
    pub topics: String,
}

impl NewMembership {
    /// Build the row for `profile` joining `group_name` in `cluster_id`.
    pub fn from_profile(profile: &UserProfile, group_name: &str, cluster_id: ClusterId) -> Self {
        Self {
            cluster_id,
            skill_level: profile.skill_level,
            group_name: group_name.to_string(),
            latitude: profile.latitude,
            longitude: profile.longitude,
            preferred_group_size: profile.preferred_group_size,
            days: join_days(&profile.days),
            hours: join_hours(&profile.hours),
            topics: join_topics(&profile.topics),
        }
    }
}

/// A persisted membership row.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MembershipRecord {
    pub id: RecordId,
    pub cluster_id: ClusterId,
    pub skill_level: SkillLevel,
    pub group_name: String,
    pub latitude: f64,
    pub longitude: f64,
    pub preferred_group_size: GroupSize,
    /// Comma-joined weekday names.
    pub days: String,
    /// Comma-joined hour slots.
    pub hours: String,
    /// Comma-joined topic names.
    pub topics: String,
    pub joined_at: DateTime<Utc>,
}

impl MembershipRecord {
    pub fn topic_set(&self) -> BTreeSet<Topic> {
        parse_list(&self.topics, Topic::from_name)
    }

    pub fn day_set(&self) -> BTreeSet<Weekday> {
        parse_list(&self.days, Weekday::from_name)
    }

    pub fn hour_set(&self) -> BTreeSet<u8> {
        parse_list(&self.hours, parse_hour)
    }
}

/// Storage contract for memberships.
pub trait MembershipStore: Send {
    /// Append one record and return its new identifier.
    fn append(&self, record: &NewMembership) -> Result<RecordId>;

    /// Append several records atomically.
    fn append_batch(&self, records: &[NewMembership]) -> Result<Vec<RecordId>> {
        records.iter().map(|r| self.append(r)).collect()
    }

    /// All members of `group_name` within `cluster_id`, oldest first.
    fn query_by_group_and_cluster(
        &self,
        group_name: &str,
        cluster_id: ClusterId,
    ) -> Result<Vec<MembershipRecord>>;

    /// All records in a cluster, oldest first.
    fn in_cluster(&self, cluster_id: ClusterId) -> Result<Vec<MembershipRecord>>;

    /// Every record, oldest first.
    fn all(&self) -> Result<Vec<MembershipRecord>>;

    fn len(&self) -> Result<usize> {
        Ok(self.all()?.len())
    }
}

/// Placeholder tokens written for users with an empty set.
const EMPTY_MARKERS: &[&str] = &["No Topics", "No Days", "No Hours"];

pub fn join_topics(topics: &BTreeSet<Topic>) -> String {
    topics.iter().map(|t| t.name()).collect::<Vec<_>>().join(",")
}

pub fn join_days(days: &BTreeSet<Weekday>) -> String {
    days.iter().map(|d| d.name()).collect::<Vec<_>>().join(",")
}

pub fn join_hours(hours: &BTreeSet<u8>) -> String {
    hours.iter().map(|h| h.to_string()).collect::<Vec<_>>().join(",")
}

/// Parse a comma-joined column. Empty tokens and placeholders are skipped;
/// unknown tokens are logged and skipped.
fn parse_list<T: Ord>(joined: &str, parse: impl Fn(&str) -> Option<T>) -> BTreeSet<T> {
    joined
        .split(',')
        .map(str::trim)
        .filter(|tok| !tok.is_empty() && !EMPTY_MARKERS.contains(tok))
        .filter_map(|tok| {
            let parsed = parse(tok);
            if parsed.is_none() {
                warn!("skipping unrecognized registry token {tok:?}");
            }
            parsed
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(topics: &str, days: &str, hours: &str) -> MembershipRecord {
        MembershipRecord {
            id: 1,
            cluster_id: 0,
            skill_level: SkillLevel::Beginner,
            group_name: "Group_Python".into(),
            latitude: 0.0,
            longitude: 0.0,
            preferred_group_size: GroupSize::Small,
            days: days.into(),
            hours: hours.into(),
            topics: topics.into(),
            joined_at: Utc::now(),
        }
    }

    #[test]
    fn test_parse_columns() {
        let r = record("Python,Machine Learning", "Monday,Sunday", "Hour_9,10");
        assert_eq!(
            r.topic_set().into_iter().collect::<Vec<_>>(),
            vec![Topic::MachineLearning, Topic::Python]
        );
        assert_eq!(
            r.day_set().into_iter().collect::<Vec<_>>(),
            vec![Weekday::Monday, Weekday::Sunday]
        );
        assert_eq!(r.hour_set().into_iter().collect::<Vec<_>>(), vec![9, 10]);
    }

    #[test]
    fn test_placeholders_parse_empty() {
        let r = record("No Topics", "No Days", "No Hours");
        assert!(r.topic_set().is_empty());
        assert!(r.day_set().is_empty());
        assert!(r.hour_set().is_empty());
    }

    #[test]
    fn test_unknown_tokens_skipped() {
        let r = record("Python,Knitting", "", "7,99");
        assert_eq!(r.topic_set().len(), 1);
        assert!(r.day_set().is_empty());
        assert_eq!(r.hour_set().into_iter().collect::<Vec<_>>(), vec![7]);
    }

    #[test]
    fn test_join_roundtrip() {
        let topics: BTreeSet<Topic> = [Topic::Statistics, Topic::BigData].into_iter().collect();
        let joined = join_topics(&topics);
        assert_eq!(joined, "Big Data,Statistics");
        assert_eq!(parse_list(&joined, Topic::from_name), topics);
    }
}
