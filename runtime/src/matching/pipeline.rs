//! End-to-end matching: encode, predict, aggregate, score, rank.

use super::aggregate::aggregate;
use super::encoder::encode_features;
use super::scorer::{rank, GroupMatch, RankedGroup, RankingPolicy};
use crate::error::{MatchError, Result};
use crate::model::{ClusterId, ClusterModel, CoordinateScaler, FeatureVector, ModelArtifacts};
use crate::profile::UserProfile;
use crate::registry::{MembershipStore, NewMembership, RecordId};
use serde::Serialize;
use tracing::{debug, info};

/// Ranked groups for one profile.
#[derive(Debug, Clone, Serialize)]
pub struct MatchOutcome {
    pub cluster_id: ClusterId,
    pub ranked: Vec<RankedGroup>,
}

impl MatchOutcome {
    /// Rounded presentation rows, in rank order.
    pub fn rows(&self) -> Vec<GroupMatch> {
        self.ranked.iter().map(GroupMatch::from).collect()
    }

    pub fn is_empty(&self) -> bool {
        self.ranked.is_empty()
    }
}

/// Holds the frozen model state and runs matching requests against a store.
pub struct Matcher {
    model: Box<dyn ClusterModel>,
    scaler: CoordinateScaler,
    policy: RankingPolicy,
}

impl Matcher {
    pub fn new(model: impl ClusterModel + 'static, scaler: CoordinateScaler, policy: RankingPolicy) -> Self {
        Self {
            model: Box::new(model),
            scaler,
            policy,
        }
    }

    pub fn from_artifacts(artifacts: ModelArtifacts, policy: RankingPolicy) -> Self {
        Self::new(artifacts.model, artifacts.scaler, policy)
    }

    pub fn policy(&self) -> RankingPolicy {
        self.policy
    }

    pub fn encode(&self, profile: &UserProfile) -> FeatureVector {
        encode_features(profile, &self.scaler)
    }

    /// Predict the cluster a profile belongs to.
    pub fn predict(&self, profile: &UserProfile) -> ClusterId {
        self.model.predict(&self.encode(profile))
    }

    /// Rank every group in the profile's predicted cluster.
    ///
    /// A cluster with no groups yields an empty outcome, not an error.
    pub fn match_profile(&self, profile: &UserProfile, store: &dyn MembershipStore) -> Result<MatchOutcome> {
        let cluster_id = self.predict(profile);
        debug!(cluster_id, "predicted cluster");

        let groups = aggregate(store, cluster_id)?;
        let ranked = rank(profile, &groups, self.policy);
        debug!(cluster_id, groups = ranked.len(), "ranked candidate groups");

        Ok(MatchOutcome { cluster_id, ranked })
    }

    /// Record that `profile` joined `group_name` in `cluster_id`.
    pub fn join(
        &self,
        profile: &UserProfile,
        group_name: &str,
        cluster_id: ClusterId,
        store: &dyn MembershipStore,
    ) -> Result<RecordId> {
        let group_name = group_name.trim();
        if group_name.is_empty() {
            return Err(MatchError::invalid("group_name", "missing"));
        }
        if cluster_id as usize >= self.model.n_clusters() {
            return Err(MatchError::invalid(
                "cluster_id",
                format!("model has {} clusters, got {cluster_id}", self.model.n_clusters()),
            ));
        }

        let id = store.append(&NewMembership::from_profile(profile, group_name, cluster_id))?;
        info!(id, group_name, cluster_id, "membership recorded");
        Ok(id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::features::FEAT_TOPICS_START;
    use crate::profile::*;
    use crate::registry::MemoryRegistry;

    /// Sends users interested in Python to cluster 1, everyone else to 0.
    struct PythonSplit;

    impl ClusterModel for PythonSplit {
        fn predict(&self, features: &FeatureVector) -> ClusterId {
            if features[FEAT_TOPICS_START + Topic::Python.index()] == 1.0 {
                1
            } else {
                0
            }
        }

        fn n_clusters(&self) -> usize {
            2
        }
    }

    fn matcher() -> Matcher {
        let scaler = CoordinateScaler {
            mean: [0.0, 0.0],
            scale: [1.0, 1.0],
        };
        Matcher::new(PythonSplit, scaler, RankingPolicy::Unrounded)
    }

    fn profile(topics: &[Topic]) -> UserProfile {
        UserProfile {
            skill_level: SkillLevel::Intermediate,
            topics: topics.iter().copied().collect(),
            latitude: 10.0,
            longitude: 10.0,
            preferred_group_size: GroupSize::Small,
            days: [Weekday::Wednesday].into_iter().collect(),
            hours: [18].into_iter().collect(),
        }
    }

    #[test]
    fn test_match_uses_predicted_cluster() {
        let m = matcher();
        let store = MemoryRegistry::new();
        let pythonista = profile(&[Topic::Python]);
        m.join(&pythonista, "Group_Python", 1, &store).unwrap();
        m.join(&profile(&[Topic::Sql]), "Group_SQL", 0, &store).unwrap();

        let outcome = m.match_profile(&pythonista, &store).unwrap();
        assert_eq!(outcome.cluster_id, 1);
        let rows = outcome.rows();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].group_name, "Group_Python");
        assert_eq!(rows[0].topic_match, 100.0);
        assert_eq!(rows[0].day_match, 100.0);
        assert_eq!(rows[0].hour_match, 100.0);
        assert_eq!(rows[0].match_percent, 100.0);
    }

    #[test]
    fn test_empty_cluster_is_not_an_error() {
        let m = matcher();
        let store = MemoryRegistry::new();
        let outcome = m.match_profile(&profile(&[Topic::Python]), &store).unwrap();
        assert!(outcome.is_empty());
    }

    #[test]
    fn test_join_then_query_roundtrip() {
        let m = matcher();
        let store = MemoryRegistry::new();
        let id = m.join(&profile(&[Topic::Sql]), "Group_SQL", 0, &store).unwrap();
        let rows = store.query_by_group_and_cluster("Group_SQL", 0).unwrap();
        assert_eq!(rows.iter().filter(|r| r.id == id).count(), 1);
        assert_eq!(rows[0].topics, "SQL");
        assert_eq!(rows[0].days, "Wednesday");
        assert_eq!(rows[0].hours, "18");
    }

    #[test]
    fn test_join_rejects_blank_group_and_unknown_cluster() {
        let m = matcher();
        let store = MemoryRegistry::new();
        let p = profile(&[]);
        assert!(matches!(
            m.join(&p, "  ", 0, &store),
            Err(MatchError::InvalidInput { field: "group_name", .. })
        ));
        assert!(matches!(
            m.join(&p, "Group_3", 7, &store),
            Err(MatchError::InvalidInput { field: "cluster_id", .. })
        ));
        assert_eq!(store.len().unwrap(), 0);
    }

    #[test]
    fn test_matching_is_idempotent() {
        let m = matcher();
        let store = MemoryRegistry::new();
        for name in ["Group_Python", "Group_3", "Group_Statistics"] {
            m.join(&profile(&[Topic::Python, Topic::Statistics]), name, 1, &store).unwrap();
        }
        let p = profile(&[Topic::Python]);
        let first = m.match_profile(&p, &store).unwrap().rows();
        let second = m.match_profile(&p, &store).unwrap().rows();
        assert_eq!(first, second);
        assert_eq!(store.len().unwrap(), 3);
    }
}
