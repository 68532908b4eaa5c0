//! Offline model fitting and study group assignment.
//!
//! Produces the two frozen artifacts the runtime loads (scaler and k-means
//! model) plus the seed memberships for the registry. Profiles are encoded
//! with [`encode_features`], the same function the runtime uses, so the
//! trained model and the request path always agree on scaling.

pub mod evaluate;
pub mod grouping;

pub use evaluate::{default_group_loss, LossReport};
pub use grouping::{assign_groups, top_topics};

use crate::error::{MatchError, Result};
use crate::matching::encode_features;
use crate::model::{ClusterId, CoordinateScaler, FeatureVector, KMeansModel, ModelArtifacts};
use crate::profile::{RawProfile, UserProfile};
use crate::registry::NewMembership;
use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing::info;

/// Knobs for [`fit`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FitOptions {
    /// Requested number of clusters; clamped to the number of users.
    pub clusters: usize,
    pub max_iterations: usize,
    /// Dominant topics per cluster that get their own group.
    pub top_topics: usize,
    /// Group for members holding none of their cluster's top topics.
    pub default_group: String,
}

impl Default for FitOptions {
    fn default() -> Self {
        Self {
            clusters: 75,
            max_iterations: 100,
            top_topics: 3,
            default_group: "Group_3".to_string(),
        }
    }
}

/// Everything a fit run produces.
#[derive(Debug, Clone)]
pub struct FitReport {
    pub artifacts: ModelArtifacts,
    /// Cluster of each input profile.
    pub assignments: Vec<ClusterId>,
    /// One seed membership per input profile, in input order.
    pub memberships: Vec<NewMembership>,
    pub inertia: f64,
    pub iterations: usize,
}

impl FitReport {
    pub fn cluster_count(&self) -> usize {
        self.artifacts.model.centroids().len()
    }
}

/// Read a JSON array of historical users.
pub fn load_users(path: &Path) -> Result<Vec<UserProfile>> {
    let data = std::fs::read_to_string(path)?;
    let raw: Vec<RawProfile> = serde_json::from_str(&data)?;
    raw.iter()
        .enumerate()
        .map(|(i, r)| {
            r.validate().map_err(|e| MatchError::Training {
                reason: format!("user {i}: {e}"),
            })
        })
        .collect()
}

/// Fit scaler and clusters, then assign study groups.
pub fn fit(profiles: &[UserProfile], options: &FitOptions) -> Result<FitReport> {
    if profiles.is_empty() {
        return Err(MatchError::Training {
            reason: "no users to fit".into(),
        });
    }

    let coords: Vec<(f64, f64)> = profiles.iter().map(|p| (p.latitude, p.longitude)).collect();
    let scaler = CoordinateScaler::fit(&coords)?;
    info!(users = profiles.len(), mean = ?scaler.mean, scale = ?scaler.scale, "fitted coordinate scaler");

    let features: Vec<FeatureVector> = profiles.iter().map(|p| encode_features(p, &scaler)).collect();
    let km = KMeansModel::fit(&features, options.clusters, options.max_iterations)?;

    let groups = assign_groups(profiles, &km.assignments, options.top_topics, &options.default_group);
    let memberships = profiles
        .iter()
        .zip(km.assignments.iter())
        .zip(groups.iter())
        .map(|((p, &c), g)| NewMembership::from_profile(p, g, c))
        .collect();

    Ok(FitReport {
        artifacts: ModelArtifacts {
            model: km.model,
            scaler,
        },
        assignments: km.assignments,
        memberships,
        inertia: km.inertia,
        iterations: km.iterations,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::ClusterModel;
    use crate::profile::*;

    fn user(topics: &[Topic], lat: f64, lon: f64) -> UserProfile {
        UserProfile {
            skill_level: SkillLevel::Intermediate,
            topics: topics.iter().copied().collect(),
            latitude: lat,
            longitude: lon,
            preferred_group_size: GroupSize::Medium,
            days: [Weekday::Monday].into_iter().collect(),
            hours: [9].into_iter().collect(),
        }
    }

    #[test]
    fn test_fit_produces_consistent_artifacts() {
        let mut profiles = Vec::new();
        for i in 0..8 {
            profiles.push(user(&[Topic::Python, Topic::MachineLearning], 40.0 + i as f64 * 0.01, -74.0));
        }
        for i in 0..8 {
            profiles.push(user(&[Topic::Statistics], -33.0 - i as f64 * 0.01, 151.0));
        }
        let options = FitOptions {
            clusters: 2,
            ..FitOptions::default()
        };
        let report = fit(&profiles, &options).unwrap();

        assert_eq!(report.cluster_count(), 2);
        assert_eq!(report.memberships.len(), 16);
        assert_ne!(report.assignments[0], report.assignments[8]);

        // Runtime encoding of a training row predicts its training cluster
        for (p, &c) in profiles.iter().zip(report.assignments.iter()) {
            let feats = encode_features(p, &report.artifacts.scaler);
            assert_eq!(report.artifacts.model.predict(&feats), c);
        }

        assert_eq!(report.memberships[0].group_name, "Group_Machine Learning");
        assert_eq!(report.memberships[8].group_name, "Group_Statistics");
    }

    #[test]
    fn test_fit_rejects_empty_input() {
        assert!(fit(&[], &FitOptions::default()).is_err());
    }

    #[test]
    fn test_load_users_reports_bad_row() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("users.json");
        std::fs::write(
            &path,
            r#"[
                {"skill_level":"Beginner","topics":["SQL"],"latitude":1.0,"longitude":2.0,
                 "preferred_group_size":"Small","days":["Monday"],"hours":["Hour_8"]},
                {"skill_level":"Beginner","topics":[],"longitude":2.0,"preferred_group_size":"Small"}
            ]"#,
        )
        .unwrap();
        let err = load_users(&path).unwrap_err();
        assert!(err.to_string().contains("user 1"));
    }
}
