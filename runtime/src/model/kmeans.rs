//! K-means cluster model: offline fitting and nearest-centroid prediction.

use super::features::{squared_distance, FeatureVector, FEATURE_DIM};
use super::ClusterId;
use crate::error::{MatchError, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing::{debug, info};

/// The lookup contract the matching core depends on.
pub trait ClusterModel: Send + Sync {
    /// Assign a feature vector to a cluster.
    fn predict(&self, features: &FeatureVector) -> ClusterId;

    /// Number of clusters the model distinguishes.
    fn n_clusters(&self) -> usize;
}

/// Trained k-means centroids.
#[derive(Debug, Clone, PartialEq)]
pub struct KMeansModel {
    centroids: Vec<FeatureVector>,
}

/// On-disk layout of a model file.
#[derive(Serialize, Deserialize)]
struct ModelFile {
    feature_dim: usize,
    centroids: Vec<Vec<f64>>,
}

/// Output of [`KMeansModel::fit`].
#[derive(Debug, Clone)]
pub struct KMeansFit {
    pub model: KMeansModel,
    /// Cluster of each input row, in input order.
    pub assignments: Vec<ClusterId>,
    /// Sum of squared distances from each row to its centroid.
    pub inertia: f64,
    pub iterations: usize,
}

impl KMeansModel {
    pub fn from_centroids(centroids: Vec<FeatureVector>) -> Result<Self> {
        if centroids.is_empty() {
            return Err(MatchError::Training {
                reason: "model needs at least one centroid".into(),
            });
        }
        Ok(Self { centroids })
    }

    pub fn centroids(&self) -> &[FeatureVector] {
        &self.centroids
    }

    /// Fit k-means with Lloyd iterations.
    ///
    /// k = min(k, n). Centroids are initialized by evenly spacing through the
    /// data, so the same input always yields the same model.
    pub fn fit(data: &[FeatureVector], k: usize, max_iterations: usize) -> Result<KMeansFit> {
        let n = data.len();
        if n == 0 {
            return Err(MatchError::Training {
                reason: "cannot cluster zero rows".into(),
            });
        }
        if k == 0 {
            return Err(MatchError::Training {
                reason: "cluster count must be positive".into(),
            });
        }
        let k = k.min(n);

        let mut centroids: Vec<FeatureVector> = (0..k).map(|i| data[i * n / k]).collect();
        let mut assignments = vec![0 as ClusterId; n];
        let mut iterations = 0;

        for iter in 0..max_iterations.max(1) {
            iterations = iter + 1;
            let mut changed = false;

            // Assign each point to nearest centroid
            for (i, feat) in data.iter().enumerate() {
                let best = nearest(&centroids, feat);
                if assignments[i] != best {
                    assignments[i] = best;
                    changed = true;
                }
            }

            if !changed && iter > 0 {
                break;
            }

            // Recompute centroids; empty clusters keep their previous position
            let mut sums = vec![[0.0f64; FEATURE_DIM]; k];
            let mut counts = vec![0usize; k];
            for (feat, &c) in data.iter().zip(assignments.iter()) {
                let c = c as usize;
                counts[c] += 1;
                for (d, &val) in feat.iter().enumerate() {
                    sums[c][d] += val;
                }
            }
            for c in 0..k {
                if counts[c] > 0 {
                    for (d, sum_val) in sums[c].iter().enumerate() {
                        centroids[c][d] = sum_val / counts[c] as f64;
                    }
                }
            }
            debug!(iteration = iterations, "k-means centroids updated");
        }

        // Final assignment against the settled centroids
        for (i, feat) in data.iter().enumerate() {
            assignments[i] = nearest(&centroids, feat);
        }
        let inertia = data
            .iter()
            .zip(assignments.iter())
            .map(|(feat, &c)| squared_distance(feat, &centroids[c as usize]))
            .sum();

        info!(k, n, iterations, inertia, "k-means fit complete");

        Ok(KMeansFit {
            model: Self { centroids },
            assignments,
            inertia,
            iterations,
        })
    }

    /// Load a model written by [`KMeansModel::save`].
    pub fn load(path: &Path) -> Result<Self> {
        let data = std::fs::read_to_string(path)
            .map_err(|e| MatchError::model_load(path, e.to_string()))?;
        let file: ModelFile =
            serde_json::from_str(&data).map_err(|e| MatchError::model_load(path, e.to_string()))?;

        if file.feature_dim != FEATURE_DIM {
            return Err(MatchError::model_load(
                path,
                format!("model expects {} features, encoder produces {FEATURE_DIM}", file.feature_dim),
            ));
        }
        if file.centroids.is_empty() {
            return Err(MatchError::model_load(path, "model has no centroids"));
        }

        let mut centroids = Vec::with_capacity(file.centroids.len());
        for (i, row) in file.centroids.iter().enumerate() {
            let centroid: FeatureVector = row.as_slice().try_into().map_err(|_| {
                MatchError::model_load(
                    path,
                    format!("centroid {i} has {} values, expected {FEATURE_DIM}", row.len()),
                )
            })?;
            if centroid.iter().any(|v| !v.is_finite()) {
                return Err(MatchError::model_load(path, format!("centroid {i} is not finite")));
            }
            centroids.push(centroid);
        }

        Ok(Self { centroids })
    }

    pub fn save(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let file = ModelFile {
            feature_dim: FEATURE_DIM,
            centroids: self.centroids.iter().map(|c| c.to_vec()).collect(),
        };
        std::fs::write(path, serde_json::to_string(&file)?)?;
        Ok(())
    }
}

impl ClusterModel for KMeansModel {
    fn predict(&self, features: &FeatureVector) -> ClusterId {
        nearest(&self.centroids, features)
    }

    fn n_clusters(&self) -> usize {
        self.centroids.len()
    }
}

/// Index of the nearest centroid; ties go to the lowest index.
fn nearest(centroids: &[FeatureVector], feat: &FeatureVector) -> ClusterId {
    let mut best_cluster = 0 as ClusterId;
    let mut best_dist = f64::MAX;
    for (c, centroid) in centroids.iter().enumerate() {
        let dist = squared_distance(feat, centroid);
        if dist < best_dist {
            best_dist = dist;
            best_cluster = c as ClusterId;
        }
    }
    best_cluster
}
