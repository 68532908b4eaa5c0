//! Frozen model artifacts: the feature layout, the coordinate scaler and the
//! k-means cluster model.
//!
//! Both artifacts are loaded once at process start. A missing or incompatible
//! file is a [`MatchError::ModelLoad`](crate::error::MatchError::ModelLoad)
//! and the process must not serve requests.

pub mod features;
pub mod kmeans;
pub mod scaler;

pub use features::{FeatureVector, FEATURE_DIM};
pub use kmeans::{ClusterModel, KMeansFit, KMeansModel};
pub use scaler::CoordinateScaler;

use crate::error::Result;
use std::path::Path;
use tracing::info;

/// Opaque cluster label assigned by the model.
pub type ClusterId = u32;

/// The pair of artifacts the runtime needs.
#[derive(Debug, Clone)]
pub struct ModelArtifacts {
    pub model: KMeansModel,
    pub scaler: CoordinateScaler,
}

impl ModelArtifacts {
    /// Load both artifacts, failing on the first problem.
    pub fn load(model_path: &Path, scaler_path: &Path) -> Result<Self> {
        let model = KMeansModel::load(model_path)?;
        let scaler = CoordinateScaler::load(scaler_path)?;
        info!(
            clusters = model.n_clusters(),
            "loaded model from {} and scaler from {}",
            model_path.display(),
            scaler_path.display()
        );
        Ok(Self { model, scaler })
    }

    pub fn save(&self, model_path: &Path, scaler_path: &Path) -> Result<()> {
        self.model.save(model_path)?;
        self.scaler.save(scaler_path)?;
        Ok(())
    }
}
