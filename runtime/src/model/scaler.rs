//! Frozen standardization transform for latitude and longitude.

use crate::error::{MatchError, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Per-column `(x - mean) / scale` transform, fitted once offline.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CoordinateScaler {
    /// Column means: `[latitude, longitude]`.
    pub mean: [f64; 2],
    /// Column standard deviations: `[latitude, longitude]`.
    pub scale: [f64; 2],
}

impl CoordinateScaler {
    /// Fit means and population standard deviations.
    ///
    /// A constant column gets scale 1.0 so the transform stays defined.
    pub fn fit(points: &[(f64, f64)]) -> Result<Self> {
        if points.is_empty() {
            return Err(MatchError::Training {
                reason: "cannot fit scaler on zero rows".into(),
            });
        }
        let n = points.len() as f64;
        let mean_lat = points.iter().map(|p| p.0).sum::<f64>() / n;
        let mean_lon = points.iter().map(|p| p.1).sum::<f64>() / n;
        let var_lat = points.iter().map(|p| (p.0 - mean_lat).powi(2)).sum::<f64>() / n;
        let var_lon = points.iter().map(|p| (p.1 - mean_lon).powi(2)).sum::<f64>() / n;

        Ok(Self {
            mean: [mean_lat, mean_lon],
            scale: [nonzero_scale(var_lat.sqrt()), nonzero_scale(var_lon.sqrt())],
        })
    }

    /// Apply the transform to one coordinate.
    pub fn transform(&self, latitude: f64, longitude: f64) -> (f64, f64) {
        (
            (latitude - self.mean[0]) / self.scale[0],
            (longitude - self.mean[1]) / self.scale[1],
        )
    }

    /// Load a scaler written by [`CoordinateScaler::save`].
    pub fn load(path: &Path) -> Result<Self> {
        let data = std::fs::read_to_string(path)
            .map_err(|e| MatchError::model_load(path, e.to_string()))?;
        let scaler: Self =
            serde_json::from_str(&data).map_err(|e| MatchError::model_load(path, e.to_string()))?;
        let all_finite = scaler.mean.iter().chain(scaler.scale.iter()).all(|v| v.is_finite());
        if !all_finite || scaler.scale.iter().any(|s| *s == 0.0) {
            return Err(MatchError::model_load(path, "scaler parameters must be finite with non-zero scale"));
        }
        Ok(scaler)
    }

    pub fn save(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(path, serde_json::to_string_pretty(self)?)?;
        Ok(())
    }
}

fn nonzero_scale(std: f64) -> f64 {
    if std == 0.0 {
        1.0
    } else {
        std
    }
}
