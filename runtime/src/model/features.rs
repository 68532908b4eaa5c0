//! Feature vector layout. The order here is the clustering model's input contract.

use crate::profile::HOURS_PER_DAY;

/// Total feature dimensions.
pub const FEATURE_DIM: usize = 41;

pub type FeatureVector = [f64; FEATURE_DIM];

// ── Scalar features (0-3) ──
pub const FEAT_LATITUDE: usize = 0;
pub const FEAT_LONGITUDE: usize = 1;
pub const FEAT_SKILL_LEVEL: usize = 2;
pub const FEAT_GROUP_SIZE: usize = 3;

// ── Topic flags (4-9) ──
pub const FEAT_TOPICS_START: usize = 4;
pub const TOPIC_COUNT: usize = 6;

// ── Hour flags (10-33) ──
pub const FEAT_HOURS_START: usize = FEAT_TOPICS_START + TOPIC_COUNT;

// ── Day flags (34-40) ──
pub const FEAT_DAYS_START: usize = FEAT_HOURS_START + HOURS_PER_DAY;
pub const DAY_COUNT: usize = 7;

const _: () = assert!(FEAT_DAYS_START + DAY_COUNT == FEATURE_DIM);

/// Squared Euclidean distance between two feature vectors.
pub fn squared_distance(a: &FeatureVector, b: &FeatureVector) -> f64 {
    a.iter().zip(b.iter()).map(|(x, y)| (x - y) * (x - y)).sum()
}
