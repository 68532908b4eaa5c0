//! Encode user profiles into 41-float feature vectors.

use crate::model::features::*;
use crate::model::CoordinateScaler;
use crate::profile::{UserProfile, HOURS_PER_DAY};

/// Encode a profile in the clustering model's input order.
///
/// The fit pipeline calls this same function, so training and inference
/// always see identically scaled coordinates.
pub fn encode_features(profile: &UserProfile, scaler: &CoordinateScaler) -> FeatureVector {
    let mut feats = [0.0f64; FEATURE_DIM];

    // ── Scalars (0-3) ──
    let (lat, lon) = scaler.transform(profile.latitude, profile.longitude);
    feats[FEAT_LATITUDE] = lat;
    feats[FEAT_LONGITUDE] = lon;
    feats[FEAT_SKILL_LEVEL] = profile.skill_level.code();
    feats[FEAT_GROUP_SIZE] = profile.preferred_group_size.code();

    // ── Topics (4-9) ──
    for topic in &profile.topics {
        feats[FEAT_TOPICS_START + topic.index()] = 1.0;
    }

    // ── Hours (10-33) ──
    // Slots past 23 are not hours; they would land in the day flags.
    for &hour in profile.hours.iter().filter(|h| (**h as usize) < HOURS_PER_DAY) {
        feats[FEAT_HOURS_START + hour as usize] = 1.0;
    }

    // ── Days (34-40) ──
    for day in &profile.days {
        feats[FEAT_DAYS_START + day.index()] = 1.0;
    }

    feats
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::profile::*;

    fn identity_scaler() -> CoordinateScaler {
        CoordinateScaler {
            mean: [0.0, 0.0],
            scale: [1.0, 1.0],
        }
    }

    fn profile() -> UserProfile {
        UserProfile {
            skill_level: SkillLevel::Advanced,
            topics: [Topic::BigData, Topic::Statistics].into_iter().collect(),
            latitude: 12.5,
            longitude: -3.0,
            preferred_group_size: GroupSize::Medium,
            days: [Weekday::Monday, Weekday::Sunday].into_iter().collect(),
            hours: [0, 23].into_iter().collect(),
        }
    }

    #[test]
    fn test_encode_layout() {
        let feats = encode_features(&profile(), &identity_scaler());

        assert_eq!(feats.len(), 41);
        assert_eq!(feats[FEAT_LATITUDE], 12.5);
        assert_eq!(feats[FEAT_LONGITUDE], -3.0);
        assert_eq!(feats[FEAT_SKILL_LEVEL], 2.0);
        assert_eq!(feats[FEAT_GROUP_SIZE], 1.0);

        // Big Data is first, Statistics last
        assert_eq!(feats[4], 1.0);
        assert_eq!(feats[9], 1.0);
        assert_eq!(feats[5..9].iter().sum::<f64>(), 0.0);

        // Hour 0 and hour 23
        assert_eq!(feats[10], 1.0);
        assert_eq!(feats[33], 1.0);
        assert_eq!(feats[11..33].iter().sum::<f64>(), 0.0);

        // Monday and Sunday
        assert_eq!(feats[34], 1.0);
        assert_eq!(feats[40], 1.0);
        assert_eq!(feats[35..40].iter().sum::<f64>(), 0.0);
    }

    #[test]
    fn test_every_weekday_has_its_own_slot() {
        for day in Weekday::ALL {
            let mut p = profile();
            p.days = [day].into_iter().collect();
            let feats = encode_features(&p, &identity_scaler());
            assert_eq!(feats[FEAT_DAYS_START + day.index()], 1.0, "{day}");
            assert_eq!(feats[FEAT_DAYS_START..].iter().sum::<f64>(), 1.0, "{day}");
        }
        assert_eq!(FEAT_DAYS_START + Weekday::Sunday.index(), FEATURE_DIM - 1);
    }

    #[test]
    fn test_out_of_range_hours_are_ignored() {
        let mut p = profile();
        p.hours = [5, 24, 200].into_iter().collect();
        p.days.clear();
        let feats = encode_features(&p, &identity_scaler());
        assert_eq!(feats[FEAT_HOURS_START + 5], 1.0);
        assert_eq!(feats[FEAT_HOURS_START..].iter().sum::<f64>(), 1.0);
    }

    #[test]
    fn test_encode_applies_scaler() {
        let scaler = CoordinateScaler {
            mean: [10.0, -5.0],
            scale: [2.5, 2.0],
        };
        let feats = encode_features(&profile(), &scaler);
        assert!((feats[FEAT_LATITUDE] - 1.0).abs() < 1e-12);
        assert!((feats[FEAT_LONGITUDE] - 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_empty_sets_encode_zero_flags() {
        let mut p = profile();
        p.topics.clear();
        p.days.clear();
        p.hours.clear();
        let feats = encode_features(&p, &identity_scaler());
        assert!(feats[FEAT_TOPICS_START..].iter().all(|&v| v == 0.0));
    }
}
