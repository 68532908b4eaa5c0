//! Weighted match scoring between a user and group aggregates.

use super::aggregate::GroupAggregate;
use super::geo::{great_circle_km, proximity};
use crate::profile::UserProfile;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// Weight of the topic overlap percentage.
pub const TOPIC_WEIGHT: f64 = 0.6;
/// Weight of the mean of day and hour overlap percentages.
pub const AVAILABILITY_WEIGHT: f64 = 0.3;
/// Weight of the proximity score expressed as a percentage.
pub const PROXIMITY_WEIGHT: f64 = 0.1;

/// Unrounded sub-scores and combined score for one group.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct MatchScore {
    pub topic_pct: f64,
    pub day_pct: f64,
    pub hour_pct: f64,
    pub distance_km: f64,
    pub proximity: f64,
    pub combined_pct: f64,
}

/// Which value the ranking sorts on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RankingPolicy {
    /// Sort on full precision; round only when presenting.
    #[default]
    Unrounded,
    /// Sort on the 2-decimal presentation value; near-ties keep input order.
    Rounded,
}

/// A scored group, ready to rank.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RankedGroup {
    pub group: GroupAggregate,
    pub score: MatchScore,
}

/// Presentation row: every percentage rounded to 2 decimals.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GroupMatch {
    pub group_name: String,
    pub topic_match: f64,
    pub day_match: f64,
    pub hour_match: f64,
    pub match_percent: f64,
}

impl From<&RankedGroup> for GroupMatch {
    fn from(r: &RankedGroup) -> Self {
        Self {
            group_name: r.group.group_name.clone(),
            topic_match: round2(r.score.topic_pct),
            day_match: round2(r.score.day_pct),
            hour_match: round2(r.score.hour_pct),
            match_percent: round2(r.score.combined_pct),
        }
    }
}

/// Round to 2 decimal places.
pub fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

/// Percentage of the user's items that the group also has.
///
/// Normalized by the user's set size; an empty user set scores 0.
pub fn overlap_pct<T: Ord>(user: &BTreeSet<T>, group: &BTreeSet<T>) -> f64 {
    let matches = user.intersection(group).count();
    100.0 * matches as f64 / user.len().max(1) as f64
}

/// Score a user against one group aggregate.
pub fn score(profile: &UserProfile, group: &GroupAggregate) -> MatchScore {
    let topic_pct = if group.topics.is_empty() {
        0.0
    } else {
        overlap_pct(&profile.topics, &group.topics)
    };
    let day_pct = overlap_pct(&profile.days, &group.days);
    let hour_pct = overlap_pct(&profile.hours, &group.hours);

    let distance_km = great_circle_km(
        profile.latitude,
        profile.longitude,
        group.latitude,
        group.longitude,
    );
    let proximity = proximity(distance_km);

    let combined_pct = TOPIC_WEIGHT * topic_pct
        + AVAILABILITY_WEIGHT * ((day_pct + hour_pct) / 2.0)
        + PROXIMITY_WEIGHT * (proximity * 100.0);

    MatchScore {
        topic_pct,
        day_pct,
        hour_pct,
        distance_km,
        proximity,
        combined_pct,
    }
}

/// Score every group and sort by combined score, highest first.
///
/// The sort is stable: equal scores keep the order of `groups`.
pub fn rank(profile: &UserProfile, groups: &[GroupAggregate], policy: RankingPolicy) -> Vec<RankedGroup> {
    let mut ranked: Vec<RankedGroup> = groups
        .iter()
        .map(|g| RankedGroup {
            group: g.clone(),
            score: score(profile, g),
        })
        .collect();

    let key = |r: &RankedGroup| match policy {
        RankingPolicy::Unrounded => r.score.combined_pct,
        RankingPolicy::Rounded => round2(r.score.combined_pct),
    };
    ranked.sort_by(|a, b| key(b).total_cmp(&key(a)));
    ranked
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::profile::*;

    fn user(topics: &[Topic], days: &[Weekday], hours: &[u8]) -> UserProfile {
        UserProfile {
            skill_level: SkillLevel::Beginner,
            topics: topics.iter().copied().collect(),
            latitude: 40.0,
            longitude: -74.0,
            preferred_group_size: GroupSize::Small,
            days: days.iter().copied().collect(),
            hours: hours.iter().copied().collect(),
        }
    }

    fn group(name: &str, topics: &[Topic], days: &[Weekday], hours: &[u8], lat: f64, lon: f64) -> GroupAggregate {
        GroupAggregate {
            group_name: name.into(),
            topics: topics.iter().copied().collect(),
            days: days.iter().copied().collect(),
            hours: hours.iter().copied().collect(),
            latitude: lat,
            longitude: lon,
            member_count: 1,
        }
    }

    #[test]
    fn test_reference_example() {
        let u = user(&[Topic::Python, Topic::Sql], &[Weekday::Monday], &[9]);
        let g = group(
            "Group_Python",
            &[Topic::Python, Topic::Statistics],
            &[Weekday::Monday, Weekday::Tuesday],
            &[9, 10],
            40.0,
            -74.0,
        );
        let s = score(&u, &g);
        assert_eq!(s.topic_pct, 50.0);
        assert_eq!(s.day_pct, 100.0);
        assert_eq!(s.hour_pct, 100.0);
        assert_eq!(s.distance_km, 0.0);
        assert_eq!(s.proximity, 1.0);
        // 0.6*50 + 0.3*100 + 0.1*100
        assert!((s.combined_pct - 70.0).abs() < 1e-9);
    }

    #[test]
    fn test_empty_user_topics_score_zero() {
        let u = user(&[], &[Weekday::Monday], &[9]);
        let g = group("G", &[Topic::Python], &[], &[], 40.0, -74.0);
        let s = score(&u, &g);
        assert_eq!(s.topic_pct, 0.0);
        assert_eq!(s.day_pct, 0.0);
    }

    #[test]
    fn test_empty_group_topics_score_zero() {
        let u = user(&[Topic::Python], &[], &[]);
        let g = group("Group_3", &[], &[], &[], 40.0, -74.0);
        assert_eq!(score(&u, &g).topic_pct, 0.0);
    }

    #[test]
    fn test_normalized_by_user_not_group() {
        let u = user(&[Topic::Python], &[], &[]);
        let g = group("G", &Topic::ALL, &[], &[], 40.0, -74.0);
        assert_eq!(score(&u, &g).topic_pct, 100.0);

        let broad = user(&Topic::ALL, &[], &[]);
        let narrow = group("G", &[Topic::Python], &[], &[], 40.0, -74.0);
        let pct = score(&broad, &narrow).topic_pct;
        assert!((pct - 100.0 / 6.0).abs() < 1e-9);
    }

    #[test]
    fn test_distance_only_lowers_proximity_term() {
        let u = user(&[Topic::Python], &[], &[]);
        let near = group("near", &[Topic::Python], &[], &[], 40.0, -74.0);
        let far = group("far", &[Topic::Python], &[], &[], -33.9, 151.2);
        let (sn, sf) = (score(&u, &near), score(&u, &far));
        assert!(sn.combined_pct > sf.combined_pct);
        assert!(sf.combined_pct > 60.0 && sf.combined_pct < 60.01);
    }

    #[test]
    fn test_rank_descending_and_stable() {
        let u = user(&[Topic::Python, Topic::Sql], &[], &[]);
        let groups = vec![
            group("a", &[Topic::Sql], &[], &[], 40.0, -74.0),
            group("b", &[Topic::Python, Topic::Sql], &[], &[], 40.0, -74.0),
            group("c", &[Topic::Python], &[], &[], 40.0, -74.0),
        ];
        let names: Vec<String> = rank(&u, &groups, RankingPolicy::Unrounded)
            .iter()
            .map(|r| r.group.group_name.clone())
            .collect();
        // a and c tie; a came first
        assert_eq!(names, ["b", "a", "c"]);
    }

    #[test]
    fn test_rounded_policy_keeps_input_order_on_near_ties() {
        let u = user(&[Topic::Python], &[], &[]);
        // same topic score, second group marginally closer
        let groups = vec![
            group("first", &[Topic::Python], &[], &[], 40.0, -73.0),
            group("second", &[Topic::Python], &[], &[], 40.0, -73.0001),
        ];
        let unrounded = rank(&u, &groups, RankingPolicy::Unrounded);
        assert_eq!(unrounded[0].group.group_name, "second");

        let rounded = rank(&u, &groups, RankingPolicy::Rounded);
        assert_eq!(rounded[0].group.group_name, "first");
    }

    #[test]
    fn test_presentation_rounding() {
        let u = user(&[Topic::Python, Topic::Sql, Topic::BigData], &[], &[]);
        let g = group("G", &[Topic::Python], &[], &[], 40.0, -74.0);
        let ranked = rank(&u, &[g], RankingPolicy::Unrounded);
        let row = GroupMatch::from(&ranked[0]);
        assert_eq!(row.topic_match, 33.33);
        assert_eq!(row.match_percent, 30.0);
    }
}
