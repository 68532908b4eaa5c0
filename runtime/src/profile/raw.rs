//! Raw profile payloads as submitted by callers, and their validation.

use super::types::*;
use crate::error::{MatchError, Result};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use tracing::warn;

/// Unvalidated profile fields, shaped like the submitted form.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RawProfile {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub skill_level: Option<String>,
    #[serde(default)]
    pub topics: Vec<String>,
    #[serde(default)]
    pub latitude: Option<f64>,
    #[serde(default)]
    pub longitude: Option<f64>,
    #[serde(default)]
    pub preferred_group_size: Option<String>,
    #[serde(default)]
    pub days: Vec<String>,
    #[serde(default)]
    pub hours: Vec<String>,
}

impl RawProfile {
    /// Validate into a [`UserProfile`].
    ///
    /// Missing fields and out-of-range coordinates are rejected. Unrecognized
    /// skill or group size names fall back to the lowest code with a warning.
    pub fn validate(&self) -> Result<UserProfile> {
        let skill = self
            .skill_level
            .as_deref()
            .ok_or_else(|| MatchError::invalid("skill_level", "missing"))?;
        let skill_level = SkillLevel::from_name(skill).unwrap_or_else(|| {
            warn!("unrecognized skill level {skill:?}, using Beginner");
            SkillLevel::Beginner
        });

        let size = self
            .preferred_group_size
            .as_deref()
            .ok_or_else(|| MatchError::invalid("preferred_group_size", "missing"))?;
        let preferred_group_size = GroupSize::from_name(size).unwrap_or_else(|| {
            warn!("unrecognized group size {size:?}, using Small");
            GroupSize::Small
        });

        let latitude = coordinate("latitude", self.latitude, 90.0)?;
        let longitude = coordinate("longitude", self.longitude, 180.0)?;

        let topics = self
            .topics
            .iter()
            .map(|t| {
                Topic::from_name(t)
                    .ok_or_else(|| MatchError::invalid("topics", format!("unknown topic {t:?}")))
            })
            .collect::<Result<BTreeSet<_>>>()?;

        let days = self
            .days
            .iter()
            .map(|d| {
                Weekday::from_name(d)
                    .ok_or_else(|| MatchError::invalid("days", format!("unknown day {d:?}")))
            })
            .collect::<Result<BTreeSet<_>>>()?;

        let hours = self
            .hours
            .iter()
            .map(|h| {
                parse_hour(h)
                    .ok_or_else(|| MatchError::invalid("hours", format!("invalid hour {h:?}")))
            })
            .collect::<Result<BTreeSet<_>>>()?;

        Ok(UserProfile {
            skill_level,
            topics,
            latitude,
            longitude,
            preferred_group_size,
            days,
            hours,
        })
    }
}

fn coordinate(field: &'static str, value: Option<f64>, bound: f64) -> Result<f64> {
    let v = value.ok_or_else(|| MatchError::invalid(field, "missing"))?;
    if !v.is_finite() {
        return Err(MatchError::invalid(field, "must be a finite number"));
    }
    if v.abs() > bound {
        return Err(MatchError::invalid(field, format!("{v} outside ±{bound}")));
    }
    Ok(v)
}

impl From<&UserProfile> for RawProfile {
    fn from(p: &UserProfile) -> Self {
        Self {
            name: None,
            skill_level: Some(p.skill_level.name().to_string()),
            topics: p.topics.iter().map(|t| t.name().to_string()).collect(),
            latitude: Some(p.latitude),
            longitude: Some(p.longitude),
            preferred_group_size: Some(p.preferred_group_size.name().to_string()),
            days: p.days.iter().map(|d| d.name().to_string()).collect(),
            hours: p.hours.iter().map(|h| h.to_string()).collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> RawProfile {
        RawProfile {
            name: Some("Ada".into()),
            skill_level: Some("Intermediate".into()),
            topics: vec!["Python".into(), "SQL".into()],
            latitude: Some(40.7),
            longitude: Some(-74.0),
            preferred_group_size: Some("Medium".into()),
            days: vec!["Monday".into()],
            hours: vec!["9".into(), "Hour_10".into()],
        }
    }

    #[test]
    fn test_validate_ok() {
        let p = sample().validate().unwrap();
        assert_eq!(p.skill_level, SkillLevel::Intermediate);
        assert_eq!(p.preferred_group_size, GroupSize::Medium);
        assert!(p.topics.contains(&Topic::Python));
        assert!(p.topics.contains(&Topic::Sql));
        assert_eq!(p.hours.iter().copied().collect::<Vec<_>>(), vec![9, 10]);
    }

    #[test]
    fn test_unknown_skill_falls_back() {
        let mut raw = sample();
        raw.skill_level = Some("Guru".into());
        raw.preferred_group_size = Some("Enormous".into());
        let p = raw.validate().unwrap();
        assert_eq!(p.skill_level, SkillLevel::Beginner);
        assert_eq!(p.preferred_group_size, GroupSize::Small);
    }

    #[test]
    fn test_missing_latitude_rejected() {
        let mut raw = sample();
        raw.latitude = None;
        let err = raw.validate().unwrap_err();
        assert!(matches!(err, MatchError::InvalidInput { field: "latitude", .. }));
    }

    #[test]
    fn test_out_of_range_longitude_rejected() {
        let mut raw = sample();
        raw.longitude = Some(200.0);
        assert!(raw.validate().is_err());
    }

    #[test]
    fn test_unknown_topic_rejected() {
        let mut raw = sample();
        raw.topics.push("Knitting".into());
        let err = raw.validate().unwrap_err();
        assert!(matches!(err, MatchError::InvalidInput { field: "topics", .. }));
    }

    #[test]
    fn test_roundtrip_from_profile() {
        let p = sample().validate().unwrap();
        let again = RawProfile::from(&p).validate().unwrap();
        assert_eq!(p, again);
    }
}
