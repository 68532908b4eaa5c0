//! User profile attributes over the fixed matching schema.

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;

/// Number of hour slots in a day (0-23).
pub const HOURS_PER_DAY: usize = 24;

/// Self-reported skill level.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum SkillLevel {
    Beginner,
    Intermediate,
    Advanced,
}

impl SkillLevel {
    pub const ALL: [SkillLevel; 3] = [Self::Beginner, Self::Intermediate, Self::Advanced];

    /// Numeric code fed to the clustering model.
    pub fn code(self) -> f64 {
        match self {
            Self::Beginner => 0.0,
            Self::Intermediate => 1.0,
            Self::Advanced => 2.0,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Self::Beginner => "Beginner",
            Self::Intermediate => "Intermediate",
            Self::Advanced => "Advanced",
        }
    }

    pub fn from_name(s: &str) -> Option<Self> {
        let s = s.trim();
        Self::ALL.into_iter().find(|l| l.name().eq_ignore_ascii_case(s))
    }
}

impl fmt::Display for SkillLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Preferred study group size.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum GroupSize {
    Small,
    Medium,
    Large,
}

impl GroupSize {
    pub const ALL: [GroupSize; 3] = [Self::Small, Self::Medium, Self::Large];

    /// Numeric code fed to the clustering model.
    pub fn code(self) -> f64 {
        match self {
            Self::Small => 0.0,
            Self::Medium => 1.0,
            Self::Large => 2.0,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Self::Small => "Small",
            Self::Medium => "Medium",
            Self::Large => "Large",
        }
    }

    pub fn from_name(s: &str) -> Option<Self> {
        let s = s.trim();
        Self::ALL.into_iter().find(|g| g.name().eq_ignore_ascii_case(s))
    }
}

impl fmt::Display for GroupSize {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Topic vocabulary. Declaration order is the feature-vector order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Topic {
    #[serde(rename = "Big Data")]
    BigData,
    #[serde(rename = "Data Analysis")]
    DataAnalysis,
    #[serde(rename = "Machine Learning")]
    MachineLearning,
    Python,
    #[serde(rename = "SQL")]
    Sql,
    Statistics,
}

impl Topic {
    pub const ALL: [Topic; 6] = [
        Self::BigData,
        Self::DataAnalysis,
        Self::MachineLearning,
        Self::Python,
        Self::Sql,
        Self::Statistics,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Self::BigData => "Big Data",
            Self::DataAnalysis => "Data Analysis",
            Self::MachineLearning => "Machine Learning",
            Self::Python => "Python",
            Self::Sql => "SQL",
            Self::Statistics => "Statistics",
        }
    }

    pub fn from_name(s: &str) -> Option<Self> {
        let s = s.trim();
        Self::ALL.into_iter().find(|t| t.name().eq_ignore_ascii_case(s))
    }

    /// Position in the vocabulary.
    pub fn index(self) -> usize {
        self as usize
    }
}

impl fmt::Display for Topic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Day of the week, Monday first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Weekday {
    Monday,
    Tuesday,
    Wednesday,
    Thursday,
    Friday,
    Saturday,
    Sunday,
}

impl Weekday {
    pub const ALL: [Weekday; 7] = [
        Self::Monday,
        Self::Tuesday,
        Self::Wednesday,
        Self::Thursday,
        Self::Friday,
        Self::Saturday,
        Self::Sunday,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Self::Monday => "Monday",
            Self::Tuesday => "Tuesday",
            Self::Wednesday => "Wednesday",
            Self::Thursday => "Thursday",
            Self::Friday => "Friday",
            Self::Saturday => "Saturday",
            Self::Sunday => "Sunday",
        }
    }

    pub fn from_name(s: &str) -> Option<Self> {
        let s = s.trim();
        Self::ALL.into_iter().find(|d| d.name().eq_ignore_ascii_case(s))
    }

    pub fn index(self) -> usize {
        self as usize
    }
}

impl fmt::Display for Weekday {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Parse an hour slot written either as `"9"` or as the column name `"Hour_9"`.
pub fn parse_hour(s: &str) -> Option<u8> {
    let s = s.trim();
    let digits = s.strip_prefix("Hour_").unwrap_or(s);
    digits
        .parse::<u8>()
        .ok()
        .filter(|h| (*h as usize) < HOURS_PER_DAY)
}

/// A validated user profile, constructed per request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserProfile {
    pub skill_level: SkillLevel,
    pub topics: BTreeSet<Topic>,
    pub latitude: f64,
    pub longitude: f64,
    pub preferred_group_size: GroupSize,
    pub days: BTreeSet<Weekday>,
    pub hours: BTreeSet<u8>,
}
