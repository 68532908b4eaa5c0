// Copyright 2026 StudyMatch Contributors
// SPDX-License-Identifier: Apache-2.0

//! Profile flags shared by `match` and `join`.

use crate::profile::RawProfile;
use anyhow::{Context, Result};
use clap::Args;
use std::path::PathBuf;

#[derive(Args, Debug, Clone, Default)]
pub struct ProfileArgs {
    /// Read the profile from a JSON file instead of flags
    #[arg(long, value_name = "FILE")]
    pub profile: Option<PathBuf>,

    /// Display name (not stored)
    #[arg(long)]
    pub name: Option<String>,

    /// Beginner, Intermediate or Advanced
    #[arg(long)]
    pub skill: Option<String>,

    /// Topic of interest (repeatable)
    #[arg(long = "topic")]
    pub topics: Vec<String>,

    #[arg(long, allow_negative_numbers = true)]
    pub lat: Option<f64>,

    #[arg(long, allow_negative_numbers = true)]
    pub lon: Option<f64>,

    /// Small, Medium or Large
    #[arg(long)]
    pub size: Option<String>,

    /// Available weekday (repeatable)
    #[arg(long = "day")]
    pub days: Vec<String>,

    /// Available hour 0-23 (repeatable)
    #[arg(long = "hour")]
    pub hours: Vec<String>,
}

impl ProfileArgs {
    /// Build the raw payload. Flags override fields read from `--profile`.
    pub fn to_raw(&self) -> Result<RawProfile> {
        let mut raw = match &self.profile {
            Some(path) => {
                let text = std::fs::read_to_string(path)
                    .with_context(|| format!("reading {}", path.display()))?;
                serde_json::from_str(&text)
                    .with_context(|| format!("parsing profile {}", path.display()))?
            }
            None => RawProfile::default(),
        };

        if self.name.is_some() {
            raw.name = self.name.clone();
        }
        if self.skill.is_some() {
            raw.skill_level = self.skill.clone();
        }
        if !self.topics.is_empty() {
            raw.topics = self.topics.clone();
        }
        if self.lat.is_some() {
            raw.latitude = self.lat;
        }
        if self.lon.is_some() {
            raw.longitude = self.lon;
        }
        if self.size.is_some() {
            raw.preferred_group_size = self.size.clone();
        }
        if !self.days.is_empty() {
            raw.days = self.days.clone();
        }
        if !self.hours.is_empty() {
            raw.hours = self.hours.clone();
        }
        Ok(raw)
    }
}
