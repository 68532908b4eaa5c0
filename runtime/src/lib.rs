//! StudyMatch: match learners to existing study groups.
//!
//! A user profile is encoded into a fixed 41-element feature vector, assigned
//! to a cluster by a pre-trained k-means model, and scored against every study
//! group recorded in that cluster. Joining a group appends a membership to an
//! append-only registry that later matches read from.

pub mod cli;
pub mod config;
pub mod error;
pub mod matching;
pub mod model;
pub mod profile;
pub mod registry;
pub mod server;
pub mod training;

pub use error::{MatchError, Result};
