//! Matching core: feature encoding, cluster lookup, group aggregation and
//! weighted scoring.

pub mod aggregate;
pub mod encoder;
pub mod geo;
pub mod pipeline;
pub mod scorer;

pub use aggregate::{aggregate, GroupAggregate};
pub use encoder::encode_features;
pub use pipeline::{MatchOutcome, Matcher};
pub use scorer::{rank, score, GroupMatch, MatchScore, RankedGroup, RankingPolicy};
