//! User profiles: the fixed attribute schema and raw payload validation.

pub mod raw;
pub mod types;

pub use raw::RawProfile;
pub use types::*;
