//! Release packaging for amalgamated single-header libraries
//!
//! Validates the release version, stages a distributable directory around the
//! amalgamated header and archives it.

pub mod archive;
pub mod config;
pub mod error;
pub mod staging;
pub mod version;

pub use config::ReleaseConfig;
pub use error::ReleaseError;
pub use staging::{Release, ReleaseBuilder, ReleaseRequest};
pub use version::ReleaseVersion;
