//! Merge a tree of interdependent headers into one self-contained header
//!
//! Units are discovered by file name, their include lines are classified as
//! internal (another unit) or external, units are ordered so that every unit
//! follows what it includes, and their guard-free, include-free content is
//! concatenated under a single guard with a deterministic metadata block.

pub mod assembler;
pub mod config;
pub mod discovery;
pub mod error;
pub mod extractor;
pub mod pipeline;
pub mod resolver;
pub mod transform;

pub use config::{AmalgamConfig, DuplicatePolicy};
pub use error::AmalgamError;
pub use pipeline::{amalgamate, AmalgamOptions, AmalgamSummary, Amalgamator, Artifact};
