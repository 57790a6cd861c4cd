//! Release archives
//!
//! Entries are stored relative to the staged directory, in sorted traversal
//! order, with deterministic tar headers so that the same staged tree always
//! yields the same archive.

use std::fs::File;
use std::path::Path;

use flate2::write::GzEncoder;
use flate2::Compression;
use tar::{Builder, HeaderMode};
use tracing::debug;
use walkdir::WalkDir;

use crate::error::{ReleaseError, Result};

/// Pack every file below `source_dir` into a gzip-compressed tarball
pub fn create_tar_gz(source_dir: &Path, archive_path: &Path) -> Result<usize> {
    debug!("Creating archive '{}'", archive_path.display());
    let file = File::create(archive_path).map_err(|e| ReleaseError::io(archive_path, e))?;
    let mut builder = Builder::new(GzEncoder::new(file, Compression::default()));
    builder.mode(HeaderMode::Deterministic);

    let mut count = 0;
    for entry in WalkDir::new(source_dir).min_depth(1).sort_by_file_name() {
        let entry = entry?;
        if !entry.file_type().is_file() {
            continue;
        }
        let Ok(relative) = entry.path().strip_prefix(source_dir) else {
            continue;
        };

        debug!(" - {}", relative.display());
        builder
            .append_path_with_name(entry.path(), relative)
            .map_err(|e| ReleaseError::io(entry.path(), e))?;
        count += 1;
    }

    builder
        .into_inner()
        .and_then(|encoder| encoder.finish())
        .map_err(|e| ReleaseError::io(archive_path, e))?;

    Ok(count)
}
