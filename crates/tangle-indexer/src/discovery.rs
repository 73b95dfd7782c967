//! Project walk: which files become nodes

use globset::{Glob, GlobSet, GlobSetBuilder};
use ignore::WalkBuilder;
use std::path::{Path, PathBuf};
use std::time::SystemTime;
use tangle_core::{AnalysisConfig, ResolverError};
use tracing::{debug, info, warn};

/// A file selected for analysis.
#[derive(Debug, Clone)]
pub struct SourceFile {
    pub absolute: PathBuf,
    /// Relative to the project root.
    pub relative: PathBuf,
    pub size: u64,
    pub modified: Option<SystemTime>,
}

/// Walk the project, honouring `.gitignore`, skipped directory names, skip globs and
/// the size limit. Results are sorted by relative path.
pub fn discover_files(
    root: &Path,
    config: &AnalysisConfig,
) -> tangle_core::Result<Vec<SourceFile>> {
    if !root.is_dir() {
        return Err(ResolverError::RootNotFound(root.to_path_buf()));
    }
    std::fs::read_dir(root).map_err(|source| ResolverError::RootUnreadable {
        path: root.to_path_buf(),
        source,
    })?;

    let skip_globs = build_glob_set(&config.skip_globs);
    let filter_config = config.clone();

    let walker = WalkBuilder::new(root)
        .hidden(false)
        .git_ignore(true)
        .git_global(false)
        .git_exclude(true)
        .require_git(false)
        .filter_entry(move |entry| {
            let is_dir = entry.file_type().is_some_and(|t| t.is_dir());
            let skipped = is_dir
                && entry.depth() > 0
                && entry
                    .file_name()
                    .to_str()
                    .is_some_and(|name| filter_config.should_skip_directory(name));
            !skipped
        })
        .build();

    let mut files = Vec::new();
    for entry in walker {
        let entry = match entry {
            Ok(entry) => entry,
            Err(e) => {
                warn!("Cannot read entry: {}", e);
                continue;
            }
        };
        if !entry.file_type().is_some_and(|t| t.is_file()) {
            continue;
        }

        let path = entry.path();
        let Ok(relative) = path.strip_prefix(root) else {
            continue;
        };
        if skip_globs.is_match(relative) {
            debug!("Skipping {} (matches skip glob)", relative.display());
            continue;
        }

        let metadata = match entry.metadata() {
            Ok(metadata) => metadata,
            Err(e) => {
                warn!("Cannot stat {}: {}", path.display(), e);
                continue;
            }
        };
        if metadata.len() > config.max_file_size {
            debug!("Skipping {} ({} bytes)", relative.display(), metadata.len());
            continue;
        }

        files.push(SourceFile {
            absolute: path.to_path_buf(),
            relative: relative.to_path_buf(),
            size: metadata.len(),
            modified: metadata.modified().ok(),
        });
    }

    files.sort_by(|a, b| a.relative.cmp(&b.relative));
    info!("Discovered {} files under {}", files.len(), root.display());
    Ok(files)
}

fn build_glob_set(patterns: &[String]) -> GlobSet {
    let mut builder = GlobSetBuilder::new();
    for pattern in patterns {
        match Glob::new(pattern) {
            Ok(glob) => {
                builder.add(glob);
            }
            Err(e) => warn!("Ignoring skip glob {}: {}", pattern, e),
        }
    }
    builder.build().unwrap_or_else(|e| {
        warn!("Skip globs disabled: {}", e);
        GlobSet::empty()
    })
}
