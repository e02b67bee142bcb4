//! Candidate discovery across the search path.

use std::ffi::OsStr;
use std::fs;
use std::path::{Path, PathBuf};

use rayon::prelude::*;
use tracing::debug;

use crate::error::{LauncherError, Result};

/// Split a colon-delimited search path into its directories, in order
pub fn parse_search_path(raw: &OsStr) -> Vec<PathBuf> {
    std::env::split_paths(raw).collect()
}

/// List every candidate name on `search_path`.
///
/// Directories are read in parallel. The result keeps search-path order and
/// each directory's own entry order, duplicates included. Unreadable
/// directories contribute nothing; only an empty overall result is an error.
pub fn scan(search_path: &[PathBuf]) -> Result<Vec<String>> {
    let per_dir: Vec<Vec<String>> = search_path.par_iter().map(|dir| list_dir(dir)).collect();

    let candidates = per_dir.concat();
    if candidates.is_empty() {
        return Err(LauncherError::NoCandidates);
    }

    debug!(
        "Found {} candidates in {} directories",
        candidates.len(),
        search_path.len()
    );
    Ok(candidates)
}

fn list_dir(dir: &Path) -> Vec<String> {
    let entries = match fs::read_dir(dir) {
        Ok(entries) => entries,
        Err(e) => {
            debug!("Skipping {:?}: {}", dir, e);
            return Vec::new();
        }
    };

    entries
        .filter_map(|entry| entry.ok())
        .filter_map(|entry| entry.file_name().into_string().ok())
        .filter(|name| is_line_safe(name))
        .collect()
}

/// Names go to the picker one per line, so a newline inside one would split it
fn is_line_safe(name: &str) -> bool {
    !name.contains('\n')
}

// ============================================================================
// Tests
// ============================================================================
