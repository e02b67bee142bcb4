//! Persisted usage counts.
//!
//! The counts file holds one `name<TAB>count` record per line, ordered the
//! same way candidates are ranked (most used first, then by name). Writes go
//! through a temporary file in the data directory that is renamed over the
//! old file, so readers only ever see a complete table.

use std::cmp::Ordering;
use std::collections::HashMap;
use std::fs::{self, File};
use std::io::{self, BufRead, BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};

use tempfile::NamedTempFile;
use tracing::debug;

use crate::error::{LauncherError, PartialLoad, Result};

/// File name of the counts table inside the data directory
pub const COUNTS_FILE: &str = "counts";

// ============================================================================
// Frequency Table
// ============================================================================

/// How many times each candidate has been picked
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FrequencyTable {
    counts: HashMap<String, u64>,
}

impl FrequencyTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Count for `name`, 0 when it has never been picked
    pub fn get(&self, name: &str) -> u64 {
        self.counts.get(name).copied().unwrap_or(0)
    }

    pub fn insert(&mut self, name: impl Into<String>, count: u64) {
        self.counts.insert(name.into(), count);
    }

    /// Bump the count for `name` and return the new value
    pub fn increment(&mut self, name: &str) -> u64 {
        let count = self.counts.entry(name.to_string()).or_insert(0);
        *count = count.saturating_add(1);
        *count
    }

    pub fn len(&self) -> usize {
        self.counts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.counts.is_empty()
    }

    /// Ranking order: higher count first, ties broken by ascending name.
    ///
    /// Both the ranker and the membership check after a pick go through
    /// this; they must never disagree.
    pub fn compare(&self, a: &str, b: &str) -> Ordering {
        self.get(b).cmp(&self.get(a)).then_with(|| a.cmp(b))
    }

    /// Names in ranking order
    pub fn sorted_names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.counts.keys().map(String::as_str).collect();
        names.sort_by(|a, b| self.compare(a, b));
        names
    }
}

impl<S: Into<String>> FromIterator<(S, u64)> for FrequencyTable {
    fn from_iter<I: IntoIterator<Item = (S, u64)>>(iter: I) -> Self {
        Self {
            counts: iter.into_iter().map(|(k, v)| (k.into(), v)).collect(),
        }
    }
}

// ============================================================================
// Counts Store
// ============================================================================

/// On-disk home of the frequency table
#[derive(Debug, Clone)]
pub struct CountsStore {
    dir: PathBuf,
    path: PathBuf,
}

impl CountsStore {
    pub fn new(data_dir: &Path) -> Self {
        Self {
            dir: data_dir.to_path_buf(),
            path: data_dir.join(COUNTS_FILE),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Read the persisted table.
    ///
    /// A missing file is a first run and yields an empty table. Anything
    /// else that goes wrong comes back as a [`PartialLoad`] holding the
    /// records read before the failure.
    pub fn load(&self) -> std::result::Result<FrequencyTable, PartialLoad> {
        let file = match File::open(&self.path) {
            Ok(file) => file,
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                debug!("No counts file at {:?}, starting empty", self.path);
                return Ok(FrequencyTable::new());
            }
            Err(e) => {
                return Err(PartialLoad {
                    table: FrequencyTable::new(),
                    source: LauncherError::CountsRead {
                        path: self.path.clone(),
                        source: e,
                    },
                })
            }
        };

        let table = parse_counts(BufReader::new(file), &self.path)?;
        debug!("Loaded {} counts from {:?}", table.len(), self.path);
        Ok(table)
    }

    /// Create the data directory if it does not exist yet
    pub fn ensure_dir(&self) -> Result<()> {
        fs::create_dir_all(&self.dir).map_err(|e| LauncherError::CreateDataDir {
            path: self.dir.clone(),
            source: e,
        })
    }

    /// Atomically replace the persisted table with `table`.
    ///
    /// The temporary file is deleted on every failure path, leaving the
    /// previous counts file untouched.
    pub fn save(&self, table: &FrequencyTable) -> Result<()> {
        let staged = self.stage(table)?;

        // Dropping the PersistError drops the temp file with it
        staged
            .persist(&self.path)
            .map_err(|e| self.write_err(e.error))?;

        debug!("Saved {} counts to {:?}", table.len(), self.path);
        Ok(())
    }

    /// Write `table` to a synced temp file next to the counts file.
    ///
    /// Until it is persisted the counts file is exactly what it was before.
    fn stage(&self, table: &FrequencyTable) -> Result<NamedTempFile> {
        let mut temp = NamedTempFile::new_in(&self.dir).map_err(|e| self.write_err(e))?;
        {
            let mut writer = BufWriter::new(temp.as_file_mut());
            write_counts(&mut writer, table).map_err(|e| self.write_err(e))?;
            writer.flush().map_err(|e| self.write_err(e))?;
        }
        temp.as_file().sync_all().map_err(|e| self.write_err(e))?;
        Ok(temp)
    }

    fn write_err(&self, source: io::Error) -> LauncherError {
        LauncherError::CountsWrite {
            path: self.path.clone(),
            source,
        }
    }
}

fn parse_counts(
    reader: impl BufRead,
    path: &Path,
) -> std::result::Result<FrequencyTable, PartialLoad> {
    let mut table = FrequencyTable::new();

    for (idx, line) in reader.lines().enumerate() {
        let line_no = idx + 1;
        let syntax = |reason: String| LauncherError::CountsSyntax {
            path: path.to_path_buf(),
            line: line_no,
            reason,
        };

        let line = match line {
            Ok(line) => line,
            Err(e) => {
                let source = LauncherError::CountsRead {
                    path: path.to_path_buf(),
                    source: e,
                };
                return Err(PartialLoad { table, source });
            }
        };

        // Split on the last tab so names may contain tabs themselves
        let Some((name, count)) = line.rsplit_once('\t') else {
            let source = syntax("missing tab separator".to_string());
            return Err(PartialLoad { table, source });
        };

        match count.parse::<u64>() {
            Ok(count) => table.insert(name, count),
            Err(e) => {
                let source = syntax(format!("count {count:?}: {e}"));
                return Err(PartialLoad { table, source });
            }
        }
    }

    Ok(table)
}

fn write_counts(w: &mut impl Write, table: &FrequencyTable) -> io::Result<()> {
    for name in table.sorted_names() {
        writeln!(w, "{}\t{}", name, table.get(name))?;
    }
    Ok(())
}

// ============================================================================
// Tests
// ============================================================================
