//! One launcher run, from scanning the search path to recording the pick.
//!
//! The run fans out twice. Loading the counts and scanning the search path
//! happen side by side on the rayon pool. After a pick, running the command
//! and saving the new counts each get their own thread, since the command
//! blocks until the launched program exits and the save must not wait for
//! it. Both halves of each pair always finish: failures come back as values,
//! never as a reason to stop the other half.

use std::path::PathBuf;
use std::thread;

use serde::Serialize;
use tracing::{debug, info, warn};

use crate::config::Config;
use crate::error::Result;
use crate::process::{Picker, Shell};
use crate::rank;
use crate::scanner;
use crate::store::{CountsStore, FrequencyTable};

/// How a run ended when nothing went wrong
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    /// The picker returned nothing
    Aborted,
    /// The selection was run; `recorded` says whether its count was bumped
    Launched { choice: String, recorded: bool },
}

/// A candidate as shown by `--list`
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RankedEntry {
    pub name: String,
    pub count: u64,
}

pub struct Session<P, S> {
    store: CountsStore,
    search_path: Vec<PathBuf>,
    picker: P,
    shell: S,
}

impl<P: Picker, S: Shell> Session<P, S> {
    pub fn new(config: &Config, picker: P, shell: S) -> Self {
        Self {
            store: CountsStore::new(&config.data_dir),
            search_path: config.search_path.clone(),
            picker,
            shell,
        }
    }

    /// Scan, rank, pick, then run and record the selection
    pub fn run(&self) -> Result<Outcome> {
        let (table, ranked) = self.gather()?;

        let choice = self.picker.pick(&ranked)?;
        if choice.is_empty() {
            debug!("Empty selection, nothing to do");
            return Ok(Outcome::Aborted);
        }
        info!("Selected {:?}", choice);

        let (ran, recorded) = thread::scope(|scope| {
            let recorder = scope.spawn(|| self.record(&ranked, &choice, table));
            let runner = scope.spawn(|| self.shell.run(&choice));
            (join_branch(runner), join_branch(recorder))
        });

        // The command's own failure is the more useful one to report
        if let (Err(_), Err(e)) = (&ran, &recorded) {
            warn!("{}", e);
        }
        ran?;
        let recorded = recorded?;
        Ok(Outcome::Launched { choice, recorded })
    }

    /// Ranked candidates with their counts, without picking anything
    pub fn ranked(&self) -> Result<Vec<RankedEntry>> {
        let (table, ranked) = self.gather()?;
        Ok(ranked
            .into_iter()
            .map(|name| RankedEntry {
                count: table.get(&name),
                name,
            })
            .collect())
    }

    fn gather(&self) -> Result<(FrequencyTable, Vec<String>)> {
        let (loaded, scanned) = rayon::join(
            || self.store.load(),
            || scanner::scan(&self.search_path),
        );

        let table = loaded.unwrap_or_else(|e| {
            warn!("{}", e);
            e.into_table()
        });
        let candidates = scanned?;

        let ranked = rank::rank(candidates, &table);
        Ok((table, ranked))
    }

    /// Bump and save the count for `choice` if it was a scanned candidate.
    ///
    /// Returns whether the count was updated.
    fn record(&self, ranked: &[String], choice: &str, mut table: FrequencyTable) -> Result<bool> {
        self.store.ensure_dir()?;

        // Pickers that accept free text can hand back anything
        if !rank::contains(ranked, choice, &table) {
            debug!("{:?} is not a known candidate, counts unchanged", choice);
            return Ok(false);
        }

        let count = table.increment(choice);
        self.store.save(&table)?;
        debug!(
            "{:?} now picked {} times, saved to {:?}",
            choice,
            count,
            self.store.path()
        );
        Ok(true)
    }
}

/// Wait for one branch of the post-pick fan-out
fn join_branch<T>(handle: thread::ScopedJoinHandle<'_, Result<T>>) -> Result<T> {
    handle
        .join()
        .unwrap_or_else(|panic| std::panic::resume_unwind(panic))
}

// ============================================================================
// Tests
// ============================================================================
