//! External programs the launcher drives: the picker and the shell.

use std::io::{self, Write};
use std::process::{ChildStdin, Command, ExitStatus, Output, Stdio};
use std::thread;

use tracing::{debug, warn};

use crate::error::{LauncherError, Result};

/// Interactive chooser fed one candidate per line
pub trait Picker: Sync {
    /// Present `candidates` and return the chosen line, empty when cancelled
    fn pick(&self, candidates: &[String]) -> Result<String>;
}

/// Runs a chosen command line
pub trait Shell: Sync {
    fn run(&self, command_line: &str) -> Result<()>;
}

// ============================================================================
// Picker
// ============================================================================

/// A picker program such as `bemenu`, `dmenu` or `fzf`
#[derive(Debug, Clone)]
pub struct ProcessPicker {
    program: String,
}

impl ProcessPicker {
    pub fn new(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
        }
    }
}

impl Picker for ProcessPicker {
    fn pick(&self, candidates: &[String]) -> Result<String> {
        let spawn_err = |source: io::Error| LauncherError::PickerSpawn {
            program: self.program.clone(),
            source,
        };

        let mut input = candidates.join("\n");
        input.push('\n');

        debug!("Starting picker {} with {} lines", self.program, candidates.len());
        let mut child = Command::new(&self.program)
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::inherit())
            .spawn()
            .map_err(spawn_err)?;

        // Feed the list from its own thread so a picker that starts writing
        // before it has read everything cannot wedge both pipes
        let stdin = child.stdin.take();
        let feeder = thread::spawn(move || feed_stdin(stdin, input.as_bytes()));

        let output = child.wait_with_output().map_err(spawn_err)?;
        let fed = feeder
            .join()
            .unwrap_or_else(|_| Err(io::Error::other("stdin writer panicked")));

        settle_pick(&self.program, output, fed)
    }
}

/// Turn a finished picker into a selection.
///
/// The exit status decides first. Once the picker has exited cleanly its
/// answer stands even if feeding it the list went wrong.
fn settle_pick(program: &str, output: Output, fed: io::Result<()>) -> Result<String> {
    if !output.status.success() {
        return Err(LauncherError::PickerExit {
            program: program.to_string(),
            status: output.status,
        });
    }
    if let Err(e) = fed {
        warn!("Feeding {} was cut short: {}", program, e);
    }

    let mut stdout = output.stdout;
    if stdout.last() == Some(&b'\n') {
        stdout.pop();
    }
    String::from_utf8(stdout).map_err(|_| LauncherError::PickerOutput {
        program: program.to_string(),
    })
}

// ============================================================================
// Shell
// ============================================================================

/// The user's shell, reading the command line from stdin
#[derive(Debug, Clone)]
pub struct ProcessShell {
    program: String,
}

impl ProcessShell {
    pub fn new(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
        }
    }
}

impl Shell for ProcessShell {
    fn run(&self, command_line: &str) -> Result<()> {
        let spawn_err = |source: io::Error| LauncherError::CommandSpawn {
            choice: command_line.to_string(),
            source,
        };

        debug!("Running {:?} through {}", command_line, self.program);
        let mut child = Command::new(&self.program)
            .stdin(Stdio::piped())
            .stdout(Stdio::inherit())
            .stderr(Stdio::inherit())
            .spawn()
            .map_err(spawn_err)?;

        let mut input = command_line.to_string();
        input.push('\n');
        let fed = feed_stdin(child.stdin.take(), input.as_bytes());

        // Always reap the child, even when it never got the whole command
        let status = child.wait().map_err(spawn_err)?;
        settle_run(command_line, status, fed)
    }
}

/// A failed exit outranks a failed write: it says what actually happened
fn settle_run(command_line: &str, status: ExitStatus, fed: io::Result<()>) -> Result<()> {
    if !status.success() {
        return Err(LauncherError::CommandFailed {
            choice: command_line.to_string(),
            status,
        });
    }
    fed.map_err(|source| LauncherError::CommandSpawn {
        choice: command_line.to_string(),
        source,
    })
}

/// Write `data` to the child's stdin and close it.
///
/// A child that exits without reading everything is not an error here; its
/// exit status tells the real story.
fn feed_stdin(stdin: Option<ChildStdin>, data: &[u8]) -> io::Result<()> {
    let Some(mut stdin) = stdin else {
        return Ok(());
    };
    match stdin.write_all(data) {
        Err(e) if e.kind() == io::ErrorKind::BrokenPipe => Ok(()),
        other => other,
    }
}

// ============================================================================
// Tests
// ============================================================================
