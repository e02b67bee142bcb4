//! Error types shared by every stage of a launcher run.

use std::io;
use std::path::PathBuf;
use std::process::ExitStatus;
use thiserror::Error;

use crate::store::FrequencyTable;

pub type Result<T> = std::result::Result<T, LauncherError>;

#[derive(Error, Debug)]
pub enum LauncherError {
    #[error("No files found on search path")]
    NoCandidates,

    #[error("Home directory not found")]
    NoHomeDir,

    #[error("Failed to run picker {program}: {source}")]
    PickerSpawn { program: String, source: io::Error },

    #[error("Picker {program} failed: {status}")]
    PickerExit { program: String, status: ExitStatus },

    #[error("Picker {program} returned a selection that is not valid UTF-8")]
    PickerOutput { program: String },

    #[error("Failed to run {choice}: {source}")]
    CommandSpawn { choice: String, source: io::Error },

    #[error("Command {choice} failed: {status}")]
    CommandFailed { choice: String, status: ExitStatus },

    #[error("Failed to read counts from {path}: {source}")]
    CountsRead { path: PathBuf, source: io::Error },

    #[error("Invalid counts entry at {path}:{line}: {reason}")]
    CountsSyntax {
        path: PathBuf,
        line: usize,
        reason: String,
    },

    #[error("Failed to write counts to {path}: {source}")]
    CountsWrite { path: PathBuf, source: io::Error },

    #[error("Failed to create data directory {path}: {source}")]
    CreateDataDir { path: PathBuf, source: io::Error },
}

impl LauncherError {
    /// Exit code the process should end with for this error.
    ///
    /// A failing picker hands its own code through; everything else is 255.
    pub fn exit_code(&self) -> i32 {
        match self {
            LauncherError::PickerExit { status, .. } => status.code().unwrap_or(255),
            _ => 255,
        }
    }
}

/// A load that went wrong part way.
///
/// Carries whatever was read before the failure so the caller can keep going
/// with it, the same way `FromUtf8Error` hands back its bytes.
#[derive(Error, Debug)]
#[error("{source}")]
pub struct PartialLoad {
    pub table: FrequencyTable,
    #[source]
    pub source: LauncherError,
}

impl PartialLoad {
    pub fn into_table(self) -> FrequencyTable {
        self.table
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[cfg(unix)]
    fn status(raw: i32) -> ExitStatus {
        use std::os::unix::process::ExitStatusExt;
        ExitStatus::from_raw(raw)
    }

    #[cfg(unix)]
    #[test]
    fn test_picker_exit_code_passes_through() {
        let err = LauncherError::PickerExit {
            program: "bemenu".to_string(),
            status: status(3 << 8),
        };
        assert_eq!(err.exit_code(), 3);
    }

    #[cfg(unix)]
    #[test]
    fn test_signalled_picker_maps_to_255() {
        // raw status 9 = killed by SIGKILL
        let err = LauncherError::PickerExit {
            program: "bemenu".to_string(),
            status: status(9),
        };
        assert_eq!(err.exit_code(), 255);
    }

    #[cfg(unix)]
    #[test]
    fn test_command_failure_is_internal_error() {
        let err = LauncherError::CommandFailed {
            choice: "vim".to_string(),
            status: status(1 << 8),
        };
        assert_eq!(err.exit_code(), 255);
        assert_eq!(err.to_string(), "Command vim failed: exit status: 1");
    }

    #[test]
    fn test_syntax_error_names_location() {
        let err = LauncherError::CountsSyntax {
            path: PathBuf::from("/data/rumenu/counts"),
            line: 4,
            reason: "missing tab".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "Invalid counts entry at /data/rumenu/counts:4: missing tab"
        );
        assert_eq!(LauncherError::NoCandidates.exit_code(), 255);
    }
}
