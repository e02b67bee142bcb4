//! Startup configuration.
//!
//! Everything the session needs from the environment is resolved here once
//! and handed to [`crate::session::Session`] by reference.

use std::ffi::OsString;
use std::path::PathBuf;

use crate::error::{LauncherError, Result};
use crate::scanner::parse_search_path;

/// Picker used when neither `--picker` nor `RUMENU_PICKER` is given.
///
/// Set `RUMENU_PICKER` at build time to change it.
pub const DEFAULT_PICKER: &str = match option_env!("RUMENU_PICKER") {
    Some(picker) => picker,
    None => "bemenu",
};

/// Shell used when `SHELL` is unset or empty
pub const DEFAULT_SHELL: &str = "/bin/sh";

/// Directory name under the user data root
const APP_DIR: &str = "rumenu";

/// Explicit choices from the command line; `None` means "ask the environment"
#[derive(Debug, Clone, Default)]
pub struct Overrides {
    pub picker: Option<String>,
    pub shell: Option<String>,
    pub data_dir: Option<PathBuf>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    /// Directory holding the counts file
    pub data_dir: PathBuf,
    /// Picker program
    pub picker: String,
    /// Shell that runs the chosen command
    pub shell: String,
    /// Directories scanned for candidates, in lookup order
    pub search_path: Vec<PathBuf>,
}

impl Config {
    /// Resolve against the real process environment
    pub fn from_env(overrides: Overrides) -> Result<Self> {
        Self::resolve(overrides, |key| std::env::var_os(key), dirs::home_dir())
    }

    /// Resolve with an explicit variable lookup and home directory
    pub fn resolve(
        overrides: Overrides,
        var: impl Fn(&str) -> Option<OsString>,
        home: Option<PathBuf>,
    ) -> Result<Self> {
        let non_empty = |key: &str| var(key).filter(|v| !v.is_empty());

        let data_dir = match overrides.data_dir {
            Some(dir) => dir,
            None => {
                let root = match non_empty("XDG_DATA_HOME") {
                    Some(root) => PathBuf::from(root),
                    None => home
                        .ok_or(LauncherError::NoHomeDir)?
                        .join(".local")
                        .join("share"),
                };
                root.join(APP_DIR)
            }
        };

        let picker = overrides
            .picker
            .or_else(|| non_empty("RUMENU_PICKER").map(|v| v.to_string_lossy().into_owned()))
            .unwrap_or_else(|| DEFAULT_PICKER.to_string());

        let shell = overrides
            .shell
            .or_else(|| non_empty("SHELL").map(|v| v.to_string_lossy().into_owned()))
            .unwrap_or_else(|| DEFAULT_SHELL.to_string());

        let search_path = var("PATH")
            .map(|raw| parse_search_path(&raw))
            .unwrap_or_default();

        Ok(Self {
            data_dir,
            picker,
            shell,
            search_path,
        })
    }
}

// ============================================================================
// Tests
// ============================================================================
