//! rumenu - frequency-ranked application launcher
//!
//! Lists every executable on `PATH`, most-used first, pipes the list into a
//! picker (`bemenu` by default) and runs whatever comes back through the
//! user's shell. Each pick of a known program bumps its count in
//! `$XDG_DATA_HOME/rumenu/counts`.
//!
//! # Exit codes
//! - 0: command ran, or nothing was picked
//! - the picker's own code when the picker fails
//! - 255: anything else, reported on stderr as `ERROR: ...`

mod config;
mod error;
mod process;
mod rank;
mod scanner;
mod session;
mod store;

use std::io::{self, Write};
use std::path::PathBuf;

use clap::Parser;
use colored::Colorize;
use tracing::debug;

use crate::config::{Config, Overrides};
use crate::error::{LauncherError, Result};
use crate::process::{ProcessPicker, ProcessShell};
use crate::session::{Outcome, RankedEntry, Session};

// ============================================================================
// Command Line
// ============================================================================

#[derive(Debug, Parser)]
#[command(name = "rumenu", version, about)]
struct Cli {
    /// Picker program to feed the candidate list to [env: RUMENU_PICKER]
    #[arg(long, value_name = "PROGRAM")]
    picker: Option<String>,

    /// Shell that runs the selection [env: SHELL]
    #[arg(long, value_name = "PROGRAM")]
    shell: Option<String>,

    /// Directory holding the usage counts [default: $XDG_DATA_HOME/rumenu]
    #[arg(long, value_name = "DIR")]
    data_dir: Option<PathBuf>,

    /// Print the ranked candidates instead of launching the picker
    #[arg(long)]
    list: bool,

    /// With --list, print JSON
    #[arg(long, requires = "list")]
    json: bool,
}

impl Cli {
    fn overrides(&self) -> Overrides {
        Overrides {
            picker: self.picker.clone(),
            shell: self.shell.clone(),
            data_dir: self.data_dir.clone(),
        }
    }
}

// ============================================================================
// Main Entry Point
// ============================================================================

fn main() {
    // Warnings are shown unless RUST_LOG says otherwise
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    if let Err(e) = run(&cli) {
        // A failing picker has already said why on its own stderr
        if !matches!(e, LauncherError::PickerExit { .. }) {
            eprintln!("ERROR: {}", e);
        }
        std::process::exit(e.exit_code());
    }
}

fn run(cli: &Cli) -> Result<()> {
    let config = Config::from_env(cli.overrides())?;
    debug!("Resolved config: {:?}", config);

    let session = Session::new(
        &config,
        ProcessPicker::new(&config.picker),
        ProcessShell::new(&config.shell),
    );

    if cli.list {
        let entries = session.ranked()?;
        print_ranked(&entries, cli.json);
        return Ok(());
    }

    match session.run()? {
        Outcome::Aborted => debug!("Nothing selected"),
        Outcome::Launched { choice, recorded } => {
            debug!("Launched {:?} (recorded: {})", choice, recorded)
        }
    }
    Ok(())
}

fn print_ranked(entries: &[RankedEntry], json: bool) {
    let mut out = io::stdout().lock();

    if json {
        let _ = serde_json::to_writer_pretty(&mut out, entries);
        let _ = writeln!(out);
        return;
    }

    for entry in entries {
        let count = format!("{:>6}", entry.count);
        let count = if entry.count > 0 {
            count.yellow()
        } else {
            count.dimmed()
        };
        // stdout may be a closed pipe (`rumenu --list | head`)
        if writeln!(out, "{}  {}", count, entry.name.bold()).is_err() {
            return;
        }
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_flags_become_overrides() {
        let cli = Cli::parse_from([
            "rumenu",
            "--picker",
            "fuzzel",
            "--data-dir",
            "/tmp/rumenu",
        ]);
        let overrides = cli.overrides();
        assert_eq!(overrides.picker.as_deref(), Some("fuzzel"));
        assert_eq!(overrides.shell, None);
        assert_eq!(overrides.data_dir, Some(PathBuf::from("/tmp/rumenu")));
    }

    #[test]
    fn test_json_requires_list() {
        assert!(Cli::try_parse_from(["rumenu", "--json"]).is_err());
        let cli = Cli::try_parse_from(["rumenu", "--list", "--json"]).unwrap();
        assert!(cli.list && cli.json);
    }

    #[test]
    fn test_ranked_entries_serialize() {
        let entries = vec![RankedEntry {
            name: "vim".to_string(),
            count: 6,
        }];
        assert_eq!(
            serde_json::to_string(&entries).unwrap(),
            r#"[{"name":"vim","count":6}]"#
        );
    }
}
