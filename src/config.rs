//! Run settings, layered as flags -> environment -> config file -> defaults.
//!
//! The config file lives at `$XDG_CONFIG_HOME/bfrun.toml`:
//!
//! ```toml
//! [run]
//! timeout_ms = 5000
//! max_steps = 1000000
//! output_mode = "byte"
//! ```

use std::fs;
use std::path::{Path, PathBuf};

use cross_xdg::BaseDirs;
use serde::Deserialize;

use crate::interpreter::OutputMode;

pub const ENV_TIMEOUT_MS: &str = "BFRUN_TIMEOUT_MS";
pub const ENV_MAX_STEPS: &str = "BFRUN_MAX_STEPS";
pub const ENV_OUTPUT_MODE: &str = "BFRUN_OUTPUT_MODE";

const CONFIG_FILE: &str = "bfrun.toml";

/// Fully resolved settings for one run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RunConfig {
    /// Wall-clock limit; `None` runs until the program ends.
    pub timeout_ms: Option<u64>,
    /// Instruction limit; `None` is unlimited.
    pub max_steps: Option<u64>,
    pub output_mode: OutputMode,
}

/// Values given on the command line; `None` means "not given".
#[derive(Debug, Clone, Copy, Default)]
pub struct Overrides {
    pub timeout_ms: Option<u64>,
    pub max_steps: Option<u64>,
    pub output_mode: Option<OutputMode>,
}

#[derive(Debug, Default, Deserialize)]
struct ConfigFile {
    #[serde(default)]
    run: FileSection,
}

#[derive(Debug, Default, Deserialize)]
struct FileSection {
    timeout_ms: Option<u64>,
    max_steps: Option<u64>,
    output_mode: Option<OutputMode>,
}

impl RunConfig {
    /// Resolve from flags, the process environment and the user config file.
    pub fn resolve(flags: Overrides) -> Self {
        let file = config_path().map(|p| load_file(&p)).unwrap_or_default();
        Self::layer(flags, |key| std::env::var(key).ok(), file)
    }

    fn layer<F>(flags: Overrides, env: F, file: FileSection) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let timeout_ms = flags
            .timeout_ms
            .or_else(|| env(ENV_TIMEOUT_MS).and_then(|s| s.trim().parse::<u64>().ok()))
            .or(file.timeout_ms);
        let max_steps = flags
            .max_steps
            .or_else(|| env(ENV_MAX_STEPS).and_then(|s| s.trim().parse::<u64>().ok()))
            .or(file.max_steps);
        let output_mode = flags
            .output_mode
            .or_else(|| env(ENV_OUTPUT_MODE).and_then(|s| s.parse::<OutputMode>().ok()))
            .or(file.output_mode)
            .unwrap_or_default();

        Self {
            timeout_ms,
            max_steps,
            output_mode,
        }
    }
}

fn config_path() -> Option<PathBuf> {
    // Linux: ~/.config, macOS: ~/.config, Windows: C:\Users\<user>\.config
    let base_dirs = BaseDirs::new().ok()?;
    let mut path = PathBuf::from(base_dirs.config_home());
    path.push(CONFIG_FILE);
    Some(path)
}

fn load_file(path: &Path) -> FileSection {
    let Ok(content) = fs::read_to_string(path) else {
        return FileSection::default();
    };
    parse_file(&content).unwrap_or_else(|e| {
        tracing::warn!("ignoring {}: {e}", path.display());
        FileSection::default()
    })
}

fn parse_file(content: &str) -> Result<FileSection, toml::de::Error> {
    toml::from_str::<ConfigFile>(content).map(|c| c.run)
}
