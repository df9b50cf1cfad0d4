//! Viewer settings, read from a JSON file with every field optional.

use crate::{
    error::{ManeLocaError, Result},
    loader::DataSource,
};
use maneloca_engine::NoMatchPolicy;
use maneloca_protocol::BuildVersion;
use serde::{Deserialize, Serialize};
use std::{
    env, fs,
    path::{Path, PathBuf},
};

pub const DEFAULT_CONFIG_PATH: &str = "maneloca.json";
pub const DEFAULT_DATA_SOURCE: &str = "data";
pub const CONFIG_ENV: &str = "MANELOCA_CONFIG";
pub const DATA_ENV: &str = "MANELOCA_DATA";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ViewerConfig {
    /// Base URL or directory holding `GRCh37.bed` and `GRCh38.bed`.
    pub data_source: String,
    pub default_version: BuildVersion,
    /// Where exports land when no save dialog is available.
    pub export_dir: Option<String>,
    pub language: String,
    pub log_filter: String,
    pub no_match_policy: NoMatchPolicy,
    /// Directory relative paths are resolved against.
    #[serde(skip)]
    base_dir: PathBuf,
    /// Set when nothing was configured, so a missing relative data directory
    /// is also looked up next to the installed executable.
    #[serde(skip)]
    search_install_dirs: bool,
}

impl Default for ViewerConfig {
    fn default() -> Self {
        Self {
            data_source: DEFAULT_DATA_SOURCE.to_string(),
            default_version: BuildVersion::default(),
            export_dir: None,
            language: "en".to_string(),
            log_filter: "info".to_string(),
            no_match_policy: NoMatchPolicy::default(),
            base_dir: PathBuf::from("."),
            search_install_dirs: true,
        }
    }
}

/// Working directory, a macOS bundle's `Resources`, then the executable's
/// own directory.
fn install_dirs() -> Vec<PathBuf> {
    let mut dirs = vec![PathBuf::from(".")];
    if let Some(exe_dir) = env::current_exe()
        .ok()
        .and_then(|exe| exe.parent().map(Path::to_path_buf))
    {
        dirs.push(exe_dir.join("..").join("Resources"));
        dirs.push(exe_dir);
    }
    dirs
}

/// First base under which `raw` names an existing directory.
fn first_existing_dir(raw: &str, bases: &[PathBuf]) -> Option<DataSource> {
    bases
        .iter()
        .map(|base| DataSource::parse(raw, base))
        .find(|source| matches!(source, DataSource::Directory(dir) if dir.is_dir()))
}

impl ViewerConfig {
    pub fn from_json_file(path: &Path) -> Result<Self> {
        let text = fs::read_to_string(path).map_err(|e| ManeLocaError::Config {
            path: path.display().to_string(),
            message: e.to_string(),
        })?;
        let mut config: Self = serde_json::from_str(&text).map_err(|e| ManeLocaError::Config {
            path: path.display().to_string(),
            message: e.to_string(),
        })?;
        config.search_install_dirs = false;
        config.base_dir = path
            .parent()
            .filter(|p| !p.as_os_str().is_empty())
            .map(Path::to_path_buf)
            .unwrap_or_else(|| PathBuf::from("."));
        Ok(config)
    }

    /// Explicit path, then `MANELOCA_CONFIG`, then `maneloca.json` if it
    /// exists, then defaults. `MANELOCA_DATA` overrides the data source.
    pub fn load(explicit: Option<&str>) -> Result<Self> {
        let from_env = env::var(CONFIG_ENV).ok().filter(|v| !v.is_empty());
        let config = match explicit.map(str::to_string).or(from_env) {
            Some(path) => Self::from_json_file(Path::new(&path))?,
            None if Path::new(DEFAULT_CONFIG_PATH).exists() => {
                Self::from_json_file(Path::new(DEFAULT_CONFIG_PATH))?
            }
            None => Self::default(),
        };
        Ok(config.with_data_override(env::var(DATA_ENV).ok()))
    }

    pub fn with_data_override(mut self, data_source: Option<String>) -> Self {
        if let Some(source) = data_source.filter(|s| !s.trim().is_empty()) {
            self.data_source = source;
            self.base_dir = PathBuf::from(".");
            self.search_install_dirs = false;
        }
        self
    }

    pub fn data_source(&self) -> DataSource {
        let source = DataSource::parse(&self.data_source, &self.base_dir);
        match &source {
            DataSource::Directory(dir) if self.search_install_dirs && !dir.is_dir() => {
                first_existing_dir(&self.data_source, &install_dirs()).unwrap_or(source)
            }
            _ => source,
        }
    }

    pub fn export_dir(&self) -> Option<PathBuf> {
        self.export_dir.as_deref().map(|raw| {
            let p = Path::new(raw);
            if p.is_absolute() {
                p.to_path_buf()
            } else {
                self.base_dir.join(p)
            }
        })
    }
}
