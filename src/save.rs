//! Where exported files go: a native dialog on desktops, a download-style
//! directory otherwise.

use crate::config::ViewerConfig;
use std::{
    env, fs, io,
    path::{Path, PathBuf},
};
use tracing::debug;

pub trait SaveTarget {
    /// Returns `None` when the user cancels.
    fn choose_destination(&self, suggested: &str) -> Option<PathBuf>;

    fn write(&self, path: &Path, content: &str) -> io::Result<()> {
        fs::write(path, content)
    }
}

/// Native "Save File" dialog.
#[derive(Debug, Clone, Default)]
pub struct DialogSaver {
    pub start_dir: Option<PathBuf>,
}

impl SaveTarget for DialogSaver {
    fn choose_destination(&self, suggested: &str) -> Option<PathBuf> {
        let mut dialog = rfd::FileDialog::new()
            .set_title("Save File")
            .set_file_name(suggested)
            .add_filter("TSV Files", &["tsv"])
            .add_filter("All Files", &["*"]);
        if let Some(dir) = &self.start_dir {
            dialog = dialog.set_directory(dir);
        }
        dialog.save_file()
    }
}

/// Drops files into a fixed directory, never overwriting an existing one.
#[derive(Debug, Clone)]
pub struct DirectorySaver {
    pub dir: PathBuf,
}

impl DirectorySaver {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }
}

impl SaveTarget for DirectorySaver {
    fn choose_destination(&self, suggested: &str) -> Option<PathBuf> {
        Some(unique_path(&self.dir, suggested))
    }

    fn write(&self, path: &Path, content: &str) -> io::Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(path, content)
    }
}

/// `dir/name`, or `dir/stem (n).ext` with the first free `n`.
pub fn unique_path(dir: &Path, name: &str) -> PathBuf {
    let candidate = dir.join(name);
    if !candidate.exists() {
        return candidate;
    }
    let as_path = Path::new(name);
    let stem = as_path
        .file_stem()
        .map(|s| s.to_string_lossy().to_string())
        .unwrap_or_else(|| name.to_string());
    let ext = as_path
        .extension()
        .map(|e| format!(".{}", e.to_string_lossy()))
        .unwrap_or_default();
    (1..)
        .map(|n| dir.join(format!("{stem} ({n}){ext}")))
        .find(|p| !p.exists())
        .unwrap_or(candidate)
}

pub fn has_desktop_session() -> bool {
    if cfg!(any(target_os = "macos", target_os = "windows")) {
        return true;
    }
    ["DISPLAY", "WAYLAND_DISPLAY"]
        .iter()
        .any(|var| env::var_os(var).is_some_and(|v| !v.is_empty()))
}

pub fn select_save_target(config: &ViewerConfig) -> Box<dyn SaveTarget> {
    let export_dir = config.export_dir();
    if has_desktop_session() {
        debug!("using native save dialog");
        Box::new(DialogSaver {
            start_dir: export_dir,
        })
    } else {
        let dir = export_dir.unwrap_or_else(|| PathBuf::from("."));
        debug!(dir = %dir.display(), "no desktop session, saving into directory");
        Box::new(DirectorySaver::new(dir))
    }
}
