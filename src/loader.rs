//! Fetching and parsing the per-build annotation tables.

use crate::error::{ManeLocaError, Result};
use flate2::read::MultiGzDecoder;
use maneloca_engine::LoadTicket;
use maneloca_protocol::{parse_records, BuildVersion, Record};
use std::{
    fs::File,
    io::Read,
    path::{Path, PathBuf},
    sync::mpsc::{self, Receiver, Sender, TryRecvError},
    thread,
};
use tracing::{debug, info};

/// Where `{version}.bed` files are served from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DataSource {
    Http(String),
    Directory(PathBuf),
}

fn is_http_source(source: &str) -> bool {
    source.starts_with("http://") || source.starts_with("https://")
}

impl DataSource {
    /// Relative directories are resolved against `base_dir`.
    pub fn parse(raw: &str, base_dir: &Path) -> Self {
        let raw = raw.trim();
        if is_http_source(raw) {
            return Self::Http(raw.trim_end_matches('/').to_string());
        }
        let path = PathBuf::from(raw.strip_prefix("file://").unwrap_or(raw));
        if path.is_absolute() {
            Self::Directory(path)
        } else {
            Self::Directory(base_dir.join(path))
        }
    }

    /// URL or path of the resource for `version`, for messages.
    pub fn location(&self, version: BuildVersion) -> String {
        match self {
            Self::Http(base) => format!("{base}/{}", version.resource_name()),
            Self::Directory(dir) => dir.join(version.resource_name()).display().to_string(),
        }
    }

    pub fn read_text(&self, version: BuildVersion) -> Result<String> {
        match self {
            Self::Http(_) => {
                let url = self.location(version);
                let http_err = |source| ManeLocaError::Http {
                    url: url.clone(),
                    source,
                };
                reqwest::blocking::get(&url)
                    .and_then(|response| response.error_for_status())
                    .and_then(|response| response.text())
                    .map_err(http_err)
            }
            Self::Directory(dir) => read_local(dir, version),
        }
    }
}

fn read_local(dir: &Path, version: BuildVersion) -> Result<String> {
    let plain = dir.join(version.resource_name());
    let gzipped = dir.join(format!("{}.gz", version.resource_name()));
    let (path, compressed) = if plain.exists() {
        (plain, false)
    } else if gzipped.exists() {
        (gzipped, true)
    } else {
        return Err(ManeLocaError::Load {
            resource: plain.display().to_string(),
            message: "file does not exist".to_string(),
        });
    };

    debug!(path = %path.display(), compressed, "reading annotation table");
    let file = File::open(&path)?;
    let mut text = String::new();
    if compressed {
        MultiGzDecoder::new(file).read_to_string(&mut text)?;
    } else {
        let mut file = file;
        file.read_to_string(&mut text)?;
    }
    Ok(text)
}

/// Reads the whole table for `version` and tags every record with it.
pub fn load_records(source: &DataSource, version: BuildVersion) -> Result<Vec<Record>> {
    let text = source.read_text(version)?;
    let records = parse_records(&text, version);
    info!(
        source = %source.location(version),
        records = records.len(),
        "annotation table parsed"
    );
    Ok(records)
}

#[derive(Debug)]
pub struct LoadMessage {
    pub ticket: LoadTicket,
    pub result: std::result::Result<Vec<Record>, String>,
}

/// Runs loads on worker threads and hands the results back over a channel.
///
/// Results arrive in completion order, not request order; the engine decides
/// which ticket is still current.
pub struct BackgroundLoader {
    tx: Sender<LoadMessage>,
    rx: Receiver<LoadMessage>,
}

impl Default for BackgroundLoader {
    fn default() -> Self {
        let (tx, rx) = mpsc::channel();
        Self { tx, rx }
    }
}

impl BackgroundLoader {
    pub fn new() -> Self {
        Self::default()
    }

    /// Starts loading `ticket.version`; `on_done` runs on the worker thread
    /// after the result was queued (used to wake the UI).
    pub fn request<F>(&self, source: DataSource, ticket: LoadTicket, on_done: F)
    where
        F: FnOnce() + Send + 'static,
    {
        let tx = self.tx.clone();
        thread::spawn(move || {
            let result = load_records(&source, ticket.version).map_err(|e| e.to_string());
            // The receiver only disappears when the app shuts down.
            let _ = tx.send(LoadMessage { ticket, result });
            on_done();
        });
    }

    /// All results that arrived since the last call.
    pub fn drain(&self) -> Vec<LoadMessage> {
        let mut out = Vec::new();
        loop {
            match self.rx.try_recv() {
                Ok(message) => out.push(message),
                Err(TryRecvError::Empty) | Err(TryRecvError::Disconnected) => break,
            }
        }
        out
    }

    /// Blocks until the next result arrives.
    pub fn wait(&self) -> Option<LoadMessage> {
        self.rx.recv().ok()
    }
}
