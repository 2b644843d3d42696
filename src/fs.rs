use notify::{Config, RecommendedWatcher, RecursiveMode, Watcher};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use std::time::{Duration, Instant};

use crate::error::{Error, Result};
use crate::paths::{display_name, validate_path};

const DEBOUNCE_WINDOW: Duration = Duration::from_millis(500);

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FolderHandle {
    pub path: String,
    pub name: String,
}

impl FolderHandle {
    pub fn from_path(path: &str) -> Self {
        Self {
            path: path.to_string(),
            name: display_name(path),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EntryKind {
    File,
    Directory,
}

// Directory listing entry
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Entry {
    pub name: String,
    pub path: String,
    #[serde(rename = "type")]
    pub kind: EntryKind,
}

impl Entry {
    pub fn is_dir(&self) -> bool {
        self.kind == EntryKind::Directory
    }
}

pub fn read_file(path: &str) -> Result<String> {
    let path = validate_path(path)?;
    Ok(std::fs::read_to_string(path)?)
}

pub fn write_file(path: &str, content: &str) -> Result<()> {
    let path = validate_path(path)?;
    log::debug!("writing {}", path);
    std::fs::write(path, content)?;
    Ok(())
}

/// Writes through a sibling temp file and renames it over `path`, so readers
/// never observe a half-written file.
pub fn write_file_atomic(path: &str, content: &str) -> Result<()> {
    let target = PathBuf::from(validate_path(path)?);
    let dir = target
        .parent()
        .filter(|p| !p.as_os_str().is_empty())
        .unwrap_or(Path::new("."));
    let file_name = target
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| "untitled".to_string());
    let tmp = dir.join(format!(".{}.{}.tmp", file_name, std::process::id()));

    std::fs::write(&tmp, content)?;
    if let Err(e) = std::fs::rename(&tmp, &target) {
        let _ = std::fs::remove_file(&tmp);
        return Err(e.into());
    }
    Ok(())
}

pub fn delete_path(path: &str) -> Result<()> {
    let path = Path::new(validate_path(path)?);
    if path.is_dir() {
        std::fs::remove_dir_all(path)?;
    } else {
        std::fs::remove_file(path)?;
    }
    Ok(())
}

/// Lists a directory, directories first, then by case-insensitive name.
pub fn list_directory(path: &str) -> Result<Vec<Entry>> {
    let dir = Path::new(validate_path(path)?);
    if !dir.is_dir() {
        return Err(Error::NotADirectory(path.to_string()));
    }

    let mut entries = Vec::new();
    for entry in std::fs::read_dir(dir)?.flatten() {
        let kind = match entry.file_type() {
            Ok(ft) if ft.is_dir() => EntryKind::Directory,
            Ok(_) => EntryKind::File,
            Err(_) => continue,
        };
        entries.push(Entry {
            name: entry.file_name().to_string_lossy().into_owned(),
            path: entry.path().to_string_lossy().into_owned(),
            kind,
        });
    }

    entries.sort_by(|a, b| {
        b.is_dir()
            .cmp(&a.is_dir())
            .then_with(|| a.name.to_lowercase().cmp(&b.name.to_lowercase()))
            .then_with(|| a.name.cmp(&b.name))
    });

    Ok(entries)
}

pub fn exists(path: &str) -> Result<bool> {
    let path = validate_path(path)?;
    Ok(Path::new(path).exists())
}

pub fn rename_path(old_path: &str, new_path: &str) -> Result<()> {
    let old_path = validate_path(old_path)?;
    let new_path = validate_path(new_path)?;
    std::fs::rename(old_path, new_path)?;
    Ok(())
}

pub fn create_directory(path: &str) -> Result<()> {
    let path = validate_path(path)?;
    std::fs::create_dir_all(path)?;
    Ok(())
}

pub fn documents_dir() -> Result<String> {
    dirs::document_dir()
        .or_else(dirs::home_dir)
        .map(|p| p.to_string_lossy().into_owned())
        .ok_or(Error::NoDocumentsDir)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FsEventKind {
    Create,
    Modify,
    Delete,
}

// File watcher event payload
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FsEvent {
    #[serde(rename = "type")]
    pub kind: FsEventKind,
    pub path: String,
}

/// Live recursive watch on a workspace root. Dropping it stops the watch.
pub struct FsWatcher {
    #[allow(dead_code)]
    watcher: RecommendedWatcher,
}

fn map_event_kind(kind: &notify::EventKind) -> Option<FsEventKind> {
    match kind {
        notify::EventKind::Create(_) => Some(FsEventKind::Create),
        notify::EventKind::Modify(_) => Some(FsEventKind::Modify),
        notify::EventKind::Remove(_) => Some(FsEventKind::Delete),
        _ => None,
    }
}

// Returns false when the path fired within the debounce window
fn debounce(map: &Mutex<HashMap<PathBuf, Instant>>, path: &Path) -> bool {
    let mut map = map.lock().expect("debounce map mutex");
    let now = Instant::now();

    if map.len() > 100 {
        map.retain(|_, last| now.duration_since(*last) < Duration::from_secs(5));
    }

    if let Some(last) = map.get(path) {
        if now.duration_since(*last) < DEBOUNCE_WINDOW {
            return false;
        }
    }
    map.insert(path.to_path_buf(), now);
    true
}

// Forwards a debounced change to `callback`, or a watcher error to `on_error`
fn dispatch_event<F, E>(
    res: notify::Result<notify::Event>,
    debounce_map: &Mutex<HashMap<PathBuf, Instant>>,
    callback: &F,
    on_error: &E,
) where
    F: Fn(FsEvent),
    E: Fn(notify::Error),
{
    match res {
        Ok(event) => {
            let Some(kind) = map_event_kind(&event.kind) else {
                return;
            };
            for changed in &event.paths {
                if !debounce(debounce_map, changed) {
                    continue;
                }
                callback(FsEvent {
                    kind,
                    path: changed.to_string_lossy().into_owned(),
                });
            }
        }
        Err(e) => {
            log::warn!("watch error: {}", e);
            on_error(e);
        }
    }
}

pub fn watch_changes<F, E>(path: &str, callback: F, on_error: E) -> Result<FsWatcher>
where
    F: Fn(FsEvent) + Send + 'static,
    E: Fn(notify::Error) + Send + 'static,
{
    let root = PathBuf::from(validate_path(path)?);
    let debounce_map: Mutex<HashMap<PathBuf, Instant>> = Mutex::new(HashMap::new());

    let mut watcher = RecommendedWatcher::new(
        move |res: notify::Result<notify::Event>| dispatch_event(res, &debounce_map, &callback, &on_error),
        Config::default(),
    )?;

    watcher.watch(&root, RecursiveMode::Recursive)?;
    log::info!("watching {}", root.display());

    Ok(FsWatcher { watcher })
}
