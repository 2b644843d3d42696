use anyhow::Result;
use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::{Mutex, RwLock};
use std::time::Instant;
use tauri::{AppHandle, Emitter, Manager, State};
use tauri_plugin_dialog::DialogExt;
use tauri_plugin_opener::OpenerExt;

pub mod error;
pub mod fs;
pub mod notifications;
pub mod paths;
pub mod preview;
pub mod search;
pub mod workspace;

use error::Error;
use fs::{Entry, FolderHandle, FsEvent, FsWatcher};
use notifications::{now_ms, Notification, NotificationCenter, NotificationKind};
use preview::{DecorationSet, EditorSelection, LivePreview, ViewUpdate};
use search::{SearchAction, SearchOptions, SearchOptionsPatch, SearchResult, SearchState};
use workspace::config::{save_config, try_load_config, WorkspaceConfig};
use workspace::session::{load_session, save_session, SavedState, SESSION_FILE};
use workspace::{WorkspaceAction, WorkspaceState};

// App state
pub struct AppState {
    pub workspace: RwLock<WorkspaceState>,
    pub search: RwLock<SearchState>,
    pub notifications: Mutex<NotificationCenter>,
    /// Live-preview state per editor view id
    pub previews: Mutex<HashMap<String, LivePreview>>,
    pub file_watcher: Mutex<Option<FsWatcher>>,
}

impl AppState {
    fn new(workspace: WorkspaceState) -> Self {
        Self {
            workspace: RwLock::new(workspace),
            search: RwLock::new(SearchState::default()),
            notifications: Mutex::new(NotificationCenter::new()),
            previews: Mutex::new(HashMap::new()),
            file_watcher: Mutex::new(None),
        }
    }
}

impl Default for AppState {
    fn default() -> Self {
        Self::new(WorkspaceState::default())
    }
}

// Get session file path
fn get_session_path(app: &AppHandle) -> Result<PathBuf> {
    let app_data = app.path().app_data_dir()?;
    std::fs::create_dir_all(&app_data)?;
    Ok(app_data.join(SESSION_FILE))
}

// Load the previous session, reloading the workspace config from disk
fn load_workspace(app: &AppHandle) -> WorkspaceState {
    let Some(saved) = get_session_path(app).ok().and_then(|p| load_session(&p)) else {
        return WorkspaceState::default();
    };

    let mut workspace = saved.restore();
    if let Some(root) = workspace.root.clone() {
        workspace.config = workspace::load_config(&root.path, &workspace.config);
    }
    workspace
}

// Save the session to disk
fn persist_session(app: &AppHandle, workspace: &WorkspaceState) {
    let saved = SavedState::from_state(workspace);
    let result = get_session_path(app).and_then(|path| Ok(save_session(&path, &saved)?));
    if let Err(e) = result {
        log::error!("Failed to save session: {}", e);
    }
}

// Queue a notification and push it to the frontend
fn post_notification(app: &AppHandle, kind: NotificationKind, message: impl Into<String>) {
    let state = app.state::<AppState>();
    let notification = {
        let mut center = state.notifications.lock().expect("notifications mutex");
        let id = center.add(kind, message, None);
        center.get(&id).cloned()
    };
    if let Some(notification) = notification {
        let _ = app.emit("notification", notification);
    }
}

// Default config with the global theme preferences laid over it
fn config_base(state: &AppState) -> WorkspaceConfig {
    let workspace = state.workspace.read().expect("workspace read lock");
    let mut base = WorkspaceConfig::default();
    base.theme = base.theme.merged(workspace.config.theme.clone());
    base
}

fn workspace_root(state: &AppState) -> Result<String, String> {
    let workspace = state.workspace.read().expect("workspace read lock");
    workspace
        .root
        .as_ref()
        .map(|r| r.path.clone())
        .ok_or_else(|| "Workspace root not set".to_string())
}

// Apply a workspace action, persist, and return the new state
fn update_workspace(app: &AppHandle, state: &AppState, action: WorkspaceAction) -> WorkspaceState {
    let snapshot = {
        let mut workspace = state.workspace.write().expect("workspace write lock");
        workspace.apply(action);
        workspace.clone()
    };
    persist_session(app, &snapshot);
    snapshot
}

// TAURI COMMANDS

#[tauri::command]
async fn open_folder(app: AppHandle) -> Result<Option<FolderHandle>, String> {
    let (tx, rx) = tokio::sync::oneshot::channel();
    app.dialog()
        .file()
        .set_title("Open Folder")
        .pick_folder(move |path| {
            let _ = tx.send(path);
        });

    let picked = rx.await.map_err(|_| Error::DialogClosed.to_string())?;
    let Some(picked) = picked else {
        return Ok(None);
    };
    let path = picked.into_path().map_err(|e| e.to_string())?;
    Ok(Some(FolderHandle::from_path(&path.to_string_lossy())))
}

#[tauri::command]
async fn save_file_dialog(app: AppHandle, default_name: Option<String>) -> Result<Option<String>, String> {
    let (tx, rx) = tokio::sync::oneshot::channel();
    app.dialog()
        .file()
        .add_filter("Markdown", &["md"])
        .set_file_name(default_name.unwrap_or_else(|| "Untitled.md".to_string()))
        .save_file(move |path| {
            let _ = tx.send(path);
        });

    let picked = rx.await.map_err(|_| Error::DialogClosed.to_string())?;
    match picked {
        Some(path) => {
            let path = path.into_path().map_err(|e| e.to_string())?;
            Ok(Some(path.to_string_lossy().into_owned()))
        }
        None => Ok(None),
    }
}

#[tauri::command]
async fn read_file(path: String) -> Result<String, String> {
    let path = paths::validate_path(&path).map_err(|e| e.to_string())?;
    tokio::fs::read_to_string(path)
        .await
        .map_err(|e| e.to_string())
}

#[tauri::command]
async fn write_file(path: String, content: String) -> Result<(), String> {
    let path = paths::validate_path(&path).map_err(|e| e.to_string())?;
    tokio::fs::write(path, content)
        .await
        .map_err(|e| e.to_string())
}

#[tauri::command]
fn write_file_atomic(path: String, content: String) -> Result<(), String> {
    fs::write_file_atomic(&path, &content).map_err(|e| e.to_string())
}

#[tauri::command]
fn delete_path(app: AppHandle, path: String, state: State<AppState>) -> Result<(), String> {
    fs::delete_path(&path).map_err(|e| e.to_string())?;
    update_workspace(&app, &state, WorkspaceAction::CloseFileByPath(path));
    Ok(())
}

#[tauri::command]
fn list_directory(path: String, state: State<AppState>) -> Result<Vec<Entry>, String> {
    let entries = fs::list_directory(&path).map_err(|e| e.to_string())?;
    let workspace = state.workspace.read().expect("workspace read lock");
    Ok(entries
        .into_iter()
        .filter(|entry| !workspace.config.is_ignored(&entry.name))
        .collect())
}

#[tauri::command]
fn path_exists(path: String) -> Result<bool, String> {
    fs::exists(&path).map_err(|e| e.to_string())
}

#[tauri::command]
fn rename_path(
    app: AppHandle,
    old_path: String,
    new_path: String,
    state: State<AppState>,
) -> Result<(), String> {
    fs::rename_path(&old_path, &new_path).map_err(|e| e.to_string())?;

    let new_name = paths::display_name(&new_path);
    update_workspace(
        &app,
        &state,
        WorkspaceAction::RenameOpenFile {
            old_path,
            new_path,
            new_name,
        },
    );
    Ok(())
}

#[tauri::command]
fn create_directory(path: String) -> Result<(), String> {
    fs::create_directory(&path).map_err(|e| e.to_string())
}

#[tauri::command]
fn get_documents_dir() -> Result<String, String> {
    fs::documents_dir().map_err(|e| e.to_string())
}

#[tauri::command]
fn set_workspace_root(app: AppHandle, path: String, state: State<AppState>) -> Result<WorkspaceState, String> {
    let path = paths::validate_path(&path).map_err(|e| e.to_string())?;
    if !PathBuf::from(path).is_dir() {
        return Err(Error::NotADirectory(path.to_string()).to_string());
    }

    let base = config_base(&state);

    let config = match try_load_config(path, &base) {
        Ok(config) => config.unwrap_or(base),
        Err(e) => {
            log::warn!("Failed to load config for {}: {}", path, e);
            post_notification(&app, NotificationKind::Warning, format!("Failed to load workspace config: {}", e));
            base
        }
    };

    {
        let mut workspace = state.workspace.write().expect("workspace write lock");
        workspace.apply(WorkspaceAction::SetRoot(FolderHandle::from_path(path)));
        workspace.apply(WorkspaceAction::SetConfig(config));
    }

    // The old watcher points at the previous root
    *state.file_watcher.lock().expect("file watcher mutex") = None;

    let snapshot = state.workspace.read().expect("workspace read lock").clone();
    persist_session(&app, &snapshot);
    log::info!("workspace root set to {}", path);
    Ok(snapshot)
}

#[tauri::command]
fn get_workspace_state(state: State<AppState>) -> WorkspaceState {
    state.workspace.read().expect("workspace read lock").clone()
}

#[tauri::command]
fn dispatch_workspace(app: AppHandle, action: WorkspaceAction, state: State<AppState>) -> WorkspaceState {
    update_workspace(&app, &state, action)
}

#[tauri::command]
fn load_workspace_config(app: AppHandle, state: State<AppState>) -> Result<WorkspaceConfig, String> {
    let root = workspace_root(&state)?;
    let base = config_base(&state);
    let config = match try_load_config(&root, &base) {
        Ok(config) => config.unwrap_or(base),
        Err(e) => {
            log::warn!("Failed to load config for {}: {}", root, e);
            post_notification(&app, NotificationKind::Warning, format!("Failed to load workspace config: {}", e));
            base
        }
    };

    update_workspace(&app, &state, WorkspaceAction::SetConfig(config.clone()));
    Ok(config)
}

#[tauri::command]
fn save_workspace_config(app: AppHandle, config: WorkspaceConfig, state: State<AppState>) -> Result<(), String> {
    let root = workspace_root(&state)?;
    if let Err(e) = save_config(&root, &config) {
        log::error!("Failed to save config: {}", e);
        post_notification(&app, NotificationKind::Error, "Failed to save workspace config");
        return Err(e.to_string());
    }

    update_workspace(&app, &state, WorkspaceAction::SetConfig(config));
    Ok(())
}

#[tauri::command]
async fn global_search(options: SearchOptions, state: State<'_, AppState>) -> Result<Vec<SearchResult>, String> {
    {
        let mut search = state.search.write().expect("search write lock");
        search.apply(SearchAction::SetQuery(options.query.clone()));
        search.apply(SearchAction::SetOptions(SearchOptionsPatch {
            case_sensitive: Some(options.case_sensitive),
            use_regex: Some(options.use_regex),
            whole_word: Some(options.whole_word),
        }));
        search.apply(SearchAction::SetSearching(true));
    }

    let started = Instant::now();
    let walk_options = options.clone();
    let result = tokio::task::spawn_blocking(move || search::global_search(&walk_options))
        .await
        .map_err(|e| e.to_string())?;
    let time_ms = started.elapsed().as_millis() as u64;

    let mut search = state.search.write().expect("search write lock");
    match result {
        Ok(results) => {
            search.apply(SearchAction::SetResults {
                results: results.clone(),
                time_ms,
            });
            Ok(results)
        }
        Err(e) => {
            search.apply(SearchAction::SetSearching(false));
            Err(e.to_string())
        }
    }
}

#[tauri::command]
fn get_search_state(state: State<AppState>) -> SearchState {
    state.search.read().expect("search read lock").clone()
}

#[tauri::command]
fn update_search_options(options: SearchOptionsPatch, state: State<AppState>) -> SearchState {
    let mut search = state.search.write().expect("search write lock");
    search.apply(SearchAction::SetOptions(options));
    search.clone()
}

#[tauri::command]
fn reset_search(state: State<AppState>) {
    state.search.write().expect("search write lock").apply(SearchAction::Reset);
}

#[tauri::command]
fn list_notifications(state: State<AppState>) -> Vec<Notification> {
    let mut center = state.notifications.lock().expect("notifications mutex");
    center.expire(now_ms());
    center.list().to_vec()
}

#[tauri::command]
fn dismiss_notification(id: String, state: State<AppState>) {
    state.notifications.lock().expect("notifications mutex").remove(&id);
}

#[tauri::command]
fn build_live_preview(text: String, selection: EditorSelection) -> DecorationSet {
    preview::preview_text(&text, &selection)
}

#[tauri::command]
fn open_live_preview(
    view_id: String,
    text: String,
    selection: EditorSelection,
    state: State<AppState>,
) -> DecorationSet {
    let live = LivePreview::new(&text, selection);
    let decorations = live.decorations().clone();
    state
        .previews
        .lock()
        .expect("previews mutex")
        .insert(view_id, live);
    decorations
}

#[tauri::command]
fn update_live_preview(view_id: String, update: ViewUpdate, state: State<AppState>) -> Result<DecorationSet, String> {
    let mut previews = state.previews.lock().expect("previews mutex");
    let live = previews
        .get_mut(&view_id)
        .ok_or_else(|| format!("No live preview open for view {}", view_id))?;
    live.update(update);
    Ok(live.decorations().clone())
}

#[tauri::command]
fn close_live_preview(view_id: String, state: State<AppState>) {
    state.previews.lock().expect("previews mutex").remove(&view_id);
}

#[tauri::command]
fn start_watching(app: AppHandle, state: State<AppState>) -> Result<(), String> {
    let root = workspace_root(&state)?;

    let app_handle = app.clone();
    let error_handle = app.clone();
    let watcher = fs::watch_changes(
        &root,
        move |event: FsEvent| {
            let _ = app_handle.emit("fs-change", event);
        },
        move |e: notify::Error| {
            post_notification(&error_handle, NotificationKind::Error, format!("File watcher error: {}", e));
        },
    );

    match watcher {
        Ok(watcher) => {
            *state.file_watcher.lock().expect("file watcher mutex") = Some(watcher);
            Ok(())
        }
        Err(e) => {
            log::error!("Failed to watch {}: {}", root, e);
            post_notification(&app, NotificationKind::Error, format!("File watching unavailable: {}", e));
            Err(e.to_string())
        }
    }
}

#[tauri::command]
fn open_external_link(app: AppHandle, url: String) -> Result<(), String> {
    app.opener()
        .open_url(url, None::<&str>)
        .map_err(|e| e.to_string())
}

#[cfg_attr(mobile, tauri::mobile_entry_point)]
pub fn run() {
    env_logger::init();

    tauri::Builder::default()
        .plugin(tauri_plugin_opener::init())
        .plugin(tauri_plugin_fs::init())
        .plugin(tauri_plugin_dialog::init())
        .setup(|app| {
            // Restore the previous session on startup
            let workspace = load_workspace(app.handle());
            app.manage(AppState::new(workspace));
            Ok(())
        })
        .invoke_handler(tauri::generate_handler![
            open_folder,
            save_file_dialog,
            read_file,
            write_file,
            write_file_atomic,
            delete_path,
            list_directory,
            path_exists,
            rename_path,
            create_directory,
            get_documents_dir,
            set_workspace_root,
            get_workspace_state,
            dispatch_workspace,
            load_workspace_config,
            save_workspace_config,
            global_search,
            get_search_state,
            update_search_options,
            reset_search,
            list_notifications,
            dismiss_notification,
            build_live_preview,
            open_live_preview,
            update_live_preview,
            close_live_preview,
            start_watching,
            open_external_link,
        ])
        .run(tauri::generate_context!())
        .expect("error while running tauri application");
}
