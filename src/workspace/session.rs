use serde::{Deserialize, Serialize};
use std::path::Path;

use super::config::{ThemeOverrides, WorkspaceConfig};
use super::state::{OpenFile, WorkspaceState};
use crate::error::Result;
use crate::fs::FolderHandle;

pub const SESSION_FILE: &str = "session.json";

/// Snapshot of the workspace persisted between launches.
///
/// The optional fields were added after the first release and may be
/// missing from older session files.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SavedState {
    pub root_path: Option<String>,
    #[serde(default)]
    pub open_files: Vec<OpenFile>,
    #[serde(default)]
    pub active_file_index: Option<usize>,
    #[serde(default = "default_sidebar_visible")]
    pub sidebar_visible: bool,
    #[serde(default = "default_sidebar_width")]
    pub sidebar_width: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub quick_links: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub recent_workspaces: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub theme_preferences: Option<ThemeOverrides>,
}

fn default_sidebar_visible() -> bool {
    true
}

fn default_sidebar_width() -> u32 {
    250
}

impl SavedState {
    pub fn from_state(state: &WorkspaceState) -> Self {
        Self {
            root_path: state.root.as_ref().map(|r| r.path.clone()),
            open_files: state.open_files.clone(),
            active_file_index: state.active_file_index,
            sidebar_visible: state.sidebar_visible,
            sidebar_width: state.sidebar_width,
            quick_links: Some(state.quick_links.clone()),
            recent_workspaces: Some(state.recent_workspaces.clone()),
            theme_preferences: Some(state.config.theme.clone()),
        }
    }

    /// Rebuilds workspace state. Theme preferences are laid over the default
    /// config; an active index past the last tab is dropped.
    pub fn restore(self) -> WorkspaceState {
        let mut config = WorkspaceConfig::default();
        if let Some(theme) = self.theme_preferences {
            config.theme = config.theme.merged(theme);
        }

        let active_file_index = self
            .active_file_index
            .filter(|&i| i < self.open_files.len());

        WorkspaceState {
            root: self.root_path.as_deref().map(FolderHandle::from_path),
            config,
            open_files: self.open_files,
            active_file_index,
            sidebar_visible: self.sidebar_visible,
            sidebar_width: self.sidebar_width,
            quick_links: self.quick_links.unwrap_or_default(),
            recent_workspaces: self.recent_workspaces.unwrap_or_default(),
        }
    }
}

pub fn save_session(path: &Path, state: &SavedState) -> Result<()> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    let content = serde_json::to_string_pretty(state)?;
    std::fs::write(path, content)?;
    Ok(())
}

pub fn load_session(path: &Path) -> Option<SavedState> {
    if !path.exists() {
        return None;
    }
    let parsed = std::fs::read_to_string(path)
        .map_err(crate::error::Error::from)
        .and_then(|content| Ok(serde_json::from_str(&content)?));
    match parsed {
        Ok(saved) => Some(saved),
        Err(e) => {
            log::error!("Failed to load session: {}", e);
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::workspace::config::ColorScheme;
    use crate::workspace::state::WorkspaceAction;

    #[test]
    fn test_round_trip_through_disk() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join(SESSION_FILE);

        let mut state = WorkspaceState::default();
        state.apply(WorkspaceAction::SetRoot(FolderHandle::from_path("/notes")));
        state.apply(WorkspaceAction::OpenFile(OpenFile {
            path: "/notes/a.md".to_string(),
            name: "a.md".to_string(),
            content: "draft".to_string(),
            saved_content: "saved".to_string(),
            scroll_position: 40,
            cursor_position: 3,
        }));
        state.apply(WorkspaceAction::AddQuickLink("/notes/a.md".to_string()));
        state.apply(WorkspaceAction::SetSidebarWidth(320));

        save_session(&path, &SavedState::from_state(&state)).unwrap();
        let restored = load_session(&path).unwrap().restore();
        assert_eq!(restored, state);
        assert!(restored.open_files[0].is_dirty());
    }

    #[test]
    fn test_missing_or_invalid_session() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(SESSION_FILE);
        assert!(load_session(&path).is_none());

        std::fs::write(&path, "garbage").unwrap();
        assert!(load_session(&path).is_none());
    }

    #[test]
    fn test_older_session_without_optional_fields() {
        let saved: SavedState = serde_json::from_str(
            r#"{"rootPath":null,"openFiles":[],"activeFileIndex":null,"sidebarVisible":false,"sidebarWidth":200}"#,
        )
        .unwrap();
        let state = saved.restore();
        assert!(state.root.is_none());
        assert!(!state.sidebar_visible);
        assert!(state.quick_links.is_empty());
        assert_eq!(state.config, WorkspaceConfig::default());
    }

    #[test]
    fn test_theme_preferences_apply_over_defaults() {
        let saved = SavedState {
            root_path: None,
            open_files: vec![],
            active_file_index: Some(4),
            sidebar_visible: true,
            sidebar_width: 250,
            quick_links: None,
            recent_workspaces: None,
            theme_preferences: Some(ThemeOverrides {
                color_scheme: Some(ColorScheme::Light),
                ..Default::default()
            }),
        };
        let state = saved.restore();
        assert_eq!(state.config.theme.color_scheme, Some(ColorScheme::Light));
        assert_eq!(state.config.theme.font_size, Some(14.0));
        assert_eq!(state.active_file_index, None);
    }
}
