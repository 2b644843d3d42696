use serde::{Deserialize, Serialize};

use super::config::WorkspaceConfig;
use crate::fs::FolderHandle;

const MAX_RECENT_WORKSPACES: usize = 10;

// Editor tab
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OpenFile {
    pub path: String,
    pub name: String,
    pub content: String,
    pub saved_content: String,
    #[serde(default)]
    pub scroll_position: u64,
    #[serde(default)]
    pub cursor_position: usize,
}

impl OpenFile {
    pub fn is_dirty(&self) -> bool {
        self.content != self.saved_content
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct WorkspaceState {
    pub root: Option<FolderHandle>,
    pub config: WorkspaceConfig,
    pub open_files: Vec<OpenFile>,
    pub active_file_index: Option<usize>,
    pub sidebar_visible: bool,
    pub sidebar_width: u32,
    pub quick_links: Vec<String>,
    pub recent_workspaces: Vec<String>,
}

impl Default for WorkspaceState {
    fn default() -> Self {
        Self {
            root: None,
            config: WorkspaceConfig::default(),
            open_files: Vec::new(),
            active_file_index: None,
            sidebar_visible: true,
            sidebar_width: 250,
            quick_links: Vec::new(),
            recent_workspaces: Vec::new(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(tag = "type", content = "payload", rename_all = "camelCase")]
pub enum WorkspaceAction {
    SetRoot(FolderHandle),
    SetConfig(WorkspaceConfig),
    OpenFile(OpenFile),
    CloseFile(usize),
    SetActiveFile(usize),
    #[serde(rename_all = "camelCase")]
    UpdateFileContent { index: usize, content: String },
    SetSidebarVisible(bool),
    SetSidebarWidth(u32),
    MarkFileSaved(usize),
    #[serde(rename_all = "camelCase")]
    RenameOpenFile {
        old_path: String,
        new_path: String,
        new_name: String,
    },
    CloseFileByPath(String),
    CloseAllFiles,
    CloseOtherFiles(usize),
    MoveOpenFile { from: usize, to: usize },
    AddQuickLink(String),
    RemoveQuickLink(String),
}

impl WorkspaceState {
    pub fn active_file(&self) -> Option<&OpenFile> {
        self.active_file_index.and_then(|i| self.open_files.get(i))
    }

    pub fn apply(&mut self, action: WorkspaceAction) {
        match action {
            WorkspaceAction::SetRoot(root) => {
                self.recent_workspaces.retain(|p| *p != root.path);
                self.recent_workspaces.insert(0, root.path.clone());
                self.recent_workspaces.truncate(MAX_RECENT_WORKSPACES);
                self.root = Some(root);
            }
            WorkspaceAction::SetConfig(config) => self.config = config,
            WorkspaceAction::OpenFile(file) => {
                match self.open_files.iter().position(|f| f.path == file.path) {
                    Some(existing) => self.active_file_index = Some(existing),
                    None => {
                        self.open_files.push(file);
                        self.active_file_index = Some(self.open_files.len() - 1);
                    }
                }
            }
            WorkspaceAction::CloseFile(index) => self.close_at(index),
            WorkspaceAction::SetActiveFile(index) => {
                if index < self.open_files.len() {
                    self.active_file_index = Some(index);
                }
            }
            WorkspaceAction::UpdateFileContent { index, content } => {
                if let Some(file) = self.open_files.get_mut(index) {
                    file.content = content;
                }
            }
            WorkspaceAction::SetSidebarVisible(visible) => self.sidebar_visible = visible,
            WorkspaceAction::SetSidebarWidth(width) => self.sidebar_width = width,
            WorkspaceAction::MarkFileSaved(index) => {
                if let Some(file) = self.open_files.get_mut(index) {
                    file.saved_content = file.content.clone();
                }
            }
            WorkspaceAction::RenameOpenFile {
                old_path,
                new_path,
                new_name,
            } => {
                for file in self.open_files.iter_mut().filter(|f| f.path == old_path) {
                    file.path = new_path.clone();
                    file.name = new_name.clone();
                }
            }
            WorkspaceAction::CloseFileByPath(path) => {
                if let Some(index) = self.open_files.iter().position(|f| f.path == path) {
                    self.close_at(index);
                }
            }
            WorkspaceAction::CloseAllFiles => {
                self.open_files.clear();
                self.active_file_index = None;
            }
            WorkspaceAction::CloseOtherFiles(keep) => {
                if keep < self.open_files.len() {
                    let kept = self.open_files.swap_remove(keep);
                    self.open_files = vec![kept];
                    self.active_file_index = Some(0);
                }
            }
            WorkspaceAction::MoveOpenFile { from, to } => self.move_file(from, to),
            WorkspaceAction::AddQuickLink(path) => {
                if !self.quick_links.contains(&path) {
                    self.quick_links.push(path);
                }
            }
            WorkspaceAction::RemoveQuickLink(path) => self.quick_links.retain(|p| *p != path),
        }
    }

    // Closing at or before the active tab shifts the active index left.
    fn close_at(&mut self, index: usize) {
        if index >= self.open_files.len() {
            return;
        }
        self.open_files.remove(index);

        if self.open_files.is_empty() {
            self.active_file_index = None;
        } else if let Some(active) = self.active_file_index {
            if index <= active {
                self.active_file_index = Some(active.saturating_sub(1));
            }
        }
    }

    fn move_file(&mut self, from: usize, to: usize) {
        let len = self.open_files.len();
        if from == to || from >= len || to >= len {
            return;
        }
        let file = self.open_files.remove(from);
        self.open_files.insert(to, file);

        if let Some(active) = self.active_file_index {
            self.active_file_index = Some(if active == from {
                to
            } else if active > from && active <= to {
                active - 1
            } else if active < from && active >= to {
                active + 1
            } else {
                active
            });
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn file(path: &str) -> OpenFile {
        OpenFile {
            path: path.to_string(),
            name: path.trim_start_matches('/').to_string(),
            content: String::new(),
            saved_content: String::new(),
            ..Default::default()
        }
    }

    fn with_files(paths: &[&str]) -> WorkspaceState {
        let mut state = WorkspaceState::default();
        for p in paths {
            state.apply(WorkspaceAction::OpenFile(file(p)));
        }
        state
    }

    fn paths(state: &WorkspaceState) -> Vec<&str> {
        state.open_files.iter().map(|f| f.path.as_str()).collect()
    }

    #[test]
    fn test_defaults() {
        let state = WorkspaceState::default();
        assert!(state.sidebar_visible);
        assert_eq!(state.sidebar_width, 250);
        assert_eq!(state.active_file_index, None);
        assert!(state.active_file().is_none());
    }

    #[test]
    fn test_open_file_appends_or_activates() {
        let mut state = with_files(&["/a", "/b"]);
        assert_eq!(state.active_file_index, Some(1));

        state.apply(WorkspaceAction::OpenFile(file("/a")));
        assert_eq!(state.open_files.len(), 2);
        assert_eq!(state.active_file_index, Some(0));
    }

    #[test]
    fn test_close_file_index_arithmetic() {
        // Closing before the active tab shifts left
        let mut state = with_files(&["/a", "/b", "/c"]);
        state.apply(WorkspaceAction::CloseFile(0));
        assert_eq!(state.active_file_index, Some(1));
        assert_eq!(state.active_file().unwrap().path, "/c");

        // Closing after the active tab keeps it
        let mut state = with_files(&["/a", "/b", "/c"]);
        state.apply(WorkspaceAction::SetActiveFile(0));
        state.apply(WorkspaceAction::CloseFile(2));
        assert_eq!(state.active_file_index, Some(0));

        // Closing the active first tab stays at zero
        state.apply(WorkspaceAction::CloseFile(0));
        assert_eq!(state.active_file_index, Some(0));
        assert_eq!(paths(&state), vec!["/b"]);

        state.apply(WorkspaceAction::CloseFile(0));
        assert_eq!(state.active_file_index, None);
    }

    #[test]
    fn test_out_of_range_is_noop() {
        let mut state = with_files(&["/a"]);
        let before = state.clone();
        state.apply(WorkspaceAction::CloseFile(5));
        state.apply(WorkspaceAction::SetActiveFile(3));
        state.apply(WorkspaceAction::UpdateFileContent {
            index: 2,
            content: "x".to_string(),
        });
        state.apply(WorkspaceAction::CloseOtherFiles(9));
        state.apply(WorkspaceAction::MoveOpenFile { from: 0, to: 4 });
        state.apply(WorkspaceAction::CloseFileByPath("/missing".to_string()));
        assert_eq!(state, before);
    }

    #[test]
    fn test_dirty_and_saved() {
        let mut state = with_files(&["/a"]);
        state.apply(WorkspaceAction::UpdateFileContent {
            index: 0,
            content: "changed".to_string(),
        });
        assert!(state.open_files[0].is_dirty());

        state.apply(WorkspaceAction::MarkFileSaved(0));
        assert!(!state.open_files[0].is_dirty());
        assert_eq!(state.open_files[0].saved_content, "changed");
    }

    #[test]
    fn test_rename_and_close_by_path() {
        let mut state = with_files(&["/a", "/b"]);
        state.apply(WorkspaceAction::RenameOpenFile {
            old_path: "/a".to_string(),
            new_path: "/z".to_string(),
            new_name: "z".to_string(),
        });
        assert_eq!(paths(&state), vec!["/z", "/b"]);
        assert_eq!(state.open_files[0].name, "z");

        state.apply(WorkspaceAction::CloseFileByPath("/z".to_string()));
        assert_eq!(paths(&state), vec!["/b"]);
        assert_eq!(state.active_file_index, Some(0));
    }

    #[test]
    fn test_close_all_and_others() {
        let mut state = with_files(&["/a", "/b", "/c"]);
        state.apply(WorkspaceAction::CloseOtherFiles(1));
        assert_eq!(paths(&state), vec!["/b"]);
        assert_eq!(state.active_file_index, Some(0));

        state.apply(WorkspaceAction::CloseAllFiles);
        assert!(state.open_files.is_empty());
        assert_eq!(state.active_file_index, None);
    }

    #[test]
    fn test_move_open_file_tracks_active() {
        let mut state = with_files(&["/a", "/b", "/c", "/d"]);

        state.apply(WorkspaceAction::SetActiveFile(0));
        state.apply(WorkspaceAction::MoveOpenFile { from: 0, to: 2 });
        assert_eq!(paths(&state), vec!["/b", "/c", "/a", "/d"]);
        assert_eq!(state.active_file_index, Some(2));

        // Active tab between from and to shifts left
        state.apply(WorkspaceAction::SetActiveFile(1));
        state.apply(WorkspaceAction::MoveOpenFile { from: 0, to: 3 });
        assert_eq!(paths(&state), vec!["/c", "/a", "/d", "/b"]);
        assert_eq!(state.active_file_index, Some(0));

        // Moving a tab in front of the active one shifts it right
        state.apply(WorkspaceAction::MoveOpenFile { from: 3, to: 0 });
        assert_eq!(paths(&state), vec!["/b", "/c", "/a", "/d"]);
        assert_eq!(state.active_file_index, Some(1));
        assert_eq!(state.active_file().unwrap().path, "/c");
    }

    #[test]
    fn test_set_root_tracks_recent_workspaces() {
        let mut state = WorkspaceState::default();
        for i in 0..12 {
            state.apply(WorkspaceAction::SetRoot(FolderHandle::from_path(&format!("/w{}", i))));
        }
        assert_eq!(state.recent_workspaces.len(), 10);
        assert_eq!(state.recent_workspaces[0], "/w11");

        state.apply(WorkspaceAction::SetRoot(FolderHandle::from_path("/w5")));
        assert_eq!(state.recent_workspaces[0], "/w5");
        assert_eq!(state.recent_workspaces.iter().filter(|p| *p == "/w5").count(), 1);
        assert_eq!(state.root.as_ref().unwrap().name, "w5");
    }

    #[test]
    fn test_quick_links() {
        let mut state = WorkspaceState::default();
        state.apply(WorkspaceAction::AddQuickLink("/a.md".to_string()));
        state.apply(WorkspaceAction::AddQuickLink("/a.md".to_string()));
        state.apply(WorkspaceAction::AddQuickLink("/b.md".to_string()));
        assert_eq!(state.quick_links, vec!["/a.md", "/b.md"]);

        state.apply(WorkspaceAction::RemoveQuickLink("/a.md".to_string()));
        assert_eq!(state.quick_links, vec!["/b.md"]);
    }

    #[test]
    fn test_deserialize_action() {
        let action: WorkspaceAction = serde_json::from_str(
            r#"{"type":"renameOpenFile","payload":{"oldPath":"/a","newPath":"/b","newName":"b"}}"#,
        )
        .unwrap();
        assert_eq!(
            action,
            WorkspaceAction::RenameOpenFile {
                old_path: "/a".to_string(),
                new_path: "/b".to_string(),
                new_name: "b".to_string(),
            }
        );

        let action: WorkspaceAction = serde_json::from_str(r#"{"type":"closeAllFiles"}"#).unwrap();
        assert_eq!(action, WorkspaceAction::CloseAllFiles);
    }
}
