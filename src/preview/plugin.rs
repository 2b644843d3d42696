use serde::Deserialize;

use super::builder::build_decorations;
use super::decoration::DecorationSet;
use super::document::Document;
use super::selection::EditorSelection;
use super::syntax::{parse, SyntaxTree};

/// Change report from the host editor view.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ViewUpdate {
    /// New document text, present when the document changed
    #[serde(default)]
    pub text: Option<String>,
    #[serde(default)]
    pub selection: Option<EditorSelection>,
    #[serde(default)]
    pub viewport_changed: bool,
}

impl ViewUpdate {
    pub fn doc_changed(&self) -> bool {
        self.text.is_some()
    }

    pub fn selection_set(&self) -> bool {
        self.selection.is_some()
    }
}

/// Live-preview state for one editor view: the current snapshot and the
/// decorations built from it.
#[derive(Debug, Clone)]
pub struct LivePreview {
    document: Document,
    tree: SyntaxTree,
    selection: EditorSelection,
    decorations: DecorationSet,
}

impl LivePreview {
    pub fn new(text: &str, selection: EditorSelection) -> Self {
        let document = Document::new(text);
        let tree = parse(&document);
        let decorations = build_decorations(&document, &tree, &selection);
        Self {
            document,
            tree,
            selection,
            decorations,
        }
    }

    /// Applies an update and rebuilds when the document, viewport or selection
    /// changed. Returns whether a rebuild happened.
    pub fn update(&mut self, update: ViewUpdate) -> bool {
        if !(update.doc_changed() || update.viewport_changed || update.selection_set()) {
            return false;
        }

        if let Some(text) = update.text {
            self.document = Document::new(&text);
            self.tree = parse(&self.document);
        }
        if let Some(selection) = update.selection {
            self.selection = selection;
        }

        self.decorations = build_decorations(&self.document, &self.tree, &self.selection);
        true
    }

    pub fn decorations(&self) -> &DecorationSet {
        &self.decorations
    }

    pub fn document(&self) -> &Document {
        &self.document
    }

    pub fn selection(&self) -> &EditorSelection {
        &self.selection
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::preview::decoration::DecorationKind;

    fn hidden(preview: &LivePreview) -> usize {
        preview
            .decorations()
            .iter()
            .filter(|d| d.kind == DecorationKind::Hide)
            .count()
    }

    #[test]
    fn test_builds_on_creation() {
        let preview = LivePreview::new("# Title\n\nend", EditorSelection::cursor(10));
        assert_eq!(hidden(&preview), 1);
    }

    #[test]
    fn test_selection_change_rebuilds() {
        let mut preview = LivePreview::new("# Title\n\nend", EditorSelection::cursor(10));
        let rebuilt = preview.update(ViewUpdate {
            selection: Some(EditorSelection::cursor(3)),
            ..Default::default()
        });
        assert!(rebuilt);
        assert_eq!(hidden(&preview), 0);
    }

    #[test]
    fn test_document_change_reparses() {
        let mut preview = LivePreview::new("plain", EditorSelection::cursor(0));
        assert!(preview.decorations().is_empty());

        preview.update(ViewUpdate {
            text: Some("plain **bold**".to_string()),
            ..Default::default()
        });
        assert!(!preview.decorations().is_empty());
        assert_eq!(preview.document().len_chars(), 14);
    }

    #[test]
    fn test_viewport_change_rebuilds_same_set() {
        let mut preview = LivePreview::new("- a\n\nend", EditorSelection::cursor(7));
        let before = preview.decorations().clone();
        assert!(preview.update(ViewUpdate {
            viewport_changed: true,
            ..Default::default()
        }));
        assert_eq!(preview.decorations(), &before);
    }

    #[test]
    fn test_empty_update_is_ignored() {
        let mut preview = LivePreview::new("text", EditorSelection::cursor(0));
        assert!(!preview.update(ViewUpdate::default()));
    }

    #[test]
    fn test_deserialize_update() {
        let update: ViewUpdate = serde_json::from_str(
            r#"{"text":"x","selection":{"ranges":[{"anchor":1,"head":1}]},"viewportChanged":true}"#,
        )
        .unwrap();
        assert!(update.doc_changed());
        assert!(update.selection_set());
        assert!(update.viewport_changed);
    }
}
