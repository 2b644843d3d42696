pub mod builder;
pub mod decoration;
pub mod document;
pub mod plugin;
pub mod selection;
pub mod syntax;

pub use builder::{build_decorations, ActiveLineSet};
pub use decoration::{Decoration, DecorationKind, DecorationSet, LineClass, MarkStyle, Widget};
pub use document::{Document, Line};
pub use plugin::{LivePreview, ViewUpdate};
pub use selection::{EditorSelection, SelectionRange};
pub use syntax::{parse, NodeKind, SyntaxNode, SyntaxTree};

/// One-shot build from raw text.
pub fn preview_text(text: &str, selection: &EditorSelection) -> DecorationSet {
    let doc = Document::new(text);
    let tree = parse(&doc);
    build_decorations(&doc, &tree, selection)
}
