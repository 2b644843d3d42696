// Live-preview decoration builder.
//
// Maps syntax nodes to decorations. Markers on lines holding a selection head
// stay visible so the raw markdown can be edited there.

use std::collections::BTreeSet;
use std::sync::OnceLock;

use regex::Regex;

use super::decoration::{Decoration, DecorationSet, LineClass, MarkStyle, Widget};
use super::document::Document;
use super::selection::EditorSelection;
use super::syntax::{NodeKind, SyntaxNode, SyntaxTree};

fn bullet_pattern() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^[-*+](\s+)?$").expect("valid bullet regex"))
}

fn ordered_pattern() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^\d+[.)]").expect("valid ordered list regex"))
}

fn image_pattern() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"!\[(.*?)\]\((.*?)\)").expect("valid image regex"))
}

/// 1-based numbers of the lines holding a selection head.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ActiveLineSet(BTreeSet<usize>);

impl ActiveLineSet {
    pub fn from_selection(doc: &Document, selection: &EditorSelection) -> Self {
        Self(selection.heads().map(|head| doc.line_at(head).number).collect())
    }

    pub fn contains(&self, line: usize) -> bool {
        self.0.contains(&line)
    }
}

struct Rules<'a> {
    doc: &'a Document,
    active: ActiveLineSet,
    out: Vec<Decoration>,
}

impl Rules<'_> {
    fn is_active(&self, node: &SyntaxNode) -> bool {
        self.active.contains(self.doc.line_at(node.from).number)
    }

    fn text(&self, node: &SyntaxNode) -> String {
        self.doc.slice(node.from, node.to).unwrap_or_default()
    }

    fn line_start(&self, offset: usize) -> usize {
        self.doc.line_at(offset).from
    }

    fn hide(&mut self, node: &SyntaxNode) {
        self.out.push(Decoration::hide(node.from, node.to));
    }

    // Hides the marker plus one trailing space; past the end there is no space
    fn hide_with_space(&mut self, node: &SyntaxNode) {
        let to = match self.doc.char_at(node.to) {
            Some(' ') => node.to + 1,
            _ => node.to,
        };
        self.out.push(Decoration::hide(node.from, to));
    }

    fn visit(&mut self, node: &SyntaxNode) {
        match node.kind {
            NodeKind::Heading { level } => {
                let at = self.line_start(node.from);
                self.out.push(Decoration::line(at, LineClass::Heading(level)));
            }
            NodeKind::HeaderMark | NodeKind::QuoteMark => {
                if !self.is_active(node) {
                    self.hide_with_space(node);
                }
            }
            NodeKind::StrongEmphasis => {
                self.out.push(Decoration::mark(node.from, node.to, MarkStyle::Bold));
            }
            NodeKind::Emphasis => {
                self.out.push(Decoration::mark(node.from, node.to, MarkStyle::Italic));
            }
            NodeKind::EmphasisMark | NodeKind::CodeMark | NodeKind::LinkMark | NodeKind::Url => {
                if !self.is_active(node) {
                    self.hide(node);
                }
            }
            NodeKind::ListMark => {
                // Independent rules: both may fire on the same marker
                self.bullet_marker(node);
                self.ordered_marker(node);
            }
            NodeKind::Blockquote => {
                let at = self.line_start(node.from);
                self.out.push(Decoration::line(at, LineClass::Blockquote));
            }
            NodeKind::InlineCode => {
                self.out.push(Decoration::mark(node.from, node.to, MarkStyle::InlineCode));
            }
            NodeKind::FencedCode => {
                let first = self.doc.line_at(node.from).number;
                let last = self.doc.line_at(node.to).number;
                for number in first..=last {
                    if let Some(line) = self.doc.line(number) {
                        self.out.push(Decoration::line(line.from, LineClass::CodeBlock));
                    }
                }
            }
            NodeKind::HorizontalRule => {
                if !self.is_active(node) {
                    self.out.push(Decoration::replace(node.from, node.to, Widget::Divider));
                }
            }
            NodeKind::Link => {
                self.out.push(Decoration::mark(node.from, node.to, MarkStyle::Link));
            }
            NodeKind::Image => {
                if !self.is_active(node) {
                    self.image(node);
                }
            }
            NodeKind::Paragraph
            | NodeKind::SetextHeading { .. }
            | NodeKind::Strikethrough
            | NodeKind::StrikethroughMark
            | NodeKind::BulletList
            | NodeKind::OrderedList
            | NodeKind::ListItem
            | NodeKind::Task
            | NodeKind::CodeInfo
            | NodeKind::CodeBlock
            | NodeKind::LinkLabel
            | NodeKind::Autolink
            | NodeKind::Table
            | NodeKind::HtmlBlock => {}
        }
    }

    fn bullet_marker(&mut self, node: &SyntaxNode) {
        if self.is_active(node) {
            return;
        }
        if bullet_pattern().is_match(&self.text(node)) {
            self.out.push(Decoration::replace(node.from, node.to, Widget::Bullet));
        }
    }

    fn ordered_marker(&mut self, node: &SyntaxNode) {
        if ordered_pattern().is_match(&self.text(node)) {
            self.out
                .push(Decoration::mark(node.from, node.to, MarkStyle::OrderedListMarker));
        }
    }

    // Malformed image syntax yields nothing
    fn image(&mut self, node: &SyntaxNode) {
        let text = self.text(node);
        let Some(caps) = image_pattern().captures(&text) else {
            return;
        };
        let widget = Widget::Image {
            src: caps[2].to_string(),
            alt: caps[1].to_string(),
        };
        self.out.push(Decoration::replace(node.from, node.to, widget));
    }
}

/// Builds the live-preview decorations for one `(document, tree, selection)`
/// snapshot. Pure: identical inputs give identical output.
pub fn build_decorations(doc: &Document, tree: &SyntaxTree, selection: &EditorSelection) -> DecorationSet {
    let mut rules = Rules {
        doc,
        active: ActiveLineSet::from_selection(doc, selection),
        out: Vec::new(),
    };

    for node in tree.iter() {
        rules.visit(node);
    }

    DecorationSet::from_requests(rules.out)
}
