// Markdown syntax tree for live preview.
//
// `pulldown-cmark` reports element ranges but not the marker characters
// inside them (`#`, `**`, `>`, fences, link brackets). The tree adds those
// as child nodes so each marker can be shown or hidden on its own.

use std::collections::HashSet;
use std::ops::Range;

use pulldown_cmark::{CodeBlockKind, Event, HeadingLevel, LinkType, Options, Parser, Tag};

use super::document::Document;

/// Node vocabulary produced by [`parse`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NodeKind {
    Paragraph,
    /// ATX heading (`# Title`)
    Heading { level: u8 },
    /// Underlined heading (`Title\n===`); its underline is a `HeaderMark`
    SetextHeading { level: u8 },
    HeaderMark,
    Emphasis,
    StrongEmphasis,
    EmphasisMark,
    Strikethrough,
    StrikethroughMark,
    BulletList,
    OrderedList,
    ListItem,
    ListMark,
    Task,
    Blockquote,
    QuoteMark,
    InlineCode,
    CodeMark,
    FencedCode,
    CodeInfo,
    /// Indented code block
    CodeBlock,
    HorizontalRule,
    Link,
    Image,
    LinkMark,
    LinkLabel,
    Url,
    Autolink,
    Table,
    HtmlBlock,
}

/// A typed `[from, to)` char range.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SyntaxNode {
    pub from: usize,
    pub to: usize,
    pub kind: NodeKind,
}

impl SyntaxNode {
    pub fn new(from: usize, to: usize, kind: NodeKind) -> Self {
        Self { from, to, kind }
    }
}

/// Flat preorder node list. A parent always precedes children that start at
/// the same offset.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SyntaxTree {
    nodes: Vec<SyntaxNode>,
}

impl SyntaxTree {
    pub fn from_nodes(mut nodes: Vec<SyntaxNode>) -> Self {
        // Stable: insertion order breaks ties, which keeps parents first
        nodes.sort_by_key(|n| n.from);
        Self { nodes }
    }

    pub fn iter(&self) -> impl Iterator<Item = &SyntaxNode> {
        self.nodes.iter()
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn of_kind(&self, kind: NodeKind) -> impl Iterator<Item = &SyntaxNode> {
        self.nodes.iter().filter(move |n| n.kind == kind)
    }
}

pub fn markdown_options() -> Options {
    Options::ENABLE_STRIKETHROUGH | Options::ENABLE_TABLES | Options::ENABLE_TASKLISTS
}

/// Parses the document into a [`SyntaxTree`] with char offsets.
pub fn parse(doc: &Document) -> SyntaxTree {
    let text = doc.text();
    let mut builder = TreeBuilder::new(&text);

    for (event, range) in Parser::new_ext(&text, markdown_options()).into_offset_iter() {
        builder.event(event, range);
    }

    let nodes = builder
        .nodes
        .into_iter()
        .map(|(range, kind)| SyntaxNode::new(doc.byte_to_char(range.start), doc.byte_to_char(range.end), kind))
        .collect();

    SyntaxTree::from_nodes(nodes)
}

enum Frame {
    AtxHeading { range: Range<usize>, open_end: usize },
    Delimited { range: Range<usize>, len: usize, mark: NodeKind },
    Link { range: Range<usize>, content_end: usize, inline: bool, dest: String },
    Fence { range: Range<usize>, fence: u8, len: usize, column: usize },
    Other,
}

struct TreeBuilder<'a> {
    src: &'a str,
    nodes: Vec<(Range<usize>, NodeKind)>,
    stack: Vec<Frame>,
    // `>` positions already claimed by an enclosing quote
    quote_marked: HashSet<usize>,
}

impl<'a> TreeBuilder<'a> {
    fn new(src: &'a str) -> Self {
        Self {
            src,
            nodes: Vec::new(),
            stack: Vec::new(),
            quote_marked: HashSet::new(),
        }
    }

    fn push(&mut self, range: Range<usize>, kind: NodeKind) {
        self.nodes.push((range, kind));
    }

    fn byte(&self, pos: usize) -> Option<u8> {
        self.src.as_bytes().get(pos).copied()
    }

    // Link label contents end where their last child ends
    fn note_child(&mut self, end: usize) {
        for frame in &mut self.stack {
            if let Frame::Link { content_end, .. } = frame {
                *content_end = (*content_end).max(end);
            }
        }
    }

    fn event(&mut self, event: Event<'_>, range: Range<usize>) {
        match event {
            Event::Start(tag) => {
                self.note_child(range.end);
                self.start(tag, range);
            }
            Event::End(_) => self.end(),
            Event::Code(_) => {
                self.note_child(range.end);
                self.inline_code(range);
            }
            Event::Rule => {
                let range = trim_block(self.src, range);
                self.push(range, NodeKind::HorizontalRule);
            }
            Event::TaskListMarker(_) => {
                self.note_child(range.end);
                self.push(range, NodeKind::Task);
            }
            _ => self.note_child(range.end),
        }
    }

    fn start(&mut self, tag: Tag<'_>, range: Range<usize>) {
        let frame = match tag {
            Tag::Paragraph => {
                self.push(trim_block(self.src, range), NodeKind::Paragraph);
                Frame::Other
            }
            Tag::Heading { level, .. } => self.heading(heading_level(level), trim_block(self.src, range)),
            Tag::BlockQuote(_) => {
                let range = trim_block(self.src, range);
                self.push(range.clone(), NodeKind::Blockquote);
                self.quote_marks(range);
                Frame::Other
            }
            Tag::CodeBlock(CodeBlockKind::Fenced(_)) => self.fenced_code(trim_block(self.src, range)),
            Tag::CodeBlock(CodeBlockKind::Indented) => {
                self.push(trim_block(self.src, range), NodeKind::CodeBlock);
                Frame::Other
            }
            Tag::List(Some(_)) => {
                self.push(trim_block(self.src, range), NodeKind::OrderedList);
                Frame::Other
            }
            Tag::List(None) => {
                self.push(trim_block(self.src, range), NodeKind::BulletList);
                Frame::Other
            }
            Tag::Item => {
                let range = trim_block(self.src, range);
                self.push(range.clone(), NodeKind::ListItem);
                if let Some(mark) = list_marker(self.src, range.start) {
                    self.push(mark, NodeKind::ListMark);
                }
                Frame::Other
            }
            Tag::Emphasis => self.delimited(range, NodeKind::Emphasis, NodeKind::EmphasisMark, 1),
            Tag::Strong => self.delimited(range, NodeKind::StrongEmphasis, NodeKind::EmphasisMark, 2),
            Tag::Strikethrough => {
                let len = run_length(self.src, range.start, b'~').clamp(1, 2);
                self.delimited(range, NodeKind::Strikethrough, NodeKind::StrikethroughMark, len)
            }
            Tag::Link { link_type, dest_url, .. } => match link_type {
                LinkType::Autolink | LinkType::Email => {
                    self.push(range, NodeKind::Autolink);
                    Frame::Other
                }
                _ => {
                    self.push(range.clone(), NodeKind::Link);
                    if self.byte(range.start) == Some(b'[') {
                        self.push(range.start..range.start + 1, NodeKind::LinkMark);
                    }
                    Frame::Link {
                        content_end: range.start + 1,
                        range,
                        inline: link_type == LinkType::Inline,
                        dest: dest_url.to_string(),
                    }
                }
            },
            Tag::Image { link_type, dest_url, .. } => {
                self.push(range.clone(), NodeKind::Image);
                if self.src[range.clone()].starts_with("![") {
                    self.push(range.start..range.start + 2, NodeKind::LinkMark);
                }
                Frame::Link {
                    content_end: range.start + 2,
                    range,
                    inline: link_type == LinkType::Inline,
                    dest: dest_url.to_string(),
                }
            }
            Tag::Table(_) => {
                self.push(trim_block(self.src, range), NodeKind::Table);
                Frame::Other
            }
            Tag::HtmlBlock => {
                self.push(trim_block(self.src, range), NodeKind::HtmlBlock);
                Frame::Other
            }
            _ => Frame::Other,
        };

        self.stack.push(frame);
    }

    fn end(&mut self) {
        match self.stack.pop() {
            Some(Frame::AtxHeading { range, open_end }) => self.heading_close(range, open_end),
            Some(Frame::Delimited { range, len, mark }) => {
                if range.end >= range.start + 2 * len {
                    self.push(range.end - len..range.end, mark);
                }
            }
            Some(Frame::Link {
                range,
                content_end,
                inline,
                dest,
            }) => self.link_close(range, content_end, inline, &dest),
            Some(Frame::Fence {
                range,
                fence,
                len,
                column,
            }) => self.fence_close(range, fence, len, column),
            Some(Frame::Other) | None => {}
        }
    }

    fn heading(&mut self, level: u8, range: Range<usize>) -> Frame {
        let pos = skip_indent(self.src, range.start, range.end);
        let hashes = run_length(self.src, pos, b'#');
        if hashes == 0 {
            self.push(range.clone(), NodeKind::SetextHeading { level });
            self.setext_underline(range);
            return Frame::Other;
        }

        self.push(range.clone(), NodeKind::Heading { level });
        self.push(pos..pos + hashes, NodeKind::HeaderMark);
        Frame::AtxHeading {
            range,
            open_end: pos + hashes,
        }
    }

    // `===` or `---` on the heading's last line
    fn setext_underline(&mut self, range: Range<usize>) {
        let Some(nl) = self.src[range.clone()].rfind('\n') else {
            return;
        };
        let last_start = range.start + nl + 1;
        let column = range.start - line_start(self.src, range.start);
        let pos = content_start(self.src, last_start, column, range.end);
        let Some(c @ (b'=' | b'-')) = self.byte(pos) else {
            return;
        };
        let len = run_length(self.src, pos, c).min(range.end - pos);
        self.push(pos..pos + len, NodeKind::HeaderMark);
    }

    // Optional closing `#` sequence, which must be preceded by whitespace
    fn heading_close(&mut self, range: Range<usize>, open_end: usize) {
        let line = &self.src[range.clone()];
        let content = line.trim_end_matches([' ', '\t']);
        let end = range.start + content.len();
        let run = content.bytes().rev().take_while(|b| *b == b'#').count();
        if run == 0 {
            return;
        }
        let start = end - run;
        if start <= open_end {
            return;
        }
        if matches!(self.byte(start - 1), Some(b' ' | b'\t')) {
            self.push(start..end, NodeKind::HeaderMark);
        }
    }

    fn delimited(&mut self, range: Range<usize>, node: NodeKind, mark: NodeKind, len: usize) -> Frame {
        self.push(range.clone(), node);
        if range.end >= range.start + 2 * len {
            self.push(range.start..range.start + len, mark);
        }
        Frame::Delimited { range, len, mark }
    }

    fn inline_code(&mut self, range: Range<usize>) {
        let open = run_length(self.src, range.start, b'`');
        let close = self.src[range.clone()].bytes().rev().take_while(|b| *b == b'`').count();
        self.push(range.clone(), NodeKind::InlineCode);
        if open == 0 || range.end < range.start + open + close {
            return;
        }
        self.push(range.start..range.start + open, NodeKind::CodeMark);
        self.push(range.end - close..range.end, NodeKind::CodeMark);
    }

    fn fenced_code(&mut self, range: Range<usize>) -> Frame {
        self.push(range.clone(), NodeKind::FencedCode);

        let pos = skip_indent(self.src, range.start, range.end);
        let fence = match self.byte(pos) {
            Some(c @ (b'`' | b'~')) => c,
            _ => return Frame::Other,
        };
        let len = run_length(self.src, pos, fence);
        self.push(pos..pos + len, NodeKind::CodeMark);

        let first_line_end = line_end(self.src, pos).min(range.end);
        let info = &self.src[pos + len..first_line_end];
        let lead = info.len() - info.trim_start().len();
        let info_len = info.trim().len();
        if info_len > 0 {
            let start = pos + len + lead;
            self.push(start..start + info_len, NodeKind::CodeInfo);
        }

        Frame::Fence {
            range,
            fence,
            len,
            column: pos - line_start(self.src, pos),
        }
    }

    fn fence_close(&mut self, range: Range<usize>, fence: u8, len: usize, column: usize) {
        let first_line_end = line_end(self.src, range.start);
        let Some(nl) = self.src[range.clone()].rfind('\n') else {
            return;
        };
        let last_start = range.start + nl + 1;
        if last_start <= first_line_end {
            return;
        }
        let pos = content_start(self.src, last_start, column, range.end);
        let rest = self.src[pos..range.end].trim_end_matches([' ', '\t', '\r']);
        if rest.len() >= len && rest.bytes().all(|b| b == fence) {
            self.push(pos..pos + rest.len(), NodeKind::CodeMark);
        }
    }

    fn link_close(&mut self, range: Range<usize>, content_end: usize, inline: bool, dest: &str) {
        let search_from = content_end.min(range.end);
        let Some(close) = self.src[search_from..range.end].find(']').map(|i| search_from + i) else {
            return;
        };
        self.push(close..close + 1, NodeKind::LinkMark);

        if !inline {
            if self.byte(close + 1) == Some(b'[') && close + 1 < range.end {
                self.push(close + 1..range.end, NodeKind::LinkLabel);
            }
            return;
        }

        if self.byte(close + 1) != Some(b'(') {
            return;
        }
        self.push(close + 1..close + 2, NodeKind::LinkMark);

        let has_paren = range.end > close + 2 && self.byte(range.end - 1) == Some(b')');
        let inner_end = if has_paren { range.end - 1 } else { range.end };
        if let Some(url) = url_range(self.src, close + 2, inner_end, dest) {
            self.push(url, NodeKind::Url);
        }
        if has_paren {
            self.push(range.end - 1..range.end, NodeKind::LinkMark);
        }
    }

    // Each quote scans its lines from its own column, so a quote nested
    // inside a list still gets its `>` marked
    fn quote_marks(&mut self, range: Range<usize>) {
        let mut line = line_start(self.src, range.start);
        let column = range.start - line;

        while line < range.end {
            let end = line_end(self.src, line).min(range.end);
            let from = (line + column).max(range.start);
            if let Some(text) = self.src.get(from..end) {
                for marker in quote_prefix(text, 3) {
                    let at = from + marker;
                    if self.quote_marked.insert(at) {
                        self.push(at..at + 1, NodeKind::QuoteMark);
                    }
                }
            }
            line = end + 1;
        }
    }
}

fn heading_level(level: HeadingLevel) -> u8 {
    match level {
        HeadingLevel::H1 => 1,
        HeadingLevel::H2 => 2,
        HeadingLevel::H3 => 3,
        HeadingLevel::H4 => 4,
        HeadingLevel::H5 => 5,
        HeadingLevel::H6 => 6,
    }
}

// Block ranges from the parser include the trailing line break
fn trim_block(src: &str, range: Range<usize>) -> Range<usize> {
    let trimmed = src[range.clone()].trim_end_matches(['\n', '\r']);
    range.start..range.start + trimmed.len()
}

fn run_length(src: &str, pos: usize, byte: u8) -> usize {
    src.as_bytes()
        .get(pos..)
        .map(|rest| rest.iter().take_while(|b| **b == byte).count())
        .unwrap_or(0)
}

// Skips up to three spaces of block indentation
fn skip_indent(src: &str, pos: usize, end: usize) -> usize {
    let spaces = src.as_bytes()[pos..end]
        .iter()
        .take(3)
        .take_while(|b| **b == b' ')
        .count();
    pos + spaces
}

// Start of a line's content inside containers: skips `>` markers and
// whitespace up to `column`, then up to three spaces of indentation
fn content_start(src: &str, line: usize, column: usize, end: usize) -> usize {
    let bytes = src.as_bytes();
    let mut pos = line;
    while pos < end && pos < line + column && matches!(bytes[pos], b' ' | b'\t' | b'>') {
        pos += 1;
    }
    skip_indent(src, pos, end)
}

fn line_start(src: &str, pos: usize) -> usize {
    src[..pos].rfind('\n').map(|i| i + 1).unwrap_or(0)
}

fn line_end(src: &str, pos: usize) -> usize {
    src[pos..].find('\n').map(|i| pos + i).unwrap_or(src.len())
}

/// Marker of the list item starting at `pos`: the bullet char, or the digits
/// plus `.`/`)` of an ordered item.
fn list_marker(src: &str, pos: usize) -> Option<Range<usize>> {
    let bytes = src.as_bytes();
    let start = pos + bytes.get(pos..)?.iter().take_while(|b| matches!(b, b' ' | b'\t')).count();
    match bytes.get(start)? {
        b'-' | b'*' | b'+' => Some(start..start + 1),
        b'0'..=b'9' => {
            let digits = bytes[start..].iter().take_while(|b| b.is_ascii_digit()).count();
            match bytes.get(start + digits)? {
                b'.' | b')' => Some(start..start + digits + 1),
                _ => None,
            }
        }
        _ => None,
    }
}

/// Byte offsets of each `>` in a blockquote line prefix such as `> > text`.
fn quote_prefix(line: &str, first_indent: usize) -> Vec<usize> {
    let bytes = line.as_bytes();
    let mut markers = Vec::new();
    let mut i = 0;
    let mut limit = first_indent;
    loop {
        let spaces = bytes[i..].iter().take(limit).take_while(|b| **b == b' ' || **b == b'\t').count();
        i += spaces;
        if bytes.get(i) != Some(&b'>') {
            return markers;
        }
        markers.push(i);
        i += 1;
        if matches!(bytes.get(i), Some(b' ' | b'\t')) {
            i += 1;
        }
        limit = 3;
    }
}

/// Destination range inside the parentheses of an inline link.
fn url_range(src: &str, start: usize, end: usize, dest: &str) -> Option<Range<usize>> {
    if start >= end {
        return None;
    }
    let inner = &src[start..end];
    if !dest.is_empty() {
        if let Some(i) = inner.find(dest) {
            return Some(start + i..start + i + dest.len());
        }
    }
    // Escaped or entity-encoded destinations differ from the source text
    let lead = inner.len() - inner.trim_start().len();
    let token = inner.trim_start().split([' ', '\t', '\n']).next().unwrap_or("");
    let token = token.strip_prefix('<').and_then(|t| t.strip_suffix('>')).map_or(token, |t| t);
    if token.is_empty() {
        return None;
    }
    let offset = inner[lead..].find(token).map(|i| lead + i)?;
    Some(start + offset..start + offset + token.len())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn nodes(text: &str) -> Vec<(usize, usize, NodeKind)> {
        parse(&Document::new(text))
            .iter()
            .map(|n| (n.from, n.to, n.kind))
            .collect()
    }

    fn ranges_of(text: &str, kind: NodeKind) -> Vec<(usize, usize)> {
        parse(&Document::new(text))
            .of_kind(kind)
            .map(|n| (n.from, n.to))
            .collect()
    }

    #[test]
    fn test_atx_heading() {
        let tree = nodes("## Title\n");
        assert!(tree.contains(&(0, 8, NodeKind::Heading { level: 2 })));
        assert!(tree.contains(&(0, 2, NodeKind::HeaderMark)));
        assert_eq!(ranges_of("## Title\n", NodeKind::HeaderMark), vec![(0, 2)]);
    }

    #[test]
    fn test_heading_closing_sequence() {
        assert_eq!(ranges_of("# Title ##", NodeKind::HeaderMark), vec![(0, 1), (8, 10)]);
        // `C#` is content, not a closing sequence
        assert_eq!(ranges_of("# C#", NodeKind::HeaderMark), vec![(0, 1)]);
    }

    #[test]
    fn test_setext_underline_is_header_mark() {
        let tree = nodes("Title\n=====\n");
        assert!(tree.iter().any(|n| n.2 == NodeKind::SetextHeading { level: 1 }));
        assert_eq!(ranges_of("Title\n=====\n", NodeKind::HeaderMark), vec![(6, 11)]);
        assert_eq!(ranges_of("Title\n---", NodeKind::HeaderMark), vec![(6, 9)]);
    }

    #[test]
    fn test_strong_and_emphasis_marks() {
        assert_eq!(ranges_of("**bold**", NodeKind::StrongEmphasis), vec![(0, 8)]);
        assert_eq!(ranges_of("**bold**", NodeKind::EmphasisMark), vec![(0, 2), (6, 8)]);
        assert_eq!(ranges_of("a *it* b", NodeKind::Emphasis), vec![(2, 6)]);
        assert_eq!(ranges_of("a *it* b", NodeKind::EmphasisMark), vec![(2, 3), (5, 6)]);
    }

    #[test]
    fn test_strikethrough_marks() {
        assert_eq!(ranges_of("~~gone~~", NodeKind::StrikethroughMark), vec![(0, 2), (6, 8)]);
    }

    #[test]
    fn test_list_marks() {
        assert_eq!(ranges_of("- item", NodeKind::ListMark), vec![(0, 1)]);
        assert_eq!(ranges_of("1. item", NodeKind::ListMark), vec![(0, 2)]);
        assert_eq!(ranges_of("- a\n- b\n", NodeKind::ListMark), vec![(0, 1), (4, 5)]);
        assert_eq!(ranges_of("- a", NodeKind::BulletList).len(), 1);
        assert_eq!(ranges_of("3) a", NodeKind::OrderedList).len(), 1);
    }

    #[test]
    fn test_task_marker() {
        assert_eq!(ranges_of("- [x] done", NodeKind::Task).len(), 1);
    }

    #[test]
    fn test_quote_marks_on_every_line() {
        let text = "> one\n> two\n";
        assert_eq!(ranges_of(text, NodeKind::Blockquote), vec![(0, 11)]);
        assert_eq!(ranges_of(text, NodeKind::QuoteMark), vec![(0, 1), (6, 7)]);
    }

    #[test]
    fn test_nested_quote_marks() {
        let text = "> > deep";
        assert_eq!(ranges_of(text, NodeKind::Blockquote).len(), 2);
        assert_eq!(ranges_of(text, NodeKind::QuoteMark), vec![(0, 1), (2, 3)]);
    }

    #[test]
    fn test_quote_inside_list_inside_quote() {
        let text = "> - > inner";
        assert_eq!(ranges_of(text, NodeKind::Blockquote), vec![(0, 11), (4, 11)]);
        assert_eq!(ranges_of(text, NodeKind::QuoteMark), vec![(0, 1), (4, 5)]);
    }

    #[test]
    fn test_inline_code_marks() {
        let text = "use `code` here";
        assert_eq!(ranges_of(text, NodeKind::InlineCode), vec![(4, 10)]);
        assert_eq!(ranges_of(text, NodeKind::CodeMark), vec![(4, 5), (9, 10)]);
    }

    #[test]
    fn test_fenced_code() {
        let text = "```rust\nfn main() {}\n```\n";
        assert_eq!(ranges_of(text, NodeKind::FencedCode), vec![(0, 24)]);
        assert_eq!(ranges_of(text, NodeKind::CodeMark), vec![(0, 3), (21, 24)]);
        assert_eq!(ranges_of(text, NodeKind::CodeInfo), vec![(3, 7)]);
    }

    #[test]
    fn test_closing_fence_inside_blockquote() {
        let text = "> ```\n> code\n> ```";
        assert_eq!(ranges_of(text, NodeKind::CodeMark), vec![(2, 5), (15, 18)]);
    }

    #[test]
    fn test_closing_fence_inside_list_item() {
        let text = "10. ```\n    a\n    ```";
        assert_eq!(ranges_of(text, NodeKind::CodeMark), vec![(4, 7), (18, 21)]);
    }

    #[test]
    fn test_unclosed_fence_has_single_mark() {
        let text = "~~~\ncode";
        assert_eq!(ranges_of(text, NodeKind::CodeMark), vec![(0, 3)]);
    }

    #[test]
    fn test_horizontal_rule() {
        assert_eq!(ranges_of("para\n\n---\n", NodeKind::HorizontalRule), vec![(6, 9)]);
    }

    #[test]
    fn test_inline_link_parts() {
        let text = "[text](http://a.b)";
        assert_eq!(ranges_of(text, NodeKind::Link), vec![(0, 18)]);
        assert_eq!(
            ranges_of(text, NodeKind::LinkMark),
            vec![(0, 1), (5, 6), (6, 7), (17, 18)]
        );
        assert_eq!(ranges_of(text, NodeKind::Url), vec![(7, 17)]);
    }

    #[test]
    fn test_link_with_brackets_in_label() {
        let text = "[a `]` b](u)";
        let marks = ranges_of(text, NodeKind::LinkMark);
        assert_eq!(marks[0], (0, 1));
        assert_eq!(marks[1], (8, 9));
    }

    #[test]
    fn test_reference_link_label() {
        let text = "[text][ref]\n\n[ref]: http://a.b\n";
        assert_eq!(ranges_of(text, NodeKind::Link), vec![(0, 11)]);
        assert_eq!(ranges_of(text, NodeKind::LinkLabel), vec![(6, 11)]);
        assert!(ranges_of(text, NodeKind::Url).is_empty());
    }

    #[test]
    fn test_autolink_has_no_marks() {
        let text = "<http://a.b>";
        assert_eq!(ranges_of(text, NodeKind::Autolink), vec![(0, 12)]);
        assert!(ranges_of(text, NodeKind::LinkMark).is_empty());
    }

    #[test]
    fn test_image_parts() {
        let text = "![alt](x.png)";
        assert_eq!(ranges_of(text, NodeKind::Image), vec![(0, 13)]);
        assert_eq!(ranges_of(text, NodeKind::Url), vec![(7, 12)]);
        assert_eq!(ranges_of(text, NodeKind::LinkMark)[0], (0, 2));
    }

    #[test]
    fn test_offsets_are_chars() {
        let text = "é **b**";
        assert_eq!(ranges_of(text, NodeKind::StrongEmphasis), vec![(2, 7)]);
    }

    #[test]
    fn test_document_order() {
        let tree = parse(&Document::new("# A\n\n- *b*\n> c\n"));
        let froms: Vec<usize> = tree.iter().map(|n| n.from).collect();
        let mut sorted = froms.clone();
        sorted.sort();
        assert_eq!(froms, sorted);

        // Parent precedes its first child
        let kinds: Vec<NodeKind> = tree.iter().map(|n| n.kind).collect();
        let heading = kinds.iter().position(|k| *k == NodeKind::Heading { level: 1 }).unwrap();
        assert_eq!(kinds[heading + 1], NodeKind::HeaderMark);
    }

    #[test]
    fn test_quote_prefix() {
        assert_eq!(quote_prefix("> > x", 3), vec![0, 2]);
        assert_eq!(quote_prefix("   > x", 3), vec![3]);
        assert_eq!(quote_prefix("    > x", 3), Vec::<usize>::new());
        assert_eq!(quote_prefix("x > y", 3), Vec::<usize>::new());
    }

    #[test]
    fn test_list_marker_scan() {
        assert_eq!(list_marker("  * a", 0), Some(2..3));
        assert_eq!(list_marker("12) a", 0), Some(0..3));
        assert_eq!(list_marker("12 a", 0), None);
    }
}
