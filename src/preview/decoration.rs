use serde::ser::SerializeStruct;
use serde::{Serialize, Serializer};

/// Line-level class, anchored at a line start.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LineClass {
    Heading(u8),
    Blockquote,
    CodeBlock,
}

impl LineClass {
    pub fn css_class(&self) -> String {
        match self {
            LineClass::Heading(level) => format!("cm-header-line-{}", level),
            LineClass::Blockquote => "cm-blockquote".to_string(),
            LineClass::CodeBlock => "cm-code-block-line".to_string(),
        }
    }
}

/// Inline style over a range.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MarkStyle {
    Bold,
    Italic,
    InlineCode,
    Link,
    OrderedListMarker,
}

impl MarkStyle {
    pub fn css_class(&self) -> &'static str {
        match self {
            MarkStyle::Bold => "cm-bold",
            MarkStyle::Italic => "cm-italic",
            MarkStyle::InlineCode => "cm-inline-code",
            MarkStyle::Link => "cm-link",
            MarkStyle::OrderedListMarker => "cm-list-mark",
        }
    }
}

/// Replacement element. Equal widgets render identically, which lets the
/// frontend skip redrawing them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum Widget {
    Bullet,
    Divider,
    Image { src: String, alt: String },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DecorationKind {
    Line(LineClass),
    Mark(MarkStyle),
    Replace(Widget),
    Hide,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Decoration {
    pub from: usize,
    pub to: usize,
    pub kind: DecorationKind,
}

impl Decoration {
    pub fn line(at: usize, class: LineClass) -> Self {
        Self {
            from: at,
            to: at,
            kind: DecorationKind::Line(class),
        }
    }

    pub fn mark(from: usize, to: usize, style: MarkStyle) -> Self {
        Self {
            from,
            to,
            kind: DecorationKind::Mark(style),
        }
    }

    pub fn replace(from: usize, to: usize, widget: Widget) -> Self {
        Self {
            from,
            to,
            kind: DecorationKind::Replace(widget),
        }
    }

    pub fn hide(from: usize, to: usize) -> Self {
        Self {
            from,
            to,
            kind: DecorationKind::Hide,
        }
    }

    pub fn widget(&self) -> Option<&Widget> {
        match &self.kind {
            DecorationKind::Replace(widget) => Some(widget),
            _ => None,
        }
    }
}

// Flat shape for the frontend: { from, to, kind, class?, widget? }
impl Serialize for Decoration {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut s = serializer.serialize_struct("Decoration", 4)?;
        s.serialize_field("from", &self.from)?;
        s.serialize_field("to", &self.to)?;
        match &self.kind {
            DecorationKind::Line(class) => {
                s.serialize_field("kind", "line")?;
                s.serialize_field("class", &class.css_class())?;
            }
            DecorationKind::Mark(style) => {
                s.serialize_field("kind", "mark")?;
                s.serialize_field("class", style.css_class())?;
            }
            DecorationKind::Replace(widget) => {
                s.serialize_field("kind", "replace")?;
                s.serialize_field("widget", widget)?;
            }
            DecorationKind::Hide => {
                s.serialize_field("kind", "hide")?;
            }
        }
        s.end()
    }
}

/// Decorations in submission order: `from` ascending, then `to` ascending.
///
/// Entries sharing both offsets keep the order they were requested in; no
/// further precedence is applied and duplicates are kept.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct DecorationSet {
    decorations: Vec<Decoration>,
}

impl DecorationSet {
    pub fn from_requests(mut decorations: Vec<Decoration>) -> Self {
        decorations.sort_by_key(|d| (d.from, d.to));
        Self { decorations }
    }

    pub fn iter(&self) -> impl Iterator<Item = &Decoration> {
        self.decorations.iter()
    }

    pub fn len(&self) -> usize {
        self.decorations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.decorations.is_empty()
    }

    pub fn as_slice(&self) -> &[Decoration] {
        &self.decorations
    }
}
