use serde::{Deserialize, Serialize};

/// One selection range. The anchor is where the selection started, the head
/// is where the cursor is now; they may be in any order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SelectionRange {
    pub anchor: usize,
    pub head: usize,
}

impl SelectionRange {
    pub fn new(anchor: usize, head: usize) -> Self {
        Self { anchor, head }
    }

    pub fn cursor(offset: usize) -> Self {
        Self::new(offset, offset)
    }

    pub fn from(&self) -> usize {
        self.anchor.min(self.head)
    }

    pub fn to(&self) -> usize {
        self.anchor.max(self.head)
    }

    pub fn is_empty(&self) -> bool {
        self.anchor == self.head
    }
}

/// Editor selection: one or more ranges, one of them the main range.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EditorSelection {
    pub ranges: Vec<SelectionRange>,
    #[serde(default)]
    pub main: usize,
}

impl Default for EditorSelection {
    fn default() -> Self {
        Self::cursor(0)
    }
}

impl EditorSelection {
    pub fn cursor(offset: usize) -> Self {
        Self::single(SelectionRange::cursor(offset))
    }

    pub fn single(range: SelectionRange) -> Self {
        Self {
            ranges: vec![range],
            main: 0,
        }
    }

    pub fn new(ranges: Vec<SelectionRange>) -> Self {
        Self { ranges, main: 0 }
    }

    pub fn main_range(&self) -> Option<&SelectionRange> {
        self.ranges.get(self.main).or_else(|| self.ranges.first())
    }

    pub fn heads(&self) -> impl Iterator<Item = usize> + '_ {
        self.ranges.iter().map(|r| r.head)
    }
}
