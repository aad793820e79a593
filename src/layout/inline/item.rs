//! Inline content items
//!
//! The input surface of line construction. Each item is one contiguous,
//! stylistically-uniform piece of inline-level content, produced and
//! pre-measured by the caller's line-breaking machinery before being appended
//! to a line.
//!
//! Text items follow the usual inline-item segmentation contract: an item is
//! either entirely collapsible/preservable whitespace or contains no
//! whitespace at all. The whitespace determination is made once, here, and
//! the line accumulator trusts it.

use std::sync::Arc;

use crate::style::types::InlineStyle;

/// Identity of an inline-level layout box
///
/// Runs remember which box their content came from so that adjacent text
/// items can merge only when they share a box. The id is opaque to this
/// crate; the caller typically uses its box-tree node index.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct BoxId(pub usize);

/// A non-owning handle to a content item's originating layout box
///
/// Carries the box identity plus a shared snapshot of the style values line
/// construction needs. The layout tree owns the box; runs only hold this
/// handle, never the box itself.
#[derive(Debug, Clone)]
pub struct SourceBox {
    pub id: BoxId,
    pub style: Arc<InlineStyle>,
}

impl SourceBox {
    pub fn new(id: BoxId, style: Arc<InlineStyle>) -> Self {
        Self { id, style }
    }

    pub fn style(&self) -> &InlineStyle {
        &self.style
    }
}

/// A pre-measured text fragment
///
/// `start`/`length` are a byte range into `content`, the originating box's
/// full text. Collapsible whitespace is ASCII, so byte counts double as
/// character counts wherever collapsed-whitespace bookkeeping needs them.
#[derive(Debug, Clone)]
pub struct TextItem {
    pub source: SourceBox,
    pub content: Arc<str>,
    pub start: usize,
    pub length: usize,

    /// Whether the item consists entirely of collapsible-class whitespace
    pub is_whitespace: bool,

    /// Whether the item is a word separator (a space subject to word-spacing)
    pub is_word_separator: bool,

    /// Whether the item ends in a soft hyphen (U+00AD)
    pub has_trailing_soft_hyphen: bool,
}

impl TextItem {
    /// Creates a text item, deriving the whitespace flags from the content.
    ///
    /// Callers with a shaper-backed segmenter can override the derived flags
    /// with the `with_*` builders.
    pub fn new(source: SourceBox, content: Arc<str>, start: usize, length: usize) -> Self {
        let slice = &content[start..start + length];
        let is_whitespace = !slice.is_empty() && slice.chars().all(is_inline_whitespace);
        let is_word_separator = is_whitespace && slice.starts_with(' ');
        let has_trailing_soft_hyphen = slice.ends_with('\u{ad}');
        Self {
            source,
            content,
            start,
            length,
            is_whitespace,
            is_word_separator,
            has_trailing_soft_hyphen,
        }
    }

    #[must_use]
    pub fn with_word_separator(mut self, is_word_separator: bool) -> Self {
        self.is_word_separator = is_word_separator;
        self
    }

    #[must_use]
    pub fn with_trailing_soft_hyphen(mut self, has_trailing_soft_hyphen: bool) -> Self {
        self.has_trailing_soft_hyphen = has_trailing_soft_hyphen;
        self
    }

    /// The item's text.
    pub fn text(&self) -> &str {
        &self.content[self.start..self.start + self.length]
    }

    pub fn is_empty_content(&self) -> bool {
        self.length == 0
    }

    pub fn style(&self) -> &InlineStyle {
        self.source.style()
    }
}

/// A preserved newline character
///
/// Soft line breaks keep a one-character text position so the resulting run
/// can flow through the same trimming and measurement paths as text.
#[derive(Debug, Clone)]
pub struct SoftLineBreakItem {
    pub source: SourceBox,
    pub content: Arc<str>,
    /// Byte position of the newline in `content`
    pub position: usize,
}

impl SoftLineBreakItem {
    pub fn new(source: SourceBox, content: Arc<str>, position: usize) -> Self {
        Self { source, content, position }
    }
}

/// An atomic inline-level box (replaced or non-replaced)
///
/// Appended with its pre-measured margin-box width; `margin_start` is the
/// resolved start margin, needed because a negative start margin changes how
/// the box is placed on the line.
#[derive(Debug, Clone)]
pub struct AtomicBoxItem {
    pub source: SourceBox,
    pub margin_start: f32,
    pub is_replaced: bool,
}

impl AtomicBoxItem {
    pub fn new(source: SourceBox, margin_start: f32) -> Self {
        Self { source, margin_start, is_replaced: false }
    }

    pub fn replaced(source: SourceBox, margin_start: f32) -> Self {
        Self { source, margin_start, is_replaced: true }
    }
}

/// An inline-level content item
///
/// One of the seven content kinds a line accepts. Inline box start/end mark
/// the boundaries of a `<span>`-like box (their measured width is the box's
/// start/end border and padding); word-break opportunities and line breaks
/// are zero-width.
#[derive(Debug, Clone)]
pub enum InlineItem {
    Text(TextItem),
    HardLineBreak(SourceBox),
    SoftLineBreak(SoftLineBreakItem),
    WordBreakOpportunity(SourceBox),
    InlineBoxStart(SourceBox),
    InlineBoxEnd(SourceBox),
    Box(AtomicBoxItem),
}

impl InlineItem {
    /// The item's originating box.
    pub fn source(&self) -> &SourceBox {
        match self {
            InlineItem::Text(item) => &item.source,
            InlineItem::HardLineBreak(source) => source,
            InlineItem::SoftLineBreak(item) => &item.source,
            InlineItem::WordBreakOpportunity(source) => source,
            InlineItem::InlineBoxStart(source) => source,
            InlineItem::InlineBoxEnd(source) => source,
            InlineItem::Box(item) => &item.source,
        }
    }

    pub fn style(&self) -> &InlineStyle {
        self.source().style()
    }
}

/// Whether a character belongs to the collapsible whitespace class.
///
/// Per CSS Text, document white space is space, tab, and segment breaks.
pub fn is_inline_whitespace(ch: char) -> bool {
    matches!(ch, ' ' | '\t' | '\n')
}
