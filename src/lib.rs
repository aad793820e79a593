//! Line box construction primitives for CSS inline layout
//!
//! This crate implements the content side of a single line box: given an
//! ordered stream of pre-measured inline-level content items (text fragments,
//! inline box boundaries, atomic boxes, line breaks, word-break
//! opportunities), it produces the ordered, positioned runs that will be
//! painted on that line, applying the CSS Text whitespace collapsing,
//! trimming, and justification rules.
//!
//! # CSS Reference
//!
//! - [CSS Text Module Level 3 - White Space Processing](https://www.w3.org/TR/css-text-3/#white-space-processing)
//! - [CSS Text Module Level 3 - Alignment and Justification](https://www.w3.org/TR/css-text-3/#justification)
//!
//! # Scope
//!
//! Line breaking, text measurement, font shaping, and bidi reordering live
//! outside this crate. The caller decides how much content fits, measures it,
//! and feeds it to a [`Line`] via the per-kind append operations; once the
//! line's content set is final it invokes the trimming and justification
//! passes and reads back the run list.
//!
//! # Example
//!
//! ```
//! use std::sync::Arc;
//! use linebox::{BoxId, InlineItem, Line, LineOptions, SourceBox, TextItem};
//!
//! let source = SourceBox::new(BoxId(0), Arc::new(Default::default()));
//! let content: Arc<str> = Arc::from("hello ");
//!
//! let mut line = Line::new(LineOptions::default());
//! line.append(&InlineItem::Text(TextItem::new(source.clone(), content.clone(), 0, 5)), 50.0);
//! line.append(&InlineItem::Text(TextItem::new(source, content, 5, 1)), 5.0);
//! line.remove_collapsible_content(0.0);
//!
//! // The trailing collapsible space is trimmed away.
//! assert_eq!(line.content_logical_width(), 50.0);
//! ```

pub mod layout;
pub mod style;

pub use layout::inline::item::{AtomicBoxItem, BoxId, InlineItem, SoftLineBreakItem, SourceBox, TextItem};
pub use layout::inline::justify::{
    DefaultExpansionCounter, Expansion, ExpansionBehavior, ExpansionOpportunities,
};
pub use layout::inline::line::{Line, LineOptions, Run, RunKind, RunText, TrailingWhitespace};
pub use style::types::{Direction, InlineStyle, TextAlign, TextCombineUpright, WhiteSpace};
