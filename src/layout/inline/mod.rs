//! Inline line box construction
//!
//! This module builds the laid-out content of a single line: the caller's
//! line-breaking loop appends pre-measured content items to a [`line::Line`],
//! and once the line's content set is final, invokes collapsing/trimming and
//! (for justified text) expansion distribution, then reads back the
//! positioned run list.
//!
//! # CSS Specification
//!
//! CSS Text Module Level 3, White Space Processing:
//! <https://www.w3.org/TR/css-text-3/#white-space-processing>
//!
//! # Processing model
//!
//! ```text
//! For each accepted content item:
//!   Line::append(item, measured_width)
//!     - collapsible whitespace may vanish entirely or merge into the
//!       previous run as a single representative space
//!     - adjacent text from the same box merges into one run
//! When the line's content is final:
//!   Line::remove_collapsible_content(extra_space)   // trim, then pre-wrap squeeze
//!   Line::apply_run_expansion(extra_space, counter) // text-align: justify only
//!   Line::add_trailing_hyphen(width)                // hyphenated break only
//! ```

pub mod item;
pub mod justify;
pub mod line;

pub use item::{AtomicBoxItem, BoxId, InlineItem, SoftLineBreakItem, SourceBox, TextItem};
pub use justify::{DefaultExpansionCounter, Expansion, ExpansionBehavior, ExpansionOpportunities};
pub use line::{Line, LineOptions, Run, RunKind, RunText, TrailingWhitespace};
