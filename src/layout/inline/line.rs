//! The line accumulator
//!
//! A [`Line`] collects the runs of one line box. The caller's line-breaking
//! loop appends accepted content items in order; the accumulator decides how
//! they collapse, merge, and place, tracks the rightmost content edge, and
//! remembers the one trailing trim candidate so trailing whitespace and
//! letter-spacing can be undone later without rescanning.
//!
//! # CSS Specification
//!
//! CSS Text Module Level 3, White Space Processing rules:
//! <https://www.w3.org/TR/css-text-3/#white-space-rules>
//!
//! # Invariants
//!
//! - `content_logical_width` tracks the rightmost content edge and never
//!   shrinks below it on account of negative margins or spacing.
//! - A text run ending in collapsible whitespace that has not been trimmed
//!   yet still counts that whitespace as one character of length: the single
//!   collapsed space that renders until the trim pass removes it.
//! - At most one trailing trim candidate exists at a time; appending any
//!   non-trimmable content clears it.

use std::sync::Arc;

use log::{trace, warn};

use super::item::{AtomicBoxItem, InlineItem, SoftLineBreakItem, SourceBox, TextItem};
use super::justify::{Expansion, ExpansionBehavior, ExpansionOpportunities};
use crate::style::types::{InlineStyle, TextAlign, TextCombineUpright, WhiteSpace};

/// What kind of content a run carries
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunKind {
    Text,
    SoftLineBreak,
    HardLineBreak,
    WordBreakOpportunity,
    InlineBoxStart,
    InlineBoxEnd,
    AtomicBox,
}

/// Classification of a text run's final whitespace
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TrailingWhitespace {
    /// The run does not end in whitespace
    None,
    /// Ends in whitespace the style preserves (`pre`, `pre-wrap`,
    /// `break-spaces`); kept in the content but still visually squeezable
    /// by the pre-wrap overflow pass
    Preserved,
    /// Ends in a single collapsible space
    Collapsible,
    /// Ends in whitespace already collapsed down to one representative space
    Collapsed,
}

impl TrailingWhitespace {
    fn of(item: &TextItem) -> Self {
        if !item.is_whitespace {
            return TrailingWhitespace::None;
        }
        if item.style().preserves_spaces_and_tabs() {
            return TrailingWhitespace::Preserved;
        }
        if item.length == 1 {
            return TrailingWhitespace::Collapsible;
        }
        TrailingWhitespace::Collapsed
    }
}

/// Text carried by a text or soft-line-break run
///
/// A byte range into the source box's text. Collapsible whitespace is ASCII,
/// so a run whose trailing whitespace collapsed counts exactly one byte for
/// the representative space.
#[derive(Debug, Clone)]
pub struct RunText {
    content: Arc<str>,
    start: usize,
    length: usize,
}

impl RunText {
    pub fn start(&self) -> usize {
        self.start
    }

    pub fn length(&self) -> usize {
        self.length
    }

    pub fn as_str(&self) -> &str {
        &self.content[self.start..self.start + self.length]
    }
}

/// One contiguous, stylistically-uniform piece of content placed on the line
///
/// Runs are created by the append operations, may be expanded in place when
/// an adjacent text item from the same box merges in, and are mutated by the
/// trimming and justification passes. Geometry is line-local: `logical_left`
/// is measured from the line's content start.
#[derive(Debug, Clone)]
pub struct Run {
    kind: RunKind,
    source: SourceBox,
    logical_left: f32,
    logical_width: f32,
    text: Option<RunText>,
    trailing_whitespace: TrailingWhitespace,
    trailing_whitespace_width: f32,
    hyphen_width: Option<f32>,
    expansion: Expansion,
}

impl Run {
    fn new(kind: RunKind, source: SourceBox, logical_left: f32, logical_width: f32) -> Self {
        debug_assert!(kind != RunKind::Text && kind != RunKind::SoftLineBreak);
        Self {
            kind,
            source,
            logical_left,
            logical_width,
            text: None,
            trailing_whitespace: TrailingWhitespace::None,
            trailing_whitespace_width: 0.0,
            hyphen_width: None,
            expansion: Expansion::default(),
        }
    }

    fn from_text_item(item: &TextItem, logical_left: f32, logical_width: f32) -> Self {
        let trailing_whitespace = TrailingWhitespace::of(item);
        Self {
            kind: RunKind::Text,
            source: item.source.clone(),
            logical_left,
            logical_width,
            text: Some(RunText {
                content: item.content.clone(),
                start: item.start,
                length: if trailing_whitespace == TrailingWhitespace::Collapsed {
                    1
                } else {
                    item.length
                },
            }),
            trailing_whitespace,
            trailing_whitespace_width: if trailing_whitespace != TrailingWhitespace::None {
                logical_width
            } else {
                0.0
            },
            hyphen_width: None,
            expansion: Expansion::default(),
        }
    }

    fn from_soft_line_break(item: &SoftLineBreakItem, logical_left: f32) -> Self {
        // Preserved newlines render with zero advance but keep a
        // one-character text position for downstream text handling.
        Self {
            kind: RunKind::SoftLineBreak,
            source: item.source.clone(),
            logical_left,
            logical_width: 0.0,
            text: Some(RunText {
                content: item.content.clone(),
                start: item.position,
                length: 1,
            }),
            trailing_whitespace: TrailingWhitespace::None,
            trailing_whitespace_width: 0.0,
            hyphen_width: None,
            expansion: Expansion::default(),
        }
    }

    pub fn kind(&self) -> RunKind {
        self.kind
    }

    pub fn source(&self) -> &SourceBox {
        &self.source
    }

    pub fn style(&self) -> &InlineStyle {
        self.source.style()
    }

    pub fn logical_left(&self) -> f32 {
        self.logical_left
    }

    pub fn logical_width(&self) -> f32 {
        self.logical_width
    }

    pub fn logical_right(&self) -> f32 {
        self.logical_left + self.logical_width
    }

    pub fn text(&self) -> Option<&RunText> {
        self.text.as_ref()
    }

    /// Hyphen advance attached by [`Line::add_trailing_hyphen`], if any.
    pub fn hyphen_width(&self) -> Option<f32> {
        self.hyphen_width
    }

    /// Expansion assigned by [`Line::apply_run_expansion`].
    pub fn expansion(&self) -> Expansion {
        self.expansion
    }

    pub fn is_text(&self) -> bool {
        self.kind == RunKind::Text
    }

    pub fn is_box(&self) -> bool {
        self.kind == RunKind::AtomicBox
    }

    pub fn is_line_break(&self) -> bool {
        matches!(self.kind, RunKind::HardLineBreak | RunKind::SoftLineBreak)
    }

    pub fn is_word_break_opportunity(&self) -> bool {
        self.kind == RunKind::WordBreakOpportunity
    }

    pub fn is_inline_box_start(&self) -> bool {
        self.kind == RunKind::InlineBoxStart
    }

    pub fn is_inline_box_end(&self) -> bool {
        self.kind == RunKind::InlineBoxEnd
    }

    pub fn trailing_whitespace(&self) -> TrailingWhitespace {
        self.trailing_whitespace
    }

    pub fn trailing_whitespace_width(&self) -> f32 {
        self.trailing_whitespace_width
    }

    pub fn has_trailing_whitespace(&self) -> bool {
        self.trailing_whitespace != TrailingWhitespace::None
    }

    pub fn has_collapsible_trailing_whitespace(&self) -> bool {
        matches!(
            self.trailing_whitespace,
            TrailingWhitespace::Collapsible | TrailingWhitespace::Collapsed
        )
    }

    pub fn has_collapsed_trailing_whitespace(&self) -> bool {
        self.trailing_whitespace == TrailingWhitespace::Collapsed
    }

    /// A run has trimmable trailing letter-spacing only when it does not end
    /// in whitespace and its style's letter-spacing is positive.
    pub fn has_trailing_letter_spacing(&self) -> bool {
        !self.has_trailing_whitespace() && self.style().letter_spacing > 0.0
    }

    pub fn trailing_letter_spacing(&self) -> f32 {
        if !self.has_trailing_letter_spacing() {
            return 0.0;
        }
        self.style().letter_spacing
    }

    /// Shifts the run horizontally.
    pub fn move_horizontally(&mut self, delta: f32) {
        self.logical_left += delta;
    }

    /// Shrinks the run's width, clamped at zero.
    pub fn shrink_horizontally(&mut self, delta: f32) {
        self.logical_width = (self.logical_width - delta).max(0.0);
    }

    fn grow_horizontally(&mut self, delta: f32) {
        self.logical_width += delta;
    }

    /// Merges an adjacent text item from the same source box into this run.
    fn expand(&mut self, item: &TextItem, logical_width: f32) {
        debug_assert!(!self.has_collapsed_trailing_whitespace());
        debug_assert!(self.is_text());
        debug_assert!(self.source.id == item.source.id);

        self.logical_width += logical_width;
        self.trailing_whitespace = TrailingWhitespace::of(item);
        let text = self.text.as_mut().expect("text runs always carry text");

        if self.trailing_whitespace == TrailingWhitespace::None {
            self.trailing_whitespace_width = 0.0;
            text.length += item.length;
            return;
        }
        self.trailing_whitespace_width += logical_width;
        text.length += if self.trailing_whitespace == TrailingWhitespace::Collapsed {
            1
        } else {
            item.length
        };
    }

    /// Removes the run's trailing collapsed/collapsible whitespace, both from
    /// the text range and visually.
    fn remove_trailing_whitespace(&mut self) {
        // Trimmable whitespace is always collapsible, so the trailing
        // trimmable content is exactly one character long.
        const TRAILING_TRIMMABLE_CONTENT_LENGTH: usize = 1;
        let text = self.text.as_mut().expect("text runs always carry text");
        debug_assert!(text.length >= TRAILING_TRIMMABLE_CONTENT_LENGTH);
        text.length -= TRAILING_TRIMMABLE_CONTENT_LENGTH;
        self.visually_collapse_trailing_whitespace(self.trailing_whitespace_width);
    }

    /// Shrinks up to `budget` of the run's trailing whitespace advance.
    ///
    /// This is a purely visual adjustment; the text length is unchanged.
    /// Returns the width actually collapsed.
    fn visually_collapse_trailing_whitespace(&mut self, budget: f32) -> f32 {
        debug_assert!(self.has_trailing_whitespace());
        let collapsed_width = budget.min(self.trailing_whitespace_width);
        self.shrink_horizontally(collapsed_width);
        self.trailing_whitespace_width -= collapsed_width;
        if self.trailing_whitespace_width == 0.0 {
            self.trailing_whitespace = TrailingWhitespace::None;
        }
        collapsed_width
    }

    /// Removes the trailing letter-spacing.
    ///
    /// Contract: only valid on a run for which
    /// [`has_trailing_letter_spacing`](Self::has_trailing_letter_spacing)
    /// holds.
    fn remove_trailing_letter_spacing(&mut self) {
        debug_assert!(self.has_trailing_letter_spacing());
        self.shrink_horizontally(self.trailing_letter_spacing());
    }

    fn set_trailing_hyphen(&mut self, hyphen_logical_width: f32) {
        debug_assert!(self.is_text());
        self.hyphen_width = Some(hyphen_logical_width);
        self.logical_width += hyphen_logical_width;
    }

    fn set_expansion(&mut self, expansion: Expansion) {
        self.expansion = expansion;
    }
}

/// The one pending trailing trim candidate
///
/// References the candidate run by index so the state survives run-list
/// mutation. Fully trimmable whitespace may sit on top of letter-spacing
/// registered earlier on the same run (text with positive letter-spacing
/// directly followed by collapsible whitespace); both get removed together.
#[derive(Debug, Clone, Copy, PartialEq)]
enum TrimmableTrailingContent {
    None,
    FullyTrimmable {
        first_run_index: usize,
        whitespace_width: f32,
        letter_spacing_width: f32,
    },
    PartiallyTrimmable {
        first_run_index: usize,
        letter_spacing_width: f32,
    },
}

impl TrimmableTrailingContent {
    fn is_empty(&self) -> bool {
        matches!(self, TrimmableTrailingContent::None)
    }

    fn is_trailing_run_partially_trimmable(&self) -> bool {
        matches!(self, TrimmableTrailingContent::PartiallyTrimmable { .. })
    }

    fn width(&self) -> f32 {
        match *self {
            TrimmableTrailingContent::None => 0.0,
            TrimmableTrailingContent::FullyTrimmable {
                whitespace_width,
                letter_spacing_width,
                ..
            } => whitespace_width + letter_spacing_width,
            TrimmableTrailingContent::PartiallyTrimmable {
                letter_spacing_width, ..
            } => letter_spacing_width,
        }
    }

    fn add_fully_trimmable_content(&mut self, run_index: usize, trimmable_width: f32) {
        // Subsequent collapsible whitespace collapses to zero advance before
        // it ever reaches the run list, so a fully trimmable candidate can
        // only be registered once.
        debug_assert!(!matches!(self, TrimmableTrailingContent::FullyTrimmable { .. }));
        // A zero trimmable width (font-size: 0) is still a trim candidate.
        *self = match *self {
            // Letter-spacing tracked on the same run stays removable behind
            // the whitespace; a candidate on another run is stale now since
            // letter-spacing is never trimmed mid-line.
            TrimmableTrailingContent::PartiallyTrimmable {
                first_run_index,
                letter_spacing_width,
            } if first_run_index == run_index => TrimmableTrailingContent::FullyTrimmable {
                first_run_index,
                whitespace_width: trimmable_width,
                letter_spacing_width,
            },
            _ => TrimmableTrailingContent::FullyTrimmable {
                first_run_index: run_index,
                whitespace_width: trimmable_width,
                letter_spacing_width: 0.0,
            },
        };
    }

    fn add_partially_trimmable_content(&mut self, run_index: usize, trimmable_width: f32) {
        debug_assert!(self.is_empty());
        debug_assert!(trimmable_width > 0.0);
        *self = TrimmableTrailingContent::PartiallyTrimmable {
            first_run_index: run_index,
            letter_spacing_width: trimmable_width,
        };
    }

    /// Removes the tracked trailing content from its run, shifts the runs
    /// after it so they stay adjacent, drops the run entirely if its text
    /// collapsed to nothing, and clears the candidate state.
    ///
    /// Returns the removed width for the caller to subtract from the line's
    /// content width.
    fn remove(&mut self, runs: &mut Vec<Run>) -> f32 {
        debug_assert!(!self.is_empty());
        let removed_width = self.width();
        let first_run_index = match *self {
            TrimmableTrailingContent::None => return 0.0,
            TrimmableTrailingContent::FullyTrimmable {
                first_run_index,
                letter_spacing_width,
                ..
            } => {
                let run = &mut runs[first_run_index];
                debug_assert!(run.is_text());
                run.remove_trailing_whitespace();
                if letter_spacing_width > 0.0 {
                    run.remove_trailing_letter_spacing();
                }
                first_run_index
            }
            TrimmableTrailingContent::PartiallyTrimmable { first_run_index, .. } => {
                let run = &mut runs[first_run_index];
                debug_assert!(run.is_text());
                run.remove_trailing_letter_spacing();
                first_run_index
            }
        };

        // Runs after the candidate are necessarily non-content markers (word
        // break opportunities, inline box boundaries, line breaks): any
        // content run would have cleared the candidate. Pull them back so
        // they stay flush with the shortened run.
        for run in &mut runs[first_run_index + 1..] {
            debug_assert!(
                run.is_word_break_opportunity()
                    || run.is_inline_box_start()
                    || run.is_inline_box_end()
                    || run.is_line_break()
            );
            run.move_horizontally(-removed_width);
        }

        if runs[first_run_index]
            .text()
            .is_some_and(|text| text.length() == 0)
        {
            // Fully collapsed; the run has no role left on the line.
            runs.remove(first_run_index);
        }
        *self = TrimmableTrailingContent::None;
        removed_width
    }

    /// Removes the tracked letter-spacing.
    ///
    /// Contract: only valid while no fully-trimmable whitespace is tracked;
    /// letter-spacing is never trimmed behind trailing whitespace.
    fn remove_partially_trimmable_content(&mut self, runs: &mut Vec<Run>) -> f32 {
        debug_assert!(self.is_trailing_run_partially_trimmable());
        self.remove(runs)
    }

    fn reset(&mut self) {
        *self = TrimmableTrailingContent::None;
    }
}

/// Configuration for a [`Line`]
///
/// Captures the per-formatting-context decisions the accumulator needs, so no
/// global state is consulted.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LineOptions {
    /// `text-align` of the formatting context root
    pub text_align: TextAlign,

    /// When set, trailing letter-spacing is never registered for trimming
    pub ignore_trailing_letter_spacing: bool,

    /// Keep trailing collapsible whitespace visible when the line ends in a
    /// forced break (suppressed under right/end alignment, where the space
    /// would misalign the break)
    pub retain_trailing_whitespace_before_line_break: bool,
}

impl Default for LineOptions {
    fn default() -> Self {
        Self {
            text_align: TextAlign::Start,
            ignore_trailing_letter_spacing: false,
            retain_trailing_whitespace_before_line_break: true,
        }
    }
}

/// The line-scoped content accumulator
///
/// Owns the ordered run list and the aggregate content width. One `Line` is
/// exclusively owned by one layout pass; [`initialize`](Self::initialize)
/// resets it between line attempts so allocations are reused.
#[derive(Debug, Clone)]
pub struct Line {
    runs: Vec<Run>,
    content_logical_width: f32,
    non_spanning_inline_level_box_count: usize,
    trailing_soft_hyphen_width: Option<f32>,
    trimmable_trailing_content: TrimmableTrailingContent,
    options: LineOptions,
}

impl Line {
    pub fn new(options: LineOptions) -> Self {
        Self {
            runs: Vec::new(),
            content_logical_width: 0.0,
            non_spanning_inline_level_box_count: 0,
            trailing_soft_hyphen_width: None,
            trimmable_trailing_content: TrimmableTrailingContent::None,
            options,
        }
    }

    /// Resets the line for the next layout attempt, keeping allocations.
    pub fn initialize(&mut self) {
        self.non_spanning_inline_level_box_count = 0;
        self.content_logical_width = 0.0;
        self.runs.clear();
        self.trailing_soft_hyphen_width = None;
        self.trimmable_trailing_content.reset();
    }

    /// The runs placed so far, in visual order (pre-bidi).
    pub fn runs(&self) -> &[Run] {
        &self.runs
    }

    pub fn is_empty(&self) -> bool {
        self.runs.is_empty()
    }

    /// The rightmost content edge reached so far.
    pub fn content_logical_width(&self) -> f32 {
        self.content_logical_width
    }

    /// The placement cursor: the last run's logical right edge.
    pub fn content_logical_right(&self) -> f32 {
        self.runs.last().map_or(0.0, Run::logical_right)
    }

    /// Number of appended items that are not plain text runs; a line with a
    /// zero count and no text has no real content.
    pub fn non_spanning_inline_level_box_count(&self) -> usize {
        self.non_spanning_inline_level_box_count
    }

    /// Width a hyphen would add if the line ends here with a hyphenated
    /// break.
    pub fn trailing_soft_hyphen_width(&self) -> Option<f32> {
        self.trailing_soft_hyphen_width
    }

    /// Appends one content item with its pre-measured logical width.
    pub fn append(&mut self, item: &InlineItem, logical_width: f32) {
        match item {
            InlineItem::Text(text_item) => self.append_text_content(text_item, logical_width),
            InlineItem::HardLineBreak(source) => self.append_hard_line_break(source),
            InlineItem::SoftLineBreak(soft_break) => self.append_soft_line_break(soft_break),
            InlineItem::WordBreakOpportunity(source) => self.append_word_break_opportunity(source),
            InlineItem::InlineBoxStart(source) => self.append_inline_box_start(source, logical_width),
            InlineItem::InlineBoxEnd(source) => self.append_inline_box_end(source, logical_width),
            InlineItem::Box(atomic) if atomic.is_replaced => {
                self.append_replaced_inline_level_box(atomic, logical_width)
            }
            InlineItem::Box(atomic) => self.append_non_replaced_inline_level_box(atomic, logical_width),
        }
    }

    /// Runs the two trimming passes once the line's content set is final:
    /// remove trailing trimmable content, then visually collapse pre-wrap
    /// content against any remaining overflow (`extra_horizontal_space` is
    /// negative when the line overflows).
    pub fn remove_collapsible_content(&mut self, extra_horizontal_space: f32) {
        self.remove_trailing_trimmable_content();
        self.visually_collapse_pre_wrap_overflow_content(extra_horizontal_space);
    }

    /// Distributes `extra_horizontal_space` across the line's expansion
    /// opportunities to fully justify it.
    ///
    /// No-op when the line is empty, ends in a line break (the last line
    /// before a forced break is start-aligned), there is nothing to
    /// distribute, or no opportunities remain after the trailing fix-up.
    pub fn apply_run_expansion(
        &mut self,
        extra_horizontal_space: f32,
        opportunities: &dyn ExpansionOpportunities,
    ) {
        debug_assert!(matches!(
            self.options.text_align,
            TextAlign::Justify | TextAlign::JustifyAll
        ));
        if self.runs.is_empty() || self.runs.last().is_some_and(Run::is_line_break) {
            return;
        }
        if extra_horizontal_space <= 0.0 {
            return;
        }

        let mut line_expansion_opportunities = 0usize;
        let mut runs_expansion_opportunities = vec![0usize; self.runs.len()];
        let mut runs_expansion_behaviors = vec![ExpansionBehavior::default(); self.runs.len()];
        let mut last_run_index_with_content: Option<usize> = None;

        // The line start behaves as if an expansion point preceded it, so the
        // first run must not open with a leading opportunity.
        let mut run_is_after_expansion = true;
        for (run_index, run) in self.runs.iter().enumerate() {
            let style = run.style();
            let mut expansion_behavior = ExpansionBehavior::default();
            let mut expansion_opportunities_in_run = 0;

            if run.is_text() && !style.preserves_spaces_and_tabs() {
                if style.text_combine_upright != TextCombineUpright::None {
                    // Combined text lays out as a single composed glyph; it
                    // never stretches.
                    expansion_behavior =
                        ExpansionBehavior::FORBID_LEADING | ExpansionBehavior::FORBID_TRAILING;
                } else {
                    expansion_behavior = (if run_is_after_expansion {
                        ExpansionBehavior::FORBID_LEADING
                    } else {
                        ExpansionBehavior::ALLOW_LEADING
                    }) | ExpansionBehavior::ALLOW_TRAILING;
                    let text = run.text().map(RunText::as_str).unwrap_or_default();
                    let (count, is_after_expansion) =
                        opportunities.opportunity_count(text, style.direction, expansion_behavior);
                    expansion_opportunities_in_run = count;
                    run_is_after_expansion = is_after_expansion;
                }
            } else if run.is_box() {
                run_is_after_expansion = false;
            }

            runs_expansion_behaviors[run_index] = expansion_behavior;
            runs_expansion_opportunities[run_index] = expansion_opportunities_in_run;
            line_expansion_opportunities += expansion_opportunities_in_run;

            if run.is_text() || run.is_box() {
                last_run_index_with_content = Some(run_index);
            }
        }

        // A justified line never expands past its final glyph.
        if let Some(last_run_index) = last_run_index_with_content {
            if runs_expansion_opportunities[last_run_index] > 0 {
                runs_expansion_behaviors[last_run_index] =
                    runs_expansion_behaviors[last_run_index].leading()
                        | ExpansionBehavior::FORBID_TRAILING;
                if run_is_after_expansion {
                    // The content ends at an expansion point (e.g. a CJK
                    // ideograph); there is no glyph after it to stretch. Note
                    // that this is not trailing collapsible whitespace, which
                    // was all trimmed before justification.
                    debug_assert!(line_expansion_opportunities > 0);
                    line_expansion_opportunities -= 1;
                    runs_expansion_opportunities[last_run_index] -= 1;
                }
            }
        }

        if line_expansion_opportunities == 0 {
            return;
        }

        let expansion_to_distribute = extra_horizontal_space / line_expansion_opportunities as f32;
        trace!(
            "distributing {extra_horizontal_space}px across {line_expansion_opportunities} expansion opportunities"
        );
        let mut accumulated_expansion = 0.0f32;
        for (run_index, run) in self.runs.iter_mut().enumerate() {
            // Each run shifts by the expansion accumulated before it and
            // widens by its own share.
            run.move_horizontally(accumulated_expansion);
            let computed_expansion =
                expansion_to_distribute * runs_expansion_opportunities[run_index] as f32;
            run.set_expansion(Expansion {
                behavior: runs_expansion_behaviors[run_index],
                horizontal_expansion: computed_expansion,
            });
            run.grow_horizontally(computed_expansion);
            accumulated_expansion += computed_expansion;
        }
        self.content_logical_width += accumulated_expansion;
    }

    /// Attaches a hyphen of the given width to the line's last text run.
    ///
    /// Contract: the line must contain a text run; the outer loop only
    /// hyphenates lines that end in text.
    pub fn add_trailing_hyphen(&mut self, hyphen_logical_width: f32) {
        for run in self.runs.iter_mut().rev() {
            if !run.is_text() {
                continue;
            }
            run.set_trailing_hyphen(hyphen_logical_width);
            self.content_logical_width += hyphen_logical_width;
            return;
        }
        debug_assert!(false, "trailing hyphen requested on a line with no text run");
        warn!("ignoring trailing hyphen request on a line with no text run");
    }

    fn remove_trailing_trimmable_content(&mut self) {
        if self.trimmable_trailing_content.is_empty() || self.runs.is_empty() {
            return;
        }

        // Keep the trailing whitespace visible when it is followed by a
        // forced break, except when content is flushed against the end edge
        // where the space would push the break marker out of alignment.
        if self.options.retain_trailing_whitespace_before_line_break
            && self.runs.last().is_some_and(Run::is_line_break)
            && !self.options.text_align.is_end_aligned()
        {
            self.trimmable_trailing_content.reset();
            return;
        }

        let removed_width = self.trimmable_trailing_content.remove(&mut self.runs);
        self.content_logical_width -= removed_width;
    }

    /// Visually collapses trailing `pre-wrap` content that would otherwise
    /// overflow the line.
    ///
    /// Per CSS Text, a UA may visually collapse the character advance widths
    /// of preserved spaces that would otherwise overflow; content is not
    /// removed, only its rendered advance.
    fn visually_collapse_pre_wrap_overflow_content(&mut self, extra_horizontal_space: f32) {
        debug_assert!(self.trimmable_trailing_content.is_empty());
        let mut overflow_width = -extra_horizontal_space;
        if overflow_width <= 0.0 {
            return;
        }
        let mut collapsed_content_width = 0.0;
        for run in self.runs.iter_mut().rev() {
            if run.style().white_space != WhiteSpace::PreWrap {
                break;
            }
            let visually_collapsible =
                run.is_inline_box_start() || run.is_inline_box_end() || run.has_trailing_whitespace();
            if !visually_collapsible {
                break;
            }
            debug_assert!(!run.has_collapsible_trailing_whitespace());
            let collapsed_width = if run.is_text() {
                run.visually_collapse_trailing_whitespace(overflow_width)
            } else {
                let marker_width = run.logical_width();
                run.shrink_horizontally(marker_width);
                marker_width
            };
            collapsed_content_width += collapsed_width;
            overflow_width -= collapsed_width;
            if overflow_width <= 0.0 {
                break;
            }
        }
        self.content_logical_width -= collapsed_content_width;
    }

    fn append_text_content(&mut self, item: &TextItem, logical_width: f32) {
        let style = item.style();

        if self.text_will_collapse_completely(item) {
            return;
        }

        let needs_new_run = self.runs.last().map_or(true, |last_run| {
            last_run.source().id != item.source.id
                || !last_run.is_text()
                || last_run.has_collapsed_trailing_whitespace()
                || (item.is_word_separator && style.word_spacing != 0.0)
        });
        let old_content_logical_width = self.content_logical_width;
        if needs_new_run {
            // Word separators start their own run so the word-spacing gap is
            // a distinct, positionable unit. Negative word-spacing may cause
            // glyph overlap.
            let run_logical_left = self.content_logical_right()
                + if item.is_word_separator {
                    style.word_spacing
                } else {
                    0.0
                };
            self.runs
                .push(Run::from_text_item(item, run_logical_left, logical_width));
            self.content_logical_width =
                old_content_logical_width.max(run_logical_left + logical_width);
        } else {
            let last_run = self.runs.last_mut().expect("needs_new_run checked for runs");
            last_run.expand(item, logical_width);
            // Negative letter-spacing never shrinks the committed content.
            self.content_logical_width += logical_width.max(0.0);
        }

        if item.is_whitespace && !style.preserves_spaces_and_tabs() {
            let trimmable_width = self.content_logical_width - old_content_logical_width;
            self.trimmable_trailing_content
                .add_fully_trimmable_content(self.runs.len() - 1, trimmable_width);
            return;
        }

        // Any non-trimmable content invalidates a pending trim candidate.
        self.trimmable_trailing_content.reset();
        if !self.options.ignore_trailing_letter_spacing
            && !item.is_whitespace
            && style.letter_spacing > 0.0
        {
            self.trimmable_trailing_content
                .add_partially_trimmable_content(self.runs.len() - 1, style.letter_spacing);
        }
        self.trailing_soft_hyphen_width = if item.has_trailing_soft_hyphen {
            Some(style.hyphen_string_width)
        } else {
            None
        };
    }

    /// Whether a text item contributes nothing to the line: empty content, or
    /// collapsible whitespace that follows other collapsible whitespace (even
    /// across inline box boundaries) or opens the line.
    fn text_will_collapse_completely(&self, item: &TextItem) -> bool {
        if item.is_empty_content() {
            return true;
        }
        if !item.is_whitespace {
            return false;
        }
        if item.style().preserves_spaces_and_tabs() {
            return false;
        }
        // Any collapsible space immediately following another collapsible
        // space collapses to zero advance, even when the spaces sit on the
        // two sides of an inline box boundary within the same formatting
        // context: "<span>  </span> " drops the trailing space entirely,
        // while "<span style='white-space: pre'>  </span> " keeps it.
        for run in self.runs.iter().rev() {
            if run.is_box() {
                return false;
            }
            if run.is_text() {
                return run.has_collapsible_trailing_whitespace();
            }
            debug_assert!(
                run.is_inline_box_start() || run.is_inline_box_end() || run.is_word_break_opportunity()
            );
        }
        // Leading whitespace.
        true
    }

    fn append_hard_line_break(&mut self, source: &SourceBox) {
        self.trailing_soft_hyphen_width = None;
        self.non_spanning_inline_level_box_count += 1;
        let logical_left = self.content_logical_right();
        self.runs
            .push(Run::new(RunKind::HardLineBreak, source.clone(), logical_left, 0.0));
    }

    fn append_soft_line_break(&mut self, item: &SoftLineBreakItem) {
        self.trailing_soft_hyphen_width = None;
        let logical_left = self.content_logical_right();
        self.runs.push(Run::from_soft_line_break(item, logical_left));
    }

    fn append_word_break_opportunity(&mut self, source: &SourceBox) {
        let logical_left = self.content_logical_right();
        self.runs.push(Run::new(
            RunKind::WordBreakOpportunity,
            source.clone(),
            logical_left,
            0.0,
        ));
    }

    fn append_inline_box_start(&mut self, source: &SourceBox, logical_width: f32) {
        // A placeholder marking the start of the inline box; its width is the
        // box's start border and padding.
        self.non_spanning_inline_level_box_count += 1;
        let logical_left = self.content_logical_right();
        self.append_non_breakable_space(RunKind::InlineBoxStart, source, logical_left, logical_width);
    }

    fn append_inline_box_end(&mut self, source: &SourceBox, logical_width: f32) {
        // Trailing letter-spacing must not spill out of the inline box.
        // https://drafts.csswg.org/css-text-3/#letter-spacing-property
        if self
            .trimmable_trailing_content
            .is_trailing_run_partially_trimmable()
        {
            let removed_width = self
                .trimmable_trailing_content
                .remove_partially_trimmable_content(&mut self.runs);
            self.content_logical_width -= removed_width;
        }
        let logical_left = self.content_logical_right();
        self.append_non_breakable_space(RunKind::InlineBoxEnd, source, logical_left, logical_width);
    }

    fn append_non_replaced_inline_level_box(
        &mut self,
        item: &AtomicBoxItem,
        margin_box_logical_width: f32,
    ) {
        // An atomic box is never whitespace-collapsible and cannot carry a
        // soft hyphen.
        self.trimmable_trailing_content.reset();
        self.trailing_soft_hyphen_width = None;
        self.content_logical_width += margin_box_logical_width;
        self.non_spanning_inline_level_box_count += 1;
        let margin_start = item.margin_start;
        if margin_start >= 0.0 {
            let logical_left = self.content_logical_right();
            self.runs.push(Run::new(
                RunKind::AtomicBox,
                item.source.clone(),
                logical_left,
                margin_box_logical_width,
            ));
            return;
        }
        // A negative start margin pulls the box to the logical left and
        // squeezes its margin box. Place the run at the pulled position and
        // stretch it by the margin so subsequent content still resumes at the
        // box's content edge instead of overlapping it.
        let logical_left = self.content_logical_right() + margin_start;
        self.runs.push(Run::new(
            RunKind::AtomicBox,
            item.source.clone(),
            logical_left,
            margin_box_logical_width - margin_start,
        ));
    }

    fn append_replaced_inline_level_box(
        &mut self,
        item: &AtomicBoxItem,
        margin_box_logical_width: f32,
    ) {
        debug_assert!(item.is_replaced);
        // TODO: give replaced boxes their own placement rules; they currently
        // share the non-replaced path.
        self.append_non_replaced_inline_level_box(item, margin_box_logical_width);
    }

    /// Places a run at an explicit position and folds it into the content
    /// width, never letting negative margins make the content shorter than it
    /// already is.
    fn append_non_breakable_space(
        &mut self,
        kind: RunKind,
        source: &SourceBox,
        logical_left: f32,
        logical_width: f32,
    ) {
        self.runs
            .push(Run::new(kind, source.clone(), logical_left, logical_width));
        let run_logical_right = logical_left + logical_width;
        self.content_logical_width = self.content_logical_width.max(run_logical_right);
    }
}
