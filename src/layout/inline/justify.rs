//! Expansion opportunities for justified text
//!
//! This module carries the pieces of `text-align: justify` that are
//! independent of the line accumulator: the per-run expansion behavior flags,
//! the expansion record stored on each run, and the opportunity-counting
//! interface that the accumulator consults while distributing extra space.
//!
//! # CSS Reference
//!
//! - [CSS Text Module Level 3 - Justification](https://www.w3.org/TR/css-text-3/#justification)
//!
//! # Counting model
//!
//! An expansion opportunity is a position where a justified line may grow:
//! after a space, and on either side of a CJK ideograph. Opportunities must
//! not be double counted where two of them meet (a space followed by an
//! ideograph is one boundary, not two), so counting is stateful: the counter
//! reports whether the text *ends* at an opportunity, and the caller feeds
//! that back as the next run's leading-expansion constraint.

use bitflags::bitflags;

use crate::style::types::Direction;

bitflags! {
    /// Per-side expansion constraints for one run
    ///
    /// Leading/trailing are logical: leading is the side where the run's text
    /// starts. Each side carries an explicit allow or forbid bit so that a
    /// later pass can mask one side without re-deriving the other.
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub struct ExpansionBehavior: u8 {
        const ALLOW_LEADING = 1 << 0;
        const FORBID_LEADING = 1 << 1;
        const ALLOW_TRAILING = 1 << 2;
        const FORBID_TRAILING = 1 << 3;
    }
}

impl ExpansionBehavior {
    /// Mask selecting the leading-side bits.
    pub const LEADING_MASK: Self = Self::ALLOW_LEADING.union(Self::FORBID_LEADING);

    /// Mask selecting the trailing-side bits.
    pub const TRAILING_MASK: Self = Self::ALLOW_TRAILING.union(Self::FORBID_TRAILING);

    /// The leading-side bits of this behavior.
    pub fn leading(self) -> Self {
        self.intersection(Self::LEADING_MASK)
    }

    /// The trailing-side bits of this behavior.
    pub fn trailing(self) -> Self {
        self.intersection(Self::TRAILING_MASK)
    }
}

impl Default for ExpansionBehavior {
    fn default() -> Self {
        Self::ALLOW_LEADING | Self::ALLOW_TRAILING
    }
}

/// Expansion assigned to a run by justification
///
/// The behavior records which sides were allowed to expand; the amount is the
/// horizontal space distributed into the run. Downstream painting/shaping
/// spreads the amount across the run's opportunities.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Expansion {
    pub behavior: ExpansionBehavior,
    pub horizontal_expansion: f32,
}

/// Counts expansion opportunities in a text slice
///
/// Implemented by the caller's font/shaping layer when glyph-accurate counts
/// are available; [`DefaultExpansionCounter`] provides a character-class
/// approximation.
pub trait ExpansionOpportunities {
    /// Returns the number of expansion opportunities in `text` and whether
    /// the text ends at one.
    ///
    /// `FORBID_LEADING` in `behavior` marks the position before the text as
    /// already being an expansion point, suppressing a leading-side ideograph
    /// opportunity. Trailing suppression is the caller's job: the flag is
    /// applied after the line-wide scan, when the last content run is known.
    fn opportunity_count(
        &self,
        text: &str,
        direction: Direction,
        behavior: ExpansionBehavior,
    ) -> (usize, bool);
}

/// Character-class expansion counter
///
/// Opportunities at spaces and around CJK ideographs/symbols. Good enough
/// for engines without per-font expansion metrics.
#[derive(Debug, Clone, Copy, Default)]
pub struct DefaultExpansionCounter;

impl ExpansionOpportunities for DefaultExpansionCounter {
    fn opportunity_count(
        &self,
        text: &str,
        direction: Direction,
        behavior: ExpansionBehavior,
    ) -> (usize, bool) {
        let mut count = 0usize;
        let mut is_after_expansion = behavior.contains(ExpansionBehavior::FORBID_LEADING);
        match direction {
            Direction::Ltr => {
                for ch in text.chars() {
                    accumulate(ch, &mut count, &mut is_after_expansion);
                }
            }
            Direction::Rtl => {
                for ch in text.chars().rev() {
                    accumulate(ch, &mut count, &mut is_after_expansion);
                }
            }
        }
        (count, is_after_expansion)
    }
}

fn accumulate(ch: char, count: &mut usize, is_after_expansion: &mut bool) {
    if treat_as_space(ch) {
        *count += 1;
        *is_after_expansion = true;
    } else if is_cjk_ideograph_or_symbol(ch) {
        // Ideographs expand on both sides unless the leading side already is
        // an expansion point.
        if !*is_after_expansion {
            *count += 1;
        }
        *count += 1;
        *is_after_expansion = true;
    } else {
        *is_after_expansion = false;
    }
}

/// Whether a character behaves as a space for justification purposes.
pub fn treat_as_space(ch: char) -> bool {
    matches!(ch, ' ' | '\t' | '\n' | '\u{a0}')
}

/// Whether a character is a CJK ideograph or symbol that justification may
/// expand around.
pub fn is_cjk_ideograph_or_symbol(ch: char) -> bool {
    matches!(ch,
        '\u{3000}'..='\u{303F}'     // CJK Symbols and Punctuation
        | '\u{3040}'..='\u{309F}'   // Hiragana
        | '\u{30A0}'..='\u{30FF}'   // Katakana
        | '\u{3400}'..='\u{4DBF}'   // CJK Unified Ideographs Extension A
        | '\u{4E00}'..='\u{9FFF}'   // CJK Unified Ideographs
        | '\u{AC00}'..='\u{D7AF}'   // Hangul Syllables
        | '\u{F900}'..='\u{FAFF}'   // CJK Compatibility Ideographs
        | '\u{FF00}'..='\u{FFEF}'   // Halfwidth and Fullwidth Forms
        | '\u{20000}'..='\u{2A6DF}' // CJK Unified Ideographs Extension B
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    fn count(text: &str) -> (usize, bool) {
        DefaultExpansionCounter.opportunity_count(text, Direction::Ltr, ExpansionBehavior::default())
    }

    #[test]
    fn test_spaces_are_opportunities() {
        assert_eq!(count("a b c"), (2, false));
        assert_eq!(count("ab "), (1, true));
        assert_eq!(count("abc"), (0, false));
    }

    #[test]
    fn test_cjk_expands_on_both_sides() {
        // First ideograph opens a leading opportunity, every ideograph adds a
        // trailing one.
        assert_eq!(count("\u{4e2d}\u{6587}"), (3, true));
    }

    #[test]
    fn test_space_before_ideograph_is_one_boundary() {
        // "a 中": space (1) + ideograph trailing (1); the ideograph's leading
        // side coincides with the space.
        assert_eq!(count("a \u{4e2d}"), (2, true));
    }

    #[test]
    fn test_forbid_leading_suppresses_leading_ideograph_opportunity() {
        let behavior = ExpansionBehavior::FORBID_LEADING | ExpansionBehavior::ALLOW_TRAILING;
        let (opportunities, ends_in_opportunity) =
            DefaultExpansionCounter.opportunity_count("\u{4e2d}\u{6587}", Direction::Ltr, behavior);
        assert_eq!(opportunities, 2);
        assert!(ends_in_opportunity);
    }

    #[test]
    fn test_rtl_counts_from_the_logical_start() {
        let (opportunities, ends_in_opportunity) = DefaultExpansionCounter.opportunity_count(
            " ab",
            Direction::Rtl,
            ExpansionBehavior::default(),
        );
        // Reversed scan sees "ba " and ends on the space.
        assert_eq!(opportunities, 1);
        assert!(ends_in_opportunity);
    }

    #[test]
    fn test_behavior_side_masks() {
        let behavior = ExpansionBehavior::FORBID_LEADING | ExpansionBehavior::ALLOW_TRAILING;
        assert_eq!(behavior.leading(), ExpansionBehavior::FORBID_LEADING);
        assert_eq!(behavior.trailing(), ExpansionBehavior::ALLOW_TRAILING);
        assert_eq!(
            behavior.leading() | ExpansionBehavior::FORBID_TRAILING,
            ExpansionBehavior::FORBID_LEADING | ExpansionBehavior::FORBID_TRAILING
        );
    }
}
