//! CSS value types for inline layout
//!
//! A small, pre-resolved subset of the computed style: only the properties
//! the line accumulator consults while collapsing, trimming, and justifying
//! content. Cascade resolution happens upstream; values arrive here already
//! absolutized (spacing in pixels, hyphen string pre-measured).

/// White space handling mode
///
/// CSS: `white-space`
/// Reference: CSS Text Module Level 3
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WhiteSpace {
  Normal,
  Nowrap,
  Pre,
  PreWrap,
  PreLine,
  BreakSpaces,
}

impl Default for WhiteSpace {
  fn default() -> Self {
    WhiteSpace::Normal
  }
}

/// Text horizontal alignment
///
/// CSS: `text-align`
/// Reference: CSS Text Module Level 3
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TextAlign {
  Start,
  End,
  Left,
  Right,
  Center,
  Justify,
  /// Justify all lines, including the last (text-align: justify-all)
  JustifyAll,
}

impl Default for TextAlign {
  fn default() -> Self {
    TextAlign::Start
  }
}

impl TextAlign {
  /// Whether content is flushed against the line's end edge.
  pub fn is_end_aligned(self) -> bool {
    matches!(self, TextAlign::Right | TextAlign::End)
  }
}

/// Inline base direction
///
/// CSS: `direction`
/// Reference: CSS Writing Modes Level 4
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
  Ltr,
  Rtl,
}

impl Default for Direction {
  fn default() -> Self {
    Direction::Ltr
  }
}

/// CSS `text-combine-upright`
///
/// Reference: CSS Writing Modes Level 4
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TextCombineUpright {
  None,
  All,
  Digits(u8),
}

impl Default for TextCombineUpright {
  fn default() -> Self {
    TextCombineUpright::None
  }
}

/// Pre-resolved style values for one inline-level source box
///
/// This is the narrow style-lookup surface of the line accumulator: the
/// properties that decide whitespace collapsing, spacing trim eligibility,
/// and justification behavior. `hyphen_string_width` carries the advance of
/// the style's hyphen string, measured upstream with the box's font.
#[derive(Debug, Clone, PartialEq)]
pub struct InlineStyle {
  pub white_space: WhiteSpace,
  pub direction: Direction,
  /// CSS `letter-spacing`, in pixels (0 = normal)
  pub letter_spacing: f32,
  /// CSS `word-spacing`, in pixels (0 = normal)
  pub word_spacing: f32,
  pub text_combine_upright: TextCombineUpright,
  /// Advance width of the hyphen string rendered with this style's font
  pub hyphen_string_width: f32,
}

impl Default for InlineStyle {
  fn default() -> Self {
    Self {
      white_space: WhiteSpace::Normal,
      direction: Direction::Ltr,
      letter_spacing: 0.0,
      word_spacing: 0.0,
      text_combine_upright: TextCombineUpright::None,
      hyphen_string_width: 0.0,
    }
  }
}

impl InlineStyle {
  /// Whether spaces and tabs are preserved rather than collapsed.
  ///
  /// Per the CSS Text white-space matrix, `pre`, `pre-wrap` and
  /// `break-spaces` keep spaces and tabs; `normal`, `nowrap` and `pre-line`
  /// collapse them.
  pub fn preserves_spaces_and_tabs(&self) -> bool {
    matches!(
      self.white_space,
      WhiteSpace::Pre | WhiteSpace::PreWrap | WhiteSpace::BreakSpaces
    )
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn test_preserves_spaces_and_tabs() {
    let mut style = InlineStyle::default();
    assert!(!style.preserves_spaces_and_tabs());

    style.white_space = WhiteSpace::Pre;
    assert!(style.preserves_spaces_and_tabs());
    style.white_space = WhiteSpace::PreWrap;
    assert!(style.preserves_spaces_and_tabs());
    style.white_space = WhiteSpace::BreakSpaces;
    assert!(style.preserves_spaces_and_tabs());

    style.white_space = WhiteSpace::PreLine;
    assert!(!style.preserves_spaces_and_tabs());
  }

  #[test]
  fn test_end_aligned() {
    assert!(TextAlign::Right.is_end_aligned());
    assert!(TextAlign::End.is_end_aligned());
    assert!(!TextAlign::Start.is_end_aligned());
    assert!(!TextAlign::Justify.is_end_aligned());
  }
}
