//! Style values consumed by inline line construction
//!
//! The line accumulator never resolves styles itself; the caller hands it
//! pre-resolved values through [`types::InlineStyle`].

pub mod types;

pub use types::{Direction, InlineStyle, TextAlign, TextCombineUpright, WhiteSpace};
