//! Layout primitives
//!
//! Currently hosts the inline formatting pieces: the line box accumulator and
//! its supporting types.

pub mod inline;
