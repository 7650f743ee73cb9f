//! Foundation types for the migration engine.
//!
//! This module provides fundamental types used throughout the pipeline:
//! - [`Tag`] - Stable annotation identity binding plan records to tree nodes
//! - [`TextRange`], [`TextSize`] - Source positions (byte offsets)
//! - [`LineCol`], [`LineIndex`] - Line/column conversion for diagnostics
//!
//! This module has NO dependencies on other tunit_migrate modules.

mod line_index;
mod tag;

pub use line_index::{LineCol, LineIndex};
pub use tag::Tag;

pub use text_size::{TextRange, TextSize};
