//! Unified diff outline parsing.
//!
//! This crate parses one file's `git diff` style unified diff into its
//! outline: file-level markers (deleted / renamed / new file) and hunks
//! with the content that survives on the new side.

mod outline;

pub use outline::{DiffOutline, DiffParseError, Hunk, parse_diff_outline};
