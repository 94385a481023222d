//! Shared test utilities for the patchrelay workspace.
//!
//! This crate provides:
//! - **arb**: Proptest strategies for generating valid test inputs
//! - **diff_builder**: Unified diff builders for constructing test diffs
//! - **schema**: JSON schema validators for DTOs
//! - **fixtures**: Common test fixtures (sample rules, diffs, change sets)
//!
//! # Example
//!
//! ```rust,ignore
//! use patchrelay_testkit::arb;
//! use proptest::prelude::*;
//!
//! proptest! {
//!     fn translates_any_change(result in arb::arb_change_result()) {
//!         // Use the generated change result
//!         assert!(!result.rules.is_empty());
//!     }
//! }
//! ```

pub mod arb;
pub mod diff_builder;
pub mod fixtures;
pub mod schema;

// Re-export commonly used items
pub use arb::{arb_change_kind, arb_change_result, arb_change_set, arb_rule_info};
pub use diff_builder::{DiffBuilder, FileBuilder, HunkBuilder};
pub use fixtures::{sample_change_sets, sample_diffs, sample_rules};
pub use schema::{validate_change_set, validate_report_document};
