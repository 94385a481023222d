//! Proptest strategies for generating valid test inputs.
//!
//! This module provides constructive strategies that generate valid inputs
//! without relying on filtering. Generated change results always carry
//! paths consistent with their kind and a diff whose markers match.
//!
//! # Bounds
//!
//! To keep tests fast, the following bounds are enforced:
//! - Max files per diff: 4
//! - Max hunks per file: 4
//! - Max lines per hunk: 12
//! - Max line length: 120 bytes
//! - Max rule tree depth: 3
//! - Max changes per change set: 6

use patchrelay_types::{
    CHANGESET_SCHEMA_V1, ChangeKind, ChangeResult, ChangeSet, RuleInfo, RuleOption, ToolMeta,
};
use proptest::prelude::*;

use crate::diff_builder::DiffBuilder;

/// Maximum number of files in a generated diff
pub const MAX_FILES: usize = 4;

/// Maximum number of hunks per file
pub const MAX_HUNKS_PER_FILE: usize = 4;

/// Maximum number of lines per hunk
pub const MAX_LINES_PER_HUNK: usize = 12;

/// Maximum line length in bytes
pub const MAX_LINE_LENGTH: usize = 120;

/// Maximum depth of a generated rule tree
pub const MAX_RULE_DEPTH: u32 = 3;

/// Maximum number of change results per change set
pub const MAX_CHANGES_PER_SET: usize = 6;

/// Strategy for generating ChangeKind values.
pub fn arb_change_kind() -> impl Strategy<Value = ChangeKind> {
    prop_oneof![
        Just(ChangeKind::Generated),
        Just(ChangeKind::Deleted),
        Just(ChangeKind::Moved),
        Just(ChangeKind::Altered),
    ]
}

/// Strategy for generating dotted rule ids in the `org.example.*` style.
pub fn arb_rule_id() -> impl Strategy<Value = String> {
    (arb_package_segment(), arb_type_name())
        .prop_map(|(segment, name)| format!("org.example.{}.{}", segment, name))
}

/// Strategy for generating human-readable rule display names.
pub fn arb_display_name() -> impl Strategy<Value = String> {
    prop::collection::vec(arb_word(), 1..4).prop_map(|words| words.join(" "))
}

/// Strategy for generating rule options.
///
/// Values cover the shapes the log sink has to render: null, booleans,
/// numbers, and plain strings.
pub fn arb_rule_option() -> impl Strategy<Value = RuleOption> {
    let value = prop_oneof![
        Just(serde_json::Value::Null),
        any::<bool>().prop_map(serde_json::Value::from),
        (0i64..10_000).prop_map(serde_json::Value::from),
        arb_identifier().prop_map(serde_json::Value::from),
    ];
    (arb_identifier(), value).prop_map(|(name, value)| RuleOption { name, value })
}

/// Strategy for generating rule trees of bounded depth.
pub fn arb_rule_info() -> impl Strategy<Value = RuleInfo> {
    arb_leaf_rule().prop_recursive(MAX_RULE_DEPTH, 12, 3, |inner| {
        (arb_leaf_rule(), prop::collection::vec(inner, 0..3)).prop_map(|(mut rule, children)| {
            rule.rules = children;
            rule
        })
    })
}

fn arb_leaf_rule() -> impl Strategy<Value = RuleInfo> {
    (
        arb_rule_id(),
        arb_display_name(),
        arb_display_name(),
        prop::collection::vec(arb_rule_option(), 0..3),
    )
        .prop_map(|(id, display_name, description, options)| RuleInfo {
            id,
            display_name,
            description,
            options,
            rules: vec![],
        })
}

/// Strategy for generating valid file paths.
pub fn arb_file_path() -> impl Strategy<Value = String> {
    (
        prop::collection::vec(arb_dir_name(), 1..3),
        arb_identifier(),
        arb_file_extension(),
    )
        .prop_map(|(dirs, name, ext)| format!("{}/{}.{}", dirs.join("/"), name, ext))
}

/// Strategy for generating single-line diff content.
pub fn arb_line_content() -> impl Strategy<Value = String> {
    prop::string::string_regex("[a-zA-Z0-9_(){}\\[\\];:,.<>=*/& ]{0,120}")
        .expect("valid regex for line content")
}

#[derive(Debug, Clone)]
enum LineSpec {
    Context(String),
    Add(String),
    Remove(String),
}

fn arb_line_spec() -> impl Strategy<Value = LineSpec> {
    prop_oneof![
        arb_line_content().prop_map(LineSpec::Context),
        arb_line_content().prop_map(LineSpec::Add),
        arb_line_content().prop_map(LineSpec::Remove),
    ]
}

#[derive(Debug, Clone)]
struct HunkSpec {
    start: u32,
    lines: Vec<LineSpec>,
}

impl HunkSpec {
    fn old_count(&self) -> u32 {
        self.lines
            .iter()
            .filter(|l| matches!(l, LineSpec::Context(_) | LineSpec::Remove(_)))
            .count() as u32
    }

    fn new_count(&self) -> u32 {
        self.lines
            .iter()
            .filter(|l| matches!(l, LineSpec::Context(_) | LineSpec::Add(_)))
            .count() as u32
    }
}

fn arb_hunk_spec() -> impl Strategy<Value = HunkSpec> {
    (
        1u32..300,
        prop::collection::vec(arb_line_spec(), 1..MAX_LINES_PER_HUNK),
    )
        .prop_map(|(start, lines)| HunkSpec { start, lines })
}

fn assemble_diff(kind: ChangeKind, before: &str, after: &str, hunks: &[HunkSpec]) -> String {
    let mut file = match kind {
        ChangeKind::Generated => DiffBuilder::new().file(after).new_file(),
        ChangeKind::Deleted => {
            return DiffBuilder::new().file(before).deleted().done().build();
        }
        ChangeKind::Moved => DiffBuilder::new().file(after).rename_from(before),
        ChangeKind::Altered => DiffBuilder::new().file(before),
    };

    for spec in hunks {
        let mut hunk = file.hunk(spec.start, spec.old_count(), spec.start, spec.new_count());
        for line in &spec.lines {
            hunk = match line {
                LineSpec::Context(content) => hunk.context(content),
                LineSpec::Add(content) => hunk.add_line(content),
                LineSpec::Remove(content) => hunk.remove(content),
            };
        }
        file = hunk.done();
    }

    file.done().build()
}

/// Strategy for generating change results that are valid by construction.
///
/// Paths match the kind (a generated file has no before path, a deleted
/// file no after path), the diff carries the matching marker, and at least
/// one responsible rule is always present.
pub fn arb_change_result() -> impl Strategy<Value = ChangeResult> {
    (
        arb_change_kind(),
        arb_file_path(),
        arb_file_path(),
        prop::collection::vec(arb_hunk_spec(), 0..MAX_HUNKS_PER_FILE),
        prop::collection::vec(arb_rule_info(), 1..3),
    )
        .prop_map(|(kind, before, after, hunks, rules)| {
            let (before_path, after_path) = match kind {
                ChangeKind::Generated => (None, Some(after.clone())),
                ChangeKind::Deleted => (Some(before.clone()), None),
                ChangeKind::Moved => (Some(before.clone()), Some(after.clone())),
                ChangeKind::Altered => (Some(before.clone()), Some(before.clone())),
            };
            let diff = assemble_diff(kind, &before, &after, &hunks);
            ChangeResult {
                kind,
                before_path,
                after_path,
                diff,
                rules,
            }
        })
}

/// Strategy for generating whole change set documents.
pub fn arb_change_set() -> impl Strategy<Value = ChangeSet> {
    (
        prop::option::of(arb_tool_meta()),
        prop::collection::vec(arb_remote_url(), 0..2),
        prop::collection::vec(arb_rule_info(), 0..3),
        prop::collection::vec(arb_change_result(), 0..MAX_CHANGES_PER_SET),
    )
        .prop_map(|(tool, provenance, rules, changes)| ChangeSet {
            schema: CHANGESET_SCHEMA_V1.to_string(),
            tool,
            provenance,
            rules,
            changes,
        })
}

/// Strategy for generating tool metadata.
pub fn arb_tool_meta() -> impl Strategy<Value = ToolMeta> {
    (arb_identifier(), (0u32..10, 0u32..20)).prop_map(|(name, (major, minor))| ToolMeta {
        name,
        version: format!("{}.{}.0", major, minor),
    })
}

/// Strategy for generating git remote URLs.
pub fn arb_remote_url() -> impl Strategy<Value = String> {
    (arb_identifier(), arb_identifier())
        .prop_map(|(org, repo)| format!("https://github.com/{}/{}.git", org, repo))
}

fn arb_identifier() -> impl Strategy<Value = String> {
    prop::string::string_regex("[a-z][a-z0-9_]{0,14}").expect("valid regex for identifier")
}

fn arb_word() -> impl Strategy<Value = String> {
    prop::sample::select(vec![
        "Format", "Remove", "Add", "Migrate", "Order", "Simplify", "unused", "imports", "headers",
        "whitespace", "annotations", "dependencies",
    ])
    .prop_map(str::to_string)
}

fn arb_package_segment() -> impl Strategy<Value = String> {
    prop::sample::select(vec![
        "format", "text", "cleanup", "migrate", "search", "style", "gradle", "maven",
    ])
    .prop_map(str::to_string)
}

fn arb_type_name() -> impl Strategy<Value = String> {
    prop::string::string_regex("[A-Z][a-zA-Z]{2,15}").expect("valid regex for type name")
}

fn arb_dir_name() -> impl Strategy<Value = String> {
    prop::sample::select(vec![
        "src", "lib", "app", "tests", "core", "api", "internal", "main", "java", "resources",
    ])
    .prop_map(str::to_string)
}

fn arb_file_extension() -> impl Strategy<Value = String> {
    prop::sample::select(vec![
        "java", "kt", "xml", "yaml", "properties", "gradle", "txt", "md",
    ])
    .prop_map(str::to_string)
}
