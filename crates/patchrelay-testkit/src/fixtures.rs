//! Common test fixtures for patchrelay.
//!
//! This module provides sample rule trees, unified diffs, and change sets
//! for use in tests across the workspace.

use patchrelay_types::{
    CHANGESET_SCHEMA_V1, ChangeKind, ChangeResult, ChangeSet, RuleInfo, RuleOption, ToolMeta,
};

// =============================================================================
// Sample Rules
// =============================================================================

/// Collection of sample rule descriptors for testing.
pub mod sample_rules {
    use super::*;

    /// A leaf rule with no options and no sub-rules.
    pub fn license_header() -> RuleInfo {
        RuleInfo {
            id: "org.example.java.AddLicenseHeader".to_string(),
            display_name: "Add license header".to_string(),
            description: "Adds the project license header to files that lack one.".to_string(),
            options: vec![],
            rules: vec![],
        }
    }

    /// A leaf rule carrying configured options, including a null value.
    pub fn tabs_to_spaces() -> RuleInfo {
        RuleInfo {
            id: "org.example.format.TabsToSpaces".to_string(),
            display_name: "Tabs to spaces".to_string(),
            description: "Replaces leading tabs with spaces.".to_string(),
            options: vec![
                RuleOption {
                    name: "width".to_string(),
                    value: serde_json::json!(4),
                },
                RuleOption {
                    name: "scope".to_string(),
                    value: serde_json::Value::Null,
                },
            ],
            rules: vec![],
        }
    }

    /// A composite rule running two leaf rules.
    pub fn cleanup_composite() -> RuleInfo {
        RuleInfo {
            id: "org.example.Cleanup".to_string(),
            display_name: "Code cleanup".to_string(),
            description: "Umbrella rule for formatting cleanups.".to_string(),
            options: vec![],
            rules: vec![license_header(), tabs_to_spaces()],
        }
    }

    /// A three-level rule tree: composite, child composite, grandchild leaf.
    pub fn deep_tree() -> RuleInfo {
        RuleInfo {
            id: "org.example.Migrate".to_string(),
            display_name: "Migrate to new API".to_string(),
            description: String::new(),
            options: vec![],
            rules: vec![RuleInfo {
                id: "org.example.migrate.Imports".to_string(),
                display_name: "Migrate imports".to_string(),
                description: String::new(),
                options: vec![],
                rules: vec![RuleInfo {
                    id: "org.example.migrate.imports.SortImports".to_string(),
                    display_name: "Sort imports".to_string(),
                    description: String::new(),
                    options: vec![],
                    rules: vec![],
                }],
            }],
        }
    }

    /// The active rule set of a typical run.
    pub fn catalog() -> Vec<RuleInfo> {
        vec![cleanup_composite(), deep_tree()]
    }
}

// =============================================================================
// Sample Diffs
// =============================================================================

/// Collection of sample unified diffs for testing.
pub mod sample_diffs {
    /// An altered file with one hunk.
    pub fn altered_single_hunk() -> &'static str {
        r#"diff --git a/src/Main.java b/src/Main.java
index 4aa1def..9c2e77b 100644
--- a/src/Main.java
+++ b/src/Main.java
@@ -1,2 +1,3 @@
 package demo;
-import java.util.*;
+import java.util.List;
+import java.util.Map;
"#
    }

    /// An altered file with two hunks.
    pub fn altered_multi_hunk() -> &'static str {
        r#"diff --git a/src/Service.java b/src/Service.java
index 2f8c31a..77b0d4e 100644
--- a/src/Service.java
+++ b/src/Service.java
@@ -3,1 +3,1 @@
-    private String  name;
+    private String name;
@@ -10,2 +10,3 @@
     void run() {
+        audit();
         work();
"#
    }

    /// A deleted file.
    pub fn deleted_marker() -> &'static str {
        r#"diff --git a/src/Legacy.java b/src/Legacy.java
deleted file mode 100644
index 8d3f0c1..0000000
--- a/src/Legacy.java
+++ /dev/null
@@ -1,3 +0,0 @@
-package demo;
-
-class Legacy {}
"#
    }

    /// A renamed file that also changes one line.
    pub fn renamed_with_hunk() -> &'static str {
        r#"diff --git a/src/old/Util.java b/src/util/Util.java
similarity index 92%
rename from src/old/Util.java
rename to src/util/Util.java
index 6b20a77..f41c9d2 100644
--- a/src/old/Util.java
+++ b/src/util/Util.java
@@ -1,1 +1,1 @@
-package old;
+package util;
"#
    }

    /// A newly generated file.
    pub fn new_file() -> &'static str {
        r#"diff --git a/src/Banner.java b/src/Banner.java
new file mode 100644
index 0000000..3e51c2b
--- /dev/null
+++ b/src/Banner.java
@@ -0,0 +1,2 @@
+package demo;
+class Banner {}
"#
    }

    /// A diff whose hunk header does not follow the `-a,b +c,d` shape.
    pub fn malformed_header() -> &'static str {
        r#"diff --git a/src/Broken.java b/src/Broken.java
index 0000000..1111111 100644
--- a/src/Broken.java
+++ b/src/Broken.java
@@ garbage @@
+unreachable
"#
    }

    /// A hunk header promising more content than the body carries.
    pub fn truncated_hunk() -> &'static str {
        r#"diff --git a/src/Short.java b/src/Short.java
index 0000000..1111111 100644
--- a/src/Short.java
+++ b/src/Short.java
@@ -1,1 +1,3 @@
+only line
"#
    }

    /// An empty diff (no changes).
    pub fn empty() -> &'static str {
        ""
    }
}

// =============================================================================
// Sample Change Sets
// =============================================================================

/// Collection of sample change sets for testing.
pub mod sample_change_sets {
    use super::*;

    /// The smallest useful change set: one altered file, one rule.
    pub fn minimal() -> ChangeSet {
        ChangeSet {
            schema: CHANGESET_SCHEMA_V1.to_string(),
            tool: None,
            provenance: vec![],
            rules: vec![sample_rules::license_header()],
            changes: vec![ChangeResult {
                kind: ChangeKind::Altered,
                before_path: Some("src/Main.java".to_string()),
                after_path: Some("src/Main.java".to_string()),
                diff: sample_diffs::altered_single_hunk().to_string(),
                rules: vec![sample_rules::license_header()],
            }],
        }
    }

    /// One change of every kind, with tool metadata and provenance set.
    pub fn four_kinds() -> ChangeSet {
        ChangeSet {
            schema: CHANGESET_SCHEMA_V1.to_string(),
            tool: Some(ToolMeta {
                name: "patchrelay".to_string(),
                version: "0.1.0".to_string(),
            }),
            provenance: vec!["https://github.com/acme/widget.git".to_string()],
            rules: sample_rules::catalog(),
            changes: vec![
                ChangeResult {
                    kind: ChangeKind::Generated,
                    before_path: None,
                    after_path: Some("src/Banner.java".to_string()),
                    diff: sample_diffs::new_file().to_string(),
                    rules: vec![sample_rules::license_header()],
                },
                ChangeResult {
                    kind: ChangeKind::Deleted,
                    before_path: Some("src/Legacy.java".to_string()),
                    after_path: None,
                    diff: sample_diffs::deleted_marker().to_string(),
                    rules: vec![sample_rules::cleanup_composite()],
                },
                ChangeResult {
                    kind: ChangeKind::Moved,
                    before_path: Some("src/old/Util.java".to_string()),
                    after_path: Some("src/util/Util.java".to_string()),
                    diff: sample_diffs::renamed_with_hunk().to_string(),
                    rules: vec![sample_rules::deep_tree()],
                },
                ChangeResult {
                    kind: ChangeKind::Altered,
                    before_path: Some("src/Main.java".to_string()),
                    after_path: Some("src/Main.java".to_string()),
                    diff: sample_diffs::altered_single_hunk().to_string(),
                    rules: vec![sample_rules::license_header(), sample_rules::tabs_to_spaces()],
                },
            ],
        }
    }

    /// A change set whose second change carries a malformed diff.
    pub fn with_malformed_diff() -> ChangeSet {
        let mut set = minimal();
        set.changes.push(ChangeResult {
            kind: ChangeKind::Altered,
            before_path: Some("src/Broken.java".to_string()),
            after_path: Some("src/Broken.java".to_string()),
            diff: sample_diffs::malformed_header().to_string(),
            rules: vec![sample_rules::license_header()],
        });
        set
    }
}
