//! Report sinks: where translated change results end up.
//!
//! A sink receives one call per change result, keyed by change kind, and
//! is closed exactly once at the end of the run. File-backed sinks buffer
//! everything and write their report in a single shot at close, so an
//! aborted run leaves no partial report behind.

use std::path::{Path, PathBuf};

use anyhow::Result;
use serde_json::Value;
use tracing::{info, warn};

use patchrelay_types::{ChangeKind, ChangeResult, RuleInfo, RuleOption, ToolMeta};

use crate::output::OutputFile;
use crate::report::ReportBuilder;
use crate::sarif::render_sarif_for_document;
use crate::translate::translate_change;

pub const SARIF_FILE_NAME: &str = "sarif.json";
pub const PATCH_FILE_NAME: &str = "changes.patch";

/// Receiver for a run's change results.
pub trait ReportSink {
    fn open(&mut self) -> Result<()> {
        Ok(())
    }

    fn generated(&mut self, result: &ChangeResult) -> Result<()>;

    fn deleted(&mut self, result: &ChangeResult) -> Result<()>;

    fn moved(&mut self, result: &ChangeResult) -> Result<()>;

    fn altered(&mut self, result: &ChangeResult) -> Result<()>;

    fn close(&mut self) -> Result<()> {
        Ok(())
    }
}

/// Routes a change result to the sink method matching its kind.
pub fn dispatch(sink: &mut dyn ReportSink, result: &ChangeResult) -> Result<()> {
    match result.kind {
        ChangeKind::Generated => sink.generated(result),
        ChangeKind::Deleted => sink.deleted(result),
        ChangeKind::Moved => sink.moved(result),
        ChangeKind::Altered => sink.altered(result),
    }
}

/// Run-wide inputs shared by every sink.
#[derive(Debug, Clone)]
pub struct RunContext {
    pub tool: ToolMeta,
    pub rules: Vec<RuleInfo>,
    pub provenance: Vec<String>,
}

/// Output format selector.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReportFormat {
    Sarif,
    Patch,
    Log,
}

impl ReportFormat {
    pub fn as_str(&self) -> &'static str {
        match self {
            ReportFormat::Sarif => "sarif",
            ReportFormat::Patch => "patch",
            ReportFormat::Log => "log",
        }
    }

    pub fn default_file_name(&self) -> Option<&'static str> {
        match self {
            ReportFormat::Sarif => Some(SARIF_FILE_NAME),
            ReportFormat::Patch => Some(PATCH_FILE_NAME),
            ReportFormat::Log => None,
        }
    }
}

/// Builds the sink for a format, resolving its report path.
///
/// An explicit `out` path overrides the per-format default file under
/// `report_dir`. The log format writes no file and ignores both.
pub fn create_sink(
    format: ReportFormat,
    report_dir: &Path,
    out: Option<&Path>,
    ctx: RunContext,
) -> Result<Box<dyn ReportSink>> {
    let resolve = |name: &str| -> PathBuf {
        match out {
            Some(path) => path.to_path_buf(),
            None => report_dir.join(name),
        }
    };

    Ok(match format {
        ReportFormat::Sarif => {
            let out = OutputFile::create(resolve(SARIF_FILE_NAME))?;
            Box::new(SarifSink::new(out, ctx))
        }
        ReportFormat::Patch => {
            let out = OutputFile::create(resolve(PATCH_FILE_NAME))?;
            Box::new(PatchSink::new(out))
        }
        ReportFormat::Log => Box::new(LogSink::new()),
    })
}

/// Accumulates annotations and writes one SARIF file at close.
pub struct SarifSink {
    out: OutputFile,
    report: ReportBuilder,
}

impl SarifSink {
    pub fn new(out: OutputFile, ctx: RunContext) -> Self {
        Self {
            out,
            report: ReportBuilder::new(ctx.tool, ctx.rules, ctx.provenance),
        }
    }

    fn record(&mut self, result: &ChangeResult) -> Result<()> {
        let annotations = translate_change(result)?;
        self.report.push_annotations(annotations);
        Ok(())
    }
}

impl ReportSink for SarifSink {
    fn generated(&mut self, result: &ChangeResult) -> Result<()> {
        self.record(result)
    }

    fn deleted(&mut self, result: &ChangeResult) -> Result<()> {
        self.record(result)
    }

    fn moved(&mut self, result: &ChangeResult) -> Result<()> {
        self.record(result)
    }

    fn altered(&mut self, result: &ChangeResult) -> Result<()> {
        self.record(result)
    }

    fn close(&mut self) -> Result<()> {
        let document = self.report.finish();
        let sarif = render_sarif_for_document(&document);
        self.out.write_json(&sarif)?;
        info!("SARIF report available at {}", self.out.path().display());
        Ok(())
    }
}

/// Concatenates raw diffs and writes one patch file at close.
///
/// Results without diff text (binary or otherwise undiffable content) are
/// skipped.
pub struct PatchSink {
    out: OutputFile,
    patch: String,
}

impl PatchSink {
    pub fn new(out: OutputFile) -> Self {
        Self {
            out,
            patch: String::new(),
        }
    }

    fn append(&mut self, result: &ChangeResult) -> Result<()> {
        if result.diff.is_empty() {
            return Ok(());
        }
        self.patch.push_str(&result.diff);
        self.patch.push('\n');
        Ok(())
    }
}

impl ReportSink for PatchSink {
    fn generated(&mut self, result: &ChangeResult) -> Result<()> {
        self.append(result)
    }

    fn deleted(&mut self, result: &ChangeResult) -> Result<()> {
        self.append(result)
    }

    fn moved(&mut self, result: &ChangeResult) -> Result<()> {
        self.append(result)
    }

    fn altered(&mut self, result: &ChangeResult) -> Result<()> {
        self.append(result)
    }

    fn close(&mut self) -> Result<()> {
        self.out.write_text(&self.patch)?;
        info!("patch report available at {}", self.out.path().display());
        Ok(())
    }
}

/// Logs each change and its responsible rules to the console.
#[derive(Debug, Default)]
pub struct LogSink {
    changes: usize,
}

impl LogSink {
    pub fn new() -> Self {
        Self::default()
    }

    fn note(&mut self, result: &ChangeResult) {
        self.changes += 1;
        log_rules(&result.rules);
    }
}

impl ReportSink for LogSink {
    fn generated(&mut self, result: &ChangeResult) -> Result<()> {
        let path = result
            .after_path
            .as_deref()
            .or(result.before_path.as_deref())
            .unwrap_or("<unknown>");
        warn!("These rules would generate new file {}:", path);
        self.note(result);
        Ok(())
    }

    fn deleted(&mut self, result: &ChangeResult) -> Result<()> {
        let path = result
            .before_path
            .as_deref()
            .or(result.after_path.as_deref())
            .unwrap_or("<unknown>");
        warn!("These rules would delete file {}:", path);
        self.note(result);
        Ok(())
    }

    fn moved(&mut self, result: &ChangeResult) -> Result<()> {
        let from = result.before_path.as_deref().unwrap_or("<unknown>");
        let to = result.after_path.as_deref().unwrap_or("<unknown>");
        warn!("These rules would move file from {} to {}:", from, to);
        self.note(result);
        Ok(())
    }

    fn altered(&mut self, result: &ChangeResult) -> Result<()> {
        let path = result
            .before_path
            .as_deref()
            .or(result.after_path.as_deref())
            .unwrap_or("<unknown>");
        warn!("These rules would make changes to {}:", path);
        self.note(result);
        Ok(())
    }

    fn close(&mut self) -> Result<()> {
        info!("{} change(s) reported", self.changes);
        Ok(())
    }
}

// Each later top-level rule indents one step further, rendering a chain
// of composite rules as a cascade.
fn log_rules(rules: &[RuleInfo]) {
    let mut prefix = String::from("    ");
    for rule in rules {
        log_rule(rule, &prefix);
        prefix.push_str("    ");
    }
}

fn log_rule(rule: &RuleInfo, prefix: &str) {
    warn!("{}", rule_line(rule, prefix));
    for child in &rule.rules {
        log_rule(child, &format!("{prefix}    "));
    }
}

fn rule_line(rule: &RuleInfo, prefix: &str) -> String {
    let mut line = format!("{prefix}{}", rule.id);
    let options = render_options(&rule.options);
    if !options.is_empty() {
        line.push_str(": {");
        line.push_str(&options);
        line.push('}');
    }
    line
}

fn render_options(options: &[RuleOption]) -> String {
    let mut parts = Vec::new();
    for option in options {
        let value = match &option.value {
            Value::Null => continue,
            Value::String(text) => text.clone(),
            other => other.to_string(),
        };
        parts.push(format!("{}={}", option.name, value));
    }
    parts.join(", ")
}

#[cfg(test)]
mod tests {
    use super::*;
    use patchrelay_types::RuleOption;
    use pretty_assertions::assert_eq;
    use tempfile::TempDir;

    fn rule(id: &str, display_name: &str) -> RuleInfo {
        RuleInfo {
            id: id.to_string(),
            display_name: display_name.to_string(),
            description: String::new(),
            options: vec![],
            rules: vec![],
        }
    }

    fn change(kind: ChangeKind, before: &str, diff: &str) -> ChangeResult {
        ChangeResult {
            kind,
            before_path: Some(before.to_string()),
            after_path: Some(before.to_string()),
            diff: diff.to_string(),
            rules: vec![rule("org.example.Format", "Format")],
        }
    }

    fn ctx() -> RunContext {
        RunContext {
            tool: ToolMeta {
                name: "patchrelay".to_string(),
                version: "0.1.0".to_string(),
            },
            rules: vec![rule("org.example.Format", "Format")],
            provenance: vec![],
        }
    }

    #[derive(Default)]
    struct RecordingSink {
        calls: Vec<&'static str>,
    }

    impl ReportSink for RecordingSink {
        fn generated(&mut self, _: &ChangeResult) -> Result<()> {
            self.calls.push("generated");
            Ok(())
        }

        fn deleted(&mut self, _: &ChangeResult) -> Result<()> {
            self.calls.push("deleted");
            Ok(())
        }

        fn moved(&mut self, _: &ChangeResult) -> Result<()> {
            self.calls.push("moved");
            Ok(())
        }

        fn altered(&mut self, _: &ChangeResult) -> Result<()> {
            self.calls.push("altered");
            Ok(())
        }
    }

    #[test]
    fn dispatch_routes_by_kind() {
        let mut sink = RecordingSink::default();
        for kind in [
            ChangeKind::Altered,
            ChangeKind::Generated,
            ChangeKind::Moved,
            ChangeKind::Deleted,
        ] {
            dispatch(&mut sink, &change(kind, "a.txt", "")).expect("dispatch");
        }

        assert_eq!(sink.calls, ["altered", "generated", "moved", "deleted"]);
    }

    #[test]
    fn sarif_sink_writes_one_report_at_close() {
        let dir = TempDir::new().expect("temp");
        let mut sink = create_sink(ReportFormat::Sarif, dir.path(), None, ctx()).expect("create");

        sink.open().expect("open");
        dispatch(
            &mut *sink,
            &change(ChangeKind::Altered, "src/a.txt", "@@ -1,1 +1,2 @@\n+one\n+two\n"),
        )
        .expect("altered");
        dispatch(
            &mut *sink,
            &change(ChangeKind::Deleted, "src/b.txt", "deleted file mode 100644\n"),
        )
        .expect("deleted");

        let report_path = dir.path().join(SARIF_FILE_NAME);
        assert!(!report_path.exists());

        sink.close().expect("close");

        let text = std::fs::read_to_string(&report_path).expect("read");
        let value: serde_json::Value = serde_json::from_str(&text).expect("parse");
        let results = value["runs"][0]["results"].as_array().expect("results");
        assert_eq!(results.len(), 2);
        assert_eq!(results[0]["ruleId"], "org.example.Format");
        assert!(results[0].get("fixes").is_some());
        assert!(results[1].get("fixes").is_none());
    }

    #[test]
    fn sarif_sink_surfaces_malformed_diffs_at_record_time() {
        let dir = TempDir::new().expect("temp");
        let mut sink = create_sink(ReportFormat::Sarif, dir.path(), None, ctx()).expect("create");

        let err = dispatch(
            &mut *sink,
            &change(ChangeKind::Altered, "src/a.txt", "@@ garbage @@\n"),
        )
        .expect_err("malformed diff");

        assert!(err.to_string().contains("src/a.txt"));
        assert!(format!("{err:#}").contains("malformed hunk header"));
        assert!(!dir.path().join(SARIF_FILE_NAME).exists());
    }

    #[test]
    fn patch_sink_concatenates_diffs_and_writes_once() {
        let dir = TempDir::new().expect("temp");
        let mut sink = create_sink(ReportFormat::Patch, dir.path(), None, ctx()).expect("create");

        dispatch(
            &mut *sink,
            &change(ChangeKind::Altered, "a.txt", "@@ -1,1 +1,1 @@\n+a\n"),
        )
        .expect("first");
        dispatch(&mut *sink, &change(ChangeKind::Moved, "b.txt", "")).expect("quiet");
        dispatch(
            &mut *sink,
            &change(ChangeKind::Altered, "c.txt", "@@ -2,1 +2,1 @@\n+c\n"),
        )
        .expect("second");
        sink.close().expect("close");

        let text = std::fs::read_to_string(dir.path().join(PATCH_FILE_NAME)).expect("read");
        assert_eq!(text, "@@ -1,1 +1,1 @@\n+a\n\n@@ -2,1 +2,1 @@\n+c\n\n");

        let err = sink.close().expect_err("second close");
        assert!(err.to_string().contains("already written"));
    }

    #[test]
    fn explicit_out_path_overrides_report_dir() {
        let dir = TempDir::new().expect("temp");
        let out = dir.path().join("custom/report.sarif");
        let mut sink =
            create_sink(ReportFormat::Sarif, dir.path(), Some(&out), ctx()).expect("create");

        sink.close().expect("close");
        assert!(out.exists());
        assert!(!dir.path().join(SARIF_FILE_NAME).exists());
    }

    #[test]
    fn log_sink_accepts_every_kind_even_without_paths() {
        let mut sink = LogSink::new();
        let bare = ChangeResult {
            kind: ChangeKind::Generated,
            before_path: None,
            after_path: None,
            diff: String::new(),
            rules: vec![],
        };

        dispatch(&mut sink, &bare).expect("generated");
        dispatch(&mut sink, &change(ChangeKind::Moved, "a.txt", "")).expect("moved");
        assert_eq!(sink.changes, 2);
        sink.close().expect("close");
    }

    #[test]
    fn rule_lines_render_options_and_skip_nulls() {
        let composite = RuleInfo {
            options: vec![
                RuleOption {
                    name: "level".to_string(),
                    value: serde_json::json!(2),
                },
                RuleOption {
                    name: "unset".to_string(),
                    value: serde_json::Value::Null,
                },
                RuleOption {
                    name: "name".to_string(),
                    value: serde_json::json!("raw text"),
                },
            ],
            ..rule("org.example.Composite", "Composite")
        };

        assert_eq!(
            rule_line(&composite, "    "),
            "    org.example.Composite: {level=2, name=raw text}"
        );

        let plain = rule("org.example.Plain", "Plain");
        assert_eq!(rule_line(&plain, "        "), "        org.example.Plain");
    }

    #[test]
    fn format_default_file_names() {
        assert_eq!(ReportFormat::Sarif.default_file_name(), Some("sarif.json"));
        assert_eq!(ReportFormat::Patch.default_file_name(), Some("changes.patch"));
        assert_eq!(ReportFormat::Log.default_file_name(), None);
        assert_eq!(ReportFormat::Sarif.as_str(), "sarif");
    }
}
