//! Unified diff builders for constructing test diffs.
//!
//! This module provides a fluent API for building well-formed git-style
//! diff text: file headers, deletion / new-file / rename markers, and
//! hunks with context, added, and removed lines. Output is newline
//! terminated, matching what a diff-producing tool hands over.
//!
//! # Example
//!
//! ```rust
//! use patchrelay_testkit::diff_builder::DiffBuilder;
//!
//! let diff = DiffBuilder::new()
//!     .file("src/Main.java")
//!         .hunk(1, 2, 1, 3)
//!             .context("class Main {")
//!             .remove("    int old;")
//!             .add_line("    int renamed;")
//!             .add_line("    int extra;")
//!             .done()
//!         .done()
//!     .build();
//!
//! assert!(diff.contains("+    int renamed;"));
//! ```

use crate::arb::{MAX_FILES, MAX_HUNKS_PER_FILE, MAX_LINE_LENGTH, MAX_LINES_PER_HUNK};

/// A builder for constructing unified diff strings.
#[derive(Debug, Clone, Default)]
pub struct DiffBuilder {
    files: Vec<FileBuilder>,
}

impl DiffBuilder {
    /// Create a new empty diff builder.
    pub fn new() -> Self {
        Self { files: Vec::new() }
    }

    /// Add a file to the diff and return a file builder.
    ///
    /// # Panics
    ///
    /// Panics if MAX_FILES would be exceeded.
    pub fn file(self, path: &str) -> FileBuilderInProgress {
        assert!(
            self.files.len() < MAX_FILES,
            "Cannot add more than {} files to a diff",
            MAX_FILES
        );
        FileBuilderInProgress {
            diff_builder: self,
            file_builder: FileBuilder::new(path),
        }
    }

    /// Add a pre-built file to the diff.
    pub fn add_file(mut self, file: FileBuilder) -> Self {
        assert!(
            self.files.len() < MAX_FILES,
            "Cannot add more than {} files to a diff",
            MAX_FILES
        );
        self.files.push(file);
        self
    }

    /// Build the complete diff string.
    pub fn build(self) -> String {
        let mut out = String::new();
        for file in &self.files {
            file.render(&mut out);
        }
        out
    }
}

/// Helper struct for building a file within a diff.
#[derive(Debug)]
pub struct FileBuilderInProgress {
    diff_builder: DiffBuilder,
    file_builder: FileBuilder,
}

impl FileBuilderInProgress {
    /// Add a hunk to the file.
    pub fn hunk(
        self,
        old_start: u32,
        old_count: u32,
        new_start: u32,
        new_count: u32,
    ) -> HunkBuilderInProgress {
        HunkBuilderInProgress {
            file_in_progress: self,
            hunk_builder: HunkBuilder::new(old_start, old_count, new_start, new_count),
        }
    }

    /// Mark as a deleted file.
    pub fn deleted(mut self) -> Self {
        self.file_builder = self.file_builder.deleted();
        self
    }

    /// Mark as a new file.
    pub fn new_file(mut self) -> Self {
        self.file_builder = self.file_builder.new_file();
        self
    }

    /// Mark as a rename.
    pub fn rename_from(mut self, old_path: &str) -> Self {
        self.file_builder = self.file_builder.rename_from(old_path);
        self
    }

    /// Finish this file and return to the diff builder.
    pub fn done(mut self) -> DiffBuilder {
        self.diff_builder.files.push(self.file_builder);
        self.diff_builder
    }
}

/// Helper struct for building a hunk within a file.
#[derive(Debug)]
pub struct HunkBuilderInProgress {
    file_in_progress: FileBuilderInProgress,
    hunk_builder: HunkBuilder,
}

impl HunkBuilderInProgress {
    /// Add a context line (unchanged).
    pub fn context(mut self, content: &str) -> Self {
        self.hunk_builder = self.hunk_builder.context(content);
        self
    }

    /// Add an added line.
    pub fn add_line(mut self, content: &str) -> Self {
        self.hunk_builder = self.hunk_builder.add_line(content);
        self
    }

    /// Add a removed line.
    pub fn remove(mut self, content: &str) -> Self {
        self.hunk_builder = self.hunk_builder.remove(content);
        self
    }

    /// Add a `\ No newline at end of file` marker.
    pub fn no_newline(mut self) -> Self {
        self.hunk_builder = self.hunk_builder.no_newline();
        self
    }

    /// Finish this hunk and return to the file builder.
    pub fn done(mut self) -> FileBuilderInProgress {
        self.file_in_progress.file_builder = self
            .file_in_progress
            .file_builder
            .add_hunk(self.hunk_builder);
        self.file_in_progress
    }
}

/// A builder for a single file in a diff.
#[derive(Debug, Clone)]
pub struct FileBuilder {
    path: String,
    old_path: Option<String>,
    hunks: Vec<HunkBuilder>,
    is_deleted: bool,
    is_new_file: bool,
}

impl FileBuilder {
    /// Create a new file builder with the given path.
    pub fn new(path: &str) -> Self {
        Self {
            path: path.to_string(),
            old_path: None,
            hunks: Vec::new(),
            is_deleted: false,
            is_new_file: false,
        }
    }

    /// Mark this file as deleted.
    pub fn deleted(mut self) -> Self {
        self.is_deleted = true;
        self
    }

    /// Mark this file as new.
    pub fn new_file(mut self) -> Self {
        self.is_new_file = true;
        self
    }

    /// Set the old path for a rename.
    pub fn rename_from(mut self, old_path: &str) -> Self {
        self.old_path = Some(old_path.to_string());
        self
    }

    /// Add a hunk to this file.
    ///
    /// # Panics
    ///
    /// Panics if MAX_HUNKS_PER_FILE would be exceeded.
    pub fn add_hunk(mut self, hunk: HunkBuilder) -> Self {
        assert!(
            self.hunks.len() < MAX_HUNKS_PER_FILE,
            "Cannot add more than {} hunks to a file",
            MAX_HUNKS_PER_FILE
        );
        self.hunks.push(hunk);
        self
    }

    fn render(&self, out: &mut String) {
        let old_path = self.old_path.as_deref().unwrap_or(&self.path);

        push_line(out, &format!("diff --git a/{} b/{}", old_path, self.path));

        if self.is_deleted {
            push_line(out, "deleted file mode 100644");
            push_line(out, "index 1111111..0000000");
            push_line(out, &format!("--- a/{}", old_path));
            push_line(out, "+++ /dev/null");
            for hunk in &self.hunks {
                hunk.render(out);
            }
            return;
        }

        if self.is_new_file {
            push_line(out, "new file mode 100644");
        }
        push_line(out, "index 0000000..1111111 100644");

        if self.old_path.is_some() {
            push_line(out, "similarity index 90%");
            push_line(out, &format!("rename from {}", old_path));
            push_line(out, &format!("rename to {}", self.path));
        }

        if self.is_new_file {
            push_line(out, "--- /dev/null");
        } else {
            push_line(out, &format!("--- a/{}", old_path));
        }
        push_line(out, &format!("+++ b/{}", self.path));

        for hunk in &self.hunks {
            hunk.render(out);
        }
    }
}

/// A builder for a hunk within a file diff.
#[derive(Debug, Clone)]
pub struct HunkBuilder {
    old_start: u32,
    old_count: u32,
    new_start: u32,
    new_count: u32,
    lines: Vec<HunkLine>,
}

#[derive(Debug, Clone)]
enum HunkLine {
    Context(String),
    Add(String),
    Remove(String),
    NoNewline,
}

impl HunkBuilder {
    /// Create a new hunk builder.
    pub fn new(old_start: u32, old_count: u32, new_start: u32, new_count: u32) -> Self {
        Self {
            old_start,
            old_count,
            new_start,
            new_count,
            lines: Vec::new(),
        }
    }

    /// Add a context line.
    ///
    /// # Panics
    ///
    /// Panics if MAX_LINES_PER_HUNK would be exceeded.
    pub fn context(mut self, content: &str) -> Self {
        self.check_line_limits(content);
        self.lines.push(HunkLine::Context(content.to_string()));
        self
    }

    /// Add an added line.
    ///
    /// # Panics
    ///
    /// Panics if MAX_LINES_PER_HUNK would be exceeded.
    pub fn add_line(mut self, content: &str) -> Self {
        self.check_line_limits(content);
        self.lines.push(HunkLine::Add(content.to_string()));
        self
    }

    /// Add a removed line.
    ///
    /// # Panics
    ///
    /// Panics if MAX_LINES_PER_HUNK would be exceeded.
    pub fn remove(mut self, content: &str) -> Self {
        self.check_line_limits(content);
        self.lines.push(HunkLine::Remove(content.to_string()));
        self
    }

    /// Add a `\ No newline at end of file` marker.
    pub fn no_newline(mut self) -> Self {
        self.lines.push(HunkLine::NoNewline);
        self
    }

    fn check_line_limits(&self, content: &str) {
        assert!(
            self.lines.len() < MAX_LINES_PER_HUNK,
            "Cannot add more than {} lines to a hunk",
            MAX_LINES_PER_HUNK
        );
        assert!(
            content.len() <= MAX_LINE_LENGTH,
            "Line content cannot exceed {} bytes",
            MAX_LINE_LENGTH
        );
    }

    fn render(&self, out: &mut String) {
        push_line(
            out,
            &format!(
                "@@ -{},{} +{},{} @@",
                self.old_start, self.old_count, self.new_start, self.new_count
            ),
        );

        for line in &self.lines {
            match line {
                HunkLine::Context(content) => push_line(out, &format!(" {}", content)),
                HunkLine::Add(content) => push_line(out, &format!("+{}", content)),
                HunkLine::Remove(content) => push_line(out, &format!("-{}", content)),
                HunkLine::NoNewline => push_line(out, "\\ No newline at end of file"),
            }
        }
    }
}

fn push_line(out: &mut String, line: &str) {
    out.push_str(line);
    out.push('\n');
}
