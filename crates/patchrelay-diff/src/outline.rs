/// One hunk of a unified diff, reduced to its new-side shape.
///
/// `start_line` and `line_count` come straight from the `+c,d` half of the
/// hunk header. `replacement` is every consumed content line minus its
/// one-character prefix, newline-joined (with a trailing newline).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Hunk {
    pub start_line: u32,
    pub line_count: u32,
    pub replacement: String,
}

/// File-level outline of one diff: which markers the header block carried
/// and the hunks that followed.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct DiffOutline {
    pub deleted: bool,
    pub renamed: bool,
    pub new_file: bool,
    pub hunks: Vec<Hunk>,
}

#[derive(Debug, thiserror::Error)]
pub enum DiffParseError {
    #[error("malformed hunk header: {0}")]
    MalformedHunkHeader(String),
}

/// Parse one file's unified diff into its outline.
///
/// Marker scanning covers only the header block before the first hunk; a
/// `deleted file` marker short-circuits the whole parse, since deleted
/// files never contribute hunks. A `rename from` marker is recorded and
/// scanning continues, because a rename may still carry content hunks.
///
/// Any line starting with `@@` must match the fixed header shape
/// `@@ -a,b +c,d @@` (trailer allowed); anything else is a hard error
/// rather than a silent skip. Within a hunk, exactly `d` lines that are
/// neither removals (`-`) nor no-newline markers (`\`) are consumed into
/// the replacement text.
pub fn parse_diff_outline(diff_text: &str) -> Result<DiffOutline, DiffParseError> {
    let mut outline = DiffOutline::default();
    let mut seen_hunk = false;
    let mut lines = diff_text.lines();

    while let Some(line) = lines.next() {
        if !seen_hunk && !line.starts_with("@@") {
            if line.starts_with("deleted file") {
                outline.deleted = true;
                return Ok(outline);
            }
            if line.starts_with("rename from") {
                outline.renamed = true;
            }
            if line.starts_with("new file") {
                outline.new_file = true;
            }
            continue;
        }

        seen_hunk = true;
        if !line.starts_with("@@") {
            continue;
        }

        let (start_line, line_count) = parse_hunk_header(line)?;

        let mut replacement = String::new();
        let mut consumed = 0u32;
        while consumed < line_count {
            // A header promising more rows than the text holds is tolerated;
            // the region still reflects the header.
            let Some(content) = lines.next() else { break };
            if content.starts_with('-') || content.starts_with('\\') {
                continue;
            }
            replacement.push_str(content.get(1..).unwrap_or_default());
            replacement.push('\n');
            consumed += 1;
        }

        outline.hunks.push(Hunk {
            start_line,
            line_count,
            replacement,
        });
    }

    Ok(outline)
}

fn parse_hunk_header(line: &str) -> Result<(u32, u32), DiffParseError> {
    // Both counts are required: @@ -a,b +c,d @@ with an optional trailer.
    let malformed = || DiffParseError::MalformedHunkHeader(line.to_string());

    let rest = line.strip_prefix("@@ -").ok_or_else(malformed)?;
    let (old, rest) = rest.split_once(' ').ok_or_else(malformed)?;
    parse_pair(old).ok_or_else(malformed)?;

    let rest = rest.strip_prefix('+').ok_or_else(malformed)?;
    let (new, rest) = rest.split_once(' ').ok_or_else(malformed)?;
    let (start_line, line_count) = parse_pair(new).ok_or_else(malformed)?;

    if !rest.starts_with("@@") {
        return Err(malformed());
    }

    Ok((start_line, line_count))
}

fn parse_pair(s: &str) -> Option<(u32, u32)> {
    let (start, count) = s.split_once(',')?;
    Some((parse_count(start)?, parse_count(count)?))
}

fn parse_count(s: &str) -> Option<u32> {
    if s.is_empty() || !s.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    s.parse().ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_single_hunk() {
        let diff = "@@ -1,2 +1,3 @@\n context\n-old\n+new1\n+new2\n";

        let outline = parse_diff_outline(diff).unwrap();
        assert!(!outline.deleted);
        assert_eq!(outline.hunks.len(), 1);

        let hunk = &outline.hunks[0];
        assert_eq!(hunk.start_line, 1);
        assert_eq!(hunk.line_count, 3);
        assert_eq!(hunk.replacement, "context\nnew1\nnew2\n");
    }

    #[test]
    fn parses_hunk_with_trailer_text() {
        let diff = "@@ -10,2 +12,2 @@ fn main() {\n context\n+added\n-removed\n";

        let outline = parse_diff_outline(diff).unwrap();
        assert_eq!(outline.hunks[0].start_line, 12);
        assert_eq!(outline.hunks[0].line_count, 2);
        assert_eq!(outline.hunks[0].replacement, "context\nadded\n");
    }

    #[test]
    fn deleted_marker_short_circuits() {
        let diff = "diff --git a/Foo.java b/Foo.java\n\
                    deleted file mode 100644\n\
                    index 1234567..0000000\n\
                    --- a/Foo.java\n\
                    +++ /dev/null\n\
                    @@ -1,3 +0,0 @@\n\
                    -gone\n\
                    -gone\n\
                    -gone\n";

        let outline = parse_diff_outline(diff).unwrap();
        assert!(outline.deleted);
        assert!(outline.hunks.is_empty());
    }

    #[test]
    fn deleted_marker_wins_even_over_malformed_trailing_headers() {
        let diff = "deleted file mode 100644\n@@ garbage @@\n";

        let outline = parse_diff_outline(diff).unwrap();
        assert!(outline.deleted);
    }

    #[test]
    fn rename_marker_keeps_scanning_for_hunks() {
        let diff = "diff --git a/old/Name.java b/new/Name.java\n\
                    similarity index 96%\n\
                    rename from old/Name.java\n\
                    rename to new/Name.java\n\
                    --- a/old/Name.java\n\
                    +++ b/new/Name.java\n\
                    @@ -4,1 +4,1 @@\n\
                    -package old;\n\
                    +package new;\n";

        let outline = parse_diff_outline(diff).unwrap();
        assert!(outline.renamed);
        assert_eq!(outline.hunks.len(), 1);
        assert_eq!(outline.hunks[0].replacement, "package new;\n");
    }

    #[test]
    fn pure_rename_has_no_hunks() {
        let diff = "diff --git a/a.txt b/b.txt\n\
                    similarity index 100%\n\
                    rename from a.txt\n\
                    rename to b.txt\n";

        let outline = parse_diff_outline(diff).unwrap();
        assert!(outline.renamed);
        assert!(outline.hunks.is_empty());
    }

    #[test]
    fn new_file_marker_is_recorded() {
        let diff = "diff --git a/fresh.txt b/fresh.txt\n\
                    new file mode 100644\n\
                    --- /dev/null\n\
                    +++ b/fresh.txt\n\
                    @@ -0,0 +1,2 @@\n\
                    +hello\n\
                    +world\n";

        let outline = parse_diff_outline(diff).unwrap();
        assert!(outline.new_file);
        assert_eq!(outline.hunks.len(), 1);
        assert_eq!(outline.hunks[0].start_line, 1);
        assert_eq!(outline.hunks[0].replacement, "hello\nworld\n");
    }

    #[test]
    fn markers_after_the_first_hunk_are_plain_content() {
        // Once hunks start, the header block is over; nothing here may
        // retroactively flag the file as deleted.
        let diff = "@@ -1,1 +1,1 @@\n+x\ndeleted file mode 100644\n";

        let outline = parse_diff_outline(diff).unwrap();
        assert!(!outline.deleted);
        assert_eq!(outline.hunks.len(), 1);
    }

    #[test]
    fn malformed_header_is_an_error() {
        let err = parse_diff_outline("@@ garbage @@\n").unwrap_err();
        assert!(err.to_string().contains("@@ garbage @@"));
    }

    #[test]
    fn header_without_counts_is_rejected() {
        // The short form git emits for single-line hunks is outside the
        // fixed shape this parser accepts.
        assert!(parse_diff_outline("@@ -1 +1 @@\n+x\n").is_err());
        assert!(parse_diff_outline("@@ -1,2 +1 @@\n+x\n").is_err());
    }

    #[test]
    fn header_with_nonnumeric_counts_is_rejected() {
        assert!(parse_diff_outline("@@ -a,b +c,d @@\n").is_err());
        assert!(parse_diff_outline("@@ -1,2 ++1,3 @@\n").is_err());
    }

    #[test]
    fn removed_and_no_newline_lines_do_not_consume_budget() {
        let diff = "@@ -1,4 +1,2 @@\n\
                    -first\n\
                    \\ No newline at end of file\n\
                    +kept\n\
                    -second\n\
                    \x20tail\n";

        let outline = parse_diff_outline(diff).unwrap();
        assert_eq!(outline.hunks[0].replacement, "kept\ntail\n");
    }

    #[test]
    fn multiple_hunks_preserve_source_order() {
        let diff = "@@ -1,1 +1,1 @@\n\
                    +alpha\n\
                    @@ -10,2 +11,2 @@\n\
                    \x20beta\n\
                    +gamma\n";

        let outline = parse_diff_outline(diff).unwrap();
        assert_eq!(outline.hunks.len(), 2);
        assert_eq!(outline.hunks[0].start_line, 1);
        assert_eq!(outline.hunks[0].replacement, "alpha\n");
        assert_eq!(outline.hunks[1].start_line, 11);
        assert_eq!(outline.hunks[1].replacement, "beta\ngamma\n");
    }

    #[test]
    fn truncated_hunk_keeps_header_counts() {
        let diff = "@@ -1,1 +1,3 @@\n+only\n";

        let outline = parse_diff_outline(diff).unwrap();
        assert_eq!(outline.hunks[0].line_count, 3);
        assert_eq!(outline.hunks[0].replacement, "only\n");
    }

    #[test]
    fn empty_diff_yields_empty_outline() {
        let outline = parse_diff_outline("").unwrap();
        assert_eq!(outline, DiffOutline::default());
    }

    #[test]
    fn zero_count_hunk_yields_empty_replacement() {
        let diff = "@@ -3,2 +2,0 @@\n-gone\n-gone\n";

        let outline = parse_diff_outline(diff).unwrap();
        assert_eq!(outline.hunks[0].start_line, 2);
        assert_eq!(outline.hunks[0].line_count, 0);
        assert_eq!(outline.hunks[0].replacement, "");
    }
}
