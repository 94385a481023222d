//! Turns one change result into structured annotations.
//!
//! The diff outline drives everything: a deleted file yields exactly one
//! annotation pinned to the top of the file, a rename yields one such
//! annotation followed by any content hunks, and every hunk yields one
//! annotation carrying its region and replacement text. Message wording
//! depends on what happened and on whether one or several rules were
//! responsible.

use patchrelay_diff::{DiffParseError, Hunk, parse_diff_outline};
use patchrelay_types::{Annotation, ChangeResult, Region, RuleInfo};

const START_OF_FILE: Region = Region {
    start_line: 1,
    end_line: 1,
};

#[derive(Debug, thiserror::Error)]
pub enum TranslateError {
    #[error("translate diff for {path}: {source}")]
    Diff {
        path: String,
        source: DiffParseError,
    },
    #[error("change result names neither a before nor an after path")]
    MissingPath,
    #[error("change for {path} lists no responsible rules")]
    NoRules { path: String },
}

/// Translate one change result into zero or more annotations, in diff
/// order.
///
/// Annotations anchor to the pre-change path so review tooling can locate
/// the original lines; a generated file has no pre-change path and falls
/// back to the new one. A new-file marker gets no annotation of its own:
/// there is no settled anchor for a comment against a file that did not
/// exist before.
///
/// No severity is assigned; a change carries no notion of severity.
pub fn translate_change(result: &ChangeResult) -> Result<Vec<Annotation>, TranslateError> {
    let anchor = result
        .before_path
        .as_deref()
        .or(result.after_path.as_deref())
        .ok_or(TranslateError::MissingPath)?;

    let outline = parse_diff_outline(&result.diff).map_err(|source| TranslateError::Diff {
        path: anchor.to_string(),
        source,
    })?;

    if !outline.deleted && !outline.renamed && outline.hunks.is_empty() {
        return Ok(Vec::new());
    }

    let rules = result.rules.as_slice();
    let Some(first_rule) = rules.first() else {
        return Err(TranslateError::NoRules {
            path: anchor.to_string(),
        });
    };

    let mut annotations = Vec::new();

    if outline.deleted {
        annotations.push(Annotation {
            rule_id: first_rule.id.clone(),
            message: deleted_message(anchor, rules),
            path: anchor.to_string(),
            region: START_OF_FILE,
            replacement: None,
        });
        return Ok(annotations);
    }

    if outline.renamed {
        let renamed_to = result.after_path.as_deref().unwrap_or(anchor);
        annotations.push(Annotation {
            rule_id: first_rule.id.clone(),
            message: renamed_message(anchor, renamed_to, rules),
            path: anchor.to_string(),
            region: START_OF_FILE,
            replacement: None,
        });
    }

    for hunk in &outline.hunks {
        annotations.push(Annotation {
            rule_id: first_rule.id.clone(),
            message: altered_message(anchor, rules),
            path: anchor.to_string(),
            region: hunk_region(hunk),
            replacement: Some(hunk.replacement.clone()),
        });
    }

    Ok(annotations)
}

fn hunk_region(hunk: &Hunk) -> Region {
    // Saturating math keeps degenerate headers (count 0, or the zero start
    // git emits for emptied files) inside the 1-based invariant.
    let start_line = hunk.start_line.max(1);
    let end_line = hunk
        .start_line
        .saturating_add(hunk.line_count)
        .saturating_sub(1)
        .max(start_line);
    Region {
        start_line,
        end_line,
    }
}

fn rule_list(rules: &[RuleInfo]) -> String {
    let mut out = String::new();
    for rule in rules {
        out.push_str("  - ");
        out.push_str(&rule.display_name);
        out.push('\n');
    }
    out
}

fn altered_message(path: &str, rules: &[RuleInfo]) -> String {
    match rules {
        [rule] => format!("According to rule **{}**, {} was altered", rule.display_name, path),
        _ => format!(
            "One or more rules of this list made changes to {}:\n\n{}",
            path,
            rule_list(rules)
        ),
    }
}

fn deleted_message(path: &str, rules: &[RuleInfo]) -> String {
    match rules {
        [rule] => format!("{} was deleted by rule {}.\n", path, rule.display_name),
        _ => format!("{} was deleted by one or more rules of:\n{}", path, rule_list(rules)),
    }
}

fn renamed_message(from: &str, to: &str, rules: &[RuleInfo]) -> String {
    match rules {
        [rule] => format!(
            "File was renamed from {} to {} by rule {}.\n",
            from, to, rule.display_name
        ),
        _ => format!(
            "File was renamed from {} to {} by one or more rules of:\n{}",
            from,
            to,
            rule_list(rules)
        ),
    }
}
