//! Text patching primitives for the shared project files.
//!
//! Generators never rewrite `app/core/config.py`, `app/main.py` or
//! `app/core/dependencies.py` wholesale. They go through the functions here,
//! which are pure `&str -> String` transforms. Insert and delete use the same
//! sentinel constants so a section written by one is always found by the other.
//!
//! Functions returning `Option<String>` yield `None` when nothing changed.

use std::sync::LazyLock;

use regex::Regex;

// ── Sentinels ────────────────────────────────────────────────────────────────

pub const DATABASE_SETTINGS: &str = "# Database settings";
pub const CACHE_SETTINGS: &str = "# Cache settings";
pub const AUTH_SETTINGS: &str = "# Authentication settings";
pub const JOBS_SETTINGS: &str = "# Background jobs settings";

/// Line in `app/core/config.py` that settings sections are inserted before.
pub const CONFIG_ANCHOR: &str = "    class Config:";

/// Presence of this name means the auth dependency block is already wired.
pub const AUTH_DEPENDENCIES_MARKER: &str = "get_current_user";

/// First line of the auth block appended to `app/core/dependencies.py`.
pub const AUTH_DEPENDENCIES_HEADER: &str = "# Authentication dependencies";

/// Class-body indentation of `Settings` fields.
pub const INDENT: &str = "    ";

static BLANK_RUN: LazyLock<Regex> = LazyLock::new(|| {
    // Tolerates trailing whitespace on the blank lines.
    Regex::new(r"\n(?:[ \t]*\n){2,}").expect("static regex is valid")
});

// ── Config sections ──────────────────────────────────────────────────────────

/// Build an indented settings section: sentinel, one line per field, and a
/// trailing blank line separating it from whatever follows.
pub fn settings_block(sentinel: &str, fields: &[String]) -> String {
    let mut block = format!("{INDENT}{sentinel}\n");
    for field in fields {
        block.push_str(INDENT);
        block.push_str(field);
        block.push('\n');
    }
    block.push('\n');
    block
}

fn has_sentinel(content: &str, sentinel: &str) -> bool {
    content.lines().any(|line| line.trim() == sentinel)
}

/// Insert `block` before the first line equal to any of `anchors`.
///
/// Returns `None` when `sentinel` is already present or no anchor occurs.
pub fn insert_once_before_first<A: AsRef<str>>(
    content: &str,
    sentinel: &str,
    block: &str,
    anchors: &[A],
) -> Option<String> {
    if has_sentinel(content, sentinel) {
        return None;
    }

    let mut offset = 0;
    for line in content.split_inclusive('\n') {
        let body = line.trim_end_matches(['\r', '\n']);
        if anchors.iter().any(|anchor| body == anchor.as_ref()) {
            let mut out = String::with_capacity(content.len() + block.len());
            out.push_str(&content[..offset]);
            out.push_str(block);
            out.push_str(&content[offset..]);
            return Some(out);
        }
        offset += line.len();
    }
    None
}

/// Whether `line` ends a settings section that started at a sentinel.
fn ends_section(line: &str) -> bool {
    let body = line.trim_end_matches(['\r', '\n']);
    let trimmed = body.trim_start();
    if trimmed.is_empty() {
        return true;
    }
    if trimmed.starts_with("class ") {
        return true;
    }
    let indent = body.len() - trimmed.len();
    if indent == 0 {
        return true;
    }
    indent == INDENT.len() && trimmed.starts_with('#')
}

/// Remove every section headed by `sentinel`.
///
/// A section runs from the sentinel line up to, not including, the first
/// blank line, class declaration, sibling `#` comment or column-0 line.
pub fn remove_block_by_sentinel(content: &str, sentinel: &str) -> String {
    let mut out = String::with_capacity(content.len());
    let mut skipping = false;

    for line in content.split_inclusive('\n') {
        if skipping {
            if ends_section(line) && line.trim() != sentinel {
                skipping = false;
            } else {
                continue;
            }
        }
        if line.trim() == sentinel {
            skipping = true;
            continue;
        }
        out.push_str(line);
    }
    out
}

/// Drop `    FIELD:` lines for each listed field.
pub fn remove_field_lines(content: &str, fields: &[&str]) -> String {
    let prefixes: Vec<String> = fields.iter().map(|f| format!("{INDENT}{f}:")).collect();
    content
        .split_inclusive('\n')
        .filter(|line| !prefixes.iter().any(|p| line.starts_with(p.as_str())))
        .collect()
}

/// Collapse runs of three or more newlines down to a single blank line.
pub fn collapse_blank_lines(content: &str) -> String {
    BLANK_RUN.replace_all(content, "\n\n").into_owned()
}

/// Full section cleanup: block, stray field lines, then blank-line collapse.
pub fn remove_config_section(content: &str, sentinel: &str, fields: &[&str]) -> String {
    let without_block = remove_block_by_sentinel(content, sentinel);
    let without_fields = remove_field_lines(&without_block, fields);
    collapse_blank_lines(&without_fields)
}

// ── Imports ──────────────────────────────────────────────────────────────────

/// Remove every line that starts with `prefix`.
pub fn remove_lines_with_prefix(content: &str, prefix: &str) -> String {
    content
        .split_inclusive('\n')
        .filter(|line| !line.starts_with(prefix))
        .collect()
}

fn is_import(line: &str) -> bool {
    let trimmed = line.trim_start();
    trimmed.starts_with("from ") || trimmed.starts_with("import ")
}

/// Insert `import_line` after the last `from `/`import ` line.
///
/// Returns `None` if `marker` already occurs or the file has no imports.
pub fn insert_after_last_import(content: &str, import_line: &str, marker: &str) -> Option<String> {
    if content.contains(marker) {
        return None;
    }

    let lines: Vec<&str> = content.split_inclusive('\n').collect();
    let last = lines.iter().rposition(|line| is_import(line))?;

    let mut out = String::with_capacity(content.len() + import_line.len() + 1);
    for (i, line) in lines.iter().enumerate() {
        out.push_str(line);
        if i == last {
            if !line.ends_with('\n') {
                out.push('\n');
            }
            out.push_str(import_line);
            if i + 1 < lines.len() || line.ends_with('\n') {
                out.push('\n');
            }
        }
    }
    Some(out)
}

/// Insert `import_line` before the first line starting with one of
/// `successors`, falling back to [`insert_after_last_import`].
///
/// Returns `None` if `marker` already occurs or there is nowhere to put it.
pub fn insert_import_before<P: AsRef<str>>(
    content: &str,
    import_line: &str,
    marker: &str,
    successors: &[P],
) -> Option<String> {
    if content.contains(marker) {
        return None;
    }

    let mut offset = 0;
    for line in content.split_inclusive('\n') {
        if successors.iter().any(|prefix| line.starts_with(prefix.as_ref())) {
            let mut out = String::with_capacity(content.len() + import_line.len() + 1);
            out.push_str(&content[..offset]);
            out.push_str(import_line);
            out.push('\n');
            out.push_str(&content[offset..]);
            return Some(out);
        }
        offset += line.len();
    }
    insert_after_last_import(content, import_line, marker)
}

// ── Appended blocks ──────────────────────────────────────────────────────────

/// Append `block` after a blank line unless `marker` is already present.
pub fn append_once(content: &str, marker: &str, block: &str) -> Option<String> {
    if content.contains(marker) {
        return None;
    }
    let mut out = content.trim_end_matches('\n').to_string();
    out.push_str("\n\n");
    out.push_str(block.trim_start_matches('\n'));
    if !out.ends_with('\n') {
        out.push('\n');
    }
    Some(out)
}

/// Cut an appended block out again: everything from the first line starting
/// with `block_start` to the end of the file.
///
/// Used for the auth dependency block, which is always appended last.
pub fn truncate_from_line(content: &str, block_start: &str) -> Option<String> {
    let mut offset = 0;
    for line in content.split_inclusive('\n') {
        if line.starts_with(block_start) {
            let kept = content[..offset].trim_end_matches('\n');
            let mut out = kept.to_string();
            if !out.is_empty() {
                out.push('\n');
            }
            return Some(out);
        }
        offset += line.len();
    }
    None
}

// ── Tests ─────────────────────────────────────────────────────────────────────
