//! `pyproject.toml` dependency array editing.
//!
//! Only the lines strictly inside the `dependencies = [` … `]` region are
//! ever touched; the rest of the manifest is carried through byte-for-byte.

use std::collections::{BTreeSet, HashMap};
use std::sync::LazyLock;

use regex::Regex;

use crate::domain::error::DomainError;

pub const MANIFEST_FILE: &str = "pyproject.toml";

/// Table that marks a manifest as produced by this tool.
pub const PROJECT_MARKER_TABLE: &str = "[tool.fastkit]";
pub const PROJECT_MARKER_FLAG: &str = "project = true";

const ARRAY_OPEN: &str = "dependencies = [";
const ARRAY_CLOSE: &str = "]";

static PROJECT_NAME: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"(?m)^\s*name\s*=\s*"([^"]+)""#).expect("static regex is valid")
});

/// Bare package name of a requirement specifier.
///
/// Everything before the first `<`, `>`, `=` or `!`, trimmed. Extras stay
/// attached: `python-jose[cryptography]>=3.3.0` is `python-jose[cryptography]`.
pub fn package_name(spec: &str) -> String {
    let end = spec.find(['<', '>', '=', '!']).unwrap_or(spec.len());
    spec[..end].trim().to_string()
}

/// Whether `content` carries the generated-project marker.
pub fn is_generated_project_manifest(content: &str) -> bool {
    let mut in_table = false;
    for line in content.lines() {
        let trimmed = line.trim();
        if trimmed.starts_with('[') {
            in_table = trimmed == PROJECT_MARKER_TABLE;
            continue;
        }
        if in_table && trimmed == PROJECT_MARKER_FLAG {
            return true;
        }
    }
    false
}

/// First `name = "..."` value in the manifest.
pub fn project_name(content: &str) -> Option<String> {
    PROJECT_NAME
        .captures(content)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str().to_string())
}

/// A parsed manifest with a located dependency region.
#[derive(Debug, Clone)]
pub struct Manifest {
    lines: Vec<String>,
    open: usize,
    close: usize,
    trailing_newline: bool,
}

impl Manifest {
    pub fn parse(content: &str) -> Result<Self, DomainError> {
        let lines: Vec<String> = content.lines().map(str::to_string).collect();

        let open = lines
            .iter()
            .position(|l| l.trim().starts_with(ARRAY_OPEN))
            .ok_or_else(|| DomainError::ManifestParse {
                reason: "no 'dependencies = [' line".into(),
            })?;

        if lines[open].trim().ends_with(ARRAY_CLOSE) {
            return Err(DomainError::ManifestParse {
                reason: "single-line dependency arrays are not editable".into(),
            });
        }

        let close = lines[open + 1..]
            .iter()
            .position(|l| l.trim() == ARRAY_CLOSE)
            .map(|i| open + 1 + i)
            .ok_or_else(|| DomainError::ManifestParse {
                reason: "dependency array is never closed".into(),
            })?;

        Ok(Self {
            lines,
            open,
            close,
            trailing_newline: content.ends_with('\n'),
        })
    }

    /// Requirement specifiers in declaration order.
    pub fn entries(&self) -> Vec<String> {
        self.lines[self.open + 1..self.close]
            .iter()
            .filter_map(|line| parse_entry(line))
            .collect()
    }

    pub fn package_names(&self) -> BTreeSet<String> {
        self.entries().iter().map(|spec| package_name(spec)).collect()
    }

    pub fn contains_package(&self, name: &str) -> bool {
        self.entries().iter().any(|spec| package_name(spec) == name)
    }

    /// Append every spec whose package is not declared yet.
    ///
    /// The first spec for a package wins, both against existing entries and
    /// within `specs`. Returns `None` when nothing was added.
    pub fn with_added<S: AsRef<str>>(&self, specs: &[S]) -> Option<String> {
        let mut present = self.package_names();
        let mut added = Vec::new();
        for spec in specs {
            let spec = spec.as_ref();
            if present.insert(package_name(spec)) {
                added.push(format!("    \"{spec}\","));
            }
        }
        if added.is_empty() {
            return None;
        }

        let mut lines = self.lines.clone();
        lines.splice(self.close..self.close, added);
        Some(self.join(&lines))
    }

    /// Drop every entry whose package name matches one of `names_or_specs`.
    ///
    /// Returns `None` when nothing was removed.
    pub fn with_removed<S: AsRef<str>>(&self, names_or_specs: &[S]) -> Option<String> {
        let doomed: BTreeSet<String> = names_or_specs
            .iter()
            .map(|s| package_name(s.as_ref()))
            .collect();

        let mut removed = false;
        let lines: Vec<String> = self
            .lines
            .iter()
            .enumerate()
            .filter(|(i, line)| {
                if *i <= self.open || *i >= self.close {
                    return true;
                }
                match parse_entry(line) {
                    Some(spec) if doomed.contains(&package_name(&spec)) => {
                        removed = true;
                        false
                    }
                    _ => true,
                }
            })
            .map(|(_, line)| line.clone())
            .collect();

        removed.then(|| self.join(&lines))
    }

    /// Declare the packages of `specs` after every other entry, in `specs`
    /// order. An entry already present keeps its own text, so a user's pin
    /// survives the move; missing packages are added from `specs`.
    ///
    /// Returns `None` when the array is already in that shape.
    pub fn with_tail<S: AsRef<str>>(&self, specs: &[S]) -> Option<String> {
        let mut seen = BTreeSet::new();
        let tail: Vec<(String, &str)> = specs
            .iter()
            .map(|spec| (package_name(spec.as_ref()), spec.as_ref()))
            .filter(|(name, _)| seen.insert(name.clone()))
            .collect();

        let region = &self.lines[self.open + 1..self.close];
        let mut existing: HashMap<String, String> = HashMap::new();
        let mut kept = Vec::with_capacity(region.len() + tail.len());
        for line in region {
            match parse_entry(line).map(|spec| package_name(&spec)) {
                Some(name) if seen.contains(&name) => {
                    existing.entry(name).or_insert_with(|| line.clone());
                }
                _ => kept.push(line.clone()),
            }
        }
        for (name, spec) in tail {
            kept.push(
                existing
                    .remove(&name)
                    .unwrap_or_else(|| format!("    \"{spec}\",")),
            );
        }
        if kept.as_slice() == region {
            return None;
        }

        let mut lines = self.lines.clone();
        lines.splice(self.open + 1..self.close, kept);
        Some(self.join(&lines))
    }

    fn join(&self, lines: &[String]) -> String {
        let mut out = lines.join("\n");
        if self.trailing_newline {
            out.push('\n');
        }
        out
    }
}

/// Extract the quoted specifier from an array line like `    "redis>=4.0.0",`.
fn parse_entry(line: &str) -> Option<String> {
    let trimmed = line.trim().trim_end_matches(',').trim();
    if trimmed.is_empty() || trimmed.starts_with('#') {
        return None;
    }
    let unquoted = trimmed
        .strip_prefix('"')
        .and_then(|s| s.strip_suffix('"'))
        .or_else(|| trimmed.strip_prefix('\'').and_then(|s| s.strip_suffix('\'')))?;
    Some(unquoted.to_string())
}

// ── Tests ─────────────────────────────────────────────────────────────────────
