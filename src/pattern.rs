//! Include/exclude pattern matching.
//!
//! Patterns use shell-glob syntax with two structural modifiers:
//!
//! - a trailing `/` restricts the pattern to directories (`node_modules/`),
//! - a leading `/` anchors it to the traversal root (`/dist/**`), skipping the
//!   base-name check.
//!
//! Unanchored patterns are first tried against the entry's base name, so `*.rs`
//! selects Rust files at any depth. They are then tried against the full
//! root-relative path, where `*` stops at `/` and `**` crosses it. A bare
//! directory pattern such as `vendor` or `src/vendor` is rewritten to
//! `**/vendor` for the path check so it matches that directory at any depth.
//! The empty pattern is never rewritten and matches only the empty path.
//!
//! Braces have no special meaning: `{a,b}.txt` names a file literally called
//! `{a,b}.txt`. Only `*`, `**`, `?` and `[...]` classes are metacharacters,
//! and `\` escapes the character after it.

use globset::{GlobBuilder, GlobMatcher};
use std::borrow::Cow;

/// A filesystem object as seen by the matcher.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Entry<'a> {
    /// Root-relative path with `/` separators.
    pub relative: &'a str,
    /// Last path segment.
    pub name: &'a str,
    pub is_dir: bool,
}

impl<'a> Entry<'a> {
    pub fn new(relative: &'a str, is_dir: bool) -> Self {
        let name = relative.rsplit('/').next().unwrap_or(relative);
        Self {
            relative,
            name,
            is_dir,
        }
    }
}

#[derive(Debug, Clone)]
struct CompiledPattern {
    dir_only: bool,
    /// Absent for root-anchored patterns.
    name: Option<GlobMatcher>,
    file_path: GlobMatcher,
    dir_path: GlobMatcher,
}

impl CompiledPattern {
    fn compile(pattern: &str) -> Result<Self, globset::Error> {
        let (pattern, dir_only) = match pattern.strip_suffix('/') {
            Some(stripped) => (stripped, true),
            None => (pattern, false),
        };
        if let Some(anchored) = pattern.strip_prefix('/') {
            let path = glob(anchored)?;
            return Ok(Self {
                dir_only,
                name: None,
                file_path: path.clone(),
                dir_path: path,
            });
        }
        let file_path = glob(pattern)?;
        let dir_path = if pattern.is_empty() || pattern.starts_with('*') {
            file_path.clone()
        } else {
            glob(&format!("**/{pattern}"))?
        };
        Ok(Self {
            dir_only,
            name: Some(glob(pattern)?),
            file_path,
            dir_path,
        })
    }

    fn matches(&self, entry: &Entry<'_>) -> bool {
        if self.dir_only && !entry.is_dir {
            return false;
        }
        if let Some(name) = &self.name {
            if name.is_match(entry.name) {
                return true;
            }
        }
        let path = if entry.is_dir {
            &self.dir_path
        } else {
            &self.file_path
        };
        path.is_match(entry.relative)
    }
}

/// Compiles `pattern` with `*` confined to one path segment and braces taken
/// literally.
pub(crate) fn glob(pattern: &str) -> Result<GlobMatcher, globset::Error> {
    Ok(GlobBuilder::new(&escape_braces(pattern))
        .literal_separator(true)
        .backslash_escape(true)
        .build()?
        .compile_matcher())
}

fn escape_braces(pattern: &str) -> Cow<'_, str> {
    if !pattern.contains(['{', '}']) {
        return Cow::Borrowed(pattern);
    }
    let mut out = String::with_capacity(pattern.len() + 4);
    let mut chars = pattern.chars().peekable();
    while let Some(c) = chars.next() {
        match c {
            '\\' => {
                out.push(c);
                out.extend(chars.next());
            }
            '{' | '}' => {
                out.push('\\');
                out.push(c);
            }
            // Class contents are copied untouched; a `]` right after the
            // opening bracket (or its negation) is a member, not the end.
            '[' => {
                out.push(c);
                if let Some(neg) = chars.next_if(|&n| n == '!' || n == '^') {
                    out.push(neg);
                }
                if let Some(close) = chars.next_if_eq(&']') {
                    out.push(close);
                }
                for member in chars.by_ref() {
                    out.push(member);
                    if member == ']' {
                        break;
                    }
                }
            }
            c => out.push(c),
        }
    }
    Cow::Owned(out)
}

/// An ordered, pre-compiled pattern list answering "does the entry match any
/// of these?".
///
/// Patterns that fail to compile are dropped with a warning and behave as a
/// non-match; they never abort a walk.
#[derive(Debug, Clone, Default)]
pub struct PatternSet {
    patterns: Vec<CompiledPattern>,
}

impl PatternSet {
    pub fn new<S: AsRef<str>>(patterns: &[S]) -> Self {
        let patterns = patterns
            .iter()
            .filter_map(|p| {
                let p = p.as_ref();
                CompiledPattern::compile(p)
                    .map_err(|e| tracing::warn!(pattern = p, "ignoring invalid pattern: {e}"))
                    .ok()
            })
            .collect();
        Self { patterns }
    }

    /// `*`: selects every entry.
    pub fn include_default() -> Self {
        Self::new(&["*"])
    }

    /// The empty pattern: never matches a non-empty name or path.
    pub fn exclude_default() -> Self {
        Self::new(&[""])
    }

    pub fn matches(&self, entry: &Entry<'_>) -> bool {
        self.patterns.iter().any(|p| p.matches(entry))
    }

    /// Number of patterns that compiled.
    pub fn len(&self) -> usize {
        self.patterns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.patterns.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fmt::Write as _;

    fn table(set: &PatternSet, entries: &[(&str, bool)]) -> String {
        let mut out = String::new();
        for (relative, is_dir) in entries {
            let hit = set.matches(&Entry::new(relative, *is_dir));
            let _ = writeln!(out, "{relative}{} {hit}", if *is_dir { "/" } else { "" });
        }
        out
    }

    #[test]
    fn rewrite_only_applies_to_directories() {
        let set = PatternSet::new(&["src/vendor"]);
        assert_eq!(
            table(
                &set,
                &[
                    ("src/vendor", true),
                    ("lib/src/vendor", true),
                    ("src/vendor", false),
                    ("lib/src/vendor", false),
                ]
            ),
            "src/vendor/ true\nlib/src/vendor/ true\nsrc/vendor true\nlib/src/vendor false\n"
        );
    }

    #[test]
    fn empty_pattern_is_not_rewritten() {
        for pattern in ["", "/"] {
            let set = PatternSet::new(&[pattern]);
            assert_eq!(set.len(), 1);
            assert_eq!(
                table(&set, &[("vendor", true), ("a/b", true), ("a.txt", false)]),
                "vendor/ false\na/b/ false\na.txt false\n",
                "{pattern:?}"
            );
        }
    }

    #[test]
    fn braces_are_escaped_outside_classes() {
        assert_eq!(escape_braces("*.rs"), "*.rs");
        assert_eq!(escape_braces("{a,b}.txt"), r"\{a,b\}.txt");
        assert_eq!(escape_braces(r"\{x"), r"\{x");
        assert_eq!(escape_braces("[{}]x{"), r"[{}]x\{");
        assert_eq!(escape_braces("[]{]{"), r"[]{]\{");
    }

    #[test]
    fn entry_name_is_last_segment() {
        assert_eq!(Entry::new("a/b/c.txt", false).name, "c.txt");
        assert_eq!(Entry::new("top", true).name, "top");
    }
}
