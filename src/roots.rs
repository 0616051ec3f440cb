//! Expansion of command-line path arguments into walk roots.
//!
//! Arguments without glob metacharacters are taken literally and must exist.
//! Glob arguments are matched against the filesystem one path component at a
//! time, starting from their longest literal prefix.

use crate::error::GlobcatError;
use crate::pattern::glob;
use ignore::WalkBuilder;
use std::fs;
use std::path::{Path, PathBuf};

#[derive(Debug, Default)]
pub struct Expansion {
    pub roots: Vec<PathBuf>,
    /// One entry per argument that matched nothing or failed to parse.
    pub errors: Vec<GlobcatError>,
}

pub fn is_glob(arg: &str) -> bool {
    arg.contains(['*', '?', '['])
}

/// Expands every argument in order; no arguments means the current directory.
pub fn expand_roots<S: AsRef<str>>(args: &[S]) -> Expansion {
    let mut expansion = Expansion::default();
    if args.is_empty() {
        expansion.roots.push(PathBuf::from("."));
        return expansion;
    }
    for arg in args {
        let arg = arg.as_ref();
        match expand(arg) {
            Ok(paths) if paths.is_empty() => {
                expansion.errors.push(GlobcatError::NoMatch(arg.to_string()))
            }
            Ok(paths) => expansion.roots.extend(paths),
            Err(e) => expansion.errors.push(e),
        }
    }
    expansion
}

fn expand(arg: &str) -> Result<Vec<PathBuf>, GlobcatError> {
    if !is_glob(arg) {
        let path = PathBuf::from(arg);
        return Ok(match fs::symlink_metadata(&path) {
            Ok(_) => vec![path],
            Err(_) => Vec::new(),
        });
    }
    let matcher = glob(arg).map_err(|e| GlobcatError::InvalidGlob {
        pattern: arg.to_string(),
        message: e.kind().to_string(),
    })?;

    let mut base = PathBuf::new();
    let mut depth = 0;
    let mut recursive = false;
    for component in Path::new(arg).components() {
        let part = component.as_os_str().to_string_lossy();
        if depth > 0 || is_glob(&part) {
            depth += 1;
            recursive |= part == "**";
        } else {
            base.push(component);
        }
    }
    let search = if base.as_os_str().is_empty() {
        PathBuf::from(".")
    } else {
        base.clone()
    };

    let walker = WalkBuilder::new(&search)
        .standard_filters(false)
        .max_depth(if recursive { None } else { Some(depth) })
        .sort_by_file_name(|a, b| a.cmp(b))
        .build();
    let mut matches = Vec::new();
    // Unreadable directories just contribute no matches.
    for entry in walker.flatten() {
        if entry.depth() == 0 || (!recursive && entry.depth() != depth) {
            continue;
        }
        let candidate = if base.as_os_str().is_empty() {
            entry.path().strip_prefix(".").unwrap_or(entry.path())
        } else {
            entry.path()
        };
        if matcher.is_match(candidate) {
            matches.push(candidate.to_path_buf());
        }
    }
    Ok(matches)
}
