use crate::classify::{ClassifierKind, Utf8Boundary};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
/// How selected files are read once the traversal has picked them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Concurrency {
    /// Inline, in depth-first pre-order.
    #[default]
    Sequential,
    /// One task per file on a worker pool. Fast but out-of-order.
    Parallel,
}
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GlobcatOptions {
    pub roots: Vec<PathBuf>,
    pub include: Vec<String>,
    pub exclude: Vec<String>,
    pub concurrency: Concurrency,
    /// Worker threads for [`Concurrency::Parallel`]; `None` uses one per CPU.
    pub workers: Option<usize>,
    pub ignore_empty: bool,
    pub text_only: bool,
    pub list_only: bool,
    pub classifier: ClassifierKind,
    pub utf8_boundary: Utf8Boundary,
    pub max_depth: Option<usize>,
    pub follow_links: bool,
    pub respect_gitignore: bool,
    pub include_hidden: bool,
}
impl Default for GlobcatOptions {
    fn default() -> Self {
        Self {
            roots: vec![PathBuf::from(".")],
            include: vec!["*".to_string()],
            exclude: vec![String::new()],
            concurrency: Concurrency::Sequential,
            workers: None,
            ignore_empty: true,
            text_only: true,
            list_only: false,
            classifier: ClassifierKind::Prefix,
            utf8_boundary: Utf8Boundary::Permissive,
            max_depth: None,
            follow_links: false,
            respect_gitignore: false,
            include_hidden: true,
        }
    }
}
#[derive(Debug, Default)]
pub struct GlobcatBuilder {
    options: GlobcatOptions,
}
impl GlobcatBuilder {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            options: GlobcatOptions {
                roots: vec![root.into()],
                ..Default::default()
            },
        }
    }
    pub fn roots(mut self, roots: Vec<PathBuf>) -> Self {
        self.options.roots = roots;
        self
    }
    /// An empty list falls back to `*`.
    pub fn include(mut self, patterns: Vec<String>) -> Self {
        self.options.include = if patterns.is_empty() {
            vec!["*".to_string()]
        } else {
            patterns
        };
        self
    }
    /// An empty list falls back to the no-op empty pattern.
    pub fn exclude(mut self, patterns: Vec<String>) -> Self {
        self.options.exclude = if patterns.is_empty() {
            vec![String::new()]
        } else {
            patterns
        };
        self
    }
    pub fn parallel(mut self, yes: bool) -> Self {
        self.options.concurrency = if yes {
            Concurrency::Parallel
        } else {
            Concurrency::Sequential
        };
        self
    }
    pub fn workers(mut self, workers: Option<usize>) -> Self {
        self.options.workers = workers;
        self
    }
    pub fn ignore_empty(mut self, yes: bool) -> Self {
        self.options.ignore_empty = yes;
        self
    }
    pub fn text_only(mut self, yes: bool) -> Self {
        self.options.text_only = yes;
        self
    }
    pub fn list_only(mut self, yes: bool) -> Self {
        self.options.list_only = yes;
        self
    }
    pub fn classifier(mut self, kind: ClassifierKind) -> Self {
        self.options.classifier = kind;
        self
    }
    pub fn utf8_boundary(mut self, boundary: Utf8Boundary) -> Self {
        self.options.utf8_boundary = boundary;
        self
    }
    pub fn max_depth(mut self, depth: usize) -> Self {
        self.options.max_depth = Some(depth);
        self
    }
    pub fn no_limit_depth(mut self) -> Self {
        self.options.max_depth = None;
        self
    }
    pub fn follow_links(mut self, yes: bool) -> Self {
        self.options.follow_links = yes;
        self
    }
    pub fn respect_gitignore(mut self, yes: bool) -> Self {
        self.options.respect_gitignore = yes;
        self
    }
    pub fn include_hidden(mut self, yes: bool) -> Self {
        self.options.include_hidden = yes;
        self
    }
    pub fn build(self) -> GlobcatOptions {
        self.options
    }
}
