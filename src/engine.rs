use crate::classify::{self, SAMPLE_SIZE};
use crate::error::GlobcatError;
use crate::options::{Concurrency, GlobcatOptions};
use crate::pattern::{Entry, PatternSet};
use crate::sink::{Collector, Sink};
use crate::types::{FileRecord, GlobcatResult, WalkStats};
use ignore::{DirEntry, WalkBuilder};
use std::fs::File;
use std::io::{BufReader, Read};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
#[derive(Debug, Default)]
struct Counters {
    selected: AtomicUsize,
    emitted: AtomicUsize,
    skipped: AtomicUsize,
    pruned: AtomicUsize,
    errors: AtomicUsize,
}
impl Counters {
    fn bump(counter: &AtomicUsize) {
        counter.fetch_add(1, Ordering::Relaxed);
    }
    fn snapshot(&self) -> WalkStats {
        WalkStats {
            files_selected: self.selected.load(Ordering::Relaxed),
            files_emitted: self.emitted.load(Ordering::Relaxed),
            files_skipped: self.skipped.load(Ordering::Relaxed),
            dirs_pruned: self.pruned.load(Ordering::Relaxed),
            errors: self.errors.load(Ordering::Relaxed),
        }
    }
}
/// A file that passed the include/exclude test.
struct FileJob {
    path: PathBuf,
    relative: String,
}
struct Walker {
    inner: ignore::Walk,
    root: PathBuf,
    include: PatternSet,
    exclude: Arc<PatternSet>,
}
impl Walker {
    fn new(root: &Path, options: &GlobcatOptions, counters: &Arc<Counters>) -> Self {
        let include = PatternSet::new(&options.include);
        let exclude = Arc::new(PatternSet::new(&options.exclude));
        let mut builder = WalkBuilder::new(root);
        builder
            .standard_filters(false)
            .git_ignore(options.respect_gitignore)
            .require_git(false)
            .hidden(!options.include_hidden)
            .max_depth(options.max_depth)
            .follow_links(options.follow_links)
            .sort_by_file_name(|a, b| a.cmp(b));
        let prune_root = root.to_path_buf();
        let prune = Arc::clone(&exclude);
        let counters = Arc::clone(counters);
        // Directories are pruned on the exclude set alone; include patterns
        // only ever select files.
        builder.filter_entry(move |entry| {
            if entry.depth() == 0 || !is_dir(entry) {
                return true;
            }
            let relative = relative_path(&prune_root, entry.path());
            if prune.matches(&Entry::new(&relative, true)) {
                tracing::debug!(path = %entry.path().display(), "pruning excluded directory");
                Counters::bump(&counters.pruned);
                return false;
            }
            true
        });
        Self {
            inner: builder.build(),
            root: root.to_path_buf(),
            include,
            exclude,
        }
    }
    /// Traverses depth-first in file-name order and hands every selected
    /// file to `dispatch`. The root itself is never filtered.
    fn for_each_file(self, sink: &dyn Sink, counters: &Counters, mut dispatch: impl FnMut(FileJob)) {
        for result in self.inner {
            let entry = match result {
                Ok(entry) => entry,
                Err(err) => {
                    Counters::bump(&counters.errors);
                    sink.report(walk_error(&self.root, &err));
                    continue;
                }
            };
            if is_dir(&entry) {
                continue;
            }
            if !is_regular_file(&entry) {
                tracing::debug!(path = %entry.path().display(), "skipping special file");
                continue;
            }
            let relative = relative_path(&self.root, entry.path());
            if entry.depth() > 0 {
                let candidate = Entry::new(&relative, false);
                if !self.include.matches(&candidate) || self.exclude.matches(&candidate) {
                    continue;
                }
            }
            Counters::bump(&counters.selected);
            dispatch(FileJob {
                path: display_path(entry.path()),
                relative,
            });
        }
    }
}
fn is_dir(entry: &DirEntry) -> bool {
    entry.file_type().is_some_and(|t| t.is_dir())
}
fn is_regular_file(entry: &DirEntry) -> bool {
    entry
        .file_type()
        .is_some_and(|t| t.is_file() || (t.is_symlink() && entry.path().is_file()))
}
fn relative_path(root: &Path, path: &Path) -> String {
    let relative = path.strip_prefix(root).unwrap_or(path);
    relative
        .components()
        .map(|c| c.as_os_str().to_string_lossy())
        .collect::<Vec<_>>()
        .join("/")
}
fn display_path(path: &Path) -> PathBuf {
    path.strip_prefix(".").unwrap_or(path).to_path_buf()
}
fn walk_error<'a>(root: &'a Path, mut err: &'a ignore::Error) -> GlobcatError {
    let mut path = root;
    loop {
        match err {
            ignore::Error::WithPath { path: at, err: inner } => {
                path = at.as_path();
                err = &**inner;
            }
            ignore::Error::WithDepth { err: inner, .. }
            | ignore::Error::WithLineNumber { err: inner, .. } => err = &**inner,
            _ => break,
        }
    }
    if let ignore::Error::Loop { child, .. } = err {
        path = child.as_path();
    }
    GlobcatError::Walk {
        path: path.to_path_buf(),
        message: err.to_string(),
    }
}
fn read_file(job: FileJob, options: &GlobcatOptions) -> Result<Option<FileRecord>, GlobcatError> {
    let FileJob { path, relative } = job;
    let file = File::open(&path).map_err(|e| GlobcatError::io(&path, e))?;
    let size = file
        .metadata()
        .map_err(|e| GlobcatError::io(&path, e))?
        .len();
    if size == 0 && options.ignore_empty {
        tracing::debug!(path = %path.display(), "skipping empty file");
        return Ok(None);
    }
    let mut reader = BufReader::new(file);
    let mut content = Vec::new();
    let mut encoding = None;
    if options.text_only && size > 0 {
        reader
            .by_ref()
            .take(SAMPLE_SIZE as u64)
            .read_to_end(&mut content)
            .map_err(|e| GlobcatError::io(&path, e))?;
        let sample_is_full_file = size <= content.len() as u64;
        let label = classify::run(
            options.classifier,
            &content,
            sample_is_full_file,
            options.utf8_boundary,
        );
        if !label.is_text() {
            tracing::debug!(path = %path.display(), "skipping binary file");
            return Ok(None);
        }
        encoding = Some(label);
    }
    let content = if options.list_only {
        None
    } else {
        reader
            .read_to_end(&mut content)
            .map_err(|e| GlobcatError::io(&path, e))?;
        Some(content)
    };
    Ok(Some(FileRecord {
        path,
        relative,
        encoding,
        content,
    }))
}
fn handle_file(job: FileJob, options: &GlobcatOptions, sink: &dyn Sink, counters: &Counters) {
    match read_file(job, options) {
        Ok(Some(record)) => {
            Counters::bump(&counters.emitted);
            sink.emit(record);
        }
        Ok(None) => Counters::bump(&counters.skipped),
        Err(err) => {
            Counters::bump(&counters.errors);
            sink.report(err);
        }
    }
}
/// Where per-file handling runs.
enum Dispatch {
    Inline,
    #[cfg(feature = "parallel")]
    Pool(rayon::ThreadPool),
}
impl Dispatch {
    fn new(options: &GlobcatOptions) -> Result<Self, GlobcatError> {
        match options.concurrency {
            Concurrency::Sequential => Ok(Dispatch::Inline),
            #[cfg(feature = "parallel")]
            Concurrency::Parallel => rayon::ThreadPoolBuilder::new()
                .num_threads(options.workers.unwrap_or(0))
                .thread_name(|i| format!("globcat-worker-{i}"))
                .build()
                .map(Dispatch::Pool)
                .map_err(|e| GlobcatError::ThreadPool(e.to_string())),
            #[cfg(not(feature = "parallel"))]
            Concurrency::Parallel => {
                tracing::debug!("built without the `parallel` feature, reading files inline");
                Ok(Dispatch::Inline)
            }
        }
    }
}
fn walk_with(
    dispatch: &Dispatch,
    root: &Path,
    options: &GlobcatOptions,
    sink: &dyn Sink,
) -> WalkStats {
    tracing::debug!(root = %root.display(), "starting walk");
    let counters = Arc::new(Counters::default());
    let walker = Walker::new(root, options, &counters);
    let counters_ref: &Counters = &counters;
    match dispatch {
        Dispatch::Inline => walker.for_each_file(sink, counters_ref, |job| {
            handle_file(job, options, sink, counters_ref)
        }),
        // Traversal stays on this thread; the scope joins every spawned read
        // before returning.
        #[cfg(feature = "parallel")]
        Dispatch::Pool(pool) => pool.in_place_scope(|scope| {
            walker.for_each_file(sink, counters_ref, |job| {
                scope.spawn(move |_| handle_file(job, options, sink, counters_ref));
            })
        }),
    }
    let stats = counters.snapshot();
    tracing::debug!(root = %root.display(), ?stats, "walk finished");
    stats
}
/// Walks a single root, emitting every accepted file to `sink`.
///
/// Per-path failures go to [`Sink::report`] and never stop the walk. The only
/// error returned is a failure to set up the worker pool.
pub fn walk(
    root: impl AsRef<Path>,
    options: &GlobcatOptions,
    sink: &dyn Sink,
) -> Result<WalkStats, GlobcatError> {
    let dispatch = Dispatch::new(options)?;
    Ok(walk_with(&dispatch, root.as_ref(), options, sink))
}
/// Walks every root in `options.roots`, in order, sharing one worker pool.
pub fn run(options: &GlobcatOptions, sink: &dyn Sink) -> Result<WalkStats, GlobcatError> {
    let dispatch = Dispatch::new(options)?;
    let mut stats = WalkStats::default();
    for root in &options.roots {
        stats.merge(walk_with(&dispatch, root, options, sink));
    }
    Ok(stats)
}
/// Runs over every root and collects the accepted files in memory.
pub fn globcat(options: GlobcatOptions) -> Result<GlobcatResult, GlobcatError> {
    let collector = Collector::new();
    let stats = run(&options, &collector)?;
    let (files, errors) = collector.into_parts();
    Ok(GlobcatResult {
        files,
        errors,
        stats,
    })
}
