//! Presentation of accepted files.
//!
//! Renders a [`FileRecord`] as a printf-style template, a Markdown section or
//! a JSON line, and provides [`WriterSink`], which writes each rendered record
//! to a shared writer in a single locked call.

use crate::classify::Encoding;
use crate::error::GlobcatError;
use crate::sink::{Sink, lock};
use crate::types::FileRecord;
use serde::Serialize;
use std::borrow::Cow;
use std::io::{self, Write};
use std::path::Path;
use std::sync::Mutex;

/// Path, then content, each `%s` filled in order.
pub const DEFAULT_TEMPLATE: &str = "%s\n---\n%s\n---\n\n";

/// Supported output formats.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutputFormat {
    #[default]
    Template,
    Markdown,
    Json,
}

#[derive(Debug, Clone)]
pub struct Presentation {
    pub format: OutputFormat,
    /// Used by [`OutputFormat::Template`]. `%s` takes the next of path and
    /// content, `%%` is a literal percent sign.
    pub template: String,
    /// Strip trailing `'\n'` and `' '` bytes from the content. Tabs and
    /// carriage returns are kept.
    pub trim_file_ending: bool,
}

impl Default for Presentation {
    fn default() -> Self {
        Self {
            format: OutputFormat::Template,
            template: DEFAULT_TEMPLATE.to_string(),
            trim_file_ending: true,
        }
    }
}

#[derive(Serialize)]
struct JsonRecord<'a> {
    path: Cow<'a, str>,
    relative: &'a str,
    encoding: Option<Encoding>,
    #[serde(skip_serializing_if = "Option::is_none")]
    content: Option<Cow<'a, str>>,
}

impl Presentation {
    pub fn render(&self, record: &FileRecord) -> Vec<u8> {
        let mut out = Vec::new();
        self.render_into(record, &mut out);
        out
    }

    pub fn render_into(&self, record: &FileRecord, out: &mut Vec<u8>) {
        let path = record.path.display().to_string();
        let content = record
            .content
            .as_deref()
            .map(|c| if self.trim_file_ending { trim_end(c) } else { c });
        match (self.format, content) {
            (OutputFormat::Json, content) => {
                let line = JsonRecord {
                    path: Cow::Owned(path),
                    relative: &record.relative,
                    encoding: record.encoding,
                    content: content.map(String::from_utf8_lossy),
                };
                match serde_json::to_writer(&mut *out, &line) {
                    Ok(()) => out.push(b'\n'),
                    Err(e) => tracing::error!(path = %record.path.display(), "JSON serialization error: {e}"),
                }
            }
            (OutputFormat::Template, None) => {
                out.extend_from_slice(path.as_bytes());
                out.push(b'\n');
            }
            (OutputFormat::Markdown, None) => {
                out.extend_from_slice(format!("- {path}\n").as_bytes());
            }
            (OutputFormat::Template, Some(content)) => {
                fill_template(&self.template, &[path.as_bytes(), content], out);
            }
            (OutputFormat::Markdown, Some(content)) => {
                let lang = fence_language(&record.path);
                out.extend_from_slice(format!("## {path}\n\n```{lang}\n").as_bytes());
                let text = String::from_utf8_lossy(content);
                out.extend_from_slice(text.as_bytes());
                if !text.is_empty() && !text.ends_with('\n') {
                    out.push(b'\n');
                }
                out.extend_from_slice(b"```\n\n");
            }
        }
    }
}

/// Renders every record into one buffer, in the given order.
pub fn render_records(records: &[FileRecord], presentation: &Presentation) -> Vec<u8> {
    let mut out = Vec::with_capacity(1024);
    for record in records {
        presentation.render_into(record, &mut out);
    }
    out
}

/// A [`Sink`] that writes each record to `W` under one lock, so concurrent
/// files never interleave mid-record. Errors go to stderr.
#[derive(Debug)]
pub struct WriterSink<W: Write + Send> {
    out: Mutex<W>,
    presentation: Presentation,
}

impl<W: Write + Send> WriterSink<W> {
    pub fn new(out: W, presentation: Presentation) -> Self {
        Self {
            out: Mutex::new(out),
            presentation,
        }
    }

    /// Flushes and returns the writer.
    pub fn finish(self) -> io::Result<W> {
        let mut out = self
            .out
            .into_inner()
            .unwrap_or_else(std::sync::PoisonError::into_inner);
        out.flush()?;
        Ok(out)
    }
}

impl<W: Write + Send> Sink for WriterSink<W> {
    fn emit(&self, record: FileRecord) {
        let rendered = self.presentation.render(&record);
        if let Err(e) = lock(&self.out).write_all(&rendered) {
            tracing::error!(path = %record.path.display(), "write failed: {e}");
        }
    }

    fn report(&self, error: GlobcatError) {
        eprintln!("{error}");
    }
}

fn fill_template(template: &str, args: &[&[u8]], out: &mut Vec<u8>) {
    let mut args = args.iter();
    let mut rest = template;
    while let Some(i) = rest.find('%') {
        out.extend_from_slice(rest[..i].as_bytes());
        let tail = &rest[i + 1..];
        if let Some(after) = tail.strip_prefix('s') {
            out.extend_from_slice(args.next().copied().unwrap_or_default());
            rest = after;
        } else if let Some(after) = tail.strip_prefix('%') {
            out.push(b'%');
            rest = after;
        } else {
            out.push(b'%');
            rest = tail;
        }
    }
    out.extend_from_slice(rest.as_bytes());
}

fn trim_end(content: &[u8]) -> &[u8] {
    let keep = content
        .iter()
        .rposition(|&b| b != b'\n' && b != b' ')
        .map_or(0, |last| last + 1);
    &content[..keep]
}

/// Fence tags keyed by file extension; unknown extensions get a bare fence.
const FENCE_TAGS: &[(&[&str], &str)] = &[
    (&["rs"], "rust"),
    (&["go"], "go"),
    (&["py"], "python"),
    (&["js", "mjs", "cjs"], "javascript"),
    (&["ts"], "typescript"),
    (&["c", "h"], "c"),
    (&["cc", "cpp", "cxx", "hpp"], "cpp"),
    (&["sh", "bash"], "bash"),
    (&["toml"], "toml"),
    (&["yaml", "yml"], "yaml"),
    (&["json"], "json"),
    (&["md", "markdown"], "markdown"),
    (&["html", "htm"], "html"),
    (&["txt"], "text"),
];

fn fence_language(path: &Path) -> &'static str {
    let Some(ext) = path.extension().and_then(|e| e.to_str()) else {
        return "";
    };
    FENCE_TAGS
        .iter()
        .find(|(exts, _)| exts.contains(&ext))
        .map_or("", |&(_, tag)| tag)
}
