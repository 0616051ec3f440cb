//! Command-line interface for globcat.
//!
//! Prints the path and content of every matching text file under the given
//! paths, recursively.

use clap::{ArgAction, Parser, ValueEnum};
use globcat::output::{self, DEFAULT_TEMPLATE, Presentation, WriterSink};
use globcat::roots::expand_roots;
use globcat::{ClassifierKind, GlobcatBuilder, GlobcatOptions, Utf8Boundary, run};
use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::PathBuf;
use std::process::exit;
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

/// globcat — print path and content of all files recursively
#[derive(Parser)]
#[command(name = "globcat", version, about, long_about = None)]
struct Cli {
    /// Paths or glob patterns to walk (default current dir)
    paths: Vec<String>,

    /// List files without displaying content
    #[arg(short, long)]
    list: bool,

    /// Include files matching pattern (can be repeated, default "*")
    #[arg(short, long)]
    include: Vec<String>,

    /// Exclude files and directories matching pattern (can be repeated)
    #[arg(short, long)]
    exclude: Vec<String>,

    /// Template for each file: first %s is the path, second the content
    #[arg(short = 'o', long, default_value = DEFAULT_TEMPLATE)]
    format: String,

    /// Output format
    #[arg(long, value_enum, default_value_t = OutputFormat::Template)]
    output_format: OutputFormat,

    /// Only display text files
    #[arg(long, default_value_t = true, action = ArgAction::Set)]
    text: bool,

    /// Ignore empty files
    #[arg(long, default_value_t = true, action = ArgAction::Set)]
    ignore_empty: bool,

    /// Trim trailing newlines and spaces from the end of files
    #[arg(long, default_value_t = true, action = ArgAction::Set)]
    trim_file_ending: bool,

    /// Read files in parallel: faster for lots of files, but out-of-order
    #[arg(long)]
    parallel: bool,

    /// Worker threads for --parallel (default one per CPU)
    #[arg(long)]
    workers: Option<usize>,

    /// Text detection strategy
    #[arg(long, value_enum, default_value_t = Classifier::Prefix)]
    classifier: Classifier,

    /// Treat a UTF-8 sequence cut off by the 512-byte sample as binary
    #[arg(long)]
    strict_utf8: bool,

    /// Max depth (unlimited if not set)
    #[arg(long)]
    max_depth: Option<usize>,

    /// Follow symlinks
    #[arg(long)]
    follow_links: bool,

    /// Honour .gitignore files
    #[arg(long)]
    gitignore: bool,

    /// Skip hidden files and directories
    #[arg(long)]
    no_hidden: bool,

    /// Write output to a file instead of stdout
    #[arg(long = "output", value_name = "FILE")]
    output: Option<PathBuf>,
}

#[derive(Copy, Clone, PartialEq, Eq, ValueEnum)]
enum OutputFormat {
    Template,
    Markdown,
    Json,
}

#[derive(Copy, Clone, PartialEq, Eq, ValueEnum)]
enum Classifier {
    Prefix,
    Inspector,
}

impl Cli {
    fn into_options(self, roots: Vec<PathBuf>) -> (GlobcatOptions, Presentation, Option<PathBuf>) {
        let mut builder = GlobcatBuilder::new(".")
            .roots(roots)
            .include(self.include)
            .exclude(self.exclude)
            .parallel(self.parallel)
            .workers(self.workers)
            .ignore_empty(self.ignore_empty)
            .text_only(self.text)
            .list_only(self.list)
            .classifier(match self.classifier {
                Classifier::Prefix => ClassifierKind::Prefix,
                Classifier::Inspector => ClassifierKind::Inspector,
            })
            .utf8_boundary(if self.strict_utf8 {
                Utf8Boundary::Strict
            } else {
                Utf8Boundary::Permissive
            })
            .follow_links(self.follow_links)
            .respect_gitignore(self.gitignore)
            .include_hidden(!self.no_hidden);

        builder = if let Some(depth) = self.max_depth {
            builder.max_depth(depth)
        } else {
            builder.no_limit_depth()
        };

        let presentation = Presentation {
            format: match self.output_format {
                OutputFormat::Template => output::OutputFormat::Template,
                OutputFormat::Markdown => output::OutputFormat::Markdown,
                OutputFormat::Json => output::OutputFormat::Json,
            },
            template: self.format,
            trim_file_ending: self.trim_file_ending,
        };

        (builder.build(), presentation, self.output)
    }
}

fn main() {
    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(io::stderr))
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .init();

    let cli = Cli::parse();
    let expansion = expand_roots(&cli.paths[..]);
    for error in &expansion.errors {
        eprintln!("{error}");
    }
    let (options, presentation, output) = cli.into_options(expansion.roots);

    match output {
        Some(path) => {
            let file = match File::create(&path) {
                Ok(f) => f,
                Err(e) => {
                    eprintln!("Error: {}: {}", path.display(), e);
                    exit(1);
                }
            };
            run_into(&options, WriterSink::new(BufWriter::new(file), presentation));
        }
        None => run_into(
            &options,
            WriterSink::new(BufWriter::new(io::stdout()), presentation),
        ),
    }
}

fn run_into<W: Write + Send>(options: &GlobcatOptions, sink: WriterSink<W>) {
    match run(options, &sink) {
        Ok(stats) => tracing::debug!(?stats, "done"),
        Err(e) => {
            eprintln!("Error: {}", e);
            exit(1);
        }
    }
    if let Err(e) = sink.finish() {
        eprintln!("Error: failed to flush output: {}", e);
        exit(1);
    }
}
