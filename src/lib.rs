//! # Globcat
//!
//! `globcat` walks one or more directory trees, selects files with ordered
//! include/exclude glob patterns, sniffs the first 512 bytes of each to skip
//! binaries, and hands the path and content of every accepted file to a
//! [`Sink`].
//!
//! Directories are pruned on the exclude patterns alone; files must match an
//! include pattern and no exclude pattern. See [`PatternSet`] for the pattern
//! rules and [`classify`] for the encoding heuristic.
//!
//! Reading can run inline, in depth-first order, or on a worker pool
//! ([`Concurrency::Parallel`]), which is faster but emits files in no
//! particular order. Directory traversal itself is always single-threaded.
//!
//! # Features
//!
//! - `parallel` (default): worker-pool file reads using Rayon. Without it,
//!   parallel mode reads inline.
//!
//! # Example
//!
//! ```no_run
//! use globcat::{GlobcatBuilder, globcat};
//!
//! let options = GlobcatBuilder::new(".")
//!     .include(vec!["*.rs".into()])
//!     .exclude(vec!["target/".into()])
//!     .build();
//!
//! let result = globcat(options).expect("Failed to scan directory");
//!
//! for file in &result.files {
//!     println!("{} ({:?})", file.path.display(), file.encoding);
//! }
//! for error in &result.errors {
//!     eprintln!("{error}");
//! }
//! ```

mod classify;
mod engine;
mod error;
mod options;
pub mod output;
mod pattern;
pub mod roots;
mod sink;
mod types;

pub use classify::{
    ClassifierKind, Encoding, SAMPLE_SIZE, Utf8Boundary, classify, classify_with, inspect,
};
pub use engine::{globcat, run, walk};
pub use error::GlobcatError;
pub use options::{Concurrency, GlobcatBuilder, GlobcatOptions};
pub use pattern::{Entry, PatternSet};
pub use sink::{Collector, Sink};
pub use types::{FileRecord, GlobcatResult, WalkStats};
