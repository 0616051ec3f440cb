//! Hand-off point between file handling and whatever consumes the results.
//!
//! In parallel mode every file is handled on a worker thread, so a sink is
//! shared across threads. Each call carries one complete record; a sink must
//! emit it as a unit. Ordering across records is not guaranteed in parallel
//! mode.

use crate::error::GlobcatError;
use crate::types::FileRecord;
use std::sync::{Mutex, MutexGuard, PoisonError};

pub trait Sink: Send + Sync {
    /// Receives one accepted file.
    fn emit(&self, record: FileRecord);
    /// Receives one per-path failure. The walk carries on afterwards.
    fn report(&self, error: GlobcatError);
}

/// Collects records and errors in memory.
#[derive(Debug, Default)]
pub struct Collector {
    files: Mutex<Vec<FileRecord>>,
    errors: Mutex<Vec<GlobcatError>>,
}

impl Collector {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn into_parts(self) -> (Vec<FileRecord>, Vec<GlobcatError>) {
        (
            self.files.into_inner().unwrap_or_else(PoisonError::into_inner),
            self.errors.into_inner().unwrap_or_else(PoisonError::into_inner),
        )
    }
}

pub(crate) fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

impl Sink for Collector {
    fn emit(&self, record: FileRecord) {
        lock(&self.files).push(record);
    }

    fn report(&self, error: GlobcatError) {
        lock(&self.errors).push(error);
    }
}
