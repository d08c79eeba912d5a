mod work_queue;

pub use work_queue::{worker_count, WorkQueue, WorkerState};

use std::path::PathBuf;

/// Unit of work for a directory scan.
///
/// A run is seeded with a single `Discover` task; the worker that draws it
/// walks the directories and pushes one `File` task per matching file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ScanTask {
    Discover,
    File(PathBuf),
}

impl ScanTask {
    /// Seed list for a self-feeding scan
    pub fn seed() -> Vec<ScanTask> {
        vec![ScanTask::Discover]
    }
}
