// Finding resource and native library directories in an unpacked package

mod file_finder;

pub use file_finder::{
    find_files_by_suffix, find_native_library_files, find_resource_xml_files, find_xml_files,
    is_raw_resource,
};

use crate::config::{is_excluded, Config};
use std::path::PathBuf;
use tracing::debug;
use walkdir::WalkDir;

const RESOURCE_DIRECTORY: &str = "res";
const LIBRARY_DIRECTORY: &str = "lib";

/// Where the resources and native libraries of a package live.
/// APK and app bundle layouts differ, so scans only see this trait.
pub trait PackageLayout: Sync {
    fn resource_directories(&self) -> Vec<PathBuf>;
    fn native_library_directories(&self) -> Vec<PathBuf>;
}

/// An APK or bundle unpacked on disk.
///
/// Every directory named `res` or `lib` below the root counts, so both the
/// flat APK layout and per-module bundle layouts (`base/res`,
/// `feature/lib`) are found. Hidden directories are never entered.
#[derive(Debug, Clone)]
pub struct UnpackedPackage {
    root: PathBuf,
    exclude: Vec<String>,
    resource_dirs: Vec<PathBuf>,
    library_dirs: Vec<PathBuf>,
}

impl UnpackedPackage {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            exclude: Vec::new(),
            resource_dirs: Vec::new(),
            library_dirs: Vec::new(),
        }
    }

    /// Discovery settings from the configuration. Explicit directories
    /// replace discovery, relative ones are taken from the root.
    pub fn with_config(mut self, config: &Config) -> Self {
        self.exclude = config.exclude.clone();
        self.resource_dirs = config.resource_dirs.iter().map(|d| self.root.join(d)).collect();
        self.library_dirs = config.library_dirs.iter().map(|d| self.root.join(d)).collect();
        self
    }

    fn find_directories_named(&self, wanted: &str) -> Vec<PathBuf> {
        let mut dirs: Vec<PathBuf> = WalkDir::new(&self.root)
            .follow_links(false)
            .into_iter()
            .filter_entry(|e| {
                let name = e.file_name().to_string_lossy();
                e.depth() == 0 || !name.starts_with('.')
            })
            .flatten()
            .filter(|e| e.file_type().is_dir() && e.file_name() == wanted)
            .map(|e| e.into_path())
            .filter(|path| !is_excluded(&self.exclude, path))
            .collect();
        dirs.sort();

        debug!(
            "Found {} '{}' directories under {}",
            dirs.len(),
            wanted,
            self.root.display()
        );
        dirs
    }
}

impl PackageLayout for UnpackedPackage {
    fn resource_directories(&self) -> Vec<PathBuf> {
        if !self.resource_dirs.is_empty() {
            return self.resource_dirs.clone();
        }
        self.find_directories_named(RESOURCE_DIRECTORY)
    }

    fn native_library_directories(&self) -> Vec<PathBuf> {
        if !self.library_dirs.is_empty() {
            return self.library_dirs.clone();
        }
        self.find_directories_named(LIBRARY_DIRECTORY)
    }
}
