// Parallel collection of class names and attribute values from the
// resource directories and native libraries of a package.

use super::{
    parse_keep_list, AttributeValueMap, NativeClassScanner, ResourceError, ResourceTable,
    StringOrReference, XmlCandidates, XmlExtractor,
};
use crate::config::Config;
use crate::discovery::{
    find_native_library_files, find_resource_xml_files, find_xml_files, is_raw_resource,
    PackageLayout,
};
use crate::java_names::external_to_internal;
use crate::scan::{worker_count, ScanTask, WorkQueue};
use rayon::prelude::*;
use serde::Serialize;
use std::collections::HashSet;
use std::fs::{self, File};
use std::io::{self, Read};
use std::path::{Path, PathBuf};
use std::sync::{Mutex, PoisonError};
use tracing::{debug, info, trace, warn};

/// Native libraries are read in chunks of this size
const NATIVE_READ_CHUNK: usize = 64 * 1024;

#[derive(Debug, Clone)]
pub struct CollectorOptions {
    /// Cap on XML reading threads
    pub xml_threads: usize,
    /// Cap on native library reading threads
    pub native_threads: usize,
    /// Resource subdirectories left out of class and attribute collection
    pub skip_dir_prefixes: Vec<String>,
}

impl Default for CollectorOptions {
    fn default() -> Self {
        Self::from(&Config::default())
    }
}

impl From<&Config> for CollectorOptions {
    fn from(config: &Config) -> Self {
        Self {
            xml_threads: config.xml_threads,
            native_threads: config.native_threads,
            skip_dir_prefixes: config.skip_dir_prefixes.clone(),
        }
    }
}

/// Result of a layout scan, with every reference resolved
#[derive(Debug, Default, Clone, Serialize)]
pub struct LayoutScan {
    /// Internal class names, e.g. `Lcom/example/CustomView;`
    pub classes: HashSet<String>,
    /// Attribute name to every literal value seen for it
    pub attributes: AttributeValueMap<String>,
}

/// Drives the work queue over the directories of one package
pub struct ResourceCollector<'a> {
    layout: &'a dyn PackageLayout,
    extractor: &'a dyn XmlExtractor,
    options: CollectorOptions,
}

impl<'a> ResourceCollector<'a> {
    pub fn new(layout: &'a dyn PackageLayout, extractor: &'a dyn XmlExtractor) -> Self {
        Self {
            layout,
            extractor,
            options: CollectorOptions::default(),
        }
    }

    pub fn with_options(mut self, options: CollectorOptions) -> Self {
        self.options = options;
        self
    }

    /// Seed the queue with a discovery task that pushes one task per file
    /// as it finds them, then hand each file to `process`. Returns the
    /// number of files processed.
    fn scan_files<D, P>(&self, threads: usize, discover: D, process: P) -> usize
    where
        D: Fn(&mut dyn FnMut(PathBuf)) + Sync,
        P: Fn(&Path) + Sync,
    {
        let queue = WorkQueue::new(worker_count(threads));
        trace!("Scanning with {} workers", queue.workers());
        let processed = queue.run(ScanTask::seed(), |state, task| match task {
            ScanTask::Discover => discover(&mut |path: PathBuf| state.push_task(ScanTask::File(path))),
            ScanTask::File(path) => process(&path),
        });
        processed.saturating_sub(1)
    }

    fn discover_resource_xml(&self, skip_dir_prefixes: &[String], push: &mut dyn FnMut(PathBuf)) {
        for dir in self.layout.resource_directories() {
            debug!("Scanning {} for xml files", dir.display());
            find_resource_xml_files(&dir, skip_dir_prefixes, &mut *push);
        }
    }

    /// Class names and values of `attributes` referenced from resource XML.
    ///
    /// References are resolved through `table` once every file has been
    /// read; a reference that resolves to nothing is dropped.
    pub fn collect_layout_classes_and_attributes(
        &self,
        attributes: &HashSet<String>,
        table: &dyn ResourceTable,
    ) -> LayoutScan {
        let shared = Mutex::new(XmlCandidates::new());
        let skip = &self.options.skip_dir_prefixes;

        let files = self.scan_files(
            self.options.xml_threads,
            |push| self.discover_resource_xml(skip, push),
            |path| match self.extractor.extract_from_file(path, attributes) {
                Ok(local) if !local.is_empty() => {
                    shared
                        .lock()
                        .unwrap_or_else(PoisonError::into_inner)
                        .merge(local);
                }
                Ok(_) => {}
                Err(e) => warn!("Skipping {}: {}", path.display(), e),
            },
        );

        let candidates = shared.into_inner().unwrap_or_else(PoisonError::into_inner);
        debug!(
            "Read {} xml files: {} class candidates, {} attributes",
            files,
            candidates.classes.len(),
            candidates.attributes.len()
        );

        let mut scan = LayoutScan::default();
        for candidate in candidates.classes {
            for value in resolve(table, candidate) {
                if !value.is_empty() {
                    scan.classes.insert(external_to_internal(&value));
                }
            }
        }
        for (name, candidates) in candidates.attributes {
            let values: Vec<String> = candidates
                .into_iter()
                .flat_map(|candidate| resolve(table, candidate))
                .collect();
            if !values.is_empty() {
                scan.attributes.entry(name).or_default().extend(values);
            }
        }
        scan
    }

    /// Every literal attribute value in every resource XML file
    pub fn collect_xml_attribute_string_values(&self) -> HashSet<String> {
        let shared = Mutex::new(HashSet::new());

        self.scan_files(
            self.options.xml_threads,
            |push| self.discover_resource_xml(&[], push),
            |path| match self.extractor.attribute_string_values(path) {
                Ok(local) if !local.is_empty() => {
                    shared
                        .lock()
                        .unwrap_or_else(PoisonError::into_inner)
                        .extend(local);
                }
                Ok(_) => {}
                Err(e) => warn!("Skipping {}: {}", path.display(), e),
            },
        );

        shared.into_inner().unwrap_or_else(PoisonError::into_inner)
    }

    /// Every string that looks like a class name in a native library
    pub fn get_native_classes(&self) -> HashSet<String> {
        let shared = Mutex::new(HashSet::new());

        let libraries = self.scan_files(
            self.options.native_threads,
            |push| {
                for dir in self.layout.native_library_directories() {
                    debug!("Scanning {} for so files for class names", dir.display());
                    find_native_library_files(&dir, &mut *push);
                }
            },
            |path| match scan_native_library(path) {
                Ok(local) if !local.is_empty() => {
                    shared
                        .lock()
                        .unwrap_or_else(PoisonError::into_inner)
                        .extend(local);
                }
                Ok(_) => {}
                Err(e) => warn!("Skipping native library: {}", e),
            },
        );

        let classes = shared.into_inner().unwrap_or_else(PoisonError::into_inner);
        debug!("Found {} class names in {} native libraries", classes.len(), libraries);
        classes
    }

    /// Resource names listed by `tools:keep` in raw resource XML files
    pub fn get_all_keep_resources(&self) -> HashSet<String> {
        let keep_files: Vec<PathBuf> = self
            .layout
            .resource_directories()
            .iter()
            .flat_map(|dir| find_xml_files(dir))
            .filter(|path| is_raw_resource(path))
            .collect();

        keep_files
            .par_iter()
            .map(|path| {
                let names = parse_keep_list(path);
                if !names.is_empty() {
                    let mut sorted: Vec<_> = names.iter().map(String::as_str).collect();
                    sorted.sort_unstable();
                    info!("Resources kept from file {}: {}", path.display(), sorted.join(", "));
                }
                names
            })
            .reduce(HashSet::new, |mut all, names| {
                all.extend(names);
                all
            })
    }
}

fn resolve(table: &dyn ResourceTable, candidate: StringOrReference) -> Vec<String> {
    match candidate {
        StringOrReference::Literal(value) => vec![value],
        StringOrReference::Reference(id) => table.resolve_string_values_for_resource_reference(id),
    }
}

fn scan_native_library(path: &Path) -> Result<HashSet<String>, ResourceError> {
    let mut file = File::open(path).map_err(|e| ResourceError::io(path, e))?;
    let mut buffer = vec![0u8; NATIVE_READ_CHUNK];
    let mut scanner = NativeClassScanner::new();

    loop {
        match file.read(&mut buffer) {
            Ok(0) => break,
            Ok(read) => scanner.feed(&buffer[..read]),
            Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
            Err(e) => return Err(ResourceError::io(path, e)),
        }
    }

    Ok(scanner.finish())
}

/// Classes named by a `META-INF/services` directory: each file name is a
/// service interface, each line of the file an implementation.
/// Blank lines and `#` comments are ignored.
pub fn get_service_loader_classes(dir: &Path) -> HashSet<String> {
    let mut classes = HashSet::new();
    let Ok(entries) = fs::read_dir(dir) else {
        return classes;
    };

    for entry in entries.flatten() {
        let path = entry.path();
        if !path.is_file() {
            continue;
        }
        classes.insert(external_to_internal(&entry.file_name().to_string_lossy()));

        match fs::read_to_string(&path) {
            Ok(contents) => {
                for line in contents.lines() {
                    let name = line.split('#').next().unwrap_or_default().trim();
                    if !name.is_empty() {
                        classes.insert(external_to_internal(name));
                    }
                }
            }
            Err(e) => warn!("Failed to read service file {}: {}", path.display(), e),
        }
    }

    classes
}

/// Classes named by a `;`-separated provider authorities string
pub fn parse_authorities(text: &str) -> HashSet<String> {
    text.split(';')
        .map(str::trim)
        .filter(|authority| !authority.is_empty())
        .map(external_to_internal)
        .collect()
}
