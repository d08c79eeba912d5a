// Directory walking helpers shared by every scan

use std::collections::HashSet;
use std::fs;
use std::path::{Component, Path, PathBuf};
use tracing::trace;
use walkdir::WalkDir;

const XML_SUFFIX: &str = ".xml";
const NATIVE_LIBRARY_SUFFIX: &str = ".so";

fn ends_with_suffix(path: &Path, suffix: &str) -> bool {
    path.file_name()
        .map(|name| name.to_string_lossy().ends_with(suffix))
        .unwrap_or(false)
}

/// Every regular file below `dir` (recursively) whose name ends with `suffix`.
/// A missing directory yields an empty set.
pub fn find_files_by_suffix(dir: &Path, suffix: &str) -> HashSet<PathBuf> {
    if !dir.is_dir() {
        trace!("Directory does not exist: {}", dir.display());
        return HashSet::new();
    }

    WalkDir::new(dir)
        .follow_links(false)
        .into_iter()
        .filter_map(|entry| entry.ok())
        .filter(|entry| entry.file_type().is_file())
        .filter(|entry| ends_with_suffix(entry.path(), suffix))
        .map(|entry| entry.into_path())
        .collect()
}

pub fn find_xml_files(dir: &Path) -> HashSet<PathBuf> {
    find_files_by_suffix(dir, XML_SUFFIX)
}

/// Calls `handler` for every XML file of a resource directory.
///
/// Resource files live one level down (`res/layout/main.xml`); immediate
/// subdirectories whose name starts with one of `skip_dir_prefixes` are not
/// entered. XML files directly inside `res_dir` are reported too, since
/// packagers that shorten resource paths may flatten the layout.
pub fn find_resource_xml_files<F>(res_dir: &Path, skip_dir_prefixes: &[String], mut handler: F)
where
    F: FnMut(PathBuf),
{
    let Ok(entries) = fs::read_dir(res_dir) else {
        trace!("Cannot list resource directory: {}", res_dir.display());
        return;
    };

    for entry in entries.flatten() {
        let path = entry.path();
        if path.is_dir() {
            let name = entry.file_name();
            let name = name.to_string_lossy();
            if skip_dir_prefixes
                .iter()
                .any(|prefix| name.starts_with(prefix.as_str()))
            {
                trace!("Skipping resource directory: {}", path.display());
                continue;
            }

            let Ok(files) = fs::read_dir(&path) else {
                continue;
            };
            for file in files.flatten() {
                let file_path = file.path();
                if file_path.is_file() && ends_with_suffix(&file_path, XML_SUFFIX) {
                    handler(file_path);
                }
            }
        } else if path.is_file() && ends_with_suffix(&path, XML_SUFFIX) {
            handler(path);
        }
    }
}

/// Calls `handler` for every `.so` file below `lib_dir`, recursively
pub fn find_native_library_files<F>(lib_dir: &Path, mut handler: F)
where
    F: FnMut(PathBuf),
{
    for path in find_files_by_suffix(lib_dir, NATIVE_LIBRARY_SUFFIX) {
        trace!("Checking lib: {}", path.display());
        handler(path);
    }
}

/// Whether `path` is inside a `res/raw` or `res/raw-<qualifier>` directory
pub fn is_raw_resource(path: &Path) -> bool {
    let components: Vec<_> = path
        .components()
        .filter_map(|component| match component {
            Component::Normal(name) => Some(name.to_string_lossy()),
            _ => None,
        })
        .collect();

    components.windows(2).any(|pair| {
        pair[0] == "res" && (pair[1] == "raw" || pair[1].starts_with("raw-"))
    })
}
