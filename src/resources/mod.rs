//! Android resource scanning
//!
//! Finds every string in an unpacked package that may name an application
//! class (layout XML, native libraries, service loader files) and resolves
//! resource references to the literal values they point at.
//!
//! Decoding the binary resource table and parsing individual XML files are
//! capabilities supplied by the caller through [`ResourceTable`] and
//! [`XmlExtractor`].

mod collector;
mod inline;
mod keep;
pub mod mutf8;
mod native;
mod table;

pub use collector::{
    get_service_loader_classes, parse_authorities, CollectorOptions, LayoutScan,
    ResourceCollector,
};
pub use inline::{resolve_inlinable_refs, InlinableValue};
pub use keep::parse_keep_list;
pub use native::{extract_classes_from_native_lib, NativeClassScanner};
pub use table::MemoryResourceTable;

use crate::graph::StyleMap;
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Resource scanning errors
#[derive(Error, Debug)]
pub enum ResourceError {
    #[error("Failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("Malformed XML in {path}: {message}")]
    Xml { path: PathBuf, message: String },
    #[error("Failed to parse resource table {path}: {source}")]
    Table {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

impl ResourceError {
    pub fn io(path: &Path, source: std::io::Error) -> Self {
        ResourceError::Io {
            path: path.to_path_buf(),
            source,
        }
    }
}

/// A value read from resource XML: either the literal text, or a resource
/// id that still has to be looked up in the resource table
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum StringOrReference {
    Literal(String),
    Reference(u32),
}

impl From<&str> for StringOrReference {
    fn from(value: &str) -> Self {
        StringOrReference::Literal(value.to_string())
    }
}

/// Attribute name to every value seen for it; repeated pairs are kept
pub type AttributeValueMap<V> = HashMap<String, Vec<V>>;

/// Raw candidates extracted from one XML file
#[derive(Debug, Default, Clone)]
pub struct XmlCandidates {
    pub classes: HashSet<StringOrReference>,
    pub attributes: AttributeValueMap<StringOrReference>,
}

impl XmlCandidates {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.classes.is_empty() && self.attributes.is_empty()
    }

    pub fn add_attribute(&mut self, name: &str, value: StringOrReference) {
        self.attributes
            .entry(name.to_string())
            .or_default()
            .push(value);
    }

    pub fn merge(&mut self, other: XmlCandidates) {
        self.classes.extend(other.classes);
        for (name, values) in other.attributes {
            self.attributes.entry(name).or_default().extend(values);
        }
    }
}

/// Read access to a decoded resource table
pub trait ResourceTable {
    /// Every literal string a reference can resolve to. A reference may have
    /// a different value per configuration; an unknown id yields nothing.
    fn resolve_string_values_for_resource_reference(&self, id: u32) -> Vec<String>;

    /// Every style definition, keyed by resource id
    fn get_style_map(&self) -> StyleMap;
}

/// Per-file XML extraction
pub trait XmlExtractor: Sync {
    /// Class name and attribute candidates from one XML file.
    /// `attributes` names the attributes whose values should be collected.
    fn extract_from_file(
        &self,
        path: &Path,
        attributes: &HashSet<String>,
    ) -> Result<XmlCandidates, ResourceError>;

    /// Every literal attribute value in one XML file
    fn attribute_string_values(&self, path: &Path) -> Result<HashSet<String>, ResourceError>;
}
