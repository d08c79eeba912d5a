use super::{resolve_inlinable_refs, ResourceError, ResourceTable};
use crate::graph::{StyleDefinition, StyleMap};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fs;
use std::path::Path;
use std::sync::Arc;
use tracing::debug;

/// Resource table held in memory, loadable from a JSON dump:
///
/// ```json
/// {
///   "strings": { "2131034112": ["com.example.CustomView"] },
///   "references": { "2131034113": 2131034112 },
///   "styles": { "2131165184": [{ "parent": 0 }] }
/// }
/// ```
#[derive(Debug, Default, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct MemoryResourceTable {
    /// String values per resource id, one per configuration
    strings: HashMap<u32, Vec<String>>,
    /// Resource ids whose value is a reference to another resource
    references: HashMap<u32, u32>,
    styles: StyleMap,
    #[serde(skip)]
    resolved: HashMap<u32, Arc<Vec<String>>>,
}

impl MemoryResourceTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_file(path: &Path) -> Result<Self, ResourceError> {
        let contents = fs::read_to_string(path).map_err(|e| ResourceError::io(path, e))?;
        Self::from_json(&contents).map_err(|source| ResourceError::Table {
            path: path.to_path_buf(),
            source,
        })
    }

    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        let mut table: Self = serde_json::from_str(json)?;
        table.reindex();
        Ok(table)
    }

    pub fn with_string(mut self, id: u32, value: &str) -> Self {
        self.strings.entry(id).or_default().push(value.to_string());
        self.reindex();
        self
    }

    pub fn with_reference(mut self, id: u32, target: u32) -> Self {
        self.references.insert(id, target);
        self.reindex();
        self
    }

    pub fn with_style(mut self, style: StyleDefinition) -> Self {
        self.styles.entry(style.id).or_default().push(style);
        self
    }

    /// Resolve reference chains so that lookups are a single map access
    fn reindex(&mut self) {
        for (id, definitions) in self.styles.iter_mut() {
            for style in definitions {
                style.id = *id;
            }
        }

        self.resolved = self
            .strings
            .iter()
            .map(|(&id, values)| (id, Arc::new(values.clone())))
            .collect();
        resolve_inlinable_refs(&self.references, &mut self.resolved);

        debug!(
            "Resource table: {} strings, {} references ({} resolvable), {} styles",
            self.strings.len(),
            self.references.len(),
            self.resolved.len() - self.strings.len(),
            self.styles.len()
        );
    }
}

impl ResourceTable for MemoryResourceTable {
    fn resolve_string_values_for_resource_reference(&self, id: u32) -> Vec<String> {
        self.resolved
            .get(&id)
            .map(|values| values.as_ref().clone())
            .unwrap_or_default()
    }

    fn get_style_map(&self) -> StyleMap {
        self.styles.clone()
    }
}
