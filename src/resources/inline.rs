use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};

/// A resource value simple enough to be inlined into code
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", content = "value", rename_all = "snake_case")]
pub enum InlinableValue {
    Int(u32),
    Bool(bool),
    Color(u32),
    String(String),
}

/// Resolve chains of resource references to already-known values.
///
/// `redirects` maps a resource id to the id it points at. For each id, the
/// chain is followed until it reaches an id present in `resolved`, which is
/// then recorded for the starting id as well. Chains ending in an unknown id
/// or running into a cycle are left unresolved.
///
/// Values are cloned into place, so callers that need every alias to share
/// one value should store a shared handle such as `Arc<T>`. Ids that already
/// have a value keep it, which makes repeated calls no-ops.
pub fn resolve_inlinable_refs<V: Clone>(
    redirects: &HashMap<u32, u32>,
    resolved: &mut HashMap<u32, V>,
) {
    for (&id, &target) in redirects {
        let mut current = target;
        let mut visited = HashSet::new();
        loop {
            if !visited.insert(current) {
                break;
            }
            if let Some(value) = resolved.get(&current) {
                let value = value.clone();
                resolved.entry(id).or_insert(value);
                break;
            }
            match redirects.get(&current) {
                Some(&next) => current = next,
                None => break,
            }
        }
    }
}
