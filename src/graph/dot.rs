// Graphviz export of the style graph. Output is sorted by style id so the
// same table always produces the same text.

use super::StyleInfo;
use std::collections::{BTreeMap, BTreeSet, HashMap};
use std::fmt::Write;

/// Extra Graphviz attributes per style id, e.g. `color` or `label`
pub type NodeOptions = HashMap<u32, HashMap<String, String>>;

impl StyleInfo {
    /// DOT text with ids rendered as hex, e.g. `0x7f0f0001`
    pub fn to_dot(&self, exclude_isolated: bool) -> String {
        self.to_dot_with(
            |id| format!("0x{id:x}"),
            &NodeOptions::new(),
            exclude_isolated,
        )
    }

    /// DOT text using `stringify` for default labels.
    ///
    /// Options in `node_options` are emitted verbatim, sorted by key; a
    /// `label` option replaces the default label.
    pub fn to_dot_with<F>(
        &self,
        stringify: F,
        node_options: &NodeOptions,
        exclude_isolated: bool,
    ) -> String
    where
        F: Fn(u32) -> String,
    {
        let graph = self.graph();
        let mut ordered_nodes = BTreeSet::new();
        let mut ordered_edges: BTreeMap<u32, BTreeSet<u32>> = BTreeMap::new();

        for node in graph.node_indices() {
            let id = graph[node];
            let mut has_outbound_edges = false;
            for child in graph.neighbors(node) {
                has_outbound_edges = true;
                let child_id = graph[child];
                ordered_nodes.insert(child_id);
                ordered_edges.entry(id).or_default().insert(child_id);
            }
            if !exclude_isolated || has_outbound_edges {
                ordered_nodes.insert(id);
            }
        }

        let mut out = String::new();
        out.push_str("digraph {\n");
        for id in ordered_nodes {
            let mut attrs = Vec::new();
            let mut emitted_label = false;
            if let Some(options) = node_options.get(&id) {
                let sorted: BTreeMap<_, _> = options.iter().collect();
                for (key, value) in sorted {
                    emitted_label |= key == "label";
                    attrs.push(format!("{key}=\"{value}\""));
                }
            }
            if !emitted_label {
                attrs.push(format!("label=\"{}\"", stringify(id)));
            }
            let _ = writeln!(out, "  node{id} [{}];", attrs.join(" "));
        }
        out.push_str("  subgraph parents_edges {\n");
        for (id, children) in &ordered_edges {
            for child in children {
                let _ = writeln!(out, "    node{id} -> node{child};");
            }
        }
        out.push_str("  }\n");
        out.push_str("}\n");
        out
    }
}
