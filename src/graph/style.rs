use petgraph::graph::{DiGraph, NodeIndex};
use petgraph::Direction;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap, HashSet};
use tracing::debug;

/// Value of one attribute set by a style
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum StyleValue {
    /// Reference to another resource
    Reference { id: u32 },
    /// Raw typed data, as stored in `Res_value`
    Data { data_type: u8, data: u32 },
    /// Literal string
    String { value: String },
}

/// One definition of a style in one device configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StyleDefinition {
    /// Filled from the style map key when missing
    #[serde(default)]
    pub id: u32,
    /// Parent style id, 0 when the style does not inherit
    #[serde(default)]
    pub parent: u32,
    /// Attribute id to the value this definition sets
    #[serde(default)]
    pub attributes: BTreeMap<u32, StyleValue>,
}

impl StyleDefinition {
    pub fn new(id: u32, parent: u32) -> Self {
        Self {
            id,
            parent,
            attributes: BTreeMap::new(),
        }
    }

    pub fn with_attribute(mut self, attr: u32, value: StyleValue) -> Self {
        self.attributes.insert(attr, value);
        self
    }
}

/// Every style definition, keyed by style id
pub type StyleMap = HashMap<u32, Vec<StyleDefinition>>;

/// Style inheritance graph.
///
/// One node per style id in the table. An edge runs from a parent to each
/// style that inherits from it, one per definition, so a style defined with
/// different parents in different configurations has several incoming edges.
/// Parents outside the table (framework styles) produce no edge.
#[derive(Debug)]
pub struct StyleInfo {
    styles: StyleMap,
    graph: DiGraph<u32, ()>,
    id_to_node: HashMap<u32, NodeIndex>,
}

impl StyleInfo {
    /// Build the graph from a snapshot of the style table
    pub fn build(styles: StyleMap) -> Self {
        debug!("Building style graph; style count = {}", styles.len());

        let mut graph = DiGraph::with_capacity(styles.len(), styles.len());
        let mut id_to_node = HashMap::with_capacity(styles.len());
        for &id in styles.keys() {
            id_to_node.insert(id, graph.add_node(id));
        }

        for (id, definitions) in &styles {
            let child = id_to_node[id];
            for style in definitions {
                if style.parent == 0 {
                    continue;
                }
                if let Some(&parent) = id_to_node.get(&style.parent) {
                    graph.add_edge(parent, child, ());
                }
            }
        }

        Self {
            styles,
            graph,
            id_to_node,
        }
    }

    pub fn styles(&self) -> &StyleMap {
        &self.styles
    }

    pub fn node_count(&self) -> usize {
        self.graph.node_count()
    }

    pub fn edge_count(&self) -> usize {
        self.graph.edge_count()
    }

    pub(super) fn graph(&self) -> &DiGraph<u32, ()> {
        &self.graph
    }

    fn node(&self, id: u32) -> NodeIndex {
        match self.id_to_node.get(&id) {
            Some(&node) => node,
            None => panic!("style 0x{id:x} is not part of the style graph"),
        }
    }

    /// Styles that inherit from nothing inside the table
    pub fn get_roots(&self) -> HashSet<u32> {
        self.graph
            .node_indices()
            .filter(|&node| {
                self.graph
                    .neighbors_directed(node, Direction::Incoming)
                    .next()
                    .is_none()
            })
            .map(|node| self.graph[node])
            .collect()
    }

    /// Styles that inherit from `id`.
    ///
    /// # Panics
    /// If `id` is not a style in the table.
    pub fn get_children(&self, id: u32) -> Vec<u32> {
        self.graph
            .neighbors_directed(self.node(id), Direction::Outgoing)
            .map(|child| self.graph[child])
            .collect()
    }

    /// The parent of `id`, if the style has exactly one definition and that
    /// definition names a parent
    pub fn get_unambiguous_parent(&self, id: u32) -> Option<u32> {
        match self.styles.get(&id).map(Vec::as_slice) {
            Some([style]) if style.parent != 0 => Some(style.parent),
            _ => None,
        }
    }

    /// Attributes of `id` with everything inherited along its chain of
    /// unambiguous parents; a child's value overrides its parent's.
    ///
    /// The chain stops at a parent outside the table. Returns `None` when a
    /// style on the chain has more than one definition, or the chain loops.
    pub fn flatten_attributes(&self, id: u32) -> Option<BTreeMap<u32, StyleValue>> {
        let mut chain = Vec::new();
        let mut visited = HashSet::new();
        let mut current = id;

        loop {
            if !visited.insert(current) {
                return None;
            }
            let [style] = self.styles.get(&current)?.as_slice() else {
                return None;
            };
            chain.push(style);
            if style.parent == 0 || !self.styles.contains_key(&style.parent) {
                break;
            }
            current = style.parent;
        }

        let mut flattened = BTreeMap::new();
        for style in chain.into_iter().rev() {
            for (attr, value) in &style.attributes {
                flattened.insert(*attr, value.clone());
            }
        }
        Some(flattened)
    }
}
