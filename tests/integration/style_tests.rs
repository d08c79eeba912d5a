//! Style graph integration tests
//!
//! Load a resource table dump and query the style graph built from it.

use refscan::graph::NodeOptions;
use refscan::{load_style_info, MemoryResourceTable, ResourceTable, StyleValue};
use std::collections::{HashMap, HashSet};
use std::fs;
use tempfile::TempDir;

const THEME_BASE: u32 = 0x7f0f0001;
const THEME_APP: u32 = 0x7f0f0002;
const THEME_DIALOG: u32 = 0x7f0f0003;
const WIDGET_BUTTON: u32 = 0x7f0f0004;
const PLATFORM_THEME: u32 = 0x01030005;

const TABLE: &str = r#"{
  "strings": {
    "2131099649": ["com.example.ui.CustomView"]
  },
  "references": {
    "2131099650": 2131099649
  },
  "styles": {
    "2131689473": [
      { "parent": 16973829, "attributes": { "16842836": { "kind": "data", "data_type": 28, "data": 4294967295 } } }
    ],
    "2131689474": [
      { "parent": 2131689473, "attributes": { "16842904": { "kind": "reference", "id": 2131099649 } } }
    ],
    "2131689475": [
      { "parent": 2131689473 },
      { "parent": 2131689474 }
    ],
    "2131689476": [
      { "attributes": { "16842901": { "kind": "string", "value": "14sp" } } }
    ]
  }
}"#;

fn table() -> MemoryResourceTable {
    MemoryResourceTable::from_json(TABLE).unwrap()
}

#[test]
fn test_table_from_file() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("table.json");
    fs::write(&path, TABLE).unwrap();

    let table = MemoryResourceTable::from_file(&path).unwrap();
    assert_eq!(
        table.resolve_string_values_for_resource_reference(0x7f060002),
        vec!["com.example.ui.CustomView"]
    );
    assert_eq!(table.get_style_map().len(), 4);
}

#[test]
fn test_table_errors() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("table.json");
    fs::write(&path, "{ not json").unwrap();

    assert!(MemoryResourceTable::from_file(&path).is_err());
    assert!(MemoryResourceTable::from_file(&dir.path().join("missing.json")).is_err());
}

#[test]
fn test_graph_queries() {
    let info = load_style_info(&table());

    assert_eq!(info.node_count(), 4);
    assert_eq!(info.edge_count(), 3);
    assert_eq!(info.get_roots(), HashSet::from([THEME_BASE, WIDGET_BUTTON]));

    let mut children = info.get_children(THEME_BASE);
    children.sort();
    assert_eq!(children, vec![THEME_APP, THEME_DIALOG]);
    assert_eq!(info.get_children(THEME_APP), vec![THEME_DIALOG]);

    assert_eq!(info.get_unambiguous_parent(THEME_APP), Some(THEME_BASE));
    assert_eq!(info.get_unambiguous_parent(THEME_BASE), Some(PLATFORM_THEME));
    assert_eq!(info.get_unambiguous_parent(THEME_DIALOG), None);
    assert_eq!(info.get_unambiguous_parent(WIDGET_BUTTON), None);
}

#[test]
fn test_flatten_attributes() {
    let info = load_style_info(&table());

    let flat = info.flatten_attributes(THEME_APP).unwrap();
    assert_eq!(flat.len(), 2);
    assert_eq!(flat[&0x01010098], StyleValue::Reference { id: 0x7f060001 });
    assert_eq!(
        flat[&0x01010054],
        StyleValue::Data {
            data_type: 0x1c,
            data: 0xffffffff
        }
    );

    assert!(info.flatten_attributes(THEME_DIALOG).is_none());
}

#[test]
fn test_dot_export() {
    let info = load_style_info(&table());

    let dot = info.to_dot(false);
    assert_eq!(dot, info.to_dot(false));
    assert!(dot.starts_with("digraph {\n"));
    assert!(dot.contains(&format!("  node{THEME_BASE} [label=\"0x7f0f0001\"];\n")));
    assert!(dot.contains(&format!("    node{THEME_BASE} -> node{THEME_APP};\n")));
    assert!(dot.contains(&format!("    node{THEME_APP} -> node{THEME_DIALOG};\n")));
    assert!(dot.contains(&format!("node{WIDGET_BUTTON}")));

    let connected = info.to_dot(true);
    assert!(!connected.contains(&format!("node{WIDGET_BUTTON}")));

    let edges_at = dot.find("subgraph parents_edges").unwrap();
    let base_at = dot.find(&format!("node{THEME_BASE} [")).unwrap();
    let dialog_at = dot.find(&format!("node{THEME_DIALOG} [")).unwrap();
    assert!(base_at < dialog_at && dialog_at < edges_at);
}

#[test]
fn test_dot_with_names() {
    let info = load_style_info(&table());
    let names = HashMap::from([
        (THEME_BASE, "Theme.Base"),
        (THEME_APP, "Theme.App"),
        (THEME_DIALOG, "Theme.App.Dialog"),
    ]);
    let mut options = NodeOptions::new();
    options.insert(
        THEME_DIALOG,
        HashMap::from([("style".to_string(), "dashed".to_string())]),
    );

    let dot = info.to_dot_with(
        |id| names.get(&id).map(|n| n.to_string()).unwrap_or_else(|| format!("{id:#x}")),
        &options,
        true,
    );

    assert!(dot.contains("[label=\"Theme.Base\"]"));
    assert!(dot.contains("[style=\"dashed\" label=\"Theme.App.Dialog\"]"));
}
