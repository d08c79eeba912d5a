// Style inheritance graph

mod dot;
mod style;

pub use dot::NodeOptions;
pub use style::{StyleDefinition, StyleInfo, StyleMap, StyleValue};

use crate::resources::ResourceTable;

/// Build the style graph from the styles of a resource table
pub fn load_style_info(table: &dyn ResourceTable) -> StyleInfo {
    StyleInfo::build(table.get_style_map())
}
