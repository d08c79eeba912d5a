mod loader;

pub use loader::{is_excluded, Config, StyleGraphConfig};
