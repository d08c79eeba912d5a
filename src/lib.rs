//! refscan - Find every reference to an application class in an Android package
//!
//! Bytecode optimizers must never rename or remove a class that is named
//! from outside the dex files. This library finds those names in an
//! unpacked APK or app bundle, and builds the style inheritance graph of
//! its resource table.
//!
//! # Architecture
//!
//! 1. **Discovery** - Find `res` and `lib` directories of the package
//! 2. **Scanning** - A self-feeding worker pool walks the directories and
//!    processes files as they are found
//! 3. **Extraction** - Class and attribute candidates from resource XML,
//!    class-shaped strings from native libraries
//! 4. **Resolution** - Resource references are resolved to literal values
//!    through the resource table
//! 5. **Styles** - Style inheritance graph with Graphviz export
//! 6. **Reporting** - Output results in various formats

pub mod config;
pub mod discovery;
pub mod graph;
pub mod java_names;
pub mod parser;
pub mod report;
pub mod resources;
pub mod scan;

pub use config::Config;
pub use discovery::{PackageLayout, UnpackedPackage};
pub use graph::{load_style_info, StyleDefinition, StyleInfo, StyleMap, StyleValue};
pub use parser::TextXmlExtractor;
pub use report::{ReportFormat, Reporter, ScanReport};
pub use resources::{
    MemoryResourceTable, ResourceCollector, ResourceError, ResourceTable, StringOrReference,
    XmlExtractor,
};
pub use scan::WorkQueue;
