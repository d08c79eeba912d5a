mod json;
mod terminal;

pub use json::JsonReporter;
pub use terminal::TerminalReporter;

use crate::graph::StyleInfo;
use crate::resources::LayoutScan;
use miette::Result;
use serde::Serialize;
use std::collections::{BTreeMap, BTreeSet, HashSet};
use std::path::PathBuf;

/// Output format for reports
#[derive(Debug, Clone, Default)]
pub enum ReportFormat {
    #[default]
    Terminal,
    Json,
}

/// Shape of the style graph
#[derive(Debug, Default, Clone, PartialEq, Eq, Serialize)]
pub struct StyleSummary {
    pub styles: usize,
    pub edges: usize,
    pub roots: usize,
    /// Styles with more than one definition
    pub ambiguous: usize,
}

impl StyleSummary {
    pub fn from_info(info: &StyleInfo) -> Self {
        Self {
            styles: info.node_count(),
            edges: info.edge_count(),
            roots: info.get_roots().len(),
            ambiguous: info.styles().values().filter(|defs| defs.len() > 1).count(),
        }
    }
}

/// Everything found in one package. Collections are sorted so that the
/// same package always produces the same report.
#[derive(Debug, Default, Clone, Serialize)]
pub struct ScanReport {
    pub root: PathBuf,
    pub layout_classes: BTreeSet<String>,
    pub attributes: BTreeMap<String, Vec<String>>,
    pub native_classes: BTreeSet<String>,
    pub service_loader_classes: BTreeSet<String>,
    pub keep_resources: BTreeSet<String>,
    pub styles: Option<StyleSummary>,
}

impl ScanReport {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            ..Self::default()
        }
    }

    pub fn add_layout_scan(&mut self, scan: LayoutScan) {
        self.layout_classes.extend(scan.classes);
        for (name, values) in scan.attributes {
            let entry = self.attributes.entry(name).or_default();
            entry.extend(values);
            entry.sort();
        }
    }

    pub fn add_native_classes(&mut self, classes: HashSet<String>) {
        self.native_classes.extend(classes);
    }

    pub fn add_service_loader_classes(&mut self, classes: HashSet<String>) {
        self.service_loader_classes.extend(classes);
    }

    pub fn add_keep_resources(&mut self, names: HashSet<String>) {
        self.keep_resources.extend(names);
    }

    pub fn set_style_info(&mut self, info: &StyleInfo) {
        self.styles = Some(StyleSummary::from_info(info));
    }

    /// Distinct class names from every source
    pub fn all_classes(&self) -> BTreeSet<&str> {
        self.layout_classes
            .iter()
            .chain(&self.native_classes)
            .chain(&self.service_loader_classes)
            .map(String::as_str)
            .collect()
    }
}

/// Reporter for outputting scan results
pub struct Reporter {
    format: ReportFormat,
    output_path: Option<PathBuf>,
    external_names: bool,
}

impl Reporter {
    pub fn new(format: ReportFormat, output_path: Option<PathBuf>) -> Self {
        Self {
            format,
            output_path,
            external_names: false,
        }
    }

    /// Show dotted class names in terminal output
    pub fn with_external_names(mut self, external: bool) -> Self {
        self.external_names = external;
        self
    }

    pub fn report(&self, report: &ScanReport) -> Result<()> {
        match &self.format {
            ReportFormat::Terminal => TerminalReporter::new()
                .with_external_names(self.external_names)
                .report(report),
            ReportFormat::Json => JsonReporter::new(self.output_path.clone()).report(report),
        }
    }
}
