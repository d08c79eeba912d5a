use super::ScanReport;
use miette::{IntoDiagnostic, Result};
use serde::Serialize;
use std::path::PathBuf;

/// JSON reporter for programmatic output
pub struct JsonReporter {
    output_path: Option<PathBuf>,
}

impl JsonReporter {
    pub fn new(output_path: Option<PathBuf>) -> Self {
        Self { output_path }
    }

    pub fn report(&self, report: &ScanReport) -> Result<()> {
        let json = Self::to_json(report)?;

        if let Some(path) = &self.output_path {
            std::fs::write(path, &json).into_diagnostic()?;
            println!("Report written to: {}", path.display());
        } else {
            println!("{}", json);
        }

        Ok(())
    }

    pub fn to_json(report: &ScanReport) -> Result<String> {
        serde_json::to_string_pretty(&JsonReport::from(report)).into_diagnostic()
    }
}

#[derive(Serialize)]
struct JsonReport<'a> {
    version: &'static str,
    total_classes: usize,
    #[serde(flatten)]
    report: &'a ScanReport,
}

impl<'a> From<&'a ScanReport> for JsonReport<'a> {
    fn from(report: &'a ScanReport) -> Self {
        Self {
            version: env!("CARGO_PKG_VERSION"),
            total_classes: report.all_classes().len(),
            report,
        }
    }
}
