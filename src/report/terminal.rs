use super::ScanReport;
use crate::java_names::internal_to_external;
use colored::Colorize;
use miette::Result;
use std::collections::BTreeSet;

/// Terminal reporter with colored output
pub struct TerminalReporter {
    /// Print dotted names (`com.foo.Bar`) instead of descriptors
    external_names: bool,
}

impl TerminalReporter {
    pub fn new() -> Self {
        Self {
            external_names: false,
        }
    }

    pub fn with_external_names(mut self, external: bool) -> Self {
        self.external_names = external;
        self
    }

    pub fn report(&self, report: &ScanReport) -> Result<()> {
        println!();
        println!(
            "{}",
            format!("Scanned {}", report.root.display()).bold()
        );
        println!();

        self.print_classes("Layout classes", &report.layout_classes);
        self.print_classes("Native library classes", &report.native_classes);
        self.print_classes("Service loader classes", &report.service_loader_classes);

        if !report.attributes.is_empty() {
            println!("{}", "Attributes".cyan().bold());
            for (name, values) in &report.attributes {
                let distinct: BTreeSet<_> = values.iter().collect();
                println!("  {} {}", name.yellow(), format!("({} values)", values.len()).dimmed());
                for value in distinct {
                    println!("    {}", value);
                }
            }
            println!();
        }

        if !report.keep_resources.is_empty() {
            println!("{}", "Kept resources".cyan().bold());
            for name in &report.keep_resources {
                println!("  {}", name);
            }
            println!();
        }

        self.print_summary(report);
        Ok(())
    }

    fn print_classes(&self, title: &str, classes: &BTreeSet<String>) {
        if classes.is_empty() {
            return;
        }

        println!("{}", format!("{} ({})", title, classes.len()).cyan().bold());
        for class in classes {
            if self.external_names {
                println!("  {}", internal_to_external(class));
            } else {
                println!("  {}", class);
            }
        }
        println!();
    }

    fn print_summary(&self, report: &ScanReport) {
        println!("{}", "Summary".bold());
        println!(
            "  {} distinct classes referenced",
            report.all_classes().len().to_string().green().bold()
        );
        println!("  {} attributes collected", report.attributes.len());
        println!("  {} resources kept", report.keep_resources.len());

        if let Some(styles) = &report.styles {
            println!(
                "  {} styles, {} inheritance edges, {} roots, {} with several definitions",
                styles.styles, styles.edges, styles.roots, styles.ambiguous
            );
        }
    }
}

impl Default for TerminalReporter {
    fn default() -> Self {
        Self::new()
    }
}
