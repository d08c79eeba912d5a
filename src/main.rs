use clap::Parser;
use colored::Colorize;
use indicatif::{ProgressBar, ProgressStyle};
use miette::{IntoDiagnostic, Result, WrapErr};
use std::collections::HashSet;
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};
use tracing::{debug, info};

use refscan::report::ReportFormat;
use refscan::resources::{get_service_loader_classes, CollectorOptions};
use refscan::{
    load_style_info, Config, MemoryResourceTable, Reporter, ResourceCollector, ScanReport,
    TextXmlExtractor, UnpackedPackage,
};

/// refscan - Find class references in an unpacked Android package
#[derive(Parser, Debug)]
#[command(name = "refscan")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Path to the unpacked APK or app bundle
    #[arg(default_value = ".")]
    path: PathBuf,

    /// Path to configuration file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Resource table dump (JSON) used to resolve references and styles
    #[arg(long, value_name = "FILE")]
    table: Option<PathBuf>,

    /// Attribute whose values are collected (can be specified multiple times)
    #[arg(short, long)]
    attribute: Vec<String>,

    /// Resource subdirectory prefix to skip (can be specified multiple times)
    #[arg(long, value_name = "PREFIX")]
    skip_dir: Vec<String>,

    /// Resource directory to scan instead of discovering them
    #[arg(long, value_name = "DIR")]
    resource_dir: Vec<PathBuf>,

    /// Native library directory to scan instead of discovering them
    #[arg(long, value_name = "DIR")]
    library_dir: Vec<PathBuf>,

    /// Patterns to exclude from discovery (can be specified multiple times)
    #[arg(short, long)]
    exclude: Vec<String>,

    /// Output format
    #[arg(short, long, value_enum, default_value = "terminal")]
    format: OutputFormat,

    /// Output file (for json format)
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Write the style inheritance graph in Graphviz format
    #[arg(long, value_name = "FILE")]
    styles_dot: Option<PathBuf>,

    /// Leave styles without inheritance edges out of the style graph
    #[arg(long)]
    exclude_isolated: bool,

    /// Skip scanning native libraries
    #[arg(long)]
    no_native: bool,

    /// Print dotted class names instead of descriptors
    #[arg(long)]
    external_names: bool,

    /// Upper bound on worker threads per scan
    #[arg(long)]
    threads: Option<usize>,

    /// Verbose output
    #[arg(short, long)]
    verbose: bool,

    /// Quiet mode - only output results
    #[arg(short, long)]
    quiet: bool,
}

#[derive(clap::ValueEnum, Clone, Debug, Default)]
enum OutputFormat {
    #[default]
    Terminal,
    Json,
}

impl From<OutputFormat> for ReportFormat {
    fn from(format: OutputFormat) -> Self {
        match format {
            OutputFormat::Terminal => ReportFormat::Terminal,
            OutputFormat::Json => ReportFormat::Json,
        }
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    init_logging(cli.verbose, cli.quiet);

    info!("refscan v{}", env!("CARGO_PKG_VERSION"));

    let config = load_config(&cli)?;
    run_scan(&config, &cli)
}

fn init_logging(verbose: bool, quiet: bool) {
    use tracing_subscriber::{fmt, EnvFilter};

    let filter = if quiet {
        EnvFilter::new("error")
    } else if verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::new("info")
    };

    // Results go to stdout, so diagnostics stay on stderr
    fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

fn load_config(cli: &Cli) -> Result<Config> {
    let mut config = if let Some(config_path) = &cli.config {
        Config::from_file(config_path)?
    } else {
        Config::from_default_locations(&cli.path)?
    };

    // Override with CLI arguments
    if !cli.attribute.is_empty() {
        config.attributes.extend(cli.attribute.clone());
    }
    if !cli.skip_dir.is_empty() {
        config.skip_dir_prefixes = cli.skip_dir.clone();
    }
    if !cli.resource_dir.is_empty() {
        config.resource_dirs = cli.resource_dir.clone();
    }
    if !cli.library_dir.is_empty() {
        config.library_dirs = cli.library_dir.clone();
    }
    if !cli.exclude.is_empty() {
        config.exclude.extend(cli.exclude.clone());
    }
    if let Some(threads) = cli.threads {
        config.xml_threads = threads;
        config.native_threads = threads;
    }
    if cli.exclude_isolated {
        config.style_graph.exclude_isolated = true;
    }

    Ok(config)
}

fn spinner(enabled: bool) -> Result<ProgressBar> {
    if !enabled {
        return Ok(ProgressBar::hidden());
    }

    let pb = ProgressBar::new_spinner();
    pb.set_style(
        ProgressStyle::default_spinner()
            .template("{spinner:.green} [{elapsed_precise}] {msg}")
            .into_diagnostic()?,
    );
    pb.enable_steady_tick(Duration::from_millis(100));
    Ok(pb)
}

/// `META-INF/services` of an APK, or of every module of a bundle
fn service_directories(root: &Path) -> Vec<PathBuf> {
    let mut dirs = vec![root.join("META-INF").join("services")];
    if let Ok(entries) = std::fs::read_dir(root) {
        for entry in entries.flatten() {
            let candidate = entry.path().join("root").join("META-INF").join("services");
            if candidate.is_dir() {
                dirs.push(candidate);
            }
        }
    }
    dirs
}

fn run_scan(config: &Config, cli: &Cli) -> Result<()> {
    let start_time = Instant::now();

    if !cli.path.is_dir() {
        return Err(miette::miette!(
            "Package directory does not exist: {}",
            cli.path.display()
        ));
    }

    let table = match &cli.table {
        Some(path) => MemoryResourceTable::from_file(path)
            .into_diagnostic()
            .wrap_err("Failed to load resource table")?,
        None => MemoryResourceTable::new(),
    };

    let package = UnpackedPackage::new(&cli.path).with_config(config);
    let extractor = TextXmlExtractor::new();
    let collector =
        ResourceCollector::new(&package, &extractor).with_options(CollectorOptions::from(config));
    let attributes: HashSet<String> = config.attributes.iter().cloned().collect();

    let show_progress = !cli.quiet && matches!(cli.format, OutputFormat::Terminal);
    let pb = spinner(show_progress)?;
    let mut report = ScanReport::new(&cli.path);

    pb.set_message("Reading resource XML...");
    report.add_layout_scan(collector.collect_layout_classes_and_attributes(&attributes, &table));

    if !cli.no_native {
        pb.set_message("Scanning native libraries...");
        report.add_native_classes(collector.get_native_classes());
    }

    pb.set_message("Reading keep lists...");
    report.add_keep_resources(collector.get_all_keep_resources());

    for dir in service_directories(&cli.path) {
        debug!("Reading service loader files in {}", dir.display());
        report.add_service_loader_classes(get_service_loader_classes(&dir));
    }

    pb.set_message("Building style graph...");
    let style_info = load_style_info(&table);
    report.set_style_info(&style_info);
    if let Some(dot_path) = &cli.styles_dot {
        let dot = style_info.to_dot(config.style_graph.exclude_isolated);
        std::fs::write(dot_path, dot)
            .into_diagnostic()
            .wrap_err_with(|| format!("Failed to write {}", dot_path.display()))?;
        info!("Style graph written to {}", dot_path.display());
    }

    pb.finish_and_clear();

    let reporter = Reporter::new(cli.format.clone().into(), cli.output.clone())
        .with_external_names(cli.external_names);
    reporter.report(&report)?;

    if !cli.quiet && matches!(cli.format, OutputFormat::Terminal) {
        println!(
            "{}",
            format!("Scan completed in {:.2?}", start_time.elapsed()).dimmed()
        );
    }

    Ok(())
}
