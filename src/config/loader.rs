use miette::{IntoDiagnostic, Result, WrapErr};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Configuration for a refscan run
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Resource directories to scan instead of discovering `res` directories
    pub resource_dirs: Vec<PathBuf>,

    /// Native library directories to scan instead of discovering `lib` directories
    pub library_dirs: Vec<PathBuf>,

    /// Attributes whose values are collected from resource XML
    pub attributes: Vec<String>,

    /// Resource subdirectories skipped when collecting classes and attributes
    pub skip_dir_prefixes: Vec<String>,

    /// Upper bound on XML reading threads
    pub xml_threads: usize,

    /// Upper bound on native library reading threads
    pub native_threads: usize,

    /// Patterns to exclude from directory discovery
    pub exclude: Vec<String>,

    /// Style graph export settings
    pub style_graph: StyleGraphConfig,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct StyleGraphConfig {
    /// Leave styles without any inheritance edge out of the DOT export
    pub exclude_isolated: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            resource_dirs: vec![],
            library_dirs: vec![],
            attributes: vec![],
            // Animations and colors carry no references, raw is never binary XML
            skip_dir_prefixes: vec!["anim".to_string(), "color".to_string(), "raw".to_string()],
            xml_threads: 4,
            native_threads: 2,
            exclude: vec![
                "**/build/**".to_string(),
                "**/.gradle/**".to_string(),
                "**/.idea/**".to_string(),
            ],
            style_graph: StyleGraphConfig::default(),
        }
    }
}

impl Config {
    /// Load configuration from a file (YAML or TOML)
    pub fn from_file(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path)
            .into_diagnostic()
            .wrap_err_with(|| format!("Failed to read config file: {}", path.display()))?;

        let extension = path.extension().and_then(|e| e.to_str()).unwrap_or("");

        match extension {
            "yml" | "yaml" => serde_yaml::from_str(&contents)
                .into_diagnostic()
                .wrap_err("Failed to parse YAML config"),
            "toml" => toml::from_str(&contents)
                .into_diagnostic()
                .wrap_err("Failed to parse TOML config"),
            _ => {
                if let Ok(config) = serde_yaml::from_str(&contents) {
                    Ok(config)
                } else {
                    toml::from_str(&contents)
                        .into_diagnostic()
                        .wrap_err("Failed to parse config file")
                }
            }
        }
    }

    /// Try to load configuration from default locations
    pub fn from_default_locations(root: &Path) -> Result<Self> {
        let default_names = [
            ".refscan.yml",
            ".refscan.yaml",
            ".refscan.toml",
            "refscan.yml",
            "refscan.yaml",
            "refscan.toml",
        ];

        for name in &default_names {
            let path = root.join(name);
            if path.exists() {
                return Self::from_file(&path);
            }
        }

        Ok(Self::default())
    }
}

/// Whether `path` matches any of `patterns`
pub fn is_excluded(patterns: &[String], path: &Path) -> bool {
    let path_str = path.to_string_lossy();
    patterns.iter().any(|pattern| glob_match(pattern, &path_str))
}

/// Simple glob matching for patterns like "*.so" or "**/build/**"
fn glob_match(pattern: &str, text: &str) -> bool {
    if let Some(suffix) = pattern.strip_prefix('*') {
        if !pattern.contains('/') {
            return text.ends_with(suffix);
        }
    }

    if let Some(prefix) = pattern.strip_suffix('*') {
        if !pattern.contains('/') {
            return text.starts_with(prefix);
        }
    }

    if pattern.contains("**") {
        // "**/build/**" matches a whole `build` component anywhere in the path
        if pattern.starts_with("**/") && pattern.ends_with("/**") {
            let dir_name = pattern
                .trim_start_matches("**/")
                .trim_end_matches("/**")
                .trim_matches('/');
            let dir_pattern = format!("/{}/", dir_name);
            return text.contains(&dir_pattern) || text.ends_with(&format!("/{}", dir_name));
        }

        let parts: Vec<&str> = pattern.split("**").collect();
        if parts.len() == 2 {
            let prefix = parts[0].trim_end_matches('/');
            let suffix = parts[1].trim_start_matches('/');

            if prefix.is_empty() && suffix.is_empty() {
                return true;
            }

            if prefix.is_empty() {
                return text.ends_with(suffix) || text.contains(&format!("/{}", suffix));
            }

            if suffix.is_empty() {
                return text.starts_with(prefix) || text.contains(&format!("{}/", prefix));
            }

            return (text.starts_with(prefix) || text.contains(&format!("/{}/", prefix)))
                && (text.ends_with(suffix) || text.contains(&format!("/{}", suffix)));
        }
    }

    text == pattern
}
