//! Configuration loading for soupviz.
//!
//! Configuration is loaded from TOML files with environment variable overrides.

use crate::analysis::AnalysisParams;
use anyhow::Result;
use config::{Config, Environment, File};
use serde::Deserialize;
use std::path::{Path, PathBuf};

pub const DEFAULT_CONFIG_FILE: &str = "config.default.toml";

#[derive(Debug, Clone, Deserialize, Default)]
pub struct SoupvizConfig {
    #[serde(default)]
    pub data: DataConfig,

    #[serde(default)]
    pub analysis: AnalysisConfig,

    #[serde(default)]
    pub output: OutputConfig,

    #[serde(default)]
    pub graph: GraphConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct DataConfig {
    #[serde(default = "default_directory")]
    pub directory: PathBuf,
}

impl Default for DataConfig {
    fn default() -> Self {
        Self {
            directory: default_directory(),
        }
    }
}

fn default_directory() -> PathBuf {
    PathBuf::from("data/quest_findings")
}

#[derive(Debug, Clone, Deserialize)]
pub struct AnalysisConfig {
    #[serde(default = "default_top_n")]
    pub top_n: usize,

    #[serde(default = "default_max_cycle_len")]
    pub max_cycle_len: usize,

    #[serde(default = "default_cycle_report_limit")]
    pub cycle_report_limit: usize,
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            top_n: default_top_n(),
            max_cycle_len: default_max_cycle_len(),
            cycle_report_limit: default_cycle_report_limit(),
        }
    }
}

impl AnalysisConfig {
    pub fn params(&self) -> AnalysisParams {
        AnalysisParams {
            top_n: self.top_n,
            max_cycle_len: self.max_cycle_len,
            cycle_report_limit: self.cycle_report_limit,
        }
    }
}

fn default_top_n() -> usize {
    20
}

fn default_max_cycle_len() -> usize {
    4
}

fn default_cycle_report_limit() -> usize {
    20
}

#[derive(Debug, Clone, Deserialize)]
pub struct OutputConfig {
    #[serde(default = "default_width")]
    pub width: u32,

    #[serde(default = "default_height")]
    pub height: u32,

    #[serde(default = "default_chart_width")]
    pub chart_width: u32,

    #[serde(default = "default_chart_height")]
    pub chart_height: u32,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            width: default_width(),
            height: default_height(),
            chart_width: default_chart_width(),
            chart_height: default_chart_height(),
        }
    }
}

fn default_width() -> u32 {
    1400
}

fn default_height() -> u32 {
    1400
}

fn default_chart_width() -> u32 {
    1400
}

fn default_chart_height() -> u32 {
    1000
}

#[derive(Debug, Clone, Deserialize)]
pub struct GraphConfig {
    #[serde(default = "default_label_count")]
    pub label_count: usize,

    #[serde(default = "default_layout_iterations")]
    pub layout_iterations: usize,

    #[serde(default = "default_layout_seed")]
    pub layout_seed: u64,
}

impl Default for GraphConfig {
    fn default() -> Self {
        Self {
            label_count: default_label_count(),
            layout_iterations: default_layout_iterations(),
            layout_seed: default_layout_seed(),
        }
    }
}

fn default_label_count() -> usize {
    25
}

fn default_layout_iterations() -> usize {
    100
}

fn default_layout_seed() -> u64 {
    42
}

impl SoupvizConfig {
    pub fn load(path: &Path) -> Result<Self> {
        let config = Config::builder()
            .add_source(File::with_name(DEFAULT_CONFIG_FILE).required(false))
            .add_source(File::from(path).required(false))
            .add_source(
                Environment::with_prefix("SOUPVIZ")
                    .prefix_separator("_")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        let soupviz_config: SoupvizConfig = config.try_deserialize().unwrap_or_default();
        Ok(soupviz_config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn defaults_match_documented_bounds() {
        let config = SoupvizConfig::default();
        assert_eq!(config.analysis.params(), AnalysisParams::default());
        assert_eq!(config.graph.layout_seed, 42);
        assert_eq!(config.graph.label_count, 25);
        assert_eq!(config.data.directory, PathBuf::from("data/quest_findings"));
    }

    #[test]
    fn loads_sections_from_toml_file() {
        let mut file = tempfile::Builder::new().suffix(".toml").tempfile().unwrap();
        writeln!(
            file,
            "[analysis]\ntop_n = 5\nmax_cycle_len = 3\n\n[output]\nwidth = 800\n"
        )
        .unwrap();

        let config = SoupvizConfig::load(file.path()).unwrap();
        assert_eq!(config.analysis.top_n, 5);
        assert_eq!(config.analysis.max_cycle_len, 3);
        assert_eq!(config.analysis.cycle_report_limit, 20);
        assert_eq!(config.output.width, 800);
        assert_eq!(config.output.height, 1400);
    }

    #[test]
    fn environment_overrides_snake_case_fields() {
        // Fields not asserted by the other load tests, which share the process env.
        std::env::set_var("SOUPVIZ_GRAPH__LAYOUT_SEED", "7");
        std::env::set_var("SOUPVIZ_OUTPUT__CHART_HEIGHT", "640");
        let config = SoupvizConfig::load(Path::new("/nonexistent/soupviz.toml"));
        std::env::remove_var("SOUPVIZ_GRAPH__LAYOUT_SEED");
        std::env::remove_var("SOUPVIZ_OUTPUT__CHART_HEIGHT");

        let config = config.unwrap();
        assert_eq!(config.graph.layout_seed, 7);
        assert_eq!(config.output.chart_height, 640);
        assert_eq!(config.graph.layout_iterations, 100);
    }

    #[test]
    fn missing_file_falls_back_to_defaults() {
        let config = SoupvizConfig::load(Path::new("/nonexistent/soupviz.toml")).unwrap();
        assert_eq!(config.analysis.top_n, 20);
    }
}
