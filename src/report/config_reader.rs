use crate::args::Args;
use crate::report::*;

use course_ranking::{RankingRules, ScoreWeights};
use log::debug;
use serde::{Deserialize, Serialize};

use std::fs;
use std::path::{Path, PathBuf};

pub const DEFAULT_INPUT_PATH: &str = "data/Grad Program Exit Survey Data (2).xlsx";
pub const DEFAULT_OUTPUT_DIR: &str = "outputs";
pub const RANKING_CSV_NAME: &str = "course_ranking.csv";
pub const RANKING_PNG_NAME: &str = "course_ranking.png";
pub const DEFAULT_CHART_TOP_COUNT: usize = 15;
pub const DEFAULT_CONSOLE_TOP_COUNT: usize = 10;

pub fn default_chart_title(chart_top_count: usize) -> String {
    format!(
        "Top {} MAcc CORE Courses by Exit Survey Preference Score",
        chart_top_count
    )
}

#[derive(Eq, PartialEq, Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct WeightsConfig {
    pub most: Option<u64>,
    pub neutral: Option<u64>,
    pub least: Option<u64>,
}

/// The content of a JSON config file. Every key is optional.
#[derive(Eq, PartialEq, Debug, Clone, Default, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ReportConfig {
    #[serde(rename = "inputFile")]
    pub input_file: Option<String>,
    #[serde(rename = "outputDirectory")]
    pub output_directory: Option<String>,
    #[serde(rename = "completionColumn")]
    pub completion_column: Option<String>,
    #[serde(rename = "chartTopCount")]
    pub chart_top_count: Option<usize>,
    #[serde(rename = "consoleTopCount")]
    pub console_top_count: Option<usize>,
    #[serde(rename = "chartTitle")]
    pub chart_title: Option<String>,
    pub weights: Option<WeightsConfig>,
}

/// Everything a report run needs, once defaults, config file and flags are merged.
#[derive(Debug, Clone)]
pub struct ReportSettings {
    pub input_path: PathBuf,
    pub output_dir: PathBuf,
    pub chart_top_count: usize,
    pub console_top_count: usize,
    pub chart_title: String,
    pub rules: RankingRules,
    /// If set, the ranking table must match this file.
    pub reference_path: Option<PathBuf>,
}

impl Default for ReportSettings {
    fn default() -> Self {
        ReportSettings {
            input_path: PathBuf::from(DEFAULT_INPUT_PATH),
            output_dir: PathBuf::from(DEFAULT_OUTPUT_DIR),
            chart_top_count: DEFAULT_CHART_TOP_COUNT,
            console_top_count: DEFAULT_CONSOLE_TOP_COUNT,
            chart_title: default_chart_title(DEFAULT_CHART_TOP_COUNT),
            rules: RankingRules::default(),
            reference_path: None,
        }
    }
}

impl ReportSettings {
    pub fn csv_path(&self) -> PathBuf {
        self.output_dir.join(RANKING_CSV_NAME)
    }

    pub fn png_path(&self) -> PathBuf {
        self.output_dir.join(RANKING_PNG_NAME)
    }
}

pub fn read_config(path: &Path) -> ReportResult<ReportConfig> {
    let path_s = display_path(path);
    let contents = fs::read_to_string(path).context(OpeningConfigSnafu {
        path: path_s.clone(),
    })?;
    let config: ReportConfig =
        serde_json::from_str(&contents).context(ParsingConfigSnafu { path: path_s })?;
    debug!("read_config: {:?}", config);
    Ok(config)
}

fn resolve_path(root: &Path, p: &str) -> PathBuf {
    let p = Path::new(p);
    if p.is_absolute() {
        p.to_path_buf()
    } else {
        root.join(p)
    }
}

/// Applies a config file on top of the defaults. Paths are relative to `root`.
pub fn apply_config(settings: &mut ReportSettings, config: &ReportConfig, root: &Path) {
    if let Some(p) = &config.input_file {
        settings.input_path = resolve_path(root, p);
    }
    if let Some(p) = &config.output_directory {
        settings.output_dir = resolve_path(root, p);
    }
    if let Some(c) = &config.completion_column {
        settings.rules.completion_column = c.clone();
    }
    if let Some(x) = config.chart_top_count {
        settings.chart_top_count = x;
    }
    if let Some(x) = config.console_top_count {
        settings.console_top_count = x;
    }
    settings.chart_title = match &config.chart_title {
        Some(t) => t.clone(),
        None => default_chart_title(settings.chart_top_count),
    };
    if let Some(w) = &config.weights {
        let d = ScoreWeights::DEFAULT_WEIGHTS;
        settings.rules.weights = ScoreWeights {
            most: w.most.unwrap_or(d.most),
            neutral: w.neutral.unwrap_or(d.neutral),
            least: w.least.unwrap_or(d.least),
        };
    }
}

/// Builds the settings from the defaults, the config file passed with `--config` if any, and
/// finally the other flags.
pub fn settings_from_args(args: &Args) -> ReportResult<ReportSettings> {
    let mut settings = ReportSettings::default();

    if let Some(config_path) = &args.config {
        let config_p = Path::new(config_path);
        let config = read_config(config_p)?;
        let root = config_p.parent().unwrap_or_else(|| Path::new(""));
        apply_config(&mut settings, &config, root);
    }

    if let Some(p) = &args.input {
        settings.input_path = PathBuf::from(p);
    }
    if let Some(p) = &args.out_dir {
        settings.output_dir = PathBuf::from(p);
    }
    if let Some(p) = &args.reference {
        settings.reference_path = Some(PathBuf::from(p));
    }

    if settings.chart_top_count == 0 {
        return InvalidSettingSnafu {
            name: "chartTopCount",
            value: "0",
        }
        .fail();
    }
    if settings.rules.completion_column.is_empty() {
        return InvalidSettingSnafu {
            name: "completionColumn",
            value: "",
        }
        .fail();
    }
    debug!("settings_from_args: {:?}", settings);
    Ok(settings)
}
