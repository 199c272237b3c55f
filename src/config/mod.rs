pub mod cli;
pub mod toml_config;

#[cfg(feature = "cli")]
use crate::utils::error::Result;
#[cfg(feature = "cli")]
use clap::Parser;
#[cfg(feature = "cli")]
use serde::{Deserialize, Serialize};
#[cfg(feature = "cli")]
use toml_config::AnalysisConfig;

#[cfg(feature = "cli")]
#[derive(Debug, Clone, Serialize, Deserialize, Parser)]
#[command(name = "simple-cea")]
#[command(about = "Deterministic cost-effectiveness analysis of two health interventions")]
pub struct CliConfig {
    /// TOML file with intervention, discount and output settings
    #[arg(short, long)]
    pub config: Option<String>,

    /// Directory for the plane image and summary table
    #[arg(long)]
    pub output_path: Option<String>,

    /// Willingness-to-pay threshold per QALY
    #[arg(long)]
    pub wtp: Option<f64>,

    /// Annual discount rate applied to costs, in [0, 1)
    #[arg(long)]
    pub discount_rate: Option<f64>,

    /// Years to discount over
    #[arg(long)]
    pub horizon_years: Option<f64>,

    /// Discount QALYs with the same rate and horizon as costs
    #[arg(long)]
    pub discount_qalys: bool,

    /// Table export formats (csv, tsv, json)
    #[arg(long, value_delimiter = ',')]
    pub formats: Vec<String>,

    /// Skip rendering the cost-effectiveness plane image
    #[arg(long)]
    pub no_plot: bool,

    /// Print the resolved configuration and results without writing files
    #[arg(long)]
    pub dry_run: bool,

    /// Emit JSON log lines
    #[arg(long)]
    pub json_logs: bool,

    #[arg(short, long, help = "Enable verbose output")]
    pub verbose: bool,
}

#[cfg(feature = "cli")]
impl CliConfig {
    /// Loads the TOML file (or the base case when none is given) and applies
    /// command-line overrides on top.
    pub fn resolve(&self) -> Result<AnalysisConfig> {
        let mut config = match &self.config {
            Some(path) => {
                tracing::info!("📁 Loading configuration from: {}", path);
                AnalysisConfig::from_file(path)?
            }
            None => {
                tracing::info!("No configuration file given, using the base-case inputs");
                AnalysisConfig::default()
            }
        };

        if let Some(output_path) = &self.output_path {
            config.output.output_path = output_path.clone();
        }
        if let Some(wtp) = self.wtp {
            config.threshold.wtp.0 = wtp;
            tracing::info!("🔧 WTP threshold overridden to: {}", wtp);
        }
        if let Some(rate) = self.discount_rate {
            config.discount.rate = rate;
            tracing::info!("🔧 Discount rate overridden to: {}", rate);
        }
        if let Some(years) = self.horizon_years {
            config.discount.horizon_years = years;
            tracing::info!("🔧 Time horizon overridden to: {} years", years);
        }
        if self.discount_qalys {
            config.discount.discount_qalys = true;
        }
        if !self.formats.is_empty() {
            config.output.formats = self.formats.clone();
        }
        if self.no_plot {
            config.output.render_plane = false;
        }

        Ok(config)
    }
}
