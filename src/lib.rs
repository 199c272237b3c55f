pub mod config;
pub mod core;
pub mod domain;
pub mod utils;

#[cfg(feature = "cli")]
pub use crate::config::CliConfig;

pub use crate::config::{cli::LocalStorage, toml_config::AnalysisConfig};
pub use crate::core::{engine::CeaEngine, pipeline::CeaPipeline};
pub use crate::domain::model::{
    Analysis, CeaResult, ComparisonResult, DiscountParameters, InterventionProfile, WtpThreshold,
};
pub use crate::utils::error::{CeaError, Result};
