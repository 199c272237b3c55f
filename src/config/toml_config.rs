use crate::core::ConfigProvider;
use crate::domain::model::{
    DiscountParameters, InterventionProfile, OutputSettings, PlaneSettings, WtpThreshold,
};
use crate::utils::error::{CeaError, Result};
use crate::utils::validation::{self, Validate};
use serde::{Deserialize, Deserializer, Serialize};
use std::path::Path;

pub const SUPPORTED_FORMATS: [&str; 3] = ["csv", "tsv", "json"];

/// Immutable inputs for one comparison. Every section and every field is
/// optional and falls back to the published base case.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct AnalysisConfig {
    #[serde(default)]
    pub analysis: AnalysisMeta,
    #[serde(
        default = "default_intervention_a",
        deserialize_with = "intervention_a_over_base_case"
    )]
    pub intervention_a: InterventionProfile,
    #[serde(
        default = "default_intervention_b",
        deserialize_with = "intervention_b_over_base_case"
    )]
    pub intervention_b: InterventionProfile,
    #[serde(default)]
    pub discount: DiscountParameters,
    #[serde(default)]
    pub threshold: ThresholdConfig,
    #[serde(default)]
    pub plane: PlaneSettings,
    #[serde(default)]
    pub output: OutputSettings,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct AnalysisMeta {
    pub name: String,
    /// Prefix for every monetary value in the text report.
    pub currency_symbol: String,
}

impl Default for AnalysisMeta {
    fn default() -> Self {
        Self {
            name: "base-case".to_string(),
            currency_symbol: "£".to_string(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, Default)]
#[serde(default, deny_unknown_fields)]
pub struct ThresholdConfig {
    pub wtp: WtpThreshold,
}

fn default_intervention_a() -> InterventionProfile {
    InterventionProfile::new("Intervention A", 46734.0, 3.57)
}

fn default_intervention_b() -> InterventionProfile {
    InterventionProfile::new("Intervention B", 45447.0, 3.46)
}

/// An `[intervention_*]` table as written; keys left out keep the base case.
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct InterventionSection {
    name: Option<String>,
    base_cost: Option<f64>,
    visit_count: Option<u32>,
    visit_unit_cost: Option<f64>,
    test_count: Option<u32>,
    test_unit_cost: Option<f64>,
    qaly: Option<f64>,
}

impl InterventionSection {
    fn over(self, base: InterventionProfile) -> InterventionProfile {
        InterventionProfile {
            name: self.name.unwrap_or(base.name),
            base_cost: self.base_cost.unwrap_or(base.base_cost),
            visit_count: self.visit_count.unwrap_or(base.visit_count),
            visit_unit_cost: self.visit_unit_cost.unwrap_or(base.visit_unit_cost),
            test_count: self.test_count.unwrap_or(base.test_count),
            test_unit_cost: self.test_unit_cost.unwrap_or(base.test_unit_cost),
            qaly: self.qaly.unwrap_or(base.qaly),
        }
    }
}

fn intervention_a_over_base_case<'de, D>(
    deserializer: D,
) -> std::result::Result<InterventionProfile, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(InterventionSection::deserialize(deserializer)?.over(default_intervention_a()))
}

fn intervention_b_over_base_case<'de, D>(
    deserializer: D,
) -> std::result::Result<InterventionProfile, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(InterventionSection::deserialize(deserializer)?.over(default_intervention_b()))
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            analysis: AnalysisMeta::default(),
            intervention_a: default_intervention_a(),
            intervention_b: default_intervention_b(),
            discount: DiscountParameters::default(),
            threshold: ThresholdConfig::default(),
            plane: PlaneSettings::default(),
            output: OutputSettings::default(),
        }
    }
}

impl AnalysisConfig {
    /// Loads and parses a TOML file; validation is a separate step.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(&path).map_err(CeaError::IoError)?;
        Self::from_toml_str(&content)
    }

    pub fn from_toml_str(content: &str) -> Result<Self> {
        let processed_content = Self::substitute_env_vars(content)?;

        toml::from_str(&processed_content).map_err(|e| CeaError::ConfigError {
            message: format!("TOML parsing error: {}", e),
        })
    }

    /// Replaces `${VAR}` with the environment value; unknown variables are left as-is.
    fn substitute_env_vars(content: &str) -> Result<String> {
        use regex::Regex;
        let re = Regex::new(r"\$\{([^}]+)\}").map_err(|e| CeaError::ConfigError {
            message: format!("invalid substitution pattern: {}", e),
        })?;

        let result = re.replace_all(content, |caps: &regex::Captures| {
            let var_name = &caps[1];
            std::env::var(var_name).unwrap_or_else(|_| format!("${{{}}}", var_name))
        });

        Ok(result.to_string())
    }

    pub fn validate_config(&self) -> Result<()> {
        for (prefix, profile) in [
            ("intervention_a", &self.intervention_a),
            ("intervention_b", &self.intervention_b),
        ] {
            validation::validate_non_empty_string(&format!("{}.name", prefix), &profile.name)?;
            validation::validate_non_negative(&format!("{}.base_cost", prefix), profile.base_cost)?;
            validation::validate_non_negative(
                &format!("{}.visit_unit_cost", prefix),
                profile.visit_unit_cost,
            )?;
            validation::validate_non_negative(
                &format!("{}.test_unit_cost", prefix),
                profile.test_unit_cost,
            )?;
            validation::validate_non_negative(&format!("{}.qaly", prefix), profile.qaly)?;
        }

        validation::validate_half_open_range("discount.rate", self.discount.rate, 0.0, 1.0)?;
        validation::validate_non_negative("discount.horizon_years", self.discount.horizon_years)?;
        validation::validate_non_negative("threshold.wtp", self.threshold.wtp.value())?;

        validation::validate_positive("plane.padding", self.plane.padding)?;
        validation::validate_positive("plane.icer_line_extent", self.plane.icer_line_extent)?;
        validation::validate_positive("plane.wtp_line_extent", self.plane.wtp_line_extent)?;
        validation::validate_positive("plane.min_qaly_half_span", self.plane.min_qaly_half_span)?;
        validation::validate_positive("plane.min_cost_half_span", self.plane.min_cost_half_span)?;
        validation::validate_range("plane.width", self.plane.width, 64, 8192)?;
        validation::validate_range("plane.height", self.plane.height, 64, 8192)?;

        validation::validate_path("output.output_path", &self.output.output_path)?;
        validation::validate_path("output.plane_filename", &self.output.plane_filename)?;
        validation::validate_path("output.table_basename", &self.output.table_basename)?;
        validation::validate_formats("output.formats", &self.output.formats, &SUPPORTED_FORMATS)?;
        if self.output.export_decision {
            validation::validate_path("output.decision_filename", &self.output.decision_filename)?;
        }

        Ok(())
    }

    pub fn output_path(&self) -> &str {
        &self.output.output_path
    }

}

impl ConfigProvider for AnalysisConfig {
    fn intervention_a(&self) -> &InterventionProfile {
        &self.intervention_a
    }

    fn intervention_b(&self) -> &InterventionProfile {
        &self.intervention_b
    }

    fn discount(&self) -> DiscountParameters {
        self.discount
    }

    fn wtp(&self) -> WtpThreshold {
        self.threshold.wtp
    }

    fn plane(&self) -> PlaneSettings {
        self.plane
    }

    fn output(&self) -> &OutputSettings {
        &self.output
    }

    fn currency_symbol(&self) -> &str {
        &self.analysis.currency_symbol
    }
}

impl Validate for AnalysisConfig {
    fn validate(&self) -> Result<()> {
        self.validate_config()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_empty_toml_gives_base_case() {
        let config = AnalysisConfig::from_toml_str("").unwrap();
        assert_eq!(config, AnalysisConfig::default());
        assert_eq!(config.intervention_a.base_cost, 46734.0);
        assert_eq!(config.intervention_b.qaly, 3.46);
        assert_eq!(config.discount.rate, 0.0);
        assert_eq!(config.wtp(), WtpThreshold(20000.0));
        assert_eq!(config.output.formats, vec!["csv".to_string()]);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_parse_full_toml_config() {
        let toml_content = r#"
[analysis]
name = "knee-replacement"
currency_symbol = "$"

[intervention_a]
name = "Robotic"
base_cost = 12000
visit_count = 4
visit_unit_cost = 150.0
test_count = 2
test_unit_cost = 80.5
qaly = 1.8

[intervention_b]
name = "Conventional"
base_cost = 9000
qaly = 1.6

[discount]
rate = 0.035
horizon_years = 5

[threshold]
wtp = 30000

[plane]
padding = 1.5
min_cost_half_span = 250.0

[output]
output_path = "./cea-out"
formats = ["csv", "json"]
"#;

        let config = AnalysisConfig::from_toml_str(toml_content).unwrap();

        assert_eq!(config.analysis.name, "knee-replacement");
        assert_eq!(config.intervention_a.name, "Robotic");
        assert_eq!(config.intervention_a.visit_count, 4);
        assert_eq!(config.intervention_a.test_unit_cost, 80.5);
        assert_eq!(config.intervention_b.visit_count, 0);
        assert_eq!(config.discount.rate, 0.035);
        assert_eq!(config.discount.horizon_years, 5.0);
        assert!(!config.discount.discount_qalys);
        assert_eq!(config.wtp().value(), 30000.0);
        assert_eq!(config.plane.padding, 1.5);
        assert_eq!(config.plane.icer_line_extent, 2.0);
        assert_eq!(config.output_path(), "./cea-out");
        assert_eq!(config.currency_symbol(), "$");
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_partial_intervention_keeps_base_case_fields() {
        let config = AnalysisConfig::from_toml_str("[intervention_a]\nqaly = 4.0\n").unwrap();

        assert_eq!(config.intervention_a.qaly, 4.0);
        assert_eq!(config.intervention_a.name, "Intervention A");
        assert_eq!(config.intervention_a.base_cost, 46734.0);
        assert_eq!(config.intervention_a.visit_count, 0);
        assert_eq!(config.intervention_b, default_intervention_b());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_partial_comparator_uses_its_own_base_case() {
        let toml_content = r#"
[intervention_b]
visit_count = 3
visit_unit_cost = 40.0
"#;
        let config = AnalysisConfig::from_toml_str(toml_content).unwrap();

        assert_eq!(config.intervention_b.name, "Intervention B");
        assert_eq!(config.intervention_b.base_cost, 45447.0);
        assert_eq!(config.intervention_b.qaly, 3.46);
        assert_eq!(config.intervention_b.visit_count, 3);
        assert_eq!(config.intervention_a, default_intervention_a());
    }

    #[test]
    fn test_misplaced_keys_are_config_errors() {
        // currency_symbol belongs under [analysis]
        let err = AnalysisConfig::from_toml_str("[output]\ncurrency_symbol = \"$\"\n").unwrap_err();
        assert!(matches!(err, CeaError::ConfigError { .. }));
        assert!(err.to_string().contains("currency_symbol"));

        for content in [
            "[analysis]\ndescription = \"x\"\n",
            "[intervention_a]\ncost = 10\n",
            "[discount]\nyears = 5\n",
            "[threshold]\nlambda = 1\n",
            "[plane]\nzoom = 2\n",
            "[results]\nformat = \"csv\"\n",
        ] {
            assert!(matches!(
                AnalysisConfig::from_toml_str(content),
                Err(CeaError::ConfigError { .. })
            ));
        }
    }

    #[test]
    fn test_currency_symbol_from_analysis_section() {
        let config = AnalysisConfig::from_toml_str("[analysis]\ncurrency_symbol = \"€\"\n").unwrap();
        assert_eq!(config.currency_symbol(), "€");
        assert_eq!(config.analysis.name, "base-case");
        assert_eq!(AnalysisConfig::default().currency_symbol(), "£");
    }

    #[test]
    fn test_env_var_substitution() {
        std::env::set_var("CEA_TEST_WTP", "25000");

        let toml_content = r#"
[threshold]
wtp = ${CEA_TEST_WTP}
"#;

        let config = AnalysisConfig::from_toml_str(toml_content).unwrap();
        assert_eq!(config.wtp().value(), 25000.0);

        std::env::remove_var("CEA_TEST_WTP");
    }

    #[test]
    fn test_config_validation_rejects_bad_rate() {
        let config = AnalysisConfig::from_toml_str("[discount]\nrate = 1.0\n").unwrap();
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("discount.rate"));
    }

    #[test]
    fn test_config_validation_rejects_negative_qaly() {
        let toml_content = r#"
[intervention_b]
name = "B"
base_cost = 100
qaly = -0.5
"#;
        let config = AnalysisConfig::from_toml_str(toml_content).unwrap();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_config_validation_rejects_unknown_format() {
        let config = AnalysisConfig::from_toml_str("[output]\nformats = [\"xlsx\"]\n").unwrap();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_malformed_toml_is_config_error() {
        let err = AnalysisConfig::from_toml_str("[discount\nrate = ").unwrap_err();
        assert!(matches!(err, CeaError::ConfigError { .. }));
    }

    #[test]
    fn test_config_from_file() {
        let mut temp_file = NamedTempFile::new().unwrap();

        let toml_content = r#"
[analysis]
name = "file-test"
"#;

        temp_file.write_all(toml_content.as_bytes()).unwrap();

        let config = AnalysisConfig::from_file(temp_file.path()).unwrap();
        assert_eq!(config.analysis.name, "file-test");
    }
}
