use serde::{Deserialize, Serialize};

/// One treatment option's cost drivers and health outcome.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct InterventionProfile {
    pub name: String,
    pub base_cost: f64,
    pub visit_count: u32,
    pub visit_unit_cost: f64,
    pub test_count: u32,
    pub test_unit_cost: f64,
    pub qaly: f64,
}

impl InterventionProfile {
    /// A profile with no additional utilisation.
    pub fn new(name: impl Into<String>, base_cost: f64, qaly: f64) -> Self {
        Self {
            name: name.into(),
            base_cost,
            visit_count: 0,
            visit_unit_cost: 0.0,
            test_count: 0,
            test_unit_cost: 0.0,
            qaly,
        }
    }

    pub fn with_visits(mut self, count: u32, unit_cost: f64) -> Self {
        self.visit_count = count;
        self.visit_unit_cost = unit_cost;
        self
    }

    pub fn with_tests(mut self, count: u32, unit_cost: f64) -> Self {
        self.test_count = count;
        self.test_unit_cost = unit_cost;
        self
    }
}

/// Applied uniformly to every intervention in a comparison.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct DiscountParameters {
    #[serde(default)]
    pub rate: f64,
    #[serde(default)]
    pub horizon_years: f64,
    /// Off by default: only costs are discounted unless this is set.
    #[serde(default)]
    pub discount_qalys: bool,
}

impl Default for DiscountParameters {
    fn default() -> Self {
        Self {
            rate: 0.0,
            horizon_years: 0.0,
            discount_qalys: false,
        }
    }
}

/// Per-intervention outcome. `cost_per_qaly` is `f64::INFINITY` when the
/// intervention yields zero QALYs.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CeaResult {
    pub name: String,
    pub total_cost: f64,
    pub discounted_cost: f64,
    pub qaly: f64,
    pub cost_per_qaly: f64,
}

/// Pairwise outcome of intervention A against comparator B. `icer` is
/// `f64::INFINITY` when both interventions yield the same QALYs.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ComparisonResult {
    pub icer: f64,
    pub delta_cost: f64,
    pub delta_qaly: f64,
}

/// Currency per QALY a decision-maker is willing to pay.
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Serialize, Deserialize)]
#[serde(transparent)]
pub struct WtpThreshold(pub f64);

impl WtpThreshold {
    pub fn value(&self) -> f64 {
        self.0
    }
}

impl Default for WtpThreshold {
    fn default() -> Self {
        WtpThreshold(20_000.0)
    }
}

/// Everything the calculator produced for one run.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Analysis {
    pub intervention_a: CeaResult,
    pub intervention_b: CeaResult,
    pub comparison: ComparisonResult,
    pub wtp: WtpThreshold,
}

/// Where the comparison falls on the cost-effectiveness plane.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Quadrant {
    /// More effective and more costly: a trade-off judged against the threshold.
    NorthEast,
    /// Less effective and more costly: A is dominated.
    NorthWest,
    /// More effective and less costly: A dominates.
    SouthEast,
    /// Less effective and less costly.
    SouthWest,
    /// At least one delta is exactly zero.
    OnAxis,
}

/// One row of the summary table. Serialized column names match the
/// exported CSV/TSV header.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SummaryRow {
    #[serde(rename = "Intervention")]
    pub intervention: String,
    #[serde(rename = "Costs")]
    pub costs: f64,
    #[serde(rename = "QALYs")]
    pub qalys: f64,
    #[serde(rename = "Incremental costs")]
    pub incremental_costs: f64,
    #[serde(rename = "Incremental QALY")]
    pub incremental_qaly: f64,
    #[serde(rename = "ICER")]
    pub icer: f64,
}

/// Row per intervention. Incremental columns and ICER are pairwise, so only
/// the first row carries them; the second is zero-filled.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SummaryTable {
    pub rows: Vec<SummaryRow>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Decision {
    /// A is at least as effective and no more costly.
    Dominant,
    /// A is no more effective and at least as costly.
    Dominated,
    /// ICER at or below the threshold.
    CostEffective,
    /// ICER above the threshold.
    NotCostEffective,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DecisionSummary {
    pub quadrant: Quadrant,
    pub decision: Decision,
    /// `wtp * delta_qaly - delta_cost`.
    pub net_monetary_benefit: f64,
    /// Name of the intervention with the lower cost per QALY, `None` on a tie.
    pub better_cost_per_qaly: Option<String>,
}

/// Geometry parameters for the cost-effectiveness plane.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct PlaneSettings {
    /// Axis limits are the deltas' magnitude times this factor.
    pub padding: f64,
    /// Half-width of the ICER line's QALY domain when the delta is smaller.
    pub icer_line_extent: f64,
    /// Half-width of the WTP line's QALY domain when the delta is smaller.
    pub wtp_line_extent: f64,
    pub min_qaly_half_span: f64,
    pub min_cost_half_span: f64,
    pub width: u32,
    pub height: u32,
}

impl Default for PlaneSettings {
    fn default() -> Self {
        Self {
            padding: 1.2,
            icer_line_extent: 2.0,
            wtp_line_extent: 5.0,
            min_qaly_half_span: 0.1,
            min_cost_half_span: 100.0,
            width: 1600,
            height: 1200,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct OutputSettings {
    pub output_path: String,
    pub plane_filename: String,
    pub table_basename: String,
    pub formats: Vec<String>,
    pub render_plane: bool,
    /// Written as JSON when `export_decision` is set.
    pub decision_filename: String,
    pub export_decision: bool,
}

impl Default for OutputSettings {
    fn default() -> Self {
        Self {
            output_path: "./output".to_string(),
            plane_filename: "ce_plane.png".to_string(),
            table_basename: "cea_summary".to_string(),
            formats: vec!["csv".to_string()],
            render_plane: true,
            decision_filename: "cea_decision.json".to_string(),
            export_decision: true,
        }
    }
}

/// Rendered output of one run, ready to be written out.
#[derive(Debug, Clone)]
pub struct CeaReport {
    /// The five fixed report lines.
    pub text: String,
    pub table: SummaryTable,
    pub decision: DecisionSummary,
    pub decision_text: String,
    pub plane_png: Option<Vec<u8>>,
}
