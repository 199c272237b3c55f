use crate::core::plane::quadrant;
use crate::domain::model::{Analysis, Decision, DecisionSummary, Quadrant, SummaryRow, SummaryTable};
use crate::utils::error::{CeaError, Result};

/// Two decimals after the currency symbol. Infinite ratios print as `inf`.
pub fn format_currency(symbol: &str, value: f64) -> String {
    if value.is_infinite() {
        let sign = if value < 0.0 { "-" } else { "" };
        return format!("{}{}inf", symbol, sign);
    }
    format!("{}{:.2}", symbol, value)
}

/// The five report lines, in fixed order.
pub fn text_summary(analysis: &Analysis, symbol: &str) -> String {
    let a = &analysis.intervention_a;
    let b = &analysis.intervention_b;
    [
        format!(
            "Total and Discounted Cost for {}: {}, {}",
            a.name,
            format_currency(symbol, a.total_cost),
            format_currency(symbol, a.discounted_cost)
        ),
        format!(
            "Total and Discounted Cost for {}: {}, {}",
            b.name,
            format_currency(symbol, b.total_cost),
            format_currency(symbol, b.discounted_cost)
        ),
        format!(
            "Cost per QALY for {}: {}",
            a.name,
            format_currency(symbol, a.cost_per_qaly)
        ),
        format!(
            "Cost per QALY for {}: {}",
            b.name,
            format_currency(symbol, b.cost_per_qaly)
        ),
        format!(
            "ICER (Incremental Cost-Effectiveness Ratio): {}",
            format_currency(symbol, analysis.comparison.icer)
        ),
    ]
    .join("\n")
}

pub fn summary_table(analysis: &Analysis) -> SummaryTable {
    let a = &analysis.intervention_a;
    let b = &analysis.intervention_b;
    let cmp = &analysis.comparison;
    SummaryTable {
        rows: vec![
            SummaryRow {
                intervention: a.name.clone(),
                costs: a.discounted_cost,
                qalys: a.qaly,
                incremental_costs: cmp.delta_cost,
                incremental_qaly: cmp.delta_qaly,
                icer: cmp.icer,
            },
            SummaryRow {
                intervention: b.name.clone(),
                costs: b.discounted_cost,
                qalys: b.qaly,
                incremental_costs: 0.0,
                incremental_qaly: 0.0,
                icer: 0.0,
            },
        ],
    }
}

/// Dominance first, then net monetary benefit against the threshold.
pub fn decision_summary(analysis: &Analysis) -> DecisionSummary {
    let cmp = &analysis.comparison;
    let wtp = analysis.wtp.value();
    let net_monetary_benefit = wtp * cmp.delta_qaly - cmp.delta_cost;
    let quadrant = quadrant(cmp);

    let identical = cmp.delta_qaly == 0.0 && cmp.delta_cost == 0.0;
    let decision = if !identical && cmp.delta_qaly >= 0.0 && cmp.delta_cost <= 0.0 {
        Decision::Dominant
    } else if !identical && cmp.delta_qaly <= 0.0 && cmp.delta_cost >= 0.0 {
        Decision::Dominated
    } else if net_monetary_benefit >= 0.0 {
        Decision::CostEffective
    } else {
        Decision::NotCostEffective
    };

    let a = &analysis.intervention_a;
    let b = &analysis.intervention_b;
    let better_cost_per_qaly = match a.cost_per_qaly.partial_cmp(&b.cost_per_qaly) {
        Some(std::cmp::Ordering::Less) => Some(a.name.clone()),
        Some(std::cmp::Ordering::Greater) => Some(b.name.clone()),
        _ => None,
    };

    DecisionSummary {
        quadrant,
        decision,
        net_monetary_benefit,
        better_cost_per_qaly,
    }
}

pub fn decision_text(analysis: &Analysis, summary: &DecisionSummary, symbol: &str) -> String {
    let a = &analysis.intervention_a.name;
    let b = &analysis.intervention_b.name;
    let wtp = format_currency(symbol, analysis.wtp.value());

    let mut lines = Vec::new();
    match &summary.better_cost_per_qaly {
        Some(name) => lines.push(format!("Lower cost per QALY: {}", name)),
        None => lines.push("Lower cost per QALY: tie".to_string()),
    }

    let quadrant = match summary.quadrant {
        Quadrant::NorthEast => "north-east (more effective, more costly)",
        Quadrant::NorthWest => "north-west (less effective, more costly)",
        Quadrant::SouthEast => "south-east (more effective, less costly)",
        Quadrant::SouthWest => "south-west (less effective, less costly)",
        Quadrant::OnAxis => "on an axis (no difference in cost or QALYs)",
    };
    lines.push(format!("Plane quadrant for {} vs {}: {}", a, b, quadrant));

    let verdict = match summary.decision {
        Decision::Dominant => format!("{} dominates {}", a, b),
        Decision::Dominated => format!("{} is dominated by {}", a, b),
        Decision::CostEffective => format!("{} is cost-effective at {} per QALY", a, wtp),
        Decision::NotCostEffective => format!("{} is not cost-effective at {} per QALY", a, wtp),
    };
    lines.push(format!("Decision: {}", verdict));
    lines.push(format!(
        "Net monetary benefit at {} per QALY: {}",
        wtp,
        format_currency(symbol, summary.net_monetary_benefit)
    ));

    lines.join("\n")
}

/// Console rendering of the table, one aligned row per intervention.
pub fn render_table(table: &SummaryTable) -> String {
    let headers = ["", "Costs", "QALYs", "Incremental costs", "Incremental QALY", "ICER"];
    let mut cells: Vec<Vec<String>> = vec![headers.iter().map(|h| h.to_string()).collect()];
    for row in &table.rows {
        cells.push(vec![
            row.intervention.clone(),
            format_number(row.costs),
            format_number(row.qalys),
            format_number(row.incremental_costs),
            format_number(row.incremental_qaly),
            format_number(row.icer),
        ]);
    }

    let widths: Vec<usize> = (0..headers.len())
        .map(|col| cells.iter().map(|r| r[col].len()).max().unwrap_or(0))
        .collect();

    cells
        .iter()
        .map(|row| {
            row.iter()
                .enumerate()
                .map(|(col, cell)| {
                    if col == 0 {
                        format!("{:<width$}", cell, width = widths[col])
                    } else {
                        format!("{:>width$}", cell, width = widths[col])
                    }
                })
                .collect::<Vec<_>>()
                .join("  ")
        })
        .collect::<Vec<_>>()
        .join("\n")
}

fn format_number(value: f64) -> String {
    if value.is_infinite() {
        return if value < 0.0 { "-inf".to_string() } else { "inf".to_string() };
    }
    format!("{:.2}", value)
}

pub fn table_to_delimited(table: &SummaryTable, delimiter: u8) -> Result<String> {
    let mut writer = csv::WriterBuilder::new()
        .delimiter(delimiter)
        .from_writer(Vec::new());
    for row in &table.rows {
        writer.serialize(row)?;
    }
    let bytes = writer.into_inner().map_err(|e| CeaError::IoError(e.into_error()))?;
    String::from_utf8(bytes)
        .map_err(|e| CeaError::IoError(std::io::Error::new(std::io::ErrorKind::InvalidData, e)))
}

/// Non-finite ratios serialize as `null`.
pub fn table_to_json(table: &SummaryTable) -> Result<String> {
    Ok(serde_json::to_string_pretty(&table.rows)?)
}

pub fn decision_to_json(summary: &DecisionSummary) -> Result<String> {
    Ok(serde_json::to_string_pretty(summary)?)
}
