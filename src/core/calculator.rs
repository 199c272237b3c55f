//! Cost-effectiveness formulas.
//!
//! Degenerate denominators never fail: a zero QALY gain yields
//! `f64::INFINITY`, which every consumer of these results must handle.

use crate::domain::model::{
    Analysis, CeaResult, ComparisonResult, DiscountParameters, InterventionProfile, WtpThreshold,
};
use crate::utils::error::{CeaError, Result};

/// `base + visits * visit_unit_cost + tests * test_unit_cost`.
pub fn total_cost(profile: &InterventionProfile) -> f64 {
    profile.base_cost
        + f64::from(profile.visit_count) * profile.visit_unit_cost
        + f64::from(profile.test_count) * profile.test_unit_cost
}

/// Present value of `value` received `years` from now at an annual `rate`.
pub fn discount(value: f64, rate: f64, years: f64) -> f64 {
    if rate == 0.0 || years == 0.0 {
        return value;
    }
    value / (1.0 + rate).powf(years)
}

pub fn cost_per_qaly(cost: f64, qaly: f64) -> f64 {
    if qaly == 0.0 {
        return f64::INFINITY;
    }
    cost / qaly
}

/// `|cost1 - cost2| / (qaly1 - qaly2)`.
///
/// The numerator is order-independent but the denominator is signed, so the
/// intervention under evaluation must always be passed first.
pub fn icer(cost1: f64, cost2: f64, qaly1: f64, qaly2: f64) -> f64 {
    let delta_qaly = qaly1 - qaly2;
    if delta_qaly == 0.0 {
        return f64::INFINITY;
    }
    (cost1 - cost2).abs() / delta_qaly
}

pub fn evaluate(profile: &InterventionProfile, params: &DiscountParameters) -> CeaResult {
    let total = total_cost(profile);
    let discounted = discount(total, params.rate, params.horizon_years);
    let qaly = if params.discount_qalys {
        discount(profile.qaly, params.rate, params.horizon_years)
    } else {
        profile.qaly
    };

    CeaResult {
        name: profile.name.clone(),
        total_cost: total,
        discounted_cost: discounted,
        qaly,
        cost_per_qaly: cost_per_qaly(discounted, qaly),
    }
}

/// Compares intervention `a` against comparator `b`.
pub fn compare(a: &CeaResult, b: &CeaResult) -> ComparisonResult {
    ComparisonResult {
        icer: icer(a.discounted_cost, b.discounted_cost, a.qaly, b.qaly),
        delta_cost: a.discounted_cost - b.discounted_cost,
        delta_qaly: a.qaly - b.qaly,
    }
}

/// Runs the full base case and rejects any NaN that slipped through.
pub fn analyse(
    a: &InterventionProfile,
    b: &InterventionProfile,
    params: &DiscountParameters,
    wtp: WtpThreshold,
) -> Result<Analysis> {
    let result_a = evaluate(a, params);
    let result_b = evaluate(b, params);
    let comparison = compare(&result_a, &result_b);

    for result in [&result_a, &result_b] {
        ensure_not_nan(&format!("total cost for {}", result.name), result.total_cost)?;
        ensure_not_nan(&format!("discounted cost for {}", result.name), result.discounted_cost)?;
        ensure_not_nan(&format!("cost per QALY for {}", result.name), result.cost_per_qaly)?;
    }
    ensure_not_nan("ICER", comparison.icer)?;
    ensure_not_nan("incremental cost", comparison.delta_cost)?;
    ensure_not_nan("incremental QALY", comparison.delta_qaly)?;

    tracing::debug!(
        icer = comparison.icer,
        delta_cost = comparison.delta_cost,
        delta_qaly = comparison.delta_qaly,
        "comparison evaluated"
    );

    Ok(Analysis {
        intervention_a: result_a,
        intervention_b: result_b,
        comparison,
        wtp,
    })
}

fn ensure_not_nan(quantity: &str, value: f64) -> Result<()> {
    if value.is_nan() {
        return Err(CeaError::NonFiniteResultError {
            quantity: quantity.to_string(),
            value,
        });
    }
    Ok(())
}
