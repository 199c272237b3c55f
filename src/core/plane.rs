//! Geometry of the cost-effectiveness plane, in data coordinates
//! (x = incremental QALYs, y = incremental cost).

use crate::domain::model::{ComparisonResult, PlaneSettings, Quadrant, WtpThreshold};
use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Segment {
    pub from: Point,
    pub to: Point,
}

/// Symmetric around the origin, never zero-width.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct AxisLimits {
    pub x_min: f64,
    pub x_max: f64,
    pub y_min: f64,
    pub y_max: f64,
}

impl AxisLimits {
    pub fn contains(&self, p: Point) -> bool {
        p.x >= self.x_min && p.x <= self.x_max && p.y >= self.y_min && p.y <= self.y_max
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct PlaneGeometry {
    pub point: Point,
    /// Dashed, slope = ICER. Vertical along `x = 0` when the ICER is infinite.
    pub icer_line: Segment,
    /// Dotted, slope = WTP threshold.
    pub wtp_line: Segment,
    pub horizontal_zero: Segment,
    pub vertical_zero: Segment,
    pub limits: AxisLimits,
}

pub fn plane_geometry(
    comparison: &ComparisonResult,
    wtp: WtpThreshold,
    settings: &PlaneSettings,
) -> PlaneGeometry {
    let dq = comparison.delta_qaly;
    let dc = comparison.delta_cost;

    let x_half = (dq.abs() * settings.padding).max(settings.min_qaly_half_span);
    let y_half = (dc.abs() * settings.padding).max(settings.min_cost_half_span);
    let limits = AxisLimits {
        x_min: -x_half,
        x_max: x_half,
        y_min: -y_half,
        y_max: y_half,
    };

    let icer_line = if comparison.icer.is_finite() {
        line_through_origin(comparison.icer, dq * settings.padding, settings.icer_line_extent)
    } else {
        Segment {
            from: Point { x: 0.0, y: limits.y_min },
            to: Point { x: 0.0, y: limits.y_max },
        }
    };
    let wtp_line = line_through_origin(wtp.value(), dq * settings.padding, settings.wtp_line_extent);

    PlaneGeometry {
        point: Point { x: dq, y: dc },
        icer_line,
        wtp_line,
        horizontal_zero: Segment {
            from: Point { x: limits.x_min, y: 0.0 },
            to: Point { x: limits.x_max, y: 0.0 },
        },
        vertical_zero: Segment {
            from: Point { x: 0.0, y: limits.y_min },
            to: Point { x: 0.0, y: limits.y_max },
        },
        limits,
    }
}

/// The x-domain always covers `[-extent, extent]` and stretches to include
/// the padded delta.
fn line_through_origin(slope: f64, padded_delta: f64, extent: f64) -> Segment {
    let x0 = (-extent).min(padded_delta);
    let x1 = extent.max(padded_delta);
    Segment {
        from: Point { x: x0, y: x0 * slope },
        to: Point { x: x1, y: x1 * slope },
    }
}

pub fn quadrant(comparison: &ComparisonResult) -> Quadrant {
    use std::cmp::Ordering::{Greater, Less};

    let dq = comparison.delta_qaly.partial_cmp(&0.0);
    let dc = comparison.delta_cost.partial_cmp(&0.0);
    match (dq, dc) {
        (Some(Greater), Some(Greater)) => Quadrant::NorthEast,
        (Some(Less), Some(Greater)) => Quadrant::NorthWest,
        (Some(Greater), Some(Less)) => Quadrant::SouthEast,
        (Some(Less), Some(Less)) => Quadrant::SouthWest,
        _ => Quadrant::OnAxis,
    }
}
