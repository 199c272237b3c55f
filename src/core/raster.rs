//! Rasterises a [`PlaneGeometry`] into a PNG.

use crate::core::plane::{AxisLimits, PlaneGeometry, Point, Segment};
use crate::utils::error::Result;
use image::{DynamicImage, ImageOutputFormat, Rgb, RgbImage};
use std::io::Cursor;

const BACKGROUND: Rgb<u8> = Rgb([255, 255, 255]);
const GRID: Rgb<u8> = Rgb([214, 214, 214]);
const AXIS: Rgb<u8> = Rgb([0, 0, 0]);
const ICER_LINE: Rgb<u8> = Rgb([0x1f, 0x77, 0xb4]);
const WTP_LINE: Rgb<u8> = Rgb([0xd6, 0x27, 0x28]);
const MARKER_FILL: Rgb<u8> = Rgb([0x34, 0x98, 0xdb]);
const MARKER_EDGE: Rgb<u8> = Rgb([0x29, 0x80, 0xb9]);

const GRID_DIVISIONS: u32 = 10;

#[derive(Debug, Clone, Copy)]
enum Stroke {
    Solid,
    /// `(on, off)` lengths in pixels.
    Pattern(u32, u32),
}

/// Maps data coordinates onto the pixel canvas, y growing downwards.
struct Viewport {
    limits: AxisLimits,
    width: u32,
    height: u32,
    margin: f64,
}

impl Viewport {
    fn new(limits: AxisLimits, width: u32, height: u32) -> Self {
        let margin = (f64::from(width.min(height)) * 0.05).round();
        Self {
            limits,
            width,
            height,
            margin,
        }
    }

    fn to_pixel(&self, p: Point) -> (i64, i64) {
        let plot_w = f64::from(self.width) - 2.0 * self.margin;
        let plot_h = f64::from(self.height) - 2.0 * self.margin;
        let fx = (p.x - self.limits.x_min) / (self.limits.x_max - self.limits.x_min);
        let fy = (p.y - self.limits.y_min) / (self.limits.y_max - self.limits.y_min);
        let px = self.margin + fx * plot_w;
        let py = f64::from(self.height) - self.margin - fy * plot_h;
        (px.round() as i64, py.round() as i64)
    }

    fn line_width(&self) -> i64 {
        (i64::from(self.width.min(self.height)) / 400).max(1)
    }
}

pub fn render_png(geometry: &PlaneGeometry, width: u32, height: u32) -> Result<Vec<u8>> {
    let image = render(geometry, width, height);
    let mut bytes = Vec::new();
    DynamicImage::ImageRgb8(image).write_to(&mut Cursor::new(&mut bytes), ImageOutputFormat::Png)?;
    tracing::debug!("Encoded plane image ({} bytes, {}x{})", bytes.len(), width, height);
    Ok(bytes)
}

pub fn render(geometry: &PlaneGeometry, width: u32, height: u32) -> RgbImage {
    let mut image = RgbImage::from_pixel(width, height, BACKGROUND);
    let viewport = Viewport::new(geometry.limits, width, height);
    let lw = viewport.line_width();
    let dash = (lw * 6) as u32;

    let limits = geometry.limits;
    for i in 0..=GRID_DIVISIONS {
        let t = f64::from(i) / f64::from(GRID_DIVISIONS);
        let x = limits.x_min + t * (limits.x_max - limits.x_min);
        let y = limits.y_min + t * (limits.y_max - limits.y_min);
        let vertical = Segment {
            from: Point { x, y: limits.y_min },
            to: Point { x, y: limits.y_max },
        };
        let horizontal = Segment {
            from: Point { x: limits.x_min, y },
            to: Point { x: limits.x_max, y },
        };
        for grid_line in [vertical, horizontal] {
            draw_segment(&mut image, &viewport, grid_line, GRID, 1, Stroke::Pattern(dash, dash));
        }
    }

    draw_segment(&mut image, &viewport, geometry.horizontal_zero, AXIS, lw, Stroke::Solid);
    draw_segment(&mut image, &viewport, geometry.vertical_zero, AXIS, lw, Stroke::Solid);
    draw_segment(
        &mut image,
        &viewport,
        geometry.icer_line,
        ICER_LINE,
        lw,
        Stroke::Pattern(dash * 2, dash),
    );
    draw_segment(
        &mut image,
        &viewport,
        geometry.wtp_line,
        WTP_LINE,
        lw,
        Stroke::Pattern(lw as u32 * 2, lw as u32 * 3),
    );

    if limits.contains(geometry.point) {
        let (cx, cy) = viewport.to_pixel(geometry.point);
        let radius = lw * 5;
        fill_circle(&mut image, cx, cy, radius, MARKER_EDGE);
        fill_circle(&mut image, cx, cy, radius - lw, MARKER_FILL);
    }

    image
}

/// Liang-Barsky clip against the axis limits. `None` when the segment lies
/// entirely outside.
fn clip(segment: Segment, limits: &AxisLimits) -> Option<Segment> {
    let (x0, y0) = (segment.from.x, segment.from.y);
    let dx = segment.to.x - x0;
    let dy = segment.to.y - y0;
    let mut t0 = 0.0_f64;
    let mut t1 = 1.0_f64;

    let checks = [
        (-dx, x0 - limits.x_min),
        (dx, limits.x_max - x0),
        (-dy, y0 - limits.y_min),
        (dy, limits.y_max - y0),
    ];
    for (p, q) in checks {
        if p == 0.0 {
            if q < 0.0 {
                return None;
            }
            continue;
        }
        let r = q / p;
        if p < 0.0 {
            if r > t1 {
                return None;
            }
            t0 = t0.max(r);
        } else {
            if r < t0 {
                return None;
            }
            t1 = t1.min(r);
        }
    }

    Some(Segment {
        from: Point { x: x0 + t0 * dx, y: y0 + t0 * dy },
        to: Point { x: x0 + t1 * dx, y: y0 + t1 * dy },
    })
}

fn draw_segment(
    image: &mut RgbImage,
    viewport: &Viewport,
    segment: Segment,
    color: Rgb<u8>,
    width: i64,
    stroke: Stroke,
) {
    let Some(clipped) = clip(segment, &viewport.limits) else {
        return;
    };
    let (mut x, mut y) = viewport.to_pixel(clipped.from);
    let (x1, y1) = viewport.to_pixel(clipped.to);

    // Bresenham
    let dx = (x1 - x).abs();
    let dy = -(y1 - y).abs();
    let sx = if x < x1 { 1 } else { -1 };
    let sy = if y < y1 { 1 } else { -1 };
    let mut err = dx + dy;
    let mut step: u32 = 0;

    loop {
        let visible = match stroke {
            Stroke::Solid => true,
            Stroke::Pattern(on, off) => step % (on + off).max(1) < on,
        };
        if visible {
            stamp(image, x, y, width, color);
        }
        if x == x1 && y == y1 {
            break;
        }
        let e2 = 2 * err;
        if e2 >= dy {
            err += dy;
            x += sx;
        }
        if e2 <= dx {
            err += dx;
            y += sy;
        }
        step = step.wrapping_add(1);
    }
}

fn stamp(image: &mut RgbImage, cx: i64, cy: i64, width: i64, color: Rgb<u8>) {
    let half = width / 2;
    for y in (cy - half)..(cy - half + width) {
        for x in (cx - half)..(cx - half + width) {
            put(image, x, y, color);
        }
    }
}

fn fill_circle(image: &mut RgbImage, cx: i64, cy: i64, radius: i64, color: Rgb<u8>) {
    if radius <= 0 {
        return;
    }
    for y in (cy - radius)..=(cy + radius) {
        for x in (cx - radius)..=(cx + radius) {
            let (ox, oy) = (x - cx, y - cy);
            if ox * ox + oy * oy <= radius * radius {
                put(image, x, y, color);
            }
        }
    }
}

fn put(image: &mut RgbImage, x: i64, y: i64, color: Rgb<u8>) {
    if x >= 0 && y >= 0 && x < i64::from(image.width()) && y < i64::from(image.height()) {
        image.put_pixel(x as u32, y as u32, color);
    }
}
