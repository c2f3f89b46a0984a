//! Scatter-plus-line plots of segment files.
//!
//! Every conversion owns its [`Canvas`], nothing is shared between plots.

use std::path::Path;

use tiny_skia::{Color, FillRule, Mask, Paint, PathBuilder, Pixmap, Stroke, Transform};
use tracing::debug;

use crate::error::{Error, Result};
use crate::geometry::{Edge, Rect, Vertex};
use crate::io::SegmentFile;

/// space left around the vertices, in plot units
pub const MARGIN: f64 = 3.;

pub const DEFAULT_WIDTH: u32 = 640;
pub const DEFAULT_HEIGHT: u32 = 480;

const POINT_COLOR: [u8; 3] = [255, 0, 0];
const EDGE_COLOR: [u8; 3] = [0, 0, 255];
const POINT_RADIUS: f32 = 4.;
const EDGE_WIDTH: f32 = 2.;
const FRAME_WIDTH: f32 = 1.;
const TICK_LENGTH: f32 = 4.;
const MAX_TICKS: usize = 8;

// axes position, as fractions of the canvas measured from the bottom left
const FRAME_LEFT: f32 = 0.125;
const FRAME_RIGHT: f32 = 0.9;
const FRAME_BOTTOM: f32 = 0.11;
const FRAME_TOP: f32 = 0.88;

/// Visible data range of a plot.
pub type Bounds = Rect;

/// the vertex bounding box widened by [`MARGIN`] on every side
pub fn bounds(vertices: &[Vertex]) -> Result<Bounds> {
    Rect::around(vertices.iter().copied())
        .map(|r| r.grow(MARGIN))
        .ok_or(Error::EmptyVertexSet)
}

/// What ends up on the canvas: a point series, a segment series and the axis ranges.
#[derive(Clone, Debug, PartialEq)]
pub struct Plot {
    pub points: Vec<Vertex>,
    pub segments: Vec<Edge>,
    pub bounds: Bounds,
}

impl Plot {
    pub fn new(data: SegmentFile) -> Result<Self> {
        let bounds = bounds(&data.vertices)?;
        Ok(Plot { points: data.vertices, segments: data.edges, bounds })
    }
}

/// Tick positions inside `[lo, hi]` at a step of 1, 2, 2.5 or 5 times a power of ten,
/// at most [`MAX_TICKS`] of them.
pub fn ticks(lo: f64, hi: f64) -> Vec<f64> {
    let span = hi - lo;
    if !(span > 0.) || !span.is_finite() {
        return vec![];
    }
    let raw = span / MAX_TICKS as f64;
    let magnitude = 10f64.powf(raw.log10().floor());
    let step = [1., 2., 2.5, 5., 10.]
        .iter()
        .map(|m| m * magnitude)
        .find(|&s| s >= raw)
        .unwrap_or(10. * magnitude);
    let start = (lo / step).ceil() * step;
    let mut out: Vec<f64> = vec![];
    for k in 0..=MAX_TICKS {
        let t = start + k as f64 * step;
        if t > hi {
            break;
        }
        // far from zero the step can vanish in rounding
        if t >= lo && out.last() != Some(&t) {
            out.push(t);
        }
    }
    return out;
}

fn paint(rgb: [u8; 3]) -> Paint<'static> {
    let mut paint = Paint::default();
    paint.set_color_rgba8(rgb[0], rgb[1], rgb[2], 255);
    paint.anti_alias = true;
    paint
}

/// An explicit drawing surface, white until something is drawn.
pub struct Canvas {
    pixmap: Pixmap,
    frame: tiny_skia::Rect,
}

impl Canvas {
    pub fn new(width: u32, height: u32) -> Result<Self> {
        let mut pixmap = Pixmap::new(width, height).ok_or(Error::Canvas { width, height })?;
        pixmap.fill(Color::WHITE);
        let (w, h) = (width as f32, height as f32);
        let frame = tiny_skia::Rect::from_ltrb(FRAME_LEFT * w, (1. - FRAME_TOP) * h, FRAME_RIGHT * w, (1. - FRAME_BOTTOM) * h)
            .ok_or(Error::Canvas { width, height })?;
        Ok(Canvas { pixmap, frame })
    }

    pub fn pixmap(&self) -> &Pixmap {
        &self.pixmap
    }

    /// the axes rectangle in pixels
    pub fn frame(&self) -> tiny_skia::Rect {
        self.frame
    }

    /// pixel position of `v` when the frame shows `bounds`
    pub fn project(&self, bounds: &Bounds, v: Vertex) -> (f32, f32) {
        let frame = self.frame;
        let fx = (v.x - bounds.x_min) / (bounds.x_max - bounds.x_min);
        let fy = (v.y - bounds.y_min) / (bounds.y_max - bounds.y_min);
        let px = frame.left() + (fx as f32) * frame.width();
        let py = frame.bottom() - (fy as f32) * frame.height();
        (px, py)
    }

    /// Draws the points, then the segments on top, clipped to the frame, then the axes.
    pub fn draw(&mut self, plot: &Plot) {
        let frame = self.frame;
        let clip = self.frame_mask(frame);

        let marker = paint(POINT_COLOR);
        for &v in &plot.points {
            let (x, y) = self.project(&plot.bounds, v);
            if let Some(circle) = PathBuilder::from_circle(x, y, POINT_RADIUS) {
                self.pixmap.fill_path(&circle, &marker, FillRule::Winding, Transform::identity(), clip.as_ref());
            }
        }

        let line = paint(EDGE_COLOR);
        let stroke = Stroke { width: EDGE_WIDTH, ..Stroke::default() };
        for e in &plot.segments {
            let (x1, y1) = self.project(&plot.bounds, e.from);
            let (x2, y2) = self.project(&plot.bounds, e.to);
            let mut pb = PathBuilder::new();
            pb.move_to(x1, y1);
            pb.line_to(x2, y2);
            // zero length segments give no path
            if let Some(path) = pb.finish() {
                self.pixmap.stroke_path(&path, &line, &stroke, Transform::identity(), clip.as_ref());
            }
        }

        self.draw_axes(frame, &plot.bounds);
        debug!(points = plot.points.len(), segments = plot.segments.len(), "drew plot");
    }

    fn frame_mask(&self, frame: tiny_skia::Rect) -> Option<Mask> {
        let mut mask = Mask::new(self.pixmap.width(), self.pixmap.height())?;
        mask.fill_path(&PathBuilder::from_rect(frame), FillRule::Winding, false, Transform::identity());
        Some(mask)
    }

    fn draw_axes(&mut self, frame: tiny_skia::Rect, bounds: &Bounds) {
        let black = paint([0, 0, 0]);
        let stroke = Stroke { width: FRAME_WIDTH, ..Stroke::default() };

        let mut pb = PathBuilder::new();
        pb.push_rect(frame);
        for x in ticks(bounds.x_min, bounds.x_max) {
            let (px, _) = self.project(bounds, Vertex::new(x, bounds.y_min));
            pb.move_to(px, frame.bottom());
            pb.line_to(px, frame.bottom() + TICK_LENGTH);
        }
        for y in ticks(bounds.y_min, bounds.y_max) {
            let (_, py) = self.project(bounds, Vertex::new(bounds.x_min, y));
            pb.move_to(frame.left(), py);
            pb.line_to(frame.left() - TICK_LENGTH, py);
        }
        if let Some(path) = pb.finish() {
            self.pixmap.stroke_path(&path, &black, &stroke, Transform::identity(), None);
        }
    }

    pub fn encode_png(&self) -> Result<Vec<u8>> {
        self.pixmap.encode_png().map_err(|e| Error::Encode(e.to_string()))
    }

    /// Encodes first, so a failed encode leaves no file behind. Replaces an existing file.
    pub fn save_png(&self, path: &Path) -> Result<()> {
        let png = self.encode_png()?;
        std::fs::write(path, png).map_err(|source| Error::Write { path: path.to_path_buf(), source })
    }
}
