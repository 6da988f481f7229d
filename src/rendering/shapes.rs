//! CPU tessellation of flat 2D shapes into colored triangles.
//!
//! Coordinates are window pixels with the origin at the top left and y
//! pointing down. Colors are straight-alpha sRGB.

use std::f32::consts::TAU;

use bytemuck::{Pod, Zeroable};
use glam::Vec2;

/// Vertex for the shape pipeline
#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, Pod, Zeroable)]
pub struct ShapeVertex {
    pub position: [f32; 2],
    pub color: [f32; 4],
}

impl ShapeVertex {
    pub const ATTRIBUTES: [wgpu::VertexAttribute; 2] =
        wgpu::vertex_attr_array![0 => Float32x2, 1 => Float32x4];

    pub fn layout() -> wgpu::VertexBufferLayout<'static> {
        wgpu::VertexBufferLayout {
            array_stride: std::mem::size_of::<ShapeVertex>() as wgpu::BufferAddress,
            step_mode: wgpu::VertexStepMode::Vertex,
            attributes: &Self::ATTRIBUTES,
        }
    }
}

/// Triangle list accumulated over one frame
#[derive(Debug, Default, Clone)]
pub struct ShapeBatch {
    vertices: Vec<ShapeVertex>,
}

impl ShapeBatch {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn clear(&mut self) {
        self.vertices.clear();
    }

    pub fn vertices(&self) -> &[ShapeVertex] {
        &self.vertices
    }

    pub fn is_empty(&self) -> bool {
        self.vertices.is_empty()
    }

    fn triangle(&mut self, a: Vec2, b: Vec2, c: Vec2, colors: [[f32; 4]; 3]) {
        self.vertices.extend([
            ShapeVertex {
                position: a.into(),
                color: colors[0],
            },
            ShapeVertex {
                position: b.into(),
                color: colors[1],
            },
            ShapeVertex {
                position: c.into(),
                color: colors[2],
            },
        ]);
    }

    /// Axis-aligned rectangle
    pub fn rect(&mut self, min: Vec2, max: Vec2, color: [f32; 4]) {
        self.rect_vertical_gradient(min, max, color, color);
    }

    /// Rectangle fading from `top` to `bottom`
    pub fn rect_vertical_gradient(
        &mut self,
        min: Vec2,
        max: Vec2,
        top: [f32; 4],
        bottom: [f32; 4],
    ) {
        if color_invisible(top) && color_invisible(bottom) {
            return;
        }
        let tr = Vec2::new(max.x, min.y);
        let bl = Vec2::new(min.x, max.y);
        self.triangle(min, tr, max, [top, top, bottom]);
        self.triangle(min, max, bl, [top, bottom, bottom]);
    }

    /// Filled circle
    pub fn circle(&mut self, center: Vec2, radius: f32, color: [f32; 4]) {
        self.radial(center, radius, color, color);
    }

    /// Filled circle fading from `inner` at the center to `outer` at the rim
    pub fn radial(&mut self, center: Vec2, radius: f32, inner: [f32; 4], outer: [f32; 4]) {
        if radius <= 0.0 || (color_invisible(inner) && color_invisible(outer)) {
            return;
        }
        let segments = segments_for(radius, TAU);
        let mut prev = center + Vec2::new(radius, 0.0);
        for i in 1..=segments {
            let angle = TAU * i as f32 / segments as f32;
            let next = center + Vec2::from_angle(angle) * radius;
            self.triangle(center, prev, next, [inner, outer, outer]);
            prev = next;
        }
    }

    /// Stroked arc of `width` starting at `start` radians, sweeping `sweep`
    /// radians clockwise on screen
    pub fn arc(
        &mut self,
        center: Vec2,
        radius: f32,
        width: f32,
        start: f32,
        sweep: f32,
        color: [f32; 4],
    ) {
        if sweep.abs() <= f32::EPSILON || width <= 0.0 || color_invisible(color) {
            return;
        }
        let inner_r = (radius - width * 0.5).max(0.0);
        let outer_r = radius + width * 0.5;
        let segments = segments_for(outer_r, sweep);

        let point = |angle: f32, r: f32| center + Vec2::from_angle(angle) * r;
        let mut angle = start;
        for i in 1..=segments {
            let next = start + sweep * i as f32 / segments as f32;
            let (a, b) = (point(angle, inner_r), point(angle, outer_r));
            let (c, d) = (point(next, inner_r), point(next, outer_r));
            self.triangle(a, b, d, [color; 3]);
            self.triangle(a, d, c, [color; 3]);
            angle = next;
        }
    }

    pub fn ring(&mut self, center: Vec2, radius: f32, width: f32, color: [f32; 4]) {
        self.arc(center, radius, width, 0.0, TAU, color);
    }

    /// Ring broken into dashes of `dash` px separated by `gap` px along the
    /// circumference, rotated by `rotation` radians
    pub fn dashed_ring(
        &mut self,
        center: Vec2,
        radius: f32,
        width: f32,
        (dash, gap): (f32, f32),
        rotation: f32,
        color: [f32; 4],
    ) {
        if radius <= 0.0 || dash <= 0.0 {
            return;
        }
        let period = (dash + gap.max(0.0)) / radius;
        let dash_angle = dash / radius;
        let count = (TAU / period).floor() as usize;
        for i in 0..count {
            self.arc(
                center,
                radius,
                width,
                rotation + i as f32 * period,
                dash_angle,
                color,
            );
        }
    }

    /// Straight segment of `width` px
    pub fn line(&mut self, a: Vec2, b: Vec2, width: f32, color: [f32; 4]) {
        let dir = b - a;
        if dir.length_squared() <= f32::EPSILON || color_invisible(color) {
            return;
        }
        let normal = dir.perp().normalize() * (width * 0.5);
        self.triangle(a - normal, a + normal, b + normal, [color; 3]);
        self.triangle(a - normal, b + normal, b - normal, [color; 3]);
    }
}

/// Segment count keeping chords around 4 px
fn segments_for(radius: f32, sweep: f32) -> usize {
    ((radius * sweep.abs() / 4.0).ceil() as usize).clamp(6, 256)
}

fn color_invisible(color: [f32; 4]) -> bool {
    color[3] <= 0.0
}

/// Same color with alpha multiplied by `factor`
pub fn fade(color: [f32; 4], factor: f32) -> [f32; 4] {
    [color[0], color[1], color[2], color[3] * factor.clamp(0.0, 1.0)]
}

#[cfg(test)]
mod tests {
    use super::*;

    const WHITE: [f32; 4] = [1.0, 1.0, 1.0, 1.0];

    #[test]
    fn test_rect_is_two_triangles() {
        let mut batch = ShapeBatch::new();
        batch.rect(Vec2::ZERO, Vec2::new(10.0, 5.0), WHITE);
        assert_eq!(batch.vertices().len(), 6);
        for v in batch.vertices() {
            assert!((0.0..=10.0).contains(&v.position[0]));
            assert!((0.0..=5.0).contains(&v.position[1]));
        }
    }

    #[test]
    fn test_invisible_shapes_emit_nothing() {
        let mut batch = ShapeBatch::new();
        let clear = [1.0, 1.0, 1.0, 0.0];
        batch.rect(Vec2::ZERO, Vec2::ONE, clear);
        batch.circle(Vec2::ZERO, 10.0, clear);
        batch.ring(Vec2::ZERO, 10.0, 1.0, clear);
        batch.line(Vec2::ZERO, Vec2::ONE, 1.0, clear);
        assert!(batch.is_empty());
    }

    #[test]
    fn test_circle_stays_within_radius() {
        let mut batch = ShapeBatch::new();
        let center = Vec2::new(50.0, 50.0);
        batch.circle(center, 20.0, WHITE);
        assert_eq!(batch.vertices().len() % 3, 0);
        for v in batch.vertices() {
            assert!(Vec2::from(v.position).distance(center) <= 20.0 + 1e-3);
        }
    }

    #[test]
    fn test_arc_vertices_lie_in_stroke_band() {
        let mut batch = ShapeBatch::new();
        let center = Vec2::new(100.0, 100.0);
        batch.arc(center, 75.0, 2.0, -TAU / 4.0, TAU * 0.42, WHITE);
        assert!(!batch.is_empty());
        for v in batch.vertices() {
            let d = Vec2::from(v.position).distance(center);
            assert!((74.0 - 1e-3..=76.0 + 1e-3).contains(&d), "{d}");
        }
    }

    #[test]
    fn test_dashed_ring_counts_dashes() {
        let mut full = ShapeBatch::new();
        full.arc(Vec2::ZERO, 120.0, 1.0, 0.0, 80.0 / 120.0, WHITE);
        let per_dash = full.vertices().len();

        let mut dashed = ShapeBatch::new();
        dashed.dashed_ring(Vec2::ZERO, 120.0, 1.0, (80.0, 160.0), 0.0, WHITE);
        // 2π·120 / 240 ≈ 3.14 → three whole dashes
        assert_eq!(dashed.vertices().len(), per_dash * 3);
    }

    #[test]
    fn test_line_has_requested_width() {
        let mut batch = ShapeBatch::new();
        batch.line(Vec2::new(0.0, 0.0), Vec2::new(10.0, 0.0), 2.0, WHITE);
        let ys: Vec<f32> = batch.vertices().iter().map(|v| v.position[1]).collect();
        assert!(ys.iter().all(|y| (y.abs() - 1.0).abs() < 1e-6));
    }

    #[test]
    fn test_fade_scales_alpha_only() {
        assert_eq!(fade([0.1, 0.2, 0.3, 0.8], 0.5), [0.1, 0.2, 0.3, 0.4]);
        assert_eq!(fade(WHITE, 2.0), WHITE);
    }
}
