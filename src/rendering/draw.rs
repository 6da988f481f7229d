//! Turns the scene into shapes and text for one frame.

use std::f32::consts::{FRAC_PI_2, PI, TAU};

use glam::Vec2;

use super::shapes::{fade, ShapeBatch};
use super::text::TextItem;
use crate::params::{RenderConfig, ScanGeometry, ACCENT};
use crate::reveal::RevealDisplay;
use crate::scan::{ScanControl, FULL};
use crate::scene::{Child, Scene};

const CYAN_200: [f32; 3] = [0.65, 0.95, 0.99];
const CYAN_300: [f32; 3] = [0.4, 0.91, 0.98];
const CYAN_400: [f32; 3] = [0.13, 0.83, 0.93];
const CYAN_600: [f32; 3] = [0.03, 0.57, 0.7];
const CYAN_700: [f32; 3] = [0.05, 0.45, 0.56];
const CYAN_900: [f32; 3] = [0.08, 0.37, 0.46];
const CYAN_950: [f32; 3] = [0.03, 0.2, 0.27];
const WHITE: [f32; 3] = [1.0, 1.0, 1.0];
const FLASH: [f32; 3] = [0.85, 1.0, 1.0];

const TERMINAL_PADDING_PX: f32 = 16.0;
const CURSOR_SIZE_PX: Vec2 = Vec2::new(8.0, 16.0);
const CRT_LINE_SPACING_PX: f32 = 3.0;
const CRT_BAND_HEIGHT_PX: f32 = 120.0;
const CRT_BAND_PERIOD_S: f32 = 8.0;

fn rgba(rgb: [f32; 3], alpha: f32) -> [f32; 4] {
    [rgb[0], rgb[1], rgb[2], alpha]
}

/// Window-dependent placement
#[derive(Debug, Clone)]
pub struct Layout {
    pub size: Vec2,
    pub geometry: ScanGeometry,
    pub config: RenderConfig,
    /// Width of one monospace cell at the terminal font size
    pub char_advance_px: f32,
}

impl Layout {
    pub fn center(&self) -> Vec2 {
        self.size * 0.5
    }

    /// Whether `point` is over the scan button
    pub fn in_button(&self, point: Vec2) -> bool {
        point.distance(self.center()) <= self.geometry.button_radius_px
    }

    /// Terminal panel (min, max)
    pub fn terminal_rect(&self) -> (Vec2, Vec2) {
        let width = self.config.terminal_width_px.min(self.size.x - 48.0).max(0.0);
        let height = self.size.y * self.config.terminal_height_fraction;
        let half = Vec2::new(width, height) * 0.5;
        (self.center() - half, self.center() + half)
    }

    /// Height the terminal text scrolls within
    pub fn terminal_viewport_px(&self) -> f32 {
        let (min, max) = self.terminal_rect();
        (max.y - min.y - 2.0 * TERMINAL_PADDING_PX).max(0.0)
    }
}

/// Everything drawn in one frame, in order
#[derive(Debug, Default)]
pub struct Frame {
    /// Background and scanner geometry, under the text
    pub base: ShapeBatch,
    pub text: Vec<TextItem>,
    /// CRT effect and flash, over the text
    pub overlay: ShapeBatch,
}

impl Frame {
    pub fn clear(&mut self) {
        self.base.clear();
        self.text.clear();
        self.overlay.clear();
    }
}

/// Build `frame` from the current scene
pub fn build_frame(scene: &Scene, layout: &Layout, frame: &mut Frame) {
    frame.clear();
    let opacity = scene.opacity();

    draw_particles(scene, opacity, &mut frame.base);

    match (scene.child(), scene.reveal()) {
        (Child::Reveal, Some(reveal)) => {
            draw_terminal(reveal, scene.clock_s(), layout, opacity, frame)
        }
        _ => draw_idle(scene, layout, opacity, frame),
    }

    draw_crt(scene.clock_s(), layout.size, opacity, &mut frame.overlay);

    let flash = scene.flash_alpha();
    if flash > 0.0 {
        frame
            .overlay
            .rect(Vec2::ZERO, layout.size, rgba(FLASH, flash));
    }
}

fn draw_particles(scene: &Scene, opacity: f32, shapes: &mut ShapeBatch) {
    let field = scene.particles();
    let params = field.params();
    let layer = params.layer_opacity * opacity;
    let particles = field.particles();

    for (a, b) in field.links() {
        shapes.line(
            particles[a].position,
            particles[b].position,
            params.link_width_px,
            rgba(ACCENT, params.link_opacity * layer),
        );
    }
    for particle in particles {
        shapes.circle(
            particle.position,
            particle.radius,
            rgba(ACCENT, particle.opacity * layer),
        );
    }
}

fn draw_idle(scene: &Scene, layout: &Layout, opacity: f32, frame: &mut Frame) {
    let center = layout.center();
    let content = scene.content();
    let scan = scene.scan();

    // Header sits above the outer rings
    let header_y = center.y - layout.geometry.outer_ring_radii_px[1] - 90.0;
    frame.text.push(
        TextItem::new(
            content.title.as_str(),
            Vec2::new(center.x, header_y),
            14.0,
            rgba(CYAN_400, 0.8 * opacity),
        )
        .centered(),
    );
    frame.text.push(
        TextItem::new(
            content.subtitle.as_str(),
            Vec2::new(center.x, header_y + 26.0),
            10.0,
            rgba(CYAN_200, 0.5 * opacity),
        )
        .centered(),
    );

    draw_scanner(scan, &layout.geometry, center, opacity, &mut frame.base);

    let label_y = center.y + layout.geometry.ring_radius_px + 40.0;
    let (status_color, status_alpha) = if scan.is_pressing() {
        (CYAN_200, 1.0)
    } else {
        (CYAN_400, 0.3)
    };
    frame.text.push(
        TextItem::new(
            scan.status_label(),
            Vec2::new(center.x, label_y),
            9.0,
            rgba(status_color, status_alpha * opacity),
        )
        .centered()
        .bold(),
    );
    if scan.is_pressing() {
        frame.text.push(
            TextItem::new(
                scan.progress_label(),
                Vec2::new(center.x, label_y + 20.0),
                12.0,
                rgba(CYAN_400, opacity),
            )
            .centered(),
        );
    }

    frame.text.push(
        TextItem::new(
            content.footer.as_str(),
            Vec2::new(center.x, layout.size.y - 60.0),
            10.0,
            rgba(CYAN_900, 0.6 * opacity),
        )
        .centered()
        .bold(),
    );
}

fn draw_scanner(
    scan: &ScanControl,
    geometry: &ScanGeometry,
    center: Vec2,
    opacity: f32,
    shapes: &mut ShapeBatch,
) {
    let t = scan.clock_s();
    let pressing = scan.is_pressing();

    if pressing {
        // Expanding ping rings
        for (base, period, delay, alpha) in [(80.0, 2.0, 0.0, 0.3), (96.0, 3.0, 0.75, 0.1)] {
            let held = scan.held_for().as_secs_f32() - delay;
            if held >= 0.0 {
                let phase = (held / period).fract();
                let radius = base * (1.0 + phase);
                shapes.ring(center, radius, 1.0, rgba(CYAN_400, alpha * (1.0 - phase) * opacity));
            }
        }

        // Rotating tech rings
        let rotation = TAU * t / geometry.outer_ring_rotation_s;
        let [inner, outer] = geometry.outer_ring_radii_px;
        shapes.dashed_ring(
            center,
            inner * 1.1,
            0.5,
            (4.0, 20.0),
            rotation,
            rgba(ACCENT, 0.4 * opacity),
        );
        shapes.dashed_ring(
            center,
            outer * 1.1,
            1.0,
            (80.0, 160.0),
            rotation,
            rgba(ACCENT, 0.2 * opacity),
        );

        shapes.radial(
            center,
            geometry.button_radius_px,
            rgba(ACCENT, 0.02 * opacity),
            rgba(ACCENT, 0.15 * opacity),
        );
    }

    // Progress track and arc, starting at twelve o'clock
    shapes.ring(
        center,
        geometry.ring_radius_px,
        geometry.ring_stroke_px,
        rgba(CYAN_950, 0.2 * opacity),
    );
    let sweep = TAU * scan.progress() / FULL;
    let arc_color = if pressing { CYAN_400 } else { CYAN_700 };
    shapes.arc(
        center,
        geometry.ring_radius_px,
        geometry.ring_stroke_px * 5.0,
        -FRAC_PI_2,
        sweep,
        rgba(ACCENT, 0.12 * opacity),
    );
    shapes.arc(
        center,
        geometry.ring_radius_px,
        geometry.ring_stroke_px,
        -FRAC_PI_2,
        sweep,
        rgba(arc_color, opacity),
    );

    let (print_color, print_alpha, print_scale) = if pressing {
        (CYAN_300, 1.0, 1.05)
    } else {
        (CYAN_600, 0.4, 1.0)
    };
    draw_fingerprint(center, 0.8 * print_scale, rgba(print_color, print_alpha * opacity), shapes);

    if pressing {
        draw_scan_line(t, geometry, center, opacity, shapes);
    }
}

/// Ridge pattern drawn in a 100 × 100 box around `center`
fn draw_fingerprint(center: Vec2, scale: f32, color: [f32; 4], shapes: &mut ShapeBatch) {
    let at = |x: f32, y: f32| center + (Vec2::new(x, y) - Vec2::splat(50.0)) * scale;
    let width = 1.5 * scale;

    for r in [40.0, 30.0, 20.0, 10.0] {
        shapes.arc(at(50.0, 50.0), r * scale, width, PI, PI, color);
    }
    for r in [30.0, 20.0, 10.0] {
        shapes.arc(at(50.0, 70.0), r * scale, width, 0.0, PI, color);
    }
    shapes.arc(at(50.0, 55.0), 5.0 * scale, width, 0.0, PI, color);

    let thin = fade(color, 0.7);
    shapes.arc(at(40.0, 50.0), 5.0 * scale, scale, FRAC_PI_2, FRAC_PI_2, thin);
    shapes.arc(at(60.0, 50.0), 5.0 * scale, scale, 0.0, FRAC_PI_2, thin);

    for (x0, y0, x1, y1) in [
        (50.0, 50.0, 50.0, 60.0),
        (15.0, 50.0, 15.0, 55.0),
        (85.0, 50.0, 85.0, 55.0),
        (25.0, 50.0, 25.0, 60.0),
        (75.0, 50.0, 75.0, 60.0),
        (42.0, 65.0, 58.0, 65.0),
    ] {
        shapes.line(at(x0, y0), at(x1, y1), width, color);
    }
}

/// Horizontal beam sweeping the button from 15% to 85% of its height
fn draw_scan_line(
    t: f32,
    geometry: &ScanGeometry,
    center: Vec2,
    opacity: f32,
    shapes: &mut ShapeBatch,
) {
    let phase = (t / geometry.scan_line_period_s).fract();
    let eased = ease_in_out(phase);
    let r = geometry.button_radius_px;
    let y = center.y - r + 2.0 * r * (0.15 + 0.7 * eased);
    let alpha = if phase < 0.3 {
        phase / 0.3
    } else if phase > 0.7 {
        (1.0 - phase) / 0.3
    } else {
        1.0
    };

    let dy = y - center.y;
    let half = (r * r - dy * dy).max(0.0).sqrt();
    let left = center.x - half;
    let right = center.x + half;
    shapes.rect_vertical_gradient(
        Vec2::new(left, y - 8.0),
        Vec2::new(right, y),
        rgba(ACCENT, 0.0),
        rgba(ACCENT, 0.25 * alpha * opacity),
    );
    shapes.rect(
        Vec2::new(left, y),
        Vec2::new(right, y + 2.0),
        rgba(CYAN_300, alpha * opacity),
    );
    shapes.rect_vertical_gradient(
        Vec2::new(left, y + 2.0),
        Vec2::new(right, y + 10.0),
        rgba(ACCENT, 0.25 * alpha * opacity),
        rgba(ACCENT, 0.0),
    );
}

fn ease_in_out(x: f32) -> f32 {
    0.5 - 0.5 * (PI * x).cos()
}

fn draw_terminal(
    reveal: &RevealDisplay,
    clock_s: f32,
    layout: &Layout,
    opacity: f32,
    frame: &mut Frame,
) {
    let config = &layout.config;
    let (min, max) = layout.terminal_rect();
    let clip_min = min + Vec2::splat(TERMINAL_PADDING_PX);
    let clip_max = max - Vec2::splat(TERMINAL_PADDING_PX);

    frame.base.radial(
        layout.center(),
        layout.size.length() * 0.5,
        rgba(ACCENT, 0.03 * opacity),
        rgba(ACCENT, 0.0),
    );

    let pulse = 0.75 + 0.25 * (TAU * clock_s / 2.0).cos();
    let scroll = reveal.scroll_offset_px();

    for (i, line) in reveal.lines().iter().enumerate() {
        let top = clip_min.y + i as f32 * config.terminal_line_px - scroll;
        if top + config.terminal_line_px < clip_min.y || top > clip_max.y {
            continue;
        }

        let (text, color, bold) = if line.marker {
            (framed(&line.text), rgba(WHITE, pulse * opacity), true)
        } else {
            (line.text.clone(), rgba(CYAN_300, opacity), false)
        };

        if line.cursor {
            let x = clip_min.x + layout.char_advance_px * display_cells(&text) as f32 + 4.0;
            let y = top + (config.terminal_line_px - CURSOR_SIZE_PX.y) * 0.5;
            if y >= clip_min.y && y + CURSOR_SIZE_PX.y <= clip_max.y {
                frame.base.rect(
                    Vec2::new(x, y),
                    Vec2::new(x, y) + CURSOR_SIZE_PX,
                    rgba(CYAN_400, opacity),
                );
            }
        }

        if text.is_empty() {
            continue;
        }
        let position = Vec2::new(clip_min.x, top);
        let mut item = TextItem::new(text, position, config.terminal_font_px, color)
            .line_height(config.terminal_line_px)
            .clipped(clip_min, clip_max);
        if bold {
            item = item.bold();
        }
        frame.text.push(item);
    }
}

/// Marker line framed with `» … «`, the opening accent taking the indent
fn framed(text: &str) -> String {
    let body = text.strip_prefix("  ").unwrap_or(text);
    format!("» {} «", body)
}

/// Monospace cells occupied by `text` (wide glyphs take two)
fn display_cells(text: &str) -> usize {
    text.chars()
        .map(|c| if (c as u32) >= 0x1100 { 2 } else { 1 })
        .sum()
}

fn draw_crt(clock_s: f32, size: Vec2, opacity: f32, shapes: &mut ShapeBatch) {
    let line_color = [0.0, 0.0, 0.0, 0.25 * opacity];
    let mut y = 0.0;
    while y < size.y {
        shapes.rect(Vec2::new(0.0, y), Vec2::new(size.x, y + 1.0), line_color);
        y += CRT_LINE_SPACING_PX;
    }

    let phase = (clock_s / CRT_BAND_PERIOD_S).fract();
    let top = -CRT_BAND_HEIGHT_PX + phase * (size.y + CRT_BAND_HEIGHT_PX);
    let mid = top + CRT_BAND_HEIGHT_PX * 0.5;
    let band = rgba(ACCENT, 0.04 * opacity);
    shapes.rect_vertical_gradient(
        Vec2::new(0.0, top),
        Vec2::new(size.x, mid),
        rgba(ACCENT, 0.0),
        band,
    );
    shapes.rect_vertical_gradient(
        Vec2::new(0.0, mid),
        Vec2::new(size.x, top + CRT_BAND_HEIGHT_PX),
        band,
        rgba(ACCENT, 0.0),
    );
}
