//! Text layer on top of glyphon.
//!
//! One glyphon buffer per text item; buffers are kept between frames and
//! reshaped every frame (the terminal text changes every tick anyway).

use glam::Vec2;
use glyphon::{
    Attrs, Buffer, Cache, Color, Family, FontSystem, Metrics, Resolution, Shaping, SwashCache,
    TextArea, TextAtlas, TextBounds, TextRenderer, Viewport, Weight,
};

/// Horizontal placement of a text item relative to its position
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Anchor {
    TopLeft,
    TopCenter,
}

/// A run of text to draw this frame
#[derive(Debug, Clone, PartialEq)]
pub struct TextItem {
    pub text: String,
    pub position: Vec2,
    pub anchor: Anchor,
    pub size_px: f32,
    pub line_px: f32,
    /// Straight-alpha sRGB
    pub color: [f32; 4],
    pub bold: bool,
    /// Clip rectangle (min, max)
    pub clip: Option<(Vec2, Vec2)>,
}

impl TextItem {
    pub fn new(text: impl Into<String>, position: Vec2, size_px: f32, color: [f32; 4]) -> Self {
        Self {
            text: text.into(),
            position,
            anchor: Anchor::TopLeft,
            size_px,
            line_px: size_px * 1.4,
            color,
            bold: false,
            clip: None,
        }
    }

    pub fn centered(mut self) -> Self {
        self.anchor = Anchor::TopCenter;
        self
    }

    pub fn bold(mut self) -> Self {
        self.bold = true;
        self
    }

    pub fn line_height(mut self, line_px: f32) -> Self {
        self.line_px = line_px;
        self
    }

    pub fn clipped(mut self, min: Vec2, max: Vec2) -> Self {
        self.clip = Some((min, max));
        self
    }
}

pub struct TextLayer {
    font_system: FontSystem,
    swash_cache: SwashCache,
    viewport: Viewport,
    atlas: TextAtlas,
    renderer: TextRenderer,
    buffers: Vec<Buffer>,
}

impl TextLayer {
    pub fn new(device: &wgpu::Device, queue: &wgpu::Queue, format: wgpu::TextureFormat) -> Self {
        let font_system = FontSystem::new();
        let swash_cache = SwashCache::new();
        let cache = Cache::new(device);
        let viewport = Viewport::new(device, &cache);
        let mut atlas = TextAtlas::new(device, queue, &cache, format);
        let renderer =
            TextRenderer::new(&mut atlas, device, wgpu::MultisampleState::default(), None);

        Self {
            font_system,
            swash_cache,
            viewport,
            atlas,
            renderer,
            buffers: Vec::new(),
        }
    }

    /// Advance of one monospace cell at `size_px`
    pub fn char_advance_px(&mut self, size_px: f32) -> f32 {
        const SAMPLE: &str = "0000000000";
        let mut buffer = Buffer::new(&mut self.font_system, Metrics::new(size_px, size_px));
        buffer.set_size(&mut self.font_system, None, None);
        buffer.set_text(
            &mut self.font_system,
            SAMPLE,
            Attrs::new().family(Family::Monospace),
            Shaping::Advanced,
        );
        buffer.shape_until_scroll(&mut self.font_system, false);

        let width = buffer
            .layout_runs()
            .fold(0.0f32, |width, run| width.max(run.line_w));
        if width > 0.0 {
            width / SAMPLE.len() as f32
        } else {
            size_px * 0.6
        }
    }

    /// Shape and upload this frame's text
    ///
    /// Items are in logical pixels; `scale` maps them onto the
    /// `width` × `height` physical surface.
    pub fn prepare(
        &mut self,
        device: &wgpu::Device,
        queue: &wgpu::Queue,
        (width, height): (u32, u32),
        scale: f32,
        items: &[TextItem],
    ) -> Result<(), glyphon::PrepareError> {
        self.viewport.update(queue, Resolution { width, height });

        while self.buffers.len() < items.len() {
            self.buffers
                .push(Buffer::new(&mut self.font_system, Metrics::new(14.0, 20.0)));
        }

        let mut offsets = Vec::with_capacity(items.len());
        for (item, buffer) in items.iter().zip(self.buffers.iter_mut()) {
            let weight = if item.bold {
                Weight::BOLD
            } else {
                Weight::NORMAL
            };
            buffer.set_metrics(
                &mut self.font_system,
                Metrics::new(item.size_px, item.line_px),
            );
            buffer.set_size(&mut self.font_system, None, None);
            buffer.set_text(
                &mut self.font_system,
                &item.text,
                Attrs::new().family(Family::Monospace).weight(weight),
                Shaping::Advanced,
            );
            buffer.shape_until_scroll(&mut self.font_system, false);

            let offset = match item.anchor {
                Anchor::TopLeft => 0.0,
                Anchor::TopCenter => {
                    let line_w = buffer
                        .layout_runs()
                        .fold(0.0f32, |w, run| w.max(run.line_w));
                    line_w * 0.5
                }
            };
            offsets.push(offset);
        }

        let areas = items
            .iter()
            .zip(&self.buffers)
            .zip(offsets)
            .map(|((item, buffer), offset)| {
                let bounds = match item.clip {
                    Some((min, max)) => TextBounds {
                        left: (min.x * scale).floor() as i32,
                        top: (min.y * scale).floor() as i32,
                        right: (max.x * scale).ceil() as i32,
                        bottom: (max.y * scale).ceil() as i32,
                    },
                    None => TextBounds {
                        left: 0,
                        top: 0,
                        right: width as i32,
                        bottom: height as i32,
                    },
                };
                TextArea {
                    buffer,
                    left: (item.position.x - offset) * scale,
                    top: item.position.y * scale,
                    scale,
                    bounds,
                    default_color: to_glyphon_color(item.color),
                    custom_glyphs: &[],
                }
            });

        self.renderer.prepare(
            device,
            queue,
            &mut self.font_system,
            &mut self.atlas,
            &self.viewport,
            areas,
            &mut self.swash_cache,
        )
    }

    pub fn render<'pass>(
        &'pass self,
        pass: &mut wgpu::RenderPass<'pass>,
    ) -> Result<(), glyphon::RenderError> {
        self.renderer.render(&self.atlas, &self.viewport, pass)
    }

    /// Drop glyphs unused this frame from the atlas
    pub fn trim(&mut self) {
        self.atlas.trim();
    }
}

fn to_glyphon_color(color: [f32; 4]) -> Color {
    let channel = |v: f32| (v.clamp(0.0, 1.0) * 255.0).round() as u8;
    Color::rgba(
        channel(color[0]),
        channel(color[1]),
        channel(color[2]),
        channel(color[3]),
    )
}
