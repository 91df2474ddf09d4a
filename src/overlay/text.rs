use std::sync::Arc;

use crate::config::OverlayConfig;
use crate::foundation::error::{BitclockError, BitclockResult};
use crate::overlay::font::FontProvider;
use crate::overlay::scroll::{truncate_line, visible_window};

/// Substituted for a line whose layout fails.
const LINE_PLACEHOLDER: &str = "[...]";

/// RGBA8 brush color carried through Parley layouts.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct TextBrushRgba8 {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

struct LoadedFont {
    family_name: String,
    data: vello_cpu::peniko::FontData,
}

/// Scrolling text backdrop.
///
/// All font IO and line layout happens at construction; per-frame work is
/// window selection and glyph submission only. A failed font resolution
/// degrades the overlay to nothing (logged) — frames still render.
pub struct OverlayRenderer {
    cfg: OverlayConfig,
    duration_secs: f64,
    font: Option<LoadedFont>,
    // One pre-shaped layout per display line; None when even the
    // placeholder could not be laid out.
    line_layouts: Vec<Option<Arc<parley::Layout<TextBrushRgba8>>>>,
}

impl OverlayRenderer {
    pub fn new(cfg: OverlayConfig, duration_secs: f64, provider: &dyn FontProvider) -> Self {
        if !cfg.enabled || cfg.lines.is_empty() {
            return Self {
                cfg,
                duration_secs,
                font: None,
                line_layouts: Vec::new(),
            };
        }

        let mut engine = TextLayoutEngine::new();
        let font = match provider.resolve() {
            Ok(bytes) => match engine.register(&bytes) {
                Ok(font) => Some(font),
                Err(e) => {
                    tracing::warn!(error = %e, "overlay font unusable, overlay disabled for this run");
                    None
                }
            },
            Err(e) => {
                tracing::warn!(error = %e, "overlay font unavailable, overlay disabled for this run");
                None
            }
        };

        let line_layouts = match &font {
            Some(font) => layout_all_lines(&mut engine, font, &cfg),
            None => Vec::new(),
        };

        Self {
            cfg,
            duration_secs,
            font,
            line_layouts,
        }
    }

    /// Whether a usable font was resolved. When false, [`draw`](Self::draw)
    /// is a no-op.
    pub fn font_available(&self) -> bool {
        self.font.is_some()
    }

    /// Paint the visible window of lines into `ctx` as a background layer.
    pub fn draw(&self, ctx: &mut vello_cpu::RenderContext, t: f64) {
        let Some(font) = &self.font else {
            return;
        };
        if self.line_layouts.is_empty() {
            return;
        }

        let window = visible_window(
            self.line_layouts.len(),
            self.cfg.visible_lines,
            self.duration_secs,
            t,
        );
        let (origin_x, origin_y) = self.cfg.origin;

        ctx.push_opacity_layer(self.cfg.opacity);
        for (slot, line_idx) in (window.start..window.end).enumerate() {
            let Some(layout) = &self.line_layouts[line_idx] else {
                continue;
            };
            let y = f64::from(origin_y) + slot as f64 * f64::from(self.cfg.line_height_px);
            ctx.set_transform(vello_cpu::kurbo::Affine::translate((
                f64::from(origin_x),
                y,
            )));

            for line in layout.lines() {
                for item in line.items() {
                    let parley::layout::PositionedLayoutItem::GlyphRun(run) = item else {
                        continue;
                    };
                    let brush = run.style().brush;
                    ctx.set_paint(vello_cpu::peniko::Color::from_rgba8(
                        brush.r, brush.g, brush.b, brush.a,
                    ));
                    let glyphs = run.glyphs().map(|g| vello_cpu::Glyph {
                        id: g.id,
                        x: g.x,
                        y: g.y,
                    });
                    ctx.glyph_run(&font.data)
                        .font_size(run.run().font_size())
                        .fill_glyphs(glyphs);
                }
            }
        }
        ctx.pop_layer();
    }
}

fn layout_all_lines(
    engine: &mut TextLayoutEngine,
    font: &LoadedFont,
    cfg: &OverlayConfig,
) -> Vec<Option<Arc<parley::Layout<TextBrushRgba8>>>> {
    let brush = TextBrushRgba8 {
        r: cfg.color.r,
        g: cfg.color.g,
        b: cfg.color.b,
        a: 255,
    };

    cfg.lines
        .iter()
        .map(|line| {
            let display = truncate_line(line, cfg.max_line_chars);
            match engine.layout_line(display, &font.family_name, cfg.font_size_px, brush) {
                Ok(layout) => Some(Arc::new(layout)),
                Err(e) => {
                    tracing::warn!(error = %e, "line layout failed, substituting placeholder");
                    engine
                        .layout_line(LINE_PLACEHOLDER, &font.family_name, cfg.font_size_px, brush)
                        .map(Arc::new)
                        .ok()
                }
            }
        })
        .collect()
}

/// Stateful helper for building Parley layouts from raw font bytes.
struct TextLayoutEngine {
    font_ctx: parley::FontContext,
    layout_ctx: parley::LayoutContext<TextBrushRgba8>,
}

impl TextLayoutEngine {
    fn new() -> Self {
        Self {
            font_ctx: parley::FontContext::default(),
            layout_ctx: parley::LayoutContext::new(),
        }
    }

    /// Register font bytes once, returning the resolved family plus the glyph
    /// rendering handle.
    fn register(&mut self, font_bytes: &[u8]) -> BitclockResult<LoadedFont> {
        let families = self
            .font_ctx
            .collection
            .register_fonts(parley::fontique::Blob::from(font_bytes.to_vec()), None);
        let family_id = families
            .first()
            .map(|(id, _)| *id)
            .ok_or_else(|| BitclockError::resource("no font families in font bytes"))?;
        let family_name = self
            .font_ctx
            .collection
            .family_name(family_id)
            .ok_or_else(|| BitclockError::resource("registered font family has no name"))?
            .to_string();

        let data = vello_cpu::peniko::FontData::new(
            vello_cpu::peniko::Blob::from(font_bytes.to_vec()),
            0,
        );
        Ok(LoadedFont { family_name, data })
    }

    /// Shape and lay out a single display line (no wrapping).
    fn layout_line(
        &mut self,
        text: &str,
        family_name: &str,
        size_px: f32,
        brush: TextBrushRgba8,
    ) -> BitclockResult<parley::Layout<TextBrushRgba8>> {
        if !size_px.is_finite() || size_px <= 0.0 {
            return Err(BitclockError::validation(
                "text size_px must be finite and > 0",
            ));
        }

        let mut builder = self
            .layout_ctx
            .ranged_builder(&mut self.font_ctx, text, 1.0, true);
        builder.push_default(parley::style::StyleProperty::FontStack(
            parley::style::FontStack::Source(std::borrow::Cow::Owned(family_name.to_string())),
        ));
        builder.push_default(parley::style::StyleProperty::FontSize(size_px));
        builder.push_default(parley::style::StyleProperty::Brush(brush));

        let mut layout: parley::Layout<TextBrushRgba8> = builder.build(text);
        layout.break_all_lines(None);
        Ok(layout)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::foundation::core::Rgb8;

    struct NoFont;
    impl FontProvider for NoFont {
        fn resolve(&self) -> BitclockResult<Vec<u8>> {
            Err(BitclockError::resource("font deliberately unavailable"))
        }
    }

    fn overlay_cfg() -> OverlayConfig {
        OverlayConfig {
            enabled: true,
            opacity: 0.4,
            font_size_px: 28.0,
            line_height_px: 32.0,
            color: Rgb8::new(150, 255, 150),
            max_line_chars: 120,
            visible_lines: 25,
            origin: (400, 100),
            lines: vec!["one".to_string(), "two".to_string()],
        }
    }

    #[test]
    fn missing_font_degrades_instead_of_failing() {
        let r = OverlayRenderer::new(overlay_cfg(), 44.0, &NoFont);
        assert!(!r.font_available());
        assert!(r.line_layouts.is_empty());
    }

    #[test]
    fn disabled_overlay_skips_font_resolution() {
        struct Panic;
        impl FontProvider for Panic {
            fn resolve(&self) -> BitclockResult<Vec<u8>> {
                panic!("resolve must not be called for a disabled overlay");
            }
        }

        let mut cfg = overlay_cfg();
        cfg.enabled = false;
        let r = OverlayRenderer::new(cfg, 44.0, &Panic);
        assert!(!r.font_available());
    }

    #[test]
    fn garbage_font_bytes_degrade_instead_of_failing() {
        let provider = crate::overlay::font::StaticFontProvider::new(vec![0u8; 16]);
        let r = OverlayRenderer::new(overlay_cfg(), 44.0, &provider);
        assert!(!r.font_available());
    }
}
