use kurbo::Shape as _;

use crate::{
    clock::digits::{bcd_bits, digits_for_time},
    clock::effects::{colon_visible, pulse_factor},
    clock::grid::GridLayout,
    config::ClockConfig,
    foundation::core::Rgb8,
    foundation::error::{BitclockError, BitclockResult},
    overlay::font::FontProvider,
    overlay::text::OverlayRenderer,
    render::FrameRGBA,
};

/// Per-tick frame painter.
///
/// Owns everything that is computed once and reused across the run: the grid
/// layout, the pre-shaped overlay, and the rasterizer context + pixmap. Each
/// [`render_frame`](Self::render_frame) call is a pure function of `t` over
/// that immutable state.
pub struct Compositor {
    cfg: ClockConfig,
    grid: GridLayout,
    overlay: OverlayRenderer,
    ctx: Option<vello_cpu::RenderContext>,
    pixmap: vello_cpu::Pixmap,
}

impl Compositor {
    /// Validate the configuration, compute the grid and prepare the overlay.
    ///
    /// Font resolution happens here (once), not per frame; an unavailable
    /// font degrades the overlay and the run continues.
    pub fn new(cfg: ClockConfig, font_provider: &dyn FontProvider) -> BitclockResult<Self> {
        cfg.validate()?;
        let grid = GridLayout::compute(&cfg.grid)?;
        let overlay = OverlayRenderer::new(cfg.overlay.clone(), cfg.duration_secs, font_provider);

        let w = cfg.canvas.width as u16;
        let h = cfg.canvas.height as u16;
        Ok(Self {
            grid,
            overlay,
            ctx: None,
            pixmap: vello_cpu::Pixmap::new(w, h),
            cfg,
        })
    }

    pub fn config(&self) -> &ClockConfig {
        &self.cfg
    }

    pub fn overlay(&self) -> &OverlayRenderer {
        &self.overlay
    }

    /// Render the frame at elapsed second `t`.
    ///
    /// Layering: background fill, then the scrolling text overlay, then the
    /// 16 indicators, then the colon — indicators are never obscured.
    pub fn render_frame(&mut self, t: f64) -> BitclockResult<FrameRGBA> {
        if !t.is_finite() || t < 0.0 {
            return Err(BitclockError::render(format!(
                "frame time must be finite and >= 0, got {t}"
            )));
        }

        let digits = digits_for_time(self.cfg.schedule.time_at(t));
        let k = pulse_factor(&self.cfg.pulse, t);

        let w = self.cfg.canvas.width as u16;
        let h = self.cfg.canvas.height as u16;
        let mut ctx = match self.ctx.take() {
            Some(ctx) => ctx,
            None => vello_cpu::RenderContext::new(w, h),
        };
        ctx.reset();

        // Opaque background.
        let bg = self.cfg.background;
        ctx.set_transform(vello_cpu::kurbo::Affine::IDENTITY);
        ctx.set_paint(vello_cpu::peniko::Color::from_rgba8(bg.r, bg.g, bg.b, 255));
        ctx.fill_rect(&vello_cpu::kurbo::Rect::new(
            0.0,
            0.0,
            f64::from(self.cfg.canvas.width),
            f64::from(self.cfg.canvas.height),
        ));

        self.overlay.draw(&mut ctx, t);
        ctx.set_transform(vello_cpu::kurbo::Affine::IDENTITY);

        for (col, &digit) in digits.iter().enumerate() {
            let bits = bcd_bits(digit)?;
            for (row, &bit) in bits.iter().enumerate() {
                let (cx, cy) = self.grid.position(col, row);
                // Pulse modulates lit indicators only; unlit ones hold a
                // constant brightness.
                let color = if bit == 1 {
                    self.cfg.leds.on.modulate(k)
                } else {
                    self.cfg.leds.off
                };
                fill_circle(&mut ctx, cx, cy, self.cfg.leds.radius, color);
            }
        }

        if colon_visible(&self.cfg.colon, t) {
            let x = self.grid.colon_x();
            let cy = self.grid.center_y();
            let half = self.cfg.colon.spacing / 2;
            fill_circle(&mut ctx, x, cy - half, self.cfg.colon.radius, self.cfg.colon.color);
            fill_circle(&mut ctx, x, cy + half, self.cfg.colon.radius, self.cfg.colon.color);
        }

        ctx.flush();
        ctx.render_to_pixmap(&mut self.pixmap);
        self.ctx = Some(ctx);

        Ok(FrameRGBA {
            width: self.cfg.canvas.width,
            height: self.cfg.canvas.height,
            data: self.pixmap.data_as_u8_slice().to_vec(),
            premultiplied: true,
        })
    }
}

fn fill_circle(ctx: &mut vello_cpu::RenderContext, cx: i32, cy: i32, radius: u32, color: Rgb8) {
    ctx.set_paint(vello_cpu::peniko::Color::from_rgba8(
        color.r, color.g, color.b, 255,
    ));
    ctx.fill_path(&circle_path(cx, cy, radius));
}

fn circle_path(cx: i32, cy: i32, radius: u32) -> vello_cpu::kurbo::BezPath {
    let circle = kurbo::Circle::new(
        (f64::from(cx), f64::from(cy)),
        f64::from(radius),
    );

    let mut out = vello_cpu::kurbo::BezPath::new();
    for el in circle.path_elements(0.1) {
        match el {
            kurbo::PathEl::MoveTo(p) => out.move_to(vello_cpu::kurbo::Point::new(p.x, p.y)),
            kurbo::PathEl::LineTo(p) => out.line_to(vello_cpu::kurbo::Point::new(p.x, p.y)),
            kurbo::PathEl::QuadTo(p1, p2) => out.quad_to(
                vello_cpu::kurbo::Point::new(p1.x, p1.y),
                vello_cpu::kurbo::Point::new(p2.x, p2.y),
            ),
            kurbo::PathEl::CurveTo(p1, p2, p3) => out.curve_to(
                vello_cpu::kurbo::Point::new(p1.x, p1.y),
                vello_cpu::kurbo::Point::new(p2.x, p2.y),
                vello_cpu::kurbo::Point::new(p3.x, p3.y),
            ),
            kurbo::PathEl::ClosePath => out.close_path(),
        }
    }
    out
}
