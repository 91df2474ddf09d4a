//! Render a single frame of the demonstration and save it as a PNG.
//!
//! Run with: `cargo run --example render_one_frame`

use bitclock::{ClockConfig, Compositor, DirFontProvider};

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt().init();

    let cfg = ClockConfig::default();
    let mut compositor = Compositor::new(cfg, &DirFontProvider::conventional())?;

    // Just past the schedule switch, with the colon visible.
    let frame = compositor.render_frame(22.1)?;

    let out = "demo_frame.png";
    image::save_buffer_with_format(
        out,
        &frame.data,
        frame.width,
        frame.height,
        image::ColorType::Rgba8,
        image::ImageFormat::Png,
    )?;

    eprintln!("wrote {out}");
    Ok(())
}
