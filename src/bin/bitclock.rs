use bitclock::{ClockConfig, DirFontProvider, render_to_mp4};

/// Render the bundled 4:44 demonstration. Takes no arguments; everything is
/// carried by [`ClockConfig::default`].
fn main() -> anyhow::Result<()> {
    let cfg = ClockConfig::default();
    cfg.validate()?;

    let fonts = DirFontProvider::conventional();
    render_to_mp4(&cfg, &fonts)?;

    eprintln!("wrote {}", cfg.out_path.display());
    Ok(())
}
