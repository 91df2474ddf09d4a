use crate::{
    config::ClockConfig,
    encode::ffmpeg::{FfmpegSink, FfmpegSinkOpts},
    encode::sink::{FrameSink, SinkConfig},
    foundation::core::{FrameIndex, frame_time_secs},
    foundation::error::BitclockResult,
    overlay::font::FontProvider,
    render::compositor::Compositor,
};

/// Drive the compositor over every frame of the sequence, pushing frames to
/// `sink` in strictly increasing index order (0 to `total_frames - 1`, with
/// `t = i / fps`).
///
/// The sink is released on every exit path: a render or push failure still
/// reaches `end()`, and the original error is the one propagated.
#[tracing::instrument(skip_all)]
pub fn render_to_sink(
    compositor: &mut Compositor,
    sink: &mut dyn FrameSink,
) -> BitclockResult<()> {
    let (total, fps, width, height) = {
        let cfg = compositor.config();
        (
            cfg.total_frames(),
            cfg.fps,
            cfg.canvas.width,
            cfg.canvas.height,
        )
    };
    tracing::debug!(total_frames = total, fps, "starting sequence render");

    sink.begin(SinkConfig { width, height, fps })?;

    let pushed = (|| -> BitclockResult<()> {
        for i in 0..total {
            let idx = FrameIndex(i);
            let frame = compositor.render_frame(frame_time_secs(idx, fps))?;
            sink.push_frame(idx, &frame)?;
        }
        Ok(())
    })();

    match pushed {
        Ok(()) => sink.end(),
        Err(e) => {
            if let Err(end_err) = sink.end() {
                tracing::debug!(error = %end_err, "sink release after failure also failed");
            }
            Err(e)
        }
    }
}

/// Render the full configured sequence to an MP4 file via the system
/// `ffmpeg` binary.
pub fn render_to_mp4(cfg: &ClockConfig, font_provider: &dyn FontProvider) -> BitclockResult<()> {
    cfg.validate()?;

    let mut compositor = Compositor::new(cfg.clone(), font_provider)?;
    let mut sink = FfmpegSink::new(FfmpegSinkOpts {
        bg_rgb: cfg.background.as_array(),
        ..FfmpegSinkOpts::new(cfg.out_path.clone())
    });
    render_to_sink(&mut compositor, &mut sink)
}
