//! bitclock renders a fixed-length BCD binary-clock animation to MP4.
//!
//! The pipeline is deterministic and CPU-only:
//!
//! 1. **Map**: elapsed time -> displayed time -> four BCD digits
//! 2. **Compose**: digits + cached grid layout + time-driven effects ->
//!    one premultiplied RGBA8 frame ([`FrameRGBA`])
//! 3. **Encode**: frames stream in index order to a [`FrameSink`]
//!    (the system `ffmpeg` binary for MP4 output)
//!
//! Key constraints:
//!
//! - **No unsafe**: `unsafe` is forbidden in this crate.
//! - **Deterministic-by-default**: every frame is a pure function of its
//!   timestamp and the immutable [`ClockConfig`]; the grid layout and the
//!   overlay text layouts are computed once and reused.
//! - **Front-loaded IO**: font resolution happens once at startup; the
//!   render loop never touches the filesystem.
//! - **Graceful decoration**: missing fonts or unrenderable overlay lines
//!   degrade the backdrop; structural configuration errors fail fast before
//!   the first frame.
#![forbid(unsafe_code)]

mod clock;
mod config;
mod encode;
mod foundation;
mod overlay;
mod pipeline;
mod render;

pub use clock::digits::{bcd_bits, digits_for_time};
pub use clock::effects::{colon_visible, pulse_factor};
pub use clock::grid::GridLayout;
pub use config::{
    BIT_ROWS, ClockConfig, ColonConfig, DEFAULT_OVERLAY_TEXT, DIGIT_COLUMNS, GridConfig, LedConfig,
    OverlayConfig, PulseConfig, ScheduleConfig, TimeOfDay,
};
pub use encode::ffmpeg::{
    DEFAULT_CRF, FfmpegSink, FfmpegSinkOpts, ensure_parent_dir, is_ffmpeg_on_path,
};
pub use encode::sink::{FrameSink, InMemorySink, SinkConfig};
pub use foundation::core::{Canvas, FrameIndex, Rgb8, frame_time_secs};
pub use foundation::error::{BitclockError, BitclockResult};
pub use overlay::font::{DirFontProvider, FontProvider, StaticFontProvider};
pub use overlay::scroll::{ScrollWindow, truncate_line, visible_window};
pub use overlay::text::{OverlayRenderer, TextBrushRgba8};
pub use pipeline::{render_to_mp4, render_to_sink};
pub use render::FrameRGBA;
pub use render::compositor::Compositor;
