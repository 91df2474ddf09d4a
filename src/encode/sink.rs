use crate::foundation::core::FrameIndex;
use crate::foundation::error::BitclockResult;
use crate::render::FrameRGBA;

/// Configuration provided to a [`FrameSink`] at the start of a run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SinkConfig {
    /// Output width in pixels.
    pub width: u32,
    /// Output height in pixels.
    pub height: u32,
    /// Output frames per second.
    pub fps: u32,
}

/// Sink contract for consuming rendered frames in sequence order.
///
/// Ordering contract: `push_frame` is called in strictly increasing
/// `FrameIndex` order. `end` is called exactly once after the last push —
/// including when a push failed — so implementations can release resources
/// on every exit path.
pub trait FrameSink {
    /// Called once before any frames are pushed.
    fn begin(&mut self, cfg: SinkConfig) -> BitclockResult<()>;
    /// Push one frame in strictly increasing sequence order.
    fn push_frame(&mut self, idx: FrameIndex, frame: &FrameRGBA) -> BitclockResult<()>;
    /// Called once after the last frame is pushed.
    fn end(&mut self) -> BitclockResult<()>;
}

/// In-memory sink for tests and debugging.
#[derive(Debug, Default)]
pub struct InMemorySink {
    cfg: Option<SinkConfig>,
    frames: Vec<(FrameIndex, FrameRGBA)>,
    ended: bool,
}

impl InMemorySink {
    pub fn new() -> Self {
        Self::default()
    }

    /// The sink configuration captured in `begin`, if any.
    pub fn config(&self) -> Option<SinkConfig> {
        self.cfg
    }

    /// Captured frames, in push order.
    pub fn frames(&self) -> &[(FrameIndex, FrameRGBA)] {
        &self.frames
    }

    /// Whether `end` has been observed.
    pub fn ended(&self) -> bool {
        self.ended
    }
}

impl FrameSink for InMemorySink {
    fn begin(&mut self, cfg: SinkConfig) -> BitclockResult<()> {
        self.cfg = Some(cfg);
        self.frames.clear();
        self.ended = false;
        Ok(())
    }

    fn push_frame(&mut self, idx: FrameIndex, frame: &FrameRGBA) -> BitclockResult<()> {
        self.frames.push((idx, frame.clone()));
        Ok(())
    }

    fn end(&mut self) -> BitclockResult<()> {
        self.ended = true;
        Ok(())
    }
}
