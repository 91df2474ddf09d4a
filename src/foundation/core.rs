use crate::foundation::error::{BitclockError, BitclockResult};

#[derive(
    Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, serde::Serialize, serde::Deserialize,
)]
pub struct FrameIndex(pub u64);

#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct Canvas {
    pub width: u32,
    pub height: u32,
}

impl Canvas {
    pub fn new(width: u32, height: u32) -> BitclockResult<Self> {
        if width == 0 || height == 0 {
            return Err(BitclockError::validation("canvas width/height must be > 0"));
        }
        // `vello_cpu` pixmaps address pixels with u16 coordinates.
        if width > u32::from(u16::MAX) || height > u32::from(u16::MAX) {
            return Err(BitclockError::validation(
                "canvas width/height must fit in u16",
            ));
        }
        Ok(Self { width, height })
    }
}

/// Straight (non-premultiplied) RGB8 color triple.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct Rgb8 {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Rgb8 {
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// Scale brightness by `k`, clamping `k` to [0, 2] and each resulting
    /// channel to [0, 255].
    pub fn modulate(self, k: f64) -> Self {
        let k = k.clamp(0.0, 2.0);
        let scale = |c: u8| -> u8 { (f64::from(c) * k).clamp(0.0, 255.0) as u8 };
        Self {
            r: scale(self.r),
            g: scale(self.g),
            b: scale(self.b),
        }
    }

    pub fn as_array(self) -> [u8; 3] {
        [self.r, self.g, self.b]
    }
}

impl From<[u8; 3]> for Rgb8 {
    fn from([r, g, b]: [u8; 3]) -> Self {
        Self { r, g, b }
    }
}

/// Timestamp of frame `i` at an integer frame rate, in seconds.
pub fn frame_time_secs(i: FrameIndex, fps: u32) -> f64 {
    (i.0 as f64) / f64::from(fps)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn canvas_rejects_zero_and_oversized_dims() {
        assert!(Canvas::new(0, 1080).is_err());
        assert!(Canvas::new(1920, 0).is_err());
        assert!(Canvas::new(70_000, 1080).is_err());
        assert!(Canvas::new(1920, 1080).is_ok());
    }

    #[test]
    fn modulate_clamps_channels_at_255() {
        let on = Rgb8::new(40, 200, 255);
        let c = on.modulate(2.0);
        assert_eq!(c, Rgb8::new(80, 255, 255));
    }

    #[test]
    fn modulate_clamps_multiplier_range() {
        let c = Rgb8::new(100, 100, 100);
        // Multipliers beyond [0, 2] are treated as the clamp boundary.
        assert_eq!(c.modulate(5.0), c.modulate(2.0));
        assert_eq!(c.modulate(-1.0), Rgb8::new(0, 0, 0));
    }

    #[test]
    fn modulate_identity_at_one() {
        let c = Rgb8::new(60, 70, 80);
        assert_eq!(c.modulate(1.0), c);
    }

    #[test]
    fn frame_time_matches_index_over_rate() {
        assert_eq!(frame_time_secs(FrameIndex(0), 30), 0.0);
        assert_eq!(frame_time_secs(FrameIndex(660), 30), 22.0);
    }
}
