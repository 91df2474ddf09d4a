use std::path::PathBuf;

use crate::foundation::{
    core::{Canvas, Rgb8},
    error::{BitclockError, BitclockResult},
};

/// Number of digit columns (hour tens, hour ones, minute tens, minute ones).
pub const DIGIT_COLUMNS: u32 = 4;
/// Number of bit rows per digit (8, 4, 2, 1 top to bottom).
pub const BIT_ROWS: u32 = 4;

/// Default overlay text, bundled with the crate.
pub const DEFAULT_OVERLAY_TEXT: &str = include_str!("../assets/overlay.txt");

/// Immutable configuration for one rendering run.
///
/// Built once, validated up front, then passed by reference into the
/// pipeline. There is no process-wide state; tests construct their own
/// values with different durations, canvases and colors.
#[derive(Clone, Debug, serde::Serialize, serde::Deserialize)]
pub struct ClockConfig {
    /// Total sequence duration in seconds.
    pub duration_secs: f64,
    /// Output frames per second (integer; MP4 output requires it).
    pub fps: u32,
    pub canvas: Canvas,
    /// Opaque background fill.
    pub background: Rgb8,
    pub grid: GridConfig,
    pub leds: LedConfig,
    pub pulse: PulseConfig,
    pub colon: ColonConfig,
    pub overlay: OverlayConfig,
    pub schedule: ScheduleConfig,
    /// Output MP4 path.
    pub out_path: PathBuf,
}

/// Static geometry of the indicator grid.
#[derive(Clone, Debug, serde::Serialize, serde::Deserialize)]
pub struct GridConfig {
    pub columns: u32,
    pub rows: u32,
    /// Horizontal distance between adjacent digit columns, in pixels.
    pub column_spacing: i32,
    /// Vertical distance between adjacent bit rows, in pixels.
    pub row_spacing: i32,
    /// Pixel the grid is centered on.
    pub center: (i32, i32),
}

#[derive(Clone, Debug, serde::Serialize, serde::Deserialize)]
pub struct LedConfig {
    /// Color of a lit indicator.
    pub on: Rgb8,
    /// Color of an unlit indicator (never pulse-modulated).
    pub off: Rgb8,
    pub radius: u32,
}

/// Sinusoidal brightness modulation applied to lit indicators.
#[derive(Clone, Debug, serde::Serialize, serde::Deserialize)]
pub struct PulseConfig {
    pub enabled: bool,
    /// Cycles per second.
    pub freq_hz: f64,
    /// Modulation amplitude around 1.0, in [0, 1].
    pub depth: f64,
}

/// Blinking colon separator between the hour and minute columns.
#[derive(Clone, Debug, serde::Serialize, serde::Deserialize)]
pub struct ColonConfig {
    pub enabled: bool,
    /// Blinks per second.
    pub blink_hz: f64,
    pub color: Rgb8,
    pub radius: u32,
    /// Vertical distance between the two colon dots, in pixels.
    pub spacing: i32,
}

/// Scrolling text backdrop drawn beneath the indicators.
#[derive(Clone, Debug, serde::Serialize, serde::Deserialize)]
pub struct OverlayConfig {
    pub enabled: bool,
    /// Layer opacity in [0, 1].
    pub opacity: f32,
    pub font_size_px: f32,
    pub line_height_px: f32,
    pub color: Rgb8,
    /// Lines longer than this many characters are truncated for display.
    pub max_line_chars: usize,
    /// Number of lines visible at once.
    pub visible_lines: usize,
    /// Top-left corner of the text region, in pixels.
    pub origin: (i32, i32),
    /// The text content, one entry per display line. Injected rather than
    /// read from any implicit source; see [`DEFAULT_OVERLAY_TEXT`].
    pub lines: Vec<String>,
}

/// Displayed wall-clock time.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct TimeOfDay {
    pub hour: u8,
    pub minute: u8,
}

impl TimeOfDay {
    pub const fn new(hour: u8, minute: u8) -> Self {
        Self { hour, minute }
    }

    pub fn validate(self) -> BitclockResult<()> {
        if self.hour > 23 {
            return Err(BitclockError::validation(format!(
                "hour must be in 0..=23, got {}",
                self.hour
            )));
        }
        if self.minute > 59 {
            return Err(BitclockError::validation(format!(
                "minute must be in 0..=59, got {}",
                self.minute
            )));
        }
        Ok(())
    }
}

/// Two-phase display schedule: `first` until `switch_at_secs`, `second`
/// afterwards. A step function with exactly one discontinuity.
#[derive(Clone, Copy, Debug, serde::Serialize, serde::Deserialize)]
pub struct ScheduleConfig {
    pub switch_at_secs: f64,
    pub first: TimeOfDay,
    pub second: TimeOfDay,
}

impl Default for ClockConfig {
    fn default() -> Self {
        Self {
            duration_secs: 44.0,
            fps: 30,
            canvas: Canvas {
                width: 1920,
                height: 1080,
            },
            background: Rgb8::new(20, 24, 32),
            grid: GridConfig {
                columns: DIGIT_COLUMNS,
                rows: BIT_ROWS,
                column_spacing: 280,
                row_spacing: 160,
                center: (960, 500),
            },
            leds: LedConfig {
                on: Rgb8::new(40, 200, 255),
                off: Rgb8::new(60, 70, 80),
                radius: 50,
            },
            pulse: PulseConfig {
                enabled: true,
                freq_hz: 0.25,
                depth: 0.25,
            },
            colon: ColonConfig {
                enabled: true,
                blink_hz: 1.0,
                color: Rgb8::new(40, 200, 255),
                radius: 25,
                spacing: 120,
            },
            overlay: OverlayConfig {
                enabled: true,
                opacity: 0.4,
                font_size_px: 28.0,
                line_height_px: 32.0,
                color: Rgb8::new(150, 255, 150),
                max_line_chars: 120,
                visible_lines: 25,
                origin: (400, 100),
                lines: DEFAULT_OVERLAY_TEXT.lines().map(str::to_string).collect(),
            },
            schedule: ScheduleConfig {
                switch_at_secs: 22.0,
                first: TimeOfDay::new(4, 43),
                second: TimeOfDay::new(4, 44),
            },
            out_path: PathBuf::from("binary_clock_4_44.mp4"),
        }
    }
}

impl ClockConfig {
    /// Total frame count of the sequence.
    pub fn total_frames(&self) -> u64 {
        (self.duration_secs * f64::from(self.fps)).round() as u64
    }

    /// Fail-fast structural validation; any violation aborts the run before
    /// a single frame is rendered.
    pub fn validate(&self) -> BitclockResult<()> {
        if !self.duration_secs.is_finite() || self.duration_secs <= 0.0 {
            return Err(BitclockError::validation(
                "duration_secs must be finite and > 0",
            ));
        }
        if self.fps == 0 {
            return Err(BitclockError::validation("fps must be > 0"));
        }
        if self.total_frames() == 0 {
            return Err(BitclockError::validation(
                "duration_secs * fps must yield at least one frame",
            ));
        }
        Canvas::new(self.canvas.width, self.canvas.height)?;

        if self.grid.columns != DIGIT_COLUMNS || self.grid.rows != BIT_ROWS {
            return Err(BitclockError::validation(format!(
                "grid must be {DIGIT_COLUMNS}x{BIT_ROWS} (four BCD digits of four bits), got {}x{}",
                self.grid.columns, self.grid.rows
            )));
        }
        if self.grid.column_spacing <= 0 || self.grid.row_spacing <= 0 {
            return Err(BitclockError::validation("grid spacing must be > 0"));
        }
        if self.leds.radius == 0 {
            return Err(BitclockError::validation("led radius must be > 0"));
        }

        if self.pulse.enabled {
            if !self.pulse.freq_hz.is_finite() || self.pulse.freq_hz <= 0.0 {
                return Err(BitclockError::validation(
                    "pulse freq_hz must be finite and > 0",
                ));
            }
            if !(0.0..=1.0).contains(&self.pulse.depth) {
                return Err(BitclockError::validation("pulse depth must be in [0, 1]"));
            }
        }
        if self.colon.enabled {
            if !self.colon.blink_hz.is_finite() || self.colon.blink_hz <= 0.0 {
                return Err(BitclockError::validation(
                    "colon blink_hz must be finite and > 0",
                ));
            }
            if self.colon.radius == 0 || self.colon.spacing <= 0 {
                return Err(BitclockError::validation(
                    "colon radius and spacing must be > 0",
                ));
            }
        }
        if self.overlay.enabled {
            if !(0.0..=1.0).contains(&self.overlay.opacity) {
                return Err(BitclockError::validation(
                    "overlay opacity must be in [0, 1]",
                ));
            }
            if !self.overlay.font_size_px.is_finite() || self.overlay.font_size_px <= 0.0 {
                return Err(BitclockError::validation(
                    "overlay font_size_px must be finite and > 0",
                ));
            }
            if !self.overlay.line_height_px.is_finite() || self.overlay.line_height_px <= 0.0 {
                return Err(BitclockError::validation(
                    "overlay line_height_px must be finite and > 0",
                ));
            }
            if self.overlay.visible_lines == 0 || self.overlay.max_line_chars == 0 {
                return Err(BitclockError::validation(
                    "overlay visible_lines and max_line_chars must be > 0",
                ));
            }
        }

        if !self.schedule.switch_at_secs.is_finite() || self.schedule.switch_at_secs < 0.0 {
            return Err(BitclockError::validation(
                "schedule switch_at_secs must be finite and >= 0",
            ));
        }
        self.schedule.first.validate()?;
        self.schedule.second.validate()?;

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_is_valid() {
        let cfg = ClockConfig::default();
        cfg.validate().unwrap();
        assert_eq!(cfg.total_frames(), 1320);
    }

    #[test]
    fn default_overlay_text_is_nonempty() {
        let cfg = ClockConfig::default();
        assert!(cfg.overlay.lines.len() > cfg.overlay.visible_lines);
    }

    #[test]
    fn validate_rejects_bad_duration_and_fps() {
        let mut cfg = ClockConfig::default();
        cfg.duration_secs = 0.0;
        assert!(cfg.validate().is_err());

        let mut cfg = ClockConfig::default();
        cfg.duration_secs = -1.0;
        assert!(cfg.validate().is_err());

        let mut cfg = ClockConfig::default();
        cfg.fps = 0;
        assert!(cfg.validate().is_err());
    }

    #[test]
    fn validate_rejects_wrong_grid_shape() {
        let mut cfg = ClockConfig::default();
        cfg.grid.columns = 6;
        assert!(cfg.validate().is_err());

        let mut cfg = ClockConfig::default();
        cfg.grid.rows = 3;
        assert!(cfg.validate().is_err());
    }

    #[test]
    fn validate_rejects_out_of_range_time() {
        let mut cfg = ClockConfig::default();
        cfg.schedule.second = TimeOfDay::new(24, 0);
        assert!(cfg.validate().is_err());

        let mut cfg = ClockConfig::default();
        cfg.schedule.first = TimeOfDay::new(4, 60);
        assert!(cfg.validate().is_err());
    }

    #[test]
    fn validate_rejects_bad_effect_parameters() {
        let mut cfg = ClockConfig::default();
        cfg.pulse.depth = 1.5;
        assert!(cfg.validate().is_err());

        let mut cfg = ClockConfig::default();
        cfg.colon.blink_hz = 0.0;
        assert!(cfg.validate().is_err());

        let mut cfg = ClockConfig::default();
        cfg.overlay.opacity = 1.2;
        assert!(cfg.validate().is_err());
    }

    #[test]
    fn disabled_sections_skip_their_parameter_checks() {
        let mut cfg = ClockConfig::default();
        cfg.pulse.enabled = false;
        cfg.pulse.freq_hz = 0.0;
        cfg.colon.enabled = false;
        cfg.colon.blink_hz = f64::NAN;
        cfg.overlay.enabled = false;
        cfg.overlay.opacity = 7.0;
        cfg.validate().unwrap();
    }

    #[test]
    fn json_roundtrip() {
        let cfg = ClockConfig::default();
        let s = serde_json::to_string_pretty(&cfg).unwrap();
        let de: ClockConfig = serde_json::from_str(&s).unwrap();
        assert_eq!(de.canvas.width, 1920);
        assert_eq!(de.schedule.second, TimeOfDay::new(4, 44));
        assert_eq!(de.overlay.lines.len(), cfg.overlay.lines.len());
    }
}
