use crate::config::{ColonConfig, PulseConfig};

/// Brightness multiplier at time `t`: a sine wave centered on 1.0 with
/// amplitude `depth`. Returns exactly 1.0 when the effect is disabled.
///
/// The caller applies the multiplier through [`Rgb8::modulate`], which clamps
/// it to [0, 2] before scaling channels.
///
/// [`Rgb8::modulate`]: crate::foundation::core::Rgb8::modulate
pub fn pulse_factor(cfg: &PulseConfig, t: f64) -> f64 {
    if !cfg.enabled {
        return 1.0;
    }
    1.0 + cfg.depth * (2.0 * std::f64::consts::PI * cfg.freq_hz * t).sin()
}

/// Whether the colon separator is visible at time `t`: on for the first half
/// of each blink period, off for the second half. Always false when
/// disabled.
pub fn colon_visible(cfg: &ColonConfig, t: f64) -> bool {
    if !cfg.enabled {
        return false;
    }
    let period = 1.0 / cfg.blink_hz;
    t.rem_euclid(period) < period / 2.0
}
