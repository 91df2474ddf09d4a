/// Contiguous range of display lines visible at one instant.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ScrollWindow {
    pub start: usize,
    /// Exclusive.
    pub end: usize,
}

/// Select the window of lines visible at time `t`, scrolling so the whole
/// block is traversed exactly once over `duration_secs`.
///
/// `scrollable = max(1, total - visible + 1)` distinct start offsets exist;
/// the offset advances at `scrollable / duration` lines per second and wraps.
pub fn visible_window(
    total_lines: usize,
    visible_lines: usize,
    duration_secs: f64,
    t: f64,
) -> ScrollWindow {
    if total_lines == 0 {
        return ScrollWindow { start: 0, end: 0 };
    }

    let scrollable = total_lines.saturating_sub(visible_lines) + 1;
    let lines_per_sec = scrollable as f64 / duration_secs;
    let start = ((t * lines_per_sec).floor().max(0.0) as usize) % scrollable;
    ScrollWindow {
        start,
        end: (start + visible_lines).min(total_lines),
    }
}

/// Truncate a line to at most `max_chars` characters (not bytes), for
/// display.
pub fn truncate_line(line: &str, max_chars: usize) -> &str {
    match line.char_indices().nth(max_chars) {
        Some((byte_idx, _)) => &line[..byte_idx],
        None => line,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn window_starts_at_zero() {
        let w = visible_window(100, 25, 44.0, 0.0);
        assert_eq!(w, ScrollWindow { start: 0, end: 25 });
    }

    #[test]
    fn window_traverses_whole_block_once_over_duration() {
        let total = 100;
        let visible = 25;
        let duration = 44.0;
        let scrollable = total - visible + 1; // 76 offsets

        // Just before the end of the run the last offset is reached...
        let eps = duration / scrollable as f64 / 2.0;
        let w = visible_window(total, visible, duration, duration - eps);
        assert_eq!(w.start, scrollable - 1);
        assert_eq!(w.end, total);

        // ...and every offset in between appears exactly in order.
        let mut last = 0;
        for i in 0..1000 {
            let t = duration * f64::from(i) / 1000.0;
            let w = visible_window(total, visible, duration, t);
            assert!(w.start >= last);
            last = w.start;
        }
    }

    #[test]
    fn window_wraps_past_the_duration() {
        let w0 = visible_window(100, 25, 44.0, 0.0);
        let w1 = visible_window(100, 25, 44.0, 44.0);
        assert_eq!(w0, w1);
    }

    #[test]
    fn short_blocks_have_a_single_offset() {
        let w = visible_window(10, 25, 44.0, 31.0);
        assert_eq!(w, ScrollWindow { start: 0, end: 10 });
    }

    #[test]
    fn empty_block_yields_empty_window() {
        let w = visible_window(0, 25, 44.0, 3.0);
        assert_eq!(w, ScrollWindow { start: 0, end: 0 });
    }

    #[test]
    fn truncation_counts_chars_not_bytes() {
        assert_eq!(truncate_line("abcdef", 4), "abcd");
        assert_eq!(truncate_line("abc", 4), "abc");
        // Multi-byte chars must not be split.
        assert_eq!(truncate_line("ééééé", 3), "ééé");
    }
}
