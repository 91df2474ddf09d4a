use crate::config::GridConfig;
use crate::foundation::error::{BitclockError, BitclockResult};

/// Pixel centers for the indicator grid, computed once at startup and reused
/// by every frame. Indexed `[column][row]`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct GridLayout {
    positions: Vec<Vec<(i32, i32)>>,
    center: (i32, i32),
}

impl GridLayout {
    /// Pure, deterministic layout: the full grid is centered on
    /// `cfg.center`, columns `column_spacing` apart, rows `row_spacing`
    /// apart.
    pub fn compute(cfg: &GridConfig) -> BitclockResult<Self> {
        if cfg.columns == 0 || cfg.rows == 0 {
            return Err(BitclockError::validation("grid columns/rows must be > 0"));
        }
        if cfg.column_spacing <= 0 || cfg.row_spacing <= 0 {
            return Err(BitclockError::validation("grid spacing must be > 0"));
        }

        let (cx, cy) = cfg.center;
        let total_w = cfg.column_spacing * (cfg.columns as i32 - 1);
        let total_h = cfg.row_spacing * (cfg.rows as i32 - 1);
        let left = cx - total_w / 2;
        let top = cy - total_h / 2;

        let positions = (0..cfg.columns as i32)
            .map(|col| {
                let col_x = left + col * cfg.column_spacing;
                (0..cfg.rows as i32)
                    .map(|row| (col_x, top + row * cfg.row_spacing))
                    .collect()
            })
            .collect();

        Ok(Self {
            positions,
            center: cfg.center,
        })
    }

    pub fn position(&self, col: usize, row: usize) -> (i32, i32) {
        self.positions[col][row]
    }

    pub fn column_x(&self, col: usize) -> i32 {
        self.positions[col][0].0
    }

    pub fn columns(&self) -> usize {
        self.positions.len()
    }

    pub fn rows(&self) -> usize {
        self.positions.first().map_or(0, Vec::len)
    }

    /// Vertical center of the grid, used to anchor the colon dots.
    pub fn center_y(&self) -> i32 {
        self.center.1
    }

    /// Horizontal midpoint between the hour-ones and minute-tens columns,
    /// where the colon separator sits.
    pub fn colon_x(&self) -> i32 {
        (self.column_x(1) + self.column_x(2)) / 2
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn demo_grid() -> GridConfig {
        GridConfig {
            columns: 4,
            rows: 4,
            column_spacing: 280,
            row_spacing: 160,
            center: (960, 500),
        }
    }

    #[test]
    fn adjacent_positions_differ_by_exact_spacing() {
        let g = GridLayout::compute(&demo_grid()).unwrap();
        for col in 0..3 {
            assert_eq!(g.column_x(col + 1) - g.column_x(col), 280);
        }
        for row in 0..3 {
            let (_, y0) = g.position(0, row);
            let (_, y1) = g.position(0, row + 1);
            assert_eq!(y1 - y0, 160);
        }
    }

    #[test]
    fn grid_is_symmetric_about_the_center() {
        let cfg = demo_grid();
        let g = GridLayout::compute(&cfg).unwrap();
        let (cx, cy) = cfg.center;

        let (x_first, y_first) = g.position(0, 0);
        let (x_last, y_last) = g.position(3, 3);
        assert_eq!(cx - x_first, x_last - cx);
        assert_eq!(cy - y_first, y_last - cy);
    }

    #[test]
    fn compute_is_idempotent() {
        let cfg = demo_grid();
        let g = GridLayout::compute(&cfg).unwrap();
        assert_eq!(g, GridLayout::compute(&cfg).unwrap());
        assert_eq!(g.columns(), 4);
        assert_eq!(g.rows(), 4);
    }

    #[test]
    fn colon_sits_between_hour_and_minute_columns() {
        let g = GridLayout::compute(&demo_grid()).unwrap();
        assert_eq!(g.colon_x(), (g.column_x(1) + g.column_x(2)) / 2);
        assert!(g.column_x(1) < g.colon_x() && g.colon_x() < g.column_x(2));
        assert_eq!(g.center_y(), 500);
    }

    #[test]
    fn compute_rejects_degenerate_inputs() {
        let mut cfg = demo_grid();
        cfg.columns = 0;
        assert!(GridLayout::compute(&cfg).is_err());

        let mut cfg = demo_grid();
        cfg.row_spacing = 0;
        assert!(GridLayout::compute(&cfg).is_err());
    }
}
