//! Pixel-independent layout of the placeholder artwork (badges and the fake
//! QR grid). The browser layer paints these onto a 2D canvas.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

pub const QR_GRID: usize = 20;
pub const BADGE_INNER: &str = "#2a2a4a";
pub const BADGE_OUTER: &str = "#1a1a2e";
pub const ACCENT: &str = "#00d4ff";
pub const BADGE_GLYPH_SCALE: f64 = 0.4;
pub const OUTLINE_PX: f64 = 4.0;

/// 20x20 grid, column-major (`cells[i * QR_GRID + j]` is column `i`, row
/// `j`). Three 7x7 finder squares sit in the corners; everything else is a
/// coin flip from `seed`.
pub fn qr_cells(seed: u64) -> Vec<bool> {
    let mut rng = StdRng::seed_from_u64(seed);
    let mut cells = vec![false; QR_GRID * QR_GRID];
    for i in 0..QR_GRID {
        for j in 0..QR_GRID {
            let finder = (i < 7 && j < 7) || (i < 7 && j > 12) || (i > 12 && j < 7);
            cells[i * QR_GRID + j] = if finder {
                finder_cell(i % 13, j % 13)
            } else {
                rng.gen::<f32>() > 0.5
            };
        }
    }
    cells
}

// Outer ring and 3x3 centre of a 7x7 finder square.
fn finder_cell(i: usize, j: usize) -> bool {
    let ring = i < 1 || i > 5 || j < 1 || j > 5;
    let centre = i > 1 && i < 5 && j > 1 && j < 5;
    ring || centre
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn finder_squares_are_fixed() {
        let a = qr_cells(1);
        let b = qr_cells(2);
        for (i, j) in [(0, 0), (6, 6), (3, 3), (0, 19), (19, 0), (16, 3)] {
            assert_eq!(a[i * QR_GRID + j], b[i * QR_GRID + j], "cell {i},{j}");
        }
        assert!(a[0]);
        assert!(!a[QR_GRID + 1]); // gap between ring and centre
    }

    #[test]
    fn same_seed_same_pattern() {
        assert_eq!(qr_cells(42), qr_cells(42));
    }
}
