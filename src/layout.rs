use cozy_chess::Square;

use crate::board::squares::{cell_to_square, square_to_cell};

/// A release further than this fraction of the square side from the square
/// centre (on either axis) lands in the dead zone and is ignored.
pub const DROP_RADIUS: f32 = 3.0 / 8.0;

/// Pieces cover this fraction of a square's area.
pub const PIECE_SCALE: f32 = 0.8;

/// Pixel geometry of the board on screen. All coordinates are in the
/// window's logical pixels.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct BoardLayout {
    pub origin: (f32, f32),
    pub square: f32,
    pub flipped: bool,
}

impl BoardLayout {
    pub fn new(origin: (f32, f32), square: f32, flipped: bool) -> Self { Self { origin, square, flipped } }

    /// Largest board that fits `width` pixels, square sides rounded down to whole pixels.
    pub fn fit_width(origin: (f32, f32), width: f32, flipped: bool) -> Self {
        Self::new(origin, (width / 8.0).floor().max(1.0), flipped)
    }

    pub fn side(&self) -> f32 { self.square * 8.0 }

    pub fn bottom(&self) -> f32 { self.origin.1 + self.side() }

    /// Screen cell containing a point, or `None` off the board.
    pub fn cell_at(&self, x: f32, y: f32) -> Option<(usize, usize)> {
        let (lx, ly) = (x - self.origin.0, y - self.origin.1);
        if lx < 0.0 || ly < 0.0 || lx >= self.side() || ly >= self.side() { return None; }
        Some(((lx / self.square) as usize, (ly / self.square) as usize))
    }

    pub fn square_at(&self, x: f32, y: f32) -> Option<Square> {
        let (col, row) = self.cell_at(x, y)?;
        cell_to_square(col, row, self.flipped)
    }

    /// Target square for a piece released at `(x, y)`: the square under the
    /// pointer, but only if the pointer is inside its central region.
    pub fn drop_target(&self, x: f32, y: f32) -> Option<Square> {
        let sq = self.square_at(x, y)?;
        let (cx, cy) = self.square_center(sq);
        let limit = self.square * DROP_RADIUS;
        if (x - cx).abs() <= limit && (y - cy).abs() <= limit { Some(sq) } else { None }
    }

    /// Top-left corner of a square.
    pub fn square_origin(&self, sq: Square) -> (f32, f32) {
        let (col, row) = square_to_cell(sq, self.flipped);
        (self.origin.0 + col as f32 * self.square, self.origin.1 + row as f32 * self.square)
    }

    pub fn square_center(&self, sq: Square) -> (f32, f32) {
        let (x, y) = self.square_origin(sq);
        (x + self.square / 2.0, y + self.square / 2.0)
    }

    pub fn piece_side(&self) -> f32 { self.square * PIECE_SCALE.sqrt() }

    /// Top-left corner and side of a piece sprite centred on `(cx, cy)`.
    pub fn piece_rect_at(&self, cx: f32, cy: f32) -> (f32, f32, f32) {
        let side = self.piece_side();
        (cx - side / 2.0, cy - side / 2.0, side)
    }

    pub fn piece_rect(&self, sq: Square) -> (f32, f32, f32) {
        let (cx, cy) = self.square_center(sq);
        self.piece_rect_at(cx, cy)
    }
}
