//! Pieces module - shape matrices, the difficulty-tiered catalog and rotation
//!
//! Shapes are small integer matrices (0 = empty sub-cell, nonzero = filled).
//! The catalog is split into tiers where every tier contains all the shapes of
//! the easier tiers: EASY has the seven classic tetrominoes, MEDIUM adds six
//! pentomino-ish shapes and a monomino, HARD adds four dense 3x3/5x5 shapes.
//!
//! Rotation is a plain clockwise quarter turn of the matrix. There is no
//! kick table: a rotation that collides is simply discarded by the caller.

use crate::types::{ColorToken, Difficulty, Position, Rgb};

/// Row-major shape matrix.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Matrix {
    rows: usize,
    cols: usize,
    cells: Vec<u8>,
}

impl Matrix {
    /// Build a matrix from rows. Panics on ragged input.
    pub fn from_rows<R: AsRef<[u8]>>(rows: &[R]) -> Self {
        let cols = rows.first().map_or(0, |r| r.as_ref().len());
        assert!(
            rows.iter().all(|r| r.as_ref().len() == cols),
            "shape rows must have identical length"
        );
        Self {
            rows: rows.len(),
            cols,
            cells: rows.iter().flat_map(|r| r.as_ref().iter().copied()).collect(),
        }
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn cols(&self) -> usize {
        self.cols
    }

    pub fn get(&self, row: usize, col: usize) -> u8 {
        self.cells[row * self.cols + col]
    }

    /// Iterate filled sub-cells as `(local_x, local_y, value)`.
    pub fn filled(&self) -> impl Iterator<Item = (i32, i32, u8)> + '_ {
        self.cells
            .iter()
            .enumerate()
            .filter(|(_, &v)| v != 0)
            .map(move |(i, &v)| ((i % self.cols) as i32, (i / self.cols) as i32, v))
    }

    /// Clockwise quarter turn.
    ///
    /// For square matrices this is `new[i][j] = old[N - j][i]` with `N` the last
    /// row index; rectangular matrices come out with rows and cols swapped.
    pub fn rotated_cw(&self) -> Self {
        let last = self.rows.saturating_sub(1);
        let mut cells = Vec::with_capacity(self.cells.len());
        for i in 0..self.cols {
            for j in 0..self.rows {
                cells.push(self.get(last - j, i));
            }
        }
        Self {
            rows: self.cols,
            cols: self.rows,
            cells,
        }
    }

    /// Copy out as nested rows (renderers and tests).
    pub fn to_rows(&self) -> Vec<Vec<u8>> {
        self.cells.chunks(self.cols.max(1)).map(<[u8]>::to_vec).collect()
    }
}

/// A piece: shape, color and top-left anchor on the board.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Piece {
    pub matrix: Matrix,
    pub color: ColorToken,
    pub position: Position,
}

impl Piece {
    pub fn new(matrix: Matrix, color: ColorToken, position: Position) -> Self {
        Self {
            matrix,
            color,
            position,
        }
    }

    /// Create a piece from a catalog entry, centered horizontally on row 0.
    pub fn spawn(entry: &CatalogEntry, board_width: u16) -> Self {
        let matrix = entry.matrix();
        let x = (board_width as i32 - matrix.cols() as i32).div_euclid(2);
        Self {
            matrix,
            color: entry.color,
            position: Position::new(x, 0),
        }
    }

    /// Absolute board coordinates of every filled sub-cell with its value.
    pub fn cells(&self) -> impl Iterator<Item = (i32, i32, u8)> + '_ {
        let Position { x, y } = self.position;
        self.matrix
            .filled()
            .map(move |(lx, ly, v)| (x + lx, y + ly, v))
    }
}

/// A shape of the static catalog paired with its palette color.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CatalogEntry {
    pub shape: &'static [&'static [u8]],
    pub color: ColorToken,
}

impl CatalogEntry {
    pub fn matrix(&self) -> Matrix {
        Matrix::from_rows(self.shape)
    }
}

const fn solid(r: u8, g: u8, b: u8) -> ColorToken {
    ColorToken::Solid(Rgb::new(r, g, b))
}

/// Palette shared by all tiers; catalog entry `i` uses color `i`.
pub const PALETTE: [ColorToken; 20] = [
    solid(0xFF, 0x00, 0x00),
    solid(0x00, 0xFF, 0x00),
    solid(0x00, 0x00, 0xFF),
    solid(0xFF, 0xFF, 0x00),
    solid(0x00, 0xFF, 0xFF),
    solid(0xFF, 0x00, 0xFF),
    solid(0xC0, 0xC0, 0xC0),
    ColorToken::Ghost,
    solid(0x80, 0x00, 0x00),
    solid(0x80, 0x80, 0x00),
    solid(0x00, 0x80, 0x00),
    solid(0x80, 0x00, 0x80),
    solid(0x00, 0x80, 0x80),
    solid(0x00, 0x00, 0x00),
    solid(0xFF, 0xA5, 0x00),
    solid(0xFF, 0xC0, 0xCB),
    ColorToken::Festive,
    solid(0xFF, 0xD7, 0x00),
    solid(0xFF, 0xDA, 0xB9),
    solid(0xFF, 0xDE, 0xAD),
];

static EASY_SHAPES: [&[&[u8]]; 7] = [
    &[&[1, 1], &[1, 1]],
    &[&[0, 1, 0], &[1, 1, 1], &[0, 0, 0]],
    &[&[1, 1, 0], &[0, 1, 1], &[0, 0, 0]],
    &[&[0, 1, 1], &[1, 1, 0], &[0, 0, 0]],
    &[&[0, 0, 0, 0], &[0, 0, 0, 0], &[1, 1, 1, 1], &[0, 0, 0, 0]],
    &[&[1, 1, 1], &[1, 0, 0], &[0, 0, 0]],
    &[&[1, 1, 1], &[0, 0, 1], &[0, 0, 0]],
];

static MEDIUM_SHAPES: [&[&[u8]]; 6] = [
    &[&[2]],
    &[&[2, 0, 0], &[2, 0, 0], &[2, 2, 2]],
    &[&[2, 2, 2], &[2, 0, 2], &[2, 0, 2]],
    &[&[0, 0, 2], &[2, 2, 2], &[0, 0, 2]],
    &[&[0, 0, 2], &[0, 2, 2], &[2, 2, 0]],
    &[
        &[0, 0, 0, 0, 0],
        &[0, 0, 0, 0, 0],
        &[2, 2, 2, 2, 2],
        &[0, 0, 0, 0, 0],
        &[0, 0, 0, 0, 0],
    ],
];

static HARD_SHAPES: [&[&[u8]]; 4] = [
    &[&[3, 0, 3], &[3, 3, 3], &[3, 0, 3]],
    &[&[0, 3, 0], &[3, 3, 3], &[0, 3, 0]],
    &[&[3, 0, 3], &[0, 3, 0], &[3, 0, 3]],
    &[
        &[0, 0, 2, 0, 0],
        &[0, 2, 2, 2, 0],
        &[2, 2, 2, 2, 2],
        &[0, 0, 2, 0, 0],
        &[0, 0, 0, 0, 0],
    ],
];

/// Number of catalog entries in a tier.
pub fn catalog_len(difficulty: Difficulty) -> usize {
    match difficulty {
        Difficulty::Easy => EASY_SHAPES.len(),
        Difficulty::Medium => EASY_SHAPES.len() + MEDIUM_SHAPES.len(),
        Difficulty::Hard => EASY_SHAPES.len() + MEDIUM_SHAPES.len() + HARD_SHAPES.len(),
    }
}

/// Catalog entry `index` of a tier, or `None` past the end of the tier.
pub fn catalog_entry(difficulty: Difficulty, index: usize) -> Option<CatalogEntry> {
    if index >= catalog_len(difficulty) {
        return None;
    }
    let shape = EASY_SHAPES
        .iter()
        .chain(MEDIUM_SHAPES.iter())
        .chain(HARD_SHAPES.iter())
        .copied()
        .nth(index)?;
    Some(CatalogEntry {
        shape,
        color: PALETTE[index % PALETTE.len()],
    })
}

/// The whole tier, in catalog order.
pub fn catalog(difficulty: Difficulty) -> Vec<CatalogEntry> {
    (0..catalog_len(difficulty))
        .filter_map(|i| catalog_entry(difficulty, i))
        .collect()
}

/// Smallest `(width, height)` on which every shape of the tier spawns inside the well.
///
/// Width is the widest matrix (spawn centers on the full matrix); height is
/// the lowest filled row of any matrix.
pub fn spawn_footprint(difficulty: Difficulty) -> (u16, u16) {
    catalog(difficulty).iter().fold((0, 0), |(w, h), entry| {
        let matrix = entry.matrix();
        let rows = matrix.filled().map(|(_, y, _)| y + 1).max().unwrap_or(0);
        (w.max(matrix.cols() as u16), h.max(rows as u16))
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tiers_are_supersets() {
        assert_eq!(catalog_len(Difficulty::Easy), 7);
        assert_eq!(catalog_len(Difficulty::Medium), 13);
        assert_eq!(catalog_len(Difficulty::Hard), 17);

        let easy = catalog(Difficulty::Easy);
        let hard = catalog(Difficulty::Hard);
        assert_eq!(&hard[..easy.len()], easy.as_slice());
        assert!(catalog_entry(Difficulty::Easy, 7).is_none());
    }

    #[test]
    fn test_every_shape_has_a_filled_cell() {
        for entry in catalog(Difficulty::Hard) {
            assert!(entry.matrix().filled().count() > 0);
        }
    }

    #[test]
    fn test_rotate_t_clockwise() {
        let t = Matrix::from_rows(&[[0u8, 1, 0], [1, 1, 1], [0, 0, 0]]);
        let r = t.rotated_cw();
        assert_eq!(r.to_rows(), vec![vec![0, 1, 0], vec![0, 1, 1], vec![0, 1, 0]]);
    }

    #[test]
    fn test_rotate_rectangular_swaps_dims() {
        let bar = Matrix::from_rows(&[[1u8, 2, 3]]);
        let r = bar.rotated_cw();
        assert_eq!((r.rows(), r.cols()), (3, 1));
        assert_eq!(r.to_rows(), vec![vec![1], vec![2], vec![3]]);
        assert_eq!(r.rotated_cw().to_rows(), vec![vec![3, 2, 1]]);
    }

    #[test]
    fn test_spawn_is_centered() {
        let entry = catalog_entry(Difficulty::Easy, 4).unwrap();
        let piece = Piece::spawn(&entry, 16);
        assert_eq!(piece.position, Position::new(6, 0));

        let mono = catalog_entry(Difficulty::Medium, 7).unwrap();
        let piece = Piece::spawn(&mono, 16);
        assert_eq!(piece.position, Position::new(7, 0));
    }

    #[test]
    fn test_spawn_footprint_per_tier() {
        assert_eq!(spawn_footprint(Difficulty::Easy), (4, 3));
        assert_eq!(spawn_footprint(Difficulty::Medium), (5, 3));
        assert_eq!(spawn_footprint(Difficulty::Hard), (5, 4));
    }

    #[test]
    fn test_piece_cells_are_absolute() {
        let piece = Piece::new(
            Matrix::from_rows(&[[0u8, 1], [1, 1]]),
            PALETTE[0],
            Position::new(3, -1),
        );
        let cells: Vec<_> = piece.cells().collect();
        assert_eq!(cells, vec![(4, -1, 1), (3, 0, 1), (4, 0, 1)]);
    }
}
