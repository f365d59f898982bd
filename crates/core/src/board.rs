//! Board module - manages the game grid
//!
//! The board is a `width x height` grid of [`Cell`]s stored row-major in a flat
//! vector for cache locality. Dimensions are fixed at construction and never
//! change for the lifetime of a session.
//! Coordinates: (x, y) where x grows left to right and y grows top to bottom.

use crate::types::Cell;

/// The game board - flat row-major storage (`y * width + x`)
#[derive(Debug, Clone, PartialEq)]
pub struct Board {
    width: u16,
    height: u16,
    cells: Vec<Cell>,
}

impl Board {
    /// Create an empty board where no cell is bonus-eligible.
    pub fn new(width: u16, height: u16) -> Self {
        Self::with_marks(width, height, || false)
    }

    /// Create an empty board, asking `mark` once per cell whether it may carry a bonus.
    pub fn with_marks(width: u16, height: u16, mut mark: impl FnMut() -> bool) -> Self {
        let len = width as usize * height as usize;
        let cells = (0..len).map(|_| Cell::empty(mark())).collect();
        Self {
            width,
            height,
            cells,
        }
    }

    /// Calculate flat index from (x, y) coordinates
    #[inline(always)]
    fn index(&self, x: i32, y: i32) -> Option<usize> {
        if x < 0 || y < 0 || x >= self.width as i32 || y >= self.height as i32 {
            return None;
        }
        Some(y as usize * self.width as usize + x as usize)
    }

    pub fn width(&self) -> u16 {
        self.width
    }

    pub fn height(&self) -> u16 {
        self.height
    }

    /// Get cell at position (x, y). Returns None if out of bounds.
    pub fn get(&self, x: i32, y: i32) -> Option<&Cell> {
        self.index(x, y).map(|idx| &self.cells[idx])
    }

    pub fn get_mut(&mut self, x: i32, y: i32) -> Option<&mut Cell> {
        self.index(x, y).map(move |idx| &mut self.cells[idx])
    }

    /// Set cell at position (x, y). Returns false if out of bounds.
    pub fn set(&mut self, x: i32, y: i32, cell: Cell) -> bool {
        match self.index(x, y) {
            Some(idx) => {
                self.cells[idx] = cell;
                true
            }
            None => false,
        }
    }

    /// True if (x, y) is inside the board and filled.
    pub fn is_occupied(&self, x: i32, y: i32) -> bool {
        self.get(x, y).is_some_and(Cell::is_filled)
    }

    /// Borrow one row. Panics if `y` is out of range.
    pub fn row(&self, y: usize) -> &[Cell] {
        let start = y * self.width as usize;
        &self.cells[start..start + self.width as usize]
    }

    /// Iterate rows top to bottom.
    pub fn rows(&self) -> impl Iterator<Item = &[Cell]> {
        self.cells.chunks_exact(self.width as usize)
    }

    /// Check if a row is completely filled
    pub fn is_row_full(&self, y: usize) -> bool {
        if y >= self.height as usize {
            return false;
        }
        self.row(y).iter().all(Cell::is_filled)
    }

    /// Check if a row has no filled cell
    pub fn is_row_empty(&self, y: usize) -> bool {
        if y >= self.height as usize {
            return false;
        }
        self.row(y).iter().all(Cell::is_empty)
    }

    /// Indices of all full rows, top to bottom.
    pub fn full_rows(&self) -> Vec<usize> {
        (0..self.height as usize)
            .filter(|&y| self.is_row_full(y))
            .collect()
    }

    /// Remove the given rows and refill the top with fresh empty rows.
    ///
    /// Remaining rows keep their relative order and the row count is unchanged.
    /// `mark` decides bonus eligibility for every refilled cell.
    /// Uses a two-pointer pass from the bottom with no extra row buffer.
    pub fn remove_rows(&mut self, rows: &[usize], mut mark: impl FnMut() -> bool) {
        if rows.is_empty() {
            return;
        }

        let width = self.width as usize;
        let mut write_y = self.height as usize;

        for read_y in (0..self.height as usize).rev() {
            if rows.contains(&read_y) {
                continue;
            }
            write_y -= 1;
            if write_y != read_y {
                let src = read_y * width;
                self.cells.copy_within(src..src + width, write_y * width);
            }
        }

        for cell in &mut self.cells[..write_y * width] {
            *cell = Cell::empty(mark());
        }
    }

    /// Reset every cell to empty, re-drawing bonus eligibility.
    pub fn clear(&mut self, mut mark: impl FnMut() -> bool) {
        for cell in &mut self.cells {
            *cell = Cell::empty(mark());
        }
    }

    /// Number of filled cells on the board.
    pub fn filled_count(&self) -> usize {
        self.cells.iter().filter(|c| c.is_filled()).count()
    }

    /// Get a reference to the internal cells array
    pub fn cells(&self) -> &[Cell] {
        &self.cells
    }

    /// Build a board from row-major `value` rows (handy for tests and replays).
    ///
    /// Panics if the rows are ragged.
    pub fn from_values(rows: &[&[u8]]) -> Self {
        let height = rows.len() as u16;
        let width = rows.first().map_or(0, |r| r.len()) as u16;
        assert!(
            rows.iter().all(|r| r.len() == width as usize),
            "board rows must have identical length"
        );

        let cells = rows
            .iter()
            .flat_map(|r| r.iter())
            .map(|&value| Cell {
                value,
                ..Cell::empty(false)
            })
            .collect();
        Self {
            width,
            height,
            cells,
        }
    }
}
