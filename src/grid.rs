/// Rectangular field of cells stored row-major in one contiguous buffer.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Field {
    cells: Vec<bool>,
    rows: usize,
    cols: usize,
}

impl Field {
    /// Creates a field filled with dead cells.
    pub fn blank(rows: usize, cols: usize) -> Self {
        assert!(rows >= 1 && cols >= 1);
        Self {
            cells: vec![false; rows * cols],
            rows,
            cols,
        }
    }

    /// Creates a field with random cells.
    ///
    /// `seed` - random seed (if `None`, then random seed is generated)
    /// `fill_rate` - probability of a cell being alive
    pub fn random(rows: usize, cols: usize, seed: Option<u64>, fill_rate: f64) -> Self {
        use rand::{Rng, SeedableRng};
        use rand_chacha::ChaCha8Rng;

        let mut rng = if let Some(x) = seed {
            ChaCha8Rng::seed_from_u64(x)
        } else {
            ChaCha8Rng::from_entropy()
        };
        let mut field = Self::blank(rows, cols);
        for cell in field.cells.iter_mut() {
            *cell = rng.gen_bool(fill_rate);
        }
        field
    }

    /// Builds a field from row-major states; `states.len()` must be `rows * cols`.
    pub fn from_cells(rows: usize, cols: usize, states: Vec<bool>) -> Self {
        assert!(rows >= 1 && cols >= 1);
        assert_eq!(states.len(), rows * cols);
        Self {
            cells: states,
            rows,
            cols,
        }
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn cols(&self) -> usize {
        self.cols
    }

    pub fn get(&self, row: usize, col: usize) -> bool {
        self.cells[row * self.cols + col]
    }

    pub fn set(&mut self, row: usize, col: usize, state: bool) {
        self.cells[row * self.cols + col] = state;
    }

    pub fn cells(&self) -> &[bool] {
        &self.cells
    }

    pub(crate) fn cells_mut(&mut self) -> &mut [bool] {
        &mut self.cells
    }

    pub fn rows_iter(&self) -> std::slice::Chunks<'_, bool> {
        self.cells.chunks(self.cols)
    }

    /// Total number of alive cells.
    pub fn population(&self) -> usize {
        self.cells.iter().filter(|&&c| c).count()
    }

    /// Copies `pattern` onto the field with its top-left corner at `(row, col)`.
    /// Positions past the edges wrap around.
    pub fn paste(&mut self, pattern: &Field, row: usize, col: usize) {
        for (dr, line) in pattern.rows_iter().enumerate() {
            for (dc, &state) in line.iter().enumerate() {
                self.set((row + dr) % self.rows, (col + dc) % self.cols, state);
            }
        }
    }
}

/// The `current`/`next` buffers of one simulation.
///
/// Within a step `current` is only read and `next` is only written;
/// [`GridPair::swap`] then exchanges the two owned buffers.
#[derive(Debug)]
pub struct GridPair {
    current: Field,
    next: Field,
}

impl GridPair {
    /// Takes `current` as generation 0 and allocates a blank `next` of the same shape.
    pub fn new(current: Field) -> Self {
        let next = Field::blank(current.rows(), current.cols());
        Self { current, next }
    }

    pub fn rows(&self) -> usize {
        self.current.rows()
    }

    pub fn cols(&self) -> usize {
        self.current.cols()
    }

    /// Reads a cell of the current generation.
    pub fn get(&self, row: usize, col: usize) -> bool {
        self.current.get(row, col)
    }

    /// Writes a cell of the generation being built.
    pub fn set_next(&mut self, row: usize, col: usize, state: bool) {
        self.next.set(row, col, state);
    }

    pub fn current(&self) -> &Field {
        &self.current
    }

    pub fn next(&self) -> &Field {
        &self.next
    }

    /// Borrows `current` for reading and `next` for writing at the same time.
    pub fn split(&mut self) -> (&Field, &mut Field) {
        (&self.current, &mut self.next)
    }

    /// Exchanges the roles of the buffers. Only the owning handles move.
    pub fn swap(&mut self) {
        std::mem::swap(&mut self.current, &mut self.next);
    }

    /// Computes the next generation and makes it current.
    pub fn advance(&mut self) {
        let (current, next) = self.split();
        crate::engine::advance(current, next);
        self.swap();
    }
}
