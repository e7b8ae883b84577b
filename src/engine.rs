use crate::Field;
use rayon::prelude::*;

/// Number of alive cells among the 8 neighbours of `(row, col)`, edges stitched together.
///
/// On fields narrower than 3 cells some offsets land on the same cell; each
/// sample is counted separately.
pub fn count_neighbors(field: &Field, row: usize, col: usize) -> u8 {
    let (rows, cols) = (field.rows(), field.cols());
    let mut count = 0;
    for di in 0..3 {
        for dj in 0..3 {
            if di == 1 && dj == 1 {
                continue;
            }
            // (row + di - 1) mod rows, kept non-negative
            let r = (row + di + rows - 1) % rows;
            let c = (col + dj + cols - 1) % cols;
            count += field.get(r, c) as u8;
        }
    }
    count
}

/// Conway's rule: survival on 2 or 3 neighbours, birth on exactly 3.
pub fn next_state(alive: bool, neighbors: u8) -> bool {
    matches!((alive, neighbors), (true, 2) | (true, 3) | (false, 3))
}

/// Writes the successor of `current` into `next`.
///
/// `current` is only read, every cell of `next` is overwritten. Rows of `next`
/// are handed out to the rayon pool; the neighbour loop itself stays sequential.
pub fn advance(current: &Field, next: &mut Field) {
    assert_eq!(
        (current.rows(), current.cols()),
        (next.rows(), next.cols()),
        "buffers must have the same shape"
    );
    let cols = current.cols();
    next.cells_mut()
        .par_chunks_mut(cols)
        .enumerate()
        .for_each(|(row, dst)| {
            for (col, cell) in dst.iter_mut().enumerate() {
                let neighbors = count_neighbors(current, row, col);
                *cell = next_state(current.get(row, col), neighbors);
            }
        });
}
