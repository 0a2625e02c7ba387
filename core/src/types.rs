use ndarray::Array2;

/// Single coordinate axis, also the limit on board width and height.
pub type Coord = u8;

/// Count type for cells and hazards, wide enough for a full 255x255 board.
pub type CellCount = u16;

/// Two-dimensional board coordinates `(row, col)`.
pub type Coord2 = (Coord, Coord);

pub trait NdIndex {
    type Output;
    fn nd_index(self) -> Self::Output;
}

impl NdIndex for Coord2 {
    type Output = [usize; 2];

    fn nd_index(self) -> Self::Output {
        [self.0.into(), self.1.into()]
    }
}

pub const fn cell_area(rows: Coord, cols: Coord) -> CellCount {
    let rows = rows as CellCount;
    let cols = cols as CellCount;
    rows.saturating_mul(cols)
}

const NEIGHBOR_OFFSETS: [(i8, i8); 8] = [
    (-1, -1),
    (-1, 0),
    (-1, 1),
    (0, -1),
    (0, 1),
    (1, -1),
    (1, 0),
    (1, 1),
];

/// Iterates the in-bounds subset of a cell's up-to-8 neighbors.
#[derive(Debug)]
pub struct NeighborIter {
    center: Coord2,
    bounds: Coord2,
    cursor: usize,
}

impl NeighborIter {
    pub(crate) fn new(center: Coord2, bounds: Coord2) -> Self {
        Self {
            center,
            bounds,
            cursor: 0,
        }
    }
}

impl Iterator for NeighborIter {
    type Item = Coord2;

    fn next(&mut self) -> Option<Coord2> {
        while let Some(&(d_row, d_col)) = NEIGHBOR_OFFSETS.get(self.cursor) {
            self.cursor += 1;

            let row = self.center.0.checked_add_signed(d_row);
            let col = self.center.1.checked_add_signed(d_col);
            if let (Some(row), Some(col)) = (row, col)
                && row < self.bounds.0
                && col < self.bounds.1
            {
                return Some((row, col));
            }
        }
        None
    }
}

pub trait NeighborhoodExt {
    fn neighbor_coords(&self, center: Coord2) -> NeighborIter;
}

impl<T> NeighborhoodExt for Array2<T> {
    fn neighbor_coords(&self, center: Coord2) -> NeighborIter {
        let dim = self.dim();
        let bounds = (dim.0.try_into().unwrap(), dim.1.try_into().unwrap());
        NeighborIter::new(center, bounds)
    }
}
