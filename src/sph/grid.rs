use crate::{Scalar, Vec2};
use itertools::iproduct;
use smallvec::SmallVec;
use std::collections::HashMap;

/// Represents a single grid cell. A grid cell contains a list of the particles within it.
///
/// A `SmallVec` is used to prevent unnecessary allocation.
type GridCell = SmallVec<[usize; 8]>;

/// A 2d cell coordinate.
pub type Coord = (i32, i32);

/// The Grid structure used to speed up SPH neighbor finding.
///
/// Cells are keyed by `(x / cell_size, y / cell_size)` truncated towards zero, so the cells
/// straddling an axis (`-1 < x / cell_size < 1`) are twice as wide as the others. Particles are
/// kept at positive coordinates by the walls, so this never comes up in practice, but the
/// 3x3 neighborhood is not guaranteed to contain every particle within `cell_size` near the
/// axes.
#[derive(Clone, Debug)]
pub struct Grid {
    cells: HashMap<Coord, GridCell>,
    cell_size: Scalar,
}

impl Grid {
    pub fn new(cell_size: Scalar) -> Self {
        Grid {
            cells: HashMap::new(),
            cell_size,
        }
    }

    pub fn cell_size(&self) -> Scalar {
        self.cell_size
    }

    pub fn position_to_coord(&self, pos: &Vec2) -> Coord {
        ((pos.x / self.cell_size) as i32, (pos.y / self.cell_size) as i32)
    }

    /// Empties every cell. Cells are kept around with their allocations, so refilling the grid
    /// with a similar distribution of particles doesn't allocate.
    pub fn clear(&mut self) {
        self.cells.values_mut().for_each(|cell| cell.clear());
    }

    /// Clears the grid and inserts every particle, in index order.
    pub fn insert(&mut self, positions: &[Vec2]) {
        self.clear();
        for (index, pos) in positions.iter().enumerate() {
            let coord = self.position_to_coord(pos);
            self.cells.entry(coord).or_default().push(index);
        }
    }

    /// The particles in the given cell.
    pub fn cell(&self, coord: Coord) -> &[usize] {
        self.cells
            .get(&coord)
            .map(|cell| cell.as_slice())
            .unwrap_or(&[])
    }

    /// Every particle in the 3x3 block of cells around `pos`, including the particle at `pos`
    /// itself if there is one. This can include particles further than `cell_size` away.
    ///
    /// Coordinates saturate at the `i32` range; neighbor cells past it are skipped.
    pub fn nearby(&self, pos: &Vec2) -> impl Iterator<Item = usize> + Clone + '_ {
        let (x, y) = self.position_to_coord(pos);
        iproduct!(-1..=1, -1..=1)
            .filter_map(move |(dy, dx)| Some((x.checked_add(dx)?, y.checked_add(dy)?)))
            .filter_map(move |coord| self.cells.get(&coord))
            .flat_map(|cell| cell.iter().copied())
    }

    /// The number of cells that have been allocated, including empty ones.
    pub fn num_cells(&self) -> usize {
        self.cells.len()
    }

    /// The number of cells that outgrew their inline storage.
    pub(crate) fn measure_spilled(&self) -> usize {
        self.cells.values().filter(|x| x.spilled()).count()
    }
}
