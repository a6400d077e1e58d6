//! Grid topology - row-major cell indexing and the Moore neighbourhood

use serde::{Deserialize, Serialize};

pub type CellIndex = usize;

/// Cell position in the grid
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CellPos {
    pub row: usize,
    pub column: usize,
}

impl CellPos {
    pub fn new(row: usize, column: usize) -> Self {
        Self { row, column }
    }
}

/// Rectangular grid with each cell's neighbour list computed once.
#[derive(Debug, Clone)]
pub struct GridTopology {
    rows: usize,
    columns: usize,
    neighbours: Vec<Vec<CellIndex>>,
}

impl GridTopology {
    pub fn new(rows: usize, columns: usize) -> Self {
        let mut topology = Self {
            rows,
            columns,
            neighbours: vec![Vec::new(); rows * columns],
        };
        topology.link_neighbours();
        topology
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn columns(&self) -> usize {
        self.columns
    }

    pub fn cell_count(&self) -> usize {
        self.rows * self.columns
    }

    /// Convert cell position to index
    pub fn pos_to_index(&self, pos: CellPos) -> Option<CellIndex> {
        if pos.row < self.rows && pos.column < self.columns {
            Some(pos.row * self.columns + pos.column)
        } else {
            None
        }
    }

    /// Convert index to cell position
    pub fn index_to_pos(&self, index: CellIndex) -> Option<CellPos> {
        if index < self.cell_count() {
            Some(CellPos {
                row: index / self.columns,
                column: index % self.columns,
            })
        } else {
            None
        }
    }

    pub fn neighbours(&self, index: CellIndex) -> &[CellIndex] {
        &self.neighbours[index]
    }

    // Every cell pushes its own neighbours, so each link is stored once per
    // endpoint.
    fn link_neighbours(&mut self) {
        let last_row = self.rows.saturating_sub(1);
        let last_column = self.columns.saturating_sub(1);

        for i in 0..self.rows {
            for j in 0..self.columns {
                let index = i * self.columns + j;
                let mut linked = Vec::with_capacity(8);

                // North
                if i > 0 {
                    linked.push((i - 1, j));
                }
                // South
                if i < last_row {
                    linked.push((i + 1, j));
                }
                // East
                if j < last_column {
                    linked.push((i, j + 1));
                }
                // West
                if j > 0 {
                    linked.push((i, j - 1));
                }
                // North-East
                if i > 0 && j < last_column {
                    linked.push((i - 1, j + 1));
                }
                // North-West
                if i > 0 && j > 0 {
                    linked.push((i - 1, j - 1));
                }
                // South-East
                if i < last_row && j < last_column {
                    linked.push((i + 1, j + 1));
                }
                // South-West
                if i < last_row && j > 0 {
                    linked.push((i + 1, j - 1));
                }

                self.neighbours[index] = linked
                    .into_iter()
                    .map(|(row, column)| row * self.columns + column)
                    .collect();
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn neighbour_counts(topology: &GridTopology) -> Vec<usize> {
        (0..topology.cell_count())
            .map(|index| topology.neighbours(index).len())
            .collect()
    }

    #[test]
    fn test_default_grid_neighbour_counts() {
        let topology = GridTopology::new(4, 5);

        assert_eq!(
            neighbour_counts(&topology),
            vec![
                3, 5, 5, 5, 3, //
                5, 8, 8, 8, 5, //
                5, 8, 8, 8, 5, //
                3, 5, 5, 5, 3,
            ]
        );
    }

    #[test]
    fn test_neighbour_count_formula_holds_for_other_sizes() {
        for (rows, columns) in [(2, 2), (2, 7), (3, 3), (6, 4), (9, 11)] {
            let topology = GridTopology::new(rows, columns);
            let counts = neighbour_counts(&topology);

            let corners = counts.iter().filter(|&&c| c == 3).count();
            let edges = counts.iter().filter(|&&c| c == 5).count();
            let interior = counts.iter().filter(|&&c| c == 8).count();

            assert_eq!(corners, 4, "{rows}x{columns}");
            assert_eq!(edges, 2 * (rows - 2) + 2 * (columns - 2), "{rows}x{columns}");
            assert_eq!(interior, (rows - 2) * (columns - 2), "{rows}x{columns}");
        }
    }

    #[test]
    fn test_links_are_symmetric() {
        let topology = GridTopology::new(4, 5);

        for index in 0..topology.cell_count() {
            for &other in topology.neighbours(index) {
                assert_ne!(index, other);
                assert!(topology.neighbours(other).contains(&index));
            }
        }
    }

    #[test]
    fn test_corner_neighbours() {
        let topology = GridTopology::new(4, 5);

        let mut corner = topology.neighbours(0).to_vec();
        corner.sort();
        assert_eq!(corner, vec![1, 5, 6]);

        let mut far_corner = topology.neighbours(19).to_vec();
        far_corner.sort();
        assert_eq!(far_corner, vec![13, 14, 18]);
    }

    #[test]
    fn test_pos_index_conversion() {
        let topology = GridTopology::new(4, 5);

        let pos = CellPos::new(1, 2);
        let index = topology.pos_to_index(pos).unwrap();
        assert_eq!(index, 7);
        assert_eq!(topology.index_to_pos(index), Some(pos));

        assert_eq!(topology.pos_to_index(CellPos::new(4, 0)), None);
        assert_eq!(topology.pos_to_index(CellPos::new(0, 5)), None);
        assert_eq!(topology.index_to_pos(20), None);
    }

    #[test]
    fn test_single_row_grid() {
        let topology = GridTopology::new(1, 3);

        assert_eq!(neighbour_counts(&topology), vec![1, 2, 1]);
    }
}
