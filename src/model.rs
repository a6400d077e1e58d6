use tracing::{debug, trace, warn};

use crate::cell::{Biomass, Cell};
use crate::config::ModelConfig;
use crate::error::{ConfigError, ModelError, Result};
use crate::family::{Family, FamilyId, Harvester, HarvesterId};
use crate::topology::{CellIndex, CellPos, GridTopology};

/// The grid of cells and the families harvesting it.
#[derive(Debug, Clone)]
pub struct Model {
    config: ModelConfig,
    topology: GridTopology,
    tick: u64,
    cells: Vec<Cell>,
    families: Vec<Family>,
}

impl Default for Model {
    fn default() -> Self {
        Self::build(ModelConfig::default())
    }
}

impl Model {
    pub fn new(config: ModelConfig) -> std::result::Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self::build(config))
    }

    fn build(config: ModelConfig) -> Self {
        let topology = GridTopology::new(config.rows, config.columns);
        let cells = (0..topology.cell_count())
            .map(|index| Cell::with_neighbours(topology.neighbours(index).to_vec()))
            .collect();
        let families = (0..config.families)
            .map(|id| Family::new(FamilyId(id), config.harvesters_per_family))
            .collect();
        Self {
            config,
            topology,
            tick: 0,
            cells,
            families,
        }
    }

    pub fn config(&self) -> &ModelConfig {
        &self.config
    }

    pub fn topology(&self) -> &GridTopology {
        &self.topology
    }

    pub fn rows(&self) -> usize {
        self.topology.rows()
    }

    pub fn columns(&self) -> usize {
        self.topology.columns()
    }

    /// Number of completed steps.
    pub fn tick(&self) -> u64 {
        self.tick
    }

    pub fn cells(&self) -> &[Cell] {
        &self.cells
    }

    pub fn families(&self) -> &[Family] {
        &self.families
    }

    pub fn family(&self, id: FamilyId) -> Option<&Family> {
        self.families.get(id.raw())
    }

    pub fn harvester(&self, id: HarvesterId) -> Option<&Harvester> {
        self.family(id.family)
            .and_then(|family| family.harvester(id.number))
    }

    pub fn initialize_biomass_with_matrix(&mut self, matrix: &[Biomass]) -> Result<()> {
        if matrix.len() != self.cells.len() {
            return Err(ModelError::SeedLength {
                expected: self.cells.len(),
                actual: matrix.len(),
            });
        }
        for (cell, &biomass) in self.cells.iter_mut().zip(matrix) {
            cell.set_biomass(biomass);
        }
        Ok(())
    }

    /// Row-major lookup. Panics when the coordinate is outside the grid.
    pub fn cell_at(&self, row: usize, column: usize) -> &Cell {
        &self.cells[self.index_of(row, column)]
    }

    /// Row-major lookup. Panics when the coordinate is outside the grid.
    pub fn cell_at_mut(&mut self, row: usize, column: usize) -> &mut Cell {
        let index = self.index_of(row, column);
        &mut self.cells[index]
    }

    pub fn get_cell(&self, row: usize, column: usize) -> Option<&Cell> {
        self.topology
            .pos_to_index(CellPos::new(row, column))
            .map(|index| &self.cells[index])
    }

    fn index_of(&self, row: usize, column: usize) -> CellIndex {
        match self.topology.pos_to_index(CellPos::new(row, column)) {
            Some(index) => index,
            None => panic!(
                "cell ({row}, {column}) is outside a {}x{} grid",
                self.rows(),
                self.columns()
            ),
        }
    }

    /// Index of the cell currently holding `harvester`, if any.
    pub fn location_of(&self, harvester: HarvesterId) -> Option<CellIndex> {
        self.cells
            .iter()
            .position(|cell| cell.has_harvester(harvester))
    }

    /// Places a harvester at the back of a cell's occupant list, rejecting
    /// unknown harvesters, off-grid cells and harvesters already out.
    pub fn send_harvester(
        &mut self,
        harvester: HarvesterId,
        row: usize,
        column: usize,
    ) -> Result<()> {
        if self.harvester(harvester).is_none() {
            return Err(ModelError::UnknownHarvester(harvester));
        }
        let index = self
            .topology
            .pos_to_index(CellPos::new(row, column))
            .ok_or(ModelError::CellOutOfBounds {
                row,
                column,
                rows: self.rows(),
                columns: self.columns(),
            })?;
        if let Some(cell) = self.location_of(harvester) {
            return Err(ModelError::AlreadyPlaced { harvester, cell });
        }
        self.cells[index].add_harvester(harvester);
        trace!(%harvester, row, column, "harvester placed");
        Ok(())
    }

    pub fn step(&mut self) {
        self.step_cells(0..self.cells.len());
    }

    // Neighbour occupancy is captured before any cell moves, so the visiting
    // order does not change the outcome.
    fn step_cells(&mut self, order: impl IntoIterator<Item = CellIndex>) {
        let occupied: Vec<bool> = self.cells.iter().map(Cell::has_harvesters).collect();
        let mut collected = 0_u32;

        for index in order {
            for harvest in self.cells[index].step(&occupied) {
                collected += u32::from(harvest.biomass);
                match self
                    .families
                    .get_mut(harvest.harvester.family.raw())
                    .and_then(|family| family.harvester_mut(harvest.harvester.number))
                {
                    Some(harvester) => harvester.harvested_biomass = harvest.biomass,
                    None => warn!(
                        harvester = %harvest.harvester,
                        cell = index,
                        biomass = harvest.biomass,
                        "harvest for a harvester outside every family discarded"
                    ),
                }
            }
        }

        self.tick += 1;
        debug!(
            tick = self.tick,
            collected,
            total_biomass = self.total_biomass(),
            "model stepped"
        );
    }

    /// Empties every cell. Harvesters keep their last recorded take.
    pub fn bring_all_harvesters_home(&mut self) {
        for cell in &mut self.cells {
            cell.remove_harvesters();
        }
    }

    pub fn total_biomass(&self) -> u32 {
        self.cells.iter().map(|cell| u32::from(cell.biomass())).sum()
    }

    pub fn biomass_map(&self) -> Vec<Biomass> {
        self.cells.iter().map(Cell::biomass).collect()
    }

    pub fn bird_map(&self) -> Vec<u8> {
        self.cells.iter().map(Cell::number_of_birds).collect()
    }

    pub fn occupancy_map(&self) -> Vec<usize> {
        self.cells.iter().map(|cell| cell.harvesters().len()).collect()
    }

    pub fn protected_area_map(&self) -> Vec<bool> {
        self.cells.iter().map(Cell::is_protected_area).collect()
    }
}
