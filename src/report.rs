use serde::{Deserialize, Serialize};

use crate::cell::Biomass;
use crate::model::Model;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CellReport {
    pub row: usize,
    pub column: usize,
    pub biomass: Biomass,
    pub birds: u8,
    pub harvesters: usize,
    pub unexploited_for: u32,
    pub protected: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FamilyReport {
    pub family: usize,
    pub harvested: u32,
    pub cumulative: u32,
}

/// State of the grid right after a step, before harvesters are recalled.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TickReport {
    pub scenario: String,
    pub tick: u64,
    pub round: usize,
    pub step: usize,
    pub total_biomass: u32,
    pub total_birds: u32,
    pub cells: Vec<CellReport>,
    pub families: Vec<FamilyReport>,
}

impl TickReport {
    /// Captures the model. `harvested` is each family's take this tick and
    /// `cumulative` the running score, already including this tick.
    pub fn capture(
        model: &Model,
        scenario: &str,
        round: usize,
        step: usize,
        harvested: &[u32],
        cumulative: &[u32],
    ) -> Self {
        let topology = model.topology();
        let cells = model
            .cells()
            .iter()
            .zip((0..topology.cell_count()).filter_map(|index| topology.index_to_pos(index)))
            .map(|(cell, pos)| CellReport {
                row: pos.row,
                column: pos.column,
                biomass: cell.biomass(),
                birds: cell.number_of_birds(),
                harvesters: cell.harvesters().len(),
                unexploited_for: cell.unexploited_counter(),
                protected: cell.is_protected_area(),
            })
            .collect::<Vec<_>>();
        let families = model
            .families()
            .iter()
            .map(|family| FamilyReport {
                family: family.id().raw(),
                harvested: harvested.get(family.id().raw()).copied().unwrap_or(0),
                cumulative: cumulative.get(family.id().raw()).copied().unwrap_or(0),
            })
            .collect();
        Self {
            scenario: scenario.to_string(),
            tick: model.tick(),
            round,
            step,
            total_biomass: model.total_biomass(),
            total_birds: cells.iter().map(|c| u32::from(c.birds)).sum(),
            cells,
            families,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionSummary {
    pub scenario: String,
    pub ticks: u64,
    pub final_biomass: u32,
    pub final_birds: u32,
    pub scores: Vec<u32>,
}

impl SessionSummary {
    /// Families with the highest cumulative take, lowest id first.
    pub fn leaders(&self) -> Vec<usize> {
        let best = self.scores.iter().copied().max().unwrap_or(0);
        self.scores
            .iter()
            .enumerate()
            .filter(|(_, &score)| score == best)
            .map(|(family, _)| family)
            .collect()
    }
}
