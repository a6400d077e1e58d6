//! Harvester tokens and the families that own them.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::cell::{Biomass, Cell};

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct FamilyId(pub usize);

impl FamilyId {
    pub fn raw(self) -> usize {
        self.0
    }
}

/// A harvester is identified by its family and its 1-based number within
/// that family. Numbers repeat across families.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct HarvesterId {
    pub family: FamilyId,
    pub number: usize,
}

impl HarvesterId {
    pub fn new(family: usize, number: usize) -> Self {
        Self {
            family: FamilyId(family),
            number,
        }
    }
}

impl fmt::Display for HarvesterId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}#{}", self.family.0, self.number)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Harvester {
    id: HarvesterId,
    pub(crate) harvested_biomass: Biomass,
}

impl Harvester {
    pub fn new(id: HarvesterId) -> Self {
        Self {
            id,
            harvested_biomass: 0,
        }
    }

    pub fn id(&self) -> HarvesterId {
        self.id
    }

    pub fn family(&self) -> FamilyId {
        self.id.family
    }

    pub fn number(&self) -> usize {
        self.id.number
    }

    /// Biomass collected in the last tick this harvester was stepped on a
    /// cell. Stale once the harvester stays home.
    pub fn harvested_biomass(&self) -> Biomass {
        self.harvested_biomass
    }

    /// Appends this harvester to the cell's occupants. Nothing is removed
    /// from any other cell; use `Model::send_harvester` for checked placement.
    pub fn go_to_cell(&self, cell: &mut Cell) {
        cell.add_harvester(self.id);
    }
}

#[derive(Debug, Clone)]
pub struct Family {
    id: FamilyId,
    harvesters: Vec<Harvester>,
}

impl Family {
    pub fn new(id: FamilyId, size: usize) -> Self {
        let harvesters = (1..=size)
            .map(|number| {
                Harvester::new(HarvesterId {
                    family: id,
                    number,
                })
            })
            .collect();
        Self { id, harvesters }
    }

    pub fn id(&self) -> FamilyId {
        self.id
    }

    pub fn harvesters(&self) -> &[Harvester] {
        &self.harvesters
    }

    /// Harvester by its 1-based number.
    pub fn harvester(&self, number: usize) -> Option<&Harvester> {
        number
            .checked_sub(1)
            .and_then(|index| self.harvesters.get(index))
    }

    pub(crate) fn harvester_mut(&mut self, number: usize) -> Option<&mut Harvester> {
        number
            .checked_sub(1)
            .and_then(|index| self.harvesters.get_mut(index))
    }

    pub fn harvested_biomass(&self) -> u32 {
        self.harvesters
            .iter()
            .map(|harvester| u32::from(harvester.harvested_biomass))
            .sum()
    }
}
