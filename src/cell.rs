//! A single grid cell and its per-tick update rule.

use crate::family::HarvesterId;
use crate::topology::CellIndex;

pub type Biomass = u8;

pub const MAX_BIOMASS: Biomass = 3;
/// Most a lone harvester can take in one tick.
pub const MAX_TAKE_PER_HARVESTER: Biomass = 2;
/// Cells below this stock never host birds.
pub const MIN_BIOMASS_FOR_BIRDS: Biomass = 2;

/// Biomass assigned to one occupant during a cell step.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Harvest {
    pub harvester: HarvesterId,
    pub biomass: Biomass,
}

#[derive(Debug, Clone, Default)]
pub struct Cell {
    biomass: Biomass,
    harvesters: Vec<HarvesterId>,
    number_of_birds: u8,
    unexploited_counter: u32,
    is_protected_area: bool,
    neighbours: Vec<CellIndex>,
}

impl Cell {
    /// A cell without neighbours, as used outside a model.
    pub fn new() -> Self {
        Self::default()
    }

    pub(crate) fn with_neighbours(neighbours: Vec<CellIndex>) -> Self {
        Self {
            neighbours,
            ..Self::default()
        }
    }

    pub fn biomass(&self) -> Biomass {
        self.biomass
    }

    /// Seeds the stock. No range check: only `step` keeps biomass in bounds.
    pub fn set_biomass(&mut self, biomass: Biomass) {
        self.biomass = biomass;
    }

    pub fn number_of_birds(&self) -> u8 {
        self.number_of_birds
    }

    pub fn unexploited_counter(&self) -> u32 {
        self.unexploited_counter
    }

    pub fn neighbours(&self) -> &[CellIndex] {
        &self.neighbours
    }

    /// Occupants in arrival order.
    pub fn harvesters(&self) -> &[HarvesterId] {
        &self.harvesters
    }

    pub fn has_harvesters(&self) -> bool {
        !self.harvesters.is_empty()
    }

    pub fn has_harvester(&self, harvester: HarvesterId) -> bool {
        self.harvesters.contains(&harvester)
    }

    pub(crate) fn add_harvester(&mut self, harvester: HarvesterId) {
        self.harvesters.push(harvester);
    }

    pub fn remove_harvesters(&mut self) {
        self.harvesters.clear();
    }

    pub fn is_protected_area(&self) -> bool {
        self.is_protected_area
    }

    pub fn make_protected_area(&mut self) {
        self.is_protected_area = true;
    }

    /// Advances this cell by one tick.
    ///
    /// `occupied` is the step-start occupancy of every cell in the grid,
    /// indexed like the neighbour list. Only this cell's own state changes;
    /// the returned harvests are what each occupant collected this tick.
    /// Cells missing from `occupied` count as unoccupied.
    pub(crate) fn step(&mut self, occupied: &[bool]) -> Vec<Harvest> {
        // Seeds are unchecked, so pull the stock into range before any rule reads it.
        self.biomass = self.biomass.min(MAX_BIOMASS);
        self.update_unexploited_counter();
        self.breed_birds(occupied);
        self.distribute_harvest_and_regenerate()
    }

    fn update_unexploited_counter(&mut self) {
        if self.has_harvesters() {
            self.unexploited_counter = 0;
        } else {
            self.unexploited_counter = self.unexploited_counter.saturating_add(1);
        }
    }

    fn breed_birds(&mut self, occupied: &[bool]) {
        if self.has_harvesters() || self.biomass < MIN_BIOMASS_FOR_BIRDS || self.neighbours.is_empty()
        {
            self.number_of_birds = 0;
            return;
        }

        let total = self.neighbours.len();
        let unoccupied = self
            .neighbours
            .iter()
            .filter(|&&index| !occupied.get(index).copied().unwrap_or(false))
            .count();

        // unoccupied / total >= 0.8 and > 0.5, kept in integers so the
        // boundaries are exact.
        self.number_of_birds = if unoccupied * 5 >= total * 4 {
            2
        } else if unoccupied * 2 > total {
            1
        } else {
            0
        };
    }

    fn distribute_harvest_and_regenerate(&mut self) -> Vec<Harvest> {
        match self.harvesters.len() {
            0 => {
                match self.unexploited_counter {
                    1 if self.biomass < MAX_BIOMASS => self.biomass += 1,
                    counter if counter > 2 && self.biomass > 0 => self.biomass -= 1,
                    _ => {}
                }
                Vec::new()
            }
            1 => {
                // The lone take regrows within the tick, stock is unchanged.
                vec![Harvest {
                    harvester: self.harvesters[0],
                    biomass: self.biomass.min(MAX_TAKE_PER_HARVESTER),
                }]
            }
            count => {
                let shares: [Biomass; 2] = if self.biomass == MAX_BIOMASS {
                    [2, 1]
                } else {
                    [self.biomass, 0]
                };
                self.biomass = if self.biomass == MAX_BIOMASS && count == 2 {
                    1
                } else {
                    0
                };
                self.harvesters
                    .iter()
                    .enumerate()
                    .map(|(position, &harvester)| Harvest {
                        harvester,
                        biomass: shares.get(position).copied().unwrap_or(0),
                    })
                    .collect()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn harvest_from_cell(harvesters: usize, biomass: Biomass) -> (Vec<Biomass>, Biomass) {
        let mut cell = Cell::new();
        cell.set_biomass(biomass);
        for number in 1..=harvesters {
            cell.add_harvester(HarvesterId::new(0, number));
        }
        let harvest = cell.step(&[]);
        (harvest.iter().map(|h| h.biomass).collect(), cell.biomass())
    }

    #[test]
    fn test_single_harvester_takes_at_most_two() {
        assert_eq!(harvest_from_cell(1, 0), (vec![0], 0));
        assert_eq!(harvest_from_cell(1, 1), (vec![1], 1));
        assert_eq!(harvest_from_cell(1, 2), (vec![2], 2));
        assert_eq!(harvest_from_cell(1, 3), (vec![2], 3));
    }

    #[test]
    fn test_two_harvesters() {
        assert_eq!(harvest_from_cell(2, 0), (vec![0, 0], 0));
        assert_eq!(harvest_from_cell(2, 1), (vec![1, 0], 0));
        assert_eq!(harvest_from_cell(2, 2), (vec![2, 0], 0));
        assert_eq!(harvest_from_cell(2, 3), (vec![2, 1], 1));
    }

    #[test]
    fn test_three_and_four_harvesters() {
        assert_eq!(harvest_from_cell(3, 1), (vec![1, 0, 0], 0));
        assert_eq!(harvest_from_cell(3, 2), (vec![2, 0, 0], 0));
        assert_eq!(harvest_from_cell(3, 3), (vec![2, 1, 0], 0));
        assert_eq!(harvest_from_cell(4, 0), (vec![0, 0, 0, 0], 0));
        assert_eq!(harvest_from_cell(4, 3), (vec![2, 1, 0, 0], 0));
    }

    #[test]
    fn test_harvest_follows_arrival_order() {
        let mut cell = Cell::new();
        cell.set_biomass(3);
        cell.add_harvester(HarvesterId::new(4, 1));
        cell.add_harvester(HarvesterId::new(1, 3));

        let harvest = cell.step(&[]);
        assert_eq!(
            harvest,
            vec![
                Harvest {
                    harvester: HarvesterId::new(4, 1),
                    biomass: 2
                },
                Harvest {
                    harvester: HarvesterId::new(1, 3),
                    biomass: 1
                },
            ]
        );
    }

    #[test]
    fn test_unoccupied_schedule_grows_holds_then_decays() {
        let mut cell = Cell::new();
        cell.set_biomass(1);

        let mut history = Vec::new();
        for _ in 0..5 {
            cell.step(&[]);
            history.push((cell.unexploited_counter(), cell.biomass()));
        }

        assert_eq!(history, vec![(1, 2), (2, 2), (3, 1), (4, 0), (5, 0)]);
    }

    #[test]
    fn test_regrowth_is_capped() {
        let mut cell = Cell::new();
        cell.set_biomass(MAX_BIOMASS);
        cell.step(&[]);
        assert_eq!(cell.biomass(), MAX_BIOMASS);
    }

    #[test]
    fn test_occupation_resets_counter() {
        let mut cell = Cell::new();
        cell.step(&[]);
        cell.step(&[]);
        assert_eq!(cell.unexploited_counter(), 2);

        cell.add_harvester(HarvesterId::new(0, 1));
        cell.step(&[]);
        assert_eq!(cell.unexploited_counter(), 0);

        cell.remove_harvesters();
        cell.set_biomass(0);
        cell.step(&[]);
        assert_eq!(cell.unexploited_counter(), 1);
        assert_eq!(cell.biomass(), 1);
    }

    fn birds_with(unoccupied: usize, total: usize, biomass: Biomass) -> u8 {
        let occupied: Vec<bool> = (0..total).map(|i| i >= unoccupied).collect();
        let mut cell = Cell::with_neighbours((0..total).collect());
        cell.set_biomass(biomass);
        cell.step(&occupied);
        cell.number_of_birds()
    }

    #[test]
    fn test_bird_thresholds() {
        assert_eq!(birds_with(8, 8, 2), 2);
        assert_eq!(birds_with(7, 8, 2), 2);
        assert_eq!(birds_with(4, 5, 2), 2); // exactly 0.8
        assert_eq!(birds_with(3, 5, 2), 1);
        assert_eq!(birds_with(5, 8, 2), 1);
        assert_eq!(birds_with(4, 8, 2), 0); // exactly 0.5
        assert_eq!(birds_with(1, 3, 3), 0);
        assert_eq!(birds_with(2, 3, 3), 1);
    }

    #[test]
    fn test_no_birds_on_poor_or_occupied_cells() {
        assert_eq!(birds_with(8, 8, 1), 0);

        let mut cell = Cell::with_neighbours(vec![0, 1, 2]);
        cell.set_biomass(3);
        cell.add_harvester(HarvesterId::new(0, 1));
        cell.step(&[false, false, false]);
        assert_eq!(cell.number_of_birds(), 0);
    }

    #[test]
    fn test_oversized_seed_is_clamped_before_rules_apply() {
        let mut idle = Cell::new();
        idle.set_biomass(7);
        idle.step(&[]);
        assert_eq!(idle.biomass(), MAX_BIOMASS);

        assert_eq!(harvest_from_cell(1, 9), (vec![2], MAX_BIOMASS));
        assert_eq!(harvest_from_cell(2, 7), (vec![2, 1], 1));
        assert_eq!(harvest_from_cell(3, 200), (vec![2, 1, 0], 0));
    }

    #[test]
    fn test_short_occupancy_snapshot_counts_as_unoccupied() {
        let mut cell = Cell::with_neighbours(vec![0, 1, 2, 3, 4]);
        cell.set_biomass(2);
        cell.step(&[true]);
        // 4 of 5 neighbours free.
        assert_eq!(cell.number_of_birds(), 2);

        let mut bare = Cell::with_neighbours(vec![3, 4, 5]);
        bare.set_biomass(3);
        bare.step(&[]);
        assert_eq!(bare.number_of_birds(), 2);
    }

    #[test]
    fn test_protected_area_flag_is_inert() {
        let mut cell = Cell::new();
        assert!(!cell.is_protected_area());
        cell.make_protected_area();
        assert!(cell.is_protected_area());

        cell.set_biomass(2);
        cell.add_harvester(HarvesterId::new(0, 1));
        let harvest = cell.step(&[]);
        assert_eq!(harvest[0].biomass, 2);
    }
}
