use thiserror::Error;

use crate::family::HarvesterId;

pub type Result<T> = std::result::Result<T, ModelError>;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ModelError {
    #[error("biomass seed has {actual} values, grid has {expected} cells")]
    SeedLength { expected: usize, actual: usize },

    #[error("cell ({row}, {column}) is outside a {rows}x{columns} grid")]
    CellOutOfBounds {
        row: usize,
        column: usize,
        rows: usize,
        columns: usize,
    },

    #[error("harvester {0} does not exist")]
    UnknownHarvester(HarvesterId),

    #[error("harvester {harvester} is already on cell {cell}")]
    AlreadyPlaced { harvester: HarvesterId, cell: usize },
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    #[error("{0} must be greater than zero")]
    Zero(&'static str),
}
