//! Tunables for the grid, the families and the game session.

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

pub const DEFAULT_ROWS: usize = 4;
pub const DEFAULT_COLUMNS: usize = 5;
pub const DEFAULT_FAMILIES: usize = 5;
pub const DEFAULT_HARVESTERS_PER_FAMILY: usize = 4;
pub const DEFAULT_ROUNDS: usize = 2;
pub const DEFAULT_STEPS_PER_ROUND: usize = 5;

fn default_rows() -> usize {
    DEFAULT_ROWS
}

fn default_columns() -> usize {
    DEFAULT_COLUMNS
}

fn default_families() -> usize {
    DEFAULT_FAMILIES
}

fn default_harvesters_per_family() -> usize {
    DEFAULT_HARVESTERS_PER_FAMILY
}

fn default_rounds() -> usize {
    DEFAULT_ROUNDS
}

fn default_steps_per_round() -> usize {
    DEFAULT_STEPS_PER_ROUND
}

fn default_log_level() -> String {
    "info".to_string()
}

/// Shape of a model. Fixed for the lifetime of the model built from it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ModelConfig {
    #[serde(default = "default_rows")]
    pub rows: usize,
    #[serde(default = "default_columns")]
    pub columns: usize,
    #[serde(default = "default_families")]
    pub families: usize,
    #[serde(default = "default_harvesters_per_family")]
    pub harvesters_per_family: usize,
}

impl Default for ModelConfig {
    fn default() -> Self {
        Self {
            rows: DEFAULT_ROWS,
            columns: DEFAULT_COLUMNS,
            families: DEFAULT_FAMILIES,
            harvesters_per_family: DEFAULT_HARVESTERS_PER_FAMILY,
        }
    }
}

impl ModelConfig {
    pub fn new(rows: usize, columns: usize) -> Self {
        Self {
            rows,
            columns,
            ..Self::default()
        }
    }

    pub fn with_families(mut self, families: usize) -> Self {
        self.families = families;
        self
    }

    pub fn with_harvesters_per_family(mut self, harvesters: usize) -> Self {
        self.harvesters_per_family = harvesters;
        self
    }

    pub fn cell_count(&self) -> usize {
        self.rows * self.columns
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.rows == 0 {
            return Err(ConfigError::Zero("rows"));
        }
        if self.columns == 0 {
            return Err(ConfigError::Zero("columns"));
        }
        if self.families == 0 {
            return Err(ConfigError::Zero("families"));
        }
        if self.harvesters_per_family == 0 {
            return Err(ConfigError::Zero("harvesters_per_family"));
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionConfig {
    #[serde(default = "default_rounds")]
    pub rounds: usize,
    #[serde(default = "default_steps_per_round")]
    pub steps_per_round: usize,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            rounds: DEFAULT_ROUNDS,
            steps_per_round: DEFAULT_STEPS_PER_ROUND,
        }
    }
}

impl SessionConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.rounds == 0 {
            return Err(ConfigError::Zero("rounds"));
        }
        if self.steps_per_round == 0 {
            return Err(ConfigError::Zero("steps_per_round"));
        }
        Ok(())
    }

    pub fn total_steps(&self) -> usize {
        self.rounds * self.steps_per_round
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoggingConfig {
    #[serde(default = "default_log_level")]
    pub level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
        }
    }
}
