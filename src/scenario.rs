use std::{
    fs,
    path::{Path, PathBuf},
};

use anyhow::{ensure, Context, Result};
use serde::Deserialize;

use crate::{
    cell::Biomass,
    config::{LoggingConfig, ModelConfig, SessionConfig},
    model::Model,
    placement::{FamilyPlan, RandomPlacement, ScriptedPlacement},
    session::{OrganizationInfo, Player, SessionBuilder, SessionSettings},
    topology::CellPos,
};

fn default_seed() -> u64 {
    7
}

/// Starting stock of the classroom board.
pub const REFERENCE_BIOMASS: [Biomass; 20] = [
    1, 1, 2, 1, 1, //
    2, 0, 2, 3, 2, //
    1, 3, 1, 2, 1, //
    1, 3, 1, 0, 2,
];

#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum PlacementConfig {
    Scripted { families: Vec<FamilyPlan> },
    Random {
        #[serde(default)]
        stay_home: f64,
    },
}

#[derive(Debug, Clone, Deserialize)]
pub struct Scenario {
    pub name: String,
    pub description: Option<String>,
    #[serde(default = "default_seed")]
    pub seed: u64,
    #[serde(default)]
    pub model: ModelConfig,
    #[serde(default)]
    pub session: SessionConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
    /// Row-major starting stock; empty leaves every cell at zero.
    #[serde(default)]
    pub biomass: Vec<Biomass>,
    #[serde(default)]
    pub protected_areas: Vec<CellPos>,
    #[serde(default)]
    pub players: Vec<Player>,
    #[serde(default)]
    pub organization: OrganizationInfo,
    #[serde(default)]
    pub placement: Vec<PlacementConfig>,
}

pub struct ScenarioLoader {
    base_dir: PathBuf,
}

impl ScenarioLoader {
    pub fn new(base_dir: impl AsRef<Path>) -> Self {
        Self {
            base_dir: base_dir.as_ref().to_path_buf(),
        }
    }

    pub fn load(&self, file: impl AsRef<Path>) -> Result<Scenario> {
        let path = self.base_dir.join(file);
        let data = fs::read_to_string(&path)
            .with_context(|| format!("Failed to read scenario file {}", path.display()))?;
        let scenario: Scenario = serde_yaml::from_str(&data)
            .with_context(|| format!("Failed to parse {}", path.display()))?;
        scenario
            .validate()
            .with_context(|| format!("Invalid scenario {}", path.display()))?;
        Ok(scenario)
    }
}

impl Scenario {
    /// The 4x5 board with five families and the reference starting stock.
    pub fn reference() -> Self {
        Self {
            name: "reference".to_string(),
            description: Some("Default board, random placement".to_string()),
            seed: default_seed(),
            model: ModelConfig::default(),
            session: SessionConfig::default(),
            logging: LoggingConfig::default(),
            biomass: REFERENCE_BIOMASS.to_vec(),
            protected_areas: Vec::new(),
            players: Vec::new(),
            organization: OrganizationInfo::default(),
            placement: vec![PlacementConfig::Random { stay_home: 0.25 }],
        }
    }

    pub fn validate(&self) -> Result<()> {
        self.model.validate()?;
        self.session.validate()?;
        ensure!(
            self.biomass.is_empty() || self.biomass.len() == self.model.cell_count(),
            "biomass has {} values, grid has {} cells",
            self.biomass.len(),
            self.model.cell_count()
        );
        for pos in &self.protected_areas {
            ensure!(
                pos.row < self.model.rows && pos.column < self.model.columns,
                "protected area ({}, {}) is outside the grid",
                pos.row,
                pos.column
            );
        }
        for player in &self.players {
            if let Some(family) = player.family {
                ensure!(
                    family.raw() < self.model.families,
                    "player {} belongs to unknown family {}",
                    player.name,
                    family.raw()
                );
            }
        }
        Ok(())
    }

    pub fn build_model(&self) -> Result<Model> {
        let mut model = Model::new(self.model)?;
        if !self.biomass.is_empty() {
            model.initialize_biomass_with_matrix(&self.biomass)?;
        }
        for pos in &self.protected_areas {
            model
                .get_cell(pos.row, pos.column)
                .with_context(|| format!("protected area ({}, {})", pos.row, pos.column))?;
            model.cell_at_mut(pos.row, pos.column).make_protected_area();
        }
        Ok(model)
    }

    pub fn session_builder(&self, session: SessionConfig, seed: u64) -> SessionBuilder {
        let settings = SessionSettings {
            scenario_name: self.name.clone(),
            seed,
            session,
        };
        let mut builder =
            SessionBuilder::new(settings).with_organization(self.organization.clone());
        for player in &self.players {
            builder = builder.with_player(player.clone());
        }
        for placement in &self.placement {
            match placement {
                PlacementConfig::Scripted { families } => {
                    builder.push_policy(Box::new(ScriptedPlacement::new(families.clone())))
                }
                PlacementConfig::Random { stay_home } => {
                    builder.push_policy(Box::new(RandomPlacement::new(*stay_home)))
                }
            }
        }
        builder
    }
}
