//! Game session driver: rounds of steps around a model.

use anyhow::{bail, Result};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::{
    config::SessionConfig,
    family::{FamilyId, HarvesterId},
    model::Model,
    placement::{PlacementContext, PlacementPolicy},
    report::{SessionSummary, TickReport},
    rng::RngManager,
};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrganizationInfo {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub type_of_business: String,
    #[serde(default = "default_is_public")]
    pub is_public: bool,
    #[serde(default)]
    pub description: String,
}

fn default_is_public() -> bool {
    true
}

impl Default for OrganizationInfo {
    fn default() -> Self {
        Self {
            name: String::new(),
            type_of_business: String::new(),
            is_public: default_is_public(),
            description: String::new(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Player {
    pub name: String,
    #[serde(default)]
    pub family: Option<FamilyId>,
    #[serde(default)]
    pub park_manager: bool,
}

impl Player {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            family: None,
            park_manager: false,
        }
    }

    pub fn with_family(mut self, family: FamilyId) -> Self {
        self.family = Some(family);
        self
    }

    pub fn make_park_manager(&mut self) {
        self.park_manager = true;
    }

    pub fn is_park_manager(&self) -> bool {
        self.park_manager
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Round {
    number: usize,
    steps_per_round: usize,
    steps: Vec<u64>,
}

impl Round {
    fn new(number: usize, steps_per_round: usize) -> Self {
        Self {
            number,
            steps_per_round,
            steps: Vec::with_capacity(steps_per_round),
        }
    }

    pub fn number(&self) -> usize {
        self.number
    }

    /// Model ticks played in this round.
    pub fn steps(&self) -> &[u64] {
        &self.steps
    }

    pub fn is_final_step(&self) -> bool {
        self.steps.len() >= self.steps_per_round
    }
}

pub struct SessionSettings {
    pub scenario_name: String,
    pub seed: u64,
    pub session: SessionConfig,
}

pub struct SessionBuilder {
    settings: SessionSettings,
    policies: Vec<Box<dyn PlacementPolicy>>,
    players: Vec<Player>,
    organization: OrganizationInfo,
}

impl SessionBuilder {
    pub fn new(settings: SessionSettings) -> Self {
        Self {
            settings,
            policies: Vec::new(),
            players: Vec::new(),
            organization: OrganizationInfo::default(),
        }
    }

    pub fn with_policy(mut self, policy: impl PlacementPolicy + 'static) -> Self {
        self.policies.push(Box::new(policy));
        self
    }

    pub fn push_policy(&mut self, policy: Box<dyn PlacementPolicy>) {
        self.policies.push(policy);
    }

    pub fn with_player(mut self, player: Player) -> Self {
        self.players.push(player);
        self
    }

    pub fn with_organization(mut self, organization: OrganizationInfo) -> Self {
        self.organization = organization;
        self
    }

    pub fn build(self) -> Session {
        Session {
            rng: RngManager::new(self.settings.seed),
            policies: self.policies,
            players: self.players,
            organization: self.organization,
            rounds: Vec::new(),
            scores: Vec::new(),
            settings: self.settings,
        }
    }
}

pub struct Session {
    rng: RngManager,
    policies: Vec<Box<dyn PlacementPolicy>>,
    players: Vec<Player>,
    organization: OrganizationInfo,
    rounds: Vec<Round>,
    scores: Vec<u32>,
    settings: SessionSettings,
}

impl Session {
    pub fn scenario_name(&self) -> &str {
        &self.settings.scenario_name
    }

    pub fn players(&self) -> &[Player] {
        &self.players
    }

    pub fn players_mut(&mut self) -> &mut [Player] {
        &mut self.players
    }

    pub fn add_player(&mut self, name: impl Into<String>) {
        self.players.push(Player::new(name));
    }

    pub fn organization(&self) -> &OrganizationInfo {
        &self.organization
    }

    pub fn rounds(&self) -> &[Round] {
        &self.rounds
    }

    /// The round in progress, i.e. the most recently opened one.
    pub fn current_round(&self) -> Option<&Round> {
        self.rounds.last()
    }

    pub fn is_final_round(&self) -> bool {
        self.rounds.len() >= self.settings.session.rounds
    }

    /// Cumulative take per family over the whole session.
    pub fn scores(&self) -> &[u32] {
        &self.scores
    }

    pub fn next_round(&mut self) -> Result<()> {
        if self.is_final_round() {
            bail!(
                "session already played all {} rounds",
                self.settings.session.rounds
            );
        }
        let number = self.rounds.len() + 1;
        self.rounds
            .push(Round::new(number, self.settings.session.steps_per_round));
        info!(round = number, "round started");
        Ok(())
    }

    /// Places harvesters, steps the model, scores the tick and recalls
    /// everyone. Opens the first round if none is open yet.
    pub fn next_step(&mut self, model: &mut Model) -> Result<TickReport> {
        if self.rounds.is_empty() {
            self.next_round()?;
        }
        let (round, step) = match self.rounds.last() {
            Some(round) if !round.is_final_step() => (round.number(), round.steps().len() + 1),
            Some(round) => bail!("round {} already played all its steps", round.number()),
            None => bail!("no round in progress"),
        };

        let ctx = PlacementContext {
            round,
            step,
            tick: model.tick(),
            scenario_name: &self.settings.scenario_name,
        };
        for policy in &mut self.policies {
            let mut rng_stream = self.rng.stream(policy.name());
            if let Err(err) = policy.place(&ctx, model, &mut rng_stream) {
                // A half-placed board would make every retry fail as already placed.
                model.bring_all_harvesters_home();
                return Err(err);
            }
        }

        // Harvesters left home keep a stale take, so only score those out now.
        let placed: Vec<HarvesterId> = model
            .cells()
            .iter()
            .flat_map(|cell| cell.harvesters().iter().copied())
            .collect();
        model.step();

        let mut harvested = vec![0_u32; model.families().len()];
        for id in placed {
            if let Some(harvester) = model.harvester(id) {
                harvested[id.family.raw()] += u32::from(harvester.harvested_biomass());
            }
        }
        if self.scores.len() < harvested.len() {
            self.scores.resize(harvested.len(), 0);
        }
        for (score, take) in self.scores.iter_mut().zip(&harvested) {
            *score += take;
        }

        let report = TickReport::capture(
            model,
            &self.settings.scenario_name,
            round,
            step,
            &harvested,
            &self.scores,
        );
        model.bring_all_harvesters_home();

        if let Some(current) = self.rounds.last_mut() {
            current.steps.push(model.tick());
        }
        debug!(
            round,
            step,
            tick = report.tick,
            total_biomass = report.total_biomass,
            total_birds = report.total_birds,
            "step played"
        );
        Ok(report)
    }

    pub fn run(&mut self, model: &mut Model) -> Result<SessionSummary> {
        self.run_with_hook(model, |_| {})
    }

    /// Plays every remaining round to completion, calling `hook` after each
    /// step with the tick's report.
    pub fn run_with_hook<F>(&mut self, model: &mut Model, mut hook: F) -> Result<SessionSummary>
    where
        F: FnMut(&TickReport),
    {
        loop {
            let round_done = self
                .current_round()
                .map_or(true, Round::is_final_step);
            if round_done {
                if self.is_final_round() {
                    break;
                }
                self.next_round()?;
            }
            let report = self.next_step(model)?;
            hook(&report);
            if self.current_round().map_or(false, Round::is_final_step) {
                info!(
                    round = report.round,
                    total_biomass = report.total_biomass,
                    total_birds = report.total_birds,
                    scores = ?self.scores,
                    "round finished"
                );
            }
        }

        Ok(self.summary(model))
    }

    pub fn summary(&self, model: &Model) -> SessionSummary {
        SessionSummary {
            scenario: self.settings.scenario_name.clone(),
            ticks: model.tick(),
            final_biomass: model.total_biomass(),
            final_birds: model.bird_map().iter().map(|&b| u32::from(b)).sum(),
            scores: self.scores.clone(),
        }
    }
}
