//! Strategies that decide where harvesters go before each step.

mod random;
mod scripted;

use anyhow::Result;

pub use random::RandomPlacement;
pub use scripted::{FamilyPlan, ScriptedPlacement};

use crate::{model::Model, rng::PolicyRng};

pub struct PlacementContext<'a> {
    pub round: usize,
    pub step: usize,
    pub tick: u64,
    pub scenario_name: &'a str,
}

pub trait PlacementPolicy {
    fn name(&self) -> &str;
    fn place(
        &mut self,
        ctx: &PlacementContext,
        model: &mut Model,
        rng: &mut PolicyRng<'_>,
    ) -> Result<()>;
}
