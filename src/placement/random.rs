use anyhow::Result;
use rand::{seq::SliceRandom, Rng};
use tracing::trace;

use crate::{
    family::FamilyId,
    model::Model,
    placement::{PlacementContext, PlacementPolicy},
    rng::PolicyRng,
};

/// Sends every harvester still at home to a uniformly chosen cell. Family
/// order is reshuffled each step so no family always arrives first.
pub struct RandomPlacement {
    stay_home: f64,
}

impl RandomPlacement {
    /// `stay_home` is the chance a harvester sits the step out, clamped to [0, 1].
    pub fn new(stay_home: f64) -> Self {
        Self {
            stay_home: stay_home.clamp(0.0, 1.0),
        }
    }
}

impl Default for RandomPlacement {
    fn default() -> Self {
        Self::new(0.0)
    }
}

impl PlacementPolicy for RandomPlacement {
    fn name(&self) -> &str {
        "random"
    }

    fn place(
        &mut self,
        ctx: &PlacementContext,
        model: &mut Model,
        rng: &mut PolicyRng<'_>,
    ) -> Result<()> {
        let rows = model.rows();
        let columns = model.columns();
        let mut families: Vec<FamilyId> = model.families().iter().map(|f| f.id()).collect();
        families.shuffle(rng);

        for family in families {
            let harvesters: Vec<_> = model
                .family(family)
                .map(|f| f.harvesters().iter().map(|h| h.id()).collect())
                .unwrap_or_default();
            for harvester in harvesters {
                if model.location_of(harvester).is_some() {
                    continue;
                }
                if rng.gen::<f64>() < self.stay_home {
                    continue;
                }
                let row = rng.gen_range(0..rows);
                let column = rng.gen_range(0..columns);
                model.send_harvester(harvester, row, column)?;
                trace!(tick = ctx.tick, %harvester, row, column, "random placement");
            }
        }
        Ok(())
    }
}
