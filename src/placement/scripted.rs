use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::{
    family::HarvesterId,
    model::Model,
    placement::{PlacementContext, PlacementPolicy},
    rng::PolicyRng,
    topology::CellPos,
};

/// Where one family sends its harvesters: harvester `n` goes to `cells[n - 1]`.
/// Harvesters past the end of the list stay home.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FamilyPlan {
    pub family: usize,
    pub cells: Vec<CellPos>,
}

pub struct ScriptedPlacement {
    plans: Vec<FamilyPlan>,
}

impl ScriptedPlacement {
    pub fn new(plans: Vec<FamilyPlan>) -> Self {
        Self { plans }
    }
}

impl PlacementPolicy for ScriptedPlacement {
    fn name(&self) -> &str {
        "scripted"
    }

    fn place(
        &mut self,
        ctx: &PlacementContext,
        model: &mut Model,
        _rng: &mut PolicyRng<'_>,
    ) -> Result<()> {
        for plan in &self.plans {
            for (offset, pos) in plan.cells.iter().enumerate() {
                let harvester = HarvesterId::new(plan.family, offset + 1);
                model
                    .send_harvester(harvester, pos.row, pos.column)
                    .with_context(|| {
                        format!(
                            "scripted placement failed in round {} step {}",
                            ctx.round, ctx.step
                        )
                    })?;
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rng::RngManager;

    fn ctx() -> PlacementContext<'static> {
        PlacementContext {
            round: 1,
            step: 1,
            tick: 0,
            scenario_name: "test",
        }
    }

    #[test]
    fn test_plans_are_applied_in_order() {
        let mut model = Model::default();
        let mut rng = RngManager::new(1);
        let mut policy = ScriptedPlacement::new(vec![
            FamilyPlan {
                family: 1,
                cells: vec![CellPos::new(1, 3)],
            },
            FamilyPlan {
                family: 0,
                cells: vec![CellPos::new(0, 0), CellPos::new(1, 3)],
            },
        ]);

        policy
            .place(&ctx(), &mut model, &mut rng.stream("scripted"))
            .unwrap();

        assert_eq!(
            model.cell_at(1, 3).harvesters(),
            &[HarvesterId::new(1, 1), HarvesterId::new(0, 2)]
        );
        assert_eq!(model.cell_at(0, 0).harvesters(), &[HarvesterId::new(0, 1)]);
    }

    #[test]
    fn test_bad_plan_reports_error() {
        let mut model = Model::default();
        let mut rng = RngManager::new(1);
        let mut policy = ScriptedPlacement::new(vec![FamilyPlan {
            family: 0,
            cells: vec![CellPos::new(10, 0)],
        }]);

        let err = policy
            .place(&ctx(), &mut model, &mut rng.stream("scripted"))
            .unwrap_err();
        assert!(err.to_string().contains("round 1 step 1"));
    }
}
