//! Docking tiles around mineral deposits.

use room_planner_core::{MineralPlan, PlanError, RoomHost};

use crate::{features::docking_candidates, geometry::ring_expand, PlanBuilder};

pub(crate) fn plan_minerals<H: RoomHost>(host: &H, plan: &mut PlanBuilder) -> Result<(), PlanError> {
    for mineral in host.minerals() {
        let rings = ring_expand(host, mineral.position, 2);
        let docking = docking_candidates(host, plan, &rings[0]);
        if docking.is_empty() {
            log::warn!("mineral {} at {} has no free docking tile", mineral.id, mineral.position);
        } else if docking.len() < rings[0].len() {
            log::debug!(
                "mineral {}: {} of {} neighbours already taken",
                mineral.id,
                rings[0].len() - docking.len(),
                rings[0].len()
            );
        }
        plan.push_mineral(MineralPlan {
            id: mineral.id,
            position: mineral.position,
            docking,
        });
        plan.reserve(&rings[1]);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::exits::plan_exits;
    use room_planner_core::{FeatureId, FeaturePlan, GridSize, Tile};
    use room_planner_world::{ExitSide, RoomSnapshot};

    #[test]
    fn minerals_dock_on_the_first_ring_and_reserve_the_second() {
        let host = RoomSnapshot::open(GridSize::new(11)).with_mineral("H", Tile::new(8, 1));
        let mut plan = PlanBuilder::default();
        plan_minerals(&host, &mut plan).expect("minerals never fail");

        let mineral = &plan.minerals()[0];
        assert_eq!(mineral.docking.len(), 8);
        assert!(mineral
            .docking
            .iter()
            .all(|tile| tile.chebyshev_distance(Tile::new(8, 1)) == 1));
        assert_eq!(plan.reserved().len(), 11, "ring two is clipped by the edge");
        assert!(plan
            .reserved()
            .iter()
            .all(|tile| tile.chebyshev_distance(Tile::new(8, 1)) == 2));
    }

    #[test]
    fn docking_skips_walls_and_tiles_held_by_other_features() {
        let host = RoomSnapshot::open(GridSize::new(11))
            .with_exit(ExitSide::Top, "W1N2")
            .with_mineral("H", Tile::new(5, 3))
            .with_source("src", Tile::new(7, 4));
        let mut plan = PlanBuilder::default();
        plan_exits(&host, &mut plan).expect("exits never fail");
        plan.push_source(FeaturePlan {
            id: FeatureId::new("src"),
            position: Tile::new(7, 4),
            docking: Tile::new(6, 4),
            other_docking: vec![Tile::new(6, 3)],
            link: Tile::new(8, 6),
        });
        plan_minerals(&host, &mut plan).expect("minerals never fail");

        let docking = &plan.minerals()[0].docking;
        assert_eq!(
            docking,
            &vec![Tile::new(5, 4), Tile::new(4, 4), Tile::new(4, 3)]
        );
        assert!(docking.iter().all(|tile| !plan.walls().contains(tile)));
        assert!(plan.reserved_conflicts().is_empty());
    }

    #[test]
    fn neighbouring_minerals_do_not_share_docking_tiles() {
        let host = RoomSnapshot::open(GridSize::new(11))
            .with_mineral("H", Tile::new(3, 5))
            .with_mineral("O", Tile::new(4, 5));
        let mut plan = PlanBuilder::default();
        plan_minerals(&host, &mut plan).expect("minerals never fail");

        let (first, second) = (&plan.minerals()[0], &plan.minerals()[1]);
        assert_eq!(first.docking.len(), 7, "the second deposit is not a dock");
        assert!(second
            .docking
            .iter()
            .all(|tile| !first.docking.contains(tile)));
        assert_eq!(
            second.docking,
            vec![Tile::new(5, 4), Tile::new(5, 5), Tile::new(5, 6)]
        );
    }

    #[test]
    fn rooms_without_minerals_add_nothing() {
        let host = RoomSnapshot::open(GridSize::new(11));
        let mut plan = PlanBuilder::default();
        plan_minerals(&host, &mut plan).expect("minerals never fail");
        assert_eq!(plan, PlanBuilder::default());
    }
}
