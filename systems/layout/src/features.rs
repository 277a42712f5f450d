//! Docking and link layouts around the controller and the energy sources.

use room_planner_core::{Feature, FeaturePlan, PlanError, RoomHost, Stage, Tile};

use crate::{
    geometry::{entity_tiles, filter_out, neighbors, ring_expand},
    path::{direct_path, shortest_index},
    PlanBuilder,
};

/// Layout around one feature plus the tiles it holds back.
struct FeatureLayout {
    plan: FeaturePlan,
    reserved: Vec<Tile>,
}

pub(crate) fn plan_controller<H: RoomHost>(
    host: &H,
    plan: &mut PlanBuilder,
) -> Result<(), PlanError> {
    let controller = host.controller().ok_or(PlanError::MissingController)?;
    let layout = layout_feature(host, plan, &controller)?;
    log::debug!(
        "controller {}: dock {}, link {}",
        controller.id,
        layout.plan.docking,
        layout.plan.link
    );
    plan.set_controller(layout.plan);
    plan.reserve(&layout.reserved);
    Ok(())
}

pub(crate) fn plan_sources<H: RoomHost>(host: &H, plan: &mut PlanBuilder) -> Result<(), PlanError> {
    let sources = host.sources();
    if sources.is_empty() {
        return Err(PlanError::NoSources);
    }

    // Later layouts see the claims of earlier ones; commit only once all fit.
    let mut staged = plan.clone();
    for source in &sources {
        let layout = layout_feature(host, &staged, source)?;
        log::debug!(
            "source {}: dock {}, link {}",
            source.id,
            layout.plan.docking,
            layout.plan.link
        );
        staged.push_source(layout.plan);
        staged.reserve(&layout.reserved);
    }
    *plan = staged;
    Ok(())
}

/// Tiles of `ring` a worker may dock on, in ring order.
///
/// Entity tiles and tiles [`PlanBuilder::is_dockable`] rejects are dropped.
pub(crate) fn docking_candidates<H: RoomHost>(
    host: &H,
    plan: &PlanBuilder,
    ring: &[Tile],
) -> Vec<Tile> {
    let entities = entity_tiles(host);
    ring.iter()
        .copied()
        .filter(|tile| !entities.contains(tile) && plan.is_dockable(*tile))
        .collect()
}

/// Places the link, docking tiles and reservations around `feature`.
///
/// The link takes the free second-ring tile closest to the anchor link. The
/// docking tile is a first-ring tile touching the link when one exists.
fn layout_feature<H: RoomHost>(
    host: &H,
    plan: &PlanBuilder,
    feature: &Feature,
) -> Result<FeatureLayout, PlanError> {
    let anchor_link = plan.anchor_link().ok_or(PlanError::Incomplete {
        missing: Stage::Base,
    })?;
    let rings = ring_expand(host, feature.position, 2);
    let (working, transport) = (&rings[0], &rings[1]);
    let entities = entity_tiles(host);

    let candidates: Vec<Tile> = transport
        .iter()
        .copied()
        .filter(|&tile| !plan.is_claimed(tile) && !entities.contains(&tile))
        .collect();
    let paths: Vec<Vec<Tile>> = candidates
        .iter()
        .map(|&tile| direct_path(host, anchor_link, tile))
        .collect();
    let link = shortest_index(&paths)
        .map(|index| candidates[index])
        .ok_or_else(|| PlanError::NoLinkSite {
            feature: feature.id.clone(),
        })?;

    let link_adjacent = neighbors(host, link);
    let working = docking_candidates(host, plan, working);
    let primary: Vec<Tile> = working
        .iter()
        .copied()
        .filter(|tile| link_adjacent.contains(tile))
        .collect();
    let secondary = filter_out(&working, &primary);

    let mut ordered = primary.clone();
    ordered.extend(&secondary);
    let Some((&docking, others)) = ordered.split_first() else {
        return Err(PlanError::NoDockingSite {
            feature: feature.id.clone(),
        });
    };

    let mut reserved = filter_out(transport, &[link]);
    reserved.extend(filter_out(&link_adjacent, &primary));

    Ok(FeatureLayout {
        plan: FeaturePlan {
            id: feature.id.clone(),
            position: feature.position,
            docking,
            other_docking: others.to_vec(),
            link,
        },
        reserved,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::base::plan_base;
    use room_planner_core::{FeatureId, GridSize};
    use room_planner_world::RoomSnapshot;

    fn room() -> RoomSnapshot {
        RoomSnapshot::open(GridSize::new(11))
            .with_spawn("Spawn1", Tile::new(5, 6))
            .with_source("src", Tile::new(2, 2))
            .with_controller("ctrl", Tile::new(8, 8))
    }

    fn with_base(host: &RoomSnapshot) -> PlanBuilder {
        let mut plan = PlanBuilder::default();
        plan_base(host, &mut plan).expect("base fits");
        plan
    }

    #[test]
    fn controller_link_is_the_free_tile_nearest_the_anchor_link() {
        let host = room();
        let mut plan = with_base(&host);
        plan_controller(&host, &mut plan).expect("controller fits");

        let controller = plan.controller().expect("controller placed");
        assert_eq!(controller.link, Tile::new(8, 6));
        assert_eq!(controller.docking, Tile::new(8, 7));
        assert_eq!(plan.links(), &[Tile::new(5, 4), Tile::new(8, 6)]);
    }

    #[test]
    fn docking_tile_touches_both_feature_and_link() {
        let host = room();
        let mut plan = with_base(&host);
        plan_controller(&host, &mut plan).expect("controller fits");
        plan_sources(&host, &mut plan).expect("sources fit");

        let layouts = plan.controller().into_iter().chain(plan.sources());
        for layout in layouts {
            assert_eq!(layout.docking.chebyshev_distance(layout.position), 1);
            assert_eq!(layout.docking.chebyshev_distance(layout.link), 1);
            assert_eq!(layout.link.chebyshev_distance(layout.position), 2);
            assert!(!layout.other_docking.contains(&layout.docking));
            assert!(layout
                .other_docking
                .iter()
                .all(|tile| tile.chebyshev_distance(layout.position) == 1));
        }
        assert!(plan.reserved_conflicts().is_empty());
    }

    #[test]
    fn neighbouring_features_keep_their_tiles_apart() {
        let host = RoomSnapshot::open(GridSize::new(50))
            .with_spawn("Spawn1", Tile::new(25, 30))
            .with_source("src", Tile::new(36, 40))
            .with_controller("ctrl", Tile::new(38, 40));
        let mut plan = with_base(&host);
        plan_controller(&host, &mut plan).expect("controller fits");
        plan_sources(&host, &mut plan).expect("sources fit");

        let controller = plan.controller().expect("controller placed");
        let source = &plan.sources()[0];
        let held: Vec<Tile> = controller.occupied_tiles().collect();
        assert!(source.occupied_tiles().all(|tile| !held.contains(&tile)));
        assert!(source.docking.x() == 35 || source.docking.x() == 36);
        assert_ne!(controller.link, source.position);
        assert_ne!(source.link, controller.position);
        assert!(plan.reserved_conflicts().is_empty());
    }

    #[test]
    fn transport_ring_is_reserved_except_for_the_link() {
        let host = room();
        let mut plan = with_base(&host);
        plan_sources(&host, &mut plan).expect("sources fit");

        let source = &plan.sources()[0];
        assert!(!plan.reserved().contains(&source.link));
        assert!(plan.reserved().contains(&Tile::new(0, 0)));
        assert!(plan.reserved().contains(&Tile::new(0, 4)));
    }

    #[test]
    fn missing_features_are_fatal() {
        let bare = RoomSnapshot::open(GridSize::new(11)).with_spawn("Spawn1", Tile::new(5, 6));
        let mut plan = with_base(&bare);
        assert_eq!(
            plan_controller(&bare, &mut plan),
            Err(PlanError::MissingController)
        );
        assert_eq!(plan_sources(&bare, &mut plan), Err(PlanError::NoSources));
    }

    #[test]
    fn walled_in_feature_has_no_link_site() {
        let mut host = room();
        for y in 0..5 {
            host = host.with_wall(Tile::new(4, y));
        }
        for x in 0..4 {
            host = host.with_wall(Tile::new(x, 4));
        }
        let mut plan = with_base(&host);
        let before = plan.clone();
        assert_eq!(
            plan_sources(&host, &mut plan),
            Err(PlanError::NoLinkSite {
                feature: FeatureId::new("src")
            })
        );
        assert_eq!(plan, before, "failed stage must not mutate");
    }

    #[test]
    fn layout_requires_the_base() {
        let host = room();
        assert_eq!(
            plan_controller(&host, &mut PlanBuilder::default()),
            Err(PlanError::Incomplete {
                missing: Stage::Base
            })
        );
    }
}
