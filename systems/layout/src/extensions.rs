//! Extension field grown ring by ring around the base.
//!
//! Access roads follow a diagonal lattice around the anchor; cross centres
//! and off-lattice tiles hold the extensions.

use std::collections::HashSet;

use room_planner_core::{PlanError, PlanIssue, RoadPriority, RoomHost, Stage, Tile};

use crate::{
    geometry::{adjacent_to_blocked, entity_tiles, neighbors_of_set, ring_expand},
    path::restricted_path,
    PlanBuilder,
};

/// Reports whether the lattice puts a road on `tile`.
///
/// With `dx` and `dy` the absolute offsets from the anchor, a tile is on the
/// lattice when both offsets share parity, and it is a cross centre (left
/// free for an extension) when one offset is a multiple of four and the other
/// is two off a multiple of four.
#[must_use]
pub fn is_road_eligible(tile: Tile, anchor: Tile) -> bool {
    let (dx, dy) = tile.abs_offset(anchor);
    let (dx, dy) = (u16::from(dx), u16::from(dy));
    let on_lattice = dx % 2 == dy % 2;
    let centre = ((dx + 2) % 4 == 0 && dy % 4 == 0) || (dx % 4 == 0 && (dy + 2) % 4 == 0);
    on_lattice && !centre
}

pub(crate) fn plan_extensions<H: RoomHost>(
    host: &H,
    plan: &mut PlanBuilder,
    target: usize,
) -> Result<(), PlanError> {
    let anchor = plan.anchor().ok_or(PlanError::Incomplete {
        missing: Stage::Base,
    })?;

    let base_rings = ring_expand(host, anchor, 2);
    let mut base: Vec<Tile> = vec![anchor];
    base.extend(base_rings.iter().flatten());

    let global_roads = plan.road_tiles();
    let mut off_limits: HashSet<Tile> = plan.claimed_tiles().into_iter().collect();
    off_limits.extend(plan.reserved());
    off_limits.extend(&base);
    off_limits.extend(entity_tiles(host));

    let bound = usize::from(host.grid().side());
    let mut extensions: Vec<Tile> = Vec::new();
    let mut field_roads: Vec<Tile> = Vec::new();
    let mut frontier: Vec<Tile> = base_rings[1].clone();
    let mut rings = 0;

    while extensions.len() < target {
        if rings == bound || frontier.is_empty() {
            log::error!(
                "extension field stopped after {rings} rings with {} of {target} extensions",
                extensions.len()
            );
            plan.record(PlanIssue::BoundExceeded {
                placed: extensions.len(),
                target,
                rings,
            });
            break;
        }

        let candidates: Vec<Tile> = neighbors_of_set(host, &frontier)
            .into_iter()
            .filter(|tile| !off_limits.contains(tile))
            .collect();
        let mut placed: Vec<Tile> = Vec::new();
        for candidate in candidates {
            if extensions.len() == target {
                break;
            }
            if is_road_eligible(candidate, anchor) && !adjacent_to_blocked(host, candidate) {
                field_roads.push(candidate);
                placed.push(candidate);
                continue;
            }

            let mut allowed = base.clone();
            allowed.extend(&field_roads);
            allowed.extend(&global_roads);
            if restricted_path(host, candidate, anchor, &allowed).is_empty() {
                continue;
            }
            extensions.push(candidate);
            placed.push(candidate);
        }

        off_limits.extend(&placed);
        frontier = placed;
        rings += 1;
    }

    let laid = plan.lay_roads(&field_roads, RoadPriority::ExtensionField);
    for &tile in &extensions {
        plan.push_extension(tile);
    }
    log::debug!(
        "extension field: {} extensions, {} roads over {rings} rings",
        extensions.len(),
        laid.len()
    );
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::base::plan_base;
    use room_planner_core::GridSize;
    use room_planner_world::RoomSnapshot;

    const ANCHOR: Tile = Tile::new(25, 25);

    fn based(side: u8, spawn: Tile) -> (RoomSnapshot, PlanBuilder) {
        let host = RoomSnapshot::open(GridSize::new(side)).with_spawn("Spawn1", spawn);
        let mut plan = PlanBuilder::default();
        plan_base(&host, &mut plan).expect("base fits");
        (host, plan)
    }

    #[test]
    fn lattice_marks_crosses_and_leaves_centres_free() {
        // Cross centres two steps out along each axis.
        assert!(!is_road_eligible(Tile::new(27, 25), ANCHOR));
        assert!(!is_road_eligible(Tile::new(25, 27), ANCHOR));
        assert!(!is_road_eligible(Tile::new(29, 27), ANCHOR));
        // Cross arms.
        assert!(is_road_eligible(Tile::new(27, 27), ANCHOR));
        assert!(is_road_eligible(Tile::new(29, 25), ANCHOR));
        assert!(is_road_eligible(Tile::new(28, 26), ANCHOR));
        // Mixed parity is never a road.
        assert!(!is_road_eligible(Tile::new(26, 25), ANCHOR));
        assert!(!is_road_eligible(Tile::new(25, 28), ANCHOR));
        assert!(is_road_eligible(Tile::new(21, 21), ANCHOR), "offsets are absolute");
        assert!(!is_road_eligible(Tile::new(23, 25), ANCHOR), "offsets are absolute");
    }

    #[test]
    fn lattice_holds_at_the_far_edge_of_the_coordinate_range() {
        let origin = Tile::new(0, 0);
        assert!(!is_road_eligible(Tile::new(254, 0), origin));
        assert!(!is_road_eligible(Tile::new(0, 254), origin));
        assert!(is_road_eligible(Tile::new(255, 1), origin));
        assert!(is_road_eligible(Tile::new(255, 255), origin));
        assert!(!is_road_eligible(Tile::new(255, 254), origin));
    }

    #[test]
    fn field_stops_at_the_target() {
        let (host, mut plan) = based(50, Tile::new(25, 26));
        plan_extensions(&host, &mut plan, 20).expect("extensions");

        assert_eq!(plan.extensions().len(), 20);
        assert!(plan.issues().is_empty());
        assert!(plan
            .roads()
            .iter()
            .filter(|road| road.priority == RoadPriority::ExtensionField)
            .all(|road| is_road_eligible(road.position, ANCHOR)));
    }

    #[test]
    fn extensions_avoid_the_base_and_existing_roles() {
        let (host, mut plan) = based(50, Tile::new(25, 26));
        let before = plan.claimed_tiles();
        plan_extensions(&host, &mut plan, 60).expect("extensions");

        assert_eq!(plan.extensions().len(), 60);
        for tile in plan.extensions() {
            assert!(tile.chebyshev_distance(ANCHOR) > 2, "{tile} inside the base");
            assert!(!before.contains(tile), "{tile} already had a role");
            assert_eq!(
                plan.extensions().iter().filter(|other| *other == tile).count(),
                1
            );
        }
        assert!(plan.reserved_conflicts().is_empty());
    }

    #[test]
    fn cramped_room_reports_the_shortfall() {
        let (host, mut plan) = based(9, Tile::new(4, 5));
        plan_extensions(&host, &mut plan, 60).expect("extensions never fail");

        assert!(plan.extensions().len() < 60);
        assert!(matches!(
            plan.issues(),
            [PlanIssue::BoundExceeded { target: 60, .. }]
        ));
    }

    #[test]
    fn zero_target_places_nothing() {
        let (host, mut plan) = based(50, Tile::new(25, 26));
        let roads = plan.roads().len();
        plan_extensions(&host, &mut plan, 0).expect("extensions");

        assert!(plan.extensions().is_empty());
        assert_eq!(plan.roads().len(), roads);
        assert!(plan.issues().is_empty());
    }
}
