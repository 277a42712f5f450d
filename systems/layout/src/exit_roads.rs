//! Roads from the anchor out to every neighbouring room, gated through the walls.

use room_planner_core::{PlanError, PlanIssue, RampartPriority, RoadPriority, RoomHost, Stage, Tile};

use crate::{
    geometry::neighbors,
    path::{planning_path, shortest_index, trimmed},
    roads::obstacles,
    PlanBuilder,
};

pub(crate) fn plan_exit_roads<H: RoomHost>(
    host: &H,
    plan: &mut PlanBuilder,
) -> Result<(), PlanError> {
    let anchor = plan.anchor().ok_or(PlanError::Incomplete {
        missing: Stage::Base,
    })?;
    if plan.controller().is_none() {
        return Err(PlanError::Incomplete {
            missing: Stage::Controller,
        });
    }

    for room in host.adjacent_rooms() {
        let exits = host.exit_tiles(&room);
        let Some(&first_exit) = exits.first() else {
            log::debug!("exit to {room} has no walkable border tiles");
            continue;
        };

        // Walls stay passable so the route can cut through the perimeter.
        let blocked = obstacles(plan, false, &[]);
        let roads = plan.road_tiles();
        let paths: Vec<Vec<Tile>> = exits
            .iter()
            .map(|&exit| planning_path(host, anchor, exit, &roads, &blocked))
            .collect();
        let Some(index) = shortest_index(&paths) else {
            plan.record(PlanIssue::Unreachable {
                stage: Stage::ExitRoads,
                from: anchor,
                to: first_exit,
            });
            continue;
        };

        let route = trimmed(&paths[index], 1, 1);
        let crossings: Vec<Tile> = route
            .iter()
            .copied()
            .filter(|&tile| !plan.is_road(tile) && plan.walls().contains(&tile))
            .collect();
        for &crossing in &crossings {
            let mut gate = vec![crossing];
            gate.extend(neighbors(host, crossing));
            plan.open_gate(&gate, RampartPriority::ExitGate);
        }
        let laid = plan.lay_roads(route, RoadPriority::ExitRoad);
        log::debug!(
            "exit road to {room} via {}: {} new tiles, {} gates",
            exits[index],
            laid.len(),
            crossings.len()
        );
    }
    Ok(())
}
