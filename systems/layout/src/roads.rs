//! Roads joining the anchor, the controller and every source.

use room_planner_core::{PlanError, PlanIssue, RoadPriority, RoomHost, Stage, Tile};

use crate::{
    geometry::filter_out,
    path::{planning_path, trimmed},
    PlanBuilder,
};

pub(crate) fn plan_roads<H: RoomHost>(host: &H, plan: &mut PlanBuilder) -> Result<(), PlanError> {
    let anchor = plan.anchor().ok_or(PlanError::Incomplete {
        missing: Stage::Base,
    })?;
    let controller_dock = plan
        .controller()
        .map(|controller| controller.docking)
        .ok_or(PlanError::Incomplete {
            missing: Stage::Controller,
        })?;
    let source_docks: Vec<Tile> = plan.sources().iter().map(|source| source.docking).collect();

    for &dock in &source_docks {
        let blocked = obstacles(plan, true, &[dock]);
        connect(host, plan, anchor, dock, &blocked, 1, RoadPriority::AnchorToSource);
    }
    for &dock in &source_docks {
        let blocked = obstacles(plan, true, &[controller_dock, dock]);
        connect(host, plan, controller_dock, dock, &blocked, 0, RoadPriority::ControllerToSource);
    }
    Ok(())
}

/// Lays a road along the planned path from `start` to `end`.
///
/// The path's final tile is always dropped and `skip_head` tiles are dropped
/// from its front. An unreachable destination is recorded as an issue.
fn connect<H: RoomHost>(
    host: &H,
    plan: &mut PlanBuilder,
    start: Tile,
    end: Tile,
    blocked: &[Tile],
    skip_head: usize,
    priority: RoadPriority,
) {
    let path = planning_path(host, start, end, &plan.road_tiles(), blocked);
    if path.is_empty() && start != end {
        plan.record(PlanIssue::Unreachable {
            stage: Stage::Roads,
            from: start,
            to: end,
        });
        return;
    }
    let laid = plan.lay_roads(trimmed(&path, skip_head, 1), priority);
    log::debug!("road {start} -> {end}: {} of {} tiles new", laid.len(), path.len());
}

/// Tiles road paths may not cross.
///
/// Covers every docking, link and spare docking tile of the controller and
/// sources, every mineral docking tile and, when `include_walls` is set, the
/// perimeter walls. Tiles in `open` are left passable.
pub(crate) fn obstacles(plan: &PlanBuilder, include_walls: bool, open: &[Tile]) -> Vec<Tile> {
    let mut blocked: Vec<Tile> = Vec::new();
    if include_walls {
        blocked.extend(plan.walls());
    }
    for feature in plan.controller().into_iter().chain(plan.sources()) {
        blocked.extend(feature.occupied_tiles());
    }
    for mineral in plan.minerals() {
        blocked.extend(&mineral.docking);
    }
    filter_out(&blocked, open)
}
