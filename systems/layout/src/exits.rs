//! Perimeter walls one band inside every room exit.

use room_planner_core::{PlanError, RoomHost, Tile};

use crate::{geometry::neighbors, PlanBuilder};

pub(crate) fn plan_exits<H: RoomHost>(host: &H, plan: &mut PlanBuilder) -> Result<(), PlanError> {
    let rooms = host.adjacent_rooms();
    let every_exit: Vec<Tile> = rooms.iter().flat_map(|room| host.exit_tiles(room)).collect();

    for room in &rooms {
        let exits = host.exit_tiles(room);
        let walls = perimeter_band(host, &exits, &every_exit, plan.walls());
        log::debug!("exit to {room}: {} exit tiles, {} walls", exits.len(), walls.len());
        for wall in walls {
            plan.push_wall(wall);
        }
    }
    Ok(())
}

/// Walls two steps inside `exits`.
///
/// The band directly inside the exits stays open for movement; the wall band
/// sits one step further in. Exit tiles of every neighbour are never walled.
fn perimeter_band<H: RoomHost>(
    host: &H,
    exits: &[Tile],
    every_exit: &[Tile],
    existing: &[Tile],
) -> Vec<Tile> {
    let mut open_band: Vec<Tile> = Vec::new();
    for &exit in exits {
        for tile in neighbors(host, exit) {
            if !every_exit.contains(&tile) && !open_band.contains(&tile) {
                open_band.push(tile);
            }
        }
    }

    let mut walls: Vec<Tile> = Vec::new();
    for &tile in &open_band {
        for candidate in neighbors(host, tile) {
            if every_exit.contains(&candidate)
                || open_band.contains(&candidate)
                || walls.contains(&candidate)
                || existing.contains(&candidate)
            {
                continue;
            }
            walls.push(candidate);
        }
    }
    walls
}
