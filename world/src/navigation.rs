//! Weighted shortest-path search over the room grid.

use pathfinding::prelude::dijkstra;
use room_planner_core::{Compass, GridSize, Tile, IMPASSABLE_COST};

/// Terrain cost applied when a cost callback reports zero.
const DEFAULT_TILE_COST: u8 = 1;

/// Searches the cheapest 8-connected route between two tiles.
///
/// `is_wall` reports terrain that can never be entered and `cost` prices every
/// other tile the search steps onto. Tiles priced at [`IMPASSABLE_COST`] are
/// skipped. The returned path excludes `start` and ends with `end`; it is empty
/// when the two tiles coincide or no route exists.
pub(crate) fn weighted_path<W, F>(
    grid: GridSize,
    start: Tile,
    end: Tile,
    is_wall: W,
    cost: F,
) -> Vec<Tile>
where
    W: Fn(Tile) -> bool,
    F: Fn(Tile) -> u8,
{
    if start == end || grid.index(start).is_none() || grid.index(end).is_none() {
        return Vec::new();
    }

    let result = dijkstra(
        &start,
        |&tile| successors(grid, tile, &is_wall, &cost),
        |&tile| tile == end,
    );

    match result {
        Some((path, total)) => {
            log::trace!("path {start} -> {end}: {} steps, cost {total}", path.len() - 1);
            path.into_iter().skip(1).collect()
        }
        None => {
            log::trace!("path {start} -> {end}: unreachable");
            Vec::new()
        }
    }
}

fn successors<W, F>(grid: GridSize, tile: Tile, is_wall: &W, cost: &F) -> Vec<(Tile, u32)>
where
    W: Fn(Tile) -> bool,
    F: Fn(Tile) -> u8,
{
    let mut next = Vec::with_capacity(Compass::CLOCKWISE.len());
    for direction in Compass::CLOCKWISE {
        let Some(neighbor) = tile.step(direction, grid) else {
            continue;
        };
        if is_wall(neighbor) {
            continue;
        }

        let price = match cost(neighbor) {
            IMPASSABLE_COST => continue,
            0 => DEFAULT_TILE_COST,
            price => price,
        };
        next.push((neighbor, u32::from(price)));
    }
    next
}
