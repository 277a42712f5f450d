//! Path queries the stages issue against the host.

use std::collections::HashSet;

use room_planner_core::{RoomHost, Tile, IMPASSABLE_COST};

/// Cost of stepping onto a preferred tile, usually an existing road.
pub const PREFERRED_COST: u8 = 1;
/// Cost of stepping onto ordinary terrain while planning roads.
pub const TERRAIN_COST: u8 = 2;

/// Plain shortest path with every walkable tile priced equally.
pub fn direct_path<H: RoomHost>(host: &H, start: Tile, end: Tile) -> Vec<Tile> {
    host.find_path(start, end, |_| PREFERRED_COST)
}

/// Path that favours `preferred` tiles and never enters `blocked` ones.
///
/// A tile listed in both sets counts as blocked.
pub fn planning_path<H: RoomHost>(
    host: &H,
    start: Tile,
    end: Tile,
    preferred: &[Tile],
    blocked: &[Tile],
) -> Vec<Tile> {
    let preferred: HashSet<Tile> = preferred.iter().copied().collect();
    let blocked: HashSet<Tile> = blocked.iter().copied().collect();
    host.find_path(start, end, |tile| {
        if blocked.contains(&tile) {
            IMPASSABLE_COST
        } else if preferred.contains(&tile) {
            PREFERRED_COST
        } else {
            TERRAIN_COST
        }
    })
}

/// Path that only crosses `allowed` tiles.
pub fn restricted_path<H: RoomHost>(host: &H, start: Tile, end: Tile, allowed: &[Tile]) -> Vec<Tile> {
    let allowed: HashSet<Tile> = allowed.iter().copied().collect();
    host.find_path(start, end, |tile| {
        if allowed.contains(&tile) {
            PREFERRED_COST
        } else {
            IMPASSABLE_COST
        }
    })
}

/// Index of the shortest non-empty path; the earliest wins a tie.
///
/// Empty paths mark unreachable destinations and are never selected.
#[must_use]
pub fn shortest_index(paths: &[Vec<Tile>]) -> Option<usize> {
    let mut best: Option<(usize, usize)> = None;
    for (index, path) in paths.iter().enumerate() {
        if path.is_empty() {
            continue;
        }
        match best {
            Some((_, length)) if length <= path.len() => {}
            _ => best = Some((index, path.len())),
        }
    }
    best.map(|(index, _)| index)
}

/// Shortest non-empty path of `paths`, or an empty path when none qualifies.
#[must_use]
pub fn shortest_of(paths: &[Vec<Tile>]) -> Vec<Tile> {
    shortest_index(paths)
        .map(|index| paths[index].clone())
        .unwrap_or_default()
}

/// Path without its first `head` and last `tail` tiles.
pub(crate) fn trimmed(path: &[Tile], head: usize, tail: usize) -> &[Tile] {
    if head + tail >= path.len() {
        return &[];
    }
    &path[head..path.len() - tail]
}
