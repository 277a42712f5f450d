//! Neighbourhood queries over the room grid.
//!
//! Every helper returns tiles in a stable order: clockwise from north for a
//! single tile, and input order followed by clockwise order for sets.

use room_planner_core::{Compass, RoomHost, Tile};

/// Walkable tiles around `tile`, clockwise from north.
pub fn neighbors<H: RoomHost>(host: &H, tile: Tile) -> Vec<Tile> {
    let grid = host.grid();
    Compass::CLOCKWISE
        .iter()
        .filter_map(|&direction| tile.step(direction, grid))
        .filter(|&candidate| host.is_walkable(candidate))
        .collect()
}

/// Walkable tiles touching any of `tiles` that are not themselves in `tiles`.
///
/// Each tile appears once, in the order it was first discovered.
pub fn neighbors_of_set<H: RoomHost>(host: &H, tiles: &[Tile]) -> Vec<Tile> {
    let mut found: Vec<Tile> = Vec::new();
    for &tile in tiles {
        for candidate in neighbors(host, tile) {
            if !tiles.contains(&candidate) && !found.contains(&candidate) {
                found.push(candidate);
            }
        }
    }
    found
}

/// Concentric walkable rings around `origin`.
///
/// Ring 0 holds the tiles adjacent to `origin`; every later ring holds the
/// neighbours of the previous ring that lie neither in the ring before it nor
/// on `origin`.
pub fn ring_expand<H: RoomHost>(host: &H, origin: Tile, depth: usize) -> Vec<Vec<Tile>> {
    let mut rings: Vec<Vec<Tile>> = Vec::with_capacity(depth);
    for index in 0..depth {
        let inner = match index {
            0 => vec![origin],
            _ => rings[index - 1].clone(),
        };
        let skip = match index {
            0 | 1 => vec![origin],
            _ => rings[index - 2].clone(),
        };
        rings.push(filter_out(&neighbors_of_set(host, &inner), &skip));
    }
    rings
}

/// Elements of `tiles` not contained in `excluded`, in their original order.
#[must_use]
pub fn filter_out(tiles: &[Tile], excluded: &[Tile]) -> Vec<Tile> {
    tiles
        .iter()
        .copied()
        .filter(|tile| !excluded.contains(tile))
        .collect()
}

/// Tiles occupied by room entities: spawns, sources, minerals and the controller.
pub fn entity_tiles<H: RoomHost>(host: &H) -> Vec<Tile> {
    host.spawns()
        .into_iter()
        .chain(host.sources())
        .chain(host.minerals())
        .chain(host.controller())
        .map(|feature| feature.position)
        .collect()
}

/// Reports whether any tile around `tile` is a wall or lies off-grid.
pub fn adjacent_to_blocked<H: RoomHost>(host: &H, tile: Tile) -> bool {
    let grid = host.grid();
    Compass::CLOCKWISE
        .iter()
        .any(|&direction| match tile.step(direction, grid) {
            Some(candidate) => !host.is_walkable(candidate),
            None => true,
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use room_planner_core::GridSize;
    use room_planner_world::RoomSnapshot;

    fn open(side: u8) -> RoomSnapshot {
        RoomSnapshot::open(GridSize::new(side))
    }

    fn with_walls(side: u8, walls: &[Tile]) -> RoomSnapshot {
        walls
            .iter()
            .fold(open(side), |snapshot, &wall| snapshot.with_wall(wall))
    }

    #[test]
    fn entity_tiles_cover_every_feature_kind() {
        let host = open(9)
            .with_spawn("Spawn1", Tile::new(4, 4))
            .with_source("src", Tile::new(1, 1))
            .with_mineral("H", Tile::new(7, 1))
            .with_controller("ctrl", Tile::new(7, 7));
        assert_eq!(
            entity_tiles(&host),
            vec![
                Tile::new(4, 4),
                Tile::new(1, 1),
                Tile::new(7, 1),
                Tile::new(7, 7),
            ]
        );
        assert!(entity_tiles(&open(9)).is_empty());
    }

    #[test]
    fn neighbors_run_clockwise_from_north() {
        let host = open(5);
        assert_eq!(
            neighbors(&host, Tile::new(2, 2)),
            vec![
                Tile::new(2, 1),
                Tile::new(3, 1),
                Tile::new(3, 2),
                Tile::new(3, 3),
                Tile::new(2, 3),
                Tile::new(1, 3),
                Tile::new(1, 2),
                Tile::new(1, 1),
            ]
        );
    }

    #[test]
    fn neighbors_skip_walls_and_the_grid_edge() {
        let host = with_walls(5, &[Tile::new(1, 0)]);
        assert_eq!(
            neighbors(&host, Tile::new(0, 0)),
            vec![Tile::new(1, 1), Tile::new(0, 1)]
        );
    }

    #[test]
    fn neighbors_of_set_excludes_inputs_and_duplicates() {
        let host = open(5);
        let pair = [Tile::new(1, 1), Tile::new(2, 1)];
        let around = neighbors_of_set(&host, &pair);

        assert_eq!(around.len(), 10);
        assert!(!around.contains(&Tile::new(1, 1)));
        assert!(!around.contains(&Tile::new(2, 1)));
        for tile in &around {
            assert_eq!(
                around.iter().filter(|other| *other == tile).count(),
                1,
                "{tile} listed twice"
            );
        }
        assert_eq!(around[0], Tile::new(1, 0), "discovery starts north of the first input");
    }

    #[test]
    fn rings_grow_outward_without_overlap() {
        let host = open(9);
        let origin = Tile::new(4, 4);
        let rings = ring_expand(&host, origin, 3);

        assert_eq!(rings.len(), 3);
        assert_eq!(rings[0].len(), 8);
        assert_eq!(rings[1].len(), 16);
        assert_eq!(rings[2].len(), 24);
        for (index, ring) in rings.iter().enumerate() {
            for tile in ring {
                assert_eq!(
                    usize::from(tile.chebyshev_distance(origin)),
                    index + 1,
                    "{tile} landed in ring {index}"
                );
            }
        }
    }

    #[test]
    fn rings_stop_at_walls() {
        let walls: Vec<Tile> = (0..5).map(|y| Tile::new(3, y)).collect();
        let host = with_walls(5, &walls);
        let rings = ring_expand(&host, Tile::new(1, 2), 2);

        assert!(rings.iter().flatten().all(|tile| tile.x() != 3));
        assert!(rings[1].iter().all(|tile| tile.x() < 3));
    }

    #[test]
    fn filter_out_keeps_order() {
        let tiles = [Tile::new(0, 0), Tile::new(1, 0), Tile::new(2, 0)];
        assert_eq!(
            filter_out(&tiles, &[Tile::new(1, 0)]),
            vec![Tile::new(0, 0), Tile::new(2, 0)]
        );
    }

    #[test]
    fn blocked_neighbours_include_walls_and_edges() {
        let host = with_walls(5, &[Tile::new(3, 3)]);
        assert!(adjacent_to_blocked(&host, Tile::new(0, 2)));
        assert!(adjacent_to_blocked(&host, Tile::new(2, 2)));
        assert!(!adjacent_to_blocked(&host, Tile::new(1, 2)));
    }
}
