//! Anchor placement and the ring of core structures around it.

use room_planner_core::{Compass, Feature, PlanError, RoadPriority, RoomHost, SpawnPlan, Tile};

use crate::{
    geometry::{filter_out, neighbors, neighbors_of_set},
    path::direct_path,
    PlanBuilder,
};

/// Structure slot around the anchor.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Slot {
    /// The spawn the anchor was derived from.
    Existing,
    /// A spawn still to be built.
    Spawn,
    /// A defensive tower.
    Tower,
    /// Link, storage or reservation, ranked by distance to the sources.
    Hub,
}

/// Slot assignment for each direction around the anchor.
const ANCHOR_SLOTS: [(Compass, Slot); 8] = [
    (Compass::North, Slot::Hub),
    (Compass::NorthEast, Slot::Spawn),
    (Compass::East, Slot::Tower),
    (Compass::SouthEast, Slot::Hub),
    (Compass::South, Slot::Existing),
    (Compass::SouthWest, Slot::Hub),
    (Compass::West, Slot::Tower),
    (Compass::NorthWest, Slot::Spawn),
];

/// Hub ranking used when the room has no sources to measure against.
const FALLBACK_HUB_ORDER: [Compass; 3] = [Compass::SouthEast, Compass::SouthWest, Compass::North];

pub(crate) fn plan_base<H: RoomHost>(host: &H, plan: &mut PlanBuilder) -> Result<(), PlanError> {
    let spawns = host.spawns();
    let spawn = spawns.first().ok_or(PlanError::MissingAnchor)?;
    let grid = host.grid();
    let anchor = spawn
        .position
        .step(Compass::North, grid)
        .filter(|&tile| host.is_walkable(tile))
        .ok_or(PlanError::AnchorBlocked {
            spawn: spawn.position,
        })?;

    let slots = usable_slots(host, plan, anchor);
    let hubs = rank_hubs(host, &host.sources(), &slots);
    let Some(&link) = hubs.first() else {
        return Err(PlanError::AnchorLinkBlocked { anchor });
    };

    plan.set_anchor(anchor);
    plan.push_spawn(SpawnPlan {
        id: Some(spawn.id.clone()),
        position: spawn.position,
    });
    for tile in tiles_in(&slots, Slot::Spawn) {
        plan.push_spawn(SpawnPlan {
            id: None,
            position: tile,
        });
    }
    for tile in tiles_in(&slots, Slot::Tower) {
        plan.push_tower(tile);
    }
    plan.set_anchor_link(link);
    if let Some(&storage) = hubs.get(1) {
        plan.push_storage(storage);
    }
    if let Some(&spare) = hubs.get(2) {
        plan.reserve(&[spare]);
    }

    let ring = neighbors(host, anchor);
    let outer = filter_out(&neighbors_of_set(host, &ring), &[anchor]);
    let free: Vec<Tile> = outer
        .into_iter()
        .filter(|&tile| !plan.is_claimed(tile))
        .collect();
    let laid = plan.lay_roads(&free, RoadPriority::AnchorRing);

    log::debug!(
        "anchor at {anchor}: link {link}, {} spawns, {} towers, {} ring roads",
        plan.spawns().len(),
        plan.towers().len(),
        laid.len()
    );
    Ok(())
}

/// Ring slots whose tile is on-grid, walkable and not claimed yet.
fn usable_slots<H: RoomHost>(host: &H, plan: &PlanBuilder, anchor: Tile) -> Vec<(Compass, Slot, Tile)> {
    let grid = host.grid();
    let mut usable = Vec::with_capacity(ANCHOR_SLOTS.len());
    for (direction, slot) in ANCHOR_SLOTS {
        let Some(tile) = anchor.step(direction, grid) else {
            log::warn!("{slot:?} slot {direction:?} of {anchor} is off-grid");
            continue;
        };
        if !host.is_walkable(tile) || (slot != Slot::Existing && plan.is_claimed(tile)) {
            log::warn!("{slot:?} slot {direction:?} of {anchor} at {tile} is unavailable");
            continue;
        }
        usable.push((direction, slot, tile));
    }
    usable
}

fn tiles_in(slots: &[(Compass, Slot, Tile)], wanted: Slot) -> Vec<Tile> {
    slots
        .iter()
        .filter(|(_, slot, _)| *slot == wanted)
        .map(|&(_, _, tile)| tile)
        .collect()
}

/// Hub tiles ordered link first, then storage, then the spare.
///
/// Hubs are ranked by their summed path length from every source; ties keep
/// clockwise slot order. A source that cannot reach a hub adds a penalty
/// larger than any real path.
fn rank_hubs<H: RoomHost>(host: &H, sources: &[Feature], slots: &[(Compass, Slot, Tile)]) -> Vec<Tile> {
    let hubs: Vec<(Compass, Tile)> = slots
        .iter()
        .filter(|(_, slot, _)| *slot == Slot::Hub)
        .map(|&(direction, _, tile)| (direction, tile))
        .collect();

    if sources.is_empty() {
        return FALLBACK_HUB_ORDER
            .iter()
            .filter_map(|wanted| {
                hubs.iter()
                    .find(|(direction, _)| direction == wanted)
                    .map(|&(_, tile)| tile)
            })
            .collect();
    }

    let penalty = host.grid().tile_count();
    let mut scored: Vec<(usize, Tile)> = hubs
        .iter()
        .map(|&(_, tile)| {
            let total = sources
                .iter()
                .map(|source| {
                    let path = direct_path(host, source.position, tile);
                    if path.is_empty() && source.position != tile {
                        penalty
                    } else {
                        path.len()
                    }
                })
                .sum::<usize>();
            (total, tile)
        })
        .collect();
    scored.sort_by_key(|&(total, _)| total);
    scored.into_iter().map(|(_, tile)| tile).collect()
}
