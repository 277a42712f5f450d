//! Mutable plan under construction.

use room_planner_core::{
    FeaturePlan, MineralPlan, Plan, PlanError, PlanIssue, PlanOutcome, Rampart, RampartPriority,
    Road, RoadPriority, SpawnPlan, Stage, Tile,
};

/// Plan document that stages fill in one after another.
///
/// Every claim of a tile for a concrete role drops that tile from the
/// reserved set, and reservations skip tiles that are already claimed, so
/// reserved tiles never overlap an assignment.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct PlanBuilder {
    anchor: Option<Tile>,
    anchor_link: Option<Tile>,
    controller: Option<FeaturePlan>,
    sources: Vec<FeaturePlan>,
    minerals: Vec<MineralPlan>,
    spawns: Vec<SpawnPlan>,
    links: Vec<Tile>,
    towers: Vec<Tile>,
    storages: Vec<Tile>,
    extensions: Vec<Tile>,
    roads: Vec<Road>,
    walls: Vec<Tile>,
    ramparts: Vec<Rampart>,
    reserved: Vec<Tile>,
    issues: Vec<PlanIssue>,
}

impl PlanBuilder {
    /// Anchor tile, once the base stage has run.
    #[must_use]
    pub fn anchor(&self) -> Option<Tile> {
        self.anchor
    }

    /// Link beside the anchor, once the base stage has run.
    #[must_use]
    pub fn anchor_link(&self) -> Option<Tile> {
        self.anchor_link
    }

    /// Controller layout, once the controller stage has run.
    #[must_use]
    pub fn controller(&self) -> Option<&FeaturePlan> {
        self.controller.as_ref()
    }

    /// Source layouts placed so far.
    #[must_use]
    pub fn sources(&self) -> &[FeaturePlan] {
        &self.sources
    }

    /// Mineral layouts placed so far.
    #[must_use]
    pub fn minerals(&self) -> &[MineralPlan] {
        &self.minerals
    }

    /// Spawns placed so far.
    #[must_use]
    pub fn spawns(&self) -> &[SpawnPlan] {
        &self.spawns
    }

    /// Link tiles placed so far, anchor link first.
    #[must_use]
    pub fn links(&self) -> &[Tile] {
        &self.links
    }

    /// Tower tiles placed so far.
    #[must_use]
    pub fn towers(&self) -> &[Tile] {
        &self.towers
    }

    /// Storage tiles placed so far.
    #[must_use]
    pub fn storages(&self) -> &[Tile] {
        &self.storages
    }

    /// Extension tiles placed so far.
    #[must_use]
    pub fn extensions(&self) -> &[Tile] {
        &self.extensions
    }

    /// Roads placed so far.
    #[must_use]
    pub fn roads(&self) -> &[Road] {
        &self.roads
    }

    /// Wall tiles placed so far.
    #[must_use]
    pub fn walls(&self) -> &[Tile] {
        &self.walls
    }

    /// Ramparts placed so far.
    #[must_use]
    pub fn ramparts(&self) -> &[Rampart] {
        &self.ramparts
    }

    /// Tiles currently held back.
    #[must_use]
    pub fn reserved(&self) -> &[Tile] {
        &self.reserved
    }

    /// Recoverable issues recorded so far.
    #[must_use]
    pub fn issues(&self) -> &[PlanIssue] {
        &self.issues
    }

    /// Tiles of every road placed so far.
    #[must_use]
    pub fn road_tiles(&self) -> Vec<Tile> {
        self.roads.iter().map(|road| road.position).collect()
    }

    /// Reports whether a road already covers the tile.
    #[must_use]
    pub fn is_road(&self, tile: Tile) -> bool {
        self.roads.iter().any(|road| road.position == tile)
    }

    /// Every tile assigned a concrete role, in stage order.
    ///
    /// Reserved tiles are not included; a tile may appear more than once.
    #[must_use]
    pub fn claimed_tiles(&self) -> Vec<Tile> {
        let mut tiles: Vec<Tile> = self.anchor.into_iter().collect();
        tiles.extend(self.spawns.iter().map(|spawn| spawn.position));
        tiles.extend(&self.towers);
        tiles.extend(&self.storages);
        tiles.extend(&self.links);
        tiles.extend(&self.extensions);
        for feature in self.controller.iter().chain(&self.sources) {
            tiles.extend(feature.occupied_tiles());
        }
        for mineral in &self.minerals {
            tiles.extend(&mineral.docking);
        }
        tiles.extend(self.roads.iter().map(|road| road.position));
        tiles.extend(&self.walls);
        tiles.extend(self.ramparts.iter().map(|rampart| rampart.position));
        tiles
    }

    /// Reports whether the tile already holds a concrete role.
    #[must_use]
    pub fn is_claimed(&self, tile: Tile) -> bool {
        self.claimed_tiles().contains(&tile)
    }

    /// Reports whether the tile holds the anchor or a structure a road may not cover.
    #[must_use]
    pub fn holds_structure(&self, tile: Tile) -> bool {
        self.anchor == Some(tile)
            || self.spawns.iter().any(|spawn| spawn.position == tile)
            || self.towers.contains(&tile)
            || self.storages.contains(&tile)
            || self.links.contains(&tile)
            || self.extensions.contains(&tile)
            || self.walls.contains(&tile)
    }

    /// Reports whether a worker may be stationed on the tile.
    ///
    /// A docking tile may sit on a road but never on a structure, a rampart
    /// or a tile another feature already docks on or links through.
    #[must_use]
    pub fn is_dockable(&self, tile: Tile) -> bool {
        !self.holds_structure(tile)
            && !self.ramparts.iter().any(|rampart| rampart.position == tile)
            && !self
                .controller
                .iter()
                .chain(&self.sources)
                .any(|feature| feature.occupied_tiles().any(|held| held == tile))
            && !self
                .minerals
                .iter()
                .any(|mineral| mineral.docking.contains(&tile))
    }

    /// Reserved tiles that also carry a concrete role.
    ///
    /// Always empty for a builder driven only through the planner.
    #[must_use]
    pub fn reserved_conflicts(&self) -> Vec<Tile> {
        let claimed = self.claimed_tiles();
        self.reserved
            .iter()
            .copied()
            .filter(|tile| claimed.contains(tile))
            .collect()
    }

    pub(crate) fn set_anchor(&mut self, anchor: Tile) {
        self.release(anchor);
        self.anchor = Some(anchor);
    }

    pub(crate) fn set_anchor_link(&mut self, link: Tile) {
        self.release(link);
        self.anchor_link = Some(link);
        self.links.insert(0, link);
    }

    pub(crate) fn set_controller(&mut self, controller: FeaturePlan) {
        for tile in controller.occupied_tiles() {
            self.release(tile);
        }
        self.links.push(controller.link);
        self.controller = Some(controller);
    }

    pub(crate) fn push_source(&mut self, source: FeaturePlan) {
        for tile in source.occupied_tiles() {
            self.release(tile);
        }
        self.links.push(source.link);
        self.sources.push(source);
    }

    pub(crate) fn push_mineral(&mut self, mineral: MineralPlan) {
        for &tile in &mineral.docking {
            self.release(tile);
        }
        self.minerals.push(mineral);
    }

    pub(crate) fn push_spawn(&mut self, spawn: SpawnPlan) {
        self.release(spawn.position);
        self.spawns.push(spawn);
    }

    pub(crate) fn push_tower(&mut self, tile: Tile) {
        self.release(tile);
        self.towers.push(tile);
    }

    pub(crate) fn push_storage(&mut self, tile: Tile) {
        self.release(tile);
        self.storages.push(tile);
    }

    pub(crate) fn push_extension(&mut self, tile: Tile) {
        self.release(tile);
        self.extensions.push(tile);
    }

    pub(crate) fn push_wall(&mut self, tile: Tile) {
        if self.walls.contains(&tile) {
            return;
        }
        self.release(tile);
        self.walls.push(tile);
    }

    /// Lays roads on every tile that is neither a road nor a structure yet.
    ///
    /// Returns the tiles that received a new road.
    pub(crate) fn lay_roads(&mut self, tiles: &[Tile], priority: RoadPriority) -> Vec<Tile> {
        let mut laid = Vec::new();
        for &tile in tiles {
            if self.is_road(tile) {
                continue;
            }
            if self.holds_structure(tile) {
                log::debug!("road at {tile} skipped: tile holds a structure");
                continue;
            }
            self.release(tile);
            self.roads.push(Road {
                position: tile,
                priority,
            });
            laid.push(tile);
        }
        laid
    }

    /// Replaces the walls among `tiles` with ramparts.
    pub(crate) fn open_gate(&mut self, tiles: &[Tile], priority: RampartPriority) {
        for &tile in tiles {
            let Some(index) = self.walls.iter().position(|&wall| wall == tile) else {
                continue;
            };
            let _ = self.walls.remove(index);
            self.ramparts.push(Rampart {
                position: tile,
                priority,
            });
        }
    }

    /// Holds back every tile of `tiles` that is not claimed or held already.
    pub(crate) fn reserve(&mut self, tiles: &[Tile]) {
        for &tile in tiles {
            if self.reserved.contains(&tile) || self.is_claimed(tile) {
                continue;
            }
            self.reserved.push(tile);
        }
    }

    pub(crate) fn record(&mut self, issue: PlanIssue) {
        log::warn!("{issue}");
        self.issues.push(issue);
    }

    fn release(&mut self, tile: Tile) {
        self.reserved.retain(|&reserved| reserved != tile);
    }

    /// Seals the builder into a finished plan.
    pub fn finish(self) -> Result<PlanOutcome, PlanError> {
        let anchor = self.anchor.ok_or(PlanError::Incomplete {
            missing: Stage::Base,
        })?;
        let anchor_link = self.anchor_link.ok_or(PlanError::Incomplete {
            missing: Stage::Base,
        })?;
        let controller = self.controller.ok_or(PlanError::Incomplete {
            missing: Stage::Controller,
        })?;

        Ok(PlanOutcome {
            plan: Plan {
                anchor,
                anchor_link,
                controller,
                sources: self.sources,
                minerals: self.minerals,
                spawns: self.spawns,
                links: self.links,
                towers: self.towers,
                storages: self.storages,
                extensions: self.extensions,
                roads: self.roads,
                walls: self.walls,
                ramparts: self.ramparts,
                reserved: self.reserved,
            },
            issues: self.issues,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use room_planner_core::FeatureId;

    #[test]
    fn claiming_a_tile_releases_its_reservation() {
        let mut builder = PlanBuilder::default();
        builder.reserve(&[Tile::new(1, 1), Tile::new(2, 2), Tile::new(1, 1)]);
        assert_eq!(builder.reserved(), &[Tile::new(1, 1), Tile::new(2, 2)]);

        builder.push_tower(Tile::new(1, 1));
        let laid = builder.lay_roads(&[Tile::new(2, 2)], RoadPriority::AnchorRing);

        assert_eq!(laid, vec![Tile::new(2, 2)]);
        assert!(builder.reserved().is_empty());
        assert!(builder.reserved_conflicts().is_empty());
    }

    #[test]
    fn reservations_skip_claimed_tiles() {
        let mut builder = PlanBuilder::default();
        builder.set_anchor(Tile::new(5, 5));
        builder.push_wall(Tile::new(0, 3));
        builder.reserve(&[Tile::new(5, 5), Tile::new(0, 3), Tile::new(4, 4)]);

        assert_eq!(builder.reserved(), &[Tile::new(4, 4)]);
    }

    #[test]
    fn roads_never_cover_structures_or_repeat() {
        let mut builder = PlanBuilder::default();
        builder.set_anchor(Tile::new(5, 5));
        builder.push_extension(Tile::new(6, 6));
        let first = builder.lay_roads(
            &[Tile::new(5, 5), Tile::new(6, 6), Tile::new(7, 7)],
            RoadPriority::AnchorToSource,
        );
        let second = builder.lay_roads(&[Tile::new(7, 7)], RoadPriority::ExitRoad);

        assert_eq!(first, vec![Tile::new(7, 7)]);
        assert!(second.is_empty());
        assert_eq!(
            builder.roads(),
            &[Road {
                position: Tile::new(7, 7),
                priority: RoadPriority::AnchorToSource,
            }]
        );
    }

    #[test]
    fn gates_turn_walls_into_ramparts() {
        let mut builder = PlanBuilder::default();
        for x in 0..4 {
            builder.push_wall(Tile::new(x, 2));
        }
        builder.push_wall(Tile::new(0, 2));
        builder.open_gate(&[Tile::new(1, 2), Tile::new(2, 2), Tile::new(9, 9)], RampartPriority::ExitGate);

        assert_eq!(builder.walls(), &[Tile::new(0, 2), Tile::new(3, 2)]);
        assert_eq!(
            builder
                .ramparts()
                .iter()
                .map(|rampart| rampart.position)
                .collect::<Vec<_>>(),
            vec![Tile::new(1, 2), Tile::new(2, 2)]
        );
    }

    #[test]
    fn anchor_link_leads_the_link_list() {
        let mut builder = PlanBuilder::default();
        builder.set_anchor(Tile::new(5, 5));
        builder.set_controller(FeaturePlan {
            id: FeatureId::new("ctrl"),
            position: Tile::new(9, 9),
            docking: Tile::new(8, 8),
            other_docking: Vec::new(),
            link: Tile::new(8, 7),
        });
        builder.set_anchor_link(Tile::new(5, 4));

        assert_eq!(builder.links(), &[Tile::new(5, 4), Tile::new(8, 7)]);

        let outcome = builder.finish().expect("anchor and controller are set");
        assert_eq!(outcome.plan.links[0], outcome.plan.anchor_link);
    }

    #[test]
    fn finishing_without_a_base_is_an_error() {
        assert_eq!(
            PlanBuilder::default().finish(),
            Err(PlanError::Incomplete {
                missing: Stage::Base
            })
        );
    }
}
