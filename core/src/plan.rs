//! The canonical plan document produced by a planning run.

use serde::{Deserialize, Serialize};

use crate::{FeatureId, PlanIssue, Tile};

/// Build ordering hint attached to planned roads.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum RoadPriority {
    /// Ring of roads around the anchor structures.
    AnchorRing,
    /// Roads from the anchor to each source.
    AnchorToSource,
    /// Roads from the controller to each source.
    ControllerToSource,
    /// Access roads inside the extension field.
    ExtensionField,
    /// Roads from the anchor out through each exit.
    ExitRoad,
}

impl RoadPriority {
    /// Numeric build priority; lower values are built first.
    #[must_use]
    pub const fn level(self) -> u8 {
        match self {
            Self::AnchorRing => 0,
            Self::AnchorToSource => 1,
            Self::ControllerToSource => 2,
            Self::ExtensionField => 3,
            Self::ExitRoad => 4,
        }
    }
}

/// Build ordering hint attached to planned ramparts.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum RampartPriority {
    /// Fortified gate where an exit road crosses the perimeter wall.
    ExitGate,
}

impl RampartPriority {
    /// Numeric build priority; lower values are built first.
    #[must_use]
    pub const fn level(self) -> u8 {
        match self {
            Self::ExitGate => 1,
        }
    }
}

/// Role a tile plays in the finished layout.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TileRole {
    /// Reference tile the base is built around.
    Anchor,
    /// Spawn structure, existing or planned.
    Spawn,
    /// Defensive tower.
    Tower,
    /// Central storage.
    Storage,
    /// Energy relay.
    Link,
    /// Extension structure.
    Extension,
    /// Road with its build priority.
    Road(RoadPriority),
    /// Perimeter wall.
    Wall,
    /// Rampart with its build priority.
    Rampart(RampartPriority),
    /// Tile held back from other roles.
    Reserved,
    /// Tile a worker stands on to upgrade the controller.
    ControllerDock,
    /// Tile a worker stands on to harvest a source.
    SourceDock,
    /// Tile a worker stands on to harvest a mineral.
    MineralDock,
}

impl TileRole {
    /// Reports whether the role is a structure that blocks movement.
    #[must_use]
    pub const fn is_structure(self) -> bool {
        matches!(
            self,
            Self::Spawn | Self::Tower | Self::Storage | Self::Link | Self::Extension | Self::Wall
        )
    }
}

/// Pre-existing or planned spawn.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SpawnPlan {
    /// Identifier of the spawn when it already exists.
    pub id: Option<FeatureId>,
    /// Tile the spawn occupies.
    pub position: Tile,
}

/// Docking and link layout around the controller or an energy source.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct FeaturePlan {
    /// Identifier of the planned feature.
    pub id: FeatureId,
    /// Tile the feature occupies.
    pub position: Tile,
    /// Preferred working tile, adjacent to both the feature and its link.
    pub docking: Tile,
    /// Remaining working tiles around the feature.
    pub other_docking: Vec<Tile>,
    /// Tile holding the feature's link.
    pub link: Tile,
}

impl FeaturePlan {
    /// Every tile the feature occupies for docking or relaying.
    pub fn occupied_tiles(&self) -> impl Iterator<Item = Tile> + '_ {
        std::iter::once(self.docking)
            .chain(std::iter::once(self.link))
            .chain(self.other_docking.iter().copied())
    }
}

/// Docking layout around a mineral deposit.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct MineralPlan {
    /// Identifier of the mineral deposit.
    pub id: FeatureId,
    /// Tile the deposit occupies.
    pub position: Tile,
    /// Working tiles around the deposit.
    pub docking: Vec<Tile>,
}

/// Planned road tile.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Road {
    /// Tile the road occupies.
    pub position: Tile,
    /// Build ordering hint.
    pub priority: RoadPriority,
}

/// Planned rampart tile.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Rampart {
    /// Tile the rampart occupies.
    pub position: Tile,
    /// Build ordering hint.
    pub priority: RampartPriority,
}

/// Complete declarative layout for one room.
///
/// Lists keep the order stages appended to them. The anchor's own link is
/// stored in [`Plan::anchor_link`] and also leads [`Plan::links`].
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Plan {
    /// Reference tile the base is built around.
    pub anchor: Tile,
    /// Link next to the anchor that every other link is measured from.
    pub anchor_link: Tile,
    /// Controller layout.
    pub controller: FeaturePlan,
    /// Layout for every energy source, in discovery order.
    pub sources: Vec<FeaturePlan>,
    /// Layout for every mineral deposit, in discovery order.
    pub minerals: Vec<MineralPlan>,
    /// Spawns; the pre-existing spawn comes first.
    pub spawns: Vec<SpawnPlan>,
    /// Every link tile, starting with the anchor link.
    pub links: Vec<Tile>,
    /// Tower tiles.
    pub towers: Vec<Tile>,
    /// Storage tiles.
    pub storages: Vec<Tile>,
    /// Extension tiles, innermost ring first.
    pub extensions: Vec<Tile>,
    /// Road tiles with their build priorities.
    pub roads: Vec<Road>,
    /// Perimeter wall tiles.
    pub walls: Vec<Tile>,
    /// Rampart tiles with their build priorities.
    pub ramparts: Vec<Rampart>,
    /// Tiles held back from every other role.
    pub reserved: Vec<Tile>,
}

impl Plan {
    /// Every assigned tile paired with its role.
    ///
    /// A tile appears once per role; ramparts overlay the road beneath them.
    #[must_use]
    pub fn tiles_with_roles(&self) -> Vec<(Tile, TileRole)> {
        let mut tiles = vec![(self.anchor, TileRole::Anchor)];
        tiles.extend(self.spawns.iter().map(|spawn| (spawn.position, TileRole::Spawn)));
        tiles.extend(self.towers.iter().map(|&tile| (tile, TileRole::Tower)));
        tiles.extend(self.storages.iter().map(|&tile| (tile, TileRole::Storage)));
        tiles.extend(self.links.iter().map(|&tile| (tile, TileRole::Link)));
        tiles.extend(self.extensions.iter().map(|&tile| (tile, TileRole::Extension)));
        tiles.extend(
            std::iter::once(self.controller.docking)
                .chain(self.controller.other_docking.iter().copied())
                .map(|tile| (tile, TileRole::ControllerDock)),
        );
        for source in &self.sources {
            tiles.extend(
                std::iter::once(source.docking)
                    .chain(source.other_docking.iter().copied())
                    .map(|tile| (tile, TileRole::SourceDock)),
            );
        }
        for mineral in &self.minerals {
            tiles.extend(
                mineral
                    .docking
                    .iter()
                    .map(|&tile| (tile, TileRole::MineralDock)),
            );
        }
        tiles.extend(
            self.ramparts
                .iter()
                .map(|rampart| (rampart.position, TileRole::Rampart(rampart.priority))),
        );
        tiles.extend(
            self.roads
                .iter()
                .map(|road| (road.position, TileRole::Road(road.priority))),
        );
        tiles.extend(self.walls.iter().map(|&tile| (tile, TileRole::Wall)));
        tiles.extend(self.reserved.iter().map(|&tile| (tile, TileRole::Reserved)));
        tiles
    }

    /// Most significant role assigned to the tile, if any.
    ///
    /// Structures win over docking tiles, ramparts over the roads they cover,
    /// and anything over a reservation.
    #[must_use]
    pub fn role_at(&self, tile: Tile) -> Option<TileRole> {
        self.tiles_with_roles()
            .into_iter()
            .find(|(candidate, _)| *candidate == tile)
            .map(|(_, role)| role)
    }
}

/// Finished plan together with the recoverable issues met while building it.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlanOutcome {
    /// The finished layout.
    pub plan: Plan,
    /// Skipped contributions and unmet targets, in the order they occurred.
    pub issues: Vec<PlanIssue>,
}
