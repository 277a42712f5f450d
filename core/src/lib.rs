#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Core contracts shared across the room planner.
//!
//! This crate defines the vocabulary that connects the hosting grid
//! environment, the planning stages, and the adapters that consume a finished
//! layout. Hosts expose terrain, entities, exits and a weighted path query
//! through [`RoomHost`]; the planning system writes a [`Plan`] describing every
//! tile it assigned; adapters render or serialise that plan without feeding
//! anything back into planning.

use std::fmt;

use serde::{Deserialize, Serialize};

mod error;
mod plan;

pub use error::{PlanError, PlanIssue, Stage};
pub use plan::{
    FeaturePlan, MineralPlan, Plan, PlanOutcome, Rampart, RampartPriority, Road, RoadPriority,
    SpawnPlan, TileRole,
};

/// Side length of a standard room measured in tiles.
pub const ROOM_SIZE: u8 = 50;

/// Path cost that marks a tile as impassable for a single query.
pub const IMPASSABLE_COST: u8 = 255;

/// Number of extensions available once the controller reaches its final level.
pub const MAX_LEVEL_EXTENSIONS: usize = 60;

/// Square bounds of the grid a room is laid out on.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct GridSize {
    side: u8,
}

impl GridSize {
    /// Creates a square grid with the provided side length.
    #[must_use]
    pub const fn new(side: u8) -> Self {
        Self { side }
    }

    /// Number of tiles along each edge of the grid.
    #[must_use]
    pub const fn side(&self) -> u8 {
        self.side
    }

    /// Total number of tiles contained in the grid.
    #[must_use]
    pub const fn tile_count(&self) -> usize {
        self.side as usize * self.side as usize
    }

    /// Reports whether the signed coordinate pair lies inside the grid.
    #[must_use]
    pub fn contains(&self, x: i32, y: i32) -> bool {
        let side = i32::from(self.side);
        (0..side).contains(&x) && (0..side).contains(&y)
    }

    /// Row-major index of the tile, if it lies inside the grid.
    #[must_use]
    pub fn index(&self, tile: Tile) -> Option<usize> {
        if tile.x < self.side && tile.y < self.side {
            Some(usize::from(tile.y) * usize::from(self.side) + usize::from(tile.x))
        } else {
            None
        }
    }

    /// Iterates every tile of the grid in row-major order.
    pub fn tiles(&self) -> impl Iterator<Item = Tile> {
        let side = self.side;
        (0..side).flat_map(move |y| (0..side).map(move |x| Tile::new(x, y)))
    }
}

impl Default for GridSize {
    fn default() -> Self {
        Self::new(ROOM_SIZE)
    }
}

/// Location of a single tile within one room, equal by value.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Tile {
    x: u8,
    y: u8,
}

impl Tile {
    /// Creates a new tile coordinate.
    #[must_use]
    pub const fn new(x: u8, y: u8) -> Self {
        Self { x, y }
    }

    /// Zero-based column of the tile.
    #[must_use]
    pub const fn x(&self) -> u8 {
        self.x
    }

    /// Zero-based row of the tile.
    #[must_use]
    pub const fn y(&self) -> u8 {
        self.y
    }

    /// Tile reached by moving one step in the provided direction.
    ///
    /// Returns `None` when the step leaves the grid.
    #[must_use]
    pub fn step(self, direction: Compass, grid: GridSize) -> Option<Tile> {
        let (dx, dy) = direction.offset();
        let x = i32::from(self.x) + i32::from(dx);
        let y = i32::from(self.y) + i32::from(dy);
        if !grid.contains(x, y) {
            return None;
        }

        let x = u8::try_from(x).ok()?;
        let y = u8::try_from(y).ok()?;
        Some(Tile::new(x, y))
    }

    /// Absolute horizontal and vertical offsets between two tiles.
    #[must_use]
    pub fn abs_offset(self, other: Tile) -> (u8, u8) {
        (self.x.abs_diff(other.x), self.y.abs_diff(other.y))
    }

    /// Number of king moves separating two tiles.
    #[must_use]
    pub fn chebyshev_distance(self, other: Tile) -> u8 {
        let (dx, dy) = self.abs_offset(other);
        dx.max(dy)
    }
}

impl fmt::Display for Tile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.x, self.y)
    }
}

/// The eight neighbouring directions in clockwise order starting at north.
///
/// The order is part of the planning contract: anchor slots and neighbour
/// lists are addressed by position in [`Compass::CLOCKWISE`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Compass {
    /// Decreasing row.
    North,
    /// Increasing column, decreasing row.
    NorthEast,
    /// Increasing column.
    East,
    /// Increasing column, increasing row.
    SouthEast,
    /// Increasing row.
    South,
    /// Decreasing column, increasing row.
    SouthWest,
    /// Decreasing column.
    West,
    /// Decreasing column, decreasing row.
    NorthWest,
}

impl Compass {
    /// Every direction, clockwise from north.
    pub const CLOCKWISE: [Compass; 8] = [
        Compass::North,
        Compass::NorthEast,
        Compass::East,
        Compass::SouthEast,
        Compass::South,
        Compass::SouthWest,
        Compass::West,
        Compass::NorthWest,
    ];

    /// Column and row delta of a single step in this direction.
    #[must_use]
    pub const fn offset(self) -> (i8, i8) {
        match self {
            Self::North => (0, -1),
            Self::NorthEast => (1, -1),
            Self::East => (1, 0),
            Self::SouthEast => (1, 1),
            Self::South => (0, 1),
            Self::SouthWest => (-1, 1),
            Self::West => (-1, 0),
            Self::NorthWest => (-1, -1),
        }
    }
}

/// Stable identifier the host assigns to a spawn, source, mineral or controller.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct FeatureId(String);

impl FeatureId {
    /// Wraps the provided identifier.
    #[must_use]
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }
}

impl fmt::Display for FeatureId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Name of a neighbouring room sharing a border with the planned room.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct RoomName(String);

impl RoomName {
    /// Wraps the provided room name.
    #[must_use]
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }
}

impl fmt::Display for RoomName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Entity discovered in the room together with its stable identifier.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Feature {
    /// Identifier assigned by the host.
    pub id: FeatureId,
    /// Tile the entity occupies.
    pub position: Tile,
}

impl Feature {
    /// Creates a feature descriptor.
    #[must_use]
    pub fn new(id: impl Into<String>, position: Tile) -> Self {
        Self {
            id: FeatureId::new(id),
            position,
        }
    }
}

/// Tunables for a single planning run.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlannerConfig {
    /// Number of extension structures the extension field tries to place.
    pub extension_target: usize,
}

impl Default for PlannerConfig {
    fn default() -> Self {
        Self {
            extension_target: MAX_LEVEL_EXTENSIONS,
        }
    }
}

/// Boundary to the hosting grid environment.
///
/// Every query is synchronous. Path queries never fail: an unreachable
/// destination yields an empty sequence.
pub trait RoomHost {
    /// Bounds of the room grid.
    fn grid(&self) -> GridSize;

    /// Reports whether the terrain at the tile can be walked on.
    ///
    /// Tiles outside the grid are never walkable.
    fn is_walkable(&self, tile: Tile) -> bool;

    /// Spawns owned in the room, in the host's discovery order.
    fn spawns(&self) -> Vec<Feature>;

    /// Energy sources in the room, in the host's discovery order.
    fn sources(&self) -> Vec<Feature>;

    /// Mineral deposits in the room, in the host's discovery order.
    fn minerals(&self) -> Vec<Feature>;

    /// The room controller, if the room has one.
    fn controller(&self) -> Option<Feature>;

    /// Names of the rooms sharing a border with this room.
    fn adjacent_rooms(&self) -> Vec<RoomName>;

    /// Border tiles leading into the named neighbouring room.
    fn exit_tiles(&self, neighbor: &RoomName) -> Vec<Tile>;

    /// Weighted shortest path from `start` to `end`.
    ///
    /// `cost` is queried for every tile the search may enter; a cost of
    /// [`IMPASSABLE_COST`] forbids entering it. Terrain walls and room
    /// entities other than `end` are never entered. The returned sequence
    /// excludes `start` and ends with `end`, so a path from a tile to itself
    /// is empty.
    fn find_path<F>(&self, start: Tile, end: Tile, cost: F) -> Vec<Tile>
    where
        F: Fn(Tile) -> u8;
}

#[cfg(test)]
mod tests {
    use super::{Compass, GridSize, Tile};

    #[test]
    fn clockwise_order_starts_north() {
        assert_eq!(Compass::CLOCKWISE[0], Compass::North);
        assert_eq!(Compass::CLOCKWISE[4], Compass::South);
        assert_eq!(Compass::NorthEast.offset(), (1, -1));
        assert_eq!(Compass::NorthWest.offset(), (-1, -1));
    }

    #[test]
    fn step_stays_inside_grid() {
        let grid = GridSize::new(11);
        assert_eq!(
            Tile::new(5, 6).step(Compass::North, grid),
            Some(Tile::new(5, 5))
        );
        assert_eq!(Tile::new(0, 0).step(Compass::West, grid), None);
        assert_eq!(Tile::new(10, 10).step(Compass::SouthEast, grid), None);
    }

    #[test]
    fn grid_index_is_row_major() {
        let grid = GridSize::new(4);
        assert_eq!(grid.index(Tile::new(1, 2)), Some(9));
        assert_eq!(grid.index(Tile::new(4, 0)), None);
        assert_eq!(grid.tiles().count(), grid.tile_count());
    }

    #[test]
    fn chebyshev_distance_uses_larger_axis() {
        assert_eq!(Tile::new(2, 2).chebyshev_distance(Tile::new(5, 3)), 3);
        assert_eq!(Tile::new(5, 3).abs_offset(Tile::new(2, 2)), (3, 1));
    }
}
