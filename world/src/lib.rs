#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! In-process room host for the room planner.
//!
//! [`RoomSnapshot`] captures terrain, entities and exits of a single room and
//! answers every [`RoomHost`] query from memory, including weighted path
//! searches. It stands in for the live game environment in tests and in the
//! command-line adapter.

mod navigation;

use room_planner_core::{Feature, FeatureId, GridSize, RoomHost, RoomName, Tile};
use thiserror::Error;

/// Character that marks a wall tile in terrain rows.
pub const WALL_GLYPH: char = '#';

/// Border of the room an exit lies on.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum ExitSide {
    /// Row zero.
    Top,
    /// Last column.
    Right,
    /// Last row.
    Bottom,
    /// Column zero.
    Left,
}

impl ExitSide {
    /// Every side, clockwise from the top.
    pub const ALL: [ExitSide; 4] = [
        ExitSide::Top,
        ExitSide::Right,
        ExitSide::Bottom,
        ExitSide::Left,
    ];

    /// Border tiles along this side, in increasing coordinate order.
    #[must_use]
    pub fn border_tiles(self, grid: GridSize) -> Vec<Tile> {
        let last = grid.side().saturating_sub(1);
        (0..grid.side())
            .map(|offset| match self {
                Self::Top => Tile::new(offset, 0),
                Self::Right => Tile::new(last, offset),
                Self::Bottom => Tile::new(offset, last),
                Self::Left => Tile::new(0, offset),
            })
            .collect()
    }
}

/// Problems found while assembling or validating a snapshot.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum SnapshotError {
    /// The terrain contained no rows.
    #[error("terrain has no rows")]
    EmptyTerrain,
    /// The terrain is not square.
    #[error("terrain row {row} has {found} tiles, expected {expected}")]
    RaggedRow {
        /// Zero-based index of the offending row.
        row: usize,
        /// Tiles every row must contain.
        expected: usize,
        /// Tiles the row actually contained.
        found: usize,
    },
    /// The terrain is larger than a grid can address.
    #[error("terrain side of {side} tiles exceeds the supported maximum")]
    TooLarge {
        /// Requested side length.
        side: usize,
    },
    /// An entity lies outside the grid.
    #[error("{id} at {tile} lies outside the grid")]
    OutOfBounds {
        /// Entity that was misplaced.
        id: FeatureId,
        /// Position that was rejected.
        tile: Tile,
    },
    /// Two neighbouring rooms were assigned to the same border.
    #[error("{side:?} border already leads to another room")]
    DuplicateExit {
        /// Border assigned twice.
        side: ExitSide,
    },
}

/// Terrain, entities and exits of a single room.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RoomSnapshot {
    grid: GridSize,
    walls: Vec<bool>,
    spawns: Vec<Feature>,
    sources: Vec<Feature>,
    minerals: Vec<Feature>,
    controller: Option<Feature>,
    exits: Vec<(ExitSide, RoomName)>,
}

impl RoomSnapshot {
    /// Creates a room without walls, entities or exits.
    #[must_use]
    pub fn open(grid: GridSize) -> Self {
        Self {
            grid,
            walls: vec![false; grid.tile_count()],
            spawns: Vec::new(),
            sources: Vec::new(),
            minerals: Vec::new(),
            controller: None,
            exits: Vec::new(),
        }
    }

    /// Parses square terrain rows where [`WALL_GLYPH`] marks a wall.
    pub fn from_terrain_rows<S>(rows: &[S]) -> Result<Self, SnapshotError>
    where
        S: AsRef<str>,
    {
        if rows.is_empty() {
            return Err(SnapshotError::EmptyTerrain);
        }

        let side = rows.len();
        let side_u8 = u8::try_from(side).map_err(|_| SnapshotError::TooLarge { side })?;
        let mut snapshot = Self::open(GridSize::new(side_u8));

        for (y, row) in rows.iter().enumerate() {
            let glyphs: Vec<char> = row.as_ref().chars().collect();
            if glyphs.len() != side {
                return Err(SnapshotError::RaggedRow {
                    row: y,
                    expected: side,
                    found: glyphs.len(),
                });
            }

            for (x, glyph) in glyphs.into_iter().enumerate() {
                if glyph == WALL_GLYPH {
                    // Both indices are below `side`, which fits in a u8.
                    snapshot = snapshot.with_wall(Tile::new(x as u8, y as u8));
                }
            }
        }

        Ok(snapshot)
    }

    /// Marks the tile as wall terrain.
    #[must_use]
    pub fn with_wall(mut self, tile: Tile) -> Self {
        if let Some(index) = self.grid.index(tile) {
            self.walls[index] = true;
        }
        self
    }

    /// Adds an owned spawn.
    #[must_use]
    pub fn with_spawn(mut self, id: impl Into<String>, tile: Tile) -> Self {
        self.spawns.push(Feature::new(id, tile));
        self
    }

    /// Adds an energy source.
    #[must_use]
    pub fn with_source(mut self, id: impl Into<String>, tile: Tile) -> Self {
        self.sources.push(Feature::new(id, tile));
        self
    }

    /// Adds a mineral deposit.
    #[must_use]
    pub fn with_mineral(mut self, id: impl Into<String>, tile: Tile) -> Self {
        self.minerals.push(Feature::new(id, tile));
        self
    }

    /// Sets the room controller.
    #[must_use]
    pub fn with_controller(mut self, id: impl Into<String>, tile: Tile) -> Self {
        self.controller = Some(Feature::new(id, tile));
        self
    }

    /// Connects a border to a neighbouring room.
    #[must_use]
    pub fn with_exit(mut self, side: ExitSide, neighbor: impl Into<String>) -> Self {
        self.exits.push((side, RoomName::new(neighbor)));
        self
    }

    /// Checks that every entity lies inside the grid and borders are unique.
    pub fn validate(&self) -> Result<(), SnapshotError> {
        let entities = self
            .spawns
            .iter()
            .chain(&self.sources)
            .chain(&self.minerals)
            .chain(self.controller.iter());
        for feature in entities {
            if self.grid.index(feature.position).is_none() {
                return Err(SnapshotError::OutOfBounds {
                    id: feature.id.clone(),
                    tile: feature.position,
                });
            }
        }

        for (position, (side, _)) in self.exits.iter().enumerate() {
            if self.exits[..position]
                .iter()
                .any(|(earlier, _)| earlier == side)
            {
                return Err(SnapshotError::DuplicateExit { side: *side });
            }
        }

        Ok(())
    }

    fn is_wall(&self, tile: Tile) -> bool {
        self.grid
            .index(tile)
            .map_or(true, |index| self.walls[index])
    }

    /// Entities block movement just like walls, except at the path's end.
    fn is_obstacle(&self, tile: Tile, end: Tile) -> bool {
        if self.is_wall(tile) {
            return true;
        }
        tile != end
            && self
                .spawns
                .iter()
                .chain(&self.sources)
                .chain(&self.minerals)
                .chain(self.controller.iter())
                .any(|feature| feature.position == tile)
    }
}

impl RoomHost for RoomSnapshot {
    fn grid(&self) -> GridSize {
        self.grid
    }

    fn is_walkable(&self, tile: Tile) -> bool {
        !self.is_wall(tile)
    }

    fn spawns(&self) -> Vec<Feature> {
        self.spawns.clone()
    }

    fn sources(&self) -> Vec<Feature> {
        self.sources.clone()
    }

    fn minerals(&self) -> Vec<Feature> {
        self.minerals.clone()
    }

    fn controller(&self) -> Option<Feature> {
        self.controller.clone()
    }

    fn adjacent_rooms(&self) -> Vec<RoomName> {
        let mut names: Vec<RoomName> = Vec::with_capacity(self.exits.len());
        for (_, name) in &self.exits {
            if !names.contains(name) {
                names.push(name.clone());
            }
        }
        names
    }

    fn exit_tiles(&self, neighbor: &RoomName) -> Vec<Tile> {
        let mut tiles = Vec::new();
        for (side, name) in &self.exits {
            if name != neighbor {
                continue;
            }
            for tile in side.border_tiles(self.grid) {
                if !self.is_wall(tile) && !tiles.contains(&tile) {
                    tiles.push(tile);
                }
            }
        }
        tiles
    }

    fn find_path<F>(&self, start: Tile, end: Tile, cost: F) -> Vec<Tile>
    where
        F: Fn(Tile) -> u8,
    {
        navigation::weighted_path(
            self.grid,
            start,
            end,
            |tile| self.is_obstacle(tile, end),
            cost,
        )
    }
}
