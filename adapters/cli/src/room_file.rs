//! TOML description of a single room.
//!
//! ```toml
//! name = "W1N1"
//! size = 50
//! terrain = ["..#..", ...]   # optional, `#` marks a wall
//!
//! [[spawns]]
//! id = "Spawn1"
//! x = 25
//! y = 30
//!
//! [controller]
//! id = "controller"
//! x = 38
//! y = 40
//!
//! [exits]
//! top = "W1N2"
//!
//! [planner]
//! extension_target = 60
//! ```

use std::{collections::BTreeMap, fs, path::Path};

use anyhow::{bail, Context, Result};
use room_planner_core::{GridSize, PlannerConfig, Tile, ROOM_SIZE};
use room_planner_world::{ExitSide, RoomSnapshot};
use serde::Deserialize;

/// Room loaded from disk together with its planner tunables.
#[derive(Debug)]
pub(crate) struct RoomFile {
    pub(crate) name: String,
    pub(crate) snapshot: RoomSnapshot,
    pub(crate) config: PlannerConfig,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct Document {
    name: Option<String>,
    size: Option<u8>,
    #[serde(default)]
    terrain: Vec<String>,
    #[serde(default)]
    spawns: Vec<Entity>,
    #[serde(default)]
    sources: Vec<Entity>,
    #[serde(default)]
    minerals: Vec<Entity>,
    controller: Option<Entity>,
    #[serde(default)]
    exits: BTreeMap<String, String>,
    #[serde(default)]
    planner: PlannerConfig,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct Entity {
    id: String,
    x: u8,
    y: u8,
}

impl Entity {
    fn tile(&self) -> Tile {
        Tile::new(self.x, self.y)
    }
}

/// Reads and validates a room file.
pub(crate) fn load(path: &Path) -> Result<RoomFile> {
    let contents = fs::read_to_string(path)
        .with_context(|| format!("failed to read room file at {}", path.display()))?;
    let fallback_name = path
        .file_stem()
        .map(|stem| stem.to_string_lossy().into_owned())
        .unwrap_or_else(|| "room".to_owned());
    parse(&contents, &fallback_name)
        .with_context(|| format!("invalid room file {}", path.display()))
}

/// Parses a room file, naming the room `fallback_name` unless it names itself.
pub(crate) fn parse(contents: &str, fallback_name: &str) -> Result<RoomFile> {
    let document: Document =
        toml::from_str(contents).context("failed to parse room toml contents")?;

    let mut snapshot = if document.terrain.is_empty() {
        RoomSnapshot::open(GridSize::new(document.size.unwrap_or(ROOM_SIZE)))
    } else {
        let snapshot = RoomSnapshot::from_terrain_rows(&document.terrain)
            .context("terrain rows do not form a square grid")?;
        if let Some(size) = document.size {
            let side = document.terrain.len();
            if usize::from(size) != side {
                bail!("room size {size} does not match {side} terrain rows");
            }
        }
        snapshot
    };

    for spawn in &document.spawns {
        snapshot = snapshot.with_spawn(spawn.id.as_str(), spawn.tile());
    }
    for source in &document.sources {
        snapshot = snapshot.with_source(source.id.as_str(), source.tile());
    }
    for mineral in &document.minerals {
        snapshot = snapshot.with_mineral(mineral.id.as_str(), mineral.tile());
    }
    if let Some(controller) = &document.controller {
        snapshot = snapshot.with_controller(controller.id.as_str(), controller.tile());
    }

    let mut exits = document.exits;
    for side in ExitSide::ALL {
        if let Some(neighbor) = exits.remove(side_key(side)) {
            snapshot = snapshot.with_exit(side, neighbor);
        }
    }
    if !exits.is_empty() {
        let unexpected = exits.into_keys().collect::<Vec<_>>().join(", ");
        bail!("unknown exit sides: {unexpected}; expected top, right, bottom or left");
    }

    snapshot.validate().context("room entities are inconsistent")?;
    Ok(RoomFile {
        name: document.name.unwrap_or_else(|| fallback_name.to_owned()),
        snapshot,
        config: document.planner,
    })
}

fn side_key(side: ExitSide) -> &'static str {
    match side {
        ExitSide::Top => "top",
        ExitSide::Right => "right",
        ExitSide::Bottom => "bottom",
        ExitSide::Left => "left",
    }
}
