#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Shared rendering contracts for room planner adapters.
//!
//! A finished [`Plan`] is turned into a [`Presentation`]: one text label per
//! assigned tile, positioned in world space through a
//! [`TileGridPresentation`], plus a character overview of the whole room.
//! Rendering is a pure read of the plan and never feeds back into planning.

use anyhow::Result as AnyResult;
use glam::Vec2;
use room_planner_core::{GridSize, Plan, RoomHost, Tile, TileRole};
use std::{error::Error, fmt, io::Write};

/// RGBA color used when presenting labels.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Color {
    /// Red channel intensity in the range 0.0..=1.0.
    pub red: f32,
    /// Green channel intensity in the range 0.0..=1.0.
    pub green: f32,
    /// Blue channel intensity in the range 0.0..=1.0.
    pub blue: f32,
    /// Alpha channel intensity in the range 0.0..=1.0.
    pub alpha: f32,
}

impl Color {
    /// Label color of the anchor.
    pub const BLUE: Self = Self::from_rgb_u8(0, 0, 255);
    /// Label color of core structures and docking tiles.
    pub const YELLOW: Self = Self::from_rgb_u8(255, 255, 0);
    /// Label color of roads.
    pub const LIGHT_BLUE: Self = Self::from_rgb_u8(173, 216, 230);
    /// Label color of walls and ramparts.
    pub const RED: Self = Self::from_rgb_u8(255, 0, 0);
    /// Label color of reserved tiles.
    pub const GREY: Self = Self::from_rgb_u8(128, 128, 128);
    /// Label color of extensions.
    pub const DARK_ORANGE: Self = Self::from_rgb_u8(255, 140, 0);

    /// Creates a new color from floating point channels.
    #[must_use]
    pub const fn new(red: f32, green: f32, blue: f32, alpha: f32) -> Self {
        Self {
            red,
            green,
            blue,
            alpha,
        }
    }

    /// Creates an opaque color from byte RGB values.
    #[must_use]
    pub const fn from_rgb_u8(red: u8, green: u8, blue: u8) -> Self {
        Self {
            red: red as f32 / 255.0,
            green: green as f32 / 255.0,
            blue: blue as f32 / 255.0,
            alpha: 1.0,
        }
    }

    /// Returns a new color lightened towards white by the provided amount.
    #[must_use]
    pub fn lighten(self, amount: f32) -> Self {
        let amount = amount.clamp(0.0, 1.0);

        Self {
            red: lighten_channel(self.red, amount),
            green: lighten_channel(self.green, amount),
            blue: lighten_channel(self.blue, amount),
            alpha: self.alpha,
        }
    }
}

fn lighten_channel(channel: f32, amount: f32) -> f32 {
    channel + (1.0 - channel) * amount
}

/// Font size of every label, in tile units.
pub const LABEL_FONT_SIZE: f32 = 0.2;

/// Offset, in tile units, that drops road and reservation labels below the
/// structure label sharing their tile.
pub const LOWER_LABEL_OFFSET: Vec2 = Vec2::new(0.0, 0.2);

/// Text drawn centred over a single tile.
#[derive(Clone, Debug, PartialEq)]
pub struct TileLabel {
    /// Tile the label belongs to.
    pub tile: Tile,
    /// Text of the label.
    pub text: String,
    /// Fill color of the text.
    pub color: Color,
    /// Offset from the tile centre in tile units.
    pub offset: Vec2,
}

impl TileLabel {
    /// Creates a label centred on the tile.
    #[must_use]
    pub fn new(tile: Tile, text: impl Into<String>, color: Color) -> Self {
        Self {
            tile,
            text: text.into(),
            color,
            offset: Vec2::ZERO,
        }
    }

    /// Moves the label by `offset` tile units.
    #[must_use]
    pub fn shifted(mut self, offset: Vec2) -> Self {
        self.offset = offset;
        self
    }
}

/// Builds the debug label for every tile the plan assigns.
///
/// Labels follow the plan's own grouping: anchor, spawns, towers, storages,
/// links, controller docks, source docks, mineral docks, roads, walls,
/// ramparts, reservations and finally extensions. A preferred dock is marked
/// `DOCK(S)` and the remaining docks `DOCK(D)`.
#[must_use]
pub fn labels(plan: &Plan) -> Vec<TileLabel> {
    let mut labels = vec![TileLabel::new(plan.anchor, "BASE", Color::BLUE)];
    let yellow = |tiles: &mut Vec<TileLabel>, tile: Tile, text: &str| {
        tiles.push(TileLabel::new(tile, text, Color::YELLOW));
    };

    for spawn in &plan.spawns {
        yellow(&mut labels, spawn.position, "SPAWN");
    }
    for &tile in &plan.towers {
        yellow(&mut labels, tile, "TOWER");
    }
    for &tile in &plan.storages {
        yellow(&mut labels, tile, "STORAGE");
    }
    for &tile in &plan.links {
        yellow(&mut labels, tile, "LINK");
    }
    for feature in std::iter::once(&plan.controller).chain(&plan.sources) {
        yellow(&mut labels, feature.docking, "DOCK(S)");
        for &tile in &feature.other_docking {
            yellow(&mut labels, tile, "DOCK(D)");
        }
    }
    for mineral in &plan.minerals {
        for &tile in &mineral.docking {
            yellow(&mut labels, tile, "DOCK");
        }
    }

    labels.extend(plan.roads.iter().map(|road| {
        TileLabel::new(
            road.position,
            format!("ROAD({})", road.priority.level()),
            Color::LIGHT_BLUE,
        )
        .shifted(LOWER_LABEL_OFFSET)
    }));
    labels.extend(
        plan.walls
            .iter()
            .map(|&tile| TileLabel::new(tile, "WALL", Color::RED)),
    );
    labels.extend(plan.ramparts.iter().map(|rampart| {
        TileLabel::new(
            rampart.position,
            format!("RAMP({})", rampart.priority.level()),
            Color::RED,
        )
    }));
    labels.extend(
        plan.reserved
            .iter()
            .map(|&tile| TileLabel::new(tile, "AVAIL", Color::GREY).shifted(LOWER_LABEL_OFFSET)),
    );
    labels.extend(
        plan.extensions
            .iter()
            .map(|&tile| TileLabel::new(tile, "EXT", Color::DARK_ORANGE)),
    );
    labels
}

/// Character drawn for a tile role in the room overview.
///
/// Roads are drawn as their build priority digit.
#[must_use]
pub fn role_glyph(role: TileRole) -> char {
    match role {
        TileRole::Anchor => 'A',
        TileRole::Spawn => 'S',
        TileRole::Tower => 'T',
        TileRole::Storage => 'O',
        TileRole::Link => 'L',
        TileRole::Extension => 'x',
        TileRole::Road(priority) => char::from_digit(u32::from(priority.level()), 10).unwrap_or('+'),
        TileRole::Wall => 'W',
        TileRole::Rampart(_) => 'R',
        TileRole::Reserved => ':',
        TileRole::ControllerDock | TileRole::SourceDock => 'd',
        TileRole::MineralDock => 'm',
    }
}

/// Character drawn for walkable tiles without a role.
pub const OPEN_GLYPH: char = '.';
/// Character drawn for terrain walls.
pub const TERRAIN_GLYPH: char = '#';
/// Character drawn for the controller.
pub const CONTROLLER_GLYPH: char = '@';
/// Character drawn for energy sources.
pub const SOURCE_GLYPH: char = '$';
/// Character drawn for mineral deposits.
pub const MINERAL_GLYPH: char = '%';

/// Renders the room as one row of characters per grid row.
///
/// Planned roles take precedence in the order of [`Plan::role_at`]; room
/// entities and terrain fill the remaining tiles.
#[must_use]
pub fn overview<H: RoomHost>(host: &H, plan: &Plan) -> Vec<String> {
    let grid = host.grid();
    let mut glyphs: Vec<Option<char>> = vec![None; grid.tile_count()];
    for (tile, role) in plan.tiles_with_roles() {
        if let Some(slot) = grid.index(tile).and_then(|index| glyphs.get_mut(index)) {
            if slot.is_none() {
                *slot = Some(role_glyph(role));
            }
        }
    }

    let entities = host
        .sources()
        .into_iter()
        .map(|feature| (feature.position, SOURCE_GLYPH))
        .chain(
            host.minerals()
                .into_iter()
                .map(|feature| (feature.position, MINERAL_GLYPH)),
        )
        .chain(
            host.controller()
                .into_iter()
                .map(|feature| (feature.position, CONTROLLER_GLYPH)),
        );
    for (tile, glyph) in entities {
        if let Some(slot) = grid.index(tile).and_then(|index| glyphs.get_mut(index)) {
            if slot.is_none() {
                *slot = Some(glyph);
            }
        }
    }

    let filled: Vec<char> = grid
        .tiles()
        .zip(glyphs)
        .map(|(tile, glyph)| {
            glyph.unwrap_or(if host.is_walkable(tile) {
                OPEN_GLYPH
            } else {
                TERRAIN_GLYPH
            })
        })
        .collect();
    let side = usize::from(grid.side()).max(1);
    filled.chunks(side).map(|row| row.iter().collect()).collect()
}

/// Describes a square tile grid that can be rendered by adapters.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TileGridPresentation {
    /// Number of columns contained in the grid.
    pub columns: u32,
    /// Number of rows contained in the grid.
    pub rows: u32,
    /// Side length of a single tile expressed in world units.
    pub tile_length: f32,
    /// Color used when drawing grid lines.
    pub line_color: Color,
}

impl TileGridPresentation {
    /// Default side length of a tile in world units.
    pub const DEFAULT_TILE_LENGTH: f32 = 16.0;

    /// Creates a new tile grid descriptor.
    ///
    /// Returns an error when the grid has no tiles or `tile_length` is not
    /// positive.
    pub fn new(
        grid: GridSize,
        tile_length: f32,
        line_color: Color,
    ) -> std::result::Result<Self, RenderingError> {
        if grid.side() == 0 {
            return Err(RenderingError::EmptyGrid);
        }
        if tile_length.is_nan() || tile_length <= f32::EPSILON {
            return Err(RenderingError::InvalidTileLength { tile_length });
        }

        let side = u32::from(grid.side());
        Ok(Self {
            columns: side,
            rows: side,
            tile_length,
            line_color,
        })
    }

    /// World-space centre of the tile.
    #[must_use]
    pub fn tile_center(&self, tile: Tile) -> Vec2 {
        (Vec2::new(f32::from(tile.x()), f32::from(tile.y())) + Vec2::splat(0.5)) * self.tile_length
    }

    /// World-space anchor point of a label.
    #[must_use]
    pub fn label_position(&self, label: &TileLabel) -> Vec2 {
        self.tile_center(label.tile) + label.offset * self.tile_length
    }

    /// Label font size in world units.
    #[must_use]
    pub fn font_size(&self) -> f32 {
        LABEL_FONT_SIZE * self.tile_length
    }
}

/// Presentation descriptor consumed by rendering backends.
#[derive(Clone, Debug, PartialEq)]
pub struct Presentation {
    /// Title shown above the rendered plan.
    pub title: String,
    /// Solid color used to clear each frame.
    pub clear_color: Color,
    /// Grid the labels are positioned on.
    pub tile_grid: TileGridPresentation,
    /// Labels of every assigned tile.
    pub labels: Vec<TileLabel>,
    /// Character rows describing the room.
    pub overview: Vec<String>,
}

impl Presentation {
    /// Constructs a new presentation descriptor.
    #[must_use]
    pub fn new<T>(
        title: T,
        clear_color: Color,
        tile_grid: TileGridPresentation,
        labels: Vec<TileLabel>,
        overview: Vec<String>,
    ) -> Self
    where
        T: Into<String>,
    {
        Self {
            title: title.into(),
            clear_color,
            tile_grid,
            labels,
            overview,
        }
    }

    /// Builds the presentation of a finished plan for the room it was made for.
    pub fn of_plan<H, T>(title: T, host: &H, plan: &Plan) -> std::result::Result<Self, RenderingError>
    where
        H: RoomHost,
        T: Into<String>,
    {
        let tile_grid = TileGridPresentation::new(
            host.grid(),
            TileGridPresentation::DEFAULT_TILE_LENGTH,
            Color::GREY.lighten(0.5),
        )?;
        Ok(Self::new(
            title,
            Color::from_rgb_u8(0, 0, 0),
            tile_grid,
            labels(plan),
            overview(host, plan),
        ))
    }
}

/// Rendering backend capable of presenting planned rooms.
pub trait RenderingBackend {
    /// Presents a single plan.
    fn present(&mut self, presentation: &Presentation) -> AnyResult<()>;
}

/// Backend that writes the overview and a label listing as plain text.
#[derive(Debug)]
pub struct TextBackend<W> {
    out: W,
    list_labels: bool,
}

impl<W: Write> TextBackend<W> {
    /// Creates a backend writing the overview only.
    #[must_use]
    pub fn new(out: W) -> Self {
        Self {
            out,
            list_labels: false,
        }
    }

    /// Also lists every label with its world position after the overview.
    #[must_use]
    pub fn with_labels(mut self) -> Self {
        self.list_labels = true;
        self
    }

    /// Returns the underlying writer.
    pub fn into_inner(self) -> W {
        self.out
    }
}

impl<W: Write> RenderingBackend for TextBackend<W> {
    fn present(&mut self, presentation: &Presentation) -> AnyResult<()> {
        writeln!(self.out, "{}", presentation.title)?;
        for row in &presentation.overview {
            writeln!(self.out, "{row}")?;
        }
        if self.list_labels {
            for label in &presentation.labels {
                let position = presentation.tile_grid.label_position(label);
                writeln!(
                    self.out,
                    "{} {} @ ({:.1}, {:.1})",
                    label.tile, label.text, position.x, position.y
                )?;
            }
        }
        self.out.flush()?;
        Ok(())
    }
}

/// Errors that can occur when constructing rendering descriptors.
#[derive(Debug, PartialEq)]
pub enum RenderingError {
    /// The grid has no tiles to draw.
    EmptyGrid,
    /// Tiles must have a positive side length.
    InvalidTileLength {
        /// Provided length that failed validation.
        tile_length: f32,
    },
}

impl fmt::Display for RenderingError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EmptyGrid => write!(f, "grid has no tiles"),
            Self::InvalidTileLength { tile_length } => {
                write!(f, "tile_length must be positive (received {tile_length})")
            }
        }
    }
}

impl Error for RenderingError {}
