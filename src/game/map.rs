//! Island grid, energy field and the text map loader.

use std::fmt;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::geom;

/// Maximum energy a single cell can hold.
pub const MAX_ENERGY: u8 = 100;

/// Radius of the energy view shown to a player.
pub const HORIZON: u16 = 3;

/// Value reported for cells beyond the horizon.
pub const UNKNOWN_ENERGY: i32 = -1;

/// A coordinate on the map.
///
/// Ordered by `x`, then `y`. Serialized as `[x, y]`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(from = "[u16; 2]", into = "[u16; 2]")]
pub struct Coord {
    /// X coordinate (column).
    pub x: u16,
    /// Y coordinate (row, increasing upwards).
    pub y: u16,
}

impl Coord {
    /// Create a new coordinate.
    #[must_use]
    pub const fn new(x: u16, y: u16) -> Self {
        Self { x, y }
    }

    /// Build a coordinate from signed components, if both fit.
    #[must_use]
    pub fn from_signed(x: i64, y: i64) -> Option<Self> {
        Some(Self::new(u16::try_from(x).ok()?, u16::try_from(y).ok()?))
    }

    /// The coordinate shifted by `(dx, dy)`, if it stays non-negative.
    #[must_use]
    pub fn offset(self, dx: i64, dy: i64) -> Option<Self> {
        Self::from_signed(i64::from(self.x) + dx, i64::from(self.y) + dy)
    }
}

impl fmt::Display for Coord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.x, self.y)
    }
}

impl From<[u16; 2]> for Coord {
    fn from([x, y]: [u16; 2]) -> Self {
        Self::new(x, y)
    }
}

impl From<Coord> for [u16; 2] {
    fn from(c: Coord) -> Self {
        [c.x, c.y]
    }
}

/// Static walkability grid plus the mutable energy field laid over it.
///
/// Reads and writes of energy on non-walkable cells are no-ops.
#[derive(Debug, Clone)]
pub struct Island {
    /// Width in cells.
    width: u16,
    /// Height in cells.
    height: u16,
    /// Walkable flags in row-major order, row 0 at the bottom.
    walkable: Vec<bool>,
    /// Energy per cell, same layout.
    energy: Vec<u8>,
    /// Precomputed horizon mask, `(2 * HORIZON + 1)²` entries.
    horizon: Vec<bool>,
}

impl Island {
    /// Build an island from rows of walkable flags (`rows[y][x]`).
    ///
    /// Returns `None` for an empty or ragged grid.
    #[must_use]
    pub fn new(rows: &[Vec<bool>]) -> Option<Self> {
        let height = u16::try_from(rows.len()).ok()?;
        let width = u16::try_from(rows.first()?.len()).ok()?;
        if width == 0 || rows.iter().any(|row| row.len() != usize::from(width)) {
            return None;
        }

        let walkable: Vec<bool> = rows.iter().flatten().copied().collect();
        let energy = vec![0; walkable.len()];

        let side = i32::from(HORIZON) * 2 + 1;
        let center = Coord::new(HORIZON, HORIZON);
        let horizon = (0..side * side)
            .map(|i| {
                #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
                let cell = Coord::new((i % side) as u16, (i / side) as u16);
                geom::dist(center, cell) <= f64::from(HORIZON)
            })
            .collect();

        Some(Self {
            width,
            height,
            walkable,
            energy,
            horizon,
        })
    }

    /// Width of the island grid.
    #[must_use]
    pub const fn width(&self) -> u16 {
        self.width
    }

    /// Height of the island grid.
    #[must_use]
    pub const fn height(&self) -> u16 {
        self.height
    }

    fn index(&self, pos: Coord) -> Option<usize> {
        (pos.x < self.width && pos.y < self.height)
            .then(|| usize::from(pos.y) * usize::from(self.width) + usize::from(pos.x))
    }

    /// Whether a cell is part of the island. False outside the grid.
    #[must_use]
    pub fn walkable(&self, pos: Coord) -> bool {
        self.index(pos).is_some_and(|i| self.walkable[i])
    }

    /// Energy stored at a cell, 0 for non-walkable cells.
    #[must_use]
    pub fn energy(&self, pos: Coord) -> u8 {
        match self.index(pos) {
            Some(i) if self.walkable[i] => self.energy[i],
            _ => 0,
        }
    }

    /// Set the energy of a cell, clamped to [`MAX_ENERGY`].
    pub fn set_energy(&mut self, pos: Coord, value: u32) {
        if let Some(i) = self.index(pos).filter(|&i| self.walkable[i]) {
            #[allow(clippy::cast_possible_truncation)]
            let clamped = value.min(u32::from(MAX_ENERGY)) as u8;
            self.energy[i] = clamped;
        }
    }

    /// Add (or remove) energy at a cell, clamped to [`MAX_ENERGY`].
    ///
    /// # Panics
    ///
    /// Panics if the result would be negative; callers never remove more
    /// energy than a cell holds.
    pub fn add_energy(&mut self, pos: Coord, delta: i64) {
        if !self.walkable(pos) {
            return;
        }
        let value = i64::from(self.energy(pos)) + delta;
        assert!(value >= 0, "energy at {pos} would drop to {value}");
        self.set_energy(pos, u32::try_from(value).unwrap_or(u32::MAX));
    }

    /// The energy window around `pos` visible to a player standing there.
    ///
    /// Indexed `view[dy + HORIZON][dx + HORIZON]`; cells beyond the horizon
    /// read [`UNKNOWN_ENERGY`].
    #[must_use]
    pub fn view(&self, pos: Coord) -> Vec<Vec<i32>> {
        let r = i64::from(HORIZON);
        let side = usize::from(HORIZON) * 2 + 1;
        (-r..=r)
            .zip(0..side)
            .map(|(dy, row)| {
                (-r..=r)
                    .zip(0..side)
                    .map(|(dx, col)| {
                        if self.horizon[row * side + col] {
                            pos.offset(dx, dy).map_or(0, |p| i32::from(self.energy(p)))
                        } else {
                            UNKNOWN_ENERGY
                        }
                    })
                    .collect()
            })
            .collect()
    }

    /// The static grid as rows of `0`/`1`, bottom row first.
    #[must_use]
    pub fn rows(&self) -> Vec<Vec<u8>> {
        self.walkable
            .chunks(usize::from(self.width))
            .map(|row| row.iter().map(|&w| u8::from(w)).collect())
            .collect()
    }

    /// Energy field as rows, bottom row first.
    #[must_use]
    pub fn energy_rows(&self) -> Vec<Vec<u8>> {
        self.energy
            .chunks(usize::from(self.width))
            .map(<[u8]>::to_vec)
            .collect()
    }

    /// Iterate over every walkable cell.
    #[allow(clippy::cast_possible_truncation)]
    pub fn cells(&self) -> impl Iterator<Item = Coord> + '_ {
        let width = usize::from(self.width);
        self.walkable
            .iter()
            .enumerate()
            .filter(|&(_, &w)| w)
            .map(move |(i, _)| Coord::new((i % width) as u16, (i / width) as u16))
    }
}

/// Errors from loading a map.
#[derive(Debug)]
pub enum MapError {
    /// Reading the map file failed.
    Io(std::io::Error),
    /// The map has no rows or no columns.
    Empty,
    /// Rows differ in width.
    Ragged,
    /// The map is larger than the coordinate range.
    TooLarge,
    /// A border cell is walkable.
    OpenBorder,
    /// The map declares fewer player starts than requested.
    NotEnoughStarts {
        /// Starts the map declares.
        available: usize,
        /// Players requested.
        requested: usize,
    },
}

impl fmt::Display for MapError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Io(e) => write!(f, "Failed to read map: {e}"),
            Self::Empty => write!(f, "Map is empty"),
            Self::Ragged => write!(f, "All map rows must have the same width"),
            Self::TooLarge => write!(f, "Map exceeds {} cells per side", u16::MAX),
            Self::OpenBorder => write!(f, "Map border must not be part of island"),
            Self::NotEnoughStarts {
                available,
                requested,
            } => write!(
                f,
                "Map has {available} player starts but {requested} players were requested"
            ),
        }
    }
}

impl std::error::Error for MapError {}

impl From<std::io::Error> for MapError {
    fn from(e: std::io::Error) -> Self {
        Self::Io(e)
    }
}

/// A parsed game map: island grid, lighthouse and player start positions.
#[derive(Debug, Clone)]
pub struct MapConfig {
    /// Walkable flags, `island[y][x]`, row 0 at the bottom.
    pub island: Vec<Vec<bool>>,
    /// Lighthouse positions in map order.
    pub lighthouses: Vec<Coord>,
    /// Player start positions, ordered by their map character.
    pub players: Vec<Coord>,
}

impl MapConfig {
    /// Parse a text map.
    ///
    /// Lines are read bottom to top. `#` is water, `!` a lighthouse, a space
    /// plain island, and any other character a player start. Trailing blank
    /// lines are ignored; a blank line inside the grid is a ragged row.
    ///
    /// # Errors
    ///
    /// Returns an error for empty, ragged or oversized maps and for maps
    /// whose border is walkable.
    pub fn parse(text: &str) -> Result<Self, MapError> {
        let mut lines: Vec<&str> = text.lines().collect();
        while lines.last().is_some_and(|l| l.is_empty()) {
            lines.pop();
        }
        if lines.is_empty() {
            return Err(MapError::Empty);
        }
        if lines.len() > usize::from(u16::MAX) {
            return Err(MapError::TooLarge);
        }

        let mut island = Vec::with_capacity(lines.len());
        let mut lighthouses = Vec::new();
        let mut starts = Vec::new();

        for (y, line) in lines.iter().rev().enumerate() {
            let mut row = Vec::with_capacity(line.len());
            for (x, ch) in line.chars().enumerate() {
                let (Ok(cx), Ok(cy)) = (u16::try_from(x), u16::try_from(y)) else {
                    return Err(MapError::TooLarge);
                };
                let pos = Coord::new(cx, cy);
                match ch {
                    '#' => row.push(false),
                    '!' => {
                        row.push(true);
                        lighthouses.push(pos);
                    }
                    ' ' => row.push(true),
                    other => {
                        row.push(true);
                        starts.push((other, pos));
                    }
                }
            }
            island.push(row);
        }

        let width = island[0].len();
        if width == 0 {
            return Err(MapError::Empty);
        }
        if island.iter().any(|row| row.len() != width) {
            return Err(MapError::Ragged);
        }

        let first_last = [&island[0], &island[island.len() - 1]];
        let open_rows = first_last.iter().any(|row| row.iter().any(|&w| w));
        let open_cols = island.iter().any(|row| row[0] || row[width - 1]);
        if open_rows || open_cols {
            return Err(MapError::OpenBorder);
        }

        starts.sort();

        Ok(Self {
            island,
            lighthouses,
            players: starts.into_iter().map(|(_, pos)| pos).collect(),
        })
    }

    /// Load and parse a map file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or does not parse.
    pub fn load(path: &Path) -> Result<Self, MapError> {
        let text = std::fs::read_to_string(path)?;
        Self::parse(&text)
    }

    /// Width of the map.
    #[must_use]
    pub fn width(&self) -> usize {
        self.island.first().map_or(0, Vec::len)
    }

    /// Height of the map.
    #[must_use]
    pub fn height(&self) -> usize {
        self.island.len()
    }
}
