//! Core types module - shared data structures and constants
//!
//! This module defines the piece data handed out by a bag generator.
//! All types are pure data structures with no dependency on the pattern engine,
//! making them usable by any consumer (spawning, rendering, AI protocol).
//!
//! # Piece Keys
//!
//! A piece key is a single visible ASCII character. Digits and the eight
//! Bag-Pattern punctuation symbols are reserved by the pattern language:
//!
//! | Symbol | Meaning in a pattern |
//! |--------|----------------------|
//! | `@` | every piece key, in catalogue order |
//! | `*` | repeat suffix (`*N`) |
//! | `:` | pick count inside a random group (`:N`) |
//! | `~` | loop the last top-level element forever |
//! | `[` `]` | random group |
//! | `(` `)` | group |
//!
//! # Coordinates
//!
//! Shape coordinates are `f64` so that a catalogue loaded from JSON can be
//! rejected when it is malformed instead of silently truncated:
//!
//! - **Blocks**: integral grid centres such as `(0, 0)`
//! - **Rotation pivot**: grid centre `(1, 0)` or lattice point `(0.5, 0.5)`
//! - **Spawn offset**: integral, e.g. `(3, 20)`
//!
//! # Examples
//!
//! ```
//! use bag_pattern_types::{is_allowed_piece_key, PieceDefinition, PieceShape, SpawnOffset};
//!
//! assert!(is_allowed_piece_key('T'));
//! assert!(!is_allowed_piece_key('@'));
//! assert!(!is_allowed_piece_key('7'));
//!
//! let shape = PieceShape::from_blocks(&[(0.0, 0.0), (1.0, 0.0)], (0.5, 0.5));
//! let piece = PieceDefinition::new('D', shape, SpawnOffset::new(4.0, 20.0));
//! assert_eq!(piece.key, 'D');
//! assert!(piece.spawn_offset.is_integral());
//! ```

use arrayvec::ArrayVec;
use serde::{Deserialize, Serialize};

/// Punctuation reserved by the Bag-Pattern language
pub const SPECIAL_SYMBOLS: [char; 8] = ['@', '*', ':', '~', '[', ']', '(', ')'];

/// Maximum number of blocks a single piece shape may hold
pub const MAX_SHAPE_BLOCKS: usize = 16;

/// Default spawn row used by the standard preset (top of a 40-row field)
pub const DEFAULT_SPAWN_ROW: f64 = 20.0;

/// A piece identifier (exactly one character)
pub type PieceKey = char;

/// Whether `c` is one of the eight reserved punctuation symbols
pub fn is_special_symbol(c: char) -> bool {
    SPECIAL_SYMBOLS.contains(&c)
}

/// Whether `c` can be used as a piece key
///
/// Visible ASCII, excluding digits and the reserved symbols.
pub fn is_allowed_piece_key(c: char) -> bool {
    c.is_ascii_graphic() && !c.is_ascii_digit() && !is_special_symbol(c)
}

/// Whether `v` is a finite whole number
#[inline]
pub fn is_integral(v: f64) -> bool {
    v.is_finite() && v.fract() == 0.0
}

/// Whether `v` sits exactly halfway between two whole numbers
#[inline]
pub fn is_half_integral(v: f64) -> bool {
    is_integral(v - 0.5)
}

/// A 2D point in shape space
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub const ZERO: Point = Point { x: 0.0, y: 0.0 };

    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Both coordinates are integral (a grid centre)
    pub fn is_grid_center(&self) -> bool {
        is_integral(self.x) && is_integral(self.y)
    }

    /// Both coordinates are `n + 0.5` (a lattice point between cells)
    pub fn is_lattice_point(&self) -> bool {
        is_half_integral(self.x) && is_half_integral(self.y)
    }
}

/// Offset where a piece appears on the field
pub type SpawnOffset = Point;

impl SpawnOffset {
    /// Whether both coordinates are whole numbers
    pub fn is_integral(&self) -> bool {
        self.is_grid_center()
    }
}

/// Shape data for a piece (geometry only; rotation lives elsewhere)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PieceShape {
    /// Block positions relative to the origin
    pub blocks: ArrayVec<Point, MAX_SHAPE_BLOCKS>,
    /// Rotation pivot, on a grid centre or a lattice point
    pub rotation_pivot: Point,
    /// Explicit origin; `None` means `(0, 0)`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub origin: Option<Point>,
}

impl PieceShape {
    /// Build a shape from `(x, y)` block tuples
    ///
    /// Blocks beyond [`MAX_SHAPE_BLOCKS`] are dropped.
    pub fn from_blocks(blocks: &[(f64, f64)], pivot: (f64, f64)) -> Self {
        Self {
            blocks: blocks
                .iter()
                .take(MAX_SHAPE_BLOCKS)
                .map(|&(x, y)| Point::new(x, y))
                .collect(),
            rotation_pivot: Point::new(pivot.0, pivot.1),
            origin: None,
        }
    }

    /// Set an explicit origin
    pub fn with_origin(mut self, x: f64, y: f64) -> Self {
        self.origin = Some(Point::new(x, y));
        self
    }

    /// Number of blocks in the shape
    pub fn len(&self) -> usize {
        self.blocks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.blocks.is_empty()
    }
}

/// A catalogue entry: key, shape and spawn offset
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PieceDefinition {
    pub key: PieceKey,
    pub shape: PieceShape,
    pub spawn_offset: SpawnOffset,
}

impl PieceDefinition {
    pub fn new(key: PieceKey, shape: PieceShape, spawn_offset: SpawnOffset) -> Self {
        Self {
            key,
            shape,
            spawn_offset,
        }
    }
}
