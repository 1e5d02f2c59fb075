//! Piece catalogue - the alphabet a pattern is written over
//!
//! Catalogue order matters: it is the order `@` expands to. JSON catalogues
//! are therefore arrays of definitions rather than objects keyed by piece.

use serde::{Deserialize, Serialize};

use crate::error::ValidationError;
use crate::types::{is_allowed_piece_key, PieceDefinition, PieceKey};

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PieceCatalogue {
    pieces: Vec<PieceDefinition>,
}

impl PieceCatalogue {
    pub fn new(pieces: Vec<PieceDefinition>) -> Self {
        Self { pieces }
    }

    /// Load a catalogue from a JSON array of piece definitions
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    /// Piece keys in catalogue order
    pub fn keys(&self) -> Vec<PieceKey> {
        self.pieces.iter().map(|p| p.key).collect()
    }

    pub fn get(&self, key: PieceKey) -> Option<&PieceDefinition> {
        self.pieces.iter().find(|p| p.key == key)
    }

    pub fn position(&self, key: PieceKey) -> Option<usize> {
        self.pieces.iter().position(|p| p.key == key)
    }

    pub fn by_index(&self, index: usize) -> Option<&PieceDefinition> {
        self.pieces.get(index)
    }

    pub fn iter(&self) -> std::slice::Iter<'_, PieceDefinition> {
        self.pieces.iter()
    }

    pub fn len(&self) -> usize {
        self.pieces.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pieces.is_empty()
    }
}

impl FromIterator<PieceDefinition> for PieceCatalogue {
    fn from_iter<I: IntoIterator<Item = PieceDefinition>>(iter: I) -> Self {
        Self::new(iter.into_iter().collect())
    }
}

impl<'a> IntoIterator for &'a PieceCatalogue {
    type Item = &'a PieceDefinition;
    type IntoIter = std::slice::Iter<'a, PieceDefinition>;

    fn into_iter(self) -> Self::IntoIter {
        self.pieces.iter()
    }
}

/// Check a catalogue before any generator is allowed to run on it.
///
/// Reports the first offending piece.
pub fn validate_catalogue(catalogue: &PieceCatalogue) -> Result<(), ValidationError> {
    if catalogue.is_empty() {
        return Err(ValidationError::EmptyCatalogue);
    }

    for (i, piece) in catalogue.iter().enumerate() {
        let key = piece.key;

        if !is_allowed_piece_key(key) {
            return Err(ValidationError::InvalidPieceKey { key });
        }
        if catalogue.pieces[..i].iter().any(|p| p.key == key) {
            return Err(ValidationError::DuplicatePieceKey { key });
        }

        let offset = piece.spawn_offset;
        if !offset.is_integral() {
            return Err(ValidationError::NonIntegerSpawnOffset {
                key,
                x: offset.x,
                y: offset.y,
            });
        }

        validate_shape(piece)?;
    }

    Ok(())
}

fn validate_shape(piece: &PieceDefinition) -> Result<(), ValidationError> {
    let key = piece.key;
    let shape = &piece.shape;

    for (index, block) in shape.blocks.iter().enumerate() {
        if !block.is_grid_center() {
            return Err(ValidationError::OffGridBlock {
                key,
                index,
                x: block.x,
                y: block.y,
            });
        }
    }

    let pivot = shape.rotation_pivot;
    if !pivot.is_grid_center() && !pivot.is_lattice_point() {
        return Err(ValidationError::InvalidPivot {
            key,
            x: pivot.x,
            y: pivot.y,
        });
    }

    if let Some(origin) = shape.origin {
        if !origin.is_grid_center() {
            return Err(ValidationError::InvalidOrigin {
                key,
                x: origin.x,
                y: origin.y,
            });
        }
    }

    Ok(())
}
