//! Error types, one enum per phase.
//!
//! Lex, parse and validation errors abort construction of a generator.
//! [`BagError`] is what `pick`/`peek` can return afterwards.

use thiserror::Error;

use crate::lexer::Token;
use crate::types::PieceKey;

#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum LexError {
    /// `position` is a char index into the pattern as written, whitespace included
    #[error("Bag-Pattern lexing failed at index {position} ({character:?})")]
    UnexpectedCharacter { character: char, position: usize },
    #[error("Number literal '{literal}' at index {position} does not fit in 32 bits")]
    NumberOverflow { literal: String, position: usize },
}

#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ParseError {
    #[error("At token {position}: expected {expected}, but the next token was {}", describe(.found))]
    UnexpectedToken {
        position: usize,
        expected: &'static str,
        found: Option<Token>,
    },
    #[error("At token {position}: {what} must be at least 1")]
    ZeroCount {
        position: usize,
        what: &'static str,
    },
    #[error("At token {position}: pick count {pick_count} exceeds the {children} element(s) of the random group")]
    PickCountTooLarge {
        position: usize,
        pick_count: u32,
        children: usize,
    },
}

fn describe(found: &Option<Token>) -> String {
    match found {
        Some(token) => format!("'{token}'"),
        None => "end of pattern".to_string(),
    }
}

/// Lexing or parsing failed
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum PatternError {
    #[error(transparent)]
    Lex(#[from] LexError),
    #[error(transparent)]
    Parse(#[from] ParseError),
}

#[derive(Debug, Clone, Error, PartialEq)]
pub enum ValidationError {
    #[error("Piece catalogue is empty")]
    EmptyCatalogue,
    #[error("Invalid piece key {key:?}: must be visible ASCII, not a digit or one of @*:~[]()")]
    InvalidPieceKey { key: PieceKey },
    #[error("Duplicate piece key {key:?}")]
    DuplicatePieceKey { key: PieceKey },
    #[error("Invalid spawnOffset of pieces[{key}]: ({x}, {y}). Both must be integers.")]
    NonIntegerSpawnOffset { key: PieceKey, x: f64, y: f64 },
    #[error("Invalid coordinate of pieces[{key}].blocks[{index}]: ({x}, {y}). It must be at the grid centers like (0, 0).")]
    OffGridBlock {
        key: PieceKey,
        index: usize,
        x: f64,
        y: f64,
    },
    #[error("Invalid rotationPivot of pieces[{key}]: ({x}, {y}). It must be at the grid centers like (0, 0) or on lattice points like (0.5, 0.5).")]
    InvalidPivot { key: PieceKey, x: f64, y: f64 },
    #[error("Invalid origin of pieces[{key}]: ({x}, {y}). It must be at the grid centers like (0, 0).")]
    InvalidOrigin { key: PieceKey, x: f64, y: f64 },
}

/// Generator construction failed; nothing usable was built
#[derive(Debug, Clone, Error, PartialEq)]
pub enum BuildError {
    #[error(transparent)]
    Pattern(#[from] PatternError),
    #[error(transparent)]
    Validation(#[from] ValidationError),
    #[error(transparent)]
    Internal(#[from] BagError),
}

impl From<LexError> for BuildError {
    fn from(e: LexError) -> Self {
        BuildError::Pattern(e.into())
    }
}

impl From<ParseError> for BuildError {
    fn from(e: ParseError) -> Self {
        BuildError::Pattern(e.into())
    }
}

#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum BagError {
    /// A finite pattern has produced every piece it ever will
    #[error("Bag-Pattern sequence is exhausted")]
    Exhausted,
    #[error("Bag traversal invariant violated: {message}")]
    InvariantViolation { message: &'static str },
}

impl BagError {
    pub fn is_exhausted(&self) -> bool {
        matches!(self, BagError::Exhausted)
    }
}

pub type LexResult<T> = Result<T, LexError>;
pub type ParseResult<T> = Result<T, ParseError>;
pub type BagResult<T> = Result<T, BagError>;
