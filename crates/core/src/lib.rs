//! Bag-Pattern engine - pure, deterministic, and testable
//!
//! This crate turns a compact pattern string into an unbounded, on-demand
//! sequence of piece keys ("the bag"). It has **zero dependencies** on UI,
//! networking, or I/O, making it:
//!
//! - **Deterministic**: a seeded [`SimpleRng`] reproduces the same sequence
//! - **Testable**: randomness is injected, so tests script every shuffle
//! - **Lazy**: pieces are resolved only when [`BagGenerator::pick`] or
//!   [`BagGenerator::peek`] needs them
//!
//! # Module Structure
//!
//! - [`lexer`]: pattern string to token stream
//! - [`parser`]: recursive-descent parser producing the [`ast`]
//! - [`catalogue`]: the piece alphabet and its validator
//! - [`bag`]: the explicit-stack traversal engine
//! - [`rng`]: the [`Shuffle`] primitive and a seedable LCG
//! - [`presets`]: the standard seven-piece catalogue
//!
//! # Pattern Language
//!
//! | Pattern | Produces |
//! |---------|----------|
//! | `@` | every key in catalogue order |
//! | `TIO*2` | `T I O O` |
//! | `(TI)*2` | `T I T I` |
//! | `[@]` | one shuffled bag, then nothing |
//! | `[@]~` | shuffled bags forever |
//! | `[@:3]` | the first three keys of a shuffled bag |
//!
//! # Example
//!
//! ```
//! use bag_pattern_core::{presets, BagGenerator};
//!
//! let mut bag = BagGenerator::with_seed(presets::standard(), "[@]~", 12345).unwrap();
//!
//! // Peeking does not consume
//! let preview = bag.peek_keys(14).unwrap();
//! assert_eq!(preview.len(), 14);
//! assert_eq!(bag.pick_key().unwrap(), preview[0]);
//!
//! // Every 7-piece window aligned to a bag holds each piece once
//! let mut first_bag = preview[..7].to_vec();
//! first_bag.sort_unstable();
//! assert_eq!(first_bag, vec!['I', 'J', 'L', 'O', 'S', 'T', 'Z']);
//! ```

pub mod ast;
pub mod bag;
pub mod catalogue;
pub mod error;
pub mod lexer;
pub mod parser;
pub mod presets;
pub mod rng;

pub use bag_pattern_types as types;

// Re-export commonly used types for convenience
pub use ast::{Node, Pattern};
pub use bag::{BagGenerator, PieceBag};
pub use catalogue::{validate_catalogue, PieceCatalogue};
pub use error::{BagError, BuildError, LexError, ParseError, PatternError, ValidationError};
pub use lexer::{tokenize, Token};
pub use parser::{parse, Parser};
pub use rng::{Identity, Shuffle, SimpleRng};
