//! Bag module - lazy Bag-Pattern traversal
//!
//! A [`BagGenerator`] compiles a parsed [`Pattern`] into an arena of slots and
//! walks it depth-first with an explicit stack of frames. The stack survives
//! between calls, so generation is pull-based: [`BagGenerator::pick`] and
//! [`BagGenerator::peek`] resolve only as many pieces as they need.
//!
//! # Traversal
//!
//! - The top frame always refers to a piece slot while generation is live.
//! - A piece is emitted `repeat` times before the stack moves.
//! - When a group runs out of positions it replays itself (`*N`), otherwise
//!   it is popped and its parent advances.
//! - A random group gets a fresh permutation every time it is entered and
//!   every time it replays; only the first `pick_count` positions are visited.
//! - At the root, `~` re-enters the last element instead of finishing.
//!
//! # Example
//!
//! ```
//! use bag_pattern_core::{presets, BagGenerator, Identity};
//!
//! let mut bag = BagGenerator::new(presets::standard(), "(TIO)*2LJ*2", Identity).unwrap();
//! assert_eq!(bag.peek_keys(9).unwrap(), "TIOTIOLJJ".chars().collect::<Vec<_>>());
//! assert_eq!(bag.pick().unwrap().key, 'T');
//! ```

use std::collections::VecDeque;
use std::fmt;

use crate::ast::{Node, Pattern};
use crate::catalogue::{validate_catalogue, PieceCatalogue};
use crate::error::{BagError, BagResult, BuildError};
use crate::parser::parse;
use crate::presets;
use crate::rng::{identity_order, Shuffle, SimpleRng};
use crate::types::{PieceDefinition, PieceKey};

/// Index into the slot arena
type SlotId = usize;

/// Slot 0 is always the root
const ROOT: SlotId = 0;

/// Compiled pattern node. Pieces hold a catalogue index instead of a key.
#[derive(Debug, Clone)]
enum Slot {
    Root {
        children: Vec<SlotId>,
        repeat_last_element: bool,
    },
    Piece {
        piece: usize,
        repeat: u32,
    },
    Group {
        children: Vec<SlotId>,
        repeat: u32,
    },
    RandomGroup {
        children: Vec<SlotId>,
        pick_count: usize,
        repeat: u32,
    },
}

/// Traversal state of one entered slot
#[derive(Debug, Clone)]
struct Frame {
    slot: SlotId,
    /// Visiting order of the slot's children (identity unless random)
    order: Vec<usize>,
    /// Position in `order` currently being visited
    current: usize,
    /// Completed replays of this slot
    repeat_count: u32,
}

/// The interface the rest of the game consumes
pub trait PieceBag {
    /// The catalogue every returned definition comes from
    fn pieces(&self) -> &PieceCatalogue;

    /// Piece keys in catalogue order
    fn piece_keys(&self) -> &[PieceKey];

    /// Consume the next piece
    fn pick(&mut self) -> BagResult<&PieceDefinition>;

    /// Look at up to `count` upcoming pieces without consuming them
    fn peek(&mut self, count: usize) -> BagResult<Vec<&PieceDefinition>>;
}

/// Bag-Pattern piece generator
pub struct BagGenerator<S: Shuffle = SimpleRng> {
    catalogue: PieceCatalogue,
    piece_keys: Vec<PieceKey>,
    pattern: Pattern,
    slots: Vec<Slot>,
    stack: Vec<Frame>,
    /// Resolved catalogue indices waiting to be picked
    buffer: VecDeque<usize>,
    shuffle: S,
}

impl BagGenerator<SimpleRng> {
    /// Generator shuffling with a seeded [`SimpleRng`]
    pub fn with_seed(
        catalogue: PieceCatalogue,
        pattern: &str,
        seed: u32,
    ) -> Result<Self, BuildError> {
        Self::new(catalogue, pattern, SimpleRng::new(seed))
    }

    /// Standard pieces, shuffled 7-bags forever
    pub fn standard(seed: u32) -> Result<Self, BuildError> {
        Self::with_seed(presets::standard(), presets::STANDARD_PATTERN, seed)
    }
}

impl<S: Shuffle> BagGenerator<S> {
    /// Validate `catalogue`, parse `pattern` over its keys and position the
    /// traversal on the first piece.
    pub fn new(catalogue: PieceCatalogue, pattern: &str, shuffle: S) -> Result<Self, BuildError> {
        validate_catalogue(&catalogue)?;
        let piece_keys = catalogue.keys();
        let pattern = parse(pattern, &piece_keys)?;

        let mut bag = Self {
            slots: Vec::new(),
            catalogue,
            piece_keys,
            pattern,
            stack: Vec::new(),
            buffer: VecDeque::new(),
            shuffle,
        };
        bag.compile()?;

        bag.push(ROOT);
        bag.descend()?;
        Ok(bag)
    }

    pub fn catalogue(&self) -> &PieceCatalogue {
        &self.catalogue
    }

    pub fn piece_keys(&self) -> &[PieceKey] {
        &self.piece_keys
    }

    /// The parsed pattern driving this generator
    pub fn pattern(&self) -> &Pattern {
        &self.pattern
    }

    /// Pieces resolved but not yet picked
    pub fn buffered(&self) -> usize {
        self.buffer.len()
    }

    /// The traversal has ended; only buffered pieces remain
    pub fn is_drained(&self) -> bool {
        self.stack.is_empty()
    }

    /// Nothing buffered and nothing left to generate
    pub fn is_exhausted(&self) -> bool {
        self.buffer.is_empty() && self.is_drained()
    }

    pub fn pick(&mut self) -> BagResult<&PieceDefinition> {
        self.refill(1)?;
        let index = self.buffer.pop_front().ok_or(BagError::Exhausted)?;
        self.definition(index)
    }

    /// Up to `count` upcoming pieces; fewer once a finite pattern runs out.
    pub fn peek(&mut self, count: usize) -> BagResult<Vec<&PieceDefinition>> {
        self.refill(count)?;
        self.buffer
            .iter()
            .take(count)
            .map(|&index| self.definition(index))
            .collect()
    }

    pub fn pick_key(&mut self) -> BagResult<PieceKey> {
        self.pick().map(|piece| piece.key)
    }

    pub fn peek_keys(&mut self, count: usize) -> BagResult<Vec<PieceKey>> {
        Ok(self.peek(count)?.into_iter().map(|piece| piece.key).collect())
    }

    fn definition(&self, index: usize) -> BagResult<&PieceDefinition> {
        self.catalogue
            .by_index(index)
            .ok_or(invariant("buffered index outside the catalogue"))
    }

    fn refill(&mut self, up_to: usize) -> BagResult<()> {
        while self.buffer.len() < up_to {
            match self.next_piece()? {
                Some(index) => self.buffer.push_back(index),
                None => break,
            }
        }
        Ok(())
    }

    // COMPILATION //

    fn compile(&mut self) -> Result<(), BuildError> {
        self.slots.push(Slot::Root {
            children: Vec::new(),
            repeat_last_element: self.pattern.repeat_last_element,
        });

        let nodes = self.pattern.children.clone();
        let children = self.compile_nodes(&nodes)?;
        if let Slot::Root { children: root, .. } = &mut self.slots[ROOT] {
            *root = children;
        }
        Ok(())
    }

    fn compile_nodes(&mut self, nodes: &[Node]) -> BagResult<Vec<SlotId>> {
        nodes.iter().map(|node| self.compile_node(node)).collect()
    }

    fn compile_node(&mut self, node: &Node) -> BagResult<SlotId> {
        let slot = match node {
            Node::Piece { value, repeat } => Slot::Piece {
                piece: self
                    .catalogue
                    .position(*value)
                    .ok_or(invariant("pattern references a key outside the catalogue"))?,
                repeat: *repeat,
            },
            Node::Group { children, repeat } => Slot::Group {
                children: self.compile_nodes(children)?,
                repeat: *repeat,
            },
            Node::RandomGroup {
                children,
                pick_count,
                repeat,
            } => Slot::RandomGroup {
                children: self.compile_nodes(children)?,
                pick_count: *pick_count as usize,
                repeat: *repeat,
            },
        };
        self.slots.push(slot);
        Ok(self.slots.len() - 1)
    }

    // TRAVERSAL //

    /// Enter `slot`, drawing a fresh order for random groups
    fn push(&mut self, slot: SlotId) {
        let order = match &self.slots[slot] {
            Slot::Piece { .. } => Vec::new(),
            Slot::Root { children, .. } | Slot::Group { children, .. } => {
                identity_order(children.len())
            }
            Slot::RandomGroup { children, .. } => {
                let mut order = identity_order(children.len());
                self.shuffle.shuffle(&mut order);
                order
            }
        };
        self.stack.push(Frame {
            slot,
            order,
            current: 0,
            repeat_count: 0,
        });
    }

    /// Push the child at the current position until a piece is on top
    fn descend(&mut self) -> BagResult<()> {
        loop {
            let top = self.stack.last().ok_or(invariant("descending an empty stack"))?;
            let child = match &self.slots[top.slot] {
                Slot::Piece { .. } => return Ok(()),
                Slot::Root { children, .. }
                | Slot::Group { children, .. }
                | Slot::RandomGroup { children, .. } => top
                    .order
                    .get(top.current)
                    .and_then(|&index| children.get(index))
                    .copied()
                    .ok_or(invariant("frame position outside its children"))?,
            };
            self.push(child);
        }
    }

    /// Emit the key under the top frame and advance past it
    fn next_piece(&mut self) -> BagResult<Option<usize>> {
        let Some(top) = self.stack.last() else {
            return Ok(None);
        };
        let Slot::Piece { piece, .. } = self.slots[top.slot] else {
            return Err(invariant("top frame is not a piece"));
        };
        self.step()?;
        Ok(Some(piece))
    }

    fn step(&mut self) -> BagResult<()> {
        // Same piece again while its repeat lasts; the stack stays put.
        {
            let top = self.stack.last_mut().ok_or(invariant("stepping an empty stack"))?;
            let Slot::Piece { repeat, .. } = self.slots[top.slot] else {
                return Err(invariant("top frame is not a piece"));
            };
            if top.repeat_count + 1 < repeat {
                top.repeat_count += 1;
                return Ok(());
            }
        }
        self.stack.pop();

        // Unwind to the nearest frame that can move on.
        loop {
            let Some(top) = self.stack.last_mut() else {
                return Ok(());
            };
            match &self.slots[top.slot] {
                Slot::Piece { .. } => {
                    return Err(invariant("piece frame below the top of the stack"));
                }
                Slot::Root {
                    children,
                    repeat_last_element,
                } => {
                    if top.current + 1 < children.len() {
                        top.current += 1;
                        break;
                    }
                    if *repeat_last_element {
                        // re-enter the last element
                        break;
                    }
                    self.stack.clear();
                    return Ok(());
                }
                Slot::Group { children, repeat } => {
                    if top.current + 1 < children.len() {
                        top.current += 1;
                        break;
                    }
                    if top.repeat_count + 1 < *repeat {
                        top.repeat_count += 1;
                        top.current = 0;
                        break;
                    }
                }
                Slot::RandomGroup {
                    children,
                    pick_count,
                    repeat,
                } => {
                    if top.current + 1 < (*pick_count).min(children.len()) {
                        top.current += 1;
                        break;
                    }
                    if top.repeat_count + 1 < *repeat {
                        top.repeat_count += 1;
                        top.current = 0;
                        redraw(&mut self.shuffle, &mut top.order);
                        break;
                    }
                }
            }
            self.stack.pop();
        }

        self.descend()
    }
}

/// Replace `order` with a fresh draw over the same indices
fn redraw<S: Shuffle>(shuffle: &mut S, order: &mut [usize]) {
    for (i, slot) in order.iter_mut().enumerate() {
        *slot = i;
    }
    shuffle.shuffle(order);
}

fn invariant(message: &'static str) -> BagError {
    BagError::InvariantViolation { message }
}

impl<S: Shuffle> PieceBag for BagGenerator<S> {
    fn pieces(&self) -> &PieceCatalogue {
        &self.catalogue
    }

    fn piece_keys(&self) -> &[PieceKey] {
        &self.piece_keys
    }

    fn pick(&mut self) -> BagResult<&PieceDefinition> {
        BagGenerator::pick(self)
    }

    fn peek(&mut self, count: usize) -> BagResult<Vec<&PieceDefinition>> {
        BagGenerator::peek(self, count)
    }
}

impl<S: Shuffle> fmt::Debug for BagGenerator<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BagGenerator")
            .field("pattern", &self.pattern.to_string())
            .field("piece_keys", &self.piece_keys)
            .field("depth", &self.stack.len())
            .field("buffered", &self.buffer.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::{PatternError, ValidationError};
    use crate::rng::Identity;
    use crate::types::{PieceShape, SpawnOffset};

    fn reverse(order: &mut [usize]) {
        order.reverse();
    }

    fn keys(s: &str) -> Vec<char> {
        s.chars().collect()
    }

    #[test]
    fn test_initial_descent_reaches_first_leaf() {
        let bag = BagGenerator::new(presets::standard(), "((([TI])))", Identity).unwrap();
        // root, three groups, the random group, the piece
        assert_eq!(bag.stack.len(), 6);
        assert_eq!(bag.buffered(), 0);
    }

    #[test]
    fn test_piece_repeat_does_not_move_stack() {
        let mut bag = BagGenerator::new(presets::standard(), "(T*3I)", Identity).unwrap();
        let depth = bag.stack.len();
        bag.refill(2).unwrap();
        assert_eq!(bag.stack.len(), depth);
        assert_eq!(bag.peek_keys(4).unwrap(), keys("TTTI"));
    }

    #[test]
    fn test_finite_pattern_clears_stack() {
        let mut bag = BagGenerator::new(presets::standard(), "TI", Identity).unwrap();
        assert_eq!(bag.peek_keys(5).unwrap(), keys("TI"));
        assert!(bag.stack.is_empty());
        assert!(bag.is_drained());
        assert!(!bag.is_exhausted());

        assert_eq!(bag.pick_key().unwrap(), 'T');
        assert_eq!(bag.pick_key().unwrap(), 'I');
        assert!(bag.is_exhausted());
        assert_eq!(bag.pick_key(), Err(BagError::Exhausted));
        assert_eq!(bag.pick_key(), Err(BagError::Exhausted));
        assert!(bag.peek(3).unwrap().is_empty());
    }

    #[test]
    fn test_random_group_replay_redraws() {
        let mut calls = 0u32;
        let rotate = move |order: &mut [usize]| {
            calls += 1;
            order.rotate_left(calls as usize % order.len());
        };
        let mut bag = BagGenerator::new(presets::standard(), "[TIO]*2", rotate).unwrap();
        // first draw rotates by 1, the replay by 2
        assert_eq!(bag.peek_keys(7).unwrap(), keys("IOTOTI"));
    }

    #[test]
    fn test_pick_count_truncates() {
        let mut bag = BagGenerator::new(presets::standard(), "[@:3]*2[@]", reverse).unwrap();
        assert_eq!(bag.peek_keys(20).unwrap(), keys("ZSJZSJZSJLOIT"));
    }

    #[test]
    fn test_nested_random_groups() {
        let mut scripted = |order: &mut [usize]| {
            let drawn: Vec<usize> = [2, 0, 1].iter().map(|&i| order[i]).collect();
            order.copy_from_slice(&drawn);
        };
        let mut bag =
            BagGenerator::new(presets::standard(), "[[OTS][ITS][JTS]:2]", &mut scripted).unwrap();
        assert_eq!(bag.peek_keys(10).unwrap(), keys("SJTSOT"));
    }

    #[test]
    fn test_loop_replays_last_element_only() {
        let mut bag = BagGenerator::new(presets::standard(), "TIO*2 LJSZ~", Identity).unwrap();
        assert_eq!(bag.peek_keys(12).unwrap(), keys("TIOOLJSZZZZZ"));
    }

    #[test]
    fn test_seeded_bags_are_permutations() {
        let mut bag = BagGenerator::standard(99).unwrap();
        for _ in 0..10 {
            let mut cycle = bag.peek_keys(7).unwrap();
            for _ in 0..7 {
                bag.pick().unwrap();
            }
            cycle.sort_unstable();
            assert_eq!(cycle, keys("IJLOSTZ"));
        }
    }

    #[test]
    fn test_construction_errors() {
        assert!(matches!(
            BagGenerator::new(presets::standard(), "TIO X", Identity),
            Err(BuildError::Pattern(PatternError::Lex(_)))
        ));
        assert!(matches!(
            BagGenerator::new(presets::standard(), "(T", Identity),
            Err(BuildError::Pattern(PatternError::Parse(_)))
        ));

        let bad = PieceCatalogue::new(vec![PieceDefinition::new(
            'T',
            PieceShape::from_blocks(&[(0.0, 0.0)], (0.0, 0.0)),
            SpawnOffset::new(0.5, 0.0),
        )]);
        assert!(matches!(
            BagGenerator::new(bad, "T", Identity),
            Err(BuildError::Validation(ValidationError::NonIntegerSpawnOffset { key: 'T', .. }))
        ));
    }

    #[test]
    fn test_piece_bag_trait_object() {
        let mut bag: Box<dyn PieceBag> =
            Box::new(BagGenerator::new(presets::standard(), "@", Identity).unwrap());
        assert_eq!(bag.piece_keys(), &keys("TIOLJSZ")[..]);
        assert_eq!(bag.pieces().len(), 7);
        assert_eq!(bag.pick().unwrap().key, 'T');
        assert_eq!(bag.peek(2).unwrap().len(), 2);
    }
}
