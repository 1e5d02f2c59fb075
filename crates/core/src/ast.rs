//! Bag-Pattern syntax tree.

use std::fmt;

use serde::Serialize;

use crate::types::PieceKey;

/// A repeatable node of the pattern tree
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type", rename_all = "kebab-case")]
pub enum Node {
    /// Emit `value` `repeat` times in a row
    Piece { value: PieceKey, repeat: u32 },
    /// Replay `children` in order, `repeat` times
    Group { children: Vec<Node>, repeat: u32 },
    /// Visit the first `pick_count` children of a fresh permutation, `repeat` times
    RandomGroup {
        children: Vec<Node>,
        pick_count: u32,
        repeat: u32,
    },
}

impl Node {
    pub fn piece(value: PieceKey) -> Self {
        Node::Piece { value, repeat: 1 }
    }

    pub fn group(children: Vec<Node>) -> Self {
        Node::Group {
            children,
            repeat: 1,
        }
    }

    /// Random group drawing every child
    pub fn random_group(children: Vec<Node>) -> Self {
        let pick_count = children.len() as u32;
        Node::RandomGroup {
            children,
            pick_count,
            repeat: 1,
        }
    }

    pub fn repeat(&self) -> u32 {
        match self {
            Node::Piece { repeat, .. }
            | Node::Group { repeat, .. }
            | Node::RandomGroup { repeat, .. } => *repeat,
        }
    }

    pub fn with_repeat(mut self, count: u32) -> Self {
        self.set_repeat(count);
        self
    }

    pub fn with_pick_count(mut self, count: u32) -> Self {
        if let Node::RandomGroup { pick_count, .. } = &mut self {
            *pick_count = count;
        }
        self
    }

    pub(crate) fn set_repeat(&mut self, count: u32) {
        match self {
            Node::Piece { repeat, .. }
            | Node::Group { repeat, .. }
            | Node::RandomGroup { repeat, .. } => *repeat = count,
        }
    }
}

/// Top-level container of a parsed pattern
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Pattern {
    pub children: Vec<Node>,
    /// Trailing `~`: loop the last top-level element forever
    pub repeat_last_element: bool,
}

impl Pattern {
    /// Whether the sequence this pattern produces is unbounded
    pub fn is_infinite(&self) -> bool {
        self.repeat_last_element
    }

    /// Number of keys one pass produces, `None` when unbounded
    pub fn finite_len(&self) -> Option<u64> {
        if self.repeat_last_element {
            return None;
        }
        self.children
            .iter()
            .try_fold(0u64, |acc, node| acc.checked_add(emitted(node)?))
    }
}

fn emitted(node: &Node) -> Option<u64> {
    let once = match node {
        Node::Piece { .. } => 1,
        Node::Group { children, .. } => children
            .iter()
            .try_fold(0u64, |acc, child| acc.checked_add(emitted(child)?))?,
        // Which children are drawn is random, so only equal-sized children have a fixed length.
        Node::RandomGroup {
            children,
            pick_count,
            ..
        } => {
            let sizes = children.iter().map(emitted).collect::<Option<Vec<_>>>()?;
            let first = *sizes.first()?;
            if sizes.iter().any(|&s| s != first) && (*pick_count as usize) < sizes.len() {
                return None;
            }
            if (*pick_count as usize) == sizes.len() {
                sizes.iter().try_fold(0u64, |acc, &s| acc.checked_add(s))?
            } else {
                first.checked_mul(u64::from(*pick_count))?
            }
        }
    };
    once.checked_mul(u64::from(node.repeat()))
}

impl fmt::Display for Node {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Node::Piece { value, .. } => write!(f, "{value}")?,
            Node::Group { children, .. } => {
                f.write_str("(")?;
                for child in children {
                    write!(f, "{child}")?;
                }
                f.write_str(")")?;
            }
            Node::RandomGroup {
                children,
                pick_count,
                ..
            } => {
                f.write_str("[")?;
                for child in children {
                    write!(f, "{child}")?;
                }
                if *pick_count as usize != children.len() {
                    write!(f, ":{pick_count}")?;
                }
                f.write_str("]")?;
            }
        }
        if self.repeat() != 1 {
            write!(f, "*{}", self.repeat())?;
        }
        Ok(())
    }
}

/// Canonical form: `@` appears expanded, and every repeat is written per node.
impl fmt::Display for Pattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for child in &self.children {
            write!(f, "{child}")?;
        }
        if self.repeat_last_element {
            f.write_str("~")?;
        }
        Ok(())
    }
}
