//! Recursive-descent parser for Bag-Pattern.
//!
//! ```text
//! pattern      = sequence, ["~"] ;
//! sequence     = { element } ;
//! element      = (group | random_group | piece), ["*", NUMBER] ;
//! group        = "(", sequence, ")" ;
//! random_group = "[", sequence, [":", NUMBER], "]" ;
//! piece        = PIECE | "@" ;
//! ```
//!
//! `@` is a textual macro: it expands to one piece node per catalogue key.
//! A `*N` suffix is applied to every node its element expanded into, so
//! `@*2` doubles each piece rather than the whole alphabet.

use crate::ast::{Node, Pattern};
use crate::error::{ParseError, ParseResult, PatternError};
use crate::lexer::{tokenize, Token};
use crate::types::PieceKey;

/// Tokenize and parse `pattern` over the alphabet `piece_keys`.
pub fn parse(pattern: &str, piece_keys: &[PieceKey]) -> Result<Pattern, PatternError> {
    let tokens = tokenize(pattern, piece_keys)?;
    Ok(Parser::new(&tokens, piece_keys).parse()?)
}

pub struct Parser<'a> {
    tokens: &'a [Token],
    pos: usize,
    piece_keys: &'a [PieceKey],
}

impl<'a> Parser<'a> {
    pub fn new(tokens: &'a [Token], piece_keys: &'a [PieceKey]) -> Self {
        Self {
            tokens,
            pos: 0,
            piece_keys,
        }
    }

    /// Parse the whole token stream. Leftover tokens are an error.
    pub fn parse(mut self) -> ParseResult<Pattern> {
        let children = self.sequence()?;
        if children.is_empty() {
            return Err(self.unexpected("an element"));
        }

        let repeat_last_element = self.accept(Token::Tilde);

        if self.peek().is_some() {
            let expected = if repeat_last_element {
                "end of pattern"
            } else {
                "an element, '~' or end of pattern"
            };
            return Err(self.unexpected(expected));
        }

        Ok(Pattern {
            children,
            repeat_last_element,
        })
    }

    // UTILS //

    fn peek(&self) -> Option<Token> {
        self.tokens.get(self.pos).copied()
    }

    /// Consume the next token if it equals `token`
    fn accept(&mut self, token: Token) -> bool {
        let accepted = self.peek() == Some(token);
        if accepted {
            self.pos += 1;
        }
        accepted
    }

    fn unexpected(&self, expected: &'static str) -> ParseError {
        ParseError::UnexpectedToken {
            position: self.pos,
            expected,
            found: self.peek(),
        }
    }

    /// A NUMBER token that must be at least 1
    fn count(&mut self, what: &'static str) -> ParseResult<u32> {
        let position = self.pos;
        match self.peek() {
            Some(Token::Number(0)) => Err(ParseError::ZeroCount { position, what }),
            Some(Token::Number(n)) => {
                self.pos += 1;
                Ok(n)
            }
            _ => Err(self.unexpected("NUMBER")),
        }
    }

    // GRAMMAR //

    /// Zero or more elements, flattened (`@` yields several nodes)
    fn sequence(&mut self) -> ParseResult<Vec<Node>> {
        let mut nodes = Vec::new();
        while let Some(element) = self.element()? {
            nodes.extend(element);
        }
        Ok(nodes)
    }

    fn element(&mut self) -> ParseResult<Option<Vec<Node>>> {
        let nodes = match self.peek() {
            Some(Token::LParen) => vec![self.group()?],
            Some(Token::LBracket) => vec![self.random_group()?],
            Some(Token::At) => {
                self.pos += 1;
                self.piece_keys.iter().copied().map(Node::piece).collect()
            }
            Some(Token::Piece(key)) => {
                self.pos += 1;
                vec![Node::piece(key)]
            }
            _ => return Ok(None),
        };

        if !self.accept(Token::Star) {
            return Ok(Some(nodes));
        }
        let repeat = self.count("repeat count")?;
        Ok(Some(
            nodes.into_iter().map(|node| node.with_repeat(repeat)).collect(),
        ))
    }

    fn group(&mut self) -> ParseResult<Node> {
        self.pos += 1; // (

        let children = self.sequence()?;
        if children.is_empty() {
            return Err(self.unexpected("an element"));
        }

        if !self.accept(Token::RParen) {
            return Err(self.unexpected("')'"));
        }

        Ok(Node::group(children))
    }

    fn random_group(&mut self) -> ParseResult<Node> {
        self.pos += 1; // [

        let children = self.sequence()?;
        if children.is_empty() {
            return Err(self.unexpected("an element"));
        }

        let mut pick_count = children.len() as u32;
        let has_pick_count = self.accept(Token::Colon);
        if has_pick_count {
            let position = self.pos;
            pick_count = self.count("pick count")?;
            if pick_count as usize > children.len() {
                return Err(ParseError::PickCountTooLarge {
                    position,
                    pick_count,
                    children: children.len(),
                });
            }
        }

        if !self.accept(Token::RBracket) {
            let expected = if has_pick_count { "']'" } else { "':' or ']'" };
            return Err(self.unexpected(expected));
        }

        Ok(Node::random_group(children).with_pick_count(pick_count))
    }
}
