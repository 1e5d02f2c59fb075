//! Lexer for the Bag-Pattern language.
//!
//! Converts a pattern string into a flat stream of [`Token`]s in a single
//! left-to-right pass. Whitespace is stripped before scanning, so it neither
//! produces tokens nor separates them (`"1 0"` is the number 10).

use std::fmt;

use serde::Serialize;

use crate::error::{LexError, LexResult};
use crate::types::PieceKey;

/// A token produced by the lexer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(tag = "type", content = "value")]
pub enum Token {
    /// Non-negative base-10 integer
    #[serde(rename = "NUMBER")]
    Number(u32),
    /// A piece key from the catalogue's alphabet
    #[serde(rename = "PIECE")]
    Piece(PieceKey),
    #[serde(rename = "@")]
    At,
    #[serde(rename = "*")]
    Star,
    #[serde(rename = ":")]
    Colon,
    #[serde(rename = "~")]
    Tilde,
    #[serde(rename = "[")]
    LBracket,
    #[serde(rename = "]")]
    RBracket,
    #[serde(rename = "(")]
    LParen,
    #[serde(rename = ")")]
    RParen,
}

impl Token {
    /// Map one of the eight punctuation characters to its token
    pub fn symbol(c: char) -> Option<Self> {
        match c {
            '@' => Some(Token::At),
            '*' => Some(Token::Star),
            ':' => Some(Token::Colon),
            '~' => Some(Token::Tilde),
            '[' => Some(Token::LBracket),
            ']' => Some(Token::RBracket),
            '(' => Some(Token::LParen),
            ')' => Some(Token::RParen),
            _ => None,
        }
    }
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Token::Number(n) => write!(f, "{n}"),
            Token::Piece(key) => write!(f, "{key}"),
            Token::At => f.write_str("@"),
            Token::Star => f.write_str("*"),
            Token::Colon => f.write_str(":"),
            Token::Tilde => f.write_str("~"),
            Token::LBracket => f.write_str("["),
            Token::RBracket => f.write_str("]"),
            Token::LParen => f.write_str("("),
            Token::RParen => f.write_str(")"),
        }
    }
}

/// Tokenize `pattern` against the alphabet `piece_keys`.
///
/// Error positions are character indices into `pattern` as written.
pub fn tokenize(pattern: &str, piece_keys: &[PieceKey]) -> LexResult<Vec<Token>> {
    Lexer::new(pattern, piece_keys).tokenize()
}

struct Lexer<'a> {
    /// Non-whitespace characters paired with their index in the input
    chars: Vec<(usize, char)>,
    pos: usize,
    piece_keys: &'a [PieceKey],
}

impl<'a> Lexer<'a> {
    fn new(pattern: &str, piece_keys: &'a [PieceKey]) -> Self {
        Self {
            chars: pattern
                .chars()
                .enumerate()
                .filter(|(_, c)| !c.is_whitespace())
                .collect(),
            pos: 0,
            piece_keys,
        }
    }

    fn tokenize(mut self) -> LexResult<Vec<Token>> {
        let mut tokens = Vec::with_capacity(self.chars.len());

        while let Some(ch) = self.peek() {
            if let Some(token) = Token::symbol(ch) {
                tokens.push(token);
                self.pos += 1;
                continue;
            }

            if ch.is_ascii_digit() {
                tokens.push(self.lex_number()?);
                continue;
            }

            if self.piece_keys.contains(&ch) {
                tokens.push(Token::Piece(ch));
                self.pos += 1;
                continue;
            }

            return Err(LexError::UnexpectedCharacter {
                character: ch,
                position: self.source_index(),
            });
        }

        Ok(tokens)
    }

    fn peek(&self) -> Option<char> {
        self.chars.get(self.pos).map(|&(_, c)| c)
    }

    fn source_index(&self) -> usize {
        self.chars.get(self.pos).map_or(0, |&(i, _)| i)
    }

    /// Greedy digit run
    fn lex_number(&mut self) -> LexResult<Token> {
        let position = self.source_index();
        let start = self.pos;
        while self.peek().is_some_and(|c| c.is_ascii_digit()) {
            self.pos += 1;
        }

        let literal: String = self.chars[start..self.pos].iter().map(|&(_, c)| c).collect();
        literal
            .parse::<u32>()
            .map(Token::Number)
            .map_err(|_| LexError::NumberOverflow { literal, position })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const KEYS: [char; 7] = ['T', 'I', 'O', 'L', 'J', 'S', 'Z'];

    #[test]
    fn test_tokenize_random_group_with_pick_count() {
        let tokens = tokenize("[@:6](@)*2", &KEYS).unwrap();
        assert_eq!(
            tokens,
            vec![
                Token::LBracket,
                Token::At,
                Token::Colon,
                Token::Number(6),
                Token::RBracket,
                Token::LParen,
                Token::At,
                Token::RParen,
                Token::Star,
                Token::Number(2),
            ]
        );
    }

    #[test]
    fn test_tokenize_skips_whitespace() {
        let tokens = tokenize("TIO*100 LJSZ~", &KEYS).unwrap();
        assert_eq!(
            tokens,
            vec![
                Token::Piece('T'),
                Token::Piece('I'),
                Token::Piece('O'),
                Token::Star,
                Token::Number(100),
                Token::Piece('L'),
                Token::Piece('J'),
                Token::Piece('S'),
                Token::Piece('Z'),
                Token::Tilde,
            ]
        );
    }

    #[test]
    fn test_tokenize_nested_groups() {
        let tokens = tokenize("[(OT)(IT)]", &KEYS).unwrap();
        assert_eq!(tokens.len(), 10);
        assert_eq!(tokens[0], Token::LBracket);
        assert_eq!(tokens[1], Token::LParen);
        assert_eq!(tokens[9], Token::RBracket);
    }

    #[test]
    fn test_tokenize_rejects_unknown_piece() {
        let err = tokenize("TIO X LJSZ", &KEYS).unwrap_err();
        assert_eq!(
            err,
            LexError::UnexpectedCharacter {
                character: 'X',
                position: 4
            }
        );
    }

    #[test]
    fn test_tokenize_leading_zeros() {
        assert_eq!(tokenize("007", &KEYS).unwrap(), vec![Token::Number(7)]);
    }

    #[test]
    fn test_tokenize_number_overflow() {
        let err = tokenize("T*99999999999", &KEYS).unwrap_err();
        assert!(matches!(err, LexError::NumberOverflow { position: 2, .. }));
    }

    #[test]
    fn test_tokenize_digits_join_across_whitespace() {
        assert_eq!(
            tokenize("T * 1 0", &KEYS).unwrap(),
            vec![Token::Piece('T'), Token::Star, Token::Number(10)]
        );
    }

    #[test]
    fn test_tokenize_empty() {
        assert!(tokenize("  \t\n", &KEYS).unwrap().is_empty());
    }
}
