//! Terminal output for generated sequences.
//!
//! Builds crossterm command sequences into a byte buffer without touching
//! stdout, so the same encoder serves the binary and the tests.

use anyhow::Result;
use crossterm::{
    style::{Attribute, Color, Print, ResetColor, SetAttribute, SetForegroundColor},
    QueueableCommand,
};
use serde::Serialize;

use crate::types::PieceKey;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Rgb {
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }
}

/// Guideline colour for a standard piece key; other keys render plain.
pub fn piece_color(key: PieceKey) -> Option<Rgb> {
    match key {
        'I' => Some(Rgb::new(80, 220, 220)),
        'O' => Some(Rgb::new(240, 220, 80)),
        'T' => Some(Rgb::new(200, 120, 220)),
        'S' => Some(Rgb::new(100, 220, 120)),
        'Z' => Some(Rgb::new(220, 80, 80)),
        'J' => Some(Rgb::new(80, 120, 220)),
        'L' => Some(Rgb::new(255, 165, 0)),
        _ => None,
    }
}

/// Encode `keys` as one space-separated line into `out`.
pub fn encode_keys_into(keys: &[PieceKey], colored: bool, out: &mut Vec<u8>) -> Result<()> {
    for (i, &key) in keys.iter().enumerate() {
        if i > 0 {
            out.queue(Print(' '))?;
        }
        match piece_color(key).filter(|_| colored) {
            Some(rgb) => {
                out.queue(SetForegroundColor(rgb_to_color(rgb)))?;
                out.queue(SetAttribute(Attribute::Bold))?;
                out.queue(Print(key))?;
                out.queue(SetAttribute(Attribute::Reset))?;
                out.queue(ResetColor)?;
            }
            None => {
                out.queue(Print(key))?;
            }
        }
    }
    out.queue(Print('\n'))?;
    Ok(())
}

/// `--json` report
#[derive(Debug, Clone, Serialize)]
pub struct SequenceReport<'a> {
    pub pattern: &'a str,
    pub seed: u32,
    /// Pieces in one full pass, `None` for a looping pattern
    pub length: Option<u64>,
    pub pieces: Vec<String>,
    /// The pattern can produce no more pieces
    pub exhausted: bool,
}

pub fn encode_report_into(report: &SequenceReport<'_>, out: &mut Vec<u8>) -> Result<()> {
    serde_json::to_writer(&mut *out, report)?;
    out.push(b'\n');
    Ok(())
}

fn rgb_to_color(rgb: Rgb) -> Color {
    Color::Rgb {
        r: rgb.r,
        g: rgb.g,
        b: rgb.b,
    }
}
