//! Built-in catalogues.

use crate::catalogue::PieceCatalogue;
use crate::types::{PieceDefinition, PieceShape, SpawnOffset, DEFAULT_SPAWN_ROW};

/// Standard-guideline bag pattern: shuffled 7-bags, forever
pub const STANDARD_PATTERN: &str = "[@]~";

/// The seven tetrominoes in `T I O L J S Z` order.
///
/// Blocks use y-up coordinates; every piece but O spawns at column 3.
pub fn standard() -> PieceCatalogue {
    let spawn = |x: f64| SpawnOffset::new(x, DEFAULT_SPAWN_ROW);

    PieceCatalogue::new(vec![
        PieceDefinition::new(
            'T',
            PieceShape::from_blocks(&[(0.0, 0.0), (1.0, 0.0), (2.0, 0.0), (1.0, 1.0)], (1.0, 0.0)),
            spawn(3.0),
        ),
        PieceDefinition::new(
            'I',
            PieceShape::from_blocks(&[(0.0, 0.0), (1.0, 0.0), (2.0, 0.0), (3.0, 0.0)], (1.5, -0.5)),
            spawn(3.0),
        ),
        PieceDefinition::new(
            'O',
            PieceShape::from_blocks(&[(0.0, 0.0), (1.0, 0.0), (0.0, 1.0), (1.0, 1.0)], (0.5, 0.5)),
            spawn(4.0),
        ),
        PieceDefinition::new(
            'L',
            PieceShape::from_blocks(&[(0.0, 0.0), (1.0, 0.0), (2.0, 0.0), (2.0, 1.0)], (1.0, 0.0)),
            spawn(3.0),
        ),
        PieceDefinition::new(
            'J',
            PieceShape::from_blocks(&[(0.0, 0.0), (1.0, 0.0), (2.0, 0.0), (0.0, 1.0)], (1.0, 0.0)),
            spawn(3.0),
        ),
        PieceDefinition::new(
            'S',
            PieceShape::from_blocks(&[(0.0, 0.0), (1.0, 0.0), (1.0, 1.0), (2.0, 1.0)], (1.0, 0.0)),
            spawn(3.0),
        ),
        PieceDefinition::new(
            'Z',
            PieceShape::from_blocks(&[(2.0, 0.0), (1.0, 0.0), (1.0, 1.0), (0.0, 1.0)], (1.0, 0.0)),
            spawn(3.0),
        ),
    ])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_standard_order_and_offsets() {
        let catalogue = standard();
        assert_eq!(catalogue.keys(), vec!['T', 'I', 'O', 'L', 'J', 'S', 'Z']);
        assert!(catalogue.iter().all(|p| p.shape.len() == 4));

        let o = catalogue.get('O').unwrap();
        assert_eq!(o.spawn_offset, SpawnOffset::new(4.0, 20.0));
        let i = catalogue.get('I').unwrap();
        assert_eq!(i.spawn_offset, SpawnOffset::new(3.0, 20.0));
    }
}
