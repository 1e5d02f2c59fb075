//! RNG module - shuffle primitives for random groups
//!
//! A bag generator never reaches for a process-wide random source. It owns a
//! [`Shuffle`] value handed to it at construction and calls it once every time
//! a random group is entered.
//!
//! Provides:
//! - [`SimpleRng`]: seedable LCG, the default shuffle source
//! - [`Identity`]: leaves the order untouched (deterministic previews)
//! - any `FnMut(&mut [usize])` closure, for scripted test fakes

/// Permutes the child indices of a random group in place
pub trait Shuffle {
    /// Reorder `order`. Implementations must only permute, never add or drop.
    fn shuffle(&mut self, order: &mut [usize]);
}

impl<F> Shuffle for F
where
    F: FnMut(&mut [usize]),
{
    fn shuffle(&mut self, order: &mut [usize]) {
        self(order)
    }
}

/// Simple LCG (Linear Congruential Generator) RNG
/// Uses constants from Numerical Recipes
#[derive(Debug, Clone)]
pub struct SimpleRng {
    state: u32,
}

impl SimpleRng {
    /// Create a new RNG with the given seed
    pub fn new(seed: u32) -> Self {
        // Avoid 0 seed which would produce all zeros
        let state = if seed == 0 { 1 } else { seed };
        Self { state }
    }

    /// Generate next random u32
    pub fn next_u32(&mut self) -> u32 {
        // LCG formula: (a * state + c) mod m
        // Using Numerical Recipes constants: a=1664525, c=1013904223, m=2^32
        self.state = self.state.wrapping_mul(1664525).wrapping_add(1013904223);
        self.state
    }

    /// Generate random value in range [0, max)
    pub fn next_range(&mut self, max: u32) -> u32 {
        self.next_u32() % max
    }

    /// Current internal state (feed back into [`SimpleRng::new`] to resume)
    pub fn state(&self) -> u32 {
        self.state
    }
}

impl Default for SimpleRng {
    fn default() -> Self {
        Self::new(1)
    }
}

impl Shuffle for SimpleRng {
    /// Fisher-Yates
    fn shuffle(&mut self, order: &mut [usize]) {
        for i in (1..order.len()).rev() {
            let j = self.next_range((i + 1) as u32) as usize;
            order.swap(i, j);
        }
    }
}

/// No-op shuffle: random groups are visited in written order
#[derive(Debug, Clone, Copy, Default)]
pub struct Identity;

impl Shuffle for Identity {
    fn shuffle(&mut self, _order: &mut [usize]) {}
}

/// `0..len` as a vector of indices
pub(crate) fn identity_order(len: usize) -> Vec<usize> {
    (0..len).collect()
}
