//! Single-round transforms for both families and their exact inverses.

use crate::variant::{Rotations, VariantConfig};
use crate::word::Word;

/// The two-word block being transformed.
///
/// `left` is the paper's `x` (block word 1), `right` is `y` (block word 0).
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct CipherState {
    pub left: u64,
    pub right: u64,
}

impl CipherState {
    pub fn new(left: u64, right: u64) -> Self {
        CipherState { left, right }
    }
}

/// One round of mixing for a given variant.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct RoundPrimitive {
    word: Word,
    rotations: Rotations,
}

impl RoundPrimitive {
    pub fn new(config: &VariantConfig) -> Self {
        RoundPrimitive {
            word: config.word(),
            rotations: config.rotations(),
        }
    }

    pub fn word(&self) -> Word {
        self.word
    }

    /// Applies one forward round with `key`.
    #[inline(always)]
    pub fn forward(&self, state: &mut CipherState, key: u64) {
        let w = self.word;
        match self.rotations {
            Rotations::Speck { alpha, beta } => {
                state.left = w.add(w.rotr(state.left, alpha), state.right) ^ key;
                state.right = w.rotl(state.right, beta) ^ state.left;
            }
            Rotations::Simon { a, b, c } => {
                let x = state.left;
                state.left = state.right ^ simon_f(w, x, a, b, c) ^ key;
                state.right = x;
            }
        }
    }

    /// Undoes [`RoundPrimitive::forward`] for the same `key`.
    #[inline(always)]
    pub fn inverse(&self, state: &mut CipherState, key: u64) {
        let w = self.word;
        match self.rotations {
            Rotations::Speck { alpha, beta } => {
                state.right = w.rotr(state.right ^ state.left, beta);
                state.left = w.rotl(w.sub(state.left ^ key, state.right), alpha);
            }
            Rotations::Simon { a, b, c } => {
                let y = state.right;
                state.right = state.left ^ simon_f(w, y, a, b, c) ^ key;
                state.left = y;
            }
        }
    }

    /// Speck key-register update: the forward round with the round index as key.
    ///
    /// `state.left` holds the sliding `l` word, `state.right` the current round key.
    #[inline(always)]
    pub fn key_update(&self, state: &mut CipherState, round: usize) {
        self.forward(state, round as u64);
    }
}

#[inline(always)]
fn simon_f(w: Word, x: u64, a: u32, b: u32, c: u32) -> u64 {
    (w.rotl(x, a) & w.rotl(x, b)) ^ w.rotl(x, c)
}
