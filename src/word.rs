//! Fixed-width word arithmetic.
//!
//! Words of every supported width (16, 24, 32, 48 and 64 bits) are carried in a
//! `u64` and kept masked to their width, so 24- and 48-bit variants need no
//! special casing in the round code.

/// Word width plus the operations that wrap at that width.
///
/// Only a [`VariantConfig`](crate::VariantConfig) hands these out, so the width
/// is always one of the supported ones.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Word {
    bits: u32,
    mask: u64,
}

impl Word {
    /// Builds the arithmetic for `bits`-wide words. Callers pass a width from
    /// the variant table, never zero.
    pub(crate) const fn new(bits: u32) -> Self {
        let mask = if bits >= 64 {
            u64::MAX
        } else {
            (1u64 << bits) - 1
        };
        Word { bits, mask }
    }

    pub const fn bits(self) -> u32 {
        self.bits
    }

    pub const fn bytes(self) -> usize {
        (self.bits / 8) as usize
    }

    pub const fn mask(self) -> u64 {
        self.mask
    }

    /// Rotates left by `r` modulo the word width; a zero rotation is the identity.
    #[inline(always)]
    pub fn rotl(self, x: u64, r: u32) -> u64 {
        let x = x & self.mask;
        let r = r % self.bits;
        if r == 0 {
            return x;
        }
        ((x << r) | (x >> (self.bits - r))) & self.mask
    }

    #[inline(always)]
    pub fn rotr(self, x: u64, r: u32) -> u64 {
        self.rotl(x, (self.bits - r % self.bits) % self.bits)
    }

    #[inline(always)]
    pub fn add(self, a: u64, b: u64) -> u64 {
        a.wrapping_add(b) & self.mask
    }

    #[inline(always)]
    pub fn sub(self, a: u64, b: u64) -> u64 {
        a.wrapping_sub(b) & self.mask
    }

    /// Reads one little-endian word from the front of `bytes`.
    ///
    /// # Panics
    ///
    /// Panics if `bytes` is shorter than [`Word::bytes`].
    pub fn read(self, bytes: &[u8]) -> u64 {
        bytes[..self.bytes()]
            .iter()
            .rev()
            .fold(0u64, |acc, &b| (acc << 8) | b as u64)
    }

    /// Writes `x` as one little-endian word to the front of `out`.
    ///
    /// # Panics
    ///
    /// Panics if `out` is shorter than [`Word::bytes`].
    pub fn write(self, x: u64, out: &mut [u8]) {
        for (i, byte) in out[..self.bytes()].iter_mut().enumerate() {
            *byte = (x >> (8 * i)) as u8;
        }
    }

    /// Splits a buffer into little-endian words. Trailing partial words are ignored.
    pub fn read_all(self, bytes: &[u8]) -> Vec<u64> {
        bytes.chunks_exact(self.bytes()).map(|c| self.read(c)).collect()
    }

    pub fn write_all(self, words: &[u64], out: &mut [u8]) {
        for (&w, chunk) in words.iter().zip(out.chunks_exact_mut(self.bytes())) {
            self.write(w, chunk);
        }
    }
}
