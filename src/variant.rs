//! Cipher instance parameters and the canonical variant table.

use std::fmt;
use std::str::FromStr;

use rand::RngCore;

use crate::error::CipherError;
use crate::word::Word;

/// Every instance has a two-word block.
pub const BLOCK_WORDS: usize = 2;

/// Simon round-constant sequences z0..z4, written most significant bit first so
/// that bit `i` of the published sequence is bit `61 - i` of the literal.
const Z: [u64; 5] = [
    0b11111010001001010110000111001101111101000100101011000011100110,
    0b10001110111110010011000010110101000111011111001001100001011010,
    0b10101111011100000011010010011000101000010001111110010110110011,
    0b11011011101011000110010111100000010010001010011100110100001111,
    0b11010001111001101011011000100000010111000011001010010011101111,
];

const Z_PERIOD: usize = 62;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Family {
    Speck,
    Simon,
}

impl fmt::Display for Family {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Family::Speck => write!(f, "Speck"),
            Family::Simon => write!(f, "Simon"),
        }
    }
}

/// Rotation amounts used by a family's round function.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Rotations {
    /// `x = (x >>> alpha) + y ^ k; y = (y <<< beta) ^ x`
    Speck { alpha: u32, beta: u32 },
    /// `f(x) = (x <<< a) & (x <<< b) ^ (x <<< c)`
    Simon { a: u32, b: u32, c: u32 },
}

impl Rotations {
    fn max(self) -> u32 {
        match self {
            Rotations::Speck { alpha, beta } => alpha.max(beta),
            Rotations::Simon { a, b, c } => a.max(b).max(c),
        }
    }
}

struct Entry {
    word_bits: u32,
    key_words: usize,
    speck_rounds: usize,
    simon_rounds: usize,
    simon_z: usize,
}

const fn entry(
    word_bits: u32,
    key_words: usize,
    speck_rounds: usize,
    simon_rounds: usize,
    simon_z: usize,
) -> Entry {
    Entry {
        word_bits,
        key_words,
        speck_rounds,
        simon_rounds,
        simon_z,
    }
}

#[rustfmt::skip]
const TABLE: [Entry; 10] = [
    entry(16, 4, 22, 32, 0),
    entry(24, 3, 22, 36, 0),
    entry(24, 4, 23, 36, 1),
    entry(32, 3, 26, 42, 2),
    entry(32, 4, 27, 44, 3),
    entry(48, 2, 28, 52, 2),
    entry(48, 3, 29, 54, 3),
    entry(64, 2, 32, 68, 2),
    entry(64, 3, 33, 69, 3),
    entry(64, 4, 34, 72, 4),
];

/// Immutable description of one cipher instance.
///
/// Round count and rotation constants always come from the canonical table for
/// `(family, word_bits, key_words)`; they are never derived at runtime.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct VariantConfig {
    family: Family,
    word: Word,
    key_words: usize,
    rounds: usize,
    rotations: Rotations,
    z: usize,
}

impl VariantConfig {
    /// Looks up the canonical parameters for a family, word width and key length.
    pub fn new(family: Family, word_bits: u32, key_words: usize) -> Result<Self, CipherError> {
        let entry = TABLE
            .iter()
            .find(|e| e.word_bits == word_bits && e.key_words == key_words)
            .ok_or(CipherError::UnsupportedVariant {
                family,
                word_bits,
                key_words,
            })?;

        let (rounds, rotations) = match family {
            Family::Speck => {
                let (alpha, beta) = if word_bits == 16 { (7, 2) } else { (8, 3) };
                (entry.speck_rounds, Rotations::Speck { alpha, beta })
            }
            Family::Simon => (entry.simon_rounds, Rotations::Simon { a: 1, b: 8, c: 2 }),
        };
        debug_assert!(rotations.max() < word_bits);

        Ok(VariantConfig {
            family,
            word: Word::new(word_bits),
            key_words,
            rounds,
            rotations,
            z: entry.simon_z,
        })
    }

    /// Like [`VariantConfig::new`] but also checks a caller-supplied round count
    /// against the canonical table.
    pub fn with_rounds(
        family: Family,
        word_bits: u32,
        key_words: usize,
        rounds: usize,
    ) -> Result<Self, CipherError> {
        let config = Self::new(family, word_bits, key_words)?;
        if config.rounds != rounds {
            return Err(CipherError::RoundMismatch {
                expected: config.rounds,
                found: rounds,
            });
        }
        Ok(config)
    }

    /// Parses a conventional name such as `speck64/128` or `Simon128/256`.
    pub fn by_name(name: &str) -> Result<Self, CipherError> {
        let unknown = || CipherError::UnknownVariant(name.to_string());
        let lower = name.trim().to_ascii_lowercase();

        let (family, sizes) = if let Some(rest) = lower.strip_prefix("speck") {
            (Family::Speck, rest)
        } else if let Some(rest) = lower.strip_prefix("simon") {
            (Family::Simon, rest)
        } else {
            return Err(unknown());
        };

        let (block, key) = sizes.split_once('/').ok_or_else(unknown)?;
        let block: u32 = block.trim().parse().map_err(|_| unknown())?;
        let key: u32 = key.trim().parse().map_err(|_| unknown())?;
        if block % 2 != 0 || block == 0 {
            return Err(unknown());
        }
        let word_bits = block / 2;
        if key % word_bits != 0 {
            return Err(unknown());
        }

        Self::new(family, word_bits, (key / word_bits) as usize)
    }

    /// Every supported variant, Speck first, in table order.
    pub fn all() -> impl Iterator<Item = VariantConfig> {
        [Family::Speck, Family::Simon].into_iter().flat_map(|family| {
            TABLE
                .iter()
                .filter_map(move |e| VariantConfig::new(family, e.word_bits, e.key_words).ok())
        })
    }

    pub fn family(&self) -> Family {
        self.family
    }

    pub fn word(&self) -> Word {
        self.word
    }

    pub fn word_bits(&self) -> u32 {
        self.word.bits()
    }

    pub fn key_words(&self) -> usize {
        self.key_words
    }

    pub fn block_words(&self) -> usize {
        BLOCK_WORDS
    }

    pub fn rounds(&self) -> usize {
        self.rounds
    }

    pub fn rotations(&self) -> Rotations {
        self.rotations
    }

    pub fn block_bits(&self) -> u32 {
        self.word.bits() * BLOCK_WORDS as u32
    }

    pub fn key_bits(&self) -> u32 {
        self.word.bits() * self.key_words as u32
    }

    pub fn block_bytes(&self) -> usize {
        self.word.bytes() * BLOCK_WORDS
    }

    pub fn key_bytes(&self) -> usize {
        self.word.bytes() * self.key_words
    }

    pub fn schedule_bytes(&self) -> usize {
        self.word.bytes() * self.rounds
    }

    /// Number of round keys derived beyond the master-key words.
    pub fn derivations(&self) -> usize {
        match self.family {
            Family::Speck => self.rounds - 1,
            Family::Simon => self.rounds - self.key_words,
        }
    }

    /// Simon round-constant bit for derivation step `i`. Always 0 for Speck.
    pub(crate) fn z_bit(&self, i: usize) -> u64 {
        match self.family {
            Family::Speck => 0,
            Family::Simon => (Z[self.z] >> (Z_PERIOD - 1 - i % Z_PERIOD)) & 1,
        }
    }

    /// Index of the Simon z-sequence used by this variant.
    pub fn z_sequence(&self) -> Option<usize> {
        match self.family {
            Family::Speck => None,
            Family::Simon => Some(self.z),
        }
    }

    pub fn name(&self) -> String {
        let family = match self.family {
            Family::Speck => "speck",
            Family::Simon => "simon",
        };
        format!("{}{}/{}", family, self.block_bits(), self.key_bits())
    }

    /// Draws a fresh master key from the thread RNG.
    pub fn random_key(&self) -> Vec<u8> {
        let mut key = vec![0u8; self.key_bytes()];
        rand::thread_rng().fill_bytes(&mut key);
        key
    }
}

impl fmt::Display for VariantConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name())
    }
}

impl FromStr for VariantConfig {
    type Err = CipherError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::by_name(s)
    }
}
