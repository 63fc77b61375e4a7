//! Error types for the cipher layer.

use crate::variant::Family;

/// Errors produced while configuring a variant or feeding it buffers.
///
/// Configuration errors are raised before any cipher call; length errors are
/// raised at the entry of a key-schedule or block call and leave no state behind.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum CipherError {
    #[error("unsupported {family} variant: {word_bits}-bit words with {key_words} key words")]
    UnsupportedVariant {
        family: Family,
        word_bits: u32,
        key_words: usize,
    },
    #[error("round count `{found}` does not match the canonical `{expected}`")]
    RoundMismatch { expected: usize, found: usize },
    #[error("unknown variant name `{0}`")]
    UnknownVariant(String),
    #[error("invalid key length `{found}`, expected `{expected}`")]
    KeyLength { expected: usize, found: usize },
    #[error("invalid block length `{found}` bytes, expected `{expected}`")]
    BlockLength { expected: usize, found: usize },
    #[error("invalid round-key schedule length `{found}`, expected `{expected}`")]
    ScheduleLength { expected: usize, found: usize },
    #[error("round-key schedule was expanded for {found}, not {expected}")]
    VariantMismatch { expected: String, found: String },
    #[error("backend `{backend}` does not support {variant}")]
    UnsupportedBackend {
        backend: &'static str,
        variant: String,
    },
}
