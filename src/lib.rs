//! Speck and Simon Block Ciphers in Rust
//!
//! This crate provides portable implementations of the Speck (ARX) and Simon
//! (AND-rotate-XOR) lightweight block cipher families, bit-exact with the
//! published designs on every platform.
//!
//! # Variants
//! - Block sizes: 32, 48, 64, 96 and 128 bits (two words of 16..64 bits)
//! - Key sizes: two to four words
//! - Round counts and rotation amounts are fixed per variant, see [`VariantConfig`]
//!
//! # Layers
//!
//! ```text
//! VariantConfig   (canonical round/rotation table)
//!     ↓
//! RoundPrimitive  (one round, forward and inverse)
//!     ↓
//! KeySchedule     (master key → round keys)
//!     ↓
//! CipherEngine    (round loop over a two-word state)
//! ```
//!
//! # Examples
//!
//! ```
//! use speck_simon::Cipher;
//!
//! let key = [
//!     0x00, 0x01, 0x02, 0x03, 0x08, 0x09, 0x0a, 0x0b,
//!     0x10, 0x11, 0x12, 0x13, 0x18, 0x19, 0x1a, 0x1b,
//! ];
//! let cipher = Cipher::from_name("speck64/128", &key).unwrap();
//!
//! let mut block = *b"-Cutter;";
//! cipher.encrypt_block(&mut block).unwrap();
//! assert_eq!(block, [0x8b, 0x02, 0x4e, 0x45, 0x48, 0xa5, 0x6f, 0x8c]);
//!
//! cipher.decrypt_block(&mut block).unwrap();
//! assert_eq!(&block, b"-Cutter;");
//! ```

pub mod backend;
pub mod engine;
pub mod error;
pub mod primitive;
pub mod schedule;
pub mod variant;
pub mod vectors;
pub mod word;

mod cipher;

pub use backend::{backend_by_name, backends, CipherBackend, Generic, Native};
pub use cipher::Cipher;
pub use error::CipherError;
pub use primitive::{CipherState, RoundPrimitive};
pub use schedule::{expand, expand_bytes, MasterKey, RoundKeySchedule};
pub use variant::{Family, Rotations, VariantConfig};
