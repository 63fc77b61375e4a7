//! Interchangeable implementations of the key-schedule and block contract.
//!
//! Every backend must produce the same round keys and ciphertexts as the
//! [`Generic`] engine. [`Native`] runs the rounds on `u16`/`u32`/`u64` directly
//! and only covers those word widths.

use std::marker::PhantomData;

use num_traits::{AsPrimitive, PrimInt, WrappingAdd, WrappingSub};
use tracing::debug;

use crate::engine;
use crate::error::CipherError;
use crate::primitive::CipherState;
use crate::schedule::{self, MasterKey, RoundKeySchedule};
use crate::variant::{Rotations, VariantConfig};

pub trait CipherBackend: Send + Sync {
    fn name(&self) -> &'static str;

    fn supports(&self, config: &VariantConfig) -> bool;

    fn expand_key(&self, key: &[u8], config: &VariantConfig)
        -> Result<RoundKeySchedule, CipherError>;

    fn encrypt(
        &self,
        block: &mut [u8],
        schedule: &RoundKeySchedule,
        config: &VariantConfig,
    ) -> Result<(), CipherError>;

    fn decrypt(
        &self,
        block: &mut [u8],
        schedule: &RoundKeySchedule,
        config: &VariantConfig,
    ) -> Result<(), CipherError>;
}

static BACKENDS: [&dyn CipherBackend; 2] = [&Generic, &Native];

/// All compiled-in backends, [`Generic`] first.
pub fn backends() -> &'static [&'static dyn CipherBackend] {
    &BACKENDS
}

pub fn backend_by_name(name: &str) -> Option<&'static dyn CipherBackend> {
    let found = BACKENDS
        .iter()
        .copied()
        .find(|b| b.name().eq_ignore_ascii_case(name.trim()));
    if let Some(backend) = found {
        debug!(backend = backend.name(), "selected cipher backend");
    }
    found
}

/// Portable engine over masked `u64` words; supports every variant.
#[derive(Clone, Copy, Debug, Default)]
pub struct Generic;

impl CipherBackend for Generic {
    fn name(&self) -> &'static str {
        "generic"
    }

    fn supports(&self, _config: &VariantConfig) -> bool {
        true
    }

    fn expand_key(
        &self,
        key: &[u8],
        config: &VariantConfig,
    ) -> Result<RoundKeySchedule, CipherError> {
        schedule::expand_bytes(key, config)
    }

    fn encrypt(
        &self,
        block: &mut [u8],
        schedule: &RoundKeySchedule,
        config: &VariantConfig,
    ) -> Result<(), CipherError> {
        engine::encrypt(block, schedule, config)
    }

    fn decrypt(
        &self,
        block: &mut [u8],
        schedule: &RoundKeySchedule,
        config: &VariantConfig,
    ) -> Result<(), CipherError> {
        engine::decrypt(block, schedule, config)
    }
}

/// Word-native engine for 16-, 32- and 64-bit words.
#[derive(Clone, Copy, Debug, Default)]
pub struct Native;

impl Native {
    fn unsupported(config: &VariantConfig) -> CipherError {
        CipherError::UnsupportedBackend {
            backend: "native",
            variant: config.name(),
        }
    }
}

macro_rules! by_width {
    ($config:expr, $run:ident($($arg:expr),*)) => {
        match $config.word_bits() {
            16 => Ok($run::<u16>($($arg),*)),
            32 => Ok($run::<u32>($($arg),*)),
            64 => Ok($run::<u64>($($arg),*)),
            _ => Err(Native::unsupported($config)),
        }
    };
}

impl CipherBackend for Native {
    fn name(&self) -> &'static str {
        "native"
    }

    fn supports(&self, config: &VariantConfig) -> bool {
        matches!(config.word_bits(), 16 | 32 | 64)
    }

    fn expand_key(
        &self,
        key: &[u8],
        config: &VariantConfig,
    ) -> Result<RoundKeySchedule, CipherError> {
        if !self.supports(config) {
            return Err(Native::unsupported(config));
        }
        let master = MasterKey::from_bytes(config, key)?;
        let keys = by_width!(config, expand_native(master.words(), config))?;
        RoundKeySchedule::from_words(config, keys)
    }

    fn encrypt(
        &self,
        block: &mut [u8],
        schedule: &RoundKeySchedule,
        config: &VariantConfig,
    ) -> Result<(), CipherError> {
        if !self.supports(config) {
            return Err(Native::unsupported(config));
        }
        engine::check(block, schedule, config)?;
        let state = engine::load(block, config);
        let state = by_width!(config, encrypt_native(state, schedule.keys(), config))?;
        engine::store(state, block, config);
        Ok(())
    }

    fn decrypt(
        &self,
        block: &mut [u8],
        schedule: &RoundKeySchedule,
        config: &VariantConfig,
    ) -> Result<(), CipherError> {
        if !self.supports(config) {
            return Err(Native::unsupported(config));
        }
        engine::check(block, schedule, config)?;
        let state = engine::load(block, config);
        let state = by_width!(config, decrypt_native(state, schedule.keys(), config))?;
        engine::store(state, block, config);
        Ok(())
    }
}

trait NativeWord: PrimInt + WrappingAdd + WrappingSub + AsPrimitive<u64> {}

impl<W> NativeWord for W where W: PrimInt + WrappingAdd + WrappingSub + AsPrimitive<u64> {}

/// Round functions bound to one primitive word type.
struct Rounds<W> {
    rotations: Rotations,
    _word: PhantomData<W>,
}

impl<W> Rounds<W>
where
    W: NativeWord,
    u64: AsPrimitive<W>,
{
    fn new(config: &VariantConfig) -> Self {
        Rounds {
            rotations: config.rotations(),
            _word: PhantomData,
        }
    }

    #[inline(always)]
    fn forward(&self, x: &mut W, y: &mut W, k: W) {
        match self.rotations {
            Rotations::Speck { alpha, beta } => {
                *x = x.rotate_right(alpha).wrapping_add(y) ^ k;
                *y = y.rotate_left(beta) ^ *x;
            }
            Rotations::Simon { a, b, c } => {
                let t = *x;
                *x = *y ^ ((t.rotate_left(a) & t.rotate_left(b)) ^ t.rotate_left(c)) ^ k;
                *y = t;
            }
        }
    }

    #[inline(always)]
    fn inverse(&self, x: &mut W, y: &mut W, k: W) {
        match self.rotations {
            Rotations::Speck { alpha, beta } => {
                *y = (*y ^ *x).rotate_right(beta);
                *x = (*x ^ k).wrapping_sub(y).rotate_left(alpha);
            }
            Rotations::Simon { a, b, c } => {
                let t = *y;
                *y = *x ^ ((t.rotate_left(a) & t.rotate_left(b)) ^ t.rotate_left(c)) ^ k;
                *x = t;
            }
        }
    }
}

fn expand_native<W>(master: &[u64], config: &VariantConfig) -> Vec<u64>
where
    W: NativeWord,
    u64: AsPrimitive<W>,
{
    let key: Vec<W> = master.iter().map(|&w| w.as_()).collect();
    let rounds = config.rounds();
    let mut keys: Vec<W> = Vec::with_capacity(rounds);

    match config.rotations() {
        Rotations::Speck { .. } => {
            let r = Rounds::<W>::new(config);
            let mut l = key[1..].to_vec();
            let mut k = key[0];
            keys.push(k);
            for i in 0..rounds - 1 {
                let slot = i % l.len();
                r.forward(&mut l[slot], &mut k, (i as u64).as_());
                keys.push(k);
            }
        }
        Rotations::Simon { .. } => {
            let m = config.key_words();
            let three: W = 3u64.as_();
            let c = !W::zero() ^ three;
            keys.extend_from_slice(&key);
            for i in m..rounds {
                let mut tmp = keys[i - 1].rotate_right(3);
                if m == 4 {
                    tmp = tmp ^ keys[i - 3];
                }
                tmp = tmp ^ tmp.rotate_right(1);
                let z: W = config.z_bit(i - m).as_();
                keys.push(keys[i - m] ^ tmp ^ z ^ c);
            }
        }
    }

    keys.into_iter().map(|k| k.as_()).collect()
}

fn encrypt_native<W>(state: CipherState, keys: &[u64], config: &VariantConfig) -> CipherState
where
    W: NativeWord,
    u64: AsPrimitive<W>,
{
    let r = Rounds::<W>::new(config);
    let (mut x, mut y): (W, W) = (state.left.as_(), state.right.as_());
    for &k in keys {
        r.forward(&mut x, &mut y, k.as_());
    }
    CipherState::new(x.as_(), y.as_())
}

fn decrypt_native<W>(state: CipherState, keys: &[u64], config: &VariantConfig) -> CipherState
where
    W: NativeWord,
    u64: AsPrimitive<W>,
{
    let r = Rounds::<W>::new(config);
    let (mut x, mut y): (W, W) = (state.left.as_(), state.right.as_());
    for &k in keys.iter().rev() {
        r.inverse(&mut x, &mut y, k.as_());
    }
    CipherState::new(x.as_(), y.as_())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lookup_by_name() {
        assert_eq!(backend_by_name("generic").unwrap().name(), "generic");
        assert_eq!(backend_by_name(" NATIVE ").unwrap().name(), "native");
        assert!(backend_by_name("avr").is_none());
        assert_eq!(backends().len(), 2);
    }

    #[test]
    fn test_native_coverage() {
        let native = Native;
        for cfg in VariantConfig::all() {
            let expected = matches!(cfg.word_bits(), 16 | 32 | 64);
            assert_eq!(native.supports(&cfg), expected, "{}", cfg);
        }
    }

    #[test]
    fn test_native_rejects_odd_widths() {
        let cfg = VariantConfig::by_name("speck48/72").unwrap();
        assert_eq!(
            Native.expand_key(&[0u8; 9], &cfg).unwrap_err(),
            CipherError::UnsupportedBackend {
                backend: "native",
                variant: "speck48/72".into()
            }
        );
    }

    #[test]
    fn test_native_matches_generic() {
        for cfg in VariantConfig::all().filter(|c| Native.supports(c)) {
            let key: Vec<u8> = (0..cfg.key_bytes() as u8).map(|b| b.wrapping_mul(37)).collect();
            let generic = Generic.expand_key(&key, &cfg).unwrap();
            let native = Native.expand_key(&key, &cfg).unwrap();
            assert_eq!(generic, native, "{} schedules differ", cfg);

            let plaintext: Vec<u8> = (0..cfg.block_bytes() as u8).collect();
            let mut a = plaintext.clone();
            let mut b = plaintext.clone();
            Generic.encrypt(&mut a, &generic, &cfg).unwrap();
            Native.encrypt(&mut b, &native, &cfg).unwrap();
            assert_eq!(a, b, "{} ciphertexts differ", cfg);

            Native.decrypt(&mut b, &native, &cfg).unwrap();
            assert_eq!(b, plaintext);
        }
    }
}
