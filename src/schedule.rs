//! Master-key expansion into the ordered round-key sequence.

use tracing::debug;

use crate::error::CipherError;
use crate::primitive::{CipherState, RoundPrimitive};
use crate::variant::{Family, VariantConfig};

/// Master key split into `key_words` words, k0 first.
#[derive(Clone, PartialEq, Eq)]
pub struct MasterKey {
    words: Vec<u64>,
}

impl MasterKey {
    /// Splits a little-endian key buffer of exactly `config.key_bytes()` bytes.
    pub fn from_bytes(config: &VariantConfig, key: &[u8]) -> Result<Self, CipherError> {
        if key.len() != config.key_bytes() {
            return Err(CipherError::KeyLength {
                expected: config.key_bytes(),
                found: key.len(),
            });
        }
        Ok(MasterKey {
            words: config.word().read_all(key),
        })
    }

    /// Takes key words k0 first. Bits above the word width are dropped.
    pub fn from_words(config: &VariantConfig, words: &[u64]) -> Result<Self, CipherError> {
        if words.len() != config.key_words() {
            return Err(CipherError::KeyLength {
                expected: config.key_words(),
                found: words.len(),
            });
        }
        let mask = config.word().mask();
        Ok(MasterKey {
            words: words.iter().map(|w| w & mask).collect(),
        })
    }

    pub fn words(&self) -> &[u64] {
        &self.words
    }
}

// Key material stays out of debug output.
impl std::fmt::Debug for MasterKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MasterKey")
            .field("words", &self.words.len())
            .finish()
    }
}

/// Exactly `rounds` round keys, round key `i` used in round `i`.
///
/// Immutable once built and freely shareable between threads.
#[derive(Clone, PartialEq, Eq)]
pub struct RoundKeySchedule {
    config: VariantConfig,
    keys: Vec<u64>,
}

impl RoundKeySchedule {
    /// Rebuilds a schedule from its serialized form (`config.schedule_bytes()` bytes).
    pub fn from_bytes(config: &VariantConfig, bytes: &[u8]) -> Result<Self, CipherError> {
        if bytes.len() != config.schedule_bytes() {
            return Err(CipherError::ScheduleLength {
                expected: config.schedule_bytes(),
                found: bytes.len(),
            });
        }
        Ok(RoundKeySchedule {
            config: *config,
            keys: config.word().read_all(bytes),
        })
    }

    pub fn from_words(config: &VariantConfig, keys: Vec<u64>) -> Result<Self, CipherError> {
        if keys.len() != config.rounds() {
            return Err(CipherError::ScheduleLength {
                expected: config.rounds(),
                found: keys.len(),
            });
        }
        let mask = config.word().mask();
        Ok(RoundKeySchedule {
            config: *config,
            keys: keys.into_iter().map(|k| k & mask).collect(),
        })
    }

    pub fn config(&self) -> &VariantConfig {
        &self.config
    }

    pub fn keys(&self) -> &[u64] {
        &self.keys
    }

    pub fn len(&self) -> usize {
        self.keys.len()
    }

    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }

    /// Serializes the schedule as little-endian words, round 0 first.
    pub fn to_bytes(&self) -> Vec<u8> {
        let mut out = vec![0u8; self.config.schedule_bytes()];
        self.config.word().write_all(&self.keys, &mut out);
        out
    }
}

impl std::fmt::Debug for RoundKeySchedule {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RoundKeySchedule")
            .field("variant", &self.config.name())
            .field("rounds", &self.keys.len())
            .finish()
    }
}

/// Expands `key` into the full round-key sequence for `config`.
pub fn expand(key: &MasterKey, config: &VariantConfig) -> Result<RoundKeySchedule, CipherError> {
    if key.words.len() != config.key_words() {
        return Err(CipherError::KeyLength {
            expected: config.key_words(),
            found: key.words.len(),
        });
    }

    debug!(
        variant = %config,
        derivations = config.derivations(),
        "expanding key schedule"
    );

    let keys = match config.family() {
        Family::Speck => expand_speck(&key.words, config),
        Family::Simon => expand_simon(&key.words, config),
    };
    debug_assert_eq!(keys.len(), config.rounds());

    Ok(RoundKeySchedule {
        config: *config,
        keys,
    })
}

/// Expands a little-endian key buffer.
pub fn expand_bytes(key: &[u8], config: &VariantConfig) -> Result<RoundKeySchedule, CipherError> {
    expand(&MasterKey::from_bytes(config, key)?, config)
}

/// Speck: round key 0 is k0, the remaining key words form a ring of `l` words.
/// Each step runs the round function over (l, k) keyed by the step index.
fn expand_speck(master: &[u64], config: &VariantConfig) -> Vec<u64> {
    let primitive = RoundPrimitive::new(config);
    let mut window = master[1..].to_vec();
    let mut k = master[0];

    let mut keys = Vec::with_capacity(config.rounds());
    keys.push(k);
    for i in 0..config.rounds() - 1 {
        let slot = i % window.len();
        let mut state = CipherState::new(window[slot], k);
        primitive.key_update(&mut state, i);
        window[slot] = state.left;
        k = state.right;
        keys.push(k);
    }
    keys
}

/// Simon: a fixed-lag recurrence over the previous `key_words` round keys with
/// a z-sequence bit and the constant `2^n - 4` folded in.
fn expand_simon(master: &[u64], config: &VariantConfig) -> Vec<u64> {
    let w = config.word();
    let m = config.key_words();
    let c = w.mask() ^ 3;

    let mut keys = Vec::with_capacity(config.rounds());
    keys.extend_from_slice(master);
    for i in m..config.rounds() {
        let mut tmp = w.rotr(keys[i - 1], 3);
        if m == 4 {
            tmp ^= keys[i - 3];
        }
        tmp ^= w.rotr(tmp, 1);
        keys.push(keys[i - m] ^ tmp ^ config.z_bit(i - m) ^ c);
    }
    keys
}

#[cfg(test)]
mod tests {
    use super::*;

    const KEY_64_128: [u8; 16] = [
        0x00, 0x01, 0x02, 0x03, 0x08, 0x09, 0x0a, 0x0b, 0x10, 0x11, 0x12, 0x13, 0x18, 0x19, 0x1a,
        0x1b,
    ];

    #[test]
    fn test_speck_64_128_schedule() {
        let cfg = VariantConfig::by_name("speck64/128").unwrap();
        let ks = expand_bytes(&KEY_64_128, &cfg).unwrap();
        assert_eq!(ks.len(), 27);
        assert_eq!(&ks.keys()[..3], &[0x0302_0100, 0x131d_0309, 0xbbd8_0d53]);
        assert_eq!(ks.keys()[26], 0xfe6b_523a);
    }

    #[test]
    fn test_simon_64_128_schedule() {
        let cfg = VariantConfig::by_name("simon64/128").unwrap();
        let ks = expand_bytes(&KEY_64_128, &cfg).unwrap();
        assert_eq!(ks.len(), 44);
        assert_eq!(
            &ks.keys()[..4],
            &[0x0302_0100, 0x0b0a_0908, 0x1312_1110, 0x1b1a_1918]
        );
        assert_eq!(&ks.keys()[4..6], &[0x70a0_11c3, 0xb770_ec49]);
        assert_eq!(ks.keys()[43], 0x15df_4696);
    }

    #[test]
    fn test_schedule_length_for_every_variant() {
        for cfg in VariantConfig::all() {
            let key = vec![0xa5u8; cfg.key_bytes()];
            let ks = expand_bytes(&key, &cfg).unwrap();
            assert_eq!(ks.len(), cfg.rounds(), "{}", cfg);
            assert_eq!(ks.to_bytes().len(), cfg.schedule_bytes());
        }
    }

    #[test]
    fn test_smallest_variants() {
        let speck = VariantConfig::by_name("speck32/64").unwrap();
        assert_eq!(expand_bytes(&[0u8; 8], &speck).unwrap().len(), 22);

        let simon = VariantConfig::by_name("simon96/96").unwrap();
        let ks = expand_bytes(&[0u8; 12], &simon).unwrap();
        assert_eq!(ks.len(), 52);
        assert!(ks.keys().iter().all(|&k| k <= 0xffff_ffff_ffff));
    }

    #[test]
    fn test_key_length_mismatch() {
        let cfg = VariantConfig::by_name("speck64/128").unwrap();
        assert_eq!(
            expand_bytes(&KEY_64_128[..12], &cfg).unwrap_err(),
            CipherError::KeyLength {
                expected: 16,
                found: 12
            }
        );
        assert!(MasterKey::from_words(&cfg, &[1, 2, 3]).is_err());
    }

    #[test]
    fn test_master_key_from_other_variant_is_rejected() {
        let speck96 = VariantConfig::by_name("speck64/96").unwrap();
        let speck128 = VariantConfig::by_name("speck64/128").unwrap();
        let key = MasterKey::from_words(&speck96, &[1, 2, 3]).unwrap();
        assert!(expand(&key, &speck128).is_err());
    }

    #[test]
    fn test_schedule_bytes_round_trip() {
        let cfg = VariantConfig::by_name("simon48/72").unwrap();
        let ks = expand_bytes(&[7u8; 9], &cfg).unwrap();
        let restored = RoundKeySchedule::from_bytes(&cfg, &ks.to_bytes()).unwrap();
        assert_eq!(restored, ks);

        assert_eq!(
            RoundKeySchedule::from_bytes(&cfg, &[0u8; 10]).unwrap_err(),
            CipherError::ScheduleLength {
                expected: 36 * 3,
                found: 10
            }
        );
    }

    #[test]
    fn test_families_derive_different_schedules() {
        let speck = VariantConfig::by_name("speck64/128").unwrap();
        let simon = VariantConfig::by_name("simon64/128").unwrap();
        let a = expand_bytes(&KEY_64_128, &speck).unwrap();
        let b = expand_bytes(&KEY_64_128, &simon).unwrap();
        assert_ne!(a.len(), b.len());
        assert_ne!(a.keys()[1], b.keys()[1]);
    }

    #[test]
    fn test_debug_hides_key_material() {
        let cfg = VariantConfig::by_name("speck64/128").unwrap();
        let key = MasterKey::from_bytes(&cfg, &KEY_64_128).unwrap();
        let text = format!("{:?}", key);
        assert!(!text.contains(&0x0302_0100u64.to_string()));
    }
}
