//! Keyed cipher handle: expand once, then encrypt and decrypt many blocks.

use std::fmt;

use crate::backend::{CipherBackend, Generic};
use crate::error::CipherError;
use crate::schedule::RoundKeySchedule;
use crate::variant::VariantConfig;

/// A variant bound to an expanded key and the backend that runs it.
///
/// The handle holds no mutable state, so one instance can serve any number of
/// threads at once.
#[derive(Clone)]
pub struct Cipher {
    config: VariantConfig,
    schedule: RoundKeySchedule,
    backend: &'static dyn CipherBackend,
}

impl Cipher {
    /// Expands `key` for `config` with the portable backend.
    pub fn new(config: VariantConfig, key: &[u8]) -> Result<Self, CipherError> {
        Self::with_backend(config, key, &Generic)
    }

    /// Like [`Cipher::new`] with the variant given by name, e.g. `simon64/128`.
    pub fn from_name(name: &str, key: &[u8]) -> Result<Self, CipherError> {
        Self::new(VariantConfig::by_name(name)?, key)
    }

    pub fn with_backend(
        config: VariantConfig,
        key: &[u8],
        backend: &'static dyn CipherBackend,
    ) -> Result<Self, CipherError> {
        if !backend.supports(&config) {
            return Err(CipherError::UnsupportedBackend {
                backend: backend.name(),
                variant: config.name(),
            });
        }
        let schedule = backend.expand_key(key, &config)?;
        Ok(Cipher {
            config,
            schedule,
            backend,
        })
    }

    /// Wraps a schedule that was expanded earlier, e.g. one loaded from bytes.
    pub fn from_schedule(schedule: RoundKeySchedule) -> Self {
        Cipher {
            config: *schedule.config(),
            schedule,
            backend: &Generic,
        }
    }

    /// Replaces the key and regenerates the schedule.
    pub fn set_key(&mut self, key: &[u8]) -> Result<(), CipherError> {
        self.schedule = self.backend.expand_key(key, &self.config)?;
        Ok(())
    }

    pub fn config(&self) -> &VariantConfig {
        &self.config
    }

    pub fn schedule(&self) -> &RoundKeySchedule {
        &self.schedule
    }

    pub fn backend(&self) -> &'static dyn CipherBackend {
        self.backend
    }

    /// Encrypts one `block_bytes()`-long block in place.
    pub fn encrypt_block(&self, block: &mut [u8]) -> Result<(), CipherError> {
        self.backend.encrypt(block, &self.schedule, &self.config)
    }

    pub fn decrypt_block(&self, block: &mut [u8]) -> Result<(), CipherError> {
        self.backend.decrypt(block, &self.schedule, &self.config)
    }

    /// Encrypts a block given as `[x, y]`, the order the published vectors use.
    ///
    /// Bits above the word width are dropped.
    pub fn encrypt_words(&self, block: [u64; 2]) -> Result<[u64; 2], CipherError> {
        self.with_words(block, |cipher, buf| cipher.encrypt_block(buf))
    }

    pub fn decrypt_words(&self, block: [u64; 2]) -> Result<[u64; 2], CipherError> {
        self.with_words(block, |cipher, buf| cipher.decrypt_block(buf))
    }

    fn with_words(
        &self,
        [x, y]: [u64; 2],
        run: impl Fn(&Self, &mut [u8]) -> Result<(), CipherError>,
    ) -> Result<[u64; 2], CipherError> {
        let w = self.config.word();
        let n = w.bytes();
        let mut buf = vec![0u8; self.config.block_bytes()];
        w.write(y & w.mask(), &mut buf);
        w.write(x & w.mask(), &mut buf[n..]);
        run(self, &mut buf)?;
        Ok([w.read(&buf[n..]), w.read(&buf)])
    }
}

impl fmt::Debug for Cipher {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Cipher")
            .field("variant", &self.config.name())
            .field("backend", &self.backend.name())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::Native;

    #[test]
    fn test_words_api_matches_published_order() {
        let key = [
            0x00, 0x01, 0x02, 0x03, 0x08, 0x09, 0x0a, 0x0b, 0x10, 0x11, 0x12, 0x13, 0x18, 0x19,
            0x1a, 0x1b,
        ];
        let cipher = Cipher::from_name("speck64/128", &key).unwrap();
        let ct = cipher.encrypt_words([0x3b72_6574, 0x7475_432d]).unwrap();
        assert_eq!(ct, [0x8c6f_a548, 0x454e_028b]);
        assert_eq!(cipher.decrypt_words(ct).unwrap(), [0x3b72_6574, 0x7475_432d]);
    }

    #[test]
    fn test_set_key_changes_output() {
        let cfg = VariantConfig::by_name("simon32/64").unwrap();
        let mut cipher = Cipher::new(cfg, &[0u8; 8]).unwrap();
        let before = cipher.encrypt_words([0x1234, 0x5678]).unwrap();
        cipher.set_key(&[1u8; 8]).unwrap();
        assert_ne!(cipher.encrypt_words([0x1234, 0x5678]).unwrap(), before);
        assert!(cipher.set_key(&[1u8; 7]).is_err());
    }

    #[test]
    fn test_backend_support_is_checked_up_front() {
        let cfg = VariantConfig::by_name("simon96/96").unwrap();
        assert!(matches!(
            Cipher::with_backend(cfg, &[0u8; 12], &Native),
            Err(CipherError::UnsupportedBackend { .. })
        ));
    }

    #[test]
    fn test_from_schedule() {
        let cfg = VariantConfig::by_name("speck128/256").unwrap();
        let original = Cipher::new(cfg, &[9u8; 32]).unwrap();
        let bytes = original.schedule().to_bytes();
        let restored =
            Cipher::from_schedule(RoundKeySchedule::from_bytes(&cfg, &bytes).unwrap());
        assert_eq!(
            restored.encrypt_words([1, 2]).unwrap(),
            original.encrypt_words([1, 2]).unwrap()
        );
    }

    /// Accepts every variant but refuses to run a block.
    struct Refusing;

    impl CipherBackend for Refusing {
        fn name(&self) -> &'static str {
            "refusing"
        }

        fn supports(&self, _config: &VariantConfig) -> bool {
            true
        }

        fn expand_key(
            &self,
            key: &[u8],
            config: &VariantConfig,
        ) -> Result<RoundKeySchedule, CipherError> {
            Generic.expand_key(key, config)
        }

        fn encrypt(
            &self,
            _block: &mut [u8],
            _schedule: &RoundKeySchedule,
            config: &VariantConfig,
        ) -> Result<(), CipherError> {
            Err(CipherError::UnsupportedBackend {
                backend: "refusing",
                variant: config.name(),
            })
        }

        fn decrypt(
            &self,
            block: &mut [u8],
            schedule: &RoundKeySchedule,
            config: &VariantConfig,
        ) -> Result<(), CipherError> {
            self.encrypt(block, schedule, config)
        }
    }

    #[test]
    fn test_backend_errors_reach_word_callers() {
        let cfg = VariantConfig::by_name("speck64/128").unwrap();
        let cipher = Cipher::with_backend(cfg, &[0u8; 16], &Refusing).unwrap();
        let expected = CipherError::UnsupportedBackend {
            backend: "refusing",
            variant: "speck64/128".into(),
        };

        assert_eq!(
            cipher.encrypt_words([0x3b72_6574, 0x7475_432d]),
            Err(expected.clone())
        );
        assert_eq!(cipher.decrypt_words([0x8c6f_a548, 0x454e_028b]), Err(expected));
    }
}
