//! Published known-answer vectors for every variant.
//!
//! Words are listed the way the designers print them: the key from the most
//! significant word down to k0, blocks as `(x, y)`.

use crate::backend::CipherBackend;
use crate::error::CipherError;
use crate::variant::VariantConfig;

#[derive(Clone, Copy, Debug)]
pub struct TestVector {
    pub variant: &'static str,
    pub key: &'static [u64],
    pub plaintext: [u64; 2],
    pub ciphertext: [u64; 2],
}

impl TestVector {
    pub fn config(&self) -> Result<VariantConfig, CipherError> {
        VariantConfig::by_name(self.variant)
    }

    /// The key as a little-endian buffer, k0 first.
    pub fn key_bytes(&self, config: &VariantConfig) -> Vec<u8> {
        let mut words = self.key.to_vec();
        words.reverse();
        let mut out = vec![0u8; config.key_bytes()];
        config.word().write_all(&words, &mut out);
        out
    }

    pub fn plaintext_bytes(&self, config: &VariantConfig) -> Vec<u8> {
        block_bytes(self.plaintext, config)
    }

    pub fn ciphertext_bytes(&self, config: &VariantConfig) -> Vec<u8> {
        block_bytes(self.ciphertext, config)
    }
}

fn block_bytes([x, y]: [u64; 2], config: &VariantConfig) -> Vec<u8> {
    let mut out = vec![0u8; config.block_bytes()];
    config.word().write_all(&[y, x], &mut out);
    out
}

#[rustfmt::skip]
pub static SPECK: [TestVector; 10] = [
    TestVector { variant: "speck32/64", key: &[0x1918, 0x1110, 0x0908, 0x0100], plaintext: [0x6574, 0x694c], ciphertext: [0xa868, 0x42f2] },
    TestVector { variant: "speck48/72", key: &[0x121110, 0x0a0908, 0x020100], plaintext: [0x20796c, 0x6c6172], ciphertext: [0xc049a5, 0x385adc] },
    TestVector { variant: "speck48/96", key: &[0x1a1918, 0x121110, 0x0a0908, 0x020100], plaintext: [0x6d2073, 0x696874], ciphertext: [0x735e10, 0xb6445d] },
    TestVector { variant: "speck64/96", key: &[0x13121110, 0x0b0a0908, 0x03020100], plaintext: [0x74614620, 0x736e6165], ciphertext: [0x9f7952ec, 0x4175946c] },
    TestVector { variant: "speck64/128", key: &[0x1b1a1918, 0x13121110, 0x0b0a0908, 0x03020100], plaintext: [0x3b726574, 0x7475432d], ciphertext: [0x8c6fa548, 0x454e028b] },
    TestVector { variant: "speck96/96", key: &[0x0d0c0b0a0908, 0x050403020100], plaintext: [0x65776f68202c, 0x656761737520], ciphertext: [0x9e4d09ab7178, 0x62bdde8f79aa] },
    TestVector { variant: "speck96/144", key: &[0x151413121110, 0x0d0c0b0a0908, 0x050403020100], plaintext: [0x656d6974206e, 0x69202c726576], ciphertext: [0x2bf31072228a, 0x7ae440252ee6] },
    TestVector { variant: "speck128/128", key: &[0x0f0e0d0c0b0a0908, 0x0706050403020100], plaintext: [0x6c61766975716520, 0x7469206564616d20], ciphertext: [0xa65d985179783265, 0x7860fedf5c570d18] },
    TestVector { variant: "speck128/192", key: &[0x1716151413121110, 0x0f0e0d0c0b0a0908, 0x0706050403020100], plaintext: [0x7261482066656968, 0x43206f7420746e65], ciphertext: [0x1be4cf3a13135566, 0xf9bc185de03c1886] },
    TestVector { variant: "speck128/256", key: &[0x1f1e1d1c1b1a1918, 0x1716151413121110, 0x0f0e0d0c0b0a0908, 0x0706050403020100], plaintext: [0x65736f6874206e49, 0x202e72656e6f6f70], ciphertext: [0x4109010405c0f53e, 0x4eeeb48d9c188f43] },
];

#[rustfmt::skip]
pub static SIMON: [TestVector; 10] = [
    TestVector { variant: "simon32/64", key: &[0x1918, 0x1110, 0x0908, 0x0100], plaintext: [0x6565, 0x6877], ciphertext: [0xc69b, 0xe9bb] },
    TestVector { variant: "simon48/72", key: &[0x121110, 0x0a0908, 0x020100], plaintext: [0x612067, 0x6e696c], ciphertext: [0xdae5ac, 0x292cac] },
    TestVector { variant: "simon48/96", key: &[0x1a1918, 0x121110, 0x0a0908, 0x020100], plaintext: [0x726963, 0x20646e], ciphertext: [0x6e06a5, 0xacf156] },
    TestVector { variant: "simon64/96", key: &[0x13121110, 0x0b0a0908, 0x03020100], plaintext: [0x6f722067, 0x6e696c63], ciphertext: [0x5ca2e27f, 0x111a8fc8] },
    TestVector { variant: "simon64/128", key: &[0x1b1a1918, 0x13121110, 0x0b0a0908, 0x03020100], plaintext: [0x656b696c, 0x20646e75], ciphertext: [0x44c8fc20, 0xb9dfa07a] },
    TestVector { variant: "simon96/96", key: &[0x0d0c0b0a0908, 0x050403020100], plaintext: [0x2072616c6c69, 0x702065687420], ciphertext: [0x602807a462b4, 0x69063d8ff082] },
    TestVector { variant: "simon96/144", key: &[0x151413121110, 0x0d0c0b0a0908, 0x050403020100], plaintext: [0x746168742074, 0x73756420666f], ciphertext: [0xecad1c6c451e, 0x3f59c5db1ae9] },
    TestVector { variant: "simon128/128", key: &[0x0f0e0d0c0b0a0908, 0x0706050403020100], plaintext: [0x6373656420737265, 0x6c6c657661727420], ciphertext: [0x49681b1e1e54fe3f, 0x65aa832af84e0bbc] },
    TestVector { variant: "simon128/192", key: &[0x1716151413121110, 0x0f0e0d0c0b0a0908, 0x0706050403020100], plaintext: [0x206572656874206e, 0x6568772065626972], ciphertext: [0xc4ac61effcdc0d4f, 0x6c9c8d6e2597b85b] },
    TestVector { variant: "simon128/256", key: &[0x1f1e1d1c1b1a1918, 0x1716151413121110, 0x0f0e0d0c0b0a0908, 0x0706050403020100], plaintext: [0x74206e69206d6f6f, 0x6d69732061207369], ciphertext: [0x8d2b5579afc8a3a0, 0x3bf72a87efe7b868] },
];

/// Both families' vectors, Speck first.
pub fn all() -> impl Iterator<Item = &'static TestVector> {
    SPECK.iter().chain(SIMON.iter())
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Outcome {
    Pass,
    /// Encryption produced `found` instead of the published ciphertext.
    Encrypt { expected: Vec<u8>, found: Vec<u8> },
    /// Decrypting the published ciphertext did not give the plaintext back.
    Decrypt { expected: Vec<u8>, found: Vec<u8> },
    /// The backend does not cover this variant.
    Skipped,
    Error(CipherError),
}

impl Outcome {
    pub fn is_failure(&self) -> bool {
        !matches!(self, Outcome::Pass | Outcome::Skipped)
    }
}

/// Runs one vector against `backend`.
pub fn run(vector: &TestVector, backend: &dyn CipherBackend) -> Outcome {
    let config = match vector.config() {
        Ok(config) => config,
        Err(e) => return Outcome::Error(e),
    };
    if !backend.supports(&config) {
        return Outcome::Skipped;
    }
    match run_supported(vector, &config, backend) {
        Ok(outcome) => outcome,
        Err(e) => Outcome::Error(e),
    }
}

fn run_supported(
    vector: &TestVector,
    config: &VariantConfig,
    backend: &dyn CipherBackend,
) -> Result<Outcome, CipherError> {
    let schedule = backend.expand_key(&vector.key_bytes(config), config)?;
    let plaintext = vector.plaintext_bytes(config);
    let ciphertext = vector.ciphertext_bytes(config);

    let mut block = plaintext.clone();
    backend.encrypt(&mut block, &schedule, config)?;
    if block != ciphertext {
        return Ok(Outcome::Encrypt {
            expected: ciphertext,
            found: block,
        });
    }

    backend.decrypt(&mut block, &schedule, config)?;
    if block != plaintext {
        return Ok(Outcome::Decrypt {
            expected: plaintext,
            found: block,
        });
    }
    Ok(Outcome::Pass)
}

/// Runs every published vector against `backend`.
pub fn check(backend: &dyn CipherBackend) -> Vec<(&'static TestVector, Outcome)> {
    all().map(|v| (v, run(v, backend))).collect()
}
