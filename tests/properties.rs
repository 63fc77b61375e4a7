//! Round-trip, determinism, isolation and sharing properties.

use std::sync::Arc;
use std::thread;

use rand::{Rng, RngCore, SeedableRng};
use rand::rngs::StdRng;
use speck_simon::{
    expand_bytes, CipherError, Cipher, Family, Generic, Native, RoundKeySchedule, VariantConfig,
};

fn random_bytes(rng: &mut StdRng, len: usize) -> Vec<u8> {
    let mut out = vec![0u8; len];
    rng.fill_bytes(&mut out);
    out
}

#[test]
fn test_round_trip_random_blocks() {
    let mut rng = StdRng::seed_from_u64(0x5eed);
    for cfg in VariantConfig::all() {
        for _ in 0..32 {
            let key = random_bytes(&mut rng, cfg.key_bytes());
            let cipher = Cipher::new(cfg, &key).unwrap();
            let plaintext = random_bytes(&mut rng, cfg.block_bytes());

            let mut block = plaintext.clone();
            cipher.encrypt_block(&mut block).unwrap();
            cipher.decrypt_block(&mut block).unwrap();
            assert_eq!(block, plaintext, "{} round trip failed", cfg);
        }
    }
}

#[test]
fn test_round_trip_native_random_words() {
    let mut rng = StdRng::seed_from_u64(42);
    for cfg in VariantConfig::all().filter(|c| matches!(c.word_bits(), 16 | 32 | 64)) {
        let key = random_bytes(&mut rng, cfg.key_bytes());
        let native = Cipher::with_backend(cfg, &key, &Native).unwrap();
        let generic = Cipher::with_backend(cfg, &key, &Generic).unwrap();
        let mask = cfg.word().mask();
        for _ in 0..64 {
            let words = [rng.gen::<u64>() & mask, rng.gen::<u64>() & mask];
            let ct = native.encrypt_words(words).unwrap();
            assert_eq!(ct, generic.encrypt_words(words).unwrap(), "{}", cfg);
            assert_eq!(native.decrypt_words(ct).unwrap(), words, "{}", cfg);
        }
    }
}

#[test]
fn test_determinism() {
    let cfg = VariantConfig::by_name("simon128/256").unwrap();
    let key = [0x42u8; 32];
    let a = expand_bytes(&key, &cfg).unwrap();
    let b = expand_bytes(&key, &cfg).unwrap();
    assert_eq!(a, b);

    let cipher = Cipher::new(cfg, &key).unwrap();
    let first = cipher.encrypt_words([7, 9]).unwrap();
    for _ in 0..10 {
        assert_eq!(cipher.encrypt_words([7, 9]).unwrap(), first);
    }
}

#[test]
fn test_ciphertext_differs_from_plaintext() {
    let mut rng = StdRng::seed_from_u64(7);
    for cfg in VariantConfig::all() {
        let cipher = Cipher::new(cfg, &random_bytes(&mut rng, cfg.key_bytes())).unwrap();
        let plaintext = random_bytes(&mut rng, cfg.block_bytes());
        let mut block = plaintext.clone();
        cipher.encrypt_block(&mut block).unwrap();
        assert_ne!(block, plaintext, "{}", cfg);
    }
}

#[test]
fn test_cross_family_isolation() {
    for speck in VariantConfig::all().filter(|c| c.family() == Family::Speck) {
        let simon = VariantConfig::new(Family::Simon, speck.word_bits(), speck.key_words()).unwrap();
        assert_ne!(speck.rounds(), simon.rounds());
        assert_ne!(speck.rotations(), simon.rotations());

        let key = vec![0x3cu8; speck.key_bytes()];
        let a = Cipher::new(speck, &key).unwrap();
        let b = Cipher::new(simon, &key).unwrap();
        assert_eq!(a.schedule().keys()[0], b.schedule().keys()[0]);
        assert_ne!(a.schedule().keys()[1..], b.schedule().keys()[1..speck.rounds()]);
        assert_ne!(
            a.encrypt_words([1, 2]).unwrap(),
            b.encrypt_words([1, 2]).unwrap(),
            "{}",
            speck
        );
    }
}

#[test]
fn test_length_errors_are_per_call() {
    let cfg = VariantConfig::by_name("speck96/144").unwrap();
    let cipher = Cipher::new(cfg, &[1u8; 18]).unwrap();

    let mut short = [0u8; 11];
    assert_eq!(
        cipher.encrypt_block(&mut short),
        Err(CipherError::BlockLength {
            expected: 12,
            found: 11
        })
    );

    // The cipher still works after a rejected call.
    let mut block = [5u8; 12];
    cipher.encrypt_block(&mut block).unwrap();
    cipher.decrypt_block(&mut block).unwrap();
    assert_eq!(block, [5u8; 12]);

    assert!(matches!(
        Cipher::new(cfg, &[1u8; 17]),
        Err(CipherError::KeyLength { expected: 18, found: 17 })
    ));
    assert!(matches!(
        RoundKeySchedule::from_words(&cfg, vec![0; 28]),
        Err(CipherError::ScheduleLength { expected: 29, found: 28 })
    ));
}

#[test]
fn test_shared_schedule_across_threads() {
    let cfg = VariantConfig::by_name("speck128/128").unwrap();
    let cipher = Arc::new(Cipher::new(cfg, &[0xabu8; 16]).unwrap());
    let expected: Vec<[u64; 2]> = (0..8u64)
        .map(|i| cipher.encrypt_words([i, !i]).unwrap())
        .collect();

    let handles: Vec<_> = (0..8u64)
        .map(|i| {
            let cipher = Arc::clone(&cipher);
            thread::spawn(move || {
                let mut out = [0u64; 2];
                for _ in 0..1000 {
                    out = cipher.encrypt_words([i, !i]).unwrap();
                    assert_eq!(cipher.decrypt_words(out).unwrap(), [i, !i]);
                }
                out
            })
        })
        .collect();

    for (i, handle) in handles.into_iter().enumerate() {
        assert_eq!(handle.join().unwrap(), expected[i]);
    }
}
