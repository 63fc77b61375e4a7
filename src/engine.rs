//! The round loop: forward for encryption, backward for decryption.

use crate::error::CipherError;
use crate::primitive::{CipherState, RoundPrimitive};
use crate::schedule::RoundKeySchedule;
use crate::variant::VariantConfig;

/// Encrypts one block in place.
///
/// `block` holds word 0 (y) then word 1 (x), little-endian.
pub fn encrypt(
    block: &mut [u8],
    schedule: &RoundKeySchedule,
    config: &VariantConfig,
) -> Result<(), CipherError> {
    check(block, schedule, config)?;
    let state = encrypt_state(load(block, config), schedule.keys(), &RoundPrimitive::new(config));
    store(state, block, config);
    Ok(())
}

/// Decrypts one block in place.
pub fn decrypt(
    block: &mut [u8],
    schedule: &RoundKeySchedule,
    config: &VariantConfig,
) -> Result<(), CipherError> {
    check(block, schedule, config)?;
    let state = decrypt_state(load(block, config), schedule.keys(), &RoundPrimitive::new(config));
    store(state, block, config);
    Ok(())
}

/// Runs round 0 through `keys.len() - 1`.
pub fn encrypt_state(mut state: CipherState, keys: &[u64], primitive: &RoundPrimitive) -> CipherState {
    for &k in keys {
        primitive.forward(&mut state, k);
    }
    state
}

/// Runs the inverse rounds from the last round key down to round 0.
pub fn decrypt_state(mut state: CipherState, keys: &[u64], primitive: &RoundPrimitive) -> CipherState {
    for &k in keys.iter().rev() {
        primitive.inverse(&mut state, k);
    }
    state
}

/// Entry checks shared by every backend.
pub(crate) fn check(
    block: &[u8],
    schedule: &RoundKeySchedule,
    config: &VariantConfig,
) -> Result<(), CipherError> {
    if block.len() != config.block_bytes() {
        return Err(CipherError::BlockLength {
            expected: config.block_bytes(),
            found: block.len(),
        });
    }
    if schedule.config() != config {
        return Err(CipherError::VariantMismatch {
            expected: config.name(),
            found: schedule.config().name(),
        });
    }
    if schedule.len() != config.rounds() {
        return Err(CipherError::ScheduleLength {
            expected: config.rounds(),
            found: schedule.len(),
        });
    }
    Ok(())
}

pub(crate) fn load(block: &[u8], config: &VariantConfig) -> CipherState {
    let w = config.word();
    let n = w.bytes();
    CipherState::new(w.read(&block[n..]), w.read(block))
}

pub(crate) fn store(state: CipherState, block: &mut [u8], config: &VariantConfig) {
    let w = config.word();
    let n = w.bytes();
    w.write(state.right, block);
    w.write(state.left, &mut block[n..]);
}
