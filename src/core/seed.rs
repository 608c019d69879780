//! Master seed derivation.
//!
//! Derives the per-session board seed from the session id and creation
//! time through SHA-256. The original scheme (wall clock plus a small
//! random offset) was guessable within a small search space; hashing an
//! unpredictable session id closes that without changing the contract:
//! a 32-bit seed fixed at session creation.

use sha2::{Digest, Sha256};
use uuid::Uuid;

/// Domain separator for seed derivation.
const SEED_DOMAIN: &[u8] = b"GRIDPOP_SEED_V1";

/// Derive a master seed for a new session.
///
/// Deterministic in its inputs, so the same `(session_id, created_at)`
/// pair always yields the same seed; unpredictable because the session
/// id is a fresh v4 uuid.
pub fn derive_master_seed(session_id: &Uuid, created_at_unix_nanos: i64) -> u32 {
    let mut hasher = Sha256::new();

    hasher.update(SEED_DOMAIN);
    hasher.update(session_id.as_bytes());
    hasher.update(created_at_unix_nanos.to_le_bytes());

    let hash = hasher.finalize();

    // Take the first 4 bytes as the 32-bit seed
    u32::from_le_bytes(hash[0..4].try_into().expect("hash is 32 bytes"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_derive_deterministic() {
        let id = Uuid::from_u128(0x1234_5678_9abc_def0_1234_5678_9abc_def0);
        let seed1 = derive_master_seed(&id, 1_700_000_000_000_000_000);
        let seed2 = derive_master_seed(&id, 1_700_000_000_000_000_000);
        assert_eq!(seed1, seed2);
    }

    #[test]
    fn test_derive_varies_with_session() {
        let a = Uuid::from_u128(1);
        let b = Uuid::from_u128(2);
        let t = 1_700_000_000_000_000_000;
        assert_ne!(derive_master_seed(&a, t), derive_master_seed(&b, t));
    }

    #[test]
    fn test_derive_varies_with_time() {
        let id = Uuid::from_u128(42);
        assert_ne!(
            derive_master_seed(&id, 1_700_000_000_000_000_000),
            derive_master_seed(&id, 1_700_000_000_000_000_001)
        );
    }
}
