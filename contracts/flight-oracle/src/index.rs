//! Shard index assignment for oracles and index derivation for requests.

use soroban_sdk::{xdr::ToXdr, BytesN, Env, String, Vec};

use crate::types::INDEXES_PER_ORACLE;

/// Draw `INDEXES_PER_ORACLE` distinct indices from `[0, range)`.
///
/// Each slot is drawn independently from the host PRNG; a draw that repeats
/// an index already held by this oracle is redrawn. `range` must be at least
/// `INDEXES_PER_ORACLE`, which `initialize` enforces.
pub fn assign_indexes(env: &Env, range: u32) -> Vec<u32> {
    let mut indexes: Vec<u32> = Vec::new(env);
    while indexes.len() < INDEXES_PER_ORACLE {
        let candidate = env.prng().gen_range::<u64>(0..u64::from(range)) as u32;
        if !indexes.contains(candidate) {
            indexes.push_back(candidate);
        }
    }
    indexes
}

/// Derive the shard index for a status request.
///
/// The key is hashed together with a fresh PRNG seed so that the index of a
/// reissued request cannot be predicted from the flight alone.
pub fn derive_request_index(env: &Env, flight: &String, timestamp: u64, range: u32) -> u32 {
    let seed: u64 = env.prng().gen();
    let payload = (flight.clone(), timestamp, seed).to_xdr(env);
    let digest: BytesN<32> = env.crypto().sha256(&payload).into();
    index_from_digest(&digest.to_array(), range)
}

/// Reduce a 32 byte digest to an index in `[0, range)`.
pub fn index_from_digest(digest: &[u8; 32], range: u32) -> u32 {
    let mut head = [0u8; 8];
    head.copy_from_slice(&digest[..8]);
    (u64::from_be_bytes(head) % u64::from(range.max(1))) as u32
}

/// Whether an oracle holding `indexes` may answer a request on `index`.
pub fn covers(indexes: &Vec<u32>, index: u32) -> bool {
    indexes.contains(index)
}
