//! Link-signature hashing.
//!
//! Group keys are derived from a 64-bit FNV-1a hash over a canonical byte
//! serialization of a node's links, so the same signature yields the same key
//! on every run and platform. The hash is not collision-free: two different
//! signatures that collide are merged into one group.

use crate::core::models::ids::GroupKey;
use crate::core::models::node::Link;
use std::hash::Hasher;

const FNV_OFFSET_BASIS: u64 = 0xcbf2_9ce4_8422_2325;
const FNV_PRIME: u64 = 0x0000_0100_0000_01b3;

/// 64-bit FNV-1a hasher.
#[derive(Debug, Clone, Copy)]
pub struct Fnv1a(u64);

impl Default for Fnv1a {
    fn default() -> Self {
        Self(FNV_OFFSET_BASIS)
    }
}

impl Hasher for Fnv1a {
    fn finish(&self) -> u64 {
        self.0
    }

    fn write(&mut self, bytes: &[u8]) {
        for byte in bytes {
            self.0 ^= u64::from(*byte);
            self.0 = self.0.wrapping_mul(FNV_PRIME);
        }
    }
}

pub fn fnv1a64(bytes: &[u8]) -> u64 {
    let mut hasher = Fnv1a::default();
    hasher.write(bytes);
    hasher.finish()
}

/// Serializes a link list as a set: sorted, deduplicated, one record per pair.
///
/// Each record is the layer name's byte length (u64 LE), the name itself and
/// the target id (i64 LE), so no layer name can imitate a record boundary.
pub fn canonical_signature(links: &[Link]) -> Vec<u8> {
    let mut pairs: Vec<&Link> = links.iter().collect();
    pairs.sort();
    pairs.dedup();

    let mut bytes = Vec::with_capacity(pairs.len() * 24);
    for link in pairs {
        let name = link.layer.as_bytes();
        bytes.extend_from_slice(&(name.len() as u64).to_le_bytes());
        bytes.extend_from_slice(name);
        bytes.extend_from_slice(&link.target.value().to_le_bytes());
    }
    bytes
}

/// Group key of a node with `links` inside `layer_name`.
///
/// Mixing in the layer name keeps identical signatures in different layers
/// apart. Nodes without links share the key of the empty signature.
pub fn group_key(links: &[Link], layer_name: &str) -> GroupKey {
    let signature = fnv1a64(&canonical_signature(links));
    GroupKey::from_hash(signature ^ fnv1a64(layer_name.as_bytes()))
}
