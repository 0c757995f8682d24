//! Deterministic RNG streams derived from a campaign seed.
use hmac::{Hmac, Mac};
use rand::SeedableRng;
use rand::rngs::SmallRng;
use sha2::Sha256;

/// Derive an independent stream seed for `domain_tag` from a user seed.
#[must_use]
pub fn derive_stream_seed(user_seed: u64, domain_tag: &[u8]) -> u64 {
    let mut mac =
        Hmac::<Sha256>::new_from_slice(&user_seed.to_le_bytes()).expect("64-bit seed is valid key");
    mac.update(domain_tag);
    let digest = mac.finalize().into_bytes();
    let seed_bytes: [u8; 8] = digest[..8].try_into().expect("digest slice length");
    u64::from_le_bytes(seed_bytes)
}

/// Small fast RNG for the `domain_tag` stream of `user_seed`.
#[must_use]
pub fn stream_rng(user_seed: u64, domain_tag: &[u8]) -> SmallRng {
    SmallRng::seed_from_u64(derive_stream_seed(user_seed, domain_tag))
}
