//! Per-tree key derivation (L3).
//!
//! Run once, early in a signing operation, [`KeySchedule::derive`] walks the hypertree top-down
//! from the secret key seed, populating one 3-share seed per Merkle-tree level plus one 3-share
//! FORS seed. Each level's seed is pulled from the *previous* level's PRF tree via
//! [`crate::prf_tree::eval_single_prf_leaf`] — the same PRF tree that level's [`crate::prf_tree::PrfIter`]
//! also draws its WOTS chain seeds from (see §4.4): external indices `[0, len * 2^h')` feed the
//! chains, and the one index beyond that, `leaf + len * 2^h'`, feeds the next level's seed.
use zeroize::Zeroize;

use crate::address::{AdrsType, Address};
use crate::params::Params;
use crate::prf_tree::eval_single_prf_leaf;

/// Upper bound on hypertree depth across the standardised parameter sets (the deepest is
/// `slh-dsa-shake-128f`, with `D = 22`).
pub const MAX_D: usize = 22;

/// Shifts `val` right by `shift` bits, treating `shift >= 64` as yielding zero.
///
/// The topmost hypertree level's tree-address shift can equal 64 bits (e.g. `d = 17`,
/// `h' = 4` gives a full height of 68 and a shift of `68 - 4 = 64` at the top level), and a
/// native right-shift by the full width is not uniformly defined.
fn shiftr64(val: u64, shift: u32) -> u64 {
    if shift >= 64 {
        0
    } else {
        val >> shift
    }
}

/// The seeds derived once per signing operation: one per hypertree level, plus the FORS seed.
pub struct KeySchedule<const N: usize> {
    /// `merkle_key[level]` is the 3-share seed for the Merkle tree at that hypertree level.
    pub merkle_key: [[[u8; N]; 3]; MAX_D],
    /// The 3-share seed for the FORS layer beneath the bottom-most Merkle tree.
    pub fors_seed: [[u8; N]; 3],
    d: usize,
}

impl<const N: usize> Zeroize for KeySchedule<N> {
    fn zeroize(&mut self) {
        for level in self.merkle_key.iter_mut() {
            for share in level.iter_mut() {
                share.zeroize();
            }
        }
        for share in self.fors_seed.iter_mut() {
            share.zeroize();
        }
    }
}

impl<const N: usize> KeySchedule<N> {
    /// Derives the key schedule for the Merkle leaf named by `tree` (hypertree locator) and
    /// `idx_leaf` (leaf-within-leaf-tree), from the secret key seed `sk_seed`.
    pub fn derive<P: Params>(sk_seed: &[[u8; N]; 3], pub_seed: &[u8; N], tree: u64, idx_leaf: u32) -> Self {
        debug_assert_eq!(P::N, N);
        debug_assert!(P::D <= MAX_D);

        let d = P::D;
        let h_prime = P::H_PRIME as u32;
        let len = P::LEN as u64;
        let t_prime = 1u64 << h_prime;

        let mut merkle_key: [[[u8; N]; 3]; MAX_D] = [[[0u8; N]; 3]; MAX_D];
        merkle_key[d - 1] = *sk_seed;

        let mut fors_seed = [[0u8; N]; 3];
        let mut parent_seed = *sk_seed;

        for level in (0..d).rev() {
            let tree_shift = level as u32 * h_prime;

            let mut addr = Address::new();
            addr.set_type(AdrsType::PrfMerkle);
            addr.set_layer_addr(level as u32);
            addr.set_tree_addr(shiftr64(tree, tree_shift));

            let leaf: u32 = if level == 0 {
                idx_leaf
            } else {
                let shift = tree_shift - h_prime;
                ((tree >> shift) as u32) & ((1u32 << h_prime) - 1)
            };

            let external_index = leaf as u64 + len * t_prime;
            let n_leaves_prf = (len + 1) * t_prime;

            let child = eval_single_prf_leaf(
                &parent_seed,
                external_index as u32,
                n_leaves_prf,
                pub_seed,
                &addr,
            );

            if level == 0 {
                fors_seed = child;
            } else {
                merkle_key[level - 1] = child;
            }
            parent_seed = child;
        }

        KeySchedule { merkle_key, fors_seed, d }
    }

    /// Number of populated entries in `merkle_key` (equal to `P::D`).
    pub fn depth(&self) -> usize {
        self.d
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::params::Shake128s;

    #[test]
    fn derive_is_deterministic_and_fills_every_level() {
        let sk_seed = [[1u8; 16], [2u8; 16], [3u8; 16]];
        let pub_seed = [9u8; 16];

        let a = KeySchedule::<16>::derive::<Shake128s>(&sk_seed, &pub_seed, 42, 3);
        let b = KeySchedule::<16>::derive::<Shake128s>(&sk_seed, &pub_seed, 42, 3);

        assert_eq!(a.depth(), Shake128s::D);
        for level in 0..a.depth() {
            assert_eq!(a.merkle_key[level], b.merkle_key[level]);
        }
        assert_eq!(a.fors_seed, b.fors_seed);
        assert_eq!(a.merkle_key[a.depth() - 1], sk_seed);
    }

    #[test]
    fn different_leaves_yield_different_fors_seeds() {
        let sk_seed = [[1u8; 16], [2u8; 16], [3u8; 16]];
        let pub_seed = [9u8; 16];

        let a = KeySchedule::<16>::derive::<Shake128s>(&sk_seed, &pub_seed, 42, 3);
        let b = KeySchedule::<16>::derive::<Shake128s>(&sk_seed, &pub_seed, 42, 4);

        assert_ne!(a.fors_seed, b.fors_seed);
    }
}
