//! The chained F-function driver (L1).
//!
//! A [`ChainState`] holds the masked permutation's 75-lane input resident across a whole
//! Winternitz chain: the public seed and address are packed in once, at [`ChainState::setup`],
//! and every subsequent [`ChainState::transform`] only rewrites the running-hash lanes and
//! (through [`ChainState::increment_hash_addr`]) the address's hash-addr word. This amortises the
//! byte↔lane conversion and padding setup that would otherwise be repeated on every step.
use zeroize::Zeroize;

use crate::address::{AdrsType, Address, OFFSET_HASH_ADDR};
use crate::keccak;

/// Byte offset, within the 200-byte SHAKE-256 state, where a domain-separated XOF is padded.
const SHAKE_PAD_BYTE: u64 = 0x1f;

/// Lane index of the last lane of the SHAKE-256 rate (136-byte rate == 17 lanes, 0-indexed 16).
const RATE_BOUNDARY_LANE: usize = 16;

/// The masked permutation's 75-lane working state for one Winternitz chain.
///
/// Lanes `[0, n_lanes)` hold the public seed (shared across all three shares, never masked). Lanes
/// `[n_lanes, n_lanes + 4)` hold the 32-byte address, also shared. The running hash occupies
/// `[hash_offset, hash_offset + n_lanes)` in share 0, and the parallel slots 25 and 50 lanes
/// further on in shares 1 and 2 while the chain is still masked.
#[derive(Clone)]
pub struct ChainState {
    lanes: [u64; 75],
    hash_offset: usize,
    n_lanes: usize,
}

impl Zeroize for ChainState {
    fn zeroize(&mut self) {
        self.lanes.zeroize();
        self.hash_offset.zeroize();
        self.n_lanes.zeroize();
    }
}

impl ChainState {
    /// Builds a new chain state: packs `pub_seed` and `addr` into the header lanes, the three
    /// `N`-byte `prf_shares` into the running-hash lanes, and writes the SHAKE-256 padding.
    /// Returns the chain state and the lane offset at which the running hash lives.
    pub fn setup<const N: usize>(
        pub_seed: &[u8; N],
        prf_shares: &[[u8; N]; 3],
        addr: &Address,
    ) -> (Self, usize) {
        debug_assert_eq!(N % 8, 0, "digest length must be a whole number of lanes");
        let n_lanes = N / 8;
        debug_assert!(n_lanes + 4 <= 25, "public seed and address must fit in one rate block");

        let mut lanes = [0u64; 75];

        keccak::lanes_from_bytes(&mut lanes[0..n_lanes], pub_seed);
        keccak::lanes_from_bytes(&mut lanes[n_lanes..n_lanes + 4], addr.as_bytes());

        let hash_offset = n_lanes + 4;
        keccak::lanes_from_bytes(&mut lanes[hash_offset..hash_offset + n_lanes], &prf_shares[0]);
        keccak::lanes_from_bytes(
            &mut lanes[25 + hash_offset..25 + hash_offset + n_lanes],
            &prf_shares[1],
        );
        keccak::lanes_from_bytes(
            &mut lanes[50 + hash_offset..50 + hash_offset + n_lanes],
            &prf_shares[2],
        );

        lanes[hash_offset + n_lanes] = SHAKE_PAD_BYTE;
        lanes[RATE_BOUNDARY_LANE] ^= 1u64 << 63;

        (
            ChainState {
                lanes,
                hash_offset,
                n_lanes,
            },
            hash_offset,
        )
    }

    /// Lane offset at which the running hash lives, as returned by [`ChainState::setup`].
    pub fn hash_offset(&self) -> usize {
        self.hash_offset
    }

    /// Advances the address's hash-addr word by one. The address is never masked, so this
    /// touches share 0's lanes only.
    pub fn increment_hash_addr<const N: usize>(&mut self) {
        let n_lanes = N / 8;
        let word_idx = OFFSET_HASH_ADDR / 8;
        let bit_shift = 8 * (OFFSET_HASH_ADDR % 8);
        let idx = n_lanes + word_idx;
        self.lanes[idx] = self.lanes[idx].wrapping_add(1u64 << bit_shift);
    }

    /// Runs the masked permutation once, writing the result back into the running-hash lanes.
    /// When `keep_masked` is false, the chain state thereafter carries a single unmasked share.
    pub fn transform(&mut self, keep_masked: bool) {
        let n_lanes = self.n_lanes;
        let mut out = [0u64; 75];
        keccak::permute(&self.lanes, &mut out, keep_masked);

        let off = self.hash_offset;
        self.lanes[off..off + n_lanes].copy_from_slice(&out[0..n_lanes]);
        if keep_masked {
            self.lanes[25 + off..25 + off + n_lanes].copy_from_slice(&out[25..25 + n_lanes]);
            self.lanes[50 + off..50 + off + n_lanes].copy_from_slice(&out[50..50 + n_lanes]);
        }
    }

    /// Serialises `N` consecutive lanes starting at `offset` as little-endian bytes. Valid for
    /// any offset within the 75-lane state, most commonly `hash_offset` once the chain has
    /// produced a single unmasked share.
    pub fn untransform<const N: usize>(&self, offset: usize) -> [u8; N] {
        let n_lanes = N / 8;
        let mut out = [0u8; N];
        keccak::bytes_from_lanes(&self.lanes[offset..offset + n_lanes], &mut out);
        out
    }

    /// Reads the three running-hash shares and XORs them together, un-masking the current hash
    /// without advancing the chain. Used to capture a WOTS signature value mid-chain, while the
    /// state is still masked.
    pub fn collapsed<const N: usize>(&self) -> [u8; N] {
        let n_lanes = N / 8;
        let off = self.hash_offset;
        let mut tmp = [0u64; 4];
        for i in 0..n_lanes {
            tmp[i] = self.lanes[off + i] ^ self.lanes[off + 25 + i] ^ self.lanes[off + 50 + i];
        }
        let mut out = [0u8; N];
        keccak::bytes_from_lanes(&tmp[..n_lanes], &mut out);
        out
    }
}

/// Drives a masked PRF hash: feeds `input_shares` into a fresh chain state and runs a single
/// masked-output transform. This is the CORE's own implementation of the external "masked PRF
/// hash function" contract of §6.2, which the reference design describes as calling into L0
/// through a setup identical to L1's.
pub fn prf_hash_function<const N: usize>(
    pub_seed: &[u8; N],
    addr: &Address,
    input_shares: &[[u8; N]; 3],
) -> [[u8; N]; 3] {
    let (mut cs, offset) = ChainState::setup(pub_seed, input_shares, addr);
    cs.transform(true);
    [
        cs.untransform(offset),
        cs.untransform(offset + 25),
        cs.untransform(offset + 50),
    ]
}

/// Drives one WOTS+ hash chain of `w - 1` steps.
///
/// `sig_step`, if present, names the step (in `0..w-1`) whose value should be captured as the
/// WOTS signature for this chain; the digit value `w - 1` itself needs no mid-chain capture,
/// since it equals the returned public-key value. Returns the captured signature value (if
/// `sig_step` was in range) and the chain's public-key value.
pub fn wots_chain<const N: usize>(
    pub_seed: &[u8; N],
    addr: &mut Address,
    chain_idx: u32,
    w: usize,
    sig_step: Option<usize>,
    prf_shares: &[[u8; N]; 3],
) -> (Option<[u8; N]>, [u8; N]) {
    debug_assert!(w >= 2, "a Winternitz chain needs at least one step");

    addr.set_type(AdrsType::WotsHash);
    addr.set_chain_addr(chain_idx);
    addr.set_hash_addr(0);

    let (mut cs, _offset) = ChainState::setup(pub_seed, prf_shares, addr);

    let steps = w - 1;
    let mut sig_value = None;
    for k in 0..steps {
        if sig_step == Some(k) {
            sig_value = Some(cs.collapsed::<N>());
        }
        let keep_masked = k < steps - 1;
        cs.transform(keep_masked);
        cs.increment_hash_addr::<N>();
    }

    let pk_value = cs.untransform(cs.hash_offset());
    (sig_value, pk_value)
}

/// Drives the single F application used to derive one FORS tree leaf from its secret value.
pub fn fors_leaf<const N: usize>(
    pub_seed: &[u8; N],
    addr: &mut Address,
    prf_shares: &[[u8; N]; 3],
) -> [u8; N] {
    addr.set_type(AdrsType::ForsTree);
    let (mut cs, offset) = ChainState::setup(pub_seed, prf_shares, addr);
    cs.transform(false);
    cs.untransform(offset)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn seed16(tag: u8) -> [u8; 16] {
        let mut s = [0u8; 16];
        for (i, b) in s.iter_mut().enumerate() {
            *b = tag.wrapping_add(i as u8);
        }
        s
    }

    #[test]
    fn setup_places_padding_and_domain_bit() {
        let pub_seed = seed16(1);
        let shares = [seed16(2), seed16(3), seed16(4)];
        let addr = Address::new();
        let (cs, offset) = ChainState::setup(&pub_seed, &shares, &addr);

        assert_eq!(offset, 16 / 8 + 4);
        assert_eq!(cs.lanes[offset + 2], 0x1f);
        assert_eq!(cs.lanes[16] & (1 << 63), 1 << 63);
    }

    #[test]
    fn increment_hash_addr_only_touches_share_zero() {
        let pub_seed = seed16(1);
        let shares = [seed16(2), seed16(3), seed16(4)];
        let addr = Address::new();
        let (mut cs, _offset) = ChainState::setup(&pub_seed, &shares, &addr);

        let before = cs.lanes;
        cs.increment_hash_addr::<16>();

        let mut differences = 0;
        for i in 0..75 {
            if cs.lanes[i] != before[i] {
                differences += 1;
            }
        }
        assert_eq!(differences, 1);
    }

    #[test]
    fn wots_chain_runs_exactly_w_minus_one_transforms() {
        let pub_seed = seed16(5);
        let shares = [seed16(6), seed16(7), seed16(8)];
        let mut addr = Address::new();

        let (sig, pk) = wots_chain(&pub_seed, &mut addr, 0, 16, Some(3), &shares);
        assert!(sig.is_some());
        assert_ne!(sig.unwrap(), pk);

        let (sig_last, pk_last) = wots_chain(&pub_seed, &mut addr, 0, 16, Some(14), &shares);
        assert_eq!(sig_last.unwrap(), pk_last);
        assert_eq!(pk_last, pk);
    }

    #[test]
    fn fors_leaf_is_deterministic() {
        let pub_seed = seed16(9);
        let shares = [seed16(10), seed16(11), seed16(12)];
        let mut addr1 = Address::new();
        let mut addr2 = Address::new();

        let a = fors_leaf(&pub_seed, &mut addr1, &shares);
        let b = fors_leaf(&pub_seed, &mut addr2, &shares);
        assert_eq!(a, b);
    }
}
