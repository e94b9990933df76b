//! A minimal 32-byte address block.
//!
//! This is the "external collaborator" of §6 in concrete form: a small, self-consistent
//! 8-word structured label, laid out the way SLH-DSA's own `ADRS` is (layer address, tree
//! address, type, three type-specific words). The CORE only ever reaches into it by the single
//! named offset `OFFSET_HASH_ADDR`; everything else here exists so [`crate::chain`] and
//! [`crate::prf_tree`] have something concrete to mutate and so the crate's tests can assert
//! that mutating one field leaves the others untouched.

use byteorder::{BigEndian, ByteOrder};

/// Size of an address block in bytes.
pub const ADRS_SIZE: usize = 32;

/// Byte offset of the hash-address word within the address block.
///
/// This is the one offset the CORE references by name (§4.2, §6).
pub const OFFSET_HASH_ADDR: usize = 28;

const WORD_LAYER: usize = 0;
const WORD_TYPE: usize = 4;
const WORD_KEYPAIR: usize = 5;
const WORD_CHAIN: usize = 6;
const WORD_HASH: usize = 7;

/// The address-block `type` field, selecting which object an address refers to.
#[repr(u32)]
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum AdrsType {
    /// A WOTS+ hash chain step.
    WotsHash = 0,
    /// A WOTS+ public key compression.
    WotsPk = 1,
    /// A Merkle tree node.
    Tree = 2,
    /// A FORS tree node.
    ForsTree = 3,
    /// A FORS root compression.
    ForsRoots = 4,
    /// A PRF-tree step feeding a Merkle-layer seed (L3).
    PrfMerkle = 5,
    /// A PRF-tree step feeding the FORS seed (L3).
    PrfFors = 6,
}

/// A structured 32-byte address block, mutated in place by [`crate::chain`] and
/// [`crate::prf_tree`] as they walk a Winternitz chain or a PRF tree.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Address([u8; ADRS_SIZE]);

impl Address {
    /// The all-zero address.
    pub fn new() -> Self {
        Self::default()
    }

    /// Raw bytes, for packing into a chain state's lanes.
    pub fn as_bytes(&self) -> &[u8; ADRS_SIZE] {
        &self.0
    }

    fn word(&self, idx: usize) -> u32 {
        BigEndian::read_u32(&self.0[idx * 4..idx * 4 + 4])
    }

    fn set_word(&mut self, idx: usize, value: u32) {
        BigEndian::write_u32(&mut self.0[idx * 4..idx * 4 + 4], value);
    }

    /// Sets the address `type` field.
    pub fn set_type(&mut self, t: AdrsType) {
        self.set_word(WORD_TYPE, t as u32);
    }

    /// Sets the hypertree layer address.
    pub fn set_layer_addr(&mut self, layer: u32) {
        self.set_word(WORD_LAYER, layer);
    }

    /// Sets the 64-bit Merkle tree address (the low 64 bits of the 12-byte tree-address field).
    pub fn set_tree_addr(&mut self, tree: u64) {
        self.set_word(1, 0);
        self.set_word(2, (tree >> 32) as u32);
        self.set_word(3, tree as u32);
    }

    /// Sets the keypair address (which WOTS keypair, within a Merkle tree, this address names).
    pub fn set_keypair_addr(&mut self, keypair: u32) {
        self.set_word(WORD_KEYPAIR, keypair);
    }

    /// Sets the WOTS chain address (which of the `len` chains within a keypair).
    pub fn set_chain_addr(&mut self, chain: u32) {
        self.set_word(WORD_CHAIN, chain);
    }

    /// Sets the hash address (how many `F` applications into the chain).
    pub fn set_hash_addr(&mut self, hash: u32) {
        self.set_word(WORD_HASH, hash);
    }

    /// Sets the tree height, for Merkle/FORS node addresses. Shares storage with the chain word.
    pub fn set_tree_height(&mut self, height: u32) {
        self.set_word(WORD_CHAIN, height);
    }

    /// Sets the tree index, for Merkle/FORS node addresses. Shares storage with the hash word.
    pub fn set_tree_index(&mut self, index: u32) {
        self.set_word(WORD_HASH, index);
    }

    /// Sets the PRF-tree internal node number used by [`crate::prf_tree`]. Shares storage with
    /// the chain word, since a PRF-tree address never also needs a WOTS chain index.
    pub fn set_prf_index(&mut self, node: u32) {
        self.set_word(WORD_CHAIN, node);
    }

    /// Reads back the hash-address word (exposed for tests of [`crate::chain::ChainState`]'s
    /// address increment).
    pub fn hash_addr(&self) -> u32 {
        self.word(WORD_HASH)
    }

    /// Copies the layer, tree, and keypair fields from `other`, leaving `self`'s type field
    /// untouched. Used when deriving a WOTS-public-key address from a chain address.
    pub fn copy_keypair_addr(&mut self, other: &Address) {
        self.0[0..16].copy_from_slice(&other.0[0..16]);
        self.0[WORD_KEYPAIR * 4..WORD_KEYPAIR * 4 + 4]
            .copy_from_slice(&other.0[WORD_KEYPAIR * 4..WORD_KEYPAIR * 4 + 4]);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tree_addr_round_trips_through_words() {
        let mut a = Address::new();
        a.set_tree_addr(0x0102_0304_0506_0708);
        assert_eq!(a.word(2), 0x0102_0304);
        assert_eq!(a.word(3), 0x0506_0708);
    }

    #[test]
    fn hash_addr_offset_matches_word_seven() {
        let mut a = Address::new();
        a.set_hash_addr(7);
        assert_eq!(OFFSET_HASH_ADDR, 7 * 4);
        assert_eq!(a.hash_addr(), 7);
    }

    #[test]
    fn copy_keypair_addr_preserves_type() {
        let mut src = Address::new();
        src.set_type(AdrsType::WotsHash);
        src.set_layer_addr(3);
        src.set_tree_addr(99);
        src.set_keypair_addr(5);

        let mut dst = Address::new();
        dst.set_type(AdrsType::WotsPk);
        dst.copy_keypair_addr(&src);

        assert_eq!(dst.word(WORD_LAYER), 3);
        assert_eq!(dst.word(WORD_KEYPAIR), 5);
        assert_eq!(dst.word(WORD_TYPE), AdrsType::WotsPk as u32);
    }
}
