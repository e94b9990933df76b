//! Parameter-set configuration.
//!
//! The CORE itself only ever cares about three things derived from a parameter set: the digest
//! length `N` in bytes (always threaded through as a direct `const N: usize` generic, since
//! stable Rust has no way to use a trait's associated `const` as another item's array length),
//! the hypertree shape (`D`, `H_PRIME`), and the FORS shape (`K`, `A`). `W` is fixed by the
//! signature scheme at 16 and is included for completeness.
//!
//! The marker types below name the six standardised SLH-DSA-SHAKE parameter sets. They carry no
//! data and exist purely to select a `Params` impl at compile time.

/// A SLH-DSA parameter set.
///
/// `N` is deliberately *not* part of this trait's associated constants being used for array
/// sizing anywhere in this crate — every function that needs an `N`-byte buffer takes `N` as its
/// own `const` generic parameter. `Params::N` exists so call sites can assert the two agree.
pub trait Params {
    /// Digest length in bytes.
    const N: usize;
    /// Hypertree depth (number of Merkle tree layers).
    const D: usize;
    /// Height of a single Merkle tree within the hypertree.
    const H_PRIME: usize;
    /// Number of FORS trees.
    const K: usize;
    /// `log2` of the number of leaves in one FORS tree.
    const A: usize;
    /// Number of WOTS chains per key.
    const LEN: usize;
    /// Winternitz base. Fixed by the scheme.
    const W: usize = 16;

    /// Total hypertree height, `D * H_PRIME`.
    fn full_height() -> usize {
        Self::D * Self::H_PRIME
    }
}

macro_rules! param_set {
    ($name:ident, n = $n:expr, d = $d:expr, hp = $hp:expr, k = $k:expr, a = $a:expr, len = $len:expr) => {
        #[doc = concat!("The `", stringify!($name), "` parameter set.")]
        #[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
        pub struct $name;

        impl Params for $name {
            const N: usize = $n;
            const D: usize = $d;
            const H_PRIME: usize = $hp;
            const K: usize = $k;
            const A: usize = $a;
            const LEN: usize = $len;
        }
    };
}

param_set!(Shake128s, n = 16, d = 7, hp = 9, k = 14, a = 12, len = 35);
param_set!(Shake128f, n = 16, d = 22, hp = 3, k = 33, a = 6, len = 35);
param_set!(Shake192s, n = 24, d = 7, hp = 9, k = 17, a = 14, len = 51);
param_set!(Shake192f, n = 24, d = 22, hp = 3, k = 33, a = 8, len = 51);
param_set!(Shake256s, n = 32, d = 8, hp = 8, k = 22, a = 14, len = 67);
param_set!(Shake256f, n = 32, d = 17, hp = 4, k = 35, a = 9, len = 67);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn full_height_matches_standard_table() {
        assert_eq!(Shake128s::full_height(), 63);
        assert_eq!(Shake128f::full_height(), 66);
        assert_eq!(Shake192s::full_height(), 63);
        assert_eq!(Shake192f::full_height(), 66);
        assert_eq!(Shake256s::full_height(), 64);
        assert_eq!(Shake256f::full_height(), 68);
    }
}
