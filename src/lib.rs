//! A side-channel-hardened core for SPHINCS+ / SLH-DSA style hash-based signatures.
//!
//! This crate implements four layers that sit directly on top of each other:
//!
//! 1. [`keccak`] — a boolean-masked (3-share XOR) Keccak-p\[1600,24\] permutation that runs a
//!    handful of masked rounds at the start and end of the permutation and unmasked rounds in
//!    between, once the state has sufficiently diffused that per-share correlation is no longer
//!    practically recoverable from a single trace.
//! 2. [`chain`] — a chained F-function driver that keeps the permutation's input lanes resident
//!    across a whole Winternitz chain, re-using the header lanes (public seed, address, padding)
//!    instead of rebuilding them for every step.
//! 3. [`prf_tree`] — a 4-ary PRF tree, walked by a stateful iterator that emits secret seed leaves
//!    in increasing external-index order while sharing the computation of shared path prefixes.
//! 4. [`key_schedule`] — the one-shot derivation, run once per signing operation, that walks the
//!    hypertree top-down and populates a seed per level plus the FORS seed.
//!
//! Everything above this — message digestion, the tweakable hash, Merkle authentication paths,
//! and the public `sign`/`verify` entry points — is out of scope. [`address`] and [`params`]
//! provide minimal, self-consistent stand-ins for the address block and parameter table those
//! outer layers would otherwise own, just enough for the four layers above to be exercised and
//! tested on their own.
#![no_std]
#![allow(clippy::needless_range_loop)]

pub mod address;
pub mod chain;
pub mod key_schedule;
pub mod keccak;
pub mod params;
pub mod prf_tree;

pub use address::{AdrsType, Address};
pub use chain::ChainState;
pub use key_schedule::KeySchedule;
pub use params::{Params, Shake128f, Shake128s, Shake192f, Shake192s, Shake256f, Shake256s};
pub use prf_tree::PrfIter;
