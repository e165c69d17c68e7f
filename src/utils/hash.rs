//! Fast, non-cryptographic hashing for the inline maps of the cache. Keys are
//! short paths and small tuples, where Fx beats SipHash by a wide margin.

pub use rustc_hash::FxHasher;

pub type FastHashMap<K, V> = rustc_hash::FxHashMap<K, V>;
