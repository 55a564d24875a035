//! Stable string hashing for categorical columns.
//!
//! Hashed category ids end up in trained model weights, so the hash must not
//! change between processes or platforms. `std`'s `DefaultHasher` is seeded
//! per process and is unsuitable; this module uses the 64-bit djb2 hash over
//! the UTF-8 bytes of the input.

/// Initial state of the djb2 hash.
const DJB2_SEED: u64 = 5381;

/// Hashes a string with 64-bit djb2 (`h = h * 33 + byte`, wrapping).
///
/// # Examples
///
/// ```
/// use feature_column::hash::stable_hash;
///
/// assert_eq!(stable_hash(""), 5381);
/// assert_eq!(stable_hash("a"), 5381 * 33 + 97);
/// ```
pub fn stable_hash(s: &str) -> u64 {
    hash_bytes(DJB2_SEED, s.as_bytes())
}

/// Hashes an ordered sequence of strings into a single value.
///
/// Each element is separated by a `0x1f` unit separator so that
/// `["ab", "c"]` and `["a", "bc"]` do not collide.
pub fn stable_hash_all<S: AsRef<str>>(values: &[S]) -> u64 {
    let mut hash = DJB2_SEED;
    for (i, value) in values.iter().enumerate() {
        if i > 0 {
            hash = hash_bytes(hash, &[0x1f]);
        }
        hash = hash_bytes(hash, value.as_ref().as_bytes());
    }
    hash
}

/// Maps a hash into `[0, bucket_size)`.
///
/// `bucket_size` must be non-zero; column constructors guarantee this.
#[inline]
pub fn bucket_of(hash: u64, bucket_size: usize) -> usize {
    (hash % bucket_size as u64) as usize
}

fn hash_bytes(mut hash: u64, bytes: &[u8]) -> u64 {
    for &byte in bytes {
        hash = hash.wrapping_mul(33).wrapping_add(byte as u64);
    }
    hash
}
