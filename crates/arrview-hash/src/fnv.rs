//! 64-bit FNV-1a as a [`Hasher`].

use std::hash::{BuildHasherDefault, Hasher};

/// FNV-1a offset basis for 64-bit.
pub const FNV_OFFSET: u64 = 0xcbf29ce484222325;
/// FNV-1a prime for 64-bit.
pub const FNV_PRIME: u64 = 0x00000100000001B3;

/// Streaming 64-bit FNV-1a hasher.
///
/// Integers reach [`write`](Hasher::write) as native-endian bytes, so
/// hashes agree across platforms of the same endianness only.
#[derive(Clone, Copy, Debug)]
pub struct FnvHasher(u64);

impl FnvHasher {
    /// A hasher seeded with the offset basis.
    pub const fn new() -> Self {
        Self(FNV_OFFSET)
    }
}

impl Default for FnvHasher {
    fn default() -> Self {
        Self::new()
    }
}

impl Hasher for FnvHasher {
    #[inline]
    fn write(&mut self, bytes: &[u8]) {
        let mut hash = self.0;
        for &b in bytes {
            hash = (hash ^ b as u64).wrapping_mul(FNV_PRIME);
        }
        self.0 = hash;
    }

    #[inline]
    fn finish(&self) -> u64 {
        self.0
    }
}

/// [`BuildHasher`](std::hash::BuildHasher) producing fresh [`FnvHasher`]s.
pub type BuildFnv = BuildHasherDefault<FnvHasher>;
