//! String interning.
//!
//! Sharded to keep lock contention low when the driver and checker both hold
//! a handle to the same interner across module boundaries (see
//! `SharedInterner`). The compiler itself is single-threaded cooperative
//! (driver never runs two modules concurrently) but the interner is shared
//! by reference across the lifetime of a whole build, so it is built to be
//! safely `Clone`-shared rather than assuming a single owner.

use crate::Name;
use parking_lot::RwLock;
use rustc_hash::FxHashMap;
use std::fmt;
use std::sync::Arc;

struct InternShard {
    map: FxHashMap<&'static str, u32>,
    strings: Vec<&'static str>,
}

impl InternShard {
    fn with_empty() -> Self {
        InternShard {
            map: FxHashMap::default(),
            strings: Vec::new(),
        }
    }
}

/// Interns strings into `Name` handles, shared across the whole compilation.
pub struct StringInterner {
    shards: [RwLock<InternShard>; Name::NUM_SHARDS],
}

/// Keywords of the Angara source language, pre-interned so checker and
/// backend code can refer to them by constant `Name` without a lookup.
const KEYWORDS: &[&str] = &[
    "class", "trait", "contract", "data", "enum", "attach", "export", "const",
    "foreign", "this", "super", "is", "match", "case", "spawn", "while", "for",
    "in", "if", "else", "return", "break", "continue", "throw", "try", "catch",
    "let", "fn", "init", "main", "nil", "true", "false", "public", "private",
];

impl StringInterner {
    #[must_use]
    pub fn new() -> Self {
        let interner = StringInterner {
            shards: std::array::from_fn(|_| RwLock::new(InternShard::with_empty())),
        };
        interner.pre_intern_keywords();
        interner
    }

    fn shard_for(s: &str) -> usize {
        let mut hash: u64 = 0xcbf2_9ce4_8422_2325;
        for b in s.bytes() {
            hash ^= u64::from(b);
            hash = hash.wrapping_mul(0x0000_0100_0000_01B3);
        }
        (hash as usize) % Name::NUM_SHARDS
    }

    /// Intern `s`, returning a stable handle. Repeated interning of an equal
    /// string returns the same handle.
    pub fn intern(&self, s: &str) -> Name {
        let shard_idx = Self::shard_for(s);
        {
            let shard = self.shards[shard_idx].read();
            if let Some(&idx) = shard.map.get(s) {
                return Name(pack(shard_idx, idx));
            }
        }
        let mut shard = self.shards[shard_idx].write();
        if let Some(&idx) = shard.map.get(s) {
            return Name(pack(shard_idx, idx));
        }
        let leaked: &'static str = Box::leak(s.to_owned().into_boxed_str());
        let idx = shard.strings.len() as u32;
        shard.strings.push(leaked);
        shard.map.insert(leaked, idx);
        Name(pack(shard_idx, idx))
    }

    /// Look up the text behind a `Name`.
    ///
    /// # Panics
    /// Panics if `name` was not produced by this interner.
    #[must_use]
    pub fn lookup(&self, name: Name) -> &str {
        let (shard_idx, idx) = unpack(name.0);
        let shard = self.shards[shard_idx].read();
        shard.strings[idx as usize]
    }

    fn pre_intern_keywords(&self) {
        for kw in KEYWORDS {
            self.intern(kw);
        }
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.shards.iter().map(|s| s.read().strings.len()).sum()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl Default for StringInterner {
    fn default() -> Self {
        Self::new()
    }
}

/// Pack a (shard, in-shard index) pair into a `u32`: top 4 bits shard,
/// bottom 28 bits index. 16 shards, 2^28 strings per shard is ample.
const fn pack(shard: usize, idx: u32) -> u32 {
    ((shard as u32) << 28) | (idx & 0x0FFF_FFFF)
}

const fn unpack(packed: u32) -> (usize, u32) {
    ((packed >> 28) as usize, packed & 0x0FFF_FFFF)
}

/// Thread-safe handle to a `StringInterner`, shared across the driver, the
/// checker, and the backend for the lifetime of a build.
#[derive(Clone)]
pub struct SharedInterner(Arc<StringInterner>);

impl SharedInterner {
    #[must_use]
    pub fn new(interner: StringInterner) -> Self {
        SharedInterner(Arc::new(interner))
    }
}

impl Default for SharedInterner {
    fn default() -> Self {
        SharedInterner::new(StringInterner::new())
    }
}

impl std::ops::Deref for SharedInterner {
    type Target = StringInterner;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl fmt::Debug for StringInterner {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "StringInterner({} strings)", self.len())
    }
}

impl fmt::Debug for SharedInterner {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(&*self.0, f)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_intern_roundtrip() {
        let interner = StringInterner::new();
        let a = interner.intern("hello");
        let b = interner.intern("hello");
        assert_eq!(a, b);
        assert_eq!(interner.lookup(a), "hello");
    }

    #[test]
    fn test_intern_distinct() {
        let interner = StringInterner::new();
        let a = interner.intern("foo");
        let b = interner.intern("bar");
        assert_ne!(a, b);
    }

    #[test]
    fn test_keywords_preinterned() {
        let interner = StringInterner::new();
        assert!(interner.len() >= KEYWORDS.len());
        let class_a = interner.intern("class");
        let class_b = interner.intern("class");
        assert_eq!(class_a, class_b);
    }

    #[test]
    fn test_shared_interner_clone_shares_storage() {
        let shared = SharedInterner::default();
        let a = shared.intern("shared_name");
        let shared2 = shared.clone();
        assert_eq!(shared2.lookup(a), "shared_name");
    }

    #[test]
    fn test_many_distinct_strings() {
        let interner = StringInterner::new();
        let mut names = Vec::new();
        for i in 0..500 {
            names.push(interner.intern(&format!("ident_{i}")));
        }
        for (i, name) in names.iter().enumerate() {
            assert_eq!(interner.lookup(*name), format!("ident_{i}"));
        }
    }
}
