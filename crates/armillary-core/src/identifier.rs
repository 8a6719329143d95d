//! Node handles backed by a process-wide string interner.
//!
//! Every node in a diagram is addressed by an [`Id`]. Ids are `Copy`, compare
//! in constant time and print back as the key they were created from, which
//! makes them usable both as map keys and as Graphviz node names.

use std::{
    fmt,
    sync::{Mutex, OnceLock},
};

use string_interner::{DefaultStringInterner, DefaultSymbol};

/// Global string interner shared by all diagrams in the process.
static INTERNER: OnceLock<Mutex<DefaultStringInterner>> = OnceLock::new();

/// Runs `f` with exclusive access to the global interner.
fn with_interner<R>(f: impl FnOnce(&mut DefaultStringInterner) -> R) -> R {
    let mut interner = INTERNER
        .get_or_init(|| Mutex::new(DefaultStringInterner::new()))
        .lock()
        .unwrap_or_else(|poisoned| poisoned.into_inner());
    f(&mut interner)
}

/// Handle of a declared node.
///
/// Two ids created from the same key are equal, regardless of which diagram
/// they were created for. Uniqueness of a key within one diagram is enforced
/// by the builder, not by this type.
///
/// # Examples
///
/// ```
/// use armillary_core::identifier::Id;
///
/// let haproxy = Id::new("haproxy1");
/// assert_eq!(haproxy, Id::new("haproxy1"));
/// assert_eq!(haproxy, "haproxy1");
/// assert_eq!(haproxy.to_string(), "haproxy1");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Id(DefaultSymbol);

impl Id {
    /// Creates an `Id` for `key`, interning it on first use.
    pub fn new(key: &str) -> Self {
        Self(with_interner(|interner| interner.get_or_intern(key)))
    }

    /// Returns the key this id was created from.
    pub fn key(&self) -> String {
        with_interner(|interner| {
            interner
                .resolve(self.0)
                .map(str::to_owned)
                .unwrap_or_default()
        })
    }
}

impl fmt::Display for Id {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.key())
    }
}

impl From<&str> for Id {
    fn from(key: &str) -> Self {
        Self::new(key)
    }
}

impl PartialEq<str> for Id {
    fn eq(&self, other: &str) -> bool {
        with_interner(|interner| interner.resolve(self.0) == Some(other))
    }
}

impl PartialEq<&str> for Id {
    fn eq(&self, other: &&str) -> bool {
        self == *other
    }
}


#[cfg(test)]
mod proptest_tests {
    use proptest::prelude::*;

    use super::*;

    /// Interning is lossless and equal keys give equal ids.
    fn check_key_roundtrip(key: &str, other: &str) -> Result<(), TestCaseError> {
        let id = Id::new(key);
        prop_assert_eq!(id.key(), key);
        prop_assert_eq!(id, Id::new(key));
        prop_assert_eq!(id == Id::new(other), key == other);
        Ok(())
    }

    proptest! {
        #[test]
        fn key_roundtrip(key in "[a-z0-9-]{1,24}", other in "[a-z0-9-]{1,24}") {
            check_key_roundtrip(&key, &other)?;
        }
    }
}
