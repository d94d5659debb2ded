//! Identifier management using string interning for efficient string storage and comparison
//!
//! Every addressable entity of a diagram (node or edge) is named by an [`Id`].
//! Ids are `Copy`, cheap to hash and compare, and resolve back to their text
//! through a process-wide interner.

use std::{
    fmt,
    sync::{Mutex, MutexGuard, OnceLock, PoisonError},
};

use string_interner::{DefaultStringInterner, DefaultSymbol};

/// Global string interner for identifier storage.
///
/// # Thread Safety
///
/// Access is serialized through a `Mutex`. A poisoned lock is recovered, since
/// the interner is append-only and cannot be left half-updated.
static INTERNER: OnceLock<Mutex<DefaultStringInterner>> = OnceLock::new();

fn interner() -> MutexGuard<'static, DefaultStringInterner> {
    INTERNER
        .get_or_init(|| Mutex::new(DefaultStringInterner::new()))
        .lock()
        .unwrap_or_else(PoisonError::into_inner)
}

/// Interned identifier of a node or an edge.
///
/// # Examples
///
/// ```
/// use animflow_core::identifier::Id;
///
/// let start = Id::new("start");
/// assert_eq!(start, "start");
///
/// let edge = Id::edge("start", "end", 0);
/// assert_eq!(edge, "start_to_end");
///
/// let parallel = Id::edge("start", "end", 2);
/// assert_eq!(parallel, "start_to_end_2");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Id(DefaultSymbol);

impl Id {
    /// Creates an `Id` from its textual name.
    pub fn new(name: &str) -> Self {
        Self(interner().get_or_intern(name))
    }

    /// Creates the identifier of the edge going from `from` to `to`.
    ///
    /// The first edge between a pair is named `<from>_to_<to>`; parallel
    /// edges declared later carry their ordinal as a suffix so that each one
    /// stays independently addressable.
    pub fn edge(from: impl fmt::Display, to: impl fmt::Display, ordinal: usize) -> Self {
        if ordinal == 0 {
            Self::new(&format!("{from}_to_{to}"))
        } else {
            Self::new(&format!("{from}_to_{to}_{ordinal}"))
        }
    }

    /// Returns the textual name of this identifier.
    pub fn as_string(&self) -> String {
        interner()
            .resolve(self.0)
            .map(str::to_owned)
            .unwrap_or_default()
    }
}

impl fmt::Display for Id {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.as_string())
    }
}

impl From<&str> for Id {
    fn from(name: &str) -> Self {
        Self::new(name)
    }
}

impl PartialEq<&str> for Id {
    fn eq(&self, other: &&str) -> bool {
        interner().get(*other).is_some_and(|symbol| symbol == self.0)
    }
}

impl PartialEq<str> for Id {
    fn eq(&self, other: &str) -> bool {
        interner().get(other).is_some_and(|symbol| symbol == self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_same_name_same_id() {
        assert_eq!(Id::new("node_a"), Id::new("node_a"));
        assert_ne!(Id::new("node_a"), Id::new("node_b"));
    }

    #[test]
    fn test_display_round_trip() {
        let id = Id::new("payment-service");
        assert_eq!(id.to_string(), "payment-service");
    }

    #[test]
    fn test_compare_with_str() {
        let id = Id::new("client");
        assert_eq!(id, "client");
        assert!(id != "server");
        assert!(id != "never-interned-before-xyz");
    }

    #[test]
    fn test_edge_ids_with_ordinals() {
        assert_eq!(Id::edge("A", "B", 0), "A_to_B");
        assert_eq!(Id::edge("A", "B", 1), "A_to_B_1");
        assert_ne!(Id::edge("A", "B", 0), Id::edge("B", "A", 0));
        assert_eq!(Id::edge(Id::new("A"), Id::new("B"), 0), Id::edge("A", "B", 0));
    }
}
