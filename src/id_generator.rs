//! Id synthesis for nodes and edges.
//! Node ids are "{kind}-{n}" with a per-kind counter that only moves forward.
//! Edge ids are derived from their endpoints, suffixed when the pair was already issued.

use crate::NodeKind;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashSet};

/// Per-kind creation counter
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TypeCounter {
    counts: BTreeMap<NodeKind, u32>,
}

impl TypeCounter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Counter seeded with known counts
    pub fn with_counts(counts: impl IntoIterator<Item = (NodeKind, u32)>) -> Self {
        Self {
            counts: counts.into_iter().collect(),
        }
    }

    /// Current count for a kind (0 when never used)
    pub fn count(&self, kind: NodeKind) -> u32 {
        self.counts.get(&kind).copied().unwrap_or(0)
    }

    /// Advance the counter for `kind` and return the new value.
    /// An exhausted counter starts over at 1; the store skips ids still in use.
    pub fn next(&mut self, kind: NodeKind) -> u32 {
        let count = self.counts.entry(kind).or_insert(0);
        *count = count.checked_add(1).unwrap_or(1);
        *count
    }

    /// Id for the `n`th node of a kind
    pub fn node_id(kind: NodeKind, n: u32) -> String {
        format!("{}-{}", kind, n)
    }

    /// Seed counters from ids already in a graph so new ids never collide
    pub fn from_existing_ids<'a>(ids: impl IntoIterator<Item = &'a str>) -> Self {
        let mut counter = Self::new();

        for id in ids {
            if let Some((kind, n)) = Self::decode(id) {
                let count = counter.counts.entry(kind).or_insert(0);
                *count = (*count).max(n);
            }
        }

        counter
    }

    /// Raise each count to at least the value found in `other`
    pub fn absorb(&mut self, other: &TypeCounter) {
        for (kind, n) in &other.counts {
            let count = self.counts.entry(*kind).or_insert(0);
            *count = (*count).max(*n);
        }
    }

    /// Decode "{kind}-{n}" back to its parts
    fn decode(id: &str) -> Option<(NodeKind, u32)> {
        let (kind, n) = id.rsplit_once('-')?;
        Some((kind.parse().ok()?, n.parse().ok()?))
    }
}

/// Edge id generator; remembers every id it has seen
#[derive(Debug, Clone, Default)]
pub struct EdgeIdGenerator {
    seen: HashSet<String>,
}

impl EdgeIdGenerator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Generator that will never hand out any of `ids`
    pub fn from_existing_ids<'a>(ids: impl IntoIterator<Item = &'a str>) -> Self {
        Self {
            seen: ids.into_iter().map(str::to_string).collect(),
        }
    }

    /// Mark an id as used
    pub fn reserve(&mut self, id: &str) {
        self.seen.insert(id.to_string());
    }

    /// Generate the next id for a connection
    pub fn next(&mut self, source: &str, source_handle: Option<&str>, target: &str) -> String {
        let base = match source_handle {
            Some(handle) => format!("e{}:{}-{}", source, handle, target),
            None => format!("e{}-{}", source, target),
        };

        let mut n = 1u32;
        let id = loop {
            let candidate = if n == 1 {
                base.clone()
            } else {
                format!("{}-{}", base, n)
            };
            if !self.seen.contains(&candidate) {
                break candidate;
            }
            n += 1;
        };

        self.seen.insert(id.clone());
        id
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_basic_generation() {
        let mut counter = TypeCounter::new();
        assert_eq!(counter.next(NodeKind::Action), 1);
        assert_eq!(counter.next(NodeKind::Action), 2);
        assert_eq!(counter.next(NodeKind::Decision), 1);
        assert_eq!(counter.count(NodeKind::Action), 2);
        assert_eq!(counter.count(NodeKind::Flag), 0);
    }

    #[test]
    fn test_exhausted_counter_restarts() {
        let mut counter = TypeCounter::from_existing_ids(["action-4294967295"]);
        assert_eq!(counter.count(NodeKind::Action), u32::MAX);
        assert_eq!(counter.next(NodeKind::Action), 1);
        assert_eq!(counter.next(NodeKind::Action), 2);
    }

    #[test]
    fn test_node_id() {
        assert_eq!(TypeCounter::node_id(NodeKind::QrCode, 3), "qrcode-3");
    }

    #[test]
    fn test_from_existing() {
        let counter = TypeCounter::from_existing_ids([
            "decision-1",
            "decision-2",
            "flag-1",
            "e1-2",
            "circle-9",
        ]);

        assert_eq!(counter.count(NodeKind::Decision), 2);
        assert_eq!(counter.count(NodeKind::Flag), 1);
        assert_eq!(counter.count(NodeKind::Action), 0);
    }

    #[test]
    fn test_absorb_never_lowers() {
        let mut counter = TypeCounter::with_counts([(NodeKind::Action, 5)]);
        counter.absorb(&TypeCounter::with_counts([(NodeKind::Action, 2), (NodeKind::Card, 3)]));

        assert_eq!(counter.count(NodeKind::Action), 5);
        assert_eq!(counter.count(NodeKind::Card), 3);
    }

    #[test]
    fn test_edge_ids() {
        let mut gen = EdgeIdGenerator::new();
        assert_eq!(gen.next("action-1", None, "decision-2"), "eaction-1-decision-2");
        assert_eq!(gen.next("decision-1", Some("yes"), "flag-1"), "edecision-1:yes-flag-1");
        // Parallel connection gets a fresh id
        assert_eq!(gen.next("action-1", None, "decision-2"), "eaction-1-decision-2-2");
    }

    #[test]
    fn test_edge_ids_skip_existing() {
        let mut gen = EdgeIdGenerator::from_existing_ids(["ea-b"]);
        assert_eq!(gen.next("a", None, "b"), "ea-b-2");
    }
}
