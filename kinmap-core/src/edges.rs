// Edge inference between markers whose events share an identity

use crate::cluster::{Marker, group_by_first_seen};
use crate::record::{Event, IdentityKey};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use tracing::debug;

/// A line between two merged endpoints.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Edge {
    pub source: Marker,
    pub target: Marker,
}

impl Edge {
    /// Color weight of the edge, the larger of its endpoint weights.
    pub fn weight(&self) -> f64 {
        self.source.weight.max(self.target.weight)
    }

    /// Tooltip text: both endpoint titles.
    pub fn title(&self) -> String {
        format!("{}\n{}", self.source.title, self.target.title)
    }
}

/// Candidate pair generation for the identity self-join.
///
/// Implementations return index pairs `(i, j)` with `i < j` whose events
/// have equal identity keys, ordered by `i` then `j`.
pub trait PairJoin {
    fn matching_pairs(&self, events: &[Event]) -> Vec<(usize, usize)>;
}

/// Compares every pair in the strict upper triangle. O(n²) in the number of
/// events, fine for tens to low hundreds of rows.
#[derive(Debug, Clone, Copy, Default)]
pub struct PairwiseJoin;

impl PairJoin for PairwiseJoin {
    fn matching_pairs(&self, events: &[Event]) -> Vec<(usize, usize)> {
        let mut pairs = Vec::new();
        for (i, x) in events.iter().enumerate() {
            for (j, y) in events.iter().enumerate().skip(i + 1) {
                if x.identity == y.identity {
                    pairs.push((i, j));
                }
            }
        }
        pairs
    }
}

/// Buckets events by identity key before pairing, so only events that can
/// match are compared.
#[derive(Debug, Clone, Copy, Default)]
pub struct KeyedJoin;

impl PairJoin for KeyedJoin {
    fn matching_pairs(&self, events: &[Event]) -> Vec<(usize, usize)> {
        let mut buckets: HashMap<&IdentityKey, Vec<usize>> = HashMap::new();
        for (i, event) in events.iter().enumerate() {
            buckets.entry(&event.identity).or_default().push(i);
        }

        let mut pairs: Vec<(usize, usize)> = buckets
            .values()
            .filter(|bucket| bucket.len() > 1)
            .flat_map(|bucket| {
                bucket.iter().enumerate().flat_map(move |(n, &i)| {
                    bucket[n + 1..].iter().map(move |&j| (i, j))
                })
            })
            .collect();
        pairs.sort_unstable();
        pairs
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum JoinStrategy {
    #[default]
    Pairwise,
    Keyed,
}

impl JoinStrategy {
    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "pairwise" => Some(JoinStrategy::Pairwise),
            "keyed" | "hash" => Some(JoinStrategy::Keyed),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            JoinStrategy::Pairwise => "pairwise",
            JoinStrategy::Keyed => "keyed",
        }
    }
}

impl PairJoin for JoinStrategy {
    fn matching_pairs(&self, events: &[Event]) -> Vec<(usize, usize)> {
        match self {
            JoinStrategy::Pairwise => PairwiseJoin.matching_pairs(events),
            JoinStrategy::Keyed => KeyedJoin.matching_pairs(events),
        }
    }
}

/// Build one edge per distinct (source coordinate, target coordinate) pair.
///
/// Pairs located at the same coordinate are dropped since both events already
/// share a marker. Within a group each event contributes to an endpoint once.
pub fn build_edges<J: PairJoin + ?Sized>(events: &[Event], join: &J) -> Vec<Edge> {
    let pairs: Vec<(usize, usize)> = join
        .matching_pairs(events)
        .into_iter()
        .filter(|&(i, j)| events[i].coordinate != events[j].coordinate)
        .collect();

    let groups = group_by_first_seen(&pairs, |&(i, j)| {
        (events[i].coordinate, events[j].coordinate)
    });

    let edges: Vec<Edge> = groups
        .into_iter()
        .filter_map(|group| {
            let sources = distinct_indices(group.iter().map(|&&(i, _)| i));
            let targets = distinct_indices(group.iter().map(|&&(_, j)| j));
            Some(Edge {
                source: Marker::merge(sources.into_iter().map(|i| &events[i]))?,
                target: Marker::merge(targets.into_iter().map(|j| &events[j]))?,
            })
        })
        .collect();

    debug!(
        "Built {} edge(s) from {} matching pair(s)",
        edges.len(),
        pairs.len()
    );
    edges
}

fn distinct_indices(indices: impl Iterator<Item = usize>) -> Vec<usize> {
    let mut seen = Vec::new();
    for i in indices {
        if !seen.contains(&i) {
            seen.push(i);
        }
    }
    seen
}

