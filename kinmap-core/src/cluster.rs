// Grouping co-located events into map markers

use crate::record::{Coordinate, Event};
use serde::Serialize;
use std::collections::HashMap;
use tracing::debug;

/// One or more events merged at a single coordinate.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Marker {
    pub coordinate: Coordinate,
    /// Source event titles, one per line
    pub title: String,
    /// Minimum weight of the merged events
    pub weight: f64,
    pub event_count: usize,
}

impl Marker {
    /// Merge a group of events. The first event's coordinate wins, titles are
    /// joined in group order and the weight is the group minimum.
    ///
    /// Returns `None` for an empty group.
    pub fn merge<'a, I>(events: I) -> Option<Marker>
    where
        I: IntoIterator<Item = &'a Event>,
    {
        let mut iter = events.into_iter();
        let first = iter.next()?;

        let mut marker = Marker {
            coordinate: first.coordinate,
            title: first.title.clone(),
            weight: first.weight,
            event_count: 1,
        };
        for event in iter {
            marker.title.push('\n');
            marker.title.push_str(&event.title);
            marker.weight = marker.weight.min(event.weight);
            marker.event_count += 1;
        }
        Some(marker)
    }
}

/// Group events by exact coordinate, one marker per distinct coordinate in
/// first-seen order.
pub fn cluster(events: &[Event]) -> Vec<Marker> {
    let groups = group_by_first_seen(events, |e| e.coordinate);
    let markers: Vec<Marker> = groups
        .into_iter()
        .filter_map(|group| Marker::merge(group))
        .collect();

    debug!(
        "Clustered {} event(s) into {} marker(s)",
        events.len(),
        markers.len()
    );
    markers
}

/// Stable grouping: groups appear in order of their first member and each
/// group keeps its members' relative order.
pub(crate) fn group_by_first_seen<T, K, F>(items: &[T], key: F) -> Vec<Vec<&T>>
where
    K: std::hash::Hash + Eq,
    F: Fn(&T) -> K,
{
    let mut index: HashMap<K, usize> = HashMap::new();
    let mut groups: Vec<Vec<&T>> = Vec::new();

    for item in items {
        let slot = *index.entry(key(item)).or_insert_with(|| {
            groups.push(Vec::new());
            groups.len() - 1
        });
        groups[slot].push(item);
    }
    groups
}
